pub mod catalog;
pub mod cell;
pub mod field;
pub mod service;
