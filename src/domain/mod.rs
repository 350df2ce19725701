pub mod catalog_state;
pub mod delete;
pub mod entities;
pub mod filter;
pub mod form;
pub mod format;
pub mod headers;
pub mod notification;
pub mod schema;
