pub mod export_service;
pub mod load_service;
pub mod mutation_service;
