pub mod export;
pub mod gviz;
pub mod script;
