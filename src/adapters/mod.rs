pub mod config;
pub mod in_memory;
pub mod sheets;
