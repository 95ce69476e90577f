pub mod cache;
pub mod dashboard;
pub mod sheet_client;
pub mod worksheet_loader;
