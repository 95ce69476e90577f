pub mod dashboard_service;
pub mod load_error;
pub mod sheets_api;
