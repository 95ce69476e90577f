pub mod a1_notation;
pub mod auth;
pub mod google_sheets;
pub mod http_client;
