// Public API exports
pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;
pub mod prettyprint;

// Re-export key types for easy access
pub use application::{
    dashboard::SpreadsheetDashboard, sheet_client::SheetClient, worksheet_loader::WorksheetLoader,
};
pub use domain::{table::Table, worksheet::WorksheetName};
pub use ports::{dashboard_service::DashboardService, load_error::LoadError};
