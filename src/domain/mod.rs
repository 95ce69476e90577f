pub mod table;
pub mod worksheet;
