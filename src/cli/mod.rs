pub mod cli_adapter;
pub mod command;
