pub mod prettyprint;
pub mod table_grid;
