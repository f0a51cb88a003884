pub mod names;
pub mod schema;
pub mod types;
