pub mod config;
pub mod cursor;
pub mod query;
pub mod records;
pub mod value;
