pub mod config;
pub mod destination;
pub mod error;
pub mod pipeline;
pub mod state;
pub mod summary;
