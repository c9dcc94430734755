pub mod client;
pub mod dune;
pub mod error;
pub mod result;
