pub mod error;
pub mod params;
pub mod resource;
pub mod source;
pub mod template;
pub mod validation;
