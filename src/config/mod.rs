//! Project configuration
//!
//! Provides types and loading for the optional `pxsheet.toml` project file.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
