//! Configuration loading and schema definitions
//!
//! Storage locations, display windows and logging settings shared by the
//! store and the CLI.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
