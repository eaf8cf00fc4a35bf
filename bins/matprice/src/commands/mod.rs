//! Subcommand implementations

pub mod admin;
pub mod history;
pub mod import;
pub mod query;
