//! Core utilities for the material price tools
//!
//! This crate provides functionality shared by the store and the CLI:
//!
//! - **Error handling**: Coded errors with context and recovery suggestions
//! - **Configuration**: TOML-based configuration with validation
//! - **Validation**: Field-level checks for user input
//!
//! # Example
//!
//! ```rust,no_run
//! use matprice_core::config::Config;
//!
//! let config = Config::load(None).expect("Invalid configuration");
//! println!("Records live in {}", config.schema.storage.data_file.display());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};
