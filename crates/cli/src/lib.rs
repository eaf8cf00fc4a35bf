//! CLI utilities for the material price tools
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Record tables padded by display width
//! - Progress spinners

#![warn(missing_docs)]

pub mod output;
pub mod progress;
