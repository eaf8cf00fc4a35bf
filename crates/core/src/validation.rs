//! Input validation
//!
//! Field-level checks for user-supplied query input and configuration
//! values. Failures are collected rather than short-circuited so a caller
//! can report every bad field at once.
//!
//! # Example
//!
//! ```rust
//! use matprice_core::validation::Validator;
//!
//! let result = Validator::new()
//!     .required("start", "202301")
//!     .exact_length("start", "202301", 6)
//!     .validate();
//!
//! assert!(result.is_valid());
//! ```

use crate::error::{Error, ErrorCode, Result};
use serde::{Deserialize, Serialize};

/// Validation error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed validation
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
    /// Expected value (if applicable)
    pub expected: Option<String>,
    /// Actual value (if applicable)
    pub actual: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Add an error
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Check whether a given field has at least one error
    pub fn has_error_for(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Convert to Result type with the generic validation code
    pub fn to_result(self) -> Result<()> {
        self.to_result_with(ErrorCode::ValidationError)
    }

    /// Convert to Result type, tagging a failure with `code`
    pub fn to_result_with(self, code: ErrorCode) -> Result<()> {
        if self.is_valid() {
            return Ok(());
        }
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        let mut err = Error::new(code, format!("Validation failed: {}", messages.join("; ")));
        if let Some(expected) = self.errors.iter().find_map(|e| e.expected.as_deref()) {
            err = err.with_suggestion(format!("Expected {expected}"));
        }
        Err(err)
    }
}

/// Fluent validator builder
pub struct Validator {
    result: ValidationResult,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self {
            result: ValidationResult::new(),
        }
    }

    /// Validate that a field is not empty
    #[must_use]
    pub fn required(mut self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: "Field is required".to_string(),
                code: "REQUIRED".to_string(),
                expected: Some("non-empty value".to_string()),
                actual: Some("empty".to_string()),
            });
        }
        self
    }

    /// Validate the length in characters, skipping empty values so that
    /// `required` reports those
    #[must_use]
    pub fn exact_length(mut self, field: &str, value: &str, len: usize) -> Self {
        let actual = value.chars().count();
        if !value.is_empty() && actual != len {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: format!("Must be exactly {len} characters"),
                code: "EXACT_LENGTH".to_string(),
                expected: Some(format!("{len} chars")),
                actual: Some(format!("{actual} chars")),
            });
        }
        self
    }

    /// Record an error when `ok` is false
    #[must_use]
    pub fn check(mut self, field: &str, ok: bool, message: &str, expected: &str) -> Self {
        if !ok && !self.result.has_error_for(field) {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: message.to_string(),
                code: "FORMAT".to_string(),
                expected: Some(expected.to_string()),
                actual: None,
            });
        }
        self
    }

    /// Complete validation and return result
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_validation() {
        let result = Validator::new().required("start", "  ").validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "REQUIRED");
    }

    #[test]
    fn test_exact_length_validation() {
        let result = Validator::new().exact_length("start", "2023-01", 6).validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "EXACT_LENGTH");
        assert_eq!(result.errors()[0].actual.as_deref(), Some("7 chars"));
    }

    #[test]
    fn test_exact_length_counts_chars_not_bytes() {
        let result = Validator::new().exact_length("name", "水泥", 2).validate();
        assert!(result.is_valid());
    }

    #[test]
    fn test_check_skips_field_with_existing_error() {
        let result = Validator::new()
            .required("end", "")
            .check("end", false, "Not a month", "YYYYMM")
            .validate();
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].code, "REQUIRED");
    }

    #[test]
    fn test_to_result_with_code() {
        let err = Validator::new()
            .check("start", false, "Not a month", "YYYYMM")
            .validate()
            .to_result_with(ErrorCode::InvalidYearMonth)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidYearMonth);
        assert!(err.message.contains("start: Not a month"));
        assert_eq!(err.suggestion.as_deref(), Some("Expected YYYYMM"));
    }

    #[test]
    fn test_chained_validation() {
        let result = Validator::new()
            .required("start", "202301")
            .exact_length("start", "202301", 6)
            .check("start", true, "unused", "YYYYMM")
            .validate();
        assert!(result.is_valid());
        assert!(result.to_result().is_ok());
    }
}
