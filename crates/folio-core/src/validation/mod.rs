#![forbid(unsafe_code)]

//! Field validation primitives.
//!
//! A small slice of a declarative validation system:
//! - A core `Validator` trait for validating values
//! - Built-in validators for the rules the contact form needs (min length, email)
//! - Error values with a stable code and `{param}` interpolation
//!
//! # Example
//!
//! ```rust
//! use folio_core::validation::{Email, MinLength, Validator};
//!
//! assert!(MinLength::new(2).validate("Ann").is_valid());
//! assert!(!Email::new().validate("not-an-email").is_valid());
//! ```

mod validators;

pub use validators::{
    // Error codes
    EMAIL_PATTERN,
    ERROR_CODE_EMAIL,
    ERROR_CODE_MIN_LENGTH,
    // Built-in validators
    Email,
    MinLength,
    // Core types
    ValidationError,
    ValidationResult,
    Validator,
};
