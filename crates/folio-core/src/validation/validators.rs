#![forbid(unsafe_code)]

//! Core validation types and built-in validators.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Error Codes
// ---------------------------------------------------------------------------

/// Error code for minimum length validation.
pub const ERROR_CODE_MIN_LENGTH: &str = "too_short";
/// Error code for email validation.
pub const ERROR_CODE_EMAIL: &str = "email";

/// Accepted email shape: `local@domain.tld`, no whitespace, a single `@`.
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// A validation error with code, message, and interpolation parameters.
///
/// The `code` field is a stable identifier for programmatic handling.
/// The `message` field is a human-readable template.
/// The `params` field contains key-value pairs for message interpolation.
///
/// # Example
///
/// ```rust
/// use folio_core::validation::ValidationError;
///
/// let error = ValidationError::new("too_short", "Must be at least {min} characters")
///     .with_param("min", 8);
///
/// assert_eq!(error.format_message(), "Must be at least 8 characters");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Stable error code.
    pub code: &'static str,
    /// Human-readable error message template.
    pub message: String,
    /// Parameters for message interpolation.
    pub params: BTreeMap<String, String>,
}

impl ValidationError {
    /// Create a new validation error with the given code and message.
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter for message interpolation.
    ///
    /// Parameters are substituted in the message using `{key}` syntax.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// Replace the message template, keeping code and parameters.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Format the message with parameter substitution.
    #[must_use]
    pub fn format_message(&self) -> String {
        let mut result = self.message.clone();
        for (key, value) in &self.params {
            result = result.replace(&format!("{{{key}}}"), value);
        }
        result
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_message())
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// ValidationResult
// ---------------------------------------------------------------------------

/// The result of a validation operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValidationResult {
    /// The value is valid.
    #[default]
    Valid,
    /// The value is invalid with an error.
    Invalid(ValidationError),
}

impl ValidationResult {
    /// Returns `true` if the result is `Valid`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns `true` if the result is `Invalid`.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    /// Returns the error if the result is `Invalid`, otherwise `None`.
    #[must_use]
    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            Self::Valid => None,
            Self::Invalid(e) => Some(e),
        }
    }

    /// Convert into a `Result`, for use with `?`.
    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(e) => Err(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Validator Trait
// ---------------------------------------------------------------------------

/// A trait for validating values of type `T`.
pub trait Validator<T: ?Sized>: Send + Sync {
    /// Validate the given value.
    fn validate(&self, value: &T) -> ValidationResult;
}

// ---------------------------------------------------------------------------
// Built-in Validators
// ---------------------------------------------------------------------------

/// Validates that a string has at least `min` characters.
///
/// Length counts UTF-16 code units, the way a browser measures a string:
/// `"café"` has four, and an emoji outside the BMP such as `"😀"` has two.
#[derive(Debug, Clone, Copy)]
pub struct MinLength {
    /// Minimum number of characters required.
    pub min: usize,
}

impl MinLength {
    /// Create a new `MinLength` validator.
    #[must_use]
    pub fn new(min: usize) -> Self {
        Self { min }
    }
}

impl Validator<str> for MinLength {
    fn validate(&self, value: &str) -> ValidationResult {
        let len = value.encode_utf16().count();
        if len < self.min {
            ValidationResult::Invalid(
                ValidationError::new(ERROR_CODE_MIN_LENGTH, "Must be at least {min} characters")
                    .with_param("min", self.min)
                    .with_param("actual", len),
            )
        } else {
            ValidationResult::Valid
        }
    }
}

/// Validates that a string looks like an email address.
///
/// Matches [`EMAIL_PATTERN`]: a non-empty local part, `@`, a non-empty domain
/// label, a `.`, and a non-empty suffix, none of which contain whitespace.
/// Unlike a length check, the empty string is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct Email;

impl Email {
    /// Create a new `Email` validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn pattern() -> &'static Regex {
        static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
        EMAIL_RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
    }
}

impl Validator<str> for Email {
    fn validate(&self, value: &str) -> ValidationResult {
        if Self::pattern().is_match(value) {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(ValidationError::new(
                ERROR_CODE_EMAIL,
                "Invalid email address",
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
