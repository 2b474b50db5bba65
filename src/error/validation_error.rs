//! Validation error types.
//!
//! This module provides [`ValidationError`] for single failures found while
//! walking an object graph and [`ValidationErrors`] for a non-empty,
//! combinable collection of them.

use std::error::Error;
use std::fmt::{self, Display};
use std::sync::Arc;

use serde_json::Value as JsonValue;
use stillwater::prelude::*;

use crate::path::FieldPath;

/// Shared, type-erased failure cause attached to a [`ValidationError`].
pub type Cause = Arc<dyn Error + Send + Sync + 'static>;

/// A single validation failure with full context.
///
/// `ValidationError` captures everything known about one failure:
/// - **field**: the dotted path of the field (aliases substituted)
/// - **value**: a snapshot of the offending value
/// - **message**: human-readable description, overridable per binding
/// - **cause**: the underlying error for access failures and panicking validators
/// - **code**: machine-readable error code for programmatic handling
///
/// Validators build one with [`ValidationError::new`] or
/// [`ValidationError::from_cause`]; the engine fills in the field path, the
/// value and any binding message before the error lands in the response.
///
/// # Example
///
/// ```rust
/// use validgraph::ValidationError;
///
/// let error = ValidationError::new("value is null").with_code("not_null");
///
/// assert_eq!(error.message.as_deref(), Some("value is null"));
/// assert_eq!(error.code, "not_null");
/// assert!(error.field.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Dotted path of the field that failed, e.g. `customer.email`.
    pub field: String,
    /// Snapshot of the value that failed validation.
    pub value: JsonValue,
    /// Human-readable error message.
    pub message: Option<String>,
    /// Underlying failure, if the error came from an access failure or a
    /// misbehaving validator.
    pub cause: Option<Cause>,
    /// Machine-readable error code (e.g. `size`, `field_access`).
    pub code: String,
}

impl ValidationError {
    /// Creates a new error carrying a message.
    ///
    /// The error code defaults to "validation_error". Use `with_code` to set
    /// a more specific code.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            field: String::new(),
            value: JsonValue::Null,
            message: Some(message.into()),
            cause: None,
            code: "validation_error".to_string(),
        }
    }

    /// Creates a new error whose only content is an underlying cause.
    pub fn from_cause<E>(cause: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            field: String::new(),
            value: JsonValue::Null,
            message: None,
            cause: Some(Arc::new(cause)),
            code: "validation_error".to_string(),
        }
    }

    /// Sets the error code and returns self for chaining.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the message and returns self for chaining.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the cause and returns self for chaining.
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// Sets the offending value and returns self for chaining.
    pub fn with_value(mut self, value: JsonValue) -> Self {
        self.value = value;
        self
    }

    /// Sets the field from a path stack and returns self for chaining.
    pub fn at(mut self, path: &FieldPath) -> Self {
        self.field = path.to_string();
        self
    }

    /// Returns the underlying cause, if any.
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Returns the cause downcast to a concrete error type.
    pub fn cause_as<E: Error + 'static>(&self) -> Option<&E> {
        self.cause().and_then(|c| c.downcast_ref::<E>())
    }

    /// Returns the message, falling back to the rendered cause.
    pub fn describe(&self) -> String {
        match (&self.message, &self.cause) {
            (Some(message), _) => message.clone(),
            (None, Some(cause)) => cause.to_string(),
            (None, None) => "validation failed".to_string(),
        }
    }
}

impl PartialEq for ValidationError {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field
            && self.value == other.value
            && self.message == other.message
            && self.code == other.code
            && self.cause.as_ref().map(|c| c.to_string())
                == other.cause.as_ref().map(|c| c.to_string())
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = if self.field.is_empty() {
            "(root)"
        } else {
            self.field.as_str()
        };

        write!(f, "{}: {}", field, self.describe())?;

        if !self.value.is_null() {
            write!(f, " (got: {})", self.value)?;
        }

        Ok(())
    }
}

impl Error for ValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn Error + 'static))
    }
}

// ValidationErrors crosses thread boundaries in `Engine::validate_all`.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationError>();
    assert_sync::<ValidationError>();
};

/// A non-empty collection of validation errors.
///
/// `ValidationErrors` wraps a `NonEmptyVec<ValidationError>` so that a
/// `Validation<T, ValidationErrors>` failure always carries at least one
/// error. It is what [`ValidationResponse::into_result`] hands back.
///
/// # Combining Errors
///
/// ```rust
/// use validgraph::{ValidationError, ValidationErrors};
/// use stillwater::prelude::*;
///
/// let errors1 = ValidationErrors::single(ValidationError::new("required"));
/// let errors2 = ValidationErrors::single(ValidationError::new("too long"));
///
/// let combined = errors1.combine(errors2);
/// assert_eq!(combined.len(), 2);
/// ```
///
/// [`ValidationResponse::into_result`]: crate::ValidationResponse::into_result
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(NonEmptyVec<ValidationError>);

impl ValidationErrors {
    /// Creates a `ValidationErrors` containing a single error.
    pub fn single(error: ValidationError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Creates a `ValidationErrors` from a `Vec`, or None if it is empty.
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        let mut errors = errors.into_iter();
        let head = errors.next()?;
        Some(errors.fold(Self::single(head), |acc, error| {
            acc.combine(Self::single(error))
        }))
    }

    /// Returns the number of errors in this collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is guaranteed non-empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the contained errors.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Returns all errors reported at the given dotted field path.
    pub fn at_field(&self, field: &str) -> Vec<&ValidationError> {
        self.0.iter().filter(|e| e.field == field).collect()
    }

    /// Returns all errors with the given error code.
    pub fn with_code(&self, code: &str) -> Vec<&ValidationError> {
        self.0.iter().filter(|e| e.code == code).collect()
    }

    /// Returns the first error in the collection.
    pub fn first(&self) -> &ValidationError {
        self.0.head()
    }

    /// Converts this collection into a `Vec<ValidationError>`.
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0.into_vec()
    }
}

impl Semigroup for ValidationErrors {
    fn combine(self, other: Self) -> Self {
        ValidationErrors(self.0.combine(other.0))
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}
