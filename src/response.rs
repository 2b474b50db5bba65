//! The outcome of one validation run.

use std::fmt::{self, Display};

use stillwater::Validation;

use crate::error::{ValidationError, ValidationErrors};

/// Every error found while validating one root object, in walk order.
///
/// A response is valid iff it holds no errors. Errors inside collections
/// share the collection field's path, so [`errors_for_field`] can return
/// several errors for one path.
///
/// # Example
///
/// ```rust
/// use validgraph::{FieldPath, ValidationError, ValidationResponse};
///
/// let mut response = ValidationResponse::new();
/// assert!(response.is_valid());
///
/// response.push(ValidationError::new("value is null").at(&FieldPath::from_segment("name")));
/// assert!(!response.is_valid());
/// assert_eq!(response.errors_for_field("name").len(), 1);
/// ```
///
/// [`errors_for_field`]: ValidationResponse::errors_for_field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResponse {
    errors: Vec<ValidationError>,
}

impl ValidationResponse {
    /// Creates an empty, valid response.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no errors were found.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// All errors, in the order they were found.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Errors reported at exactly the given dotted path.
    pub fn errors_for_field(&self, field: &str) -> Vec<&ValidationError> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }

    /// Errors carrying the given code.
    pub fn errors_with_code(&self, code: &str) -> Vec<&ValidationError> {
        self.errors.iter().filter(|e| e.code == code).collect()
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if there are no errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Appends an error.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Consumes the response, returning the errors.
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Converts the response into an accumulating `Validation`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use validgraph::ValidationResponse;
    ///
    /// assert!(ValidationResponse::new().into_result().is_success());
    /// ```
    pub fn into_result(self) -> Validation<(), ValidationErrors> {
        match ValidationErrors::from_vec(self.errors) {
            Some(errors) => Validation::Failure(errors),
            None => Validation::Success(()),
        }
    }
}

impl Display for ValidationResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return write!(f, "valid");
        }
        writeln!(f, "{} validation error(s):", self.len())?;
        for error in &self.errors {
            writeln!(f, "  - {}", error)?;
        }
        Ok(())
    }
}

impl IntoIterator for ValidationResponse {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationResponse {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::FieldPath;

    fn error_at(path: &[&str], code: &str) -> ValidationError {
        let path: FieldPath = path.iter().copied().collect();
        ValidationError::new("failed").with_code(code).at(&path)
    }

    #[test]
    fn test_filters_by_exact_path() {
        let mut response = ValidationResponse::new();
        response.push(error_at(&["a", "f1"], "x"));
        response.push(error_at(&["a"], "x"));
        response.push(error_at(&["a", "f1"], "y"));

        assert_eq!(response.errors_for_field("a.f1").len(), 2);
        assert_eq!(response.errors_for_field("a").len(), 1);
        assert!(response.errors_for_field("f1").is_empty());
        assert_eq!(response.errors_with_code("y").len(), 1);
    }

    #[test]
    fn test_into_result_failure_keeps_every_error() {
        let mut response = ValidationResponse::new();
        response.push(error_at(&["a"], "x"));
        response.push(error_at(&["b"], "x"));

        match response.into_result() {
            Validation::Failure(errors) => assert_eq!(errors.len(), 2),
            Validation::Success(()) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ValidationResponse::new().to_string(), "valid");

        let mut response = ValidationResponse::new();
        response.push(error_at(&["name"], "x"));
        let display = response.to_string();
        assert!(display.contains("1 validation error(s)"));
        assert!(display.contains("name: failed"));
    }
}
