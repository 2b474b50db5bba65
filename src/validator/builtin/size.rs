//! Length bounds on text, collections and maps.

use crate::error::ValidationError;
use crate::validator::Validator;
use crate::value::Value;

/// Bound value meaning "no bound".
pub const UNBOUNDED: i64 = -1;

/// Checks that a length lies within `[min, max]`.
///
/// Text is measured in characters. Either bound may be [`UNBOUNDED`]. Values
/// without a length pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    min: i64,
    max: i64,
}

impl Size {
    /// Creates a size check; pass [`UNBOUNDED`] to leave a side open.
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    fn admits(&self, length: usize) -> bool {
        let length = i64::try_from(length).unwrap_or(i64::MAX);
        let above_min = self.min == UNBOUNDED || length >= self.min;
        let below_max = self.max == UNBOUNDED || length <= self.max;
        above_min && below_max
    }
}

impl Validator for Size {
    fn name(&self) -> Option<&str> {
        Some("size")
    }

    fn validate(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        let (what, length) = match value {
            Value::Text(s) => ("string", s.chars().count()),
            Value::List(items) => ("collection", items.len()),
            Value::Map(entries) => ("map", entries.len()),
            _ => return Ok(()),
        };

        if self.admits(length) {
            return Ok(());
        }
        Err(ValidationError::new(format!(
            "{what} length {length} is not between required min {} and max {}",
            self.min, self.max
        ))
        .with_code("size"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        let size = Size::new(2, 3);
        assert!(size.validate(&Value::from("ab")).is_ok());
        assert!(size.validate(&Value::from("abc")).is_ok());
        assert!(size.validate(&Value::from("a")).is_err());
        assert!(size.validate(&Value::from("abcd")).is_err());
    }

    #[test]
    fn test_unbounded_sides() {
        assert!(Size::new(UNBOUNDED, 1).validate(&Value::from("")).is_ok());
        assert!(Size::new(1, UNBOUNDED)
            .validate(&Value::List(vec![Value::Null; 500]))
            .is_ok());
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        assert!(Size::new(1, 2).validate(&Value::from("éé")).is_ok());
    }

    #[test]
    fn test_message_names_kind() {
        let err = Size::new(1, 1)
            .validate(&Value::Map(Vec::new()))
            .unwrap_err();
        assert_eq!(
            err.message.as_deref(),
            Some("map length 0 is not between required min 1 and max 1")
        );
        assert_eq!(err.code, "size");
    }

    #[test]
    fn test_values_without_length_pass() {
        assert!(Size::new(5, 6).validate(&Value::Null).is_ok());
        assert!(Size::new(5, 6).validate(&Value::Integer(1)).is_ok());
    }
}
