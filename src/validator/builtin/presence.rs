//! Presence checks: `notNull`, `null`, `notEmpty` and `required`.

use crate::error::ValidationError;
use crate::validator::Validator;
use crate::value::Value;

/// Fails on an absent value.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotNull;

impl Validator for NotNull {
    fn name(&self) -> Option<&str> {
        Some("notNull")
    }

    fn validate(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        if value.is_null() {
            return Err(ValidationError::new("value is null").with_code("not_null"));
        }
        Ok(())
    }
}

/// Fails on a present value.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsNull;

impl Validator for IsNull {
    fn name(&self) -> Option<&str> {
        Some("null")
    }

    fn validate(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        if !value.is_null() {
            return Err(ValidationError::new("value is not null").with_code("null"));
        }
        Ok(())
    }
}

/// Fails on empty text, collections and maps. Absent values pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotEmpty;

impl Validator for NotEmpty {
    fn name(&self) -> Option<&str> {
        Some("notEmpty")
    }

    fn validate(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        let what = match value {
            Value::Text(s) if s.is_empty() => "string",
            Value::List(items) if items.is_empty() => "collection",
            Value::Map(entries) if entries.is_empty() => "map",
            _ => return Ok(()),
        };
        Err(ValidationError::new(format!("{what} is empty")).with_code("not_empty"))
    }
}

/// [`NotEmpty`] followed by [`NotNull`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl Validator for Required {
    fn name(&self) -> Option<&str> {
        Some("required")
    }

    fn validate(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        NotEmpty
            .validate(value)
            .and_then(|()| NotNull.validate(value))
            .map_err(|e| e.with_code("required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_null() {
        assert!(NotNull.validate(&Value::from("x")).is_ok());
        let err = NotNull.validate(&Value::Null).unwrap_err();
        assert_eq!(err.message.as_deref(), Some("value is null"));
        assert_eq!(err.code, "not_null");
    }

    #[test]
    fn test_is_null() {
        assert!(IsNull.validate(&Value::Null).is_ok());
        assert!(IsNull.validate(&Value::Integer(0)).is_err());
    }

    #[test]
    fn test_not_empty_by_kind() {
        let cases = [
            (Value::from(""), Some("string is empty")),
            (Value::List(Vec::new()), Some("collection is empty")),
            (Value::Map(Vec::new()), Some("map is empty")),
            (Value::Null, None),
            (Value::from("a"), None),
            (Value::Integer(0), None),
        ];

        for (value, expected) in cases {
            let result = NotEmpty.validate(&value);
            assert_eq!(
                result.err().and_then(|e| e.message),
                expected.map(str::to_string),
                "value kind {}",
                value.kind()
            );
        }
    }

    #[test]
    fn test_required_checks_empty_then_null() {
        assert_eq!(
            Required.validate(&Value::from("")).unwrap_err().message.as_deref(),
            Some("string is empty")
        );
        assert_eq!(
            Required.validate(&Value::Null).unwrap_err().message.as_deref(),
            Some("value is null")
        );
        assert!(Required.validate(&Value::List(vec![Value::Null])).is_ok());
    }
}
