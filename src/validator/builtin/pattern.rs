//! Pattern and literal checks: `regex` and `bool`.

use regex::{Regex, RegexBuilder};

use crate::error::{ValidationError, ValidatorExecutionError};
use crate::validator::Validator;
use crate::value::Value;

/// Case-insensitive matching.
pub const CASE_INSENSITIVE: i64 = 0x02;
/// Whitespace and `#` comments in the pattern are ignored.
pub const COMMENTS: i64 = 0x04;
/// `^` and `$` match at line boundaries.
pub const MULTILINE: i64 = 0x08;
/// `.` matches line terminators.
pub const DOTALL: i64 = 0x20;

/// Requires text to match a pattern in full.
///
/// Absent values pass; values that are not text fail.
#[derive(Debug, Clone)]
pub struct RegexMatch {
    source: String,
    regex: Regex,
}

impl RegexMatch {
    /// Compiles `pattern` with the given flag bits.
    ///
    /// # Errors
    ///
    /// Returns the regex error if the pattern does not compile.
    pub fn new(pattern: &str, flags: i64) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&format!("^(?:{pattern})$"))
            .case_insensitive(flags & CASE_INSENSITIVE != 0)
            .ignore_whitespace(flags & COMMENTS != 0)
            .multi_line(flags & MULTILINE != 0)
            .dot_matches_new_line(flags & DOTALL != 0)
            .build()?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as written.
    pub fn pattern(&self) -> &str {
        &self.source
    }
}

impl Validator for RegexMatch {
    fn name(&self) -> Option<&str> {
        Some("regex")
    }

    fn validate(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        match value {
            Value::Null => Ok(()),
            Value::Text(s) if self.regex.is_match(s) => Ok(()),
            Value::Text(s) => Err(ValidationError::new(format!(
                "string {s} does not match pattern {}",
                self.source
            ))
            .with_code("regex")),
            other => Err(ValidationError::new(format!("value {other} is not a string"))
                .with_code("regex")
                .with_cause(ValidatorExecutionError::TypeMismatch {
                    validator: "regex".to_string(),
                    expected: "text",
                    got: other.kind(),
                })),
        }
    }
}

/// Requires a boolean to equal an expected literal. Other kinds pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoolEquals(pub bool);

impl Validator for BoolEquals {
    fn name(&self) -> Option<&str> {
        Some("bool")
    }

    fn validate(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        match value.as_bool() {
            Some(b) if b != self.0 => Err(ValidationError::new(format!(
                "value {b} doesn't match the boolean {}",
                self.0
            ))
            .with_code("bool")),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_requires_full_match() {
        let digits = RegexMatch::new(r"\d+", 0).unwrap();
        assert!(digits.validate(&Value::from("123")).is_ok());
        assert!(digits.validate(&Value::from("a123")).is_err());
        assert!(digits.validate(&Value::from("123a")).is_err());
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        let re = RegexMatch::new("a|b", 0).unwrap();
        assert!(re.validate(&Value::from("ab")).is_err());
        assert!(re.validate(&Value::from("b")).is_ok());
    }

    #[test]
    fn test_case_insensitive_flag() {
        let re = RegexMatch::new("abc", CASE_INSENSITIVE).unwrap();
        assert!(re.validate(&Value::from("ABC")).is_ok());
        assert!(RegexMatch::new("abc", 0)
            .unwrap()
            .validate(&Value::from("ABC"))
            .is_err());
    }

    #[test]
    fn test_dotall_flag() {
        let re = RegexMatch::new("a.b", DOTALL).unwrap();
        assert!(re.validate(&Value::from("a\nb")).is_ok());
    }

    #[test]
    fn test_null_passes_and_non_text_fails_with_cause() {
        let re = RegexMatch::new(".*", 0).unwrap();
        assert!(re.validate(&Value::Null).is_ok());

        let err = re.validate(&Value::Integer(5)).unwrap_err();
        assert_eq!(err.message.as_deref(), Some("value 5 is not a string"));
        assert!(matches!(
            err.cause_as::<ValidatorExecutionError>(),
            Some(ValidatorExecutionError::TypeMismatch { got: "integer", .. })
        ));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(RegexMatch::new("(", 0).is_err());
    }

    #[test]
    fn test_bool_equals() {
        assert!(BoolEquals(true).validate(&Value::Bool(true)).is_ok());
        assert!(BoolEquals(true).validate(&Value::Bool(false)).is_err());
        assert!(BoolEquals(false).validate(&Value::Null).is_ok());
    }
}
