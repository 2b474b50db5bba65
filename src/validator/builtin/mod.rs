//! Built-in validators, registered as factories by default.
//!
//! | Name | Parameters | Passes when |
//! |------|------------|-------------|
//! | `notNull` | | value is present |
//! | `null` | | value is absent |
//! | `notEmpty` | | text, collection or map is non-empty |
//! | `required` | | `notEmpty` and `notNull` |
//! | `size` | `min = -1`, `max = -1` | length lies within the bounds (`-1` is open) |
//! | `min` / `max` | `min` / `max` | integer value respects the bound |
//! | `decimalMin` / `decimalMax` | `min` / `max` | exact decimal value respects the bound |
//! | `bool` | `value = true` | boolean equals the literal |
//! | `regex` | `regex`, `flags = 0` | text matches the whole pattern |
//! | `before` / `after` | `format`, `dateTime` | date-time is strictly before/after |
//! | `past` / `future` | | date-time is before/after now |

mod numeric;
mod pattern;
mod presence;
mod size;
mod temporal;

pub use numeric::{DecimalMax, DecimalMin, Max, Min};
pub use pattern::{BoolEquals, RegexMatch, CASE_INSENSITIVE, COMMENTS, DOTALL, MULTILINE};
pub use presence::{IsNull, NotEmpty, NotNull, Required};
pub use size::{Size, UNBOUNDED};
pub use temporal::{parse_bound, After, Before, Future, Past, DEFAULT_FORMAT};

use crate::error::ConfigurationError;

use super::resolver::{Arguments, ParamSpec, ValidatorFactory};
use super::ValidatorHandle;

/// Factories for every built-in validator.
pub fn builtin_factories() -> Vec<ValidatorFactory> {
    vec![
        ValidatorFactory::new("notNull", |_| Ok(ValidatorHandle::value_only(NotNull))),
        ValidatorFactory::new("null", |_| Ok(ValidatorHandle::value_only(IsNull))),
        ValidatorFactory::new("notEmpty", |_| Ok(ValidatorHandle::value_only(NotEmpty))),
        ValidatorFactory::new("required", |_| Ok(ValidatorHandle::value_only(Required))),
        ValidatorFactory::new("past", |_| Ok(ValidatorHandle::value_only(Past))),
        ValidatorFactory::new("future", |_| Ok(ValidatorHandle::value_only(Future))),
        ValidatorFactory::new("size", |args| {
            Ok(ValidatorHandle::value_only(Size::new(
                args.i64("min")?,
                args.i64("max")?,
            )))
        })
        .shape([
            ParamSpec::optional("min", UNBOUNDED),
            ParamSpec::optional("max", UNBOUNDED),
        ]),
        ValidatorFactory::new("min", |args| {
            Ok(ValidatorHandle::value_only(Min(args.i64("min")?)))
        })
        .shape([ParamSpec::required("min")]),
        ValidatorFactory::new("max", |args| {
            Ok(ValidatorHandle::value_only(Max(args.i64("max")?)))
        })
        .shape([ParamSpec::required("max")]),
        ValidatorFactory::new("decimalMin", |args| {
            Ok(ValidatorHandle::value_only(DecimalMin(args.decimal("min")?)))
        })
        .shape([ParamSpec::required("min")]),
        ValidatorFactory::new("decimalMax", |args| {
            Ok(ValidatorHandle::value_only(DecimalMax(args.decimal("max")?)))
        })
        .shape([ParamSpec::required("max")]),
        ValidatorFactory::new("bool", |args| {
            Ok(ValidatorHandle::value_only(BoolEquals(args.bool("value")?)))
        })
        .shape([ParamSpec::optional("value", true)]),
        ValidatorFactory::new("regex", |args| {
            let pattern = args.text("regex")?;
            let flags = args.i64("flags")?;
            RegexMatch::new(&pattern, flags)
                .map(ValidatorHandle::value_only)
                .map_err(|e| invalid("regex", "regex", e.to_string()))
        })
        .shape([ParamSpec::required("regex"), ParamSpec::optional("flags", 0)]),
        ValidatorFactory::new("before", |args| {
            Ok(ValidatorHandle::value_only(Before(date_bound("before", args)?)))
        })
        .shape(temporal_params()),
        ValidatorFactory::new("after", |args| {
            Ok(ValidatorHandle::value_only(After(date_bound("after", args)?)))
        })
        .shape(temporal_params()),
    ]
}

fn temporal_params() -> [ParamSpec; 2] {
    [
        ParamSpec::optional("format", DEFAULT_FORMAT),
        ParamSpec::required("dateTime"),
    ]
}

fn date_bound(
    validator: &str,
    args: &Arguments<'_>,
) -> Result<chrono::DateTime<chrono::Utc>, ConfigurationError> {
    let format = args.text("format")?;
    let input = args.text("dateTime")?;
    parse_bound(&input, &format)
        .map_err(|e| invalid(validator, "dateTime", format!("'{input}' does not match '{format}': {e}")))
}

fn invalid(validator: &str, parameter: &str, reason: String) -> ConfigurationError {
    ConfigurationError::InvalidParameter {
        validator: validator.to_string(),
        parameter: parameter.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_has_a_unique_name() {
        let factories = builtin_factories();
        let mut names: Vec<_> = factories.iter().map(|f| f.name().to_string()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), factories.len());
        assert_eq!(factories.len(), 15);
    }

    #[test]
    fn test_every_builtin_constructor_is_unambiguous() {
        for factory in builtin_factories() {
            assert!(factory.constructor().is_ok(), "{}", factory.name());
        }
    }
}
