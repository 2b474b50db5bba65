//! Numeric bounds: `min`, `max`, `decimalMin` and `decimalMax`.

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::validator::Validator;
use crate::value::Value;

/// Integer lower bound. Fractional values are truncated before comparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Min(pub i64);

impl Validator for Min {
    fn name(&self) -> Option<&str> {
        Some("min")
    }

    fn validate(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        match value.as_i64() {
            Some(n) if n < self.0 => Err(ValidationError::new(format!(
                "value {value} is less than {}",
                self.0
            ))
            .with_code("min")),
            _ => Ok(()),
        }
    }
}

/// Integer upper bound. Fractional values are truncated before comparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Max(pub i64);

impl Validator for Max {
    fn name(&self) -> Option<&str> {
        Some("max")
    }

    fn validate(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        match value.as_i64() {
            Some(n) if n > self.0 => Err(ValidationError::new(format!(
                "value {value} is more than {}",
                self.0
            ))
            .with_code("max")),
            _ => Ok(()),
        }
    }
}

/// Exact lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalMin(pub Decimal);

impl Validator for DecimalMin {
    fn name(&self) -> Option<&str> {
        Some("decimalMin")
    }

    fn validate(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        match value.as_decimal() {
            Some(d) if d < self.0 => Err(ValidationError::new(format!(
                "value {value} is less than {}",
                self.0
            ))
            .with_code("decimal_min")),
            _ => Ok(()),
        }
    }
}

/// Exact upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalMax(pub Decimal);

impl Validator for DecimalMax {
    fn name(&self) -> Option<&str> {
        Some("decimalMax")
    }

    fn validate(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        match value.as_decimal() {
            Some(d) if d > self.0 => Err(ValidationError::new(format!(
                "value {value} is more than {}",
                self.0
            ))
            .with_code("decimal_max")),
            _ => Ok(()),
        }
    }
}
