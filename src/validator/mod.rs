//! Validator capabilities and the binding resolver.
//!
//! A validator is a leaf predicate over one field value. It comes in two
//! flavours, selected by the trait it implements rather than by a runtime
//! type test:
//!
//! - [`Validator`] sees only the value.
//! - [`RootAwareValidator`] also sees the root object the walk started from,
//!   for cross-field rules.
//!
//! Both are stored behind a [`ValidatorHandle`].

pub mod builtin;
mod resolver;

use std::fmt;
use std::sync::Arc;

use crate::error::ValidationError;
use crate::reflect::Reflect;
use crate::value::Value;

pub use resolver::{Arguments, BindingResolver, ParamSpec, ValidatorFactory};

/// A predicate over a single field value.
///
/// Return `Ok(())` when the value is acceptable. The engine fills in the
/// field path and the value snapshot of a returned error.
///
/// # Example
///
/// ```rust
/// use validgraph::{ValidationError, Validator, Value};
///
/// struct Uppercase;
///
/// impl Validator for Uppercase {
///     fn name(&self) -> Option<&str> {
///         Some("uppercase")
///     }
///
///     fn validate(&self, value: &Value<'_>) -> Result<(), ValidationError> {
///         match value.as_str() {
///             Some(s) if s.chars().any(char::is_lowercase) => {
///                 Err(ValidationError::new(format!("{s} is not uppercase")))
///             }
///             _ => Ok(()),
///         }
///     }
/// }
///
/// assert!(Uppercase.validate(&Value::from("ABC")).is_ok());
/// assert!(Uppercase.validate(&Value::from("abc")).is_err());
/// ```
pub trait Validator: Send + Sync {
    /// Name the validator registers itself under, if it has one.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Checks one value.
    fn validate(&self, value: &Value<'_>) -> Result<(), ValidationError>;
}

/// A predicate that also consults the root object of the walk.
pub trait RootAwareValidator: Send + Sync {
    /// Name the validator registers itself under, if it has one.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Checks one value; `root` is the object passed to
    /// [`Engine::validate`](crate::Engine::validate).
    fn validate(&self, value: &Value<'_>, root: &dyn Reflect) -> Result<(), ValidationError>;
}

/// Registered validator of either flavour.
#[derive(Clone)]
pub enum ValidatorHandle {
    /// Sees only the field value.
    ValueOnly(Arc<dyn Validator>),
    /// Sees the field value and the root object.
    WithRoot(Arc<dyn RootAwareValidator>),
}

impl ValidatorHandle {
    /// Wraps a value-only validator.
    pub fn value_only(validator: impl Validator + 'static) -> Self {
        ValidatorHandle::ValueOnly(Arc::new(validator))
    }

    /// Wraps a root-aware validator.
    pub fn with_root(validator: impl RootAwareValidator + 'static) -> Self {
        ValidatorHandle::WithRoot(Arc::new(validator))
    }

    /// Wraps a closure as a value-only validator.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Value<'_>) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        Self::value_only(FnValidator(f))
    }

    /// Wraps a closure as a root-aware validator.
    pub fn from_fn_with_root<F>(f: F) -> Self
    where
        F: Fn(&Value<'_>, &dyn Reflect) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        Self::with_root(FnRootValidator(f))
    }

    /// Self-reported name of the wrapped validator.
    pub fn name(&self) -> Option<&str> {
        match self {
            ValidatorHandle::ValueOnly(v) => v.name(),
            ValidatorHandle::WithRoot(v) => v.name(),
        }
    }

    /// Returns true for root-aware validators.
    pub fn needs_root(&self) -> bool {
        matches!(self, ValidatorHandle::WithRoot(_))
    }

    /// Runs the validator.
    pub fn invoke(&self, value: &Value<'_>, root: &dyn Reflect) -> Result<(), ValidationError> {
        match self {
            ValidatorHandle::ValueOnly(v) => v.validate(value),
            ValidatorHandle::WithRoot(v) => v.validate(value, root),
        }
    }
}

impl fmt::Debug for ValidatorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ValidatorHandle::ValueOnly(_) => "ValueOnly",
            ValidatorHandle::WithRoot(_) => "WithRoot",
        };
        f.debug_tuple(kind)
            .field(&self.name().unwrap_or("<unnamed>"))
            .finish()
    }
}

impl<V: Validator + 'static> From<Arc<V>> for ValidatorHandle {
    fn from(validator: Arc<V>) -> Self {
        ValidatorHandle::ValueOnly(validator)
    }
}

struct FnValidator<F>(F);

impl<F> Validator for FnValidator<F>
where
    F: Fn(&Value<'_>) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        (self.0)(value)
    }
}

struct FnRootValidator<F>(F);

impl<F> RootAwareValidator for FnRootValidator<F>
where
    F: Fn(&Value<'_>, &dyn Reflect) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, value: &Value<'_>, root: &dyn Reflect) -> Result<(), ValidationError> {
        (self.0)(value, root)
    }
}
