//! Resolution of parameterized constraints into registered validators.
//!
//! A [`ValidatorFactory`] plays the part of a validator *type*: a declared
//! name, the constructor shapes it accepts, and a build function. The
//! [`BindingResolver`] binds a field's [`Constraint`] to one of those shapes,
//! derives the canonical identity of that parameterization, and registers
//! exactly one validator per distinct identity.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

use crate::error::ConfigurationError;
use crate::registry::ValidatorRegistry;
use crate::schema::{Constraint, FieldDescriptor};

use super::ValidatorHandle;

/// Name of the slot used when a single-parameter constructor's own
/// parameter is not supplied.
const VALUE_SLOT: &str = "value";

/// One declared constructor parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    /// Parameter name, matched against constraint parameter names.
    pub name: String,
    /// Value used when the constraint does not supply one.
    pub default: Option<JsonValue>,
}

impl ParamSpec {
    /// A parameter the constraint must supply.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    /// A parameter with a fallback value.
    pub fn optional(name: impl Into<String>, default: impl Into<JsonValue>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
        }
    }
}

/// Bound constructor arguments, in declared order.
#[derive(Debug, Clone)]
pub struct Arguments<'a> {
    validator: &'a str,
    values: IndexMap<String, JsonValue>,
}

impl<'a> Arguments<'a> {
    fn new(validator: &'a str) -> Self {
        Self {
            validator,
            values: IndexMap::new(),
        }
    }

    /// Raw value of a parameter.
    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.values.get(name)
    }

    /// Number of bound arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn require(&self, name: &str) -> Result<&JsonValue, ConfigurationError> {
        self.values
            .get(name)
            .ok_or_else(|| self.invalid(name, "parameter is not bound"))
    }

    fn invalid(&self, name: &str, reason: impl Into<String>) -> ConfigurationError {
        ConfigurationError::InvalidParameter {
            validator: self.validator.to_string(),
            parameter: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Parameter as an integer; numeric strings are accepted.
    pub fn i64(&self, name: &str) -> Result<i64, ConfigurationError> {
        match self.require(name)? {
            JsonValue::Number(n) => n
                .as_i64()
                .ok_or_else(|| self.invalid(name, format!("{n} is not an integer"))),
            JsonValue::String(s) => s
                .trim()
                .parse()
                .map_err(|_| self.invalid(name, format!("'{s}' is not an integer"))),
            other => Err(self.invalid(name, format!("expected an integer, got {other}"))),
        }
    }

    /// Parameter as a boolean; `"true"`/`"false"` strings are accepted.
    pub fn bool(&self, name: &str) -> Result<bool, ConfigurationError> {
        match self.require(name)? {
            JsonValue::Bool(b) => Ok(*b),
            JsonValue::String(s) => s
                .trim()
                .parse()
                .map_err(|_| self.invalid(name, format!("'{s}' is not a boolean"))),
            other => Err(self.invalid(name, format!("expected a boolean, got {other}"))),
        }
    }

    /// Parameter as text; numbers and booleans render as their JSON text.
    pub fn text(&self, name: &str) -> Result<String, ConfigurationError> {
        match self.require(name)? {
            JsonValue::String(s) => Ok(s.clone()),
            JsonValue::Number(n) => Ok(n.to_string()),
            JsonValue::Bool(b) => Ok(b.to_string()),
            other => Err(self.invalid(name, format!("expected text, got {other}"))),
        }
    }

    /// Parameter as an exact decimal, parsed from its text.
    pub fn decimal(&self, name: &str) -> Result<Decimal, ConfigurationError> {
        let text = self.text(name)?;
        let trimmed = text.trim();
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|e| self.invalid(name, format!("'{text}' is not a decimal: {e}")))
    }
}

type BuildFn =
    dyn Fn(&Arguments<'_>) -> Result<ValidatorHandle, ConfigurationError> + Send + Sync;

/// Constructor of a family of parameterized validators.
///
/// A factory with no parameterized shape always yields the same identity,
/// its name. Otherwise each distinct set of argument values yields its own
/// identity, e.g. `size_min_1max_10`.
///
/// # Example
///
/// ```rust
/// use validgraph::validator::{ParamSpec, ValidatorFactory};
/// use validgraph::{ValidationError, ValidatorHandle};
///
/// let factory = ValidatorFactory::new("multipleOf", |args| {
///     let divisor = args.i64("divisor")?;
///     Ok(ValidatorHandle::from_fn(move |value| match value.as_i64() {
///         Some(n) if divisor != 0 && n % divisor != 0 => {
///             Err(ValidationError::new(format!("{n} is not a multiple of {divisor}")))
///         }
///         _ => Ok(()),
///     }))
/// })
/// .shape([ParamSpec::required("divisor")]);
///
/// assert_eq!(factory.name(), "multipleOf");
/// ```
#[derive(Clone)]
pub struct ValidatorFactory {
    name: String,
    shapes: Vec<Vec<ParamSpec>>,
    build: Arc<BuildFn>,
}

impl ValidatorFactory {
    /// Creates a factory whose only constructor takes no parameters.
    pub fn new<F>(name: impl Into<String>, build: F) -> Self
    where
        F: Fn(&Arguments<'_>) -> Result<ValidatorHandle, ConfigurationError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            shapes: Vec::new(),
            build: Arc::new(build),
        }
    }

    /// Adds a constructor shape.
    pub fn shape(mut self, params: impl IntoIterator<Item = ParamSpec>) -> Self {
        self.shapes.push(params.into_iter().collect());
        self
    }

    /// Declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared constructor shapes.
    pub fn shapes(&self) -> &[Vec<ParamSpec>] {
        &self.shapes
    }

    /// Picks the constructor the resolver binds against.
    ///
    /// A shape with more than one parameter wins; otherwise the first
    /// single-parameter shape. No parameterized shape yields an empty list.
    pub fn constructor(&self) -> Result<&[ParamSpec], ConfigurationError> {
        let mut multi = self.shapes.iter().filter(|s| s.len() > 1);
        let chosen = match (multi.next(), multi.next()) {
            (Some(_), Some(_)) => {
                return Err(ConfigurationError::AmbiguousConstructor(self.name.clone()))
            }
            (Some(shape), None) => shape.as_slice(),
            (None, _) => self
                .shapes
                .iter()
                .find(|s| !s.is_empty())
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        };

        if chosen.iter().any(|p| p.name.is_empty()) {
            return Err(ConfigurationError::UnnamedParameter {
                validator: self.name.clone(),
            });
        }
        Ok(chosen)
    }

    fn build(&self, args: &Arguments<'_>) -> Result<ValidatorHandle, ConfigurationError> {
        (self.build)(args)
    }
}

impl fmt::Debug for ValidatorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorFactory")
            .field("name", &self.name)
            .field("shapes", &self.shapes)
            .finish_non_exhaustive()
    }
}

/// Turns field constraints into registered validator identities.
#[derive(Debug, Clone, Default)]
pub struct BindingResolver {
    factories: IndexMap<String, ValidatorFactory>,
}

impl BindingResolver {
    /// Creates a resolver with no factories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver preloaded with the built-in factories.
    pub fn with_builtins() -> Self {
        let mut resolver = Self::new();
        for factory in super::builtin::builtin_factories() {
            resolver.factories.insert(factory.name.clone(), factory);
        }
        resolver
    }

    /// Adds a factory, replacing any factory of the same name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::MissingValidatorName` for an empty name.
    pub fn add_factory(&mut self, factory: ValidatorFactory) -> Result<(), ConfigurationError> {
        if factory.name.is_empty() {
            return Err(ConfigurationError::MissingValidatorName);
        }
        tracing::debug!(factory = %factory.name, "validator factory added");
        self.factories.insert(factory.name.clone(), factory);
        Ok(())
    }

    /// Returns the factory registered under `name`.
    pub fn factory(&self, name: &str) -> Option<&ValidatorFactory> {
        self.factories.get(name)
    }

    /// Resolves a constraint on `field` to a registered identity.
    ///
    /// The first resolution of an identity builds and registers the
    /// validator. Later resolutions, including ones for identities the
    /// caller registered up front, are plain lookups.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when the factory is unknown, its
    /// constructors are ambiguous or unnamed, a parameter cannot be bound, or
    /// the build function rejects the arguments.
    pub fn resolve(
        &self,
        field: &FieldDescriptor,
        constraint: &Constraint,
        registry: &mut ValidatorRegistry,
    ) -> Result<String, ConfigurationError> {
        let factory = self
            .factories
            .get(&constraint.validator)
            .ok_or_else(|| ConfigurationError::UnknownFactory(constraint.validator.clone()))?;
        let params = factory.constructor()?;
        let args = bind_arguments(factory, params, field, constraint)?;
        let identity = identity(&factory.name, &args);

        if registry.contains(&identity) {
            tracing::debug!(%identity, field = %field, "validator already registered");
            return Ok(identity);
        }

        let handle = factory.build(&args)?;
        registry.register(identity.clone(), handle)?;
        tracing::debug!(%identity, field = %field, "validator resolved");
        Ok(identity)
    }
}

fn bind_arguments<'f>(
    factory: &'f ValidatorFactory,
    params: &[ParamSpec],
    field: &FieldDescriptor,
    constraint: &Constraint,
) -> Result<Arguments<'f>, ConfigurationError> {
    let mut args = Arguments::new(&factory.name);
    let single = params.len() == 1;

    for param in params {
        let value = constraint
            .params
            .get(&param.name)
            .or_else(|| {
                if single {
                    constraint.params.get(VALUE_SLOT)
                } else {
                    None
                }
            })
            .or(param.default.as_ref())
            .cloned()
            .ok_or_else(|| ConfigurationError::MissingParameter {
                validator: factory.name.clone(),
                parameter: param.name.clone(),
                field: field.to_string(),
            })?;
        args.values.insert(param.name.clone(), value);
    }

    Ok(args)
}

/// Canonical identity: `name` alone, or `name_` followed by `param_value`
/// for each argument in declared order.
fn identity(name: &str, args: &Arguments<'_>) -> String {
    if args.is_empty() {
        return name.to_string();
    }
    let mut identity = format!("{name}_");
    for (param, value) in &args.values {
        identity.push_str(param);
        identity.push('_');
        match value {
            JsonValue::String(s) => identity.push_str(s),
            other => identity.push_str(&other.to_string()),
        }
    }
    identity
}
