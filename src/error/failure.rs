//! Construction-time and per-field failure kinds.
//!
//! [`ConfigurationError`] is fatal and surfaces from the builder. The other
//! kinds are recoverable: the engine wraps them as the cause of a
//! [`ValidationError`](crate::ValidationError) and keeps walking.

/// Errors raised while registering validators or building an engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    /// None of the discovered types carries a single bound field.
    #[error(
        "no validatable metadata found among {0} discovered type(s); \
         register at least one type with a bound field"
    )]
    NoValidatableMetadata(usize),

    /// A validator or factory was registered without a name.
    #[error("validator name must not be empty")]
    MissingValidatorName,

    /// A field constraint names a factory that was never registered.
    #[error("no validator factory named '{0}' is registered")]
    UnknownFactory(String),

    /// A factory declares more than one multi-parameter constructor.
    #[error("validator '{0}' declares more than one constructor taking more than one parameter")]
    AmbiguousConstructor(String),

    /// A factory declares a constructor parameter with an empty name.
    #[error("validator '{validator}' declares a constructor parameter without a name")]
    UnnamedParameter {
        /// Factory name.
        validator: String,
    },

    /// A constructor parameter has no value in the constraint and no default.
    #[error("validator '{validator}' requires parameter '{parameter}' which field '{field}' does not supply")]
    MissingParameter {
        /// Factory name.
        validator: String,
        /// Declared parameter name.
        parameter: String,
        /// Field carrying the constraint.
        field: String,
    },

    /// A constructor parameter was supplied but could not be used.
    #[error("validator '{validator}' rejected parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Factory name.
        validator: String,
        /// Declared parameter name.
        parameter: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// A field value could not be read off a live object.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldAccessError {
    /// The object does not expose a field the schema expects.
    #[error("type '{type_name}' has no readable field '{field}'")]
    NoSuchField {
        /// Runtime type of the object.
        type_name: String,
        /// Requested field.
        field: String,
    },

    /// The field exists but reading it failed.
    #[error("field '{field}' could not be read: {reason}")]
    Unreadable {
        /// Requested field.
        field: String,
        /// Reason reported by the object.
        reason: String,
    },
}

/// A validator misbehaved instead of returning a verdict.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidatorExecutionError {
    /// The validator panicked; the payload message is preserved.
    #[error("validator '{validator}' panicked: {message}")]
    Panicked {
        /// Registry name of the validator.
        validator: String,
        /// Panic payload, if it was a string.
        message: String,
    },

    /// The validator was handed a value of a kind it cannot check.
    #[error("validator '{validator}' expected {expected}, got {got}")]
    TypeMismatch {
        /// Registry name of the validator.
        validator: String,
        /// Kind the validator accepts.
        expected: &'static str,
        /// Kind it received.
        got: &'static str,
    },
}

/// The walk over live data stopped early.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TraversalError {
    /// Object nesting went past the configured maximum.
    #[error("maximum object depth {max_depth} exceeded")]
    DepthExceeded {
        /// Configured maximum.
        max_depth: usize,
    },
}
