//! Error types for configuration and validation failures.
//!
//! This module provides [`ValidationError`], the uniform record every
//! recoverable failure ends up as, together with the failure kinds that can
//! appear as its cause and the fatal [`ConfigurationError`].

mod failure;
mod validation_error;

pub use failure::{ConfigurationError, FieldAccessError, TraversalError, ValidatorExecutionError};
pub use validation_error::{Cause, ValidationError, ValidationErrors};
