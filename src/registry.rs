//! Validator registry for named validator storage and lookup.
//!
//! This module provides the [`ValidatorRegistry`] type that maps validator
//! names (and canonical identities of parameterized validators) to the
//! validators the traversal engine dispatches to.

use indexmap::IndexMap;

use crate::error::ConfigurationError;
use crate::validator::ValidatorHandle;

/// A name-to-validator map.
///
/// The registry is filled while an [`EngineBuilder`](crate::EngineBuilder)
/// is configured and then owned immutably by the built engine, so lookups
/// during validation need no locking.
///
/// # Example
///
/// ```rust
/// use validgraph::{ValidatorHandle, ValidatorRegistry};
/// use validgraph::validator::builtin::NotNull;
///
/// let mut registry = ValidatorRegistry::new();
/// registry.register("notNull", ValidatorHandle::value_only(NotNull)).unwrap();
///
/// assert!(registry.lookup("notNull").is_some());
/// assert!(registry.lookup("unknown").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidatorRegistry {
    validators: IndexMap<String, ValidatorHandle>,
}

impl ValidatorRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a validator under the given name.
    ///
    /// Registering under a name that is already taken replaces the previous
    /// validator.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::MissingValidatorName` if the name is
    /// empty.
    ///
    /// # Example
    ///
    /// ```rust
    /// use validgraph::{ConfigurationError, ValidatorHandle, ValidatorRegistry};
    /// use validgraph::validator::builtin::NotNull;
    ///
    /// let mut registry = ValidatorRegistry::new();
    ///
    /// assert_eq!(
    ///     registry.register("", ValidatorHandle::value_only(NotNull)),
    ///     Err(ConfigurationError::MissingValidatorName)
    /// );
    /// ```
    pub fn register(
        &mut self,
        name: impl Into<String>,
        validator: ValidatorHandle,
    ) -> Result<(), ConfigurationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConfigurationError::MissingValidatorName);
        }

        if self.validators.insert(name.clone(), validator).is_some() {
            tracing::info!(validator = %name, "validator replaced");
        } else {
            tracing::info!(validator = %name, "validator registered");
        }
        Ok(())
    }

    /// Retrieves a validator by name.
    pub fn lookup(&self, name: &str) -> Option<&ValidatorHandle> {
        self.validators.get(name)
    }

    /// Returns true if a validator is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Number of registered validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.validators.keys().map(String::as_str)
    }

    /// Returns the names in `wanted` that have no registered validator.
    ///
    /// The result is sorted and free of duplicates.
    ///
    /// # Example
    ///
    /// ```rust
    /// use validgraph::ValidatorRegistry;
    ///
    /// let registry = ValidatorRegistry::new();
    /// let missing = registry.unresolved(["b", "a", "b"]);
    /// assert_eq!(missing, vec!["a", "b"]);
    /// ```
    pub fn unresolved<'a, I>(&self, wanted: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut unresolved: Vec<String> = wanted
            .into_iter()
            .filter(|name| !self.validators.contains_key(*name))
            .map(str::to_owned)
            .collect();

        unresolved.sort();
        unresolved.dedup();
        unresolved
    }
}

// The registry is shared by concurrent `Engine::validate` calls.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidatorRegistry>();
    assert_sync::<ValidatorRegistry>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::validator::builtin::{NotEmpty, NotNull};
    use crate::value::Value;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ValidatorRegistry::new();
        registry
            .register("notNull", ValidatorHandle::value_only(NotNull))
            .unwrap();

        assert!(registry.contains("notNull"));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.lookup("notNull").and_then(|h| h.name()),
            Some("notNull")
        );
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut registry = ValidatorRegistry::new();
        let result = registry.register("", ValidatorHandle::value_only(NotNull));

        assert_eq!(result, Err(ConfigurationError::MissingValidatorName));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reregistering_overwrites() {
        let mut registry = ValidatorRegistry::new();
        registry
            .register("check", ValidatorHandle::value_only(NotNull))
            .unwrap();
        registry
            .register("check", ValidatorHandle::value_only(NotEmpty))
            .unwrap();

        assert_eq!(registry.len(), 1);
        let handle = registry.lookup("check").unwrap();
        assert_eq!(handle.name(), Some("notEmpty"));
    }

    #[test]
    fn test_names_in_registration_order() {
        let mut registry = ValidatorRegistry::new();
        for name in ["b", "a", "c"] {
            registry
                .register(name, ValidatorHandle::from_fn(|_: &Value<'_>| Ok::<(), ValidationError>(())))
                .unwrap();
        }

        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_unresolved_reports_missing_names() {
        let mut registry = ValidatorRegistry::new();
        registry
            .register("notNull", ValidatorHandle::value_only(NotNull))
            .unwrap();

        let unresolved = registry.unresolved(["notNull", "zeta", "alpha", "zeta"]);
        assert_eq!(unresolved, vec!["alpha".to_string(), "zeta".to_string()]);
    }
}
