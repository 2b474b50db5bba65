//! Validation bindings attached to fields.

use indexmap::IndexSet;

use super::descriptor::{Constraint, FieldInfo};

/// What the engine does with one field.
///
/// A field is *bound* when it names at least one validator. The binding also
/// carries the message override, the determined types it applies to, and the
/// alias reported in error paths.
///
/// # Example
///
/// ```rust
/// use validgraph::schema::AttributeBinding;
///
/// let binding = AttributeBinding::new()
///     .validator("notNull")
///     .types(["Car"]);
///
/// assert!(binding.is_bound());
/// assert!(binding.applies_to(Some("Car")));
/// assert!(!binding.applies_to(Some("Truck")));
/// assert!(!binding.applies_to(None));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeBinding {
    /// Validator names, in binding order, without duplicates.
    pub validators: IndexSet<String>,
    /// Message reported instead of the validator's own.
    pub error_message: Option<String>,
    /// Determined types the binding applies to; empty means always.
    pub types: IndexSet<String>,
    /// Path segment reported instead of the field name.
    pub alias: Option<String>,
}

impl AttributeBinding {
    /// Creates an empty, unbound binding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binding carrying the plain (unparameterized) metadata of a field.
    pub fn from_field(field: &FieldInfo) -> Self {
        let mut binding = Self::new()
            .validators(field.validators.iter().cloned())
            .types(field.types.iter().cloned());
        binding.error_message = non_empty(field.error_message.as_deref());
        binding.alias = non_empty(field.alias.as_deref());
        binding
    }

    /// Adds a validator name.
    pub fn validator(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.validators.insert(name);
        }
        self
    }

    /// Adds several validator names.
    pub fn validators<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().fold(self, |b, name| b.validator(name))
    }

    /// Adds determined types; empty names are ignored.
    pub fn types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types.extend(
            types
                .into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.is_empty()),
        );
        self
    }

    /// Sets the message override.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Sets the path alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Merges a resolved constraint under its canonical identity.
    ///
    /// A non-empty constraint message replaces the current one.
    pub fn merge_constraint(&mut self, identity: String, constraint: &Constraint) {
        if !identity.is_empty() {
            self.validators.insert(identity);
        }
        if let Some(message) = non_empty(constraint.error_message.as_deref()) {
            self.error_message = Some(message);
        }
        self.types.extend(
            constraint
                .types
                .iter()
                .filter(|t| !t.is_empty())
                .cloned(),
        );
    }

    /// Returns true if the field names at least one validator.
    pub fn is_bound(&self) -> bool {
        !self.validators.is_empty()
    }

    /// Returns true if the binding applies under the determined type.
    ///
    /// An unconditional binding always applies. A conditional one applies
    /// only when a determined type exists and is listed.
    ///
    /// A root with no determined type (no determiner registered, or one that
    /// returns `None`) skips every conditional binding. Conditional fields are
    /// never validated for a root whose type is unknown, rather than validated
    /// as if every type matched.
    pub fn applies_to(&self, determined_type: Option<&str>) -> bool {
        if self.types.is_empty() {
            return true;
        }
        determined_type.is_some_and(|ty| self.types.contains(ty))
    }

    /// Segment to push on the path for a field called `name`.
    pub fn path_segment<'a>(&'a self, name: &'a str) -> &'a str {
        self.alias.as_deref().unwrap_or(name)
    }
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.filter(|s| !s.is_empty()).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbound_without_validators() {
        let binding = AttributeBinding::new().message("ignored").alias("x");
        assert!(!binding.is_bound());
    }

    #[test]
    fn test_from_field_copies_plain_metadata() {
        let field = FieldInfo::leaf("f1")
            .validators(["notNull", "notNull", "required"])
            .types(["Car", ""])
            .alias("first")
            .message("");

        let binding = AttributeBinding::from_field(&field);

        assert_eq!(binding.validators.len(), 2);
        assert_eq!(binding.types.len(), 1);
        assert_eq!(binding.alias.as_deref(), Some("first"));
        assert!(binding.error_message.is_none());
        assert_eq!(binding.path_segment("f1"), "first");
    }

    #[test]
    fn test_merge_constraint_unions_and_overrides_message() {
        let mut binding = AttributeBinding::new()
            .validator("notNull")
            .message("field level")
            .types(["Car"]);

        let constraint = Constraint::new("size")
            .param("min", 1)
            .message("size level")
            .types(["Truck", "Car"]);
        binding.merge_constraint("size_min_1".to_string(), &constraint);

        let validators: Vec<_> = binding.validators.iter().map(String::as_str).collect();
        assert_eq!(validators, vec!["notNull", "size_min_1"]);
        assert_eq!(binding.error_message.as_deref(), Some("size level"));
        assert_eq!(binding.types.len(), 2);
    }

    #[test]
    fn test_merge_keeps_message_when_constraint_has_none() {
        let mut binding = AttributeBinding::new().message("kept");
        binding.merge_constraint("past".to_string(), &Constraint::new("past"));
        assert_eq!(binding.error_message.as_deref(), Some("kept"));
        assert!(binding.is_bound());
    }

    #[test]
    fn test_unconditional_binding_always_applies() {
        let binding = AttributeBinding::new().validator("notNull");
        assert!(binding.applies_to(None));
        assert!(binding.applies_to(Some("anything")));
    }

    #[test]
    fn test_conditional_binding_skipped_without_determined_type() {
        let binding = AttributeBinding::new().validator("notNull").types(["Car", "Van"]);
        assert!(!binding.applies_to(None));
        assert!(binding.applies_to(Some("Van")));
    }
}
