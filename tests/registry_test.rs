//! Integration tests for the validator registry as seen through an engine.

use validgraph::schema::{Describe, FieldInfo, TypeInfo};
use validgraph::validator::builtin::{NotNull, Size};
use validgraph::{reflect, ConfigurationError, Engine, ValidatorHandle, ValidatorRegistry};

struct Account {
    owner: Option<String>,
    handle: String,
}

reflect!(Account { owner, handle });

impl Describe for Account {
    fn describe() -> TypeInfo {
        TypeInfo::of::<Account>()
            .field(FieldInfo::leaf("owner").validator("notNull"))
            .field(FieldInfo::leaf("handle").validator("shortHandle"))
    }
}

#[test]
fn test_registry_basic_operations() {
    let mut registry = ValidatorRegistry::new();
    assert!(registry.is_empty());

    registry
        .register("notNull", ValidatorHandle::value_only(NotNull))
        .unwrap();
    registry
        .register("shortHandle", ValidatorHandle::value_only(Size::new(1, 8)))
        .unwrap();

    assert_eq!(registry.len(), 2);
    assert!(registry.contains("shortHandle"));
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["notNull", "shortHandle"]);
}

#[test]
fn test_registry_rejects_empty_name() {
    let mut registry = ValidatorRegistry::new();

    let result = registry.register("", ValidatorHandle::value_only(NotNull));

    assert_eq!(result, Err(ConfigurationError::MissingValidatorName));
}

#[test]
fn test_named_validators_bind_by_name() {
    let engine = Engine::builder()
        .root::<Account>()
        .add_validators([("shortHandle", ValidatorHandle::value_only(Size::new(1, 8)))])
        .unwrap()
        .build()
        .unwrap();

    let response = engine.validate(&Account {
        owner: Some("ann".into()),
        handle: "much-too-long-handle".into(),
    });

    assert_eq!(response.errors_for_field("handle").len(), 1);
    assert!(engine.unresolved_validators().is_empty());
}

#[test]
fn test_add_validator_uses_reported_name() {
    let engine = Engine::builder()
        .root::<Account>()
        .add_validator(ValidatorHandle::value_only(NotNull))
        .unwrap()
        .build()
        .unwrap();

    assert!(engine.registry().contains("notNull"));
    assert_eq!(engine.unresolved_validators(), vec!["shortHandle".to_string()]);
}

#[test]
fn test_missing_validators_are_skipped() {
    let engine = Engine::builder().root::<Account>().build().unwrap();

    let response = engine.validate(&Account {
        owner: Some("ann".into()),
        handle: String::new(),
    });

    assert!(response.is_valid());
}
