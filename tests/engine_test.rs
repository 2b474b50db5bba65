//! End-to-end tests for building an engine and validating root objects.

mod common;

use common::{AliasedHolder, Holder, Leaf, Plain, Unregistered};
use serde_json::json;
use validgraph::schema::{Describe, FieldInfo, Introspect, TypeCatalog, TypeDescriptor, TypeInfo};
use validgraph::{ConfigurationError, Engine, ValidationErrors};

#[test]
fn test_not_null_end_to_end() {
    let engine = Engine::builder().root::<Leaf>().build().unwrap();

    let response = engine.validate(&Leaf::empty());

    assert!(!response.is_valid());
    assert_eq!(response.len(), 1);
    let error = &response.errors()[0];
    assert_eq!(error.field, "f1");
    assert_eq!(error.message.as_deref(), Some("value is null"));
    assert_eq!(error.code, "not_null");
    assert_eq!(error.value, json!(null));
}

#[test]
fn test_all_validators_pass() {
    let engine = Engine::builder().root::<Leaf>().build().unwrap();

    let response = engine.validate(&Leaf::filled("x"));

    assert!(response.is_valid());
    assert!(response.errors().is_empty());
}

#[test]
fn test_nested_field_path() {
    let engine = Engine::builder().root::<Holder>().build().unwrap();

    let response = engine.validate(&Holder {
        a: Some(Leaf::empty()),
        note: None,
    });

    assert_eq!(response.len(), 1);
    assert_eq!(response.errors_for_field("a.f1").len(), 1);
}

#[test]
fn test_null_nested_object_is_not_walked() {
    let engine = Engine::builder().root::<Holder>().build().unwrap();

    let response = engine.validate(&Holder { a: None, note: None });

    assert!(response.is_valid());
}

#[test]
fn test_alias_replaces_segment() {
    let engine = Engine::builder().root::<AliasedHolder>().build().unwrap();

    let response = engine.validate(&AliasedHolder {
        a: Some(Leaf::empty()),
    });

    assert_eq!(response.errors_for_field("X.f1").len(), 1);
    assert!(response.errors_for_field("a.f1").is_empty());
}

#[test]
fn test_unbound_leaf_is_not_in_closure() {
    let engine = Engine::builder().root::<Holder>().build().unwrap();

    let fields: Vec<_> = engine
        .schema()
        .fields(&TypeDescriptor::of::<Holder>())
        .iter()
        .map(|plan| plan.name().to_string())
        .collect();

    assert_eq!(fields, vec!["a".to_string()]);
}

#[test]
fn test_unregistered_root_type_yields_empty_response() {
    let engine = Engine::builder().root::<Leaf>().build().unwrap();

    let response = engine.validate(&Unregistered { f1: None });

    assert!(response.is_valid());
}

#[test]
fn test_validation_is_idempotent() {
    let engine = Engine::builder().root::<Holder>().build().unwrap();
    let holder = Holder {
        a: Some(Leaf::empty()),
        note: Some("n".to_string()),
    };

    let first = engine.validate(&holder);
    let second = engine.validate(&holder);

    assert_eq!(first, second);
}

#[test]
fn test_no_validatable_metadata() {
    let err = Engine::builder().root::<Plain>().build().unwrap_err();

    assert_eq!(err, ConfigurationError::NoValidatableMetadata(1));
    assert!(err.to_string().contains("no validatable metadata"));
}

#[test]
fn test_catalog_registers_every_type_as_root() {
    let mut catalog = TypeCatalog::new();
    catalog.register::<Holder>();

    let engine = Engine::builder().catalog(catalog).build().unwrap();

    assert!(engine.schema().is_validatable(&TypeDescriptor::of::<Holder>()));
    assert!(engine.schema().is_validatable(&TypeDescriptor::of::<Leaf>()));
    assert_eq!(engine.validate(&Leaf::empty()).len(), 1);
}

struct Names;

impl Introspect for Names {
    fn describe(&self, ty: &TypeDescriptor) -> Option<TypeInfo> {
        (ty == &TypeDescriptor::of::<Unregistered>()).then(|| {
            TypeInfo::of::<Unregistered>().field(FieldInfo::leaf("f1").validator("notNull"))
        })
    }
}

#[test]
fn test_custom_introspector() {
    let engine = Engine::builder()
        .roots([TypeDescriptor::of::<Unregistered>()])
        .introspector(Names)
        .build()
        .unwrap();

    let response = engine.validate(&Unregistered { f1: None });

    assert_eq!(response.errors_for_field("f1").len(), 1);
}

#[test]
fn test_message_override() {
    struct Titled {
        title: Option<String>,
    }

    validgraph::reflect!(Titled { title });

    impl Describe for Titled {
        fn describe() -> TypeInfo {
            TypeInfo::of::<Titled>().field(
                FieldInfo::leaf("title")
                    .validator("notNull")
                    .message("a title is mandatory"),
            )
        }
    }

    let engine = Engine::builder().root::<Titled>().build().unwrap();

    let response = engine.validate(&Titled { title: None });

    assert_eq!(
        response.errors()[0].message.as_deref(),
        Some("a title is mandatory")
    );
    assert_eq!(response.errors()[0].code, "not_null");
}

#[test]
fn test_into_result_accumulates() {
    let engine = Engine::builder().root::<common::Bag>().build().unwrap();
    let bag = common::Bag {
        items: vec![Leaf::empty(), Leaf::filled("ok"), Leaf::empty()],
    };

    let result = engine.validate(&bag).into_result();

    assert!(result.is_failure());
    let errors: ValidationErrors = result.into_result().unwrap_err();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.at_field("items.f1").len(), 2);
}

#[test]
fn test_validate_all_keeps_input_order() {
    let engine = Engine::builder().root::<Leaf>().build().unwrap();
    let leaves = vec![Leaf::filled("a"), Leaf::empty(), Leaf::filled("b"), Leaf::empty()];

    let responses = engine.validate_all(&leaves);

    let valid: Vec<_> = responses.iter().map(|r| r.is_valid()).collect();
    assert_eq!(valid, vec![true, false, true, false]);
}
