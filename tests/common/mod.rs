//! Fixture types shared by the integration tests.

#![allow(dead_code)]

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use validgraph::error::FieldAccessError;
use validgraph::schema::{Describe, FieldInfo, TypeDescriptor, TypeInfo, TypeRef};
use validgraph::{reflect, Reflect, ToValue, Value};

/// One bound leaf: `f1` must not be null.
pub struct Leaf {
    pub f1: Option<String>,
}

reflect!(Leaf { f1 });

impl Describe for Leaf {
    fn describe() -> TypeInfo {
        TypeInfo::of::<Leaf>().field(FieldInfo::leaf("f1").validator("notNull"))
    }
}

impl Leaf {
    pub fn empty() -> Self {
        Leaf { f1: None }
    }

    pub fn filled(value: &str) -> Self {
        Leaf {
            f1: Some(value.to_string()),
        }
    }
}

/// Reaches a [`Leaf`] through an unbound field.
pub struct Holder {
    pub a: Option<Leaf>,
    pub note: Option<String>,
}

reflect!(Holder { a, note });

impl Describe for Holder {
    fn describe() -> TypeInfo {
        TypeInfo::of::<Holder>()
            .field(FieldInfo::object::<Leaf>("a"))
            .field(FieldInfo::leaf("note"))
    }
}

/// Same as [`Holder`], with the field reported as `X`.
pub struct AliasedHolder {
    pub a: Option<Leaf>,
}

reflect!(AliasedHolder { a });

impl Describe for AliasedHolder {
    fn describe() -> TypeInfo {
        TypeInfo::of::<AliasedHolder>().field(FieldInfo::object::<Leaf>("a").alias("X"))
    }
}

/// A collection of leaves.
pub struct Bag {
    pub items: Vec<Leaf>,
}

reflect!(Bag { items });

impl Describe for Bag {
    fn describe() -> TypeInfo {
        TypeInfo::of::<Bag>().field(FieldInfo::collection::<Leaf>("items"))
    }
}

/// Map key with its own bound field.
#[derive(PartialEq, Eq, Hash)]
pub struct Key {
    pub code: Option<String>,
}

reflect!(Key { code });

impl Describe for Key {
    fn describe() -> TypeInfo {
        TypeInfo::of::<Key>().field(FieldInfo::leaf("code").validator("notNull"))
    }
}

/// A map whose keys and values are both walked.
pub struct Lookup {
    pub entries: HashMap<Key, Leaf>,
}

reflect!(Lookup { entries });

impl Describe for Lookup {
    fn describe() -> TypeInfo {
        TypeInfo::of::<Lookup>().field(FieldInfo::map(
            "entries",
            TypeRef::of::<Key>(),
            TypeRef::of::<Leaf>(),
        ))
    }
}

/// Self-referential tree.
pub struct Category {
    pub name: Option<String>,
    pub children: Vec<Category>,
}

reflect!(Category { name, children });

impl Describe for Category {
    fn describe() -> TypeInfo {
        TypeInfo::of::<Category>()
            .field(FieldInfo::leaf("name").validator("notNull"))
            .field(FieldInfo::collection::<Category>("children"))
    }
}

impl Category {
    /// A chain of `depth` unnamed categories.
    pub fn chain(depth: usize) -> Self {
        let mut category = Category {
            name: None,
            children: Vec::new(),
        };
        for _ in 1..depth {
            category = Category {
                name: None,
                children: vec![category],
            };
        }
        category
    }
}

/// `First -> Second -> Third -> First`, with the only bound field on `Third`.
pub struct First {
    pub second: Option<Box<Second>>,
}

pub struct Second {
    pub third: Option<Box<Third>>,
}

pub struct Third {
    pub first: Option<Box<First>>,
    pub label: Option<String>,
}

reflect!(First { second });
reflect!(Second { third });
reflect!(Third { first, label });

impl Describe for First {
    fn describe() -> TypeInfo {
        TypeInfo::of::<First>().field(FieldInfo::object::<Second>("second"))
    }
}

impl Describe for Second {
    fn describe() -> TypeInfo {
        TypeInfo::of::<Second>().field(FieldInfo::object::<Third>("third"))
    }
}

impl Describe for Third {
    fn describe() -> TypeInfo {
        TypeInfo::of::<Third>()
            .field(FieldInfo::object::<First>("first"))
            .field(FieldInfo::leaf("label").validator("notNull"))
    }
}

/// Node whose successor can be set after construction, so live data can
/// form a cycle.
pub struct Ring {
    pub name: Option<String>,
    pub next: OnceLock<Arc<Ring>>,
}

impl Ring {
    pub fn new(name: Option<&str>) -> Arc<Self> {
        Arc::new(Ring {
            name: name.map(str::to_string),
            next: OnceLock::new(),
        })
    }

    pub fn link(&self, next: &Arc<Ring>) {
        let _ = self.next.set(Arc::clone(next));
    }
}

impl Reflect for Ring {
    fn type_descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Ring>()
    }

    fn field(&self, name: &str) -> Result<Value<'_>, FieldAccessError> {
        match name {
            "name" => Ok(self.name.to_value()),
            "next" => Ok(self
                .next
                .get()
                .map_or(Value::Null, |next| Value::Object(&**next))),
            _ => Err(FieldAccessError::NoSuchField {
                type_name: "Ring".to_string(),
                field: name.to_string(),
            }),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Describe for Ring {
    fn describe() -> TypeInfo {
        TypeInfo::of::<Ring>()
            .field(FieldInfo::leaf("name").validator("notNull"))
            .field(FieldInfo::object::<Ring>("next"))
    }
}

/// `plate` is only required for cars.
pub struct Vehicle {
    pub kind: String,
    pub plate: Option<String>,
}

reflect!(Vehicle { kind, plate });

impl Describe for Vehicle {
    fn describe() -> TypeInfo {
        TypeInfo::of::<Vehicle>().field(
            FieldInfo::leaf("plate")
                .validator("notNull")
                .types(["Car"]),
        )
    }
}

/// Readable at runtime, but never registered with an engine.
pub struct Unregistered {
    pub f1: Option<String>,
}

reflect!(Unregistered { f1 });

/// Declares a field the runtime view cannot read.
pub struct Broken {
    pub present: Option<String>,
}

reflect!(Broken { present });

impl Describe for Broken {
    fn describe() -> TypeInfo {
        TypeInfo::of::<Broken>()
            .field(FieldInfo::leaf("present").validator("notNull"))
            .field(FieldInfo::leaf("missing").validator("notNull"))
    }
}

/// Only unbound fields.
pub struct Plain {
    pub anything: Option<String>,
}

reflect!(Plain { anything });

impl Describe for Plain {
    fn describe() -> TypeInfo {
        TypeInfo::of::<Plain>().field(FieldInfo::leaf("anything"))
    }
}
