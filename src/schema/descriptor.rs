//! Static type metadata.
//!
//! This module provides the vocabulary the schema graph is built from:
//! [`TypeDescriptor`] identities, per-field [`FieldInfo`] metadata, the
//! [`Describe`] and [`Introspect`] seams, and [`TypeCatalog`], the default
//! introspection provider.

use std::borrow::Cow;
use std::collections::VecDeque;
use std::fmt::{self, Display};

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

/// Opaque identity of a type.
///
/// Descriptors are cheap to clone, hashable and ordered, so they serve as map
/// keys and graph node keys. [`TypeDescriptor::of`] uses the compiler's type
/// name, which is what [`reflect!`](crate::reflect) reports at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeDescriptor(Cow<'static, str>);

impl TypeDescriptor {
    /// Descriptor for a Rust type.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(Cow::Borrowed(std::any::type_name::<T>()))
    }

    /// Descriptor with an explicit name.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Full name of the type.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Last path segment of the name, without generic arguments.
    pub fn short_name(&self) -> &str {
        let base = self.0.split('<').next().unwrap_or(&self.0);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Static metadata for a type that can take part in validation.
///
/// # Example
///
/// ```rust
/// use validgraph::schema::{Describe, FieldInfo, TypeInfo};
///
/// struct Customer;
///
/// impl Describe for Customer {
///     fn describe() -> TypeInfo {
///         TypeInfo::of::<Customer>()
///             .field(FieldInfo::leaf("email").validators(["notNull"]))
///     }
/// }
///
/// assert_eq!(Customer::describe().fields.len(), 1);
/// ```
pub trait Describe: 'static {
    /// Returns the metadata for this type.
    fn describe() -> TypeInfo;
}

/// Provider of type metadata, consulted while discovering the schema graph.
///
/// Returning `None` marks a type as opaque: it becomes a graph node without
/// fields.
pub trait Introspect {
    /// Returns the metadata for `ty`, if known.
    fn describe(&self, ty: &TypeDescriptor) -> Option<TypeInfo>;
}

/// Reference from a field to the type it holds.
///
/// Carries the descriptor plus, for [`Describe`] types, a function that
/// produces the type's metadata on demand. The indirection lets
/// self-referential types describe themselves without recursing.
#[derive(Debug, Clone)]
pub struct TypeRef {
    descriptor: TypeDescriptor,
    describe: Option<fn() -> TypeInfo>,
}

impl TypeRef {
    /// Reference to a described type.
    pub fn of<T: Describe>() -> Self {
        Self {
            descriptor: TypeDescriptor::of::<T>(),
            describe: Some(<T as Describe>::describe),
        }
    }

    /// Reference to a type with no metadata of its own.
    pub fn opaque<T: ?Sized + 'static>() -> Self {
        Self {
            descriptor: TypeDescriptor::of::<T>(),
            describe: None,
        }
    }

    /// Reference by name, resolved later through an [`Introspect`] provider.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            descriptor: TypeDescriptor::named(name),
            describe: None,
        }
    }

    /// Descriptor of the referenced type.
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Produces the referenced type's metadata, if it carries any.
    pub fn resolve(&self) -> Option<TypeInfo> {
        self.describe.map(|describe| describe())
    }
}

/// How a field holds its value.
#[derive(Debug, Clone)]
pub enum FieldShape {
    /// Scalar value; nothing to walk into.
    Leaf,
    /// A single nested object.
    Object(TypeRef),
    /// A sequence or set of elements.
    Collection(TypeRef),
    /// A map from keys to values.
    Map(TypeRef, TypeRef),
}

impl FieldShape {
    /// Container kind of this shape.
    pub fn container(&self) -> ContainerKind {
        match self {
            FieldShape::Leaf | FieldShape::Object(_) => ContainerKind::Single,
            FieldShape::Collection(_) => ContainerKind::Collection,
            FieldShape::Map(_, _) => ContainerKind::Map,
        }
    }

    /// Element types after unwrapping the container.
    pub fn element_refs(&self) -> Vec<&TypeRef> {
        match self {
            FieldShape::Leaf => Vec::new(),
            FieldShape::Object(ty) | FieldShape::Collection(ty) => vec![ty],
            FieldShape::Map(key, value) => vec![key, value],
        }
    }
}

/// Container kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Single,
    Collection,
    Map,
}

/// Identity of a declared field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    /// Declaring type.
    pub owner: TypeDescriptor,
    /// Declared field name.
    pub name: String,
    /// How the field holds its value.
    pub container: ContainerKind,
    /// Element types after unwrapping the container (key then value for maps).
    pub element_types: Vec<TypeDescriptor>,
}

impl FieldDescriptor {
    /// Builds the descriptor of `field` declared on `owner`.
    pub fn new(owner: &TypeDescriptor, field: &FieldInfo) -> Self {
        Self {
            owner: owner.clone(),
            name: field.name.clone(),
            container: field.shape.container(),
            element_types: field
                .shape
                .element_refs()
                .into_iter()
                .map(|r| r.descriptor().clone())
                .collect(),
        }
    }
}

impl Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner.short_name(), self.name)
    }
}

/// A parameterized validator attached to a field.
///
/// Names a validator factory and supplies its constructor parameters. The
/// binding resolver turns it into a canonical validator identity such as
/// `size_min_1max_10`.
///
/// # Example
///
/// ```rust
/// use validgraph::schema::Constraint;
///
/// let constraint = Constraint::new("size").param("min", 1).param("max", 10);
/// assert_eq!(constraint.params.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Name of the validator factory.
    pub validator: String,
    /// Constructor parameters by name.
    pub params: IndexMap<String, JsonValue>,
    /// Error message override for failures of this field.
    pub error_message: Option<String>,
    /// Determined types this constraint applies to.
    pub types: Vec<String>,
}

impl Constraint {
    /// Creates a constraint naming a validator factory.
    pub fn new(validator: impl Into<String>) -> Self {
        Self {
            validator: validator.into(),
            params: IndexMap::new(),
            error_message: None,
            types: Vec::new(),
        }
    }

    /// Sets a named constructor parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Sets the `value` slot, used by single-parameter constructors.
    pub fn value(self, value: impl Into<JsonValue>) -> Self {
        self.param("value", value)
    }

    /// Sets the error message override.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Restricts the constraint to the given determined types.
    pub fn types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types.extend(types.into_iter().map(Into::into));
        self
    }
}

/// Metadata for one declared field.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    /// Declared name, as passed to [`Reflect::field`](crate::Reflect::field).
    pub name: String,
    /// How the field holds its value.
    pub shape: FieldShape,
    /// Names of registered validators to run.
    pub validators: Vec<String>,
    /// Parameterized validators to resolve at build time.
    pub constraints: Vec<Constraint>,
    /// Error message override.
    pub error_message: Option<String>,
    /// Determined types the bindings apply to; empty means always.
    pub types: Vec<String>,
    /// Path segment to report instead of the field name.
    pub alias: Option<String>,
}

impl FieldInfo {
    /// Creates a field with the given shape and no bindings.
    pub fn new(name: impl Into<String>, shape: FieldShape) -> Self {
        Self {
            name: name.into(),
            shape,
            validators: Vec::new(),
            constraints: Vec::new(),
            error_message: None,
            types: Vec::new(),
            alias: None,
        }
    }

    /// Scalar field.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self::new(name, FieldShape::Leaf)
    }

    /// Field holding a single nested `T`.
    pub fn object<T: Describe>(name: impl Into<String>) -> Self {
        Self::new(name, FieldShape::Object(TypeRef::of::<T>()))
    }

    /// Field holding a collection of `T`.
    pub fn collection<T: Describe>(name: impl Into<String>) -> Self {
        Self::new(name, FieldShape::Collection(TypeRef::of::<T>()))
    }

    /// Field holding a map with the given key and value types.
    pub fn map(name: impl Into<String>, key: TypeRef, value: TypeRef) -> Self {
        Self::new(name, FieldShape::Map(key, value))
    }

    /// Adds one validator name.
    pub fn validator(mut self, name: impl Into<String>) -> Self {
        self.validators.push(name.into());
        self
    }

    /// Adds several validator names.
    pub fn validators<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.validators.extend(names.into_iter().map(Into::into));
        self
    }

    /// Adds a parameterized validator.
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Sets the error message override.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Restricts the bindings to the given determined types.
    pub fn types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types.extend(types.into_iter().map(Into::into));
        self
    }

    /// Reports the field under `alias` in error paths.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// Metadata for one type.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    /// Identity of the type.
    pub descriptor: TypeDescriptor,
    /// Declared fields, in declaration order.
    pub fields: Vec<FieldInfo>,
    /// Excludes the type from validation entirely.
    pub ignored: bool,
}

impl TypeInfo {
    /// Metadata for a Rust type.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(TypeDescriptor::of::<T>())
    }

    /// Metadata for a descriptor.
    pub fn new(descriptor: TypeDescriptor) -> Self {
        Self {
            descriptor,
            fields: Vec::new(),
            ignored: false,
        }
    }

    /// Appends a field.
    pub fn field(mut self, field: FieldInfo) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends several fields.
    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldInfo>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Excludes the type from validation.
    pub fn skip_validation(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Looks up a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// In-memory [`Introspect`] provider.
///
/// Registering a [`Describe`] type also registers every described type it
/// reaches through its fields, so registering the roots is enough.
///
/// # Example
///
/// ```rust
/// use validgraph::schema::{Describe, FieldInfo, Introspect, TypeCatalog, TypeDescriptor, TypeInfo};
///
/// struct Line;
/// struct Order;
///
/// impl Describe for Line {
///     fn describe() -> TypeInfo {
///         TypeInfo::of::<Line>().field(FieldInfo::leaf("sku").validator("notNull"))
///     }
/// }
///
/// impl Describe for Order {
///     fn describe() -> TypeInfo {
///         TypeInfo::of::<Order>().field(FieldInfo::collection::<Line>("lines"))
///     }
/// }
///
/// let mut catalog = TypeCatalog::new();
/// catalog.register::<Order>();
///
/// assert_eq!(catalog.len(), 2);
/// assert!(catalog.describe(&TypeDescriptor::of::<Line>()).is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: IndexMap<TypeDescriptor, TypeInfo>,
}

impl TypeCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` and every described type reachable from it.
    pub fn register<T: Describe>(&mut self) -> TypeDescriptor {
        self.insert(T::describe())
    }

    /// Registers metadata and every described type reachable from it.
    ///
    /// Metadata already present for a descriptor is replaced only for the
    /// type passed in directly; transitively reached types keep their first
    /// registration.
    pub fn insert(&mut self, info: TypeInfo) -> TypeDescriptor {
        let descriptor = info.descriptor.clone();
        let mut pending: VecDeque<TypeInfo> = VecDeque::new();
        self.enqueue_references(&info, &mut pending);
        self.types.insert(descriptor.clone(), info);

        while let Some(next) = pending.pop_front() {
            if self.types.contains_key(&next.descriptor) {
                continue;
            }
            self.enqueue_references(&next, &mut pending);
            self.types.insert(next.descriptor.clone(), next);
        }

        descriptor
    }

    fn enqueue_references(&self, info: &TypeInfo, pending: &mut VecDeque<TypeInfo>) {
        for field in &info.fields {
            for type_ref in field.shape.element_refs() {
                if type_ref.descriptor() == &info.descriptor
                    || self.types.contains_key(type_ref.descriptor())
                    || pending.iter().any(|p| &p.descriptor == type_ref.descriptor())
                {
                    continue;
                }
                if let Some(resolved) = type_ref.resolve() {
                    pending.push_back(resolved);
                }
            }
        }
    }

    /// Adds every type of `other` that is not registered yet.
    pub fn merge(&mut self, other: TypeCatalog) {
        for (descriptor, info) in other.types {
            self.types.entry(descriptor).or_insert(info);
        }
    }

    /// Returns the metadata registered for `ty`.
    pub fn get(&self, ty: &TypeDescriptor) -> Option<&TypeInfo> {
        self.types.get(ty)
    }

    /// Returns true if metadata is registered for `ty`.
    pub fn contains(&self, ty: &TypeDescriptor) -> bool {
        self.types.contains_key(ty)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered descriptors, in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.keys()
    }
}

impl Introspect for TypeCatalog {
    fn describe(&self, ty: &TypeDescriptor) -> Option<TypeInfo> {
        self.types.get(ty).cloned()
    }
}
