//! Schema metadata, discovery and reachability closure.
//!
//! Types describe themselves through [`Describe`] (or any [`Introspect`]
//! provider). At build time the engine discovers the [`SchemaGraph`] reachable
//! from its root types, resolves each field's [`AttributeBinding`], and
//! compiles the graph into a [`Schema`]: per type, the fields that must be
//! visited because they are bound or lead to a bound field.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use validgraph::schema::{
//!     AttributeBinding, Describe, FieldInfo, SchemaGraph, TypeCatalog, TypeDescriptor, TypeInfo,
//! };
//!
//! struct Line;
//! struct Order;
//!
//! impl Describe for Line {
//!     fn describe() -> TypeInfo {
//!         TypeInfo::of::<Line>()
//!             .field(FieldInfo::leaf("sku").validator("notNull"))
//!             .field(FieldInfo::leaf("comment"))
//!     }
//! }
//!
//! impl Describe for Order {
//!     fn describe() -> TypeInfo {
//!         TypeInfo::of::<Order>().field(FieldInfo::collection::<Line>("lines"))
//!     }
//! }
//!
//! let mut catalog = TypeCatalog::new();
//! let root = catalog.register::<Order>();
//! let graph = SchemaGraph::discover(&catalog, [root]);
//!
//! let bindings: HashMap<_, _> = graph
//!     .declared_fields()
//!     .map(|f| (f.descriptor.clone(), AttributeBinding::from_field(&f.info)))
//!     .collect();
//! let schema = graph.compile(&bindings);
//!
//! assert_eq!(schema.fields(&TypeDescriptor::of::<Order>()).len(), 1);
//! assert_eq!(schema.fields(&TypeDescriptor::of::<Line>()).len(), 1);
//! ```

mod binding;
mod descriptor;
mod graph;

pub use binding::AttributeBinding;
pub use descriptor::{
    Constraint, ContainerKind, Describe, FieldDescriptor, FieldInfo, FieldShape, Introspect,
    TypeCatalog, TypeDescriptor, TypeInfo, TypeRef,
};
pub use graph::{DeclaredField, FieldPlan, NodeId, NodeKind, Schema, SchemaGraph, SchemaNode};
