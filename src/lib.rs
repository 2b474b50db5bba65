//! # Validgraph
//!
//! A declarative validation engine for object graphs that accumulates ALL
//! validation errors instead of stopping at the first one.
//!
//! ## Overview
//!
//! Fields declare the validators that apply to them. When the engine is built
//! it discovers every type reachable from its roots, resolves parameterized
//! constraints into registered validators, and computes which fields must be
//! visited because they are bound or lead to a bound field. Validating an
//! object then walks exactly those fields, through nested objects,
//! collections and maps, and reports every failure with its dotted field
//! path.
//!
//! ## Core Types
//!
//! - [`Engine`] / [`EngineBuilder`]: build once, validate many times
//! - [`Reflect`] and the [`reflect!`] macro: runtime field reads
//! - [`schema::Describe`]: static field metadata and bindings
//! - [`Validator`] / [`RootAwareValidator`]: leaf predicates
//! - [`ValidationResponse`]: every error found for one root
//!
//! ## Example
//!
//! ```rust
//! use validgraph::schema::{Constraint, Describe, FieldInfo, TypeInfo};
//! use validgraph::{reflect, Engine};
//!
//! struct Line {
//!     sku: Option<String>,
//!     quantity: i64,
//! }
//!
//! struct Order {
//!     lines: Vec<Line>,
//! }
//!
//! reflect!(Line { sku, quantity });
//! reflect!(Order { lines });
//!
//! impl Describe for Line {
//!     fn describe() -> TypeInfo {
//!         TypeInfo::of::<Line>()
//!             .field(FieldInfo::leaf("sku").validator("notNull"))
//!             .field(FieldInfo::leaf("quantity").constraint(Constraint::new("min").value(1)))
//!     }
//! }
//!
//! impl Describe for Order {
//!     fn describe() -> TypeInfo {
//!         TypeInfo::of::<Order>().field(FieldInfo::collection::<Line>("lines"))
//!     }
//! }
//!
//! let engine = Engine::builder().root::<Order>().build().unwrap();
//!
//! let order = Order {
//!     lines: vec![
//!         Line { sku: None, quantity: 0 },
//!         Line { sku: Some("A-1".into()), quantity: 2 },
//!     ],
//! };
//!
//! let response = engine.validate(&order);
//! assert_eq!(response.len(), 2);
//! assert_eq!(response.errors_for_field("lines.sku").len(), 1);
//! assert_eq!(response.errors_for_field("lines.quantity").len(), 1);
//! ```

pub mod engine;
pub mod error;
pub mod path;
pub mod reflect;
pub mod registry;
pub mod response;
pub mod schema;
pub mod validator;
pub mod value;

mod validation;

pub use engine::{Engine, EngineBuilder, TypeDeterminer};
pub use error::{
    ConfigurationError, FieldAccessError, TraversalError, ValidationError, ValidationErrors,
    ValidatorExecutionError,
};
pub use path::FieldPath;
pub use reflect::Reflect;
pub use registry::ValidatorRegistry;
pub use response::ValidationResponse;
pub use validator::{RootAwareValidator, Validator, ValidatorHandle};
pub use value::{ToValue, Value};

/// Type alias for the accumulating form of a [`ValidationResponse`].
pub type ValidationResult = stillwater::Validation<(), ValidationErrors>;
