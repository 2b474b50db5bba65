//! Engine construction and the per-request validation entry point.
//!
//! This module provides [`EngineBuilder`], which collects validators, type
//! metadata and type determiners, and [`Engine`], the immutable result of
//! [`EngineBuilder::build`]. Building discovers the schema graph, resolves
//! every field constraint to a registered validator and computes the closure
//! exactly once; validating afterwards only reads.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use indexmap::IndexSet;
use rayon::prelude::*;

use crate::error::ConfigurationError;
use crate::reflect::Reflect;
use crate::registry::ValidatorRegistry;
use crate::response::ValidationResponse;
use crate::schema::{
    AttributeBinding, Constraint, Describe, Introspect, Schema, SchemaGraph, TypeCatalog,
    TypeDescriptor, TypeInfo,
};
use crate::validation::ValidationContext;
use crate::validator::{BindingResolver, ValidatorFactory, ValidatorHandle};

/// Computes the determined type of a root object.
///
/// Bindings that carry a types filter only apply when the determined type is
/// one of the listed names.
pub trait TypeDeterminer: Send + Sync {
    /// Returns the determined type of `root`, if it has one.
    fn determine(&self, root: &dyn Reflect) -> Option<String>;
}

impl<F> TypeDeterminer for F
where
    F: Fn(&dyn Reflect) -> Option<String> + Send + Sync,
{
    fn determine(&self, root: &dyn Reflect) -> Option<String> {
        self(root)
    }
}

/// Determiner for one concrete root type, reached by downcasting.
struct Typed<T, F> {
    determine: F,
    _marker: PhantomData<fn(&T)>,
}

impl<T, F> TypeDeterminer for Typed<T, F>
where
    T: Any,
    F: Fn(&T) -> Option<String> + Send + Sync,
{
    fn determine(&self, root: &dyn Reflect) -> Option<String> {
        root.downcast_ref::<T>().and_then(&self.determine)
    }
}

/// Catalog first, then the caller's provider.
struct Chained<'a> {
    catalog: &'a TypeCatalog,
    fallback: Option<&'a dyn Introspect>,
}

impl Introspect for Chained<'_> {
    fn describe(&self, ty: &TypeDescriptor) -> Option<TypeInfo> {
        self.catalog
            .describe(ty)
            .or_else(|| self.fallback.and_then(|provider| provider.describe(ty)))
    }
}

/// Builder for an [`Engine`].
///
/// # Example
///
/// ```rust
/// use validgraph::schema::{Describe, FieldInfo, TypeInfo};
/// use validgraph::{reflect, Engine};
///
/// struct Customer {
///     email: Option<String>,
/// }
///
/// reflect!(Customer { email });
///
/// impl Describe for Customer {
///     fn describe() -> TypeInfo {
///         TypeInfo::of::<Customer>().field(FieldInfo::leaf("email").validator("notNull"))
///     }
/// }
///
/// let engine = Engine::builder().root::<Customer>().build().unwrap();
///
/// let response = engine.validate(&Customer { email: None });
/// assert_eq!(response.errors_for_field("email").len(), 1);
/// ```
pub struct EngineBuilder {
    catalog: TypeCatalog,
    introspector: Option<Box<dyn Introspect>>,
    roots: IndexSet<TypeDescriptor>,
    resolver: BindingResolver,
    registry: ValidatorRegistry,
    determiners: HashMap<TypeDescriptor, Arc<dyn TypeDeterminer>>,
    max_depth: Option<usize>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    /// Creates a builder with the built-in validator factories.
    pub fn new() -> Self {
        Self {
            catalog: TypeCatalog::new(),
            introspector: None,
            roots: IndexSet::new(),
            resolver: BindingResolver::with_builtins(),
            registry: ValidatorRegistry::new(),
            determiners: HashMap::new(),
            max_depth: None,
        }
    }

    /// Adds a root type; every described type it reaches is registered too.
    pub fn root<T: Describe>(mut self) -> Self {
        let descriptor = self.catalog.register::<T>();
        self.roots.insert(descriptor);
        self
    }

    /// Adds root types by descriptor, resolved through the catalog or the
    /// custom introspector.
    pub fn roots<I>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = TypeDescriptor>,
    {
        self.roots.extend(roots);
        self
    }

    /// Adds every type of `catalog` as a root.
    pub fn catalog(mut self, catalog: TypeCatalog) -> Self {
        self.roots.extend(catalog.descriptors().cloned());
        self.catalog.merge(catalog);
        self
    }

    /// Sets a provider consulted for types the catalog does not know.
    pub fn introspector(mut self, introspector: impl Introspect + 'static) -> Self {
        self.introspector = Some(Box::new(introspector));
        self
    }

    /// Adds a parameterized validator factory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::MissingValidatorName` for an unnamed
    /// factory.
    pub fn factory(mut self, factory: ValidatorFactory) -> Result<Self, ConfigurationError> {
        self.resolver.add_factory(factory)?;
        Ok(self)
    }

    /// Registers a validator under the name it reports.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::MissingValidatorName` if the validator
    /// reports no name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use validgraph::{ConfigurationError, Engine, ValidatorHandle};
    ///
    /// let result = Engine::builder().add_validator(ValidatorHandle::from_fn(|_| Ok(())));
    /// assert!(matches!(result, Err(ConfigurationError::MissingValidatorName)));
    /// ```
    pub fn add_validator(mut self, validator: ValidatorHandle) -> Result<Self, ConfigurationError> {
        let name = validator
            .name()
            .ok_or(ConfigurationError::MissingValidatorName)?
            .to_string();
        self.registry.register(name, validator)?;
        Ok(self)
    }

    /// Registers validators under explicit names.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::MissingValidatorName` on the first empty
    /// name.
    pub fn add_validators<I, S>(mut self, validators: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (S, ValidatorHandle)>,
        S: Into<String>,
    {
        for (name, validator) in validators {
            self.registry.register(name, validator)?;
        }
        Ok(self)
    }

    /// Registers a type determiner for roots of type `T`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use validgraph::Engine;
    ///
    /// struct Payment {
    ///     method: String,
    /// }
    ///
    /// let builder = Engine::builder()
    ///     .add_type_determiner::<Payment, _>(|p| Some(p.method.clone()));
    /// # let _ = builder;
    /// ```
    pub fn add_type_determiner<T, F>(mut self, determine: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        let determiner = Typed {
            determine,
            _marker: PhantomData::<fn(&T)>,
        };
        self.determiners
            .insert(TypeDescriptor::of::<T>(), Arc::new(determiner));
        self
    }

    /// Registers type determiners keyed by root type.
    pub fn add_type_determiners<I>(mut self, determiners: I) -> Self
    where
        I: IntoIterator<Item = (TypeDescriptor, Arc<dyn TypeDeterminer>)>,
    {
        self.determiners.extend(determiners);
        self
    }

    /// Bounds object nesting during a walk.
    ///
    /// Unbounded by default. Objects nested deeper than `max_depth` are not
    /// walked and each cut-off records a `max_depth_exceeded` error.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Discovers the schema, resolves constraints and hands off the engine.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] raised while resolving a
    /// constraint, or `ConfigurationError::NoValidatableMetadata` when none of
    /// the discovered types has a bound field.
    pub fn build(self) -> Result<Engine, ConfigurationError> {
        let EngineBuilder {
            catalog,
            introspector,
            roots,
            resolver,
            mut registry,
            determiners,
            max_depth,
        } = self;

        let provider = Chained {
            catalog: &catalog,
            fallback: introspector.as_deref(),
        };
        let graph = SchemaGraph::discover(&provider, roots);

        let mut bindings = HashMap::new();
        for declared in graph.declared_fields() {
            let mut binding = AttributeBinding::from_field(&declared.info);

            for name in &binding.validators {
                if registry.contains(name) {
                    continue;
                }
                let parameterless = resolver
                    .factory(name)
                    .is_some_and(|f| f.constructor().is_ok_and(<[_]>::is_empty));
                if parameterless {
                    resolver.resolve(&declared.descriptor, &Constraint::new(name.as_str()), &mut registry)?;
                }
            }

            for constraint in &declared.info.constraints {
                let identity = resolver.resolve(&declared.descriptor, constraint, &mut registry)?;
                binding.merge_constraint(identity, constraint);
            }

            bindings.insert(declared.descriptor.clone(), binding);
        }

        if !bindings.values().any(AttributeBinding::is_bound) {
            return Err(ConfigurationError::NoValidatableMetadata(graph.type_count()));
        }

        let schema = graph.compile(&bindings);
        tracing::info!(
            types = schema.type_count(),
            fields = schema.field_count(),
            bound_fields = schema.bound_field_count(),
            validators = registry.len(),
            "validation engine built"
        );

        Ok(Engine {
            schema,
            registry,
            determiners,
            max_depth,
        })
    }
}

/// Immutable validation engine.
///
/// An engine is `Send + Sync`; share it behind an `Arc` and call
/// [`validate`](Engine::validate) from any number of threads.
pub struct Engine {
    schema: Schema,
    registry: ValidatorRegistry,
    determiners: HashMap<TypeDescriptor, Arc<dyn TypeDeterminer>>,
    max_depth: Option<usize>,
}

impl Engine {
    /// Returns a new builder.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Validates one root object and everything reachable from it.
    ///
    /// A root whose type is not validatable yields an empty response.
    pub fn validate(&self, object: &dyn Reflect) -> ValidationResponse {
        let ty = object.type_descriptor();
        if !self.schema.is_validatable(&ty) {
            tracing::debug!(type_name = %ty, "type is not validatable, nothing to do");
            return ValidationResponse::new();
        }

        let determined_type = self
            .determiners
            .get(&ty)
            .and_then(|determiner| determiner.determine(object));

        let response =
            ValidationContext::new(&self.schema, &self.registry, object, determined_type, self.max_depth)
                .run();
        tracing::debug!(type_name = %ty, errors = response.len(), "validation finished");
        response
    }

    /// Validates a batch of roots in parallel, one response per root.
    pub fn validate_all<T: Reflect>(&self, objects: &[T]) -> Vec<ValidationResponse> {
        objects
            .par_iter()
            .map(|object| self.validate(object))
            .collect()
    }

    /// Validator names bound somewhere in the schema with nothing registered
    /// under them. Such names are skipped during validation.
    pub fn unresolved_validators(&self) -> Vec<String> {
        self.registry.unresolved(
            self.schema
                .plans()
                .flat_map(|plan| plan.binding.validators.iter().map(String::as_str)),
        )
    }

    /// The compiled schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The validators the engine dispatches to.
    pub fn registry(&self) -> &ValidatorRegistry {
        &self.registry
    }

    /// Maximum object nesting depth of a walk, if one was set.
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("schema", &self.schema)
            .field("registry", &self.registry)
            .field("determiners", &self.determiners.keys().collect::<Vec<_>>())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Engine>();
    assert_sync::<Engine>();
};
