//! Traversal of live object graphs.
//!
//! This module provides the [`ValidationContext`] type that carries the state
//! of one `validate` call: the root object, the determined type, the path
//! stack, the chain of objects currently being walked, and the response being
//! accumulated. Nothing in it is shared between calls.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{FieldAccessError, TraversalError, ValidationError, ValidatorExecutionError};
use crate::path::FieldPath;
use crate::reflect::Reflect;
use crate::registry::ValidatorRegistry;
use crate::response::ValidationResponse;
use crate::schema::{AttributeBinding, FieldPlan, Schema, TypeDescriptor};
use crate::value::Value;

/// Object identity on the ancestor chain: address plus runtime type, so a
/// struct and its first field (same address) are told apart.
type ObjectKey = (usize, TypeDescriptor);

/// Per-call traversal state.
///
/// The context walks values by kind: lists and maps are unwrapped under the
/// current path segment, objects are walked field by field following the
/// schema's closure. Failures of any one field are recorded and the walk
/// carries on.
pub(crate) struct ValidationContext<'e, 'r> {
    schema: &'e Schema,
    registry: &'e ValidatorRegistry,
    root: &'r dyn Reflect,
    determined_type: Option<String>,
    path: FieldPath,
    ancestors: HashSet<ObjectKey>,
    depth: usize,
    max_depth: Option<usize>,
    response: ValidationResponse,
}

impl<'e, 'r> ValidationContext<'e, 'r> {
    /// Creates a context for one validation of `root`.
    pub(crate) fn new(
        schema: &'e Schema,
        registry: &'e ValidatorRegistry,
        root: &'r dyn Reflect,
        determined_type: Option<String>,
        max_depth: Option<usize>,
    ) -> Self {
        Self {
            schema,
            registry,
            root,
            determined_type,
            path: FieldPath::root(),
            ancestors: HashSet::new(),
            depth: 0,
            max_depth,
            response: ValidationResponse::new(),
        }
    }

    /// Walks the root object and returns everything found.
    pub(crate) fn run(mut self) -> ValidationResponse {
        let root = self.root;
        self.walk_object(root);
        self.response
    }

    fn walk(&mut self, value: &Value<'_>) {
        match value {
            Value::List(items) => {
                for item in items.iter().filter(|v| !v.is_null()) {
                    self.walk(item);
                }
            }
            Value::Map(entries) => {
                for (key, value) in entries {
                    if !key.is_null() {
                        self.walk(key);
                    }
                    if !value.is_null() {
                        self.walk(value);
                    }
                }
            }
            Value::Object(object) => self.walk_object(*object),
            _ => {}
        }
    }

    fn walk_object(&mut self, object: &dyn Reflect) {
        let ty = object.type_descriptor();
        let schema = self.schema;
        let plans = schema.fields(&ty);
        if plans.is_empty() {
            return;
        }

        let key = (address_of(object), ty);
        if self.ancestors.contains(&key) {
            tracing::debug!(field = %self.path, type_name = %key.1, "object already on the walk, skipping");
            return;
        }
        if let Some(max_depth) = self.max_depth.filter(|&max| self.depth >= max) {
            tracing::warn!(field = %self.path, max_depth, "maximum object depth exceeded");
            self.response.push(
                ValidationError::from_cause(TraversalError::DepthExceeded { max_depth })
                    .with_code("max_depth_exceeded")
                    .at(&self.path),
            );
            return;
        }

        self.ancestors.insert(key.clone());
        self.depth += 1;
        for plan in plans {
            self.path.push(plan.path_segment());
            self.visit_field(object, plan);
            self.path.pop();
        }
        self.depth -= 1;
        self.ancestors.remove(&key);
    }

    fn visit_field(&mut self, object: &dyn Reflect, plan: &FieldPlan) {
        let binding = &plan.binding;

        if !binding.is_bound() {
            match object.field(plan.name()) {
                Ok(value) if !value.is_null() => self.walk(&value),
                Ok(_) => {}
                Err(error) => self.record_access_error(error),
            }
            return;
        }

        if !binding.applies_to(self.determined_type.as_deref()) {
            tracing::debug!(
                field = %self.path,
                determined_type = ?self.determined_type,
                "binding does not apply to determined type"
            );
            return;
        }

        let value = match object.field(plan.name()) {
            Ok(value) => value,
            Err(error) => {
                self.record_access_error(error);
                return;
            }
        };

        let registry = self.registry;
        let root = self.root;
        for name in &binding.validators {
            let Some(handle) = registry.lookup(name) else {
                tracing::debug!(field = %self.path, validator = %name, "validator not registered, skipping");
                continue;
            };
            match panic::catch_unwind(AssertUnwindSafe(|| handle.invoke(&value, root))) {
                Ok(Ok(())) => {}
                Ok(Err(error)) => self.record_failure(error, &value, binding),
                Err(payload) => self.record_panic(name, panic_message(payload.as_ref()), &value),
            }
        }
    }

    fn record_failure(&mut self, error: ValidationError, value: &Value<'_>, binding: &AttributeBinding) {
        let mut error = error.with_value(value.to_json()).at(&self.path);
        if let Some(message) = &binding.error_message {
            error.message = Some(message.clone());
        }
        self.response.push(error);
    }

    fn record_panic(&mut self, validator: &str, message: String, value: &Value<'_>) {
        tracing::warn!(field = %self.path, %validator, %message, "validator panicked");
        self.response.push(
            ValidationError::from_cause(ValidatorExecutionError::Panicked {
                validator: validator.to_string(),
                message,
            })
            .with_code("validator_panicked")
            .with_value(value.to_json())
            .at(&self.path),
        );
    }

    fn record_access_error(&mut self, error: FieldAccessError) {
        tracing::warn!(field = %self.path, %error, "field could not be read");
        self.response.push(
            ValidationError::from_cause(error)
                .with_code("field_access")
                .at(&self.path),
        );
    }
}

fn address_of(object: &dyn Reflect) -> usize {
    object as *const _ as *const () as usize
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
