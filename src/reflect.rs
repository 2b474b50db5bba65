//! Runtime field reads on live objects.
//!
//! The engine never knows the concrete types it walks. Everything it needs
//! from a live object goes through [`Reflect`]: the runtime type, and a field
//! read by name. Plain structs get an implementation from [`reflect!`].

use std::any::Any;
use std::fmt;

use crate::error::FieldAccessError;
use crate::schema::TypeDescriptor;
use crate::value::Value;

/// Read access to the fields of a live object.
///
/// Implementations must be consistent with the static metadata the engine
/// was built from: every field named in a type's [`TypeInfo`] should be
/// readable. A name the object does not know yields
/// [`FieldAccessError::NoSuchField`], which the engine records instead of
/// aborting.
///
/// [`TypeInfo`]: crate::schema::TypeInfo
pub trait Reflect: Send + Sync {
    /// Runtime type of this object.
    fn type_descriptor(&self) -> TypeDescriptor;

    /// Reads a field by its declared name.
    fn field(&self, name: &str) -> Result<Value<'_>, FieldAccessError>;

    /// Upcast used for downcasting in type determiners and root-aware
    /// validators.
    fn as_any(&self) -> &dyn Any;
}

impl<'a> dyn Reflect + 'a {
    /// Returns the object as a concrete type, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Returns true if the object is of type `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

impl fmt::Debug for dyn Reflect + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.type_descriptor())
    }
}

/// Implements [`Reflect`] and [`ToValue`](crate::ToValue) for a struct.
///
/// List the fields the engine may read; each must implement `ToValue`.
/// Fields holding other reflected structs, collections of them, or maps of
/// them are walked recursively.
///
/// # Example
///
/// ```rust
/// use validgraph::{reflect, Reflect};
///
/// struct Address {
///     street: Option<String>,
/// }
///
/// reflect!(Address { street });
///
/// let address = Address { street: None };
/// assert!(address.field("street").unwrap().is_null());
/// assert!(address.field("zip").is_err());
/// ```
#[macro_export]
macro_rules! reflect {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::Reflect for $ty {
            fn type_descriptor(&self) -> $crate::schema::TypeDescriptor {
                $crate::schema::TypeDescriptor::of::<$ty>()
            }

            fn field(
                &self,
                name: &str,
            ) -> ::std::result::Result<$crate::Value<'_>, $crate::error::FieldAccessError> {
                $(
                    if name == stringify!($field) {
                        return Ok($crate::ToValue::to_value(&self.$field));
                    }
                )*
                Err($crate::error::FieldAccessError::NoSuchField {
                    type_name: ::std::any::type_name::<$ty>().to_string(),
                    field: name.to_string(),
                })
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }

        impl $crate::ToValue for $ty {
            fn to_value(&self) -> $crate::Value<'_> {
                $crate::Value::Object(self)
            }
        }
    };
}
