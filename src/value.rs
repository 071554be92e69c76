//! Runtime argument values.
//!
//! [`Value`] is the dispatcher's view of one call argument: enough structure
//! to name the native type it maps to, and nothing else. Converting a value
//! into an actual native call argument is the marshaling layer's job and
//! happens behind [`TypeSystem::invoke`](crate::typeinfo::TypeSystem::invoke).

use std::borrow::Cow;

use crate::infer::type_code_to_native;

/// A runtime value passed into the dispatcher.
///
/// Every variant knows the native type name it corresponds to, which is all
/// the resolution machinery needs: fingerprints, prototypes, and exact-match
/// checks are pure functions of those names.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value (result of void calls).
    Void,
    /// Boolean.
    Bool(bool),
    /// Integer (all widths carried as i64; the declared native type is `long`).
    Int(i64),
    /// Floating point (f32/f64 carried as f64; the declared native type is `double`).
    Float(f64),
    /// String.
    Str(String),
    /// A bound object instance of a registered class.
    Object {
        /// Fully qualified native class name.
        class: String,
        /// Opaque instance identity.
        instance: u64,
    },
    /// A homogeneous sequence literal; instantiates as `std::initializer_list<T>`.
    List(Vec<Value>),
    /// A typed contiguous buffer carrying an array type-code (`'i'`, `'d'`, ...).
    Buffer {
        /// Element type-code.
        type_code: char,
        /// Element count.
        len: usize,
    },
    /// A foreign scalar carrying a ctypes-style type-code, possibly a pointer to one.
    Foreign {
        /// Scalar type-code.
        type_code: char,
        /// Pointer depth: 0 is the scalar itself, 1 a pointer to it, and so on.
        indirection: u8,
    },
    /// An opaque untyped pointer.
    VoidPtr(usize),
}

impl Value {
    /// The native type name this value maps to.
    ///
    /// This is the by-value name; reference/pointer preferences are applied
    /// on top of it when building instantiation prototypes (see
    /// [`build_prototype`](crate::infer::build_prototype)).
    pub fn native_type_name(&self) -> Cow<'_, str> {
        match self {
            Value::Void => Cow::Borrowed("void"),
            Value::Bool(_) => Cow::Borrowed("bool"),
            Value::Int(_) => Cow::Borrowed("long"),
            Value::Float(_) => Cow::Borrowed("double"),
            Value::Str(_) => Cow::Borrowed("std::string"),
            Value::Object { class, .. } => Cow::Borrowed(class.as_str()),
            Value::List(items) => {
                let elem = items
                    .first()
                    .map(|v| v.native_type_name().into_owned())
                    .unwrap_or_else(|| "void".to_string());
                Cow::Owned(format!("std::initializer_list<{elem}>"))
            }
            Value::Buffer { type_code, .. } => Cow::Owned(
                type_code_to_native(*type_code, "*", true)
                    .unwrap_or_else(|| "void*".to_string()),
            ),
            Value::Foreign {
                type_code,
                indirection,
            } => {
                let base = type_code_to_native(*type_code, "", false)
                    .unwrap_or_else(|| "void".to_string());
                if *indirection == 0 {
                    Cow::Owned(base)
                } else {
                    Cow::Owned(format!("{base}{}", "*".repeat(*indirection as usize)))
                }
            }
            Value::VoidPtr(_) => Cow::Borrowed("void*"),
        }
    }

    /// Whether this value can serve as a bound receiver.
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_type_names() {
        assert_eq!(Value::Bool(true).native_type_name(), "bool");
        assert_eq!(Value::Int(1).native_type_name(), "long");
        assert_eq!(Value::Float(1.0).native_type_name(), "double");
        assert_eq!(Value::Str("x".into()).native_type_name(), "std::string");
        assert_eq!(Value::VoidPtr(0).native_type_name(), "void*");
    }

    #[test]
    fn object_type_name_is_class_name() {
        let v = Value::Object {
            class: "Widget".into(),
            instance: 7,
        };
        assert_eq!(v.native_type_name(), "Widget");
        assert!(v.is_object());
    }

    #[test]
    fn list_type_name_uses_element_type() {
        let v = Value::List(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(v.native_type_name(), "std::initializer_list<long>");

        let empty = Value::List(vec![]);
        assert_eq!(empty.native_type_name(), "std::initializer_list<void>");
    }

    #[test]
    fn buffer_type_name_is_pointer() {
        let v = Value::Buffer {
            type_code: 'd',
            len: 16,
        };
        assert_eq!(v.native_type_name(), "double*");

        // unknown element codes degrade to an untyped pointer
        let v = Value::Buffer {
            type_code: 'z',
            len: 16,
        };
        assert_eq!(v.native_type_name(), "void**");
    }

    #[test]
    fn foreign_type_name_tracks_indirection() {
        let scalar = Value::Foreign {
            type_code: 'i',
            indirection: 0,
        };
        assert_eq!(scalar.native_type_name(), "int");

        let ptr = Value::Foreign {
            type_code: 'i',
            indirection: 1,
        };
        assert_eq!(ptr.native_type_name(), "int*");
    }
}
