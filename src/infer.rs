//! Argument-type inference for instantiation prototypes.
//!
//! When no compiled overload matches a call, the dispatcher derives a
//! candidate native type name for each argument and asks the type-information
//! service to materialize a method for that prototype. Object instances can
//! be named by reference, by pointer, or by value; the resolution loop tries
//! those preferences in a fixed order (see [`crate::proxy::TemplateProxy::call`]).

use crate::value::Value;

/// How an object instance is named when building an instantiation prototype.
///
/// Primitives, buffers, and foreign scalars have fixed spellings; only class
/// instances vary with the preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgPreference {
    /// Plain class name (also used when the caller fixed the types explicitly).
    Value,
    /// `T*`
    Pointer,
    /// `T&`
    Reference,
}

impl ArgPreference {
    fn suffix(self) -> &'static str {
        match self {
            ArgPreference::Value => "",
            ArgPreference::Pointer => "*",
            ArgPreference::Reference => "&",
        }
    }
}

/// Map an array/ctypes type-code to a native type name, appending `suffix`.
///
/// Unknown codes yield `void*` (plus suffix) when `allow_void_ptr` is set,
/// `None` otherwise.
pub fn type_code_to_native(code: char, suffix: &str, allow_void_ptr: bool) -> Option<String> {
    let name = match code {
        '?' => "bool",
        'c' | 'b' => "char",
        'B' => "unsigned char",
        'h' => "short",
        'H' => "unsigned short",
        'i' => "int",
        'I' => "unsigned int",
        'l' => "long",
        'L' => "unsigned long",
        'q' => "long long",
        'Q' => "unsigned long long",
        'f' => "float",
        'd' => "double",
        'g' => "long double",
        _ => {
            if allow_void_ptr {
                "void*"
            } else {
                return None;
            }
        }
    };
    Some(format!("{name}{suffix}"))
}

/// Candidate native type name for one argument under a preference.
///
/// Increments `applied` when the preference actually shaped the name, which
/// only happens for object instances; everything else spells the same under
/// every preference.
pub fn argument_type_name(arg: &Value, pref: ArgPreference, applied: &mut usize) -> String {
    match arg {
        Value::Buffer { type_code, .. } => {
            // buffers always decay to element pointers
            type_code_to_native(*type_code, "*", true).unwrap_or_else(|| "void*".to_string())
        }
        Value::Foreign {
            type_code,
            indirection,
        } => {
            let suffix = if *indirection == 0 { "&" } else { "*" };
            type_code_to_native(*type_code, suffix, false)
                .unwrap_or_else(|| arg.native_type_name().into_owned())
        }
        Value::Object { class, .. } => {
            *applied += 1;
            format!("{class}{}", pref.suffix())
        }
        _ => arg.native_type_name().into_owned(),
    }
}

/// Build a comma-joined instantiation prototype from argument types.
///
/// Returns the prototype and the number of arguments the preference was
/// applied to; zero means trying further preferences cannot produce a
/// different prototype.
pub fn build_prototype(args: &[Value], pref: ArgPreference) -> (String, usize) {
    let mut applied = 0;
    let names: Vec<String> = args
        .iter()
        .map(|a| argument_type_name(a, pref, &mut applied))
        .collect();
    (names.join(", "), applied)
}

/// Serialize explicit template arguments for subscript-style selection.
pub fn construct_template_args(type_names: &[&str]) -> String {
    format!("<{}>", type_names.join(", "))
}
