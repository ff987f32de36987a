pub mod dict;
pub mod list;
pub mod string;

use crate::value::{BuiltinFunction, Value};

/// Resolves `target.name` to a bound method, or `None` if no such method
/// exists on `target`'s type (the caller treats `None` as `AttrError`,
/// except for Dict where a matching key takes priority over a method name).
pub fn lookup_method(target: &Value, name: &str) -> Option<BuiltinFunction> {
    match target {
        Value::List(_) => list::method(name),
        Value::Dict(_) => dict::method(name),
        Value::Str(_) => string::method(name),
        _ => None,
    }
}
