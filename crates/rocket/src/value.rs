use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::parser::Stmt;
use crate::environment::Environment;
use crate::stdio::Stdio;

/// A key usable in a Rocket `Dict`. Keyed by literal variant and value, not
/// by the coercing numeric equality `eq()` exposes — `Int(1)` and
/// `Float(1.0)` are distinct keys even though `eq(1, 1.0)` is `true`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DictKey {
    Int(i64),
    Float(u64), // bit pattern, so NaN/±0 hash and compare consistently
    Str(Rc<str>),
    Bool(bool),
    Null,
}

impl DictKey {
    pub fn to_value(&self) -> Value {
        match self {
            Self::Int(n) => Value::Int(*n),
            Self::Float(bits) => Value::Float(f64::from_bits(*bits)),
            Self::Str(s) => Value::Str(s.clone()),
            Self::Bool(b) => Value::Bool(*b),
            Self::Null => Value::Null,
        }
    }
}

pub type RocketList = Rc<RefCell<Vec<Value>>>;
pub type RocketDict = Rc<RefCell<IndexMap<DictKey, Value>>>;

#[derive(Debug)]
pub struct FunctionData {
    pub name: Option<Rc<str>>,
    pub params: Vec<Rc<str>>,
    pub body: Rc<[Stmt]>,
    pub env: Environment,
}

pub type NativeFn = fn(&mut dyn Stdio, &[Value]) -> Result<Value, NativeError>;

/// An error raised inside a builtin implementation, translated to a
/// position-carrying `RocketError` by the caller (which knows the call site).
pub struct NativeError {
    pub kind: crate::error::ErrorKind,
    pub message: String,
}

impl NativeError {
    pub fn new(kind: crate::error::ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }
}

#[derive(Clone, Copy)]
pub struct BuiltinFunction {
    pub name: &'static str,
    pub func: NativeFn,
}

impl fmt::Debug for BuiltinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<builtin {}>", self.name)
    }
}

impl PartialEq for BuiltinFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// A dynamically-typed runtime value.
///
/// `List`/`Dict` are reference-shared (`Rc<RefCell<_>>`): cloning a `Value`
/// of either variant aliases the same storage, never deep-copies. Every
/// other variant has ordinary value semantics.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    Bool(bool),
    Null,
    List(RocketList),
    Dict(RocketDict),
    Function(Rc<FunctionData>),
    BuiltinFunction(BuiltinFunction),
    BoundMethod(Box<Value>, BuiltinFunction),
    /// An opaque lazy integer range, produced by the `range` builtin.
    Range(i64, i64, i64),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Bool(_) => "bool",
            Self::Null => "null",
            Self::List(_) => "list",
            Self::Dict(_) => "dict",
            Self::Function(_) => "function",
            Self::BuiltinFunction(_) => "builtin_function",
            Self::BoundMethod(..) => "bound_method",
            Self::Range(..) => "range",
        }
    }

    /// Truthiness per spec: `false`, `null`, `0`, `0.0`, `""`, and empty
    /// containers are falsy; everything else (including functions) is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Null => false,
            Self::Int(n) => *n != 0,
            Self::Float(f) => *f != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::List(l) => !l.borrow().is_empty(),
            Self::Dict(d) => !d.borrow().is_empty(),
            Self::Function(_) | Self::BuiltinFunction(_) | Self::BoundMethod(..) | Self::Range(..) => true,
        }
    }

    pub fn dict_key(&self) -> Option<DictKey> {
        Some(match self {
            Self::Int(n) => DictKey::Int(*n),
            Self::Float(f) => DictKey::Float(f.to_bits()),
            Self::Str(s) => DictKey::Str(s.clone()),
            Self::Bool(b) => DictKey::Bool(*b),
            Self::Null => DictKey::Null,
            _ => return None,
        })
    }

    /// Structural equality, with Int/Float numeric coercion. Lists and
    /// Dicts compare deeply; Functions compare by identity.
    pub fn eq_value(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => (*a as f64) == *b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Null, Self::Null) => true,
            (Self::List(a), Self::List(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.eq_value(y))
            }
            (Self::Dict(a), Self::Dict(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len()
                    && a.iter().all(|(k, v)| b.get(k).is_some_and(|bv| v.eq_value(bv)))
            }
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::BuiltinFunction(a), Self::BuiltinFunction(b)) => a.name == b.name,
            (Self::BoundMethod(ra, a), Self::BoundMethod(rb, b)) => ra.eq_value(rb) && a.name == b.name,
            (Self::Range(a1, a2, a3), Self::Range(b1, b2, b3)) => a1 == b1 && a2 == b2 && a3 == b3,
            _ => false,
        }
    }

    /// Display form used by `print` and when nested inside a container.
    pub fn display(&self, quote_strings: bool) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Float(f) => format_float(*f),
            Self::Bool(b) => b.to_string(),
            Self::Null => "null".to_string(),
            Self::Str(s) => {
                if quote_strings {
                    format!("{s:?}")
                } else {
                    s.to_string()
                }
            }
            Self::List(l) => {
                let items: Vec<String> = l.borrow().iter().map(|v| v.display(true)).collect();
                format!("[{}]", items.join(", "))
            }
            Self::Dict(d) => {
                let items: Vec<String> = d
                    .borrow()
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.to_value().display(true), v.display(true)))
                    .collect();
                format!("{{{}}}", items.join(", "))
            }
            Self::Function(f) => match &f.name {
                Some(name) => format!("<function {name}>"),
                None => "<function>".to_string(),
            },
            Self::BuiltinFunction(b) => format!("<builtin {}>", b.name),
            Self::BoundMethod(_, b) => format!("<bound method {}>", b.name),
            Self::Range(start, stop, step) => format!("<range {start}:{stop}:{step}>"),
        }
    }
}

/// Formats a float with at least one fractional digit, matching the
/// standard decimal notation the spec calls for (not a shortest-round-trip
/// representation).
pub fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    let s = format!("{f}");
    if s.contains('.') {
        s
    } else {
        format!("{s}.0")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display(false))
    }
}
