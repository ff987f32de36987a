pub mod abs_neg;
pub mod arithmetic;
pub mod comparisons;
pub mod format;
pub mod input;
pub mod logic;
pub mod parse_num;
pub mod print;
pub mod range;

use std::rc::Rc;

use crate::environment::Environment;
use crate::value::{BuiltinFunction, NativeFn, Value};

const GLOBAL_BUILTINS: &[(&str, NativeFn)] = &[
    ("print", print::print),
    ("input", input::input),
    ("range", range::range),
    ("format", format::format),
    ("parse_int", parse_num::parse_int),
    ("parse_float", parse_num::parse_float),
    ("add", arithmetic::add),
    ("sub", arithmetic::sub),
    ("mul", arithmetic::mul),
    ("div", arithmetic::div),
    ("pow", arithmetic::pow),
    ("mod", arithmetic::modulo),
    ("abs", abs_neg::abs),
    ("neg", abs_neg::neg),
    ("lt", comparisons::lt),
    ("le", comparisons::le),
    ("eq", comparisons::eq),
    ("ne", comparisons::ne),
    ("ge", comparisons::ge),
    ("gt", comparisons::gt),
    ("and", logic::and),
    ("or", logic::or),
    ("not", logic::not),
];

/// Binds every fixed built-in function into the global environment before
/// the program's hoisted declarations and top-level statements run.
pub fn register_globals(env: &Environment) {
    for (name, func) in GLOBAL_BUILTINS {
        env.define(Rc::from(*name), Value::BuiltinFunction(BuiltinFunction { name, func: *func }));
    }
}
