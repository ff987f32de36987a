use std::cmp::Ordering;

use crate::error::ErrorKind;
use crate::stdio::Stdio;
use crate::value::{NativeError, Value};

fn arity(name: &str, args: &[Value]) -> Result<(), NativeError> {
    if args.len() != 2 {
        return Err(NativeError::new(
            ErrorKind::ArityError,
            format!("{name}() takes 2 arguments, got {}", args.len()),
        ));
    }
    Ok(())
}

fn order(name: &str, a: &Value, b: &Value) -> Result<Ordering, NativeError> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(x.cmp(y)),
        (Value::Float(x), Value::Float(y)) => {
            x.partial_cmp(y).ok_or_else(|| NativeError::new(ErrorKind::ValueError, "cannot order NaN"))
        }
        (Value::Int(x), Value::Float(y)) => (*x as f64)
            .partial_cmp(y)
            .ok_or_else(|| NativeError::new(ErrorKind::ValueError, "cannot order NaN")),
        (Value::Float(x), Value::Int(y)) => x
            .partial_cmp(&(*y as f64))
            .ok_or_else(|| NativeError::new(ErrorKind::ValueError, "cannot order NaN")),
        (Value::Str(x), Value::Str(y)) => Ok(x.cmp(y)),
        _ => Err(NativeError::new(
            ErrorKind::TypeError,
            format!("{name}() is not defined for {} and {}", a.type_name(), b.type_name()),
        )),
    }
}

pub fn lt(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    arity("lt", args)?;
    Ok(Value::Bool(order("lt", &args[0], &args[1])? == Ordering::Less))
}

pub fn le(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    arity("le", args)?;
    Ok(Value::Bool(order("le", &args[0], &args[1])? != Ordering::Greater))
}

pub fn ge(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    arity("ge", args)?;
    Ok(Value::Bool(order("ge", &args[0], &args[1])? != Ordering::Less))
}

pub fn gt(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    arity("gt", args)?;
    Ok(Value::Bool(order("gt", &args[0], &args[1])? == Ordering::Greater))
}

pub fn eq(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    arity("eq", args)?;
    Ok(Value::Bool(args[0].eq_value(&args[1])))
}

pub fn ne(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    arity("ne", args)?;
    Ok(Value::Bool(!args[0].eq_value(&args[1])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stdio::CollectingStdio;

    #[test]
    fn numeric_coercion_in_ordering() {
        let mut io = CollectingStdio::default();
        let v = lt(&mut io, &[Value::Int(1), Value::Float(1.5)]).unwrap();
        assert!(v.eq_value(&Value::Bool(true)));
    }

    #[test]
    fn eq_coerces_int_and_float() {
        let mut io = CollectingStdio::default();
        let v = eq(&mut io, &[Value::Int(1), Value::Float(1.0)]).unwrap();
        assert!(v.eq_value(&Value::Bool(true)));
    }

    #[test]
    fn ordering_on_mismatched_types_is_type_error() {
        let mut io = CollectingStdio::default();
        let err = lt(&mut io, &[Value::Int(1), Value::Str(std::rc::Rc::from("a"))]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
    }

    #[test]
    fn string_ordering() {
        let mut io = CollectingStdio::default();
        let v = lt(&mut io, &[Value::Str(std::rc::Rc::from("a")), Value::Str(std::rc::Rc::from("b"))]).unwrap();
        assert!(v.eq_value(&Value::Bool(true)));
    }
}
