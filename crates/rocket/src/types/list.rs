use std::rc::Rc;

use crate::error::ErrorKind;
use crate::stdio::Stdio;
use crate::value::{BuiltinFunction, NativeError, Value};

fn receiver(args: &[Value]) -> Result<&Rc<std::cell::RefCell<Vec<Value>>>, NativeError> {
    match args.first() {
        Some(Value::List(l)) => Ok(l),
        _ => Err(NativeError::new(ErrorKind::TypeError, "method receiver must be a list")),
    }
}

pub fn index(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    let list = receiver(args)?;
    let [_, needle] = args else {
        return Err(NativeError::new(ErrorKind::ArityError, format!("index() takes 1 argument, got {}", args.len() - 1)));
    };
    list.borrow()
        .iter()
        .position(|v| v.eq_value(needle))
        .map(|i| Value::Int(i as i64))
        .ok_or_else(|| NativeError::new(ErrorKind::ValueError, "value not found in list"))
}

pub fn count(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    let list = receiver(args)?;
    let [_, needle] = args else {
        return Err(NativeError::new(ErrorKind::ArityError, format!("count() takes 1 argument, got {}", args.len() - 1)));
    };
    let n = list.borrow().iter().filter(|v| v.eq_value(needle)).count();
    Ok(Value::Int(n as i64))
}

pub fn push(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    let list = receiver(args)?;
    let [_, value] = args else {
        return Err(NativeError::new(ErrorKind::ArityError, format!("push() takes 1 argument, got {}", args.len() - 1)));
    };
    list.borrow_mut().push(value.clone());
    Ok(Value::Null)
}

pub fn pop(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    let list = receiver(args)?;
    if args.len() != 1 {
        return Err(NativeError::new(ErrorKind::ArityError, format!("pop() takes 0 arguments, got {}", args.len() - 1)));
    }
    list.borrow_mut().pop().ok_or_else(|| NativeError::new(ErrorKind::IndexError, "pop() from empty list"))
}

pub fn length(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    let list = receiver(args)?;
    if args.len() != 1 {
        return Err(NativeError::new(ErrorKind::ArityError, format!("length() takes 0 arguments, got {}", args.len() - 1)));
    }
    Ok(Value::Int(list.borrow().len() as i64))
}

pub fn method(name: &str) -> Option<BuiltinFunction> {
    let (name, func): (&'static str, crate::value::NativeFn) = match name {
        "index" => ("index", index),
        "count" => ("count", count),
        "push" => ("push", push),
        "pop" => ("pop", pop),
        "length" => ("length", length),
        _ => return None,
    };
    Some(BuiltinFunction { name, func })
}

/// Resolves a zero-based, negative-tolerant list index. Out of range is an
/// `IndexError`.
pub fn resolve_index(len: usize, idx: i64) -> Result<usize, NativeError> {
    let effective = if idx < 0 { idx + len as i64 } else { idx };
    if effective < 0 || effective as usize >= len {
        return Err(NativeError::new(ErrorKind::IndexError, format!("list index {idx} out of range")));
    }
    Ok(effective as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stdio::CollectingStdio;
    use std::cell::RefCell;

    fn list(vals: Vec<Value>) -> Value {
        Value::List(Rc::new(RefCell::new(vals)))
    }

    #[test]
    fn push_and_length() {
        let mut io = CollectingStdio::default();
        let l = list(vec![Value::Int(1)]);
        push(&mut io, &[l.clone(), Value::Int(2)]).unwrap();
        assert!(length(&mut io, &[l]).unwrap().eq_value(&Value::Int(2)));
    }

    #[test]
    fn count_matches_numeric_coercion() {
        let mut io = CollectingStdio::default();
        let l = list(vec![Value::Bool(false), Value::Bool(true), Value::Bool(true)]);
        assert!(count(&mut io, &[l, Value::Bool(true)]).unwrap().eq_value(&Value::Int(2)));
    }

    #[test]
    fn pop_empty_is_index_error() {
        let mut io = CollectingStdio::default();
        let err = pop(&mut io, &[list(vec![])]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::IndexError);
    }

    #[test]
    fn resolve_index_handles_negative() {
        assert_eq!(resolve_index(3, -1).unwrap(), 2);
        assert!(resolve_index(3, 3).is_err());
    }
}
