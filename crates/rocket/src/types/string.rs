use std::rc::Rc;

use crate::error::ErrorKind;
use crate::stdio::Stdio;
use crate::value::{BuiltinFunction, NativeError, Value};

fn receiver<'a>(args: &'a [Value]) -> Result<&'a Rc<str>, NativeError> {
    match args.first() {
        Some(Value::Str(s)) => Ok(s),
        _ => Err(NativeError::new(ErrorKind::TypeError, "method receiver must be a str")),
    }
}

pub fn split(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    let s = receiver(args)?;
    let [_, sep] = args else {
        return Err(NativeError::new(ErrorKind::ArityError, format!("split() takes 1 argument, got {}", args.len() - 1)));
    };
    let Value::Str(sep) = sep else {
        return Err(NativeError::new(ErrorKind::TypeError, "split() separator must be a str"));
    };
    let parts: Vec<Value> = if sep.is_empty() {
        s.chars().map(|c| Value::Str(Rc::from(c.to_string().as_str()))).collect()
    } else {
        s.split(sep.as_ref()).map(|p| Value::Str(Rc::from(p))).collect()
    };
    Ok(Value::List(Rc::new(std::cell::RefCell::new(parts))))
}

pub fn length(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    let s = receiver(args)?;
    if args.len() != 1 {
        return Err(NativeError::new(ErrorKind::ArityError, format!("length() takes 0 arguments, got {}", args.len() - 1)));
    }
    Ok(Value::Int(s.chars().count() as i64))
}

pub fn upper(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    let s = receiver(args)?;
    if args.len() != 1 {
        return Err(NativeError::new(ErrorKind::ArityError, format!("upper() takes 0 arguments, got {}", args.len() - 1)));
    }
    Ok(Value::Str(Rc::from(s.to_uppercase().as_str())))
}

pub fn lower(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    let s = receiver(args)?;
    if args.len() != 1 {
        return Err(NativeError::new(ErrorKind::ArityError, format!("lower() takes 0 arguments, got {}", args.len() - 1)));
    }
    Ok(Value::Str(Rc::from(s.to_lowercase().as_str())))
}

pub fn replace(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    let s = receiver(args)?;
    let [_, old, new] = args else {
        return Err(NativeError::new(ErrorKind::ArityError, format!("replace() takes 2 arguments, got {}", args.len() - 1)));
    };
    let (Value::Str(old), Value::Str(new)) = (old, new) else {
        return Err(NativeError::new(ErrorKind::TypeError, "replace() arguments must be str"));
    };
    Ok(Value::Str(Rc::from(s.replace(old.as_ref(), new).as_str())))
}

pub fn method(name: &str) -> Option<BuiltinFunction> {
    let (name, func): (&'static str, crate::value::NativeFn) = match name {
        "split" => ("split", split),
        "length" => ("length", length),
        "upper" => ("upper", upper),
        "lower" => ("lower", lower),
        "replace" => ("replace", replace),
        _ => return None,
    };
    Some(BuiltinFunction { name, func })
}
