use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::ErrorKind;
use crate::stdio::Stdio;
use crate::value::{BuiltinFunction, DictKey, NativeError, Value};

fn receiver(args: &[Value]) -> Result<&Rc<std::cell::RefCell<IndexMap<DictKey, Value>>>, NativeError> {
    match args.first() {
        Some(Value::Dict(d)) => Ok(d),
        _ => Err(NativeError::new(ErrorKind::TypeError, "method receiver must be a dict")),
    }
}

fn key_of(v: &Value) -> Result<DictKey, NativeError> {
    v.dict_key().ok_or_else(|| NativeError::new(ErrorKind::TypeError, format!("unhashable type: {}", v.type_name())))
}

pub fn keys(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    let dict = receiver(args)?;
    if args.len() != 1 {
        return Err(NativeError::new(ErrorKind::ArityError, format!("keys() takes 0 arguments, got {}", args.len() - 1)));
    }
    let out: Vec<Value> = dict.borrow().keys().map(DictKey::to_value).collect();
    Ok(Value::List(Rc::new(std::cell::RefCell::new(out))))
}

pub fn values(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    let dict = receiver(args)?;
    if args.len() != 1 {
        return Err(NativeError::new(ErrorKind::ArityError, format!("values() takes 0 arguments, got {}", args.len() - 1)));
    }
    let out: Vec<Value> = dict.borrow().values().cloned().collect();
    Ok(Value::List(Rc::new(std::cell::RefCell::new(out))))
}

pub fn has(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    let dict = receiver(args)?;
    let [_, key] = args else {
        return Err(NativeError::new(ErrorKind::ArityError, format!("has() takes 1 argument, got {}", args.len() - 1)));
    };
    let key = key_of(key)?;
    Ok(Value::Bool(dict.borrow().contains_key(&key)))
}

pub fn remove(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    let dict = receiver(args)?;
    let [_, key] = args else {
        return Err(NativeError::new(ErrorKind::ArityError, format!("remove() takes 1 argument, got {}", args.len() - 1)));
    };
    let key = key_of(key)?;
    dict.borrow_mut().shift_remove(&key).ok_or_else(|| NativeError::new(ErrorKind::KeyError, "key not found"))?;
    Ok(Value::Null)
}

pub fn length(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    let dict = receiver(args)?;
    if args.len() != 1 {
        return Err(NativeError::new(ErrorKind::ArityError, format!("length() takes 0 arguments, got {}", args.len() - 1)));
    }
    Ok(Value::Int(dict.borrow().len() as i64))
}

pub fn method(name: &str) -> Option<BuiltinFunction> {
    let (name, func): (&'static str, crate::value::NativeFn) = match name {
        "keys" => ("keys", keys),
        "values" => ("values", values),
        "has" => ("has", has),
        "remove" => ("remove", remove),
        "length" => ("length", length),
        _ => return None,
    };
    Some(BuiltinFunction { name, func })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stdio::CollectingStdio;
    use std::cell::RefCell;

    fn dict_of(pairs: Vec<(Value, Value)>) -> Value {
        let mut map = IndexMap::new();
        for (k, v) in pairs {
            map.insert(k.dict_key().unwrap(), v);
        }
        Value::Dict(Rc::new(RefCell::new(map)))
    }

    #[test]
    fn keys_preserves_insertion_order() {
        let mut io = CollectingStdio::default();
        let d = dict_of(vec![
            (Value::Str(Rc::from("x")), Value::Int(1)),
            (Value::Str(Rc::from("y")), Value::Int(2)),
        ]);
        let ks = keys(&mut io, &[d]).unwrap();
        if let Value::List(l) = ks {
            let l = l.borrow();
            assert!(l[0].eq_value(&Value::Str(Rc::from("x"))));
            assert!(l[1].eq_value(&Value::Str(Rc::from("y"))));
        } else {
            panic!("expected list");
        }
    }

    #[test]
    fn remove_missing_key_is_key_error() {
        let mut io = CollectingStdio::default();
        let d = dict_of(vec![]);
        let err = remove(&mut io, &[d, Value::Str(Rc::from("missing"))]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::KeyError);
    }
}
