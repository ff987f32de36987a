use crate::error::ErrorKind;
use crate::stdio::Stdio;
use crate::value::{NativeError, Value};

fn as_str<'a>(name: &str, v: &'a Value) -> Result<&'a str, NativeError> {
    match v {
        Value::Str(s) => Ok(s),
        other => Err(NativeError::new(
            ErrorKind::TypeError,
            format!("{name}() expects a str argument, got {}", other.type_name()),
        )),
    }
}

pub fn parse_int(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    match args {
        [v] => as_str("parse_int", v)?
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| NativeError::new(ErrorKind::ValueError, format!("invalid int literal: {v}"))),
        _ => Err(NativeError::new(ErrorKind::ArityError, format!("parse_int() takes 1 argument, got {}", args.len()))),
    }
}

pub fn parse_float(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    match args {
        [v] => as_str("parse_float", v)?
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| NativeError::new(ErrorKind::ValueError, format!("invalid float literal: {v}"))),
        _ => Err(NativeError::new(ErrorKind::ArityError, format!("parse_float() takes 1 argument, got {}", args.len()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stdio::CollectingStdio;
    use std::rc::Rc;

    #[test]
    fn parses_int_and_float() {
        let mut io = CollectingStdio::default();
        assert!(parse_int(&mut io, &[Value::Str(Rc::from("42"))]).unwrap().eq_value(&Value::Int(42)));
        assert!(parse_float(&mut io, &[Value::Str(Rc::from("3.5"))]).unwrap().eq_value(&Value::Float(3.5)));
    }

    #[test]
    fn invalid_literal_is_value_error() {
        let mut io = CollectingStdio::default();
        let err = parse_int(&mut io, &[Value::Str(Rc::from("abc"))]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValueError);
    }
}
