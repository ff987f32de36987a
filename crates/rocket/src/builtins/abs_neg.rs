use crate::error::ErrorKind;
use crate::stdio::Stdio;
use crate::value::{NativeError, Value};

pub fn abs(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    match args {
        [Value::Int(n)] => Ok(Value::Int(n.abs())),
        [Value::Float(f)] => Ok(Value::Float(f.abs())),
        [other] => Err(NativeError::new(
            ErrorKind::TypeError,
            format!("abs() expects a numeric argument, got {}", other.type_name()),
        )),
        _ => Err(NativeError::new(ErrorKind::ArityError, format!("abs() takes 1 argument, got {}", args.len()))),
    }
}

pub fn neg(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    match args {
        [Value::Int(n)] => Ok(Value::Int(-n)),
        [Value::Float(f)] => Ok(Value::Float(-f)),
        [other] => Err(NativeError::new(
            ErrorKind::TypeError,
            format!("neg() expects a numeric argument, got {}", other.type_name()),
        )),
        _ => Err(NativeError::new(ErrorKind::ArityError, format!("neg() takes 1 argument, got {}", args.len()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stdio::CollectingStdio;

    #[test]
    fn abs_and_neg() {
        let mut io = CollectingStdio::default();
        assert!(abs(&mut io, &[Value::Int(-3)]).unwrap().eq_value(&Value::Int(3)));
        assert!(neg(&mut io, &[Value::Int(3)]).unwrap().eq_value(&Value::Int(-3)));
    }
}
