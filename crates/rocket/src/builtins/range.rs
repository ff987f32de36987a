use crate::error::ErrorKind;
use crate::stdio::Stdio;
use crate::value::{NativeError, Value};

fn as_int(name: &str, v: &Value) -> Result<i64, NativeError> {
    match v {
        Value::Int(n) => Ok(*n),
        other => Err(NativeError::new(
            ErrorKind::TypeError,
            format!("{name}() expects int arguments, got {}", other.type_name()),
        )),
    }
}

/// `range(n)` -> `[0, n)`, `range(a, b)` -> `[a, b)`, `range(a, b, step)` ->
/// `[a, b)` stepping by `step` (nonzero). Returns an opaque lazy `Range`
/// value rather than a materialized list.
pub fn range(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    match args {
        [n] => Ok(Value::Range(0, as_int("range", n)?, 1)),
        [a, b] => Ok(Value::Range(as_int("range", a)?, as_int("range", b)?, 1)),
        [a, b, step] => {
            let step = as_int("range", step)?;
            if step == 0 {
                return Err(NativeError::new(ErrorKind::ValueError, "range() step must not be 0"));
            }
            Ok(Value::Range(as_int("range", a)?, as_int("range", b)?, step))
        }
        _ => Err(NativeError::new(
            ErrorKind::ArityError,
            format!("range() takes 1, 2, or 3 arguments, got {}", args.len()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stdio::CollectingStdio;

    #[test]
    fn range_one_arg_starts_at_zero() {
        let mut io = CollectingStdio::default();
        assert!(range(&mut io, &[Value::Int(5)]).unwrap().eq_value(&Value::Range(0, 5, 1)));
    }

    #[test]
    fn range_zero_step_is_value_error() {
        let mut io = CollectingStdio::default();
        let err = range(&mut io, &[Value::Int(0), Value::Int(5), Value::Int(0)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValueError);
    }
}
