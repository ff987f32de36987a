use crate::error::ErrorKind;
use crate::stdio::Stdio;
use crate::value::{NativeError, Value};

// `and`/`or`/`not` are ordinary function calls like every other builtin, so
// the call machinery already evaluates both arguments before either of
// these runs: there is no short-circuit to implement here, by design
// (spec's own explicit design note).

pub fn and(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    if args.len() != 2 {
        return Err(NativeError::new(ErrorKind::ArityError, format!("and() takes 2 arguments, got {}", args.len())));
    }
    Ok(Value::Bool(args[0].is_truthy() && args[1].is_truthy()))
}

pub fn or(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    if args.len() != 2 {
        return Err(NativeError::new(ErrorKind::ArityError, format!("or() takes 2 arguments, got {}", args.len())));
    }
    Ok(Value::Bool(args[0].is_truthy() || args[1].is_truthy()))
}

pub fn not(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    if args.len() != 1 {
        return Err(NativeError::new(ErrorKind::ArityError, format!("not() takes 1 argument, got {}", args.len())));
    }
    Ok(Value::Bool(!args[0].is_truthy()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stdio::CollectingStdio;

    #[test]
    fn and_or_not_coerce_truthiness() {
        let mut io = CollectingStdio::default();
        assert!(and(&mut io, &[Value::Int(1), Value::Str(std::rc::Rc::from("x"))]).unwrap().is_truthy());
        assert!(!or(&mut io, &[Value::Int(0), Value::Bool(false)]).unwrap().is_truthy());
        assert!(not(&mut io, &[Value::Int(0)]).unwrap().is_truthy());
    }
}
