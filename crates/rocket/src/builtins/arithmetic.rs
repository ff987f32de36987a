use crate::error::ErrorKind;
use crate::stdio::Stdio;
use crate::value::{NativeError, Value};

fn arity(name: &str, args: &[Value], n: usize) -> Result<(), NativeError> {
    if args.len() != n {
        return Err(NativeError::new(
            ErrorKind::ArityError,
            format!("{name}() takes {n} argument(s), got {}", args.len()),
        ));
    }
    Ok(())
}

enum Num {
    Int(i64),
    Float(f64),
}

fn as_num(name: &str, v: &Value) -> Result<Num, NativeError> {
    match v {
        Value::Int(n) => Ok(Num::Int(*n)),
        Value::Float(f) => Ok(Num::Float(*f)),
        other => Err(NativeError::new(
            ErrorKind::TypeError,
            format!("{name}() expects numeric arguments, got {}", other.type_name()),
        )),
    }
}

fn numeric_binop(
    name: &str,
    args: &[Value],
    int_op: impl Fn(i64, i64) -> Option<i64>,
    float_op: impl Fn(f64, f64) -> f64,
) -> Result<Value, NativeError> {
    arity(name, args, 2)?;
    match (as_num(name, &args[0])?, as_num(name, &args[1])?) {
        (Num::Int(a), Num::Int(b)) => int_op(a, b)
            .map(Value::Int)
            .ok_or_else(|| NativeError::new(ErrorKind::ValueError, format!("{name}() overflowed"))),
        (a, b) => {
            let (a, b) = (num_as_f64(a), num_as_f64(b));
            Ok(Value::Float(float_op(a, b)))
        }
    }
}

fn num_as_f64(n: Num) -> f64 {
    match n {
        Num::Int(i) => i as f64,
        Num::Float(f) => f,
    }
}

pub fn add(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    numeric_binop("add", args, |a, b| a.checked_add(b), |a, b| a + b)
}

pub fn sub(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    numeric_binop("sub", args, |a, b| a.checked_sub(b), |a, b| a - b)
}

pub fn mul(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    arity("mul", args, 2)?;
    // list/str repetition: either operand order, the other must be an Int.
    match (&args[0], &args[1]) {
        (Value::List(list), Value::Int(n)) | (Value::Int(n), Value::List(list)) => {
            let n = (*n).max(0) as usize;
            let source = list.borrow();
            let mut out = Vec::with_capacity(source.len() * n);
            for _ in 0..n {
                out.extend(source.iter().cloned());
            }
            return Ok(Value::List(std::rc::Rc::new(std::cell::RefCell::new(out))));
        }
        (Value::Str(s), Value::Int(n)) | (Value::Int(n), Value::Str(s)) => {
            let n = (*n).max(0) as usize;
            return Ok(Value::Str(std::rc::Rc::from(s.repeat(n).as_str())));
        }
        _ => {}
    }
    numeric_binop("mul", args, |a, b| a.checked_mul(b), |a, b| a * b)
}

pub fn div(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    arity("div", args, 2)?;
    match (as_num("div", &args[0])?, as_num("div", &args[1])?) {
        (Num::Int(a), Num::Int(b)) => {
            if b == 0 {
                return Err(NativeError::new(ErrorKind::ValueError, "division by zero"));
            }
            Ok(Value::Int(a / b))
        }
        (a, b) => {
            let (a, b) = (num_as_f64(a), num_as_f64(b));
            if b == 0.0 {
                return Err(NativeError::new(ErrorKind::ValueError, "division by zero"));
            }
            Ok(Value::Float(a / b))
        }
    }
}

pub fn modulo(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    arity("mod", args, 2)?;
    match (as_num("mod", &args[0])?, as_num("mod", &args[1])?) {
        (Num::Int(a), Num::Int(b)) => {
            if b == 0 {
                return Err(NativeError::new(ErrorKind::ValueError, "modulo by zero"));
            }
            Ok(Value::Int(a % b))
        }
        (a, b) => {
            let (a, b) = (num_as_f64(a), num_as_f64(b));
            if b == 0.0 {
                return Err(NativeError::new(ErrorKind::ValueError, "modulo by zero"));
            }
            Ok(Value::Float(a % b))
        }
    }
}

pub fn pow(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    arity("pow", args, 2)?;
    match (as_num("pow", &args[0])?, as_num("pow", &args[1])?) {
        (Num::Int(a), Num::Int(b)) if b >= 0 => {
            let exp = u32::try_from(b).map_err(|_| NativeError::new(ErrorKind::ValueError, "exponent too large"))?;
            a.checked_pow(exp)
                .map(Value::Int)
                .ok_or_else(|| NativeError::new(ErrorKind::ValueError, "pow() overflowed"))
        }
        (a, b) => {
            let (a, b) = (num_as_f64(a), num_as_f64(b));
            Ok(Value::Float(a.powf(b)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stdio::CollectingStdio;

    #[test]
    fn add_ints() {
        let mut io = CollectingStdio::default();
        let v = add(&mut io, &[Value::Int(1), Value::Int(2)]).unwrap();
        assert!(v.eq_value(&Value::Int(3)));
    }

    #[test]
    fn mixed_int_float_promotes_to_float() {
        let mut io = CollectingStdio::default();
        let v = add(&mut io, &[Value::Int(1), Value::Float(0.5)]).unwrap();
        assert!(v.eq_value(&Value::Float(1.5)));
    }

    #[test]
    fn mul_replicates_lists() {
        let mut io = CollectingStdio::default();
        let list = Value::List(std::rc::Rc::new(std::cell::RefCell::new(vec![Value::Bool(false)])));
        let v = mul(&mut io, &[list, Value::Int(3)]).unwrap();
        if let Value::List(out) = v {
            assert_eq!(out.borrow().len(), 3);
        } else {
            panic!("expected list");
        }
    }

    #[test]
    fn div_by_zero_is_value_error() {
        let mut io = CollectingStdio::default();
        let err = div(&mut io, &[Value::Int(1), Value::Int(0)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValueError);
    }

    #[test]
    fn int_div_int_truncates_toward_zero_and_stays_int() {
        let mut io = CollectingStdio::default();
        let v = div(&mut io, &[Value::Int(7), Value::Int(2)]).unwrap();
        assert!(v.eq_value(&Value::Int(3)));
        let v = div(&mut io, &[Value::Int(-7), Value::Int(2)]).unwrap();
        assert!(v.eq_value(&Value::Int(-3)));
    }
}
