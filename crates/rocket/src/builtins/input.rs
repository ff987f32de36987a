use crate::error::ErrorKind;
use crate::stdio::Stdio;
use crate::value::{NativeError, Value};

/// Writes an optional prompt, then reads one line from the input source.
/// Returns `null` at end of input (no trailing newline to strip, since
/// there is nothing left to read).
pub fn input(stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    match args {
        [] => {}
        [Value::Str(prompt)] => stdio.write_str(prompt),
        [other] => {
            return Err(NativeError::new(
                ErrorKind::TypeError,
                format!("input() expects a str prompt, got {}", other.type_name()),
            ));
        }
        _ => return Err(NativeError::new(ErrorKind::ArityError, format!("input() takes 0 or 1 arguments, got {}", args.len()))),
    }
    Ok(match stdio.read_line() {
        Some(line) => Value::Str(std::rc::Rc::from(line.as_str())),
        None => Value::Null,
    })
}
