use std::rc::Rc;

use crate::error::ErrorKind;
use crate::stdio::Stdio;
use crate::value::{NativeError, Value};

/// `format(template, args...)` replaces each `{}` placeholder in `template`
/// with the display form of the next argument, in order. Fewer arguments
/// than placeholders is a `ValueError`; extra arguments are simply unused.
pub fn format(_stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    let Some((template, rest)) = args.split_first() else {
        return Err(NativeError::new(ErrorKind::ArityError, "format() takes at least 1 argument, got 0"));
    };
    let Value::Str(template) = template else {
        return Err(NativeError::new(
            ErrorKind::TypeError,
            format!("format() expects a str template, got {}", template.type_name()),
        ));
    };

    let mut out = String::new();
    let mut chars = template.chars().peekable();
    let mut rest = rest.iter();
    while let Some(c) = chars.next() {
        if c == '{' && chars.peek() == Some(&'}') {
            chars.next();
            match rest.next() {
                Some(v) => out.push_str(&v.display(false)),
                None => return Err(NativeError::new(ErrorKind::ValueError, "format() has more placeholders than arguments")),
            }
        } else {
            out.push(c);
        }
    }
    Ok(Value::Str(Rc::from(out.as_str())))
}
