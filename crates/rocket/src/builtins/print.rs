use crate::stdio::Stdio;
use crate::value::{NativeError, Value};

/// Writes each argument's display form separated by a single space,
/// followed by a newline. Variadic; zero arguments just writes a blank line.
pub fn print(stdio: &mut dyn Stdio, args: &[Value]) -> Result<Value, NativeError> {
    let line: Vec<String> = args.iter().map(|v| v.display(false)).collect();
    stdio.write_line(&line.join(" "));
    Ok(Value::Null)
}
