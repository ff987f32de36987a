use std::io::{self, BufRead, Write};

/// Abstracts the `print`/`input` builtins' destination and source, so tests
/// can capture output and feed input without touching the real process
/// streams.
pub trait Stdio {
    fn write_line(&mut self, line: &str);
    /// Writes text with no trailing newline, for `input()`'s prompt.
    fn write_str(&mut self, text: &str);
    fn read_line(&mut self) -> Option<String>;
}

/// Talks to the real process stdout/stdin.
#[derive(Debug, Default)]
pub struct RealStdio;

impl Stdio for RealStdio {
    fn write_line(&mut self, line: &str) {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(line.as_bytes());
        let _ = stdout.write_all(b"\n");
        let _ = stdout.flush();
    }

    fn write_str(&mut self, text: &str) {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Some(line)
            }
            Err(_) => None,
        }
    }
}

/// An in-memory `Stdio` for tests: collects every byte written to "stdout"
/// into a single buffer, and yields input lines from a preloaded queue.
#[derive(Debug, Default)]
pub struct CollectingStdio {
    pub output: String,
    input: std::collections::VecDeque<String>,
}

impl CollectingStdio {
    pub fn with_input(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { output: String::new(), input: lines.into_iter().map(Into::into).collect() }
    }
}

impl Stdio for CollectingStdio {
    fn write_line(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }

    fn write_str(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn read_line(&mut self) -> Option<String> {
        self.input.pop_front()
    }
}
