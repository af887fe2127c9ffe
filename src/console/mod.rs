//! Console interface for the shell
//!
//! The shell and editor report outcomes through `write` and block on
//! `read_line`; everything behind this trait is presentation glue.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Text console: blocking line input, unbuffered text output
pub trait Console {
    /// Write text to the console
    fn write(&mut self, text: &str);

    /// Read one line of input, without the trailing newline.
    /// Returns None when input is exhausted.
    fn read_line(&mut self) -> Option<String>;
}

/// Console over process stdin/stdout
pub struct StdConsole;

impl StdConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for StdConsole {
    fn write(&mut self, text: &str) {
        print!("{}", text);
        let _ = io::stdout().flush();
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
        }
    }
}

/// Console with queued input lines and captured output, used by tests
/// and demos to drive whole sessions.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    output: String,
}

impl ScriptedConsole {
    /// Create a scripted console fed with the given input lines
    pub fn with_input(lines: &[&str]) -> Self {
        Self {
            input: lines.iter().map(|line| line.to_string()).collect(),
            output: String::new(),
        }
    }

    /// Everything written to the console so far
    pub fn output(&self) -> &str {
        &self.output
    }
}

impl Console for ScriptedConsole {
    fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn read_line(&mut self) -> Option<String> {
        self.input.pop_front()
    }
}
