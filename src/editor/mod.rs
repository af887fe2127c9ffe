//! Line-record text editor
//!
//! Opens a named file from the namespace (or an empty buffer if absent),
//! holds its content as bounded line records, and writes the whole buffer
//! back on `:w`. `:q` ends the session without implicit save.

use crate::console::Console;
use crate::error::{Result, ShellError};
use crate::fs::Namespace;

/// Maximum characters per line record; excess forces a new record
pub const MAX_LINE_LEN: usize = 80;

/// One editing session over a single target name
pub struct Editor {
    name: String,
    lines: Vec<String>,
}

impl Editor {
    /// Open `name` in the current directory of `fs`.
    ///
    /// An absent target starts with an empty buffer; a directory target
    /// fails with `IsADirectory` before any session state exists.
    pub fn open(fs: &Namespace, name: &str) -> Result<Self> {
        let lines = match fs.read_entry(fs.current(), name) {
            Ok(bytes) => split_records(&String::from_utf8_lossy(bytes)),
            Err(ShellError::NotFound(_)) => Vec::new(),
            Err(err) => return Err(err),
        };
        Ok(Self {
            name: name.to_string(),
            lines,
        })
    }

    /// Append typed input as line records, splitting overlong input
    pub fn append(&mut self, input: &str) {
        self.lines.extend(split_records(input));
    }

    /// Concatenate all records with single newline separators and replace
    /// the stored content wholesale.
    pub fn save(&self, fs: &mut Namespace) -> Result<usize> {
        let buffer = self.lines.join("\n");
        fs.write_entry(fs.current(), &self.name, buffer.as_bytes())?;
        Ok(buffer.len())
    }

    /// Current line records
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Run the interactive `:w`/`:q` loop
    pub fn run(&mut self, fs: &mut Namespace, console: &mut dyn Console) {
        console.write(&format!(
            "Editing '{}' ({} lines). ':w' saves, ':q' quits.\n",
            self.name,
            self.lines.len()
        ));
        for line in &self.lines {
            console.write(line);
            console.write("\n");
        }

        while let Some(input) = console.read_line() {
            match input.as_str() {
                ":q" => return,
                ":w" => match self.save(fs) {
                    Ok(bytes) => {
                        console.write(&format!("Wrote {} bytes to '{}'\n", bytes, self.name))
                    }
                    Err(err) => console.write(&format!("{}\n", err)),
                },
                _ => self.append(&input),
            }
        }
    }
}

/// Split text into line records on newlines, bounding each record at
/// `MAX_LINE_LEN` characters.
fn split_records(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut records = Vec::new();
    for line in text.split('\n') {
        if line.is_empty() {
            records.push(String::new());
            continue;
        }
        let chars: Vec<char> = line.chars().collect();
        for chunk in chars.chunks(MAX_LINE_LEN) {
            records.push(chunk.iter().collect());
        }
    }
    records
}
