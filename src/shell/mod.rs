//! Interactive command shell
//!
//! Reads one command line to completion, invokes at most one namespace or
//! allocator operation chain synchronously, renders the outcome as text,
//! and only then reads the next line. A failure never ends the session.

use crate::arena::Arena;
use crate::calc;
use crate::console::Console;
use crate::editor::Editor;
use crate::error::Result;
use crate::fs::{EntryKind, Namespace};
use crate::games;

const BANNER: &str = r"
    _   ___           __
   / | / (_)___ ___  / /_  __  _______
  /  |/ / / __ `__ \/ __ \/ / / / ___/
 / /|  / / / / / / / /_/ / /_/ (__  )
/_/ |_/_/_/ /_/ /_/_.___/\__,_/____/

Welcome to NimbusShell!
";

/// The shell session: owns the namespace (which owns the arena) and the
/// command dispatch loop.
pub struct Shell {
    fs: Namespace,
}

impl Shell {
    /// Create a shell over a fresh namespace backed by `pool_size` bytes
    pub fn new(pool_size: usize) -> Self {
        Self {
            fs: Namespace::new(Arena::new(pool_size)),
        }
    }

    /// Borrow the underlying namespace
    pub fn namespace(&self) -> &Namespace {
        &self.fs
    }

    /// Print the welcome banner
    pub fn banner(&self, console: &mut dyn Console) {
        console.write(BANNER);
    }

    /// Run the prompt loop until `exit`/`shutdown` or end of input
    pub fn run(&mut self, console: &mut dyn Console) {
        loop {
            console.write(&format!("root@nimbus {}> ", self.fs.path()));
            let line = match console.read_line() {
                Some(line) => line,
                None => return,
            };
            if !self.execute(console, line.trim()) {
                return;
            }
        }
    }

    /// Execute one command line; returns false when the session should end
    pub fn execute(&mut self, console: &mut dyn Console, line: &str) -> bool {
        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "exit" | "shutdown" => {
                console.write("Shutting down NimbusShell...\n");
                return false;
            }
            "help" => self.help(console),
            "clear" => console.write("\x1b[2J\x1b[H"),
            "banner" => self.banner(console),
            "echo" => console.write(&format!("{}\n", argument)),
            "whoami" => console.write("root\n"),
            "hostname" => console.write("nimbus\n"),
            "uname" => self.uname(console),
            "mem" => self.mem(console),
            "calc" => match calc::evaluate(argument) {
                Ok(result) => console.write(&format!("{}\n", result)),
                Err(err) => console.write(&format!("{}\n", err)),
            },
            "guess" => games::guess(console),
            "mkdir" => self.report(console, self.usage_checked(argument, "mkdir"), |shell, name| {
                shell
                    .fs
                    .create_entry(shell.fs.current(), name, EntryKind::Directory, b"")
                    .map(|_| String::new())
            }),
            "touch" => self.report(console, self.usage_checked(argument, "touch"), |shell, name| {
                shell
                    .fs
                    .create_entry(shell.fs.current(), name, EntryKind::File, b"")
                    .map(|_| String::new())
            }),
            "cat" => self.report(console, self.usage_checked(argument, "cat"), |shell, name| {
                let bytes = shell.fs.read_entry(shell.fs.current(), name)?;
                let mut text = String::from_utf8_lossy(bytes).into_owned();
                if !text.is_empty() && !text.ends_with('\n') {
                    text.push('\n');
                }
                Ok(text)
            }),
            "ls" => {
                let mut listing = String::new();
                for (name, kind) in self.fs.list(self.fs.current()) {
                    listing.push_str(name);
                    if kind == EntryKind::Directory {
                        listing.push('/');
                    }
                    listing.push('\n');
                }
                console.write(&listing);
            }
            "cd" => self.report(console, self.usage_checked(argument, "cd"), |shell, name| {
                shell.fs.change_directory(name).map(|_| String::new())
            }),
            "edit" => match self.usage_checked(argument, "edit") {
                Err(usage) => console.write(&usage),
                Ok(name) => match Editor::open(&self.fs, name) {
                    Ok(mut editor) => editor.run(&mut self.fs, console),
                    Err(err) => console.write(&format!("{}\n", err)),
                },
            },
            _ => console.write(&format!("Unknown command: {}\n", line)),
        }
        true
    }

    /// Require a non-empty argument, or produce a usage line
    fn usage_checked<'a>(
        &self,
        argument: &'a str,
        command: &str,
    ) -> std::result::Result<&'a str, String> {
        if argument.is_empty() {
            Err(format!("Usage: {} <name>\n", command))
        } else {
            Ok(argument)
        }
    }

    /// Run a namespace operation and render its outcome
    fn report(
        &mut self,
        console: &mut dyn Console,
        argument: std::result::Result<&str, String>,
        op: impl FnOnce(&mut Self, &str) -> Result<String>,
    ) {
        match argument {
            Err(usage) => console.write(&usage),
            Ok(name) => match op(self, name) {
                Ok(text) => console.write(&text),
                Err(err) => console.write(&format!("{}\n", err)),
            },
        }
    }

    fn help(&self, console: &mut dyn Console) {
        console.write("Available commands:\n");
        console.write("  ls              - List the current directory\n");
        console.write("  cd <name|..>    - Change directory\n");
        console.write("  mkdir <name>    - Create a directory\n");
        console.write("  touch <name>    - Create an empty file\n");
        console.write("  cat <name>      - Show a file's content\n");
        console.write("  edit <name>     - Edit a file (':w' saves, ':q' quits)\n");
        console.write("  echo <text>     - Display the text\n");
        console.write("  calc <expr>     - Basic calculator\n");
        console.write("  guess           - Guess-the-number game\n");
        console.write("  mem             - Memory pool statistics\n");
        console.write("  clear           - Clear the screen\n");
        console.write("  banner          - Display the banner\n");
        console.write("  whoami          - Display current user\n");
        console.write("  hostname        - Display system hostname\n");
        console.write("  uname           - Display system information\n");
        console.write("  help            - Show this help message\n");
        console.write("  exit            - End the session\n");
    }

    fn uname(&self, console: &mut dyn Console) {
        let (capacity, _, _) = self.fs.arena_stats();
        console.write("NimbusShell v0.1.0\n");
        console.write("In-memory hierarchical namespace over a fixed arena\n");
        console.write(&format!("Memory: {} byte pool\n", capacity));
    }

    fn mem(&self, console: &mut dyn Console) {
        let (capacity, carved, available) = self.fs.arena_stats();
        console.write(&format!("pool:      {} bytes\n", capacity));
        console.write(&format!("carved:    {} bytes\n", carved));
        console.write(&format!("available: {} bytes\n", available));
    }
}
