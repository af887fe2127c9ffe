//! NimbusShell
//!
//! A minimal single-address-space operating environment: an interactive
//! command shell layered over an in-memory hierarchical file namespace,
//! backed by a private fixed-pool arena allocator. All state is volatile
//! and scoped to the running process; there is no persistence.

pub mod arena;
pub mod calc;
pub mod console;
pub mod editor;
pub mod fs;
pub mod games;
pub mod shell;

// Re-export core types for convenience
pub use crate::error::{Result, ShellError};
pub use arena::{Arena, BlockHandle};
pub use console::{Console, ScriptedConsole, StdConsole};
pub use fs::{DirId, EntryKind, Namespace};
pub use shell::Shell;

/// Core error handling types for the shell environment
pub mod error {
    use std::fmt;

    /// Result type for namespace and allocator operations
    pub type Result<T> = std::result::Result<T, ShellError>;

    /// Failure outcomes of the core operations.
    ///
    /// Every operation returns a discriminated outcome; none of them
    /// terminate the process. The shell renders a failure as text and
    /// the session continues.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ShellError {
        // Namespace errors
        AlreadyExists(String),
        DirectoryFull(String),
        NotFound(String),
        NotADirectory(String),
        IsADirectory(String),
        AtRoot,

        // Allocator errors
        OutOfMemory,
        InvalidPointer,
    }

    impl fmt::Display for ShellError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                ShellError::AlreadyExists(name) => write!(f, "{}: already exists", name),
                ShellError::DirectoryFull(name) => write!(f, "{}: directory full", name),
                ShellError::NotFound(name) => write!(f, "{}: not found", name),
                ShellError::NotADirectory(name) => write!(f, "{}: not a directory", name),
                ShellError::IsADirectory(name) => write!(f, "{}: is a directory", name),
                ShellError::AtRoot => write!(f, "already at root directory"),
                ShellError::OutOfMemory => write!(f, "out of memory"),
                ShellError::InvalidPointer => write!(f, "invalid pointer"),
            }
        }
    }

    impl std::error::Error for ShellError {}
}
