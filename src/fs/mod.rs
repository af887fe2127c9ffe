//! Hierarchical file namespace
//!
//! Maintains the directory tree and mediates all entry creation, lookup,
//! read, write, listing, and directory traversal. Directory nodes and file
//! content buffers are both charged against the arena allocator; nothing
//! in the tree is ever deleted, so both live for the process lifetime.

use crate::arena::{Arena, BlockHandle};
use crate::error::{Result, ShellError};

/// Maximum entries a single directory can hold
pub const MAX_DIR_ENTRIES: usize = 16;

/// Entry names are truncated to this many characters
pub const MAX_NAME_LEN: usize = 32;

/// Arena charge for one directory node
pub const DIR_NODE_SIZE: usize = 64;

/// Opaque reference to a directory in the tree.
///
/// Also serves as the non-owning parent back-reference, so the tree never
/// holds an owning cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirId(usize);

/// What kind of object an entry names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// Lightweight reference to a just-created entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRef {
    pub dir: DirId,
    pub slot: usize,
}

/// Owning payload of an entry: a file's content buffer or a child directory
#[derive(Debug, Clone, PartialEq, Eq)]
enum EntryPayload {
    File { content: BlockHandle, len: usize },
    Directory(DirId),
}

/// A named slot inside a directory
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: String,
    payload: EntryPayload,
}

impl Entry {
    fn kind(&self) -> EntryKind {
        match self.payload {
            EntryPayload::File { .. } => EntryKind::File,
            EntryPayload::Directory(_) => EntryKind::Directory,
        }
    }
}

/// One directory node: bounded entry list in insertion order plus a weak
/// back-reference to the parent (None only for root).
#[derive(Debug, Clone, PartialEq, Eq)]
struct Directory {
    name: String,
    parent: Option<DirId>,
    entries: Vec<Entry>,
}

/// The directory tree rooted at `/`, plus the current-directory cursor.
///
/// This is the explicit session object the shell owns and passes into
/// every call; there are no hidden statics. Directories live in a slab
/// indexed by `DirId` and are never removed, so every `DirId` stays valid
/// for the process lifetime.
#[derive(Debug)]
pub struct Namespace {
    arena: Arena,
    dirs: Vec<Directory>,
    current: DirId,
}

impl Namespace {
    /// Create a namespace containing only the root directory, with the
    /// cursor at root. Root is created before any allocation and is not
    /// charged against the arena.
    pub fn new(arena: Arena) -> Self {
        Self {
            arena,
            dirs: vec![Directory {
                name: String::new(),
                parent: None,
                entries: Vec::new(),
            }],
            current: DirId(0),
        }
    }

    /// The root directory
    pub fn root(&self) -> DirId {
        DirId(0)
    }

    /// The current-directory cursor
    pub fn current(&self) -> DirId {
        self.current
    }

    /// Pool statistics of the backing arena: (capacity, carved, available)
    pub fn arena_stats(&self) -> (usize, usize, usize) {
        (
            self.arena.capacity(),
            self.arena.carved(),
            self.arena.available(),
        )
    }

    /// Create a new entry in `dir`.
    ///
    /// Checks run before any allocation, so the directory's entry list is
    /// exactly as before the call on every failure path: `AlreadyExists`
    /// for a duplicate name (exact, case-sensitive), `DirectoryFull` at
    /// capacity, and `OutOfMemory` propagated untouched from the arena.
    /// Files get a buffer of `content.len() + 1` bytes holding the content
    /// and a trailing NUL; directories additionally charge one node-sized
    /// block, which is never released since no directory deletion exists.
    pub fn create_entry(
        &mut self,
        dir: DirId,
        name: &str,
        kind: EntryKind,
        content: &[u8],
    ) -> Result<EntryRef> {
        let name = bounded_name(name);
        if self.lookup(dir, &name).is_some() {
            return Err(ShellError::AlreadyExists(name));
        }
        if self.dirs[dir.0].entries.len() >= MAX_DIR_ENTRIES {
            return Err(ShellError::DirectoryFull(name));
        }

        let payload = match kind {
            EntryKind::File => {
                let content_handle = self.alloc_file_buffer(content)?;
                EntryPayload::File {
                    content: content_handle,
                    len: content.len(),
                }
            }
            EntryKind::Directory => {
                // The node's backing block is never released; the handle is
                // not retained because no operation can free a directory.
                self.arena.allocate(DIR_NODE_SIZE as isize)?;
                let child = DirId(self.dirs.len());
                self.dirs.push(Directory {
                    name: name.clone(),
                    parent: Some(dir),
                    entries: Vec::new(),
                });
                EntryPayload::Directory(child)
            }
        };

        let entries = &mut self.dirs[dir.0].entries;
        let slot = entries.len();
        entries.push(Entry { name, payload });
        Ok(EntryRef { dir, slot })
    }

    /// Replace the content of the file named `name` in `dir`, creating it
    /// if absent.
    ///
    /// An existing file's buffer is replaced wholesale: the new buffer is
    /// allocated and installed first, then the previous buffer is released
    /// to the arena, so an `OutOfMemory` failure leaves the old content
    /// intact. Never an in-place update.
    pub fn write_entry(&mut self, dir: DirId, name: &str, content: &[u8]) -> Result<()> {
        let name = bounded_name(name);
        let slot = match self.lookup(dir, &name) {
            Some(slot) => slot,
            None => {
                self.create_entry(dir, &name, EntryKind::File, content)?;
                return Ok(());
            }
        };

        match self.dirs[dir.0].entries[slot].payload {
            EntryPayload::Directory(_) => Err(ShellError::IsADirectory(name)),
            EntryPayload::File { content: old, .. } => {
                let new = self.alloc_file_buffer(content)?;
                self.dirs[dir.0].entries[slot].payload = EntryPayload::File {
                    content: new,
                    len: content.len(),
                };
                self.arena.free(old);
                Ok(())
            }
        }
    }

    /// Read the content of the file named `name` in `dir`
    pub fn read_entry(&self, dir: DirId, name: &str) -> Result<&[u8]> {
        let name = bounded_name(name);
        let slot = self
            .lookup(dir, &name)
            .ok_or_else(|| ShellError::NotFound(name.clone()))?;
        match self.dirs[dir.0].entries[slot].payload {
            EntryPayload::Directory(_) => Err(ShellError::IsADirectory(name)),
            EntryPayload::File { content, len } => self.arena.read(content, len),
        }
    }

    /// List the entries of `dir` in insertion order.
    ///
    /// The sequence is recomputed fresh on each call; no iteration cursor
    /// survives between calls.
    pub fn list(&self, dir: DirId) -> impl Iterator<Item = (&str, EntryKind)> + '_ {
        self.dirs[dir.0]
            .entries
            .iter()
            .map(|entry| (entry.name.as_str(), entry.kind()))
    }

    /// Move the cursor to `target` and return the new cursor.
    ///
    /// `".."` moves to the stored parent, failing with `AtRoot` when the
    /// current directory has none. Any other target must name an existing
    /// directory entry in the current directory.
    pub fn change_directory(&mut self, target: &str) -> Result<DirId> {
        if target == ".." {
            let parent = self.dirs[self.current.0].parent.ok_or(ShellError::AtRoot)?;
            self.current = parent;
            return Ok(parent);
        }

        let name = bounded_name(target);
        let slot = self
            .lookup(self.current, &name)
            .ok_or_else(|| ShellError::NotFound(name.clone()))?;
        match self.dirs[self.current.0].entries[slot].payload {
            EntryPayload::File { .. } => Err(ShellError::NotADirectory(name)),
            EntryPayload::Directory(child) => {
                self.current = child;
                Ok(child)
            }
        }
    }

    /// Absolute path of the current directory, `/` for root
    pub fn path(&self) -> String {
        let mut segments = Vec::new();
        let mut walk = self.current;
        while let Some(parent) = self.dirs[walk.0].parent {
            segments.push(self.dirs[walk.0].name.as_str());
            walk = parent;
        }
        if segments.is_empty() {
            return "/".to_string();
        }
        let mut path = String::new();
        for segment in segments.iter().rev() {
            path.push('/');
            path.push_str(segment);
        }
        path
    }

    /// Find the slot of `name` in `dir`; exact, case-sensitive match
    fn lookup(&self, dir: DirId, name: &str) -> Option<usize> {
        self.dirs[dir.0]
            .entries
            .iter()
            .position(|entry| entry.name == name)
    }

    /// Allocate and fill a file buffer: content plus trailing NUL
    fn alloc_file_buffer(&mut self, content: &[u8]) -> Result<BlockHandle> {
        let handle = self.arena.allocate(content.len() as isize + 1)?;
        let mut bytes = Vec::with_capacity(content.len() + 1);
        bytes.extend_from_slice(content);
        bytes.push(0);
        self.arena.write(handle, &bytes)?;
        Ok(handle)
    }
}

/// Truncate a name to `MAX_NAME_LEN` characters, the behavior a
/// fixed-capacity name field would give.
fn bounded_name(name: &str) -> String {
    name.chars().take(MAX_NAME_LEN).collect()
}
