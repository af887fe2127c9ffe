//! Arena allocator for the shell environment
//!
//! Carves variable-length byte regions out of one fixed-capacity pool and
//! allows them to be returned. Every file buffer and directory node in the
//! namespace is backed by this arena.

use crate::error::{Result, ShellError};

/// Default pool capacity handed to `Shell::new`
pub const POOL_SIZE: usize = 64 * 1024;

/// Bytes of hidden validity marker preceding every user region
pub const MARKER_SIZE: usize = 4;

/// Marker pattern present only while a block is in use
const MARKER_ALLOCATED: [u8; MARKER_SIZE] = [0xA1, 0x10, 0xCA, 0x7E];

/// Opaque handle to an allocated region.
///
/// The raw pool offset never crosses the arena boundary; callers resolve
/// handles through `read`/`write`/`free`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHandle(usize);

impl BlockHandle {
    /// Forge a handle that was never returned by `allocate`. Test-only:
    /// exists so the containment behavior of `free` can be exercised.
    #[cfg(test)]
    fn forged(offset: usize) -> Self {
        BlockHandle(offset)
    }
}

/// Bookkeeping record for one carved region.
///
/// `offset` addresses the validity marker; the user region starts
/// `MARKER_SIZE` bytes later. The list is kept in address order, so the
/// element after a block is its forward-link successor. A block's address
/// is carved once and never relocated.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Block {
    offset: usize,
    size: usize,
    free: bool,
}

impl Block {
    fn user_offset(&self) -> usize {
        self.offset + MARKER_SIZE
    }
}

/// Fixed-pool allocator with first-fit reuse and single-pass coalescing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arena {
    pool: Vec<u8>,
    /// Every block ever carved, in address order
    blocks: Vec<Block>,
    /// Carve boundary; pool bytes at and above it are untouched
    brk: usize,
}

impl Arena {
    /// Create an arena over a zeroed pool of `capacity` bytes
    pub fn new(capacity: usize) -> Self {
        Self {
            pool: vec![0; capacity],
            blocks: Vec::new(),
            brk: 0,
        }
    }

    /// Allocate a region of `size` bytes.
    ///
    /// Fails immediately, without mutating any state, if `size` is zero or
    /// negative. Otherwise scans the block list for a free block whose
    /// capacity covers the request (first-fit, no splitting); a reused
    /// block keeps its original capacity. If no free block fits, a new
    /// block is carved at the current boundary, failing with `OutOfMemory`
    /// if marker plus region would fall outside the pool.
    pub fn allocate(&mut self, size: isize) -> Result<BlockHandle> {
        if size <= 0 {
            return Err(ShellError::OutOfMemory);
        }
        let size = size as usize;

        // First-fit scan over previously carved blocks
        for block in self.blocks.iter_mut() {
            if block.free && block.size >= size {
                block.free = false;
                let marker_at = block.offset;
                let handle = BlockHandle(block.user_offset());
                self.pool[marker_at..marker_at + MARKER_SIZE]
                    .copy_from_slice(&MARKER_ALLOCATED);
                return Ok(handle);
            }
        }

        // Extend: carve a fresh block adjacent to the last-known boundary
        let needed = MARKER_SIZE + size;
        if self.brk + needed > self.pool.len() {
            return Err(ShellError::OutOfMemory);
        }
        let block = Block {
            offset: self.brk,
            size,
            free: false,
        };
        self.pool[block.offset..block.offset + MARKER_SIZE].copy_from_slice(&MARKER_ALLOCATED);
        let handle = BlockHandle(block.user_offset());
        self.brk += needed;
        self.blocks.push(block);
        Ok(handle)
    }

    /// Return a region to the arena.
    ///
    /// Validates the marker immediately preceding the user region; any
    /// mismatch (forged handle, double free, offset inside some buffer)
    /// makes the call a silent no-op so that a bad pointer can never
    /// corrupt allocator state. On success the marker is cleared, the
    /// block is marked free, and exactly one coalescing pass merges it
    /// with its immediate list successor if that successor is also free.
    pub fn free(&mut self, handle: BlockHandle) {
        let index = match self.resolve(handle) {
            Some(index) => index,
            None => return,
        };

        let marker_at = self.blocks[index].offset;
        self.pool[marker_at..marker_at + MARKER_SIZE].fill(0);
        self.blocks[index].free = true;

        // One pass: merge with at most the immediate successor
        if let Some(next) = self.blocks.get(index + 1) {
            if next.free {
                let absorbed = MARKER_SIZE + next.size;
                self.blocks[index].size += absorbed;
                self.blocks.remove(index + 1);
            }
        }
    }

    /// Copy `bytes` into the region behind `handle`
    pub fn write(&mut self, handle: BlockHandle, bytes: &[u8]) -> Result<()> {
        let index = self.resolve(handle).ok_or(ShellError::InvalidPointer)?;
        let block = &self.blocks[index];
        if bytes.len() > block.size {
            return Err(ShellError::OutOfMemory);
        }
        let start = block.user_offset();
        self.pool[start..start + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Borrow `len` bytes of the region behind `handle`
    pub fn read(&self, handle: BlockHandle, len: usize) -> Result<&[u8]> {
        let index = self.resolve(handle).ok_or(ShellError::InvalidPointer)?;
        let block = &self.blocks[index];
        if len > block.size {
            return Err(ShellError::InvalidPointer);
        }
        let start = block.user_offset();
        Ok(&self.pool[start..start + len])
    }

    /// Total pool capacity in bytes
    pub fn capacity(&self) -> usize {
        self.pool.len()
    }

    /// Bytes carved from the pool so far, including per-block markers
    pub fn carved(&self) -> usize {
        self.brk
    }

    /// Untouched bytes remaining above the carve boundary
    pub fn available(&self) -> usize {
        self.pool.len() - self.brk
    }

    /// Map a handle to its block index, or None if the marker preceding
    /// the user region does not carry the in-use pattern.
    fn resolve(&self, handle: BlockHandle) -> Option<usize> {
        let user_offset = handle.0;
        if user_offset < MARKER_SIZE || user_offset > self.pool.len() {
            return None;
        }
        let marker_at = user_offset - MARKER_SIZE;
        if self.pool[marker_at..user_offset] != MARKER_ALLOCATED {
            return None;
        }
        self.blocks
            .iter()
            .position(|b| b.offset == marker_at && !b.free)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_rejects_zero_and_negative() {
        let mut arena = Arena::new(1024);
        assert_eq!(arena.allocate(0), Err(ShellError::OutOfMemory));
        assert_eq!(arena.allocate(-8), Err(ShellError::OutOfMemory));

        // No state was mutated
        assert_eq!(arena, Arena::new(1024));
    }

    #[test]
    fn test_allocate_write_read_roundtrip() {
        let mut arena = Arena::new(1024);
        let handle = arena.allocate(6).unwrap();
        arena.write(handle, b"hello\0").unwrap();
        assert_eq!(arena.read(handle, 5).unwrap(), b"hello");
    }

    #[test]
    fn test_exhaustion_reports_out_of_memory() {
        let mut arena = Arena::new(64);
        let before = arena.clone();
        assert_eq!(arena.allocate(1024), Err(ShellError::OutOfMemory));
        assert_eq!(arena, before);

        // A request that fits still succeeds afterward
        assert!(arena.allocate(8).is_ok());
    }

    #[test]
    fn test_first_fit_reuses_freed_block() {
        let mut arena = Arena::new(1024);
        let a = arena.allocate(32).unwrap();
        let _b = arena.allocate(32).unwrap();
        let carved = arena.carved();

        arena.free(a);
        let c = arena.allocate(16).unwrap();

        // The freed block was reused, not a fresh carve
        assert_eq!(c, a);
        assert_eq!(arena.carved(), carved);
    }

    #[test]
    fn test_oversized_free_block_is_not_split() {
        let mut arena = Arena::new(1024);
        let a = arena.allocate(100).unwrap();
        let _anchor = arena.allocate(8).unwrap();
        arena.free(a);

        let b = arena.allocate(10).unwrap();
        assert_eq!(b, a);

        // The reused block kept its full capacity
        arena.write(b, &[7u8; 100]).unwrap();
        assert_eq!(arena.read(b, 100).unwrap(), &[7u8; 100][..]);
    }

    #[test]
    fn test_free_of_forged_handle_is_noop() {
        let mut arena = Arena::new(1024);
        let _a = arena.allocate(32).unwrap();
        let before = arena.clone();

        arena.free(BlockHandle::forged(200));
        arena.free(BlockHandle::forged(0));
        arena.free(BlockHandle::forged(4096));

        assert_eq!(arena, before);
    }

    #[test]
    fn test_double_free_is_noop() {
        let mut arena = Arena::new(1024);
        let a = arena.allocate(32).unwrap();
        let _b = arena.allocate(32).unwrap();

        arena.free(a);
        let before = arena.clone();
        arena.free(a);
        assert_eq!(arena, before);
    }

    #[test]
    fn test_free_merges_with_free_successor() {
        let mut arena = Arena::new(1024);
        let a = arena.allocate(40).unwrap();
        let b = arena.allocate(24).unwrap();
        let _anchor = arena.allocate(8).unwrap();

        arena.free(b);
        arena.free(a);

        // a absorbed b: one block of summed size plus per-block overhead
        assert_eq!(arena.blocks.len(), 2);
        assert_eq!(arena.blocks[0].size, 40 + MARKER_SIZE + 24);
        assert!(arena.blocks[0].free);
    }

    #[test]
    fn test_coalescing_is_single_pass_not_transitive() {
        let mut arena = Arena::new(1024);
        let a = arena.allocate(16).unwrap();
        let b = arena.allocate(16).unwrap();
        let c = arena.allocate(16).unwrap();
        let _anchor = arena.allocate(8).unwrap();

        arena.free(c);
        arena.free(b); // merges b with c only
        assert_eq!(arena.blocks.len(), 3);

        arena.free(a); // a single further call merges a with the b+c block
        assert_eq!(arena.blocks.len(), 2);
        assert_eq!(arena.blocks[0].size, 16 + MARKER_SIZE + 16 + MARKER_SIZE + 16);
    }

    #[test]
    fn test_merged_block_satisfies_larger_request() {
        let mut arena = Arena::new(256);
        let a = arena.allocate(40).unwrap();
        let b = arena.allocate(40).unwrap();
        let _anchor = arena.allocate(8).unwrap();

        arena.free(b);
        arena.free(a);

        // 84 bytes only fits the coalesced block
        let c = arena.allocate(84).unwrap();
        assert_eq!(c, a);
    }

    #[test]
    fn test_read_with_stale_handle_fails() {
        let mut arena = Arena::new(1024);
        let a = arena.allocate(16).unwrap();
        arena.free(a);
        assert_eq!(arena.read(a, 4), Err(ShellError::InvalidPointer));
        assert_eq!(arena.write(a, b"x"), Err(ShellError::InvalidPointer));
    }

    // Property-Based Tests

    #[test]
    fn prop_non_positive_sizes_never_allocate() {
        fn property(size: isize) -> bool {
            let mut arena = Arena::new(512);
            if size > 0 {
                return true;
            }
            arena.allocate(size) == Err(ShellError::OutOfMemory) && arena == Arena::new(512)
        }

        let mut qc = quickcheck::QuickCheck::new().tests(50);
        qc.quickcheck(property as fn(isize) -> bool);
    }

    #[test]
    fn prop_allocation_contents_are_isolated() {
        fn property(data: Vec<u8>) -> bool {
            if data.is_empty() || data.len() > 128 {
                return true;
            }
            let mut arena = Arena::new(4096);
            let a = arena.allocate(data.len() as isize).unwrap();
            let b = arena.allocate(data.len() as isize).unwrap();
            arena.write(a, &data).unwrap();
            arena.write(b, &vec![0xFF; data.len()]).unwrap();
            arena.read(a, data.len()).unwrap() == data.as_slice()
        }

        let mut qc = quickcheck::QuickCheck::new().tests(30);
        qc.quickcheck(property as fn(Vec<u8>) -> bool);
    }

    #[test]
    fn prop_free_of_unallocated_offset_preserves_state() {
        fn property(offset: usize) -> bool {
            let mut arena = Arena::new(512);
            let a = arena.allocate(16).unwrap();
            arena.write(a, b"abcd").unwrap();
            let before = arena.clone();

            arena.free(BlockHandle::forged(offset % 1024));

            // Either the offset happened to be the live handle (a real
            // free) or the state is byte-for-byte identical.
            if offset % 1024 == MARKER_SIZE {
                true
            } else {
                arena == before
            }
        }

        let mut qc = quickcheck::QuickCheck::new().tests(50);
        qc.quickcheck(property as fn(usize) -> bool);
    }
}
