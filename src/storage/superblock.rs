//! # Superblock
//!
//! Page 0 of every index file carries the superblock: the magic tag that
//! identifies a LarchDB file, the id of the current root page, and the total
//! number of pages ever allocated. It is the root of discovery — every
//! operation begins by consulting it for the current root.
//!
//! ## Layout (32 bytes, little-endian, remainder of the page zero)
//!
//! ```text
//! Offset  Size  Field           Description
//! ------  ----  --------------  ---------------------------------------
//! 0       8     magic           b"LarchIdx"
//! 8       8     root            page id of the current tree root
//! 16      8     free_list_head  reserved, always zero (no reclamation)
//! 24      8     page_count      pages ever allocated, incl. page 0
//! ```
//!
//! A file whose page 0 does not start with the magic bytes is treated as
//! uninitialized and gets a fresh superblock plus an empty root leaf.

use eyre::{ensure, Result};
use zerocopy::little_endian::U64;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use super::{PageBuf, PageId};
use crate::config::PAGE_SIZE;

/// Identifies a LarchDB index file; a 64-bit constant spelled in ASCII.
pub const SUPERBLOCK_MAGIC: &[u8; 8] = b"LarchIdx";

/// The superblock always lives at page 0.
pub const SUPERBLOCK_PAGE: PageId = 0;

pub const SUPERBLOCK_SIZE: usize = std::mem::size_of::<Superblock>();

#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct Superblock {
    magic: [u8; 8],
    root: U64,
    free_list_head: U64,
    page_count: U64,
}

const _: () = assert!(std::mem::size_of::<Superblock>() == 32);
const _: () = assert!(std::mem::size_of::<Superblock>() <= PAGE_SIZE);

impl Superblock {
    /// A fresh superblock: no root yet, page 0 is the only allocated page.
    pub fn new() -> Self {
        Self {
            magic: *SUPERBLOCK_MAGIC,
            root: U64::new(0),
            free_list_head: U64::new(0),
            page_count: U64::new(1),
        }
    }

    /// True if the buffer begins with the LarchDB magic bytes. Used on open
    /// to distinguish an initialized file from a fresh or foreign one.
    pub fn is_present(bytes: &[u8]) -> bool {
        bytes.len() >= SUPERBLOCK_MAGIC.len() && &bytes[..SUPERBLOCK_MAGIC.len()] == SUPERBLOCK_MAGIC
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<&Self> {
        ensure!(
            bytes.len() >= SUPERBLOCK_SIZE,
            "buffer too small for Superblock: {} < {}",
            bytes.len(),
            SUPERBLOCK_SIZE
        );

        let sb = Self::ref_from_bytes(&bytes[..SUPERBLOCK_SIZE])
            .map_err(|e| eyre::eyre!("failed to parse Superblock: {:?}", e))?;

        ensure!(
            &sb.magic == SUPERBLOCK_MAGIC,
            "invalid magic bytes in superblock"
        );

        Ok(sb)
    }

    /// Encodes the superblock into a whole-page image; trailing bytes zero.
    pub fn write_to(&self, page: &mut PageBuf) {
        page.fill(0);
        page[..SUPERBLOCK_SIZE].copy_from_slice(self.as_bytes());
    }

    pub fn root(&self) -> PageId {
        self.root.get()
    }

    pub fn set_root(&mut self, pid: PageId) {
        self.root = U64::new(pid);
    }

    pub fn free_list_head(&self) -> PageId {
        self.free_list_head.get()
    }

    pub fn page_count(&self) -> u64 {
        self.page_count.get()
    }

    pub fn set_page_count(&mut self, count: u64) {
        self.page_count = U64::new(count);
    }

    pub fn increment_page_count(&mut self) {
        self.page_count = U64::new(self.page_count.get() + 1);
    }
}

impl Default for Superblock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superblock_size_is_32() {
        assert_eq!(std::mem::size_of::<Superblock>(), 32);
    }

    #[test]
    fn superblock_roundtrip() {
        let mut sb = Superblock::new();
        sb.set_root(17);
        sb.set_page_count(42);

        let mut page = [0u8; PAGE_SIZE];
        sb.write_to(&mut page);

        let parsed = Superblock::from_bytes(&page).unwrap();
        assert_eq!(parsed.root(), 17);
        assert_eq!(parsed.free_list_head(), 0);
        assert_eq!(parsed.page_count(), 42);
    }

    #[test]
    fn write_to_zeroes_page_tail() {
        let sb = Superblock::new();
        let mut page = [0xFFu8; PAGE_SIZE];
        sb.write_to(&mut page);

        assert!(page[SUPERBLOCK_SIZE..].iter().all(|&b| b == 0));
    }

    #[test]
    fn rejects_foreign_magic() {
        let mut page = [0u8; PAGE_SIZE];
        page[..8].copy_from_slice(b"NotLarch");

        assert!(!Superblock::is_present(&page));
        assert!(Superblock::from_bytes(&page).is_err());
    }

    #[test]
    fn zeroed_page_is_not_present() {
        let page = [0u8; PAGE_SIZE];
        assert!(!Superblock::is_present(&page));
    }

    #[test]
    fn increment_page_count_counts_up() {
        let mut sb = Superblock::new();
        assert_eq!(sb.page_count(), 1);
        sb.increment_page_count();
        sb.increment_page_count();
        assert_eq!(sb.page_count(), 3);
    }
}
