//! # Node Header Layout
//!
//! Every tree page (leaf or internal) begins with the same 19-byte header.
//! A discriminator byte at offset 0 distinguishes the two kinds, so a reader
//! can branch on the kind after the read without knowing it in advance.
//!
//! ## Header Layout (19 bytes, little-endian)
//!
//! ```text
//! Offset  Size  Field    Description
//! ------  ----  -------  ------------------------------------------------
//! 0       1     is_leaf  1 = leaf page, 0 = internal page
//! 1       2     count    number of occupied entries
//! 3       8     parent   page id of the parent node, 0 if root
//! 11      8     link     right sibling (leaf) / leftmost child (internal)
//! ```
//!
//! The `link` field is shared: for a leaf it is the id of the immediately
//! right sibling in key order (0 if none), for an internal node it is the
//! child holding keys strictly less than the first separator. Accessors
//! `next_leaf`/`leftmost_child` alias the same field.
//!
//! The entry array starts immediately after the header and runs to the node
//! capacity; unused trailing bytes are zero on disk.

use eyre::{bail, ensure, Result};
use zerocopy::little_endian::{U16, U64};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use super::PageId;

pub const NODE_HEADER_SIZE: usize = std::mem::size_of::<NodeHeader>();

const LEAF_TAG: u8 = 1;
const INTERNAL_TAG: u8 = 0;

#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct NodeHeader {
    is_leaf: u8,
    count: U16,
    parent: U64,
    link: U64,
}

const _: () = assert!(std::mem::size_of::<NodeHeader>() == 19);

impl NodeHeader {
    pub fn new_leaf(parent: PageId) -> Self {
        Self {
            is_leaf: LEAF_TAG,
            count: U16::new(0),
            parent: U64::new(parent),
            link: U64::new(0),
        }
    }

    pub fn new_internal(parent: PageId) -> Self {
        Self {
            is_leaf: INTERNAL_TAG,
            count: U16::new(0),
            parent: U64::new(parent),
            link: U64::new(0),
        }
    }

    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        ensure!(
            data.len() >= NODE_HEADER_SIZE,
            "buffer too small for NodeHeader: {} < {}",
            data.len(),
            NODE_HEADER_SIZE
        );

        let header = Self::ref_from_bytes(&data[..NODE_HEADER_SIZE])
            .map_err(|e| eyre::eyre!("failed to read NodeHeader: {:?}", e))?;

        ensure!(
            header.is_leaf <= LEAF_TAG,
            "corrupt page: bad node discriminator {:#04x}",
            header.is_leaf
        );

        Ok(header)
    }

    pub fn from_bytes_mut(data: &mut [u8]) -> Result<&mut Self> {
        ensure!(
            data.len() >= NODE_HEADER_SIZE,
            "buffer too small for NodeHeader: {} < {}",
            data.len(),
            NODE_HEADER_SIZE
        );

        let header = Self::mut_from_bytes(&mut data[..NODE_HEADER_SIZE])
            .map_err(|e| eyre::eyre!("failed to read NodeHeader: {:?}", e))?;

        ensure!(
            header.is_leaf <= LEAF_TAG,
            "corrupt page: bad node discriminator {:#04x}",
            header.is_leaf
        );

        Ok(header)
    }

    pub fn write_to(&self, data: &mut [u8]) -> Result<()> {
        ensure!(
            data.len() >= NODE_HEADER_SIZE,
            "buffer too small for NodeHeader: {} < {}",
            data.len(),
            NODE_HEADER_SIZE
        );

        data[..NODE_HEADER_SIZE].copy_from_slice(self.as_bytes());
        Ok(())
    }

    pub fn is_leaf(&self) -> bool {
        self.is_leaf == LEAF_TAG
    }

    pub fn count(&self) -> u16 {
        self.count.get()
    }

    pub fn set_count(&mut self, count: u16) {
        self.count = U16::new(count);
    }

    pub fn parent(&self) -> PageId {
        self.parent.get()
    }

    pub fn set_parent(&mut self, pid: PageId) {
        self.parent = U64::new(pid);
    }

    pub fn next_leaf(&self) -> PageId {
        self.link.get()
    }

    pub fn set_next_leaf(&mut self, pid: PageId) {
        self.link = U64::new(pid);
    }

    pub fn leftmost_child(&self) -> PageId {
        self.link.get()
    }

    pub fn set_leftmost_child(&mut self, pid: PageId) {
        self.link = U64::new(pid);
    }
}

/// Reads the discriminator byte of a page without decoding the whole header.
pub fn page_is_leaf(data: &[u8]) -> Result<bool> {
    ensure!(!data.is_empty(), "empty page buffer");
    match data[0] {
        INTERNAL_TAG => Ok(false),
        LEAF_TAG => Ok(true),
        other => bail!("corrupt page: bad node discriminator {:#04x}", other),
    }
}
