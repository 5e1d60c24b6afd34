//! # Internal Pages
//!
//! Internal pages route descents. Each holds a distinguished `leftmost`
//! child (in the header `link` field) plus a sorted array of
//! `{ separator, right_child }` entries: child `right_child` covers keys
//! `>= separator` up to the next separator, and `leftmost` covers keys
//! strictly below the first separator.
//!
//! The child for a key is found by counting the separators not greater than
//! the key: zero selects `leftmost`, otherwise the last such separator's
//! right child. A key equal to a separator therefore descends to the right,
//! where the split that promoted the separator placed it.

use eyre::{ensure, Result};
use zerocopy::little_endian::{I32, U64};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::config::PAGE_SIZE;
use crate::storage::{NodeHeader, PageId, NODE_HEADER_SIZE};

pub const INTERNAL_ENTRY_SIZE: usize = std::mem::size_of::<InternalEntry>();

/// Number of separator entries an internal page can hold, derived from the
/// page geometry. The node fans out to one more child than this (the
/// `leftmost` child is not an entry).
pub const INTERNAL_CAPACITY: usize = (PAGE_SIZE - NODE_HEADER_SIZE) / INTERNAL_ENTRY_SIZE;

const _: () = assert!(std::mem::size_of::<InternalEntry>() == 12);
const _: () = assert!(INTERNAL_CAPACITY >= 2);

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct InternalEntry {
    key: I32,
    right_child: U64,
}

impl InternalEntry {
    pub fn new(key: i32, right_child: PageId) -> Self {
        Self {
            key: I32::new(key),
            right_child: U64::new(right_child),
        }
    }

    pub fn key(&self) -> i32 {
        self.key.get()
    }

    pub fn right_child(&self) -> PageId {
        self.right_child.get()
    }
}

#[derive(Debug)]
pub struct InternalNode<'a> {
    data: &'a [u8],
}

pub struct InternalNodeMut<'a> {
    data: &'a mut [u8],
}

impl<'a> InternalNode<'a> {
    pub fn from_page(data: &'a [u8]) -> Result<Self> {
        ensure!(
            data.len() == PAGE_SIZE,
            "invalid page size: {} != {}",
            data.len(),
            PAGE_SIZE
        );
        let header = NodeHeader::from_bytes(data)?;
        ensure!(!header.is_leaf(), "expected internal page, got leaf");
        Ok(Self { data })
    }

    pub fn entry_count(&self) -> usize {
        let header = NodeHeader::from_bytes(self.data).unwrap();
        header.count() as usize
    }

    pub fn parent(&self) -> PageId {
        let header = NodeHeader::from_bytes(self.data).unwrap();
        header.parent()
    }

    pub fn leftmost_child(&self) -> PageId {
        let header = NodeHeader::from_bytes(self.data).unwrap();
        header.leftmost_child()
    }

    pub fn entries(&self) -> Result<&'a [InternalEntry]> {
        let count = self.entry_count();
        ensure!(
            count <= INTERNAL_CAPACITY,
            "corrupt internal page: count {} exceeds capacity {}",
            count,
            INTERNAL_CAPACITY
        );
        let data: &'a [u8] = self.data;
        let end = NODE_HEADER_SIZE + count * INTERNAL_ENTRY_SIZE;
        <[InternalEntry]>::ref_from_bytes(&data[NODE_HEADER_SIZE..end])
            .map_err(|e| eyre::eyre!("failed to read internal entries: {:?}", e))
    }

    /// Index of the child a descent for `key` must follow: the number of
    /// separators not greater than `key`. Index 0 selects the leftmost
    /// child, index `i > 0` selects `entries[i-1].right_child`. A key equal
    /// to a separator belongs to that separator's right child.
    pub fn child_index(&self, key: i32) -> Result<usize> {
        let entries = self.entries()?;
        Ok(entries.partition_point(|e| e.key() <= key))
    }

    /// Resolves `child_index` to the page id to descend into.
    pub fn child_for_key(&self, key: i32) -> Result<PageId> {
        let idx = self.child_index(key)?;
        if idx == 0 {
            Ok(self.leftmost_child())
        } else {
            Ok(self.entries()?[idx - 1].right_child())
        }
    }
}

impl<'a> InternalNodeMut<'a> {
    pub fn from_page(data: &'a mut [u8]) -> Result<Self> {
        ensure!(
            data.len() == PAGE_SIZE,
            "invalid page size: {} != {}",
            data.len(),
            PAGE_SIZE
        );
        let header = NodeHeader::from_bytes(data)?;
        ensure!(!header.is_leaf(), "expected internal page, got leaf");
        Ok(Self { data })
    }

    /// Stamps a fresh internal node with no entries over the buffer.
    pub fn init(data: &'a mut [u8], parent: PageId, leftmost: PageId) -> Result<Self> {
        ensure!(
            data.len() == PAGE_SIZE,
            "invalid page size: {} != {}",
            data.len(),
            PAGE_SIZE
        );

        data.fill(0);
        let mut header = NodeHeader::new_internal(parent);
        header.set_leftmost_child(leftmost);
        header.write_to(data)?;

        Ok(Self { data })
    }

    pub fn entry_count(&self) -> usize {
        let header = NodeHeader::from_bytes(self.data).unwrap();
        header.count() as usize
    }

    pub fn parent(&self) -> PageId {
        let header = NodeHeader::from_bytes(self.data).unwrap();
        header.parent()
    }

    pub fn leftmost_child(&self) -> PageId {
        let header = NodeHeader::from_bytes(self.data).unwrap();
        header.leftmost_child()
    }

    pub fn entries(&self) -> Result<&[InternalEntry]> {
        let count = self.entry_count();
        ensure!(
            count <= INTERNAL_CAPACITY,
            "corrupt internal page: count {} exceeds capacity {}",
            count,
            INTERNAL_CAPACITY
        );
        let end = NODE_HEADER_SIZE + count * INTERNAL_ENTRY_SIZE;
        <[InternalEntry]>::ref_from_bytes(&self.data[NODE_HEADER_SIZE..end])
            .map_err(|e| eyre::eyre!("failed to read internal entries: {:?}", e))
    }

    /// Position at which a separator belongs: the smallest index whose key
    /// is `>=` the separator, or `count` if it sorts last.
    pub fn insert_position(&self, sep_key: i32) -> Result<usize> {
        let entries = self.entries()?;
        Ok(entries.partition_point(|e| e.key() < sep_key))
    }

    /// Inserts an entry at `index`, shifting subsequent entries right.
    pub fn insert_entry(&mut self, index: usize, entry: InternalEntry) -> Result<()> {
        let count = self.entry_count();
        ensure!(
            count < INTERNAL_CAPACITY,
            "internal page full: {} entries",
            count
        );
        ensure!(
            index <= count,
            "insert index {} out of bounds (count={})",
            index,
            count
        );

        let start = NODE_HEADER_SIZE + index * INTERNAL_ENTRY_SIZE;
        let end = NODE_HEADER_SIZE + count * INTERNAL_ENTRY_SIZE;
        self.data
            .copy_within(start..end, start + INTERNAL_ENTRY_SIZE);
        self.data[start..start + INTERNAL_ENTRY_SIZE].copy_from_slice(entry.as_bytes());

        let header = NodeHeader::from_bytes_mut(self.data)?;
        header.set_count(count as u16 + 1);
        Ok(())
    }

    /// Replaces the whole entry array; bytes past the new entries are zeroed.
    pub fn write_entries(&mut self, entries: &[InternalEntry]) -> Result<()> {
        ensure!(
            entries.len() <= INTERNAL_CAPACITY,
            "internal overflow: {} entries exceed capacity {}",
            entries.len(),
            INTERNAL_CAPACITY
        );

        let start = NODE_HEADER_SIZE;
        let end = start + entries.len() * INTERNAL_ENTRY_SIZE;
        self.data[start..end].copy_from_slice(entries.as_bytes());
        self.data[end..].fill(0);

        let header = NodeHeader::from_bytes_mut(self.data)?;
        header.set_count(entries.len() as u16);
        Ok(())
    }
}
