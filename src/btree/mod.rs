//! # B+ Tree Index
//!
//! The disk-resident B+ tree at the core of LarchDB: `i32` keys mapped to
//! fixed 8-byte values, one node per 4096-byte page.
//!
//! ## Architecture Overview
//!
//! - All key/value entries live in leaf pages; internal pages hold separator
//!   keys and child page ids.
//! - Leaves are chained left-to-right through their `next` pointers, so a
//!   walk from the leftmost leaf enumerates every key in ascending order.
//! - Nodes reference each other by page id, resolved through the `Pager`;
//!   parent back-pointers are stored explicitly and kept in sync on every
//!   structural change.
//!
//! ## Node Layout
//!
//! Both node kinds are a 19-byte header followed by a dense array of
//! fixed-width 12-byte entries:
//!
//! ```text
//! Leaf entry:     { key: i32, value: [u8; 8] }
//! Internal entry: { key: i32, right_child: u64 }
//! ```
//!
//! An internal entry `(K, C)` means child `C` covers keys `>= K` up to the
//! next separator; the distinguished `leftmost` child covers keys `< K0`.
//! Capacities are derived from the page geometry, never hard-coded.
//!
//! ## Construction Paths
//!
//! Two ways to build the same structure:
//!
//! 1. **Point insertion** (`BPlusTree::insert`): descend to the responsible
//!    leaf, upsert in place, split upward when full.
//! 2. **Bulk load** (`BPlusTree::bulk_load`): one bottom-up pass over a
//!    pre-sorted stream producing densely packed pages with no split churn.
//!
//! Both yield trees that answer lookups identically.
//!
//! ## Module Organization
//!
//! - `leaf`: leaf entries and borrowed page views
//! - `internal`: internal entries and borrowed page views
//! - `tree`: the `BPlusTree` handle — open, get, insert, stats
//! - `bulk`: bottom-up construction from a sorted stream

mod bulk;
mod internal;
mod leaf;
mod tree;

pub use internal::{
    InternalEntry, InternalNode, InternalNodeMut, INTERNAL_CAPACITY, INTERNAL_ENTRY_SIZE,
};
pub use leaf::{LeafEntry, LeafNode, LeafNodeMut, SearchResult, LEAF_CAPACITY, LEAF_ENTRY_SIZE};
pub use tree::{BPlusTree, TreeStats};

use crate::config::VALUE_SIZE;

/// Normalizes a value to exactly [`VALUE_SIZE`] bytes: shorter inputs are
/// right-padded with NUL, longer inputs are truncated.
pub fn normalize_value(value: &[u8]) -> [u8; VALUE_SIZE] {
    let mut out = [0u8; VALUE_SIZE];
    let len = value.len().min(VALUE_SIZE);
    out[..len].copy_from_slice(&value[..len]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_pads_short_values() {
        assert_eq!(normalize_value(b"hi"), *b"hi\0\0\0\0\0\0");
        assert_eq!(normalize_value(b""), [0u8; VALUE_SIZE]);
    }

    #[test]
    fn normalize_truncates_long_values() {
        assert_eq!(normalize_value(b"abcdefghXYZ"), *b"abcdefgh");
    }

    #[test]
    fn normalize_keeps_exact_values() {
        assert_eq!(normalize_value(b"exactly8"), *b"exactly8");
    }
}
