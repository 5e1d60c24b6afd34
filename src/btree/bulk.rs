//! # Bulk Builder
//!
//! Builds a complete tree bottom-up from a pre-sorted key/value stream,
//! bypassing the insertion path entirely. Every page is written once, every
//! node except possibly the last on each level is full, and the input is
//! consumed in a single pass.
//!
//! ```text
//! 1. Leaf pass: pack entries into leaves of exactly LEAF_CAPACITY entries
//!    (the final leaf takes the remainder), threading the sibling chain as
//!    each leaf is flushed and collecting (first_key, page_id) per leaf.
//! 2. Upper passes: group up to INTERNAL_CAPACITY+1 children under fresh
//!    internal nodes, reparenting every child, until one node remains.
//! 3. That node becomes the root; the superblock is rewritten.
//! ```
//!
//! The input must be sorted by key, non-decreasing; a decrease aborts the
//! build. Equal consecutive keys are accepted and stored as distinct leaf
//! entries — unlike point insertion, no upsert is performed. The previous
//! tree's pages are left in the file unreferenced.

use eyre::{ensure, Result};

use super::internal::{InternalEntry, InternalNodeMut, INTERNAL_CAPACITY};
use super::leaf::{LeafEntry, LeafNodeMut, LEAF_CAPACITY};
use super::normalize_value;
use super::tree::BPlusTree;
use crate::storage::{zeroed_page, PageId};

impl BPlusTree {
    /// Replaces the tree with one built from `input`, which must be sorted
    /// by key (non-decreasing). Returns the number of entries loaded.
    pub fn bulk_load<I, V>(&mut self, input: I) -> Result<u64>
    where
        I: IntoIterator<Item = (i32, V)>,
        V: AsRef<[u8]>,
    {
        let mut level: Vec<(i32, PageId)> = Vec::new();
        let mut pending: Vec<LeafEntry> = Vec::with_capacity(LEAF_CAPACITY);
        let mut prev_leaf: PageId = 0;
        let mut prev_key: Option<i32> = None;
        let mut loaded = 0u64;

        for (key, value) in input {
            if let Some(prev) = prev_key {
                ensure!(
                    key >= prev,
                    "bulk load input not sorted: key {} follows {}",
                    key,
                    prev
                );
            }
            prev_key = Some(key);

            pending.push(LeafEntry::new(key, normalize_value(value.as_ref())));
            loaded += 1;

            if pending.len() == LEAF_CAPACITY {
                prev_leaf = self.flush_leaf(&mut pending, prev_leaf, &mut level)?;
            }
        }

        if !pending.is_empty() {
            self.flush_leaf(&mut pending, prev_leaf, &mut level)?;
        }

        if level.is_empty() {
            self.create_empty_root_leaf()?;
            return Ok(0);
        }

        while level.len() > 1 {
            level = self.build_internal_level(&level)?;
        }

        self.superblock.set_root(level[0].1);
        self.write_superblock()?;
        Ok(loaded)
    }

    /// Writes the buffered entries to a fresh leaf, threads the sibling
    /// chain through the previously flushed leaf, and records the new leaf
    /// in the level list. Parent pointers are fixed up by the upper pass.
    fn flush_leaf(
        &mut self,
        pending: &mut Vec<LeafEntry>,
        prev_leaf: PageId,
        level: &mut Vec<(i32, PageId)>,
    ) -> Result<PageId> {
        let first_key = pending[0].key();
        let pid = self.allocate_page()?;

        let mut page = zeroed_page();
        {
            let mut leaf = LeafNodeMut::init(&mut page, 0)?;
            leaf.write_entries(pending)?;
        }
        self.pager.write_page(pid, &page)?;

        if prev_leaf != 0 {
            let mut prev_page = zeroed_page();
            self.pager.read_page(prev_leaf, &mut prev_page)?;
            {
                let mut prev = LeafNodeMut::from_page(&mut prev_page)?;
                prev.set_next_leaf(pid)?;
            }
            self.pager.write_page(prev_leaf, &prev_page)?;
        }

        level.push((first_key, pid));
        pending.clear();
        Ok(pid)
    }

    /// Builds one internal level above `lower`, grouping children left to
    /// right. Each group's first child becomes the node's leftmost child and
    /// the rest become separator entries; every child is reparented to the
    /// new node. Returns the next level's child list, each node keyed by the
    /// smallest key in its subtree.
    fn build_internal_level(&mut self, lower: &[(i32, PageId)]) -> Result<Vec<(i32, PageId)>> {
        let mut upper = Vec::new();
        let mut i = 0usize;

        while i < lower.len() {
            let leftmost = lower[i].1;
            let group_end = (i + 1 + INTERNAL_CAPACITY).min(lower.len());
            let node_id = self.allocate_page()?;

            let mut page = zeroed_page();
            {
                let mut node = InternalNodeMut::init(&mut page, 0, leftmost)?;
                let entries: Vec<InternalEntry> = lower[i + 1..group_end]
                    .iter()
                    .map(|&(sep, child)| InternalEntry::new(sep, child))
                    .collect();
                node.write_entries(&entries)?;
            }
            self.pager.write_page(node_id, &page)?;

            self.set_parent(leftmost, node_id)?;
            for &(_, child) in &lower[i + 1..group_end] {
                self.set_parent(child, node_id)?;
            }

            // The key carried upward must be the smallest key anywhere under
            // the new node, which is the first child's key: the level above
            // routes keys below it away from this subtree.
            upper.push((lower[i].0, node_id));

            i = group_end;
        }

        Ok(upper)
    }
}
