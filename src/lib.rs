//! # LarchDB - Single-File B+ Tree Index
//!
//! LarchDB is a persistent, disk-resident B+ tree indexing 32-bit signed
//! integer keys to fixed 8-byte values. The whole index lives in one regular
//! file organized as 4096-byte pages.
//!
//! ## Quick Start
//!
//! ```ignore
//! use larchdb::BPlusTree;
//!
//! let mut tree = BPlusTree::open("./orders.idx")?;
//!
//! tree.insert(42, b"hello")?;
//! assert_eq!(tree.get(42)?, Some(*b"hello\0\0\0"));
//!
//! tree.bulk_load((1..=10_000).map(|k| (k, format!("v{}", k))))?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │       CLI (REPL / CSV reader)        │
//! ├─────────────────────────────────────┤
//! │  B+ Tree (navigate, upsert, split,   │
//! │           bottom-up bulk build)      │
//! ├─────────────────────────────────────┤
//! │  Node Views (leaf / internal codec)  │
//! ├─────────────────────────────────────┤
//! │  Pager + Superblock (whole-page I/O) │
//! └─────────────────────────────────────┘
//! ```
//!
//! ## File Layout
//!
//! ```text
//! orders.idx
//! ├── page 0        # superblock: magic, root page id, page count
//! └── page 1..N     # tree nodes, one per page, never reclaimed
//! ```
//!
//! Operations are single-threaded and synchronous; writes go through to the
//! OS per operation, with no journaling. Values shorter than 8 bytes are
//! padded with NUL, longer values are truncated.
//!
//! ## Module Overview
//!
//! - [`storage`]: pager, superblock, and the shared node header
//! - [`btree`]: node views, the `BPlusTree` handle, and the bulk builder
//! - [`cli`]: interactive shell and CSV boundary layer
//! - [`config`]: page geometry constants

pub mod btree;
pub mod cli;
pub mod config;
pub mod storage;

pub use btree::{normalize_value, BPlusTree, TreeStats};
pub use config::{PAGE_SIZE, VALUE_SIZE};
