//! # LarchDB Layout Constants
//!
//! The on-disk format is built from a small set of fixed widths. Everything
//! else — node header size, entry sizes, per-node capacities — is derived
//! from these values at compile time; see `storage::page`, `btree::leaf`,
//! and `btree::internal` for the derived constants next to the structs that
//! define them.
//!
//! ## Dependency Graph
//!
//! ```text
//! PAGE_SIZE (4096 bytes)
//!       │
//!       ├─> NODE_HEADER_SIZE (19 bytes, size_of::<NodeHeader>)
//!       │
//!       ├─> LEAF_CAPACITY     (derived: (PAGE_SIZE - NODE_HEADER_SIZE) / LEAF_ENTRY_SIZE)
//!       │
//!       └─> INTERNAL_CAPACITY (derived: (PAGE_SIZE - NODE_HEADER_SIZE) / INTERNAL_ENTRY_SIZE)
//!
//! VALUE_SIZE (8 bytes)
//!       │
//!       └─> LEAF_ENTRY_SIZE (derived: key width + VALUE_SIZE)
//! ```
//!
//! ## Critical Invariants
//!
//! Enforced by compile-time assertions at the definition sites:
//!
//! 1. `size_of::<Superblock>() <= PAGE_SIZE` (superblock fits in page 0)
//! 2. `LEAF_CAPACITY >= 2` and `INTERNAL_CAPACITY >= 2` (splits well-defined)

// ============================================================================
// PAGE GEOMETRY
// The fundamental unit of I/O; every read and write moves exactly one page
// ============================================================================

/// Size of each index page in bytes.
pub const PAGE_SIZE: usize = 4096;

// ============================================================================
// RECORD GEOMETRY
// ============================================================================

/// Width of every stored value. Shorter inputs are padded with NUL bytes,
/// longer inputs are truncated.
pub const VALUE_SIZE: usize = 8;
