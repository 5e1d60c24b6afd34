//! # LarchDB Command-Line Interface
//!
//! The interactive boundary layer around the tree core: a line-oriented
//! REPL, the word-command parser, and the CSV record reader used by
//! `bulkload`. This layer owns all textual I/O and key range checking; the
//! core only ever sees parsed `(i32, bytes)` operations.

mod commands;
mod csv;
mod repl;

pub use commands::{CommandHandler, CommandResult};
pub use csv::{parse_record, read_records};
pub use repl::Repl;
