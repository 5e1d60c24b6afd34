//! # Command Handler
//!
//! Parses and executes the word commands of the LarchDB shell. Each command
//! produces a `CommandResult` the REPL renders; command failures never
//! terminate the loop and never alter the tree beyond what the core already
//! did.
//!
//! ## Supported Commands
//!
//! | Command                | Description                                 |
//! |------------------------|---------------------------------------------|
//! | `get <key>`            | Print the stored 8-byte value               |
//! | `insert <key> <value>` | Upsert a key (value normalized to 8 bytes)  |
//! | `bulkload <csv-path>`  | Rebuild the tree from a sorted CSV file     |
//! | `stats`                | Print tree height, page count, root page    |
//! | `help`                 | Show available commands                     |
//! | `exit` / `quit`        | Leave the shell                             |
//!
//! Keys are parsed as `i64` and rejected here when they fall outside the
//! signed 32-bit range, so out-of-range keys never reach the core.

use crate::btree::BPlusTree;
use crate::cli::csv;
use crate::config::VALUE_SIZE;

#[derive(Debug, PartialEq)]
pub enum CommandResult {
    Output(String),
    Exit,
    Continue,
    Error(String),
}

pub struct CommandHandler;

impl CommandHandler {
    pub fn execute(input: &str, tree: &mut BPlusTree) -> CommandResult {
        let parts: Vec<&str> = input.split_whitespace().collect();

        if parts.is_empty() {
            return CommandResult::Continue;
        }

        let cmd = parts[0].to_lowercase();
        let args = &parts[1..];

        match cmd.as_str() {
            "get" => cmd_get(tree, args),
            "insert" => cmd_insert(tree, args),
            "bulkload" => cmd_bulkload(tree, args),
            "stats" => cmd_stats(tree),
            "help" => CommandResult::Output(help_text()),
            "exit" | "quit" => CommandResult::Exit,
            other => CommandResult::Error(format!(
                "unknown command: {}. Type help for available commands.",
                other
            )),
        }
    }
}

fn parse_key(text: &str) -> Result<i32, String> {
    let key: i64 = text
        .parse()
        .map_err(|_| format!("invalid key '{}': expected an integer", text))?;
    if key < i32::MIN as i64 || key > i32::MAX as i64 {
        return Err(format!("key {} outside the signed 32-bit range", key));
    }
    Ok(key as i32)
}

/// Renders a stored value the way the shell prints it: NUL padding shown as
/// spaces, other bytes passed through.
fn display_value(value: &[u8; VALUE_SIZE]) -> String {
    value
        .iter()
        .map(|&b| if b == 0 { ' ' } else { b as char })
        .collect()
}

fn cmd_get(tree: &mut BPlusTree, args: &[&str]) -> CommandResult {
    let [key_text] = args else {
        return CommandResult::Error("usage: get <key>".to_string());
    };
    let key = match parse_key(key_text) {
        Ok(key) => key,
        Err(msg) => return CommandResult::Error(msg),
    };

    match tree.get(key) {
        Ok(Some(value)) => CommandResult::Output(display_value(&value)),
        Ok(None) => CommandResult::Output("(not found)".to_string()),
        Err(err) => CommandResult::Error(format!("get failed: {}", err)),
    }
}

fn cmd_insert(tree: &mut BPlusTree, args: &[&str]) -> CommandResult {
    let [key_text, value_text] = args else {
        return CommandResult::Error("usage: insert <key> <value>".to_string());
    };
    let key = match parse_key(key_text) {
        Ok(key) => key,
        Err(msg) => return CommandResult::Error(msg),
    };

    match tree.insert(key, value_text.as_bytes()) {
        Ok(()) => CommandResult::Output("OK".to_string()),
        Err(err) => CommandResult::Error(format!("insert failed: {}", err)),
    }
}

fn cmd_bulkload(tree: &mut BPlusTree, args: &[&str]) -> CommandResult {
    let [path] = args else {
        return CommandResult::Error("usage: bulkload <csv-path>".to_string());
    };

    let records = match csv::read_records(path) {
        Ok(records) => records,
        Err(err) => return CommandResult::Error(format!("bulkload failed: {}", err)),
    };

    match tree.bulk_load(records) {
        Ok(loaded) => CommandResult::Output(format!("Loaded {} records", loaded)),
        Err(err) => CommandResult::Error(format!("bulkload failed: {}", err)),
    }
}

fn cmd_stats(tree: &mut BPlusTree) -> CommandResult {
    match tree.stats() {
        Ok(stats) => CommandResult::Output(format!(
            "height: {}\npages: {}\nroot: {}",
            stats.height, stats.page_count, stats.root
        )),
        Err(err) => CommandResult::Error(format!("stats failed: {}", err)),
    }
}

fn help_text() -> String {
    r#"LarchDB commands:

  get <key>             Print the value stored under <key>
  insert <key> <value>  Insert or overwrite <key> (value padded/truncated to 8 bytes)
  bulkload <csv-path>   Rebuild the index from a key-sorted CSV file
  stats                 Show tree height, page count and root page
  help                  Show this help message
  exit, quit            Leave the shell

Keys are signed 32-bit integers. Use Ctrl+D or exit to leave."#
        .to_string()
}
