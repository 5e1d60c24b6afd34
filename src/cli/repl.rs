//! # REPL - Read-Eval-Print Loop
//!
//! The interactive shell around a `BPlusTree`. Reads one command per line
//! with rustyline (history, line editing), dispatches through
//! `CommandHandler`, and prints the result. Command errors are displayed
//! without terminating the loop; use `exit` or Ctrl+D to leave. On exit the
//! backing file is flushed to stable storage.
//!
//! Every index keeps its own command history in a `.history` file next to
//! the index file, so working against two indexes never mixes their
//! histories. `LARCHDB_HISTORY` overrides the location; an empty value
//! disables persistence.

use std::env;
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::btree::BPlusTree;
use crate::cli::commands::{CommandHandler, CommandResult};

const PROMPT: &str = "larchdb> ";
const HISTORY_ENV_VAR: &str = "LARCHDB_HISTORY";

pub struct Repl {
    tree: BPlusTree,
    editor: DefaultEditor,
    history_file: Option<PathBuf>,
}

impl Repl {
    pub fn new(tree: BPlusTree) -> Result<Self> {
        let mut editor = DefaultEditor::new().wrap_err("failed to initialize line editor")?;

        let history_file = history_path(tree.path());
        if let Some(file) = &history_file {
            let _ = editor.load_history(file);
        }

        Ok(Self {
            tree,
            editor,
            history_file,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        self.print_welcome();

        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    if !self.handle_line(&line) {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye");
                    break;
                }
                Err(err) => {
                    eprintln!("Error reading input: {}", err);
                    break;
                }
            }
        }

        if let Err(err) = self.tree.sync() {
            eprintln!("Warning: {}", err);
        }
        self.save_history();
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> bool {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return true;
        }

        self.editor.add_history_entry(trimmed).ok();

        match CommandHandler::execute(trimmed, &mut self.tree) {
            CommandResult::Exit => false,
            CommandResult::Output(text) => {
                println!("{}", text);
                true
            }
            CommandResult::Continue => true,
            CommandResult::Error(msg) => {
                eprintln!("Error: {}", msg);
                true
            }
        }
    }

    fn print_welcome(&self) {
        println!("LarchDB {} (type help for commands)", env!("CARGO_PKG_VERSION"));
    }

    fn save_history(&mut self) {
        if let Some(file) = &self.history_file {
            let _ = self.editor.save_history(file);
        }
    }
}

/// Resolves where this index's history lives: `<index>.history` beside the
/// index file, unless `LARCHDB_HISTORY` picks another location (empty
/// disables persistence).
fn history_path(index_path: &Path) -> Option<PathBuf> {
    match env::var(HISTORY_ENV_VAR) {
        Ok(custom) if custom.is_empty() => None,
        Ok(custom) => Some(PathBuf::from(custom)),
        Err(_) => Some(index_path.with_extension("history")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_sits_next_to_the_index_file() {
        env::remove_var(HISTORY_ENV_VAR);

        assert_eq!(
            history_path(Path::new("/data/orders.idx")),
            Some(PathBuf::from("/data/orders.history"))
        );
    }

    #[test]
    fn each_index_gets_its_own_history() {
        env::remove_var(HISTORY_ENV_VAR);

        let a = history_path(Path::new("/data/a.idx"));
        let b = history_path(Path::new("/data/b.idx"));
        assert_ne!(a, b);
    }

    #[test]
    fn env_var_overrides_and_empty_disables() {
        env::set_var(HISTORY_ENV_VAR, "/tmp/shared.history");
        let overridden = history_path(Path::new("/data/orders.idx"));
        env::set_var(HISTORY_ENV_VAR, "");
        let disabled = history_path(Path::new("/data/orders.idx"));
        env::remove_var(HISTORY_ENV_VAR);

        assert_eq!(overridden, Some(PathBuf::from("/tmp/shared.history")));
        assert_eq!(disabled, None);
    }
}
