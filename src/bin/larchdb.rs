//! # LarchDB CLI Entry Point
//!
//! Binary entry point for the LarchDB index shell.
//!
//! ## Usage
//!
//! ```bash
//! # Open (or create) an index file and start the shell
//! larchdb ./orders.idx
//!
//! # Show version
//! larchdb --version
//!
//! # Show help
//! larchdb --help
//! ```

use std::env;
use std::path::PathBuf;

use eyre::{bail, ensure, Result};
use larchdb::cli::Repl;
use larchdb::BPlusTree;

#[derive(Debug, Default)]
struct Args {
    index_path: Option<PathBuf>,
    show_help: bool,
    show_version: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(argv: I) -> Result<Args> {
    let mut args = Args::default();

    for arg in argv {
        match arg.as_str() {
            "--help" | "-h" => args.show_help = true,
            "--version" | "-v" => args.show_version = true,
            flag if flag.starts_with('-') => bail!("unrecognized option '{}'", flag),
            path => {
                ensure!(
                    args.index_path.is_none(),
                    "more than one index file given: '{}'",
                    path
                );
                args.index_path = Some(PathBuf::from(path));
            }
        }
    }

    Ok(args)
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = parse_args(env::args().skip(1))?;

    if args.show_help {
        print_usage();
        return Ok(());
    }
    if args.show_version {
        println!("larchdb {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let Some(index_path) = args.index_path else {
        print_usage();
        return Ok(());
    };

    let tree = BPlusTree::open(&index_path)?;
    Repl::new(tree)?.run()
}

fn print_usage() {
    println!(
        r#"Usage: larchdb [OPTIONS] <index-file>

Opens (or creates) a LarchDB index file and starts the interactive shell.

Options:
  -h, --help     Show this help message
  -v, --version  Show version information

Shell commands: get, insert, bulkload, stats, help, exit"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(words: &[&str]) -> Result<Args> {
        parse_args(words.iter().map(|w| w.to_string()))
    }

    #[test]
    fn bare_path_is_the_index_file() {
        let args = parse(&["./orders.idx"]).unwrap();

        assert_eq!(args.index_path, Some(PathBuf::from("./orders.idx")));
        assert!(!args.show_help);
        assert!(!args.show_version);
    }

    #[test]
    fn no_arguments_parses_to_empty_args() {
        let args = parse(&[]).unwrap();
        assert!(args.index_path.is_none());
    }

    #[test]
    fn flags_combine_with_a_path_in_any_order() {
        let args = parse(&["-v", "orders.idx"]).unwrap();
        assert!(args.show_version);
        assert_eq!(args.index_path, Some(PathBuf::from("orders.idx")));

        let args = parse(&["orders.idx", "--help"]).unwrap();
        assert!(args.show_help);
    }

    #[test]
    fn unrecognized_options_are_rejected() {
        let result = parse(&["--frobnicate"]);

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unrecognized option"));
    }

    #[test]
    fn a_second_path_is_rejected() {
        let result = parse(&["a.idx", "b.idx"]);

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("more than one"));
    }
}
