//! Command-line argument definitions for the placedb CLI.
//!
//! The input flags are the legacy `--*_input` flags of [`UserParams`];
//! the rest select the solution to apply, where to write it and how to log.

use std::path::PathBuf;

use clap::Parser;

use placedb::{SolutionFormat, config::UserParams};

/// Command-line arguments for the placedb tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(flatten)]
    pub params: UserParams,

    /// Bookshelf .pl file whose coordinates are applied before writing
    #[arg(long, value_name = "FILE")]
    pub solution: Option<PathBuf>,

    /// Path of the written solution
    #[arg(short, long, default_value = "out.pl")]
    pub output: PathBuf,

    /// Output format; defaults to the configured one
    #[arg(long, value_enum)]
    pub format: Option<SolutionFormat>,

    /// Also dump the array snapshot of the design as JSON
    #[arg(long, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_legacy_flags_are_flattened() {
        let args = Args::try_parse_from([
            "placedb",
            "--bookshelf_aux_input",
            "tiny.aux",
            "--format",
            "def-simple",
            "-o",
            "tiny.def",
        ])
        .unwrap();

        assert_eq!(args.params.bookshelf_aux_input(), Some(Path::new("tiny.aux")));
        assert_eq!(args.format, Some(SolutionFormat::DefSimple));
        assert_eq!(args.output, PathBuf::from("tiny.def"));
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["placedb"]).unwrap();

        assert!(args.params.is_empty());
        assert_eq!(args.output, PathBuf::from("out.pl"));
        assert!(args.format.is_none());
        assert!(args.solution.is_none());
    }
}
