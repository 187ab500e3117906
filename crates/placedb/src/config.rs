//! Configuration types for loading and writing designs.
//!
//! - [`UserParams`] - Which input files to read. Parsed from command-style
//!   tokens with [`clap`] or deserialized with [`serde`].
//! - [`AppConfig`] - Application settings, such as the default output format.
//!
//! # Example
//!
//! ```
//! # use placedb::config::UserParams;
//! let params = UserParams::default().with_bookshelf_aux_input("design.aux");
//! assert!(params.lef_input().is_empty());
//! assert!(params.bookshelf_aux_input().is_some());
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::write::SolutionFormat;

/// Input files of one design.
///
/// The long flags keep the underscore spelling of the legacy command-line
/// interface (`--def_input`, `--bookshelf_aux_input`, ...).
#[derive(Parser, Debug, Clone, Default, PartialEq, Deserialize)]
#[command(name = "placedb", about = "Read a placement database")]
#[serde(default)]
pub struct UserParams {
    /// LEF file; repeat the flag for several files
    #[arg(long = "lef_input", value_name = "FILE")]
    lef_input: Vec<PathBuf>,

    /// DEF file
    #[arg(long = "def_input", value_name = "FILE")]
    def_input: Option<PathBuf>,

    /// Verilog netlist
    #[arg(long = "verilog_input", value_name = "FILE")]
    verilog_input: Option<PathBuf>,

    /// Bookshelf .aux file
    #[arg(long = "bookshelf_aux_input", value_name = "FILE")]
    bookshelf_aux_input: Option<PathBuf>,

    /// Bookshelf .pl file overlaid on the positions read so far
    #[arg(long = "bookshelf_pl_input", value_name = "FILE")]
    bookshelf_pl_input: Option<PathBuf>,

    /// DEF file a placer should write its result to
    #[arg(long = "def_output", value_name = "FILE")]
    def_output: Option<PathBuf>,
}

impl UserParams {
    pub fn lef_input(&self) -> &[PathBuf] {
        &self.lef_input
    }

    pub fn def_input(&self) -> Option<&Path> {
        self.def_input.as_deref()
    }

    pub fn verilog_input(&self) -> Option<&Path> {
        self.verilog_input.as_deref()
    }

    pub fn bookshelf_aux_input(&self) -> Option<&Path> {
        self.bookshelf_aux_input.as_deref()
    }

    pub fn bookshelf_pl_input(&self) -> Option<&Path> {
        self.bookshelf_pl_input.as_deref()
    }

    pub fn def_output(&self) -> Option<&Path> {
        self.def_output.as_deref()
    }

    pub fn with_lef_input(mut self, lefs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.lef_input = lefs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_def_input(mut self, def: impl Into<PathBuf>) -> Self {
        self.def_input = Some(def.into());
        self
    }

    pub fn with_verilog_input(mut self, verilog: impl Into<PathBuf>) -> Self {
        self.verilog_input = Some(verilog.into());
        self
    }

    pub fn with_bookshelf_aux_input(mut self, aux: impl Into<PathBuf>) -> Self {
        self.bookshelf_aux_input = Some(aux.into());
        self
    }

    pub fn with_bookshelf_pl_input(mut self, pl: impl Into<PathBuf>) -> Self {
        self.bookshelf_pl_input = Some(pl.into());
        self
    }

    pub fn with_def_output(mut self, def: impl Into<PathBuf>) -> Self {
        self.def_output = Some(def.into());
        self
    }

    /// Returns `true` if no input file is configured.
    pub fn is_empty(&self) -> bool {
        self.lef_input.is_empty()
            && self.def_input.is_none()
            && self.verilog_input.is_none()
            && self.bookshelf_aux_input.is_none()
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Output configuration section.
    #[serde(default)]
    output: OutputConfig,
}

impl AppConfig {
    pub fn new(output: OutputConfig) -> Self {
        Self { output }
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }
}

/// Settings for writing solutions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Default [`SolutionFormat`] when none is requested explicitly.
    #[serde(default)]
    format: SolutionFormat,
}

impl OutputConfig {
    pub fn new(format: SolutionFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> SolutionFormat {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_legacy_tokens() {
        let params = UserParams::try_parse_from([
            "placedb",
            "--lef_input",
            "tech.lef",
            "--lef_input",
            "cells.lef",
            "--def_input",
            "design.def",
        ])
        .unwrap();

        assert_eq!(
            params.lef_input(),
            [PathBuf::from("tech.lef"), PathBuf::from("cells.lef")]
        );
        assert_eq!(params.def_input(), Some(Path::new("design.def")));
        assert!(params.verilog_input().is_none());
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(UserParams::try_parse_from(["placedb", "--lef", "a.lef"]).is_err());
    }

    #[test]
    fn test_empty_params() {
        assert!(UserParams::default().is_empty());
        assert!(!UserParams::default().with_verilog_input("a.v").is_empty());
    }

    #[test]
    fn test_default_output_format() {
        assert_eq!(AppConfig::default().output().format(), SolutionFormat::Bookshelf);
    }
}
