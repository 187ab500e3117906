//! Loading designs into a [`PlaceDb`].
//!
//! Input formats are read by [`FormatReader`]s that all populate one shared
//! [`PlaceDbBuilder`]. The Bookshelf reader is built in; LEF, DEF and
//! Verilog readers are supplied by the caller through a [`ReaderSet`]. The
//! [`Loader`] runs them in a fixed order and finalizes the database.

mod bookshelf;

pub use bookshelf::{BookshelfReader, read_solution_arrays};

use std::{ffi::OsString, path::PathBuf};

use clap::Parser as _;
use log::{debug, info};

use placedb_core::db::{PlaceDb, PlaceDbBuilder};

use crate::{
    config::UserParams,
    error::{InputFormat, PlaceDbError},
};

/// Reads one input format into a database under construction.
///
/// A reader only looks at the inputs of its own format in `params`.
pub trait FormatReader {
    /// # Errors
    ///
    /// Returns any failure to read or interpret the input. The [`Loader`]
    /// wraps it in [`PlaceDbError::Load`].
    fn read(&self, params: &UserParams, builder: &mut PlaceDbBuilder) -> Result<(), PlaceDbError>;
}

/// The readers available to a [`Loader`], one per format.
#[derive(Default)]
pub struct ReaderSet {
    lef: Option<Box<dyn FormatReader>>,
    def: Option<Box<dyn FormatReader>>,
    verilog: Option<Box<dyn FormatReader>>,
    bookshelf: BookshelfReader,
}

impl ReaderSet {
    /// A set with only the built-in Bookshelf reader.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lef(mut self, reader: impl FormatReader + 'static) -> Self {
        self.lef = Some(Box::new(reader));
        self
    }

    pub fn with_def(mut self, reader: impl FormatReader + 'static) -> Self {
        self.def = Some(Box::new(reader));
        self
    }

    pub fn with_verilog(mut self, reader: impl FormatReader + 'static) -> Self {
        self.verilog = Some(Box::new(reader));
        self
    }

    fn reader(&self, format: InputFormat) -> Option<&dyn FormatReader> {
        match format {
            InputFormat::Lef => self.lef.as_deref(),
            InputFormat::Def => self.def.as_deref(),
            InputFormat::Verilog => self.verilog.as_deref(),
            InputFormat::Bookshelf => Some(&self.bookshelf),
        }
    }
}

fn is_configured(format: InputFormat, params: &UserParams) -> bool {
    match format {
        InputFormat::Lef => !params.lef_input().is_empty(),
        InputFormat::Def => params.def_input().is_some(),
        InputFormat::Verilog => params.verilog_input().is_some(),
        InputFormat::Bookshelf => params.bookshelf_aux_input().is_some(),
    }
}

/// Runs readers in order and builds the database.
///
/// # Examples
///
/// ```rust,no_run
/// use placedb::{Loader, ReaderSet};
///
/// let loader = Loader::new(ReaderSet::new());
/// let db = loader.read_bookshelf("designs/adaptec1/adaptec1.aux")
///     .expect("Failed to load design");
/// println!("{} movable nodes", db.num_movable());
/// ```
#[derive(Default)]
pub struct Loader {
    readers: ReaderSet,
}

impl Loader {
    pub fn new(readers: ReaderSet) -> Self {
        Self { readers }
    }

    /// Loads a Bookshelf design from its `.aux` file.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceDbError::Load`] if any file of the design fails to
    /// read, and [`PlaceDbError::Build`] if the database is inconsistent.
    pub fn read_bookshelf(&self, aux: impl Into<PathBuf>) -> Result<PlaceDb, PlaceDbError> {
        self.load(&UserParams::default().with_bookshelf_aux_input(aux))
    }

    /// Loads LEF files and a DEF file. A Verilog netlist is only consulted
    /// when the DEF file defines no nets, and none is configured here.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceDbError::UnsupportedFormat`] if the LEF or DEF reader
    /// is missing, and [`PlaceDbError::Load`] if a reader fails.
    pub fn read_lef_def(
        &self,
        lefs: impl IntoIterator<Item = impl Into<PathBuf>>,
        def: impl Into<PathBuf>,
    ) -> Result<PlaceDb, PlaceDbError> {
        let params = UserParams::default()
            .with_lef_input(lefs)
            .with_def_input(def);
        self.load(&params)
    }

    /// Loads a Verilog netlist on its own.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceDbError::UnsupportedFormat`] without a Verilog reader,
    /// and [`PlaceDbError::Load`] if it fails.
    pub fn read_verilog(&self, verilog: impl Into<PathBuf>) -> Result<PlaceDb, PlaceDbError> {
        self.load(&UserParams::default().with_verilog_input(verilog))
    }

    /// Loads LEF, DEF and Verilog together. The Verilog netlist is read
    /// even when the DEF file already defines nets.
    ///
    /// # Errors
    ///
    /// Same as [`Loader::read_lef_def`], plus a missing Verilog reader.
    pub fn read_mixed(
        &self,
        lefs: impl IntoIterator<Item = impl Into<PathBuf>>,
        def: impl Into<PathBuf>,
        verilog: impl Into<PathBuf>,
    ) -> Result<PlaceDb, PlaceDbError> {
        let params = UserParams::default()
            .with_lef_input(lefs)
            .with_def_input(def)
            .with_verilog_input(verilog);
        let mut builder = PlaceDbBuilder::new();
        self.run(InputFormat::Lef, &params, &mut builder)?;
        self.run(InputFormat::Def, &params, &mut builder)?;
        self.run(InputFormat::Verilog, &params, &mut builder)?;
        self.finish(&params, builder)
    }

    /// Loads every input configured in `params`.
    ///
    /// Readers run in the order LEF, DEF, Verilog (skipped when nets are
    /// already known), Bookshelf. A `bookshelf_pl_input` is then overlaid
    /// and the database is built.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceDbError::UnsupportedFormat`] for a configured input
    /// without a reader, [`PlaceDbError::Load`] for a failing reader, and
    /// [`PlaceDbError::Build`] if the result is inconsistent.
    pub fn load(&self, params: &UserParams) -> Result<PlaceDb, PlaceDbError> {
        let mut builder = PlaceDbBuilder::new();
        self.run(InputFormat::Lef, params, &mut builder)?;
        self.run(InputFormat::Def, params, &mut builder)?;
        if builder.has_nets() {
            debug!("Nets defined by DEF, skipping Verilog");
        } else {
            self.run(InputFormat::Verilog, params, &mut builder)?;
        }
        self.run(InputFormat::Bookshelf, params, &mut builder)?;
        self.finish(params, builder)
    }

    /// Loads a design from command-style tokens, the first of which is the
    /// program name.
    ///
    /// ```rust,no_run
    /// use placedb::Loader;
    ///
    /// let db = Loader::default()
    ///     .forward(["placedb", "--bookshelf_aux_input", "adaptec1.aux"])
    ///     .expect("Failed to load design");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`PlaceDbError::Params`] for unrecognized tokens, otherwise
    /// the errors of [`Loader::load`].
    pub fn forward<I, T>(&self, tokens: I) -> Result<PlaceDb, PlaceDbError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let params = UserParams::try_parse_from(tokens)?;
        debug!(params:? = params; "Parsed legacy parameters");
        self.load(&params)
    }

    fn run(
        &self,
        format: InputFormat,
        params: &UserParams,
        builder: &mut PlaceDbBuilder,
    ) -> Result<(), PlaceDbError> {
        if !is_configured(format, params) {
            debug!(format:% = format; "No input configured, skipping");
            return Ok(());
        }
        let reader = self
            .readers
            .reader(format)
            .ok_or(PlaceDbError::UnsupportedFormat { format })?;

        info!(format:% = format; "Reading input files");
        reader
            .read(params, builder)
            .map_err(|err| PlaceDbError::load(format, err))
    }

    fn finish(&self, params: &UserParams, mut builder: PlaceDbBuilder) -> Result<PlaceDb, PlaceDbError> {
        if let Some(pl) = params.bookshelf_pl_input() {
            bookshelf::overlay_pl(pl, &mut builder)
                .map_err(|err| PlaceDbError::load(InputFormat::Bookshelf, err))?;
        }
        let db = builder.build()?;
        report(&db);
        Ok(db)
    }
}

/// Logs the size of a freshly loaded design.
fn report(db: &PlaceDb) {
    info!(
        design:% = db.design_name(),
        num_nodes = db.num_nodes(),
        num_movable = db.num_movable(),
        num_fixed = db.num_fixed(),
        num_io_pins = db.num_io_pin(),
        num_macros = db.num_macro(),
        num_nets = db.nets().len(),
        num_pins = db.pins().len(),
        num_rows = db.rows().len();
        "Design loaded"
    );
    info!(
        die_area:? = db.die_area(),
        row_height = db.row_height(),
        site_width = db.site_width(),
        utilization = db.compute_movable_util();
        "Placement region"
    );
}
