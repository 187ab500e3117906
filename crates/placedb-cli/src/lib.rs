//! placedb CLI library
//!
//! Loads a design, optionally applies a solution read from a `.pl` file,
//! and writes the placement back out.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fs::File, io::BufWriter};

use log::{info, warn};

use placedb::{Loader, PlaceDbError, Snapshot, SolutionFormat};

/// Run the placedb CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `PlaceDbError` for:
/// - Configuration loading errors
/// - Input files that cannot be read or parsed
/// - A solution that does not fit the design
/// - Output files that cannot be written
pub fn run(args: &Args) -> Result<(), PlaceDbError> {
    info!(output_path:? = args.output; "Processing design");

    let app_config = config::load_config(args.config.as_ref())?;

    if args.params.is_empty() {
        warn!("No input files given, writing an empty design");
    }
    let mut db = Loader::default().load(&args.params)?;

    if let Some(solution) = &args.solution {
        info!(solution:? = solution; "Applying solution");
        let (xs, ys) = placedb::read_solution_arrays(&db, solution)?;
        placedb::apply(&mut db, &xs, &ys)?;
    }

    let format = args.format.unwrap_or(app_config.output().format());
    placedb::try_write::<f64>(&db, &args.output, format, None, None)?;
    info!(output_file:? = args.output, format:? = format; "Solution written");

    if let Some(def_output) = args.params.def_output() {
        placedb::try_write::<f64>(&db, def_output, SolutionFormat::Def, None, None)?;
        info!(output_file:? = def_output; "DEF written");
    }

    if let Some(path) = &args.snapshot {
        let out = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(out, &Snapshot::from_db(&db)).map_err(std::io::Error::from)?;
        info!(output_file:? = path; "Snapshot written");
    }

    Ok(())
}
