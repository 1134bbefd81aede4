//! Scad command - write OpenSCAD parameter files

use std::path::PathBuf;

use anyhow::{bail, Result};
use caseforge_export::{generate_all, generate_scad_params, scad_filename};
use clap::Args;

use crate::config::Settings;
use crate::output::write_file;

/// Arguments for the scad command
#[derive(Args)]
pub struct ScadArgs {
    /// Model id, as printed by `caseforge list`
    #[arg(conflicts_with = "all")]
    pub model: Option<String>,

    /// Write one file per known model
    #[arg(long)]
    pub all: bool,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

/// Execute the scad command
///
/// Returns the paths of the written files.
pub fn execute(args: ScadArgs, settings: &Settings) -> Result<Vec<PathBuf>> {
    match (args.model, args.all) {
        (Some(model), false) => {
            let spec = settings.catalog.get(&model)?;
            let path = write_file(
                &args.output,
                &scad_filename(&spec.id),
                generate_scad_params(spec, &settings.params),
            )?;
            Ok(vec![path])
        }
        (None, true) => generate_all(&settings.catalog, &settings.params)
            .into_iter()
            .map(|(file_name, contents)| write_file(&args.output, &file_name, contents))
            .collect(),
        _ => bail!("Pass a model id or --all"),
    }
}
