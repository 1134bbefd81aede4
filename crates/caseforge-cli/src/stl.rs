//! Stl command - generate a case and write it as STL

use std::path::PathBuf;

use anyhow::{Context, Result};
use caseforge_core::CutoutMode;
use caseforge_export::{export_model_stl, stl_filename, StlEncoding};
use clap::Args;
use tracing::info;

use crate::config::Settings;
use crate::output::write_file;

/// Arguments for the stl command
#[derive(Args)]
pub struct StlArgs {
    /// Model id, as printed by `caseforge list`
    pub model: String,

    /// Write binary STL instead of ASCII
    #[arg(long)]
    pub binary: bool,

    /// Skip the boolean cutouts and write the outer solid only
    #[arg(long)]
    pub overlay: bool,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

/// Execute the stl command
///
/// Returns the path of the written file.
pub fn execute(args: StlArgs, settings: &Settings) -> Result<PathBuf> {
    let mut params = settings.params;
    if args.overlay {
        params.cutout_mode = CutoutMode::Overlay;
    }
    let encoding = if args.binary {
        StlEncoding::Binary
    } else {
        StlEncoding::Ascii
    };

    info!(model = %args.model, mode = ?params.cutout_mode, "generating case");
    let contents = export_model_stl(&settings.catalog, &args.model, &params, encoding)
        .with_context(|| format!("Failed to export case for {}", args.model))?;

    write_file(&args.output, &stl_filename(&args.model), contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseforge_export::{parse_ascii_stl, parse_binary_stl};

    fn args(dir: &std::path::Path, binary: bool) -> StlArgs {
        StlArgs {
            model: "iphone-15-pro".into(),
            binary,
            overlay: true,
            output: dir.to_path_buf(),
        }
    }

    #[test]
    fn test_writes_ascii_stl() {
        let dir = tempfile::tempdir().unwrap();
        let path = execute(args(dir.path(), false), &Settings::default()).unwrap();
        assert_eq!(path, dir.path().join("iphone-15-pro.stl"));

        let doc = parse_ascii_stl(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(!doc.facets.is_empty());
    }

    #[test]
    fn test_writes_binary_stl() {
        let dir = tempfile::tempdir().unwrap();
        let path = execute(args(dir.path(), true), &Settings::default()).unwrap();
        let doc = parse_binary_stl(&std::fs::read(&path).unwrap()).unwrap();
        assert!(!doc.facets.is_empty());
    }

    #[test]
    fn test_unknown_model_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut bad = args(dir.path(), false);
        bad.model = "nope".into();
        let err = execute(bad, &Settings::default()).unwrap_err();
        assert!(format!("{err:#}").contains("Unknown phone model: nope"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
