//! Uv-layout command - write a case's UV layout as an SVG guide

use std::path::PathBuf;

use anyhow::{Context, Result};
use caseforge_export::{export_model_uv_layout, uv_layout_filename};
use clap::Args;

use crate::config::Settings;
use crate::output::write_file;

/// Arguments for the uv-layout command
#[derive(Args)]
pub struct UvLayoutArgs {
    /// Model id, as printed by `caseforge list`
    pub model: String,

    /// Canvas size in pixels
    #[arg(long, default_value_t = 1024)]
    pub size: u32,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

/// Execute the uv-layout command
pub fn execute(args: UvLayoutArgs, settings: &Settings) -> Result<PathBuf> {
    let svg = export_model_uv_layout(&settings.catalog, &args.model, &settings.params, args.size)
        .with_context(|| format!("Failed to render the UV layout for {}", args.model))?;
    write_file(&args.output, &uv_layout_filename(&args.model), svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseforge_core::CutoutMode;

    #[test]
    fn test_writes_svg() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.params.cutout_mode = CutoutMode::Overlay;
        let args = UvLayoutArgs {
            model: "iphone-16-pro".into(),
            size: 512,
            output: dir.path().to_path_buf(),
        };
        let path = execute(args, &settings).unwrap();
        assert_eq!(path, dir.path().join("iphone-16-pro_uv.svg"));
        let svg = std::fs::read_to_string(path).unwrap();
        assert!(svg.contains("viewBox=\"0 0 512 512\""));
    }
}
