//! Part command - write a decorative part as STL

use std::path::PathBuf;

use anyhow::Result;
use caseforge_export::{mesh_to_stl, mesh_to_stl_ascii, stl_filename};
use caseforge_geometry::{DecorativeShape, PlacedPart};
use clap::Args;

use crate::output::write_file;

/// Arguments for the part command
#[derive(Args)]
pub struct PartArgs {
    /// Shape tag: heart, star, flower, circle, square, triangle, hexagon,
    /// diamond, moon, butterfly, cloud or sparkle
    pub shape: DecorativeShape,

    /// Uniform scale factor
    #[arg(long, default_value_t = 1.0)]
    pub scale: f64,

    /// Write binary STL instead of ASCII
    #[arg(long)]
    pub binary: bool,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

/// Execute the part command
pub fn execute(args: PartArgs) -> Result<PathBuf> {
    let part = PlacedPart {
        scale: args.scale,
        ..PlacedPart::new(args.shape)
    };
    let mesh = part.to_mesh()?;
    let file_name = stl_filename(args.shape.tag());
    if args.binary {
        write_file(&args.output, &file_name, mesh_to_stl(&mesh)?)
    } else {
        write_file(&args.output, &file_name, mesh_to_stl_ascii(&mesh, args.shape.tag())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseforge_export::parse_ascii_stl;

    #[test]
    fn test_writes_named_solid() {
        let dir = tempfile::tempdir().unwrap();
        let args = PartArgs {
            shape: DecorativeShape::Star,
            scale: 2.0,
            binary: false,
            output: dir.path().to_path_buf(),
        };
        let path = execute(args).unwrap();
        assert_eq!(path, dir.path().join("star.stl"));

        let doc = parse_ascii_stl(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(doc.name, "star");
        let max_x = doc
            .facets
            .iter()
            .flat_map(|f| f.vertices)
            .map(|v| v.x)
            .fold(f64::MIN, f64::max);
        assert!((max_x - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_bad_scale() {
        let dir = tempfile::tempdir().unwrap();
        let args = PartArgs {
            shape: DecorativeShape::Moon,
            scale: -1.0,
            binary: false,
            output: dir.path().to_path_buf(),
        };
        assert!(execute(args).is_err());
    }
}
