//! Export formats for caseforge meshes and models.
//!
//! Supported formats:
//! - STL (ASCII and binary, for 3D printing), with a reader for checking output
//! - OpenSCAD parameter files for the parametric cover template
//! - SVG (UV layout guide for the paint canvas)

pub mod scad;
pub mod stl;

#[cfg(feature = "svg")]
pub mod svg;

use caseforge_core::{CaseError, CaseParams, Catalog, ExportError};
use caseforge_geometry::{generate_case_solid_with, CaseSolid};

// Re-export commonly used types
pub use scad::{generate_all, generate_scad_params, scad_filename};
pub use stl::{
    mesh_to_stl, mesh_to_stl_ascii, parse_ascii_stl, parse_binary_stl, serialize_mesh,
    serialize_mesh_binary, stl_filename, StlDocument, StlFacet, SOLID_NAME,
};
#[cfg(feature = "svg")]
pub use svg::{export_uv_layout, uv_layout_filename, SvgStyle};

/// Export a generated case as ASCII STL.
pub fn export_stl_ascii(solid: &CaseSolid) -> Result<String, ExportError> {
    mesh_to_stl_ascii(solid.mesh(), SOLID_NAME)
}

/// Export a generated case as binary STL.
pub fn export_stl(solid: &CaseSolid) -> Result<Vec<u8>, ExportError> {
    mesh_to_stl(solid.mesh())
}

/// Export the UV layout of a generated case as SVG.
#[cfg(feature = "svg")]
pub fn export_case_uv_layout(solid: &CaseSolid, size: u32) -> Result<String, ExportError> {
    let layout = caseforge_geometry::UvLayout::from_mesh(solid.mesh())?;
    export_uv_layout(&layout, size)
}

/// STL flavor written by [`export_model_stl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StlEncoding {
    #[default]
    Ascii,
    Binary,
}

/// Look up `model_id`, generate its case and encode it as STL.
pub fn export_model_stl(
    catalog: &Catalog,
    model_id: &str,
    params: &CaseParams,
    encoding: StlEncoding,
) -> Result<Vec<u8>, CaseError> {
    let solid = generate_case_solid_with(catalog.get(model_id)?, params)?;
    let bytes = match encoding {
        StlEncoding::Ascii => export_stl_ascii(&solid)?.into_bytes(),
        StlEncoding::Binary => export_stl(&solid)?,
    };
    Ok(bytes)
}

/// Look up `model_id`, generate its case and render its UV layout.
#[cfg(feature = "svg")]
pub fn export_model_uv_layout(
    catalog: &Catalog,
    model_id: &str,
    params: &CaseParams,
    size: u32,
) -> Result<String, CaseError> {
    let solid = generate_case_solid_with(catalog.get(model_id)?, params)?;
    Ok(export_case_uv_layout(&solid, size)?)
}
