//! Error types for the caseforge pipeline.

use thiserror::Error;

/// Top-level error type for caseforge.
#[derive(Debug, Error)]
pub enum CaseError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// A phone model specification violates one of its invariants.
///
/// Raised before any geometry is built, so an invalid model never yields a
/// partially generated solid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecError {
    #[error("{model}: field `{field}` is not a finite number")]
    NonFinite { model: String, field: &'static str },

    #[error("{model}: field `{field}` must be positive, got {value}")]
    NonPositiveDimension {
        model: String,
        field: &'static str,
        value: f64,
    },

    #[error("{model}: corner radius {radius} exceeds half the shorter side ({max})")]
    CornerRadiusTooLarge { model: String, radius: f64, max: f64 },

    #[error("{model}: `{feature}` is enabled but no offset was given")]
    MissingFeatureOffset { model: String, feature: &'static str },

    #[error("{model}: offset `{field}` = {value} lies outside [0, {limit}]")]
    OffsetOutOfRange {
        model: String,
        field: &'static str,
        value: f64,
        limit: f64,
    },
}

/// Errors raised by the phone model catalog.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("Unknown phone model: {id}")]
    UnknownModel { id: String },

    #[error("Phone model {id} is defined more than once")]
    DuplicateModel { id: String },

    #[error("Invalid catalog entry: {0}")]
    InvalidEntry(#[from] SpecError),
}

/// Errors during solid generation and UV projection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Invalid spec: {0}")]
    InvalidSpec(#[from] SpecError),

    #[error("Invalid case parameters: {reason}")]
    InvalidParams { reason: String },

    #[error("Degenerate profile: {reason}")]
    DegenerateProfile { reason: String },

    #[error("UV projection precondition violated: {reason}")]
    ProjectionPrecondition { reason: String },

    #[error("Tessellation failed: {reason}")]
    Tessellation { reason: String },

    #[error("Unknown decorative shape: {tag}")]
    UnknownShape { tag: String },

    #[error("Generation worker exited without producing a result")]
    WorkerLost,
}

/// Errors during export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Mesh has no index buffer; non-indexed export is not supported")]
    UnsupportedMeshFormat,

    #[error("Index buffer length {len} is not a multiple of 3")]
    MalformedIndexBuffer { len: usize },

    #[error("Index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("No geometry to export")]
    NoGeometry,

    #[error("Geometry error during export: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Malformed STL: {reason}")]
    Parse { reason: String },

    #[error("I/O error during export: {0}")]
    Io(#[from] std::io::Error),
}
