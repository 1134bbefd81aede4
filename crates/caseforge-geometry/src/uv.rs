//! Box-projected texture coordinates.
//!
//! Every vertex is projected onto the bounding-box face its normal points at
//! most. The live 3D view and the flat paint canvas both go through
//! [`project_uv`], so a texture painted on the canvas lands exactly where the
//! 3D view shows it.

use caseforge_core::GeometryError;
use glam::{DVec2, DVec3};

use crate::geometry::{BoundingBox, Mesh};

/// The coordinate plane a vertex is projected onto, named by the axis it
/// looks along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionAxis {
    /// Front and back faces: `u = x`, `v = y`.
    Z,
    /// Left and right sides: `u = z`, `v = y`.
    X,
    /// Top and bottom edges: `u = x`, `v = z`.
    Y,
}

/// Pick the projection axis for a normal.
///
/// Ties go to z, then x, then y.
pub fn dominant_axis(normal: DVec3) -> ProjectionAxis {
    let n = normal.abs();
    if n.z >= n.x && n.z >= n.y {
        ProjectionAxis::Z
    } else if n.x >= n.y && n.x >= n.z {
        ProjectionAxis::X
    } else {
        ProjectionAxis::Y
    }
}

/// Project a single vertex. `bbox` must have a positive extent on every axis.
pub fn project_vertex(position: DVec3, normal: DVec3, bbox: &BoundingBox) -> DVec2 {
    let size = bbox.size();
    let rel = position - bbox.min;
    match dominant_axis(normal) {
        ProjectionAxis::Z => DVec2::new(rel.x / size.x, rel.y / size.y),
        ProjectionAxis::X => DVec2::new(rel.z / size.z, rel.y / size.y),
        ProjectionAxis::Y => DVec2::new(rel.x / size.x, rel.z / size.z),
    }
}

/// Compute one `(u, v)` per vertex.
///
/// UVs are not clamped; with `bbox` computed from `positions` they fall in
/// `[0, 1]` on their own.
pub fn project_uv(
    positions: &[DVec3],
    normals: &[DVec3],
    bbox: &BoundingBox,
) -> Result<Vec<DVec2>, GeometryError> {
    if normals.len() != positions.len() {
        return Err(GeometryError::ProjectionPrecondition {
            reason: format!(
                "{} normals for {} positions",
                normals.len(),
                positions.len()
            ),
        });
    }
    if bbox.is_degenerate() {
        return Err(GeometryError::ProjectionPrecondition {
            reason: format!("bounding box has no volume: {:?}", bbox.size()),
        });
    }

    Ok(positions
        .iter()
        .zip(normals)
        .map(|(&p, &n)| project_vertex(p, n, bbox))
        .collect())
}

/// Largest bounding-box center offset still treated as centered, relative to
/// the box diagonal.
const CENTER_TOLERANCE: f64 = 1e-9;

impl Mesh {
    /// Attach box-projected UVs.
    ///
    /// The mesh must already carry one normal per vertex and be centered on
    /// the origin; projecting an uncentered mesh would shift every UV.
    pub fn compute_uvs(&mut self) -> Result<(), GeometryError> {
        if self.positions.is_empty() {
            return Err(GeometryError::ProjectionPrecondition {
                reason: "mesh has no vertices".into(),
            });
        }
        if self.normals.len() != self.positions.len() {
            return Err(GeometryError::ProjectionPrecondition {
                reason: "normals have not been computed".into(),
            });
        }
        let bbox = self
            .bounding_box()
            .ok_or_else(|| GeometryError::ProjectionPrecondition {
                reason: "mesh has no vertices".into(),
            })?;
        let offset = bbox.center().length();
        if offset > CENTER_TOLERANCE * bbox.size().length().max(1.0) {
            return Err(GeometryError::ProjectionPrecondition {
                reason: format!("mesh is not centered (center is {offset} from the origin)"),
            });
        }

        self.uvs = Some(project_uv(&self.positions, &self.normals, &bbox)?);
        Ok(())
    }
}

/// The UV triangles of a projected mesh, as drawn over the paint canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct UvLayout {
    triangles: Vec<[DVec2; 3]>,
}

impl UvLayout {
    pub fn from_mesh(mesh: &Mesh) -> Result<Self, GeometryError> {
        let uvs = mesh
            .uvs
            .as_ref()
            .ok_or_else(|| GeometryError::ProjectionPrecondition {
                reason: "mesh has no UVs".into(),
            })?;
        let triangles = mesh
            .indices
            .chunks_exact(3)
            .map(|tri| [uvs[tri[0] as usize], uvs[tri[1] as usize], uvs[tri[2] as usize]])
            .collect();
        Ok(Self { triangles })
    }

    pub fn triangles(&self) -> &[[DVec2; 3]] {
        &self.triangles
    }

    /// Canvas position of a UV. Canvas rows grow downwards, so `v` flips.
    pub fn uv_to_pixel(uv: DVec2, width: f64, height: f64) -> DVec2 {
        DVec2::new(uv.x * width, (1.0 - uv.y) * height)
    }

    pub fn to_pixels(&self, width: f64, height: f64) -> Vec<[DVec2; 3]> {
        self.triangles
            .iter()
            .map(|tri| tri.map(|uv| Self::uv_to_pixel(uv, width, height)))
            .collect()
    }
}
