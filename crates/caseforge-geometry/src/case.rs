//! Phone case solid generation.
//!
//! The pipeline runs in a fixed order: validate, build the outer solid and the
//! cutouts, combine them, center, orient, then project UVs. UV projection
//! depends on the centered bounding box and the final normals, so it always
//! runs last.

use caseforge_core::{BevelParams, CaseParams, CutoutMode, GeometryError, PhoneModelSpec};
use glam::{DMat4, DVec3};
use tracing::debug;

use crate::csg::Solid;
use crate::cutouts::{build_cutouts, Cutout};
use crate::extrude::{extrude, ExtrudeOptions};
use crate::geometry::Mesh;
use crate::profile::rounded_rect;

/// A generated case. Immutable; regenerate when the model changes.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseSolid {
    model_id: String,
    mesh: Mesh,
    cutouts: Vec<Cutout>,
    envelope: DVec3,
}

impl CaseSolid {
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// The shell, centered, oriented and carrying normals and UVs.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Cutout solids in the same frame as [`CaseSolid::mesh`].
    pub fn cutouts(&self) -> &[Cutout] {
        &self.cutouts
    }

    /// Nominal outer width, height and depth.
    pub fn envelope(&self) -> DVec3 {
        self.envelope
    }
}

/// Outer width, height and depth of the case for `spec`.
pub fn case_envelope(spec: &PhoneModelSpec, params: &CaseParams) -> DVec3 {
    DVec3::new(
        spec.width + 2.0 * params.wall_thickness,
        spec.height + 2.0 * params.wall_thickness,
        spec.depth + params.added_depth(),
    )
}

/// Rotation from the build frame to the display frame: half a turn about y,
/// so the back plate faces `+z` and offsets read left to right along `+x`.
///
/// Written as a scale so the half turn is exact.
pub fn canonical_orientation() -> DMat4 {
    DMat4::from_scale(DVec3::new(-1.0, 1.0, -1.0))
}

/// Generate a case with the default parameters.
pub fn generate_case_solid(spec: &PhoneModelSpec) -> Result<CaseSolid, GeometryError> {
    generate_case_solid_with(spec, &CaseParams::default())
}

/// Generate a case solid for `spec`.
///
/// Fails before building anything when the model or the parameters are
/// invalid.
pub fn generate_case_solid_with(
    spec: &PhoneModelSpec,
    params: &CaseParams,
) -> Result<CaseSolid, GeometryError> {
    spec.validate()?;
    params.validate()?;

    let envelope = case_envelope(spec, params);
    let outer_contour = rounded_rect(
        envelope.x,
        envelope.y,
        spec.corner_radius + params.wall_thickness,
    )?
    .flatten(params.corner_segments);
    let outer = extrude(
        &outer_contour,
        &ExtrudeOptions::beveled(envelope.z, params.bevel),
    )?;

    let mut cutouts = build_cutouts(spec, params)?;

    let mut mesh = match params.cutout_mode {
        CutoutMode::Overlay => outer,
        CutoutMode::Subtract => {
            let cavity = build_cavity(spec, params)?;
            let removed = cutouts
                .iter()
                .fold(Solid::from_mesh(&cavity), |acc, cutout| {
                    acc.union(&Solid::from_mesh(&cutout.mesh))
                });
            let shell = Solid::from_mesh(&outer).subtract(&removed);
            if shell.is_empty() {
                return Err(GeometryError::Tessellation {
                    reason: format!("subtracting the cutouts left nothing of {}", spec.id),
                });
            }
            // Split vertices carry interpolated input normals; average the
            // final faces instead.
            let mut mesh = shell.to_mesh();
            mesh.compute_vertex_normals();
            mesh
        }
    };

    let bbox = mesh.bounding_box().ok_or_else(|| GeometryError::Tessellation {
        reason: format!("case for {} has no vertices", spec.id),
    })?;
    let to_display = canonical_orientation() * DMat4::from_translation(-bbox.center());
    mesh.transform(to_display);
    for cutout in &mut cutouts {
        cutout.mesh.transform(to_display);
    }

    mesh.compute_uvs()?;

    debug!(
        model = %spec.id,
        mode = ?params.cutout_mode,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "generated case solid"
    );

    Ok(CaseSolid {
        model_id: spec.id.clone(),
        mesh,
        cutouts,
        envelope,
    })
}

/// The phone-shaped pocket, from the top of the back plate out past the rim.
fn build_cavity(spec: &PhoneModelSpec, params: &CaseParams) -> Result<Mesh, GeometryError> {
    let contour = rounded_rect(spec.width, spec.height, spec.corner_radius)?
        .flatten(params.corner_segments);
    let depth = spec.depth + params.lip_height + params.cavity_overshoot;
    let mut cavity = extrude(
        &contour,
        &ExtrudeOptions {
            depth,
            bevel: BevelParams::NONE,
        },
    )?;
    cavity.translate(DVec3::new(0.0, 0.0, params.base_thickness));
    Ok(cavity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cutouts::CutoutKind;
    use caseforge_core::{catalog, SpecError};

    fn overlay() -> CaseParams {
        CaseParams::default().with_cutout_mode(CutoutMode::Overlay)
    }

    fn sixteen_pro() -> PhoneModelSpec {
        catalog().get("iphone-16-pro").unwrap().clone()
    }

    #[test]
    fn test_envelope_of_sixteen_pro() {
        let spec = sixteen_pro();
        let solid = generate_case_solid_with(&spec, &overlay()).unwrap();
        let size = solid.mesh().bounding_box().unwrap().size();

        assert!((size.x - 74.45).abs() < 1e-9);
        assert!((size.y - 152.61).abs() < 1e-9);
        assert!((size.z - (8.25 + 2.2)).abs() < 1e-9);
        assert!((solid.envelope() - size).abs().max_element() < 1e-9);
    }

    #[test]
    fn test_centered_with_uvs() {
        let solid = generate_case_solid_with(&sixteen_pro(), &overlay()).unwrap();
        let mesh = solid.mesh();
        assert!(mesh.bounding_box().unwrap().center().length() < 1e-9);

        let uvs = mesh.uvs.as_ref().unwrap();
        assert_eq!(uvs.len(), mesh.vertex_count());
        assert_eq!(mesh.normals.len(), mesh.vertex_count());
        for uv in uvs {
            assert!((0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y));
        }
    }

    #[test]
    fn test_overlay_is_closed_and_outward() {
        let solid = generate_case_solid_with(&sixteen_pro(), &overlay()).unwrap();
        assert!(solid.mesh().is_closed());
        assert!(solid.mesh().volume() > 0.0);
    }

    #[test]
    fn test_back_faces_positive_z() {
        let spec = sixteen_pro();
        let solid = generate_case_solid_with(&spec, &overlay()).unwrap();
        let camera = solid
            .cutouts()
            .iter()
            .find(|c| c.kind == CutoutKind::Camera)
            .unwrap();
        let bounds = camera.mesh.bounding_box().unwrap();
        let half_depth = solid.envelope().z / 2.0;

        // The camera pierces the back plate, which is now the +z face.
        assert!(bounds.max.z > half_depth);
        // Seen from the back, the camera island is in the top-left corner.
        assert!(bounds.center().x < 0.0);
        assert!(bounds.center().y > 0.0);

        let volume = solid
            .cutouts()
            .iter()
            .find(|c| c.kind == CutoutKind::VolumeButton)
            .unwrap();
        assert!(volume.mesh.bounding_box().unwrap().center().x > 0.0);
    }

    #[test]
    fn test_deterministic() {
        let spec = sixteen_pro();
        let a = generate_case_solid_with(&spec, &overlay()).unwrap();
        let b = generate_case_solid_with(&spec, &overlay()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_spec_is_rejected() {
        let mut spec = sixteen_pro();
        spec.height = -1.0;
        let err = generate_case_solid(&spec).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::InvalidSpec(SpecError::NonPositiveDimension { field: "height", .. })
        ));
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        let params = CaseParams {
            wall_thickness: -1.0,
            ..CaseParams::default()
        };
        assert!(matches!(
            generate_case_solid_with(&sixteen_pro(), &params),
            Err(GeometryError::InvalidParams { .. })
        ));
    }

    #[test]
    fn test_subtract_cuts_real_holes() {
        let spec = catalog().get("iphone-14-pro").unwrap();
        let params = CaseParams {
            corner_segments: 4,
            ..CaseParams::default()
        };
        let shell = generate_case_solid_with(spec, &params).unwrap();
        let solid_block = generate_case_solid_with(spec, &params.with_cutout_mode(CutoutMode::Overlay))
            .unwrap();

        let shell_volume = shell.mesh().volume();
        let block_volume = solid_block.mesh().volume();
        assert!(shell_volume > 0.0);
        // Most of the block is the phone pocket.
        assert!(shell_volume < 0.5 * block_volume);

        let size = shell.mesh().bounding_box().unwrap().size();
        assert!((size - shell.envelope()).abs().max_element() < 1e-6);

        let uvs = shell.mesh().uvs.as_ref().unwrap();
        assert!(uvs.iter().all(|uv| (0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y)));

        // Normals are the face average of the final shell.
        let mut recomputed = shell.mesh().clone();
        recomputed.compute_vertex_normals();
        for (n, expected) in shell.mesh().normals.iter().zip(&recomputed.normals) {
            assert!((*n - *expected).length() < 1e-9);
        }
    }
}
