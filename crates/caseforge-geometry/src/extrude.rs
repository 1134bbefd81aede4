//! Linear extrusion of planar contours along +z.

use std::f64::consts::FRAC_PI_2;

use caseforge_core::{BevelParams, GeometryError};

use crate::geometry::Mesh;
use crate::profile::Contour;
use crate::tessellation::triangulate_polygon;

/// How far to extrude and how to round the rims.
#[derive(Debug, Clone, Copy)]
pub struct ExtrudeOptions {
    pub depth: f64,
    pub bevel: BevelParams,
}

impl ExtrudeOptions {
    pub fn flat(depth: f64) -> Self {
        Self {
            depth,
            bevel: BevelParams::NONE,
        }
    }

    pub fn beveled(depth: f64, bevel: BevelParams) -> Self {
        Self { depth, bevel }
    }
}

/// Extrude `contour` from `z = 0` to `z = depth` into a closed solid.
///
/// The bevel rounds both rims with a quarter ellipse cut into the solid:
/// `bevel.size` horizontally and `bevel.thickness` vertically. The footprint
/// and height of the result are exactly those of the unbeveled extrusion.
pub fn extrude(contour: &Contour, options: &ExtrudeOptions) -> Result<Mesh, GeometryError> {
    if contour.len() < 3 {
        return Err(GeometryError::DegenerateProfile {
            reason: format!("cannot extrude a contour with {} points", contour.len()),
        });
    }
    let depth = options.depth;
    if !(depth.is_finite() && depth > 0.0) {
        return Err(GeometryError::InvalidParams {
            reason: format!("extrusion depth must be positive, got {depth}"),
        });
    }

    let contour = contour.clone().into_ccw();
    let rings = ring_stack(depth, &options.bevel)?;
    let n = contour.len();

    let mut mesh = Mesh::new();
    for &(inset, z) in &rings {
        let ring = contour.inset(inset);
        mesh.positions
            .extend(ring.points().iter().map(|p| p.extend(z)));
    }

    // Side walls between consecutive rings.
    for r in 0..rings.len() - 1 {
        let lower = (r * n) as u32;
        let upper = ((r + 1) * n) as u32;
        for j in 0..n as u32 {
            let next = (j + 1) % n as u32;
            let (a, b, c, d) = (lower + j, lower + next, upper + next, upper + j);
            mesh.indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
    }

    // Caps reuse the first and last ring so the solid stays welded.
    let bottom_ring = 0;
    let top_ring = (rings.len() - 1) * n;
    add_cap(&mut mesh, &contour.inset(rings[0].0), bottom_ring, 0.0, false)?;
    add_cap(
        &mut mesh,
        &contour.inset(rings[rings.len() - 1].0),
        top_ring,
        depth,
        true,
    )?;

    mesh.compute_vertex_normals();
    Ok(mesh)
}

/// `(inset, z)` for every ring from bottom to top.
fn ring_stack(depth: f64, bevel: &BevelParams) -> Result<Vec<(f64, f64)>, GeometryError> {
    if bevel.is_none() {
        return Ok(vec![(0.0, 0.0), (0.0, depth)]);
    }

    let (t, s) = (bevel.thickness, bevel.size);
    if depth <= 2.0 * t {
        return Err(GeometryError::InvalidParams {
            reason: format!("bevel thickness {t} leaves no side wall on a {depth} deep extrusion"),
        });
    }

    let k = bevel.segments.max(1);
    let mut rings = Vec::with_capacity(2 * (k as usize + 1));
    for i in 0..=k {
        let theta = i as f64 / k as f64 * FRAC_PI_2;
        rings.push((s * (1.0 - theta.sin()), t * (1.0 - theta.cos())));
    }
    for i in 0..=k {
        let theta = i as f64 / k as f64 * FRAC_PI_2;
        rings.push((s * (1.0 - theta.cos()), depth - t + t * theta.sin()));
    }
    // Pin the rims to the exact extremes.
    if let Some(last) = rings.last_mut() {
        *last = (s, depth);
    }
    rings[k as usize] = (0.0, t);
    rings[k as usize + 1] = (0.0, depth - t);
    Ok(rings)
}

fn add_cap(
    mesh: &mut Mesh,
    ring: &Contour,
    first_vertex: usize,
    z: f64,
    facing_up: bool,
) -> Result<(), GeometryError> {
    let triangulation = triangulate_polygon(ring.points())?;

    let ring_len = ring.len();
    let extra_base = mesh.positions.len();
    for p in &triangulation.points[ring_len..] {
        mesh.positions.push(p.extend(z));
    }

    let to_mesh = |i: u32| -> u32 {
        let i = i as usize;
        if i < ring_len {
            (first_vertex + i) as u32
        } else {
            (extra_base + i - ring_len) as u32
        }
    };

    for [a, b, c] in triangulation.triangles {
        if facing_up {
            mesh.indices.extend_from_slice(&[to_mesh(a), to_mesh(b), to_mesh(c)]);
        } else {
            mesh.indices.extend_from_slice(&[to_mesh(a), to_mesh(c), to_mesh(b)]);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::rounded_rect;
    use glam::{DVec2, DVec3};

    fn square() -> Contour {
        Contour::new([
            DVec2::new(-1.0, -1.0),
            DVec2::new(1.0, -1.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(-1.0, 1.0),
        ])
    }

    #[test]
    fn test_flat_extrusion_is_closed_prism() {
        let mesh = extrude(&square(), &ExtrudeOptions::flat(3.0)).unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        // Four side quads and two capped squares.
        assert_eq!(mesh.triangle_count(), 12);
        assert!(mesh.is_closed());
        assert!((mesh.volume() - 12.0).abs() < 1e-9);

        let bounds = mesh.bounding_box().unwrap();
        assert_eq!(bounds.min, DVec3::new(-1.0, -1.0, 0.0));
        assert_eq!(bounds.max, DVec3::new(1.0, 1.0, 3.0));
    }

    #[test]
    fn test_clockwise_input_is_reoriented() {
        let cw = Contour::new(square().points().iter().rev().copied());
        let mesh = extrude(&cw, &ExtrudeOptions::flat(1.0)).unwrap();
        assert!(mesh.volume() > 0.0);
    }

    #[test]
    fn test_caps_weld_to_walls() {
        let contour = rounded_rect(74.45, 152.61, 15.67).unwrap().flatten(16);
        let mesh = extrude(&contour, &ExtrudeOptions::flat(10.45)).unwrap();
        assert_eq!(mesh.vertex_count(), 2 * contour.len());
        assert!(mesh.is_closed());
    }

    #[test]
    fn test_bevel_keeps_envelope() {
        let contour = rounded_rect(74.45, 152.61, 15.67).unwrap().flatten(16);
        let bevel = BevelParams::default();
        let mesh = extrude(&contour, &ExtrudeOptions::beveled(10.45, bevel)).unwrap();

        assert!(mesh.is_closed());
        let size = mesh.bounding_box().unwrap().size();
        assert!((size.x - 74.45).abs() < 1e-9);
        assert!((size.y - 152.61).abs() < 1e-9);
        assert!((size.z - 10.45).abs() < 1e-12);
        assert_eq!(mesh.normals.len(), mesh.positions.len());
    }

    #[test]
    fn test_bevel_rims_are_inset() {
        let bevel = BevelParams {
            thickness: 0.5,
            size: 0.25,
            segments: 2,
        };
        let mesh = extrude(&square(), &ExtrudeOptions::beveled(2.0, bevel)).unwrap();
        for p in &mesh.positions {
            if p.z == 0.0 || p.z == 2.0 {
                assert!((p.x.abs() - 0.75).abs() < 1e-12);
            }
        }
        // Six rings of four vertices.
        assert_eq!(mesh.vertex_count(), 24);
    }

    #[test]
    fn test_bevel_thicker_than_half_depth() {
        let err = extrude(&square(), &ExtrudeOptions::beveled(0.8, BevelParams::default()))
            .unwrap_err();
        assert!(matches!(err, GeometryError::InvalidParams { .. }));
    }

    #[test]
    fn test_cap_normals_point_out() {
        let mesh = extrude(&square(), &ExtrudeOptions::flat(1.0)).unwrap();
        for [a, b, c] in mesh.triangles() {
            let normal = crate::geometry::face_normal(a, b, c);
            let centroid = (a + b + c) / 3.0 - DVec3::new(0.0, 0.0, 0.5);
            assert!(normal.dot(centroid) > 0.0);
        }
    }
}
