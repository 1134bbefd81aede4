//! Tessellation of primitives and planar polygons to triangles.

use std::f64::consts::{PI, TAU};

use caseforge_core::GeometryError;
use glam::{DVec2, DVec3};
use indexmap::IndexMap;
use lyon::math::point;
use lyon::path::{EndpointId, Path};
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, VertexBuffers, VertexSource,
};

use crate::geometry::{face_normal, Mesh};

/// Tessellation quality settings.
#[derive(Debug, Clone, Copy)]
pub struct TessellationOptions {
    /// Number of segments around curved surfaces.
    pub curve_segments: u32,
    /// Number of latitude rings on spheres.
    pub rings: u32,
}

impl Default for TessellationOptions {
    fn default() -> Self {
        Self {
            curve_segments: 32,
            rings: 32,
        }
    }
}

/// Triangles covering a simple polygon.
///
/// `points` starts with the input vertices in their original order; any
/// vertex the tessellator had to add is appended after them.
#[derive(Debug, Clone)]
pub struct Triangulation {
    pub points: Vec<DVec2>,
    /// Counter-clockwise triangles indexing into `points`.
    pub triangles: Vec<[u32; 3]>,
}

#[derive(Debug, Clone, Copy)]
enum CapVertex {
    Endpoint(u32),
    Split { from: u32, to: u32, t: f64 },
    Free(DVec2),
}

/// Triangulate a closed polygon with lyon's fill tessellator.
///
/// Output positions are the exact input coordinates, not lyon's `f32`
/// copies: every tessellator vertex is traced back to the path endpoint (or
/// edge) it came from. Sources are only reported when tessellating by id.
pub fn triangulate_polygon(points: &[DVec2]) -> Result<Triangulation, GeometryError> {
    if points.len() < 3 {
        return Err(GeometryError::DegenerateProfile {
            reason: format!("polygon needs at least 3 points, got {}", points.len()),
        });
    }

    let mut builder = Path::builder();
    let mut endpoints: IndexMap<usize, u32> = IndexMap::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        let at = point(p.x as f32, p.y as f32);
        let id = if i == 0 {
            builder.begin(at)
        } else {
            builder.line_to(at)
        };
        endpoints.insert(id.to_usize(), i as u32);
    }
    builder.end(true);
    let path = builder.build();

    let lookup = |id: EndpointId| endpoints.get(&id.to_usize()).copied();

    let mut buffers: VertexBuffers<CapVertex, u32> = VertexBuffers::new();
    let mut tessellator = FillTessellator::new();
    tessellator
        .tessellate_with_ids(
            path.id_iter(),
            &path,
            None,
            &FillOptions::default().with_fill_rule(FillRule::EvenOdd),
            &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex| {
                for source in vertex.sources() {
                    match source {
                        VertexSource::Endpoint { id } => {
                            if let Some(index) = lookup(id) {
                                return CapVertex::Endpoint(index);
                            }
                        }
                        VertexSource::Edge { from, to, t } => {
                            if let (Some(from), Some(to)) = (lookup(from), lookup(to)) {
                                return CapVertex::Split {
                                    from,
                                    to,
                                    t: t as f64,
                                };
                            }
                        }
                    }
                }
                let p = vertex.position();
                CapVertex::Free(DVec2::new(p.x as f64, p.y as f64))
            }),
        )
        .map_err(|e| GeometryError::Tessellation {
            reason: format!("{e:?}"),
        })?;

    let mut out_points = points.to_vec();
    let remap: Vec<u32> = buffers
        .vertices
        .iter()
        .map(|vertex| match *vertex {
            CapVertex::Endpoint(index) => index,
            CapVertex::Split { from, to, t } => {
                let a = points[from as usize];
                let b = points[to as usize];
                out_points.push(a.lerp(b, t));
                (out_points.len() - 1) as u32
            }
            CapVertex::Free(p) => {
                out_points.push(p);
                (out_points.len() - 1) as u32
            }
        })
        .collect();

    let triangles = buffers
        .indices
        .chunks_exact(3)
        .map(|tri| {
            let [a, b, c] = [
                remap[tri[0] as usize],
                remap[tri[1] as usize],
                remap[tri[2] as usize],
            ];
            let (pa, pb, pc) = (
                out_points[a as usize],
                out_points[b as usize],
                out_points[c as usize],
            );
            if (pb - pa).perp_dot(pc - pa) < 0.0 {
                [a, c, b]
            } else {
                [a, b, c]
            }
        })
        .collect();

    Ok(Triangulation {
        points: out_points,
        triangles,
    })
}

fn push_flat_triangle(mesh: &mut Mesh, a: DVec3, b: DVec3, c: DVec3) {
    let normal = face_normal(a, b, c);
    let base = mesh.positions.len() as u32;
    mesh.positions.extend_from_slice(&[a, b, c]);
    mesh.normals.extend_from_slice(&[normal; 3]);
    mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
}

/// Tessellate a box centered at origin.
pub fn tessellate_box(size: DVec3) -> Mesh {
    let h = size * 0.5;
    let (x0, y0, z0) = (-h.x, -h.y, -h.z);
    let (x1, y1, z1) = (h.x, h.y, h.z);

    // Each face: outward normal and its corners counter-clockwise from outside.
    let faces = [
        (DVec3::X, [[x1, y0, z0], [x1, y1, z0], [x1, y1, z1], [x1, y0, z1]]),
        (DVec3::NEG_X, [[x0, y0, z0], [x0, y0, z1], [x0, y1, z1], [x0, y1, z0]]),
        (DVec3::Y, [[x0, y1, z0], [x0, y1, z1], [x1, y1, z1], [x1, y1, z0]]),
        (DVec3::NEG_Y, [[x0, y0, z0], [x1, y0, z0], [x1, y0, z1], [x0, y0, z1]]),
        (DVec3::Z, [[x0, y0, z1], [x1, y0, z1], [x1, y1, z1], [x0, y1, z1]]),
        (DVec3::NEG_Z, [[x0, y0, z0], [x0, y1, z0], [x1, y1, z0], [x1, y0, z0]]),
    ];

    let mut mesh = Mesh {
        positions: Vec::with_capacity(24),
        normals: Vec::with_capacity(24),
        uvs: None,
        indices: Vec::with_capacity(36),
    };

    for (normal, corners) in faces {
        let base = mesh.positions.len() as u32;
        for corner in corners {
            mesh.positions.push(DVec3::from_array(corner));
            mesh.normals.push(normal);
        }
        // Two triangles per face
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    mesh
}

/// Tessellate a UV sphere centered at origin with its poles on the z axis.
pub fn tessellate_sphere(radius: f64, options: &TessellationOptions) -> Mesh {
    let segments = options.curve_segments.max(3);
    let rings = options.rings.max(2);
    let stride = segments + 1;

    let mut mesh = Mesh::new();
    for i in 0..=rings {
        let theta = i as f64 / rings as f64 * PI;
        for j in 0..=segments {
            let phi = j as f64 / segments as f64 * TAU;
            let normal = DVec3::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos());
            mesh.positions.push(normal * radius);
            mesh.normals.push(normal);
        }
    }

    for i in 0..rings {
        for j in 0..segments {
            let current = i * stride + j;
            let next = current + stride;
            // Skip the slivers that collapse onto a pole.
            if i != 0 {
                mesh.indices.extend_from_slice(&[current, next, current + 1]);
            }
            if i != rings - 1 {
                mesh.indices.extend_from_slice(&[current + 1, next, next + 1]);
            }
        }
    }

    mesh
}

/// Tessellate a flat-shaded regular octahedron centered at origin.
pub fn tessellate_octahedron(radius: f64) -> Mesh {
    let mut mesh = Mesh::new();
    for sx in [1.0, -1.0] {
        for sy in [1.0, -1.0] {
            for sz in [1.0, -1.0] {
                let a = DVec3::new(sx * radius, 0.0, 0.0);
                let b = DVec3::new(0.0, sy * radius, 0.0);
                let c = DVec3::new(0.0, 0.0, sz * radius);
                if sx * sy * sz > 0.0 {
                    push_flat_triangle(&mut mesh, a, b, c);
                } else {
                    push_flat_triangle(&mut mesh, a, c, b);
                }
            }
        }
    }
    mesh
}

/// Tessellate a flat-shaded cone (a pyramid for low segment counts) along
/// the z axis, centered at origin with its apex at `+height / 2`.
pub fn tessellate_cone(radius: f64, height: f64, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let half = height / 2.0;
    let apex = DVec3::new(0.0, 0.0, half);
    let rim: Vec<DVec3> = (0..segments)
        .map(|j| {
            let angle = j as f64 / segments as f64 * TAU;
            DVec3::new(angle.cos() * radius, angle.sin() * radius, -half)
        })
        .collect();

    let mut mesh = Mesh::new();
    for j in 0..rim.len() {
        let next = (j + 1) % rim.len();
        push_flat_triangle(&mut mesh, rim[j], rim[next], apex);
    }
    for j in 1..rim.len() - 1 {
        push_flat_triangle(&mut mesh, rim[0], rim[j + 1], rim[j]);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward(mesh: &Mesh) {
        for [a, b, c] in mesh.triangles() {
            let normal = face_normal(a, b, c);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "inward face at {centroid:?}");
        }
    }

    #[test]
    fn test_box() {
        let mesh = tessellate_box(DVec3::new(2.0, 4.0, 6.0));
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert_outward(&mesh);

        let bounds = mesh.bounding_box().unwrap();
        assert_eq!(bounds.size(), DVec3::new(2.0, 4.0, 6.0));
        assert_eq!(bounds.center(), DVec3::ZERO);
    }

    #[test]
    fn test_box_normals_match_faces() {
        let mesh = tessellate_box(DVec3::ONE);
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.positions[i as usize]);
            assert_eq!(face_normal(a, b, c), mesh.normals[tri[0] as usize]);
        }
    }

    #[test]
    fn test_sphere() {
        let options = TessellationOptions {
            curve_segments: 16,
            rings: 8,
        };
        let mesh = tessellate_sphere(5.0, &options);
        assert_outward(&mesh);
        // Two pole rows lose one triangle per segment.
        assert_eq!(mesh.triangle_count(), 16 * 8 * 2 - 2 * 16);

        let bounds = mesh.bounding_box().unwrap();
        assert!((bounds.size().z - 10.0).abs() < 1e-9);
        let exact = 4.0 / 3.0 * PI * 125.0;
        assert!(mesh.volume() < exact);
        assert!(mesh.volume() > 0.8 * exact);
    }

    #[test]
    fn test_octahedron() {
        let mesh = tessellate_octahedron(5.0);
        assert_eq!(mesh.triangle_count(), 8);
        assert_outward(&mesh);
        // Volume of a regular octahedron with vertex radius r is 4r^3/3.
        assert!((mesh.volume() - 4.0 * 125.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_three_sided_cone() {
        let mesh = tessellate_cone(5.0, 8.0, 3);
        assert_eq!(mesh.triangle_count(), 4);
        assert!(mesh.volume() > 0.0);
        let bounds = mesh.bounding_box().unwrap();
        assert!((bounds.size().z - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_triangulate_square() {
        let square = [
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
        ];
        let result = triangulate_polygon(&square).unwrap();
        assert_eq!(result.points.len(), 4);
        assert_eq!(result.triangles.len(), 2);

        let area: f64 = result
            .triangles
            .iter()
            .map(|&[a, b, c]| {
                let [a, b, c] = [a, b, c].map(|i| result.points[i as usize]);
                (b - a).perp_dot(c - a) / 2.0
            })
            .sum();
        assert!((area - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_triangulate_keeps_exact_coordinates() {
        let points = [
            DVec2::new(0.1234567891, 0.0),
            DVec2::new(10.000000001, 0.0),
            DVec2::new(5.0, 7.777777777),
        ];
        let result = triangulate_polygon(&points).unwrap();
        assert_eq!(&result.points[..3], &points);
    }

    #[test]
    fn test_triangulate_reuses_rounded_outline_points() {
        let outline = crate::profile::rounded_rect(74.45, 152.61, 15.67)
            .unwrap()
            .flatten(16);
        let result = triangulate_polygon(outline.points()).unwrap();

        assert_eq!(&result.points[..outline.len()], outline.points());
        // A convex outline needs no extra vertices.
        assert_eq!(result.points.len(), outline.len());
        let max_index = result.triangles.iter().flatten().max().copied().unwrap();
        assert!((max_index as usize) < outline.len());
    }

    #[test]
    fn test_triangulate_rejects_too_few_points() {
        let err = triangulate_polygon(&[DVec2::ZERO, DVec2::X]).unwrap_err();
        assert!(matches!(err, GeometryError::DegenerateProfile { .. }));
    }
}
