//! Triangle meshes and bounding boxes.

use glam::{DMat4, DVec2, DVec3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: DVec3,
    pub max: DVec3,
}

impl BoundingBox {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Option<Self> {
        let mut min = DVec3::splat(f64::INFINITY);
        let mut max = DVec3::splat(f64::NEG_INFINITY);
        let mut has_points = false;

        for p in points {
            min = min.min(p);
            max = max.max(p);
            has_points = true;
        }

        if has_points {
            Some(Self { min, max })
        } else {
            None
        }
    }

    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Merge with another bounding box.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Check if a point is inside the bounding box.
    pub fn contains(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Check if two bounding boxes intersect.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// True when the box has no extent along at least one axis.
    pub fn is_degenerate(&self) -> bool {
        let size = self.size();
        !(size.x > 0.0 && size.y > 0.0 && size.z > 0.0)
    }
}

/// An indexed triangle mesh.
///
/// Triangles wind counter-clockwise when seen from outside the solid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<DVec3>,
    pub normals: Vec<DVec3>,
    /// Per-vertex texture coordinates, filled by [`Mesh::compute_uvs`].
    pub uvs: Option<Vec<DVec2>>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.positions.iter().copied())
    }

    /// Corner positions of every triangle.
    pub fn triangles(&self) -> impl Iterator<Item = [DVec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            ]
        })
    }

    /// Transform all vertices by a matrix.
    pub fn transform(&mut self, matrix: DMat4) {
        let normal_matrix = matrix.inverse().transpose();

        for p in &mut self.positions {
            *p = matrix.transform_point3(*p);
        }

        for n in &mut self.normals {
            *n = normal_matrix.transform_vector3(*n).normalize_or_zero();
        }

        if matrix.determinant() < 0.0 {
            for tri in self.indices.chunks_exact_mut(3) {
                tri.swap(1, 2);
            }
        }
    }

    pub fn translate(&mut self, offset: DVec3) {
        for p in &mut self.positions {
            *p += offset;
        }
    }

    /// Merge another mesh into this one.
    pub fn merge(&mut self, other: &Mesh) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|i| i + base));
        self.uvs = match (self.uvs.take(), &other.uvs) {
            (Some(mut uvs), Some(more)) => {
                uvs.extend_from_slice(more);
                Some(uvs)
            }
            _ => None,
        };
    }

    /// Smooth vertex normals: each vertex gets the area-weighted average of
    /// the faces around it.
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![DVec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            // Unnormalized cross product is twice the triangle area.
            let face = (self.positions[b] - self.positions[a])
                .cross(self.positions[c] - self.positions[a]);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        self.normals = normals.into_iter().map(DVec3::normalize_or_zero).collect();
    }

    /// Signed volume enclosed by the mesh; positive for outward winding.
    pub fn volume(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| a.dot(b.cross(c)) / 6.0)
            .sum()
    }

    /// True when every edge is shared by exactly two triangles with opposite
    /// directions.
    pub fn is_closed(&self) -> bool {
        use indexmap::IndexMap;

        let mut edges: IndexMap<(u32, u32), i32> = IndexMap::new();
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                if a < b {
                    *edges.entry((a, b)).or_default() += 1;
                } else {
                    *edges.entry((b, a)).or_default() -= 1;
                }
            }
        }
        !edges.is_empty() && edges.values().all(|&balance| balance == 0)
    }
}

/// Unit normal of a triangle from its winding, or zero when degenerate.
pub fn face_normal(a: DVec3, b: DVec3, c: DVec3) -> DVec3 {
    (b - a).cross(c - a).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tessellation::tessellate_box;

    #[test]
    fn test_bounding_box() {
        let bbox = BoundingBox::from_points([
            DVec3::new(-1.0, 2.0, 0.0),
            DVec3::new(3.0, -2.0, 5.0),
        ])
        .unwrap();

        assert_eq!(bbox.size(), DVec3::new(4.0, 4.0, 5.0));
        assert_eq!(bbox.center(), DVec3::new(1.0, 0.0, 2.5));
        assert!(bbox.contains(DVec3::new(0.0, 0.0, 1.0)));
        assert!(!bbox.contains(DVec3::new(0.0, 0.0, 6.0)));
        assert!(BoundingBox::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_bounding_box_intersects() {
        let a = BoundingBox::new(DVec3::ZERO, DVec3::splat(2.0));
        let b = BoundingBox::new(DVec3::splat(1.0), DVec3::splat(3.0));
        let c = BoundingBox::new(DVec3::splat(5.0), DVec3::splat(6.0));

        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert_eq!(a.union(&c).max, DVec3::splat(6.0));
    }

    #[test]
    fn test_degenerate_box() {
        let flat = BoundingBox::new(DVec3::ZERO, DVec3::new(1.0, 1.0, 0.0));
        assert!(flat.is_degenerate());
        assert!(!BoundingBox::new(DVec3::ZERO, DVec3::ONE).is_degenerate());
    }

    #[test]
    fn test_mesh_transform() {
        let mut mesh = Mesh {
            positions: vec![DVec3::new(1.0, 0.0, 0.0)],
            normals: vec![DVec3::new(1.0, 0.0, 0.0)],
            uvs: None,
            indices: vec![],
        };

        mesh.transform(DMat4::from_translation(DVec3::new(5.0, 0.0, 0.0)));

        assert!((mesh.positions[0].x - 6.0).abs() < 1e-12);
        assert_eq!(mesh.normals[0], DVec3::X);
    }

    #[test]
    fn test_mirror_keeps_outward_winding() {
        let mut mesh = tessellate_box(DVec3::new(2.0, 3.0, 4.0));
        let before = mesh.volume();
        mesh.transform(DMat4::from_scale(DVec3::new(-1.0, 1.0, 1.0)));
        assert!((mesh.volume() - before).abs() < 1e-9);
        assert!(mesh.volume() > 0.0);
    }

    #[test]
    fn test_box_volume_and_closure() {
        let mesh = tessellate_box(DVec3::new(2.0, 3.0, 4.0));
        assert!((mesh.volume() - 24.0).abs() < 1e-9);
        // Faces carry their own vertices, so the box is not welded.
        assert!(!mesh.is_closed());
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut a = tessellate_box(DVec3::ONE);
        let b = tessellate_box(DVec3::ONE);
        a.merge(&b);
        assert_eq!(a.vertex_count(), 48);
        assert_eq!(a.triangle_count(), 24);
        assert_eq!(*a.indices.iter().max().unwrap(), 47);
    }

    #[test]
    fn test_compute_vertex_normals() {
        let mut mesh = Mesh {
            positions: vec![DVec3::ZERO, DVec3::X, DVec3::Y],
            normals: vec![],
            uvs: None,
            indices: vec![0, 1, 2],
        };
        mesh.compute_vertex_normals();
        assert_eq!(mesh.normals, vec![DVec3::Z; 3]);
    }
}
