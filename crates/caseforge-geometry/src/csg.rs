//! Constructive solid geometry on polygon soups with BSP trees.
//!
//! Solids are sets of convex polygons. Booleans clip each operand against a
//! BSP tree built from the other, the classic csg.js scheme. Trees live in an
//! arena and every traversal uses an explicit stack, so deeply unbalanced
//! trees cannot overflow the call stack.

use glam::DVec3;
use indexmap::IndexMap;

use crate::geometry::Mesh;

/// Tolerance for classifying a point against a plane.
const EPSILON: f64 = 1e-5;

/// Triangles below this doubled area are dropped when meshing.
const MIN_AREA: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub pos: DVec3,
    pub normal: DVec3,
}

impl Vertex {
    fn flip(&mut self) {
        self.normal = -self.normal;
    }

    fn lerp(&self, other: &Vertex, t: f64) -> Vertex {
        Vertex {
            pos: self.pos.lerp(other.pos, t),
            normal: self.normal.lerp(other.normal, t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: DVec3,
    pub w: f64,
}

const COPLANAR: u8 = 0;
const FRONT: u8 = 1;
const BACK: u8 = 2;
const SPANNING: u8 = 3;

impl Plane {
    /// Plane through three points, `None` when they are collinear.
    pub fn from_points(a: DVec3, b: DVec3, c: DVec3) -> Option<Plane> {
        let n = (b - a).cross(c - a);
        let len = n.length();
        if len < MIN_AREA {
            return None;
        }
        let normal = n / len;
        Some(Plane {
            normal,
            w: normal.dot(a),
        })
    }

    fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Sort `polygon` into the bucket matching its side of this plane,
    /// splitting it when it spans the plane.
    fn split_polygon(
        &self,
        polygon: &Polygon,
        coplanar_front: &mut Vec<Polygon>,
        coplanar_back: &mut Vec<Polygon>,
        front: &mut Vec<Polygon>,
        back: &mut Vec<Polygon>,
    ) {
        let mut polygon_type = COPLANAR;
        let types: Vec<u8> = polygon
            .vertices
            .iter()
            .map(|v| {
                let t = self.normal.dot(v.pos) - self.w;
                let kind = if t < -EPSILON {
                    BACK
                } else if t > EPSILON {
                    FRONT
                } else {
                    COPLANAR
                };
                polygon_type |= kind;
                kind
            })
            .collect();

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            }
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let n = polygon.vertices.len();
                let mut f = Vec::with_capacity(n + 1);
                let mut b = Vec::with_capacity(n + 1);
                for i in 0..n {
                    let j = (i + 1) % n;
                    let (ti, tj) = (types[i], types[j]);
                    let (vi, vj) = (&polygon.vertices[i], &polygon.vertices[j]);
                    if ti != BACK {
                        f.push(*vi);
                    }
                    if ti != FRONT {
                        b.push(*vi);
                    }
                    if (ti | tj) == SPANNING {
                        let t = (self.w - self.normal.dot(vi.pos))
                            / self.normal.dot(vj.pos - vi.pos);
                        let v = vi.lerp(vj, t);
                        f.push(v);
                        b.push(v);
                    }
                }
                if f.len() >= 3 {
                    front.push(Polygon {
                        vertices: f,
                        plane: polygon.plane,
                    });
                }
                if b.len() >= 3 {
                    back.push(Polygon {
                        vertices: b,
                        plane: polygon.plane,
                    });
                }
            }
        }
    }
}

/// A convex planar polygon. Pieces split off a polygon keep its plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Vertex>,
    pub plane: Plane,
}

impl Polygon {
    pub fn new(vertices: Vec<Vertex>) -> Option<Polygon> {
        if vertices.len() < 3 {
            return None;
        }
        let plane = Plane::from_points(vertices[0].pos, vertices[1].pos, vertices[2].pos)?;
        Some(Polygon { vertices, plane })
    }

    fn flip(&mut self) {
        self.vertices.reverse();
        for v in &mut self.vertices {
            v.flip();
        }
        self.plane.flip();
    }
}

#[derive(Debug, Clone, Default)]
struct Node {
    plane: Option<Plane>,
    front: Option<usize>,
    back: Option<usize>,
    polygons: Vec<Polygon>,
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Front,
    Back,
}

/// A BSP tree stored as an arena; node 0 is the root.
#[derive(Debug, Clone)]
struct BspTree {
    nodes: Vec<Node>,
}

impl BspTree {
    fn new(polygons: Vec<Polygon>) -> Self {
        let mut tree = Self {
            nodes: vec![Node::default()],
        };
        tree.build(polygons);
        tree
    }

    fn child(&mut self, index: usize, side: Side) -> usize {
        let existing = match side {
            Side::Front => self.nodes[index].front,
            Side::Back => self.nodes[index].back,
        };
        if let Some(child) = existing {
            return child;
        }
        let child = self.nodes.len();
        self.nodes.push(Node::default());
        match side {
            Side::Front => self.nodes[index].front = Some(child),
            Side::Back => self.nodes[index].back = Some(child),
        }
        child
    }

    /// Insert polygons, extending the tree where they fall into empty space.
    fn build(&mut self, polygons: Vec<Polygon>) {
        let mut stack = vec![(0usize, polygons)];
        while let Some((index, polygons)) = stack.pop() {
            let Some(first) = polygons.first() else {
                continue;
            };
            let plane = *self.nodes[index].plane.get_or_insert(first.plane);

            let mut coplanar = Vec::new();
            let mut front = Vec::new();
            let mut back = Vec::new();
            for polygon in &polygons {
                let mut coplanar_back = Vec::new();
                plane.split_polygon(polygon, &mut coplanar, &mut coplanar_back, &mut front, &mut back);
                coplanar.append(&mut coplanar_back);
            }
            self.nodes[index].polygons.append(&mut coplanar);

            if !front.is_empty() {
                let child = self.child(index, Side::Front);
                stack.push((child, front));
            }
            if !back.is_empty() {
                let child = self.child(index, Side::Back);
                stack.push((child, back));
            }
        }
    }

    /// Swap solid and empty space.
    fn invert(&mut self) {
        for node in &mut self.nodes {
            for polygon in &mut node.polygons {
                polygon.flip();
            }
            if let Some(plane) = node.plane.as_mut() {
                plane.flip();
            }
            std::mem::swap(&mut node.front, &mut node.back);
        }
    }

    /// Remove the parts of `polygons` that lie inside this tree's solid.
    fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack = vec![(0usize, polygons)];
        while let Some((index, polygons)) = stack.pop() {
            let node = &self.nodes[index];
            let Some(plane) = node.plane else {
                result.extend(polygons);
                continue;
            };

            let mut front = Vec::new();
            let mut back = Vec::new();
            for polygon in &polygons {
                let mut coplanar_front = Vec::new();
                let mut coplanar_back = Vec::new();
                plane.split_polygon(
                    polygon,
                    &mut coplanar_front,
                    &mut coplanar_back,
                    &mut front,
                    &mut back,
                );
                front.append(&mut coplanar_front);
                back.append(&mut coplanar_back);
            }

            match node.front {
                Some(child) => stack.push((child, front)),
                None => result.extend(front),
            }
            // Polygons behind a leaf are inside the solid and get dropped.
            if let Some(child) = node.back {
                stack.push((child, back));
            }
        }
        result
    }

    /// Remove every polygon of this tree that lies inside `other`.
    fn clip_to(&mut self, other: &BspTree) {
        for node in &mut self.nodes {
            let polygons = std::mem::take(&mut node.polygons);
            node.polygons = other.clip_polygons(polygons);
        }
    }

    fn all_polygons(&self) -> Vec<Polygon> {
        self.nodes
            .iter()
            .flat_map(|node| node.polygons.iter().cloned())
            .collect()
    }
}

/// A closed solid as a set of outward-facing convex polygons.
#[derive(Debug, Clone, Default)]
pub struct Solid {
    polygons: Vec<Polygon>,
}

impl Solid {
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    /// One polygon per non-degenerate triangle of `mesh`.
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let polygons = mesh
            .indices
            .chunks_exact(3)
            .filter_map(|tri| {
                let vertices = tri
                    .iter()
                    .map(|&i| Vertex {
                        pos: mesh.positions[i as usize],
                        normal: mesh.normals.get(i as usize).copied().unwrap_or(DVec3::ZERO),
                    })
                    .collect();
                Polygon::new(vertices)
            })
            .collect();
        Self { polygons }
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// `self ∪ other`
    pub fn union(&self, other: &Solid) -> Solid {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        let mut a = BspTree::new(self.polygons.clone());
        let mut b = BspTree::new(other.polygons.clone());
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(b.all_polygons());
        Solid::from_polygons(a.all_polygons())
    }

    /// `self − other`
    pub fn subtract(&self, other: &Solid) -> Solid {
        if self.is_empty() || other.is_empty() {
            return self.clone();
        }
        let mut a = BspTree::new(self.polygons.clone());
        let mut b = BspTree::new(other.polygons.clone());
        a.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(b.all_polygons());
        a.invert();
        Solid::from_polygons(a.all_polygons())
    }

    /// `self ∩ other`
    pub fn intersect(&self, other: &Solid) -> Solid {
        if self.is_empty() || other.is_empty() {
            return Solid::default();
        }
        let mut a = BspTree::new(self.polygons.clone());
        let mut b = BspTree::new(other.polygons.clone());
        a.invert();
        b.clip_to(&a);
        b.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        a.build(b.all_polygons());
        a.invert();
        Solid::from_polygons(a.all_polygons())
    }

    /// Fan-triangulate every polygon, welding vertices that share both
    /// position and normal.
    pub fn to_mesh(&self) -> Mesh {
        let mut mesh = Mesh::new();
        let mut welded: IndexMap<[u64; 6], u32> = IndexMap::new();

        let mut index_of = |mesh: &mut Mesh, v: &Vertex| -> u32 {
            let normal = v.normal.normalize_or_zero();
            // Adding zero folds -0.0 into 0.0 so both hash alike.
            let key = [
                (v.pos.x + 0.0).to_bits(),
                (v.pos.y + 0.0).to_bits(),
                (v.pos.z + 0.0).to_bits(),
                (normal.x + 0.0).to_bits(),
                (normal.y + 0.0).to_bits(),
                (normal.z + 0.0).to_bits(),
            ];
            *welded.entry(key).or_insert_with(|| {
                mesh.positions.push(v.pos);
                mesh.normals.push(normal);
                (mesh.positions.len() - 1) as u32
            })
        };

        for polygon in &self.polygons {
            let first = &polygon.vertices[0];
            for pair in polygon.vertices[1..].windows(2) {
                let (b, c) = (&pair[0], &pair[1]);
                let doubled_area = (b.pos - first.pos).cross(c.pos - first.pos).length();
                if doubled_area < MIN_AREA {
                    continue;
                }
                let ia = index_of(&mut mesh, first);
                let ib = index_of(&mut mesh, b);
                let ic = index_of(&mut mesh, c);
                mesh.indices.extend_from_slice(&[ia, ib, ic]);
            }
        }
        mesh
    }
}
