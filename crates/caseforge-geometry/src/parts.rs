//! Decorative 3D parts that can be stuck onto a case.
//!
//! All sizes are millimeters. Flat parts are extruded along `+z` from
//! `z = 0`; round parts are centered on the origin.

use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

use caseforge_core::{BevelParams, GeometryError};
use glam::{DMat4, DQuat, DVec2, DVec3, EulerRot};
use lyon::math::point;
use lyon::path::iterator::PathIterator;
use lyon::path::{Path, PathEvent};

use crate::extrude::{extrude, ExtrudeOptions};
use crate::geometry::Mesh;
use crate::profile::Contour;
use crate::tessellation::{
    tessellate_box, tessellate_cone, tessellate_octahedron, tessellate_sphere, TessellationOptions,
};

/// Chord tolerance used when flattening curved outlines.
const FLATTEN_TOLERANCE: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecorativeShape {
    Heart,
    Star,
    Flower,
    Circle,
    Square,
    Triangle,
    Hexagon,
    Diamond,
    Moon,
    Butterfly,
    Cloud,
    Sparkle,
}

impl DecorativeShape {
    pub const ALL: [DecorativeShape; 12] = [
        DecorativeShape::Heart,
        DecorativeShape::Star,
        DecorativeShape::Flower,
        DecorativeShape::Circle,
        DecorativeShape::Square,
        DecorativeShape::Triangle,
        DecorativeShape::Hexagon,
        DecorativeShape::Diamond,
        DecorativeShape::Moon,
        DecorativeShape::Butterfly,
        DecorativeShape::Cloud,
        DecorativeShape::Sparkle,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            DecorativeShape::Heart => "heart",
            DecorativeShape::Star => "star",
            DecorativeShape::Flower => "flower",
            DecorativeShape::Circle => "circle",
            DecorativeShape::Square => "square",
            DecorativeShape::Triangle => "triangle",
            DecorativeShape::Hexagon => "hexagon",
            DecorativeShape::Diamond => "diamond",
            DecorativeShape::Moon => "moon",
            DecorativeShape::Butterfly => "butterfly",
            DecorativeShape::Cloud => "cloud",
            DecorativeShape::Sparkle => "sparkle",
        }
    }

    /// Tessellate the part in its local frame.
    pub fn build(self) -> Result<Mesh, GeometryError> {
        match self {
            DecorativeShape::Heart => extrude(
                &heart_contour()?,
                &ExtrudeOptions::beveled(2.0, bevel(0.5, 0.5, 3)),
            ),
            DecorativeShape::Star => extrude(
                &Contour::star(5, 6.0, 3.0),
                &ExtrudeOptions::beveled(2.0, bevel(0.4, 0.4, 2)),
            ),
            DecorativeShape::Flower => Ok(sphere(5.0, 32)),
            DecorativeShape::Circle => {
                extrude(&Contour::regular(5.0, 32), &ExtrudeOptions::flat(2.0))
            }
            DecorativeShape::Square => Ok(tessellate_box(DVec3::new(8.0, 8.0, 2.0))),
            DecorativeShape::Triangle => Ok(tessellate_cone(5.0, 8.0, 3)),
            DecorativeShape::Hexagon => {
                extrude(&Contour::regular(5.0, 6), &ExtrudeOptions::flat(2.0))
            }
            DecorativeShape::Diamond => Ok(tessellate_octahedron(5.0)),
            DecorativeShape::Moon => extrude(
                &crescent(6.0, DVec2::new(3.0, 0.0), 5.0, 32)?,
                &ExtrudeOptions::flat(2.0),
            ),
            DecorativeShape::Butterfly => Ok(sphere(4.0, 16)),
            DecorativeShape::Cloud => Ok(sphere(3.0, 16)),
            DecorativeShape::Sparkle => extrude(
                &Contour::star(8, 6.0, 2.0),
                &ExtrudeOptions::beveled(1.0, bevel(0.3, 0.3, 2)),
            ),
        }
    }
}

impl fmt::Display for DecorativeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for DecorativeShape {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DecorativeShape::ALL
            .into_iter()
            .find(|shape| shape.tag() == s)
            .ok_or_else(|| GeometryError::UnknownShape { tag: s.to_string() })
    }
}

fn bevel(thickness: f64, size: f64, segments: u32) -> BevelParams {
    BevelParams {
        thickness,
        size,
        segments,
    }
}

fn sphere(radius: f64, segments: u32) -> Mesh {
    tessellate_sphere(
        radius,
        &TessellationOptions {
            curve_segments: segments,
            rings: segments,
        },
    )
}

/// A heart about 11 mm wide, point down.
fn heart_contour() -> Result<Contour, GeometryError> {
    let s = 10.0_f32;
    let mut builder = Path::builder();
    builder.begin(point(0.0, 0.25 * s));
    builder.cubic_bezier_to(point(-0.05 * s, 0.4 * s), point(-0.15 * s, 0.5 * s), point(-0.25 * s, 0.5 * s));
    builder.cubic_bezier_to(point(-0.55 * s, 0.5 * s), point(-0.55 * s, 0.1 * s), point(-0.55 * s, 0.1 * s));
    builder.cubic_bezier_to(point(-0.55 * s, -0.1 * s), point(-0.35 * s, -0.25 * s), point(-0.15 * s, -0.45 * s));
    builder.line_to(point(0.0, -0.6 * s));
    builder.line_to(point(0.15 * s, -0.45 * s));
    builder.cubic_bezier_to(point(0.35 * s, -0.25 * s), point(0.55 * s, -0.1 * s), point(0.55 * s, 0.1 * s));
    builder.cubic_bezier_to(point(0.55 * s, 0.1 * s), point(0.55 * s, 0.5 * s), point(0.25 * s, 0.5 * s));
    builder.cubic_bezier_to(point(0.15 * s, 0.5 * s), point(0.05 * s, 0.4 * s), point(0.0, 0.25 * s));
    builder.end(true);
    let path = builder.build();

    let mut points = Vec::new();
    for event in path.iter().flattened(FLATTEN_TOLERANCE) {
        match event {
            PathEvent::Begin { at } => points.push(to_dvec(at)),
            PathEvent::Line { to, .. } => points.push(to_dvec(to)),
            _ => {}
        }
    }

    let contour = Contour::new(points).into_ccw();
    if contour.len() < 3 {
        return Err(GeometryError::DegenerateProfile {
            reason: "heart outline flattened to fewer than 3 points".into(),
        });
    }
    Ok(contour)
}

fn to_dvec(p: lyon::math::Point) -> DVec2 {
    DVec2::new(p.x as f64, p.y as f64)
}

/// The part of the disc `(0, radius)` outside the disc `(bite_center,
/// bite_radius)`, traced counter-clockwise.
fn crescent(
    radius: f64,
    bite_center: DVec2,
    bite_radius: f64,
    segments: u32,
) -> Result<Contour, GeometryError> {
    let d = bite_center.length();
    if d >= radius + bite_radius || d + radius <= bite_radius || d + bite_radius <= radius {
        return Err(GeometryError::DegenerateProfile {
            reason: "crescent circles must cross".into(),
        });
    }

    // Circle-circle intersection, expressed in the frame of the bite direction.
    let along = (d * d + radius * radius - bite_radius * bite_radius) / (2.0 * d);
    let across = (radius * radius - along * along).sqrt();
    let axis = bite_center / d;
    let side = axis.perp();
    let upper = axis * along + side * across;
    let lower = axis * along - side * across;

    let outer_start = upper.to_angle();
    let mut outer_end = lower.to_angle();
    while outer_end <= outer_start {
        outer_end += TAU;
    }
    let inner_start = (lower - bite_center).to_angle();
    let mut inner_end = (upper - bite_center).to_angle();
    while inner_end >= inner_start {
        inner_end -= TAU;
    }

    let mut points = Vec::with_capacity(2 * segments as usize);
    for i in 0..segments {
        let t = i as f64 / segments as f64;
        let angle = outer_start + (outer_end - outer_start) * t;
        points.push(DVec2::from_angle(angle) * radius);
    }
    for i in 0..segments {
        let t = i as f64 / segments as f64;
        let angle = inner_start + (inner_end - inner_start) * t;
        points.push(bite_center + DVec2::from_angle(angle) * bite_radius);
    }
    Ok(Contour::new(points))
}

/// Blob primitives for sculpting on top of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaballKind {
    Sphere,
    Box,
}

impl MetaballKind {
    pub const ALL: [MetaballKind; 2] = [MetaballKind::Sphere, MetaballKind::Box];

    pub fn tag(self) -> &'static str {
        match self {
            MetaballKind::Sphere => "sphere",
            MetaballKind::Box => "box",
        }
    }

    /// Tessellate the primitive centered on the origin: a sphere of radius
    /// 8 mm or a 12 mm cube.
    pub fn build(self) -> Mesh {
        match self {
            MetaballKind::Sphere => sphere(8.0, 32),
            MetaballKind::Box => tessellate_box(DVec3::splat(12.0)),
        }
    }
}

impl fmt::Display for MetaballKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for MetaballKind {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetaballKind::ALL
            .into_iter()
            .find(|kind| kind.tag() == s)
            .ok_or_else(|| GeometryError::UnknownShape { tag: s.to_string() })
    }
}

/// A decorative part placed on the case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedPart {
    pub shape: DecorativeShape,
    pub position: DVec3,
    /// Euler angles in radians, applied in x, y, z order.
    pub rotation: DVec3,
    pub scale: f64,
}

impl PlacedPart {
    pub fn new(shape: DecorativeShape) -> Self {
        Self {
            shape,
            position: DVec3::ZERO,
            rotation: DVec3::ZERO,
            scale: 1.0,
        }
    }

    pub fn transform(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(
            DVec3::splat(self.scale),
            DQuat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z),
            self.position,
        )
    }

    pub fn to_mesh(&self) -> Result<Mesh, GeometryError> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(GeometryError::InvalidParams {
                reason: format!("part scale must be positive, got {}", self.scale),
            });
        }
        let mut mesh = self.shape.build()?;
        mesh.transform(self.transform());
        Ok(mesh)
    }
}
