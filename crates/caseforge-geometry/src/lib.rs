//! Procedural phone-case geometry.
//!
//! This crate provides:
//! - Rounded-rectangle profiles and polygon contours
//! - Beveled extrusion and primitive tessellation
//! - BSP-based CSG (union, subtract, intersect)
//! - Case solid generation with camera, button and port cutouts
//! - Box-projected UVs shared by the 3D view and the paint canvas
//! - Decorative parts, metaball primitives and off-thread generation
//!
//! All lengths are millimeters.

mod case;
mod csg;
mod cutouts;
mod extrude;
mod geometry;
mod parts;
mod profile;
mod scale;
mod tessellation;
mod uv;
mod worker;

pub use case::{
    canonical_orientation, case_envelope, generate_case_solid, generate_case_solid_with, CaseSolid,
};
pub use csg::{Plane, Polygon, Solid, Vertex};
pub use cutouts::{
    build_cutouts, Cutout, CutoutKind, ACTION_BUTTON_LENGTH, BUTTON_CUTOUT_HEIGHT, CAMERA_CONTROL_LENGTH,
    CAMERA_MARGIN, CUTOUT_CLEARANCE, SPEAKER_SIZE, USB_PORT_SIZE,
};
pub use extrude::{extrude, ExtrudeOptions};
pub use geometry::{face_normal, BoundingBox, Mesh};
pub use parts::{DecorativeShape, MetaballKind, PlacedPart};
pub use profile::{rounded_rect, Contour, Profile, Segment};
pub use scale::{display_scale, REFERENCE_HEIGHT};
pub use tessellation::{
    tessellate_box, tessellate_cone, tessellate_octahedron, tessellate_sphere, triangulate_polygon,
    TessellationOptions, Triangulation,
};
pub use uv::{dominant_axis, project_uv, project_vertex, ProjectionAxis, UvLayout};
pub use worker::{spawn_generation, GenerationHandle, GenerationResult};
