//! Planar outlines: rounded-rectangle profiles and polygonal contours.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use caseforge_core::GeometryError;
use glam::DVec2;
use tracing::warn;

/// Below this length a segment is considered collapsed.
const EPSILON: f64 = 1e-9;

/// One piece of a closed outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line { from: DVec2, to: DVec2 },
    /// Counter-clockwise arc from `start_angle` to `end_angle` (radians).
    Arc {
        center: DVec2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
}

impl Segment {
    pub fn start(&self) -> DVec2 {
        match *self {
            Segment::Line { from, .. } => from,
            Segment::Arc {
                center,
                radius,
                start_angle,
                ..
            } => center + DVec2::from_angle(start_angle) * radius,
        }
    }

    pub fn end(&self) -> DVec2 {
        match *self {
            Segment::Line { to, .. } => to,
            Segment::Arc {
                center,
                radius,
                end_angle,
                ..
            } => center + DVec2::from_angle(end_angle) * radius,
        }
    }

    pub fn length(&self) -> f64 {
        match *self {
            Segment::Line { from, to } => from.distance(to),
            Segment::Arc {
                radius,
                start_angle,
                end_angle,
                ..
            } => radius * (end_angle - start_angle).abs(),
        }
    }
}

/// A closed outline made of straight edges and circular arcs.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    segments: Vec<Segment>,
}

impl Profile {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Every segment ends where the next one starts, the last one included.
    pub fn is_closed(&self) -> bool {
        let n = self.segments.len();
        n > 0
            && (0..n).all(|i| {
                self.segments[i]
                    .end()
                    .abs_diff_eq(self.segments[(i + 1) % n].start(), 1e-9)
            })
    }

    pub fn perimeter(&self) -> f64 {
        self.segments.iter().map(Segment::length).sum()
    }

    /// Sample the outline into a polygon, splitting each arc into
    /// `arc_segments` chords.
    pub fn flatten(&self, arc_segments: u32) -> Contour {
        let arc_segments = arc_segments.max(1);
        let mut points = Vec::new();
        for segment in &self.segments {
            match *segment {
                Segment::Line { from, .. } => points.push(from),
                Segment::Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                } => {
                    for i in 0..arc_segments {
                        let t = i as f64 / arc_segments as f64;
                        let angle = start_angle + (end_angle - start_angle) * t;
                        points.push(center + DVec2::from_angle(angle) * radius);
                    }
                }
            }
        }
        Contour::new(points)
    }
}

/// Build the outline of a rounded rectangle centered at the origin.
///
/// The outline runs counter-clockwise starting with the bottom edge. A radius
/// above `min(width, height) / 2` would make the outline self-intersect; it is
/// clamped to that bound with a warning. Collapsed edges (radius at the bound)
/// are left out so no two consecutive segments share a zero-length span.
pub fn rounded_rect(width: f64, height: f64, radius: f64) -> Result<Profile, GeometryError> {
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(GeometryError::DegenerateProfile {
            reason: format!("rounded rectangle needs a positive size, got {width} x {height}"),
        });
    }
    if !radius.is_finite() {
        return Err(GeometryError::DegenerateProfile {
            reason: format!("corner radius {radius} is not finite"),
        });
    }

    let max_radius = width.min(height) / 2.0;
    let r = if radius > max_radius {
        warn!(radius, max_radius, "corner radius too large, clamping");
        max_radius
    } else if radius < 0.0 {
        warn!(radius, "negative corner radius, clamping to zero");
        0.0
    } else {
        radius
    };

    let (hw, hh) = (width / 2.0, height / 2.0);
    let edges = [
        (DVec2::new(-hw + r, -hh), DVec2::new(hw - r, -hh)),
        (DVec2::new(hw, -hh + r), DVec2::new(hw, hh - r)),
        (DVec2::new(hw - r, hh), DVec2::new(-hw + r, hh)),
        (DVec2::new(-hw, hh - r), DVec2::new(-hw, -hh + r)),
    ];
    // Corner following each edge: center and start angle.
    let corners = [
        (DVec2::new(hw - r, -hh + r), -FRAC_PI_2),
        (DVec2::new(hw - r, hh - r), 0.0),
        (DVec2::new(-hw + r, hh - r), FRAC_PI_2),
        (DVec2::new(-hw + r, -hh + r), PI),
    ];

    let mut segments = Vec::with_capacity(8);
    for ((from, to), (center, start_angle)) in edges.into_iter().zip(corners) {
        if from.distance(to) > EPSILON {
            segments.push(Segment::Line { from, to });
        }
        if r > EPSILON {
            segments.push(Segment::Arc {
                center,
                radius: r,
                start_angle,
                end_angle: start_angle + FRAC_PI_2,
            });
        }
    }

    Ok(Profile { segments })
}

/// A closed polygon. Outer boundaries run counter-clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<DVec2>,
}

impl Contour {
    /// Build a contour, dropping consecutive duplicate points (the closing
    /// point included).
    pub fn new(points: impl IntoIterator<Item = DVec2>) -> Self {
        let mut deduped: Vec<DVec2> = Vec::new();
        for p in points {
            if deduped.last().map_or(true, |last| last.distance(p) > EPSILON) {
                deduped.push(p);
            }
        }
        while deduped.len() > 1 && deduped[0].distance(deduped[deduped.len() - 1]) <= EPSILON {
            deduped.pop();
        }
        Self { points: deduped }
    }

    /// A regular polygon or circle approximation, starting at angle zero.
    pub fn regular(radius: f64, sides: u32) -> Self {
        let sides = sides.max(3);
        Self::new((0..sides).map(|i| DVec2::from_angle(i as f64 / sides as f64 * TAU) * radius))
    }

    /// A star alternating between `outer` and `inner` radius.
    pub fn star(points: u32, outer: f64, inner: f64) -> Self {
        let count = points.max(2) * 2;
        Self::new((0..count).map(|i| {
            let radius = if i % 2 == 0 { outer } else { inner };
            DVec2::from_angle(i as f64 * PI / points.max(2) as f64) * radius
        }))
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shoelace area; positive for counter-clockwise contours.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        (0..n)
            .map(|i| self.points[i].perp_dot(self.points[(i + 1) % n]))
            .sum::<f64>()
            / 2.0
    }

    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// The same contour, counter-clockwise.
    pub fn into_ccw(mut self) -> Self {
        if self.signed_area() < 0.0 {
            self.points.reverse();
        }
        self
    }

    /// Move every edge `distance` into the material along its normal.
    ///
    /// Vertices move along the miter of their two edges, so parallel edges
    /// stay exactly `distance` apart from the originals.
    pub fn inset(&self, distance: f64) -> Self {
        if distance == 0.0 {
            return self.clone();
        }
        let n = self.points.len();
        let points = (0..n)
            .map(|i| {
                let prev = self.points[(i + n - 1) % n];
                let here = self.points[i];
                let next = self.points[(i + 1) % n];
                let n1 = outward_normal(here - prev);
                let n2 = outward_normal(next - here);
                let miter = (n1 + n2) / (1.0 + n1.dot(n2)).max(1e-2);
                here - miter * distance
            })
            .collect();
        Self { points }
    }
}

/// Right-hand normal of an edge; points out of a counter-clockwise polygon.
fn outward_normal(edge: DVec2) -> DVec2 {
    DVec2::new(edge.y, -edge.x).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounded_rect_segments() {
        let profile = rounded_rect(70.0, 150.0, 10.0).unwrap();
        assert_eq!(profile.segments().len(), 8);
        assert!(profile.is_closed());
        assert!(matches!(profile.segments()[0], Segment::Line { .. }));

        let bottom = profile.segments()[0];
        assert_eq!(bottom.start(), DVec2::new(-25.0, -75.0));
        assert_eq!(bottom.end(), DVec2::new(25.0, -75.0));

        let expected = 2.0 * (50.0 + 130.0) + TAU * 10.0;
        assert!((profile.perimeter() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_sharp_corners() {
        let profile = rounded_rect(4.0, 2.0, 0.0).unwrap();
        assert_eq!(profile.segments().len(), 4);
        let contour = profile.flatten(16);
        assert_eq!(contour.len(), 4);
        assert!((contour.signed_area() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_maximum_radius_has_no_duplicate_points() {
        let profile = rounded_rect(20.0, 40.0, 10.0).unwrap();
        // The two short edges collapse.
        assert_eq!(profile.segments().len(), 6);
        assert!(profile.is_closed());

        let contour = profile.flatten(8);
        // Eight chords per corner plus the start of each long edge.
        assert_eq!(contour.len(), 4 * 8 + 2);
        let points = contour.points();
        for i in 0..points.len() {
            let next = points[(i + 1) % points.len()];
            assert!(points[i].distance(next) > 1e-6);
        }
    }

    #[test]
    fn test_circle_from_square_with_max_radius() {
        let contour = rounded_rect(10.0, 10.0, 5.0).unwrap().flatten(16);
        assert_eq!(contour.len(), 64);
        for p in contour.points() {
            assert!((p.length() - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_radius_is_clamped() {
        let clamped = rounded_rect(20.0, 40.0, 50.0).unwrap();
        let exact = rounded_rect(20.0, 40.0, 10.0).unwrap();
        assert_eq!(clamped, exact);
    }

    #[test]
    fn test_rejects_degenerate_size() {
        assert!(matches!(
            rounded_rect(0.0, 10.0, 1.0),
            Err(GeometryError::DegenerateProfile { .. })
        ));
        assert!(rounded_rect(10.0, f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_flattened_contour_is_ccw() {
        let contour = rounded_rect(71.45, 149.61, 14.17).unwrap().flatten(16);
        assert!(contour.is_ccw());
        let area = 71.45 * 149.61 - (4.0 - std::f64::consts::PI) * 14.17 * 14.17;
        // Chords cut a little off each quarter circle.
        assert!(contour.signed_area() < area);
        assert!(contour.signed_area() > area - 2.0);
    }

    #[test]
    fn test_inset_rectangle() {
        let contour = rounded_rect(10.0, 6.0, 0.0).unwrap().flatten(1);
        let inset = contour.inset(1.0);
        assert!((inset.signed_area() - 8.0 * 4.0).abs() < 1e-12);
        assert!(inset.points()[0].abs_diff_eq(DVec2::new(-4.0, -2.0), 1e-12));
    }

    #[test]
    fn test_into_ccw() {
        let cw = Contour::new([DVec2::ZERO, DVec2::Y, DVec2::ONE, DVec2::X]);
        assert!(!cw.is_ccw());
        assert!(cw.into_ccw().is_ccw());
    }

    #[test]
    fn test_star_and_regular() {
        let star = Contour::star(5, 6.0, 3.0);
        assert_eq!(star.len(), 10);
        assert!(star.is_ccw());
        assert_eq!(Contour::regular(5.0, 6).len(), 6);
    }
}
