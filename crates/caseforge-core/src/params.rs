//! Manufacturing constants for case generation.

use crate::errors::GeometryError;

/// How cutout solids are combined with the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CutoutMode {
    /// Boolean subtraction of the cavity and every cutout from the outer solid.
    #[default]
    Subtract,
    /// Outer solid only; cutouts are returned as separate solids for display.
    Overlay,
}

/// Rounded edge applied to the top and bottom rims of the outer solid.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct BevelParams {
    /// Vertical extent of the bevel.
    pub thickness: f64,
    /// Horizontal inset of the bevel.
    pub size: f64,
    pub segments: u32,
}

impl Default for BevelParams {
    fn default() -> Self {
        Self {
            thickness: 0.5,
            size: 0.3,
            segments: 3,
        }
    }
}

impl BevelParams {
    pub const NONE: BevelParams = BevelParams {
        thickness: 0.0,
        size: 0.0,
        segments: 0,
    };

    pub fn is_none(&self) -> bool {
        self.thickness == 0.0 && self.size == 0.0
    }
}

/// Global case parameters shared by every model.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct CaseParams {
    pub wall_thickness: f64,
    pub base_thickness: f64,
    /// Height of the lip rising above the phone's screen plane.
    pub lip_height: f64,
    pub bevel: BevelParams,
    /// Segments per quarter-round corner of every rounded profile.
    pub corner_segments: u32,
    /// How far the cavity extends past the top rim.
    pub cavity_overshoot: f64,
    pub cutout_mode: CutoutMode,
}

impl Default for CaseParams {
    fn default() -> Self {
        Self {
            wall_thickness: 1.5,
            base_thickness: 1.2,
            lip_height: 1.0,
            bevel: BevelParams::default(),
            corner_segments: 16,
            cavity_overshoot: 1.0,
            cutout_mode: CutoutMode::Subtract,
        }
    }
}

impl CaseParams {
    pub fn with_cutout_mode(mut self, mode: CutoutMode) -> Self {
        self.cutout_mode = mode;
        self
    }

    /// Total thickness added to the phone's depth.
    pub fn added_depth(&self) -> f64 {
        self.base_thickness + self.lip_height
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        let fields = [
            ("wall_thickness", self.wall_thickness),
            ("base_thickness", self.base_thickness),
            ("lip_height", self.lip_height),
            ("cavity_overshoot", self.cavity_overshoot),
        ];
        for (name, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{name} must be positive, got {value}")));
            }
        }

        if self.corner_segments == 0 {
            return Err(invalid("corner_segments must be at least 1".into()));
        }

        let bevel = &self.bevel;
        if bevel.is_none() {
            return Ok(());
        }
        if !(bevel.thickness.is_finite() && bevel.thickness > 0.0)
            || !(bevel.size.is_finite() && bevel.size > 0.0)
        {
            return Err(invalid(format!(
                "bevel thickness and size must both be positive or both zero, got {} / {}",
                bevel.thickness, bevel.size
            )));
        }
        if bevel.segments == 0 {
            return Err(invalid("bevel.segments must be at least 1".into()));
        }
        if bevel.size >= self.wall_thickness {
            return Err(invalid(format!(
                "bevel size {} does not fit inside the {} mm wall",
                bevel.size, self.wall_thickness
            )));
        }
        if bevel.thickness >= self.base_thickness {
            return Err(invalid(format!(
                "bevel thickness {} does not fit inside the {} mm base",
                bevel.thickness, self.base_thickness
            )));
        }
        Ok(())
    }
}

fn invalid(reason: String) -> GeometryError {
    GeometryError::InvalidParams { reason }
}
