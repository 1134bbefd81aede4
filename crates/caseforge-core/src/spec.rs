//! Parametric phone model descriptions.
//!
//! All lengths are millimeters. Offsets are measured from the phone's
//! top-left corner as seen when looking at its back: `x` grows to the right,
//! `y` grows downwards.

use crate::errors::SpecError;

/// Physical description of one supported device.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhoneModelSpec {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub series: String,

    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub corner_radius: f64,

    /// Informational only; the case geometry never looks at the display.
    #[cfg_attr(feature = "serde", serde(default))]
    pub display: DisplayCutout,

    pub camera: CameraIsland,

    pub volume_button: ButtonSpec,
    pub power_button: ButtonSpec,
    /// Distance from the top edge to the action button.
    pub action_button_offset: Option<f64>,
    /// Distance from the top edge to the camera control button.
    pub camera_control_offset: Option<f64>,

    /// Distance from the left edge to the start of the USB port opening.
    pub usb_port_offset: f64,
    /// Distance from the left edge to the start of the left speaker grille.
    pub speaker_left_offset: f64,
    /// Distance from the left edge to the start of the right speaker grille.
    pub speaker_right_offset: f64,

    #[cfg_attr(feature = "serde", serde(default))]
    pub features: FeatureFlags,
}

/// Display cutout dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisplayCutout {
    pub width: f64,
    pub height: f64,
}

/// Rear camera island placement and shape.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraIsland {
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
}

/// A side button: distance from the top edge and length along the side.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ButtonSpec {
    pub offset: f64,
    pub length: f64,
}

/// Hardware features. Action button and camera control gate cutouts; the
/// rest are informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FeatureFlags {
    pub has_mag_safe: bool,
    pub has_dynamic_island: bool,
    pub has_action_button: bool,
    pub has_camera_control: bool,
}

impl PhoneModelSpec {
    /// Check every invariant of the spec.
    pub fn validate(&self) -> Result<(), SpecError> {
        for (field, value) in self.numeric_fields() {
            if !value.is_finite() {
                return Err(SpecError::NonFinite {
                    model: self.id.clone(),
                    field,
                });
            }
        }

        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("depth", self.depth),
            ("camera.width", self.camera.width),
            ("camera.height", self.camera.height),
            ("volume_button.length", self.volume_button.length),
            ("power_button.length", self.power_button.length),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(SpecError::NonPositiveDimension {
                    model: self.id.clone(),
                    field,
                    value,
                });
            }
        }

        let max_radius = self.width.min(self.height) / 2.0;
        if self.corner_radius > max_radius {
            return Err(SpecError::CornerRadiusTooLarge {
                model: self.id.clone(),
                radius: self.corner_radius,
                max: max_radius,
            });
        }
        self.check_range("corner_radius", self.corner_radius, max_radius)?;

        let camera_max_radius = self.camera.width.min(self.camera.height) / 2.0;
        self.check_range("camera.corner_radius", self.camera.corner_radius, camera_max_radius)?;

        self.check_range("camera.offset_x", self.camera.offset_x, self.width)?;
        self.check_range("camera.offset_y", self.camera.offset_y, self.height)?;
        self.check_range("volume_button.offset", self.volume_button.offset, self.height)?;
        self.check_range("power_button.offset", self.power_button.offset, self.height)?;
        self.check_range("usb_port_offset", self.usb_port_offset, self.width)?;
        self.check_range("speaker_left_offset", self.speaker_left_offset, self.width)?;
        self.check_range("speaker_right_offset", self.speaker_right_offset, self.width)?;

        self.check_gated_offset(
            "action button",
            "action_button_offset",
            self.features.has_action_button,
            self.action_button_offset,
        )?;
        self.check_gated_offset(
            "camera control",
            "camera_control_offset",
            self.features.has_camera_control,
            self.camera_control_offset,
        )?;

        Ok(())
    }

    /// Human readable envelope, e.g. `71.5 × 147.5 × 7.8 mm`.
    pub fn dimensions_summary(&self) -> String {
        format!(
            "{:.1} × {:.1} × {:.1} mm",
            self.width, self.height, self.depth
        )
    }

    /// Names of the enabled hardware features.
    pub fn features(&self) -> Vec<&'static str> {
        let flags = &self.features;
        [
            (flags.has_mag_safe, "MagSafe"),
            (flags.has_dynamic_island, "Dynamic Island"),
            (flags.has_action_button, "Action Button"),
            (flags.has_camera_control, "Camera Control"),
        ]
        .into_iter()
        .filter_map(|(enabled, name)| enabled.then_some(name))
        .collect()
    }

    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        let mut fields = vec![
            ("width", self.width),
            ("height", self.height),
            ("depth", self.depth),
            ("corner_radius", self.corner_radius),
            ("display.width", self.display.width),
            ("display.height", self.display.height),
            ("camera.offset_x", self.camera.offset_x),
            ("camera.offset_y", self.camera.offset_y),
            ("camera.width", self.camera.width),
            ("camera.height", self.camera.height),
            ("camera.corner_radius", self.camera.corner_radius),
            ("volume_button.offset", self.volume_button.offset),
            ("volume_button.length", self.volume_button.length),
            ("power_button.offset", self.power_button.offset),
            ("power_button.length", self.power_button.length),
            ("usb_port_offset", self.usb_port_offset),
            ("speaker_left_offset", self.speaker_left_offset),
            ("speaker_right_offset", self.speaker_right_offset),
        ];
        if let Some(offset) = self.action_button_offset {
            fields.push(("action_button_offset", offset));
        }
        if let Some(offset) = self.camera_control_offset {
            fields.push(("camera_control_offset", offset));
        }
        fields
    }

    fn check_range(&self, field: &'static str, value: f64, limit: f64) -> Result<(), SpecError> {
        if (0.0..=limit).contains(&value) {
            Ok(())
        } else {
            Err(SpecError::OffsetOutOfRange {
                model: self.id.clone(),
                field,
                value,
                limit,
            })
        }
    }

    fn check_gated_offset(
        &self,
        feature: &'static str,
        field: &'static str,
        enabled: bool,
        offset: Option<f64>,
    ) -> Result<(), SpecError> {
        match (enabled, offset) {
            (true, None) => Err(SpecError::MissingFeatureOffset {
                model: self.id.clone(),
                feature,
            }),
            (_, Some(value)) => self.check_range(field, value, self.height),
            (false, None) => Ok(()),
        }
    }
}
