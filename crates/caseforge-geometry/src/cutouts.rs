//! Auxiliary solids marking the openings of a case.
//!
//! Cutouts are built in the case's build frame: the back plate spans
//! `z = 0..base_thickness`, the opening faces `+z` and the phone's top edge
//! is at `+y`. Looking down `-z` into the opening shows the phone's screen
//! side, so [`PhoneModelSpec`] offsets (measured from the top-left corner of
//! the back) run along `-x` here.

use std::fmt;

use caseforge_core::{CaseParams, GeometryError, PhoneModelSpec, SpecError};
use glam::DVec3;

use crate::extrude::{extrude, ExtrudeOptions};
use crate::geometry::Mesh;
use crate::profile::rounded_rect;
use crate::tessellation::tessellate_box;

/// Margin added to the camera island on every side.
pub const CAMERA_MARGIN: f64 = 1.0;
/// Extra reach of a cutout beyond the wall it pierces.
pub const CUTOUT_CLEARANCE: f64 = 2.0;
/// Height (along the phone's thickness) of side button openings.
pub const BUTTON_CUTOUT_HEIGHT: f64 = 4.0;
pub const ACTION_BUTTON_LENGTH: f64 = 8.0;
pub const CAMERA_CONTROL_LENGTH: f64 = 18.0;
/// Width and height of the USB-C opening.
pub const USB_PORT_SIZE: (f64, f64) = (12.0, 6.0);
/// Width and height of a speaker grille opening.
pub const SPEAKER_SIZE: (f64, f64) = (15.0, 4.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CutoutKind {
    Camera,
    VolumeButton,
    PowerButton,
    ActionButton,
    CameraControl,
    UsbPort,
    SpeakerLeft,
    SpeakerRight,
}

impl CutoutKind {
    pub fn name(self) -> &'static str {
        match self {
            CutoutKind::Camera => "camera",
            CutoutKind::VolumeButton => "volume button",
            CutoutKind::PowerButton => "power button",
            CutoutKind::ActionButton => "action button",
            CutoutKind::CameraControl => "camera control",
            CutoutKind::UsbPort => "usb port",
            CutoutKind::SpeakerLeft => "left speaker",
            CutoutKind::SpeakerRight => "right speaker",
        }
    }
}

impl fmt::Display for CutoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A positioned cutout solid.
#[derive(Debug, Clone, PartialEq)]
pub struct Cutout {
    pub kind: CutoutKind,
    pub mesh: Mesh,
}

/// Build every cutout the model calls for, in the build frame.
///
/// The action button and camera control openings are emitted only when
/// their feature flag is set; a set flag without an offset is rejected.
pub fn build_cutouts(spec: &PhoneModelSpec, params: &CaseParams) -> Result<Vec<Cutout>, GeometryError> {
    spec.validate()?;

    let (w, h) = (spec.width, spec.height);
    let wall = params.wall_thickness;
    // Side openings are centered on the phone's mid-thickness.
    let side_z = params.base_thickness + spec.depth / 2.0;
    let side_wall_size = wall + CUTOUT_CLEARANCE;

    // Back-view offsets map to build-frame x through a mirror.
    let x_from_left = |offset: f64| w / 2.0 - offset;
    let y_from_top = |offset: f64| h / 2.0 - offset;

    let mut cutouts = Vec::with_capacity(8);

    let camera = &spec.camera;
    let mut camera_mesh = extrude(
        &rounded_rect(
            camera.width + 2.0 * CAMERA_MARGIN,
            camera.height + 2.0 * CAMERA_MARGIN,
            camera.corner_radius,
        )?
        .flatten(params.corner_segments),
        &ExtrudeOptions::flat(params.base_thickness + CUTOUT_CLEARANCE),
    )?;
    camera_mesh.translate(DVec3::new(
        x_from_left(camera.offset_x + camera.width / 2.0),
        y_from_top(camera.offset_y + camera.height / 2.0),
        -CUTOUT_CLEARANCE / 2.0,
    ));
    cutouts.push(Cutout {
        kind: CutoutKind::Camera,
        mesh: camera_mesh,
    });

    // Volume and action buttons sit on the left edge seen from the screen,
    // power and camera control on the right.
    let left_x = -(w / 2.0 + wall);
    let right_x = w / 2.0 + wall;
    let side_button = |kind, x: f64, offset: f64, length: f64| Cutout {
        kind,
        mesh: placed_box(
            DVec3::new(side_wall_size, length, BUTTON_CUTOUT_HEIGHT),
            DVec3::new(x, y_from_top(offset + length / 2.0), side_z),
        ),
    };

    cutouts.push(side_button(
        CutoutKind::VolumeButton,
        left_x,
        spec.volume_button.offset,
        spec.volume_button.length,
    ));
    cutouts.push(side_button(
        CutoutKind::PowerButton,
        right_x,
        spec.power_button.offset,
        spec.power_button.length,
    ));

    if spec.features.has_action_button {
        let offset = gated_offset(spec, "action button", spec.action_button_offset)?;
        cutouts.push(side_button(
            CutoutKind::ActionButton,
            left_x,
            offset,
            ACTION_BUTTON_LENGTH,
        ));
    }
    if spec.features.has_camera_control {
        let offset = gated_offset(spec, "camera control", spec.camera_control_offset)?;
        cutouts.push(side_button(
            CutoutKind::CameraControl,
            right_x,
            offset,
            CAMERA_CONTROL_LENGTH,
        ));
    }

    let bottom_y = -(h / 2.0 + wall);
    let (usb_width, usb_height) = USB_PORT_SIZE;
    cutouts.push(Cutout {
        kind: CutoutKind::UsbPort,
        mesh: placed_box(
            DVec3::new(usb_width, side_wall_size, usb_height),
            DVec3::new(x_from_left(spec.usb_port_offset + usb_width / 2.0), bottom_y, side_z),
        ),
    });

    let (speaker_width, speaker_height) = SPEAKER_SIZE;
    for (kind, offset) in [
        (CutoutKind::SpeakerLeft, spec.speaker_left_offset),
        (CutoutKind::SpeakerRight, spec.speaker_right_offset),
    ] {
        cutouts.push(Cutout {
            kind,
            mesh: placed_box(
                DVec3::new(speaker_width, side_wall_size, speaker_height),
                DVec3::new(x_from_left(offset + speaker_width / 2.0), bottom_y, side_z),
            ),
        });
    }

    Ok(cutouts)
}

fn placed_box(size: DVec3, center: DVec3) -> Mesh {
    let mut mesh = tessellate_box(size);
    mesh.translate(center);
    mesh
}

fn gated_offset(
    spec: &PhoneModelSpec,
    feature: &'static str,
    offset: Option<f64>,
) -> Result<f64, GeometryError> {
    offset.ok_or_else(|| {
        GeometryError::InvalidSpec(SpecError::MissingFeatureOffset {
            model: spec.id.clone(),
            feature,
        })
    })
}
