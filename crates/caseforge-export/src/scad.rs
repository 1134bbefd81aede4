//! OpenSCAD parameter files.
//!
//! Each file is a flat list of assignments read by the parametric cover
//! template. Key names (typos included) are fixed by that template.

use caseforge_core::{CaseParams, Catalog, PhoneModelSpec};
use indexmap::IndexMap;

/// Length of the action button opening, in mm.
const ACTION_BUTTON_SIZE: f64 = 8.0;
const USB_PLUG_SIZE: f64 = 12.0;
const SPEAKER_SIZE: f64 = 15.0;

/// File name for a model's parameter file.
pub fn scad_filename(model_id: &str) -> String {
    format!("{model_id}_param.scad")
}

/// Render the parameter file for one model.
pub fn generate_scad_params(spec: &PhoneModelSpec, params: &CaseParams) -> String {
    let mut w = ScadWriter::default();

    w.comment(&format!("Auto-generated OpenSCAD parameters for {}", spec.name));
    w.comment("Generated from Apple Accessory Design Guidelines specifications");
    w.comment(&format!("Brand: {} | Series: {}", spec.brand, spec.series));

    w.section("Phone Dimensions (mm)");
    w.number_with_note("LENGTH", spec.height, "Phone height");
    w.number_with_note("WIDTH", spec.width, "Phone width");
    w.number_with_note("HEIGHT", spec.depth, "Phone thickness");
    w.number("CORNER_RADIUS", spec.corner_radius);

    w.section("Case Parameters");
    w.raw("WALL_THICKNESS", &format!("{:?}", params.wall_thickness));
    w.raw("BASEPLATE_THICKNESS", &format!("{:?}", params.base_thickness));
    w.raw("HOLDER_WIDTH", &format!("{:?}", params.wall_thickness));
    w.raw("HOLDER_HEIGHT", &format!("{:?}", params.lip_height));
    w.raw("SMOOTHER", &format!("{:?}", params.bevel.thickness));

    w.section("Wall Lengths");
    w.number("WALL_TOP_TO_BOTTOM_LENGHT", spec.height);
    w.number("WALL_LEFT_TO_RIGHT_LENGHT", spec.width);

    let camera = &spec.camera;
    w.section("Camera Cutout");
    w.text("CAMERA_HOLE", "yes");
    w.number("CAMERA_TOP_OFFSET", camera.offset_x);
    w.number("CAMERA_LEFT_OFFSET", camera.offset_y);
    w.number("CAMERA_TOP_TO_BOTTOM_SIZE", camera.height);
    w.number("CAMERA_LEFT_TO_RIGHT_SIZE", camera.width);
    w.number("CAMERA_RADIUS", camera.corner_radius);

    w.section("Volume Button");
    w.side_opening(
        "VOLUME_BUTTON",
        "Left",
        spec.volume_button.offset,
        spec.volume_button.length,
    );

    w.section("Power Button");
    w.side_opening(
        "POWER_BUTTON",
        "Right",
        spec.power_button.offset,
        spec.power_button.length,
    );

    if spec.features.has_action_button {
        w.section("Action Button (iPhone 15 Pro+)");
        w.side_opening(
            "ACTION_BUTTON",
            "Left",
            spec.action_button_offset.unwrap_or(0.0),
            ACTION_BUTTON_SIZE,
        );
    } else {
        w.blank();
        w.comment("No Action Button for this model");
    }

    w.section("USB-C Port");
    w.side_opening("USB_PLUG", "Bottom", spec.usb_port_offset, USB_PLUG_SIZE);

    w.section("Speakers");
    w.side_opening("SPEAKER_1", "Bottom", spec.speaker_left_offset, SPEAKER_SIZE);
    w.blank();
    w.side_opening("SPEAKER_2", "Bottom", spec.speaker_right_offset, SPEAKER_SIZE);

    w.section("No Headphone Jack (Modern iPhones)");
    w.text("HEADPHONE_JACK_HOLE", "no");
    w.text("HEADPHONE_JACK_SIDE", "Bottom");
    w.text("HEADPHONE_JACK_SHAPE", "Circular");
    w.raw("HEADPHONE_JACK_OFFSET", "0");
    w.raw("HEADPHONE_JACK_SIZE", "3.5");

    w.section("No SD Card Slot");
    w.text("CARD_SLOT_HOLE", "no");
    w.text("CARD_SLOT_SIDE", "Right");
    w.text("CARD_SLOT_SHAPE", "Roundy Rectangle");
    w.raw("CARD_SLOT_OFFSET", "0");
    w.raw("CARD_SLOT_SIZE", "0");

    w.section("No Fingerprint Sensor (Face ID)");
    w.disabled_back_opening("FINGERPRINT");

    w.section("Flash Cutout (included in camera)");
    w.disabled_back_opening("FLASHLIGHT");

    let yes_no = |flag: bool| if flag { "Yes" } else { "No" };
    w.section("Model Metadata");
    w.comment(&format!("Model ID: {}", spec.id));
    w.comment(&format!("MagSafe: {}", yes_no(spec.features.has_mag_safe)));
    w.comment(&format!("Dynamic Island: {}", yes_no(spec.features.has_dynamic_island)));
    w.comment(&format!("Action Button: {}", yes_no(spec.features.has_action_button)));
    w.comment(&format!("Camera Control: {}", yes_no(spec.features.has_camera_control)));

    w.finish()
}

/// Parameter files for every model in `catalog`, keyed by file name.
pub fn generate_all(catalog: &Catalog, params: &CaseParams) -> IndexMap<String, String> {
    catalog
        .iter()
        .map(|spec| (scad_filename(&spec.id), generate_scad_params(spec, params)))
        .collect()
}

#[derive(Default)]
struct ScadWriter {
    out: String,
}

impl ScadWriter {
    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn comment(&mut self, text: &str) {
        self.out.push_str(&format!("// {}\n", text));
    }

    fn section(&mut self, title: &str) {
        self.blank();
        self.comment(&format!("============ {} ============", title));
    }

    fn raw(&mut self, key: &str, value: &str) {
        self.out.push_str(&format!("{} = {};\n", key, value));
    }

    fn number(&mut self, key: &str, value: f64) {
        self.raw(key, &format!("{:.2}", value));
    }

    fn number_with_note(&mut self, key: &str, value: f64, note: &str) {
        self.out
            .push_str(&format!("{} = {:.2};  // {}\n", key, value, note));
    }

    fn text(&mut self, key: &str, value: &str) {
        self.raw(key, &format!("\"{}\"", value));
    }

    fn side_opening(&mut self, prefix: &str, side: &str, offset: f64, size: f64) {
        self.text(&format!("{prefix}_HOLE"), "yes");
        self.text(&format!("{prefix}_SIDE"), side);
        self.text(&format!("{prefix}_SHAPE"), "Roundy Rectangle");
        self.number(&format!("{prefix}_OFFSET"), offset);
        self.number(&format!("{prefix}_SIZE"), size);
    }

    fn disabled_back_opening(&mut self, prefix: &str) {
        self.text(&format!("{prefix}_HOLE"), "no");
        for key in [
            "TOP_OFFSET",
            "LEFT_OFFSET",
            "TOP_TO_BOTTOM_SIZE",
            "LEFT_TO_RIGHT_SIZE",
            "RADIUS",
        ] {
            self.raw(&format!("{prefix}_{key}"), "0");
        }
    }

    fn finish(self) -> String {
        self.out
    }
}
