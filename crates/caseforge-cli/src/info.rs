//! Info command - describe one phone model

use anyhow::Result;
use caseforge_core::PhoneModelSpec;
use caseforge_geometry::{case_envelope, display_scale};
use clap::Args;

use crate::config::Settings;

/// Arguments for the info command
#[derive(Args)]
pub struct InfoArgs {
    /// Model id, as printed by `caseforge list`
    pub model: String,
}

/// Execute the info command
pub fn execute(args: InfoArgs, settings: &Settings) -> Result<()> {
    let spec = settings.catalog.get(&args.model)?;
    print!("{}", render(spec, settings));
    Ok(())
}

fn render(spec: &PhoneModelSpec, settings: &Settings) -> String {
    let envelope = case_envelope(spec, &settings.params);
    let features = spec.features();
    let camera = &spec.camera;

    let mut out = String::new();
    out.push_str(&format!("{} ({})\n", spec.name, spec.id));
    out.push_str(&format!("  Brand:         {} | {}\n", spec.brand, spec.series));
    out.push_str(&format!("  Dimensions:    {}\n", spec.dimensions_summary()));
    out.push_str(&format!("  Corner radius: {:.2} mm\n", spec.corner_radius));
    out.push_str(&format!(
        "  Camera:        {:.1} × {:.1} mm at ({:.1}, {:.1})\n",
        camera.width, camera.height, camera.offset_x, camera.offset_y
    ));
    out.push_str(&format!(
        "  Features:      {}\n",
        if features.is_empty() {
            "none".to_string()
        } else {
            features.join(", ")
        }
    ));
    out.push_str(&format!(
        "  Case:          {:.2} × {:.2} × {:.2} mm\n",
        envelope.x, envelope.y, envelope.z
    ));
    out.push_str(&format!("  Display scale: {:.4}\n", display_scale(spec)));
    out
}
