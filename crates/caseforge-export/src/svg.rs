//! SVG export of UV layouts.
//!
//! The layout is drawn as a wireframe over a square canvas; painting tools
//! use it as a guide for where artwork lands on the case.

use caseforge_core::ExportError;
use caseforge_geometry::UvLayout;
use glam::DVec2;

/// File name for a model's UV layout guide.
pub fn uv_layout_filename(model_id: &str) -> String {
    format!("{model_id}_uv.svg")
}

/// Stroke and fill used for the wireframe.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgStyle {
    pub background: String,
    pub stroke: String,
    pub stroke_width: f64,
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            stroke: "#3b82f6".to_string(),
            stroke_width: 0.5,
        }
    }
}

/// Render `layout` on a `size` × `size` canvas.
pub fn export_uv_layout(layout: &UvLayout, size: u32) -> Result<String, ExportError> {
    export_uv_layout_with_style(layout, size, &SvgStyle::default())
}

pub fn export_uv_layout_with_style(
    layout: &UvLayout,
    size: u32,
    style: &SvgStyle,
) -> Result<String, ExportError> {
    if layout.triangles().is_empty() || size == 0 {
        return Err(ExportError::NoGeometry);
    }
    let extent = size as f64;

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
"#,
        size, size, size, size
    ));

    let mut builder = SvgBuilder {
        svg: &mut svg,
        indent: 1,
    };
    builder.rect(extent, &style.background);
    builder.open_group(&style.stroke, style.stroke_width);
    for tri in layout.to_pixels(extent, extent) {
        builder.triangle(&tri);
    }
    builder.close_group();

    svg.push_str("</svg>\n");
    Ok(svg)
}

struct SvgBuilder<'a> {
    svg: &'a mut String,
    indent: usize,
}

impl<'a> SvgBuilder<'a> {
    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.svg.push_str("  ");
        }
    }

    fn rect(&mut self, extent: f64, fill: &str) {
        self.write_indent();
        self.svg.push_str(&format!(
            "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{}\" />\n",
            extent,
            extent,
            escape_xml(fill)
        ));
    }

    fn open_group(&mut self, stroke: &str, stroke_width: f64) {
        self.write_indent();
        self.svg.push_str(&format!(
            "<g fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-linejoin=\"round\">\n",
            escape_xml(stroke),
            stroke_width
        ));
        self.indent += 1;
    }

    fn close_group(&mut self) {
        self.indent -= 1;
        self.write_indent();
        self.svg.push_str("</g>\n");
    }

    fn triangle(&mut self, points: &[DVec2; 3]) {
        let [a, b, c] = points;
        self.write_indent();
        self.svg.push_str(&format!(
            "<path d=\"M{:.2} {:.2} L{:.2} {:.2} L{:.2} {:.2} Z\" />\n",
            a.x, a.y, b.x, b.y, c.x, c.y
        ));
    }
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
