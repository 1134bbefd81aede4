//! Display scale normalization.

use caseforge_core::PhoneModelSpec;

/// Height, in millimeters, every phone is scaled to for display.
pub const REFERENCE_HEIGHT: f64 = 100.0;

/// Factor that brings `spec` to [`REFERENCE_HEIGHT`] on screen.
///
/// Only the viewer applies it; generated geometry stays in millimeters.
pub fn display_scale(spec: &PhoneModelSpec) -> f64 {
    REFERENCE_HEIGHT / spec.height
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseforge_core::catalog;

    #[test]
    fn test_sixteen_pro_scale() {
        let spec = catalog().get("iphone-16-pro").unwrap();
        let scale = display_scale(spec);
        assert!((scale - 0.6684).abs() < 1e-4);
        assert!((scale * spec.height - REFERENCE_HEIGHT).abs() < 1e-12);
    }

    #[test]
    fn test_every_model_normalizes_to_reference() {
        for spec in catalog().iter() {
            assert!((display_scale(spec) * spec.height - REFERENCE_HEIGHT).abs() < 1e-12);
        }
    }
}
