//! The process-wide table of supported phone models.

use std::sync::LazyLock;

use indexmap::IndexMap;

use crate::errors::CatalogError;
use crate::spec::{ButtonSpec, CameraIsland, DisplayCutout, FeatureFlags, PhoneModelSpec};

/// An immutable, ordered lookup table from model id to spec.
///
/// Every entry has passed [`PhoneModelSpec::validate`]. Iteration follows
/// insertion order.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Catalog {
    models: IndexMap<String, PhoneModelSpec>,
}

impl Catalog {
    /// Build a catalog, validating every entry and rejecting duplicate ids.
    pub fn from_specs(specs: impl IntoIterator<Item = PhoneModelSpec>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for spec in specs {
            catalog.insert(spec)?;
        }
        Ok(catalog)
    }

    /// A copy of this catalog with additional entries appended.
    pub fn extended(
        &self,
        extra: impl IntoIterator<Item = PhoneModelSpec>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = self.clone();
        for spec in extra {
            catalog.insert(spec)?;
        }
        Ok(catalog)
    }

    fn insert(&mut self, spec: PhoneModelSpec) -> Result<(), CatalogError> {
        spec.validate()?;
        if self.models.contains_key(&spec.id) {
            return Err(CatalogError::DuplicateModel { id: spec.id });
        }
        self.models.insert(spec.id.clone(), spec);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&PhoneModelSpec, CatalogError> {
        self.models
            .get(id)
            .ok_or_else(|| CatalogError::UnknownModel { id: id.to_string() })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.models.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhoneModelSpec> {
        self.models.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

static BUILTIN: LazyLock<Catalog> = LazyLock::new(|| {
    let mut models = IndexMap::new();
    for spec in builtin_specs() {
        models.insert(spec.id.clone(), spec);
    }
    Catalog { models }
});

/// The built-in catalog, initialized on first use.
pub fn catalog() -> &'static Catalog {
    &BUILTIN
}

fn apple(id: &str, name: &str, series: &str) -> (String, String, String, String) {
    (id.into(), name.into(), "Apple".into(), series.into())
}

#[rustfmt::skip]
fn builtin_specs() -> Vec<PhoneModelSpec> {
    let (id, name, brand, series) = apple("iphone-14-pro", "iPhone 14 Pro", "iPhone 14");
    let fourteen_pro = PhoneModelSpec {
        id, name, brand, series,
        width: 71.45, height: 147.46, depth: 7.85, corner_radius: 13.65,
        display: DisplayCutout { width: 65.0, height: 140.6 },
        camera: CameraIsland { offset_x: 4.0, offset_y: 4.0, width: 35.0, height: 36.5, corner_radius: 8.0 },
        volume_button: ButtonSpec { offset: 36.0, length: 24.0 },
        power_button: ButtonSpec { offset: 42.0, length: 17.0 },
        action_button_offset: None,
        camera_control_offset: None,
        usb_port_offset: 29.73,
        speaker_left_offset: 12.0,
        speaker_right_offset: 44.45,
        features: FeatureFlags { has_mag_safe: true, has_dynamic_island: true, ..Default::default() },
    };

    let (id, name, brand, series) = apple("iphone-15-pro", "iPhone 15 Pro", "iPhone 15");
    let fifteen_pro = PhoneModelSpec {
        id, name, brand, series,
        width: 70.60, height: 146.60, depth: 8.25, corner_radius: 13.0,
        display: DisplayCutout { width: 64.3, height: 139.8 },
        camera: CameraIsland { offset_x: 4.0, offset_y: 4.0, width: 37.0, height: 37.5, corner_radius: 8.5 },
        volume_button: ButtonSpec { offset: 37.0, length: 24.0 },
        power_button: ButtonSpec { offset: 42.0, length: 17.0 },
        action_button_offset: Some(28.0),
        camera_control_offset: None,
        usb_port_offset: 29.3,
        speaker_left_offset: 11.5,
        speaker_right_offset: 44.1,
        features: FeatureFlags { has_mag_safe: true, has_dynamic_island: true, has_action_button: true, has_camera_control: false },
    };

    let (id, name, brand, series) = apple("iphone-15-pro-max", "iPhone 15 Pro Max", "iPhone 15");
    let fifteen_pro_max = PhoneModelSpec {
        id, name, brand, series,
        width: 76.70, height: 159.90, depth: 8.25, corner_radius: 14.5,
        display: DisplayCutout { width: 70.4, height: 153.0 },
        camera: CameraIsland { offset_x: 4.0, offset_y: 4.0, width: 39.6, height: 40.3, corner_radius: 9.5 },
        volume_button: ButtonSpec { offset: 39.0, length: 24.0 },
        power_button: ButtonSpec { offset: 45.0, length: 17.0 },
        action_button_offset: Some(29.0),
        camera_control_offset: None,
        usb_port_offset: 32.35,
        speaker_left_offset: 13.0,
        speaker_right_offset: 48.7,
        features: FeatureFlags { has_mag_safe: true, has_dynamic_island: true, has_action_button: true, has_camera_control: false },
    };

    let (id, name, brand, series) = apple("iphone-16-pro", "iPhone 16 Pro", "iPhone 16");
    let sixteen_pro = PhoneModelSpec {
        id, name, brand, series,
        width: 71.45, height: 149.61, depth: 8.25, corner_radius: 14.17,
        display: DisplayCutout { width: 65.6, height: 143.0 },
        camera: CameraIsland { offset_x: 4.0, offset_y: 4.0, width: 38.0, height: 38.6, corner_radius: 9.0 },
        volume_button: ButtonSpec { offset: 37.0, length: 24.0 },
        power_button: ButtonSpec { offset: 43.0, length: 17.0 },
        action_button_offset: Some(30.0),
        camera_control_offset: Some(92.0),
        usb_port_offset: 29.73,
        speaker_left_offset: 12.0,
        speaker_right_offset: 44.45,
        features: FeatureFlags { has_mag_safe: true, has_dynamic_island: true, has_action_button: true, has_camera_control: true },
    };

    let (id, name, brand, series) = apple("iphone-16-pro-max", "iPhone 16 Pro Max", "iPhone 16");
    let sixteen_pro_max = PhoneModelSpec {
        id, name, brand, series,
        width: 77.58, height: 163.00, depth: 8.25, corner_radius: 15.2,
        display: DisplayCutout { width: 71.5, height: 156.2 },
        camera: CameraIsland { offset_x: 4.0, offset_y: 4.0, width: 39.6, height: 40.3, corner_radius: 9.5 },
        volume_button: ButtonSpec { offset: 40.0, length: 24.0 },
        power_button: ButtonSpec { offset: 46.0, length: 17.0 },
        action_button_offset: Some(31.0),
        camera_control_offset: Some(98.0),
        usb_port_offset: 32.79,
        speaker_left_offset: 13.5,
        speaker_right_offset: 49.08,
        features: FeatureFlags { has_mag_safe: true, has_dynamic_island: true, has_action_button: true, has_camera_control: true },
    };

    vec![fourteen_pro, fifteen_pro, fifteen_pro_max, sixteen_pro, sixteen_pro_max]
}
