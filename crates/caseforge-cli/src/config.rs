//! caseforge.toml loading
//!
//! The file is optional. A `[case]` table overrides case parameters and
//! `[[models]]` entries extend the built-in catalog:
//!
//! ```toml
//! [case]
//! wall_thickness = 2.0
//! cutout_mode = "overlay"
//!
//! [[models]]
//! id = "test-phone"
//! name = "Test Phone"
//! # ...
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use caseforge_core::{catalog, CaseParams, Catalog, PhoneModelSpec};
use serde::Deserialize;
use tracing::debug;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "CASEFORGE_CONFIG";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "caseforge.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    case: CaseParams,
    #[serde(default)]
    models: Vec<PhoneModelSpec>,
}

/// Effective settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub params: CaseParams,
    pub catalog: Catalog,
    /// The file the settings came from, if any.
    pub source: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            params: CaseParams::default(),
            catalog: catalog().clone(),
            source: None,
        }
    }
}

impl Settings {
    /// Load settings using the standard lookup order.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        match resolve_config_path(explicit, std::env::var_os(CONFIG_ENV), &cwd) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut settings = Self::parse(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        debug!(path = %path.display(), models = settings.catalog.len(), "loaded config");
        settings.source = Some(path.to_path_buf());
        Ok(settings)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(text).context("Failed to parse TOML")?;
        file.case.validate()?;
        let catalog = catalog().extended(file.models)?;
        Ok(Self {
            params: file.case,
            catalog,
            source: None,
        })
    }
}

/// Pick the config file: an explicit path, else the environment variable,
/// else `caseforge.toml` in `cwd` if it exists.
///
/// Explicit and environment paths are returned even when missing so that
/// loading them reports the error.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    env_value: Option<OsString>,
    cwd: &Path,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(value) = env_value.filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(value));
    }
    let default = cwd.join(DEFAULT_CONFIG_FILE);
    default.is_file().then_some(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseforge_core::CutoutMode;

    const EXTRA_MODEL: &str = r#"
[[models]]
id = "test-phone"
name = "Test Phone"
brand = "Acme"
series = "Test"
width = 70.0
height = 145.0
depth = 8.0
corner_radius = 10.0
usb_port_offset = 29.0
speaker_left_offset = 8.0
speaker_right_offset = 47.0

[models.camera]
offset_x = 5.0
offset_y = 5.0
width = 30.0
height = 30.0
corner_radius = 6.0

[models.volume_button]
offset = 30.0
length = 20.0

[models.power_button]
offset = 35.0
length = 15.0
"#;

    #[test]
    fn test_empty_config_is_default() {
        let settings = Settings::parse("").unwrap();
        assert_eq!(settings.params, CaseParams::default());
        assert_eq!(settings.catalog.len(), catalog().len());
    }

    #[test]
    fn test_case_overrides() {
        let settings = Settings::parse(
            "[case]\nwall_thickness = 2.0\ncutout_mode = \"overlay\"\n\n[case.bevel]\nsegments = 5\n",
        )
        .unwrap();
        assert_eq!(settings.params.wall_thickness, 2.0);
        assert_eq!(settings.params.cutout_mode, CutoutMode::Overlay);
        assert_eq!(settings.params.bevel.segments, 5);
        assert_eq!(settings.params.bevel.size, 0.3);
        assert_eq!(settings.params.base_thickness, 1.2);
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        assert!(Settings::parse("[case]\nwall_thickness = -1.0\n").is_err());
        assert!(Settings::parse("[case]\nno_such_field = 1\n").is_err());
    }

    #[test]
    fn test_models_extend_catalog() {
        let settings = Settings::parse(EXTRA_MODEL).unwrap();
        assert_eq!(settings.catalog.len(), catalog().len() + 1);
        let spec = settings.catalog.get("test-phone").unwrap();
        assert_eq!(spec.brand, "Acme");
        assert!(!spec.features.has_action_button);
        assert!(!catalog().contains("test-phone"));
    }

    #[test]
    fn test_duplicate_model_is_rejected() {
        let duplicate = EXTRA_MODEL.replace("test-phone", "iphone-16-pro");
        let err = Settings::parse(&duplicate).unwrap_err();
        assert!(format!("{err:#}").contains("iphone-16-pro"));
    }

    #[test]
    fn test_invalid_model_is_rejected() {
        let broken = EXTRA_MODEL.replace("width = 70.0", "width = -70.0");
        assert!(Settings::parse(&broken).is_err());
    }

    #[test]
    fn test_lookup_order() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("explicit.toml");

        assert_eq!(resolve_config_path(None, None, dir.path()), None);
        assert_eq!(
            resolve_config_path(Some(&explicit), Some("env.toml".into()), dir.path()),
            Some(explicit.clone())
        );
        assert_eq!(
            resolve_config_path(None, Some("env.toml".into()), dir.path()),
            Some(PathBuf::from("env.toml"))
        );

        let default = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&default, "").unwrap();
        assert_eq!(resolve_config_path(None, None, dir.path()), Some(default));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("caseforge.toml");
        std::fs::write(&path, EXTRA_MODEL).unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.source.as_deref(), Some(path.as_path()));
        assert!(settings.catalog.contains("test-phone"));

        assert!(Settings::from_file(&dir.path().join("missing.toml")).is_err());
    }
}
