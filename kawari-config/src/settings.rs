//! Optional TOML settings: version constants and extra presets.
//!
//! ```toml
//! [version]
//! major = 0
//! minor = 2
//! variant_suffix = [0, 0, 0, 0]
//!
//! [[preset]]
//! id = 9
//! name = "flash-only"
//! features = ["have_flash"]
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{ConfigError, Result};
use crate::preset::{Preset, PresetBook};
use crate::table::Feature;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VersionInfo {
    pub major: u8,
    pub minor: u8,
    pub variant_suffix: [u8; 4],
}

impl Default for VersionInfo {
    fn default() -> Self {
        Self {
            major: 0,
            minor: 2,
            variant_suffix: [0; 4],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PresetDef {
    pub id: i32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub version: VersionInfo,
    #[serde(rename = "preset")]
    pub presets: Vec<PresetDef>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::parse(&content, path)?;
        info!(
            "loaded {} ({} extra presets)",
            path.display(),
            settings.presets.len()
        );
        Ok(settings)
    }

    /// Parse settings text; `origin` only labels errors.
    pub fn parse(content: &str, origin: &Path) -> Result<Self> {
        let settings: Settings = toml::from_str(content).map_err(|source| ConfigError::Toml {
            path: origin.to_path_buf(),
            source,
        })?;

        let mut ids = HashSet::new();
        for def in &settings.presets {
            if !ids.insert(def.id) {
                return Err(ConfigError::DuplicatePreset { id: def.id });
            }
        }
        Ok(settings)
    }

    /// Built-in presets with the user's presets laid over them.
    pub fn book(&self) -> PresetBook {
        let mut book = PresetBook::builtin();
        for def in &self.presets {
            let name = def
                .name
                .clone()
                .unwrap_or_else(|| format!("preset-{}", def.id));
            book.insert(Preset::new(def.id, name, &def.features));
        }
        book
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(content: &str) -> Result<Settings> {
        Settings::parse(content, Path::new("test.toml"))
    }

    #[test]
    fn empty_file_gives_defaults() {
        let settings = parse("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.version.minor, 2);
    }

    #[test]
    fn partial_version() {
        let settings = parse("[version]\nminor = 5\n").unwrap();
        assert_eq!(settings.version.major, 0);
        assert_eq!(settings.version.minor, 5);
        assert_eq!(settings.version.variant_suffix, [0; 4]);
    }

    #[test]
    fn user_preset_added_to_book() {
        let settings = parse(
            r#"
[[preset]]
id = 9
name = "flash-only"
features = ["have_flash", "with_64k"]
"#,
        )
        .unwrap();
        let book = settings.book();
        let preset = book.get(9).unwrap();
        assert_eq!(preset.name, "flash-only");
        assert_eq!(preset.features, vec![Feature::HaveFlash, Feature::With64k]);
        assert_eq!(book.len(), 10);
    }

    #[test]
    fn user_preset_overrides_builtin() {
        let settings = parse("[[preset]]\nid = 4\nfeatures = [\"hide_sync\"]\n").unwrap();
        let book = settings.book();
        let preset = book.get(4).unwrap();
        assert_eq!(preset.name, "preset-4");
        assert_eq!(preset.features, vec![Feature::HideSync]);
    }

    #[test]
    fn unknown_feature_rejected() {
        let err = parse("[[preset]]\nid = 9\nfeatures = [\"warp_drive\"]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
    }

    #[test]
    fn unknown_key_rejected() {
        assert!(parse("colour = 3\n").is_err());
    }

    #[test]
    fn duplicate_preset_rejected() {
        let err = parse("[[preset]]\nid = 9\n[[preset]]\nid = 9\n").unwrap_err();
        assert!(matches!(err, ConfigError::DuplicatePreset { id: 9 }));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[version]\nmajor = 1\nvariant_suffix = [1, 2, 3, 4]").unwrap();
        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.version.major, 1);
        assert_eq!(settings.version.variant_suffix, [1, 2, 3, 4]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("nope.toml"));
    }
}
