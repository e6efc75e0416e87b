use dmg_quantize::PaletteMode;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

/// Environment variable naming the config file when `--config` is absent
pub const CONFIG_ENV: &str = "IMG2DMG_CONFIG";

/// Application configuration loaded from an optional YAML file
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Palette mode used when none is given on the command line
    #[serde(default, deserialize_with = "deserialize_mode")]
    pub mode: PaletteMode,

    /// Directory export artifacts are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Bundle all finished jobs into one archive instead of loose PNGs
    #[serde(default)]
    pub zip: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

fn deserialize_mode<'de, D>(deserializer: D) -> Result<PaletteMode, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

impl AppConfig {
    /// Parse configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as null, which we treat as "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Load configuration from a file, falling back to defaults on any failure
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("No config file configured, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml_str(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        mode = %config.mode,
                        output_dir = %config.output_dir.display(),
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Resolve the config path from an explicit flag or the environment
    pub fn resolve_path(flag: Option<PathBuf>) -> Option<PathBuf> {
        flag.or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: PaletteMode::Dmg,
            output_dir: default_output_dir(),
            zip: false,
        }
    }
}
