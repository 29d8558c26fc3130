//! `kiln.toml` manifest parsing.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Optional project manifest. Currently carries only a default target
/// spec, consulted after the `--target` flag and the environment
/// override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KilnManifest {
    /// Build configuration section.
    #[serde(default)]
    pub build: BuildConfig,
}

/// `[build]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Default target spec (e.g., "x86-64-linux-avx").
    #[serde(default)]
    pub target: Option<String>,
}

impl KilnManifest {
    /// Parse a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let manifest = toml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(manifest)
    }

    /// Load `kiln.toml` from the current directory, if present.
    pub fn load_if_present() -> Result<Option<Self>> {
        let path = Path::new("kiln.toml");
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }
}
