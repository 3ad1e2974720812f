//! Viewer configuration
//!
//! One configuration drives every viewer variant: which features are on,
//! where decoded payloads are extracted, and the rendering options.

use std::path::{Path, PathBuf};

use cfv_render::RenderOptions;
use serde::{Deserialize, Serialize};

use crate::types::{Result, ViewerError};

/// Optional viewer features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerFeatures {
    /// Paint the watermark on screen and stamp it on printed sheets
    pub watermark: bool,
    pub print: bool,
    /// Keep several documents open at once. When off, opening a document
    /// closes the previous one.
    pub tabs: bool,
}

impl Default for ViewerFeatures {
    fn default() -> Self {
        Self {
            watermark: true,
            print: true,
            tabs: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub features: ViewerFeatures,
    /// Directory decoded payloads are written to before rendering
    pub scratch_dir: PathBuf,
    pub render: RenderOptions,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            features: ViewerFeatures::default(),
            scratch_dir: default_scratch_dir(),
            render: RenderOptions::default(),
        }
    }
}

/// `<temp>/cfv/extracted files`
pub fn default_scratch_dir() -> PathBuf {
    std::env::temp_dir().join("cfv").join("extracted files")
}

impl ViewerConfig {
    /// Load configuration from a JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let config = serde_json::from_slice(&bytes)
            .map_err(|e| ViewerError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ViewerError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.scratch_dir.as_os_str().is_empty() {
            return Err(ViewerError::Config(
                "scratch directory cannot be empty".to_string(),
            ));
        }
        self.render.validate()?;
        Ok(())
    }

    /// Watermark to show, if the feature is on and the overlay is enabled
    pub fn active_watermark(&self) -> Option<&cfv_render::Watermark> {
        Some(&self.render.watermark).filter(|w| self.features.watermark && w.is_visible())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ViewerConfig =
            serde_json::from_str(r#"{"features": {"print": false}}"#).unwrap();
        assert!(!config.features.print);
        assert!(config.features.watermark);
        assert!(config.features.tabs);
        assert_eq!(config.render, RenderOptions::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_active_watermark_follows_feature_flag() {
        let mut config = ViewerConfig::default();
        assert!(config.active_watermark().is_some());
        config.features.watermark = false;
        assert!(config.active_watermark().is_none());
    }

    #[test]
    fn test_invalid_render_options_fail_validation() {
        let mut config = ViewerConfig::default();
        config.render.print_dpi_ladder.clear();
        assert!(matches!(
            config.validate(),
            Err(ViewerError::Render(cfv_render::RenderError::Config(_)))
        ));
    }
}
