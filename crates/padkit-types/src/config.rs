//! Engine configuration.
//!
//! Tunables for hit-testing and screen placement. Loaded from an optional
//! `engine.toml`; every field has a default so an empty document is valid.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SkinError};
use crate::geometry::Size;

/// Hit-testing and screen-placement tunables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Margin (mapping units) added on every side of a button whose skin
    /// declares no extended edges.
    #[serde(default = "default_extended_edge")]
    pub extended_edge_default: f64,
    /// Extra margin (mapping units) around an active directional control,
    /// so a sliding thumb keeps the press.
    #[serde(default = "default_slide_margin")]
    pub directional_slide_margin: f64,
    /// Dead-zone radius as a fraction of the directional control's
    /// smaller side.
    #[serde(default = "default_dead_zone_ratio")]
    pub dead_zone_ratio: f64,
    /// Aspect ratio of the computed default game screen.
    #[serde(default = "default_screen_aspect")]
    pub default_screen_aspect: Size,
}

fn default_extended_edge() -> f64 {
    20.0
}
fn default_slide_margin() -> f64 {
    30.0
}
fn default_dead_zone_ratio() -> f64 {
    0.15
}
fn default_screen_aspect() -> Size {
    Size::new(4.0, 3.0)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            extended_edge_default: default_extended_edge(),
            directional_slide_margin: default_slide_margin(),
            dead_zone_ratio: default_dead_zone_ratio(),
            default_screen_aspect: default_screen_aspect(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| SkinError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml(&source)?;
        log::debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.extended_edge_default.is_finite() || self.extended_edge_default < 0.0 {
            return Err(SkinError::Config(format!(
                "extended_edge_default must be >= 0, got {}",
                self.extended_edge_default
            )));
        }
        if !self.directional_slide_margin.is_finite() || self.directional_slide_margin < 0.0 {
            return Err(SkinError::Config(format!(
                "directional_slide_margin must be >= 0, got {}",
                self.directional_slide_margin
            )));
        }
        if !(0.0..0.5).contains(&self.dead_zone_ratio) {
            return Err(SkinError::Config(format!(
                "dead_zone_ratio must be in 0..0.5, got {}",
                self.dead_zone_ratio
            )));
        }
        if !self.default_screen_aspect.is_valid() {
            return Err(SkinError::Config(format!(
                "default_screen_aspect must be positive, got {}x{}",
                self.default_screen_aspect.width, self.default_screen_aspect.height
            )));
        }
        Ok(())
    }
}
