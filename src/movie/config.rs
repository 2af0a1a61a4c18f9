use serde::{Deserialize, Serialize};

use crate::foundation::error::{LaminaError, LaminaResult};
use crate::render::fill::Fill;

fn one() -> f64 {
    1.0
}

fn yes() -> bool {
    true
}

/// Movie construction options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MovieConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Paint under every layer.
    #[serde(default)]
    pub background: Option<Fill>,
    /// Wrap to the start instead of ending.
    #[serde(default)]
    pub repeat: bool,
    /// Fixed length; the latest finite layer end when unset.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Movie seconds per host-clock second.
    #[serde(default = "one")]
    pub playback_rate: f64,
    /// Re-render after seeks while paused.
    #[serde(default = "yes")]
    pub auto_refresh: bool,
}

impl MovieConfig {
    /// Config for a `width x height` canvas with every other option at its default.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: None,
            repeat: false,
            duration: None,
            playback_rate: 1.0,
            auto_refresh: true,
        }
    }

    /// Parse from JSON and validate.
    pub fn from_json(json: &str) -> LaminaResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> LaminaResult<()> {
        if !self.playback_rate.is_finite() || self.playback_rate <= 0.0 {
            return Err(LaminaError::configuration(format!(
                "playbackRate must be finite and > 0, got {}",
                self.playback_rate
            )));
        }
        if let Some(d) = self.duration
            && (!d.is_finite() || d < 0.0)
        {
            return Err(LaminaError::configuration(format!(
                "duration must be finite and >= 0, got {d}"
            )));
        }
        Ok(())
    }
}
