//! JSON-facing construction options for every layer type.
//!
//! Unknown keys are rejected. Semantic checks run in `validate`, which every `Layer`
//! constructor calls before building anything.

use serde::{Deserialize, Serialize};

use crate::assets::color::Color;
use crate::foundation::error::{LaminaError, LaminaResult};
use crate::render::fill::Fill;

fn yes() -> bool {
    true
}

fn one() -> f64 {
    1.0
}

/// Inset border stroked after the layer content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Border {
    /// Stroke width in pixels.
    pub width: f64,
    /// Stroke color.
    pub color: Color,
}

/// Options for [`crate::Layer::base`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BaseOptions {
    /// Movie time at which the layer starts.
    #[serde(default)]
    pub start_time: f64,
    /// Length in seconds; `None` keeps the layer active forever.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Whether the layer renders.
    #[serde(default = "yes")]
    pub enabled: bool,
}

impl Default for BaseOptions {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            duration: None,
            enabled: true,
        }
    }
}

/// Options for [`crate::Layer::visual`] and [`crate::Layer::image`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VisualOptions {
    /// Movie time at which the layer starts.
    #[serde(default)]
    pub start_time: f64,
    /// Length in seconds; `None` keeps the layer active forever.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Whether the layer renders.
    #[serde(default = "yes")]
    pub enabled: bool,
    /// Left edge on the movie canvas.
    #[serde(default)]
    pub x: f64,
    /// Top edge on the movie canvas.
    #[serde(default)]
    pub y: f64,
    /// Surface width; the movie width when unset.
    #[serde(default)]
    pub width: Option<f64>,
    /// Surface height; the movie height when unset.
    #[serde(default)]
    pub height: Option<f64>,
    /// Opacity used when compositing onto the movie canvas.
    #[serde(default = "one")]
    pub opacity: f64,
    /// Paint drawn before the content.
    #[serde(default)]
    pub background: Option<Fill>,
    /// Border drawn after the content.
    #[serde(default)]
    pub border: Option<Border>,
}

impl Default for VisualOptions {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            duration: None,
            enabled: true,
            x: 0.0,
            y: 0.0,
            width: None,
            height: None,
            opacity: 1.0,
            background: None,
            border: None,
        }
    }
}

/// Options for [`crate::Layer::audio`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AudioOptions {
    /// Movie time at which the layer starts.
    #[serde(default)]
    pub start_time: f64,
    /// Source seconds to play; the rest of the media after `source_start_time` when unset.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Whether the layer plays.
    #[serde(default = "yes")]
    pub enabled: bool,
    /// Media position that lines up with `start_time`.
    #[serde(default)]
    pub source_start_time: f64,
    /// Media seconds per movie second.
    #[serde(default = "one")]
    pub playback_rate: f64,
    /// Linear gain used by the offline mixer.
    #[serde(default = "one")]
    pub volume: f64,
    /// Excludes the layer from the offline mix.
    #[serde(default)]
    pub muted: bool,
}

impl Default for AudioOptions {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            duration: None,
            enabled: true,
            source_start_time: 0.0,
            playback_rate: 1.0,
            volume: 1.0,
            muted: false,
        }
    }
}

/// Options for [`crate::Layer::video`]: the union of visual and audio options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VideoOptions {
    /// Movie time at which the layer starts.
    #[serde(default)]
    pub start_time: f64,
    /// Source seconds to play; the rest of the media after `source_start_time` when unset.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Whether the layer renders and plays.
    #[serde(default = "yes")]
    pub enabled: bool,
    /// Left edge on the movie canvas.
    #[serde(default)]
    pub x: f64,
    /// Top edge on the movie canvas.
    #[serde(default)]
    pub y: f64,
    /// Surface width; the movie width when unset.
    #[serde(default)]
    pub width: Option<f64>,
    /// Surface height; the movie height when unset.
    #[serde(default)]
    pub height: Option<f64>,
    /// Opacity used when compositing onto the movie canvas.
    #[serde(default = "one")]
    pub opacity: f64,
    /// Paint drawn before the frame.
    #[serde(default)]
    pub background: Option<Fill>,
    /// Border drawn after the frame.
    #[serde(default)]
    pub border: Option<Border>,
    /// Media position that lines up with `start_time`.
    #[serde(default)]
    pub source_start_time: f64,
    /// Media seconds per movie second.
    #[serde(default = "one")]
    pub playback_rate: f64,
    /// Linear gain used by the offline mixer.
    #[serde(default = "one")]
    pub volume: f64,
    /// Excludes the layer from the offline mix.
    #[serde(default)]
    pub muted: bool,
}

impl Default for VideoOptions {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            duration: None,
            enabled: true,
            x: 0.0,
            y: 0.0,
            width: None,
            height: None,
            opacity: 1.0,
            background: None,
            border: None,
            source_start_time: 0.0,
            playback_rate: 1.0,
            volume: 1.0,
            muted: false,
        }
    }
}

impl VideoOptions {
    pub(crate) fn split(self) -> (VisualOptions, AudioOptions) {
        (
            VisualOptions {
                start_time: self.start_time,
                duration: self.duration,
                enabled: self.enabled,
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
                opacity: self.opacity,
                background: self.background,
                border: self.border,
            },
            AudioOptions {
                start_time: self.start_time,
                duration: self.duration,
                enabled: self.enabled,
                source_start_time: self.source_start_time,
                playback_rate: self.playback_rate,
                volume: self.volume,
                muted: self.muted,
            },
        )
    }
}

macro_rules! json_entry {
    ($($name:ident),* $(,)?) => {
        $(
            impl $name {
                /// Parse from JSON and validate.
                pub fn from_json(json: &str) -> LaminaResult<Self> {
                    let opts: Self = serde_json::from_str(json)?;
                    opts.validate()?;
                    Ok(opts)
                }
            }
        )*
    };
}

json_entry!(BaseOptions, VisualOptions, AudioOptions, VideoOptions);

pub(crate) fn check_start_time(v: f64) -> LaminaResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(LaminaError::configuration(format!(
            "startTime must be finite and >= 0, got {v}"
        )));
    }
    Ok(())
}

pub(crate) fn check_duration(v: Option<f64>) -> LaminaResult<()> {
    match v {
        Some(d) if !d.is_finite() || d < 0.0 => Err(LaminaError::configuration(format!(
            "duration must be finite and >= 0, got {d}"
        ))),
        _ => Ok(()),
    }
}

pub(crate) fn check_playback_rate(v: f64) -> LaminaResult<()> {
    if !v.is_finite() || v <= 0.0 {
        return Err(LaminaError::configuration(format!(
            "playbackRate must be finite and > 0, got {v}"
        )));
    }
    Ok(())
}

fn check_non_negative(name: &str, v: f64) -> LaminaResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(LaminaError::configuration(format!(
            "{name} must be finite and >= 0, got {v}"
        )));
    }
    Ok(())
}

fn check_finite(name: &str, v: f64) -> LaminaResult<()> {
    if !v.is_finite() {
        return Err(LaminaError::configuration(format!(
            "{name} must be finite, got {v}"
        )));
    }
    Ok(())
}

impl BaseOptions {
    /// Check value ranges.
    pub fn validate(&self) -> LaminaResult<()> {
        check_start_time(self.start_time)?;
        check_duration(self.duration)
    }
}

impl VisualOptions {
    /// Check value ranges.
    pub fn validate(&self) -> LaminaResult<()> {
        check_start_time(self.start_time)?;
        check_duration(self.duration)?;
        check_finite("x", self.x)?;
        check_finite("y", self.y)?;
        if let Some(w) = self.width {
            check_non_negative("width", w)?;
        }
        if let Some(h) = self.height {
            check_non_negative("height", h)?;
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(LaminaError::configuration(format!(
                "opacity must be in [0, 1], got {}",
                self.opacity
            )));
        }
        if let Some(border) = &self.border {
            check_non_negative("border.width", border.width)?;
        }
        Ok(())
    }
}

impl AudioOptions {
    /// Check value ranges.
    pub fn validate(&self) -> LaminaResult<()> {
        check_start_time(self.start_time)?;
        check_duration(self.duration)?;
        check_non_negative("sourceStartTime", self.source_start_time)?;
        check_playback_rate(self.playback_rate)?;
        check_non_negative("volume", self.volume)
    }
}

impl VideoOptions {
    /// Check value ranges.
    pub fn validate(&self) -> LaminaResult<()> {
        let (visual, audio) = self.clone().split();
        visual.validate()?;
        audio.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/options.rs"]
mod tests;
