//! Host media contract and an in-memory implementation.
//!
//! The engine never decodes files. A host hands it something implementing [`MediaElement`]
//! (a browser media element, a decoder wrapper, a test double) and the engine only drives its
//! position, rate and play state.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::foundation::error::{LaminaError, LaminaResult};

/// Decoded interleaved PCM.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioPcm {
    /// Frames per second.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
    /// Interleaved `f32` samples.
    pub interleaved: Arc<Vec<f32>>,
}

impl AudioPcm {
    /// Validate and wrap interleaved samples.
    pub fn new(sample_rate: u32, channels: u16, interleaved: Vec<f32>) -> LaminaResult<Self> {
        if sample_rate == 0 {
            return Err(LaminaError::configuration("pcm sample_rate must be > 0"));
        }
        if channels == 0 {
            return Err(LaminaError::configuration("pcm channels must be > 0"));
        }
        if interleaved.len() % usize::from(channels) != 0 {
            return Err(LaminaError::configuration(
                "pcm sample count must be a multiple of the channel count",
            ));
        }
        Ok(Self {
            sample_rate,
            channels,
            interleaved: Arc::new(interleaved),
        })
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.interleaved.len() / usize::from(self.channels.max(1))
    }

    /// Length in seconds.
    pub fn duration(&self) -> f64 {
        self.frames() as f64 / f64::from(self.sample_rate.max(1))
    }
}

/// Position/rate/play-state surface of a host media element.
pub trait MediaElement {
    /// Total length in seconds of the underlying media.
    fn duration(&self) -> f64;

    /// Current playhead in seconds.
    fn current_time(&self) -> f64;

    /// Move the playhead.
    fn set_current_time(&mut self, time: f64);

    /// Speed multiplier.
    fn playback_rate(&self) -> f64;

    /// Change the speed multiplier.
    fn set_playback_rate(&mut self, rate: f64);

    /// Return `true` while the element is not playing.
    fn is_paused(&self) -> bool;

    /// Start playback from the current position.
    fn play(&mut self) -> LaminaResult<()>;

    /// Pause playback.
    fn pause(&mut self);

    /// Decoded video frame at `time`, for media that carry pictures.
    fn video_frame_at(&self, _time: f64) -> Option<Arc<image::RgbaImage>> {
        None
    }

    /// Decoded PCM, for media that carry sound and allow offline mixing.
    fn pcm(&self) -> Option<AudioPcm> {
        None
    }
}

/// Media handle shared between a layer and its bus handlers.
pub type SharedMedia = Rc<RefCell<dyn MediaElement>>;

/// Already-decoded media held in memory.
#[derive(Clone, Debug)]
pub struct DecodedMedia {
    duration: f64,
    current_time: f64,
    playback_rate: f64,
    paused: bool,
    play_calls: u32,
    pcm: Option<AudioPcm>,
    frames: Vec<(f64, Arc<image::RgbaImage>)>,
}

impl DecodedMedia {
    /// Silent media of a fixed length.
    pub fn silent(duration: f64) -> LaminaResult<Self> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(LaminaError::configuration(format!(
                "media duration must be finite and >= 0, got {duration}"
            )));
        }
        Ok(Self {
            duration,
            current_time: 0.0,
            playback_rate: 1.0,
            paused: true,
            play_calls: 0,
            pcm: None,
            frames: Vec::new(),
        })
    }

    /// Media backed by PCM; the duration follows the sample count.
    pub fn from_pcm(pcm: AudioPcm) -> Self {
        let duration = pcm.duration();
        Self {
            duration,
            current_time: 0.0,
            playback_rate: 1.0,
            paused: true,
            play_calls: 0,
            pcm: Some(pcm),
            frames: Vec::new(),
        }
    }

    /// Attach a video frame shown from `time` until the next frame's time.
    pub fn with_frame(mut self, time: f64, frame: image::RgbaImage) -> Self {
        let at = self.frames.partition_point(|(t, _)| *t <= time);
        self.frames.insert(at, (time, Arc::new(frame)));
        self
    }

    /// Number of times [`MediaElement::play`] started playback.
    pub fn play_calls(&self) -> u32 {
        self.play_calls
    }

    /// Wrap into a [`SharedMedia`] handle.
    pub fn shared(self) -> SharedMedia {
        Rc::new(RefCell::new(self))
    }
}

impl MediaElement for DecodedMedia {
    fn duration(&self) -> f64 {
        self.duration
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, time: f64) {
        self.current_time = time.clamp(0.0, self.duration);
    }

    fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.playback_rate = rate;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn play(&mut self) -> LaminaResult<()> {
        if self.paused {
            self.paused = false;
            self.play_calls += 1;
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn video_frame_at(&self, time: f64) -> Option<Arc<image::RgbaImage>> {
        let idx = self
            .frames
            .partition_point(|(t, _)| *t <= time)
            .saturating_sub(1);
        self.frames.get(idx).map(|(_, f)| Arc::clone(f))
    }

    fn pcm(&self) -> Option<AudioPcm> {
        self.pcm.clone()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
