//! The layer record and its constructors.
//!
//! A [`Layer`] is a base record (id, timing, effect chain, attachment) plus optional
//! capability components picked by the constructor: a [`Visual`] for layers that draw and an
//! [`AudioSource`] for layers that carry sound.

use std::cell::Cell;
use std::rc::Rc;

use image::RgbaImage;
use tracing::{debug, trace};

use crate::assets::media::SharedMedia;
use crate::cache::values::ValueCache;
use crate::effects::chain::{EffectChain, EffectParent, EffectSlot};
use crate::event::topics::{self, MovieEvent};
use crate::foundation::core::Canvas;
use crate::foundation::error::{LaminaError, LaminaResult};
use crate::foundation::ids::{EffectId, LayerId, MovieId};
use crate::layer::audio_source::AudioSource;
use crate::layer::content::{Content, ImageContent, VideoContent};
use crate::layer::options::{
    AudioOptions, BaseOptions, VideoOptions, VisualOptions, check_duration, check_start_time,
};
use crate::layer::visual::Visual;
use crate::lifecycle::attach::{Attachable, Attachment};
use crate::movie::context::MovieCtx;
use crate::render::surface::Surface;

/// Layer kind, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerType {
    /// Timing only; draws nothing.
    Base,
    /// Draws a background and optional host content.
    Visual,
    /// Draws a decoded still image.
    Image,
    /// Plays host media.
    Audio,
    /// Draws frames of host media and plays its sound.
    Video,
}

/// Timing shared with the audio capability.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct LayerTiming {
    pub(crate) start_time: f64,
    pub(crate) duration: Option<f64>,
}

/// Time-bounded contributor to a movie.
pub struct Layer {
    id: LayerId,
    kind: LayerType,
    enabled: bool,
    timing: Rc<Cell<LayerTiming>>,
    attachment: Attachment<MovieId>,
    effects: EffectChain,
    visual: Option<Visual>,
    audio: Option<AudioSource>,
}

impl std::fmt::Debug for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layer")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("enabled", &self.enabled)
            .field("timing", &self.timing.get())
            .field("attachment", &self.attachment)
            .field("effects", &self.effects.len())
            .field("visual", &self.visual)
            .field("audio", &self.audio)
            .finish()
    }
}

impl Layer {
    fn bare(kind: LayerType, start_time: f64, duration: Option<f64>, enabled: bool) -> Self {
        let id = LayerId::next();
        Self {
            id,
            kind,
            enabled,
            timing: Rc::new(Cell::new(LayerTiming {
                start_time,
                duration,
            })),
            attachment: Attachment::new(),
            effects: EffectChain::new(EffectParent::Layer(id)),
            visual: None,
            audio: None,
        }
    }

    /// Timing-only layer.
    pub fn base(opts: BaseOptions) -> LaminaResult<Self> {
        opts.validate()?;
        Ok(Self::bare(
            LayerType::Base,
            opts.start_time,
            opts.duration,
            opts.enabled,
        ))
    }

    /// Layer that paints its background (and content, once set).
    pub fn visual(opts: VisualOptions) -> LaminaResult<Self> {
        opts.validate()?;
        let mut layer = Self::bare(
            LayerType::Visual,
            opts.start_time,
            opts.duration,
            opts.enabled,
        );
        layer.visual = Some(Visual::from_options(&opts));
        Ok(layer)
    }

    /// Visual layer drawing `content`.
    pub fn with_content(
        opts: VisualOptions,
        content: impl Content + 'static,
    ) -> LaminaResult<Self> {
        let mut layer = Self::visual(opts)?;
        if let Some(v) = layer.visual.as_mut() {
            v.set_content(content);
        }
        Ok(layer)
    }

    /// Layer showing a decoded straight-alpha image stretched over its surface.
    pub fn image(opts: VisualOptions, image: RgbaImage) -> LaminaResult<Self> {
        let mut layer = Self::with_content(opts, ImageContent::new(image))?;
        layer.kind = LayerType::Image;
        Ok(layer)
    }

    /// Layer playing host media.
    pub fn audio(opts: AudioOptions, media: SharedMedia) -> LaminaResult<Self> {
        opts.validate()?;
        let mut layer = Self::bare(
            LayerType::Audio,
            opts.start_time,
            opts.duration,
            opts.enabled,
        );
        layer.audio = Some(layer.audio_source(&opts, media));
        Ok(layer)
    }

    /// Layer drawing the frames of host media and playing its sound.
    pub fn video(opts: VideoOptions, media: SharedMedia) -> LaminaResult<Self> {
        opts.validate()?;
        let (visual_opts, audio_opts) = opts.split();
        let mut layer = Self::bare(
            LayerType::Video,
            audio_opts.start_time,
            audio_opts.duration,
            audio_opts.enabled,
        );
        let audio = layer.audio_source(&audio_opts, media);
        let mut visual = Visual::from_options(&visual_opts);
        visual.set_boxed_content(Box::new(VideoContent::new(audio.shared_state())));
        layer.visual = Some(visual);
        layer.audio = Some(audio);
        Ok(layer)
    }

    fn audio_source(&self, opts: &AudioOptions, media: SharedMedia) -> AudioSource {
        AudioSource::new(
            media,
            Rc::clone(&self.timing),
            opts.source_start_time,
            opts.playback_rate,
            opts.volume,
            opts.muted,
        )
    }

    /// Stable id, also the event target for `layer.*` topics.
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Kind chosen by the constructor.
    pub fn kind(&self) -> LayerType {
        self.kind
    }

    /// Whether the layer renders and plays.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the layer.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Movie time at which the layer starts.
    pub fn start_time(&self) -> f64 {
        self.timing.get().start_time
    }

    /// Move the layer on the movie timeline.
    pub fn set_start_time(&mut self, start_time: f64) -> LaminaResult<()> {
        check_start_time(start_time)?;
        let mut t = self.timing.get();
        t.start_time = start_time;
        self.timing.set(t);
        Ok(())
    }

    /// Movie seconds covered. Infinite for visual layers without an explicit duration; for
    /// audio-bearing layers this follows the playback rate.
    pub fn duration(&self) -> f64 {
        match &self.audio {
            Some(audio) => audio.duration(),
            None => self.timing.get().duration.unwrap_or(f64::INFINITY),
        }
    }

    /// Set the explicit duration (source seconds for audio-bearing layers).
    pub fn set_duration(&mut self, duration: Option<f64>) -> LaminaResult<()> {
        if let Some(audio) = self.audio.as_mut() {
            return audio.set_raw_duration(duration);
        }
        check_duration(duration)?;
        let mut t = self.timing.get();
        t.duration = duration;
        self.timing.set(t);
        Ok(())
    }

    /// `start_time + duration`.
    pub fn end_time(&self) -> f64 {
        self.start_time() + self.duration()
    }

    /// Return `true` when `movie_time` falls inside `[start, end)`.
    pub fn is_active_at(&self, movie_time: f64) -> bool {
        movie_time >= self.start_time() && movie_time < self.end_time()
    }

    /// Movie this layer is attached to.
    pub fn movie(&self) -> Option<MovieId> {
        self.attachment.attached_parent()
    }

    /// Visual component, for visual-capable layers.
    pub fn as_visual(&self) -> Option<&Visual> {
        self.visual.as_ref()
    }

    /// Visual component, mutably.
    pub fn as_visual_mut(&mut self) -> Option<&mut Visual> {
        self.visual.as_mut()
    }

    /// Audio capability, for audio-bearing layers.
    pub fn as_audio(&self) -> Option<&AudioSource> {
        self.audio.as_ref()
    }

    /// Audio capability, mutably.
    pub fn as_audio_mut(&mut self) -> Option<&mut AudioSource> {
        self.audio.as_mut()
    }

    /// Rendered surface of a visual-capable layer.
    pub fn surface(&self) -> Option<&Surface> {
        self.visual.as_ref().map(Visual::surface)
    }

    /// Effect chain applied to the layer surface.
    pub fn effects(&self) -> &EffectChain {
        &self.effects
    }

    /// Effect chain, mutably.
    pub fn effects_mut(&mut self) -> &mut EffectChain {
        &mut self.effects
    }

    /// Attach `slot` to this layer and append it to the chain.
    pub fn add_effect(&mut self, slot: EffectSlot) -> LaminaResult<EffectId> {
        self.effects.push(slot)
    }

    /// Detach and remove an effect, compacting the chain.
    pub fn remove_effect(&mut self, id: EffectId) -> LaminaResult<EffectSlot> {
        self.effects.remove(id)
    }

    /// Detach an effect and leave its slot empty.
    pub fn delete_effect(&mut self, id: EffectId) -> LaminaResult<EffectSlot> {
        self.effects.delete(id)
    }

    /// Render the visual component and the effect chain for `movie_time`.
    ///
    /// Returns `true` when the surface holds something to composite. Disabled layers, layers
    /// outside their window, non-visual layers and zero-area layers return `false`.
    pub fn render(
        &mut self,
        movie_time: f64,
        canvas: Canvas,
        cache: &mut ValueCache,
    ) -> LaminaResult<bool> {
        if !self.enabled || !self.is_active_at(movie_time) {
            return Ok(false);
        }
        let local = movie_time - self.start_time();
        let Some(visual) = self.visual.as_mut() else {
            return Ok(false);
        };
        if !visual.render(self.id, local, canvas, cache)? {
            return Ok(false);
        }
        trace!(layer = %self.id, local, "apply layer effects");
        self.effects.apply(visual.surface_mut(), local, cache)?;
        Ok(true)
    }

    /// Keep the media in step with a playing movie.
    pub(crate) fn sync_media(&mut self, movie_time: f64, playing: bool) {
        let enabled = self.enabled;
        if let Some(audio) = self.audio.as_mut() {
            audio.sync(movie_time, playing && enabled);
        }
    }

    pub(crate) fn require_attached_to(&self, movie: MovieId) -> LaminaResult<()> {
        match self.movie() {
            Some(m) if m == movie => Ok(()),
            _ => Err(LaminaError::invalid_state(format!(
                "layer {} is not attached to {movie}",
                self.id
            ))),
        }
    }
}

impl Attachable for Layer {
    type Parent = MovieId;
    type Context<'a> = MovieCtx<'a>;

    fn attachment(&self) -> &Attachment<MovieId> {
        &self.attachment
    }

    fn attachment_mut(&mut self) -> &mut Attachment<MovieId> {
        &mut self.attachment
    }

    fn attach(&mut self, ctx: &mut MovieCtx<'_>) -> LaminaResult<()> {
        let movie = ctx.movie();
        debug!(layer = %self.id, %movie, kind = ?self.kind, "layer attach");
        if let Some(audio) = self.audio.as_mut() {
            audio.attach(ctx)?;
        }
        ctx.bus().publish(
            self.id,
            topics::LAYER_ATTACH,
            &MovieEvent::LayerAttached { movie },
        );
        Ok(())
    }

    fn detach(&mut self, ctx: &mut MovieCtx<'_>) -> LaminaResult<()> {
        let movie = ctx.movie();
        debug!(layer = %self.id, %movie, "layer detach");
        if let Some(audio) = self.audio.as_mut() {
            audio.detach(ctx)?;
        }
        ctx.bus().publish(
            self.id,
            topics::LAYER_DETACH,
            &MovieEvent::LayerDetached { movie },
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/base.rs"]
mod tests;
