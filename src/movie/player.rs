//! The movie: layer list, transport clock, render loop and offline outputs.
//!
//! A movie owns everything scoped to one composition: its layers, its own effect chain, the
//! event bus that layers and hosts subscribe to, the value cache, and a handle to the shared
//! audio graph. Layers refer back to it only through its [`MovieId`].
//!
//! The host drives time. Either call [`Movie::render`] for arbitrary times, or call
//! [`Movie::play`] and then feed wall-clock timestamps to [`Movie::tick`] (or deltas to
//! [`Movie::advance`]) from an animation callback.

use tracing::{debug, trace, warn};

use crate::animation::dynamic::Dynamic;
use crate::audio::context::{OfflineAudioContext, SharedAudioContext};
use crate::audio::mix::{AudioManifest, AudioSegment, mix_manifest, secs_to_sample};
use crate::cache::values::{CacheStats, ValueCache};
use crate::effects::chain::{EffectChain, EffectParent, EffectSlot};
use crate::event::bus::{Event, EventBus};
use crate::event::topics::{self, MovieEvent};
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{LaminaError, LaminaResult};
use crate::foundation::ids::{EffectId, LayerId, MovieId, ObjectId, SubscriptionId};
use crate::layer::base::Layer;
use crate::lifecycle::attach::Attachable;
use crate::movie::config::MovieConfig;
use crate::movie::context::MovieCtx;
use crate::movie::transport::{Playback, PlaybackOutcome};
use crate::render::fill::Fill;
use crate::render::surface::Surface;

/// Output channel count of [`Movie::mix_audio`].
pub const MIX_CHANNELS: u16 = 2;

/// A timeline of layers composited onto one canvas and played against one clock.
pub struct Movie {
    id: MovieId,
    size: Canvas,
    canvas: Surface,
    background: Option<Dynamic<Fill>>,
    layers: Vec<Layer>,
    effects: EffectChain,
    bus: EventBus<MovieEvent>,
    audio: SharedAudioContext,
    cache: ValueCache,
    current_time: f64,
    duration: Option<f64>,
    paused: bool,
    ended: bool,
    repeat: bool,
    playback_rate: f64,
    auto_refresh: bool,
    playback: Option<Playback>,
    last_tick: Option<f64>,
}

impl std::fmt::Debug for Movie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Movie")
            .field("id", &self.id)
            .field("size", &self.size)
            .field("layers", &self.layers.len())
            .field("effects", &self.effects.len())
            .field("current_time", &self.current_time)
            .field("duration", &self.duration())
            .field("paused", &self.paused)
            .field("ended", &self.ended)
            .field("repeat", &self.repeat)
            .field("playback_rate", &self.playback_rate)
            .finish()
    }
}

impl Movie {
    /// Movie with its own offline audio graph.
    pub fn new(config: MovieConfig) -> LaminaResult<Self> {
        Self::with_audio_context(config, OfflineAudioContext::default().shared())
    }

    /// Movie whose audio layers connect into `audio`.
    pub fn with_audio_context(
        config: MovieConfig,
        audio: SharedAudioContext,
    ) -> LaminaResult<Self> {
        config.validate()?;
        let id = MovieId::next();
        debug!(movie = %id, width = config.width, height = config.height, "movie created");
        Ok(Self {
            id,
            size: Canvas {
                width: config.width,
                height: config.height,
            },
            canvas: Surface::new(config.width, config.height),
            background: config.background.map(Dynamic::from),
            layers: Vec::new(),
            effects: EffectChain::new(EffectParent::Movie(id)),
            bus: EventBus::new(),
            audio,
            cache: ValueCache::new(),
            current_time: 0.0,
            duration: config.duration,
            paused: true,
            ended: false,
            repeat: config.repeat,
            playback_rate: config.playback_rate,
            auto_refresh: config.auto_refresh,
            playback: None,
            last_tick: None,
        })
    }

    /// Stable id, also the event target for `movie.*` topics.
    pub fn id(&self) -> MovieId {
        self.id
    }

    /// Canvas size.
    pub fn size(&self) -> Canvas {
        self.size
    }

    /// Change the canvas size; layers without explicit sizes follow.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = Canvas { width, height };
        self.modified("size");
    }

    /// Background paint, if any.
    pub fn background(&self) -> Option<&Dynamic<Fill>> {
        self.background.as_ref()
    }

    /// Replace the background paint.
    pub fn set_background(&mut self, background: Option<Dynamic<Fill>>) {
        self.background = background;
        self.modified("background");
    }

    /// Transport position in seconds.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Explicit duration, or the latest finite layer end (0 without layers).
    pub fn duration(&self) -> f64 {
        self.duration.unwrap_or_else(|| {
            self.layers
                .iter()
                .map(Layer::end_time)
                .filter(|t| t.is_finite())
                .fold(0.0, f64::max)
        })
    }

    /// Fix or release the duration.
    pub fn set_duration(&mut self, duration: Option<f64>) -> LaminaResult<()> {
        if let Some(d) = duration
            && (!d.is_finite() || d < 0.0)
        {
            return Err(LaminaError::configuration(format!(
                "duration must be finite and >= 0, got {d}"
            )));
        }
        self.duration = duration;
        self.modified("duration");
        Ok(())
    }

    /// Return `true` unless playing.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Return `true` while the clock runs.
    pub fn is_playing(&self) -> bool {
        !self.paused
    }

    /// Return `true` after the end was reached without repeat.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Whether the movie wraps at its end.
    pub fn repeat(&self) -> bool {
        self.repeat
    }

    /// Wrap at the end instead of stopping.
    pub fn set_repeat(&mut self, repeat: bool) {
        self.repeat = repeat;
        self.modified("repeat");
    }

    /// Movie seconds per host-clock second.
    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    /// Change the clock speed.
    pub fn set_playback_rate(&mut self, rate: f64) -> LaminaResult<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(LaminaError::configuration(format!(
                "playbackRate must be finite and > 0, got {rate}"
            )));
        }
        self.playback_rate = rate;
        self.modified("playbackRate");
        Ok(())
    }

    /// Shared audio graph.
    pub fn audio_context(&self) -> &SharedAudioContext {
        &self.audio
    }

    /// Canvas from the last render.
    pub fn surface(&self) -> &Surface {
        &self.canvas
    }

    /// Value cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop every memoized value.
    pub fn clear_cached_values(&mut self) {
        self.cache.clear();
    }

    /// Context for attaching a layer to this movie by hand.
    pub fn attach_context(&mut self) -> MovieCtx<'_> {
        MovieCtx::new(
            self.id,
            self.current_time,
            !self.paused,
            &mut self.bus,
            &self.audio,
        )
    }

    // ---- layers ----

    /// Layers in compositing order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layer by id.
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id() == id)
    }

    /// Layer by id, mutably.
    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id() == id)
    }

    /// Position of a layer in the list.
    pub fn layer_index(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id() == id)
    }

    /// Attach `layer` and put it on top.
    pub fn push_layer(&mut self, layer: Layer) -> LaminaResult<LayerId> {
        let index = self.layers.len();
        self.insert_layer(index, layer)
    }

    /// Attach `layer` and insert it at `index`.
    pub fn insert_layer(&mut self, index: usize, mut layer: Layer) -> LaminaResult<LayerId> {
        if index > self.layers.len() {
            return Err(LaminaError::invalid_state(format!(
                "layer index {index} out of range (len {})",
                self.layers.len()
            )));
        }
        layer.try_attach(&mut MovieCtx::new(
            self.id,
            self.current_time,
            !self.paused,
            &mut self.bus,
            &self.audio,
        ))?;
        let id = layer.id();
        self.layers.insert(index, layer);
        self.publish_change(
            topics::MOVIE_CHANGE_LAYER_ADD,
            MovieEvent::LayerAdded { layer: id, index },
        );
        Ok(id)
    }

    /// Detach and remove a layer, handing it back to the caller.
    pub fn remove_layer(&mut self, id: LayerId) -> LaminaResult<Layer> {
        let index = self.require_layer_index(id)?;
        self.layers[index].try_detach(&mut MovieCtx::new(
            self.id,
            self.current_time,
            !self.paused,
            &mut self.bus,
            &self.audio,
        ))?;
        let layer = self.layers.remove(index);
        self.publish_change(
            topics::MOVIE_CHANGE_LAYER_REMOVE,
            MovieEvent::LayerRemoved { layer: id, index },
        );
        Ok(layer)
    }

    /// Replace `delete_count` layers starting at `start` with `insert`.
    ///
    /// New layers attach before old ones detach. If any step fails, every completed step is
    /// undone and the list is left untouched.
    pub fn splice_layers(
        &mut self,
        start: usize,
        delete_count: usize,
        mut insert: Vec<Layer>,
    ) -> LaminaResult<Vec<Layer>> {
        let end = start
            .checked_add(delete_count)
            .filter(|end| *end <= self.layers.len())
            .ok_or_else(|| {
                LaminaError::invalid_state(format!(
                    "splice {start}..+{delete_count} out of range (len {})",
                    self.layers.len()
                ))
            })?;

        let mut ctx = MovieCtx::new(
            self.id,
            self.current_time,
            !self.paused,
            &mut self.bus,
            &self.audio,
        );

        for i in 0..insert.len() {
            if let Err(e) = insert[i].try_attach(&mut ctx) {
                for done in &mut insert[..i] {
                    if let Err(undo) = done.try_detach(&mut ctx) {
                        warn!(layer = %done.id(), error = %undo, "splice rollback detach failed");
                    }
                }
                return Err(e);
            }
        }

        for i in start..end {
            if let Err(e) = self.layers[i].try_detach(&mut ctx) {
                for done in &mut self.layers[start..i] {
                    if let Err(undo) = done.try_attach(&mut ctx) {
                        warn!(layer = %done.id(), error = %undo, "splice rollback attach failed");
                    }
                }
                for added in &mut insert {
                    if let Err(undo) = added.try_detach(&mut ctx) {
                        warn!(layer = %added.id(), error = %undo, "splice rollback detach failed");
                    }
                }
                return Err(e);
            }
        }

        let added: Vec<LayerId> = insert.iter().map(Layer::id).collect();
        let removed: Vec<Layer> = self.layers.splice(start..end, insert).collect();
        for (offset, layer) in removed.iter().enumerate() {
            self.publish_change(
                topics::MOVIE_CHANGE_LAYER_REMOVE,
                MovieEvent::LayerRemoved {
                    layer: layer.id(),
                    index: start + offset,
                },
            );
        }
        for (offset, id) in added.into_iter().enumerate() {
            self.publish_change(
                topics::MOVIE_CHANGE_LAYER_ADD,
                MovieEvent::LayerAdded {
                    layer: id,
                    index: start + offset,
                },
            );
        }
        Ok(removed)
    }

    fn require_layer_index(&self, id: LayerId) -> LaminaResult<usize> {
        self.layer_index(id)
            .ok_or_else(|| LaminaError::invalid_state(format!("{id} is not in {}", self.id)))
    }

    // ---- effects ----

    /// Effect chain applied to the composited canvas.
    pub fn effects(&self) -> &EffectChain {
        &self.effects
    }

    /// Movie effect chain, mutably.
    pub fn effects_mut(&mut self) -> &mut EffectChain {
        &mut self.effects
    }

    /// Attach `slot` to the movie chain.
    pub fn add_effect(&mut self, slot: EffectSlot) -> LaminaResult<EffectId> {
        let effect = self.effects.push(slot)?;
        self.effect_added(EffectParent::Movie(self.id), effect);
        Ok(effect)
    }

    /// Detach and remove an effect from the movie chain.
    pub fn remove_effect(&mut self, id: EffectId) -> LaminaResult<EffectSlot> {
        let slot = self.effects.remove(id)?;
        self.effect_removed(EffectParent::Movie(self.id), id);
        Ok(slot)
    }

    /// Detach an effect from the movie chain, leaving its slot empty.
    pub fn delete_effect(&mut self, id: EffectId) -> LaminaResult<EffectSlot> {
        let slot = self.effects.delete(id)?;
        self.effect_removed(EffectParent::Movie(self.id), id);
        Ok(slot)
    }

    /// Attach `slot` to a layer of this movie.
    pub fn add_layer_effect(&mut self, layer: LayerId, slot: EffectSlot) -> LaminaResult<EffectId> {
        let effect = self.attached_layer_mut(layer)?.add_effect(slot)?;
        self.effect_added(EffectParent::Layer(layer), effect);
        Ok(effect)
    }

    /// Detach and remove an effect from a layer of this movie.
    pub fn remove_layer_effect(
        &mut self,
        layer: LayerId,
        effect: EffectId,
    ) -> LaminaResult<EffectSlot> {
        let slot = self.attached_layer_mut(layer)?.remove_effect(effect)?;
        self.effect_removed(EffectParent::Layer(layer), effect);
        Ok(slot)
    }

    /// Detach an effect from a layer of this movie, leaving its slot empty.
    pub fn delete_layer_effect(
        &mut self,
        layer: LayerId,
        effect: EffectId,
    ) -> LaminaResult<EffectSlot> {
        let slot = self.attached_layer_mut(layer)?.delete_effect(effect)?;
        self.effect_removed(EffectParent::Layer(layer), effect);
        Ok(slot)
    }

    fn attached_layer_mut(&mut self, id: LayerId) -> LaminaResult<&mut Layer> {
        let movie = self.id;
        let index = self.require_layer_index(id)?;
        let layer = &mut self.layers[index];
        layer.require_attached_to(movie)?;
        Ok(layer)
    }

    fn effect_added(&mut self, parent: EffectParent, effect: EffectId) {
        self.publish_change(
            topics::MOVIE_CHANGE_EFFECT_ADD,
            MovieEvent::EffectAdded { parent, effect },
        );
    }

    fn effect_removed(&mut self, parent: EffectParent, effect: EffectId) {
        self.publish_change(
            topics::MOVIE_CHANGE_EFFECT_REMOVE,
            MovieEvent::EffectRemoved { parent, effect },
        );
    }

    // ---- transport ----

    /// Start or resume playback.
    ///
    /// Returns the pending operation; while already playing this is the same operation as
    /// before. An ended movie restarts from 0.
    pub fn play(&mut self) -> Playback {
        if let Some(op) = self.playback.as_ref().filter(|op| op.is_pending())
            && !self.paused
        {
            return op.clone();
        }
        if self.ended {
            self.ended = false;
            self.current_time = 0.0;
            self.publish(topics::MOVIE_SEEK, &MovieEvent::Seek { time: 0.0 });
        }
        let op = match self.playback.as_ref().filter(|op| op.is_pending()) {
            Some(op) => op.clone(),
            None => {
                let op = Playback::pending();
                self.playback = Some(op.clone());
                op
            }
        };
        self.paused = false;
        self.last_tick = None;
        debug!(movie = %self.id, time = self.current_time, "play");
        let time = self.current_time;
        self.publish(topics::MOVIE_PLAY, &MovieEvent::Play { time });
        self.sync_media();
        op
    }

    /// Stop the clock. The playback operation stays pending.
    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
        self.last_tick = None;
        debug!(movie = %self.id, time = self.current_time, "pause");
        let time = self.current_time;
        self.publish(topics::MOVIE_PAUSE, &MovieEvent::Pause { time });
        self.sync_media();
    }

    /// Pause, resolve the pending playback as stopped and rewind to 0.
    pub fn stop(&mut self) -> LaminaResult<()> {
        self.pause();
        if let Some(op) = self.playback.take() {
            op.resolve(PlaybackOutcome::Stopped);
        }
        self.ended = false;
        debug!(movie = %self.id, "stop");
        self.publish(topics::MOVIE_STOP, &MovieEvent::Stop);
        self.seek(0.0)
    }

    /// Jump to `time`, which must lie in `[0, duration]`.
    pub fn seek(&mut self, time: f64) -> LaminaResult<()> {
        let duration = self.duration();
        if !time.is_finite() || time < 0.0 || time > duration {
            return Err(LaminaError::invalid_state(format!(
                "seek time {time} outside [0, {duration}]"
            )));
        }
        self.current_time = time;
        self.ended = false;
        self.publish(topics::MOVIE_SEEK, &MovieEvent::Seek { time });
        if self.paused && self.auto_refresh {
            self.refresh()?;
        }
        Ok(())
    }

    /// Re-render the frame at the current time.
    pub fn refresh(&mut self) -> LaminaResult<()> {
        self.render(self.current_time).map(|_| ())
    }

    /// Host clock hook taking an absolute timestamp in seconds.
    ///
    /// The first tick after `play` only records the timestamp.
    pub fn tick(&mut self, now: f64) -> LaminaResult<()> {
        if self.paused {
            self.last_tick = None;
            return Ok(());
        }
        let dt = match self.last_tick {
            Some(prev) => (now - prev).max(0.0),
            None => 0.0,
        };
        self.last_tick = Some(now);
        self.advance(dt)
    }

    /// Host clock hook taking elapsed host seconds.
    pub fn advance(&mut self, dt: f64) -> LaminaResult<()> {
        if self.paused {
            return Ok(());
        }
        if !dt.is_finite() || dt < 0.0 {
            return Err(LaminaError::invalid_state(format!(
                "clock step must be finite and >= 0, got {dt}"
            )));
        }
        let duration = self.duration();
        let mut time = self.current_time + dt * self.playback_rate;
        if time >= duration {
            if self.repeat && duration > 0.0 {
                time %= duration;
                trace!(movie = %self.id, time, "wrap");
                self.current_time = time;
                self.publish(topics::MOVIE_SEEK, &MovieEvent::Seek { time });
            } else {
                self.finish(duration);
                return Ok(());
            }
        }
        self.current_time = time;
        self.render(time)?;
        self.publish(topics::MOVIE_TIMEUPDATE, &MovieEvent::TimeUpdate { time });
        Ok(())
    }

    fn finish(&mut self, duration: f64) {
        self.current_time = duration;
        self.paused = true;
        self.ended = true;
        self.last_tick = None;
        debug!(movie = %self.id, duration, "ended");
        self.publish(topics::MOVIE_PAUSE, &MovieEvent::Pause { time: duration });
        self.publish(topics::MOVIE_ENDED, &MovieEvent::Ended { time: duration });
        self.sync_media();
        if let Some(op) = self.playback.take() {
            op.resolve(PlaybackOutcome::Ended);
        }
    }

    fn sync_media(&mut self) {
        let (time, playing) = (self.current_time, !self.paused);
        for layer in &mut self.layers {
            layer.sync_media(time, playing);
        }
    }

    // ---- rendering ----

    /// Composite every active layer at `time`, apply the movie effects and clear the cache.
    #[tracing::instrument(level = "trace", skip(self), fields(movie = %self.id))]
    pub fn render(&mut self, time: f64) -> LaminaResult<&Surface> {
        let result = self.render_frame(time);
        self.cache.clear();
        result?;
        Ok(&self.canvas)
    }

    fn render_frame(&mut self, time: f64) -> LaminaResult<()> {
        let size = self.size;
        self.canvas.resize(size.width, size.height);
        if size.is_empty() {
            trace!("zero-size canvas, nothing to draw");
            return Ok(());
        }
        if let Some(bg) = &self.background {
            let fill = bg.eval(&mut self.cache, self.id, "background", time);
            self.canvas.fill(&fill);
        }

        let playing = !self.paused;
        for layer in &mut self.layers {
            layer.sync_media(time, playing);
            if !layer.render(time, size, &mut self.cache)? {
                continue;
            }
            let Some(visual) = layer.as_visual() else {
                continue;
            };
            let local = time - layer.start_time();
            let at = visual.position_at(layer.id(), local, &mut self.cache);
            let opacity = visual.opacity_at(layer.id(), local, &mut self.cache);
            self.canvas.composite(visual.surface(), at, opacity)?;
        }

        self.effects.apply(&mut self.canvas, time, &mut self.cache)
    }

    /// Render every frame of the movie at `fps`, handing each to `sink`. Returns the frame
    /// count. The transport is left untouched.
    pub fn render_sequence<F>(&mut self, fps: Fps, mut sink: F) -> LaminaResult<u64>
    where
        F: FnMut(u64, &Surface) -> LaminaResult<()>,
    {
        let duration = self.duration();
        let frames = fps.secs_to_frames_ceil(duration);
        debug!(movie = %self.id, frames, fps = fps.as_f64(), "render sequence");
        for frame in 0..frames {
            let surface = self.render(fps.frames_to_secs(frame))?;
            sink(frame, surface)?;
        }
        Ok(frames)
    }

    /// Mix the PCM of attached, enabled, unmuted audio layers over `[start, end)` into
    /// interleaved stereo at the audio graph's sample rate.
    pub fn mix_audio(&self, start: f64, end: f64) -> LaminaResult<Vec<f32>> {
        if !start.is_finite() || !end.is_finite() || start < 0.0 || end < start {
            return Err(LaminaError::invalid_state(format!(
                "mix range [{start}, {end}) is invalid"
            )));
        }
        let sample_rate = self.audio.borrow().sample_rate();
        let mut segments = Vec::new();
        for layer in &self.layers {
            let Some(audio) = layer.as_audio() else {
                continue;
            };
            if !layer.enabled() || audio.muted() || !audio.is_connected() {
                continue;
            }
            let from = layer.start_time().max(start);
            let to = layer.end_time().min(end);
            if to <= from {
                continue;
            }
            let media = audio.media();
            let Some(pcm) = media.borrow().pcm() else {
                trace!(layer = %layer.id(), "media has no pcm, skipping in mix");
                continue;
            };
            segments.push(AudioSegment {
                timeline_start_sample: secs_to_sample(from - start, sample_rate),
                timeline_end_sample: secs_to_sample(to - start, sample_rate),
                source_start_sec: audio.source_time_for(from),
                playback_rate: audio.playback_rate(),
                volume: audio.volume() as f32,
                source: pcm,
            });
        }
        let manifest = AudioManifest {
            sample_rate,
            channels: MIX_CHANNELS,
            total_samples: secs_to_sample(end - start, sample_rate),
            segments,
        };
        Ok(mix_manifest(&manifest))
    }

    // ---- events ----

    /// Subscribe to a topic on this movie.
    pub fn subscribe<F>(&mut self, topic: &str, handler: F) -> LaminaResult<SubscriptionId>
    where
        F: FnMut(&Event<'_, MovieEvent>) + 'static,
    {
        self.bus.subscribe(self.id, topic, handler)
    }

    /// Subscribe to a topic on any target (a layer id, for `layer.*` topics).
    pub fn subscribe_target<F>(
        &mut self,
        target: impl Into<ObjectId>,
        topic: &str,
        handler: F,
    ) -> LaminaResult<SubscriptionId>
    where
        F: FnMut(&Event<'_, MovieEvent>) + 'static,
    {
        self.bus.subscribe(target, topic, handler)
    }

    /// Drop a subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Publish on this movie. Returns the number of handlers notified.
    pub fn publish(&mut self, topic: &str, payload: &MovieEvent) -> usize {
        trace!(movie = %self.id, topic, "publish");
        self.bus.publish(self.id, topic, payload)
    }

    fn publish_change(&mut self, topic: &str, payload: MovieEvent) {
        self.cache.clear();
        self.publish(topic, &payload);
    }

    fn modified(&mut self, property: &'static str) {
        self.publish_change(topics::MOVIE_CHANGE_MODIFY, MovieEvent::Modified { property });
    }
}

impl Drop for Movie {
    fn drop(&mut self) {
        if let Some(op) = self.playback.take() {
            op.resolve(PlaybackOutcome::Stopped);
        }
        let mut ctx = MovieCtx::new(
            self.id,
            self.current_time,
            false,
            &mut self.bus,
            &self.audio,
        );
        for layer in &mut self.layers {
            if layer.movie().is_some()
                && let Err(e) = layer.try_detach(&mut ctx)
            {
                warn!(layer = %layer.id(), error = %e, "detach on drop failed");
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/movie/player.rs"]
mod tests;
