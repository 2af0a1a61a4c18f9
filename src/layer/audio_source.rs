//! Audio-source capability shared by audio and video layers.
//!
//! The capability owns one audio graph node per graph: it is created on the first attach to a
//! graph, connected to the movie destination on every attach and only disconnected on detach.
//! Moving the layer to a movie with a different graph creates a fresh node there.
//! While attached it follows the movie transport through `movie.seek`, `movie.play` and
//! `movie.pause` handlers registered on the movie target.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

use crate::assets::media::SharedMedia;
use crate::audio::context::{AudioContext, SharedAudioContext};
use crate::event::bus::Event;
use crate::event::topics::{self, MovieEvent};
use crate::foundation::error::LaminaResult;
use crate::foundation::ids::{AudioNodeId, SubscriptionId};
use crate::layer::base::LayerTiming;
use crate::layer::options::{check_duration, check_playback_rate};
use crate::movie::context::MovieCtx;

pub(crate) type SharedAudioState = Rc<RefCell<AudioState>>;

/// Node id plus the graph it lives in. Ids are only unique within one graph.
struct GraphNode {
    id: AudioNodeId,
    graph: Weak<RefCell<dyn AudioContext>>,
}

impl GraphNode {
    fn belongs_to(&self, graph: &SharedAudioContext) -> bool {
        self.graph
            .upgrade()
            .is_some_and(|g| Rc::ptr_eq(&g, graph))
    }
}

/// State shared between the layer and its bus handlers.
pub(crate) struct AudioState {
    media: SharedMedia,
    timing: Rc<Cell<LayerTiming>>,
    node: Option<GraphNode>,
    connected: bool,
    subscriptions: Vec<SubscriptionId>,
    source_start_time: f64,
    playback_rate: f64,
    volume: f64,
    muted: bool,
    current_time: f64,
}

impl AudioState {
    pub(crate) fn media(&self) -> SharedMedia {
        Rc::clone(&self.media)
    }

    /// Media position for a layer-local time.
    pub(crate) fn source_time_at(&self, local: f64) -> f64 {
        local.max(0.0) * self.playback_rate + self.source_start_time
    }

    fn raw_duration(&self) -> f64 {
        match self.timing.get().duration {
            Some(d) => d,
            None => (self.media.borrow().duration() - self.source_start_time).max(0.0),
        }
    }

    fn duration(&self) -> f64 {
        self.raw_duration() / self.playback_rate
    }

    fn is_active_at(&self, movie_time: f64) -> bool {
        let start = self.timing.get().start_time;
        movie_time >= start && movie_time < start + self.duration()
    }

    fn seek(&mut self, movie_time: f64) {
        let local = movie_time - self.timing.get().start_time;
        self.current_time = self.source_time_at(local);
        self.media.borrow_mut().set_current_time(self.current_time);
        trace!(movie_time, source_time = self.current_time, "audio seek");
    }

    fn start(&mut self, movie_time: f64) {
        self.seek(movie_time);
        let mut media = self.media.borrow_mut();
        media.set_playback_rate(self.playback_rate);
        if let Err(e) = media.play() {
            warn!(error = %e, "media refused to play");
        }
    }

    fn on_transport(&mut self, ev: &Event<'_, MovieEvent>) {
        match ev.payload {
            MovieEvent::Seek { time } => self.seek(*time),
            MovieEvent::Play { time } => {
                if self.is_active_at(*time) {
                    self.start(*time);
                }
            }
            MovieEvent::Pause { .. } => self.media.borrow_mut().pause(),
            _ => {}
        }
    }
}

/// Audio capability of a layer. See the module docs for the wiring rules.
pub struct AudioSource {
    state: SharedAudioState,
}

impl std::fmt::Debug for AudioSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self.state.borrow();
        f.debug_struct("AudioSource")
            .field("node", &s.node.as_ref().map(|n| n.id))
            .field("connected", &s.connected)
            .field("source_start_time", &s.source_start_time)
            .field("playback_rate", &s.playback_rate)
            .field("current_time", &s.current_time)
            .finish()
    }
}

impl AudioSource {
    pub(crate) fn new(
        media: SharedMedia,
        timing: Rc<Cell<LayerTiming>>,
        source_start_time: f64,
        playback_rate: f64,
        volume: f64,
        muted: bool,
    ) -> Self {
        Self {
            state: Rc::new(RefCell::new(AudioState {
                media,
                timing,
                node: None,
                connected: false,
                subscriptions: Vec::new(),
                source_start_time,
                playback_rate,
                volume,
                muted,
                current_time: source_start_time,
            })),
        }
    }

    pub(crate) fn shared_state(&self) -> SharedAudioState {
        Rc::clone(&self.state)
    }

    /// Host media element.
    pub fn media(&self) -> SharedMedia {
        self.state.borrow().media()
    }

    /// Node in the graph of the last movie this source attached to.
    pub fn node(&self) -> Option<AudioNodeId> {
        self.state.borrow().node.as_ref().map(|n| n.id)
    }

    /// Return `true` while the node feeds the movie destination.
    pub fn is_connected(&self) -> bool {
        self.state.borrow().connected
    }

    /// Media position that lines up with the layer start.
    pub fn source_start_time(&self) -> f64 {
        self.state.borrow().source_start_time
    }

    /// Media seconds per movie second.
    pub fn playback_rate(&self) -> f64 {
        self.state.borrow().playback_rate
    }

    /// Change the rate; the reported duration and a playing media element follow at once.
    pub fn set_playback_rate(&mut self, rate: f64) -> LaminaResult<()> {
        check_playback_rate(rate)?;
        let mut s = self.state.borrow_mut();
        s.playback_rate = rate;
        s.media.borrow_mut().set_playback_rate(rate);
        Ok(())
    }

    /// Source seconds covered: the explicit duration or the media tail after the source start.
    pub fn raw_duration(&self) -> f64 {
        self.state.borrow().raw_duration()
    }

    /// Movie seconds covered, `raw_duration / playback_rate`.
    pub fn duration(&self) -> f64 {
        self.state.borrow().duration()
    }

    pub(crate) fn set_raw_duration(&mut self, duration: Option<f64>) -> LaminaResult<()> {
        check_duration(duration)?;
        let s = self.state.borrow();
        let mut t = s.timing.get();
        t.duration = duration;
        s.timing.set(t);
        Ok(())
    }

    /// Media position last applied by a seek or a render.
    pub fn current_time(&self) -> f64 {
        self.state.borrow().current_time
    }

    /// Media position for a movie time.
    pub fn source_time_for(&self, movie_time: f64) -> f64 {
        let s = self.state.borrow();
        s.source_time_at(movie_time - s.timing.get().start_time)
    }

    /// Mixer gain.
    pub fn volume(&self) -> f64 {
        self.state.borrow().volume
    }

    /// Set the mixer gain.
    pub fn set_volume(&mut self, volume: f64) {
        self.state.borrow_mut().volume = volume.max(0.0);
    }

    /// Return `true` when excluded from the mix.
    pub fn muted(&self) -> bool {
        self.state.borrow().muted
    }

    /// Mute or unmute.
    pub fn set_muted(&mut self, muted: bool) {
        self.state.borrow_mut().muted = muted;
    }

    pub(crate) fn attach(&mut self, ctx: &mut MovieCtx<'_>) -> LaminaResult<()> {
        let node = self.ensure_node(ctx)?;
        let dest = ctx.audio().borrow().destination();
        ctx.audio().borrow_mut().connect(node, dest)?;

        let movie = ctx.movie();
        let mut subs = Vec::with_capacity(3);
        for topic in [topics::MOVIE_SEEK, topics::MOVIE_PLAY, topics::MOVIE_PAUSE] {
            let state = Rc::clone(&self.state);
            let sub = ctx
                .bus()
                .subscribe(movie, topic, move |ev| state.borrow_mut().on_transport(ev));
            match sub {
                Ok(id) => subs.push(id),
                Err(e) => {
                    for id in subs.drain(..) {
                        ctx.bus().unsubscribe(id);
                    }
                    ctx.audio().borrow_mut().disconnect(node)?;
                    return Err(e);
                }
            }
        }

        let mut s = self.state.borrow_mut();
        s.subscriptions = subs;
        s.connected = true;
        s.seek(ctx.time());
        debug!(node = %node, %movie, "audio source connected");
        Ok(())
    }

    pub(crate) fn detach(&mut self, ctx: &mut MovieCtx<'_>) -> LaminaResult<()> {
        let (node, subs) = {
            let mut s = self.state.borrow_mut();
            (
                s.node.as_ref().map(|n| n.id),
                std::mem::take(&mut s.subscriptions),
            )
        };
        for id in subs {
            ctx.bus().unsubscribe(id);
        }
        if let Some(node) = node {
            ctx.audio().borrow_mut().disconnect(node)?;
        }
        let mut s = self.state.borrow_mut();
        s.connected = false;
        s.media.borrow_mut().pause();
        debug!(?node, movie = %ctx.movie(), "audio source disconnected");
        Ok(())
    }

    /// Start or pause the media as a playing movie enters or leaves the layer window.
    pub(crate) fn sync(&mut self, movie_time: f64, playing: bool) {
        let mut s = self.state.borrow_mut();
        if !s.connected {
            return;
        }
        let active = playing && s.is_active_at(movie_time);
        let paused = s.media.borrow().is_paused();
        if active && paused {
            s.start(movie_time);
        } else if !active && !paused {
            s.media.borrow_mut().pause();
        } else if active {
            let local = movie_time - s.timing.get().start_time;
            s.current_time = s.source_time_at(local);
        }
    }

    fn ensure_node(&mut self, ctx: &mut MovieCtx<'_>) -> LaminaResult<AudioNodeId> {
        if let Some(node) = self.state.borrow().node.as_ref()
            && node.belongs_to(ctx.audio())
        {
            return Ok(node.id);
        }
        let media = self.media();
        let id = ctx.audio().borrow_mut().create_media_source(media)?;
        trace!(node = %id, "created media source node");
        self.state.borrow_mut().node = Some(GraphNode {
            id,
            graph: Rc::downgrade(ctx.audio()),
        });
        Ok(id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/audio_source.rs"]
mod tests;
