//! Context a movie lends to layers while they attach and detach.

use crate::audio::context::SharedAudioContext;
use crate::event::bus::EventBus;
use crate::event::topics::MovieEvent;
use crate::foundation::ids::MovieId;
use crate::lifecycle::attach::AttachContext;

/// Attach context a movie lends to its layers.
///
/// Borrowing the bus mutably is what lets a layer register transport handlers during attach
/// and drop them during detach.
pub struct MovieCtx<'a> {
    movie: MovieId,
    time: f64,
    playing: bool,
    bus: &'a mut EventBus<MovieEvent>,
    audio: &'a SharedAudioContext,
}

impl<'a> MovieCtx<'a> {
    pub(crate) fn new(
        movie: MovieId,
        time: f64,
        playing: bool,
        bus: &'a mut EventBus<MovieEvent>,
        audio: &'a SharedAudioContext,
    ) -> Self {
        Self {
            movie,
            time,
            playing,
            bus,
            audio,
        }
    }

    /// Movie being attached to.
    pub fn movie(&self) -> MovieId {
        self.movie
    }

    /// Movie transport time.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Return `true` while the movie is playing.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Movie event bus.
    pub fn bus(&mut self) -> &mut EventBus<MovieEvent> {
        self.bus
    }

    /// Movie audio graph.
    pub fn audio(&self) -> &SharedAudioContext {
        self.audio
    }
}

impl AttachContext for MovieCtx<'_> {
    type Parent = MovieId;

    fn parent(&self) -> MovieId {
        self.movie
    }
}
