use crate::effects::chain::EffectParent;
use crate::foundation::ids::{EffectId, LayerId, MovieId};

/// Playback started or resumed.
pub const MOVIE_PLAY: &str = "movie.play";
/// Playback paused (also published when the movie reaches its end).
pub const MOVIE_PAUSE: &str = "movie.pause";
/// Playback stopped and rewound.
pub const MOVIE_STOP: &str = "movie.stop";
/// Transport position changed discontinuously.
pub const MOVIE_SEEK: &str = "movie.seek";
/// Transport advanced by one clock step.
pub const MOVIE_TIMEUPDATE: &str = "movie.timeupdate";
/// End reached without repeat.
pub const MOVIE_ENDED: &str = "movie.ended";
/// Parent of every structural change topic.
pub const MOVIE_CHANGE: &str = "movie.change";
/// A layer was inserted into the movie.
pub const MOVIE_CHANGE_LAYER_ADD: &str = "movie.change.layer.add";
/// A layer was removed from the movie.
pub const MOVIE_CHANGE_LAYER_REMOVE: &str = "movie.change.layer.remove";
/// An effect was added to the movie or one of its layers.
pub const MOVIE_CHANGE_EFFECT_ADD: &str = "movie.change.effect.add";
/// An effect was removed from the movie or one of its layers.
pub const MOVIE_CHANGE_EFFECT_REMOVE: &str = "movie.change.effect.remove";
/// A movie-level property changed.
pub const MOVIE_CHANGE_MODIFY: &str = "movie.change.modify";
/// Published on the layer target after it attached to a movie.
pub const LAYER_ATTACH: &str = "layer.attach";
/// Published on the layer target after it detached from a movie.
pub const LAYER_DETACH: &str = "layer.detach";

/// Payload carried by movie and layer topics.
#[derive(Clone, Debug, PartialEq)]
pub enum MovieEvent {
    /// See [`MOVIE_PLAY`].
    Play {
        /// Transport time at which playback started.
        time: f64,
    },
    /// See [`MOVIE_PAUSE`].
    Pause {
        /// Transport time at which playback paused.
        time: f64,
    },
    /// See [`MOVIE_STOP`].
    Stop,
    /// See [`MOVIE_SEEK`].
    Seek {
        /// New transport time.
        time: f64,
    },
    /// See [`MOVIE_TIMEUPDATE`].
    TimeUpdate {
        /// New transport time.
        time: f64,
    },
    /// See [`MOVIE_ENDED`].
    Ended {
        /// Final transport time (the movie duration).
        time: f64,
    },
    /// See [`MOVIE_CHANGE_LAYER_ADD`].
    LayerAdded {
        /// Added layer.
        layer: LayerId,
        /// Position in the layer list.
        index: usize,
    },
    /// See [`MOVIE_CHANGE_LAYER_REMOVE`].
    LayerRemoved {
        /// Removed layer.
        layer: LayerId,
        /// Position it occupied.
        index: usize,
    },
    /// See [`MOVIE_CHANGE_EFFECT_ADD`].
    EffectAdded {
        /// Chain owner.
        parent: EffectParent,
        /// Added effect.
        effect: EffectId,
    },
    /// See [`MOVIE_CHANGE_EFFECT_REMOVE`].
    EffectRemoved {
        /// Chain owner.
        parent: EffectParent,
        /// Removed effect.
        effect: EffectId,
    },
    /// See [`MOVIE_CHANGE_MODIFY`].
    Modified {
        /// Name of the changed property.
        property: &'static str,
    },
    /// See [`LAYER_ATTACH`].
    LayerAttached {
        /// Movie the layer attached to.
        movie: MovieId,
    },
    /// See [`LAYER_DETACH`].
    LayerDetached {
        /// Movie the layer detached from.
        movie: MovieId,
    },
    /// Host-defined payload for custom topics.
    Custom(serde_json::Value),
}

impl MovieEvent {
    /// Transport time carried by transport events.
    pub fn time(&self) -> Option<f64> {
        match self {
            Self::Play { time }
            | Self::Pause { time }
            | Self::Seek { time }
            | Self::TimeUpdate { time }
            | Self::Ended { time } => Some(*time),
            _ => None,
        }
    }
}
