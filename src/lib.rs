//! Lamina is a layered, time-based media composition engine.
//!
//! A [`Movie`] owns an ordered list of [`Layer`]s and renders them onto a canvas frame by frame.
//! Layers carry visual content, audio, or both. Both layers and movies run [`Effect`] chains
//! over their pixels. Every property can be a constant, a keyframe track or a function of time
//! through [`Dynamic`].
//!
//! - Build a movie from a [`MovieConfig`] and push layers into it
//! - Drive it with [`Movie::play`] plus [`Movie::tick`] from a host clock, or render
//!   arbitrary times with [`Movie::render`] and [`Movie::render_sequence`]
//! - React to transport and structure changes through hierarchical topics (see [`topics`])
//!
//! Everything is single-threaded: shared media and audio graphs are `Rc<RefCell<_>>` handles
//! and event handlers run synchronously inside `publish`.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod animation;
mod assets;
mod audio;
mod cache;
mod effects;
mod event;
mod foundation;
mod layer;
mod lifecycle;
mod movie;
mod render;

pub use crate::foundation::core::{Affine, Canvas, Fps, Point, Rect, Rgba8Premul, Vec2};
pub use crate::foundation::error::{LaminaError, LaminaResult};
pub use crate::foundation::ids::{
    AudioNodeId, EffectId, LayerId, MovieId, ObjectId, SubscriptionId,
};

pub use crate::event::bus::{Event, EventBus, topic_path};
pub use crate::event::topics;
pub use crate::event::topics::MovieEvent;

pub use crate::cache::values::{CacheStats, ValueCache};
pub use crate::lifecycle::attach::{AttachContext, AttachState, Attachable, Attachment};

pub use crate::animation::dynamic::{Dynamic, InterpMode, KeyFrame, KeyFrames, Lerp};
pub use crate::animation::ease::Ease;

pub use crate::assets::color::Color;
pub use crate::assets::media::{AudioPcm, DecodedMedia, MediaElement, SharedMedia};
pub use crate::audio::context::{
    AudioContext, GraphStats, OfflineAudioContext, SharedAudioContext,
};

pub use crate::render::composite::{PremulRgba8, over};
pub use crate::render::fill::{Fill, GradientStop};
pub use crate::render::surface::Surface;

pub use crate::effects::chain::{
    Effect, EffectChain, EffectCtx, EffectFrame, EffectOptions, EffectParent, EffectSlot,
};
pub use crate::effects::color::{Brightness, Channels, Contrast, Grayscale};
pub use crate::effects::spatial::{GaussianBlur, Pixelate, Transform};
pub use crate::effects::stack::Stack;

pub use crate::layer::audio_source::AudioSource;
pub use crate::layer::base::{Layer, LayerType};
pub use crate::layer::content::{Content, DrawContext, ImageContent};
pub use crate::layer::options::{AudioOptions, BaseOptions, Border, VideoOptions, VisualOptions};
pub use crate::layer::visual::Visual;

pub use crate::movie::config::MovieConfig;
pub use crate::movie::context::MovieCtx;
pub use crate::movie::player::{MIX_CHANNELS, Movie};
pub use crate::movie::transport::{Playback, PlaybackOutcome};
