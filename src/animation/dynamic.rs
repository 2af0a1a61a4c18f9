//! Time-varying property values.
//!
//! A [`Dynamic`] is either a constant, a keyframe track or a host function of time. Non-constant
//! values are resolved through the movie's [`ValueCache`], so a property read several times while
//! rendering one frame is computed once.

use std::fmt;
use std::rc::Rc;

use crate::animation::ease::Ease;
use crate::assets::color::Color;
use crate::cache::values::ValueCache;
use crate::foundation::core::{Affine, Point, Vec2};
use crate::foundation::error::{LaminaError, LaminaResult};
use crate::foundation::ids::ObjectId;
use crate::foundation::math::lerp_f64;

/// Interpolation contract for animated value types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        lerp_f64(*a, *b, t)
    }
}

impl Lerp for f32 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        lerp_f64(f64::from(*a), f64::from(*b), t) as f32
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(lerp_f64(a.x, b.x, t), lerp_f64(a.y, b.y, t))
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a.lerp(*b, t)
    }
}

impl Lerp for Color {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Color::rgba(
            lerp_f64(a.r, b.r, t),
            lerp_f64(a.g, b.g, t),
            lerp_f64(a.b, b.b, t),
            lerp_f64(a.a, b.a, t),
        )
    }
}

impl Lerp for Affine {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        let (ca, cb) = (a.as_coeffs(), b.as_coeffs());
        let mut out = [0.0; 6];
        for (i, c) in out.iter_mut().enumerate() {
            *c = lerp_f64(ca[i], cb[i], t);
        }
        Affine::new(out)
    }
}

/// Interpolation strategy between keyframes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InterpMode {
    /// Step to the next value only when its keyframe is reached.
    Hold,
    /// Blend adjacent keyframes with the leading keyframe's easing.
    #[default]
    Linear,
}

/// One keyframe, in layer-local seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyFrame<T> {
    /// Local time of this key.
    pub time: f64,
    /// Value at `time`.
    pub value: T,
    /// Easing applied toward the next key.
    pub ease: Ease,
}

impl<T> KeyFrame<T> {
    /// Key with linear easing.
    pub fn new(time: f64, value: T) -> Self {
        Self {
            time,
            value,
            ease: Ease::Linear,
        }
    }

    /// Replace the easing toward the next key.
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }
}

/// Validated, time-sorted keyframe track.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyFrames<T> {
    keys: Vec<KeyFrame<T>>,
    mode: InterpMode,
}

impl<T: Lerp + Clone> KeyFrames<T> {
    /// Build a linear track. Keys must be non-empty, finite and sorted by time.
    pub fn new(keys: Vec<KeyFrame<T>>) -> LaminaResult<Self> {
        Self::with_mode(keys, InterpMode::Linear)
    }

    /// Build a track with an explicit interpolation mode.
    pub fn with_mode(keys: Vec<KeyFrame<T>>, mode: InterpMode) -> LaminaResult<Self> {
        if keys.is_empty() {
            return Err(LaminaError::configuration(
                "keyframes need at least one key",
            ));
        }
        if keys.iter().any(|k| !k.time.is_finite()) {
            return Err(LaminaError::configuration("keyframe times must be finite"));
        }
        if !keys.windows(2).all(|w| w[0].time <= w[1].time) {
            return Err(LaminaError::configuration(
                "keyframes must be sorted by time",
            ));
        }
        Ok(Self { keys, mode })
    }

    /// Keys in time order.
    pub fn keys(&self) -> &[KeyFrame<T>] {
        &self.keys
    }

    /// Value at local `time`. Outside the track the nearest end key holds.
    pub fn sample(&self, time: f64) -> T {
        let idx = self.keys.partition_point(|k| k.time <= time);
        if idx == 0 {
            return self.keys[0].value.clone();
        }
        if idx >= self.keys.len() {
            return self.keys[self.keys.len() - 1].value.clone();
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let span = b.time - a.time;
        if span <= 0.0 {
            return a.value.clone();
        }
        match self.mode {
            InterpMode::Hold => a.value.clone(),
            InterpMode::Linear => {
                let t = a.ease.apply((time - a.time) / span);
                T::lerp(&a.value, &b.value, t)
            }
        }
    }
}

/// Property value that may vary with time.
#[derive(Clone)]
pub enum Dynamic<T> {
    /// Same value at every time.
    Constant(T),
    /// Keyframe track in layer-local time.
    KeyFrames(KeyFrames<T>),
    /// Host function of layer-local time.
    Func(Rc<dyn Fn(f64) -> T>),
}

impl<T: fmt::Debug> fmt::Debug for Dynamic<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            Self::KeyFrames(k) => f.debug_tuple("KeyFrames").field(k).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl<T> From<T> for Dynamic<T> {
    fn from(v: T) -> Self {
        Self::Constant(v)
    }
}

impl<T: Clone + Lerp + 'static> Dynamic<T> {
    /// Wrap a function of local time.
    pub fn func(f: impl Fn(f64) -> T + 'static) -> Self {
        Self::Func(Rc::new(f))
    }

    /// Return `true` for [`Dynamic::Constant`].
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }

    /// Uncached value at `time`.
    pub fn sample(&self, time: f64) -> T {
        match self {
            Self::Constant(v) => v.clone(),
            Self::KeyFrames(k) => k.sample(time),
            Self::Func(f) => f(time),
        }
    }

    /// Value at `time`, memoized in `cache` under `(owner, property)`.
    pub fn eval(
        &self,
        cache: &mut ValueCache,
        owner: impl Into<ObjectId>,
        property: &str,
        time: f64,
    ) -> T {
        match self {
            Self::Constant(v) => v.clone(),
            _ => cache.get_or_compute(owner, property, time, || self.sample(time)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/dynamic.rs"]
mod tests;
