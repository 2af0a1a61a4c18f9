//! Per-pixel color effects.

use crate::animation::dynamic::Dynamic;
use crate::effects::chain::{Effect, EffectFrame};
use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::LaminaResult;
use crate::foundation::math::clamp_u8;
use crate::render::surface::Surface;

/// Run `f` on every non-transparent pixel in straight-alpha `0..=1` space.
pub(crate) fn map_straight(target: &mut Surface, mut f: impl FnMut(&mut [f64; 4])) {
    for px in target.data_mut().chunks_exact_mut(4) {
        if px[3] == 0 {
            continue;
        }
        let s = Rgba8Premul::from_array([px[0], px[1], px[2], px[3]]).to_straight();
        let mut c = s.map(|v| f64::from(v) / 255.0);
        f(&mut c);
        let out = Rgba8Premul::from_straight_rgba(
            clamp_u8(c[0] * 255.0),
            clamp_u8(c[1] * 255.0),
            clamp_u8(c[2] * 255.0),
            clamp_u8(c[3] * 255.0),
        );
        px.copy_from_slice(&out.to_array());
    }
}

/// Adds `amount` (in `-1..=1`) to every color channel.
#[derive(Clone, Debug)]
pub struct Brightness {
    /// Channel offset.
    pub amount: Dynamic<f64>,
}

impl Brightness {
    /// Brightness shift by `amount`.
    pub fn new(amount: impl Into<Dynamic<f64>>) -> Self {
        Self {
            amount: amount.into(),
        }
    }
}

impl Effect for Brightness {
    fn name(&self) -> &str {
        "brightness"
    }

    fn apply(&mut self, target: &mut Surface, frame: &mut EffectFrame<'_>) -> LaminaResult<()> {
        let amount = self
            .amount
            .eval(frame.cache, frame.effect, "amount", frame.time);
        if amount == 0.0 {
            return Ok(());
        }
        map_straight(target, |c| {
            for ch in &mut c[..3] {
                *ch += amount;
            }
        });
        Ok(())
    }
}

/// Scales the distance of every channel from mid-grey.
#[derive(Clone, Debug)]
pub struct Contrast {
    /// `1` leaves the image unchanged, `0` flattens it to grey.
    pub amount: Dynamic<f64>,
}

impl Contrast {
    /// Contrast factor `amount`.
    pub fn new(amount: impl Into<Dynamic<f64>>) -> Self {
        Self {
            amount: amount.into(),
        }
    }
}

impl Effect for Contrast {
    fn name(&self) -> &str {
        "contrast"
    }

    fn apply(&mut self, target: &mut Surface, frame: &mut EffectFrame<'_>) -> LaminaResult<()> {
        let amount = self
            .amount
            .eval(frame.cache, frame.effect, "amount", frame.time);
        if amount == 1.0 {
            return Ok(());
        }
        map_straight(target, |c| {
            for ch in &mut c[..3] {
                *ch = (*ch - 0.5) * amount + 0.5;
            }
        });
        Ok(())
    }
}

/// Multiplies each channel by its own factor.
#[derive(Clone, Debug)]
pub struct Channels {
    /// Red factor.
    pub r: Dynamic<f64>,
    /// Green factor.
    pub g: Dynamic<f64>,
    /// Blue factor.
    pub b: Dynamic<f64>,
    /// Alpha factor.
    pub a: Dynamic<f64>,
}

impl Default for Channels {
    fn default() -> Self {
        Self {
            r: 1.0.into(),
            g: 1.0.into(),
            b: 1.0.into(),
            a: 1.0.into(),
        }
    }
}

impl Channels {
    /// Scale color channels, alpha untouched.
    pub fn rgb(
        r: impl Into<Dynamic<f64>>,
        g: impl Into<Dynamic<f64>>,
        b: impl Into<Dynamic<f64>>,
    ) -> Self {
        Self {
            r: r.into(),
            g: g.into(),
            b: b.into(),
            a: 1.0.into(),
        }
    }
}

impl Effect for Channels {
    fn name(&self) -> &str {
        "channels"
    }

    fn apply(&mut self, target: &mut Surface, frame: &mut EffectFrame<'_>) -> LaminaResult<()> {
        let (id, t) = (frame.effect, frame.time);
        let factors = [
            self.r.eval(frame.cache, id, "r", t),
            self.g.eval(frame.cache, id, "g", t),
            self.b.eval(frame.cache, id, "b", t),
            self.a.eval(frame.cache, id, "a", t),
        ];
        if factors == [1.0; 4] {
            return Ok(());
        }
        map_straight(target, |c| {
            for (ch, k) in c.iter_mut().zip(factors) {
                *ch *= k;
            }
        });
        Ok(())
    }
}

/// Desaturates toward Rec. 601 luma.
#[derive(Clone, Debug)]
pub struct Grayscale {
    /// `0` keeps color, `1` is fully grey.
    pub amount: Dynamic<f64>,
}

impl Default for Grayscale {
    fn default() -> Self {
        Self { amount: 1.0.into() }
    }
}

impl Effect for Grayscale {
    fn name(&self) -> &str {
        "grayscale"
    }

    fn apply(&mut self, target: &mut Surface, frame: &mut EffectFrame<'_>) -> LaminaResult<()> {
        let amount = self
            .amount
            .eval(frame.cache, frame.effect, "amount", frame.time)
            .clamp(0.0, 1.0);
        if amount == 0.0 {
            return Ok(());
        }
        map_straight(target, |c| {
            let luma = 0.299 * c[0] + 0.587 * c[1] + 0.114 * c[2];
            for ch in &mut c[..3] {
                *ch += (luma - *ch) * amount;
            }
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/color.rs"]
mod tests;
