//! Effects that move pixels around.

use kurbo::{Affine, Point};

use crate::animation::dynamic::Dynamic;
use crate::effects::chain::{Effect, EffectFrame};
use crate::foundation::error::{LaminaError, LaminaResult};
use crate::render::blur::blur_rgba8_premul;
use crate::render::surface::Surface;

/// Replaces each `size x size` block by its top-left pixel.
#[derive(Clone, Debug)]
pub struct Pixelate {
    /// Block edge in pixels; values below 2 are a no-op.
    pub size: Dynamic<f64>,
}

impl Pixelate {
    /// Pixelate with blocks of `size` pixels.
    pub fn new(size: impl Into<Dynamic<f64>>) -> Self {
        Self { size: size.into() }
    }
}

impl Effect for Pixelate {
    fn name(&self) -> &str {
        "pixelate"
    }

    fn apply(&mut self, target: &mut Surface, frame: &mut EffectFrame<'_>) -> LaminaResult<()> {
        let size = self.size.eval(frame.cache, frame.effect, "size", frame.time);
        if !size.is_finite() || size < 2.0 {
            return Ok(());
        }
        let size = size.round() as u32;
        let (w, h) = (target.width(), target.height());
        for by in (0..h).step_by(size as usize) {
            for bx in (0..w).step_by(size as usize) {
                let Some(px) = target.pixel(bx, by) else {
                    continue;
                };
                for y in by..(by + size).min(h) {
                    for x in bx..(bx + size).min(w) {
                        target.set_pixel(x, y, px);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Separable gaussian blur.
#[derive(Clone, Debug)]
pub struct GaussianBlur {
    /// Kernel radius in pixels; `0` is a no-op.
    pub radius: Dynamic<f64>,
}

impl GaussianBlur {
    /// Blur with the given kernel radius.
    pub fn new(radius: impl Into<Dynamic<f64>>) -> Self {
        Self {
            radius: radius.into(),
        }
    }
}

impl Effect for GaussianBlur {
    fn name(&self) -> &str {
        "gaussianBlur"
    }

    fn apply(&mut self, target: &mut Surface, frame: &mut EffectFrame<'_>) -> LaminaResult<()> {
        let radius = self
            .radius
            .eval(frame.cache, frame.effect, "radius", frame.time);
        if !radius.is_finite() || radius < 0.0 {
            return Err(LaminaError::render(format!(
                "blur radius must be finite and >= 0, got {radius}"
            )));
        }
        let r = radius.round() as u32;
        if r == 0 {
            return Ok(());
        }
        let sigma = (radius / 2.0).max(0.5) as f32;
        let out = blur_rgba8_premul(target.data(), target.width(), target.height(), r, sigma)?;
        target.data_mut().copy_from_slice(&out);
        Ok(())
    }
}

/// Applies an affine transform to the surface contents, sampling nearest.
#[derive(Clone, Debug)]
pub struct Transform {
    /// Maps source pixel positions to destination positions.
    pub matrix: Dynamic<Affine>,
}

impl Transform {
    /// Transform by `matrix`.
    pub fn new(matrix: impl Into<Dynamic<Affine>>) -> Self {
        Self {
            matrix: matrix.into(),
        }
    }
}

impl Effect for Transform {
    fn name(&self) -> &str {
        "transform"
    }

    fn apply(&mut self, target: &mut Surface, frame: &mut EffectFrame<'_>) -> LaminaResult<()> {
        let m = self
            .matrix
            .eval(frame.cache, frame.effect, "matrix", frame.time);
        if m == Affine::IDENTITY {
            return Ok(());
        }
        if m.determinant().abs() <= f64::EPSILON {
            // collapses everything onto a line
            target.clear();
            return Ok(());
        }
        let inv = m.inverse();
        let src = target.clone();
        let (w, h) = (f64::from(target.width()), f64::from(target.height()));
        for y in 0..target.height() {
            for x in 0..target.width() {
                let p = inv * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                let inside = p.x >= 0.0 && p.y >= 0.0 && p.x < w && p.y < h;
                let px = if inside {
                    src.pixel(p.x as u32, p.y as u32).unwrap_or_default()
                } else {
                    Default::default()
                };
                target.set_pixel(x, y, px);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/spatial.rs"]
mod tests;
