//! CPU drawing surface holding premultiplied RGBA8 pixels.

use image::RgbaImage;
use kurbo::{Point, Rect};

use crate::assets::color::Color;
use crate::foundation::core::{Canvas, Rgba8Premul};
use crate::foundation::error::LaminaResult;
use crate::render::composite::{over, over_in_place};
use crate::render::fill::Fill;

/// Owned pixel buffer every layer and the movie draw into.
///
/// Storage is an [`RgbaImage`] whose channels are premultiplied by alpha. Use
/// [`Surface::to_straight_image`] when handing pixels to code that expects straight alpha.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    image: RgbaImage,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl Surface {
    /// Transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Size as a [`Canvas`].
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Return `true` when the surface has no pixels.
    pub fn is_empty(&self) -> bool {
        self.canvas().is_empty()
    }

    /// Resize to `width x height` and clear. The buffer is reused when the size is unchanged.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.width() == width && self.height() == height {
            self.clear();
        } else {
            self.image = RgbaImage::new(width, height);
        }
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.data_mut().fill(0);
    }

    /// Premultiplied pixel bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.image
    }

    /// Mutable premultiplied pixel bytes, row-major.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.image
    }

    /// Underlying premultiplied image.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8Premul> {
        self.image
            .get_pixel_checked(x, y)
            .map(|p| Rgba8Premul::from_array(p.0))
    }

    /// Overwrite the pixel at `(x, y)`; out of bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, px: Rgba8Premul) {
        if let Some(p) = self.image.get_pixel_mut_checked(x, y) {
            p.0 = px.to_array();
        }
    }

    /// Paint `fill` over the whole surface.
    pub fn fill(&mut self, fill: &Fill) {
        let full = Rect::new(0.0, 0.0, f64::from(self.width()), f64::from(self.height()));
        self.fill_rect(full, fill);
    }

    /// Paint `fill` over the pixels whose centers fall inside `rect`.
    pub fn fill_rect(&mut self, rect: Rect, fill: &Fill) {
        let Some((x0, y0, x1, y1)) = self.pixel_span(rect) else {
            return;
        };
        let uniform = fill
            .is_uniform()
            .then(|| fill.color_at(Point::ZERO).to_rgba8_premul().to_array());
        for y in y0..y1 {
            for x in x0..x1 {
                let src = match uniform {
                    Some(px) => px,
                    None => fill
                        .color_at(Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5))
                        .to_rgba8_premul()
                        .to_array(),
                };
                let p = self.image.get_pixel_mut(x, y);
                p.0 = over(p.0, src, 1.0);
            }
        }
    }

    /// Stroke an inset border of `width` pixels along the surface edges.
    pub fn stroke_border(&mut self, width: f64, color: Color) {
        if width.is_nan() || width <= 0.0 {
            return;
        }
        let (w, h) = (f64::from(self.width()), f64::from(self.height()));
        let fill = Fill::solid(color);
        let bw = width.min(w / 2.0).min(h / 2.0);
        self.fill_rect(Rect::new(0.0, 0.0, w, bw), &fill);
        self.fill_rect(Rect::new(0.0, h - bw, w, h), &fill);
        self.fill_rect(Rect::new(0.0, bw, bw, h - bw), &fill);
        self.fill_rect(Rect::new(w - bw, bw, w, h - bw), &fill);
    }

    /// Draw a straight-alpha image scaled (nearest neighbour) into `dest`.
    pub fn draw_image(&mut self, src: &RgbaImage, dest: Rect) {
        if src.width() == 0 || src.height() == 0 || dest.width() <= 0.0 || dest.height() <= 0.0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.pixel_span(dest) else {
            return;
        };
        let sx = f64::from(src.width()) / dest.width();
        let sy = f64::from(src.height()) / dest.height();
        for y in y0..y1 {
            let v = ((f64::from(y) + 0.5 - dest.y0) * sy).floor();
            let v = (v.max(0.0) as u32).min(src.height() - 1);
            for x in x0..x1 {
                let u = ((f64::from(x) + 0.5 - dest.x0) * sx).floor();
                let u = (u.max(0.0) as u32).min(src.width() - 1);
                let [r, g, b, a] = src.get_pixel(u, v).0;
                let px = Rgba8Premul::from_straight_rgba(r, g, b, a).to_array();
                let p = self.image.get_pixel_mut(x, y);
                p.0 = over(p.0, px, 1.0);
            }
        }
    }

    /// Composite `src` onto this surface with its top-left corner at `at` (rounded to pixels).
    pub fn composite(&mut self, src: &Surface, at: Point, opacity: f64) -> LaminaResult<()> {
        if src.is_empty() || self.is_empty() || opacity.is_nan() || opacity <= 0.0 {
            return Ok(());
        }
        let opacity = opacity.min(1.0) as f32;
        let (ox, oy) = (at.x.round() as i64, at.y.round() as i64);
        if ox == 0 && oy == 0 && src.canvas() == self.canvas() {
            return over_in_place(self.data_mut(), src.data(), opacity);
        }

        let dx0 = ox.max(0);
        let dy0 = oy.max(0);
        let dx1 = (ox + i64::from(src.width())).min(i64::from(self.width()));
        let dy1 = (oy + i64::from(src.height())).min(i64::from(self.height()));
        for dy in dy0..dy1 {
            for dx in dx0..dx1 {
                let s = src.image.get_pixel((dx - ox) as u32, (dy - oy) as u32).0;
                let d = self.image.get_pixel_mut(dx as u32, dy as u32);
                d.0 = over(d.0, s, opacity);
            }
        }
        Ok(())
    }

    /// Copy with straight (un-premultiplied) alpha.
    pub fn to_straight_image(&self) -> RgbaImage {
        let mut out = self.image.clone();
        for p in out.pixels_mut() {
            p.0 = Rgba8Premul::from_array(p.0).to_straight();
        }
        out
    }

    fn pixel_span(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let rect = rect.abs();
        let clamp_x = |v: f64| v.clamp(0.0, f64::from(self.width())) as u32;
        let clamp_y = |v: f64| v.clamp(0.0, f64::from(self.height())) as u32;
        // pixel centers inside [x0, x1)
        let x0 = clamp_x((rect.x0 - 0.5).ceil());
        let x1 = clamp_x((rect.x1 - 0.5).ceil());
        let y0 = clamp_y((rect.y0 - 0.5).ceil());
        let y1 = clamp_y((rect.y1 - 0.5).ceil());
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
