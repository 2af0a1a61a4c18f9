//! Visual component of drawing layers and its per-frame render.

use tracing::trace;

use crate::animation::dynamic::Dynamic;
use crate::cache::values::ValueCache;
use crate::foundation::core::Canvas;
use crate::foundation::error::LaminaResult;
use crate::foundation::ids::LayerId;
use crate::layer::content::{Content, DrawContext};
use crate::layer::options::{Border, VisualOptions};
use crate::render::fill::Fill;
use crate::render::surface::Surface;
use kurbo::Point;

/// Visual component of a layer: placement, paint and the surface it renders into.
pub struct Visual {
    /// Left edge on the movie canvas.
    pub x: Dynamic<f64>,
    /// Top edge on the movie canvas.
    pub y: Dynamic<f64>,
    /// Surface width; the movie width when `None`.
    pub width: Option<Dynamic<f64>>,
    /// Surface height; the movie height when `None`.
    pub height: Option<Dynamic<f64>>,
    /// Compositing opacity.
    pub opacity: Dynamic<f64>,
    /// Paint drawn before the content.
    pub background: Option<Dynamic<Fill>>,
    /// Border drawn after the content.
    pub border: Option<Border>,
    content: Option<Box<dyn Content>>,
    surface: Surface,
}

impl std::fmt::Debug for Visual {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Visual")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("opacity", &self.opacity)
            .field("background", &self.background)
            .field("border", &self.border)
            .field("has_content", &self.content.is_some())
            .field("surface", &self.surface.canvas())
            .finish()
    }
}

impl Visual {
    pub(crate) fn from_options(opts: &VisualOptions) -> Self {
        Self {
            x: opts.x.into(),
            y: opts.y.into(),
            width: opts.width.map(Dynamic::from),
            height: opts.height.map(Dynamic::from),
            opacity: opts.opacity.into(),
            background: opts.background.clone().map(Dynamic::from),
            border: opts.border.clone(),
            content: None,
            surface: Surface::default(),
        }
    }

    /// Replace the content drawer.
    pub fn set_content(&mut self, content: impl Content + 'static) {
        self.content = Some(Box::new(content));
    }

    pub(crate) fn set_boxed_content(&mut self, content: Box<dyn Content>) {
        self.content = Some(content);
    }

    /// Surface from the last render.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub(crate) fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Pixel size at `local` time, falling back to `canvas` for unset dimensions.
    pub fn size_at(
        &self,
        layer: LayerId,
        local: f64,
        canvas: Canvas,
        cache: &mut ValueCache,
    ) -> Canvas {
        let resolve =
            |dim: &Option<Dynamic<f64>>, prop: &str, fallback: u32, cache: &mut ValueCache| {
                match dim {
                    Some(d) => {
                        let v = d.eval(cache, layer, prop, local);
                        if v.is_finite() { v.max(0.0).round() as u32 } else { 0 }
                    }
                    None => fallback,
                }
            };
        Canvas {
            width: resolve(&self.width, "width", canvas.width, cache),
            height: resolve(&self.height, "height", canvas.height, cache),
        }
    }

    /// Top-left corner on the movie canvas at `local` time.
    pub fn position_at(&self, layer: LayerId, local: f64, cache: &mut ValueCache) -> Point {
        Point::new(
            self.x.eval(cache, layer, "x", local),
            self.y.eval(cache, layer, "y", local),
        )
    }

    /// Compositing opacity at `local` time, clamped to `0..=1`.
    pub fn opacity_at(&self, layer: LayerId, local: f64, cache: &mut ValueCache) -> f64 {
        let v = self.opacity.eval(cache, layer, "opacity", local);
        if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
    }

    /// Draw background, content and border. Returns `false` (drawing nothing) for a
    /// zero-area surface.
    pub(crate) fn render(
        &mut self,
        layer: LayerId,
        local: f64,
        canvas: Canvas,
        cache: &mut ValueCache,
    ) -> LaminaResult<bool> {
        let size = self.size_at(layer, local, canvas, cache);
        if size.is_empty() {
            trace!(%layer, ?size, "zero-area layer, skipping draw");
            self.surface.resize(0, 0);
            return Ok(false);
        }
        self.surface.resize(size.width, size.height);

        if let Some(bg) = &self.background {
            let fill = bg.eval(cache, layer, "background", local);
            self.surface.fill(&fill);
        }
        if let Some(content) = &mut self.content {
            let mut ctx = DrawContext {
                layer,
                time: local,
                cache: &mut *cache,
            };
            content.draw(&mut self.surface, &mut ctx)?;
        }
        if let Some(border) = &self.border {
            self.surface.stroke_border(border.width, border.color);
        }
        Ok(true)
    }
}
