//! Things a visual layer can draw between its background and its border.

use std::sync::Arc;

use image::RgbaImage;
use kurbo::Rect;

use crate::cache::values::ValueCache;
use crate::foundation::error::LaminaResult;
use crate::foundation::ids::LayerId;
use crate::layer::audio_source::SharedAudioState;
use crate::render::surface::Surface;

/// Per-draw context handed to [`Content::draw`].
pub struct DrawContext<'a> {
    /// Layer being drawn.
    pub layer: LayerId,
    /// Layer-local time (movie time minus the layer start).
    pub time: f64,
    /// Movie value cache.
    pub cache: &'a mut ValueCache,
}

/// Host- or engine-provided drawing routine for a visual layer.
pub trait Content {
    /// Draw onto `target`, which is already sized and has its background painted.
    fn draw(&mut self, target: &mut Surface, ctx: &mut DrawContext<'_>) -> LaminaResult<()>;
}

impl<F> Content for F
where
    F: FnMut(&mut Surface, &mut DrawContext<'_>) -> LaminaResult<()>,
{
    fn draw(&mut self, target: &mut Surface, ctx: &mut DrawContext<'_>) -> LaminaResult<()> {
        self(target, ctx)
    }
}

/// Decoded still image stretched over the layer.
#[derive(Clone, Debug)]
pub struct ImageContent {
    image: Arc<RgbaImage>,
}

impl ImageContent {
    /// Wrap a straight-alpha image.
    pub fn new(image: impl Into<Arc<RgbaImage>>) -> Self {
        Self {
            image: image.into(),
        }
    }

    /// Source image.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

impl Content for ImageContent {
    fn draw(&mut self, target: &mut Surface, _ctx: &mut DrawContext<'_>) -> LaminaResult<()> {
        let dest = Rect::new(0.0, 0.0, f64::from(target.width()), f64::from(target.height()));
        target.draw_image(&self.image, dest);
        Ok(())
    }
}

/// Frame of the layer's media at its current source time.
pub(crate) struct VideoContent {
    source: SharedAudioState,
}

impl VideoContent {
    pub(crate) fn new(source: SharedAudioState) -> Self {
        Self { source }
    }
}

impl Content for VideoContent {
    fn draw(&mut self, target: &mut Surface, ctx: &mut DrawContext<'_>) -> LaminaResult<()> {
        let (media, source_time) = {
            let state = self.source.borrow();
            (state.media(), state.source_time_at(ctx.time))
        };
        let frame = media.borrow().video_frame_at(source_time);
        if let Some(frame) = frame {
            let dest = Rect::new(0.0, 0.0, f64::from(target.width()), f64::from(target.height()));
            target.draw_image(&frame, dest);
        }
        Ok(())
    }
}
