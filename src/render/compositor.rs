use std::path::PathBuf;

use crate::{
    assets::store::{AssetLoader, ImageCache, ImageSource, PreparedImage},
    assets::text::{FontBook, TextLayoutEngine},
    compose::options::RenderOptions,
    compose::text::{archive_color, caption_color, meta_color},
    foundation::core::{Point, Rect, Rgba8},
    foundation::error::PhotostripResult,
    foundation::math::cover_fit_source_rect,
    layout::catalog::FrameOption,
    layout::solver::{LayoutPlan, TextLine},
    layout::template::{LabelAlign, LayoutTemplate},
    render::surface::{RenderedImage, Surface},
    sticker::engine::StickerEngine,
};

/// Scale used for frame picker thumbnails.
pub const PREVIEW_SCALE: f64 = 0.2;

const CAPTION_SKEW: f64 = -0.21;

/// Compositor inputs that outlive a single render.
#[derive(Clone, Debug)]
pub struct CompositorConfig {
    /// Root for relative image paths (frame art, photos, stickers).
    pub assets_root: PathBuf,
    /// Faces available to text layers. The default book carries only the system fallback face.
    pub fonts: FontBook,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            assets_root: PathBuf::from("."),
            fonts: FontBook::new().with_system_fallback(),
        }
    }
}

/// Thumbnail of a layout dressed with one frame option.
#[derive(Debug)]
pub struct FramePreview {
    /// Frame identifier.
    pub frame_id: String,
    /// Rendered thumbnail.
    pub image: PhotostripResult<RenderedImage>,
}

/// Paints layouts, photos, stickers and text into finished rasters.
///
/// Owns the decoded-image cache and shaping contexts, so repeated renders of the same sources do
/// not decode twice.
pub struct Compositor {
    loader: AssetLoader,
    cache: ImageCache,
    fonts: FontBook,
    text: TextLayoutEngine,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(CompositorConfig::default())
    }
}

impl Compositor {
    /// Build a compositor from `config`.
    pub fn new(config: CompositorConfig) -> Self {
        Self {
            loader: AssetLoader::new(config.assets_root),
            cache: ImageCache::new(),
            fonts: config.fonts,
            text: TextLayoutEngine::new(),
        }
    }

    /// Keep at most `capacity` decoded images between renders.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = ImageCache::with_capacity(capacity);
        self
    }

    /// Loader used for every image source.
    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }

    /// Decoded images kept between renders.
    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    /// Forget every cached image.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Composite `photos` (assigned to slots by index) and optional stickers into `layout`.
    ///
    /// Assets that fail to load are logged and left out. Errors are returned only for invalid
    /// layouts and unusable scale factors.
    #[tracing::instrument(
        skip_all,
        fields(layout = %layout.id, photos = photos.len(), scale = options.scale)
    )]
    pub fn render(
        &mut self,
        layout: &LayoutTemplate,
        photos: &[ImageSource],
        stickers: Option<&StickerEngine>,
        options: &RenderOptions,
    ) -> PhotostripResult<RenderedImage> {
        layout.validate()?;
        let (width, height) = options.output_size(layout)?;
        let plan = LayoutPlan::resolve(layout, options, options.resolved_date());
        let canvas = Rect::new(0.0, 0.0, f64::from(layout.width), f64::from(layout.height));
        let mut surface = Surface::new(width, height, options.scale);

        let frame = layout.image.as_deref().and_then(|reference| {
            match self
                .cache
                .load(&self.loader, &ImageSource::from_reference(reference))
            {
                Ok(img) => Some(img),
                Err(err) => {
                    tracing::warn!(
                        frame = reference,
                        error = %err,
                        "frame image failed to load; using flat background"
                    );
                    None
                }
            }
        });
        if frame.is_none() {
            let bg = Rgba8::parse_hex_or(&options.bg_color, Rgba8::WHITE);
            surface.fill_rect(canvas, bg);
        }

        self.paint_photos(&mut surface, &plan, photos);

        if let Some(frame) = &frame {
            let src = Rect::new(0.0, 0.0, f64::from(frame.width), f64::from(frame.height));
            surface.draw_image_region(frame, src, canvas);
        }

        if let Some(engine) = stickers {
            engine.render(&mut surface, false);
        }

        let branding_color = layout
            .text
            .as_ref()
            .map(|t| Rgba8::parse_hex_or(&t.color, Rgba8::BLACK))
            .unwrap_or(Rgba8::BLACK);

        if layout.image.is_none()
            && let Some(label) = &layout.archive_label
        {
            let line = TextLine {
                text: label.text.clone(),
                center_y: label.y,
                font_size: label.font_size,
            };
            self.paint_line(
                &mut surface,
                None,
                &line,
                label.x,
                archive_color(branding_color),
                label.align,
                0.0,
            );
        }

        if let Some(anchor) = &layout.text {
            let family = anchor.font_family.as_deref();
            let x = plan.text.x;
            let stack = &plan.text;
            let shift = plan.shift_y;

            if let Some(line) = &stack.branding {
                self.paint_line(
                    &mut surface,
                    family,
                    &shifted(line, shift),
                    x,
                    branding_color,
                    LabelAlign::Center,
                    0.0,
                );
            }
            if let Some(line) = &stack.meta {
                self.paint_line(
                    &mut surface,
                    None,
                    &shifted(line, shift),
                    x,
                    meta_color(branding_color),
                    LabelAlign::Center,
                    0.0,
                );
            }
            for line in &stack.caption {
                self.paint_line(
                    &mut surface,
                    None,
                    &shifted(line, shift),
                    x,
                    caption_color(branding_color),
                    LabelAlign::Center,
                    CAPTION_SKEW,
                );
            }
        }

        Ok(surface.finish())
    }

    /// Thumbnails of `layout` dressed with each of `frames`, at [`PREVIEW_SCALE`].
    #[tracing::instrument(skip_all, fields(layout = %layout.id, frames = frames.len()))]
    pub fn render_frame_previews(
        &mut self,
        layout: &LayoutTemplate,
        frames: &[&FrameOption],
        photos: &[ImageSource],
    ) -> Vec<FramePreview> {
        let options = RenderOptions::thumbnail(PREVIEW_SCALE);
        frames
            .iter()
            .map(|frame| FramePreview {
                frame_id: frame.id.clone(),
                image: self.render(&layout.with_frame(frame), photos, None, &options),
            })
            .collect()
    }

    fn paint_photos(&mut self, surface: &mut Surface, plan: &LayoutPlan, photos: &[ImageSource]) {
        let used = photos.len().min(plan.slots.len());
        if photos.len() > used {
            tracing::debug!(
                extra = photos.len() - used,
                "more photos than slots; extras ignored"
            );
        }

        let decoded = self.cache.load_all(&self.loader, &photos[..used]);
        for (idx, (result, slot)) in decoded.into_iter().zip(&plan.slots).enumerate() {
            match result {
                Ok(img) => draw_cover(surface, &img, *slot),
                Err(err) => {
                    tracing::warn!(photo = idx, error = %err, "photo failed to load; slot left empty")
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn paint_line(
        &mut self,
        surface: &mut Surface,
        family: Option<&str>,
        line: &TextLine,
        x: f64,
        color: Rgba8,
        align: LabelAlign,
        skew: f64,
    ) {
        let Some(face) = self.fonts.resolve(family) else {
            tracing::warn!(text = %line.text, "no font available; text layer skipped");
            return;
        };
        match self
            .text
            .shape_line(face, &line.text, line.font_size as f32, color)
        {
            Ok(shaped) => {
                surface.draw_text(&shaped, Point::new(x, line.center_y), align, skew);
            }
            Err(err) => {
                tracing::warn!(
                    text = %line.text,
                    error = %err,
                    "text layer failed to shape; skipped"
                );
            }
        }
    }
}

fn shifted(line: &TextLine, shift_y: f64) -> TextLine {
    TextLine {
        center_y: line.center_y + shift_y,
        ..line.clone()
    }
}

fn draw_cover(surface: &mut Surface, image: &PreparedImage, slot: Rect) {
    let src = cover_fit_source_rect(f64::from(image.width), f64::from(image.height), slot);
    surface.draw_image_region(image, src, slot);
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
