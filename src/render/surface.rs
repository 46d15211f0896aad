use std::{io::Cursor, path::Path};

use anyhow::Context;
use base64::Engine as _;
use vello_cpu::kurbo::Shape as _;

use crate::{
    assets::decode::unpremultiply_rgba8_in_place,
    assets::store::PreparedImage,
    assets::text::ShapedText,
    foundation::core::{Affine, Point, Rect, Rgba8},
    foundation::error::{PhotostripError, PhotostripResult},
    layout::template::LabelAlign,
};

const CIRCLE_TOLERANCE: f64 = 0.1;

/// Stroke parameters for outlines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke color.
    pub color: Rgba8,
    /// Line width in layout pixels.
    pub width: f64,
    /// Optional `[on, off]` dash pattern.
    pub dash: Option<[f64; 2]>,
}

impl StrokeStyle {
    /// Solid stroke.
    pub const fn solid(color: Rgba8, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    /// Dashed stroke.
    pub const fn dashed(color: Rgba8, width: f64, dash: [f64; 2]) -> Self {
        Self {
            color,
            width,
            dash: Some(dash),
        }
    }

    fn to_cpu(self) -> vello_cpu::kurbo::Stroke {
        let stroke = vello_cpu::kurbo::Stroke::new(self.width);
        match self.dash {
            Some(pattern) => stroke.with_dashes(0.0, pattern),
            None => stroke,
        }
    }
}

/// CPU raster target addressed in layout coordinates.
///
/// Every draw call is expressed in layout space; the surface applies the output scale factor
/// given at construction.
pub struct Surface {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
    base: Affine,
}

impl Surface {
    /// Allocate a `width`×`height` pixel surface drawing layout space at `scale`.
    pub fn new(width: u16, height: u16, scale: f64) -> Self {
        Self {
            ctx: vello_cpu::RenderContext::new(width, height),
            width,
            height,
            base: Affine::scale(scale),
        }
    }

    /// Output width in pixels.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Output height in pixels.
    pub fn height(&self) -> u16 {
        self.height
    }

    fn begin(&mut self, transform: Affine) {
        self.ctx.set_transform(affine_to_cpu(self.base * transform));
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }

    fn set_color(&mut self, color: Rgba8) {
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
    }

    /// Fill an axis-aligned rectangle.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.begin(Affine::IDENTITY);
        self.set_color(color);
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    /// Paint the `src` region of `image` (image pixels) stretched onto `dst` (layout space).
    pub fn draw_image_region(&mut self, image: &PreparedImage, src: Rect, dst: Rect) {
        if src.width() <= 0.0 || src.height() <= 0.0 || dst.width() <= 0.0 || dst.height() <= 0.0
        {
            return;
        }
        let transform = Affine::translate((dst.x0, dst.y0))
            * Affine::scale_non_uniform(dst.width() / src.width(), dst.height() / src.height())
            * Affine::translate((-src.x0, -src.y0));
        self.begin(transform);
        self.ctx.set_paint(image.paint());
        self.ctx.fill_rect(&rect_to_cpu(src));
    }

    /// Paint the whole of `image`, mapping its pixel space through `transform`.
    pub fn draw_image_affine(&mut self, image: &PreparedImage, transform: Affine) {
        self.begin(transform);
        self.ctx.set_paint(image.paint());
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(image.width),
            f64::from(image.height),
        ));
    }

    /// Outline `rect`, given in the local space of `transform`.
    pub fn stroke_rect(&mut self, rect: Rect, transform: Affine, style: StrokeStyle) {
        self.begin(transform);
        self.set_color(style.color);
        self.ctx.set_stroke(style.to_cpu());
        self.ctx.stroke_rect(&rect_to_cpu(rect));
    }

    /// Fill a circle.
    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        self.begin(Affine::IDENTITY);
        self.set_color(color);
        self.ctx.fill_path(&circle_path(center, radius));
    }

    /// Outline a circle.
    pub fn stroke_circle(&mut self, center: Point, radius: f64, style: StrokeStyle) {
        self.begin(Affine::IDENTITY);
        self.set_color(style.color);
        self.ctx.set_stroke(style.to_cpu());
        self.ctx.stroke_path(&circle_path(center, radius));
    }

    /// Draw a shaped line vertically centered on `anchor.y`, aligned to `anchor.x`.
    ///
    /// A non-zero `skew` slants glyphs horizontally around the anchor (negative leans right).
    pub fn draw_text(&mut self, text: &ShapedText, anchor: Point, align: LabelAlign, skew: f64) {
        let w = text.width();
        let h = text.height();
        let dx = match align {
            LabelAlign::Left => 0.0,
            LabelAlign::Center => -w / 2.0,
            LabelAlign::Right => -w,
        };
        let transform = Affine::translate(anchor.to_vec2())
            * Affine::skew(skew, 0.0)
            * Affine::translate((dx, -h / 2.0));
        self.begin(transform);

        for line in text.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&text.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    /// Rasterize everything drawn so far.
    pub fn finish(mut self) -> RenderedImage {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        RenderedImage {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
        }
    }
}

/// Finished composite in premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8.
    pub data: Vec<u8>,
}

impl RenderedImage {
    /// Straight-alpha RGBA of one pixel, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let mut px = [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ];
        unpremultiply_rgba8_in_place(&mut px);
        Some(px)
    }

    /// Straight-alpha RGBA8 copy of the pixel data.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }

    /// Encode as PNG.
    pub fn to_png(&self) -> PhotostripResult<Vec<u8>> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.to_straight_rgba())
            .ok_or_else(|| PhotostripError::validation("rendered buffer size mismatch"))?;
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .context("encode png")?;
        Ok(out.into_inner())
    }

    /// Encode as a `data:image/png;base64,` URL.
    pub fn to_data_url(&self) -> PhotostripResult<String> {
        let png = self.to_png()?;
        Ok(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        ))
    }

    /// Encode as PNG and write to `path`.
    pub fn save_png(&self, path: &Path) -> PhotostripResult<()> {
        let png = self.to_png()?;
        std::fs::write(path, png).with_context(|| format!("write '{}'", path.display()))?;
        Ok(())
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn circle_path(center: Point, radius: f64) -> vello_cpu::kurbo::BezPath {
    vello_cpu::kurbo::Circle::new((center.x, center.y), radius).to_path(CIRCLE_TOLERANCE)
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
