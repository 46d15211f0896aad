use std::sync::Arc;

use anyhow::Context;

use crate::{
    assets::{store::PreparedImage, text::system_fonts},
    foundation::error::{PhotostripError, PhotostripResult},
};

/// Long edge, in pixels, that SVG sources are rasterized to.
pub const SVG_RASTER_LONG_EDGE: u32 = 1024;

/// Decode encoded image bytes (any format `image` understands, or SVG) into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> PhotostripResult<PreparedImage> {
    if looks_like_svg(bytes) {
        return rasterize_svg(bytes);
    }

    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    PreparedImage::from_premul_bytes(width, height, rgba8_premul)
}

/// Parse SVG bytes into a `usvg` tree, resolving `<text>` against installed fonts.
pub fn parse_svg(bytes: &[u8]) -> PhotostripResult<Arc<usvg::Tree>> {
    let fonts = system_fonts();
    let mut opts = usvg::Options {
        fontdb: fonts.database(),
        ..Default::default()
    };
    if let Some(family) = fonts.fallback_family() {
        opts.font_family = family.to_string();
    }
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(Arc::new(tree))
}

fn rasterize_svg(bytes: &[u8]) -> PhotostripResult<PreparedImage> {
    let tree = parse_svg(bytes)?;
    let (width, height) = svg_raster_size(&tree)?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| PhotostripError::decode("failed to allocate svg pixmap"))?;
    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    // tiny-skia pixmaps are already premultiplied RGBA8.
    PreparedImage::from_premul_bytes(width, height, pixmap.take())
}

fn svg_raster_size(tree: &usvg::Tree) -> PhotostripResult<(u32, u32)> {
    let size = tree.size();
    let (w, h) = (f64::from(size.width()), f64::from(size.height()));
    if !w.is_finite() || !h.is_finite() || w <= 0.0 || h <= 0.0 {
        return Err(PhotostripError::decode("svg has invalid width/height"));
    }
    let k = f64::from(SVG_RASTER_LONG_EDGE) / w.max(h);
    Ok((
        ((w * k).round() as u32).max(1),
        ((h * k).round() as u32).max(1),
    ))
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = match std::str::from_utf8(head) {
        Ok(text) => text,
        // A multibyte character cut at the window edge.
        Err(e) if e.error_len().is_none() => {
            std::str::from_utf8(&head[..e.valid_up_to()]).unwrap_or_default()
        }
        Err(_) => return false,
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
