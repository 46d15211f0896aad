//! Photostrip composites photo-booth prints: fixed layout templates, cover-fit photo slots,
//! optional frame art, a branding/date/caption text stack and free-form stickers.
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: `LayoutTemplate + RenderOptions -> LayoutPlan` (vertical centering, text stack)
//! 2. **Load**: photos, frame art and stickers decode into [`PreparedImage`]s; failures drop only
//!    the affected layer
//! 3. **Paint**: background, photos, frame, stickers, archive stamp, text onto a CPU [`Surface`]
//! 4. **Encode**: [`RenderedImage`] to PNG bytes or a `data:` URL
//!
//! Stickers live in a [`StickerEngine`] bound to one canvas. Pointer events drive drag, scale and
//! rotate gestures; each change notifies a [`RenderTrigger`] so the host can re-composite.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Premultiplied RGBA8** internally; PNG output is straight alpha.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod compose;
mod foundation;
mod layout;
mod location;
mod render;
mod sticker;

pub use assets::decode::{SVG_RASTER_LONG_EDGE, decode_image, parse_svg};
pub use assets::store::{
    AssetLoader, DEFAULT_IMAGE_CACHE_CAPACITY, ImageCache, ImageSource, PreparedImage,
    decode_data_url, normalize_rel_path,
};
pub use assets::text::{FontBook, FontFace, ShapedText, TextBrushRgba8, TextLayoutEngine};
pub use compose::options::{CaptionStyle, RenderOptions};
pub use compose::text::{
    CAPTION_LINE_LIMIT, archive_color, caption_color, decorate_caption, format_date, meta_color,
    meta_line, wrap_caption,
};
pub use foundation::core::{Affine, Canvas, Point, Rect, Rgba8, Vec2};
pub use foundation::error::{PhotostripError, PhotostripResult};
pub use foundation::math::{cover_fit_source_rect, distance, rotate_vec, to_local, to_world};
pub use layout::catalog::{FrameCatalog, FrameOption, LayoutCatalog};
pub use layout::solver::{LayoutPlan, TextLine, TextStack, vertical_shift};
pub use layout::template::{
    ArchiveLabel, BrandingText, BrandingToggle, LabelAlign, LayoutTemplate, Slot,
};
pub use location::cache::{
    CoordinateKey, Coordinates, LocationCache, LocationResolver, Place, ReverseGeocoder,
};
pub use render::compositor::{Compositor, CompositorConfig, FramePreview, PREVIEW_SCALE};
pub use render::sequence::{RenderSequencer, RenderTicket};
pub use render::surface::{RenderedImage, StrokeStyle, Surface};
pub use sticker::engine::{
    HANDLE_RADIUS, Interaction, PointerEvent, PointerPhase, PointerSource, StickerEngine,
};
pub use sticker::model::{MAX_SCALE, MIN_SCALE, STICKER_BASE_WIDTH, Sticker, StickerId, clamp_scale};
pub use sticker::trigger::{RedrawFlag, RenderTrigger};
