use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    foundation::error::{PhotostripError, PhotostripResult},
    layout::template::LayoutTemplate,
};

/// Decoration applied around a caption.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionStyle {
    /// `"text"`
    #[default]
    Quoted,
    /// `— text —`
    Dashed,
    /// `— text?`
    Questioning,
}

/// Per-render switches and overlay inputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// Draw the branding text.
    pub show_text: bool,
    /// Include today's date in the meta line.
    pub show_date: bool,
    /// Include `location_text` in the meta line.
    pub show_location: bool,
    /// Draw the caption below the meta line.
    pub show_caption: bool,
    /// Location string; trimmed before use.
    pub location_text: String,
    /// Caption string; wrapped to at most two lines.
    pub caption_text: String,
    /// Caption decoration.
    pub caption_style: CaptionStyle,
    /// Background fill for frameless layouts, `#RRGGBB`.
    pub bg_color: String,
    /// Output multiplier (thumbnails use `0.2`).
    pub scale: f64,
    /// Date shown in the meta line; `None` means today in local time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_text: true,
            show_date: false,
            show_location: false,
            show_caption: false,
            location_text: String::new(),
            caption_text: String::new(),
            caption_style: CaptionStyle::Quoted,
            bg_color: "#ffffff".to_string(),
            scale: 1.0,
            date: None,
        }
    }
}

impl RenderOptions {
    /// Options used for frame thumbnails: defaults at the given scale.
    pub fn thumbnail(scale: f64) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    /// Whether branding is drawn for `layout`; `lock_branding` forces it on.
    pub fn branding_visible(&self, layout: &LayoutTemplate) -> bool {
        layout.text.is_some() && (self.show_text || layout.lock_branding)
    }

    /// Trimmed location, if it should be shown.
    pub fn location(&self) -> Option<&str> {
        let loc = self.location_text.trim();
        (self.show_location && !loc.is_empty()).then_some(loc)
    }

    /// Trimmed caption, if it should be shown.
    pub fn caption(&self) -> Option<&str> {
        let cap = self.caption_text.trim();
        (self.show_caption && !cap.is_empty()).then_some(cap)
    }

    /// Date to print, resolving `None` to the local current date.
    pub fn resolved_date(&self) -> NaiveDate {
        self.date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Check the scale factor against the layout and compute the output size in pixels.
    pub fn output_size(&self, layout: &LayoutTemplate) -> PhotostripResult<(u16, u16)> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(PhotostripError::validation(format!(
                "render scale must be finite and > 0, got {}",
                self.scale
            )));
        }
        fn dim(v: u32, scale: f64) -> PhotostripResult<u16> {
            let px = (f64::from(v) * scale).round().max(1.0);
            if px > f64::from(u16::MAX) {
                return Err(PhotostripError::validation(format!(
                    "scaled output dimension {px} exceeds {}",
                    u16::MAX
                )));
            }
            Ok(px as u16)
        }
        Ok((dim(layout.width, self.scale)?, dim(layout.height, self.scale)?))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/options.rs"]
mod tests;
