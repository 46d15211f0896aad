use serde::{Deserialize, Serialize};

use crate::{
    foundation::core::Rect,
    foundation::error::{PhotostripError, PhotostripResult},
    layout::catalog::FrameOption,
};

/// A rectangle reserved for one photo, in layout pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Slot {
    /// Build a slot.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Slot rectangle moved vertically by `shift_y`.
    pub fn rect_shifted(&self, shift_y: f64) -> Rect {
        Rect::new(
            self.x,
            self.y + shift_y,
            self.x + self.width,
            self.y + shift_y + self.height,
        )
    }
}

/// Branding/title text anchor; the text is centered on `(x, y)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingText {
    /// Horizontal center.
    pub x: f64,
    /// Vertical center of the branding line.
    pub y: f64,
    /// Font size in layout pixels; every line of the text stack derives from it.
    pub font_size: f64,
    /// `#RRGGBB` color.
    pub color: String,
    /// Branding string.
    pub text: String,
    /// Preferred font family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

/// Horizontal alignment of an archive stamp relative to its anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelAlign {
    /// Anchor is the left edge.
    Left,
    /// Anchor is the center.
    #[default]
    Center,
    /// Anchor is the right edge.
    Right,
}

/// Faint stamp drawn on frameless layouts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveLabel {
    /// Stamp text.
    pub text: String,
    /// Font size in layout pixels.
    pub font_size: f64,
    /// Anchor x.
    pub x: f64,
    /// Anchor y (vertical center).
    pub y: f64,
    /// Alignment relative to `x`.
    #[serde(default)]
    pub align: LabelAlign,
}

/// Immutable description of an output: size, photo slots and optional overlays.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutTemplate {
    /// Catalog identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Free-form kind tag (`strip`, `postcard`, ...).
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Number of photos the layout expects; equals `slots.len()`.
    pub photo_count: usize,
    /// Photo slots; order defines photo-to-slot assignment.
    pub slots: Vec<Slot>,
    /// Branding text anchor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<BrandingText>,
    /// Frame overlay image reference. When present, slot geometry is fixed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Branding is always shown and cannot be toggled off.
    #[serde(default)]
    pub lock_branding: bool,
    /// Stamp drawn only when no frame image is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_label: Option<ArchiveLabel>,
}

/// How a host UI should present the branding toggle for a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrandingToggle {
    /// No branding available (no text anchor, or frame art carries its own).
    Hidden,
    /// Branding is forced on.
    Locked,
    /// The user may switch branding on and off.
    Free,
}

impl LayoutTemplate {
    /// Check geometric preconditions the compositor relies on.
    pub fn validate(&self) -> PhotostripResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PhotostripError::layout(format!(
                "layout '{}' must have positive width and height",
                self.id
            )));
        }
        if self.photo_count != self.slots.len() {
            return Err(PhotostripError::layout(format!(
                "layout '{}' declares {} photos but has {} slots",
                self.id,
                self.photo_count,
                self.slots.len()
            )));
        }
        for (i, s) in self.slots.iter().enumerate() {
            let finite = [s.x, s.y, s.width, s.height].iter().all(|v| v.is_finite());
            if !finite || s.width <= 0.0 || s.height <= 0.0 {
                return Err(PhotostripError::layout(format!(
                    "layout '{}' slot {i} must have finite, positive size",
                    self.id
                )));
            }
        }
        if let Some(t) = &self.text {
            if !t.font_size.is_finite() || t.font_size <= 0.0 {
                return Err(PhotostripError::layout(format!(
                    "layout '{}' text fontSize must be positive",
                    self.id
                )));
            }
        }
        if let Some(l) = &self.archive_label {
            if !l.font_size.is_finite() || l.font_size <= 0.0 {
                return Err(PhotostripError::layout(format!(
                    "layout '{}' archive label fontSize must be positive",
                    self.id
                )));
            }
        }
        Ok(())
    }

    /// Copy of this layout dressed with `frame`: its overlay image, and its slots when it has any.
    pub fn with_frame(&self, frame: &FrameOption) -> Self {
        let mut out = self.clone();
        out.image = frame.strip_image.clone();
        if let Some(slots) = &frame.slots {
            out.slots = slots.clone();
        }
        out
    }

    /// Branding toggle policy for host UIs.
    pub fn branding_toggle(&self) -> BrandingToggle {
        if self.text.is_none() || self.image.is_some() {
            BrandingToggle::Hidden
        } else if self.lock_branding {
            BrandingToggle::Locked
        } else {
            BrandingToggle::Free
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/template.rs"]
mod tests;
