use chrono::NaiveDate;

use crate::{
    compose::options::RenderOptions,
    compose::text::{decorate_caption, meta_line, wrap_caption},
    foundation::core::Rect,
    layout::template::LayoutTemplate,
};

const BRANDING_ADVANCE: f64 = 1.3;
const META_SIZE: f64 = 0.55;
const META_ADVANCE: f64 = 1.1;
const CAPTION_SIZE: f64 = 0.5;
const CAPTION_LINE_HEIGHT: f64 = 1.2;

/// One centered line of the text stack, in unshifted layout coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    /// Text to draw.
    pub text: String,
    /// Vertical center.
    pub center_y: f64,
    /// Font size.
    pub font_size: f64,
}

impl TextLine {
    fn band(&self) -> (f64, f64) {
        let half = self.font_size / 2.0;
        (self.center_y - half, self.center_y + half)
    }
}

/// Branding, meta and caption lines stacked under the layout's text anchor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextStack {
    /// Horizontal center shared by every line.
    pub x: f64,
    /// Branding line.
    pub branding: Option<TextLine>,
    /// Date/location line.
    pub meta: Option<TextLine>,
    /// Caption lines (zero to two).
    pub caption: Vec<TextLine>,
}

impl TextStack {
    /// Lay out the stack for `layout` under `options`. Empty when the layout has no text anchor.
    pub fn resolve(layout: &LayoutTemplate, options: &RenderOptions, today: NaiveDate) -> Self {
        let Some(anchor) = &layout.text else {
            return Self::default();
        };
        let fs = anchor.font_size;
        let mut cursor = anchor.y;
        let mut stack = Self {
            x: anchor.x,
            ..Self::default()
        };

        if options.branding_visible(layout) {
            stack.branding = Some(TextLine {
                text: anchor.text.clone(),
                center_y: cursor,
                font_size: fs,
            });
            cursor += BRANDING_ADVANCE * fs;
        }

        if let Some(text) = meta_line(options, today) {
            stack.meta = Some(TextLine {
                text,
                center_y: cursor,
                font_size: META_SIZE * fs,
            });
            cursor += META_ADVANCE * fs;
        }

        if let Some(caption) = options.caption() {
            let size = CAPTION_SIZE * fs;
            let lines = decorate_caption(wrap_caption(caption), options.caption_style);
            stack.caption = lines
                .into_iter()
                .enumerate()
                .map(|(i, text)| TextLine {
                    text,
                    center_y: cursor + (i as f64) * CAPTION_LINE_HEIGHT * size,
                    font_size: size,
                })
                .collect();
        }

        stack
    }

    /// Every line in paint order.
    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.branding
            .iter()
            .chain(self.meta.iter())
            .chain(self.caption.iter())
    }

    fn extent(&self) -> Option<(f64, f64)> {
        self.lines().map(TextLine::band).reduce(|a, b| (a.0.min(b.0), a.1.max(b.1)))
    }
}

/// Resolved geometry for one render: vertical shift, shifted slots and the text stack.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutPlan {
    /// Offset applied to every slot and text line.
    pub shift_y: f64,
    /// Slot rectangles with `shift_y` applied.
    pub slots: Vec<Rect>,
    /// Unshifted text stack.
    pub text: TextStack,
}

impl LayoutPlan {
    /// Center the content of `layout` vertically unless a frame image fixes the geometry.
    pub fn resolve(layout: &LayoutTemplate, options: &RenderOptions, today: NaiveDate) -> Self {
        let text = TextStack::resolve(layout, options, today);
        let shift_y = vertical_shift(layout, &text);
        tracing::debug!(layout = %layout.id, shift_y, "resolved layout plan");
        Self {
            shift_y,
            slots: layout.slots.iter().map(|s| s.rect_shifted(shift_y)).collect(),
            text,
        }
    }
}

/// `(height - content) / 2 - min_y` over slots and text bands; `0` with a frame image.
pub fn vertical_shift(layout: &LayoutTemplate, text: &TextStack) -> f64 {
    if layout.image.is_some() {
        return 0.0;
    }

    let slots = layout
        .slots
        .iter()
        .map(|s| (s.y, s.y + s.height))
        .reduce(|a, b| (a.0.min(b.0), a.1.max(b.1)));
    let extent = match (slots, text.extent()) {
        (Some(a), Some(b)) => (a.0.min(b.0), a.1.max(b.1)),
        (Some(a), None) | (None, Some(a)) => a,
        (None, None) => return 0.0,
    };

    let (min_y, max_y) = extent;
    (f64::from(layout.height) - (max_y - min_y)) / 2.0 - min_y
}

#[cfg(test)]
#[path = "../../tests/unit/layout/solver.rs"]
mod tests;
