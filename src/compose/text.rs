//! Strings and tints of the text stack under the branding line.

use chrono::NaiveDate;

use crate::{
    compose::options::{CaptionStyle, RenderOptions},
    foundation::core::Rgba8,
};

/// Soft line-length limit for captions, in characters.
pub const CAPTION_LINE_LIMIT: usize = 35;

const ELLIPSIS: char = '…';

/// `DD/MM/YYYY`, zero padded.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Date and/or location joined with `" | "`; `None` when neither is requested.
pub fn meta_line(options: &RenderOptions, today: NaiveDate) -> Option<String> {
    let mut parts = Vec::with_capacity(2);
    if options.show_date {
        parts.push(format_date(today));
    }
    if let Some(loc) = options.location() {
        parts.push(loc.to_string());
    }
    (!parts.is_empty()).then(|| parts.join(" | "))
}

/// Greedy word wrap into at most two lines of [`CAPTION_LINE_LIMIT`] characters.
///
/// Words longer than the limit are split hard. Whatever does not fit on the first line goes to
/// the second, which is cut to the limit with a trailing ellipsis.
pub fn wrap_caption(text: &str) -> Vec<String> {
    let words = text.split_whitespace().collect::<Vec<_>>();
    if words.is_empty() {
        return Vec::new();
    }
    let joined = words.join(" ");
    if joined.chars().count() <= CAPTION_LINE_LIMIT {
        return vec![joined];
    }

    let mut first = String::new();
    let mut first_len = 0usize;
    let mut rest_start = words.len();
    let mut carry = String::new();
    for (i, word) in words.iter().enumerate() {
        let wlen = word.chars().count();
        let needed = if first_len == 0 { wlen } else { first_len + 1 + wlen };
        if needed <= CAPTION_LINE_LIMIT {
            if first_len > 0 {
                first.push(' ');
            }
            first.push_str(word);
            first_len = needed;
            continue;
        }
        if first_len == 0 {
            // Single overlong word: split it at the limit.
            first = word.chars().take(CAPTION_LINE_LIMIT).collect();
            carry = word.chars().skip(CAPTION_LINE_LIMIT).collect();
            rest_start = i + 1;
        } else {
            rest_start = i;
        }
        break;
    }

    let mut rest = carry;
    for word in &words[rest_start..] {
        if !rest.is_empty() {
            rest.push(' ');
        }
        rest.push_str(word);
    }

    let mut lines = vec![first];
    if !rest.is_empty() {
        lines.push(truncate_with_ellipsis(&rest, CAPTION_LINE_LIMIT));
    }
    lines
}

fn truncate_with_ellipsis(s: &str, limit: usize) -> String {
    if s.chars().count() <= limit {
        return s.to_string();
    }
    let mut out = s
        .chars()
        .take(limit.saturating_sub(1))
        .collect::<String>()
        .trim_end()
        .to_string();
    out.push(ELLIPSIS);
    out
}

/// Apply `style` around wrapped caption lines (prefix on the first, suffix on the last).
pub fn decorate_caption(mut lines: Vec<String>, style: CaptionStyle) -> Vec<String> {
    let (prefix, suffix) = match style {
        CaptionStyle::Quoted => ("\"", "\""),
        CaptionStyle::Dashed => ("— ", " —"),
        CaptionStyle::Questioning => ("— ", "?"),
    };
    if let Some(first) = lines.first_mut() {
        first.insert_str(0, prefix);
    }
    if let Some(last) = lines.last_mut() {
        last.push_str(suffix);
    }
    lines
}

/// Meta line tint: near-white over white branding, gray otherwise.
pub fn meta_color(branding: Rgba8) -> Rgba8 {
    if branding == Rgba8::WHITE {
        Rgba8::opaque(0xf5, 0xf5, 0xf5)
    } else {
        Rgba8::opaque(0x71, 0x71, 0x71)
    }
}

/// Caption tint, one step lighter than [`meta_color`].
pub fn caption_color(branding: Rgba8) -> Rgba8 {
    if branding == Rgba8::WHITE {
        Rgba8::opaque(0xe0, 0xe0, 0xe0)
    } else {
        Rgba8::opaque(0x9a, 0x9a, 0x9a)
    }
}

/// Archive stamp tint: a light stamp when branding is light, a translucent dark one otherwise.
pub fn archive_color(branding: Rgba8) -> Rgba8 {
    if branding.is_light() {
        Rgba8::WHITE.with_alpha(0x59)
    } else {
        Rgba8::BLACK.with_alpha(0x2e)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/text.rs"]
mod tests;
