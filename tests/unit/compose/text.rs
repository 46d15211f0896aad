use super::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn date_is_zero_padded_day_month_year() {
    assert_eq!(format_date(date(2024, 3, 7)), "07/03/2024");
    assert_eq!(format_date(date(1999, 12, 31)), "31/12/1999");
}

#[test]
fn meta_line_joins_date_and_trimmed_location() {
    let today = date(2025, 1, 2);
    let mut o = RenderOptions::default();
    assert_eq!(meta_line(&o, today), None);

    o.show_date = true;
    assert_eq!(meta_line(&o, today).as_deref(), Some("02/01/2025"));

    o.show_location = true;
    o.location_text = "  Hanoi, Vietnam ".to_string();
    assert_eq!(
        meta_line(&o, today).as_deref(),
        Some("02/01/2025 | Hanoi, Vietnam")
    );

    o.show_date = false;
    assert_eq!(meta_line(&o, today).as_deref(), Some("Hanoi, Vietnam"));

    o.location_text = "   ".to_string();
    assert_eq!(meta_line(&o, today), None);
}

#[test]
fn short_caption_is_one_line() {
    let text = "a".repeat(CAPTION_LINE_LIMIT);
    assert_eq!(wrap_caption(&text), vec![text.clone()]);
    assert_eq!(wrap_caption("hello   world"), vec!["hello world".to_string()]);
    assert!(wrap_caption("   ").is_empty());
}

#[test]
fn caption_of_36_chars_wraps_without_truncation() {
    let spaced = "the quick brown fox jumps over a dog";
    assert_eq!(spaced.chars().count(), 36);
    let lines = wrap_caption(spaced);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines.join(" "), spaced);
    assert!(lines.iter().all(|l| !l.ends_with(ELLIPSIS)));

    let solid = "x".repeat(36);
    let lines = wrap_caption(&solid);
    assert_eq!(lines, vec!["x".repeat(35), "x".to_string()]);
}

#[test]
fn long_caption_truncates_second_line_with_ellipsis() {
    let words = std::iter::repeat("word").take(20).collect::<Vec<_>>().join(" ");
    assert_eq!(words.chars().count(), 99);
    let text = format!("{words}!");
    assert_eq!(text.chars().count(), 100);

    let lines = wrap_caption(&text);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].chars().count() <= CAPTION_LINE_LIMIT);
    assert!(lines[1].chars().count() <= CAPTION_LINE_LIMIT);
    assert!(lines[1].ends_with(ELLIPSIS));
}

#[test]
fn unicode_is_counted_in_chars() {
    let text = "é".repeat(35);
    assert_eq!(wrap_caption(&text).len(), 1);
}

#[test]
fn caption_decorations() {
    let one = vec!["hi there".to_string()];
    assert_eq!(decorate_caption(one.clone(), CaptionStyle::Quoted), vec!["\"hi there\""]);
    assert_eq!(decorate_caption(one.clone(), CaptionStyle::Dashed), vec!["— hi there —"]);
    assert_eq!(decorate_caption(one, CaptionStyle::Questioning), vec!["— hi there?"]);

    let two = vec!["first".to_string(), "second".to_string()];
    assert_eq!(
        decorate_caption(two, CaptionStyle::Quoted),
        vec!["\"first", "second\""]
    );
    assert!(decorate_caption(Vec::new(), CaptionStyle::Dashed).is_empty());
}

#[test]
fn tints_follow_branding_color() {
    assert_eq!(meta_color(Rgba8::WHITE), Rgba8::opaque(0xf5, 0xf5, 0xf5));
    assert_eq!(meta_color(Rgba8::BLACK), Rgba8::opaque(0x71, 0x71, 0x71));
    assert!(caption_color(Rgba8::BLACK).r > meta_color(Rgba8::BLACK).r);
    assert_eq!(archive_color(Rgba8::WHITE).r, 255);
    assert_eq!(archive_color(Rgba8::BLACK).r, 0);
    assert!(archive_color(Rgba8::BLACK).a < 128);
}
