use super::*;
use crate::layout::catalog::LayoutCatalog;

fn layout(id: &str) -> LayoutTemplate {
    LayoutCatalog::builtin().get_by_id(id).unwrap().clone()
}

#[test]
fn defaults_match_documented_values() {
    let o = RenderOptions::default();
    assert!(o.show_text);
    assert!(!o.show_date && !o.show_location && !o.show_caption);
    assert_eq!(o.bg_color, "#ffffff");
    assert_eq!(o.scale, 1.0);
    assert_eq!(o.caption_style, CaptionStyle::Quoted);
}

#[test]
fn missing_json_fields_take_defaults() {
    let o: RenderOptions =
        serde_json::from_str(r#"{"showDate": true, "captionStyle": "dashed", "date": "2024-02-29"}"#)
            .unwrap();
    assert!(o.show_text);
    assert!(o.show_date);
    assert_eq!(o.caption_style, CaptionStyle::Dashed);
    assert_eq!(o.date, NaiveDate::from_ymd_opt(2024, 2, 29));
    assert_eq!(o.resolved_date(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
}

#[test]
fn lock_branding_forces_text() {
    let o = RenderOptions {
        show_text: false,
        ..RenderOptions::default()
    };
    assert!(!o.branding_visible(&layout("layout-6x2-2")));
    assert!(o.branding_visible(&layout("layout-6x4-1")));

    let mut no_text = layout("layout-6x4-1");
    no_text.text = None;
    assert!(!RenderOptions::default().branding_visible(&no_text));
}

#[test]
fn caption_and_location_require_flag_and_content() {
    let mut o = RenderOptions {
        caption_text: "  hi ".to_string(),
        location_text: "Paris".to_string(),
        ..RenderOptions::default()
    };
    assert_eq!(o.caption(), None);
    assert_eq!(o.location(), None);
    o.show_caption = true;
    o.show_location = true;
    assert_eq!(o.caption(), Some("hi"));
    assert_eq!(o.location(), Some("Paris"));
}

#[test]
fn output_size_scales_and_validates() {
    let l = layout("layout-6x2-2");
    assert_eq!(RenderOptions::default().output_size(&l).unwrap(), (600, 1800));
    assert_eq!(RenderOptions::thumbnail(0.2).output_size(&l).unwrap(), (120, 360));
    assert!(RenderOptions::thumbnail(0.0).output_size(&l).is_err());
    assert!(RenderOptions::thumbnail(f64::NAN).output_size(&l).is_err());
    assert!(RenderOptions::thumbnail(100.0).output_size(&l).is_err());
}
