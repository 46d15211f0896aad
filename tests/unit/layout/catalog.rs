use super::*;

#[test]
fn builtin_catalog_lookups() {
    let c = LayoutCatalog::builtin();
    assert_eq!(c.len(), 6);
    let l = c.get_by_id("layout-6x2-4").unwrap();
    assert_eq!(l.photo_count, 4);
    assert_eq!((l.width, l.height), (600, 1800));
    assert!(c.get_by_id("layout-nope").is_none());
    assert!(c.iter().all(|l| l.validate().is_ok()));
}

#[test]
fn postcards_lock_branding_strips_do_not() {
    let c = LayoutCatalog::builtin();
    for l in c.iter() {
        assert_eq!(l.lock_branding, l.kind == "postcard", "{}", l.id);
    }
}

#[test]
fn from_json_validates_and_rejects_duplicates() {
    let one = r#"{"id":"a","width":10,"height":10,"photoCount":1,"slots":[{"x":0,"y":0,"width":10,"height":10}]}"#;
    let c = LayoutCatalog::from_json(&format!("[{one}]")).unwrap();
    assert_eq!(c.get_by_id("a").unwrap().slots.len(), 1);

    assert!(LayoutCatalog::from_json(&format!("[{one},{one}]")).is_err());

    let bad = r#"[{"id":"b","width":10,"height":10,"photoCount":2,"slots":[]}]"#;
    assert!(matches!(
        LayoutCatalog::from_json(bad),
        Err(PhotostripError::Layout(_))
    ));
    assert!(matches!(
        LayoutCatalog::from_json("{"),
        Err(PhotostripError::Serde(_))
    ));
}

#[test]
fn frames_filter_by_layout() {
    let f = FrameCatalog::builtin();
    let ids = f
        .frames_for_layout("layout-6x4-4")
        .map(|f| f.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["default-6x4-4", "kodak-6x4-4"]);
    assert_eq!(f.frames_for_layout("layout-6x2-2").count(), 1);
    assert_eq!(f.frames_for_layout("unknown").count(), 0);
}

#[test]
fn frame_catalog_from_json() {
    let json = r#"[{"id":"f","name":"F","layoutId":"a","stripImage":"f.png"}]"#;
    let f = FrameCatalog::from_json(json).unwrap();
    let frame = f.get_by_id("f").unwrap();
    assert_eq!(frame.strip_image.as_deref(), Some("f.png"));
    assert!(frame.slots.is_none());
}
