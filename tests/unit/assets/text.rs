use super::*;

fn book(names: &[&str]) -> FontBook {
    let mut b = FontBook::new();
    for n in names {
        b.add(*n, vec![0u8; 4]);
    }
    b
}

#[test]
fn empty_book_resolves_nothing() {
    let b = FontBook::new();
    assert!(b.is_empty());
    assert!(b.resolve(Some("Sriracha")).is_none());
    assert!(b.resolve(None).is_none());
}

#[test]
fn resolve_matches_family_prefix_loosely() {
    let b = book(&["GoogleSans-Regular", "Sriracha-Regular"]);
    assert_eq!(b.resolve(Some("Sriracha")).unwrap().name, "Sriracha-Regular");
    assert_eq!(b.resolve(Some("google sans")).unwrap().name, "GoogleSans-Regular");
}

#[test]
fn resolve_falls_back_to_first_face() {
    let b = book(&["GoogleSans-Regular", "Sriracha-Regular"]);
    assert_eq!(b.resolve(Some("Comic")).unwrap().name, "GoogleSans-Regular");
    assert_eq!(b.resolve(None).unwrap().name, "GoogleSans-Regular");
    assert_eq!(b.len(), 2);
}

#[test]
fn from_dir_loads_only_font_files() {
    let dir = std::env::temp_dir().join(format!("photostrip_fonts_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("B-Face.ttf"), [0u8; 8]).unwrap();
    std::fs::write(dir.join("A-Face.OTF"), [0u8; 8]).unwrap();
    std::fs::write(dir.join("notes.txt"), b"x").unwrap();

    let b = FontBook::from_dir(&dir).unwrap();
    assert_eq!(b.len(), 2);
    assert_eq!(b.resolve(None).unwrap().name, "A-Face");
}

#[test]
fn shaping_rejects_invalid_size() {
    let b = book(&["Broken"]);
    let mut engine = TextLayoutEngine::new();
    let face = b.resolve(None).unwrap();
    assert!(engine.shape_line(face, "hi", 0.0, Rgba8::BLACK).is_err());
    assert!(engine.shape_line(face, "hi", f32::NAN, Rgba8::BLACK).is_err());
}

#[test]
fn shaping_invalid_font_bytes_is_a_decode_error() {
    let b = book(&["Broken"]);
    let mut engine = TextLayoutEngine::new();
    let err = engine
        .shape_line(b.resolve(None).unwrap(), "hi", 12.0, Rgba8::BLACK)
        .err()
        .unwrap();
    assert!(matches!(err, PhotostripError::Decode(_)));
}

fn tuffy_bytes() -> Vec<u8> {
    std::fs::read(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/fonts/Tuffy.ttf")).unwrap()
}

#[test]
fn fixture_font_shapes_a_line() {
    let mut b = FontBook::new();
    b.add("Tuffy", tuffy_bytes());
    let mut engine = TextLayoutEngine::new();
    let shaped = engine
        .shape_line(b.resolve(Some("tuffy")).unwrap(), "Starlight Studio", 32.0, Rgba8::BLACK)
        .unwrap();
    assert!(shaped.width() > 100.0);
    assert!(shaped.height() > 20.0 && shaped.height() < 80.0);

    let wider = engine
        .shape_line(b.resolve(None).unwrap(), "Starlight Studio", 64.0, Rgba8::BLACK)
        .unwrap();
    assert!(wider.width() > shaped.width() * 1.8);
}

#[test]
fn fallback_face_only_used_when_nothing_registered() {
    let mut b = FontBook {
        faces: Vec::new(),
        fallback: Some(FontFace {
            name: "System".to_string(),
            bytes: Arc::new(tuffy_bytes()),
            index: 0,
        }),
    };
    assert!(b.is_empty());
    assert_eq!(b.resolve(Some("Sriracha")).unwrap().name, "System");
    assert_eq!(b.resolve(None).unwrap().name, "System");

    b.add("Mine", vec![0u8; 4]);
    assert_eq!(b.resolve(Some("Sriracha")).unwrap().name, "Mine");
}

#[test]
fn system_fallback_face_is_shapeable() {
    let b = FontBook::new().with_system_fallback();
    let Some(face) = b.fallback() else {
        return;
    };
    assert_eq!(b.resolve(None).unwrap().name, face.name);
    let mut engine = TextLayoutEngine::new();
    let shaped = engine.shape_line(face, "09/03/2024", 17.6, Rgba8::BLACK).unwrap();
    assert!(shaped.width() > 0.0);
}
