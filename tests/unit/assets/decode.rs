use std::io::Cursor;

use super::*;

fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions() {
    let prepared = decode_image(&png_bytes(3, 2, [100, 50, 200, 128])).unwrap();
    assert_eq!(prepared.width, 3);
    assert_eq!(prepared.height, 2);
    assert!((prepared.aspect_ratio() - 1.5).abs() < 1e-12);
}

#[test]
fn decode_rejects_garbage() {
    assert!(decode_image(b"definitely not an image").is_err());
    assert!(decode_image(&[]).is_err());
}

#[test]
fn svg_is_rasterized_to_long_edge() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"><rect width="40" height="20" fill="#ff0000"/></svg>"##;
    let prepared = decode_image(svg).unwrap();
    assert_eq!(prepared.width, SVG_RASTER_LONG_EDGE);
    assert_eq!(prepared.height, SVG_RASTER_LONG_EDGE / 2);
}

#[test]
fn svg_detected_when_multibyte_char_straddles_sniff_window() {
    let open = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><!-- "#;
    let mut doc = String::from(open);
    // 'é' is two bytes; place it so it starts at byte 511.
    doc.push_str(&"a".repeat(511 - open.len()));
    doc.push_str("é -->");
    doc.push_str(r##"<rect width="10" height="10" fill="#00ff00"/></svg>"##);
    assert_eq!(doc.as_bytes()[511], 0xC3);
    assert!(std::str::from_utf8(&doc.as_bytes()[..512]).is_err());

    let prepared = decode_image(doc.as_bytes()).unwrap();
    assert_eq!(prepared.width, SVG_RASTER_LONG_EDGE);
    assert_eq!(prepared.height, SVG_RASTER_LONG_EDGE);
}

#[test]
fn non_utf8_bytes_are_not_svg() {
    assert!(!looks_like_svg(&[0xFF, 0xFE, b'<', b's', b'v', b'g']));
    assert!(looks_like_svg(b"  <?xml version=\"1.0\"?><svg/>"));
}

#[test]
fn svg_text_uses_system_fonts() {
    if crate::assets::text::system_fonts().fallback_family().is_none() {
        return;
    }
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="60"><text x="10" y="45" font-family="NoSuchFamily" font-size="40" fill="#000000">Hello</text></svg>"##;
    let tree = parse_svg(svg).unwrap();
    assert!(!tree.root().children().is_empty());
}

#[test]
fn svg_parse_ok_and_err() {
    let ok = br#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"></svg>"#;
    parse_svg(ok).unwrap();
    assert!(parse_svg(b"<svg").is_err());
}

#[test]
fn premultiply_then_unpremultiply_is_close() {
    let mut px = vec![100u8, 50, 200, 128, 9, 9, 9, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[50, 25, 100, 128]);
    assert_eq!(&px[4..], &[0, 0, 0, 0]);
    unpremultiply_rgba8_in_place(&mut px);
    for (got, want) in px[..3].iter().zip([100u8, 50, 200]) {
        assert!(got.abs_diff(want) <= 1);
    }
}
