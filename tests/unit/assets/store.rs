use std::io::Cursor;

use base64::Engine as _;

use super::*;

fn png_bytes(rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("photostrip_store_{name}_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn normalize_rel_path_rules() {
    assert_eq!(normalize_rel_path("a/./b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("../up.png").is_err());
    assert!(normalize_rel_path("./.").is_err());
    assert!(normalize_rel_path("").is_err());
}

#[test]
fn data_url_roundtrip_through_loader() {
    let payload = base64::engine::general_purpose::STANDARD.encode(png_bytes([1, 2, 3, 255]));
    let url = format!("data:image/png;base64,{payload}");
    let src = ImageSource::from_reference(&url);
    assert!(matches!(src, ImageSource::DataUrl(_)));
    let img = AssetLoader::default().load(&src).unwrap();
    assert_eq!((img.width, img.height), (2, 2));
}

#[test]
fn data_url_requires_base64() {
    assert!(decode_data_url("data:text/plain,hello").is_err());
    assert!(decode_data_url("image/png;base64,AAAA").is_err());
    assert!(decode_data_url("data:image/png;base64").is_err());
}

#[test]
fn loader_reads_relative_paths_from_root() {
    let dir = temp_dir("loader");
    std::fs::write(dir.join("p.png"), png_bytes([9, 9, 9, 255])).unwrap();
    let loader = AssetLoader::new(&dir);
    let img = loader.load(&ImageSource::from_reference("p.png")).unwrap();
    assert_eq!(img.width, 2);
    assert!(loader.load(&ImageSource::from_reference("missing.png")).is_err());
}

#[test]
fn cache_reports_failures_in_place_and_caches_successes() {
    let loader = AssetLoader::default();
    let good = ImageSource::Bytes(png_bytes([255, 0, 0, 255]).into());
    let bad = ImageSource::Bytes(Arc::from(&b"junk"[..]));
    let prepared = ImageSource::Prepared(PreparedImage::solid(1, 1, [0, 0, 0, 255]).unwrap());

    let mut cache = ImageCache::new();
    let out = cache.load_all(&loader, &[good.clone(), bad, prepared]);
    assert_eq!(out.len(), 3);
    assert!(out[0].is_ok());
    assert!(out[1].is_err());
    assert!(out[2].is_ok());
    assert_eq!(cache.len(), 1);

    cache.load(&loader, &good).unwrap();
    assert_eq!(cache.len(), 1);
    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn cache_evicts_least_recently_used_beyond_capacity() {
    let loader = AssetLoader::default();
    let shots = (0u8..3)
        .map(|i| ImageSource::Bytes(png_bytes([i, 0, 0, 255]).into()))
        .collect::<Vec<_>>();

    let mut cache = ImageCache::with_capacity(2);
    assert_eq!(cache.capacity(), 2);
    cache.load(&loader, &shots[0]).unwrap();
    cache.load(&loader, &shots[1]).unwrap();
    // Touch the first shot so the second becomes the oldest.
    cache.load(&loader, &shots[0]).unwrap();
    cache.load(&loader, &shots[2]).unwrap();

    assert_eq!(cache.len(), 2);
    assert!(cache.contains(&shots[0]));
    assert!(!cache.contains(&shots[1]));
    assert!(cache.contains(&shots[2]));
}

#[test]
fn repeated_retakes_stay_within_capacity() {
    let loader = AssetLoader::default();
    let mut cache = ImageCache::with_capacity(4);
    for take in 0u8..20 {
        let batch = [
            ImageSource::Bytes(png_bytes([take, 1, 0, 255]).into()),
            ImageSource::Bytes(png_bytes([take, 2, 0, 255]).into()),
        ];
        assert!(cache.load_all(&loader, &batch).iter().all(Result::is_ok));
        assert!(cache.len() <= 4);
    }
    assert_eq!(cache.len(), 4);
}

#[test]
fn zero_capacity_disables_caching() {
    let loader = AssetLoader::default();
    let mut cache = ImageCache::with_capacity(0);
    let src = ImageSource::Bytes(png_bytes([5, 5, 5, 255]).into());
    assert!(cache.load(&loader, &src).is_ok());
    assert!(cache.is_empty());
}

#[test]
fn solid_image_has_requested_size() {
    let img = PreparedImage::solid(4, 3, [10, 20, 30, 255]).unwrap();
    assert_eq!((img.width, img.height), (4, 3));
    assert!(PreparedImage::solid(0, 3, [0, 0, 0, 0]).is_err());
}
