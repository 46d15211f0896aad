use super::*;

fn aspect(r: Rect) -> f64 {
    r.width() / r.height()
}

#[test]
fn fnv_hash_is_stable_across_chunking() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"photostrip");
    let mut b = Fnv1a64::new_default();
    b.write_u8(b'p');
    b.write_bytes(b"hotostrip");
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn cover_fit_crops_wide_source_horizontally() {
    let dst = Rect::new(50.0, 50.0, 550.0, 800.0);
    let src = cover_fit_source_rect(1920.0, 1080.0, dst);
    assert!((aspect(src) - aspect(dst)).abs() < 1e-9);
    assert_eq!(src.y0, 0.0);
    assert_eq!(src.y1, 1080.0);
    assert!((src.x0 - (1920.0 - src.width()) / 2.0).abs() < 1e-9);
    assert!(src.x0 >= 0.0 && src.x1 <= 1920.0);
}

#[test]
fn cover_fit_crops_tall_source_vertically() {
    let dst = Rect::new(0.0, 0.0, 1000.0, 700.0);
    let src = cover_fit_source_rect(600.0, 1200.0, dst);
    assert!((aspect(src) - aspect(dst)).abs() < 1e-9);
    assert_eq!(src.x0, 0.0);
    assert_eq!(src.x1, 600.0);
    assert!((src.y0 - (1200.0 - src.height()) / 2.0).abs() < 1e-9);
}

#[test]
fn cover_fit_never_exceeds_source_bounds() {
    let sources = [(1.0, 1.0), (4000.0, 3000.0), (37.0, 911.0), (640.0, 480.0)];
    let dsts = [
        Rect::new(0.0, 0.0, 500.0, 750.0),
        Rect::new(10.0, 20.0, 1010.0, 420.0),
        Rect::new(0.0, 0.0, 3.0, 3.0),
    ];
    for (w, h) in sources {
        for dst in dsts {
            let src = cover_fit_source_rect(w, h, dst);
            assert!((aspect(src) - aspect(dst)).abs() < 1e-9);
            assert!(src.x0 >= -1e-9 && src.y0 >= -1e-9);
            assert!(src.x1 <= w + 1e-9 && src.y1 <= h + 1e-9);
            // One dimension is always kept in full: no gutters.
            assert!((src.width() - w).abs() < 1e-9 || (src.height() - h).abs() < 1e-9);
        }
    }
}

#[test]
fn local_world_roundtrip_under_rotation() {
    let center = Point::new(100.0, 50.0);
    let rot = 0.7;
    let p = Point::new(130.0, 95.0);
    let local = to_local(p, center, rot);
    let back = to_world(local, center, rot);
    assert!(distance(p, back) < 1e-9);
}

#[test]
fn rotate_quarter_turn() {
    let v = rotate_vec(Vec2::new(1.0, 0.0), std::f64::consts::FRAC_PI_2);
    assert!(v.x.abs() < 1e-12);
    assert!((v.y - 1.0).abs() < 1e-12);
}
