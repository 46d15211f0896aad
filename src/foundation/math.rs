//! Geometry shared by the compositor and the sticker engine.

use crate::foundation::core::{Point, Rect, Vec2};

#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Source crop rectangle that fills `dst` with no letterboxing and no distortion.
///
/// When the source is wider than the destination (by aspect), the full source height is kept and
/// the width is cropped symmetrically; otherwise the full width is kept and the height is cropped
/// symmetrically.
pub fn cover_fit_source_rect(src_width: f64, src_height: f64, dst: Rect) -> Rect {
    let src_aspect = src_width / src_height;
    let dst_aspect = dst.width() / dst.height();

    if src_aspect > dst_aspect {
        let w = src_height * dst_aspect;
        let x = (src_width - w) / 2.0;
        Rect::new(x, 0.0, x + w, src_height)
    } else {
        let h = src_width / dst_aspect;
        let y = (src_height - h) / 2.0;
        Rect::new(0.0, y, src_width, y + h)
    }
}

/// Rotate `v` by `angle` radians (positive angles turn clockwise on a y-down canvas).
pub fn rotate_vec(v: Vec2, angle: f64) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (b - a).hypot()
}

/// Map a world point into the unrotated local frame of an object at `center`.
pub fn to_local(point: Point, center: Point, rotation: f64) -> Vec2 {
    rotate_vec(point - center, -rotation)
}

/// Map a local offset of an object at `center` back into world space.
pub fn to_world(local: Vec2, center: Point, rotation: f64) -> Point {
    center + rotate_vec(local, rotation)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
