use crate::{
    assets::store::PreparedImage,
    foundation::core::{Affine, Point, Rect, Vec2},
    foundation::math::{distance, to_local, to_world},
};

/// Unscaled sticker width in canvas pixels; height follows the image aspect ratio.
pub const STICKER_BASE_WIDTH: f64 = 250.0;
/// Smallest allowed sticker scale.
pub const MIN_SCALE: f64 = 0.2;
/// Largest allowed sticker scale.
pub const MAX_SCALE: f64 = 5.0;

/// Stable sticker identifier, unique within one engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StickerId(pub u64);

/// A placed decoration: center position, unscaled size, uniform scale and rotation.
#[derive(Clone, Debug)]
pub struct Sticker {
    /// Identifier.
    pub id: StickerId,
    /// Decoded image.
    pub image: PreparedImage,
    /// Center x in canvas coordinates.
    pub x: f64,
    /// Center y in canvas coordinates.
    pub y: f64,
    /// Unscaled width.
    pub width: f64,
    /// Unscaled height.
    pub height: f64,
    /// Uniform scale, kept within [`MIN_SCALE`]..=[`MAX_SCALE`].
    pub scale: f64,
    /// Rotation in radians, clockwise on screen.
    pub rotation: f64,
}

/// Clamp a scale factor into the allowed range; non-finite input maps to `1`.
pub fn clamp_scale(scale: f64) -> f64 {
    if scale.is_finite() {
        scale.clamp(MIN_SCALE, MAX_SCALE)
    } else {
        1.0
    }
}

impl Sticker {
    /// Sticker centered on `center`, 250 px wide before scaling.
    pub fn new(id: StickerId, image: PreparedImage, center: Point, scale: f64) -> Self {
        let height = STICKER_BASE_WIDTH / image.aspect_ratio();
        Self {
            id,
            image,
            x: center.x,
            y: center.y,
            width: STICKER_BASE_WIDTH,
            height,
            scale: clamp_scale(scale),
            rotation: 0.0,
        }
    }

    /// Center point.
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Half extents after scaling.
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width * self.scale / 2.0, self.height * self.scale / 2.0)
    }

    /// Unscaled half diagonal; the transform handle's distance from center at scale 1.
    pub fn base_radius(&self) -> f64 {
        (self.width / 2.0).hypot(self.height / 2.0)
    }

    /// Oriented bounding box test.
    pub fn contains(&self, point: Point) -> bool {
        let local = to_local(point, self.center(), self.rotation);
        let half = self.half_extents();
        local.x.abs() <= half.x && local.y.abs() <= half.y
    }

    /// World position of the rotated bottom-right corner.
    pub fn handle_position(&self) -> Point {
        to_world(self.half_extents(), self.center(), self.rotation)
    }

    /// Whether `point` is within `reach` of the transform handle.
    pub fn handle_contains(&self, point: Point, reach: f64) -> bool {
        distance(point, self.handle_position()) <= reach
    }

    /// Translate to the center, then rotate.
    pub fn local_transform(&self) -> Affine {
        Affine::translate((self.x, self.y)) * Affine::rotate(self.rotation)
    }

    /// Map image pixels onto the canvas.
    pub fn image_transform(&self) -> Affine {
        self.local_transform()
            * Affine::scale(self.scale)
            * Affine::translate((-self.width / 2.0, -self.height / 2.0))
            * Affine::scale_non_uniform(
                self.width / f64::from(self.image.width),
                self.height / f64::from(self.image.height),
            )
    }

    /// Scaled bounds in the frame of [`Sticker::local_transform`].
    pub fn local_bounds(&self) -> Rect {
        let half = self.half_extents();
        Rect::new(-half.x, -half.y, half.x, half.y)
    }

    /// Point the handle at `pointer`: scale from distance, rotation from angle.
    pub fn aim_handle(&mut self, pointer: Point) {
        let d = pointer - self.center();
        self.scale = clamp_scale(d.hypot() / self.base_radius());
        self.rotation = d.y.atan2(d.x) - self.height.atan2(self.width);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sticker/model.rs"]
mod tests;
