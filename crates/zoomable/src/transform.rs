use zoomable_ui_graphics::{Point, Size};

/// Snapshot of a viewport's transform, as handed to renderers.
///
/// A content point `q` (unscaled content coordinates, origin at the content's
/// top-left) is drawn at
/// `viewport_center + translation + R(rotation) * scale * (q - content_size / 2)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: f32,
    pub translation: Point,
    /// Degrees, clockwise in screen space. Zero unless rotation is enabled.
    pub rotation: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        scale: 1.0,
        translation: Point::ZERO,
        rotation: 0.0,
    };

    pub fn map_content_point(
        &self,
        content_point: Point,
        content_size: Size,
        viewport_size: Size,
    ) -> Point {
        let relative = (content_point - content_size.center()) * self.scale;
        viewport_size.center() + self.translation + rotate(relative, self.rotation)
    }

    /// Inverse of [`Transform::map_content_point`]; `None` for a zero scale.
    pub fn map_viewport_point(
        &self,
        viewport_point: Point,
        content_size: Size,
        viewport_size: Size,
    ) -> Option<Point> {
        if self.scale.abs() <= f32::EPSILON {
            return None;
        }
        let relative = viewport_point - viewport_size.center() - self.translation;
        Some(content_size.center() + rotate(relative, -self.rotation) / self.scale)
    }

    /// Affine matrix `[a, b, c, d, e, f]` (column-major 2x3) mapping content
    /// coordinates to viewport coordinates:
    /// `x' = a * x + c * y + e`, `y' = b * x + d * y + f`.
    pub fn to_affine(&self, content_size: Size, viewport_size: Size) -> [f32; 6] {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let a = cos * self.scale;
        let b = sin * self.scale;
        let c = -sin * self.scale;
        let d = cos * self.scale;
        let origin = self.map_content_point(Point::ZERO, content_size, viewport_size);
        [a, b, c, d, origin.x, origin.y]
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn rotate(point: Point, degrees: f32) -> Point {
    if degrees == 0.0 {
        return point;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    Point::new(point.x * cos - point.y * sin, point.x * sin + point.y * cos)
}
