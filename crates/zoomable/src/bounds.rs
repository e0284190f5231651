//! Translation bounds and edge release.
//!
//! The translation of a zoomed viewport may move the content until one of its
//! edges meets the viewport edge, so on each axis it lives in
//! `[-max, max]` with `max = max(0, content * scale - viewport) / 2`.

use zoomable_ui_graphics::{Point, Size};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub const ZERO: Bounds = Bounds {
        max_x: 0.0,
        max_y: 0.0,
    };

    /// Bounds before the first layout: translation is unconstrained.
    pub const UNBOUNDED: Bounds = Bounds {
        max_x: f32::INFINITY,
        max_y: f32::INFINITY,
    };

    pub fn new(max_x: f32, max_y: f32) -> Self {
        Self {
            max_x: max_x.abs().max(0.0),
            max_y: max_y.abs().max(0.0),
        }
    }

    pub fn compute(content: Size, viewport: Size, scale: f32) -> Self {
        Self {
            max_x: (content.width * scale - viewport.width).max(0.0) / 2.0,
            max_y: (content.height * scale - viewport.height).max(0.0) / 2.0,
        }
    }

    pub fn clamp(&self, translation: Point) -> Point {
        Point::new(
            translation.x.clamp(-self.max_x, self.max_x),
            translation.y.clamp(-self.max_y, self.max_y),
        )
    }

    pub fn contains(&self, translation: Point) -> bool {
        translation.x.abs() <= self.max_x && translation.y.abs() <= self.max_y
    }

    /// Whether dragging by `delta_x` from `current_x` runs into a horizontal
    /// edge, i.e. the movement belongs to a parent container.
    pub fn is_horizontal_drag_finished(&self, current_x: f32, delta_x: f32) -> bool {
        is_drag_finished(-self.max_x, self.max_x, current_x, delta_x)
    }

    pub fn is_vertical_drag_finished(&self, current_y: f32, delta_y: f32) -> bool {
        is_drag_finished(-self.max_y, self.max_y, current_y, delta_y)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::ZERO
    }
}

fn is_drag_finished(lower: f32, upper: f32, current: f32, delta: f32) -> bool {
    if lower == 0.0 && upper == 0.0 {
        return true;
    }
    let next = current + delta;
    next <= lower || next >= upper
}

/// Which drags a viewport hands to its parent once its own pan range is
/// exhausted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EdgeReleaseAxis {
    /// Horizontal drags at a left/right edge go to the parent (e.g. a pager).
    #[default]
    Horizontal,
    Vertical,
    /// The viewport consumes every drag.
    None,
}

impl EdgeReleaseAxis {
    /// Whether a drag of `pan` from `translation` should be released.
    ///
    /// Only drags that mostly run along the release axis qualify, so a
    /// vertical pan of content that fits horizontally is still consumed.
    pub fn should_release(&self, bounds: &Bounds, translation: Point, pan: Point) -> bool {
        match self {
            EdgeReleaseAxis::Horizontal => {
                pan.x != 0.0
                    && pan.x.abs() >= pan.y.abs()
                    && bounds.is_horizontal_drag_finished(translation.x, pan.x)
            }
            EdgeReleaseAxis::Vertical => {
                pan.y != 0.0
                    && pan.y.abs() >= pan.x.abs()
                    && bounds.is_vertical_drag_finished(translation.y, pan.y)
            }
            EdgeReleaseAxis::None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_grow_with_scale() {
        let content = Size::new(1000.0, 1000.0);
        let viewport = Size::new(500.0, 500.0);
        assert_eq!(
            Bounds::compute(content, viewport, 2.0),
            Bounds::new(750.0, 750.0)
        );
        assert_eq!(Bounds::compute(content, viewport, 0.25), Bounds::ZERO);
    }

    #[test]
    fn bounds_per_axis() {
        let bounds = Bounds::compute(Size::new(400.0, 800.0), Size::new(400.0, 400.0), 1.0);
        assert_eq!(bounds.max_x, 0.0);
        assert_eq!(bounds.max_y, 200.0);
    }

    #[test]
    fn clamp_into_bounds() {
        let bounds = Bounds::new(10.0, 20.0);
        assert_eq!(bounds.clamp(Point::new(50.0, -50.0)), Point::new(10.0, -20.0));
        assert!(bounds.contains(Point::new(-10.0, 20.0)));
        assert!(!bounds.contains(Point::new(10.5, 0.0)));
    }

    #[test]
    fn zero_bounds_always_finished() {
        let bounds = Bounds::ZERO;
        for delta in [-5.0, -0.1, 0.1, 5.0] {
            assert!(bounds.is_horizontal_drag_finished(0.0, delta));
            assert!(bounds.is_vertical_drag_finished(0.0, delta));
        }
    }

    #[test]
    fn finished_only_at_edges() {
        let bounds = Bounds::new(100.0, 100.0);
        assert!(!bounds.is_horizontal_drag_finished(0.0, 50.0));
        assert!(bounds.is_horizontal_drag_finished(80.0, 20.0));
        assert!(bounds.is_horizontal_drag_finished(80.0, 50.0));
        assert!(!bounds.is_horizontal_drag_finished(100.0, -10.0));
        assert!(bounds.is_vertical_drag_finished(-95.0, -10.0));
    }

    #[test]
    fn unbounded_never_finished() {
        assert!(!Bounds::UNBOUNDED.is_horizontal_drag_finished(1e6, 1e6));
    }

    #[test]
    fn release_follows_dominant_axis() {
        let fits_horizontally = Bounds::new(0.0, 300.0);
        let axis = EdgeReleaseAxis::Horizontal;
        assert!(axis.should_release(&fits_horizontally, Point::ZERO, Point::new(-20.0, 2.0)));
        assert!(!axis.should_release(&fits_horizontally, Point::ZERO, Point::new(2.0, -20.0)));
        assert!(!EdgeReleaseAxis::None.should_release(
            &Bounds::ZERO,
            Point::ZERO,
            Point::new(-20.0, 0.0)
        ));
        assert!(EdgeReleaseAxis::Vertical.should_release(
            &Bounds::ZERO,
            Point::ZERO,
            Point::new(0.0, 4.0)
        ));
    }
}
