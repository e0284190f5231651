//! Scale and translation of one zoomable viewport.
//!
//! Each of scale, translation x and translation y is an [`Animatable`] with
//! at most one animation in flight. Starting a new animation on a field
//! cancels the previous one where it stands. User input (drag, pinch)
//! cancels inertia. Bounds follow the scale synchronously: every scale step
//! recomputes them and re-clamps the translation before observers are
//! notified, so an observer never sees an out-of-bounds translation.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use zoomable_animation::{Animatable, AnimationType, ExponentialDecaySpec};
use zoomable_core::{FrameClock, Observers, Subscription};
use zoomable_ui_graphics::{Point, Size};

use crate::bounds::Bounds;
use crate::error::{validate_scale_range, ZoomConfigError};
use crate::saved_state::SavedZoomState;
use crate::transform::Transform;
use crate::zoom_math::translation_after_zoom;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Layout {
    content: Size,
    viewport: Size,
}

/// Translation tied to the scale while a focal zoom or reset animates:
/// interpolated linearly in scale between the start and end states.
///
/// Linear in scale is exactly what keeps a focal point fixed, so the focal
/// point stays put on every frame, not only at the end.
#[derive(Clone, Copy, Debug)]
struct LinkedTranslation {
    start_scale: f32,
    end_scale: f32,
    start: Point,
    end: Point,
}

impl LinkedTranslation {
    fn at(&self, scale: f32) -> Point {
        let span = self.end_scale - self.start_scale;
        if span.abs() <= f32::EPSILON {
            return self.end;
        }
        let progress = (scale - self.start_scale) / span;
        self.start + (self.end - self.start) * progress
    }
}

struct ZoomStateInner {
    min_scale: f32,
    max_scale: f32,
    scale: Animatable,
    x: Animatable,
    y: Animatable,
    rotation: Cell<f32>,
    rotation_enabled: Cell<bool>,
    layout: Cell<Option<Layout>>,
    bounds: Cell<Bounds>,
    linked: Cell<Option<LinkedTranslation>>,
    fling_decay: Cell<ExponentialDecaySpec>,
    observers: Observers<Transform>,
}

impl ZoomStateInner {
    fn translation(&self) -> Point {
        Point::new(self.x.value(), self.y.value())
    }

    fn transform(&self) -> Transform {
        Transform {
            scale: self.scale.value(),
            translation: self.translation(),
            rotation: self.rotation.get(),
        }
    }

    fn notify(&self) {
        self.observers.notify(&self.transform());
    }

    fn clamp_scale(&self, scale: f32) -> f32 {
        scale.clamp(self.min_scale, self.max_scale)
    }

    fn refresh_bounds(&self) {
        if let Some(layout) = self.layout.get() {
            let bounds = Bounds::compute(layout.content, layout.viewport, self.scale.value());
            self.apply_bounds(bounds);
        }
    }

    fn apply_bounds(&self, bounds: Bounds) {
        self.bounds.set(bounds);
        self.x.update_bounds(-bounds.max_x, bounds.max_x);
        self.y.update_bounds(-bounds.max_y, bounds.max_y);
    }

    fn on_scale_frame(&self) {
        self.refresh_bounds();
        if let Some(linked) = self.linked.get() {
            let translation = linked.at(self.scale.value());
            self.x.snap_to(translation.x);
            self.y.snap_to(translation.y);
            if !self.scale.is_running() {
                self.linked.set(None);
            }
        }
        self.notify();
    }

    fn stop_all(&self) {
        self.linked.set(None);
        self.scale.stop();
        self.x.stop();
        self.y.stop();
    }
}

/// Transform state of one viewport. Clones share the same state.
#[derive(Clone)]
pub struct ZoomState {
    inner: Rc<ZoomStateInner>,
}

impl ZoomState {
    /// Creates a state at `min_scale` with zero translation.
    ///
    /// # Panics
    ///
    /// If `min_scale` is not positive or not below `max_scale`. Use
    /// [`ZoomState::try_new`] to handle that as an error.
    pub fn new(min_scale: f32, max_scale: f32, frame_clock: FrameClock) -> Self {
        match Self::try_new(min_scale, max_scale, frame_clock) {
            Ok(state) => state,
            Err(err) => panic!("invalid zoom state: {err}"),
        }
    }

    pub fn try_new(
        min_scale: f32,
        max_scale: f32,
        frame_clock: FrameClock,
    ) -> Result<Self, ZoomConfigError> {
        validate_scale_range(min_scale, max_scale)?;

        let scale = Animatable::new(min_scale, frame_clock.clone(), "scale");
        scale.update_bounds(min_scale, max_scale);
        let inner = Rc::new(ZoomStateInner {
            min_scale,
            max_scale,
            scale,
            x: Animatable::new(0.0, frame_clock.clone(), "translation_x"),
            y: Animatable::new(0.0, frame_clock, "translation_y"),
            rotation: Cell::new(0.0),
            rotation_enabled: Cell::new(false),
            layout: Cell::new(None),
            bounds: Cell::new(Bounds::UNBOUNDED),
            linked: Cell::new(None),
            fling_decay: Cell::new(ExponentialDecaySpec::default()),
            observers: Observers::new(),
        });

        let weak: Weak<ZoomStateInner> = Rc::downgrade(&inner);
        inner.scale.set_on_frame(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.on_scale_frame();
            }
        });
        for axis in [&inner.x, &inner.y] {
            let weak: Weak<ZoomStateInner> = Rc::downgrade(&inner);
            axis.set_on_frame(move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.notify();
                }
            });
        }

        Ok(Self { inner })
    }

    /// Rebuilds a state from a snapshot. The translation is re-clamped once
    /// a layout is set.
    pub fn restore(
        saved: SavedZoomState,
        frame_clock: FrameClock,
    ) -> Result<Self, ZoomConfigError> {
        let state = Self::try_new(saved.min_scale, saved.max_scale, frame_clock)?;
        let inner = &state.inner;
        if saved.scale.is_finite() {
            inner.scale.snap_to(inner.clamp_scale(saved.scale));
        }
        if saved.translation_x.is_finite() && saved.translation_y.is_finite() {
            inner.x.snap_to(saved.translation_x);
            inner.y.snap_to(saved.translation_y);
        }
        Ok(state)
    }

    pub fn save(&self) -> SavedZoomState {
        let translation = self.translation();
        SavedZoomState {
            translation_x: translation.x,
            translation_y: translation.y,
            scale: self.scale(),
            min_scale: self.inner.min_scale,
            max_scale: self.inner.max_scale,
        }
    }

    pub fn min_scale(&self) -> f32 {
        self.inner.min_scale
    }

    pub fn max_scale(&self) -> f32 {
        self.inner.max_scale
    }

    pub fn scale(&self) -> f32 {
        self.inner.scale.value()
    }

    pub fn translation(&self) -> Point {
        self.inner.translation()
    }

    pub fn rotation(&self) -> f32 {
        self.inner.rotation.get()
    }

    /// Current translation bounds; [`Bounds::UNBOUNDED`] until the first
    /// [`ZoomState::set_layout`].
    pub fn bounds(&self) -> Bounds {
        self.inner.bounds.get()
    }

    pub fn content_size(&self) -> Option<Size> {
        self.inner.layout.get().map(|layout| layout.content)
    }

    pub fn viewport_size(&self) -> Option<Size> {
        self.inner.layout.get().map(|layout| layout.viewport)
    }

    pub fn transform(&self) -> Transform {
        self.inner.transform()
    }

    /// Whether any of scale, translation x or translation y is animating.
    pub fn is_animating(&self) -> bool {
        self.inner.scale.is_running() || self.is_flinging()
    }

    pub fn is_scale_animating(&self) -> bool {
        self.inner.scale.is_running()
    }

    pub fn is_flinging(&self) -> bool {
        self.inner.x.is_running() || self.inner.y.is_running()
    }

    /// Target of the running scale animation, if any.
    pub fn scale_target(&self) -> Option<f32> {
        self.inner.scale.target()
    }

    /// Calls `listener` with the new transform after every mutation and
    /// every animation step, until the subscription is dropped.
    pub fn subscribe(&self, listener: impl Fn(&Transform) + 'static) -> Subscription {
        self.inner.observers.subscribe(listener)
    }

    pub fn set_rotation_enabled(&self, enabled: bool) {
        self.inner.rotation_enabled.set(enabled);
        if !enabled && self.inner.rotation.get() != 0.0 {
            self.inner.rotation.set(0.0);
            self.inner.notify();
        }
    }

    pub fn set_fling_decay(&self, decay: ExponentialDecaySpec) {
        self.inner.fling_decay.set(decay);
    }

    /// Sets the scale immediately, clamped to `[min_scale, max_scale]`,
    /// cancelling any scale animation. Snapping to the current scale while
    /// nothing animates it changes nothing.
    pub fn snap_scale_to(&self, target: f32) {
        let inner = &self.inner;
        if !target.is_finite() {
            log::warn!("ignoring non-finite scale {target}");
            return;
        }
        let target = inner.clamp_scale(target);
        if !inner.scale.is_running() && inner.scale.value() == target {
            return;
        }
        inner.linked.set(None);
        inner.scale.snap_to(target);
        inner.refresh_bounds();
        inner.notify();
    }

    /// Animates the scale to `target` (clamped). A later call supersedes
    /// this one; the translation only follows through bound clamping.
    pub fn animate_scale_to(&self, target: f32, animation: AnimationType) {
        let inner = &self.inner;
        if !target.is_finite() {
            log::warn!("ignoring non-finite scale {target}");
            return;
        }
        let target = inner.clamp_scale(target);
        log::debug!("animate scale {} -> {}", inner.scale.value(), target);
        inner.linked.set(None);
        inner.scale.animate_to(target, animation);
    }

    /// Animates the scale to `target` (clamped) while moving the translation
    /// so that the content under `focal` (viewport coordinates) stays under
    /// it, as far as the bounds at the target scale allow.
    pub fn animate_scale_to_point(&self, target: f32, focal: Point, animation: AnimationType) {
        let inner = &self.inner;
        if !target.is_finite() || !focal.is_finite() {
            log::warn!("ignoring focal zoom to {target} at {focal:?}");
            return;
        }
        let Some(layout) = inner.layout.get() else {
            self.animate_scale_to(target, animation);
            return;
        };

        let target = inner.clamp_scale(target);
        let start_scale = inner.scale.value();
        let start = inner.translation();
        let end = Bounds::compute(layout.content, layout.viewport, target).clamp(
            translation_after_zoom(
                focal,
                layout.viewport.center(),
                start,
                target / start_scale,
            ),
        );
        log::debug!(
            "animate scale {} -> {} around {:?}, translation {:?} -> {:?}",
            start_scale,
            target,
            focal,
            start,
            end
        );

        inner.x.stop();
        inner.y.stop();
        if (target - start_scale).abs() <= f32::EPSILON {
            inner.linked.set(None);
            inner.scale.stop();
            inner.x.animate_to(end.x, animation);
            inner.y.animate_to(end.y, animation);
            return;
        }
        inner.linked.set(Some(LinkedTranslation {
            start_scale,
            end_scale: target,
            start,
            end,
        }));
        inner.scale.animate_to(target, animation);
    }

    /// Moves the content by `delta`, clamped to the bounds, cancelling any
    /// fling. Both axes change before observers are notified. Returns the
    /// part of `delta` that was applied.
    pub fn drag_by(&self, delta: Point) -> Point {
        let inner = &self.inner;
        if !delta.is_finite() {
            log::warn!("ignoring non-finite drag {delta:?}");
            return Point::ZERO;
        }
        inner.linked.set(None);
        let before = inner.translation();
        inner.x.snap_to(before.x + delta.x);
        inner.y.snap_to(before.y + delta.y);
        let after = inner.translation();
        if after != before {
            inner.notify();
        }
        after - before
    }

    /// Starts an independent decay on each translation axis with half of
    /// `velocity` (units per second).
    pub fn fling_with(&self, velocity: Point) {
        let inner = &self.inner;
        if !velocity.is_finite() {
            log::warn!("ignoring non-finite fling velocity {velocity:?}");
            return;
        }
        let initial = velocity / 2.0;
        let decay = inner.fling_decay.get();
        log::debug!("fling from {:?} at {:?}", inner.translation(), initial);
        inner.linked.set(None);
        inner.x.animate_decay(initial.x, decay);
        inner.y.animate_decay(initial.y, decay);
    }

    /// Sets the content and viewport sizes. Bounds are recomputed and the
    /// translation re-clamped immediately, including mid-fling.
    pub fn set_layout(&self, content: Size, viewport: Size) {
        let inner = &self.inner;
        let layout = Layout { content, viewport };
        if inner.layout.get() == Some(layout) {
            return;
        }
        log::trace!("layout content {:?} viewport {:?}", content, viewport);
        inner.layout.set(Some(layout));
        inner.refresh_bounds();
        inner.notify();
    }

    /// Overrides the bounds until the next scale or layout change, clamping
    /// the translation into them immediately.
    pub fn update_bounds(&self, bounds: Bounds) {
        self.inner.apply_bounds(bounds);
        self.inner.notify();
    }

    /// Applies one frame of a pinch: zoom by `zoom` around `centroid`, then
    /// pan by `pan`. `rotation` (degrees) is only applied when rotation is
    /// enabled. Cancels every running animation.
    pub fn transform_by(&self, centroid: Point, pan: Point, zoom: f32, rotation: f32) {
        let inner = &self.inner;
        if !centroid.is_finite() || !pan.is_finite() || !zoom.is_finite() || zoom <= 0.0 {
            log::warn!("ignoring degenerate transform: zoom {zoom}, pan {pan:?}");
            return;
        }
        inner.stop_all();

        let old_scale = inner.scale.value();
        let new_scale = inner.clamp_scale(old_scale * zoom);
        let offset = inner.translation();
        // Without a layout there is no viewport center to zoom around.
        let zoomed = match inner.layout.get() {
            Some(layout) => translation_after_zoom(
                centroid,
                layout.viewport.center(),
                offset,
                new_scale / old_scale,
            ),
            None => offset,
        };
        let translation = zoomed + pan;

        inner.scale.snap_to(new_scale);
        inner.refresh_bounds();
        inner.x.snap_to(translation.x);
        inner.y.snap_to(translation.y);

        if inner.rotation_enabled.get() && rotation.is_finite() && rotation != 0.0 {
            inner
                .rotation
                .set((inner.rotation.get() + rotation).rem_euclid(360.0));
        }
        inner.notify();
    }

    /// Zooms by `zoom` around `focal` without panning.
    pub fn zoom_by(&self, zoom: f32, focal: Point) {
        self.transform_by(focal, Point::ZERO, zoom, 0.0);
    }

    /// Animates back to `min_scale` with zero translation and no rotation.
    pub fn reset(&self, animation: AnimationType) {
        let inner = &self.inner;
        inner.x.stop();
        inner.y.stop();
        inner.rotation.set(0.0);

        let start_scale = inner.scale.value();
        if (start_scale - inner.min_scale).abs() <= f32::EPSILON {
            inner.linked.set(None);
            inner.scale.stop();
            inner.x.animate_to(0.0, animation);
            inner.y.animate_to(0.0, animation);
            return;
        }
        inner.linked.set(Some(LinkedTranslation {
            start_scale,
            end_scale: inner.min_scale,
            start: inner.translation(),
            end: Point::ZERO,
        }));
        inner.scale.animate_to(inner.min_scale, animation);
    }

    /// Jumps back to `min_scale` with zero translation and no rotation.
    pub fn snap_reset(&self) {
        let inner = &self.inner;
        inner.stop_all();
        inner.scale.snap_to(inner.min_scale);
        inner.refresh_bounds();
        inner.x.snap_to(0.0);
        inner.y.snap_to(0.0);
        inner.rotation.set(0.0);
        inner.notify();
    }

    /// Cancels every running animation, leaving values where they are.
    pub fn stop_animations(&self) {
        self.inner.stop_all();
    }

    /// Cancels translation animations only.
    pub fn stop_fling(&self) {
        self.inner.x.stop();
        self.inner.y.stop();
    }

    /// Whether a horizontal drag by `delta_x` would run into an edge, so the
    /// movement belongs to the parent container.
    pub fn is_horizontal_drag_finished(&self, delta_x: f32) -> bool {
        self.bounds()
            .is_horizontal_drag_finished(self.translation().x, delta_x)
    }

    pub fn is_vertical_drag_finished(&self, delta_y: f32) -> bool {
        self.bounds()
            .is_vertical_drag_finished(self.translation().y, delta_y)
    }
}

impl std::fmt::Debug for ZoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoomState")
            .field("scale", &self.scale())
            .field("translation", &self.translation())
            .field("rotation", &self.rotation())
            .field("bounds", &self.bounds())
            .field("animating", &self.is_animating())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/zoom_state_tests.rs"]
mod tests;
