//! Drag / pinch recognition.
//!
//! [`TransformGestureDetector`] is fed one [`PointerEvent`] at a time by the
//! host's event pump and runs the session state machine
//! `Idle -> SlopPending -> {Dragging | Transforming} -> Idle`.
//!
//! Movement while `SlopPending` is accumulated but never reported. When the
//! slop is crossed the session becomes a drag if exactly one pointer is down
//! and a transform otherwise; from then on every move reports the delta of
//! that single frame.

use smallvec::SmallVec;
use zoomable_ui_graphics::Point;

use super::session::{GestureKind, GestureSession};
use crate::gesture_constants::{MAX_FLING_VELOCITY, TOUCH_SLOP};
use crate::input::{PointerEvent, PointerEventKind, PointerId};
use crate::velocity_tracker::VelocityStrategy;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecognizerState {
    Idle,
    SlopPending,
    Dragging,
    Transforming,
}

/// What the detector recognised from a single pointer event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformGesture {
    /// The slop was crossed and the session kind decided. `pan` is the
    /// movement accumulated inside the slop, which is not applied.
    Started {
        kind: GestureKind,
        position: Point,
        pan: Point,
    },
    /// One frame of a drag.
    Drag { pan: Point },
    /// One frame of a multi-pointer transform. `zoom` is a ratio relative to
    /// the previous frame and `rotation` is in degrees.
    Transform {
        centroid: Point,
        pan: Point,
        zoom: f32,
        rotation: f32,
    },
    /// The last pointer was released. `kind` is `Undetermined` when the
    /// pointer never left the slop, i.e. the session was a tap.
    Ended {
        kind: GestureKind,
        velocity: Point,
        position: Point,
        pointer_count: usize,
    },
    /// The session was cancelled; nothing should be applied.
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformGestureConfig {
    pub touch_slop: f32,
    /// Whether rotation counts toward the slop test. The rotation delta is
    /// always reported.
    pub rotation_enabled: bool,
    pub velocity_strategy: VelocityStrategy,
    pub max_fling_velocity: f32,
}

impl Default for TransformGestureConfig {
    fn default() -> Self {
        Self {
            touch_slop: TOUCH_SLOP,
            rotation_enabled: false,
            velocity_strategy: VelocityStrategy::LeastSquares,
            max_fling_velocity: MAX_FLING_VELOCITY,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct TrackedPointer {
    id: PointerId,
    position: Point,
}

#[derive(Debug, Default)]
pub struct TransformGestureDetector {
    config: TransformGestureConfig,
    pointers: SmallVec<[TrackedPointer; 4]>,
    session: Option<GestureSession>,
}

impl TransformGestureDetector {
    pub fn new(config: TransformGestureConfig) -> Self {
        Self {
            config,
            pointers: SmallVec::new(),
            session: None,
        }
    }

    pub fn config(&self) -> &TransformGestureConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: TransformGestureConfig) {
        self.config = config;
    }

    pub fn state(&self) -> RecognizerState {
        match self.session.as_ref().map(GestureSession::kind) {
            None => RecognizerState::Idle,
            Some(GestureKind::Undetermined) => RecognizerState::SlopPending,
            Some(GestureKind::Drag) => RecognizerState::Dragging,
            Some(GestureKind::Transform) => RecognizerState::Transforming,
        }
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// Centroid of the pointers currently down.
    pub fn centroid(&self) -> Option<Point> {
        calculate_centroid(self.pointers.iter().map(|pointer| pointer.position))
    }

    /// Drops the session and all pointers without reporting anything.
    pub fn reset(&mut self) {
        self.pointers.clear();
        self.session = None;
    }

    pub fn on_event(&mut self, event: &PointerEvent) -> Option<TransformGesture> {
        match event.kind {
            PointerEventKind::Down => self.on_down(event),
            PointerEventKind::Move => self.on_move(event),
            PointerEventKind::Up => self.on_up(event),
            PointerEventKind::Cancel => self.on_cancel(),
            PointerEventKind::Scroll => None,
        }
    }

    fn on_down(&mut self, event: &PointerEvent) -> Option<TransformGesture> {
        if let Some(pointer) = self.pointers.iter_mut().find(|p| p.id == event.id) {
            log::warn!("pointer {} pressed twice without release", event.id);
            pointer.position = event.position;
            return None;
        }
        self.pointers.push(TrackedPointer {
            id: event.id,
            position: event.position,
        });
        let count = self.pointers.len();
        match self.session.as_mut() {
            Some(session) => session.note_pointer_count(count),
            None => {
                log::trace!("session started at {}ms", event.uptime_ms);
                self.session = Some(GestureSession::new(
                    event.uptime_ms,
                    self.config.velocity_strategy,
                ));
            }
        }
        None
    }

    fn on_move(&mut self, event: &PointerEvent) -> Option<TransformGesture> {
        let Some(index) = self.pointers.iter().position(|p| p.id == event.id) else {
            log::warn!("move for unknown pointer {}", event.id);
            return None;
        };
        let Some(session) = self.session.as_mut() else {
            return None;
        };

        let previous: SmallVec<[Point; 4]> = self.pointers.iter().map(|p| p.position).collect();
        self.pointers[index].position = event.position;
        let current: SmallVec<[Point; 4]> = self.pointers.iter().map(|p| p.position).collect();

        let pan = calculate_pan(&previous, &current);
        let zoom = calculate_zoom(&previous, &current);
        let rotation = calculate_rotation(&previous, &current);
        let centroid = calculate_centroid(current.iter().copied()).unwrap_or(event.position);
        let span = calculate_centroid_size(&current);

        let slop_rotation = if self.config.rotation_enabled {
            rotation
        } else {
            0.0
        };
        let crossed = session.accumulate(
            event.uptime_ms,
            pan,
            zoom,
            slop_rotation,
            span,
            self.config.touch_slop,
        );

        if crossed {
            let kind = if self.pointers.len() >= 2 {
                GestureKind::Transform
            } else {
                GestureKind::Drag
            };
            session.lock_kind(kind);
            log::debug!(
                "touch slop crossed after {}ms: {:?} with {} pointer(s)",
                event.uptime_ms.saturating_sub(session.start_time_ms()),
                kind,
                self.pointers.len()
            );
            return Some(TransformGesture::Started {
                kind,
                position: centroid,
                pan: session.total_pan(),
            });
        }

        match session.kind() {
            GestureKind::Undetermined => None,
            GestureKind::Drag => Some(TransformGesture::Drag { pan }),
            GestureKind::Transform => Some(TransformGesture::Transform {
                centroid,
                pan,
                zoom,
                rotation,
            }),
        }
    }

    fn on_up(&mut self, event: &PointerEvent) -> Option<TransformGesture> {
        let Some(index) = self.pointers.iter().position(|p| p.id == event.id) else {
            log::warn!("release for unknown pointer {}", event.id);
            return None;
        };
        self.pointers.remove(index);
        if !self.pointers.is_empty() {
            return None;
        }

        let mut session = self.session.take()?;
        session.finish(event.uptime_ms);
        let velocity = session.velocity(self.config.max_fling_velocity);
        log::trace!(
            "session ended as {:?} with {} samples",
            session.kind(),
            session.sample_count()
        );
        Some(TransformGesture::Ended {
            kind: session.kind(),
            velocity,
            position: event.position,
            pointer_count: session.max_pointers(),
        })
    }

    fn on_cancel(&mut self) -> Option<TransformGesture> {
        self.pointers.clear();
        self.session.take().map(|session| {
            log::debug!("session cancelled as {:?}", session.kind());
            TransformGesture::Cancelled
        })
    }
}

/// Average of `points`, or `None` if there are none.
pub fn calculate_centroid(points: impl IntoIterator<Item = Point>) -> Option<Point> {
    let mut sum = Point::ZERO;
    let mut count = 0usize;
    for point in points {
        sum += point;
        count += 1;
    }
    (count > 0).then(|| sum / count as f32)
}

/// Average distance of `points` to their centroid.
pub fn calculate_centroid_size(points: &[Point]) -> f32 {
    let Some(centroid) = calculate_centroid(points.iter().copied()) else {
        return 0.0;
    };
    points.iter().map(|p| p.distance(centroid)).sum::<f32>() / points.len() as f32
}

/// Average movement of the pointers between two frames.
///
/// `previous` and `current` hold the same pointers in the same order.
pub fn calculate_pan(previous: &[Point], current: &[Point]) -> Point {
    let count = previous.len().min(current.len());
    if count == 0 {
        return Point::ZERO;
    }
    let sum = previous
        .iter()
        .zip(current)
        .fold(Point::ZERO, |acc, (&before, &after)| acc + (after - before));
    sum / count as f32
}

/// Ratio of the current span to the previous one; 1.0 when either frame has
/// a single pointer or all pointers coincide.
pub fn calculate_zoom(previous: &[Point], current: &[Point]) -> f32 {
    if previous.len() < 2 || current.len() < 2 {
        return 1.0;
    }
    let previous_size = calculate_centroid_size(previous);
    let current_size = calculate_centroid_size(current);
    if previous_size <= f32::EPSILON || current_size <= f32::EPSILON {
        return 1.0;
    }
    current_size / previous_size
}

/// Average rotation of the pointers about their centroid, in degrees, in
/// `(-180, 180]`.
pub fn calculate_rotation(previous: &[Point], current: &[Point]) -> f32 {
    if previous.len() < 2 || current.len() < 2 {
        return 0.0;
    }
    let (Some(previous_centroid), Some(current_centroid)) = (
        calculate_centroid(previous.iter().copied()),
        calculate_centroid(current.iter().copied()),
    ) else {
        return 0.0;
    };

    let mut total = 0.0f32;
    let mut counted = 0usize;
    for (&before, &after) in previous.iter().zip(current) {
        let before = before - previous_centroid;
        let after = after - current_centroid;
        if before.length() <= f32::EPSILON || after.length() <= f32::EPSILON {
            continue;
        }
        total += normalize_degrees((after.angle() - before.angle()).to_degrees());
        counted += 1;
    }
    if counted == 0 {
        0.0
    } else {
        total / counted as f32
    }
}

fn normalize_degrees(mut degrees: f32) -> f32 {
    while degrees > 180.0 {
        degrees -= 360.0;
    }
    while degrees <= -180.0 {
        degrees += 360.0;
    }
    degrees
}

#[cfg(test)]
#[path = "../tests/transform_gesture_tests.rs"]
mod tests;
