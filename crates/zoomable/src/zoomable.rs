//! Host-facing controller for one zoomable viewport.
//!
//! The host's event pump hands every pointer event to
//! [`Zoomable::on_pointer_event`]; the controller runs it through the tap and
//! transform detectors, decides whether the movement belongs to this viewport
//! or to its parent, and drives the [`ZoomState`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;
use zoomable_animation::AnimationType;
use zoomable_core::{FrameCallbackRegistration, FrameClock};
use zoomable_foundation::{
    GestureKind, PointerEvent, PointerEventKind, RecognizerState, TapDetector, TapEvent,
    TransformGesture, TransformGestureDetector, WHEEL_ZOOM_FACTOR,
};
use zoomable_ui_graphics::{Point, Size};

use crate::config::ZoomableConfig;
use crate::error::ZoomConfigError;
use crate::zoom_state::ZoomState;

/// Who handles a pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerDisposition {
    /// This viewport acted on the event; the parent must not.
    Consumed,
    /// The drag reached an edge on the release axis; the parent should
    /// handle it (and the rest of the session).
    Released,
    /// Nothing was recognised, or input is disabled.
    Ignored,
}

enum Action {
    StopFling,
    DragBy(Point),
    TransformBy {
        centroid: Point,
        pan: Point,
        zoom: f32,
        rotation: f32,
    },
    Fling(Point),
    Wheel {
        focal: Point,
        zoom: f32,
    },
    DoubleTap {
        position: Point,
        target: f32,
        zoom_in: bool,
        animation: AnimationType,
    },
    SingleTap(Point),
    ScheduleTapPoll,
}

type Actions = SmallVec<[Action; 2]>;

struct ControllerInner {
    config: ZoomableConfig,
    detector: TransformGestureDetector,
    taps: TapDetector,
    /// Set once the current drag session was handed to the parent.
    released: bool,
    tap_poll: Option<FrameCallbackRegistration>,
    on_single_tap: Option<Rc<dyn Fn(Point)>>,
    on_double_tap: Option<Rc<dyn Fn(Point)>>,
}

impl ControllerInner {
    fn interpret(
        &mut self,
        event: &PointerEvent,
        state: &ZoomState,
    ) -> (PointerDisposition, Actions) {
        let mut actions = Actions::new();

        if event.kind == PointerEventKind::Scroll {
            if !self.config.wheel_zoom_enabled || event.scroll_delta.y == 0.0 {
                return (PointerDisposition::Ignored, actions);
            }
            let zoom = (-event.scroll_delta.y * WHEEL_ZOOM_FACTOR).exp();
            actions.push(Action::Wheel {
                focal: event.position,
                zoom,
            });
            return (PointerDisposition::Consumed, actions);
        }

        if event.kind == PointerEventKind::Down {
            if self.detector.pointer_count() == 0 {
                actions.push(Action::StopFling);
                if let Some(TapEvent::SingleTap(position)) =
                    self.taps.on_press(event.uptime_ms, event.position)
                {
                    actions.push(Action::SingleTap(position));
                }
            } else {
                self.taps.cancel();
            }
        }

        let Some(gesture) = self.detector.on_event(event) else {
            return (PointerDisposition::Ignored, actions);
        };

        let disposition = match gesture {
            TransformGesture::Started { kind, pan, .. } => {
                self.taps.cancel();
                self.released = kind == GestureKind::Drag
                    && self.config.edge_release_axis.should_release(
                        &state.bounds(),
                        state.translation(),
                        pan,
                    );
                if self.released {
                    log::debug!("drag released to parent at slop");
                    PointerDisposition::Released
                } else {
                    PointerDisposition::Consumed
                }
            }
            TransformGesture::Drag { pan } => {
                if !self.released
                    && self.config.edge_release_axis.should_release(
                        &state.bounds(),
                        state.translation(),
                        pan,
                    )
                {
                    log::debug!("drag released to parent at edge");
                    self.released = true;
                    // The content still travels up to its edge on this frame.
                    actions.push(Action::DragBy(pan));
                    PointerDisposition::Released
                } else if self.released {
                    PointerDisposition::Released
                } else {
                    actions.push(Action::DragBy(pan));
                    PointerDisposition::Consumed
                }
            }
            TransformGesture::Transform {
                centroid,
                pan,
                zoom,
                rotation,
            } => {
                actions.push(Action::TransformBy {
                    centroid,
                    pan,
                    zoom,
                    rotation,
                });
                PointerDisposition::Consumed
            }
            TransformGesture::Ended {
                kind,
                velocity,
                position,
                pointer_count,
            } => match kind {
                GestureKind::Drag => {
                    let released = std::mem::take(&mut self.released);
                    if released {
                        PointerDisposition::Released
                    } else {
                        actions.push(Action::Fling(velocity));
                        PointerDisposition::Consumed
                    }
                }
                GestureKind::Transform => PointerDisposition::Consumed,
                GestureKind::Undetermined if pointer_count == 1 => {
                    match self.taps.on_release(event.uptime_ms, position) {
                        Some(TapEvent::DoubleTap(position)) => {
                            let current = state.scale();
                            let target = self
                                .config
                                .double_tap_scale
                                .target_for(current, state.min_scale());
                            actions.push(Action::DoubleTap {
                                position,
                                target,
                                zoom_in: target > current,
                                animation: self.config.scale_animation,
                            });
                            PointerDisposition::Consumed
                        }
                        Some(TapEvent::SingleTap(position)) => {
                            actions.push(Action::SingleTap(position));
                            PointerDisposition::Consumed
                        }
                        None => {
                            if self.taps.has_pending_tap() {
                                actions.push(Action::ScheduleTapPoll);
                            }
                            PointerDisposition::Ignored
                        }
                    }
                }
                GestureKind::Undetermined => {
                    self.taps.cancel();
                    PointerDisposition::Ignored
                }
            },
            TransformGesture::Cancelled => {
                self.taps.cancel();
                self.released = false;
                PointerDisposition::Ignored
            }
        };
        (disposition, actions)
    }
}

/// One zoomable viewport: a [`ZoomState`] plus gesture handling.
pub struct Zoomable {
    state: ZoomState,
    frame_clock: FrameClock,
    inner: Rc<RefCell<ControllerInner>>,
}

impl Zoomable {
    /// # Panics
    ///
    /// If the configured scale range is invalid.
    pub fn new(config: ZoomableConfig, frame_clock: FrameClock) -> Self {
        match Self::try_new(config, frame_clock) {
            Ok(zoomable) => zoomable,
            Err(err) => panic!("invalid zoomable config: {err}"),
        }
    }

    pub fn try_new(
        config: ZoomableConfig,
        frame_clock: FrameClock,
    ) -> Result<Self, ZoomConfigError> {
        config.validate()?;
        let state =
            ZoomState::try_new(config.min_scale, config.max_scale, frame_clock.clone())?;
        Ok(Self::with_state(config, state, frame_clock))
    }

    /// Wraps an existing state, e.g. one restored from a
    /// [`SavedZoomState`](crate::SavedZoomState). The state's scale range
    /// wins over the config's.
    pub fn with_state(config: ZoomableConfig, state: ZoomState, frame_clock: FrameClock) -> Self {
        state.set_rotation_enabled(config.rotation_enabled);
        state.set_fling_decay(config.fling_decay);
        let config = ZoomableConfig {
            min_scale: state.min_scale(),
            max_scale: state.max_scale(),
            ..config
        };
        let inner = ControllerInner {
            detector: TransformGestureDetector::new(config.gesture_config()),
            taps: TapDetector::new(config.double_tap_timeout_ms, config.double_tap_slop),
            config,
            released: false,
            tap_poll: None,
            on_single_tap: None,
            on_double_tap: None,
        };
        Self {
            state,
            frame_clock,
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    pub fn state(&self) -> &ZoomState {
        &self.state
    }

    pub fn config(&self) -> ZoomableConfig {
        self.inner.borrow().config.clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.borrow().config.enabled
    }

    /// Disabling drops any gesture in progress; programmatic scale changes
    /// through [`Zoomable::state`] keep working.
    pub fn set_enabled(&self, enabled: bool) {
        let mut inner = self.inner.borrow_mut();
        if inner.config.enabled == enabled {
            return;
        }
        inner.config.enabled = enabled;
        if !enabled {
            inner.detector.reset();
            inner.taps.cancel();
            inner.released = false;
            inner.tap_poll = None;
        }
    }

    pub fn recognizer_state(&self) -> RecognizerState {
        self.inner.borrow().detector.state()
    }

    pub fn set_layout(&self, content: Size, viewport: Size) {
        self.state.set_layout(content, viewport);
    }

    /// Called with the tap position once a tap is known not to be the first
    /// half of a double tap.
    pub fn set_on_single_tap(&self, listener: impl Fn(Point) + 'static) {
        self.inner.borrow_mut().on_single_tap = Some(Rc::new(listener));
    }

    /// Called after a double tap has started its zoom animation.
    pub fn set_on_double_tap(&self, listener: impl Fn(Point) + 'static) {
        self.inner.borrow_mut().on_double_tap = Some(Rc::new(listener));
    }

    pub fn on_pointer_event(&self, event: &PointerEvent) -> PointerDisposition {
        let (disposition, actions) = {
            let mut inner = self.inner.borrow_mut();
            if !inner.config.enabled {
                return PointerDisposition::Ignored;
            }
            inner.interpret(event, &self.state)
        };

        for action in actions {
            self.perform(action);
        }
        if disposition == PointerDisposition::Consumed {
            event.consume();
        }
        disposition
    }

    fn perform(&self, action: Action) {
        match action {
            Action::StopFling => self.state.stop_fling(),
            Action::DragBy(pan) => {
                self.state.drag_by(pan);
            }
            Action::TransformBy {
                centroid,
                pan,
                zoom,
                rotation,
            } => self.state.transform_by(centroid, pan, zoom, rotation),
            Action::Fling(velocity) => self.state.fling_with(velocity),
            Action::Wheel { focal, zoom } => self.state.zoom_by(zoom, focal),
            Action::DoubleTap {
                position,
                target,
                zoom_in,
                animation,
            } => {
                log::debug!("double tap at {:?}: scale -> {}", position, target);
                if zoom_in {
                    self.state.animate_scale_to_point(target, position, animation);
                } else {
                    self.state.animate_scale_to(target, animation);
                }
                let listener = self.inner.borrow().on_double_tap.clone();
                if let Some(listener) = listener {
                    listener(position);
                }
            }
            Action::SingleTap(position) => {
                let listener = self.inner.borrow().on_single_tap.clone();
                if let Some(listener) = listener {
                    listener(position);
                }
            }
            Action::ScheduleTapPoll => schedule_tap_poll(&self.inner, &self.frame_clock),
        }
    }
}

/// Polls the tap detector once per frame until the pending tap is either
/// confirmed as a single tap or superseded.
fn schedule_tap_poll(inner: &Rc<RefCell<ControllerInner>>, frame_clock: &FrameClock) {
    let weak: Weak<RefCell<ControllerInner>> = Rc::downgrade(inner);
    let clock = frame_clock.clone();
    let registration = frame_clock.with_frame_millis(move |now_ms| {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let (tap, listener, still_pending) = {
            let mut controller = inner.borrow_mut();
            controller.tap_poll = None;
            let tap = controller.taps.poll(now_ms);
            (
                tap,
                controller.on_single_tap.clone(),
                controller.taps.has_pending_tap(),
            )
        };
        match (tap, listener) {
            (Some(TapEvent::SingleTap(position)), Some(listener)) => listener(position),
            (Some(_), None) => {}
            _ if still_pending => schedule_tap_poll(&inner, &clock),
            _ => {}
        }
    });
    inner.borrow_mut().tap_poll = Some(registration);
}

impl std::fmt::Debug for Zoomable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Zoomable")
            .field("state", &self.state)
            .field("recognizer", &self.recognizer_state())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/zoomable_tests.rs"]
mod tests;
