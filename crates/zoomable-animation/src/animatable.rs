use std::cell::RefCell;
use std::rc::{Rc, Weak};

use zoomable_core::{FrameCallbackRegistration, FrameClock};

use crate::animation::{AnimationType, SpringSpec};
use crate::decay_spec::{ExponentialDecaySpec, FloatDecayAnimationSpec};

/// Integration step used for spring physics, independent of the frame rate.
const SPRING_TIMESTEP_SECONDS: f32 = 0.016;

/// Why an animation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEndReason {
    /// The animation reached its target or its decay came to rest.
    Finished,
    /// The value was clamped by a bound before the animation finished.
    BoundReached,
    /// Another animation, a snap, or an explicit stop took over.
    Interrupted,
}

#[derive(Clone, Copy)]
enum JobKind {
    Target {
        start_value: f32,
        target: f32,
        animation: AnimationType,
    },
    Decay {
        initial_value: f32,
        initial_velocity: f32,
        spec: ExponentialDecaySpec,
    },
}

#[derive(Clone, Copy)]
struct Job {
    id: u64,
    kind: JobKind,
    start_time_nanos: Option<u64>,
    last_frame_nanos: Option<u64>,
}

struct AnimatableInner {
    label: &'static str,
    frame_clock: FrameClock,
    value: f32,
    velocity: f32,
    lower_bound: f32,
    upper_bound: f32,
    job: Option<Job>,
    next_job_id: u64,
    registration: Option<FrameCallbackRegistration>,
    on_frame: Option<Rc<dyn Fn(f32)>>,
    last_end_reason: Option<AnimationEndReason>,
}

impl AnimatableInner {
    fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.lower_bound, self.upper_bound)
    }

    fn end_job(&mut self, reason: AnimationEndReason) {
        if let Some(job) = self.job.take() {
            log::trace!("{}: job {} ended ({:?})", self.label, job.id, reason);
            self.last_end_reason = Some(reason);
        }
    }

    fn start_job(&mut self, kind: JobKind) {
        self.end_job(AnimationEndReason::Interrupted);
        let id = self.next_job_id;
        self.next_job_id += 1;
        self.job = Some(Job {
            id,
            kind,
            start_time_nanos: None,
            last_frame_nanos: None,
        });
    }
}

/// A single animatable `f32` with optional bounds.
///
/// Cloning shares the underlying value; all clones see the same animation.
pub struct Animatable {
    inner: Rc<RefCell<AnimatableInner>>,
}

impl Animatable {
    /// Create a new animatable with the given initial value.
    pub fn new(initial: f32, frame_clock: FrameClock, label: &'static str) -> Self {
        let inner = AnimatableInner {
            label,
            frame_clock,
            value: initial,
            velocity: 0.0,
            lower_bound: f32::NEG_INFINITY,
            upper_bound: f32::INFINITY,
            job: None,
            next_job_id: 1,
            registration: None,
            on_frame: None,
            last_end_reason: None,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    pub fn value(&self) -> f32 {
        self.inner.borrow().value
    }

    /// Current velocity in units per second; zero when idle.
    pub fn velocity(&self) -> f32 {
        self.inner.borrow().velocity
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().job.is_some()
    }

    /// Target of the running target-based animation, if any.
    pub fn target(&self) -> Option<f32> {
        match self.inner.borrow().job {
            Some(Job {
                kind: JobKind::Target { target, .. },
                ..
            }) => Some(target),
            _ => None,
        }
    }

    pub fn lower_bound(&self) -> f32 {
        self.inner.borrow().lower_bound
    }

    pub fn upper_bound(&self) -> f32 {
        self.inner.borrow().upper_bound
    }

    /// How the most recent animation ended, if one has ended.
    pub fn last_end_reason(&self) -> Option<AnimationEndReason> {
        self.inner.borrow().last_end_reason
    }

    /// Registers a listener called after every animation frame with the new
    /// value. Snaps and bound updates do not call it; their callers already
    /// know the value changed.
    pub fn set_on_frame(&self, listener: impl Fn(f32) + 'static) {
        self.inner.borrow_mut().on_frame = Some(Rc::new(listener));
    }

    /// Sets the bounds and clamps the current value into them immediately.
    ///
    /// A running decay that gets clamped ends with
    /// [`AnimationEndReason::BoundReached`]; a running target animation keeps
    /// going from the clamped value.
    pub fn update_bounds(&self, lower: f32, upper: f32) {
        let mut inner = self.inner.borrow_mut();
        let (lower, upper) = if lower <= upper {
            (lower, upper)
        } else {
            (upper, lower)
        };
        inner.lower_bound = lower;
        inner.upper_bound = upper;
        let clamped = inner.clamp(inner.value);
        if clamped != inner.value {
            inner.value = clamped;
            if matches!(
                inner.job,
                Some(Job {
                    kind: JobKind::Decay { .. },
                    ..
                })
            ) {
                inner.velocity = 0.0;
                inner.end_job(AnimationEndReason::BoundReached);
                inner.registration = None;
            }
        }
    }

    /// Cancels any running animation and jumps to `target`, clamped to the
    /// bounds.
    pub fn snap_to(&self, target: f32) {
        let mut inner = self.inner.borrow_mut();
        inner.end_job(AnimationEndReason::Interrupted);
        inner.registration = None;
        inner.value = inner.clamp(target);
        inner.velocity = 0.0;
    }

    /// Cancels any running animation, keeping the current value.
    pub fn stop(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.end_job(AnimationEndReason::Interrupted);
        inner.registration = None;
        inner.velocity = 0.0;
    }

    /// Animates from the current value (and velocity) to `target`,
    /// superseding any running animation.
    pub fn animate_to(&self, target: f32, animation: AnimationType) {
        {
            let mut inner = self.inner.borrow_mut();
            let start_value = inner.value;
            inner.start_job(JobKind::Target {
                start_value,
                target,
                animation,
            });
            log::trace!(
                "{}: animate {} -> {} with {:?}",
                inner.label,
                start_value,
                target,
                animation
            );
        }
        Self::schedule_frame(&self.inner);
    }

    /// Starts a decay from the current value with `initial_velocity`,
    /// superseding any running animation.
    pub fn animate_decay(&self, initial_velocity: f32, spec: ExponentialDecaySpec) {
        {
            let mut inner = self.inner.borrow_mut();
            let initial_value = inner.value;
            if spec.get_duration_nanos(initial_value, initial_velocity) == 0 {
                inner.end_job(AnimationEndReason::Interrupted);
                inner.registration = None;
                inner.velocity = 0.0;
                inner.last_end_reason = Some(AnimationEndReason::Finished);
                return;
            }
            inner.start_job(JobKind::Decay {
                initial_value,
                initial_velocity,
                spec,
            });
            inner.velocity = initial_velocity;
        }
        Self::schedule_frame(&self.inner);
    }

    fn schedule_frame(this: &Rc<RefCell<AnimatableInner>>) {
        let frame_clock = {
            let inner = this.borrow();
            if inner.registration.is_some() || inner.job.is_none() {
                return;
            }
            inner.frame_clock.clone()
        };
        let weak: Weak<RefCell<AnimatableInner>> = Rc::downgrade(this);
        let registration = frame_clock.with_frame_nanos(move |time| {
            if let Some(strong) = weak.upgrade() {
                Self::on_frame(&strong, time);
            }
        });
        this.borrow_mut().registration = Some(registration);
    }

    fn on_frame(this: &Rc<RefCell<AnimatableInner>>, frame_time_nanos: u64) {
        let (job_id, value, listener) = {
            let mut inner = this.borrow_mut();
            inner.registration = None;
            let Some(mut job) = inner.job else {
                return;
            };

            let start_time = *job.start_time_nanos.get_or_insert(frame_time_nanos);
            let previous_frame = job.last_frame_nanos.replace(frame_time_nanos);
            let play_time_nanos = frame_time_nanos.saturating_sub(start_time);

            let (raw_value, velocity, finished) = match job.kind {
                JobKind::Target {
                    start_value,
                    target,
                    animation: AnimationType::Tween(spec),
                } => {
                    let delay_nanos = spec.delay_millis * 1_000_000;
                    if play_time_nanos < delay_nanos {
                        (inner.value, 0.0, false)
                    } else {
                        let duration_nanos = (spec.duration_millis * 1_000_000).max(1);
                        let linear_progress = ((play_time_nanos - delay_nanos) as f32
                            / duration_nanos as f32)
                            .clamp(0.0, 1.0);
                        let progress = spec.easing.transform(linear_progress);
                        let value = start_value + (target - start_value) * progress;
                        let dt = previous_frame
                            .map(|previous| frame_time_nanos.saturating_sub(previous))
                            .unwrap_or(0) as f32
                            / 1_000_000_000.0;
                        let velocity = if dt > 0.0 {
                            (value - inner.value) / dt
                        } else {
                            0.0
                        };
                        if linear_progress >= 1.0 {
                            (target, 0.0, true)
                        } else {
                            (value, velocity, false)
                        }
                    }
                }
                JobKind::Target {
                    target,
                    animation: AnimationType::Spring(spec),
                    ..
                } => {
                    let dt = previous_frame
                        .map(|previous| frame_time_nanos.saturating_sub(previous))
                        .unwrap_or(0) as f32
                        / 1_000_000_000.0;
                    step_spring(inner.value, inner.velocity, target, spec, dt)
                }
                JobKind::Decay {
                    initial_value,
                    initial_velocity,
                    spec,
                } => {
                    let duration = spec.get_duration_nanos(initial_value, initial_velocity);
                    let play_time = (play_time_nanos as i64).min(duration);
                    let value = spec.get_value_from_nanos(play_time, initial_value, initial_velocity);
                    let velocity =
                        spec.get_velocity_from_nanos(play_time, initial_value, initial_velocity);
                    (value, velocity, play_time >= duration)
                }
            };

            let clamped = inner.clamp(raw_value);
            inner.value = clamped;
            inner.velocity = velocity;
            inner.job = Some(job);

            if clamped != raw_value {
                inner.velocity = 0.0;
                inner.end_job(AnimationEndReason::BoundReached);
            } else if finished {
                inner.velocity = 0.0;
                inner.end_job(AnimationEndReason::Finished);
            }

            (job.id, clamped, inner.on_frame.clone())
        };

        if let Some(listener) = listener {
            listener(value);
        }

        // The listener may have replaced or stopped this job.
        let still_running = this
            .borrow()
            .job
            .as_ref()
            .is_some_and(|job| job.id == job_id);
        if still_running {
            Self::schedule_frame(this);
        }
    }
}

/// Advances a damped spring by `dt` seconds using semi-implicit Euler steps.
///
/// Returns the new value, the new velocity, and whether the spring settled.
fn step_spring(
    mut value: f32,
    mut velocity: f32,
    target: f32,
    spec: SpringSpec,
    dt: f32,
) -> (f32, f32, bool) {
    let stiffness = spec.stiffness;
    let damping = 2.0 * spec.damping_ratio * stiffness.sqrt();

    let mut elapsed = 0.0f32;
    while elapsed < dt {
        let step = SPRING_TIMESTEP_SECONDS.min(dt - elapsed);
        let spring_force = -stiffness * (value - target) - damping * velocity;
        velocity += spring_force * step;
        value += velocity * step;
        elapsed += step;
    }

    let at_rest = velocity.abs() < spec.velocity_threshold;
    let near_target = (value - target).abs() < spec.position_threshold;
    if at_rest && near_target {
        (target, 0.0, true)
    } else {
        (value, velocity, false)
    }
}

impl Clone for Animatable {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for Animatable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Animatable")
            .field("label", &inner.label)
            .field("value", &inner.value)
            .field("velocity", &inner.velocity)
            .field("bounds", &(inner.lower_bound, inner.upper_bound))
            .field("running", &inner.job.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
