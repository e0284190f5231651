//! How an [`Animatable`](crate::Animatable) moves toward its target: a timed
//! tween along an easing curve, or a spring.

/// Progress curve of a tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    /// CSS-style cubic bezier through `(0, 0)`, `(x1, y1)`, `(x2, y2)` and
    /// `(1, 1)`. `x1` and `x2` must lie in `[0, 1]`.
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Easing {
    /// Quick start, long settle. Default for programmatic zooms.
    pub const STANDARD: Easing = Easing::CubicBezier {
        x1: 0.4,
        y1: 0.0,
        x2: 0.2,
        y2: 1.0,
    };

    /// Maps elapsed time in `[0, 1]` to progress; ends are exact.
    pub fn transform(&self, fraction: f32) -> f32 {
        if fraction <= 0.0 {
            return 0.0;
        }
        if fraction >= 1.0 {
            return 1.0;
        }
        match *self {
            Easing::Linear => fraction,
            Easing::CubicBezier { x1, y1, x2, y2 } => {
                let t = solve_bezier_parameter(x1, x2, fraction);
                bezier_coordinate(y1, y2, t)
            }
        }
    }
}

/// One coordinate of the bezier at parameter `t`, with the end points fixed
/// at 0 and 1.
fn bezier_coordinate(p1: f32, p2: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
}

/// Parameter `t` whose x coordinate is `x`. With both control x values in
/// `[0, 1]` the x coordinate is monotonic in `t`, so bisection converges.
fn solve_bezier_parameter(x1: f32, x2: f32, x: f32) -> f32 {
    let mut low = 0.0f32;
    let mut high = 1.0f32;
    let mut t = x;
    for _ in 0..24 {
        let error = bezier_coordinate(x1, x2, t) - x;
        if error.abs() < 1e-6 {
            break;
        }
        if error > 0.0 {
            high = t;
        } else {
            low = t;
        }
        t = 0.5 * (low + high);
    }
    t
}

/// A timed tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    pub duration_millis: u64,
    pub easing: Easing,
    /// Time the value holds still before the tween starts.
    pub delay_millis: u64,
}

impl AnimationSpec {
    pub fn tween(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            easing,
            delay_millis: 0,
        }
    }

    pub fn linear(duration_millis: u64) -> Self {
        Self::tween(duration_millis, Easing::Linear)
    }

    pub fn with_delay(mut self, delay_millis: u64) -> Self {
        self.delay_millis = delay_millis;
        self
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::tween(300, Easing::STANDARD)
    }
}

/// Damped spring. The default is critically damped, which settles a zoom
/// without overshooting the scale limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// 1.0 is critical damping; lower values bounce.
    pub damping_ratio: f32,
    pub stiffness: f32,
    /// Speed (units/second) under which the spring may come to rest.
    pub velocity_threshold: f32,
    /// Distance from the target under which the spring may come to rest.
    pub position_threshold: f32,
}

impl SpringSpec {
    pub fn new(damping_ratio: f32, stiffness: f32) -> Self {
        Self {
            damping_ratio,
            stiffness,
            velocity_threshold: 0.01,
            position_threshold: 0.001,
        }
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::new(1.0, 1500.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationType {
    Tween(AnimationSpec),
    Spring(SpringSpec),
}

impl Default for AnimationType {
    fn default() -> Self {
        AnimationType::Spring(SpringSpec::default())
    }
}

impl From<AnimationSpec> for AnimationType {
    fn from(spec: AnimationSpec) -> Self {
        AnimationType::Tween(spec)
    }
}

impl From<SpringSpec> for AnimationType {
    fn from(spec: SpringSpec) -> Self {
        AnimationType::Spring(spec)
    }
}
