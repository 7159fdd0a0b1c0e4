//! Distance and vector helpers shared by targeting and movement.

use glam::Vec2;

/// Euclidean distance between two points in world units.
#[must_use]
pub fn distance(from: Vec2, to: Vec2) -> f32 {
    from.distance(to)
}

/// Reports whether `point` lies inside the closed disc of `radius` around `center`.
#[must_use]
pub fn within_range(center: Vec2, point: Vec2, radius: f32) -> bool {
    distance(center, point) <= radius
}

/// Outcome of moving a point toward a destination by a bounded step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// The destination was within reach; the point snapped onto it.
    Arrived(Vec2),
    /// The point travelled the full step length and is still short of the destination.
    Moved(Vec2),
}

impl Step {
    /// Position after the step was taken.
    #[must_use]
    pub const fn position(self) -> Vec2 {
        match self {
            Self::Arrived(position) | Self::Moved(position) => position,
        }
    }
}

/// Moves `from` toward `to` by at most `max_distance` world units.
///
/// A remaining distance equal to `max_distance` counts as arrival, so a point
/// never overshoots the destination. A zero step leaves the point in place
/// unless it already sits on the destination.
#[must_use]
pub fn step_toward(from: Vec2, to: Vec2, max_distance: f32) -> Step {
    let offset = to - from;
    let remaining = offset.length();
    if remaining <= max_distance {
        return Step::Arrived(to);
    }

    Step::Moved(from + offset / remaining * max_distance.max(0.0))
}
