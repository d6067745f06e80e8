//! Shortest-path reorientation of the globe between two geographic focus points.
//!
//! The controller is a two-state machine (idle / animating) pumped by the host
//! once per frame with the current time. Nothing here schedules frames itself,
//! so tests drive it with synthetic instants.

use super::scene::GlobeNode;
use crate::sphere::{normalize_lng_delta, LatLng};
use glam::{DQuat, DVec3};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::debug;

/// Called once with the settled focus when an animation completes
pub type CompletionHook = Box<dyn FnOnce(LatLng)>;

/// The last settled focus and the globe rotation that shows it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationState {
    pub focus: LatLng,
    pub rotation: DQuat,
}

/// Result of one frame tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    Idle,
    Animating { fraction: f64 },
    /// The animation finished on this tick
    Settled(LatLng),
}

struct Animation {
    from: DQuat,
    to: DQuat,
    started_at: Instant,
    destination: LatLng,
    on_complete: Option<CompletionHook>,
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("destination", &self.destination)
            .field("has_hook", &self.on_complete.is_some())
            .finish()
    }
}

#[derive(Debug)]
pub struct OrientationController {
    default_focus: LatLng,
    settled: OrientationState,
    duration: Duration,
    animation: Option<Animation>,
}

impl OrientationController {
    /// `default_focus` is the point the globe faces at creation and after a reset.
    /// An identity globe rotation faces (0°, -90°).
    pub fn new(default_focus: LatLng, duration: Duration) -> Self {
        Self {
            default_focus,
            settled: OrientationState {
                focus: default_focus,
                rotation: rotation_between(LatLng::default(), default_focus, DQuat::IDENTITY),
            },
            duration,
            animation: None,
        }
    }

    pub fn state(&self) -> OrientationState {
        self.settled
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Drop any running animation and snap the globe back to the default focus
    pub fn reset(&mut self, globe: &mut impl GlobeNode) {
        self.animation = None;
        self.settled = OrientationState {
            focus: self.default_focus,
            rotation: rotation_between(LatLng::default(), self.default_focus, DQuat::IDENTITY),
        };
        globe.set_orientation(self.settled.rotation);
    }

    /// Start turning the globe so `target` faces the viewer.
    ///
    /// The rotation is computed from the last settled focus. While idle it is
    /// applied on top of the globe's live orientation; while a previous animation
    /// is still running it is applied on top of the settled rotation, so the end
    /// state is exact. Either way the slerp starts from whatever is live now, and
    /// the previous animation (with its hook) is abandoned.
    pub fn rotate_to(
        &mut self,
        globe: &impl GlobeNode,
        target: LatLng,
        now: Instant,
        on_complete: Option<CompletionHook>,
    ) {
        let live = globe.orientation();
        let base = if self.animation.is_some() {
            self.settled.rotation
        } else {
            live
        };
        let to = rotation_between(self.settled.focus, target, base);
        debug!(from = ?self.settled.focus, to = ?target, "rotating globe");

        self.animation = Some(Animation {
            from: live,
            to,
            started_at: now,
            destination: target,
            on_complete,
        });
    }

    /// Advance the animation to `now`
    pub fn tick(&mut self, globe: &mut impl GlobeNode, now: Instant) -> Tick {
        let Some(animation) = self.animation.as_ref() else {
            return Tick::Idle;
        };

        let elapsed = now.saturating_duration_since(animation.started_at);
        let fraction = if self.duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f64() / self.duration.as_secs_f64()
        };

        if fraction < 1.0 {
            globe.set_orientation(animation.from.slerp(animation.to, fraction));
            return Tick::Animating { fraction };
        }

        let Some(animation) = self.animation.take() else {
            return Tick::Idle;
        };
        globe.set_orientation(animation.to);
        self.settled = OrientationState {
            focus: animation.destination,
            rotation: animation.to,
        };
        debug!(focus = ?animation.destination, "rotation settled");
        if let Some(hook) = animation.on_complete {
            hook(animation.destination);
        }
        Tick::Settled(animation.destination)
    }
}

/// Rotation that turns a globe currently showing `from` (with rotation `base`)
/// into one showing `to`.
///
/// The azimuthal part spins about the globe's own polar axis by the short-way
/// longitude difference, negated because turning the globe east brings western
/// longitudes into view. The polar part then tilts about the view's horizontal
/// axis by the latitude difference.
pub fn rotation_between(from: LatLng, to: LatLng, base: DQuat) -> DQuat {
    let delta_lng = normalize_lng_delta(to.lng - from.lng).to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();

    let polar_axis = (base * DVec3::Y).normalize();
    let azimuthal = DQuat::from_axis_angle(polar_axis, -delta_lng);
    let polar = DQuat::from_axis_angle(DVec3::X, delta_lat);

    (polar * azimuthal * base).normalize()
}
