//! Camera animation state machine
//!
//! Two states: Idle (no target) and Animating (target set, frames
//! requested). Each tick closes a fixed fraction of the remaining distance
//! to the target, independent of wall-clock time, so the same number of
//! ticks always lands on the same camera.

use crate::app::camera::{CameraMode, CameraTarget, ViewportState};
use crate::domain::core::Point;

/// Events the animator reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraEvent {
    /// A resolvable container was selected; animate toward this target
    Focus(CameraTarget),
    /// One scheduled frame elapsed
    Tick,
    /// The user panned or zoomed by hand
    ManualInput,
}

/// Drives [`ViewportState`] toward its target with exponential ease-out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraAnimator {
    damping: f64,
    epsilon: f64,
}

impl CameraAnimator {
    pub const DEFAULT_DAMPING: f64 = 0.1;
    pub const DEFAULT_EPSILON: f64 = 0.01;

    /// # Arguments
    /// * `damping` - Fraction of the remaining distance covered per tick, in (0, 1]
    /// * `epsilon` - Share of the starting gap below which a quantity counts as arrived
    pub fn new(damping: f64, epsilon: f64) -> Self {
        Self { damping, epsilon }
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Processes one event against the camera
    ///
    /// # Returns
    /// true if the camera is still animating afterwards and another frame
    /// should be scheduled
    pub fn process_event(&self, state: &mut ViewportState, event: CameraEvent) -> bool {
        match (state.mode(), event) {
            (_, CameraEvent::Focus(target)) => {
                log::debug!(
                    "camera: animating toward zoom {:.2} offset ({:.1}, {:.1})",
                    target.zoom,
                    target.offset.x,
                    target.offset.y
                );
                state.begin_animation(target);
                true
            }

            (CameraMode::Animating { target, from }, CameraEvent::Tick) => {
                self.step(state, target, from)
            }

            (CameraMode::Animating { .. }, CameraEvent::ManualInput) => {
                log::debug!("camera: animation cancelled by manual input");
                state.cancel_animation();
                false
            }

            // Ticks and manual input while idle change nothing
            (CameraMode::Idle, CameraEvent::Tick | CameraEvent::ManualInput) => false,
        }
    }

    /// One easing step; arrival is measured against the gap at the start
    /// of the animation, so a quantity that started on target counts as
    /// arrived
    fn step(&self, state: &mut ViewportState, target: CameraTarget, from: CameraTarget) -> bool {
        let zoom = state.zoom() + (target.zoom - state.zoom()) * self.damping;
        let offset = state.offset();
        let next_x = offset.x + (target.offset.x - offset.x) * self.damping;
        let next_y = offset.y + (target.offset.y - offset.y) * self.damping;

        state.set_zoom(zoom);
        state.set_offset(Point::new(next_x, next_y));

        let initial = gaps(target, from);
        let remaining = gaps(
            target,
            CameraTarget {
                zoom: state.zoom(),
                offset: state.offset(),
            },
        );

        let arrived = initial
            .iter()
            .zip(remaining)
            .all(|(start, left)| *start == 0.0 || left / start < self.epsilon);

        if arrived {
            state.settle();
            log::debug!("camera: settled at zoom {:.2}", state.zoom());
            false
        } else {
            true
        }
    }
}

/// Absolute zoom, x and y distance between two camera positions
fn gaps(a: CameraTarget, b: CameraTarget) -> [f64; 3] {
    [
        (a.zoom - b.zoom).abs(),
        (a.offset.x - b.offset.x).abs(),
        (a.offset.y - b.offset.y).abs(),
    ]
}

impl Default for CameraAnimator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DAMPING, Self::DEFAULT_EPSILON)
    }
}
