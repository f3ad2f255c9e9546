//! Application orchestration layer
//!
//! Camera state, the animation state machine, frame scheduling and the
//! [`YardViewport`](controller::YardViewport) that ties input, selection and
//! rendering together.

pub mod camera;
pub mod controller;
pub mod scheduler;
pub mod state;

pub use camera::{CameraMode, CameraTarget, ViewportState, ZoomLimits};
pub use controller::{ViewportError, YardViewport};
pub use scheduler::{FrameScheduler, ManualScheduler};
pub use state::{CameraAnimator, CameraEvent};
