//! Pan/zoom viewport over a container yard
//!
//! A fixed layout of stacks, container records placed onto them by their
//! free-text location, a camera that animates toward the selected
//! container, and a layered renderer drawing onto a tiny-skia pixmap.

pub mod app;
pub mod config;
pub mod domain;
pub mod input;
pub mod ui;

pub use app::{FrameScheduler, ManualScheduler, ViewportError, ViewportState, YardViewport};
pub use config::YardConfig;
pub use domain::container::ContainerRecord;
pub use domain::layout::{Section, StackRegion, YardLayout};
pub use domain::resolver::LocationResolver;
