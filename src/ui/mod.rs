//! Drawing the yard
//!
//! The renderer builds an ordered draw plan per frame and paints it with
//! tiny-skia; text goes through ab_glyph when a font is configured.

pub mod controls;
pub mod palette;
pub mod renderer;
pub mod text;

pub use controls::{ControlAction, ControlBar, ControlButton};
pub use renderer::{FrameInput, FramePlan, HoverState, RendererError, YardRenderer};
pub use text::TextPainter;
