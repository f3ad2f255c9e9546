//! Input handling
//!
//! Pointer, wheel and keyboard events are translated into camera changes
//! and selection reports. All handling is synchronous on the caller's thread.

pub mod keyboard;
pub mod pointer;

pub use keyboard::{Key, KeyCommand, NavigationDirection};
pub use pointer::{InputContext, InputController, InputOutcome};
