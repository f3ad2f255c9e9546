//! Keyboard shortcuts for the yard viewport
//!
//! Keys map onto the same camera actions as the on-canvas buttons, plus
//! arrow-key panning and Escape to clear the selection.

use crate::ui::controls::ControlAction;

/// Navigation direction for arrow-key panning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDirection {
    Left,
    Right,
    Up,
    Down,
}

impl NavigationDirection {
    /// Screen-space pan delta for one step
    ///
    /// Moving the view left reveals what lies to the left, so the world
    /// shifts right on screen.
    pub fn pan_delta(&self, step: f64) -> (f64, f64) {
        match self {
            NavigationDirection::Left => (step, 0.0),
            NavigationDirection::Right => (-step, 0.0),
            NavigationDirection::Up => (0.0, step),
            NavigationDirection::Down => (0.0, -step),
        }
    }
}

/// Raw key as delivered by the host window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Escape,
}

/// What a key press asks the viewport to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Control(ControlAction),
    Pan(NavigationDirection),
    /// Report an explicit deselection
    ClearSelection,
}

impl KeyCommand {
    /// Maps a key to its command; unbound keys yield None
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Char('+') | Key::Char('=') => Some(KeyCommand::Control(ControlAction::ZoomIn)),
            Key::Char('-') | Key::Char('_') => Some(KeyCommand::Control(ControlAction::ZoomOut)),
            Key::Char('0') => Some(KeyCommand::Control(ControlAction::Reset)),
            Key::Char(c) if c.eq_ignore_ascii_case(&'f') => {
                Some(KeyCommand::Control(ControlAction::Fit))
            }
            Key::Char(_) => None,

            Key::ArrowLeft => Some(KeyCommand::Pan(NavigationDirection::Left)),
            Key::ArrowRight => Some(KeyCommand::Pan(NavigationDirection::Right)),
            Key::ArrowUp => Some(KeyCommand::Pan(NavigationDirection::Up)),
            Key::ArrowDown => Some(KeyCommand::Pan(NavigationDirection::Down)),

            Key::Escape => Some(KeyCommand::ClearSelection),
        }
    }
}
