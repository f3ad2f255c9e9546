//! On-canvas camera control buttons
//!
//! Buttons sit in a vertical strip at the top-right corner of the canvas, in
//! screen space. The same geometry feeds both drawing and click handling.

use crate::domain::core::{Point, Rect, Size};

/// What a control button does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    ZoomIn,
    ZoomOut,
    Reset,
    Fit,
}

impl ControlAction {
    pub const ALL: [ControlAction; 4] = [
        ControlAction::ZoomIn,
        ControlAction::ZoomOut,
        ControlAction::Reset,
        ControlAction::Fit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ControlAction::ZoomIn => "+",
            ControlAction::ZoomOut => "-",
            ControlAction::Reset => "R",
            ControlAction::Fit => "F",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlButton {
    pub action: ControlAction,
    pub rect: Rect,
}

/// Button strip for a canvas of a given size
#[derive(Debug, Clone, PartialEq)]
pub struct ControlBar {
    buttons: Vec<ControlButton>,
}

impl ControlBar {
    pub const BUTTON_SIZE: f64 = 32.0;
    pub const MARGIN: f64 = 12.0;
    pub const SPACING: f64 = 6.0;

    pub fn for_canvas(canvas: Size) -> Self {
        let x = canvas.width - Self::MARGIN - Self::BUTTON_SIZE;
        let buttons = ControlAction::ALL
            .iter()
            .enumerate()
            .map(|(i, action)| ControlButton {
                action: *action,
                rect: Rect::new(
                    x,
                    Self::MARGIN + i as f64 * (Self::BUTTON_SIZE + Self::SPACING),
                    Self::BUTTON_SIZE,
                    Self::BUTTON_SIZE,
                ),
            })
            .collect();

        Self { buttons }
    }

    pub fn buttons(&self) -> &[ControlButton] {
        &self.buttons
    }

    /// Button under a screen-space point
    pub fn hit(&self, screen: Point) -> Option<ControlAction> {
        self.buttons
            .iter()
            .find(|button| button.rect.contains_point(screen))
            .map(|button| button.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_stack_in_top_right_corner() {
        let bar = ControlBar::for_canvas(Size::new(1200.0, 800.0));
        assert_eq!(bar.buttons().len(), 4);

        let first = bar.buttons()[0].rect;
        assert_eq!(first, Rect::new(1156.0, 12.0, 32.0, 32.0));
        assert_eq!(bar.buttons()[1].rect.y, 50.0);
    }

    #[test]
    fn hit_maps_to_action() {
        let bar = ControlBar::for_canvas(Size::new(1200.0, 800.0));
        assert_eq!(bar.hit(Point::new(1170.0, 20.0)), Some(ControlAction::ZoomIn));
        assert_eq!(bar.hit(Point::new(1170.0, 60.0)), Some(ControlAction::ZoomOut));
        assert_eq!(bar.hit(Point::new(1170.0, 140.0)), Some(ControlAction::Fit));
        assert_eq!(bar.hit(Point::new(600.0, 400.0)), None);
    }
}
