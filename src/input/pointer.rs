//! Pointer, wheel and control-button handling
//!
//! The controller turns raw events into camera mutations and reports what
//! happened as an [`InputOutcome`]. It never calls the selection callback
//! itself; the owning viewport does that, so the controller stays testable
//! with plain values.

use crate::app::camera::{CameraTarget, ViewportState};
use crate::app::state::{CameraAnimator, CameraEvent};
use crate::config::InputConfig;
use crate::domain::core::{Point, Size};
use crate::domain::hit_test::{Hit, pick};
use crate::domain::layout::YardLayout;
use crate::domain::resolver::Placements;
use crate::ui::controls::{ControlAction, ControlBar};

/// Read-only collaborators an input event needs
#[derive(Debug, Clone, Copy)]
pub struct InputContext<'a> {
    pub layout: &'a YardLayout,
    pub placements: &'a Placements,
    pub canvas: Size,
    pub animator: &'a CameraAnimator,
}

/// Result of handling one input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputOutcome {
    /// Nothing observable changed
    Ignored,
    /// Zoom or offset changed
    CameraChanged,
    /// Pointer moved without a drag; the current hover target
    Hover(Option<Hit>),
    /// A click landed on the yard; the container index to report, or None
    /// for an explicit deselection
    Select(Option<usize>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Released,
    /// Pointer is down; not yet known whether this is a drag or a click
    Pressed { origin: Point, last: Point },
}

/// Turns pointer and wheel events into camera and selection changes
#[derive(Debug, Clone)]
pub struct InputController {
    settings: InputConfig,
    drag: DragState,
}

impl InputController {
    pub fn new(settings: InputConfig) -> Self {
        Self {
            settings,
            drag: DragState::Released,
        }
    }

    pub fn settings(&self) -> &InputConfig {
        &self.settings
    }

    /// True while the pointer is held down
    pub fn is_pressed(&self) -> bool {
        matches!(self.drag, DragState::Pressed { .. })
    }

    /// Starts a drag candidate at a screen point
    pub fn pointer_down(&mut self, screen: Point) {
        self.drag = DragState::Pressed {
            origin: screen,
            last: screen,
        };
    }

    /// Pans while pressed, otherwise hit-tests for hover
    pub fn pointer_move(
        &mut self,
        screen: Point,
        state: &mut ViewportState,
        ctx: &InputContext<'_>,
    ) -> InputOutcome {
        match self.drag {
            DragState::Pressed { origin, last } => {
                self.drag = DragState::Pressed {
                    origin,
                    last: screen,
                };

                let (dx, dy) = (screen.x - last.x, screen.y - last.y);
                if dx == 0.0 && dy == 0.0 {
                    return InputOutcome::Ignored;
                }

                ctx.animator.process_event(state, CameraEvent::ManualInput);
                state.pan_by_screen(dx, dy);
                InputOutcome::CameraChanged
            }
            DragState::Released => {
                let world = state.screen_to_world(screen, ctx.canvas);
                InputOutcome::Hover(pick(world, ctx.layout, ctx.placements))
            }
        }
    }

    /// Ends the press; a press that barely moved becomes a click
    pub fn pointer_up(
        &mut self,
        screen: Point,
        state: &mut ViewportState,
        ctx: &InputContext<'_>,
    ) -> InputOutcome {
        let DragState::Pressed { origin, .. } = std::mem::replace(&mut self.drag, DragState::Released)
        else {
            return InputOutcome::Ignored;
        };

        if origin.distance_to(screen) > self.settings.click_threshold {
            return InputOutcome::Ignored;
        }

        if let Some(action) = ControlBar::for_canvas(ctx.canvas).hit(screen) {
            return self.control(action, state, ctx);
        }

        let world = state.screen_to_world(screen, ctx.canvas);
        let selected = pick(world, ctx.layout, ctx.placements)
            .and_then(|hit| hit.container)
            .map(|placement| placement.container);

        InputOutcome::Select(selected)
    }

    /// Pointer left the canvas; drops the press and the hover
    pub fn pointer_leave(&mut self) -> InputOutcome {
        self.drag = DragState::Released;
        InputOutcome::Hover(None)
    }

    /// Positive `delta_y` scrolls down/away and zooms out
    ///
    /// Zoom is anchored at the canvas centre, not under the cursor.
    pub fn wheel(
        &mut self,
        delta_y: f64,
        state: &mut ViewportState,
        ctx: &InputContext<'_>,
    ) -> InputOutcome {
        let factor = if delta_y > 0.0 {
            self.settings.wheel_zoom_out
        } else if delta_y < 0.0 {
            self.settings.wheel_zoom_in
        } else {
            return InputOutcome::Ignored;
        };

        ctx.animator.process_event(state, CameraEvent::ManualInput);
        state.scale_zoom(factor);
        InputOutcome::CameraChanged
    }

    /// Applies a control-button action
    ///
    /// Zoom steps cancel animation like any manual input; reset and fit set
    /// the camera directly, which also ends any animation.
    pub fn control(
        &self,
        action: ControlAction,
        state: &mut ViewportState,
        ctx: &InputContext<'_>,
    ) -> InputOutcome {
        ctx.animator.process_event(state, CameraEvent::ManualInput);

        match action {
            ControlAction::ZoomIn => state.scale_zoom(self.settings.button_zoom_step),
            ControlAction::ZoomOut => state.scale_zoom(1.0 / self.settings.button_zoom_step),
            ControlAction::Reset => state.reset(),
            ControlAction::Fit => {
                let target =
                    CameraTarget::fit(ctx.layout.bounds(), ctx.canvas, self.settings.fit_padding);
                state.set_zoom(target.zoom);
                state.set_offset(target.offset);
            }
        }

        log::debug!("control {:?}: zoom now {:.2}", action, state.zoom());
        InputOutcome::CameraChanged
    }

    /// Pans by a screen-space delta as a manual input
    pub fn pan(
        &self,
        dx: f64,
        dy: f64,
        state: &mut ViewportState,
        ctx: &InputContext<'_>,
    ) -> InputOutcome {
        ctx.animator.process_event(state, CameraEvent::ManualInput);
        state.pan_by_screen(dx, dy);
        InputOutcome::CameraChanged
    }
}

impl Default for InputController {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::container::ContainerRecord;
    use crate::domain::layout::{Section, StackRegion};
    use crate::domain::resolver::LocationResolver;

    const CANVAS: Size = Size {
        width: 800.0,
        height: 600.0,
    };

    struct Fixture {
        layout: YardLayout,
        placements: Placements,
        animator: CameraAnimator,
    }

    impl Fixture {
        fn new() -> Self {
            let layout = YardLayout::new(
                "test",
                vec![
                    StackRegion::new("S1", 10.0, 50.0, 60.0, 40.0, Section::Top),
                    StackRegion::new("S5", 210.0, 50.0, 60.0, 40.0, Section::Top),
                ],
            )
            .unwrap();
            let containers = vec![ContainerRecord::new("c5", "MSKU5555555", "Stack S5")];
            let resolver = LocationResolver::new("S").unwrap();
            let placements = Placements::compute(&containers, &layout, &resolver);
            Self {
                layout,
                placements,
                animator: CameraAnimator::default(),
            }
        }

        fn ctx(&self) -> InputContext<'_> {
            InputContext {
                layout: &self.layout,
                placements: &self.placements,
                canvas: CANVAS,
                animator: &self.animator,
            }
        }
    }

    fn click_world(
        input: &mut InputController,
        state: &mut ViewportState,
        ctx: &InputContext<'_>,
        world: Point,
    ) -> InputOutcome {
        let screen = state.world_to_screen(world, ctx.canvas);
        input.pointer_down(screen);
        input.pointer_up(screen, state, ctx)
    }

    #[test]
    fn click_inside_stack_selects_container() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut input = InputController::default();
        let mut state = ViewportState::default();

        let outcome = click_world(&mut input, &mut state, &ctx, Point::new(230.0, 65.0));
        assert_eq!(outcome, InputOutcome::Select(Some(0)));
    }

    #[test]
    fn click_outside_stacks_deselects() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut input = InputController::default();
        let mut state = ViewportState::default();

        let outcome = click_world(&mut input, &mut state, &ctx, Point::new(5.0, 5.0));
        assert_eq!(outcome, InputOutcome::Select(None));

        // Empty stack also reports no container
        let outcome = click_world(&mut input, &mut state, &ctx, Point::new(20.0, 60.0));
        assert_eq!(outcome, InputOutcome::Select(None));
    }

    #[test]
    fn drag_pans_in_world_units_and_is_not_a_click() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut input = InputController::default();
        let mut state = ViewportState::default();
        state.set_zoom(2.0);

        input.pointer_down(Point::new(100.0, 100.0));
        let outcome = input.pointer_move(Point::new(140.0, 80.0), &mut state, &ctx);
        assert_eq!(outcome, InputOutcome::CameraChanged);
        assert_eq!(state.offset(), Point::new(20.0, -10.0));

        let outcome = input.pointer_up(Point::new(140.0, 80.0), &mut state, &ctx);
        assert_eq!(outcome, InputOutcome::Ignored);
        assert!(!input.is_pressed());
    }

    #[test]
    fn small_jitter_still_counts_as_click() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut input = InputController::default();
        let mut state = ViewportState::default();

        let screen = state.world_to_screen(Point::new(230.0, 65.0), CANVAS);
        input.pointer_down(screen);
        input.pointer_move(Point::new(screen.x + 1.0, screen.y + 1.0), &mut state, &ctx);
        let up = state.world_to_screen(Point::new(231.0, 66.0), CANVAS);
        let outcome = input.pointer_up(Point::new(up.x, up.y), &mut state, &ctx);
        assert_eq!(outcome, InputOutcome::Select(Some(0)));
    }

    #[test]
    fn hover_matches_click_for_same_point() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut input = InputController::default();
        let mut state = ViewportState::default();
        state.set_zoom(1.7);
        state.set_offset(Point::new(-120.0, 15.0));

        for world in [
            Point::new(230.0, 65.0),
            Point::new(5.0, 5.0),
            Point::new(69.0, 89.0),
            Point::new(270.0, 90.0),
        ] {
            let screen = state.world_to_screen(world, CANVAS);
            let InputOutcome::Hover(hover) = input.pointer_move(screen, &mut state, &ctx) else {
                panic!("expected hover outcome");
            };
            let clicked = click_world(&mut input, &mut state, &ctx, world);
            let hovered = hover.and_then(|hit| hit.container).map(|p| p.container);
            assert_eq!(clicked, InputOutcome::Select(hovered));
        }
    }

    #[test]
    fn wheel_clamps_at_limits() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut input = InputController::default();
        let mut state = ViewportState::default();

        for _ in 0..100 {
            input.wheel(1.0, &mut state, &ctx);
            assert!(state.zoom() >= 0.3);
        }
        assert_eq!(state.zoom(), 0.3);

        for _ in 0..100 {
            input.wheel(-1.0, &mut state, &ctx);
            assert!(state.zoom() <= 5.0);
        }
        assert_eq!(state.zoom(), 5.0);

        assert_eq!(input.wheel(0.0, &mut state, &ctx), InputOutcome::Ignored);
    }

    #[test]
    fn manual_input_cancels_animation() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut input = InputController::default();

        let target = CameraTarget {
            zoom: 3.0,
            offset: Point::new(-240.0, -70.0),
        };

        let mut state = ViewportState::default();
        fixture.animator.process_event(&mut state, CameraEvent::Focus(target));
        input.wheel(-1.0, &mut state, &ctx);
        assert!(!state.is_animating());

        let mut state = ViewportState::default();
        fixture.animator.process_event(&mut state, CameraEvent::Focus(target));
        input.pointer_down(Point::new(0.0, 0.0));
        input.pointer_move(Point::new(10.0, 0.0), &mut state, &ctx);
        assert!(!state.is_animating());
    }

    #[test]
    fn controls_apply_camera_changes() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let input = InputController::default();
        let mut state = ViewportState::default();

        input.control(ControlAction::ZoomIn, &mut state, &ctx);
        assert!((state.zoom() - 1.2).abs() < 1e-12);
        input.control(ControlAction::ZoomOut, &mut state, &ctx);
        assert!((state.zoom() - 1.0).abs() < 1e-12);

        input.control(ControlAction::Fit, &mut state, &ctx);
        let bounds = fixture.layout.bounds();
        assert_eq!(state.offset(), Point::new(-bounds.center().x, -bounds.center().y));

        input.control(ControlAction::Reset, &mut state, &ctx);
        assert_eq!(state, ViewportState::default());
    }

    #[test]
    fn click_on_control_button_does_not_select() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut input = InputController::default();
        let mut state = ViewportState::default();

        let button = ControlBar::for_canvas(CANVAS).buttons()[0].rect.center();
        input.pointer_down(button);
        let outcome = input.pointer_up(button, &mut state, &ctx);
        assert_eq!(outcome, InputOutcome::CameraChanged);
        assert!(state.zoom() > 1.0);
    }

    #[test]
    fn up_without_down_is_ignored() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut input = InputController::default();
        let mut state = ViewportState::default();
        assert_eq!(
            input.pointer_up(Point::new(1.0, 1.0), &mut state, &ctx),
            InputOutcome::Ignored
        );
    }
}
