//! Viewport controller and coordination layer
//!
//! [`YardViewport`] owns the single [`ViewportState`] of one mounted yard
//! view and routes every event through it: pointer and wheel input, control
//! buttons, keyboard shortcuts, external selection changes and frame
//! callbacks. Everything runs on the caller's thread; one event or one
//! animation tick is applied before the next render.

use tiny_skia::Pixmap;

use crate::app::camera::{CameraTarget, ViewportState};
use crate::app::scheduler::FrameScheduler;
use crate::app::state::{CameraAnimator, CameraEvent};
use crate::config::{ConfigError, YardConfig};
use crate::domain::container::ContainerRecord;
use crate::domain::core::{Point, Size};
use crate::domain::layout::{LayoutError, YardLayout};
use crate::domain::resolver::{LocationResolver, Placements, ResolverError};
use crate::input::keyboard::{Key, KeyCommand};
use crate::input::pointer::{InputContext, InputController, InputOutcome};
use crate::ui::controls::ControlAction;
use crate::ui::renderer::{FrameInput, HoverState, RendererError, YardRenderer};

/// Errors raised while building a viewport
#[derive(Debug, thiserror::Error)]
pub enum ViewportError {
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Resolver error: {0}")]
    Resolver(#[from] ResolverError),

    #[error("Renderer error: {0}")]
    Renderer(#[from] RendererError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Selection callback; receives the clicked container or None for an
/// explicit deselection
pub type SelectCallback = Box<dyn FnMut(Option<&ContainerRecord>)>;

/// One mounted yard view
///
/// Selection is owned by the caller. Clicks are reported through the
/// callback set with [`set_on_select`](Self::set_on_select), and the caller
/// pushes its current choice back with [`set_selected`](Self::set_selected),
/// which is what starts the focus animation.
pub struct YardViewport<S: FrameScheduler> {
    layout: YardLayout,
    resolver: LocationResolver,
    containers: Vec<ContainerRecord>,
    placements: Placements,
    viewport: ViewportState,
    animator: CameraAnimator,
    input: InputController,
    renderer: YardRenderer,
    surface: Option<Pixmap>,
    canvas: Size,
    /// Mirror of the caller's selection, for highlight and focus
    selected: Option<ContainerRecord>,
    hovered: Option<HoverState>,
    focus_zoom: f64,
    depth: f64,
    on_select: Option<SelectCallback>,
    mounted: bool,
    scheduler: S,
}

impl<S: FrameScheduler> YardViewport<S> {
    pub const DEFAULT_FOCUS_ZOOM: f64 = 3.0;
    pub const DEFAULT_DEPTH: f64 = 3.0;

    /// Creates a mounted viewport with an identity camera and no surface
    ///
    /// # Arguments
    /// * `layout` - Stack regions of the yard
    /// * `resolver` - Location-to-stack resolution rule
    /// * `scheduler` - Host frame clock
    pub fn new(layout: YardLayout, resolver: LocationResolver, scheduler: S) -> Self {
        Self {
            layout,
            resolver,
            containers: Vec::new(),
            placements: Placements::default(),
            viewport: ViewportState::default(),
            animator: CameraAnimator::default(),
            input: InputController::default(),
            renderer: YardRenderer::new(),
            surface: None,
            canvas: Size::new(0.0, 0.0),
            selected: None,
            hovered: None,
            focus_zoom: Self::DEFAULT_FOCUS_ZOOM,
            depth: Self::DEFAULT_DEPTH,
            on_select: None,
            mounted: true,
            scheduler,
        }
    }

    /// Builds a viewport from configuration and attaches a surface of the
    /// configured size
    pub fn from_config(config: &YardConfig, scheduler: S) -> Result<Self, ViewportError> {
        config.validate()?;

        let layout = YardLayout::builtin(&config.yard.layout)?;
        let resolver = LocationResolver::new(&config.yard.location_prefix)?;

        let mut viewport = Self::new(layout, resolver, scheduler);
        viewport.viewport = ViewportState::new(config.camera.zoom_limits());
        viewport.animator = config.camera.animator();
        viewport.input = InputController::new(config.input.clone());
        viewport.renderer = YardRenderer::from_config(&config.render);
        viewport.focus_zoom = config.camera.focus_zoom;
        viewport.depth = config.render.depth;
        viewport.attach_surface(config.render.width, config.render.height)?;

        log::info!(
            "viewport ready: layout '{}' with {} stacks, {}x{} surface",
            viewport.layout.id(),
            viewport.layout.stacks().len(),
            config.render.width,
            config.render.height
        );
        Ok(viewport)
    }

    pub fn layout(&self) -> &YardLayout {
        &self.layout
    }

    pub fn containers(&self) -> &[ContainerRecord] {
        &self.containers
    }

    pub fn placements(&self) -> &Placements {
        &self.placements
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    pub fn selected(&self) -> Option<&ContainerRecord> {
        self.selected.as_ref()
    }

    pub fn hovered(&self) -> Option<HoverState> {
        self.hovered
    }

    pub fn surface(&self) -> Option<&Pixmap> {
        self.surface.as_ref()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Replaces the renderer, e.g. to add a font after construction
    pub fn set_renderer(&mut self, renderer: YardRenderer) {
        self.renderer = renderer;
        self.request_frame();
    }

    pub fn set_on_select<F>(&mut self, callback: F)
    where
        F: FnMut(Option<&ContainerRecord>) + 'static,
    {
        self.on_select = Some(Box::new(callback));
    }

    /// Replaces the container list and recomputes placements
    ///
    /// Hover is dropped because container indices may have moved.
    pub fn set_containers(&mut self, containers: Vec<ContainerRecord>) {
        self.placements = Placements::compute(&containers, &self.layout, &self.resolver);
        self.containers = containers;
        self.hovered = None;

        log::debug!(
            "containers updated: {} placed, {} unresolved",
            self.placements.len(),
            self.placements.unresolved_count()
        );
        self.request_frame();
    }

    /// Mirrors the caller's selection and focuses the camera on it
    ///
    /// A container whose location does not resolve leaves the camera
    /// untouched. Selecting the same container again restarts the animation
    /// from wherever the camera is now.
    pub fn set_selected(&mut self, selected: Option<ContainerRecord>) {
        if !self.mounted {
            return;
        }

        if let Some(record) = &selected {
            match self.resolver.resolve(&record.location, &self.layout) {
                Some(stack) => {
                    let target = CameraTarget::centered_on(stack.rect, self.focus_zoom);
                    log::info!("focusing container {} in stack {}", record.number, stack.id);
                    self.animator.process_event(&mut self.viewport, CameraEvent::Focus(target));
                }
                None => {
                    log::debug!(
                        "container {} location '{}' does not resolve, camera unchanged",
                        record.number,
                        record.location
                    );
                }
            }
        }

        self.selected = selected;
        self.request_frame();
    }

    /// Attaches a drawing surface; the canvas size follows it
    pub fn attach_surface(&mut self, width: u32, height: u32) -> Result<(), RendererError> {
        let pixmap =
            Pixmap::new(width, height).ok_or(RendererError::PixmapCreationFailed { width, height })?;
        self.surface = Some(pixmap);
        self.canvas = Size::new(width as f64, height as f64);
        log::debug!("surface attached: {}x{}", width, height);
        self.request_frame();
        Ok(())
    }

    /// Detaches and returns the surface; frames render nothing until a new
    /// one is attached
    pub fn detach_surface(&mut self) -> Option<Pixmap> {
        log::debug!("surface detached");
        self.surface.take()
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        if !self.mounted {
            return;
        }
        self.input.pointer_down(Point::new(x, y));
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if !self.mounted {
            return;
        }
        let pointer = Point::new(x, y);
        let ctx = InputContext {
            layout: &self.layout,
            placements: &self.placements,
            canvas: self.canvas,
            animator: &self.animator,
        };
        let outcome = self.input.pointer_move(pointer, &mut self.viewport, &ctx);
        self.apply(outcome, pointer);
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) {
        if !self.mounted {
            return;
        }
        let pointer = Point::new(x, y);
        let ctx = InputContext {
            layout: &self.layout,
            placements: &self.placements,
            canvas: self.canvas,
            animator: &self.animator,
        };
        let outcome = self.input.pointer_up(pointer, &mut self.viewport, &ctx);
        self.apply(outcome, pointer);
    }

    pub fn pointer_leave(&mut self) {
        if !self.mounted {
            return;
        }
        let outcome = self.input.pointer_leave();
        self.apply(outcome, Point::ORIGIN);
    }

    /// Wheel event; positive `delta_y` zooms out
    pub fn wheel(&mut self, delta_y: f64) {
        if !self.mounted {
            return;
        }
        let ctx = InputContext {
            layout: &self.layout,
            placements: &self.placements,
            canvas: self.canvas,
            animator: &self.animator,
        };
        let outcome = self.input.wheel(delta_y, &mut self.viewport, &ctx);
        self.apply(outcome, Point::ORIGIN);
    }

    /// Applies a control-button action directly, as a host toolbar would
    pub fn control(&mut self, action: ControlAction) {
        if !self.mounted {
            return;
        }
        let ctx = InputContext {
            layout: &self.layout,
            placements: &self.placements,
            canvas: self.canvas,
            animator: &self.animator,
        };
        let outcome = self.input.control(action, &mut self.viewport, &ctx);
        self.apply(outcome, Point::ORIGIN);
    }

    /// Handles a key press; unbound keys are ignored
    pub fn key(&mut self, key: Key) {
        if !self.mounted {
            return;
        }
        let Some(command) = KeyCommand::from_key(key) else {
            log::trace!("unbound key {:?}", key);
            return;
        };

        match command {
            KeyCommand::Control(action) => self.control(action),
            KeyCommand::Pan(direction) => {
                let (dx, dy) = direction.pan_delta(self.input.settings().pan_step);
                let ctx = InputContext {
                    layout: &self.layout,
                    placements: &self.placements,
                    canvas: self.canvas,
                    animator: &self.animator,
                };
                let outcome = self.input.pan(dx, dy, &mut self.viewport, &ctx);
                self.apply(outcome, Point::ORIGIN);
            }
            KeyCommand::ClearSelection => self.report_selection(None),
        }
    }

    /// Runs one frame: at most one animation tick, then a render
    ///
    /// # Returns
    /// true if something was drawn; false after unmount or without a
    /// surface
    pub fn on_frame(&mut self) -> bool {
        if !self.mounted {
            log::trace!("frame after unmount ignored");
            return false;
        }

        let still_animating = self.animator.process_event(&mut self.viewport, CameraEvent::Tick);

        let input = FrameInput {
            layout: &self.layout,
            containers: &self.containers,
            placements: &self.placements,
            viewport: &self.viewport,
            canvas: self.canvas,
            selected: self.selected.as_ref(),
            hovered: self.hovered,
            depth: self.depth,
        };
        let drawn = self.renderer.render(self.surface.as_mut(), &input);

        if still_animating {
            self.scheduler.request_frame();
        }
        drawn
    }

    /// Stops the frame clock and releases the surface; later events and
    /// frames are ignored
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.scheduler.cancel_frame();
        self.viewport.cancel_animation();
        self.surface = None;
        self.hovered = None;
        log::info!("viewport unmounted");
    }

    fn apply(&mut self, outcome: InputOutcome, pointer: Point) {
        match outcome {
            InputOutcome::Ignored => {}
            InputOutcome::CameraChanged => self.request_frame(),
            InputOutcome::Hover(hit) => {
                let hovered = hit.map(|hit| HoverState {
                    stack: hit.stack,
                    container: hit.container.map(|placement| placement.container),
                    pointer,
                });
                if hovered != self.hovered {
                    self.hovered = hovered;
                    self.request_frame();
                }
            }
            InputOutcome::Select(container) => self.report_selection(container),
        }
    }

    fn report_selection(&mut self, container: Option<usize>) {
        let record = container.and_then(|index| self.containers.get(index));
        match record {
            Some(record) => log::info!("container {} clicked", record.number),
            None => log::debug!("deselection reported"),
        }
        if let Some(callback) = self.on_select.as_mut() {
            callback(record);
        }
    }

    fn request_frame(&mut self) {
        if self.mounted {
            self.scheduler.request_frame();
        }
    }
}

impl<S: FrameScheduler + std::fmt::Debug> std::fmt::Debug for YardViewport<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YardViewport")
            .field("layout", &self.layout.id())
            .field("containers", &self.containers.len())
            .field("viewport", &self.viewport)
            .field("canvas", &self.canvas)
            .field("selected", &self.selected.as_ref().map(|c| &c.id))
            .field("mounted", &self.mounted)
            .field("scheduler", &self.scheduler)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::scheduler::ManualScheduler;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn containers() -> Vec<ContainerRecord> {
        vec![
            ContainerRecord::new("c5", "MSKU5555555", "Stack S5 / Tier 2").with_client("MSC"),
            ContainerRecord::new("c12", "CMAU1212121", "S12").with_client("CMA"),
            ContainerRecord::new("lost", "ZZZU0000000", "awaiting survey"),
        ]
    }

    fn viewport() -> YardViewport<ManualScheduler> {
        let mut viewport =
            YardViewport::from_config(&YardConfig::default(), ManualScheduler::new()).unwrap();
        viewport.set_containers(containers());
        viewport.scheduler_mut().take_frame();
        viewport
    }

    fn recorded(viewport: &mut YardViewport<ManualScheduler>) -> Rc<RefCell<Vec<Option<String>>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        viewport.set_on_select(move |record| {
            sink.borrow_mut().push(record.map(|r| r.id.clone()));
        });
        log
    }

    fn run_frames(viewport: &mut YardViewport<ManualScheduler>, limit: usize) -> usize {
        let mut frames = 0;
        while viewport.scheduler_mut().take_frame() {
            viewport.on_frame();
            frames += 1;
            assert!(frames <= limit, "animation did not settle");
        }
        frames
    }

    fn click(viewport: &mut YardViewport<ManualScheduler>, world: Point) {
        let screen = viewport.viewport().world_to_screen(world, viewport.canvas());
        viewport.pointer_down(screen.x, screen.y);
        viewport.pointer_up(screen.x, screen.y);
    }

    #[test]
    fn from_config_mounts_with_identity_camera() {
        let viewport = viewport();
        assert!(viewport.is_mounted());
        assert_eq!(viewport.viewport(), &ViewportState::default());
        assert_eq!(viewport.canvas(), Size::new(1200.0, 800.0));
        assert_eq!(viewport.placements().len(), 2);
        assert_eq!(viewport.placements().unresolved_count(), 1);
    }

    #[test]
    fn unknown_layout_is_rejected() {
        let mut config = YardConfig::default();
        config.yard.layout = "harbour".to_string();
        let result = YardViewport::from_config(&config, ManualScheduler::new());
        assert!(matches!(result, Err(ViewportError::Layout(_))));
    }

    #[test]
    fn click_reports_container_and_deselection() {
        let mut viewport = viewport();
        let log = recorded(&mut viewport);

        click(&mut viewport, Point::new(230.0, 70.0));
        click(&mut viewport, Point::new(5.0, 5.0));

        assert_eq!(*log.borrow(), vec![Some("c5".to_string()), None]);
        // Clicking does not change the mirrored selection
        assert!(viewport.selected().is_none());
    }

    #[test]
    fn selection_focuses_and_settles_on_stack() {
        let mut viewport = viewport();
        viewport.set_selected(Some(containers()[0].clone()));
        assert!(viewport.viewport().is_animating());

        let frames = run_frames(&mut viewport, 200);
        assert!(frames > 1);

        let state = viewport.viewport();
        assert!(!state.is_animating());
        assert_eq!(state.zoom(), 3.0);
        assert_eq!(state.offset(), Point::new(-230.0, -70.0));
    }

    #[test]
    fn wide_stack_focus_lands_on_its_centre() {
        use crate::domain::layout::{Section, StackRegion};

        let layout = YardLayout::new(
            "wide",
            vec![
                StackRegion::new("S1", 10.0, 50.0, 60.0, 40.0, Section::Top),
                StackRegion::new("S5", 210.0, 50.0, 60.0, 40.0, Section::Top),
            ],
        )
        .unwrap();
        let mut viewport =
            YardViewport::new(layout, LocationResolver::new("S").unwrap(), ManualScheduler::new());
        viewport.attach_surface(1200, 800).unwrap();
        let record = ContainerRecord::new("c5", "MSKU5555555", "S5");
        viewport.set_containers(vec![record.clone()]);
        viewport.scheduler_mut().take_frame();

        viewport.set_selected(Some(record));
        let frames = run_frames(&mut viewport, 44);

        let state = viewport.viewport();
        assert!(frames <= 44);
        assert_eq!(state.zoom(), 3.0);
        assert_eq!(state.offset(), Point::new(-240.0, -70.0));
    }

    #[test]
    fn unresolved_selection_leaves_camera_alone() {
        let mut viewport = viewport();
        viewport.wheel(-1.0);
        let before = viewport.viewport().clone();

        viewport.set_selected(Some(containers()[2].clone()));
        assert_eq!(viewport.viewport(), &before);
        assert!(!viewport.viewport().is_animating());
        assert_eq!(viewport.selected().map(|c| c.id.as_str()), Some("lost"));
    }

    #[test]
    fn drag_cancels_animation_and_next_frame_keeps_pan() {
        let mut viewport = viewport();
        viewport.set_selected(Some(containers()[0].clone()));
        for _ in 0..5 {
            viewport.scheduler_mut().take_frame();
            viewport.on_frame();
        }
        assert!(viewport.viewport().is_animating());

        viewport.pointer_down(600.0, 400.0);
        viewport.pointer_move(640.0, 400.0);
        assert!(!viewport.viewport().is_animating());

        let panned = viewport.viewport().clone();
        viewport.on_frame();
        assert_eq!(viewport.viewport(), &panned);
        assert_eq!(run_frames(&mut viewport, 1), 1);
        assert!(!viewport.scheduler().is_pending());
    }

    #[test]
    fn reselecting_restarts_from_current_camera() {
        let mut viewport = viewport();
        let record = containers()[1].clone();
        viewport.set_selected(Some(record.clone()));
        run_frames(&mut viewport, 200);
        let settled = viewport.viewport().clone();

        viewport.key(Key::ArrowLeft);
        assert_ne!(viewport.viewport(), &settled);

        viewport.set_selected(Some(record));
        assert!(viewport.viewport().is_animating());
        run_frames(&mut viewport, 200);
        assert_eq!(viewport.viewport(), &settled);
    }

    #[test]
    fn hover_tracks_stack_under_pointer() {
        let mut viewport = viewport();
        let screen = viewport
            .viewport()
            .world_to_screen(Point::new(230.0, 70.0), viewport.canvas());
        viewport.pointer_move(screen.x, screen.y);

        let hover = viewport.hovered().unwrap();
        assert_eq!(hover.stack, viewport.layout().index_of("S5").unwrap());
        assert_eq!(hover.container, Some(0));
        assert!(viewport.scheduler().is_pending());

        viewport.pointer_leave();
        assert!(viewport.hovered().is_none());
    }

    #[test]
    fn escape_reports_deselection() {
        let mut viewport = viewport();
        let log = recorded(&mut viewport);
        viewport.key(Key::Escape);
        viewport.key(Key::Char('q'));
        assert_eq!(*log.borrow(), vec![None]);
    }

    #[test]
    fn frames_without_surface_skip_drawing() {
        let mut viewport = viewport();
        assert!(viewport.on_frame());

        let surface = viewport.detach_surface();
        assert!(surface.is_some());
        assert!(!viewport.on_frame());

        viewport.attach_surface(320, 200).unwrap();
        assert_eq!(viewport.canvas(), Size::new(320.0, 200.0));
        assert!(viewport.on_frame());
    }

    #[test]
    fn unmount_stops_frames_and_input() {
        let mut viewport = viewport();
        let log = recorded(&mut viewport);
        viewport.set_selected(Some(containers()[0].clone()));
        assert!(viewport.scheduler().is_pending());

        viewport.unmount();
        assert!(!viewport.scheduler().is_pending());
        assert!(viewport.surface().is_none());
        assert!(!viewport.on_frame());

        let frozen = viewport.viewport().clone();
        viewport.wheel(1.0);
        click(&mut viewport, Point::new(230.0, 70.0));
        assert_eq!(viewport.viewport(), &frozen);
        assert!(log.borrow().is_empty());
        assert!(!viewport.scheduler().is_pending());
    }
}
