//! Viewport camera state and coordinate transforms
//!
//! The camera maps world space onto a canvas:
//!
//! ```text
//! screen = canvas_center + zoom * (world + offset)
//! world  = (screen - canvas_center) / zoom - offset
//! ```
//!
//! Zoom is clamped to [`ZoomLimits`] at every mutation site, so a reader never
//! observes an out-of-range value.

use crate::domain::core::{Point, Rect, Size};

/// Inclusive zoom bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
}

impl ZoomLimits {
    pub const DEFAULT: ZoomLimits = ZoomLimits { min: 0.3, max: 5.0 };

    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min, self.max)
    }
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Where an animation is heading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTarget {
    pub zoom: f64,
    pub offset: Point,
}

impl CameraTarget {
    /// Target that puts the centre of `rect` in the middle of the canvas
    pub fn centered_on(rect: Rect, zoom: f64) -> Self {
        let center = rect.center();
        Self {
            zoom,
            offset: Point::new(-center.x, -center.y),
        }
    }

    /// Target that shows all of `bounds`, filling `padding` of the tighter
    /// canvas axis
    pub fn fit(bounds: Rect, canvas: Size, padding: f64) -> Self {
        let zoom = if bounds.w > 0.0 && bounds.h > 0.0 {
            padding * (canvas.width / bounds.w).min(canvas.height / bounds.h)
        } else {
            1.0
        };
        Self::centered_on(bounds, zoom)
    }
}

/// Idle/Animating state of the camera
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CameraMode {
    #[default]
    Idle,
    /// Heading for `target`; `from` is the camera when the animation began
    Animating { target: CameraTarget, from: CameraTarget },
}

/// The single mutable camera of a viewport
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    zoom: f64,
    offset: Point,
    limits: ZoomLimits,
    mode: CameraMode,
}

impl ViewportState {
    /// Identity transform: zoom 1, no offset, idle
    pub fn new(limits: ZoomLimits) -> Self {
        Self {
            zoom: limits.clamp(1.0),
            offset: Point::ORIGIN,
            limits,
            mode: CameraMode::Idle,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.mode, CameraMode::Animating { .. })
    }

    pub fn target(&self) -> Option<CameraTarget> {
        match self.mode {
            CameraMode::Animating { target, .. } => Some(target),
            CameraMode::Idle => None,
        }
    }

    /// Sets zoom, clamped to the limits; non-finite values are ignored
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = self.limits.clamp(zoom);
        }
    }

    /// Multiplies zoom by `factor`, clamped to the limits
    pub fn scale_zoom(&mut self, factor: f64) {
        self.set_zoom(self.zoom * factor);
    }

    /// Sets the pan offset; non-finite values are ignored
    pub fn set_offset(&mut self, offset: Point) {
        if offset.x.is_finite() && offset.y.is_finite() {
            self.offset = offset;
        }
    }

    /// Pans by a world-space delta
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.set_offset(Point::new(self.offset.x + dx, self.offset.y + dy));
    }

    /// Pans by a screen-space delta, converted to world units at the current zoom
    pub fn pan_by_screen(&mut self, dx: f64, dy: f64) {
        self.pan_by(dx / self.zoom, dy / self.zoom);
    }

    /// Back to zoom 1, no offset, idle
    pub fn reset(&mut self) {
        self.set_zoom(1.0);
        self.offset = Point::ORIGIN;
        self.mode = CameraMode::Idle;
    }

    pub(crate) fn begin_animation(&mut self, target: CameraTarget) {
        self.mode = CameraMode::Animating {
            target: CameraTarget {
                zoom: self.limits.clamp(target.zoom),
                offset: target.offset,
            },
            from: CameraTarget {
                zoom: self.zoom,
                offset: self.offset,
            },
        };
    }

    /// Drops any animation target; returns true if one was active
    pub(crate) fn cancel_animation(&mut self) -> bool {
        let was_animating = self.is_animating();
        self.mode = CameraMode::Idle;
        was_animating
    }

    /// Jumps exactly onto the current target and goes idle
    pub(crate) fn settle(&mut self) {
        if let CameraMode::Animating { target, .. } = self.mode {
            self.set_zoom(target.zoom);
            self.set_offset(target.offset);
        }
        self.mode = CameraMode::Idle;
    }

    pub fn world_to_screen(&self, p: Point, canvas: Size) -> Point {
        world_to_screen(p, self, canvas)
    }

    pub fn screen_to_world(&self, q: Point, canvas: Size) -> Point {
        screen_to_world(q, self, canvas)
    }

    /// World-space rectangle currently visible on the canvas
    pub fn visible_world_rect(&self, canvas: Size) -> Rect {
        let top_left = self.screen_to_world(Point::ORIGIN, canvas);
        Rect::new(
            top_left.x,
            top_left.y,
            canvas.width / self.zoom,
            canvas.height / self.zoom,
        )
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(ZoomLimits::DEFAULT)
    }
}

/// `q = canvas_center + zoom * (p + offset)`
pub fn world_to_screen(p: Point, viewport: &ViewportState, canvas: Size) -> Point {
    let center = canvas.center();
    Point::new(
        center.x + viewport.zoom * (p.x + viewport.offset.x),
        center.y + viewport.zoom * (p.y + viewport.offset.y),
    )
}

/// `p = (q - canvas_center) / zoom - offset`
pub fn screen_to_world(q: Point, viewport: &ViewportState, canvas: Size) -> Point {
    let center = canvas.center();
    Point::new(
        (q.x - center.x) / viewport.zoom - viewport.offset.x,
        (q.y - center.y) / viewport.zoom - viewport.offset.y,
    )
}
