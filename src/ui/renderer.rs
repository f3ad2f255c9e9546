//! Yard rendering with tiny-skia
//!
//! Rendering is split in two steps. [`FramePlan::build`] turns the frame
//! inputs into an ordered list of draw items, and [`YardRenderer`] paints
//! that list. The plan is a pure function of its inputs, which keeps the
//! layering and recolouring rules testable without looking at pixels.
//!
//! Draw order is fixed:
//! 1. background fill
//! 2. section bands and labels
//! 3. background grid
//! 4. stacks, each drawn twice (depth face, then top face)
//! 5. containers inside their stacks, also drawn twice
//! 6. screen-space overlays: pathways, legend, control buttons, tooltip
//!
//! Layers 2 to 5 are painted through the camera transform, which is built
//! once per frame; overlays are painted with the identity transform.

use std::path::PathBuf;

use tiny_skia::{Paint, PathBuilder, Pixmap, Rect as SkiaRect, Stroke, StrokeDash, Transform};

use crate::app::camera::ViewportState;
use crate::config::RenderConfig;
use crate::domain::container::ContainerRecord;
use crate::domain::core::{Point, Rect, Size};
use crate::domain::layout::{Section, YardLayout};
use crate::domain::resolver::Placements;
use crate::ui::controls::ControlBar;
use crate::ui::palette::{self, Rgba};
use crate::ui::text::TextPainter;

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("Failed to create {width}x{height} pixmap for rendering")]
    PixmapCreationFailed { width: u32, height: u32 },

    #[error("Failed to read font file {path}: {source}")]
    FontRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Font data could not be parsed")]
    InvalidFont,
}

/// Draw layers in paint order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Background,
    Sections,
    Grid,
    Stacks,
    Containers,
    Overlays,
}

/// Coordinate space a draw item is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Space {
    World,
    Screen,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Fill {
        rect: Rect,
        color: Rgba,
    },
    Outline {
        rect: Rect,
        color: Rgba,
        width: f32,
    },
    Line {
        from: Point,
        to: Point,
        color: Rgba,
        width: f32,
        dashed: bool,
    },
    /// Single line of text; `at` is the left end of the baseline
    Text {
        text: String,
        at: Point,
        size: f32,
        color: Rgba,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub layer: Layer,
    pub space: Space,
    pub shape: Shape,
}

/// What the pointer is over
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverState {
    /// Registry index of the hovered stack
    pub stack: usize,
    /// Index of the first container in that stack, if any
    pub container: Option<usize>,
    /// Pointer position in screen space
    pub pointer: Point,
}

/// Everything one frame is drawn from
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    pub layout: &'a YardLayout,
    pub containers: &'a [ContainerRecord],
    pub placements: &'a Placements,
    pub viewport: &'a ViewportState,
    pub canvas: Size,
    pub selected: Option<&'a ContainerRecord>,
    pub hovered: Option<HoverState>,
    /// Depth offset of double-drawn boxes, in world units
    pub depth: f64,
}

/// Ordered draw list for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub items: Vec<DrawItem>,
    pub canvas: Size,
    camera: ViewportState,
}

impl FramePlan {
    /// World-space spacing of background grid lines
    pub const GRID_STEP: f64 = 50.0;
    const STACK_LABEL_SIZE: f32 = 8.0;
    const SECTION_LABEL_SIZE: f32 = 10.0;
    const PANEL_TEXT_SIZE: f32 = 13.0;
    const LINE_HEIGHT: f64 = 18.0;

    /// Builds a plan sizing panels with estimated text widths
    pub fn build(input: &FrameInput<'_>) -> Self {
        Self::build_with_text(input, None)
    }

    /// Builds a plan sizing panels and centring labels with `text` metrics
    pub fn build_with_text(input: &FrameInput<'_>, text: Option<&TextPainter>) -> Self {
        let mut plan = Self {
            items: Vec::new(),
            canvas: input.canvas,
            camera: input.viewport.clone(),
        };

        plan.add_background();
        plan.add_sections(input.layout);
        plan.add_grid();
        plan.add_stacks(input);
        plan.add_containers(input);
        plan.add_pathways(input.layout);
        plan.add_legend(input, text);
        plan.add_controls(text);
        plan.add_tooltip(input, text);

        plan
    }

    pub fn camera(&self) -> &ViewportState {
        &self.camera
    }

    pub fn layer_items(&self, layer: Layer) -> impl Iterator<Item = &DrawItem> {
        self.items.iter().filter(move |item| item.layer == layer)
    }

    fn push(&mut self, layer: Layer, space: Space, shape: Shape) {
        self.items.push(DrawItem { layer, space, shape });
    }

    fn add_background(&mut self) {
        let rect = Rect::new(0.0, 0.0, self.canvas.width, self.canvas.height);
        self.push(
            Layer::Background,
            Space::Screen,
            Shape::Fill {
                rect,
                color: palette::BACKGROUND,
            },
        );
    }

    fn add_sections(&mut self, layout: &YardLayout) {
        for section in Section::ALL {
            let Some(band) = layout.section_bounds(section) else {
                continue;
            };
            self.push(
                Layer::Sections,
                Space::World,
                Shape::Fill {
                    rect: band,
                    color: palette::section_fill(section),
                },
            );
            self.push(
                Layer::Sections,
                Space::World,
                Shape::Text {
                    text: section.label().to_string(),
                    at: Point::new(band.x + 4.0, band.y + Self::SECTION_LABEL_SIZE as f64 + 1.0),
                    size: Self::SECTION_LABEL_SIZE,
                    color: palette::SECTION_LABEL,
                },
            );
        }
    }

    fn add_grid(&mut self) {
        let visible = self.camera.visible_world_rect(self.canvas);
        let step = Self::GRID_STEP;

        for x in grid_lines(visible.x, visible.right(), step) {
            self.push(
                Layer::Grid,
                Space::World,
                Shape::Line {
                    from: Point::new(x, visible.y),
                    to: Point::new(x, visible.bottom()),
                    color: palette::GRID_LINE,
                    width: 0.5,
                    dashed: false,
                },
            );
        }

        for y in grid_lines(visible.y, visible.bottom(), step) {
            self.push(
                Layer::Grid,
                Space::World,
                Shape::Line {
                    from: Point::new(visible.x, y),
                    to: Point::new(visible.right(), y),
                    color: palette::GRID_LINE,
                    width: 0.5,
                    dashed: false,
                },
            );
        }
    }

    fn add_stacks(&mut self, input: &FrameInput<'_>) {
        let selected_stack = selected_placement(input).map(|p| p.stack);
        let hovered_stack = input.hovered.map(|h| h.stack);

        for (index, stack) in input.layout.stacks().iter().enumerate() {
            let color = if selected_stack == Some(index) {
                palette::STACK_SELECTED
            } else if hovered_stack == Some(index) {
                palette::STACK_HOVERED
            } else {
                palette::STACK_FACE
            };

            self.push_box(Layer::Stacks, stack.rect, color, input.depth);
            self.push(
                Layer::Stacks,
                Space::World,
                Shape::Outline {
                    rect: stack.rect,
                    color: palette::STACK_OUTLINE,
                    width: 1.0,
                },
            );
            self.push(
                Layer::Stacks,
                Space::World,
                Shape::Text {
                    text: stack.id.clone(),
                    at: Point::new(stack.rect.x, stack.rect.y - 2.0),
                    size: Self::STACK_LABEL_SIZE,
                    color: palette::STACK_LABEL,
                },
            );
        }
    }

    fn add_containers(&mut self, input: &FrameInput<'_>) {
        let hovered_container = input.hovered.and_then(|h| h.container);

        for placement in input.placements.iter() {
            let Some(record) = input.containers.get(placement.container) else {
                continue;
            };

            let is_selected = input.selected.is_some_and(|s| s.same_as(record));
            let color = if is_selected {
                palette::CONTAINER_SELECTED
            } else {
                palette::client_color(&record.client_code)
            };

            self.push_box(Layer::Containers, placement.rect, color, input.depth / 2.0);

            if hovered_container == Some(placement.container) {
                self.push(
                    Layer::Containers,
                    Space::World,
                    Shape::Outline {
                        rect: placement.rect,
                        color: palette::PANEL_TEXT,
                        width: 1.0,
                    },
                );
            }
        }
    }

    /// Depth face offset down-right, then the top face
    fn push_box(&mut self, layer: Layer, rect: Rect, color: Rgba, depth: f64) {
        self.push(
            layer,
            Space::World,
            Shape::Fill {
                rect: rect.translate(depth, depth),
                color: color.shade(palette::SIDE_SHADE),
            },
        );
        self.push(layer, Space::World, Shape::Fill { rect, color });
    }

    fn add_pathways(&mut self, layout: &YardLayout) {
        for pathway in layout.pathways() {
            let from = self.camera.world_to_screen(pathway.from, self.canvas);
            let to = self.camera.world_to_screen(pathway.to, self.canvas);
            let canvas = Rect::new(0.0, 0.0, self.canvas.width, self.canvas.height).inflate(4.0);
            let Some((from, to)) = clip_segment(from, to, canvas) else {
                continue;
            };
            self.push(
                Layer::Overlays,
                Space::Screen,
                Shape::Line {
                    from,
                    to,
                    color: palette::PATHWAY,
                    width: 2.0,
                    dashed: true,
                },
            );
        }
    }

    fn add_legend(&mut self, input: &FrameInput<'_>, text: Option<&TextPainter>) {
        let entries = [
            (palette::STACK_FACE, "Stack"),
            (palette::STACK_HOVERED, "Hovered stack"),
            (palette::STACK_SELECTED, "Selected stack"),
            (palette::CONTAINER_SELECTED, "Selected container"),
        ];
        let footer = format!(
            "Zoom {:.2}x | {} placed, {} unplaced",
            self.camera.zoom(),
            input.placements.len(),
            input.placements.unresolved_count()
        );

        let size = Self::PANEL_TEXT_SIZE;
        let width = entries
            .iter()
            .map(|(_, label)| text_width(text, label, size) + 30.0)
            .chain(std::iter::once(text_width(text, &footer, size) + 10.0))
            .fold(0.0, f64::max)
            + 10.0;
        let height = Self::LINE_HEIGHT * (entries.len() + 1) as f64 + 16.0;
        let panel = Rect::new(12.0, self.canvas.height - 12.0 - height, width, height);
        self.push_panel(panel);

        let mut y = panel.y + 8.0;
        for (color, label) in entries {
            let swatch = Rect::new(panel.x + 10.0, y + 3.0, 12.0, 12.0);
            self.push(Layer::Overlays, Space::Screen, Shape::Fill { rect: swatch, color });
            self.push_panel_text(label, Point::new(panel.x + 30.0, y + 14.0));
            y += Self::LINE_HEIGHT;
        }
        self.push_panel_text(&footer, Point::new(panel.x + 10.0, y + 14.0));
    }

    fn add_controls(&mut self, text: Option<&TextPainter>) {
        for button in ControlBar::for_canvas(self.canvas).buttons() {
            self.push(
                Layer::Overlays,
                Space::Screen,
                Shape::Fill {
                    rect: button.rect,
                    color: palette::BUTTON,
                },
            );
            self.push(
                Layer::Overlays,
                Space::Screen,
                Shape::Outline {
                    rect: button.rect,
                    color: palette::PANEL_BORDER,
                    width: 1.0,
                },
            );
            let label = button.action.label();
            let center = button.rect.center();
            self.push(
                Layer::Overlays,
                Space::Screen,
                Shape::Text {
                    text: label.to_string(),
                    at: Point::new(
                        center.x - text_width(text, label, 16.0) / 2.0,
                        center.y + 6.0,
                    ),
                    size: 16.0,
                    color: palette::PANEL_TEXT,
                },
            );
        }
    }

    fn add_tooltip(&mut self, input: &FrameInput<'_>, text: Option<&TextPainter>) {
        let Some(hover) = input.hovered else {
            return;
        };
        let Some(record) = hover.container.and_then(|i| input.containers.get(i)) else {
            return;
        };

        let mut lines = vec![
            record.number.clone(),
            format!("{} {}", record.kind, record.size),
            format!("Status: {}", record.status),
            format!("Location: {}", record.location),
        ];
        if !record.client_code.is_empty() {
            lines.push(format!("Client: {}", record.client_code));
        }

        let width = lines
            .iter()
            .map(|line| text_width(text, line, Self::PANEL_TEXT_SIZE))
            .fold(0.0, f64::max)
            + 20.0;
        let height = Self::LINE_HEIGHT * lines.len() as f64 + 12.0;

        // Keep the box on the canvas, flipping to the other side of the pointer
        let mut x = hover.pointer.x + 14.0;
        if x + width > self.canvas.width {
            x = (hover.pointer.x - 14.0 - width).max(0.0);
        }
        let mut y = hover.pointer.y + 14.0;
        if y + height > self.canvas.height {
            y = (hover.pointer.y - 14.0 - height).max(0.0);
        }

        let panel = Rect::new(x, y, width, height);
        self.push_panel(panel);
        for (i, line) in lines.iter().enumerate() {
            let baseline = panel.y + 6.0 + Self::LINE_HEIGHT * (i as f64 + 1.0) - 4.0;
            self.push_panel_text(line, Point::new(panel.x + 10.0, baseline));
        }
    }

    fn push_panel(&mut self, rect: Rect) {
        self.push(
            Layer::Overlays,
            Space::Screen,
            Shape::Fill {
                rect,
                color: palette::PANEL,
            },
        );
        self.push(
            Layer::Overlays,
            Space::Screen,
            Shape::Outline {
                rect,
                color: palette::PANEL_BORDER,
                width: 1.0,
            },
        );
    }

    fn push_panel_text(&mut self, text: &str, at: Point) {
        self.push(
            Layer::Overlays,
            Space::Screen,
            Shape::Text {
                text: text.to_string(),
                at,
                size: Self::PANEL_TEXT_SIZE,
                color: palette::PANEL_TEXT,
            },
        );
    }
}

/// Placement of the selected container, if it is in this frame's list
fn selected_placement<'p>(
    input: &FrameInput<'p>,
) -> Option<&'p crate::domain::resolver::ContainerPlacement> {
    let selected = input.selected?;
    input.placements.iter().find(|placement| {
        input
            .containers
            .get(placement.container)
            .is_some_and(|record| record.same_as(selected))
    })
}

/// Upper bound on grid lines per axis
const MAX_GRID_LINES: usize = 512;

/// World positions of grid lines covering `[start, end]`
///
/// Lines are counted by index, so offsets too large for `step` to change
/// the f64 value still yield a bounded list.
fn grid_lines(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> {
    let first = (start / step).floor();
    let last = (end / step).floor();
    let count = if last >= first && (last - first).is_finite() {
        ((last - first) as usize).saturating_add(1).min(MAX_GRID_LINES)
    } else {
        0
    };
    (0..count).map(move |i| (first + i as f64) * step)
}

/// Clips a segment to `bounds` (Liang-Barsky); None when it misses
fn clip_segment(from: Point, to: Point, bounds: Rect) -> Option<(Point, Point)> {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;

    for (p, q) in [
        (-dx, from.x - bounds.x),
        (dx, bounds.right() - from.x),
        (-dy, from.y - bounds.y),
        (dy, bounds.bottom() - from.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    if !(t0.is_finite() && t1.is_finite()) {
        return None;
    }
    Some((
        Point::new(from.x + t0 * dx, from.y + t0 * dy),
        Point::new(from.x + t1 * dx, from.y + t1 * dy),
    ))
}

/// Text width from the loaded font, or an estimate without one
fn text_width(text: Option<&TextPainter>, label: &str, size: f32) -> f64 {
    match text {
        Some(painter) => painter.measure(label, size) as f64,
        None => label.chars().count() as f64 * size as f64 * 0.6,
    }
}

/// Paints frame plans onto pixmaps
#[derive(Debug, Default)]
pub struct YardRenderer {
    text: Option<TextPainter>,
}

impl YardRenderer {
    /// Smallest on-screen text size worth rasterising
    const MIN_TEXT_PX: f32 = 5.0;

    /// Renderer without text; labels are skipped
    pub fn new() -> Self {
        Self { text: None }
    }

    pub fn with_text(text: TextPainter) -> Self {
        Self { text: Some(text) }
    }

    /// Builds a renderer from config, falling back to shapes only when the
    /// font cannot be loaded
    pub fn from_config(config: &RenderConfig) -> Self {
        match &config.font {
            Some(path) => match TextPainter::load(path) {
                Ok(text) => Self::with_text(text),
                Err(e) => {
                    log::warn!("rendering without text: {}", e);
                    Self::new()
                }
            },
            None => Self::new(),
        }
    }

    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }

    /// Renders one frame into `target`
    ///
    /// # Returns
    /// false when there is no surface to draw on; the frame is skipped and
    /// the caller is expected to try again on the next frame
    pub fn render(&self, target: Option<&mut Pixmap>, input: &FrameInput<'_>) -> bool {
        let Some(pixmap) = target else {
            log::trace!("no render surface, skipping frame");
            return false;
        };

        let plan = FramePlan::build_with_text(input, self.text.as_ref());
        self.paint(pixmap, &plan);
        true
    }

    /// Renders one frame into a new pixmap sized to the input canvas
    pub fn render_to_pixmap(&self, input: &FrameInput<'_>) -> Result<Pixmap, RendererError> {
        let (width, height) = (input.canvas.width as u32, input.canvas.height as u32);
        let mut pixmap =
            Pixmap::new(width, height).ok_or(RendererError::PixmapCreationFailed { width, height })?;
        self.paint(&mut pixmap, &FramePlan::build_with_text(input, self.text.as_ref()));
        Ok(pixmap)
    }

    /// Paints a plan in order
    pub fn paint(&self, pixmap: &mut Pixmap, plan: &FramePlan) {
        let world = world_transform(plan.camera(), plan.canvas);
        let zoom = plan.camera().zoom() as f32;

        for item in &plan.items {
            let transform = match item.space {
                Space::World => world,
                Space::Screen => Transform::identity(),
            };

            match &item.shape {
                Shape::Fill { rect, color } => {
                    if let Some(rect) = to_skia_rect(rect) {
                        pixmap.fill_rect(rect, &paint_for(*color), transform, None);
                    }
                }
                Shape::Outline { rect, color, width } => {
                    if let Some(rect) = to_skia_rect(rect) {
                        let path = PathBuilder::from_rect(rect);
                        let stroke = Stroke {
                            width: *width,
                            ..Stroke::default()
                        };
                        pixmap.stroke_path(&path, &paint_for(*color), &stroke, transform, None);
                    }
                }
                Shape::Line {
                    from,
                    to,
                    color,
                    width,
                    dashed,
                } => {
                    let mut builder = PathBuilder::new();
                    builder.move_to(from.x as f32, from.y as f32);
                    builder.line_to(to.x as f32, to.y as f32);
                    if let Some(path) = builder.finish() {
                        let stroke = Stroke {
                            width: *width,
                            dash: if *dashed {
                                StrokeDash::new(vec![10.0, 6.0], 0.0)
                            } else {
                                None
                            },
                            ..Stroke::default()
                        };
                        pixmap.stroke_path(&path, &paint_for(*color), &stroke, transform, None);
                    }
                }
                Shape::Text {
                    text,
                    at,
                    size,
                    color,
                } => {
                    let Some(painter) = &self.text else {
                        continue;
                    };
                    let (at, px) = match item.space {
                        Space::World => (plan.camera().world_to_screen(*at, plan.canvas), size * zoom),
                        Space::Screen => (*at, *size),
                    };
                    if px >= Self::MIN_TEXT_PX {
                        painter.draw(pixmap, text, at.x as f32, at.y as f32, px, *color);
                    }
                }
            }
        }
    }
}

/// Canvas-centre translate, zoom scale, then offset translate
fn world_transform(camera: &ViewportState, canvas: Size) -> Transform {
    let center = canvas.center();
    let zoom = camera.zoom() as f32;
    let offset = camera.offset();
    Transform::from_translate(center.x as f32, center.y as f32)
        .pre_scale(zoom, zoom)
        .pre_translate(offset.x as f32, offset.y as f32)
}

fn to_skia_rect(rect: &Rect) -> Option<SkiaRect> {
    SkiaRect::from_xywh(rect.x as f32, rect.y as f32, rect.w as f32, rect.h as f32)
}

fn paint_for(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_color());
    paint.anti_alias = true;
    paint
}
