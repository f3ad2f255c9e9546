//! Yard layout registry
//!
//! A layout is an immutable set of named rectangular storage regions
//! ("stacks") grouped into sections. Layouts are built once per yard and
//! shared by reference; nothing mutates them after construction.

use std::collections::HashSet;

use crate::domain::core::{Point, Rect};

/// Errors that can occur while building a layout
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("Unknown built-in layout '{0}'")]
    UnknownLayout(String),

    #[error("Layout has no stacks")]
    Empty,

    #[error("Stack id '{0}' appears more than once")]
    DuplicateStackId(String),

    #[error("Stack '{id}' has a non-positive or non-finite extent")]
    DegenerateRegion { id: String },
}

/// Band of the yard a stack belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Top,
    Middle,
    Bottom,
}

impl Section {
    /// All sections in top-to-bottom draw order
    pub const ALL: [Section; 3] = [Section::Top, Section::Middle, Section::Bottom];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Top => "TOP BLOCK",
            Section::Middle => "MIDDLE BLOCK",
            Section::Bottom => "BOTTOM BLOCK",
        }
    }
}

/// A fixed rectangular storage slot in world space
#[derive(Debug, Clone, PartialEq)]
pub struct StackRegion {
    pub id: String,
    pub rect: Rect,
    pub section: Section,
}

impl StackRegion {
    pub fn new(id: impl Into<String>, x: f64, y: f64, width: f64, height: f64, section: Section) -> Self {
        Self {
            id: id.into(),
            rect: Rect::new(x, y, width, height),
            section,
        }
    }
}

/// A horizontal aisle drawn between two consecutive sections
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pathway {
    pub from: Point,
    pub to: Point,
}

/// Immutable collection of stack regions for one yard
///
/// Region order is significant: hit-testing returns the first region in this
/// order that contains a point.
#[derive(Debug, Clone, PartialEq)]
pub struct YardLayout {
    id: String,
    stacks: Vec<StackRegion>,
}

impl YardLayout {
    /// Padding between a section's stacks and its background band
    pub const SECTION_PADDING: f64 = 15.0;

    /// Ids accepted by [`YardLayout::builtin`]
    pub const BUILTIN_IDS: [&'static str; 2] = ["default", "compact"];

    /// Creates a layout from an ordered list of regions
    ///
    /// Ids must be unique and every region must have a positive, finite
    /// extent. Overlap between regions is not checked.
    pub fn new(id: impl Into<String>, stacks: Vec<StackRegion>) -> Result<Self, LayoutError> {
        if stacks.is_empty() {
            return Err(LayoutError::Empty);
        }

        let mut seen = HashSet::with_capacity(stacks.len());
        for stack in &stacks {
            let r = stack.rect;
            let finite = [r.x, r.y, r.w, r.h].iter().all(|v| v.is_finite());
            if !finite || r.w <= 0.0 || r.h <= 0.0 {
                return Err(LayoutError::DegenerateRegion {
                    id: stack.id.clone(),
                });
            }
            if !seen.insert(stack.id.as_str()) {
                return Err(LayoutError::DuplicateStackId(stack.id.clone()));
            }
        }

        Ok(Self {
            id: id.into(),
            stacks,
        })
    }

    /// Looks up one of the fixed yard layouts by id
    ///
    /// # Example
    /// ```rust
    /// use yard_viewport::domain::layout::YardLayout;
    ///
    /// let layout = YardLayout::builtin("default").unwrap();
    /// assert!(layout.stack("S5").is_some());
    /// ```
    pub fn builtin(id: &str) -> Result<Self, LayoutError> {
        match id {
            "default" => Self::new(id, standard_rows(10, &[40.0, 60.0, 40.0])),
            "compact" => Self::new(id, standard_rows(4, &[40.0, 40.0, 40.0])),
            other => Err(LayoutError::UnknownLayout(other.to_string())),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Regions in registry order
    pub fn stacks(&self) -> &[StackRegion] {
        &self.stacks
    }

    /// Exact-id lookup
    pub fn stack(&self, id: &str) -> Option<&StackRegion> {
        self.stacks.iter().find(|stack| stack.id == id)
    }

    /// Position of a stack in registry order
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.stacks.iter().position(|stack| stack.id == id)
    }

    /// Bounding box of every region in the layout
    pub fn bounds(&self) -> Rect {
        // `new` guarantees at least one stack
        self.stacks
            .iter()
            .skip(1)
            .fold(self.stacks[0].rect, |acc, stack| acc.union(&stack.rect))
    }

    /// Background band of a section, or None when the section has no stacks
    pub fn section_bounds(&self, section: Section) -> Option<Rect> {
        self.stacks
            .iter()
            .filter(|stack| stack.section == section)
            .map(|stack| stack.rect)
            .reduce(|acc, rect| acc.union(&rect))
            .map(|rect| rect.inflate(Self::SECTION_PADDING))
    }

    /// Aisles running midway between each pair of consecutive populated sections
    pub fn pathways(&self) -> Vec<Pathway> {
        let bounds = self.bounds().inflate(Self::SECTION_PADDING * 2.0);
        let bands: Vec<Rect> = Section::ALL
            .iter()
            .filter_map(|section| self.section_bounds(*section))
            .collect();

        bands
            .windows(2)
            .map(|pair| {
                let y = (pair[0].bottom() + pair[1].y) / 2.0;
                Pathway {
                    from: Point::new(bounds.x, y),
                    to: Point::new(bounds.right(), y),
                }
            })
            .collect()
    }
}

/// Three rows of `per_row` stacks, numbered S1.. left to right, top to bottom
fn standard_rows(per_row: usize, heights: &[f64; 3]) -> Vec<StackRegion> {
    const LEFT: f64 = 10.0;
    const STRIDE: f64 = 50.0;
    const WIDTH: f64 = 40.0;
    const ROW_TOPS: [f64; 3] = [50.0, 150.0, 270.0];

    let mut stacks = Vec::with_capacity(per_row * 3);
    for (row, section) in Section::ALL.iter().enumerate() {
        for col in 0..per_row {
            let number = row * per_row + col + 1;
            stacks.push(StackRegion::new(
                format!("S{}", number),
                LEFT + STRIDE * col as f64,
                ROW_TOPS[row],
                WIDTH,
                heights[row],
                *section,
            ));
        }
    }
    stacks
}
