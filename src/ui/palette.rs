//! Colours used by the yard renderer
//!
//! Colours are kept as 8-bit RGBA so draw plans can be compared exactly;
//! conversion to tiny-skia happens at paint time.

use tiny_skia::Color;

use crate::domain::layout::Section;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(r, g, b, 255)
    }

    pub fn to_color(self) -> Color {
        Color::from_rgba8(self.0, self.1, self.2, self.3)
    }

    /// Darker variant used for the depth face of a double-drawn box
    pub fn shade(self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        let scale = |channel: u8| (channel as f32 * factor).round() as u8;
        Self(scale(self.0), scale(self.1), scale(self.2), self.3)
    }
}

pub const BACKGROUND: Rgba = Rgba::rgb(15, 23, 42);
pub const GRID_LINE: Rgba = Rgba(148, 163, 184, 40);
pub const SECTION_LABEL: Rgba = Rgba::rgb(148, 163, 184);

pub const STACK_FACE: Rgba = Rgba::rgb(71, 85, 105);
pub const STACK_OUTLINE: Rgba = Rgba::rgb(100, 116, 139);
pub const STACK_SELECTED: Rgba = Rgba::rgb(37, 99, 235);
pub const STACK_HOVERED: Rgba = Rgba::rgb(14, 116, 144);
pub const STACK_LABEL: Rgba = Rgba::rgb(226, 232, 240);

pub const CONTAINER_SELECTED: Rgba = Rgba::rgb(251, 191, 36);
pub const CONTAINER_UNASSIGNED: Rgba = Rgba::rgb(156, 163, 175);

pub const PATHWAY: Rgba = Rgba(250, 204, 21, 140);
pub const PANEL: Rgba = Rgba(15, 23, 42, 220);
pub const PANEL_BORDER: Rgba = Rgba::rgb(71, 85, 105);
pub const PANEL_TEXT: Rgba = Rgba::rgb(226, 232, 240);
pub const BUTTON: Rgba = Rgba::rgb(30, 41, 59);

/// Depth-face darkening factor
pub const SIDE_SHADE: f32 = 0.6;

/// Client colours, indexed by a hash of the client code
pub const CLIENT_PALETTE: [Rgba; 8] = [
    Rgba::rgb(239, 68, 68),
    Rgba::rgb(34, 197, 94),
    Rgba::rgb(59, 130, 246),
    Rgba::rgb(168, 85, 247),
    Rgba::rgb(236, 72, 153),
    Rgba::rgb(20, 184, 166),
    Rgba::rgb(249, 115, 22),
    Rgba::rgb(132, 204, 22),
];

/// Fill colour of a section band
pub fn section_fill(section: Section) -> Rgba {
    match section {
        Section::Top => Rgba(30, 58, 138, 70),
        Section::Middle => Rgba(22, 101, 52, 70),
        Section::Bottom => Rgba(124, 45, 18, 70),
    }
}

/// Stable colour for a client code; empty codes get a neutral grey
pub fn client_color(client_code: &str) -> Rgba {
    if client_code.is_empty() {
        return CONTAINER_UNASSIGNED;
    }

    // FNV-1a
    let hash = client_code
        .bytes()
        .fold(0x811c_9dc5_u32, |hash, byte| (hash ^ byte as u32).wrapping_mul(0x0100_0193));
    CLIENT_PALETTE[hash as usize % CLIENT_PALETTE.len()]
}
