//! Palette derivation - the fixed master catalog for design mode and the
//! numbered slot palette derived from a saved outline for attempt mode.

use crate::game::{Grid, Rgb};

/// Maximum number of attempt-mode slots. Slots map onto the 1–9 digit keys,
/// so a tenth distinct target color cannot be represented.
pub const MAX_SLOTS: usize = 9;

/// The full fixed color catalog available in design mode, ascending by
/// (r, g, b) so the swatch order never shifts between runs.
pub const MASTER_CATALOG: [Rgb; 16] = [
    Rgb(0, 0, 0),       // black
    Rgb(0, 0, 255),     // blue
    Rgb(0, 51, 0),      // dark green
    Rgb(0, 102, 102),   // cyan
    Rgb(0, 255, 0),     // green
    Rgb(51, 0, 0),      // brown
    Rgb(51, 0, 102),    // purple
    Rgb(102, 0, 51),    // crimson
    Rgb(114, 137, 218), // sky
    Rgb(160, 160, 160), // light gray
    Rgb(255, 0, 0),     // red
    Rgb(255, 128, 0),   // orange
    Rgb(255, 153, 204), // pink
    Rgb(255, 204, 255), // light pink
    Rgb(255, 255, 0),   // yellow
    Rgb(255, 255, 255), // white
];

/// A color with its 1-based slot index (the digit key that selects it).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PaletteSlot {
    pub index: u8,
    pub color: Rgb,
}

/// Deriving a palette would need more than [`MAX_SLOTS`] distinct colors.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SlotLimitExceeded;

impl std::fmt::Display for SlotLimitExceeded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "max number of colors reached ({MAX_SLOTS} slots)")
    }
}

impl std::error::Error for SlotLimitExceeded {}

/// The design-mode palette: the whole catalog, no per-art limit.
pub fn design_catalog() -> &'static [Rgb] {
    &MASTER_CATALOG
}

/// Build the attempt-mode palette from the grid's target colors: distinct
/// colors in row-major first-seen order, slot indices 1..=N.
///
/// More than nine distinct targets can only come from a corrupt or foreign
/// art file - the live paint path is gated by [`selection_exceeds_slots`]
/// before a tenth color can ever be painted.
pub fn derive_attempt_palette(grid: &Grid) -> Result<Vec<PaletteSlot>, SlotLimitExceeded> {
    let colors = grid.distinct_target_colors();
    if colors.len() > MAX_SLOTS {
        return Err(SlotLimitExceeded);
    }
    Ok(colors
        .into_iter()
        .enumerate()
        .map(|(i, color)| PaletteSlot {
            index: i as u8 + 1,
            color,
        })
        .collect())
}

/// Live slot gate for design mode: true when the grid already holds
/// [`MAX_SLOTS`] distinct painted colors and `color` is not one of them, so
/// selecting it would demand a tenth slot at the next save.
pub fn selection_exceeds_slots(grid: &Grid, color: Rgb) -> bool {
    let painted = grid.distinct_paint_colors();
    painted.len() >= MAX_SLOTS && !painted.contains(&color)
}
