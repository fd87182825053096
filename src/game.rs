//! Grid model - the paintable cell field and its save/clear/match state machine.
//!
//! A cell moves through four states: empty → painted (design) → outlined
//! (after a save snapshots its paint into the target slot) → outlined+painted
//! (matched). A soft clear drops paint and keeps targets; a hard clear drops
//! both and returns the grid to a blank design canvas.

use serde::{Deserialize, Serialize};

/// Default playfield dimensions.
pub const GRID_COLS: usize = 12;
pub const GRID_ROWS: usize = 12;

// ============================================================================
// Color
// ============================================================================

/// An 8-bit RGB color. Ordering is the (r, g, b) tuple order, which is what
/// keeps the master catalog stable.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `#rrggbb` - the interchange form used by art files and the CLI.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Parse `#rrggbb` (leading `#` optional, case-insensitive).
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Rgb(r, g, b))
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

// ============================================================================
// Cell
// ============================================================================

/// One grid square. `paint` is the current user paint, `target` the locked-in
/// outline color a save left behind. Position is the cell's linear index in
/// the grid (row-major).
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Cell {
    pub paint: Option<Rgb>,
    pub target: Option<Rgb>,
}

impl Cell {
    /// True when this cell carries a target outline.
    pub fn is_outlined(&self) -> bool {
        self.target.is_some()
    }
}

/// Outcome of a single click on a cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Toggle {
    /// The cell took the paint.
    Painted,
    /// The cell was painted and is now empty again.
    Cleared,
    /// An outlined cell refused a mismatched color. Callers treat this as a
    /// silent no-op.
    Rejected,
}

// ============================================================================
// Grid
// ============================================================================

/// Fixed-size collection of cells, row-major. Constructed once per art;
/// targets survive any number of attempts until a hard clear or a new save.
#[derive(Clone, Debug)]
pub struct Grid {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::default(); cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, index: usize) -> Cell {
        self.cells[index]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Linear index of (row, col).
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Apply one click with the given color.
    ///
    /// A painted cell always clears back to empty, whatever color is held -
    /// that is the single-cell undo, and it also lets the player re-attempt an
    /// already-correct outlined cell. An empty outlined cell only accepts
    /// exactly its target color.
    pub fn toggle(&mut self, index: usize, color: Rgb) -> Toggle {
        let cell = &mut self.cells[index];
        match (cell.paint, cell.target) {
            (Some(_), _) => {
                cell.paint = None;
                Toggle::Cleared
            }
            (None, Some(target)) if color != target => Toggle::Rejected,
            (None, _) => {
                cell.paint = Some(color);
                Toggle::Painted
            }
        }
    }

    /// True when at least one cell holds paint.
    pub fn any_painted(&self) -> bool {
        self.cells.iter().any(|c| c.paint.is_some())
    }

    /// True when at least one cell carries a target outline.
    pub fn has_outline(&self) -> bool {
        self.cells.iter().any(|c| c.target.is_some())
    }

    /// Snapshot the current paint into every cell's target slot and clear all
    /// paint. Cells without paint end up without a target, replacing whatever
    /// target they had before.
    ///
    /// Returns `None` (and leaves the grid untouched) when nothing is painted;
    /// otherwise the `index → color` mapping of the new outline, ready for
    /// persistence.
    pub fn save(&mut self) -> Option<Vec<(u16, Rgb)>> {
        if !self.any_painted() {
            return None;
        }
        let mut pattern = Vec::new();
        for (index, cell) in self.cells.iter_mut().enumerate() {
            cell.target = cell.paint.take();
            if let Some(color) = cell.target {
                pattern.push((index as u16, color));
            }
        }
        Some(pattern)
    }

    /// Soft clear (`hard == false`) removes paint only - restart of a timed
    /// attempt. Hard clear also removes targets - back to a blank canvas.
    pub fn clear(&mut self, hard: bool) {
        for cell in &mut self.cells {
            cell.paint = None;
            if hard {
                cell.target = None;
            }
        }
    }

    /// True iff the outlined set is non-empty and every outlined cell's paint
    /// equals its target. An all-empty grid is never matched.
    pub fn is_fully_matched(&self) -> bool {
        let mut outlined = 0usize;
        for cell in &self.cells {
            if let Some(target) = cell.target {
                if cell.paint != Some(target) {
                    return false;
                }
                outlined += 1;
            }
        }
        outlined > 0
    }

    /// Distinct paint colors in row-major first-seen order.
    pub fn distinct_paint_colors(&self) -> Vec<Rgb> {
        distinct(self.cells.iter().filter_map(|c| c.paint))
    }

    /// Distinct target colors in row-major first-seen order.
    pub fn distinct_target_colors(&self) -> Vec<Rgb> {
        distinct(self.cells.iter().filter_map(|c| c.target))
    }

    /// The current outline as an `index → color` mapping.
    pub fn target_cells(&self) -> Vec<(u16, Rgb)> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.target.map(|color| (i as u16, color)))
            .collect()
    }

    /// Install targets from a stored art, clearing everything else. Indices
    /// outside the grid are skipped.
    pub fn hydrate(&mut self, cells: &[(u16, Rgb)]) {
        self.clear(true);
        for &(index, color) in cells {
            if let Some(cell) = self.cells.get_mut(index as usize) {
                cell.target = Some(color);
            }
        }
    }
}

fn distinct(colors: impl Iterator<Item = Rgb>) -> Vec<Rgb> {
    let mut seen: Vec<Rgb> = Vec::new();
    for color in colors {
        if !seen.contains(&color) {
            seen.push(color);
        }
    }
    seen
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb(255, 0, 0);
    const BLUE: Rgb = Rgb(0, 0, 255);

    #[test]
    fn hex_roundtrip() {
        assert_eq!(Rgb(255, 128, 0).to_hex(), "#ff8000");
        assert_eq!(Rgb::from_hex("#ff8000"), Some(Rgb(255, 128, 0)));
        assert_eq!(Rgb::from_hex("7289DA"), Some(Rgb(114, 137, 218)));
        assert_eq!(Rgb::from_hex("#xyzxyz"), None);
        assert_eq!(Rgb::from_hex("#fff"), None);
    }

    #[test]
    fn toggle_paints_then_clears() {
        let mut grid = Grid::new(2, 2);
        assert_eq!(grid.toggle(0, RED), Toggle::Painted);
        assert_eq!(grid.cell(0).paint, Some(RED));
        assert_eq!(grid.toggle(0, BLUE), Toggle::Cleared);
        assert_eq!(grid.cell(0).paint, None);
    }

    #[test]
    fn outlined_cell_rejects_wrong_color() {
        let mut grid = Grid::new(2, 2);
        grid.toggle(0, RED);
        grid.save().unwrap();

        assert_eq!(grid.toggle(0, BLUE), Toggle::Rejected);
        assert_eq!(grid.cell(0).paint, None);
        assert_eq!(grid.toggle(0, RED), Toggle::Painted);
        // a correct cell can still be cleared for a re-attempt
        assert_eq!(grid.toggle(0, RED), Toggle::Cleared);
    }

    #[test]
    fn save_requires_paint() {
        let mut grid = Grid::new(3, 3);
        assert!(grid.save().is_none());
        assert!(grid.cells().iter().all(|c| *c == Cell::default()));
    }

    #[test]
    fn save_snapshots_every_cell() {
        let mut grid = Grid::new(2, 2);
        grid.toggle(0, RED);
        grid.toggle(2, BLUE);

        let pattern = grid.save().unwrap();
        assert_eq!(pattern, vec![(0, RED), (2, BLUE)]);
        for (i, cell) in grid.cells().iter().enumerate() {
            assert_eq!(cell.paint, None);
            let expected = match i {
                0 => Some(RED),
                2 => Some(BLUE),
                _ => None,
            };
            assert_eq!(cell.target, expected);
        }
    }

    #[test]
    fn save_replaces_stale_targets() {
        let mut grid = Grid::new(2, 1);
        grid.toggle(0, RED);
        grid.toggle(1, BLUE);
        grid.save().unwrap();

        // second design pass paints only cell 1; cell 0's old target must go
        grid.clear(true);
        grid.toggle(1, RED);
        grid.save().unwrap();
        assert_eq!(grid.cell(0).target, None);
        assert_eq!(grid.cell(1).target, Some(RED));
    }

    #[test]
    fn match_detection() {
        let mut grid = Grid::new(2, 2);
        assert!(!grid.is_fully_matched()); // no outline, never matched

        grid.toggle(0, RED);
        grid.toggle(2, RED);
        grid.save().unwrap();
        assert!(!grid.is_fully_matched());

        grid.toggle(0, RED);
        assert!(!grid.is_fully_matched()); // cell 2 still open
        grid.toggle(2, RED);
        assert!(grid.is_fully_matched());
    }

    #[test]
    fn soft_and_hard_clear() {
        let mut grid = Grid::new(2, 2);
        grid.toggle(0, RED);
        grid.save().unwrap();
        grid.toggle(0, RED);

        grid.clear(false);
        assert!(grid.cells().iter().all(|c| c.paint.is_none()));
        assert_eq!(grid.cell(0).target, Some(RED));

        grid.clear(true);
        assert!(grid.cells().iter().all(|c| *c == Cell::default()));
    }

    #[test]
    fn distinct_colors_first_seen_order() {
        let mut grid = Grid::new(4, 1);
        grid.toggle(0, RED);
        grid.toggle(1, BLUE);
        grid.toggle(2, RED);
        assert_eq!(grid.distinct_paint_colors(), vec![RED, BLUE]);
    }

    #[test]
    fn hydrate_installs_targets_only() {
        let mut grid = Grid::new(2, 2);
        grid.toggle(1, BLUE);
        grid.hydrate(&[(0, RED), (3, BLUE), (99, RED)]);
        assert_eq!(grid.cell(0).target, Some(RED));
        assert_eq!(grid.cell(3).target, Some(BLUE));
        assert!(grid.cells().iter().all(|c| c.paint.is_none()));
        assert_eq!(grid.target_cells(), vec![(0, RED), (3, BLUE)]);
    }
}
