//! The paint area: draws the cell field and maps clicks back to cell indices.

use egui::{Align2, FontId, Pos2, Rect, Sense, Stroke, Vec2};

use super::color32;
use crate::game::Grid;
use crate::theme::Theme;

/// Outline border width for cells that carry a target, vs. the hairline
/// separator everywhere else.
const OUTLINE_WIDTH: f32 = 3.0;
const LINE_WIDTH: f32 = 1.0;

pub struct GridView {
    pub cell_size: f32,
}

impl Default for GridView {
    fn default() -> Self {
        Self { cell_size: 42.0 }
    }
}

impl GridView {
    /// Draw the grid; returns the clicked cell index, if any. While `locked`
    /// (countdown in progress) clicks are swallowed and the current
    /// countdown `frame` is drawn over the field.
    pub fn show(
        &self,
        ui: &mut egui::Ui,
        grid: &Grid,
        theme: &Theme,
        locked: bool,
        frame: Option<&str>,
    ) -> Option<usize> {
        let size = Vec2::new(
            grid.cols() as f32 * self.cell_size,
            grid.rows() as f32 * self.cell_size,
        );
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            for index in 0..grid.len() {
                let cell = grid.cell(index);
                let cell_rect = self.cell_rect(rect, grid, index);

                let fill = cell
                    .paint
                    .map(color32)
                    .unwrap_or(theme.cell_default);
                painter.rect_filled(cell_rect, 0.0, fill);

                // target outlines are drawn thick in their own color so the
                // pattern stays readable on an unpainted field
                match cell.target {
                    Some(target) => painter.rect_stroke(
                        cell_rect.shrink(OUTLINE_WIDTH / 2.0),
                        0.0,
                        Stroke::new(OUTLINE_WIDTH, color32(target)),
                    ),
                    None => painter.rect_stroke(
                        cell_rect,
                        0.0,
                        Stroke::new(LINE_WIDTH, theme.grid_line),
                    ),
                }
            }

            if let Some(frame) = frame {
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    frame,
                    FontId::proportional(rect.height() / 3.0),
                    theme.font,
                );
            }
        }

        if locked {
            return None;
        }
        if response.clicked()
            && let Some(pos) = response.interact_pointer_pos()
        {
            return self.hit_test(rect, grid, pos);
        }
        None
    }

    fn cell_rect(&self, area: Rect, grid: &Grid, index: usize) -> Rect {
        let col = (index % grid.cols()) as f32;
        let row = (index / grid.cols()) as f32;
        Rect::from_min_size(
            Pos2::new(
                area.min.x + col * self.cell_size,
                area.min.y + row * self.cell_size,
            ),
            Vec2::splat(self.cell_size),
        )
    }

    fn hit_test(&self, area: Rect, grid: &Grid, pos: Pos2) -> Option<usize> {
        if !area.contains(pos) {
            return None;
        }
        let col = ((pos.x - area.min.x) / self.cell_size) as usize;
        let row = ((pos.y - area.min.y) / self.cell_size) as usize;
        if col >= grid.cols() || row >= grid.rows() {
            return None;
        }
        Some(grid.index(row, col))
    }
}
