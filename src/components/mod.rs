//! UI widgets: the paint grid, the palette, the HUD column and the menu
//! gallery. Widgets translate raw interaction into semantic values (cell
//! indices, colors, actions) - nothing in here mutates game state.

pub mod gallery;
pub mod grid_view;
pub mod hud;
pub mod palette_panel;

use crate::game::Rgb;

/// Game color → egui color.
pub(crate) fn color32(Rgb(r, g, b): Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(r, g, b)
}
