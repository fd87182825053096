//! The menu screen: prepared-art previews, the player's own saved arts, the
//! theme switcher and the exit button.

use egui::{Pos2, Rect, RichText, Sense, Stroke, Vec2};

use super::color32;
use crate::game::Rgb;
use crate::log_warn;
use crate::store::ArtLibrary;
use crate::theme::Theme;
use crate::timer::format_time;

const PREVIEW_CELL: f32 = 7.0;
const PREVIEW_COLS: usize = 12;
const PREVIEW_ROWS: usize = 12;

/// What the player chose on the menu screen.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MenuAction {
    OpenArt(String),
    NewCustom,
    DeleteArt(String),
    SwitchTheme,
    Exit,
}

struct GalleryTile {
    name: String,
    best_time_ms: Option<u64>,
    cells: Vec<(u16, Rgb)>,
}

/// Cached view of the art library. `invalidate` forces a reload after any
/// store mutation (delete, save, first launch seeding).
#[derive(Default)]
pub struct Gallery {
    prepared: Vec<GalleryTile>,
    user_arts: Vec<GalleryTile>,
    loaded: bool,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&mut self) {
        self.loaded = false;
    }

    fn reload(&mut self, store: &ArtLibrary) {
        self.prepared = Self::load_tiles(store, true);
        self.user_arts = Self::load_tiles(store, false);
        self.loaded = true;
    }

    fn load_tiles(store: &ArtLibrary, prepared: bool) -> Vec<GalleryTile> {
        let names = match store.list_art_names(Some(prepared), None, 0) {
            Ok(names) => names,
            Err(e) => {
                log_warn!("gallery listing failed: {}", e);
                return Vec::new();
            }
        };
        names
            .into_iter()
            .filter_map(|name| match store.load_art(&name) {
                Ok(record) => Some(GalleryTile {
                    name: record.name,
                    best_time_ms: record.best_time_ms,
                    cells: record.cells,
                }),
                Err(e) => {
                    log_warn!("gallery skipping \"{}\": {}", name, e);
                    None
                }
            })
            .collect()
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        store: &ArtLibrary,
        theme: &Theme,
    ) -> Option<MenuAction> {
        if !self.loaded {
            self.reload(store);
        }
        let mut action = None;

        ui.vertical_centered(|ui| {
            ui.add_space(10.0);
            ui.label(RichText::new("SpeedPixels").size(40.0).strong());
            ui.add_space(16.0);
        });

        ui.horizontal_wrapped(|ui| {
            for tile in &self.prepared {
                if self.preview_tile(ui, tile, theme) {
                    action = Some(MenuAction::OpenArt(tile.name.clone()));
                }
            }
            if self.custom_tile(ui, theme) {
                action = Some(MenuAction::NewCustom);
            }
        });

        ui.add_space(18.0);
        ui.separator();
        ui.label(RichText::new("My arts").size(22.0));
        if self.user_arts.is_empty() {
            ui.label("There's nothing here yet");
        } else {
            egui::ScrollArea::vertical()
                .max_height(220.0)
                .show(ui, |ui| {
                    for tile in &self.user_arts {
                        ui.horizontal(|ui| {
                            let row = ui.add(
                                egui::Button::new(format!(
                                    "{}   (best: {})",
                                    tile.name,
                                    tile.best_time_ms
                                        .map(format_time)
                                        .unwrap_or_else(|| "-".to_string())
                                ))
                                .fill(theme.preview_background)
                                .min_size(egui::vec2(260.0, 24.0)),
                            );
                            if row.clicked() {
                                action = Some(MenuAction::OpenArt(tile.name.clone()));
                            }
                            if ui.small_button("✕").clicked() {
                                action = Some(MenuAction::DeleteArt(tile.name.clone()));
                            }
                        });
                    }
                });
        }

        ui.add_space(18.0);
        ui.horizontal(|ui| {
            if ui
                .add(egui::Button::new("Switch theme").fill(theme.button_background))
                .clicked()
            {
                action = Some(MenuAction::SwitchTheme);
            }
            if ui
                .add(egui::Button::new("Exit").fill(theme.button_background))
                .clicked()
            {
                action = Some(MenuAction::Exit);
            }
        });

        action
    }

    /// One prepared-art tile: the rendered pattern with name and best time
    /// underneath. Returns true when clicked.
    fn preview_tile(&self, ui: &mut egui::Ui, tile: &GalleryTile, theme: &Theme) -> bool {
        let preview = Vec2::new(
            PREVIEW_COLS as f32 * PREVIEW_CELL,
            PREVIEW_ROWS as f32 * PREVIEW_CELL,
        );
        let padding = Vec2::new(16.0, 44.0);
        let (rect, response) = ui.allocate_exact_size(preview + padding, Sense::click());
        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            let fill = if response.hovered() {
                theme.preview_hovered
            } else {
                theme.preview_background
            };
            painter.rect_filled(rect, 4.0, fill);

            let origin = rect.min + padding / 2.0 - Vec2::new(0.0, 12.0);
            painter.rect_filled(
                Rect::from_min_size(origin, preview),
                0.0,
                theme.cell_default,
            );
            for &(index, color) in &tile.cells {
                let col = (index as usize % PREVIEW_COLS) as f32;
                let row = (index as usize / PREVIEW_COLS) as f32;
                painter.rect_filled(
                    Rect::from_min_size(
                        Pos2::new(
                            origin.x + col * PREVIEW_CELL,
                            origin.y + row * PREVIEW_CELL,
                        ),
                        Vec2::splat(PREVIEW_CELL),
                    ),
                    0.0,
                    color32(color),
                );
            }
            painter.text(
                Pos2::new(rect.center().x, rect.max.y - 26.0),
                egui::Align2::CENTER_CENTER,
                &tile.name,
                egui::FontId::proportional(14.0),
                theme.font,
            );
            painter.text(
                Pos2::new(rect.center().x, rect.max.y - 10.0),
                egui::Align2::CENTER_CENTER,
                format!(
                    "Best time: {}",
                    tile.best_time_ms
                        .map(format_time)
                        .unwrap_or_else(|| "-".to_string())
                ),
                egui::FontId::proportional(12.0),
                theme.font,
            );
        }
        response.clicked()
    }

    /// The "start a new custom art" tile.
    fn custom_tile(&self, ui: &mut egui::Ui, theme: &Theme) -> bool {
        let size = Vec2::new(
            PREVIEW_COLS as f32 * PREVIEW_CELL + 16.0,
            PREVIEW_ROWS as f32 * PREVIEW_CELL + 44.0,
        );
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());
        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            let fill = if response.hovered() {
                theme.preview_hovered
            } else {
                theme.preview_background
            };
            painter.rect_filled(rect, 4.0, fill);
            painter.rect_stroke(rect.shrink(1.0), 4.0, Stroke::new(1.0, theme.font));
            painter.text(
                rect.center() - Vec2::new(0.0, 10.0),
                egui::Align2::CENTER_CENTER,
                "+",
                egui::FontId::proportional(48.0),
                theme.font,
            );
            painter.text(
                Pos2::new(rect.center().x, rect.max.y - 18.0),
                egui::Align2::CENTER_CENTER,
                "Custom art",
                egui::FontId::proportional(14.0),
                theme.font,
            );
        }
        response.clicked()
    }
}
