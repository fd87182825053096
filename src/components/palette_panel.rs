//! Color selection: the full catalog in design mode, numbered slot swatches
//! in attempt mode.

use egui::{Align2, FontId, Rect, Sense, Stroke, Vec2};

use super::color32;
use crate::game::Rgb;
use crate::palette::PaletteSlot;
use crate::theme::Theme;

const SWATCH: f32 = 34.0;
const SELECT_RING: f32 = 2.5;

/// A slot paired with the rectangle it was drawn into this frame - the
/// explicit value type a slot button is, instead of state smuggled onto a
/// stock widget.
pub struct PaletteSlotView {
    pub slot: PaletteSlot,
    pub rect: Rect,
}

#[derive(Default)]
pub struct PalettePanel;

impl PalettePanel {
    /// Design mode: every catalog color, mouse-picked. Returns a clicked
    /// color.
    pub fn show_design(
        &self,
        ui: &mut egui::Ui,
        catalog: &[Rgb],
        current: Rgb,
        theme: &Theme,
    ) -> Option<Rgb> {
        ui.label("Pick color with mouse:");
        let mut picked = None;
        ui.horizontal_wrapped(|ui| {
            for &color in catalog {
                if self.swatch(ui, color, color == current, theme).clicked() {
                    picked = Some(color);
                }
            }
        });
        picked
    }

    /// Attempt mode: the derived slots with their digit badges. Returns a
    /// clicked slot index.
    pub fn show_attempt(
        &self,
        ui: &mut egui::Ui,
        slots: &[PaletteSlot],
        current: Rgb,
        theme: &Theme,
    ) -> Option<u8> {
        ui.label("Pick color with keyboard:");
        let mut picked = None;
        ui.horizontal_wrapped(|ui| {
            for &slot in slots {
                let response = self.swatch(ui, slot.color, slot.color == current, theme);
                let view = PaletteSlotView {
                    slot,
                    rect: response.rect,
                };
                // digit badge in the swatch corner
                ui.painter().text(
                    view.rect.left_top() + Vec2::new(3.0, 1.0),
                    Align2::LEFT_TOP,
                    format!("{}", view.slot.index),
                    FontId::proportional(13.0),
                    theme.font,
                );
                if response.clicked() {
                    picked = Some(view.slot.index);
                }
            }
        });
        picked
    }

    fn swatch(
        &self,
        ui: &mut egui::Ui,
        color: Rgb,
        selected: bool,
        theme: &Theme,
    ) -> egui::Response {
        let (rect, response) = ui.allocate_exact_size(Vec2::splat(SWATCH), Sense::click());
        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            painter.rect_filled(rect, 2.0, color32(color));
            if selected {
                painter.rect_stroke(
                    rect.shrink(SELECT_RING / 2.0),
                    2.0,
                    Stroke::new(SELECT_RING, theme.font),
                );
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    "✓",
                    FontId::proportional(SWATCH * 0.5),
                    theme.font,
                );
            } else if response.hovered() {
                painter.rect_stroke(rect, 2.0, Stroke::new(1.0, theme.font));
            }
        }
        response
    }
}
