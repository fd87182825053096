//! Painting-screen chrome: the action button column and the time readouts.

use egui::RichText;

use crate::session::Mode;
use crate::theme::Theme;
use crate::timer::format_time;

/// Semantic result of a HUD click; the app maps these onto session commands.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HudAction {
    Save,
    Restart,
    ClearAll,
    ExportPng,
    BackToMenu,
    Exit,
}

#[derive(Default)]
pub struct Hud;

impl Hud {
    /// The action column. `can_export` gates the PNG button on an outline
    /// being present.
    pub fn actions(
        &self,
        ui: &mut egui::Ui,
        mode: Mode,
        can_export: bool,
        theme: &Theme,
    ) -> Option<HudAction> {
        let mut clicked = None;
        let mut button = |ui: &mut egui::Ui, label: &str, action: HudAction, enabled: bool| {
            let widget = egui::Button::new(RichText::new(label).size(18.0))
                .fill(theme.button_background)
                .min_size(egui::vec2(170.0, 34.0));
            if ui.add_enabled(enabled, widget).clicked() {
                clicked = Some(action);
            }
        };

        button(ui, "SAVE", HudAction::Save, mode == Mode::Design);
        button(ui, "RESTART", HudAction::Restart, mode == Mode::Attempt);
        button(ui, "CLEAR", HudAction::ClearAll, true);
        button(ui, "EXPORT PNG", HudAction::ExportPng, can_export);
        ui.add_space(12.0);
        button(ui, "MENU", HudAction::BackToMenu, true);
        button(ui, "EXIT", HudAction::Exit, true);
        clicked
    }

    /// Clock and record readouts plus the transient status line.
    pub fn readouts(
        &self,
        ui: &mut egui::Ui,
        art_label: &str,
        elapsed_ms: u64,
        best_ms: Option<u64>,
        last_ms: Option<u64>,
        status: Option<&str>,
        theme: &Theme,
    ) {
        ui.label(RichText::new(art_label).size(20.0).strong());
        ui.add_space(8.0);
        ui.label(
            RichText::new(format!("Current time: {}", format_time(elapsed_ms)))
                .size(18.0)
                .color(theme.font),
        );
        ui.label(format!("Last time: {}", optional_time(last_ms)));
        ui.label(format!("Best time: {}", optional_time(best_ms)));
        if let Some(status) = status {
            ui.add_space(10.0);
            ui.label(RichText::new(status).italics());
        }
    }
}

/// `-` stands in for "no record yet".
fn optional_time(ms: Option<u64>) -> String {
    match ms {
        Some(ms) => format_time(ms),
        None => "-".to_string(),
    }
}
