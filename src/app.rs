//! The egui application: screen routing, input → command dispatch, and the
//! glue between the game session, the art library and the widgets.

use std::time::{Duration, Instant};

use eframe::egui;

use crate::assets::AppSettings;
use crate::components::gallery::{Gallery, MenuAction};
use crate::components::grid_view::GridView;
use crate::components::hud::{Hud, HudAction};
use crate::components::palette_panel::PalettePanel;
use crate::palette;
use crate::session::{ArtId, Command, Feedback, GameSession, Mode, SessionConfig};
use crate::store::{ArtLibrary, ArtRecord, export_png};
use crate::theme::Theme;
use crate::timer::{TICK, format_time};
use crate::{log_err, log_info, log_warn};

/// How long a status message stays up.
const STATUS_TTL: Duration = Duration::from_secs(4);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Screen {
    Menu,
    Painting,
}

/// Transient user-visible feedback (errors, records), bottom of the HUD.
struct StatusLine {
    text: String,
    set_at: Instant,
}

/// Modal asking for a name after the first save of a custom art.
#[derive(Default)]
struct NameDialog {
    buffer: String,
    error: Option<String>,
}

pub struct SpeedPixelsApp {
    screen: Screen,
    settings: AppSettings,
    theme: Theme,
    library: ArtLibrary,
    session: GameSession,

    gallery: Gallery,
    grid_view: GridView,
    palette_panel: PalettePanel,
    hud: Hud,

    status: Option<StatusLine>,
    name_dialog: Option<NameDialog>,
}

impl SpeedPixelsApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = AppSettings::load();
        let theme = Theme::from_mode(settings.theme_mode);
        theme.apply(&cc.egui_ctx);

        // A broken data directory should not keep the game from starting:
        // fall back to a throwaway library and tell the user via the log.
        let mut library = ArtLibrary::open_default().unwrap_or_else(|e| {
            log_err!("default art library unavailable: {} - using a temporary one", e);
            let fallback = std::env::temp_dir().join("speedpixels-arts");
            ArtLibrary::open(fallback).expect("temp dir art library")
        });
        if let Err(e) = library.seed_prepared() {
            log_warn!("could not seed prepared arts: {}", e);
        }

        let session = GameSession::new(SessionConfig::default());
        log_info!("[{}] app started, library at {:?}", session.id, library.dir());

        Self {
            screen: Screen::Menu,
            settings,
            theme,
            library,
            session,
            gallery: Gallery::new(),
            grid_view: GridView::default(),
            palette_panel: PalettePanel,
            hud: Hud,
            status: None,
            name_dialog: None,
        }
    }

    fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            set_at: Instant::now(),
        });
    }

    /// Dispatch a command and fold the outcome into UI state. Returns the
    /// feedback for call sites that need to react further.
    fn run(&mut self, command: Command) -> Option<Feedback> {
        match self.session.dispatch(command, &mut self.library, Instant::now()) {
            Ok(feedback) => {
                if let Feedback::AttemptComplete {
                    elapsed_ms,
                    personal_best,
                } = feedback
                {
                    if personal_best {
                        self.set_status(format!("New best time: {}!", format_time(elapsed_ms)));
                        self.gallery.invalidate();
                    } else {
                        self.set_status(format!("Done in {}", format_time(elapsed_ms)));
                    }
                }
                Some(feedback)
            }
            Err(e) => {
                log_warn!("command failed: {}", e);
                self.set_status(e.to_string());
                None
            }
        }
    }

    // -- painting screen --------------------------------------------------

    fn show_painting(&mut self, ctx: &egui::Context) {
        self.handle_digit_keys(ctx);

        let mut hud_action = None;
        let mut picked_color = None;
        let mut picked_slot = None;
        let mut clicked_cell = None;

        egui::SidePanel::left("actions")
            .resizable(false)
            .exact_width(220.0)
            .show(ctx, |ui| {
                ui.add_space(12.0);
                hud_action = self.hud.actions(
                    ui,
                    self.session.mode(),
                    self.session.grid().has_outline(),
                    &self.theme,
                );
                ui.add_space(18.0);
                ui.separator();
                match self.session.mode() {
                    Mode::Design => {
                        picked_color = self.palette_panel.show_design(
                            ui,
                            palette::design_catalog(),
                            self.session.current_color(),
                            &self.theme,
                        );
                    }
                    Mode::Attempt => {
                        picked_slot = self.palette_panel.show_attempt(
                            ui,
                            self.session.slots(),
                            self.session.current_color(),
                            &self.theme,
                        );
                    }
                }
            });

        egui::SidePanel::right("readouts")
            .resizable(false)
            .exact_width(240.0)
            .show(ctx, |ui| {
                ui.add_space(12.0);
                self.hud.readouts(
                    ui,
                    self.session.art_label(),
                    self.session.elapsed_ms(),
                    self.session.best_ms(),
                    self.session.last_ms(),
                    self.status.as_ref().map(|s| s.text.as_str()),
                    &self.theme,
                );
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                clicked_cell = self.grid_view.show(
                    ui,
                    self.session.grid(),
                    &self.theme,
                    self.session.is_locked(),
                    self.session.countdown_frame(),
                );
            });
        });

        if let Some(index) = clicked_cell {
            self.run(Command::Paint(index));
        }
        if let Some(color) = picked_color {
            self.run(Command::SelectColor(color));
        }
        if let Some(slot) = picked_slot {
            self.run(Command::SelectSlot(slot));
        }
        if let Some(action) = hud_action {
            self.handle_hud_action(ctx, action);
        }

        self.show_name_dialog(ctx);
    }

    fn handle_hud_action(&mut self, ctx: &egui::Context, action: HudAction) {
        match action {
            HudAction::Save => {
                let was_custom = *self.session.art() == ArtId::Custom;
                if self.run(Command::Save) == Some(Feedback::Saved) && was_custom {
                    self.name_dialog = Some(NameDialog::default());
                }
            }
            HudAction::Restart => {
                self.run(Command::Restart);
            }
            HudAction::ClearAll => {
                self.run(Command::ClearAll);
                self.name_dialog = None;
            }
            HudAction::ExportPng => self.export_current(),
            HudAction::BackToMenu => {
                self.gallery.invalidate();
                self.screen = Screen::Menu;
            }
            HudAction::Exit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
        }
    }

    /// Digits 1–9 select attempt-mode slots (no-ops in design mode).
    fn handle_digit_keys(&mut self, ctx: &egui::Context) {
        // don't steal digits while the user is typing an art name
        if ctx.wants_keyboard_input() {
            return;
        }
        const DIGITS: [(egui::Key, u8); 9] = [
            (egui::Key::Num1, 1),
            (egui::Key::Num2, 2),
            (egui::Key::Num3, 3),
            (egui::Key::Num4, 4),
            (egui::Key::Num5, 5),
            (egui::Key::Num6, 6),
            (egui::Key::Num7, 7),
            (egui::Key::Num8, 8),
            (egui::Key::Num9, 9),
        ];
        for (key, slot) in DIGITS {
            if ctx.input(|i| i.key_pressed(key)) {
                self.run(Command::SelectSlot(slot));
            }
        }
    }

    /// Render the current outline to a PNG at a user-chosen path.
    fn export_current(&mut self) {
        let record = ArtRecord {
            name: self.session.art_label().to_string(),
            best_time_ms: self.session.best_ms(),
            is_prepared: self.session.is_prepared(),
            cells: self.session.grid().target_cells(),
        };
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(format!("{}.png", record.name))
            .add_filter("PNG image", &["png"])
            .save_file()
        else {
            return;
        };
        let grid = self.session.grid();
        match export_png(
            &record,
            grid.cols(),
            grid.rows(),
            self.settings.export_scale,
            &path,
        ) {
            Ok(()) => self.set_status(format!("Exported to {}", path.display())),
            Err(e) => {
                log_err!("PNG export failed: {}", e);
                self.set_status(format!("Export failed: {}", e));
            }
        }
    }

    fn show_name_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = &mut self.name_dialog else {
            return;
        };
        let mut submitted = None;
        let mut dismissed = false;

        egui::Window::new("Name your art")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Give this pattern a name to keep it in your library:");
                let edit = ui.text_edit_singleline(&mut dialog.buffer);
                if let Some(error) = &dialog.error {
                    ui.label(egui::RichText::new(error).italics());
                }
                ui.horizontal(|ui| {
                    let enter = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.button("Save").clicked() || enter {
                        submitted = Some(dialog.buffer.clone());
                    }
                    if ui.button("Play unnamed").clicked() {
                        dismissed = true;
                    }
                });
            });

        if let Some(name) = submitted {
            match self
                .session
                .dispatch(Command::NameArt(name), &mut self.library, Instant::now())
            {
                Ok(_) => {
                    self.gallery.invalidate();
                    self.name_dialog = None;
                }
                Err(e) => {
                    if let Some(dialog) = &mut self.name_dialog {
                        dialog.error = Some(e.to_string());
                    }
                }
            }
        } else if dismissed {
            self.name_dialog = None;
        }
    }

    // -- menu screen -------------------------------------------------------

    fn show_menu(&mut self, ctx: &egui::Context) {
        let mut action = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            action = self.gallery.show(ui, &self.library, &self.theme);
        });

        match action {
            Some(MenuAction::OpenArt(name)) => {
                self.session = GameSession::new(SessionConfig::default());
                if self.run(Command::LoadArt(name)).is_some() {
                    self.screen = Screen::Painting;
                }
            }
            Some(MenuAction::NewCustom) => {
                self.session = GameSession::new(SessionConfig::default());
                self.status = None;
                self.screen = Screen::Painting;
            }
            Some(MenuAction::DeleteArt(name)) => {
                match self.library.delete_art(&name) {
                    Ok(()) => log_info!("deleted art \"{}\"", name),
                    Err(e) => {
                        log_warn!("delete of \"{}\" failed: {}", name, e);
                        self.set_status(e.to_string());
                    }
                }
                self.gallery.invalidate();
            }
            Some(MenuAction::SwitchTheme) => {
                self.theme = self.theme.switched();
                self.theme.apply(ctx);
                self.settings.theme_mode = self.theme.mode;
                self.settings.save();
            }
            Some(MenuAction::Exit) => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            None => {}
        }
    }
}

impl eframe::App for SpeedPixelsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.session.tick(Instant::now());
        if self.session.wants_ticks() {
            ctx.request_repaint_after(TICK);
        }

        if let Some(status) = &self.status
            && status.set_at.elapsed() > STATUS_TTL
        {
            self.status = None;
        }

        match self.screen {
            Screen::Menu => self.show_menu(ctx),
            Screen::Painting => self.show_painting(ctx),
        }
    }
}
