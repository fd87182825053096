//! Dark / light theme - one explicit value passed to whoever draws,
//! applied to egui's visuals when it changes.

use egui::Color32;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ThemeMode {
    Light,
    Dark,
}

/// The game's color scheme. Everything the widgets paint with comes from
/// here; no module reaches for its own hardcoded chrome colors.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub mode: ThemeMode,
    /// Caption / readout text.
    pub font: Color32,
    /// Background of the paint area around the grid.
    pub art_background: Color32,
    /// Fill of action buttons.
    pub button_background: Color32,
    /// Fill of an unpainted cell.
    pub cell_default: Color32,
    /// Background of gallery tiles and list rows.
    pub preview_background: Color32,
    /// Hover state of gallery tiles and list rows.
    pub preview_hovered: Color32,
    /// Thin separator lines between cells.
    pub grid_line: Color32,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            mode: ThemeMode::Light,
            font: Color32::from_rgb(0, 0, 0),
            art_background: Color32::from_rgb(255, 248, 248),
            button_background: Color32::from_rgb(255, 245, 248),
            cell_default: Color32::from_rgb(184, 184, 184),
            preview_background: Color32::from_rgb(234, 244, 244),
            preview_hovered: Color32::from_rgb(200, 215, 210),
            grid_line: Color32::from_rgb(120, 120, 120),
        }
    }

    pub fn dark() -> Self {
        Self {
            mode: ThemeMode::Dark,
            font: Color32::from_rgb(189, 189, 189),
            art_background: Color32::from_rgb(84, 84, 84),
            button_background: Color32::from_rgb(100, 100, 100),
            cell_default: Color32::from_rgb(64, 64, 64),
            preview_background: Color32::from_rgb(34, 44, 44),
            preview_hovered: Color32::from_rgb(74, 84, 84),
            grid_line: Color32::from_rgb(30, 33, 36),
        }
    }

    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }

    /// The other theme - the gallery's switcher flips between the two.
    pub fn switched(&self) -> Self {
        match self.mode {
            ThemeMode::Light => Self::dark(),
            ThemeMode::Dark => Self::light(),
        }
    }

    /// Push this theme into egui's widget visuals.
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = match self.mode {
            ThemeMode::Light => egui::Visuals::light(),
            ThemeMode::Dark => egui::Visuals::dark(),
        };
        visuals.panel_fill = self.art_background;
        visuals.window_fill = self.preview_background;
        visuals.override_text_color = Some(self.font);
        ctx.set_visuals(visuals);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_alternates_modes() {
        let theme = Theme::dark();
        assert_eq!(theme.switched().mode, ThemeMode::Light);
        assert_eq!(theme.switched().switched().mode, ThemeMode::Dark);
        assert_eq!(Theme::from_mode(ThemeMode::Light).mode, ThemeMode::Light);
    }
}
