//! Built-in content and user settings.
//!
//! Prepared arts are the patterns the game ships with: drawn here as 12×12
//! character maps (readable, diff-able) and seeded into the art library on
//! first launch. The legend maps each letter onto a master-catalog color.

use std::path::PathBuf;

use crate::game::Rgb;
use crate::theme::ThemeMode;

// ============================================================================
// Prepared arts
// ============================================================================

/// A built-in pattern: 12 rows of 12 characters, `.` = empty cell.
pub struct PreparedArt {
    pub name: &'static str,
    pub rows: [&'static str; 12],
}

/// Letter → catalog color. Letters are loosely mnemonic (R red, W white,
/// N brown as in "nut", …).
pub fn legend(ch: char) -> Option<Rgb> {
    match ch {
        'K' => Some(Rgb(0, 0, 0)),       // black
        'B' => Some(Rgb(0, 0, 255)),     // blue
        'D' => Some(Rgb(0, 51, 0)),      // dark green
        'T' => Some(Rgb(0, 102, 102)),   // cyan
        'G' => Some(Rgb(0, 255, 0)),     // green
        'N' => Some(Rgb(51, 0, 0)),      // brown
        'U' => Some(Rgb(51, 0, 102)),    // purple
        'C' => Some(Rgb(102, 0, 51)),    // crimson
        'S' => Some(Rgb(114, 137, 218)), // sky
        'A' => Some(Rgb(160, 160, 160)), // light gray
        'R' => Some(Rgb(255, 0, 0)),     // red
        'O' => Some(Rgb(255, 128, 0)),   // orange
        'P' => Some(Rgb(255, 153, 204)), // pink
        'L' => Some(Rgb(255, 204, 255)), // light pink
        'Y' => Some(Rgb(255, 255, 0)),   // yellow
        'W' => Some(Rgb(255, 255, 255)), // white
        _ => None,
    }
}

impl PreparedArt {
    /// The pattern as the store's `index → color` mapping.
    pub fn cells(&self) -> Vec<(u16, Rgb)> {
        let mut cells = Vec::new();
        for (row, line) in self.rows.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if let Some(color) = legend(ch) {
                    cells.push(((row * 12 + col) as u16, color));
                }
            }
        }
        cells
    }
}

pub const PREPARED_ARTS: &[PreparedArt] = &[
    PreparedArt {
        name: "Heart",
        rows: [
            "............",
            "..RR....RR..",
            ".RRRR..RRRR.",
            ".RWRRRRRRRR.",
            ".RRRRRRRRRR.",
            ".RRRRRRRRRC.",
            "..RRRRRRRC..",
            "...RRRRRC...",
            "....RRRC....",
            ".....RC.....",
            "............",
            "............",
        ],
    },
    PreparedArt {
        name: "Invader",
        rows: [
            "............",
            "...G....G...",
            "....G..G....",
            "...GGGGGG...",
            "..GG.GG.GG..",
            ".GGGGGGGGGG.",
            ".G.GGGGGG.G.",
            ".G.G....G.G.",
            "....GG.GG...",
            "............",
            "............",
            "............",
        ],
    },
    PreparedArt {
        name: "Mushroom",
        rows: [
            "............",
            "....RRRR....",
            "...RRRRRR...",
            "..RWWRRWWR..",
            ".RRWWRRWWRR.",
            ".RRRRRRRRRR.",
            "....WWWW....",
            "....WWWW....",
            "...NWWWWN...",
            "...NNNNNN...",
            "............",
            "............",
        ],
    },
    PreparedArt {
        name: "Sailboat",
        rows: [
            "............",
            ".....KW.....",
            ".....KWW....",
            ".....KWWW...",
            ".....KWWWW..",
            ".....KWWW...",
            ".....KWW....",
            ".....K......",
            ".NNNNNNNNN..",
            "..NNNNNNN...",
            "...BBBBBBB..",
            "..BBBBBBBBB.",
        ],
    },
];

// ============================================================================
// AppSettings
// ============================================================================

/// User preferences, stored as a small `key=value` text file.
#[derive(Clone, Debug, PartialEq)]
pub struct AppSettings {
    /// Light or dark UI theme.
    pub theme_mode: ThemeMode,
    /// Pixels per cell when exporting an art to PNG.
    pub export_scale: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme_mode: ThemeMode::Dark,
            export_scale: 20,
        }
    }
}

impl AppSettings {
    /// Path to the settings file.
    /// On Linux:   `~/.config/speedpixels/speedpixels.cfg` (XDG respected)
    /// On Windows: `%APPDATA%\SpeedPixels\speedpixels.cfg`
    /// On macOS:   `~/Library/Application Support/SpeedPixels/speedpixels.cfg`
    pub(crate) fn settings_path() -> Option<PathBuf> {
        #[cfg(target_os = "linux")]
        {
            let config_dir = std::env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
                    PathBuf::from(home).join(".config")
                })
                .join("speedpixels");
            let _ = std::fs::create_dir_all(&config_dir);
            return Some(config_dir.join("speedpixels.cfg"));
        }
        #[cfg(target_os = "windows")]
        {
            let appdata = std::env::var("APPDATA")
                .or_else(|_| std::env::var("USERPROFILE"))
                .ok()?;
            let config_dir = PathBuf::from(appdata).join("SpeedPixels");
            let _ = std::fs::create_dir_all(&config_dir);
            return Some(config_dir.join("speedpixels.cfg"));
        }
        #[cfg(target_os = "macos")]
        {
            let home = std::env::var("HOME").ok()?;
            let config_dir = PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("SpeedPixels");
            let _ = std::fs::create_dir_all(&config_dir);
            return Some(config_dir.join("speedpixels.cfg"));
        }
        #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
        {
            std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|d| d.join("speedpixels.cfg")))
        }
    }

    /// Save settings to disk. Errors are swallowed - a read-only config dir
    /// must not break the game.
    pub fn save(&self) {
        let Some(path) = Self::settings_path() else {
            return;
        };
        let mode_str = match self.theme_mode {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        };
        let content = format!(
            "theme_mode={mode_str}\nexport_scale={}\n",
            self.export_scale
        );
        let _ = std::fs::write(path, content);
    }

    /// Load settings from disk (defaults if the file is missing or corrupt).
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Self::default();
        };

        let mut s = Self::default();
        for line in content.lines() {
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            match key.trim() {
                "theme_mode" => {
                    s.theme_mode = match val.trim() {
                        "light" => ThemeMode::Light,
                        _ => ThemeMode::Dark,
                    };
                }
                "export_scale" => {
                    if let Ok(scale) = val.trim().parse::<u32>() {
                        s.export_scale = scale.clamp(1, 128);
                    }
                }
                _ => {}
            }
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepared_arts_are_playable() {
        for art in PREPARED_ARTS {
            let cells = art.cells();
            assert!(!cells.is_empty(), "{} has no cells", art.name);
            assert!(
                cells.iter().all(|&(i, _)| (i as usize) < 144),
                "{} has out-of-grid cells",
                art.name
            );

            // every art must fit the 9-slot attempt palette
            let mut distinct: Vec<Rgb> = Vec::new();
            for &(_, color) in &cells {
                if !distinct.contains(&color) {
                    distinct.push(color);
                }
            }
            assert!(distinct.len() <= 9, "{} needs too many slots", art.name);
        }
    }

    #[test]
    fn prepared_maps_are_well_formed() {
        for art in PREPARED_ARTS {
            for (row, line) in art.rows.iter().enumerate() {
                assert_eq!(line.len(), 12, "{} row {} width", art.name, row);
                for ch in line.chars() {
                    assert!(
                        ch == '.' || legend(ch).is_some(),
                        "{} uses unknown legend char '{}'",
                        art.name,
                        ch
                    );
                }
            }
        }
    }

    #[test]
    fn legend_colors_come_from_the_catalog() {
        for ch in "KBDTGNUCSAROPLYW".chars() {
            let color = legend(ch).unwrap();
            assert!(crate::palette::MASTER_CATALOG.contains(&color));
        }
    }
}
