//! Art library - file-backed persistence of saved patterns and best times.
//!
//! Each art is one `.spx` file in the library directory: a magic/version
//! header followed by a bincode-encoded [`ArtFileV1`]. Writes go through a
//! temp file and a rename so a pattern and its best time always land
//! together; a crash mid-save leaves the previous file intact.
//!
//! Library location:
//!   Windows:  `%APPDATA%\SpeedPixels\arts\`
//!   Linux:    `~/.local/share/SpeedPixels/arts/`
//!   macOS:    `~/Library/Application Support/SpeedPixels/arts/`

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::game::Rgb;
use crate::log_warn;

/// Reserved identity of the in-progress unsaved art. Never a legal stored name.
pub const CUSTOM_SENTINEL: &str = "custom";

/// Magic header for the v1 art file format.
const SPX_MAGIC_V1: &str = "SPX1";

const ART_EXTENSION: &str = "spx";

// ============================================================================
// Records & errors
// ============================================================================

/// On-disk art file structure (v1).
#[derive(Serialize, Deserialize)]
struct ArtFileV1 {
    magic: String,
    name: String,
    best_time_ms: Option<u64>,
    is_prepared: bool,
    cells: Vec<(u16, Rgb)>,
}

/// A stored art, as handed to the game core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtRecord {
    pub name: String,
    pub best_time_ms: Option<u64>,
    pub is_prepared: bool,
    /// `cell index → color` outline mapping, ascending by index.
    pub cells: Vec<(u16, Rgb)>,
}

/// Error type for art library operations.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Encode(String),
    InvalidFormat(String),
    NotFound(String),
    ReservedName(String),
    PreparedArt(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "I/O error: {}", e),
            StoreError::Encode(e) => write!(f, "Encoding error: {}", e),
            StoreError::InvalidFormat(e) => write!(f, "Invalid art file: {}", e),
            StoreError::NotFound(name) => write!(f, "No art named \"{}\"", name),
            StoreError::ReservedName(name) => write!(f, "\"{}\" is not a usable art name", name),
            StoreError::PreparedArt(name) => {
                write!(f, "\"{}\" is a prepared art and cannot be deleted", name)
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for StoreError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        StoreError::Encode(e.to_string())
    }
}

// ============================================================================
// ArtLibrary
// ============================================================================

/// Directory of `.spx` art files. All operations are synchronous; the single
/// UI thread is the only writer.
pub struct ArtLibrary {
    dir: PathBuf,
}

impl ArtLibrary {
    /// Open (creating if needed) a library at the given directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Open the per-user default library under the OS data directory.
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(data_dir().join("SpeedPixels").join("arts"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reject names the store cannot represent: empty, the reserved `custom`
    /// sentinel, or anything that would escape the library directory.
    pub fn validate_name(name: &str) -> Result<(), StoreError> {
        let trimmed = name.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case(CUSTOM_SENTINEL)
            || trimmed.starts_with('.')
            || trimmed.contains(['/', '\\', '\0'])
        {
            return Err(StoreError::ReservedName(name.to_string()));
        }
        Ok(())
    }

    fn art_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name.trim(), ART_EXTENSION))
    }

    /// Load a named art. [`StoreError::NotFound`] when no such file exists.
    pub fn load_art(&self, name: &str) -> Result<ArtRecord, StoreError> {
        let path = self.art_path(name);
        if !path.exists() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        read_art_file(&path)
    }

    /// Upsert a pattern. A fresh row is created for an unknown name; for an
    /// existing one the cells are replaced and the stored time is kept
    /// whenever it beats the incoming one, so a slower re-save never erases
    /// a record.
    pub fn save_art(
        &mut self,
        name: &str,
        best_time_ms: Option<u64>,
        cells: &[(u16, Rgb)],
    ) -> Result<(), StoreError> {
        Self::validate_name(name)?;
        let (merged_time, is_prepared) = match self.load_art(name) {
            Ok(existing) => (
                merge_best(existing.best_time_ms, best_time_ms),
                existing.is_prepared,
            ),
            Err(StoreError::NotFound(_)) => (best_time_ms, false),
            Err(e) => return Err(e),
        };
        self.write_record(&ArtRecord {
            name: name.trim().to_string(),
            best_time_ms: merged_time,
            is_prepared,
            cells: cells.to_vec(),
        })
    }

    /// Replace the stored best time, leaving the pattern untouched.
    pub fn update_best_time(&mut self, name: &str, best_time_ms: u64) -> Result<(), StoreError> {
        let mut record = self.load_art(name)?;
        record.best_time_ms = Some(best_time_ms);
        self.write_record(&record)
    }

    /// Remove a custom art. Prepared arts refuse deletion.
    pub fn delete_art(&mut self, name: &str) -> Result<(), StoreError> {
        let record = self.load_art(name)?;
        if record.is_prepared {
            return Err(StoreError::PreparedArt(name.to_string()));
        }
        fs::remove_file(self.art_path(name))?;
        Ok(())
    }

    /// Names in the library, lexicographic. `prepared` filters by the
    /// prepared flag; `offset`/`limit` page through the sorted sequence.
    /// Unreadable files are skipped (and logged), not fatal.
    pub fn list_art_names(
        &self,
        prepared: Option<bool>,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(ART_EXTENSION) {
                continue;
            }
            match read_art_file(&path) {
                Ok(record) => {
                    if prepared.is_none_or(|want| record.is_prepared == want) {
                        names.push(record.name);
                    }
                }
                Err(e) => {
                    log_warn!("skipping unreadable art file {:?}: {}", path, e);
                }
            }
        }
        names.sort();
        let names: Vec<String> = names
            .into_iter()
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX))
            .collect();
        Ok(names)
    }

    /// Write the built-in prepared arts that are not in the library yet.
    /// Called once at startup; an existing file (and its best time) is
    /// never overwritten.
    pub fn seed_prepared(&mut self) -> Result<(), StoreError> {
        for art in crate::assets::PREPARED_ARTS {
            if self.art_path(art.name).exists() {
                continue;
            }
            self.write_record(&ArtRecord {
                name: art.name.to_string(),
                best_time_ms: None,
                is_prepared: true,
                cells: art.cells(),
            })?;
        }
        Ok(())
    }

    /// Copy an external `.spx` file into the library (CLI `--import`).
    /// The imported art always lands as a custom (non-prepared) one; an
    /// existing art of the same name keeps its better time. Returns the
    /// imported name.
    pub fn import(&mut self, path: &Path) -> Result<String, StoreError> {
        let record = read_art_file(path)?;
        Self::validate_name(&record.name)?;
        self.save_art(&record.name, record.best_time_ms, &record.cells)?;
        Ok(record.name)
    }

    fn write_record(&self, record: &ArtRecord) -> Result<(), StoreError> {
        let file = ArtFileV1 {
            magic: SPX_MAGIC_V1.to_string(),
            name: record.name.clone(),
            best_time_ms: record.best_time_ms,
            is_prepared: record.is_prepared,
            cells: record.cells.clone(),
        };
        let bytes = bincode::serialize(&file)?;
        let path = self.art_path(&record.name);
        let tmp = path.with_extension("spx.tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Stored time wins unless the incoming one is strictly faster.
fn merge_best(stored: Option<u64>, incoming: Option<u64>) -> Option<u64> {
    match (stored, incoming) {
        (Some(s), Some(i)) => Some(s.min(i)),
        (Some(s), None) => Some(s),
        (None, i) => i,
    }
}

fn read_art_file(path: &Path) -> Result<ArtRecord, StoreError> {
    let bytes = fs::read(path)?;
    let file: ArtFileV1 = bincode::deserialize(&bytes)
        .map_err(|e| StoreError::InvalidFormat(format!("{:?}: {}", path.file_name(), e)))?;
    if file.magic != SPX_MAGIC_V1 {
        return Err(StoreError::InvalidFormat(format!(
            "unknown magic \"{}\" in {:?}",
            file.magic,
            path.file_name()
        )));
    }
    let mut cells = file.cells;
    cells.sort_by_key(|&(index, _)| index);
    Ok(ArtRecord {
        name: file.name,
        best_time_ms: file.best_time_ms,
        is_prepared: file.is_prepared,
        cells,
    })
}

// ============================================================================
// PNG export
// ============================================================================

/// Render an art's outline to a PNG, `scale` pixels per cell. Cells without
/// a color stay transparent.
pub fn export_png(
    record: &ArtRecord,
    cols: usize,
    rows: usize,
    scale: u32,
    path: &Path,
) -> Result<(), StoreError> {
    let scale = scale.max(1);
    let mut img = image::RgbaImage::from_pixel(
        cols as u32 * scale,
        rows as u32 * scale,
        image::Rgba([0, 0, 0, 0]),
    );
    for &(index, Rgb(r, g, b)) in &record.cells {
        let (col, row) = (index as usize % cols, index as usize / cols);
        if row >= rows {
            continue;
        }
        for dy in 0..scale {
            for dx in 0..scale {
                img.put_pixel(
                    col as u32 * scale + dx,
                    row as u32 * scale + dy,
                    image::Rgba([r, g, b, 255]),
                );
            }
        }
    }
    img.save(path).map_err(|e| StoreError::Encode(e.to_string()))
}

/// Platform data directory (without the app sub-folder).
pub(crate) fn data_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata);
        }
    }
    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support");
        }
    }
    // Linux / fallback
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    PathBuf::from(".")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_validation() {
        assert!(ArtLibrary::validate_name("Heart").is_ok());
        assert!(ArtLibrary::validate_name("my first art").is_ok());
        assert!(ArtLibrary::validate_name("").is_err());
        assert!(ArtLibrary::validate_name("   ").is_err());
        assert!(ArtLibrary::validate_name("custom").is_err());
        assert!(ArtLibrary::validate_name("CUSTOM").is_err());
        assert!(ArtLibrary::validate_name("../escape").is_err());
        assert!(ArtLibrary::validate_name("a/b").is_err());
        assert!(ArtLibrary::validate_name(".hidden").is_err());
    }

    #[test]
    fn merge_keeps_the_faster_time() {
        assert_eq!(merge_best(Some(1000), Some(2000)), Some(1000));
        assert_eq!(merge_best(Some(2000), Some(1000)), Some(1000));
        assert_eq!(merge_best(Some(1000), None), Some(1000));
        assert_eq!(merge_best(None, Some(500)), Some(500));
        assert_eq!(merge_best(None, None), None);
    }
}
