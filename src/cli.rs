// ============================================================================
// SpeedPixels CLI - headless art-library management via command-line arguments
// ============================================================================
//
// Usage examples:
//   speedpixels --list
//   speedpixels --list --filter custom
//   speedpixels --info Heart
//   speedpixels --export Heart -o heart.png --scale 32
//   speedpixels --export-all --output-dir previews/
//   speedpixels --import backups/*.spx
//   speedpixels --delete "My art"
//
// No window is opened in CLI mode. Everything runs synchronously on the
// current thread against the default art library.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::game::{GRID_COLS, GRID_ROWS};
use crate::store::{ArtLibrary, export_png};
use crate::timer::format_time;

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// SpeedPixels headless library manager.
///
/// List, inspect, export, import and delete saved arts - no GUI required.
#[derive(Parser, Debug)]
#[command(
    name = "speedpixels",
    about = "SpeedPixels headless art-library manager",
    long_about = "Manage the SpeedPixels art library without opening the game.\n\n\
                  Example:\n  \
                  speedpixels --list --filter custom\n  \
                  speedpixels --export Heart -o heart.png --scale 32\n  \
                  speedpixels --import backups/*.spx"
)]
pub struct CliArgs {
    /// List the names of all stored arts.
    #[arg(long)]
    pub list: bool,

    /// Restrict --list to "prepared" (built-in) or "custom" (user) arts.
    #[arg(long, value_name = "prepared|custom")]
    pub filter: Option<String>,

    /// Print the details of one art: flag, best time, cell and color counts.
    #[arg(long, value_name = "NAME")]
    pub info: Option<String>,

    /// Render one art's pattern to a PNG.
    #[arg(long, value_name = "NAME")]
    pub export: Option<String>,

    /// Output file for --export. Defaults to "<NAME>.png" in the current dir.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Pixels per cell for PNG export.
    #[arg(long, default_value_t = 20, value_name = "N")]
    pub scale: u32,

    /// Render every stored art to PNGs. Requires --output-dir.
    #[arg(long)]
    pub export_all: bool,

    /// Output directory for --export-all.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Import .spx art file(s) into the library. Glob patterns accepted
    /// (e.g. "backups/*.spx"). Imported arts are always custom.
    #[arg(long, value_name = "FILE", num_args = 1..)]
    pub import: Vec<String>,

    /// Delete a custom art from the library. Prepared arts are protected.
    #[arg(long, value_name = "NAME")]
    pub delete: Option<String>,
}

impl CliArgs {
    /// Returns `true` when any CLI-mode flag is present in the real process
    /// arguments. Used by `main()` to route before creating a window.
    pub fn is_cli_mode() -> bool {
        std::env::args().any(|a| {
            matches!(
                a.as_str(),
                "--list" | "--info" | "--export" | "--export-all" | "--import" | "--delete"
            )
        })
    }
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run all requested operations and return an OS exit code.
/// `0` = everything succeeded, `1` = one or more operations failed.
pub fn run(args: CliArgs) -> i32 {
    let mut library = match ArtLibrary::open_default() {
        Ok(lib) => lib,
        Err(e) => {
            eprintln!("error: could not open the art library: {}", e);
            return 1;
        }
    };
    // A fresh install should still list and export the built-ins.
    if let Err(e) = library.seed_prepared() {
        eprintln!("warning: could not seed prepared arts: {}", e);
    }

    let mut any_failure = false;

    if !args.import.is_empty() {
        any_failure |= run_import(&mut library, &args.import);
    }

    if let Some(name) = &args.delete {
        match library.delete_art(name) {
            Ok(()) => println!("deleted \"{}\"", name),
            Err(e) => {
                eprintln!("error: {}", e);
                any_failure = true;
            }
        }
    }

    if args.list {
        any_failure |= run_list(&library, args.filter.as_deref());
    }

    if let Some(name) = &args.info {
        any_failure |= run_info(&library, name);
    }

    if let Some(name) = &args.export {
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}.png", name)));
        any_failure |= run_export(&library, name, &output, args.scale);
    }

    if args.export_all {
        any_failure |= run_export_all(&library, args.output_dir.as_deref(), args.scale);
    }

    if any_failure { 1 } else { 0 }
}

// ============================================================================
// Operations
// ============================================================================

fn run_list(library: &ArtLibrary, filter: Option<&str>) -> bool {
    let prepared = match filter {
        Some("prepared") => Some(true),
        Some("custom") => Some(false),
        Some(other) => {
            eprintln!(
                "error: unknown filter '{}' (expected 'prepared' or 'custom').",
                other
            );
            return true;
        }
        None => None,
    };
    match library.list_art_names(prepared, None, 0) {
        Ok(names) => {
            for name in names {
                println!("{}", name);
            }
            false
        }
        Err(e) => {
            eprintln!("error: {}", e);
            true
        }
    }
}

fn run_info(library: &ArtLibrary, name: &str) -> bool {
    match library.load_art(name) {
        Ok(record) => {
            let mut colors: Vec<_> = Vec::new();
            for &(_, color) in &record.cells {
                if !colors.contains(&color) {
                    colors.push(color);
                }
            }
            println!("name:      {}", record.name);
            println!(
                "kind:      {}",
                if record.is_prepared { "prepared" } else { "custom" }
            );
            println!(
                "best time: {}",
                record
                    .best_time_ms
                    .map(format_time)
                    .unwrap_or_else(|| "-".to_string())
            );
            println!("cells:     {}", record.cells.len());
            println!(
                "colors:    {} ({})",
                colors.len(),
                colors
                    .iter()
                    .map(|c| c.to_hex())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            false
        }
        Err(e) => {
            eprintln!("error: {}", e);
            true
        }
    }
}

fn run_export(library: &ArtLibrary, name: &str, output: &Path, scale: u32) -> bool {
    let record = match library.load_art(name) {
        Ok(record) => record,
        Err(e) => {
            eprintln!("error: {}", e);
            return true;
        }
    };
    match export_png(&record, GRID_COLS, GRID_ROWS, scale, output) {
        Ok(()) => {
            println!("{} → {}", name, output.display());
            false
        }
        Err(e) => {
            eprintln!("error: export of \"{}\" failed: {}", name, e);
            true
        }
    }
}

fn run_export_all(library: &ArtLibrary, output_dir: Option<&Path>, scale: u32) -> bool {
    let Some(dir) = output_dir else {
        eprintln!("error: --export-all requires --output-dir.");
        return true;
    };
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!(
            "error: could not create output directory '{}': {}",
            dir.display(),
            e
        );
        return true;
    }
    let names = match library.list_art_names(None, None, 0) {
        Ok(names) => names,
        Err(e) => {
            eprintln!("error: {}", e);
            return true;
        }
    };
    let mut any_failure = false;
    for name in names {
        let output = dir.join(format!("{}.png", name));
        any_failure |= run_export(library, &name, &output, scale);
    }
    any_failure
}

fn run_import(library: &mut ArtLibrary, patterns: &[String]) -> bool {
    let inputs = resolve_inputs(patterns);
    if inputs.is_empty() {
        eprintln!("error: no files matched the given pattern(s).");
        return true;
    }
    let mut any_failure = false;
    for path in inputs {
        match library.import(&path) {
            Ok(name) => println!("imported \"{}\" from {}", name, path.display()),
            Err(e) => {
                eprintln!("error: import of '{}' failed: {}", path.display(), e);
                any_failure = true;
            }
        }
    }
    any_failure
}

// ============================================================================
// Helpers
// ============================================================================

/// Expand glob patterns and literal paths into a deduplicated, ordered list.
fn resolve_inputs(patterns: &[String]) -> Vec<PathBuf> {
    let mut result: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        let as_path = Path::new(pattern);

        if as_path.exists() {
            if !result.iter().any(|p| p.as_path() == as_path) {
                result.push(as_path.to_path_buf());
            }
            continue;
        }

        match glob::glob(pattern) {
            Ok(entries) => {
                let mut matched = false;
                for entry in entries.flatten() {
                    if !result.contains(&entry) {
                        result.push(entry);
                    }
                    matched = true;
                }
                if !matched {
                    eprintln!("warning: pattern '{}' matched no files.", pattern);
                }
            }
            Err(e) => {
                eprintln!("warning: invalid glob '{}': {}", pattern, e);
            }
        }
    }

    result
}
