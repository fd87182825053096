//! SpeedPixels - a pixel-art speed-painting game.
//!
//! The player free-paints a small grid, locks the pattern in as a target
//! outline, then re-paints it against the clock using a palette derived from
//! the saved colors. Best times are tracked per art and persisted in the
//! user's art library.
//!
//! The crate is split into a game core (`game`, `palette`, `timer`, `score`,
//! `session`) that is pure and synchronous, a persistence layer (`store`),
//! and an egui front end (`app`, `components`). The binary also exposes a
//! headless CLI (`cli`) for managing the art library without opening a window.

pub mod app;
pub mod assets;
pub mod cli;
pub mod components;
pub mod game;
pub mod logger;
pub mod palette;
pub mod score;
pub mod session;
pub mod store;
pub mod theme;
pub mod timer;
