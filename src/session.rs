//! Game session - the single synchronous entry point for every semantic
//! action the UI can produce.
//!
//! Input sources (mouse, keyboard, CLI-less buttons) reduce to [`Command`]s;
//! `dispatch` runs each one to completion before the next is looked at, so
//! the mutate → match-check → complete → persist sequence of a paint can
//! never be interleaved with other input. The session owns the grid, the
//! derived palette, the stopwatch, the countdown gate and the score book -
//! all passed-in state, no globals.

use std::time::Instant;

use uuid::Uuid;

use crate::game::{Grid, Rgb, Toggle};
use crate::palette::{self, PaletteSlot};
use crate::score::ScoreKeeper;
use crate::store::{ArtLibrary, StoreError};
use crate::timer::{Countdown, CountdownTick, Sequence, Stopwatch};
use crate::{log_info, log_warn};

// ============================================================================
// Types
// ============================================================================

/// Grid dimensions for a session. Tests shrink this; the game ships 12×12.
#[derive(Clone, Copy, Debug)]
pub struct SessionConfig {
    pub cols: usize,
    pub rows: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cols: crate::game::GRID_COLS,
            rows: crate::game::GRID_ROWS,
        }
    }
}

/// Which phase the grid is in.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    /// Free painting with the full catalog, no targets yet.
    Design,
    /// Timed re-painting against a saved outline with derived slots.
    Attempt,
}

/// Identity of the art on the easel.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ArtId {
    /// Unsaved scratch art - nothing persisted until it gets a name.
    Custom,
    /// A named art backed by a library row.
    Named(String),
}

/// Semantic actions, decoupled from whatever widget or key produced them.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Command {
    /// Click the cell at this linear index with the current color.
    Paint(usize),
    /// Snapshot the design into a target outline and enter attempt mode.
    Save,
    /// Give the current custom art a name and persist it.
    NameArt(String),
    /// Soft clear + countdown + clock restart.
    Restart,
    /// Hard clear back to a blank design canvas.
    ClearAll,
    /// Pick a paint color directly (catalog click).
    SelectColor(Rgb),
    /// Pick an attempt-mode slot by its 1-based index (digit keys).
    SelectSlot(u8),
    /// Leave the current art and load a stored one.
    LoadArt(String),
}

/// What a successful command should be reflected as.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Feedback {
    None,
    Saved,
    Cleared,
    Loaded,
    /// The grid just matched its outline; scores are updated and a fresh
    /// attempt is counting down.
    AttemptComplete {
        elapsed_ms: u64,
        personal_best: bool,
    },
}

/// Failures a command can surface. Wrong-color paints are *not* here - they
/// are silent no-ops by design.
#[derive(Debug)]
pub enum GameError {
    /// Save with no painted cell.
    NothingToSave,
    /// Restart with no outline to restart against.
    NoOutline,
    /// A tenth distinct color was requested.
    SlotLimitReached,
    /// Empty or reserved art name.
    ReservedName(String),
    /// The store failed; in-memory state is already updated.
    Store(StoreError),
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::NothingToSave => write!(f, "Nothing to save - paint at least one cell"),
            GameError::NoOutline => write!(f, "Nothing to restart - save an art first"),
            GameError::SlotLimitReached => write!(f, "{}", palette::SlotLimitExceeded),
            GameError::ReservedName(name) => {
                write!(f, "\"{}\" cannot be used as an art name", name)
            }
            GameError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for GameError {}

impl From<StoreError> for GameError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::ReservedName(name) => GameError::ReservedName(name),
            other => GameError::Store(other),
        }
    }
}

// ============================================================================
// GameSession
// ============================================================================

pub struct GameSession {
    /// Tag for log lines; a new id per easel, like a document id.
    pub id: Uuid,
    grid: Grid,
    mode: Mode,
    art: ArtId,
    is_prepared: bool,
    slots: Vec<PaletteSlot>,
    current_color: Rgb,
    stopwatch: Stopwatch,
    countdown: Countdown,
    scores: ScoreKeeper,
}

impl GameSession {
    /// Fresh custom art in design mode.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            grid: Grid::new(config.cols, config.rows),
            mode: Mode::Design,
            art: ArtId::Custom,
            is_prepared: false,
            slots: Vec::new(),
            current_color: palette::MASTER_CATALOG[0],
            stopwatch: Stopwatch::new(),
            countdown: Countdown::idle(),
            scores: ScoreKeeper::new(),
        }
    }

    // -- read-side accessors for the UI ----------------------------------

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn art(&self) -> &ArtId {
        &self.art
    }

    pub fn art_label(&self) -> &str {
        match &self.art {
            ArtId::Custom => "Custom art",
            ArtId::Named(name) => name,
        }
    }

    pub fn is_prepared(&self) -> bool {
        self.is_prepared
    }

    pub fn slots(&self) -> &[PaletteSlot] {
        &self.slots
    }

    pub fn current_color(&self) -> Rgb {
        self.current_color
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.stopwatch.elapsed_ms()
    }

    pub fn clock_running(&self) -> bool {
        self.stopwatch.is_running()
    }

    pub fn best_ms(&self) -> Option<u64> {
        self.scores.best_ms()
    }

    pub fn last_ms(&self) -> Option<u64> {
        self.scores.last_ms()
    }

    /// True while the countdown gate holds the grid shut.
    pub fn is_locked(&self) -> bool {
        self.countdown.is_running()
    }

    pub fn countdown_frame(&self) -> Option<&'static str> {
        self.countdown.current_frame()
    }

    /// Anything time-driven on screen right now?
    pub fn wants_ticks(&self) -> bool {
        self.stopwatch.is_running() || self.countdown.is_running()
    }

    // -- time ------------------------------------------------------------

    /// Advance the countdown; when it completes, the grid unlocks and the
    /// clock starts.
    pub fn tick(&mut self, now: Instant) {
        if self.countdown.tick(now) == CountdownTick::Finished {
            self.stopwatch.start();
        }
    }

    // -- command dispatch -------------------------------------------------

    /// Run one semantic action to completion.
    pub fn dispatch(
        &mut self,
        command: Command,
        store: &mut ArtLibrary,
        now: Instant,
    ) -> Result<Feedback, GameError> {
        match command {
            Command::Paint(index) => self.paint(index, store, now),
            Command::Save => self.save(store, now),
            Command::NameArt(name) => self.name_art(&name, store),
            Command::Restart => self.restart(now),
            Command::ClearAll => self.clear_all(),
            Command::SelectColor(color) => self.select_color(color),
            Command::SelectSlot(slot) => self.select_slot(slot),
            Command::LoadArt(name) => self.load_art(&name, store, now),
        }
    }

    fn paint(
        &mut self,
        index: usize,
        store: &mut ArtLibrary,
        now: Instant,
    ) -> Result<Feedback, GameError> {
        if self.countdown.is_running() || index >= self.grid.len() {
            return Ok(Feedback::None);
        }
        match self.grid.toggle(index, self.current_color) {
            Toggle::Rejected => return Ok(Feedback::None),
            Toggle::Painted | Toggle::Cleared => {}
        }
        if self.mode == Mode::Attempt && self.grid.is_fully_matched() {
            return self.complete_attempt(store, now);
        }
        Ok(Feedback::None)
    }

    /// The grid just matched: freeze the clock, book the time, persist an
    /// improved record for named arts, then roll straight into the next
    /// attempt behind a restart countdown.
    fn complete_attempt(
        &mut self,
        store: &mut ArtLibrary,
        now: Instant,
    ) -> Result<Feedback, GameError> {
        self.stopwatch.pause();
        let elapsed_ms = self.stopwatch.elapsed_ms();
        let personal_best = self.scores.record(elapsed_ms);

        let mut persist_error = None;
        if personal_best && let ArtId::Named(name) = &self.art {
            if let Err(e) = store.update_best_time(name, elapsed_ms) {
                log_warn!("best time for \"{}\" not persisted: {}", name, e);
                persist_error = Some(e);
            }
        }

        log_info!(
            "[{}] attempt complete in {}ms (best: {:?})",
            self.id,
            elapsed_ms,
            self.scores.best_ms()
        );

        self.grid.clear(false);
        self.stopwatch.reset();
        self.countdown.begin(Sequence::Restart, now);

        match persist_error {
            // The run is recorded in memory either way; surface the store
            // failure so the UI can warn.
            Some(e) => Err(GameError::Store(e)),
            None => Ok(Feedback::AttemptComplete {
                elapsed_ms,
                personal_best,
            }),
        }
    }

    fn save(&mut self, store: &mut ArtLibrary, now: Instant) -> Result<Feedback, GameError> {
        let pattern = self.grid.save().ok_or(GameError::NothingToSave)?;
        self.enter_attempt(now)?;
        if let ArtId::Named(name) = self.art.clone() {
            store.save_art(&name, self.scores.best_ms(), &pattern)?;
        }
        log_info!(
            "[{}] saved outline: {} cells, {} slots",
            self.id,
            pattern.len(),
            self.slots.len()
        );
        Ok(Feedback::Saved)
    }

    fn name_art(&mut self, name: &str, store: &mut ArtLibrary) -> Result<Feedback, GameError> {
        ArtLibrary::validate_name(name)?;
        let cells = self.grid.target_cells();
        if cells.is_empty() {
            return Err(GameError::NothingToSave);
        }
        store.save_art(name, self.scores.best_ms(), &cells)?;
        self.art = ArtId::Named(name.trim().to_string());
        log_info!("[{}] art named \"{}\"", self.id, name.trim());
        Ok(Feedback::Saved)
    }

    fn restart(&mut self, now: Instant) -> Result<Feedback, GameError> {
        if !self.grid.has_outline() {
            return Err(GameError::NoOutline);
        }
        self.grid.clear(false);
        self.stopwatch.reset();
        self.countdown.begin(Sequence::Restart, now);
        Ok(Feedback::Cleared)
    }

    fn clear_all(&mut self) -> Result<Feedback, GameError> {
        self.grid.clear(true);
        self.countdown.cancel();
        self.stopwatch.reset();
        self.slots.clear();
        self.scores.clear();
        self.mode = Mode::Design;
        self.art = ArtId::Custom;
        self.is_prepared = false;
        self.current_color = palette::MASTER_CATALOG[0];
        Ok(Feedback::Cleared)
    }

    fn select_color(&mut self, color: Rgb) -> Result<Feedback, GameError> {
        match self.mode {
            Mode::Design => {
                if palette::selection_exceeds_slots(&self.grid, color) {
                    return Err(GameError::SlotLimitReached);
                }
                self.current_color = color;
            }
            Mode::Attempt => {
                // only derived-slot colors are pickable during an attempt
                if self.slots.iter().any(|s| s.color == color) {
                    self.current_color = color;
                }
            }
        }
        Ok(Feedback::None)
    }

    fn select_slot(&mut self, slot: u8) -> Result<Feedback, GameError> {
        if self.mode == Mode::Attempt {
            let color = slot
                .checked_sub(1)
                .and_then(|i| self.slots.get(i as usize))
                .map(|entry| entry.color);
            if let Some(color) = color {
                self.current_color = color;
            }
        }
        Ok(Feedback::None)
    }

    fn load_art(
        &mut self,
        name: &str,
        store: &mut ArtLibrary,
        now: Instant,
    ) -> Result<Feedback, GameError> {
        let record = store.load_art(name)?;
        if record.cells.is_empty() {
            return Err(GameError::Store(StoreError::InvalidFormat(format!(
                "art \"{}\" has no cells",
                name
            ))));
        }
        self.grid.hydrate(&record.cells);
        self.scores = ScoreKeeper::seed(record.best_time_ms);
        self.art = ArtId::Named(record.name);
        self.is_prepared = record.is_prepared;
        self.enter_attempt(now)?;
        log_info!("[{}] loaded art \"{}\"", self.id, name);
        Ok(Feedback::Loaded)
    }

    /// Derive the slot palette from the grid's targets and open the gate to
    /// a first attempt.
    fn enter_attempt(&mut self, now: Instant) -> Result<(), GameError> {
        self.slots = palette::derive_attempt_palette(&self.grid)
            .map_err(|_| GameError::SlotLimitReached)?;
        // the grid has at least one target here, so slot 1 exists
        if let Some(first) = self.slots.first() {
            self.current_color = first.color;
        }
        self.mode = Mode::Attempt;
        self.stopwatch.reset();
        self.countdown.begin(Sequence::FirstEntry, now);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::COUNTDOWN_STEP;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const RED: Rgb = Rgb(255, 0, 0);
    const BLUE: Rgb = Rgb(0, 0, 255);

    fn temp_library() -> ArtLibrary {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        let dir: PathBuf = std::env::temp_dir().join(format!(
            "speedpixels-session-{}-{}",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        ));
        ArtLibrary::open(dir).expect("temp library")
    }

    fn small_session() -> GameSession {
        GameSession::new(SessionConfig { cols: 2, rows: 2 })
    }

    /// Run the countdown out so the grid unlocks and the clock starts.
    fn finish_countdown(session: &mut GameSession, from: Instant) -> Instant {
        let mut now = from;
        for _ in 0..8 {
            now += COUNTDOWN_STEP;
            session.tick(now);
            if !session.is_locked() {
                return now;
            }
        }
        panic!("countdown never finished");
    }

    #[test]
    fn save_with_nothing_painted_fails() {
        let mut session = small_session();
        let mut store = temp_library();
        let err = session
            .dispatch(Command::Save, &mut store, Instant::now())
            .unwrap_err();
        assert!(matches!(err, GameError::NothingToSave));
        assert_eq!(session.mode(), Mode::Design);
    }

    #[test]
    fn design_paint_save_attempt_cycle() {
        let mut session = small_session();
        let mut store = temp_library();
        let t0 = Instant::now();

        session.dispatch(Command::SelectColor(RED), &mut store, t0).unwrap();
        session.dispatch(Command::Paint(0), &mut store, t0).unwrap();
        session.dispatch(Command::Paint(2), &mut store, t0).unwrap();

        assert_eq!(
            session.dispatch(Command::Save, &mut store, t0).unwrap(),
            Feedback::Saved
        );
        assert_eq!(session.mode(), Mode::Attempt);
        assert_eq!(session.slots().len(), 1);
        assert_eq!(session.current_color(), RED);
        assert!(session.is_locked());
        assert_eq!(session.countdown_frame(), Some("3"));

        // clicks are swallowed while the gate is down
        session.dispatch(Command::Paint(0), &mut store, t0).unwrap();
        assert_eq!(session.grid().cell(0).paint, None);

        let now = finish_countdown(&mut session, t0);
        assert!(session.clock_running());

        session.dispatch(Command::Paint(0), &mut store, now).unwrap();
        assert!(!session.grid().is_fully_matched());
        let feedback = session.dispatch(Command::Paint(2), &mut store, now).unwrap();
        let Feedback::AttemptComplete { personal_best, .. } = feedback else {
            panic!("expected completion, got {:?}", feedback);
        };
        assert!(personal_best);
        assert!(session.best_ms().is_some());
        assert_eq!(session.best_ms(), session.last_ms());

        // straight into the next attempt: outline kept, paint gone, gated
        assert!(session.grid().has_outline());
        assert!(!session.grid().any_painted());
        assert!(session.is_locked());
        assert!(!session.clock_running());
    }

    #[test]
    fn wrong_color_is_a_silent_noop() {
        let mut session = small_session();
        let mut store = temp_library();
        let t0 = Instant::now();

        session.dispatch(Command::SelectColor(RED), &mut store, t0).unwrap();
        session.dispatch(Command::Paint(0), &mut store, t0).unwrap();
        session.dispatch(Command::SelectColor(BLUE), &mut store, t0).unwrap();
        session.dispatch(Command::Paint(1), &mut store, t0).unwrap();
        session.dispatch(Command::Save, &mut store, t0).unwrap();
        let now = finish_countdown(&mut session, t0);

        // slot 2 is blue; cell 0 wants red
        session.dispatch(Command::SelectSlot(2), &mut store, now).unwrap();
        assert_eq!(session.current_color(), BLUE);
        let feedback = session.dispatch(Command::Paint(0), &mut store, now).unwrap();
        assert_eq!(feedback, Feedback::None);
        assert_eq!(session.grid().cell(0).paint, None);

        // out-of-range slot is ignored
        session.dispatch(Command::SelectSlot(9), &mut store, now).unwrap();
        assert_eq!(session.current_color(), BLUE);
    }

    #[test]
    fn slot_limit_gates_the_tenth_design_color() {
        let mut session = GameSession::new(SessionConfig { cols: 12, rows: 1 });
        let mut store = temp_library();
        let t0 = Instant::now();

        for i in 0..9 {
            let color = Rgb(i as u8, 10, 10);
            session.dispatch(Command::SelectColor(color), &mut store, t0).unwrap();
            session.dispatch(Command::Paint(i), &mut store, t0).unwrap();
        }
        // re-selecting a used color is fine
        session
            .dispatch(Command::SelectColor(Rgb(0, 10, 10)), &mut store, t0)
            .unwrap();
        let err = session
            .dispatch(Command::SelectColor(Rgb(99, 99, 99)), &mut store, t0)
            .unwrap_err();
        assert!(matches!(err, GameError::SlotLimitReached));
        assert_eq!(session.current_color(), Rgb(0, 10, 10));
    }

    #[test]
    fn restart_requires_an_outline() {
        let mut session = small_session();
        let t0 = Instant::now();
        assert!(matches!(
            session.restart(t0),
            Err(GameError::NoOutline)
        ));
    }

    #[test]
    fn clear_all_returns_to_design_mode() {
        let mut session = small_session();
        let mut store = temp_library();
        let t0 = Instant::now();

        session.dispatch(Command::SelectColor(RED), &mut store, t0).unwrap();
        session.dispatch(Command::Paint(0), &mut store, t0).unwrap();
        session.dispatch(Command::Save, &mut store, t0).unwrap();
        assert!(session.is_locked());

        session.dispatch(Command::ClearAll, &mut store, t0).unwrap();
        assert_eq!(session.mode(), Mode::Design);
        assert!(!session.is_locked());
        assert!(!session.grid().has_outline());
        assert!(session.slots().is_empty());
        assert_eq!(session.best_ms(), None);
        assert_eq!(*session.art(), ArtId::Custom);
        assert_eq!(session.current_color(), palette::MASTER_CATALOG[0]);
    }

    #[test]
    fn naming_persists_and_best_times_flow_to_the_store() {
        let mut session = small_session();
        let mut store = temp_library();
        let t0 = Instant::now();

        session.dispatch(Command::SelectColor(RED), &mut store, t0).unwrap();
        session.dispatch(Command::Paint(0), &mut store, t0).unwrap();
        session.dispatch(Command::Save, &mut store, t0).unwrap();

        assert!(matches!(
            session.dispatch(Command::NameArt("custom".into()), &mut store, t0),
            Err(GameError::ReservedName(_))
        ));
        session
            .dispatch(Command::NameArt("Dot".into()), &mut store, t0)
            .unwrap();
        assert_eq!(*session.art(), ArtId::Named("Dot".into()));
        assert_eq!(store.load_art("Dot").unwrap().cells, vec![(0, RED)]);

        let now = finish_countdown(&mut session, t0);
        session.dispatch(Command::Paint(0), &mut store, now).unwrap();
        let stored = store.load_art("Dot").unwrap();
        assert_eq!(stored.best_time_ms, session.best_ms());
        assert!(stored.best_time_ms.is_some());
    }

    #[test]
    fn load_art_enters_attempt_with_seeded_best() {
        let mut store = temp_library();
        store
            .save_art("Stripe", Some(4321), &[(0, RED), (1, BLUE)])
            .unwrap();

        let mut session = small_session();
        let t0 = Instant::now();
        session
            .dispatch(Command::LoadArt("Stripe".into()), &mut store, t0)
            .unwrap();
        assert_eq!(session.mode(), Mode::Attempt);
        assert_eq!(session.best_ms(), Some(4321));
        assert_eq!(session.slots().len(), 2);
        assert_eq!(session.current_color(), RED);
        assert!(session.is_locked());

        assert!(matches!(
            session.dispatch(Command::LoadArt("Nope".into()), &mut store, t0),
            Err(GameError::Store(StoreError::NotFound(_)))
        ));
    }
}
