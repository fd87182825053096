//! End-to-end session scenarios: design → save → timed attempt → record,
//! driven purely through the command entry point.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use speedpixels::game::Rgb;
use speedpixels::session::{ArtId, Command, Feedback, GameSession, Mode, SessionConfig};
use speedpixels::store::ArtLibrary;
use speedpixels::timer::COUNTDOWN_STEP;

const RED: Rgb = Rgb(255, 0, 0);
const BLUE: Rgb = Rgb(0, 0, 255);

fn temp_library() -> ArtLibrary {
    static NEXT: AtomicUsize = AtomicUsize::new(0);
    let dir: PathBuf = std::env::temp_dir().join(format!(
        "speedpixels-flow-{}-{}",
        std::process::id(),
        NEXT.fetch_add(1, Ordering::Relaxed)
    ));
    ArtLibrary::open(dir).expect("temp library")
}

/// Tick until the countdown gate opens and the clock is running.
fn run_countdown(session: &mut GameSession) -> Instant {
    let mut now = Instant::now();
    for _ in 0..8 {
        now += COUNTDOWN_STEP;
        session.tick(now);
        if !session.is_locked() {
            assert!(session.clock_running());
            return now;
        }
    }
    panic!("countdown never finished");
}

#[test]
fn two_by_two_scenario() {
    let mut store = temp_library();
    let mut session = GameSession::new(SessionConfig { cols: 2, rows: 2 });
    let t0 = Instant::now();

    // design: paint cells 0 and 2 red, then lock the pattern in
    session.dispatch(Command::SelectColor(RED), &mut store, t0).unwrap();
    session.dispatch(Command::Paint(0), &mut store, t0).unwrap();
    session.dispatch(Command::Paint(2), &mut store, t0).unwrap();
    assert_eq!(
        session.dispatch(Command::Save, &mut store, t0).unwrap(),
        Feedback::Saved
    );

    // snapshot law: outline holds the old paint, the paint itself is gone
    let grid = session.grid();
    assert_eq!(grid.cell(0).target, Some(RED));
    assert_eq!(grid.cell(2).target, Some(RED));
    assert_eq!(grid.cell(1).target, None);
    assert_eq!(grid.cell(3).target, None);
    assert!(!grid.any_painted());

    // attempt palette is [RED:1]
    assert_eq!(session.slots().len(), 1);
    assert_eq!(session.slots()[0].index, 1);
    assert_eq!(session.slots()[0].color, RED);
    assert_eq!(session.current_color(), RED);

    let now = run_countdown(&mut session);

    session.dispatch(Command::Paint(0), &mut store, now).unwrap();
    assert!(!session.grid().is_fully_matched());

    let feedback = session.dispatch(Command::Paint(2), &mut store, now).unwrap();
    let Feedback::AttemptComplete {
        elapsed_ms,
        personal_best,
    } = feedback
    else {
        panic!("expected a completed attempt, got {:?}", feedback);
    };
    assert!(personal_best);
    assert_eq!(session.best_ms(), Some(elapsed_ms));
    assert_eq!(session.last_ms(), Some(elapsed_ms));

    // the grid rolled into the next attempt behind a fresh countdown
    assert!(session.grid().has_outline());
    assert!(!session.grid().any_painted());
    assert!(session.is_locked());
}

#[test]
fn best_time_survives_a_reload() {
    let mut store = temp_library();

    // first sitting: design, name, complete one run
    {
        let mut session = GameSession::new(SessionConfig { cols: 2, rows: 1 });
        let t0 = Instant::now();
        session.dispatch(Command::SelectColor(BLUE), &mut store, t0).unwrap();
        session.dispatch(Command::Paint(0), &mut store, t0).unwrap();
        session.dispatch(Command::Save, &mut store, t0).unwrap();
        session
            .dispatch(Command::NameArt("Stripe".into()), &mut store, t0)
            .unwrap();

        let now = run_countdown(&mut session);
        session.dispatch(Command::Paint(0), &mut store, now).unwrap();
        assert!(session.best_ms().is_some());
    }

    let stored_best = store.load_art("Stripe").unwrap().best_time_ms;
    assert!(stored_best.is_some());

    // second sitting: load the named art fresh - the record is seeded back
    let mut session = GameSession::new(SessionConfig { cols: 2, rows: 1 });
    let t0 = Instant::now();
    assert_eq!(
        session
            .dispatch(Command::LoadArt("Stripe".into()), &mut store, t0)
            .unwrap(),
        Feedback::Loaded
    );
    assert_eq!(session.mode(), Mode::Attempt);
    assert_eq!(*session.art(), ArtId::Named("Stripe".into()));
    assert_eq!(session.best_ms(), stored_best);
    assert_eq!(session.last_ms(), None);
    assert_eq!(session.grid().cell(0).target, Some(BLUE));
}

#[test]
fn clear_all_cancels_the_countdown_and_leaves_attempt_mode() {
    let mut store = temp_library();
    let mut session = GameSession::new(SessionConfig { cols: 2, rows: 2 });
    let t0 = Instant::now();

    session.dispatch(Command::SelectColor(RED), &mut store, t0).unwrap();
    session.dispatch(Command::Paint(0), &mut store, t0).unwrap();
    session.dispatch(Command::Save, &mut store, t0).unwrap();
    assert!(session.is_locked());
    assert_eq!(session.countdown_frame(), Some("3"));

    session.dispatch(Command::ClearAll, &mut store, t0).unwrap();
    assert!(!session.is_locked());
    assert_eq!(session.countdown_frame(), None);
    assert_eq!(session.mode(), Mode::Design);
    assert!(!session.grid().has_outline());
    assert!(!session.clock_running());

    // much later ticks must not resurrect the cancelled gate
    session.tick(t0 + 60 * COUNTDOWN_STEP);
    assert!(!session.clock_running());
}

#[test]
fn restart_resets_paint_but_keeps_the_outline() {
    let mut store = temp_library();
    let mut session = GameSession::new(SessionConfig { cols: 2, rows: 1 });
    let t0 = Instant::now();

    session.dispatch(Command::SelectColor(RED), &mut store, t0).unwrap();
    session.dispatch(Command::Paint(0), &mut store, t0).unwrap();
    session.dispatch(Command::Paint(1), &mut store, t0).unwrap();
    session.dispatch(Command::Save, &mut store, t0).unwrap();
    let now = run_countdown(&mut session);

    // half-finished attempt, then restart
    session.dispatch(Command::Paint(0), &mut store, now).unwrap();
    assert!(session.grid().any_painted());
    session.dispatch(Command::Restart, &mut store, now).unwrap();
    assert!(!session.grid().any_painted());
    assert!(session.grid().has_outline());
    assert!(session.is_locked());
    assert!(!session.clock_running());

    // the restart countdown opens the gate again
    run_countdown(&mut session);
}
