use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pacer::{
    app::{App, KeyOutcome},
    config::LapUnit,
    runtime::{FixedTicker, PacerEvent, Runner, TestEventSource},
    Pacer, Phase,
};

fn press(code: KeyCode) -> PacerEvent {
    PacerEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

// Drives the app through Runner/TestEventSource without a TTY, the same way
// the binary's event loop does.
fn drive<E, T>(app: &mut App, runner: &Runner<E, T>, max_steps: u32) -> u32
where
    E: pacer::runtime::EventSource,
    T: pacer::runtime::Ticker,
{
    let mut ticks = 0;
    for _ in 0..max_steps {
        match runner.step(app.is_running()) {
            None => break,
            Some(PacerEvent::Tick) => {
                ticks += 1;
                app.on_tick(Instant::now());
            }
            Some(PacerEvent::Resize) => {}
            Some(PacerEvent::Key(key)) => {
                if app.handle_key(key, Instant::now()) == KeyOutcome::Quit {
                    break;
                }
            }
        }
    }
    ticks
}

#[test]
fn headless_session_completes_via_keys() {
    let mut app = App::new(Pacer::new(3, 30.0).unwrap(), LapUnit::Lap);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(press(KeyCode::Char(' '))).unwrap();
    tx.send(press(KeyCode::Enter)).unwrap();
    tx.send(press(KeyCode::Char('l'))).unwrap();
    // ignored: session is already complete
    tx.send(press(KeyCode::Char(' '))).unwrap();
    drop(tx);

    drive(&mut app, &runner, 100);

    assert_eq!(app.phase(), Phase::Complete);
    assert_eq!(app.pacer.laps().len(), 3);
    assert!(app.countdown.is_none());
    assert_eq!(app.pacer.laps()[2].new_target, 0.0);
}

#[test]
fn headless_ticks_refresh_countdown_without_mutating_state() {
    let mut app = App::new(Pacer::new(2, 60.0).unwrap(), LapUnit::Lap);
    let before = app.pacer.state().clone();

    let (_tx, rx) = mpsc::channel::<PacerEvent>();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(2)),
    );

    let ticks = drive(&mut app, &runner, 10);

    assert_eq!(ticks, 10);
    assert_eq!(app.pacer.state(), &before);
    let countdown = app.countdown.expect("running session has a countdown");
    assert!(countdown.lap_countdown <= 30.0);
    assert!(countdown.overall_remaining <= 60.0);
}

#[test]
fn headless_quit_stops_the_loop() {
    let mut app = App::new(Pacer::new(5, 50.0).unwrap(), LapUnit::Lap);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );
    tx.send(press(KeyCode::Char(' '))).unwrap();
    tx.send(press(KeyCode::Esc)).unwrap();
    tx.send(press(KeyCode::Char(' '))).unwrap();

    drive(&mut app, &runner, 100);

    // the lap after Esc was never processed
    assert_eq!(app.pacer.laps().len(), 1);
    assert_eq!(app.phase(), Phase::Running { lap: 2 });
}
