use std::time::{Duration, Instant};

use assert_matches::assert_matches;
use pacer::{Pacer, PacerError, Phase};

fn secs(s: f64) -> Duration {
    Duration::from_secs_f64(s)
}

#[test]
fn fifty_one_laps_in_twenty_minutes() {
    let t0 = Instant::now();
    let mut pacer = Pacer::new_at(51, 1200.0, t0).unwrap();
    let static_target = pacer.session().static_lap_target;
    assert!((static_target - 23.53).abs() < 0.01);
    assert_eq!(pacer.state().current_lap_target, static_target);

    let rec = pacer.finish_lap_at(t0 + secs(20.0)).unwrap();
    assert!((rec.new_target - 23.6).abs() < 1e-9);

    let c = pacer.tick_at(t0 + secs(20.0)).unwrap();
    assert!((c.overall_remaining - 1180.0).abs() < 1e-9);
    assert!((c.lap_countdown - 23.6).abs() < 1e-9);
}

#[test]
fn slow_laps_tighten_the_remaining_targets() {
    let t0 = Instant::now();
    let mut pacer = Pacer::new_at(4, 40.0, t0).unwrap();

    let mut now = t0;
    let mut last_target = pacer.state().current_lap_target;
    for _ in 0..3 {
        now += secs(12.0);
        let rec = pacer.finish_lap_at(now).unwrap();
        assert!(rec.new_target < last_target);
        last_target = rec.new_target;
    }

    // 36 s used, 4 s left for the final lap
    assert!((pacer.state().current_lap_target - 4.0).abs() < 1e-9);
    assert!((pacer.state().cumulative_diff + 6.0).abs() < 1e-9);
    let perf = pacer.performance().unwrap();
    assert!(!perf.is_ahead());
    assert!((perf.lap_ratio + 0.6).abs() < 1e-9);
}

#[test]
fn full_run_reaches_complete_and_stays_there() {
    let t0 = Instant::now();
    let mut pacer = Pacer::new_at(3, 30.0, t0).unwrap();

    let mut now = t0;
    for lap in 1..=3 {
        assert_eq!(pacer.phase(), Phase::Running { lap });
        now += secs(9.0);
        pacer.finish_lap_at(now).unwrap();
    }

    assert_eq!(pacer.phase(), Phase::Complete);
    assert!(pacer.finish_lap_at(now + secs(1.0)).is_none());
    assert!(pacer.tick_at(now + secs(1.0)).is_none());
    assert_eq!(pacer.laps().len(), 3);
    assert!((pacer.state().cumulative_diff - 3.0).abs() < 1e-9);
}

#[test]
fn invalid_sessions_are_rejected() {
    assert_matches!(
        Pacer::new(0, 100.0),
        Err(PacerError::InvalidConfiguration { .. })
    );
    assert_matches!(
        Pacer::new(10, f64::INFINITY),
        Err(PacerError::InvalidConfiguration { .. })
    );
}
