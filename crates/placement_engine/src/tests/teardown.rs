//! Teardown and exactly-once disposal

use super::support::Session;
use crate::events::EngineEvent;

#[test]
fn test_teardown_is_idempotent() {
    let mut session = Session::new();
    for _ in 0..3 {
        session.engine.add_random();
    }
    session.engine.burst(crate::foundation::math::Vec3::zeros());
    session.run_for(0.5);
    assert_eq!(session.renderer().live_resources(), 23);

    session.engine.teardown();
    assert!(session.engine.is_torn_down());
    assert_eq!(session.renderer().live_resources(), 0);
    assert_eq!(session.renderer().disposed().len(), 23);

    session.engine.teardown();
    assert_eq!(session.renderer().disposed().len(), 23);
    assert!(session.events().contains(&EngineEvent::TornDown));
}

#[test]
fn test_nothing_runs_after_teardown() {
    let mut session = Session::new();
    session.engine.add_random();
    session.tick();
    session.engine.teardown();
    let frames = session.renderer().frames_drawn();

    session.engine.add_random();
    assert_eq!(session.engine.pending_commands(), 0);
    assert!(session.tick().is_empty());
    assert_eq!(session.renderer().frames_drawn(), frames);
    assert_eq!(session.engine.object_count(), 0);
}

#[test]
fn test_teardown_discards_pending_commands() {
    let mut session = Session::new();
    session.engine.add_random();
    session.engine.teardown();

    assert_eq!(session.renderer().live_resources(), 0);
    assert!(session.renderer().disposed().is_empty());
}

#[test]
fn test_teardown_mid_despawn_releases_once() {
    let mut session = Session::new();
    for _ in 0..4 {
        session.engine.add_random();
    }
    session.run_for(1.0);
    session.engine.clear_all();
    session.run_for(0.2);

    session.engine.teardown();
    assert_eq!(session.renderer().disposed().len(), 4);
    assert_eq!(session.renderer().live_resources(), 0);
}
