//! Tap and random placement through the frame loop

use approx::assert_relative_eq;

use super::support::{test_camera, Session};
use crate::events::{EngineEvent, StateChanges};
use crate::foundation::math::Vec3;
use crate::scene::{LifecycleState, ObjectKind};

#[test]
fn test_center_tap_places_four_units_ahead() {
    let mut session = Session::new();
    session.engine.place_at(400.0, 300.0);
    session.tick();

    let objects = session.engine.context().registry().objects();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].state(), LifecycleState::Spawning);
    assert_relative_eq!(
        objects[0].transform().position,
        Vec3::new(0.0, 0.0, 1.0),
        epsilon = 1e-4
    );
}

#[test]
fn test_same_tap_same_target() {
    let mut first = Session::new();
    let mut second = Session::new();
    for session in [&mut first, &mut second] {
        session.engine.place_at(250.0, 120.0);
        session.tick();
    }

    let a = first.engine.context().registry().objects()[0].transform().position;
    let b = second.engine.context().registry().objects()[0].transform().position;
    assert_eq!(a, b);
    assert_relative_eq!((a - test_camera().position).norm(), 4.0, epsilon = 1e-4);
}

#[test]
fn test_ids_stay_unique_across_adds_and_removals() {
    let mut session = Session::new();
    let mut seen = Vec::new();

    for round in 0..5 {
        for _ in 0..4 {
            session.engine.add_random();
        }
        session.tick();
        let ids = session.engine.context().registry().ids();
        for id in &ids {
            if !seen.contains(id) {
                seen.push(*id);
            }
        }
        if round % 2 == 0 {
            session.engine.remove(ids[0]);
        }
        session.run_for(0.5);
    }

    assert_eq!(seen.len(), 20);
    let mut sorted = seen.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), 20);
}

#[test]
fn test_selected_kind_is_placed_with_its_profile() {
    let mut session = Session::new();
    session.engine.select_kind(ObjectKind::Sphere);
    session.engine.add_random();
    let changes = session.tick();

    assert!(changes.contains(StateChanges::SELECTED_KIND | StateChanges::OBJECT_COUNT));
    let object = &session.engine.context().registry().objects()[0];
    assert_eq!(object.kind(), &ObjectKind::Sphere);
    assert_relative_eq!(object.physics().bounce(), 0.9);
    assert_eq!(object.renderable().label(), "sphere");

    let events = session.events();
    assert!(events.contains(&EngineEvent::SelectedKindChanged {
        kind: ObjectKind::Sphere
    }));
    assert!(events.contains(&EngineEvent::ObjectCountChanged { count: 1 }));
}

#[test]
fn test_zero_viewport_ignores_taps() {
    let mut session = Session::new();
    session.engine.set_viewport(0.0, 0.0);
    session.engine.place_at(10.0, 10.0);
    session.tick();

    assert_eq!(session.engine.object_count(), 0);
}

#[test]
fn test_objects_settle_on_the_ground() {
    let mut session = Session::new();
    for _ in 0..6 {
        session.engine.add_random();
    }
    session.run_for(20.0);

    let ground = session.engine.context().registry().ground_y();
    for object in session.engine.context().registry().objects() {
        assert_eq!(object.state(), LifecycleState::Active);
        assert!(object.is_resting(), "{} still bouncing", object.id());
        assert_relative_eq!(object.transform().position.y, ground);
        assert_eq!(object.velocity().y, 0.0);
    }
}
