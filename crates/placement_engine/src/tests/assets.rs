//! External models and their procedural fallbacks

use approx::assert_relative_eq;

use super::support::{box_mesh, ScriptedLoader, Session};
use crate::assets::{AssetError, ModelStatus};
use crate::config::EngineConfig;
use crate::events::EngineEvent;
use crate::scene::ObjectKind;

fn session(loader: ScriptedLoader) -> Session {
    Session::with(EngineConfig::default(), Box::new(loader))
}

#[test]
fn test_failed_model_places_cube_fallback() {
    let loader =
        ScriptedLoader::new().script("lamp", 1, Err(AssetError::LoadFailed("bad file".into())));
    let mut session = session(loader);
    session.engine.select_kind(ObjectKind::Model("lamp".into()));
    session.tick();
    session.engine.add_random();
    session.tick();

    let object = &session.engine.context().registry().objects()[0];
    assert_eq!(object.kind(), &ObjectKind::Model("lamp".into()));
    assert_eq!(object.renderable().label(), "cube");
    assert!(session.events().iter().any(
        |e| matches!(e, EngineEvent::ModelFailed { model, .. } if model == "lamp")
    ));
}

#[test]
fn test_pending_chair_model_places_composite_fallback() {
    let loader = ScriptedLoader::new().script("chair", 30, Ok(box_mesh()));
    let mut session = session(loader);
    session.engine.select_kind(ObjectKind::Model("chair".into()));
    session.engine.add_random();
    session.tick();

    let context = session.engine.context();
    assert_eq!(context.models().status("chair"), Some(&ModelStatus::Pending));
    let object = &context.registry().objects()[0];
    assert!(object.renderable().is_composite());
    assert_eq!(object.renderable().parts().len(), 6);
}

#[test]
fn test_loaded_model_is_normalised_and_used() {
    let loader = ScriptedLoader::new().script("crate", 2, Ok(box_mesh()));
    let mut session = session(loader);
    session.engine.select_kind(ObjectKind::Model("crate".into()));
    session.run_for(0.1);
    session.engine.add_random();
    session.tick();

    let context = session.engine.context();
    let mesh = context.models().get("crate").unwrap();
    let bounds = mesh.bounds().unwrap();
    assert_relative_eq!(bounds.max_dimension(), 1.2, epsilon = 1e-5);
    assert_relative_eq!(bounds.min.y, 0.0, epsilon = 1e-6);
    assert_relative_eq!(bounds.center().x, 0.0, epsilon = 1e-6);
    assert_relative_eq!(bounds.center().z, 0.0, epsilon = 1e-6);

    let object = &context.registry().objects()[0];
    assert!(object.renderable().uses_mesh());
    assert!(session
        .events()
        .contains(&EngineEvent::ModelLoaded { model: "crate".into() }));
}

#[test]
fn test_model_requested_once() {
    let loader = ScriptedLoader::new().script("crate", 1, Ok(box_mesh()));
    let mut session = session(loader);
    session.engine.select_kind(ObjectKind::Model("crate".into()));
    for _ in 0..3 {
        session.engine.add_random();
    }
    session.run_for(0.2);

    let loaded = session
        .events()
        .into_iter()
        .filter(|e| matches!(e, EngineEvent::ModelLoaded { .. }))
        .count();
    assert_eq!(loaded, 1);
}
