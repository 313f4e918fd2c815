//! Integration tests for WorkspaceService with a real filesystem.

use std::fs;
use std::sync::Arc;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use probtree::application::services::WorkspaceService;
use probtree::application::{ApplicationError, Intent};
use probtree::domain::{Mode, ROOT_ID};
use probtree::infrastructure::traits::RealFileSystem;
use probtree::util::testing;

fn service_with(default_mode: Mode) -> WorkspaceService {
    testing::init_test_setup();
    WorkspaceService::new(Arc::new(RealFileSystem), default_mode)
}

#[fixture]
fn service() -> WorkspaceService {
    service_with(Mode::Relative)
}

#[rstest]
fn given_new_document_when_loading_then_fresh_session_in_chosen_mode(service: WorkspaceService) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested/belief.json");

    service.create(&path, Mode::Absolute, false).unwrap();
    let session = service.load(&path).unwrap();

    assert_eq!(session.mode(), Mode::Absolute);
    assert!(session.root().is_leaf());
}

#[rstest]
fn given_existing_document_when_creating_without_force_then_validation_error(
    service: WorkspaceService,
) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("belief.json");
    service.create(&path, Mode::Relative, false).unwrap();

    let result = service.create(&path, Mode::Relative, false);

    assert!(matches!(result, Err(ApplicationError::Validation { .. })));
    assert!(service.create(&path, Mode::Relative, true).is_ok());
}

#[rstest]
fn given_missing_document_when_loading_then_not_found(service: WorkspaceService) {
    let tmp = TempDir::new().unwrap();

    let result = service.load(&tmp.path().join("nope.json"));

    assert!(matches!(result, Err(ApplicationError::DocumentNotFound(_))));
}

#[rstest]
fn given_edited_session_when_stored_then_full_precision_kept(service: WorkspaceService) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("belief.json");
    let mut session = service.create(&path, Mode::Relative, false).unwrap();
    let id = session
        .apply(Intent::AddChild {
            parent_id: ROOT_ID.into(),
        })
        .unwrap();
    session.apply(Intent::Reweight {
        id: id.clone(),
        probability: 100.0 / 3.0,
    });

    service.store(&path, &session).unwrap();
    let reloaded = service.load(&path).unwrap();

    assert_eq!(reloaded.find(&id).unwrap().probability, 100.0 / 3.0);
}

#[rstest]
fn given_session_when_exported_then_file_is_rounded(service: WorkspaceService) {
    let tmp = TempDir::new().unwrap();
    let mut session = service
        .create(&tmp.path().join("belief.json"), Mode::Relative, false)
        .unwrap();
    let id = session
        .apply(Intent::AddChild {
            parent_id: ROOT_ID.into(),
        })
        .unwrap();
    session.apply(Intent::Reweight {
        id: id.clone(),
        probability: 100.0 / 3.0,
    });
    let out = tmp.path().join("export.json");

    service.export(&session, &out).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["isAbsolute"], serde_json::json!(false));
    assert_eq!(value["data"]["children"][0]["probability"], serde_json::json!(33.333));
}

#[rstest]
fn given_invalid_source_when_importing_then_target_untouched(service: WorkspaceService) {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("belief.json");
    service.create(&target, Mode::Absolute, false).unwrap();
    let before = fs::read_to_string(&target).unwrap();
    let source = tmp.path().join("bad.json");
    fs::write(&source, r#"{"isAbsolute": false, "data": {"id": "x", "name": "q", "probability": 1}}"#)
        .unwrap();

    let result = service.import(&source, &target);

    assert!(matches!(result, Err(ApplicationError::Domain(_))));
    assert_eq!(fs::read_to_string(&target).unwrap(), before);
}

#[rstest]
fn given_source_without_mode_when_importing_then_target_mode_kept(service: WorkspaceService) {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("belief.json");
    service.create(&target, Mode::Absolute, false).unwrap();
    let source = tmp.path().join("in.json");
    fs::write(
        &source,
        r#"{"data": {"id": "root", "name": "Rain tomorrow?", "probability": 100,
            "children": [{"id": "y", "name": "yes", "probability": 30}]}}"#,
    )
    .unwrap();

    let session = service.import(&source, &target).unwrap();

    assert_eq!(session.mode(), Mode::Absolute);
    assert_eq!(session.root().name, "Rain tomorrow?");
    assert_eq!(service.load(&target).unwrap(), session);
}

#[test]
fn given_no_target_when_importing_then_default_mode_used() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("in.json");
    fs::write(&source, r#"{"data": {"id": "root", "name": "q", "probability": 100}}"#).unwrap();

    let session = service_with(Mode::Absolute)
        .import(&source, &tmp.path().join("new.json"))
        .unwrap();

    assert_eq!(session.mode(), Mode::Absolute);
}

#[rstest]
#[case(Mode::Absolute)]
#[case(Mode::Relative)]
fn given_file_without_mode_when_loading_then_default_mode_used(#[case] default_mode: Mode) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("belief.json");
    fs::write(&path, r#"{"data": {"id": "root", "name": "q", "probability": 100}}"#).unwrap();

    let session = service_with(default_mode).load(&path).unwrap();

    assert_eq!(session.mode(), default_mode);
}

#[test]
fn given_file_with_mode_when_loading_then_default_mode_ignored() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("belief.json");
    fs::write(
        &path,
        r#"{"isAbsolute": false, "data": {"id": "root", "name": "q", "probability": 100}}"#,
    )
    .unwrap();

    let session = service_with(Mode::Absolute).load(&path).unwrap();

    assert_eq!(session.mode(), Mode::Relative);
}
