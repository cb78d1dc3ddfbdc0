//! Integration tests for loading, editing and saving configuration documents

mod common;

use common::builders::small_reference;
use driver_studio::config::{validate_save_path, AppState, FormatKind, FormatLibrary};
use driver_studio::frontend::panes::EditorPaneState;
use driver_studio::schema::{self, coerce_number, select_bool_range};
use driver_studio::{SchemaValue, StudioError};

#[test]
fn test_template_save_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let library = FormatLibrary::default();
    let reference = library.reference(FormatKind::Configuration);

    let mut editor = EditorPaneState::with_document(
        FormatKind::Configuration,
        library.template(FormatKind::Configuration),
        None,
    );
    editor.mark_dirty();
    let written = editor.save_to(&dir.path().join("drive.json")).unwrap();
    assert!(!editor.is_dirty());
    assert_eq!(editor.path(), Some(written.as_path()));

    let reopened = EditorPaneState::open(FormatKind::Configuration, &written, reference).unwrap();
    assert_eq!(reopened.document(), Some(reference));
    assert!(!reopened.is_dirty());
}

#[test]
fn test_saved_key_order_matches_reference() {
    let dir = tempfile::tempdir().unwrap();
    let library = FormatLibrary::default();
    let mut editor =
        EditorPaneState::with_document(FormatKind::Logging, library.template(FormatKind::Logging), None);
    let path = editor.save_to(&dir.path().join("log.json")).unwrap();

    let text = std::fs::read_to_string(path).unwrap();
    let interval = text.find("interval_ms").unwrap();
    let channels = text.find("channels").unwrap();
    let trigger = text.find("trigger").unwrap();
    assert!(interval < channels && channels < trigger);
}

#[test]
fn test_recent_log_settings_reopen_with_their_format() {
    let dir = tempfile::tempdir().unwrap();
    let library = FormatLibrary::default();
    let mut app_state = AppState::default();

    let mut editor =
        EditorPaneState::with_document(FormatKind::Logging, library.template(FormatKind::Logging), None);
    let path = editor.save_to(&dir.path().join("settings.json")).unwrap();
    app_state.add_recent_config(&path, editor.format());

    let entry = &app_state.recent_configs[0];
    assert_eq!(entry.kind, FormatKind::Logging);
    let reopened = EditorPaneState::open(entry.kind, &entry.path, library.reference(entry.kind)).unwrap();
    assert_eq!(reopened.format(), FormatKind::Logging);
    assert_eq!(reopened.document(), Some(library.reference(FormatKind::Logging)));
}

#[test]
fn test_save_rejects_bad_targets() {
    let dir = tempfile::tempdir().unwrap();
    let mut editor = EditorPaneState::with_document(FormatKind::Configuration, small_reference(), None);

    let err = editor.save_to(&dir.path().join("drive.txt")).unwrap_err();
    assert!(matches!(err, StudioError::InvalidPath(_)));

    let err = editor
        .save_to(&dir.path().join("missing").join("drive.json"))
        .unwrap_err();
    assert!(err.to_string().contains("does not exist"));
    assert!(editor.path().is_none());

    assert!(validate_save_path(&dir.path().join("DRIVE.JSON"), "json").is_ok());
}

#[test]
fn test_open_rejects_foreign_shape_and_keeps_state() {
    let dir = tempfile::tempdir().unwrap();
    let reference = small_reference();
    let path = dir.path().join("other.json");
    std::fs::write(
        &path,
        r#"{"mode":"COMBINATOR_OR","period":"fast","nested":{"gain":1,"enabled":true}}"#,
    )
    .unwrap();

    let err = EditorPaneState::open(FormatKind::Configuration, &path, &reference)
        .err()
        .unwrap();
    assert!(
        err.to_string().contains("'period' is string, expected number"),
        "unexpected message: {}",
        err
    );

    let mut editor = EditorPaneState::with_document(FormatKind::Configuration, reference.clone(), None);
    assert!(editor.load_file(&path, &reference).is_err());
    assert_eq!(editor.document(), Some(&reference));
    assert!(editor.path().is_none());
}

#[test]
fn test_device_text_marks_dirty() {
    let reference = small_reference();
    let mut editor = EditorPaneState::with_document(FormatKind::Configuration, reference.clone(), None);

    let text = r#"{"mode":"COMBINATOR_AND","period":500,"nested":{"gain":2.5,"enabled":false}}"#;
    editor.load_device_text(text, &reference).unwrap();
    assert!(editor.is_dirty());
    assert_eq!(
        editor.document().and_then(|d| d.get("period")),
        Some(&SchemaValue::Number(500.0))
    );

    let missing = r#"{"mode":"COMBINATOR_AND","period":500}"#;
    let err = editor.load_device_text(missing, &reference).unwrap_err();
    assert!(err.to_string().contains("missing key 'nested'"));
}

#[test]
fn test_non_finite_number_is_refused() {
    let mut document = small_reference();
    if let Some(value) = document.get_mut("period") {
        *value = SchemaValue::Number(f64::NAN);
    }
    let err = schema::load(document.clone(), &small_reference()).unwrap_err();
    assert!(matches!(err, StudioError::InvalidNumber { ref path } if path == "period"));

    let dir = tempfile::tempdir().unwrap();
    let mut editor = EditorPaneState::with_document(FormatKind::Configuration, document, None);
    assert!(editor.save_to(&dir.path().join("bad.json")).is_err());
}

#[test]
fn test_form_edit_helpers() {
    assert_eq!(coerce_number(""), Some(0.0));
    assert_eq!(coerce_number("1e3"), Some(1000.0));
    assert_eq!(coerce_number("inf"), None);

    let library = FormatLibrary::default();
    let mut document = library.template(FormatKind::Logging);
    let Some(SchemaValue::Object(log)) = document.get_mut("log") else {
        panic!("log section missing");
    };
    let Some(SchemaValue::Object(channels)) = log.get_mut("channels") else {
        panic!("channels missing");
    };
    // position, velocity on; following_error..temperature off; state on
    assert_eq!(select_bool_range(channels, 1, 4), 3);
    assert!(channels
        .iter()
        .take(5)
        .all(|(_, v)| *v == SchemaValue::Bool(true)));
    assert_eq!(channels.get("temperature"), Some(&SchemaValue::Bool(false)));
}
