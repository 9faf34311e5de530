use pl_core::ErrorKind;

use crate::runtime_test_support::*;
use crate::*;

#[test]
fn snapshot_resume_continues_at_same_label() {
    let mut host = MovementHost::default();
    let mut runtime =
        DialogueRuntime::start(dialogue(MOVEMENT), RuntimeOptions::default(), &mut host)
            .expect("start");
    runtime.submit_choice(1, &mut host).expect("+X");

    let snapshot = runtime.snapshot();
    assert_eq!(snapshot.schema_version, RUNTIME_SNAPSHOT_SCHEMA);
    assert_eq!(snapshot.current_label.as_deref(), Some("increase-x"));

    let json = serde_json::to_string(&snapshot).expect("snapshot should serialize");
    let restored: RuntimeSnapshot = serde_json::from_str(&json).expect("snapshot should parse");
    let mut resumed =
        DialogueRuntime::resume(dialogue(MOVEMENT), &restored, &mut host).expect("resume");
    assert_eq!(resumed.view(), runtime.view());

    resumed.submit_choice(0, &mut host).expect("continue");
    assert_eq!(resumed.current_label(), Some("direction"));
    assert_eq!(host.iter_count, 1.0);
}

#[test]
fn resume_recomputes_choices_from_host_state() {
    let mut host = MovementHost::default();
    let runtime = DialogueRuntime::start(dialogue(MOVEMENT), RuntimeOptions::default(), &mut host)
        .expect("start");
    let snapshot = runtime.snapshot();

    let mut later = MovementHost {
        iter_count: 10.0,
        ..MovementHost::default()
    };
    let resumed = DialogueRuntime::resume(dialogue(MOVEMENT), &snapshot, &mut later).expect("resume");
    assert_eq!(resumed.choices(), ["-X", "+X", "-Z"]);
}

#[test]
fn ended_snapshot_resumes_ended() {
    let mut host = MovementHost::default();
    let source = r#"(label a (text "A")) (start-dialogue a)"#;
    let mut runtime =
        DialogueRuntime::start(dialogue(source), RuntimeOptions::default(), &mut host)
            .expect("start");
    runtime.submit_choice(0, &mut host).expect("continue ends");

    let snapshot = runtime.snapshot();
    assert_eq!(snapshot.current_label, None);
    let resumed = DialogueRuntime::resume(dialogue(source), &snapshot, &mut host).expect("resume");
    assert!(resumed.is_ended());
}

#[test]
fn snapshot_keeps_choice_indexing() {
    let mut host = MovementHost::default();
    let runtime = DialogueRuntime::start(
        dialogue(MOVEMENT),
        RuntimeOptions {
            choice_indexing: ChoiceIndexing::Visible,
        },
        &mut host,
    )
    .expect("start");
    let json = serde_json::to_value(runtime.snapshot()).expect("serialize");
    assert_eq!(json["choiceIndexing"], "visible");
    assert_eq!(json["currentLabel"], "direction");

    let resumed = DialogueRuntime::resume(dialogue(MOVEMENT), &runtime.snapshot(), &mut host)
        .expect("resume");
    assert_eq!(resumed.options().choice_indexing, ChoiceIndexing::Visible);
}

#[test]
fn resume_rejects_foreign_snapshots() {
    let mut host = MovementHost::default();
    let bad_schema = RuntimeSnapshot {
        schema_version: "parley-snapshot.v0".to_string(),
        current_label: Some("direction".to_string()),
        choice_indexing: ChoiceIndexing::Declared,
    };
    let error = DialogueRuntime::resume(dialogue(MOVEMENT), &bad_schema, &mut host)
        .expect_err("unknown schema");
    assert_eq!(error.kind, ErrorKind::InvalidSnapshot);

    let bad_label = RuntimeSnapshot {
        schema_version: RUNTIME_SNAPSHOT_SCHEMA.to_string(),
        current_label: Some("elsewhere".to_string()),
        choice_indexing: ChoiceIndexing::Declared,
    };
    let error = DialogueRuntime::resume(dialogue(MOVEMENT), &bad_label, &mut host)
        .expect_err("unknown label");
    assert_eq!(error.kind, ErrorKind::InvalidSnapshot);
    assert!(error.message.contains("elsewhere"));
}

#[test]
fn missing_choice_indexing_defaults_to_declared() {
    let snapshot: RuntimeSnapshot = serde_json::from_str(
        r#"{"schemaVersion":"parley-snapshot.v1","currentLabel":"direction"}"#,
    )
    .expect("older snapshot should parse");
    assert_eq!(snapshot.choice_indexing, ChoiceIndexing::Declared);
}
