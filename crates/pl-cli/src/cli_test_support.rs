use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{load_source_by_scripts_dir, LoadedScenario};

pub(crate) const MINIMAL_DIALOGUE: &str = r#"(label a (text "A")) (start-dialogue a)"#;

pub(crate) const MOVEMENT_DIALOGUE: &str = r#"
(label direction
  (text "Where do you wanna go?")
  (choice "-X" jump decrease-x)
  (choice "+X" jump increase-x)
  (choice "-Z" cond (cmp iter-count 10) jump decrease-z))
(label decrease-x
  (text "Decreasing player X...")
  (after (body (set* iter-count (+ iter-count 1)) (move self-pawn -10 0 0)) jump direction))
(label increase-x
  (text "Increasing player X...")
  (after (body (set* iter-count (+ iter-count 1)) (move self-pawn 10 0 0)) jump direction))
(label decrease-z
  (text "Decreasing player Z...")
  (after (body (set* iter-count (+ iter-count 1)) (move self-pawn 0 0 -10)) jump direction))
(start-dialogue direction)
"#;

pub(crate) const GATED_DIALOGUE: &str = r#"
(label gate
  (text "A door.")
  (choice "Open" cond (> key 0) jump inside)
  (choice "Leave" jump outside))
(label inside (text "Inside."))
(label outside (text "Outside."))
(start-dialogue gate)
"#;

pub(crate) fn temp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time should be monotonic")
        .as_nanos();
    std::env::temp_dir().join(format!("parley-rs-{}-{}", name, nanos))
}

pub(crate) fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent should be created");
    }
    fs::write(path, content).expect("file should be written");
}

/// Writes a scripts dir with `main.dlg` and `host.json` and loads it.
pub(crate) fn scenario_from(name: &str, dialogue: &str, host_json: &str) -> LoadedScenario {
    let root = temp_path(name);
    write_file(&root.join("main.dlg"), dialogue);
    write_file(&root.join("host.json"), host_json);
    load_source_by_scripts_dir(&root.to_string_lossy()).expect("scenario should load")
}

pub(crate) fn movement_scenario() -> LoadedScenario {
    scenario_from("movement", MOVEMENT_DIALOGUE, r#"{"vars":{"iter-count":0}}"#)
}

pub(crate) fn gated_scenario() -> LoadedScenario {
    scenario_from("gated", GATED_DIALOGUE, r#"{"vars":{"key":0}}"#)
}

pub(crate) fn demo_dir(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("demos")
        .join(name)
        .to_string_lossy()
        .to_string()
}
