use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use pl_api::SandboxState;
use walkdir::WalkDir;

use crate::{PlToolError, TestCase, TESTCASE_SCHEMA_V1};

const HOST_FILE: &str = "host.json";

pub fn read_scripts_from_dir(scripts_dir: &Path) -> Result<BTreeMap<String, String>, PlToolError> {
    let mut scripts = BTreeMap::new();

    for entry in WalkDir::new(scripts_dir)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("dlg") {
            continue;
        }

        let Ok(relative) = path.strip_prefix(scripts_dir) else {
            continue;
        };
        let content = fs::read_to_string(path).map_err(|source| PlToolError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        scripts.insert(relative.to_string_lossy().replace('\\', "/"), content);
    }

    if scripts.is_empty() {
        return Err(PlToolError::SourceEmpty {
            path: scripts_dir.to_path_buf(),
        });
    }
    Ok(scripts)
}

/// `host.json` beside the scripts, or an empty sandbox when there is none.
pub fn read_host_state(scripts_dir: &Path) -> Result<SandboxState, PlToolError> {
    let path = scripts_dir.join(HOST_FILE);
    if !path.is_file() {
        return Ok(SandboxState::default());
    }
    let raw = fs::read_to_string(&path).map_err(|source| PlToolError::ReadFile {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| PlToolError::ParseHost { path, source })
}

pub fn read_test_case(case_path: &Path) -> Result<TestCase, PlToolError> {
    let raw = fs::read_to_string(case_path).map_err(|source| PlToolError::ReadFile {
        path: case_path.to_path_buf(),
        source,
    })?;
    let parsed: TestCase = serde_json::from_str(&raw).map_err(|source| PlToolError::ParseCase {
        path: case_path.to_path_buf(),
        source,
    })?;

    if parsed.schema_version != TESTCASE_SCHEMA_V1 {
        return Err(PlToolError::InvalidSchemaVersion {
            expected: TESTCASE_SCHEMA_V1.to_string(),
            found: parsed.schema_version,
        });
    }
    Ok(parsed)
}

#[cfg(test)]
mod source_tests {
    use super::*;

    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should move forward")
            .as_nanos();
        std::env::temp_dir().join(format!("pl-tool-{}-{}", name, nanos))
    }

    fn write_file(path: &Path, content: &str) {
        let parent = path.parent().expect("path should have parent");
        fs::create_dir_all(parent).expect("parent dir should be created");
        fs::write(path, content).expect("file should be written");
    }

    #[test]
    fn read_scripts_collects_dialogue_files() {
        let root = temp_dir("scripts");
        write_file(&root.join("main.dlg"), "(start-dialogue a)");
        write_file(&root.join("labels/a.dlg"), r#"(label a (text "A"))"#);
        write_file(&root.join("host.json"), "{}");
        write_file(&root.join("ignore.txt"), "skip");

        let files = read_scripts_from_dir(&root).expect("scan should pass");
        assert_eq!(files.len(), 2);
        assert!(files.contains_key("main.dlg"));
        assert!(files.contains_key("labels/a.dlg"));
    }

    #[test]
    fn read_scripts_fails_when_no_dialogue_files() {
        let root = temp_dir("empty-scripts");
        write_file(&root.join("ignore.txt"), "skip");

        let error = read_scripts_from_dir(&root).expect_err("empty source should fail");
        assert!(matches!(error, PlToolError::SourceEmpty { .. }));
    }

    #[test]
    fn host_state_is_optional_but_must_parse() {
        let root = temp_dir("host");
        fs::create_dir_all(&root).expect("root should be created");
        assert_eq!(
            read_host_state(&root).expect("missing host.json"),
            SandboxState::default()
        );

        write_file(&root.join(HOST_FILE), r#"{"vars":{"iter-count":2}}"#);
        let state = read_host_state(&root).expect("host.json should parse");
        assert_eq!(state.vars.get("iter-count"), Some(&2.0));

        write_file(&root.join(HOST_FILE), "[");
        let error = read_host_state(&root).expect_err("broken host.json");
        assert!(matches!(error, PlToolError::ParseHost { .. }));
    }

    #[test]
    fn read_test_case_reports_read_parse_and_schema_errors() {
        let root = temp_dir("case-errors");
        fs::create_dir_all(&root).expect("root should be created");

        let error = read_test_case(&root.join("missing.json")).expect_err("missing case");
        assert!(matches!(error, PlToolError::ReadFile { .. }));

        let bad_json_path = root.join("bad.json");
        write_file(&bad_json_path, "{");
        let parse_error = read_test_case(&bad_json_path).expect_err("parse should fail");
        assert!(matches!(parse_error, PlToolError::ParseCase { .. }));

        let bad_schema_path = root.join("bad-schema.json");
        write_file(&bad_schema_path, r#"{"schemaVersion":"v0"}"#);
        let schema_error = read_test_case(&bad_schema_path).expect_err("schema should fail");
        assert!(matches!(
            schema_error,
            PlToolError::InvalidSchemaVersion { .. }
        ));

        let ok_path = root.join("ok.json");
        write_file(
            &ok_path,
            r#"{"schemaVersion":"pl-tool-case.v1","expectedEvents":[{"kind":"end"}]}"#,
        );
        let parsed = read_test_case(&ok_path).expect("case should parse");
        assert_eq!(parsed.expected_events.len(), 1);
    }
}
