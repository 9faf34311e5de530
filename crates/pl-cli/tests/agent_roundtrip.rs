use std::path::PathBuf;
use std::process::Command;

fn demos_root() -> PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("demos")
}

fn temp_state(name: &str) -> String {
    std::env::temp_dir()
        .join(format!("pl-cli-{}-{}.json", name, std::process::id()))
        .to_string_lossy()
        .to_string()
}

fn run_cli(args: &[&str]) -> (bool, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_pl-cli"))
        .args(args)
        .env_remove("PARLEY_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("pl-cli should run");
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).to_string(),
    )
}

fn line_value<'a>(stdout: &'a str, prefix: &str) -> Option<&'a str> {
    stdout.lines().find_map(|line| line.strip_prefix(prefix))
}

fn choice_lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| line.strip_prefix("CHOICE:"))
        .map(str::to_string)
        .collect()
}

#[test]
fn movement_demo_unlocks_negative_z_after_ten_trips() {
    let scripts_dir = demos_root().join("movement");
    let state_a = temp_state("movement-a");
    let state_b = temp_state("movement-b");

    let (ok, stdout) = run_cli(&[
        "agent",
        "start",
        "--scripts-dir",
        scripts_dir.to_str().expect("path should be utf-8"),
        "--state-out",
        &state_a,
    ]);
    assert!(ok, "start failed: {}", stdout);
    assert_eq!(line_value(&stdout, "EVENT:"), Some("CHOICES"));
    assert_eq!(
        line_value(&stdout, "PROMPT_JSON:"),
        Some("\"Where do you wanna go?\"")
    );
    assert_eq!(line_value(&stdout, "STATE_OUT:"), Some(state_a.as_str()));
    assert!(!choice_lines(&stdout).iter().any(|line| line.ends_with("\"-Z\"")));

    let (mut state_in, mut state_out) = (state_a, state_b);
    let mut last = String::new();
    for _ in 0..10 {
        for choice in ["1", "0"] {
            let (ok, stdout) = run_cli(&[
                "agent",
                "choose",
                "--state-in",
                &state_in,
                "--choice",
                choice,
                "--state-out",
                &state_out,
            ]);
            assert!(ok, "choose {} failed: {}", choice, stdout);
            std::mem::swap(&mut state_in, &mut state_out);
            last = stdout;
        }
    }

    assert!(choice_lines(&last).contains(&"4|\"-Z\"".to_string()));
    let host = line_value(&last, "HOST_JSON:").expect("host line");
    let host: serde_json::Value = serde_json::from_str(host).expect("host json");
    assert_eq!(host["pawn"]["x"], 100.0);
    assert_eq!(host["vars"]["iter-count"], 10.0);
}

#[test]
fn errors_use_the_error_protocol() {
    let (ok, stdout) = run_cli(&[
        "agent",
        "choose",
        "--state-in",
        &temp_state("does-not-exist"),
        "--choice",
        "0",
        "--state-out",
        &temp_state("unused"),
    ]);
    assert!(!ok);
    assert_eq!(line_value(&stdout, "RESULT:"), Some("ERROR"));
    assert_eq!(line_value(&stdout, "ERROR_CODE:"), Some("CLI_STATE_NOT_FOUND"));
    assert!(line_value(&stdout, "ERROR_MSG_JSON:").is_some());
}
