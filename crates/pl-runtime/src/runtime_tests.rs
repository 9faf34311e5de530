use pl_core::ErrorKind;

use crate::runtime_test_support::*;
use crate::*;

fn start(source: &str, host: &mut MovementHost) -> DialogueRuntime {
    DialogueRuntime::start(dialogue(source), RuntimeOptions::default(), host)
        .expect("runtime should start")
}

fn start_visible(source: &str, host: &mut MovementHost) -> DialogueRuntime {
    DialogueRuntime::start(
        dialogue(source),
        RuntimeOptions {
            choice_indexing: ChoiceIndexing::Visible,
        },
        host,
    )
    .expect("runtime should start")
}

const GATED: &str = r#"
(label a
  (text "A")
  (choice "hidden" cond (cmp 0 1) jump b)
  (choice "shown" jump c))
(label b (text "B"))
(label c (text "C"))
(start-dialogue a)
"#;

#[test]
fn start_enters_initial_label_with_visible_choices() {
    let mut host = MovementHost::default();
    let runtime = start(MOVEMENT, &mut host);
    assert_eq!(runtime.current_label(), Some("direction"));
    assert_eq!(runtime.prompt_text(), Some("Where do you wanna go?"));
    assert_eq!(runtime.choices(), ["-X", "+X"]);
    assert!(!runtime.is_ended());
    assert_eq!(host.absorbed, 0);
}

#[test]
fn movement_round_trips_unlock_negative_z() {
    let mut host = MovementHost::default();
    let mut runtime = start(MOVEMENT, &mut host);

    for trip in 1..=10 {
        let outcome = runtime.submit_choice(1, &mut host).expect("+X should pass");
        assert_eq!(
            outcome,
            SubmitOutcome::Entered {
                label: "increase-x".to_string()
            }
        );
        assert_eq!(runtime.prompt_text(), Some("Increasing player X..."));
        assert_eq!(runtime.choices(), [CONTINUE_CHOICE_TEXT]);

        let outcome = runtime.submit_choice(0, &mut host).expect("continue should pass");
        assert_eq!(
            outcome,
            SubmitOutcome::Entered {
                label: "direction".to_string()
            }
        );
        assert_eq!(host.iter_count, f64::from(trip));
        if trip < 10 {
            assert_eq!(runtime.choices(), ["-X", "+X"], "trip {}", trip);
        }
    }

    assert_eq!(host.position(), [100.0, 0.0, 0.0]);
    assert_eq!(runtime.choices(), ["-X", "+X", "-Z"]);

    runtime.submit_choice(2, &mut host).expect("-Z should pass");
    assert_eq!(runtime.prompt_text(), Some("Decreasing player Z..."));
    runtime.submit_choice(0, &mut host).expect("continue should pass");
    assert_eq!(host.position(), [100.0, 0.0, -10.0]);
    assert_eq!(host.iter_count, 11.0);
    assert_eq!(runtime.current_label(), Some("direction"));
}

#[test]
fn decrease_x_moves_pawn_back() {
    let mut host = MovementHost::default();
    let mut runtime = start(MOVEMENT, &mut host);
    runtime.submit_choice(0, &mut host).expect("-X should pass");
    runtime.submit_choice(0, &mut host).expect("continue should pass");
    assert_eq!(host.position(), [-10.0, 0.0, 0.0]);
    assert_eq!(host.iter_count, 1.0);
}

#[test]
fn hidden_choice_submission_is_ignored() {
    let mut host = MovementHost::default();
    let mut runtime = start(MOVEMENT, &mut host);
    let before = runtime.view();

    let outcome = runtime.submit_choice(2, &mut host).expect("hidden choice is a no-op");
    assert_eq!(outcome, SubmitOutcome::Ignored);
    assert_eq!(runtime.view(), before);
    assert_eq!(host.absorbed, 0);
}

#[test]
fn out_of_range_index_leaves_state_unchanged() {
    let mut host = MovementHost::default();
    let mut runtime = start(MOVEMENT, &mut host);
    let before = runtime.view();

    let error = runtime.submit_choice(5, &mut host).expect_err("index 5 is out of range");
    assert_eq!(error.kind, ErrorKind::IndexOutOfRange);
    assert_eq!(runtime.view(), before);

    runtime.submit_choice(1, &mut host).expect("+X should pass");
    let error = runtime
        .submit_choice(1, &mut host)
        .expect_err("continue only accepts index 0");
    assert_eq!(error.kind, ErrorKind::IndexOutOfRange);
    assert_eq!(runtime.current_label(), Some("increase-x"));
    assert_eq!(host.iter_count, 0.0);
}

#[test]
fn declared_indexing_counts_hidden_choices() {
    let mut host = MovementHost::default();
    let mut runtime = start(GATED, &mut host);
    assert_eq!(runtime.choices(), ["shown"]);

    assert_eq!(
        runtime.submit_choice(0, &mut host).expect("hidden choice"),
        SubmitOutcome::Ignored
    );
    assert_eq!(
        runtime.submit_choice(1, &mut host).expect("shown choice"),
        SubmitOutcome::Entered {
            label: "c".to_string()
        }
    );
}

#[test]
fn indexed_choices_follow_indexing_mode() {
    let mut host = MovementHost::default();
    let declared = start(GATED, &mut host);
    assert_eq!(declared.indexed_choices(), vec![(1, "shown".to_string())]);

    let visible = start_visible(GATED, &mut host);
    assert_eq!(visible.indexed_choices(), vec![(0, "shown".to_string())]);

    let mut runtime = start(MOVEMENT, &mut host);
    runtime.submit_choice(1, &mut host).expect("+X");
    assert_eq!(
        runtime.indexed_choices(),
        vec![(0, CONTINUE_CHOICE_TEXT.to_string())]
    );
}

#[test]
fn visible_indexing_maps_to_displayed_list() {
    let mut host = MovementHost::default();
    let mut runtime = start_visible(GATED, &mut host);

    let error = runtime
        .submit_choice(1, &mut host)
        .expect_err("only one choice is visible");
    assert_eq!(error.kind, ErrorKind::IndexOutOfRange);

    assert_eq!(
        runtime.submit_choice(0, &mut host).expect("shown choice"),
        SubmitOutcome::Entered {
            label: "c".to_string()
        }
    );
}

#[test]
fn label_without_after_ends_on_continue() {
    let mut host = MovementHost::default();
    let mut runtime = start(GATED, &mut host);
    runtime.submit_choice(1, &mut host).expect("shown choice");
    assert_eq!(runtime.choices(), [CONTINUE_CHOICE_TEXT]);

    let outcome = runtime.submit_choice(0, &mut host).expect("continue ends");
    assert_eq!(outcome, SubmitOutcome::Ended);
    assert!(runtime.is_ended());
    assert!(runtime.choices().is_empty());
    assert_eq!(runtime.prompt_text(), None);
    assert_eq!(runtime.view(), None);

    let error = runtime
        .submit_choice(0, &mut host)
        .expect_err("ended dialogue rejects choices");
    assert_eq!(error.kind, ErrorKind::DialogueEnded);
    let error = runtime.refresh(&mut host).expect_err("nothing to refresh");
    assert_eq!(error.kind, ErrorKind::DialogueEnded);
}

#[test]
fn after_without_jump_runs_body_then_ends() {
    let mut host = MovementHost::default();
    let mut runtime = start(
        r#"(label a (text "A") (after (body (set* iter-count 42)))) (start-dialogue a)"#,
        &mut host,
    );
    assert_eq!(
        runtime.submit_choice(0, &mut host).expect("continue"),
        SubmitOutcome::Ended
    );
    assert_eq!(host.iter_count, 42.0);
}

#[test]
fn dangling_targets_fail_at_transition_time() {
    let mut host = MovementHost::default();
    let mut runtime = start(
        r#"(label a (text "A") (choice "go" nowhere)) (start-dialogue a)"#,
        &mut host,
    );
    let before = runtime.view();
    let error = runtime.submit_choice(0, &mut host).expect_err("nowhere is undeclared");
    assert_eq!(error.kind, ErrorKind::UnknownLabel);
    assert!(error.message.contains("nowhere"));
    assert_eq!(runtime.view(), before);

    let mut runtime = start(
        r#"(label a (text "A") (after (body (set* iter-count 1)) jump nowhere)) (start-dialogue a)"#,
        &mut host,
    );
    let error = runtime.submit_choice(0, &mut host).expect_err("nowhere is undeclared");
    assert_eq!(error.kind, ErrorKind::UnknownLabel);
    assert_eq!(runtime.current_label(), Some("a"));
    assert_eq!(host.iter_count, 0.0);
}

#[test]
fn failing_target_label_absorbs_nothing() {
    let mut host = MovementHost::default();
    let mut runtime = start(
        r#"
(label a (text "A") (after (body (set* iter-count (+ iter-count 1))) jump b))
(label b (text "B") (choice "x" cond missing-flag jump a))
(start-dialogue a)
"#,
        &mut host,
    );
    let before = runtime.view();

    for _ in 0..2 {
        let error = runtime
            .submit_choice(0, &mut host)
            .expect_err("b's condition names an unbound symbol");
        assert_eq!(error.kind, ErrorKind::UndefinedSymbol);
        assert_eq!(runtime.view(), before);
        assert_eq!(host.iter_count, 0.0);
        assert_eq!(host.absorbed, 0);
    }
}

#[test]
fn failing_choice_target_absorbs_nothing() {
    let mut host = MovementHost::default();
    let mut runtime = start(
        r#"
(label a (text "A") (choice "go" b))
(label b (text "B") (choice "x" cond (+ 1 "two") jump a))
(start-dialogue a)
"#,
        &mut host,
    );
    let error = runtime.submit_choice(0, &mut host).expect_err("b's condition mixes types");
    assert_eq!(error.kind, ErrorKind::TypeMismatch);
    assert_eq!(runtime.current_label(), Some("a"));
    assert_eq!(host.absorbed, 0);
}

#[test]
fn failed_body_is_not_absorbed() {
    let mut host = MovementHost::default();
    let mut runtime = start(
        r#"(label a (text "A") (after (body (set* iter-count 5) (explode)) jump a)) (start-dialogue a)"#,
        &mut host,
    );
    let error = runtime.submit_choice(0, &mut host).expect_err("explode is unbound");
    assert_eq!(error.kind, ErrorKind::UndefinedSymbol);
    assert_eq!(host.iter_count, 0.0);
    assert_eq!(host.absorbed, 0);
    assert_eq!(runtime.current_label(), Some("a"));
}

#[test]
fn non_numeric_condition_fails_entry() {
    let mut host = MovementHost::default();
    let error = DialogueRuntime::start(
        dialogue(r#"(label a (text "A") (choice "x" cond "yes" jump a)) (start-dialogue a)"#),
        RuntimeOptions::default(),
        &mut host,
    )
    .expect_err("string condition");
    assert_eq!(error.kind, ErrorKind::TypeMismatch);
}

#[test]
fn enter_unknown_label_keeps_current_state() {
    let mut host = MovementHost::default();
    let mut runtime = start(MOVEMENT, &mut host);
    let before = runtime.view();
    let error = runtime
        .enter_label("nowhere", &mut host)
        .expect_err("unknown label");
    assert_eq!(error.kind, ErrorKind::UnknownLabel);
    assert_eq!(runtime.view(), before);
}

#[test]
fn refresh_reevaluates_conditions_against_host() {
    let mut host = MovementHost::default();
    let mut runtime = start(MOVEMENT, &mut host);
    assert_eq!(runtime.choices().len(), 2);

    host.iter_count = 12.0;
    runtime.refresh(&mut host).expect("refresh");
    assert_eq!(runtime.choices(), ["-X", "+X", "-Z"]);
}

#[test]
fn all_choices_hidden_leaves_empty_list() {
    let mut host = MovementHost::default();
    let runtime = start(
        r#"(label a (text "A") (choice "x" cond 0 jump a)) (start-dialogue a)"#,
        &mut host,
    );
    assert!(runtime.choices().is_empty());
    assert!(!runtime.is_ended());
}

#[test]
fn builtin_host_runs_pure_dialogues() {
    let mut host = BuiltinHost::new();
    let mut runtime = DialogueRuntime::start(
        dialogue(
            r#"
(label intro (text "Hi") (choice "math" cond (= (+ 2 2) 4) jump done))
(label done (text "Bye") (after (body (* 3 3))))
(start-dialogue intro)
"#,
        ),
        RuntimeOptions::default(),
        &mut host,
    )
    .expect("start");
    assert_eq!(runtime.choices(), ["math"]);
    runtime.submit_choice(0, &mut host).expect("math");
    assert_eq!(runtime.prompt_text(), Some("Bye"));
    assert_eq!(
        runtime.submit_choice(0, &mut host).expect("continue"),
        SubmitOutcome::Ended
    );
}

#[test]
fn view_serializes_camel_case() {
    let mut host = MovementHost::default();
    let runtime = start(MOVEMENT, &mut host);
    let view = runtime.view().expect("active view");
    let json = serde_json::to_value(&view).expect("view should serialize");
    assert_eq!(json["label"], "direction");
    assert_eq!(json["promptText"], "Where do you wanna go?");
    assert_eq!(json["choices"][1], "+X");
}
