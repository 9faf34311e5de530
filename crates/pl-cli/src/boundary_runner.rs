use pl_api::SandboxState;
use pl_runtime::DialogueRuntime;

use crate::{BoundaryEvent, BoundaryResult};

/// What the player sees right now: the current prompt and its choices, or
/// the end of the dialogue.
pub(crate) fn boundary_of(runtime: &DialogueRuntime) -> BoundaryResult {
    if runtime.is_ended() {
        return BoundaryResult {
            event: BoundaryEvent::End,
            label: None,
            prompt_text: None,
            choices: Vec::new(),
        };
    }
    BoundaryResult {
        event: BoundaryEvent::Choices,
        label: runtime.current_label().map(str::to_string),
        prompt_text: runtime.prompt_text().map(str::to_string),
        choices: runtime.indexed_choices(),
    }
}

pub(crate) fn emit_boundary(
    boundary: BoundaryResult,
    host: Option<&SandboxState>,
    state_out: Option<String>,
) {
    println!("RESULT:OK");
    match boundary.event {
        BoundaryEvent::Choices => println!("EVENT:CHOICES"),
        BoundaryEvent::End => println!("EVENT:END"),
    }

    if let Some(label) = boundary.label {
        println!("LABEL:{}", label);
    }

    if let Some(prompt) = boundary.prompt_text {
        println!(
            "PROMPT_JSON:{}",
            serde_json::to_string(&prompt).expect("string json")
        );
    }

    for (index, text) in boundary.choices {
        println!(
            "CHOICE:{}|{}",
            index,
            serde_json::to_string(&text).expect("string json")
        );
    }

    if let Some(host) = host {
        println!(
            "HOST_JSON:{}",
            serde_json::to_string(host).expect("host state should serialize")
        );
    }

    println!(
        "STATE_OUT:{}",
        state_out.unwrap_or_else(|| "NONE".to_string())
    );
}
