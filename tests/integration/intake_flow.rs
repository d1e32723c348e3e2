//! Intake conversation tests.
//!
//! The conversation collects answers step by step and yields the brief and
//! prompt sent to the upstream model; the model's reply then feeds the
//! estimator.

use pertplan::intake::conversation::{CONSTRAINTS_MESSAGE, DETAILS_MESSAGE, READY_MESSAGE};
use pertplan::intake::prompt::SYSTEM_PROMPT;
use pertplan::intake::{transition, Conversation, IntakeStep};
use pertplan::Estimator;

use crate::fixtures::web_shop_response;

#[test]
fn test_transition_function_walks_the_script() {
    let mut step = IntakeStep::default();
    let mut responses = Vec::new();
    while !step.is_ready() {
        let (next, response) = transition(step, "answer");
        responses.push(response);
        step = next;
    }
    assert_eq!(responses, vec![DETAILS_MESSAGE, CONSTRAINTS_MESSAGE, READY_MESSAGE]);
}

#[test]
fn test_conversation_to_prompt() {
    let mut conversation = Conversation::start();
    conversation.respond("A web shop selling handmade furniture");
    conversation.respond("Rust backend, React frontend, team of 4");
    conversation.respond("Must launch before the holiday season");
    assert!(conversation.is_ready());

    let prompt = conversation.brief().decomposition_prompt();
    assert_eq!(prompt.system, SYSTEM_PROMPT);
    assert!(prompt
        .user
        .contains("Objective: A web shop selling handmade furniture"));
    assert!(prompt
        .user
        .contains("Tech Stack: Rust backend, React frontend, team of 4"));
    assert!(prompt
        .user
        .contains("Constraints: Must launch before the holiday season"));
}

#[test]
fn test_conversation_then_estimate() {
    let mut conversation = Conversation::start();
    for answer in ["Web shop", "Rust", "None"] {
        conversation.respond(answer);
    }

    let estimate = Estimator::default()
        .estimate_response(conversation.project_id, &web_shop_response())
        .unwrap();
    assert_eq!(estimate.project_id, conversation.project_id);
    assert!(!estimate.critical_path.is_empty());
}

#[test]
fn test_conversation_serializes_with_step_names() {
    let mut conversation = Conversation::start();
    conversation.respond("Web shop");

    let json = serde_json::to_value(&conversation).unwrap();
    assert_eq!(json["current_step"], "details");
    assert_eq!(json["completed_steps"][0], "greeting");
    assert_eq!(json["context"]["initial_input"], "Web shop");
    assert_eq!(json["messages"][1]["role"], "user");
}
