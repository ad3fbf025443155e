//! Integration tests: prompts answering an open interaction

mod common;

use common::{interaction, Call, MockGateway, ORIGINAL_RESPONSE_ID};
use confirm_core::models::{
    Color, MessageId, MessagePayload, Outcome, PromptOptions, User, EPHEMERAL_FLAG,
};
use confirm_core::{ConfirmationError, ConfirmationPrompt, Destination};
use std::time::Duration;

const INVOKER: u64 = 111;
const OTHER: u64 = 222;

fn invoker() -> User {
    User::new(INVOKER, "alice")
}

#[tokio::test(start_paused = true)]
async fn test_defaults_come_from_interaction() {
    let gateway = MockGateway::new();
    let mut prompt = ConfirmationPrompt::for_interaction(gateway.clone(), interaction(invoker()));
    gateway.click_after(Duration::from_secs(1), INVOKER, "confirm_yes");

    let outcome = prompt
        .start(
            "Proceed with deletion?",
            None,
            None,
            PromptOptions::default().timeout_secs(5),
        )
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Confirmed);
    assert_eq!(prompt.message().unwrap().message_id, MessageId(ORIGINAL_RESPONSE_ID));
    assert_eq!(
        prompt.embed().unwrap().author.as_ref().unwrap().name,
        "alice"
    );

    let calls = gateway.calls();
    assert!(matches!(calls[0], Call::Respond { .. }));
    assert_eq!(calls[1], Call::OriginalResponse);
    assert!(!calls
        .iter()
        .any(|c| matches!(c, Call::Send { .. } | Call::Edit { .. })));
    assert_eq!(
        calls.last(),
        Some(&Call::EditOriginal {
            payload: MessagePayload::strip_controls()
        })
    );
    assert_eq!(gateway.controls_on(MessageId(ORIGINAL_RESPONSE_ID)), 0);
}

#[tokio::test(start_paused = true)]
async fn test_explicit_interaction_destination() {
    let gateway = MockGateway::new();
    let mut prompt = ConfirmationPrompt::new(gateway.clone());
    gateway.click_after(Duration::from_secs(1), INVOKER, "confirm_no");

    let outcome = prompt
        .start(
            "Proceed with deletion?",
            None,
            Some(Destination::Interaction(interaction(invoker()))),
            PromptOptions::default().timeout_secs(5),
        )
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Declined);
    assert_eq!(gateway.acknowledgements(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_ephemeral_response() {
    let gateway = MockGateway::new();
    let mut prompt = ConfirmationPrompt::for_interaction(gateway.clone(), interaction(invoker()));

    prompt
        .start(
            "Only you can see this",
            None,
            None,
            PromptOptions::default().timeout_secs(1).ephemeral(true),
        )
        .await
        .unwrap();

    let Call::Respond { payload } = gateway.calls()[0].clone() else {
        panic!("interaction prompt must respond first");
    };
    assert_eq!(payload.flags, Some(EPHEMERAL_FLAG));
    assert_eq!(payload.control_count(), Some(2));
}

#[tokio::test(start_paused = true)]
async fn test_other_user_is_ignored_for_interaction_prompt() {
    let gateway = MockGateway::new();
    let mut prompt = ConfirmationPrompt::for_interaction(gateway.clone(), interaction(invoker()));
    gateway.click_after(Duration::from_secs(1), OTHER, "confirm_yes");

    let outcome = prompt
        .start("Proceed?", None, None, PromptOptions::default().timeout_secs(5))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::TimedOut);
    assert_eq!(gateway.acknowledgements(), 0);
    assert_eq!(gateway.controls_on(MessageId(ORIGINAL_RESPONSE_ID)), 0);
}

#[tokio::test(start_paused = true)]
async fn test_explicit_user_overrides_invoker() {
    let gateway = MockGateway::new();
    let mut prompt = ConfirmationPrompt::for_interaction(gateway.clone(), interaction(invoker()));
    gateway.click_after(Duration::from_secs(1), INVOKER, "confirm_yes");
    gateway.click_after(Duration::from_secs(2), OTHER, "confirm_yes");

    let outcome = prompt
        .start(
            "Moderator approval needed",
            Some(User::new(OTHER, "mod")),
            None,
            PromptOptions::default().timeout_secs(5),
        )
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Confirmed);
    assert_eq!(
        prompt.embed().unwrap().author.as_ref().unwrap().name,
        "mod"
    );
}

#[tokio::test(start_paused = true)]
async fn test_update_goes_through_original_response() {
    let gateway = MockGateway::new();
    let mut prompt = ConfirmationPrompt::for_interaction(gateway.clone(), interaction(invoker()));

    prompt
        .start("Proceed?", None, None, PromptOptions::default().timeout_secs(1))
        .await
        .unwrap();
    prompt.update("Timed out.", Color(0x95a5a6)).await.unwrap();

    let Some(Call::EditOriginal { payload }) = gateway.calls().last().cloned() else {
        panic!("update must edit the original response");
    };
    assert_eq!(payload.embeds.unwrap()[0].description, "Timed out.");
    assert_eq!(prompt.outcome(), Some(Outcome::TimedOut));
}

#[tokio::test]
async fn test_untracked_response_is_stripped_and_reported() {
    let gateway = MockGateway::new();
    gateway.fail_original_response();
    let mut prompt = ConfirmationPrompt::for_interaction(gateway.clone(), interaction(invoker()));

    let err = prompt
        .start("Proceed?", None, None, PromptOptions::default().timeout_secs(5))
        .await
        .unwrap_err();

    assert!(matches!(err, ConfirmationError::Delivery(_)));
    assert_eq!(prompt.outcome(), None);
    assert_eq!(
        gateway.calls().last(),
        Some(&Call::EditOriginal {
            payload: MessagePayload::strip_controls()
        })
    );
    assert_eq!(gateway.controls_on(MessageId(ORIGINAL_RESPONSE_ID)), 0);
}
