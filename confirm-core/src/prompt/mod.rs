//! Confirmation prompt: an embed with ✅/❌ buttons that resolves once.
//!
//! A prompt renders into a [`Destination`], waits for the authorized user to
//! press one of its buttons, and records a single [`Outcome`]. The buttons
//! are removed again however the wait ends.

mod destination;
mod guard;

pub use destination::Destination;

use crate::error::ConfirmationError;
use crate::gateway::{MessagingGateway, WaitResult};
use crate::models::{
    ActionRow, Button, Color, ComponentInteraction, Embed, InteractionContext, MessagePayload,
    MessageRef, Outcome, PromptOptions, User, UserId, CONFIRM_NO, CONFIRM_YES,
};
use crate::services::logging;
use destination::RenderTarget;
use guard::ControlsGuard;
use std::sync::{Arc, OnceLock};
use uuid::Uuid;

const YES_EMOJI: &str = "✅";
const NO_EMOJI: &str = "❌";

/// One confirmation request tied to one message and one user
pub struct ConfirmationPrompt {
    id: Uuid,
    gateway: Arc<dyn MessagingGateway>,
    color: Color,
    interaction: Option<InteractionContext>,
    message: Option<MessageRef>,
    embed: Option<Embed>,
    rendered: Option<RenderTarget>,
    outcome: OnceLock<Outcome>,
}

impl ConfirmationPrompt {
    pub fn new(gateway: Arc<dyn MessagingGateway>) -> Self {
        Self {
            id: Uuid::new_v4(),
            gateway,
            color: Color::BLACK,
            interaction: None,
            message: None,
            embed: None,
            rendered: None,
            outcome: OnceLock::new(),
        }
    }

    /// Prompt answering an open interaction. The invoking user becomes the
    /// default authorized user and the interaction the default destination.
    pub fn for_interaction(gateway: Arc<dyn MessagingGateway>, ctx: InteractionContext) -> Self {
        let mut prompt = Self::new(gateway);
        prompt.interaction = Some(ctx);
        prompt
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Reuse a message the bot already posted instead of sending a new one.
    pub fn with_message(mut self, message: MessageRef) -> Self {
        self.message = Some(message);
        self
    }

    /// Correlation id used in log events
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome.get().copied()
    }

    /// `Some(true)` confirmed, `Some(false)` declined, `None` timed out or pending
    pub fn confirmed(&self) -> Option<bool> {
        self.outcome().and_then(Outcome::as_bool)
    }

    /// The rendered message (or the one given with `with_message`)
    pub fn message(&self) -> Option<&MessageRef> {
        self.message.as_ref()
    }

    pub fn embed(&self) -> Option<&Embed> {
        self.embed.as_ref()
    }

    /// Render the prompt and wait for the authorized user to answer.
    ///
    /// `user` defaults to the invoking user of an interaction prompt;
    /// `destination` defaults to the interaction, then to the message given
    /// with `with_message`.
    pub async fn start(
        &mut self,
        text: &str,
        user: Option<User>,
        destination: Option<Destination>,
        options: PromptOptions,
    ) -> Result<Outcome, ConfirmationError> {
        if let Some(outcome) = self.outcome() {
            return Err(ConfirmationError::AlreadyResolved(outcome));
        }
        if text.trim().is_empty() {
            return Err(ConfirmationError::EmptyText);
        }
        if options.timeout.is_zero() {
            return Err(ConfirmationError::InvalidTimeout);
        }

        let destination = match destination {
            Some(destination) => destination,
            None => Destination::resolve(self.message, None, self.interaction.clone())?,
        };
        let user = user
            .or_else(|| destination.invoking_user().cloned())
            .or_else(|| self.interaction.as_ref().map(|ctx| ctx.user.clone()))
            .ok_or(ConfirmationError::MissingUser)?;

        let prompt_id = self.id.to_string();
        let embed = build_embed(text, self.color, &user, options.hide_author);
        let payload = MessagePayload::with_controls(embed.clone(), vec![confirm_row()]);

        // Subscribe before rendering so a fast click cannot slip past.
        let mut subscription = self.gateway.subscribe();
        let target = destination
            .render(self.gateway.as_ref(), payload, options.ephemeral)
            .await?;
        let message = *target.message();
        self.embed = Some(embed);
        self.message = Some(message);
        self.rendered = Some(target.clone());
        logging::log_prompt_event(
            "prompt_rendered",
            &prompt_id,
            Some(&format!("message {} for user {}", message.message_id, user.id)),
        );

        let guard = ControlsGuard::arm(Arc::clone(&self.gateway), target, prompt_id.clone());

        let waited = subscription
            .wait_for(|event| is_answer(event, &message, user.id), options.timeout)
            .await;

        let outcome = match waited {
            WaitResult::Matched(event) => {
                let outcome = if event.custom_id == CONFIRM_YES {
                    Outcome::Confirmed
                } else {
                    Outcome::Declined
                };
                if let Err(e) = self.gateway.acknowledge(&event).await {
                    logging::log_cleanup_failure(&prompt_id, "acknowledge", &e.to_string());
                }
                outcome
            }
            WaitResult::TimedOut => Outcome::TimedOut,
        };

        let _ = self.outcome.set(outcome);
        guard.release().await;

        tracing::info!(
            prompt_id = %self.id,
            message_id = %message.message_id,
            user_id = %user.id,
            %outcome,
            "Prompt resolved"
        );
        Ok(outcome)
    }

    /// Replace the text and color of the rendered prompt. The outcome is untouched.
    pub async fn update(&mut self, text: &str, color: Color) -> Result<(), ConfirmationError> {
        if text.trim().is_empty() {
            return Err(ConfirmationError::EmptyText);
        }
        let (Some(target), Some(embed)) = (self.rendered.as_ref(), self.embed.as_mut()) else {
            return Err(ConfirmationError::NotRendered);
        };
        embed.description = text.to_string();
        embed.color = color;
        self.color = color;

        let payload = MessagePayload::embed_only(embed.clone());
        target.edit(self.gateway.as_ref(), &payload).await?;
        logging::log_prompt_event("prompt_updated", &self.id.to_string(), None);
        Ok(())
    }
}

/// Embed with the prompt text, attributed to `user` unless hidden.
/// The author icon is only set when the user has an avatar.
fn build_embed(text: &str, color: Color, user: &User, hide_author: bool) -> Embed {
    let embed = Embed::new(text, color);
    if hide_author {
        embed
    } else {
        embed.with_author(user.name.clone(), user.avatar_url.clone())
    }
}

fn confirm_row() -> ActionRow {
    ActionRow::new(vec![
        Button::emoji(YES_EMOJI, CONFIRM_YES),
        Button::emoji(NO_EMOJI, CONFIRM_NO),
    ])
}

/// Press on this prompt's message, by the authorized user, on one of its two buttons
fn is_answer(event: &ComponentInteraction, message: &MessageRef, user_id: UserId) -> bool {
    event.message_id == message.message_id
        && event.user_id == user_id
        && Outcome::from_custom_id(&event.custom_id).is_some()
}
