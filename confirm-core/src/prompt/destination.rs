//! Where a prompt is rendered, and how it is edited afterwards

use crate::error::ConfirmationError;
use crate::gateway::{GatewayError, MessagingGateway};
use crate::models::{ChannelId, InteractionContext, MessagePayload, MessageRef, User};

/// Target for a new prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Post a new message into the channel
    Channel(ChannelId),
    /// Turn a message the bot already posted into the prompt
    ExistingMessage(MessageRef),
    /// Answer an open interaction with the prompt
    Interaction(InteractionContext),
}

impl Destination {
    /// Pick a destination from optional parts: an interaction wins, then an
    /// existing message, then a channel.
    pub fn resolve(
        message: Option<MessageRef>,
        channel: Option<ChannelId>,
        interaction: Option<InteractionContext>,
    ) -> Result<Self, ConfirmationError> {
        if let Some(ctx) = interaction {
            return Ok(Destination::Interaction(ctx));
        }
        if let Some(message) = message {
            return Ok(Destination::ExistingMessage(message));
        }
        channel
            .map(Destination::Channel)
            .ok_or(ConfirmationError::Destination)
    }

    /// User who opened the interaction, if this is one
    pub fn invoking_user(&self) -> Option<&User> {
        match self {
            Destination::Interaction(ctx) => Some(&ctx.user),
            _ => None,
        }
    }

    /// Render `payload` here. Ephemeral delivery only exists for interactions.
    pub(crate) async fn render(
        self,
        gateway: &dyn MessagingGateway,
        payload: MessagePayload,
        ephemeral: bool,
    ) -> Result<RenderTarget, GatewayError> {
        match self {
            Destination::Channel(channel_id) => {
                if ephemeral {
                    tracing::debug!(%channel_id, "Ephemeral delivery ignored for channel prompt");
                }
                let message = gateway.send_message(channel_id, &payload).await?;
                Ok(RenderTarget::Message(message))
            }
            Destination::ExistingMessage(message) => {
                gateway.edit_message(&message, &payload).await?;
                Ok(RenderTarget::Message(message))
            }
            Destination::Interaction(ctx) => {
                let payload = if ephemeral { payload.ephemeral() } else { payload };
                gateway.respond_to_interaction(&ctx, &payload).await?;
                match gateway.original_response(&ctx).await {
                    Ok(message) => Ok(RenderTarget::Interaction { ctx, message }),
                    Err(e) => {
                        // The response exists but cannot be tracked; take its buttons off now.
                        if let Err(strip_err) = gateway
                            .edit_original_response(&ctx, &MessagePayload::strip_controls())
                            .await
                        {
                            tracing::warn!(error = %strip_err, "Failed to strip untracked response");
                        }
                        Err(e)
                    }
                }
            }
        }
    }
}

/// A rendered prompt message and the edit path it must be changed through
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RenderTarget {
    Message(MessageRef),
    Interaction {
        ctx: InteractionContext,
        message: MessageRef,
    },
}

impl RenderTarget {
    pub(crate) fn message(&self) -> &MessageRef {
        match self {
            RenderTarget::Message(message) => message,
            RenderTarget::Interaction { message, .. } => message,
        }
    }

    pub(crate) async fn edit(
        &self,
        gateway: &dyn MessagingGateway,
        payload: &MessagePayload,
    ) -> Result<(), GatewayError> {
        match self {
            RenderTarget::Message(message) => gateway.edit_message(message, payload).await,
            RenderTarget::Interaction { ctx, .. } => {
                gateway.edit_original_response(ctx, payload).await
            }
        }
    }
}
