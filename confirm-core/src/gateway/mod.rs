//! Messaging gateway: the chat-platform capabilities prompts are built on
//!
//! `MessagingGateway` is the seam between prompts and Discord. `DiscordHttp`
//! implements it over the REST API; button presses reach it through an
//! `InteractionHub` fed by `DiscordEventStream` (or by the host bot's own
//! event loop).

mod discord;
mod error;
pub mod hub;
mod ws;

pub use discord::{DiscordHttp, DISCORD_API_BASE};
pub use error::GatewayError;
pub use hub::{InteractionHub, InteractionSubscription, WaitResult, DEFAULT_HUB_CAPACITY};
pub use ws::DiscordEventStream;

use crate::models::{
    ChannelId, ComponentInteraction, InteractionContext, MessagePayload, MessageRef,
};
use async_trait::async_trait;

/// Message, interaction and event primitives supplied by the host environment.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Gateway name for logging (e.g. "discord").
    fn name(&self) -> &str;

    /// Post a new message into a channel.
    async fn send_message(
        &self,
        channel_id: ChannelId,
        payload: &MessagePayload,
    ) -> Result<MessageRef, GatewayError>;

    /// Edit a message posted by the bot.
    async fn edit_message(
        &self,
        message: &MessageRef,
        payload: &MessagePayload,
    ) -> Result<(), GatewayError>;

    /// Answer an open interaction with a message.
    async fn respond_to_interaction(
        &self,
        ctx: &InteractionContext,
        payload: &MessagePayload,
    ) -> Result<(), GatewayError>;

    /// The message created by `respond_to_interaction`.
    async fn original_response(&self, ctx: &InteractionContext)
        -> Result<MessageRef, GatewayError>;

    /// Edit the message created by `respond_to_interaction`.
    async fn edit_original_response(
        &self,
        ctx: &InteractionContext,
        payload: &MessagePayload,
    ) -> Result<(), GatewayError>;

    /// Mark a button press as handled without changing the message.
    async fn acknowledge(&self, event: &ComponentInteraction) -> Result<(), GatewayError>;

    /// Subscribe to button presses published from now on.
    fn subscribe(&self) -> InteractionSubscription;
}
