//! Discord REST gateway: messages, interaction callbacks and webhook edits via API v10.

use crate::gateway::{GatewayError, InteractionHub, InteractionSubscription, MessagingGateway};
use crate::models::{
    ChannelId, ComponentInteraction, DiscordUser, InteractionContext, MessagePayload, MessageRef,
    User, UserId,
};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;

pub const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

/// Interaction callback: reply with a new message
const CALLBACK_CHANNEL_MESSAGE: u8 = 4;
/// Interaction callback: acknowledge a component press, edit nothing
const CALLBACK_DEFERRED_UPDATE: u8 = 6;

/// Discord REST client. Token is sent as `Authorization: Bot ...` and never logged.
pub struct DiscordHttp {
    token: String,
    base_url: String,
    client: Arc<Client>,
    hub: InteractionHub,
}

impl DiscordHttp {
    pub fn new(token: String) -> Self {
        Self::with_base_url(token, DISCORD_API_BASE.to_string())
    }

    /// Point the client at another API root (proxies, tests).
    pub fn with_base_url(token: String, base_url: String) -> Self {
        Self {
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Arc::new(Client::new()),
            hub: InteractionHub::default(),
        }
    }

    /// Hub that button presses must be published into for prompts to see them.
    pub fn hub(&self) -> &InteractionHub {
        &self.hub
    }

    /// Look up a user, for author attribution.
    pub async fn fetch_user(&self, user_id: UserId) -> Result<User, GatewayError> {
        let path = format!("/users/{}", user_id);
        let res = self.bot_request(Method::GET, &path).send().await?;
        let raw: DiscordUser = Self::read_json(res, "GET /users/{id}").await?;
        Ok(raw.into())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bot_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("Authorization", format!("Bot {}", self.token))
    }

    /// Interaction and webhook routes authenticate with the interaction token in the path.
    fn token_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    async fn check(res: Response, route: &str) -> Result<Response, GatewayError> {
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            tracing::debug!(route, status, "Discord API call failed");
            return Err(GatewayError::Api { status, body });
        }
        Ok(res)
    }

    async fn read_json<T: DeserializeOwned>(res: Response, route: &str) -> Result<T, GatewayError> {
        let res = Self::check(res, route).await?;
        let bytes = res.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn original_path(ctx: &InteractionContext) -> String {
        format!(
            "/webhooks/{}/{}/messages/@original",
            ctx.application_id, ctx.token
        )
    }
}

#[async_trait]
impl MessagingGateway for DiscordHttp {
    fn name(&self) -> &str {
        "discord"
    }

    async fn send_message(
        &self,
        channel_id: ChannelId,
        payload: &MessagePayload,
    ) -> Result<MessageRef, GatewayError> {
        let path = format!("/channels/{}/messages", channel_id);
        let res = self
            .bot_request(Method::POST, &path)
            .json(payload)
            .send()
            .await?;
        Self::read_json(res, "POST /channels/{id}/messages").await
    }

    async fn edit_message(
        &self,
        message: &MessageRef,
        payload: &MessagePayload,
    ) -> Result<(), GatewayError> {
        let path = format!(
            "/channels/{}/messages/{}",
            message.channel_id, message.message_id
        );
        let res = self
            .bot_request(Method::PATCH, &path)
            .json(payload)
            .send()
            .await?;
        Self::check(res, "PATCH /channels/{id}/messages/{id}").await?;
        Ok(())
    }

    async fn respond_to_interaction(
        &self,
        ctx: &InteractionContext,
        payload: &MessagePayload,
    ) -> Result<(), GatewayError> {
        let path = format!("/interactions/{}/{}/callback", ctx.id, ctx.token);
        let body = json!({
            "type": CALLBACK_CHANNEL_MESSAGE,
            "data": payload,
        });
        let res = self
            .token_request(Method::POST, &path)
            .json(&body)
            .send()
            .await?;
        Self::check(res, "POST /interactions/{id}/{token}/callback").await?;
        Ok(())
    }

    async fn original_response(
        &self,
        ctx: &InteractionContext,
    ) -> Result<MessageRef, GatewayError> {
        let res = self
            .token_request(Method::GET, &Self::original_path(ctx))
            .send()
            .await?;
        Self::read_json(res, "GET /webhooks/{app}/{token}/messages/@original").await
    }

    async fn edit_original_response(
        &self,
        ctx: &InteractionContext,
        payload: &MessagePayload,
    ) -> Result<(), GatewayError> {
        let res = self
            .token_request(Method::PATCH, &Self::original_path(ctx))
            .json(payload)
            .send()
            .await?;
        Self::check(res, "PATCH /webhooks/{app}/{token}/messages/@original").await?;
        Ok(())
    }

    async fn acknowledge(&self, event: &ComponentInteraction) -> Result<(), GatewayError> {
        let path = format!("/interactions/{}/{}/callback", event.id, event.token);
        let body = json!({ "type": CALLBACK_DEFERRED_UPDATE });
        let res = self
            .token_request(Method::POST, &path)
            .json(&body)
            .send()
            .await?;
        Self::check(res, "POST /interactions/{id}/{token}/callback").await?;
        Ok(())
    }

    fn subscribe(&self) -> InteractionSubscription {
        self.hub.subscribe()
    }
}
