//! Users and interaction events

use crate::models::{ApplicationId, ChannelId, InteractionId, MessageId, UserId};
use serde::{Deserialize, Serialize};

const CDN_BASE: &str = "https://cdn.discordapp.com";

/// Interaction type for button presses and select menus
pub const MESSAGE_COMPONENT_INTERACTION: u8 = 3;

/// A Discord user as far as prompts care: who may answer, and how to attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Not every account has an avatar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl User {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar_url: None,
        }
    }

    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }
}

/// User object as returned by the Discord API
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordUser {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl From<DiscordUser> for User {
    fn from(raw: DiscordUser) -> Self {
        let avatar_url = raw
            .avatar
            .as_ref()
            .map(|hash| format!("{}/avatars/{}/{}.png", CDN_BASE, raw.id, hash));
        User {
            id: raw.id,
            name: raw.global_name.unwrap_or(raw.username),
            avatar_url,
        }
    }
}

/// An interaction that is still open for a response (the bot has not answered it yet).
///
/// The token stays valid for 15 minutes and is what the respond / edit
/// original response calls authenticate with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionContext {
    pub id: InteractionId,
    pub token: String,
    pub application_id: ApplicationId,
    /// Invoking user
    pub user: User,
    pub channel_id: Option<ChannelId>,
}

/// A button press on some message, as received from the event stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentInteraction {
    pub id: InteractionId,
    pub token: String,
    pub application_id: ApplicationId,
    pub message_id: MessageId,
    pub channel_id: Option<ChannelId>,
    pub user_id: UserId,
    pub custom_id: String,
}

#[derive(Debug, Deserialize)]
struct RawMember {
    user: DiscordUser,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    id: MessageId,
}

#[derive(Debug, Deserialize)]
struct RawComponentData {
    #[serde(default)]
    custom_id: Option<String>,
}

/// `INTERACTION_CREATE` payload, reduced to the fields prompts use
#[derive(Debug, Deserialize)]
pub struct RawInteraction {
    id: InteractionId,
    application_id: ApplicationId,
    #[serde(rename = "type")]
    kind: u8,
    token: String,
    #[serde(default)]
    channel_id: Option<ChannelId>,
    /// Set for guild interactions
    #[serde(default)]
    member: Option<RawMember>,
    /// Set for DM interactions
    #[serde(default)]
    user: Option<DiscordUser>,
    #[serde(default)]
    message: Option<RawMessage>,
    #[serde(default)]
    data: Option<RawComponentData>,
}

impl RawInteraction {
    pub fn kind(&self) -> u8 {
        self.kind
    }

    fn invoking_user(&self) -> Option<&DiscordUser> {
        self.member
            .as_ref()
            .map(|m| &m.user)
            .or(self.user.as_ref())
    }

    /// Button press view of the interaction; `None` for other interaction types
    /// or payloads missing the message, user or custom id.
    pub fn into_component(self) -> Option<ComponentInteraction> {
        if self.kind != MESSAGE_COMPONENT_INTERACTION {
            return None;
        }
        let user_id = self.invoking_user()?.id;
        let message_id = self.message.as_ref()?.id;
        let custom_id = self.data.and_then(|d| d.custom_id)?;
        Some(ComponentInteraction {
            id: self.id,
            token: self.token,
            application_id: self.application_id,
            message_id,
            channel_id: self.channel_id,
            user_id,
            custom_id,
        })
    }

    /// Open-interaction view, for prompts started in answer to this interaction
    pub fn into_context(self) -> Option<InteractionContext> {
        let user: User = self.invoking_user()?.clone().into();
        Some(InteractionContext {
            id: self.id,
            token: self.token,
            application_id: self.application_id,
            user,
            channel_id: self.channel_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn guild_button_press() -> serde_json::Value {
        json!({
            "id": "900",
            "application_id": "10",
            "type": 3,
            "token": "tok",
            "channel_id": "55",
            "member": {"user": {"id": "7", "username": "alice", "avatar": "abc"}},
            "message": {"id": "123", "channel_id": "55"},
            "data": {"custom_id": "confirm_yes", "component_type": 2}
        })
    }

    #[test]
    fn test_guild_component_interaction() {
        let raw: RawInteraction = serde_json::from_value(guild_button_press()).unwrap();
        let event = raw.into_component().unwrap();
        assert_eq!(event.user_id, UserId(7));
        assert_eq!(event.message_id, MessageId(123));
        assert_eq!(event.custom_id, "confirm_yes");
        assert_eq!(event.channel_id, Some(ChannelId(55)));
        assert_eq!(event.application_id, ApplicationId(10));
    }

    #[test]
    fn test_dm_component_interaction_uses_top_level_user() {
        let mut body = guild_button_press();
        body.as_object_mut().unwrap().remove("member");
        body["user"] = json!({"id": "8", "username": "bob"});
        let raw: RawInteraction = serde_json::from_value(body).unwrap();
        assert_eq!(raw.into_component().unwrap().user_id, UserId(8));
    }

    #[test]
    fn test_command_interaction_is_not_a_component() {
        let mut body = guild_button_press();
        body["type"] = json!(2);
        let raw: RawInteraction = serde_json::from_value(body).unwrap();
        assert!(raw.into_component().is_none());
    }

    #[test]
    fn test_context_carries_invoking_user_avatar() {
        let raw: RawInteraction = serde_json::from_value(guild_button_press()).unwrap();
        let ctx = raw.into_context().unwrap();
        assert_eq!(ctx.user.name, "alice");
        assert_eq!(
            ctx.user.avatar_url.as_deref(),
            Some("https://cdn.discordapp.com/avatars/7/abc.png")
        );
    }

    #[test]
    fn test_user_without_avatar() {
        let raw: DiscordUser =
            serde_json::from_value(json!({"id": "3", "username": "carol", "avatar": null}))
                .unwrap();
        let user: User = raw.into();
        assert!(user.avatar_url.is_none());
    }
}
