//! Message building blocks: embeds, buttons, action rows and edit payloads

use crate::models::{ChannelId, MessageId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Message flag marking a response as visible only to the invoking user.
pub const EPHEMERAL_FLAG: u64 = 1 << 6;

const ACTION_ROW_TYPE: u8 = 1;
const BUTTON_TYPE: u8 = 2;

/// Embed side-bar color (`0xRRGGBB`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x000000);
    pub const MAX: u32 = 0xFFFFFF;
}

impl From<u32> for Color {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl FromStr for Color {
    type Err = String;

    /// Accepts `#RRGGBB`, `0xRRGGBB` or bare hex digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let value = u32::from_str_radix(hex, 16)
            .map_err(|e| format!("invalid color '{}': {}", s, e))?;
        if value > Color::MAX {
            return Err(format!("color '{}' exceeds 0xFFFFFF", s));
        }
        Ok(Color(value))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// Author line shown above the embed text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedAuthor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Rich embed carrying the prompt text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub description: String,
    pub color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
}

impl Embed {
    pub fn new(description: impl Into<String>, color: Color) -> Self {
        Self {
            description: description.into(),
            color,
            author: None,
        }
    }

    pub fn with_author(mut self, name: impl Into<String>, icon_url: Option<String>) -> Self {
        self.author = Some(EmbedAuthor {
            name: name.into(),
            icon_url,
        });
        self
    }
}

/// Button styles as numbered by the Discord API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Success,
    Danger,
}

impl From<ButtonStyle> for u8 {
    fn from(style: ButtonStyle) -> Self {
        match style {
            ButtonStyle::Primary => 1,
            ButtonStyle::Secondary => 2,
            ButtonStyle::Success => 3,
            ButtonStyle::Danger => 4,
        }
    }
}

impl TryFrom<u8> for ButtonStyle {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ButtonStyle::Primary),
            2 => Ok(ButtonStyle::Secondary),
            3 => Ok(ButtonStyle::Success),
            4 => Ok(ButtonStyle::Danger),
            other => Err(format!("unsupported button style {}", other)),
        }
    }
}

/// Unicode emoji rendered on a button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialEmoji {
    pub name: String,
}

/// Interactive button identified by its `custom_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    #[serde(rename = "type")]
    kind: u8,
    pub style: ButtonStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<PartialEmoji>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub custom_id: String,
}

impl Button {
    /// Secondary-style emoji button
    pub fn emoji(emoji: &str, custom_id: &str) -> Self {
        Self {
            kind: BUTTON_TYPE,
            style: ButtonStyle::Secondary,
            emoji: Some(PartialEmoji {
                name: emoji.to_string(),
            }),
            label: None,
            custom_id: custom_id.to_string(),
        }
    }
}

/// Row of up to five buttons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRow {
    #[serde(rename = "type")]
    kind: u8,
    pub components: Vec<Button>,
}

impl ActionRow {
    pub fn new(components: Vec<Button>) -> Self {
        Self {
            kind: ACTION_ROW_TYPE,
            components,
        }
    }
}

/// Body for send/edit/respond calls.
///
/// `None` fields are omitted so an edit leaves them untouched; an empty
/// `components` list removes every control from the message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embeds: Option<Vec<Embed>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<ActionRow>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
}

impl MessagePayload {
    /// Embed plus controls
    pub fn with_controls(embed: Embed, rows: Vec<ActionRow>) -> Self {
        Self {
            embeds: Some(vec![embed]),
            components: Some(rows),
            flags: None,
        }
    }

    /// Replace the embed, keep whatever controls are attached
    pub fn embed_only(embed: Embed) -> Self {
        Self {
            embeds: Some(vec![embed]),
            components: None,
            flags: None,
        }
    }

    /// Remove all controls, keep the embed
    pub fn strip_controls() -> Self {
        Self {
            embeds: None,
            components: Some(Vec::new()),
            flags: None,
        }
    }

    pub fn ephemeral(mut self) -> Self {
        self.flags = Some(self.flags.unwrap_or(0) | EPHEMERAL_FLAG);
        self
    }

    /// Number of interactive controls this payload sets (`None` = unchanged)
    pub fn control_count(&self) -> Option<usize> {
        self.components
            .as_ref()
            .map(|rows| rows.iter().map(|row| row.components.len()).sum())
    }
}

/// Reference to a rendered message; the message itself is owned by Discord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub channel_id: ChannelId,
    #[serde(rename = "id")]
    pub message_id: MessageId,
}

impl MessageRef {
    pub fn new(channel_id: ChannelId, message_id: MessageId) -> Self {
        Self {
            channel_id,
            message_id,
        }
    }
}
