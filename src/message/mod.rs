//! Message kinds accepted by the webhook
//!
//! Every kind implements [`Message`], which renders it into the
//! [`MessageBody`] that is posted (plus signature fields) to the hook.

pub mod card;
mod image;
pub mod rich_text;
mod share_chat;
pub mod text;

use std::fmt;

use serde::Serialize;
use serde_json::value::RawValue;

use crate::Result;

pub use card::{CardBuilder, CardGlobalConfig, CardMessage, CardTemplateMessage};
pub use image::ImageMessage;
pub use rich_text::{RichTextBuilder, RichTextMessage};
pub use share_chat::ShareChatMessage;
pub use text::TextMessage;

/// Something that can be sent through the webhook
pub trait Message: Send + Sync {
    /// Render the wire body
    ///
    /// # Errors
    ///
    /// Returns error if any part of the message fails to serialize
    fn body(&self) -> Result<MessageBody>;
}

/// Wire discriminator of a message body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MsgType {
    Text,
    Post,
    Image,
    ShareChat,
    Interactive,
}

impl MsgType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Post => "post",
            Self::Image => "image",
            Self::ShareChat => "share_chat",
            Self::Interactive => "interactive",
        }
    }
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `content` object for non-card messages
#[derive(Debug, Clone, Default, Serialize)]
pub struct MessageContent {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    /// Pre-rendered language map of post bodies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Box<RawValue>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub share_chat_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image_key: String,
}

/// Rendered message, ready to be signed and posted
///
/// Exactly one of `content` and `card` is set by the built-in kinds.
#[derive(Debug, Clone, Serialize)]
pub struct MessageBody {
    pub msg_type: MsgType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Box<RawValue>>,
}

impl MessageBody {
    #[must_use]
    pub fn from_content(msg_type: MsgType, content: MessageContent) -> Self {
        Self {
            msg_type,
            content: Some(content),
            card: None,
        }
    }

    #[must_use]
    pub fn from_card(msg_type: MsgType, card: Box<RawValue>) -> Self {
        Self {
            msg_type,
            content: None,
            card: Some(card),
        }
    }
}
