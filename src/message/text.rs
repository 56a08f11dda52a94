//! Plain text messages and their mention helpers

use super::{Message, MessageBody, MessageContent, MsgType};
use crate::Result;

/// Plain text message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMessage(String);

impl TextMessage {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl Message for TextMessage {
    fn body(&self) -> Result<MessageBody> {
        Ok(MessageBody::from_content(
            MsgType::Text,
            MessageContent {
                text: self.0.clone(),
                ..MessageContent::default()
            },
        ))
    }
}

/// Mention a user inside a text message
#[must_use]
pub fn at_person(id: &str, name: &str) -> String {
    format!(r#"<at user_id="{id}">{name}</at>"#)
}

/// Mention everyone inside a text message
#[must_use]
pub const fn at_everyone() -> &'static str {
    r#"<at user_id="all">everyone</at>"#
}
