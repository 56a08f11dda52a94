use super::{Message, MessageBody, MessageContent, MsgType};
use crate::Result;

/// Shared group card inviting members to another chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareChatMessage(String);

impl ShareChatMessage {
    #[must_use]
    pub fn new(chat_id: impl Into<String>) -> Self {
        Self(chat_id.into())
    }
}

impl Message for ShareChatMessage {
    fn body(&self) -> Result<MessageBody> {
        Ok(MessageBody::from_content(
            MsgType::ShareChat,
            MessageContent {
                share_chat_id: self.0.clone(),
                ..MessageContent::default()
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_chat_body() {
        let body = ShareChatMessage::new("oc_f5b1a7eb").body().unwrap();
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"msg_type":"share_chat","content":{"share_chat_id":"oc_f5b1a7eb"}}"#
        );
    }
}
