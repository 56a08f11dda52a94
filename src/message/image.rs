use super::{Message, MessageBody, MessageContent, MsgType};
use crate::Result;

/// Image message referencing an uploaded image key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMessage(String);

impl ImageMessage {
    #[must_use]
    pub fn new(image_key: impl Into<String>) -> Self {
        Self(image_key.into())
    }
}

impl Message for ImageMessage {
    fn body(&self) -> Result<MessageBody> {
        Ok(MessageBody::from_content(
            MsgType::Image,
            MessageContent {
                image_key: self.0.clone(),
                ..MessageContent::default()
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_body() {
        let body = ImageMessage::new("img_ecffc3b9").body().unwrap();
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"msg_type":"image","content":{"image_key":"img_ecffc3b9"}}"#
        );
    }
}
