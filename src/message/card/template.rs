//! Cards rendered from a template built in the card builder tool

use serde::Serialize;
use serde_json::value::RawValue;

use crate::message::{Message, MessageBody, MsgType};
use crate::Result;

/// Card referencing a saved template by ID
///
/// Variables are encoded when the message is built, so any `Serialize`
/// value works; encoding failures surface from [`Message::body`].
#[derive(Debug, Clone)]
#[must_use]
pub struct CardTemplateMessage<V> {
    id: String,
    variables: V,
}

impl<V: Serialize> CardTemplateMessage<V> {
    pub fn new(id: impl Into<String>, variables: V) -> Self {
        Self {
            id: id.into(),
            variables,
        }
    }
}

#[derive(Serialize)]
struct TemplateCard<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    data: TemplateData<'a>,
}

#[derive(Serialize)]
struct TemplateData<'a> {
    template_id: &'a str,
    template_variable: Box<RawValue>,
}

impl<V: Serialize + Send + Sync> Message for CardTemplateMessage<V> {
    fn body(&self) -> Result<MessageBody> {
        let card = TemplateCard {
            kind: "template",
            data: TemplateData {
                template_id: &self.id,
                template_variable: serde_json::value::to_raw_value(&self.variables)?,
            },
        };
        Ok(MessageBody::from_card(
            MsgType::Interactive,
            serde_json::value::to_raw_value(&card)?,
        ))
    }
}
