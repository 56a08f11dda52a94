//! Rich text ("post") messages
//!
//! A post is a title plus paragraphs of inline labels. Each language gets its
//! own [`RichTextBuilder`]; labels always append to the last paragraph until
//! [`RichTextBuilder::new_paragraph`] starts another.

use serde::Serialize;

use super::{Message, MessageBody, MessageContent, MsgType};
use crate::i18n::{I18nDocument, Language, LanguageFragment};
use crate::Result;

/// Inline element of a post paragraph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "tag")]
pub enum RichTextLabel {
    #[serde(rename = "text")]
    Text {
        #[serde(skip_serializing_if = "String::is_empty")]
        text: String,
        /// Decode HTML entities in `text`
        un_escape: bool,
    },
    #[serde(rename = "a")]
    Link {
        #[serde(skip_serializing_if = "String::is_empty")]
        text: String,
        #[serde(skip_serializing_if = "String::is_empty")]
        href: String,
    },
    #[serde(rename = "at")]
    At {
        user_id: String,
        #[serde(skip_serializing_if = "String::is_empty")]
        user_name: String,
    },
    #[serde(rename = "img")]
    Image { image_key: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
struct RichTextBody {
    #[serde(skip_serializing_if = "String::is_empty")]
    title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    content: Vec<Vec<RichTextLabel>>,
}

/// One language's rendition of a post
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct RichTextBuilder {
    language: Language,
    body: RichTextBody,
}

impl RichTextBuilder {
    pub fn new(language: impl Into<Language>, title: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            body: RichTextBody {
                title: title.into(),
                content: Vec::with_capacity(1),
            },
        }
    }

    pub fn text(self, text: impl Into<String>, un_escape: bool) -> Self {
        self.label(RichTextLabel::Text {
            text: text.into(),
            un_escape,
        })
    }

    pub fn hyperlink(self, text: impl Into<String>, href: impl Into<String>) -> Self {
        self.label(RichTextLabel::Link {
            text: text.into(),
            href: href.into(),
        })
    }

    /// Mention a user; `name` may be empty
    pub fn at(self, user_id: impl Into<String>, name: impl Into<String>) -> Self {
        self.label(RichTextLabel::At {
            user_id: user_id.into(),
            user_name: name.into(),
        })
    }

    pub fn at_everyone(self) -> Self {
        self.at("all", "")
    }

    pub fn image(self, image_key: impl Into<String>) -> Self {
        self.label(RichTextLabel::Image {
            image_key: image_key.into(),
        })
    }

    /// Start a new paragraph for subsequent labels
    pub fn new_paragraph(mut self) -> Self {
        self.body.content.push(Vec::with_capacity(4));
        self
    }

    /// Append a label to the last paragraph
    pub fn label(mut self, label: RichTextLabel) -> Self {
        match self.body.content.last_mut() {
            Some(paragraph) => paragraph.push(label),
            None => self.body.content.push(vec![label]),
        }
        self
    }

    #[must_use]
    pub const fn language(&self) -> &Language {
        &self.language
    }
}

/// Post assembled from per-language builders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct RichTextMessage {
    builders: Vec<RichTextBuilder>,
}

impl RichTextMessage {
    pub fn new(post: RichTextBuilder) -> Self {
        Self {
            builders: vec![post],
        }
    }

    /// Add another language; a repeated language keeps its first builder
    pub fn with_language(mut self, post: RichTextBuilder) -> Self {
        self.builders.push(post);
        self
    }
}

impl FromIterator<RichTextBuilder> for RichTextMessage {
    fn from_iter<I: IntoIterator<Item = RichTextBuilder>>(iter: I) -> Self {
        Self {
            builders: iter.into_iter().collect(),
        }
    }
}

impl Message for RichTextMessage {
    fn body(&self) -> Result<MessageBody> {
        let post = I18nDocument::from_fragments(
            self.builders
                .iter()
                .map(|b| LanguageFragment::new(b.language.clone(), &b.body)),
        )
        .to_raw_value()?;

        Ok(MessageBody::from_content(
            MsgType::Post,
            MessageContent {
                post: Some(post),
                ..MessageContent::default()
            },
        ))
    }
}
