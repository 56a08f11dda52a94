//! Interactive card messages
//!
//! A card is described once per language with a [`CardBuilder`]. The
//! builders are folded into a single document: header title and subtitle
//! become language maps, header tags are grouped by language, and element
//! lists become `i18n_elements`. Settings shared by every language (icon,
//! color theme, forwarding, click target) live in [`CardGlobalConfig`].

pub mod element;
pub mod template;

use serde::Serialize;
use serde_json::value::RawValue;

use super::{Message, MessageBody, MsgType};
use crate::i18n::{I18nDocument, Language, LanguageFragment};
use crate::markdown::TextTagColor;
use crate::Result;

pub use element::{CardElement, MultiUrl};
pub use template::CardTemplateMessage;

/// Header background theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderTemplate {
    Blue,
    Wathet,
    Turquoise,
    Green,
    Yellow,
    Orange,
    Red,
    Carmine,
    Violet,
    Purple,
    Indigo,
    Grey,
    Default,
}

/// Tag shown next to the header title
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct TextTag {
    pub content: String,
    /// Defaults to blue on the client when unset
    pub color: Option<TextTagColor>,
}

impl TextTag {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            color: None,
        }
    }

    pub const fn color(mut self, color: TextTagColor) -> Self {
        self.color = Some(color);
        self
    }
}

/// Card-level behaviour flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CardConfig {
    /// Allow the card to be forwarded
    pub enable_forward: bool,
    /// Updates are visible to every recipient, not only the acting user
    pub update_multi: bool,
}

/// Settings shared by every language of a card
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct CardGlobalConfig {
    header_icon: Option<String>,
    header_template: Option<HeaderTemplate>,
    config: Option<CardConfig>,
    link: Option<MultiUrl>,
}

impl CardGlobalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Icon shown before the title
    pub fn header_icon(mut self, img_key: impl Into<String>) -> Self {
        self.header_icon = Some(img_key.into());
        self
    }

    pub const fn header_template(mut self, template: HeaderTemplate) -> Self {
        self.header_template = Some(template);
        self
    }

    pub fn enable_forward(mut self, enable: bool) -> Self {
        self.config.get_or_insert_with(CardConfig::default).enable_forward = enable;
        self
    }

    pub fn update_multi(mut self, shared: bool) -> Self {
        self.config.get_or_insert_with(CardConfig::default).update_multi = shared;
        self
    }

    /// Click target for the whole card
    pub fn card_link(mut self, link: MultiUrl) -> Self {
        self.link = Some(link);
        self
    }
}

/// One language's rendition of a card
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct CardBuilder {
    language: Language,
    title: String,
    subtitle: String,
    text_tags: Vec<TextTag>,
    elements: Vec<CardElement>,
}

impl CardBuilder {
    pub fn new(language: impl Into<Language>, title: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            title: title.into(),
            subtitle: String::new(),
            text_tags: Vec::new(),
            elements: Vec::with_capacity(4),
        }
    }

    pub fn header_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    /// Header tags; the client shows at most the first three
    pub fn header_text_tags(mut self, tags: impl IntoIterator<Item = TextTag>) -> Self {
        self.text_tags = tags.into_iter().collect();
        self
    }

    /// Append body elements
    pub fn elements<E>(mut self, elements: impl IntoIterator<Item = E>) -> Self
    where
        E: Into<CardElement>,
    {
        self.elements.extend(elements.into_iter().map(Into::into));
        self
    }

    /// Append one body element
    pub fn element(mut self, element: impl Into<CardElement>) -> Self {
        self.elements.push(element.into());
        self
    }

    #[must_use]
    pub const fn language(&self) -> &Language {
        &self.language
    }
}

/// Interactive card assembled from per-language builders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct CardMessage {
    global: Option<CardGlobalConfig>,
    builders: Vec<CardBuilder>,
}

impl CardMessage {
    pub fn new(card: CardBuilder) -> Self {
        Self {
            global: None,
            builders: vec![card],
        }
    }

    /// Build from any number of builders, including none
    pub fn from_builders(builders: impl IntoIterator<Item = CardBuilder>) -> Self {
        Self {
            global: None,
            builders: builders.into_iter().collect(),
        }
    }

    /// Add another language; a repeated language keeps its first builder
    pub fn with_language(mut self, card: CardBuilder) -> Self {
        self.builders.push(card);
        self
    }

    pub fn global_config(mut self, config: CardGlobalConfig) -> Self {
        self.global = Some(config);
        self
    }

    fn header(&self) -> CardHeader<'_> {
        let global = self.global.as_ref();

        let subtitle = self
            .builders
            .iter()
            .any(|b| !b.subtitle.is_empty())
            .then(|| {
                HeaderText::new(
                    self.builders
                        .iter()
                        .map(|b| (&b.language, b.subtitle.as_str())),
                )
            });

        let tags = I18nDocument::grouped(self.builders.iter().flat_map(|b| {
            b.text_tags.iter().map(|tag| {
                (
                    b.language.clone(),
                    HeaderTextTag {
                        tag: "text_tag",
                        text: PlainText {
                            tag: "plain_text",
                            content: &tag.content,
                        },
                        color: tag.color,
                    },
                )
            })
        }));

        CardHeader {
            title: HeaderText::new(
                self.builders
                    .iter()
                    .map(|b| (&b.language, b.title.as_str())),
            ),
            subtitle,
            icon: global
                .and_then(|g| g.header_icon.as_deref())
                .map(|img_key| HeaderIcon { img_key }),
            template: global.and_then(|g| g.header_template),
            i18n_text_tag_list: (!tags.is_empty()).then_some(tags),
        }
    }

    fn i18n_elements(&self) -> Result<Option<Box<RawValue>>> {
        if self.builders.is_empty() {
            return Ok(None);
        }
        let document = I18nDocument::from_fragments(
            self.builders
                .iter()
                .map(|b| LanguageFragment::new(b.language.clone(), b.elements.as_slice())),
        );
        document.to_raw_value().map(Some)
    }
}

impl Message for CardMessage {
    fn body(&self) -> Result<MessageBody> {
        let global = self.global.as_ref();
        let card = CardDocument {
            header: self.header(),
            i18n_elements: self.i18n_elements()?,
            config: global.and_then(|g| g.config.as_ref()),
            card_link: global.and_then(|g| g.link.as_ref()),
        };
        Ok(MessageBody::from_card(
            MsgType::Interactive,
            serde_json::value::to_raw_value(&card)?,
        ))
    }
}

// -- Wire shapes --------------------------------------------------------------

#[derive(Serialize)]
struct CardDocument<'a> {
    header: CardHeader<'a>,
    // null when there are no builders at all
    i18n_elements: Option<Box<RawValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<&'a CardConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    card_link: Option<&'a MultiUrl>,
}

#[derive(Serialize)]
struct CardHeader<'a> {
    title: HeaderText<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subtitle: Option<HeaderText<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<HeaderIcon<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    template: Option<HeaderTemplate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    i18n_text_tag_list: Option<I18nDocument<Vec<HeaderTextTag<'a>>>>,
}

#[derive(Serialize)]
struct HeaderText<'a> {
    tag: &'static str,
    i18n: I18nDocument<&'a str>,
}

impl<'a> HeaderText<'a> {
    fn new(texts: impl Iterator<Item = (&'a Language, &'a str)>) -> Self {
        Self {
            tag: "plain_text",
            i18n: I18nDocument::from_fragments(
                texts.map(|(language, text)| LanguageFragment::new(language.clone(), text)),
            ),
        }
    }
}

#[derive(Serialize)]
struct HeaderIcon<'a> {
    img_key: &'a str,
}

#[derive(Serialize)]
struct HeaderTextTag<'a> {
    tag: &'static str,
    text: PlainText<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<TextTagColor>,
}

#[derive(Serialize)]
struct PlainText<'a> {
    tag: &'static str,
    content: &'a str,
}

#[cfg(test)]
mod tests {
    use super::element::{Div, Markdown};
    use super::*;

    fn card_json(message: &CardMessage) -> String {
        message.body().unwrap().card.unwrap().get().to_string()
    }

    fn header_json(message: &CardMessage) -> String {
        serde_json::to_string(&message.header()).unwrap()
    }

    // -- Header ---------------------------------------------------------------

    #[test]
    fn title_is_escaped_and_ordered() {
        let message = CardMessage::new(CardBuilder::new(Language::CHINESE, "这是\"主标题\"！"))
            .with_language(CardBuilder::new(Language::ENGLISH, "It is the title!"));
        assert_eq!(
            header_json(&message),
            r#"{"title":{"tag":"plain_text","i18n":{"zh_cn":"这是\"主标题\"！","en_us":"It is the title!"}}}"#
        );
    }

    #[test]
    fn title_backslash_is_escaped() {
        let message = CardMessage::new(CardBuilder::new(Language::CHINESE, r#"\这是"主标题"！"#))
            .with_language(CardBuilder::new(Language::ENGLISH, "It is the title!"));
        assert_eq!(
            header_json(&message),
            r#"{"title":{"tag":"plain_text","i18n":{"zh_cn":"\\这是\"主标题\"！","en_us":"It is the title!"}}}"#
        );
    }

    #[test]
    fn duplicate_title_language_keeps_first() {
        let message = CardMessage::from_builders([
            CardBuilder::new(Language::ENGLISH, "It is the title!"),
            CardBuilder::new(Language::CHINESE, "这是\"主标题\"！"),
            CardBuilder::new(Language::CHINESE, "ignored"),
        ]);
        assert_eq!(
            header_json(&message),
            r#"{"title":{"tag":"plain_text","i18n":{"en_us":"It is the title!","zh_cn":"这是\"主标题\"！"}}}"#
        );
    }

    #[test]
    fn any_subtitle_pulls_in_every_language() {
        let message = CardMessage::new(CardBuilder::new(Language::CHINESE, "标题"))
            .with_language(CardBuilder::new(Language::ENGLISH, "Title").header_subtitle("Sub"));
        assert_eq!(
            header_json(&message),
            r#"{"title":{"tag":"plain_text","i18n":{"zh_cn":"标题","en_us":"Title"}},"subtitle":{"tag":"plain_text","i18n":{"zh_cn":"","en_us":"Sub"}}}"#
        );
    }

    #[test]
    fn text_tags_are_grouped_by_language() {
        let message = CardMessage::from_builders([
            CardBuilder::new(Language::CHINESE, "a")
                .header_text_tags([TextTag::new("标签").color(TextTagColor::Red)]),
            CardBuilder::new(Language::ENGLISH, "b").header_text_tags([TextTag::new("tag")]),
            CardBuilder::new(Language::CHINESE, "c")
                .header_text_tags([TextTag::new("更多").color(TextTagColor::Lime)]),
        ]);
        let header: serde_json::Value = serde_json::from_str(&header_json(&message)).unwrap();
        let tags = &header["i18n_text_tag_list"];
        assert_eq!(tags["zh_cn"].as_array().unwrap().len(), 2);
        assert_eq!(tags["zh_cn"][1]["text"]["content"], "更多");
        assert_eq!(tags["zh_cn"][1]["color"], "lime");
        assert_eq!(
            tags["en_us"][0],
            serde_json::json!({"tag":"text_tag","text":{"tag":"plain_text","content":"tag"}})
        );
    }

    #[test]
    fn global_icon_and_template() {
        let message = CardMessage::new(CardBuilder::new(Language::ENGLISH, "t")).global_config(
            CardGlobalConfig::new()
                .header_icon("img_icon")
                .header_template(HeaderTemplate::Turquoise),
        );
        assert_eq!(
            header_json(&message),
            r#"{"title":{"tag":"plain_text","i18n":{"en_us":"t"}},"icon":{"img_key":"img_icon"},"template":"turquoise"}"#
        );
    }

    // -- Document -------------------------------------------------------------

    #[test]
    fn no_builders_serializes_null_elements() {
        let message = CardMessage::default();
        assert_eq!(
            card_json(&message),
            r#"{"header":{"title":{"tag":"plain_text","i18n":{}}},"i18n_elements":null}"#
        );
    }

    #[test]
    fn elements_are_keyed_by_language() {
        let message = CardMessage::new(
            CardBuilder::new(Language::CHINESE, "标题")
                .element(Markdown::new("你好"))
                .element(CardElement::HorizontalRule),
        )
        .with_language(
            CardBuilder::new(Language::ENGLISH, "Title").element(Div::new().lark_md("hi")),
        )
        .with_language(
            CardBuilder::new(Language::CHINESE, "dup").element(Markdown::new("dropped")),
        );

        let card: serde_json::Value = serde_json::from_str(&card_json(&message)).unwrap();
        assert_eq!(
            card["i18n_elements"],
            serde_json::json!({
                "zh_cn": [{"tag":"markdown","content":"你好"},{"tag":"hr"}],
                "en_us": [{"tag":"div","text":{"tag":"lark_md","content":"hi"}}],
            })
        );
    }

    #[test]
    fn config_and_link_follow_elements() {
        let message = CardMessage::new(CardBuilder::new(Language::ENGLISH, "t")).global_config(
            CardGlobalConfig::new()
                .update_multi(true)
                .card_link(MultiUrl::new("https://a.b").android("app://x")),
        );
        assert_eq!(
            card_json(&message),
            r#"{"header":{"title":{"tag":"plain_text","i18n":{"en_us":"t"}}},"i18n_elements":{"en_us":[]},"config":{"enable_forward":false,"update_multi":true},"card_link":{"url":"https://a.b","android_url":"app://x"}}"#
        );
    }

    #[test]
    fn body_is_interactive() {
        let body = CardMessage::new(CardBuilder::new(Language::ENGLISH, "t"))
            .body()
            .unwrap();
        assert_eq!(body.msg_type, MsgType::Interactive);
        assert!(body.content.is_none());
    }
}
