//! Wire bodies of the message kinds, checked through the public API

use serde_json::{Value, json};

use feishu_bot::markdown::{self, TextTagColor};
use feishu_bot::message::card::element::{
    Action, Button, ButtonType, CardElement, Div, DivField, Note, Text, TextMode,
};
use feishu_bot::message::card::{HeaderTemplate, TextTag};
use feishu_bot::message::text;
use feishu_bot::{
    CardBuilder, CardGlobalConfig, CardMessage, Language, Message, RichTextBuilder,
    RichTextMessage, TextMessage,
};

fn body_json(message: &impl Message) -> Value {
    serde_json::to_value(message.body().unwrap()).unwrap()
}

fn card_json(message: &CardMessage) -> Value {
    body_json(message)["card"].clone()
}

// -- Text ---

#[test]
fn text_with_mentions() {
    let content = format!(
        "{} build failed {}",
        text::at_person("ou_42", "Lin"),
        text::at_everyone()
    );
    assert_eq!(
        body_json(&TextMessage::new(content)),
        json!({
            "msg_type": "text",
            "content": {"text": "<at user_id=\"ou_42\">Lin</at> build failed <at user_id=\"all\">everyone</at>"}
        })
    );
}

// -- Rich text ---

#[test]
fn post_languages_in_builder_order() {
    let message = RichTextMessage::new(RichTextBuilder::new(Language::ENGLISH, "Weekly"))
        .with_language(RichTextBuilder::new(Language::CHINESE, "周报").text("完成", false))
        .with_language(RichTextBuilder::new(Language::ENGLISH, "ignored"));

    let body = message.body().unwrap();
    let post = body.content.unwrap().post.unwrap();
    assert_eq!(
        post.get(),
        r#"{"en_us":{"title":"Weekly"},"zh_cn":{"title":"周报","content":[[{"tag":"text","text":"完成","un_escape":false}]]}}"#
    );
}

// -- Cards ---

fn release_card() -> CardMessage {
    let elements = |note: &str| -> Vec<CardElement> {
        vec![
            Div::new()
                .lark_md(markdown::bold("v1.4.0"))
                .fields([
                    DivField::new(true, Text::lark_md("**env**\nprod")),
                    DivField::new(true, Text::lark_md("**owner**\nops")),
                ])
                .into(),
            CardElement::HorizontalRule,
            Action::new()
                .actions([Button::new(TextMode::PlainText, "Open")
                    .url("https://example.com/r/1")
                    .kind(ButtonType::Primary)])
                .into(),
            Note::new().plain_text(note).into(),
        ]
    };

    CardMessage::new(
        CardBuilder::new(Language::ENGLISH, "Release")
            .header_subtitle("production")
            .header_text_tags([TextTag::new("stable").color(TextTagColor::Green)])
            .elements(elements("shipped")),
    )
    .with_language(
        CardBuilder::new(Language::CHINESE, "发布")
            .header_text_tags([TextTag::new("稳定"), TextTag::new("热修")])
            .elements(elements("已发布")),
    )
    .global_config(
        CardGlobalConfig::new()
            .header_template(HeaderTemplate::Green)
            .enable_forward(true),
    )
}

#[test]
fn card_header_is_multi_language() {
    let card = card_json(&release_card());
    let header = &card["header"];

    assert_eq!(
        header["title"],
        json!({"tag": "plain_text", "i18n": {"en_us": "Release", "zh_cn": "发布"}})
    );
    // one builder set a subtitle, so every language gets an entry
    assert_eq!(
        header["subtitle"]["i18n"],
        json!({"en_us": "production", "zh_cn": ""})
    );
    assert_eq!(header["template"], "green");
    assert_eq!(
        header["i18n_text_tag_list"]["zh_cn"]
            .as_array()
            .map(Vec::len),
        Some(2)
    );
    assert_eq!(
        header["i18n_text_tag_list"]["en_us"][0],
        json!({
            "tag": "text_tag",
            "text": {"tag": "plain_text", "content": "stable"},
            "color": "green"
        })
    );
}

#[test]
fn card_elements_are_keyed_by_language() {
    let card = card_json(&release_card());
    let en = card["i18n_elements"]["en_us"].as_array().unwrap();
    let zh = card["i18n_elements"]["zh_cn"].as_array().unwrap();

    let tags: Vec<&str> = en.iter().map(|e| e["tag"].as_str().unwrap()).collect();
    assert_eq!(tags, ["div", "hr", "action", "note"]);
    assert_eq!(en[1], json!({"tag": "hr"}));
    assert_eq!(
        en[2]["actions"][0],
        json!({
            "tag": "button",
            "text": {"tag": "plain_text", "content": "Open"},
            "url": "https://example.com/r/1",
            "type": "primary"
        })
    );
    assert_eq!(zh[3]["elements"][0]["content"], "已发布");
    assert_eq!(card["config"]["enable_forward"], true);
}

#[test]
fn card_without_subtitles_or_tags_omits_them() {
    let card = card_json(&CardMessage::new(CardBuilder::new(Language::JAPANESE, "通知")));
    let header = card["header"].as_object().unwrap();
    assert!(!header.contains_key("subtitle"));
    assert!(!header.contains_key("i18n_text_tag_list"));
    assert!(!header.contains_key("template"));
    assert_eq!(card["i18n_elements"], json!({"ja_jp": []}));
}

#[test]
fn markdown_helpers_compose() {
    let line = format!(
        "{} {} {}",
        markdown::text_link("docs", "https://example.com"),
        markdown::red_text("down"),
        markdown::text_tag(TextTagColor::Blue, "P1")
    );
    assert_eq!(
        line,
        "[docs](https://example.com) <font color='red'>down</font> <text_tag color='blue'>P1</text_tag>"
    );
}
