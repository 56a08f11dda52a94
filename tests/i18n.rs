//! Multi-language document assembly through the public API

use serde::Serialize;

use feishu_bot::{assemble, Error, I18nDocument, Language, LanguageFragment};

#[derive(Serialize)]
struct Post<'a> {
    title: &'a str,
    lines: Vec<&'a str>,
}

#[test]
fn assembles_structured_fragments_in_order() {
    let bytes = assemble([
        Some(LanguageFragment::new(
            Language::JAPANESE,
            Post {
                title: "お知らせ",
                lines: vec!["a"],
            },
        )),
        None,
        Some(LanguageFragment::new(
            "en_us",
            Post {
                title: "Notice",
                lines: vec![],
            },
        )),
    ])
    .unwrap();

    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        r#"{"ja_jp":{"title":"お知らせ","lines":["a"]},"en_us":{"title":"Notice","lines":[]}}"#
    );
}

#[test]
fn custom_language_tags_are_accepted() {
    let doc = I18nDocument::from_fragments([
        LanguageFragment::new(Language::new(String::from("zh_hk")), 1),
        LanguageFragment::new(Language::CHINESE, 2),
        LanguageFragment::new("zh_hk", 3),
    ]);
    assert_eq!(doc.len(), 2);
    assert_eq!(doc.get(&Language::new("zh_hk")), Some(&1));
    assert_eq!(
        doc.languages().map(Language::as_str).collect::<Vec<_>>(),
        ["zh_hk", "zh_cn"]
    );
    assert_eq!(String::from_utf8(doc.to_json().unwrap()).unwrap(), r#"{"zh_hk":1,"zh_cn":2}"#);
}

#[derive(Serialize)]
struct Header<'a> {
    tag: &'a str,
    i18n: I18nDocument<&'a str>,
}

#[test]
fn document_embeds_inside_other_values() {
    let doc = I18nDocument::from_fragments([
        LanguageFragment::new(Language::CHINESE, "标题"),
        LanguageFragment::new(Language::ENGLISH, "Title"),
    ]);
    let wrapped = Header {
        tag: "plain_text",
        i18n: doc,
    };
    assert_eq!(
        serde_json::to_string(&wrapped).unwrap(),
        r#"{"tag":"plain_text","i18n":{"zh_cn":"标题","en_us":"Title"}}"#
    );
}

#[test]
fn failing_fragment_discards_whole_document() {
    let mut keys = std::collections::BTreeMap::new();
    keys.insert((1, 2), "tuple keys cannot be JSON object keys");

    let err = assemble([
        LanguageFragment::new(Language::ENGLISH, None),
        LanguageFragment::new(Language::CHINESE, Some(keys)),
    ])
    .unwrap_err();

    match err {
        Error::Serialization { language, .. } => assert_eq!(language, Language::CHINESE),
        other => panic!("expected serialization error, got {other:?}"),
    }
}
