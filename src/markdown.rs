//! Formatting helpers for `lark_md` content
//!
//! Card markdown elements and `lark_md` text blocks accept a small markup
//! dialect. These helpers produce its snippets so callers don't hand-write
//! the tags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Color of an inline text tag or card header tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTagColor {
    Neutral,
    Blue,
    Turquoise,
    Lime,
    Orange,
    Violet,
    Indigo,
    Wathet,
    Green,
    Yellow,
    Red,
    Purple,
    Carmine,
}

impl TextTagColor {
    /// Wire name of the color
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Blue => "blue",
            Self::Turquoise => "turquoise",
            Self::Lime => "lime",
            Self::Orange => "orange",
            Self::Violet => "violet",
            Self::Indigo => "indigo",
            Self::Wathet => "wathet",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
            Self::Purple => "purple",
            Self::Carmine => "carmine",
        }
    }
}

impl fmt::Display for TextTagColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line break inside a markdown block
#[must_use]
pub const fn line_break() -> &'static str {
    "\n"
}

#[must_use]
pub fn bold(s: &str) -> String {
    format!("**{s}**")
}

#[must_use]
pub fn italic(s: &str) -> String {
    format!("*{s}*")
}

#[must_use]
pub fn strikethrough(s: &str) -> String {
    format!("~~{s}~~")
}

/// Mention a user by open ID
#[must_use]
pub fn at_person(id: &str, name: &str) -> String {
    format!("<at id={id}>{name}</at>")
}

/// Mention everyone in the chat
#[must_use]
pub const fn at_everyone() -> &'static str {
    "<at id=all></at>"
}

/// Bare link, rendered as the URL itself
#[must_use]
pub fn hyperlink(url: &str) -> String {
    format!("<a href='{url}'></a>")
}

/// Link with display text
#[must_use]
pub fn text_link(text: &str, link: &str) -> String {
    format!("[{text}]({link})")
}

/// Inline image by uploaded image key
#[must_use]
pub fn image(image_key: &str, hover_text: &str) -> String {
    format!("![{hover_text}]({image_key})")
}

#[must_use]
pub const fn horizontal_rule() -> &'static str {
    "\n ---\n"
}

/// Platform emoji by key, e.g. `DONE`
#[must_use]
pub fn emoji(key: &str) -> String {
    format!(":{key}:")
}

#[must_use]
pub fn green_text(s: &str) -> String {
    colored("green", s)
}

#[must_use]
pub fn red_text(s: &str) -> String {
    colored("red", s)
}

#[must_use]
pub fn grey_text(s: &str) -> String {
    colored("grey", s)
}

/// Inline colored tag
#[must_use]
pub fn text_tag(color: TextTagColor, s: &str) -> String {
    format!("<text_tag color='{color}'>{s}</text_tag>")
}

fn colored(color: &str, s: &str) -> String {
    format!("<font color='{color}'>{s}</font>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emphasis() {
        assert_eq!(bold("b"), "**b**");
        assert_eq!(italic("i"), "*i*");
        assert_eq!(strikethrough("s"), "~~s~~");
    }

    #[test]
    fn mentions() {
        assert_eq!(at_person("ou_123", "Ann"), "<at id=ou_123>Ann</at>");
        assert_eq!(at_everyone(), "<at id=all></at>");
    }

    #[test]
    fn links_and_images() {
        assert_eq!(hyperlink("https://a.b"), "<a href='https://a.b'></a>");
        assert_eq!(text_link("docs", "https://a.b"), "[docs](https://a.b)");
        assert_eq!(image("img_v2_x", "hover"), "![hover](img_v2_x)");
    }

    #[test]
    fn decorations() {
        assert_eq!(line_break(), "\n");
        assert_eq!(format!("a{}b", line_break()), "a\nb");
        assert_eq!(horizontal_rule(), "\n ---\n");
        assert_eq!(emoji("DONE"), ":DONE:");
        assert_eq!(green_text("ok"), "<font color='green'>ok</font>");
        assert_eq!(red_text("no"), "<font color='red'>no</font>");
        assert_eq!(grey_text("meh"), "<font color='grey'>meh</font>");
    }

    #[test]
    fn text_tag_uses_wire_color_name() {
        assert_eq!(
            text_tag(TextTagColor::Wathet, "new"),
            "<text_tag color='wathet'>new</text_tag>"
        );
        assert_eq!(
            serde_json::to_string(&TextTagColor::Carmine).unwrap(),
            r#""carmine""#
        );
    }
}
