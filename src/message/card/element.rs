//! Card body elements
//!
//! A typed rendition of the interactive card schema. Every element serializes
//! with its `tag` discriminator first, followed by its fields; optional fields
//! are omitted when unset.

use serde::Serialize;

/// One block in a card body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "tag")]
pub enum CardElement {
    /// Text block with optional fields and a trailing extra
    #[serde(rename = "div")]
    Div(Div),
    /// Markdown block
    #[serde(rename = "markdown")]
    Markdown(Markdown),
    /// Divider line
    #[serde(rename = "hr")]
    HorizontalRule,
    /// Standalone image
    #[serde(rename = "img")]
    Image(Image),
    /// Small footnote row
    #[serde(rename = "note")]
    Note(Note),
    /// Row of interactive components
    #[serde(rename = "action")]
    Action(Action),
    /// Multi-column layout
    #[serde(rename = "column_set")]
    ColumnSet(ColumnSet),
}

impl From<Div> for CardElement {
    fn from(e: Div) -> Self {
        Self::Div(e)
    }
}

impl From<Markdown> for CardElement {
    fn from(e: Markdown) -> Self {
        Self::Markdown(e)
    }
}

impl From<Image> for CardElement {
    fn from(e: Image) -> Self {
        Self::Image(e)
    }
}

impl From<Note> for CardElement {
    fn from(e: Note) -> Self {
        Self::Note(e)
    }
}

impl From<Action> for CardElement {
    fn from(e: Action) -> Self {
        Self::Action(e)
    }
}

impl From<ColumnSet> for CardElement {
    fn from(e: ColumnSet) -> Self {
        Self::ColumnSet(e)
    }
}

// -- Shared pieces ------------------------------------------------------------

/// How a text block is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMode {
    PlainText,
    #[serde(rename = "lark_md")]
    LarkMarkdown,
}

/// Text object used throughout the card schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Text {
    /// Render mode, serialized as `tag`
    #[serde(rename = "tag")]
    pub mode: TextMode,
    pub content: String,
    /// Maximum visible lines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<u32>,
}

impl Text {
    #[must_use]
    pub fn plain(content: impl Into<String>) -> Self {
        Self::new(TextMode::PlainText, content)
    }

    #[must_use]
    pub fn lark_md(content: impl Into<String>) -> Self {
        Self::new(TextMode::LarkMarkdown, content)
    }

    #[must_use]
    pub fn new(mode: TextMode, content: impl Into<String>) -> Self {
        Self {
            mode,
            content: content.into(),
            lines: None,
        }
    }

    /// Limit the visible lines; `0` means unlimited
    #[must_use]
    pub fn lines(mut self, lines: u32) -> Self {
        self.lines = (lines > 0).then_some(lines);
        self
    }
}

/// Link target with optional per-platform overrides
///
/// Platform links take precedence over `url` on their platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[must_use]
pub struct MultiUrl {
    pub url: String,
    #[serde(rename = "pc_url", skip_serializing_if = "String::is_empty")]
    pub pc: String,
    #[serde(rename = "ios_url", skip_serializing_if = "String::is_empty")]
    pub ios: String,
    #[serde(rename = "android_url", skip_serializing_if = "String::is_empty")]
    pub android: String,
}

impl MultiUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pc: String::new(),
            ios: String::new(),
            android: String::new(),
        }
    }

    pub fn pc(mut self, url: impl Into<String>) -> Self {
        self.pc = url.into();
        self
    }

    pub fn ios(mut self, url: impl Into<String>) -> Self {
        self.ios = url.into();
        self
    }

    pub fn android(mut self, url: impl Into<String>) -> Self {
        self.android = url.into();
        self
    }
}

/// Secondary confirmation dialog shown before an action fires
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirm {
    pub title: Text,
    pub text: Text,
}

impl Confirm {
    #[must_use]
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: Text::plain(title),
            text: Text::plain(text),
        }
    }
}

/// Small image embedded in a div or note
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "tag", rename = "img")]
pub struct ExtraImage {
    pub img_key: String,
    pub alt: Text,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<bool>,
}

impl ExtraImage {
    #[must_use]
    pub fn new(img_key: impl Into<String>, preview: bool, alt: impl Into<String>) -> Self {
        Self {
            img_key: img_key.into(),
            alt: Text::plain(alt),
            preview: Some(preview),
        }
    }
}

// -- div ----------------------------------------------------------------------

/// Trailing element of a div
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Extra {
    Image(ExtraImage),
    Action(ActionComponent),
}

/// One cell in a div's field grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DivField {
    /// Render side by side with neighbouring short fields
    pub is_short: bool,
    pub text: Text,
}

impl DivField {
    #[must_use]
    pub const fn new(is_short: bool, text: Text) -> Self {
        Self { is_short, text }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[must_use]
pub struct Div {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Text>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<DivField>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Extra>,
}

impl Div {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain text body; `lines` of `0` shows every line
    pub fn plain_text(mut self, content: impl Into<String>, lines: u32) -> Self {
        self.text = Some(Text::plain(content).lines(lines));
        self
    }

    pub fn lark_md(mut self, content: impl Into<String>) -> Self {
        self.text = Some(Text::lark_md(content));
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = DivField>) -> Self {
        self.fields = Some(fields.into_iter().collect());
        self
    }

    pub fn extra_image(
        mut self,
        img_key: impl Into<String>,
        preview: bool,
        alt: impl Into<String>,
    ) -> Self {
        self.extra = Some(Extra::Image(ExtraImage::new(img_key, preview, alt)));
        self
    }

    pub fn extra_action(mut self, component: impl Into<ActionComponent>) -> Self {
        self.extra = Some(Extra::Action(component.into()));
        self
    }
}

// -- markdown -----------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Link targets referenced from markdown as `[text]($urlVal)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkdownHref {
    #[serde(rename = "urlVal")]
    pub url_val: MultiUrl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[must_use]
pub struct Markdown {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<MarkdownHref>,
}

impl Markdown {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            text_align: None,
            href: None,
        }
    }

    pub const fn text_align(mut self, align: TextAlign) -> Self {
        self.text_align = Some(align);
        self
    }

    pub fn href(mut self, links: MultiUrl) -> Self {
        self.href = Some(MarkdownHref { url_val: links });
        self
    }
}

// -- img ----------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageMode {
    CropCenter,
    FitHorizontal,
    Stretch,
    Large,
    Medium,
    Small,
    Tiny,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[must_use]
pub struct Image {
    pub img_key: String,
    /// Hover text
    pub alt: Text,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Text>,
    /// Width in pixels, 278 to 580
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_width: Option<u32>,
    /// Render at the compact 278px width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compact_width: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ImageMode>,
    /// Open full size on click
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<bool>,
}

impl Image {
    pub fn new(img_key: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            img_key: img_key.into(),
            alt: Text::plain(alt),
            title: None,
            custom_width: None,
            compact_width: None,
            mode: None,
            preview: None,
        }
    }

    pub fn title(mut self, title: Text) -> Self {
        self.title = Some(title);
        self
    }

    pub const fn custom_width(mut self, px: u32) -> Self {
        self.custom_width = Some(px);
        self
    }

    pub const fn compact_width(mut self, compact: bool) -> Self {
        self.compact_width = Some(compact);
        self
    }

    pub const fn mode(mut self, mode: ImageMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub const fn preview(mut self, preview: bool) -> Self {
        self.preview = Some(preview);
        self
    }
}

// -- note ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NoteElement {
    Text(Text),
    Image(ExtraImage),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[must_use]
pub struct Note {
    pub elements: Vec<NoteElement>,
}

impl Note {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain_text(mut self, s: impl Into<String>) -> Self {
        self.elements.push(NoteElement::Text(Text::plain(s)));
        self
    }

    pub fn lark_md(mut self, s: impl Into<String>) -> Self {
        self.elements.push(NoteElement::Text(Text::lark_md(s)));
        self
    }

    pub fn image(
        mut self,
        img_key: impl Into<String>,
        preview: bool,
        alt: impl Into<String>,
    ) -> Self {
        self.elements
            .push(NoteElement::Image(ExtraImage::new(img_key, preview, alt)));
        self
    }
}

// -- action -------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionLayout {
    /// Two per row
    Bisected,
    /// Three per row
    Trisection,
    /// Wrap as space allows
    Flow,
}

/// Interactive component placed in an action row or a div extra
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "tag", rename_all = "lowercase")]
pub enum ActionComponent {
    Button(Button),
    Overflow(Overflow),
}

impl From<Button> for ActionComponent {
    fn from(b: Button) -> Self {
        Self::Button(b)
    }
}

impl From<Overflow> for ActionComponent {
    fn from(o: Overflow) -> Self {
        Self::Overflow(o)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[must_use]
pub struct Action {
    pub actions: Vec<ActionComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<ActionLayout>,
}

impl Action {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions<C>(mut self, components: impl IntoIterator<Item = C>) -> Self
    where
        C: Into<ActionComponent>,
    {
        self.actions.extend(components.into_iter().map(Into::into));
        self
    }

    pub const fn layout(mut self, layout: ActionLayout) -> Self {
        self.layout = Some(layout);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonType {
    Default,
    Primary,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[must_use]
pub struct Button {
    pub text: Text,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_url: Option<MultiUrl>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ButtonType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm: Option<Confirm>,
}

impl Button {
    pub fn new(mode: TextMode, content: impl Into<String>) -> Self {
        Self {
            text: Text::new(mode, content),
            url: None,
            multi_url: None,
            kind: None,
            confirm: None,
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn multi_url(mut self, links: MultiUrl) -> Self {
        self.multi_url = Some(links);
        self
    }

    pub const fn kind(mut self, kind: ButtonType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn confirm(mut self, title: impl Into<String>, text: impl Into<String>) -> Self {
        self.confirm = Some(Confirm::new(title, text));
        self
    }
}

/// One entry in an overflow menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverflowOption {
    pub text: Text,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_url: Option<MultiUrl>,
}

/// Collapsed "more" menu
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[must_use]
pub struct Overflow {
    pub options: Vec<OverflowOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm: Option<Confirm>,
}

impl Overflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn option_url(mut self, text: impl Into<String>, url: impl Into<String>) -> Self {
        self.options.push(OverflowOption {
            text: Text::plain(text),
            url: Some(url.into()),
            multi_url: None,
        });
        self
    }

    pub fn option_multi_url(mut self, text: impl Into<String>, links: MultiUrl) -> Self {
        self.options.push(OverflowOption {
            text: Text::plain(text),
            url: None,
            multi_url: Some(links),
        });
        self
    }

    pub fn confirm(mut self, title: impl Into<String>, text: impl Into<String>) -> Self {
        self.confirm = Some(Confirm::new(title, text));
        self
    }
}

// -- column_set ---------------------------------------------------------------

/// How columns adapt on narrow screens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexMode {
    /// Keep the layout, shrink the columns
    #[default]
    None,
    /// Stack columns at full width
    Stretch,
    /// Wrap columns as space allows
    Flow,
    /// Two per row
    Bisect,
    /// Three per row
    Trisect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundStyle {
    Default,
    Grey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalSpacing {
    Default,
    Small,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSetAction {
    pub multi_url: MultiUrl,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[must_use]
pub struct ColumnSet {
    pub flex_mode: FlexMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_style: Option<BackgroundStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal_spacing: Option<HorizontalSpacing>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<Column>,
    /// Click target for the whole set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ColumnSetAction>,
}

impl ColumnSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn flex_mode(mut self, mode: FlexMode) -> Self {
        self.flex_mode = mode;
        self
    }

    pub const fn background_style(mut self, style: BackgroundStyle) -> Self {
        self.background_style = Some(style);
        self
    }

    pub const fn horizontal_spacing(mut self, spacing: HorizontalSpacing) -> Self {
        self.horizontal_spacing = Some(spacing);
        self
    }

    pub fn action_multi_url(mut self, links: MultiUrl) -> Self {
        self.action = Some(ColumnSetAction { multi_url: links });
        self
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.columns.extend(columns);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnWidth {
    Auto,
    Weighted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    Center,
    Bottom,
}

/// One column of a [`ColumnSet`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "tag", rename = "column")]
#[must_use]
pub struct Column {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<ColumnWidth>,
    /// Relative width when `width` is weighted, 1 to 5
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<VerticalAlign>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<CardElement>,
}

impl Column {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn width(mut self, width: ColumnWidth) -> Self {
        self.width = Some(width);
        self
    }

    pub const fn weight(mut self, weight: u32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub const fn vertical_align(mut self, align: VerticalAlign) -> Self {
        self.vertical_align = Some(align);
        self
    }

    pub fn elements<E>(mut self, elements: impl IntoIterator<Item = E>) -> Self
    where
        E: Into<CardElement>,
    {
        self.elements.extend(elements.into_iter().map(Into::into));
        self
    }
}
