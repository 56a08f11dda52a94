//! Multi-language document assembly
//!
//! Rich text bodies, card titles and card element lists are all sent as a
//! JSON object keyed by language tag. Clients render languages in the order
//! the keys appear, so assembly keeps first-seen order and drops later
//! fragments for a language that is already present.

use std::borrow::Cow;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::value::RawValue;

use crate::{Error, Result};

/// Opaque language tag such as `zh_cn`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Language(Cow<'static, str>);

impl Language {
    /// Simplified Chinese
    pub const CHINESE: Self = Self(Cow::Borrowed("zh_cn"));
    /// English
    pub const ENGLISH: Self = Self(Cow::Borrowed("en_us"));
    /// Japanese
    pub const JAPANESE: Self = Self(Cow::Borrowed("ja_jp"));

    /// Create a language tag from any string
    #[must_use]
    pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
        Self(tag.into())
    }

    /// The tag as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Language {
    fn from(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }
}

impl From<String> for Language {
    fn from(tag: String) -> Self {
        Self(Cow::Owned(tag))
    }
}

/// One language's share of a multi-language document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageFragment<T> {
    /// Language tag
    pub language: Language,
    /// Content rendered for that language
    pub content: T,
}

impl<T> LanguageFragment<T> {
    /// Tag `content` with `language`
    pub fn new(language: impl Into<Language>, content: T) -> Self {
        Self {
            language: language.into(),
            content,
        }
    }
}

/// Language-keyed document with stable key order
///
/// Serializes as a JSON object whose keys appear in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I18nDocument<T> {
    entries: Vec<(Language, T)>,
}

impl<T> Default for I18nDocument<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> I18nDocument<T> {
    /// Merge fragments, keeping the first fragment seen for each language
    ///
    /// `None` entries are skipped without affecting the order of the rest.
    pub fn from_fragments<I, F>(fragments: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Option<LanguageFragment<T>>>,
    {
        let mut document = Self::default();
        for fragment in fragments.into_iter().filter_map(Into::into) {
            document.insert(fragment.language, fragment.content);
        }
        document
    }

    /// Insert `content` unless `language` is already present
    ///
    /// Returns whether the entry was added.
    pub fn insert(&mut self, language: Language, content: T) -> bool {
        if self.contains(&language) {
            return false;
        }
        self.entries.push((language, content));
        true
    }

    /// Whether `language` has an entry
    #[must_use]
    pub fn contains(&self, language: &Language) -> bool {
        self.entries.iter().any(|(l, _)| l == language)
    }

    /// Content for `language`
    #[must_use]
    pub fn get(&self, language: &Language) -> Option<&T> {
        self.entries
            .iter()
            .find_map(|(l, content)| (l == language).then_some(content))
    }

    /// Languages in output order
    pub fn languages(&self) -> impl Iterator<Item = &Language> {
        self.entries.iter().map(|(l, _)| l)
    }

    /// Entries in output order
    pub fn iter(&self) -> impl Iterator<Item = (&Language, &T)> {
        self.entries.iter().map(|(l, content)| (l, content))
    }

    /// Number of distinct languages
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<U> I18nDocument<Vec<U>> {
    /// Group items by language, appending items for repeated languages
    ///
    /// Key order is still first-seen; unlike [`from_fragments`](I18nDocument::from_fragments)
    /// nothing is dropped.
    pub fn grouped<I>(items: I) -> Self
    where
        I: IntoIterator<Item = (Language, U)>,
    {
        let mut document = Self::default();
        for (language, item) in items {
            match document.entries.iter_mut().find(|(l, _)| *l == language) {
                Some((_, group)) => group.push(item),
                None => document.entries.push((language, vec![item])),
            }
        }
        document
    }
}

impl<T: Serialize> I18nDocument<T> {
    /// Render to JSON bytes
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] naming the first language whose
    /// content fails to encode; no partial output is produced
    pub fn to_json(&self) -> Result<Vec<u8>> {
        self.render().map(String::into_bytes)
    }

    /// Render to a pre-encoded JSON value for embedding in a payload
    ///
    /// # Errors
    ///
    /// Same as [`to_json`](Self::to_json)
    pub fn to_raw_value(&self) -> Result<Box<RawValue>> {
        Ok(RawValue::from_string(self.render()?)?)
    }

    fn render(&self) -> Result<String> {
        let mut out = String::with_capacity(self.entries.len() * 48);
        out.push('{');
        for (i, (language, content)) in self.entries.iter().enumerate() {
            let tagged = |source| Error::Serialization {
                language: language.clone(),
                source,
            };
            if i > 0 {
                out.push(',');
            }
            out.push_str(&serde_json::to_string(language.as_str()).map_err(tagged)?);
            out.push(':');
            out.push_str(&serde_json::to_string(content).map_err(tagged)?);
        }
        out.push('}');
        Ok(out)
    }
}

impl<T: Serialize> Serialize for I18nDocument<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (language, content) in &self.entries {
            map.serialize_entry(language.as_str(), content)?;
        }
        map.end()
    }
}

/// Merge language fragments into one JSON object
///
/// # Errors
///
/// Returns [`Error::Serialization`] if any fragment's content cannot be
/// encoded
pub fn assemble<T, I, F>(fragments: I) -> Result<Vec<u8>>
where
    T: Serialize,
    I: IntoIterator<Item = F>,
    F: Into<Option<LanguageFragment<T>>>,
{
    I18nDocument::from_fragments(fragments).to_json()
}
