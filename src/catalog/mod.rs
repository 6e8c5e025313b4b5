//! Catalog data model.
//!
//! The engine never owns the document catalog; every call receives an
//! authoritative snapshot of [`DocumentDescriptor`] records from the host
//! platform and reads them through the explicit locale fallback in
//! [`DocumentDescriptor::translation`].


use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::SEGMENT_DELIMITER;

/// Language tag selecting which localized text feeds the embedding and
/// which cached index serves a query.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English. The default locale; missing translations fall back to it.
    #[default]
    En,
    /// Spanish.
    Es,
}

impl Locale {
    /// Returns the lowercase language tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
        }
    }

    /// Returns `true` for the default locale.
    pub const fn is_default(&self) -> bool {
        matches!(self, Locale::En)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "es" => Ok(Locale::Es),
            other => Err(UnknownLocale(other.to_string())),
        }
    }
}

/// Error for language tags outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown locale: {0:?}")]
pub struct UnknownLocale(pub String);

/// Localized text bundle for one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationBundle {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Alternate names; order carries no meaning.
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// One catalog entry as the engine consumes it.
///
/// Owned by the external catalog; the engine only reads it. The `id` is the
/// stable key that ranking results refer back to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentDescriptor {
    pub id: String,
    #[serde(default)]
    pub translations: BTreeMap<Locale, TranslationBundle>,
    /// Locale-independent keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Additional keywords for specific locales.
    #[serde(default)]
    pub keywords_by_locale: BTreeMap<Locale, Vec<String>>,
    #[serde(default)]
    pub category: String,
}

impl DocumentDescriptor {
    /// Returns the translation bundle for `locale`, falling back to the
    /// default locale's bundle when the requested one is absent.
    pub fn translation(&self, locale: Locale) -> Option<&TranslationBundle> {
        self.translations
            .get(&locale)
            .or_else(|| self.translations.get(&Locale::default()))
    }
}

/// Synthesizes the text blob that is embedded in place of the document.
///
/// Segment order is significant: encoders truncate long inputs, so the name
/// and description must come first. Empty segments are skipped. The fixed
/// order is: localized name (default-locale fallback), localized
/// description, aliases, generic keywords, locale-specific keywords
/// (non-default locales only), category, id with separators spaced out.
pub fn descriptor_text(doc: &DocumentDescriptor, locale: Locale) -> String {
    let localized = doc.translations.get(&locale);
    let bundle = doc.translation(locale);

    let name = localized
        .map(|t| t.name.as_str())
        .filter(|name| !name.trim().is_empty())
        .or_else(|| {
            doc.translations
                .get(&Locale::default())
                .map(|t| t.name.as_str())
        })
        .unwrap_or_default();

    let mut segments: Vec<String> = Vec::with_capacity(7);
    push_segment(&mut segments, name);
    if let Some(bundle) = bundle {
        push_segment(&mut segments, &bundle.description);
        push_segment(&mut segments, &bundle.aliases.join(" "));
    }
    push_segment(&mut segments, &doc.keywords.join(" "));
    if !locale.is_default() {
        if let Some(words) = doc.keywords_by_locale.get(&locale) {
            push_segment(&mut segments, &words.join(" "));
        }
    }
    push_segment(&mut segments, &doc.category);
    push_segment(&mut segments, &doc.id.replace(['-', '_'], " "));

    segments.join(SEGMENT_DELIMITER)
}

fn push_segment(segments: &mut Vec<String>, segment: &str) {
    let trimmed = segment.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed.to_string());
    }
}
