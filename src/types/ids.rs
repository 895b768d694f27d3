use super::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of the page whose children are read.
///
/// Stored as 32 lowercase hex characters; [`PageId::to_hyphenated`] yields
/// the form the listing endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageId(String);

impl PageId {
    /// Parses a raw hex id, a dashed UUID, or a Notion URL ending in an id.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let cleaned = input.trim().trim_end_matches('/');

        if cleaned.is_empty() {
            return Err(ValidationError::EmptyField("page id"));
        }

        if let Ok(uuid) = Uuid::parse_str(cleaned) {
            return Ok(PageId(uuid.as_simple().to_string()));
        }

        if cleaned.len() == 32 && cleaned.chars().all(|c| c.is_ascii_hexdigit()) {
            return Self::from_hex(cleaned);
        }

        if cleaned.starts_with("http://") || cleaned.starts_with("https://") {
            return Self::extract_from_url(cleaned);
        }

        Err(ValidationError::InvalidId(format!(
            "Could not parse page ID from: {}",
            input
        )))
    }

    fn from_hex(hex: &str) -> Result<Self, ValidationError> {
        if hex.len() == 32 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(PageId(hex.to_lowercase()))
        } else {
            Err(ValidationError::InvalidId(format!(
                "Invalid page ID format: {}",
                hex
            )))
        }
    }

    fn extract_from_url(url: &str) -> Result<Self, ValidationError> {
        lazy_static::lazy_static! {
            static ref ID_REGEX: Regex = Regex::new(
                r"(?:[/-])([a-fA-F0-9]{32}|[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12})(?:[/?#]|$)"
            ).expect("page ID regex is a valid constant pattern");
        }

        ID_REGEX
            .captures(url)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().replace('-', ""))
            .ok_or_else(|| ValidationError::InvalidId(format!("No valid ID found in URL: {}", url)))
            .and_then(|hex| Self::from_hex(&hex))
    }

    /// Returns the canonical non-hyphenated id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the hyphenated UUID form used in API paths.
    pub fn to_hyphenated(&self) -> String {
        format!(
            "{}-{}-{}-{}-{}",
            &self.0[0..8],
            &self.0[8..12],
            &self.0[12..16],
            &self.0[16..20],
            &self.0[20..32]
        )
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for PageId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PageId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PageId::parse(&s).map_err(serde::de::Error::custom)
    }
}
