use std::collections::HashSet;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod content_file;
pub mod markdown_renderer;
pub mod parsing_utils;

/// Category of a scroll post. The set is closed: anything else in the
/// metadata fails ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScrollType {
    Update,
    ThoughtPiece,
}

impl ScrollType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollType::Update => "update",
            ScrollType::ThoughtPiece => "thought-piece",
        }
    }
}

impl Display for ScrollType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScrollType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "update" => Ok(ScrollType::Update),
            "thought-piece" | "thoughtpiece" => Ok(ScrollType::ThoughtPiece),
            other => Err(format!("Unknown scroll type {}", other)),
        }
    }
}

/// A source file before any metadata has been interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    /// Where the document came from, used in error messages.
    pub source: PathBuf,
    pub slug: String,
    /// Date encoded in the file name, if any.
    pub file_date: Option<NaiveDate>,
    pub raw_content: String,
}

/// Metadata block of a post, as written by the author.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentHeader {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    pub scroll_type: Option<String>,
    pub tags: Vec<String>,
    pub published: Option<String>,
    pub cover_image: Option<String>,
    pub canonical_url: Option<String>,
}

/// An ingested post. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollPost {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub author: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub scroll_type: ScrollType,
    pub tags: Vec<String>,
    pub published: bool,
    pub reading_time_minutes: u32,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
}

impl ScrollPost {
    pub fn tag_set(&self) -> HashSet<&str> {
        self.tags.iter().map(|t| t.as_str()).collect()
    }
}

impl Display for ScrollPost {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "slug={}, date={}, type={}, author={}, tags=[{}]\ntitle={}",
               self.slug,
               self.date,
               self.scroll_type,
               self.author,
               self.tags.join(", "),
               self.title,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_type_from_str() {
        assert_eq!("update".parse::<ScrollType>(), Ok(ScrollType::Update));
        assert_eq!("Thought-Piece".parse::<ScrollType>(), Ok(ScrollType::ThoughtPiece));
        assert_eq!("thought_piece".parse::<ScrollType>(), Ok(ScrollType::ThoughtPiece));
        assert!("announcement".parse::<ScrollType>().is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let post = ScrollPost {
            slug: "hello".to_string(),
            title: "Hello".to_string(),
            excerpt: "".to_string(),
            author: "team".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
            scroll_type: ScrollType::ThoughtPiece,
            tags: vec!["gaming".to_string()],
            published: true,
            reading_time_minutes: 1,
            body: "<p>hi</p>".to_string(),
            cover_image: None,
            canonical_url: Some("https://example.com/hello".to_string()),
        };

        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["date"], "2026-02-10");
        assert_eq!(json["type"], "thought-piece");
        assert_eq!(json["readingTimeMinutes"], 1);
        assert_eq!(json["canonicalUrl"], "https://example.com/hello");
        assert!(json.get("coverImage").is_none());
    }
}
