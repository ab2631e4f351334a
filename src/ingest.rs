use std::collections::HashMap;
use std::path::PathBuf;

use spdlog::{debug, info, warn};

use crate::content::{RawDocument, ScrollPost, ScrollType};
use crate::content::markdown_renderer::{plain_text, MarkdownRenderer};
use crate::content::parsing_utils::parse_header;
use crate::error::IngestionError;
use crate::scroll_index::ScrollIndex;
use crate::text_utils::{parse_date, reading_time_minutes, word_count, WORDS_PER_MINUTE};

const MORE_TAG: &str = "<!-- more -->";
const DEFAULT_AUTHOR: &str = "Unknown";

#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub words_per_minute: u32,
    pub default_author: String,
}

impl Default for IngestOptions {
    fn default() -> Self {
        IngestOptions {
            words_per_minute: WORDS_PER_MINUTE,
            default_author: DEFAULT_AUTHOR.to_string(),
        }
    }
}

/// Turns raw documents into a query-ready index. The first invalid document
/// aborts the whole ingestion.
pub fn ingest(raw_documents: Vec<RawDocument>, options: &IngestOptions) -> Result<ScrollIndex, IngestionError> {
    let mut sources: HashMap<String, PathBuf> = HashMap::new();
    let mut posts = Vec::with_capacity(raw_documents.len());

    for raw in raw_documents {
        if let Some(first) = sources.get(&raw.slug) {
            return Err(IngestionError::DuplicateSlug {
                slug: raw.slug.clone(),
                first: first.display().to_string(),
                second: raw.source.display().to_string(),
            });
        }

        let post = build_post(&raw, options)?;
        debug!("Ingested scroll post {} ({} min read)", post.slug, post.reading_time_minutes);
        sources.insert(raw.slug, raw.source);
        posts.push(post);
    }

    let index = ScrollIndex::from_posts(posts)?;
    info!("Ingested {} scroll posts, {} published", index.all().len(), index.published_count());
    Ok(index)
}

pub fn build_post(raw: &RawDocument, options: &IngestOptions) -> Result<ScrollPost, IngestionError> {
    let file = &raw.source;
    let (header, body) = parse_header(file, &raw.raw_content)?;

    let title = required(file, "title", header.title)?;

    let date = match (header.date, raw.file_date) {
        (Some(value), file_date) => {
            let date = parse_date(&value)
                .map_err(|_| IngestionError::MalformedDate { file: file.clone(), value })?;
            if let Some(file_date) = file_date.filter(|d| *d != date) {
                warn!("Date {} in the metadata differs from the file name date {} - file={}", date, file_date, file.display());
            }
            date
        }
        (None, Some(file_date)) => file_date,
        (None, None) => return Err(IngestionError::MissingField { file: file.clone(), field: "date" }),
    };

    let type_str = required(file, "type", header.scroll_type)?;
    let scroll_type: ScrollType = type_str.parse()
        .map_err(|_| IngestionError::UnknownType { file: file.clone(), value: type_str })?;

    let published = match header.published {
        None => true,
        Some(value) => parse_bool(&value)
            .ok_or_else(|| IngestionError::InvalidValue { file: file.clone(), field: "published", value })?,
    };

    let to_render_error = |reason| IngestionError::Render { file: file.clone(), reason };
    let plain = plain_text(&body).map_err(to_render_error)?;
    let rendered = MarkdownRenderer::render(&body).map_err(to_render_error)?;

    let excerpt = match header.excerpt {
        Some(excerpt) => excerpt,
        None => excerpt_from_body(&body).map_err(to_render_error)?,
    };
    let author = header.author
        .filter(|a| !a.trim().is_empty())
        .unwrap_or_else(|| options.default_author.clone());

    Ok(ScrollPost {
        slug: raw.slug.clone(),
        title,
        excerpt,
        author,
        date,
        scroll_type,
        tags: header.tags,
        published,
        reading_time_minutes: reading_time_minutes(word_count(&plain), options.words_per_minute),
        body: rendered,
        cover_image: header.cover_image.filter(|s| !s.is_empty()),
        canonical_url: header.canonical_url.filter(|s| !s.is_empty()),
    })
}

fn required(file: &PathBuf, field: &'static str, value: Option<String>) -> Result<String, IngestionError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(IngestionError::MissingField { file: file.clone(), field }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" => Some(true),
        "false" | "no" => Some(false),
        _ => None,
    }
}

/// Plain text before `<!-- more -->`, whitespace collapsed. Empty when the
/// body has no break marker.
fn excerpt_from_body(body: &str) -> Result<String, String> {
    let Some(end) = body.find(MORE_TAG) else {
        return Ok(String::new());
    };
    let text = plain_text(&body[..end])?;
    Ok(text.split_whitespace().collect::<Vec<_>>().join(" "))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::error::QueryError;
    use crate::test_data::{POST_DATA_FRONT_MATTER, POST_DATA_COMMENT_HEADER, POST_DATA_UNPUBLISHED};

    use super::*;

    fn raw(slug: &str, content: &str) -> RawDocument {
        RawDocument::from_string(PathBuf::from(format!("scroll/{}.md", slug)), slug, content)
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn minimal(title: &str, date: &str, body: &str) -> String {
        format!("---\ntitle: {}\ndate: {}\ntype: update\n---\n{}\n", title, date, body)
    }

    #[test]
    fn test_build_post_front_matter() {
        let post = build_post(&raw("season-one", POST_DATA_FRONT_MATTER), &IngestOptions::default()).unwrap();

        assert_eq!(post.slug, "season-one");
        assert_eq!(post.title, "Season One: The Realms Awaken");
        assert_eq!(post.excerpt, "Everything you need to know about the first season.");
        assert_eq!(post.author, "Realms Team");
        assert_eq!(post.date, NaiveDate::from_ymd_opt(2026, 2, 10).unwrap());
        assert_eq!(post.scroll_type, ScrollType::Update);
        assert_eq!(post.tags, ["starknet", "gaming"]);
        assert!(post.published);
        assert_eq!(post.reading_time_minutes, 1);
        assert_eq!(post.cover_image.as_deref(), Some("/images/scroll/season-one.png"));
        assert!(post.body.contains("<strong>on-chain loot</strong>"));
        assert!(!post.body.contains("more"));
    }

    #[test]
    fn test_build_post_comment_header() {
        let options = IngestOptions { words_per_minute: 200, default_author: "Realms Team".to_string() };
        let post = build_post(&raw("on-ownership", POST_DATA_COMMENT_HEADER), &options).unwrap();

        assert_eq!(post.title, "On Ownership in Games");
        assert_eq!(post.author, "Lore Keeper");
        assert_eq!(post.scroll_type, ScrollType::ThoughtPiece);
        assert_eq!(post.excerpt, "Why owning your items matters.");
        assert!(post.body.starts_with("<p>Players have always"));
    }

    #[test]
    fn test_default_author_and_excerpt() {
        let content = minimal("Patch notes", "2026-02-01", "Short intro.\n\n<!-- more -->\n\nDetails.");
        let post = build_post(&raw("patch", &content), &IngestOptions::default()).unwrap();
        assert_eq!(post.author, "Unknown");
        assert_eq!(post.excerpt, "Short intro.");
        assert!(post.tags.is_empty());
    }

    #[test]
    fn test_reading_time() {
        let post = build_post(&raw("r400", &minimal("R", "2026-02-01", &words(400))), &IngestOptions::default()).unwrap();
        assert_eq!(post.reading_time_minutes, 2);

        let post = build_post(&raw("r401", &minimal("R", "2026-02-01", &words(401))), &IngestOptions::default()).unwrap();
        assert_eq!(post.reading_time_minutes, 3);
    }

    #[test]
    fn test_reading_time_ignores_markdown_syntax() {
        let body = format!(
            "## Drops\n\n{}\n\n| Item | Rarity |\n|---|---|\n| Sword | rare |\n| Shield | common |\n\n- one\n- two\n",
            words(188),
        );
        let post = build_post(&raw("table", &minimal("T", "2026-02-01", &body)), &IngestOptions::default()).unwrap();
        // 1 heading word, 188 prose words, 6 cells, 2 list items
        assert_eq!(post.reading_time_minutes, 1);

        let body = format!("{}\n\n- one\n- two\n", words(199));
        let post = build_post(&raw("list", &minimal("T", "2026-02-01", &body)), &IngestOptions::default()).unwrap();
        assert_eq!(post.reading_time_minutes, 2);
    }

    #[test]
    fn test_excerpt_fallback_is_plain_text() {
        let body = "Season **one** is [live](https://example.com) now.\n\n<!-- more -->\n\nDetails.";
        let post = build_post(&raw("plain", &minimal("P", "2026-02-01", body)), &IngestOptions::default()).unwrap();
        assert_eq!(post.excerpt, "Season one is live now.");
    }

    #[test]
    fn test_front_matter_yaml_semantics() {
        let content = "---\ntitle: Y\ndate: 2026-02-01\ntype: update\npublished: false # not yet\ntags: [\"web3, gaming\", starknet]\n---\nBody";
        let post = build_post(&raw("yaml", content), &IngestOptions::default()).unwrap();
        assert!(!post.published);
        assert_eq!(post.tags, ["web3, gaming", "starknet"]);
    }

    #[test]
    fn test_date_from_file_name() {
        let mut doc = raw("no-date", "---\ntitle: T\ntype: update\n---\nBody");
        doc.file_date = NaiveDate::from_ymd_opt(2026, 3, 1);
        let post = build_post(&doc, &IngestOptions::default()).unwrap();
        assert_eq!(post.date, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    }

    #[test]
    fn test_missing_fields() {
        let opts = IngestOptions::default();

        let res = build_post(&raw("x", "---\ndate: 2026-02-01\ntype: update\n---\nBody"), &opts);
        assert_eq!(res, Err(IngestionError::MissingField { file: PathBuf::from("scroll/x.md"), field: "title" }));

        let res = build_post(&raw("x", "---\ntitle: T\ntype: update\n---\nBody"), &opts);
        assert_eq!(res, Err(IngestionError::MissingField { file: PathBuf::from("scroll/x.md"), field: "date" }));

        let res = build_post(&raw("x", "---\ntitle: T\ndate: 2026-02-01\n---\nBody"), &opts);
        assert_eq!(res, Err(IngestionError::MissingField { file: PathBuf::from("scroll/x.md"), field: "type" }));
    }

    #[test]
    fn test_invalid_values() {
        let opts = IngestOptions::default();

        let res = build_post(&raw("x", "---\ntitle: T\ndate: 2026-02-31\ntype: update\n---\n"), &opts);
        assert_eq!(res, Err(IngestionError::MalformedDate { file: PathBuf::from("scroll/x.md"), value: "2026-02-31".to_string() }));

        let res = build_post(&raw("x", "---\ntitle: T\ndate: 2026-02-01\ntype: memo\n---\n"), &opts);
        assert_eq!(res, Err(IngestionError::UnknownType { file: PathBuf::from("scroll/x.md"), value: "memo".to_string() }));

        let res = build_post(&raw("x", "---\ntitle: T\ndate: 2026-02-01\ntype: update\npublished: maybe\n---\n"), &opts);
        assert_eq!(res, Err(IngestionError::InvalidValue {
            file: PathBuf::from("scroll/x.md"),
            field: "published",
            value: "maybe".to_string(),
        }));
    }

    #[test]
    fn test_ingest_ordering_and_visibility() {
        let index = ingest(vec![
            raw("feb-10", &minimal("Ten", "2026-02-10", "a")),
            raw("draft", POST_DATA_UNPUBLISHED),
            raw("feb-11", &minimal("Eleven", "2026-02-11", "b")),
        ], &IngestOptions::default()).unwrap();

        let listed: Vec<&str> = index.list_published().iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(listed, ["feb-11", "feb-10"]);
        assert_eq!(index.all().len(), 3);
        assert_eq!(index.find_by_slug("draft"), Err(QueryError::NotFound("draft".to_string())));
    }

    #[test]
    fn test_ingest_duplicate_slug() {
        let res = ingest(vec![
            raw("same", &minimal("One", "2026-02-10", "a")),
            raw("other", &minimal("Two", "2026-02-11", "b")),
            raw("same", &minimal("Three", "2026-02-12", "c")),
        ], &IngestOptions::default());

        assert_eq!(res.unwrap_err(), IngestionError::DuplicateSlug {
            slug: "same".to_string(),
            first: "scroll/same.md".to_string(),
            second: "scroll/same.md".to_string(),
        });
    }

    #[test]
    fn test_ingest_fails_on_any_invalid_document() {
        let res = ingest(vec![
            raw("good", &minimal("Good", "2026-02-10", "a")),
            raw("bad", "---\ntitle: Bad\n---\n"),
        ], &IngestOptions::default());
        assert!(matches!(res, Err(IngestionError::MissingField { field: "date", .. })));
    }
}
