use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_yaml::Value;

use crate::content::ContentHeader;
use crate::error::IngestionError;

const FRONT_MATTER_DELIMITER: &str = "---";

/// Splits a raw post into its metadata block and its markdown body.
///
/// Two header styles are understood:
///
/// ```text
/// ---                              <!--
/// title: Season one is live        [TITLE]: # (Season one is live)
/// date: 2026-02-10                 [DATE]: # (2026-02-10)
/// tags: [starknet, gaming]         [TAGS]: # (starknet gaming)
/// ---                              -->
/// ```
///
/// The comment wrapper around the second style is optional. A post with no
/// recognizable header comes back with an empty `ContentHeader` and the whole
/// text as body.
///
/// When the header has no title, a leading `# Heading` in the body is used
/// and removed from it.
pub fn parse_header(file_name: &Path, raw: &str) -> Result<(ContentHeader, String), IngestionError> {
    let lines: Vec<&str> = raw.lines().collect();
    let first = lines.iter().position(|l| !l.trim().is_empty());

    let (mut header, body_start) = match first {
        Some(idx) if lines[idx].trim() == FRONT_MATTER_DELIMITER => {
            parse_front_matter(file_name, &lines, idx + 1)?
        }
        Some(idx) => parse_comment_header(file_name, &lines, idx)?,
        None => (ContentHeader::default(), lines.len()),
    };

    let mut body_lines = &lines[body_start.min(lines.len())..];
    if header.title.is_none() {
        if let Some(pos) = body_lines.iter().position(|l| !l.trim().is_empty()) {
            if let Some(title) = body_lines[pos].strip_prefix("# ") {
                header.title = Some(title.trim().to_string());
                body_lines = &body_lines[pos + 1..];
            }
        }
    }

    let first_content = body_lines.iter().position(|l| !l.trim().is_empty()).unwrap_or(body_lines.len());
    let mut body = String::new();
    for line in &body_lines[first_content..] {
        body.push_str(line);
        body.push('\n');
    }

    Ok((header, body))
}

/// Fields of a `---` block. Unknown keys are ignored; values stay loosely
/// typed so that `ingest` decides what is valid.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FrontMatter {
    title: Option<Value>,
    #[serde(alias = "description")]
    excerpt: Option<Value>,
    author: Option<Value>,
    date: Option<Value>,
    #[serde(rename = "type")]
    scroll_type: Option<Value>,
    tags: Option<FrontMatterTags>,
    published: Option<Value>,
    #[serde(alias = "cover_image")]
    cover_image: Option<Value>,
    #[serde(alias = "canonical_url")]
    canonical_url: Option<Value>,
}

/// `tags: [a, b]`, a block list, or `tags: a, b`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FrontMatterTags {
    List(Vec<Value>),
    Text(String),
}

impl From<FrontMatter> for ContentHeader {
    fn from(fm: FrontMatter) -> Self {
        let tags = match fm.tags {
            Some(FrontMatterTags::List(items)) => items.into_iter()
                .filter_map(|v| scalar_to_string(Some(v)))
                .filter(|t| !t.is_empty())
                .collect(),
            Some(FrontMatterTags::Text(text)) => extract_tags(&text),
            None => vec![],
        };

        ContentHeader {
            title: scalar_to_string(fm.title),
            excerpt: scalar_to_string(fm.excerpt),
            author: scalar_to_string(fm.author),
            date: scalar_to_string(fm.date),
            scroll_type: scalar_to_string(fm.scroll_type),
            tags,
            published: scalar_to_string(fm.published),
            cover_image: scalar_to_string(fm.cover_image),
            canonical_url: scalar_to_string(fm.canonical_url),
        }
    }
}

// Nested mappings and sequences are not scalars, they read as absent
fn scalar_to_string(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_front_matter(file_name: &Path, lines: &[&str], start: usize) -> Result<(ContentHeader, usize), IngestionError> {
    let Some(len) = lines[start.min(lines.len())..].iter().position(|l| l.trim() == FRONT_MATTER_DELIMITER) else {
        return Err(IngestionError::UnterminatedMetadata { file: file_name.to_path_buf() });
    };
    let end = start + len;

    let block = &lines[start..end];
    if block.iter().all(|l| l.trim().is_empty() || l.trim_start().starts_with('#')) {
        return Ok((ContentHeader::default(), end + 1));
    }

    let front_matter: Option<FrontMatter> = serde_yaml::from_str(&block.join("\n"))
        .map_err(|e| IngestionError::InvalidMetadata { file: file_name.to_path_buf(), reason: e.to_string() })?;

    Ok((front_matter.unwrap_or_default().into(), end + 1))
}

fn parse_comment_header(file_name: &Path, lines: &[&str], start: usize) -> Result<(ContentHeader, usize), IngestionError> {
    let mut header = ContentHeader::default();
    let mut idx = start;

    let start_with_comment = lines[idx].trim() == "<!--";
    if start_with_comment {
        idx += 1;
    }

    let mut found = false;
    while let Some(line) = lines.get(idx) {
        if line.trim().is_empty() {
            idx += 1;
            continue;
        }

        let Some((key, val)) = extract_comment_header(line) else {
            break;
        };
        set_field(&mut header, key, val);
        found = true;
        idx += 1;
    }

    if start_with_comment {
        // Let's find the end of the comment
        loop {
            let Some(line) = lines.get(idx) else {
                return Err(IngestionError::UnterminatedMetadata { file: file_name.to_path_buf() });
            };
            idx += 1;
            if line.trim() == "-->" {
                break;
            }
        }
    } else if !found {
        // No header at all, everything is body
        return Ok((header, start));
    }

    Ok((header, idx))
}

fn set_field(header: &mut ContentHeader, key: &str, val: &str) {
    let val = unquote(val);
    let key = key.to_ascii_lowercase().replace(['_', '-'], "");
    match key.as_str() {
        "title" => header.title = Some(val.to_string()),
        "excerpt" | "description" => header.excerpt = Some(val.to_string()),
        "author" => header.author = Some(val.to_string()),
        "date" => header.date = Some(val.to_string()),
        "type" => header.scroll_type = Some(val.to_string()),
        "tags" => header.tags = extract_tags(val),
        "published" => header.published = Some(val.to_string()),
        "coverimage" => header.cover_image = Some(val.to_string()),
        "canonicalurl" => header.canonical_url = Some(val.to_string()),
        _ => {}
    }
}

fn unquote(val: &str) -> &str {
    let val = val.trim();
    for quote in ['"', '\''] {
        if val.len() >= 2 && val.starts_with(quote) && val.ends_with(quote) {
            return &val[1..val.len() - 1];
        }
    }
    val
}

/// Comment header values: `[a, b]` and `a, b` are comma separated, anything else is split on
/// whitespace.
fn extract_tags(tags_str: &str) -> Vec<String> {
    let trimmed = tags_str.trim();
    let (inner, comma_separated) = match trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        Some(inner) => (inner, true),
        None => (trimmed, trimmed.contains(',')),
    };

    let parts: Vec<&str> = if comma_separated {
        inner.split(',').collect()
    } else {
        inner.split_whitespace().collect()
    };

    parts.into_iter()
        .map(unquote)
        .filter(|x| !x.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn extract_comment_header(line: &str) -> Option<(&str, &str)> {
    lazy_static! {
        static ref HEADER_REGEX: Regex = Regex::new(r"\[(?P<key>\w+)\]: # \((?P<value>.+)\)").unwrap();
    }
    extract_header_key_val(line, &HEADER_REGEX)
}

fn extract_header_key_val<'a>(line: &'a str, header_regex: &Regex) -> Option<(&'a str, &'a str)> {
    header_regex.captures(line).and_then(|cap| {
        let key = cap.name("key").map(|key| key.as_str());
        let val = cap.name("value").map(|val| val.as_str());
        match (key, val) {
            (Some(key), Some(val)) => Some((key, val)),
            _ => None
        }
    })
}
