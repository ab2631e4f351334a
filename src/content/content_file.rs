use std::{fs, io};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::content::RawDocument;

impl RawDocument {
    pub fn from_file(file_path: &Path) -> io::Result<RawDocument> {
        let (slug, file_date) = match Self::slug_from_path(file_path) {
            None => return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("Could not extract a slug from the file {}", file_path.display()))),
            Some(x) => x,
        };

        let raw_content = fs::read_to_string(file_path)?;

        Ok(RawDocument {
            source: file_path.to_path_buf(),
            slug,
            file_date,
            raw_content,
        })
    }

    pub fn from_string(source: PathBuf, slug: &str, raw_content: &str) -> RawDocument {
        RawDocument {
            source,
            slug: slug.to_string(),
            file_date: None,
            raw_content: raw_content.to_string(),
        }
    }

    /// `2026-02-10-season-one.md` gives `("season-one", 2026-02-10)`.
    /// Without a date prefix the whole stem is the slug.
    pub fn slug_from_path(path: &Path) -> Option<(String, Option<NaiveDate>)> {
        lazy_static! {
            static ref FILE_NAME_REGEX: Regex = Regex::new(
                r"^(?P<y>\d{4})-(?P<m>\d{2})-(?P<d>\d{2})-(?P<slug>.+)$"
            ).unwrap();
        }

        let stem = path.file_stem()?.to_str()?;
        if stem.is_empty() {
            return None;
        }

        if let Some(caps) = FILE_NAME_REGEX.captures(stem) {
            let date = NaiveDate::from_ymd_opt(
                caps["y"].parse().ok()?,
                caps["m"].parse().ok()?,
                caps["d"].parse().ok()?,
            );
            if date.is_some() {
                return Some((caps["slug"].to_string(), date));
            }
        }

        Some((stem.to_string(), None))
    }
}
