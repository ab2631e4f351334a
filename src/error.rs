use std::path::PathBuf;

use thiserror::Error;

/// Fatal problems found while building the collection. Any of these halts
/// the build; no partial collection is produced.
#[derive(Debug, Error, PartialEq)]
pub enum IngestionError {
    #[error("missing required field `{field}` - file={}", .file.display())]
    MissingField { file: PathBuf, field: &'static str },

    #[error("malformed date `{value}` - file={}", .file.display())]
    MalformedDate { file: PathBuf, value: String },

    #[error("unknown type `{value}` - file={}", .file.display())]
    UnknownType { file: PathBuf, value: String },

    #[error("invalid value `{value}` for `{field}` - file={}", .file.display())]
    InvalidValue { file: PathBuf, field: &'static str, value: String },

    #[error("metadata block is not valid YAML: {reason} - file={}", .file.display())]
    InvalidMetadata { file: PathBuf, reason: String },

    #[error("end of the metadata block is missing - file={}", .file.display())]
    UnterminatedMetadata { file: PathBuf },

    #[error("error rendering markdown: {reason} - file={}", .file.display())]
    Render { file: PathBuf, reason: String },

    #[error("duplicate slug `{slug}` in {first} and {second}")]
    DuplicateSlug { slug: String, first: String, second: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("scroll post not found: {0}")]
    NotFound(String),

    #[error("page {page} is out of range (page count is {page_count})")]
    PageOutOfRange { page: u32, page_count: u32 },
}
