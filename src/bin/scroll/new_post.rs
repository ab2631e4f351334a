use std::fmt::Write;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};

use scroll::text_utils::slugify;
use scroll::ScrollType;

use crate::{NewArgs, PostOutput};

fn get_author(args: &NewArgs) -> String {
    if let Some(ref name) = args.author {
        return name.clone();
    }

    let name = whoami::realname();
    if name.is_empty() {
        return whoami::username();
    }
    name
}

// Double-quoted YAML scalar
fn yaml_quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn render_header(title: &str, author: &str, date: &NaiveDate, scroll_type: ScrollType) -> String {
    let mut buf = String::new();

    let _ = writeln!(&mut buf, "---");
    let _ = writeln!(&mut buf, "title: {}", yaml_quoted(title));
    let _ = writeln!(&mut buf, "author: {}", yaml_quoted(author));
    let _ = writeln!(&mut buf, "date: {}", date.format("%Y-%m-%d"));
    let _ = writeln!(&mut buf, "type: {}", scroll_type);
    let _ = writeln!(&mut buf, "tags: []");
    let _ = writeln!(&mut buf, "published: false");
    let _ = writeln!(&mut buf, "---");
    let _ = writeln!(&mut buf);
    buf
}

fn render_body() -> String {
    let mut buf = String::new();

    let _ = writeln!(&mut buf, "This is a body example");
    let _ = writeln!(&mut buf, "Please remove it and replace with your content");
    let _ = writeln!(&mut buf);
    let _ = writeln!(&mut buf, "<!-- more -->");
    let _ = writeln!(&mut buf);
    let _ = writeln!(&mut buf, "And this is the rest of your post");

    buf
}

fn post_file_name(title: &str, date: &NaiveDate) -> Option<String> {
    let slug = slugify(title);
    if slug.is_empty() {
        return None;
    }
    Some(format!("{}-{}.md", date.format("%Y-%m-%d"), slug))
}

pub fn new_cmd(args: NewArgs, scroll_dir: Option<&Path>) -> Result<()> {
    let author = get_author(&args);
    let date = Utc::now().date_naive();

    let content = format!("{}{}", render_header(&args.title, &author, &date, args.scroll_type), render_body());

    match args.output {
        PostOutput::Stdout => {
            print!("{}", content);
        }
        PostOutput::File => {
            use std::io::Write;
            let Some(file_name) = post_file_name(&args.title, &date) else {
                bail!("Could not derive a slug from the title \"{}\"", args.title);
            };
            let full_path: PathBuf = scroll_dir.map(|d| d.join(&file_name)).unwrap_or_else(|| PathBuf::from(&file_name));
            if full_path.exists() {
                bail!("{} already exists", full_path.display());
            }

            println!("Creating file {}", full_path.display());
            let mut file = File::create(&full_path)
                .with_context(|| format!("Creating {}", full_path.display()))?;
            file.write_all(content.as_bytes())?;
        }
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use scroll::content::RawDocument;
    use scroll::ingest::{build_post, IngestOptions};

    use super::*;

    #[test]
    fn test_post_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
        assert_eq!(post_file_name("Season One: The Realms Awaken", &date), Some("2026-02-10-season-one-the-realms-awaken.md".to_string()));
        assert_eq!(post_file_name("???", &date), None);
    }

    #[test]
    fn test_scaffold_is_ingestible() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
        let content = format!("{}{}", render_header("Season One: Say \"hi\"", "Realms Team", &date, ScrollType::ThoughtPiece), render_body());
        let raw = RawDocument::from_string(PathBuf::from("2026-02-10-say-hi.md"), "say-hi", &content);

        let post = build_post(&raw, &IngestOptions::default()).unwrap();
        assert_eq!(post.title, "Season One: Say \"hi\"");
        assert_eq!(post.author, "Realms Team");
        assert_eq!(post.date, date);
        assert_eq!(post.scroll_type, ScrollType::ThoughtPiece);
        assert!(!post.published);
        assert_eq!(post.excerpt, "This is a body example Please remove it and replace with your content");
    }
}
