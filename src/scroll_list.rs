use std::{fs, io};
use std::path::{Path, PathBuf};

use spdlog::{debug, info};

use crate::content::RawDocument;

const SCROLL_EXTENSIONS: [&str; 2] = ["md", "markdown"];

pub struct ScrollList {
    pub root_dir: PathBuf,
}

impl ScrollList {
    pub fn new(root_dir: &Path) -> ScrollList {
        ScrollList { root_dir: root_dir.to_path_buf() }
    }

    /// Markdown files directly inside the scroll directory, sorted by path.
    pub fn retrieve_files(&self) -> io::Result<Vec<PathBuf>> {
        let mut posts = vec![];
        for entry in fs::read_dir(self.root_dir.as_path())? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let path = entry.path();
            let is_markdown = path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| SCROLL_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false);

            if is_markdown {
                posts.push(path);
            } else {
                debug!("Skipping non markdown file {}", path.display());
            }
        }

        posts.sort();
        Ok(posts)
    }

    pub fn read_raw_documents(&self) -> io::Result<Vec<RawDocument>> {
        let files = self.retrieve_files()?;
        info!("Found {} scroll files in {}", files.len(), self.root_dir.display());

        files.iter()
            .map(|file| RawDocument::from_file(file))
            .collect()
    }
}
