use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

use crate::ingest::IngestOptions;
use crate::scroll_index::DEFAULT_SIMILAR_LIMIT;
use crate::text_utils::WORDS_PER_MINUTE;

#[derive(Deserialize, Debug)]
pub struct Paths {
    pub scroll_dir: PathBuf,
    pub output_file: PathBuf,
    pub feed_file: Option<PathBuf>,
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct Defaults {
    pub words_per_minute: u32,
    pub similar_limit: usize,
    pub page_size: u32,
    pub default_author: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            words_per_minute: WORDS_PER_MINUTE,
            similar_limit: DEFAULT_SIMILAR_LIMIT,
            page_size: 10,
            default_author: None,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct Feed {
    pub title: String,
    pub site_url: String,
    pub description: String,
    pub item_count: usize,
}

#[derive(Deserialize, Debug)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone, Debug, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug)]
pub struct Config {
    pub paths: Paths,
    #[serde(default)]
    pub defaults: Defaults,
    pub feed: Option<Feed>,
    pub log: Option<Log>,
}

impl Config {
    pub fn ingest_options(&self) -> IngestOptions {
        let mut options = IngestOptions {
            words_per_minute: self.defaults.words_per_minute,
            ..IngestOptions::default()
        };
        if let Some(ref author) = self.defaults.default_author {
            options.default_author = author.clone();
        }
        options
    }
}

fn parse_path(path: PathBuf) -> PathBuf {
    let Some(str_path) = path.to_str() else {
        return path;
    };
    if !str_path.starts_with("${exe_dir}") {
        return path;
    }

    match env::current_exe().ok().as_deref().and_then(Path::parent).and_then(Path::to_str) {
        Some(exe_dir) => PathBuf::from(str_path.replace("${exe_dir}", exe_dir)),
        None => path,
    }
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.paths = Paths {
        scroll_dir: parse_path(cfg.paths.scroll_dir),
        output_file: parse_path(cfg.paths.output_file),
        feed_file: cfg.paths.feed_file.map(parse_path),
    };

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}
