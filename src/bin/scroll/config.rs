use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use scroll::config::{read_config, Config};

use crate::CFG_FILE_NAME;

fn get_config_path() -> Option<PathBuf> {
    let mut candidates = vec![];

    if let Some(exe_dir) = env::current_exe().ok().and_then(|p| p.parent().map(|d| d.to_path_buf())) {
        candidates.push(exe_dir.join(CFG_FILE_NAME));
    }
    if let Ok(cur_dir) = env::current_dir() {
        candidates.push(cur_dir.join(CFG_FILE_NAME));
    }
    if let Some(cfg_dir) = dirs::config_dir() {
        candidates.push(cfg_dir.join("scroll").join(CFG_FILE_NAME));
    }

    candidates.into_iter().find(|p| p.exists())
}

pub(crate) fn open_config(cfg_path: Option<PathBuf>) -> Result<Config> {
    let config_path = match cfg_path.or_else(get_config_path) {
        Some(path) => path,
        None => return Err(anyhow!("Could not find {}. Please run scroll --help", CFG_FILE_NAME)),
    };

    let mut config = read_config(&config_path)
        .with_context(|| format!("Reading config from {}", config_path.display()))?;

    if let Some(ref mut log) = config.log {
        if log.location.is_none() && !log.log_to_console {
            let location = dirs::cache_dir()
                .map(|d| d.join("scroll").join("log").join("scroll.log"));
            log.location = location;
        }
    }

    Ok(config)
}
