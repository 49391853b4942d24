use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::core::UsedefConfig;
use crate::errors::{Error, Result, ResultExt};

pub const CONFIG_FILE_NAME: &str = ".usedef.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Read config file contents
pub(crate) fn read_config_file(path: &Path) -> std::io::Result<String> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse and validate config from a TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<UsedefConfig> {
    let config = toml::from_str::<UsedefConfig>(contents).map_err(|e| {
        Error::Configuration(format!("failed to parse {}: {}", CONFIG_FILE_NAME, e))
    })?;

    if config.analysis.max_iterations == 0 {
        return Err(Error::Configuration(
            "analysis.max_iterations must be at least 1".to_string(),
        ));
    }

    Ok(config)
}

/// Load an explicitly requested config file. Every failure is an error.
pub fn load_config_file(path: &Path) -> Result<UsedefConfig> {
    let contents = read_config_file(path)
        .map_err(Error::from)
        .context(format!("reading {}", path.display()))?;
    let config = parse_and_validate_config(&contents)?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Try a discovered config path; unreadable or invalid files are skipped.
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<UsedefConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            debug!(path = %config_path.display(), "loaded config");
            Some(config)
        }
        Err(e) => {
            warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Only log actual errors, not "file not found"
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    if error.kind() != std::io::ErrorKind::NotFound {
        warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// `start` and its parents, up to `max_depth` directories
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.usedef.toml`
pub fn discover_config_from(start: PathBuf) -> UsedefConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            UsedefConfig::default()
        })
}

/// Search from the current directory
pub fn discover_config() -> UsedefConfig {
    match std::env::current_dir() {
        Ok(dir) => discover_config_from(dir),
        Err(e) => {
            warn!("Failed to get current directory: {}. Using default config.", e);
            UsedefConfig::default()
        }
    }
}
