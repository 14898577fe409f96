use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{IndexError, IndexResult};

pub const DEFAULT_CONFIG: &str = "simple-index.toml";
pub const DEFAULT_TITLE: &str = "Custom Package Index";

/// What to do with an archive whose name lacks the `<normalized>-` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefixPolicy {
    /// Abort the run with a naming violation.
    #[default]
    Error,
    /// Warn and leave the file out of the page.
    Skip,
}

#[derive(Debug, Clone)]
pub struct IndexConfig {
    pub base_folder: PathBuf,
    pub title: String,
    pub projects: Vec<String>,
    pub on_prefix_mismatch: PrefixPolicy,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    base_folder: Option<PathBuf>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    projects: Vec<String>,
    #[serde(default)]
    on_prefix_mismatch: PrefixPolicy,
}

pub fn load_config(path: &Path) -> IndexResult<IndexConfig> {
    let s = std::fs::read_to_string(path).map_err(IndexError::io(path))?;
    parse_config(&s, path)
}

/// Parse config text. A relative `base_folder` is resolved against the
/// directory holding `path`; a missing one defaults to that directory.
pub fn parse_config(s: &str, path: &Path) -> IndexResult<IndexConfig> {
    let raw: RawConfig = toml::from_str(s).map_err(|e| IndexError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let config_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let base_folder = match raw.base_folder {
        Some(p) if p.is_absolute() => p,
        Some(p) => config_dir.join(p),
        None => config_dir.to_path_buf(),
    };
    Ok(IndexConfig {
        base_folder,
        title: raw.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        projects: raw.projects,
        on_prefix_mismatch: raw.on_prefix_mismatch,
    })
}
