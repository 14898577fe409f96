//! CLI command handler for `build`.
//!
//! Regenerates the whole index from a config file and command-line overrides.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::config::{DEFAULT_CONFIG, DEFAULT_TITLE, IndexConfig, PrefixPolicy, load_config};
use crate::top_level::{IndexOptions, IndexSummary, write_package_index};
use crate::{IndexError, IndexResult};

/// Command-line overrides for `build`. `None`/empty leaves the config value.
#[derive(Debug, Clone, Default)]
pub struct BuildArgs {
    pub config: Option<PathBuf>,
    pub base: Option<PathBuf>,
    pub title: Option<String>,
    pub skip_mismatched: bool,
    pub projects: Vec<String>,
    pub json: Option<PathBuf>,
}

/// Resolve the effective configuration.
///
/// An explicit `--config` must exist. Without one, `simple-index.toml` in the
/// working directory is used if present, otherwise built-in defaults.
pub fn resolve_config(args: &BuildArgs) -> IndexResult<IndexConfig> {
    let mut cfg = match &args.config {
        Some(path) => load_config(path)?,
        None if Path::new(DEFAULT_CONFIG).is_file() => load_config(Path::new(DEFAULT_CONFIG))?,
        None => IndexConfig {
            base_folder: PathBuf::from("."),
            title: DEFAULT_TITLE.to_string(),
            projects: Vec::new(),
            on_prefix_mismatch: PrefixPolicy::default(),
        },
    };

    if let Some(base) = &args.base {
        cfg.base_folder = base.clone();
    }
    if let Some(title) = &args.title {
        cfg.title = title.clone();
    }
    if args.skip_mismatched {
        cfg.on_prefix_mismatch = PrefixPolicy::Skip;
    }
    if !args.projects.is_empty() {
        cfg.projects = args.projects.clone();
    }
    Ok(cfg)
}

pub fn run(args: BuildArgs) -> IndexResult<IndexSummary> {
    let cfg = resolve_config(&args)?;
    if cfg.projects.is_empty() {
        warn!("no projects configured, the top-level index will be empty");
    }
    debug!(?cfg, "resolved configuration");
    info!(
        base = %cfg.base_folder.display(),
        projects = cfg.projects.len(),
        "regenerating package index"
    );

    let options = IndexOptions {
        title: cfg.title,
        on_prefix_mismatch: cfg.on_prefix_mismatch,
    };
    let summary = write_package_index(&cfg.base_folder, &cfg.projects, &options)?;

    if let Some(json_path) = &args.json {
        write_summary_json(&summary, json_path)?;
        info!(path = %json_path.display(), "wrote run summary");
    }
    Ok(summary)
}

fn write_summary_json(summary: &IndexSummary, path: &Path) -> IndexResult<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(IndexError::io(dir))?;
    }
    let json = serde_json::to_string_pretty(summary).context("failed to serialize run summary")?;
    std::fs::write(path, json).map_err(IndexError::io(path))?;
    Ok(())
}
