//! Top-level index page writer.
//!
//! Regenerates every configured project page and links the non-empty ones
//! from `<base>/index.html`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::config::{DEFAULT_TITLE, PrefixPolicy};
use crate::html;
use crate::normalize::normalize_name;
use crate::project::{INDEX_FILE, ProjectOptions, write_project_index};
use crate::{IndexError, IndexResult, now_string};

#[derive(Debug, Clone)]
pub struct IndexOptions {
    pub title: String,
    pub on_prefix_mismatch: PrefixPolicy,
}

impl Default for IndexOptions {
    fn default() -> Self {
        IndexOptions {
            title: DEFAULT_TITLE.to_string(),
            on_prefix_mismatch: PrefixPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Indexed,
    Empty,
    Missing,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub name: String,
    pub normalized_name: String,
    pub packages: usize,
    pub status: ProjectStatus,
}

/// Outcome of one full regeneration.
#[derive(Debug, Clone, Serialize)]
pub struct IndexSummary {
    pub base_folder: PathBuf,
    pub generated_at: String,
    pub projects: Vec<ProjectSummary>,
    pub total_packages: usize,
}

impl IndexSummary {
    pub fn indexed(&self) -> impl Iterator<Item = &ProjectSummary> {
        self.projects.iter().filter(|p| p.status == ProjectStatus::Indexed)
    }
}

/// Staging name of the top-level page; renamed over `index.html` once complete.
pub const STAGING_FILE: &str = ".index.html.tmp";

/// Write `<base>/index.html` for `projects`, in the given order.
///
/// Projects without a folder or without archives are reported and left out.
/// The page is assembled in [`STAGING_FILE`] and only replaces `index.html`
/// when every project succeeded, so a failed run keeps the previous page.
pub fn write_package_index(
    base_folder: &Path,
    projects: &[String],
    options: &IndexOptions,
) -> IndexResult<IndexSummary> {
    let index_path = base_folder.join(INDEX_FILE);
    let staging_path = base_folder.join(STAGING_FILE);
    let summary = match write_top_level(base_folder, &staging_path, projects, options) {
        Ok(summary) => summary,
        Err(e) => {
            let _ = fs::remove_file(&staging_path);
            return Err(e);
        }
    };
    fs::rename(&staging_path, &index_path).map_err(IndexError::io(&index_path))?;

    info!(
        path = %index_path.display(),
        projects = summary.indexed().count(),
        packages = summary.total_packages,
        "wrote top-level index"
    );
    Ok(summary)
}

fn write_top_level(
    base_folder: &Path,
    page_path: &Path,
    projects: &[String],
    options: &IndexOptions,
) -> IndexResult<IndexSummary> {
    let project_options = ProjectOptions {
        on_prefix_mismatch: options.on_prefix_mismatch,
    };

    let file = File::create(page_path).map_err(IndexError::io(page_path))?;
    let mut out = BufWriter::new(file);
    out.write_all(html::page_header(&options.title).as_bytes())
        .map_err(IndexError::io(page_path))?;

    let mut summaries = Vec::with_capacity(projects.len());
    let mut total_packages = 0;
    for project_name in projects {
        let normalized_name = normalize_name(project_name);
        let mut summary = ProjectSummary {
            name: project_name.clone(),
            normalized_name,
            packages: 0,
            status: ProjectStatus::Missing,
        };

        if !base_folder.join(project_name).is_dir() {
            warn!(project = %project_name, "no folder for project, skipping it");
            summaries.push(summary);
            continue;
        }

        let found = write_project_index(base_folder, project_name, &project_options)?;
        if found == 0 {
            warn!(project = %project_name, "no packages located for project");
            summary.status = ProjectStatus::Empty;
            summaries.push(summary);
            continue;
        }

        out.write_all(html::top_level_entry(project_name, &summary.normalized_name).as_bytes())
            .map_err(IndexError::io(page_path))?;
        summary.packages = found;
        summary.status = ProjectStatus::Indexed;
        total_packages += found;
        summaries.push(summary);
    }

    out.write_all(html::page_footer().as_bytes())
        .map_err(IndexError::io(page_path))?;
    out.flush().map_err(IndexError::io(page_path))?;

    Ok(IndexSummary {
        base_folder: base_folder.to_path_buf(),
        generated_at: now_string(),
        projects: summaries,
        total_packages,
    })
}
