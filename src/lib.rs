//! Static PEP503 "simple" package index generator.
//!
//! Given a base folder that holds one sub-folder per project, each filled with
//! pre-uploaded archives (`.zip`, `.tar.gz`, `.whl`), this crate writes:
//!
//! - `<base>/<project>/index.html` listing every archive with a `#sha256=` fragment
//! - `<base>/index.html` linking to every project that has at least one archive
//!
//! Both pages are rebuilt from scratch on every run. There is no locking: if
//! two regenerations may run at the same time against the same base folder,
//! the caller has to serialize them (e.g. `flock` around the cron job).

pub mod archive;
pub mod build_cmd;
pub mod config;
pub mod html;
pub mod normalize;
pub mod project;
pub mod project_cmd;
pub mod top_level;

use std::path::PathBuf;

use thiserror::Error;

pub use config::{IndexConfig, PrefixPolicy, load_config};
pub use normalize::normalize_name;
pub use project::{ProjectOptions, write_project_index};
pub use top_level::{IndexOptions, IndexSummary, ProjectStatus, ProjectSummary, write_package_index};

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("expected the project folder `{}` for project `{project}` to exist", .path.display())]
    MissingProjectDirectory { project: String, path: PathBuf },
    #[error(
        "archive `{filename}` in project `{project}` does not start with the normalized prefix `{expected_prefix}`"
    )]
    NamingViolation {
        project: String,
        filename: String,
        expected_prefix: String,
    },
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config `{}`: {message}", .path.display())]
    Config { path: PathBuf, message: String },
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl IndexError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> IndexError {
        let path = path.into();
        move |source| IndexError::Io { path, source }
    }
}

pub type IndexResult<T> = Result<T, IndexError>;

/// Current UTC time as RFC 3339, empty if formatting fails.
pub fn now_string() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "".to_string())
}
