//! CLI command handler for `project`: regenerate a single project page.

use std::path::PathBuf;

use crate::IndexResult;
use crate::config::PrefixPolicy;
use crate::project::{ProjectOptions, write_project_index};

pub fn run(base: PathBuf, project: String, skip_mismatched: bool) -> IndexResult<usize> {
    let options = ProjectOptions {
        on_prefix_mismatch: if skip_mismatched { PrefixPolicy::Skip } else { PrefixPolicy::Error },
    };
    let found = write_project_index(&base, &project, &options)?;
    if found == 0 {
        tracing::warn!(project = %project, "no packages located for project");
    }
    Ok(found)
}
