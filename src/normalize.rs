//! PEP503 project name normalization.

fn is_separator(c: char) -> bool {
    matches!(c, '-' | '_' | '.')
}

/// Normalize a project name according to PEP503.
///
/// Every maximal run of `-`, `_` and `.` becomes a single `-`, and the result is
/// lowercased: `My_Project.Name` -> `my-project-name`.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;
    for c in name.chars() {
        if is_separator(c) {
            if !in_run {
                out.push('-');
            }
            in_run = true;
        } else {
            out.extend(c.to_lowercase());
            in_run = false;
        }
    }
    out
}

/// The `<normalized>-` prefix every archive of `project_name` must start with.
pub fn archive_prefix(project_name: &str) -> String {
    format!("{}-", normalize_name(project_name))
}
