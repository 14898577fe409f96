//! Project-level index page writer.
//!
//! Writes `<base>/<project>/index.html`, one anchor per archive found in the
//! project folder. The page only persists if at least one archive was found.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::archive::{SkipReason, classify, sha256_file};
use crate::config::PrefixPolicy;
use crate::html;
use crate::normalize::archive_prefix;
use crate::{IndexError, IndexResult};

pub const INDEX_FILE: &str = "index.html";

#[derive(Debug, Clone, Default)]
pub struct ProjectOptions {
    pub on_prefix_mismatch: PrefixPolicy,
}

/// Generate the `index.html` of one project and return how many archives it lists.
///
/// `project_name` is used verbatim as the folder name below `base_folder`.
/// If no archive is found the page is removed and `0` is returned.
///
/// # Errors
/// - [`IndexError::MissingProjectDirectory`] if the project folder does not exist;
///   nothing is written in that case
/// - [`IndexError::NamingViolation`] if an archive lacks the normalized prefix and
///   the policy is [`PrefixPolicy::Error`]
/// - [`IndexError::Io`] for any read, hash or write failure
///
/// On error the partially written page is removed.
pub fn write_project_index(
    base_folder: &Path,
    project_name: &str,
    options: &ProjectOptions,
) -> IndexResult<usize> {
    let project_folder = base_folder.join(project_name);
    if !project_folder.is_dir() {
        return Err(IndexError::MissingProjectDirectory {
            project: project_name.to_string(),
            path: project_folder,
        });
    }

    let index_path = project_folder.join(INDEX_FILE);
    let found = match write_listing(&project_folder, &index_path, project_name, options) {
        Ok(found) => found,
        Err(e) => {
            let _ = fs::remove_file(&index_path);
            return Err(e);
        }
    };

    if found == 0 {
        fs::remove_file(&index_path).map_err(IndexError::io(&index_path))?;
        debug!(project = project_name, "removed empty project index");
    } else {
        info!(project = project_name, packages = found, "wrote project index");
    }
    Ok(found)
}

fn write_listing(
    project_folder: &Path,
    index_path: &Path,
    project_name: &str,
    options: &ProjectOptions,
) -> IndexResult<usize> {
    let prefix = archive_prefix(project_name);

    let file = File::create(index_path).map_err(IndexError::io(index_path))?;
    let mut out = BufWriter::new(file);
    out.write_all(html::page_header(&html::project_title(project_name)).as_bytes())
        .map_err(IndexError::io(index_path))?;

    let mut entries = fs::read_dir(project_folder)
        .and_then(|it| it.collect::<Result<Vec<_>, _>>())
        .map_err(IndexError::io(project_folder))?;
    entries.sort_by_key(|e| e.file_name());

    let mut found = 0;
    for entry in entries {
        let file_name = entry.file_name();
        let Some(filename) = file_name.to_str() else {
            warn!(
                project = project_name,
                filename = %file_name.to_string_lossy(),
                "ignoring file with a non UTF-8 name"
            );
            continue;
        };
        if filename == INDEX_FILE {
            debug!(project = project_name, filename, "ignoring the page being generated");
            continue;
        }

        let path = entry.path();
        let skip = classify(filename).or_else(|| (!path.is_file()).then_some(SkipReason::NotAFile));
        if let Some(reason) = skip {
            warn!(
                project = project_name,
                filename,
                reason = reason.describe(),
                "ignoring file while building the project index"
            );
            continue;
        }

        if !filename.starts_with(&prefix) {
            match options.on_prefix_mismatch {
                PrefixPolicy::Error => {
                    return Err(IndexError::NamingViolation {
                        project: project_name.to_string(),
                        filename: filename.to_string(),
                        expected_prefix: prefix,
                    });
                }
                PrefixPolicy::Skip => {
                    warn!(
                        project = project_name,
                        filename,
                        expected_prefix = %prefix,
                        "ignoring archive without the normalized project prefix"
                    );
                    continue;
                }
            }
        }

        let digest = sha256_file(&path)?;
        out.write_all(html::project_entry(filename, &digest).as_bytes())
            .map_err(IndexError::io(index_path))?;
        debug!(project = project_name, filename, sha256 = %digest, "indexed archive");
        found += 1;
    }

    out.write_all(html::page_footer().as_bytes())
        .map_err(IndexError::io(index_path))?;
    out.flush().map_err(IndexError::io(index_path))?;
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use tracing_subscriber::fmt::MakeWriter;

    /// Collects formatted log lines for assertions.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn with_debug_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        let out = tracing::subscriber::with_default(subscriber, f);
        (out, logs.contents())
    }

    fn make_project(base: &Path, name: &str, files: &[(&str, &str)]) -> PathBuf {
        let dir = base.join(name);
        fs::create_dir_all(&dir).unwrap();
        for (file, bytes) in files {
            fs::write(dir.join(file), bytes).unwrap();
        }
        dir
    }

    fn anchors(html: &str) -> Vec<&str> {
        html.lines().map(str::trim).filter(|l| l.starts_with("<a ")).collect()
    }

    #[test]
    fn test_lists_archives_with_digests() {
        let temp = TempDir::new().unwrap();
        let dir = make_project(
            temp.path(),
            "proj",
            &[
                ("proj-1.0.tar.gz", "sdist bytes"),
                ("proj-1.0-py3-none-any.whl", "wheel bytes"),
                ("README.md", "# readme"),
            ],
        );

        let found = write_project_index(temp.path(), "proj", &ProjectOptions::default()).unwrap();
        assert_eq!(found, 2);

        let page = fs::read_to_string(dir.join(INDEX_FILE)).unwrap();
        assert!(page.contains("<title>Custom Package for 'proj'</title>"));
        let links = anchors(&page);
        assert_eq!(
            links,
            vec![
                format!(
                    "<a href=\"proj-1.0-py3-none-any.whl#sha256={}\">proj-1.0-py3-none-any.whl</a> </br>",
                    sha256::digest("wheel bytes")
                ),
                format!(
                    "<a href=\"proj-1.0.tar.gz#sha256={}\">proj-1.0.tar.gz</a> </br>",
                    sha256::digest("sdist bytes")
                ),
            ]
        );
        assert!(!page.contains("README.md"));
    }

    #[test]
    fn test_empty_project_removes_stale_index() {
        let temp = TempDir::new().unwrap();
        let dir = make_project(temp.path(), "proj", &[("notes.txt", "x"), (INDEX_FILE, "stale")]);

        let found = write_project_index(temp.path(), "proj", &ProjectOptions::default()).unwrap();
        assert_eq!(found, 0);
        assert!(!dir.join(INDEX_FILE).exists());
    }

    #[test]
    fn test_missing_directory_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let err = write_project_index(temp.path(), "ghost", &ProjectOptions::default()).unwrap_err();
        assert!(matches!(err, IndexError::MissingProjectDirectory { ref project, .. } if project == "ghost"));
        assert!(!temp.path().join("ghost").exists());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_regular_file_in_place_of_folder_is_missing_directory() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("proj"), b"not a folder").unwrap();
        let err = write_project_index(temp.path(), "proj", &ProjectOptions::default()).unwrap_err();
        assert!(matches!(err, IndexError::MissingProjectDirectory { .. }));
    }

    #[test]
    fn test_hidden_and_nested_entries_are_skipped() {
        let temp = TempDir::new().unwrap();
        let dir = make_project(
            temp.path(),
            "proj",
            &[(".proj-0.9.zip", "hidden"), ("proj-1.0.zip", "zip")],
        );
        fs::create_dir(dir.join("proj-sub.zip")).unwrap();

        let found = write_project_index(temp.path(), "proj", &ProjectOptions::default()).unwrap();
        assert_eq!(found, 1);
        let page = fs::read_to_string(dir.join(INDEX_FILE)).unwrap();
        assert_eq!(anchors(&page).len(), 1);
        assert!(page.contains(">proj-1.0.zip</a>"));
    }

    #[test]
    fn test_prefix_uses_normalized_name() {
        let temp = TempDir::new().unwrap();
        let dir = make_project(temp.path(), "My_Proj", &[("my-proj-2.0.tar.gz", "data")]);

        let found = write_project_index(temp.path(), "My_Proj", &ProjectOptions::default()).unwrap();
        assert_eq!(found, 1);
        let page = fs::read_to_string(dir.join(INDEX_FILE)).unwrap();
        assert!(page.contains("<h1>Custom Package for 'My_Proj'</h1>"));
    }

    #[test]
    fn test_prefix_mismatch_is_fatal_by_default() {
        let temp = TempDir::new().unwrap();
        let dir = make_project(
            temp.path(),
            "proj",
            &[("proj-1.0.zip", "ok"), ("other-1.0.zip", "wrong folder")],
        );

        let err = write_project_index(temp.path(), "proj", &ProjectOptions::default()).unwrap_err();
        match err {
            IndexError::NamingViolation { filename, expected_prefix, .. } => {
                assert_eq!(filename, "other-1.0.zip");
                assert_eq!(expected_prefix, "proj-");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!dir.join(INDEX_FILE).exists(), "partial page must be removed");
    }

    #[test]
    fn test_prefix_mismatch_can_be_skipped() {
        let temp = TempDir::new().unwrap();
        let dir = make_project(
            temp.path(),
            "proj",
            &[("proj-1.0.zip", "ok"), ("other-1.0.zip", "wrong folder")],
        );
        let options = ProjectOptions { on_prefix_mismatch: PrefixPolicy::Skip };

        assert_eq!(write_project_index(temp.path(), "proj", &options).unwrap(), 1);
        let page = fs::read_to_string(dir.join(INDEX_FILE)).unwrap();
        assert!(!page.contains("other-1.0.zip"));
    }

    #[test]
    fn test_rerun_is_stable() {
        let temp = TempDir::new().unwrap();
        let dir = make_project(
            temp.path(),
            "proj",
            &[("proj-1.0.zip", "a"), ("proj-1.1.zip", "b"), ("proj-1.2.whl", "c")],
        );

        write_project_index(temp.path(), "proj", &ProjectOptions::default()).unwrap();
        let first = fs::read_to_string(dir.join(INDEX_FILE)).unwrap();
        write_project_index(temp.path(), "proj", &ProjectOptions::default()).unwrap();
        let second = fs::read_to_string(dir.join(INDEX_FILE)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_every_skipped_entry_is_reported() {
        let temp = TempDir::new().unwrap();
        make_project(
            temp.path(),
            "proj",
            &[(INDEX_FILE, "stale"), ("notes.txt", "x"), ("proj-1.0.zip", "zip")],
        );

        let (found, logs) = with_debug_logs(|| {
            write_project_index(temp.path(), "proj", &ProjectOptions::default()).unwrap()
        });
        assert_eq!(found, 1);
        assert!(logs.contains("notes.txt"), "logs: {logs}");
        assert!(logs.contains("index.html"), "logs: {logs}");
        assert!(logs.contains("ignoring the page being generated"), "logs: {logs}");
    }
}
