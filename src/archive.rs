//! Archive recognition and content hashing.

use std::fs::File;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::{IndexError, IndexResult};

/// Suffixes of files that are listed on a project page.
pub const ARCHIVE_EXTENSIONS: [&str; 3] = [".zip", ".tar.gz", ".whl"];

/// Why a directory entry is left out of a project page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Hidden,
    NotAFile,
    NotAnArchive,
}

impl SkipReason {
    pub fn describe(self) -> &'static str {
        match self {
            SkipReason::Hidden => "hidden file",
            SkipReason::NotAFile => "not a regular file",
            SkipReason::NotAnArchive => "not a Python package file",
        }
    }
}

/// Classify a file name. `None` means the file is an archive to be listed.
pub fn classify(filename: &str) -> Option<SkipReason> {
    if filename.starts_with('.') {
        return Some(SkipReason::Hidden);
    }
    if !ARCHIVE_EXTENSIONS.iter().any(|ext| filename.ends_with(ext)) {
        return Some(SkipReason::NotAnArchive);
    }
    None
}

/// Streamed SHA-256 of a file's contents as lower-case hex.
///
/// `io::copy` feeds the hasher in fixed-size chunks, so memory use does not
/// grow with the archive size.
pub fn sha256_file(path: &Path) -> IndexResult<String> {
    let mut file = File::open(path).map_err(IndexError::io(path))?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher).map_err(IndexError::io(path))?;
    Ok(format!("{:x}", hasher.finalize()))
}
