//! Input file enumeration for batch mode

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;

/// Collect the files directly under `dir` whose extension matches one of
/// `extensions` (case-sensitive), in lexicographic order
///
/// Non-recursive; subdirectories are skipped. An empty result is not an
/// error — the caller decides what to do with it.
pub fn resolve(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if extensions.iter().any(|e| e == ext) {
            files.push(path);
        }
    }

    files.sort();
    debug!("Resolved {} files under {}", files.len(), dir.display());
    Ok(files)
}
