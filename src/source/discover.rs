use std::fs;
use std::path::{Path, PathBuf};

use crate::debugger::Component;
use crate::source::errors::{SourceError, SourceResult};
use crate::db_debug;

/// Lists the `.csv` files (extension matched case-insensitively) directly
/// inside `dir`, sorted by path so the merge order is reproducible.
pub fn discover_csv_files(dir: impl AsRef<Path>) -> SourceResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let name = dir.display().to_string();

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| SourceError::io(&name, e))? {
        let entry = entry.map_err(|e| SourceError::io(&name, e))?;
        let path = entry.path();

        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        if is_csv && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    db_debug!(Component::Source, "{}: found {} csv file(s)", name, files.len());
    Ok(files)
}
