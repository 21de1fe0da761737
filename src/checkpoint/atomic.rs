use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::PersistenceError;

/// Write `bytes` to `path` via a temp file in the same directory and a rename,
/// so readers only ever see the previous or the new complete content.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), PersistenceError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| PersistenceError::io(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| PersistenceError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| PersistenceError::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| PersistenceError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| PersistenceError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_existing_file_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Articles.json");
        std::fs::write(&path, b"[old]").unwrap();

        write_atomic(&path, b"[new]").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"[new]");
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/Categories.json");
        write_atomic(&path, b"{}").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }
}
