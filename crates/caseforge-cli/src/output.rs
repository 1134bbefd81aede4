//! Writing generated files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

/// Write `contents` to `dir/file_name`, creating `dir` if needed.
pub fn write_file(dir: &Path, file_name: &str, contents: impl AsRef<[u8]>) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    let path = dir.join(file_name);
    let contents = contents.as_ref();
    std::fs::write(&path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        let path = write_file(&nested, "out.txt", "hello").unwrap();
        assert_eq!(path, nested.join("out.txt"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello");
    }
}
