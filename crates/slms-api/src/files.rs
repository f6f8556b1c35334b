//! On-disk storage for uploaded documents.
//!
//! Files live under `<root>/documents/` and are named by a fresh UUID, so the
//! client-supplied file name never reaches the filesystem. Paths handed to
//! the store are relative to `root`.

use std::{
  io,
  path::{Component, Path, PathBuf},
};

use uuid::Uuid;

const DOCUMENTS_DIR: &str = "documents";

#[derive(Debug, Clone)]
pub struct DocumentFiles {
  root: PathBuf,
}

impl DocumentFiles {
  pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

  pub fn root(&self) -> &Path { &self.root }

  /// Write `bytes` to a new file with extension `ext` (may be empty) and
  /// return its path relative to the root.
  pub async fn write(&self, bytes: &[u8], ext: &str) -> io::Result<String> {
    let name = if ext.is_empty() {
      Uuid::new_v4().to_string()
    } else {
      format!("{}.{ext}", Uuid::new_v4())
    };
    let dir = self.root.join(DOCUMENTS_DIR);
    tokio::fs::create_dir_all(&dir).await?;
    tokio::fs::write(dir.join(&name), bytes).await?;
    Ok(format!("{DOCUMENTS_DIR}/{name}"))
  }

  /// Absolute location of a stored relative path. Returns `None` for paths
  /// that would escape the root.
  pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
    let path = Path::new(relative);
    path
      .components()
      .all(|c| matches!(c, Component::Normal(_)))
      .then(|| self.root.join(path))
  }

  /// Remove a stored file. Failures are logged and otherwise ignored: the
  /// database record has already been dealt with by the time this runs.
  pub async fn remove(&self, relative: &str) {
    let Some(path) = self.resolve(relative) else {
      tracing::warn!(path = relative, "refusing to remove file outside document root");
      return;
    };
    match tokio::fs::remove_file(&path).await {
      Ok(()) => tracing::debug!(path = %path.display(), "removed document file"),
      Err(e) => {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove document file");
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn resolve_rejects_escaping_paths() {
    let files = DocumentFiles::new("/srv/slms");
    assert_eq!(
      files.resolve("documents/a.pdf"),
      Some(PathBuf::from("/srv/slms/documents/a.pdf"))
    );
    assert!(files.resolve("../etc/passwd").is_none());
    assert!(files.resolve("/etc/passwd").is_none());
    assert!(files.resolve("documents/../../x").is_none());
  }

  #[tokio::test]
  async fn write_then_remove() {
    let dir = tempfile::tempdir().unwrap();
    let files = DocumentFiles::new(dir.path());

    let rel = files.write(b"hello", "txt").await.unwrap();
    assert!(rel.starts_with("documents/"));
    assert!(rel.ends_with(".txt"));
    let abs = files.resolve(&rel).unwrap();
    assert_eq!(std::fs::read(&abs).unwrap(), b"hello");

    files.remove(&rel).await;
    assert!(!abs.exists());

    // Removing again only logs.
    files.remove(&rel).await;
  }
}
