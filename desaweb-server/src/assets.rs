//! Asset store - uploaded image files on disk
//!
//! One directory per asset class under a common root:
//! - `<root>/blogs/` served at `/uploads/blogs`
//! - `<root>/desa/` served at `/uploads/desa`
//!
//! Files are named `<unix-millis>.<ext>`. Two uploads in the same
//! millisecond for the same class collide and the later one wins.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;

/// Asset class, determines the storage directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetClass {
    Blogs,
    Desa,
}

impl AssetClass {
    pub const ALL: [AssetClass; 2] = [AssetClass::Blogs, AssetClass::Desa];

    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Blogs => "blogs",
            Self::Desa => "desa",
        }
    }

    /// URL prefix the class directory is served under
    pub fn url_prefix(self) -> &'static str {
        match self {
            Self::Blogs => "/uploads/blogs",
            Self::Desa => "/uploads/desa",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Result of a best-effort removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// Nothing to delete: empty or unsafe name, or no such file
    Absent,
    /// Deletion failed and was logged
    Failed,
}

/// Build a stored file name from the upload's original name.
///
/// `photo.JPG` at 1700000000000 becomes `1700000000000.JPG`. A name with no
/// extension, or one that is not ASCII alphanumeric, becomes just the
/// timestamp, so every stored name can later be removed.
pub fn generate_filename(original_name: &str, millis: i64) -> String {
    match Path::new(original_name).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            format!("{millis}.{ext}")
        }
        _ => millis.to_string(),
    }
}

/// True when `name` is a single path component that cannot escape the
/// class directory.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name)
}

/// On-disk storage for uploaded images
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn class_dir(&self, class: AssetClass) -> PathBuf {
        self.root.join(class.dir_name())
    }

    pub fn path_of(&self, class: AssetClass, filename: &str) -> PathBuf {
        self.class_dir(class).join(filename)
    }

    /// Create every class directory.
    pub async fn ensure_dirs(&self) -> io::Result<()> {
        for class in AssetClass::ALL {
            fs::create_dir_all(self.class_dir(class)).await?;
        }
        Ok(())
    }

    /// Write an upload and return the name it was stored under.
    pub async fn store(
        &self,
        class: AssetClass,
        original_name: &str,
        bytes: &[u8],
    ) -> io::Result<String> {
        let filename = generate_filename(original_name, Utc::now().timestamp_millis());
        let dir = self.class_dir(class);
        fs::create_dir_all(&dir).await?;
        fs::write(dir.join(&filename), bytes).await?;

        tracing::debug!(%class, %filename, size = bytes.len(), "Stored upload");
        Ok(filename)
    }

    /// Delete a stored file, best-effort.
    ///
    /// A missing file counts as already deleted. Failures are logged and
    /// reported through the outcome, never as an error.
    pub async fn remove(&self, class: AssetClass, filename: &str) -> RemoveOutcome {
        if !is_plain_file_name(filename) {
            if !filename.is_empty() {
                tracing::warn!(%class, %filename, "Refusing to delete non-plain file name");
            }
            return RemoveOutcome::Absent;
        }

        match fs::remove_file(self.path_of(class, filename)).await {
            Ok(()) => {
                tracing::debug!(%class, %filename, "Deleted asset");
                RemoveOutcome::Removed
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => RemoveOutcome::Absent,
            Err(e) => {
                tracing::warn!(%class, %filename, error = %e, "Failed to delete asset");
                RemoveOutcome::Failed
            }
        }
    }
}
