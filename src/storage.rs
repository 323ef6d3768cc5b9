use std::path::{Path, PathBuf};

use color_eyre::{eyre::eyre, Result};
use ulid::Ulid;

/// Question media on disk under the configured upload directory. Stored
/// files get generated names so uploads can never collide.
#[derive(Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(upload_dir: &str) -> Result<Self> {
        let root = Path::new(upload_dir).to_path_buf();
        std::fs::create_dir_all(&root)?;
        let root = root.canonicalize()?;

        tracing::info!("upload directory initialized: {}", root.display());
        Ok(Self { root })
    }

    /// Writes the bytes under a fresh ulid-based name, keeping the original
    /// extension. Returns the relative filename to persist.
    pub async fn store(
        &self,
        bytes: &[u8],
        original_filename: &str,
        subdirectory: &str,
    ) -> Result<String> {
        if bytes.is_empty() {
            return Err(eyre!("cannot store an empty file"));
        }

        let extension = Path::new(original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let filename = format!("{}.{extension}", Ulid::new().to_string().to_lowercase());

        let target_dir = if subdirectory.is_empty() {
            self.root.clone()
        } else {
            self.root.join(subdirectory)
        };
        tokio::fs::create_dir_all(&target_dir).await?;

        let target = target_dir.join(&filename);
        tokio::fs::write(&target, bytes).await?;

        tracing::info!("stored file: {}", target.display());

        if subdirectory.is_empty() {
            Ok(filename)
        } else {
            Ok(format!("{subdirectory}/{filename}"))
        }
    }

    /// Reads a stored file back. Refuses paths that escape the upload root.
    pub async fn load(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self.resolve(filename)?;
        Ok(tokio::fs::read(path).await?)
    }

    /// Best effort: a file that cannot be removed is logged, never fatal.
    pub async fn delete(&self, filename: &str) {
        let path = match self.resolve(filename) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("refusing to delete {filename}: {e}");
                return;
            }
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::info!("deleted file: {}", path.display()),
            Err(e) => tracing::warn!("could not delete file {}: {e}", path.display()),
        }
    }

    fn resolve(&self, filename: &str) -> Result<PathBuf> {
        let path = self.root.join(filename);
        let canonical = path.canonicalize()?;
        if !canonical.starts_with(&self.root) {
            return Err(eyre!("path escapes the upload directory"));
        }
        Ok(canonical)
    }
}
