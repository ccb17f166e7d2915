//! Identity registry for newly learned faces

use amica_core::{Error, FaceImage, Result};
use std::path::PathBuf;
use tracing::info;

/// Persists a name-to-face association learned during a conversation. The
/// face recognizer reads the same store to recognize the person next time.
pub trait IdentityRegistry: Send {
    fn register_identity(&mut self, name: &str, face: &FaceImage) -> Result<()>;
}

/// Directory-backed registry: one image file per identity, named after it.
pub struct DirectoryRegistry {
    dir: PathBuf,
}

impl DirectoryRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        // The name comes out of a language model; keep it path-safe.
        let safe: String = name
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        if safe.is_empty() {
            return Err(Error::Registry(format!(
                "Identity name {:?} has no usable characters",
                name
            )));
        }

        Ok(self.dir.join(format!("{}.png", safe)))
    }
}

impl IdentityRegistry for DirectoryRegistry {
    fn register_identity(&mut self, name: &str, face: &FaceImage) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(name)?;

        face.save(&path)
            .map_err(|e| Error::Registry(format!("Failed to save face image: {}", e)))?;

        info!(name, path = %path.display(), "Registered new identity");
        Ok(())
    }
}
