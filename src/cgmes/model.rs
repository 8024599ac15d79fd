use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::core::error::{GridProbeError, Result};

/// A CGMES XML file held in memory as text
#[derive(Debug, Clone)]
pub struct CgmesDocument {
    path: Option<PathBuf>,
    content: String,
}

impl CgmesDocument {
    /// Read `path` as UTF-8
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => GridProbeError::FileNotFound(path.display().to_string()),
            _ => GridProbeError::Io(e),
        })?;

        Ok(Self {
            path: Some(path.to_path_buf()),
            content,
        })
    }

    pub fn from_text(content: impl Into<String>) -> Self {
        Self {
            path: None,
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Plain substring test, used by the tag sanity checks
    pub fn contains(&self, needle: &str) -> bool {
        memchr::memmem::find(self.content.as_bytes(), needle.as_bytes()).is_some()
    }
}
