use std::io;
use std::path::Path;

use crate::common::error::SrcinitError;
use crate::common::result::{ResultExt, SrcinitResult};
use crate::domain::entities::settings::DEFAULT_UMASK;
use crate::infrastructure::filesystem::mutator::{mkdir_all, Mutator};

/// Ensures the source directory exists with a private permission mode
/// before anything is cloned into it.
#[derive(Debug, Clone, Copy)]
pub struct DirectoryPreparer {
    umask: u32,
}

impl Default for DirectoryPreparer {
    fn default() -> Self {
        Self::new(DEFAULT_UMASK)
    }
}

impl DirectoryPreparer {
    pub fn new(umask: u32) -> Self {
        Self {
            umask: umask & 0o777,
        }
    }

    /// Mode for missing parents of the source directory
    pub fn parent_mode(&self) -> u32 {
        0o777 & !self.umask
    }

    /// Mode for the source directory itself
    pub fn source_mode(&self) -> u32 {
        0o700 & !self.umask
    }

    /// Whether an existing source directory's mode differs from the required one
    #[cfg(unix)]
    fn needs_correction(&self, metadata: &std::fs::Metadata) -> bool {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o777 != self.source_mode()
    }

    #[cfg(not(unix))]
    fn needs_correction(&self, _metadata: &std::fs::Metadata) -> bool {
        false
    }

    /// Create or correct `path`. Safe to call any number of times.
    pub fn ensure(&self, path: &Path, mutator: &dyn Mutator) -> SrcinitResult<()> {
        if let Some(parent) = path.parent() {
            mkdir_all(mutator, parent, self.parent_mode()).with_directory_error(
                "failed to create parent directories",
                Some(parent.to_path_buf()),
            )?;
        }

        match std::fs::metadata(path) {
            Ok(metadata) if metadata.is_dir() => {
                if self.needs_correction(&metadata) {
                    tracing::debug!(
                        path = %path.display(),
                        mode = %format!("{:o}", self.source_mode()),
                        "correcting source directory permissions"
                    );
                    mutator.chmod(path, self.source_mode()).with_directory_error(
                        "failed to correct permissions",
                        Some(path.to_path_buf()),
                    )?;
                }
                Ok(())
            }
            Ok(_) => Err(SrcinitError::directory_error(
                "not a directory",
                Some(path.to_path_buf()),
            )),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "creating source directory");
                mutator
                    .mkdir(path, self.source_mode())
                    .with_directory_error("failed to create directory", Some(path.to_path_buf()))
            }
            Err(e) => Err(SrcinitError::directory_error_with_source(
                "failed to inspect directory",
                Some(path.to_path_buf()),
                e,
            )),
        }
    }
}
