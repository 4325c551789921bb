//! State reconciliation
//!
//! A [`Reconciler`] brings a destination tree in line with the source tree.
//! The bootstrap only knows the trait; [`MirrorReconciler`] is the default
//! engine shipped with the CLI.

use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::common::error::SrcinitError;
use crate::common::result::{ResultExt, SrcinitResult};
use crate::domain::value_objects::vcs_kind::VcsKind;
use crate::infrastructure::filesystem::mutator::{mkdir_all, Mutator};
use crate::infrastructure::vcs::registry::VcsRegistry;

/// Reconciliation entry point
pub trait Reconciler: Send + Sync {
    /// Reconcile `targets`, or everything when `targets` is `None`.
    fn apply(&self, mutator: &dyn Mutator, targets: Option<&[PathBuf]>) -> SrcinitResult<()>;
}

/// Entries never copied from the source tree: every backend's metadata
/// directory and nested-resource marker
pub fn default_ignores() -> Vec<String> {
    VcsKind::ALL
        .iter()
        .flat_map(|kind| {
            let marker = VcsRegistry::info(*kind).sub_resources.map(|s| s.marker);
            std::iter::once(kind.metadata_dir()).chain(marker)
        })
        .map(str::to_string)
        .collect()
}

const DIR_MODE: u32 = 0o755;

/// Copies every file of the source tree that is missing or different in the
/// destination tree. Nothing is ever removed from the destination.
#[derive(Debug, Clone)]
pub struct MirrorReconciler {
    source_dir: PathBuf,
    destination_dir: PathBuf,
    ignore: Vec<String>,
    dry_run: bool,
}

/// Counters of one reconciliation pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MirrorStats {
    pub directories_created: usize,
    pub files_written: usize,
    pub unchanged: usize,
}

impl MirrorReconciler {
    pub fn new(source_dir: impl Into<PathBuf>, destination_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            destination_dir: destination_dir.into(),
            ignore: default_ignores(),
            dry_run: false,
        }
    }

    /// Treat a missing source tree as empty instead of an error
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Also skip entries with this file name
    pub fn with_ignore(mut self, name: impl Into<String>) -> Self {
        self.ignore.push(name.into());
        self
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn destination_dir(&self) -> &Path {
        &self.destination_dir
    }

    fn is_ignored(&self, name: &std::ffi::OsStr) -> bool {
        self.ignore.iter().any(|ignored| name == ignored.as_str())
    }

    /// Run a pass and report what changed
    pub fn mirror(
        &self,
        mutator: &dyn Mutator,
        targets: Option<&[PathBuf]>,
    ) -> SrcinitResult<MirrorStats> {
        if !self.source_dir.is_dir() {
            if self.dry_run && !self.source_dir.exists() {
                tracing::info!(
                    path = %self.source_dir.display(),
                    "(dry run) source directory not present, nothing to reconcile"
                );
                return Ok(MirrorStats::default());
            }
            return Err(SrcinitError::reconciliation_error(
                "source directory does not exist",
                Some(self.source_dir.clone()),
            ));
        }

        mkdir_all(mutator, &self.destination_dir, DIR_MODE).with_reconciliation_error(
            "failed to create destination directory",
            Some(self.destination_dir.clone()),
        )?;

        let mut stats = MirrorStats::default();
        match targets {
            None => self.mirror_root(mutator, &self.source_dir, 1, &mut stats)?,
            Some(targets) => {
                for target in targets {
                    let relative = self.target_relative_path(target)?;
                    let source = self.source_dir.join(&relative);
                    if source.symlink_metadata().is_err() {
                        return Err(SrcinitError::reconciliation_error(
                            "target has no counterpart in the source directory",
                            Some(target.clone()),
                        ));
                    }
                    if let Some(parent) = self.destination_dir.join(&relative).parent() {
                        mkdir_all(mutator, parent, DIR_MODE).with_reconciliation_error(
                            "failed to create parent directory",
                            Some(parent.to_path_buf()),
                        )?;
                    }
                    self.mirror_root(mutator, &source, 0, &mut stats)?;
                }
            }
        }

        tracing::info!(
            directories_created = stats.directories_created,
            files_written = stats.files_written,
            unchanged = stats.unchanged,
            "reconciliation finished"
        );
        Ok(stats)
    }

    fn target_relative_path(&self, target: &Path) -> SrcinitResult<PathBuf> {
        let absolute = if target.is_absolute() {
            target.to_path_buf()
        } else {
            self.destination_dir.join(target)
        };
        let relative = absolute.strip_prefix(&self.destination_dir).map_err(|_| {
            SrcinitError::reconciliation_error(
                "target is outside the destination directory",
                Some(target.to_path_buf()),
            )
        })?;
        if relative.as_os_str().is_empty() {
            return Err(SrcinitError::reconciliation_error(
                "target is the destination directory itself",
                Some(target.to_path_buf()),
            ));
        }
        if relative
            .components()
            .any(|component| matches!(component, Component::ParentDir))
        {
            return Err(SrcinitError::reconciliation_error(
                "target is outside the destination directory",
                Some(target.to_path_buf()),
            ));
        }
        Ok(relative.to_path_buf())
    }

    fn mirror_root(
        &self,
        mutator: &dyn Mutator,
        root: &Path,
        min_depth: usize,
        stats: &mut MirrorStats,
    ) -> SrcinitResult<()> {
        let walker = WalkDir::new(root)
            .min_depth(min_depth)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_ignored(entry.file_name()));

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf);
                SrcinitError::reconciliation_error_with_source("failed to walk source tree", path, e)
            })?;
            let relative = entry
                .path()
                .strip_prefix(&self.source_dir)
                .map_err(|e| {
                    SrcinitError::internal_error_with_source("walked outside source directory", e)
                })?;
            let dest = self.destination_dir.join(relative);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                self.mirror_dir(mutator, &dest, stats)?;
            } else if file_type.is_file() {
                self.mirror_file(mutator, entry.path(), &dest, stats)?;
            } else {
                tracing::warn!(path = %entry.path().display(), "skipping non-regular file");
            }
        }
        Ok(())
    }

    fn mirror_dir(&self, mutator: &dyn Mutator, dest: &Path, stats: &mut MirrorStats) -> SrcinitResult<()> {
        match std::fs::symlink_metadata(dest) {
            Ok(metadata) if metadata.is_dir() => {
                stats.unchanged += 1;
                Ok(())
            }
            Ok(_) => Err(SrcinitError::reconciliation_error(
                "destination exists and is not a directory",
                Some(dest.to_path_buf()),
            )),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                mutator
                    .mkdir(dest, DIR_MODE)
                    .with_reconciliation_error("failed to create directory", Some(dest.to_path_buf()))?;
                stats.directories_created += 1;
                Ok(())
            }
            Err(e) => Err(SrcinitError::reconciliation_error_with_source(
                "failed to inspect destination",
                Some(dest.to_path_buf()),
                e,
            )),
        }
    }

    fn mirror_file(
        &self,
        mutator: &dyn Mutator,
        source: &Path,
        dest: &Path,
        stats: &mut MirrorStats,
    ) -> SrcinitResult<()> {
        let contents = std::fs::read(source)
            .with_reconciliation_error("failed to read source file", Some(source.to_path_buf()))?;
        let mode = file_mode(source)?;

        if is_up_to_date(dest, &contents, mode) {
            stats.unchanged += 1;
            return Ok(());
        }
        if dest.is_dir() {
            return Err(SrcinitError::reconciliation_error(
                "destination exists and is a directory",
                Some(dest.to_path_buf()),
            ));
        }

        tracing::debug!(path = %dest.display(), "writing file");
        mutator
            .write_file(dest, &contents, mode)
            .with_reconciliation_error("failed to write file", Some(dest.to_path_buf()))?;
        stats.files_written += 1;
        Ok(())
    }
}

impl Reconciler for MirrorReconciler {
    fn apply(&self, mutator: &dyn Mutator, targets: Option<&[PathBuf]>) -> SrcinitResult<()> {
        self.mirror(mutator, targets).map(|_| ())
    }
}

#[cfg(unix)]
fn file_mode(path: &Path) -> SrcinitResult<u32> {
    use std::os::unix::fs::PermissionsExt;
    let metadata = std::fs::metadata(path)
        .with_reconciliation_error("failed to stat source file", Some(path.to_path_buf()))?;
    Ok(if metadata.permissions().mode() & 0o111 != 0 {
        0o755
    } else {
        0o644
    })
}

#[cfg(not(unix))]
fn file_mode(_path: &Path) -> SrcinitResult<u32> {
    Ok(0o644)
}

fn is_up_to_date(dest: &Path, contents: &[u8], mode: u32) -> bool {
    let Ok(metadata) = std::fs::symlink_metadata(dest) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o777 != mode {
            return false;
        }
    }
    #[cfg(not(unix))]
    let _ = mode;
    std::fs::read(dest).map(|existing| existing == contents).unwrap_or(false)
}
