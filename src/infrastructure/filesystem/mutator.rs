//! Filesystem write handles
//!
//! Every destructive filesystem operation performed by srcinit goes through a
//! [`Mutator`]. Reads go straight to `std::fs`; only writes are routed here so
//! that dry-run and verbose modes see all of them.

use std::io;
use std::path::Path;

/// Permission to perform filesystem writes
pub trait Mutator: Send + Sync {
    /// Create a single directory with the given mode
    fn mkdir(&self, path: &Path, mode: u32) -> io::Result<()>;

    /// Change the permission bits of an existing path
    fn chmod(&self, path: &Path, mode: u32) -> io::Result<()>;

    /// Create or replace a file with the given contents and mode
    fn write_file(&self, path: &Path, contents: &[u8], mode: u32) -> io::Result<()>;
}

/// Create `path` and every missing ancestor, top-down, through `mutator`.
pub fn mkdir_all(mutator: &dyn Mutator, path: &Path, mode: u32) -> io::Result<()> {
    let mut missing = Vec::new();
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() {
            break;
        }
        match std::fs::metadata(ancestor) {
            Ok(metadata) if metadata.is_dir() => break,
            Ok(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("{}: not a directory", ancestor.display()),
                ))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => missing.push(ancestor),
            Err(e) => return Err(e),
        }
    }

    for dir in missing.into_iter().rev() {
        mutator.mkdir(dir, mode)?;
    }
    Ok(())
}

/// Writes to the real filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsMutator;

impl Mutator for FsMutator {
    fn mkdir(&self, path: &Path, mode: u32) -> io::Result<()> {
        let mut builder = std::fs::DirBuilder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(mode);
        }
        #[cfg(not(unix))]
        let _ = mode;
        builder.create(path)
    }

    fn chmod(&self, path: &Path, mode: u32) -> io::Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        }
        #[cfg(not(unix))]
        {
            let _ = (path, mode);
            Ok(())
        }
    }

    fn write_file(&self, path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
        std::fs::write(path, contents)?;
        self.chmod(path, mode)
    }
}

/// Logs every write and performs none
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunMutator;

impl Mutator for DryRunMutator {
    fn mkdir(&self, path: &Path, mode: u32) -> io::Result<()> {
        tracing::info!("(dry run) mkdir {} {:o}", path.display(), mode);
        Ok(())
    }

    fn chmod(&self, path: &Path, mode: u32) -> io::Result<()> {
        tracing::info!("(dry run) chmod {:o} {}", mode, path.display());
        Ok(())
    }

    fn write_file(&self, path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
        tracing::info!(
            "(dry run) write {} ({} bytes, {:o})",
            path.display(),
            contents.len(),
            mode
        );
        Ok(())
    }
}

/// Logs every write, then delegates
#[derive(Debug, Default, Clone)]
pub struct VerboseMutator<M> {
    inner: M,
}

impl<M: Mutator> VerboseMutator<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

impl<M: Mutator> Mutator for VerboseMutator<M> {
    fn mkdir(&self, path: &Path, mode: u32) -> io::Result<()> {
        tracing::info!("mkdir {} {:o}", path.display(), mode);
        self.inner.mkdir(path, mode)
    }

    fn chmod(&self, path: &Path, mode: u32) -> io::Result<()> {
        tracing::info!("chmod {:o} {}", mode, path.display());
        self.inner.chmod(path, mode)
    }

    fn write_file(&self, path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
        tracing::info!("write {} ({} bytes, {:o})", path.display(), contents.len(), mode);
        self.inner.write_file(path, contents, mode)
    }
}

/// Options selecting which mutator a run gets
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MutatorOptions {
    pub dry_run: bool,
    pub verbose: bool,
}

/// Obtain the mutation handle for one run
pub fn new_mutator(options: MutatorOptions) -> Box<dyn Mutator> {
    match (options.dry_run, options.verbose) {
        (true, _) => Box::new(DryRunMutator),
        (false, true) => Box::new(VerboseMutator::new(FsMutator)),
        (false, false) => Box::new(FsMutator),
    }
}
