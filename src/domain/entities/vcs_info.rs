use std::ffi::OsString;
use std::fmt;
use std::path::Path;

use crate::domain::value_objects::vcs_kind::VcsKind;

/// Builds the argument list for cloning `remote` into `dest`.
pub type CloneArgsFn = fn(remote: &str, dest: &Path) -> Vec<OsString>;

/// Builds the argument list of an in-tree command.
pub type TreeArgsFn = fn() -> Vec<OsString>;

/// Nested repository support of a backend (e.g. git submodules).
#[derive(Clone, Copy)]
pub struct SubResourceSupport {
    /// Marker file, relative to the source tree root
    pub marker: &'static str,
    /// Arguments of the "initialize nested resources" command
    pub init_args: TreeArgsFn,
    /// Arguments of the "update nested resources" command
    pub update_args: TreeArgsFn,
}

impl SubResourceSupport {
    /// Whether the cloned tree at `source_dir` declares nested resources.
    ///
    /// Existence only; the marker's contents are left to the VCS tool.
    pub fn is_declared_in(&self, source_dir: &Path) -> bool {
        source_dir.join(self.marker).exists()
    }

    /// The two in-tree commands, in the order they must run.
    pub fn command_sequence(&self) -> [Vec<OsString>; 2] {
        [(self.init_args)(), (self.update_args)()]
    }
}

impl fmt::Debug for SubResourceSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubResourceSupport")
            .field("marker", &self.marker)
            .field("init_args", &(self.init_args)())
            .field("update_args", &(self.update_args)())
            .finish()
    }
}

/// Everything the bootstrap needs to know about one backend.
#[derive(Clone)]
pub struct VcsInfo {
    /// Backend this entry describes
    pub kind: VcsKind,
    /// Executable to invoke
    pub command: String,
    /// Clone argument builder; `None` when the backend cannot clone
    pub clone_args: Option<CloneArgsFn>,
    /// Nested resource capability; `None` when the backend has none
    pub sub_resources: Option<SubResourceSupport>,
}

impl VcsInfo {
    /// Whether this backend can produce a fresh checkout
    pub fn supports_clone(&self) -> bool {
        self.clone_args.is_some()
    }

    /// Whether this backend has a nested resource step
    pub fn supports_sub_resources(&self) -> bool {
        self.sub_resources.is_some()
    }

    /// Replace the executable, keeping the capabilities
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Clone arguments for `remote` into `dest`, if this backend can clone.
    ///
    /// `dest` is passed through byte for byte.
    pub fn build_clone_args(&self, remote: &str, dest: &Path) -> Option<Vec<OsString>> {
        self.clone_args.map(|build| build(remote, dest))
    }
}

impl fmt::Debug for VcsInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VcsInfo")
            .field("kind", &self.kind)
            .field("command", &self.command)
            .field("supports_clone", &self.supports_clone())
            .field("sub_resources", &self.sub_resources)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn clone_args(remote: &str, dest: &Path) -> Vec<OsString> {
        vec!["clone".into(), remote.into(), dest.into()]
    }

    fn sample_support() -> SubResourceSupport {
        SubResourceSupport {
            marker: ".modules",
            init_args: || vec!["modules".into(), "init".into()],
            update_args: || vec!["modules".into(), "update".into()],
        }
    }

    #[test]
    fn test_build_clone_args_absent() {
        let info = VcsInfo {
            kind: VcsKind::P4,
            command: "p4".to_string(),
            clone_args: None,
            sub_resources: None,
        };
        assert!(!info.supports_clone());
        assert!(info.build_clone_args("r", Path::new("/d")).is_none());
    }

    #[test]
    fn test_with_command_keeps_capabilities() {
        let info = VcsInfo {
            kind: VcsKind::Git,
            command: "git".to_string(),
            clone_args: Some(clone_args),
            sub_resources: Some(sample_support()),
        }
        .with_command("/opt/git/bin/git");

        assert_eq!(info.command, "/opt/git/bin/git");
        assert!(info.supports_clone());
        assert!(info.supports_sub_resources());
    }

    #[test]
    fn test_marker_detection_is_existence_only() {
        let temp_dir = TempDir::new().unwrap();
        let support = sample_support();
        assert!(!support.is_declared_in(temp_dir.path()));

        std::fs::write(temp_dir.path().join(".modules"), "").unwrap();
        assert!(support.is_declared_in(temp_dir.path()));
    }

    #[test]
    fn test_command_sequence_order() {
        let [first, second] = sample_support().command_sequence();
        assert_eq!(first, vec!["modules", "init"]);
        assert_eq!(second, vec!["modules", "update"]);
    }
}
