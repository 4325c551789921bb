use std::ffi::OsString;
use std::path::Path;

use crate::common::error::SrcinitError;
use crate::common::result::SrcinitResult;
use crate::domain::entities::vcs_info::{CloneArgsFn, SubResourceSupport, VcsInfo};
use crate::domain::value_objects::vcs_kind::VcsKind;

fn git_clone_args(remote: &str, dest: &Path) -> Vec<OsString> {
    vec!["clone".into(), remote.into(), dest.into()]
}

fn hg_clone_args(remote: &str, dest: &Path) -> Vec<OsString> {
    vec!["clone".into(), remote.into(), dest.into()]
}

fn svn_checkout_args(remote: &str, dest: &Path) -> Vec<OsString> {
    vec!["checkout".into(), remote.into(), dest.into()]
}

fn git_submodule_init_args() -> Vec<OsString> {
    vec!["submodule".into(), "init".into()]
}

fn git_submodule_update_args() -> Vec<OsString> {
    vec!["submodule".into(), "update".into()]
}

const GIT_SUBMODULES: SubResourceSupport = SubResourceSupport {
    marker: ".gitmodules",
    init_args: git_submodule_init_args,
    update_args: git_submodule_update_args,
};

/// Static table of supported version control backends
pub struct VcsRegistry;

impl VcsRegistry {
    /// Registry entry for a known backend
    pub fn info(kind: VcsKind) -> VcsInfo {
        let (clone_args, sub_resources) = match kind {
            VcsKind::Git => (
                Some(git_clone_args as CloneArgsFn),
                Some(GIT_SUBMODULES),
            ),
            VcsKind::Hg => (Some(hg_clone_args as CloneArgsFn), None),
            VcsKind::Svn => (Some(svn_checkout_args as CloneArgsFn), None),
            // p4 syncs into a client workspace; there is no one-shot clone.
            VcsKind::P4 => (None, None),
        };

        VcsInfo {
            kind,
            command: kind.executable_name().to_string(),
            clone_args,
            sub_resources,
        }
    }

    /// Resolve an identifier such as `git` or `subversion`
    pub fn resolve(identifier: &str) -> SrcinitResult<VcsInfo> {
        let kind: VcsKind = identifier.parse()?;
        Ok(Self::info(kind))
    }

    /// Resolve from configuration, honoring an executable override.
    ///
    /// Without an explicit identifier the backend is inferred from the
    /// override's base name, falling back to git.
    pub fn resolve_configured(
        identifier: Option<&str>,
        command: Option<&str>,
    ) -> SrcinitResult<VcsInfo> {
        let info = match (identifier, command) {
            (Some(identifier), _) => Self::resolve(identifier)?,
            (None, Some(command)) => {
                let kind = VcsKind::from_command(command).ok_or_else(|| {
                    SrcinitError::unknown_vcs(
                        Path::new(command)
                            .file_name()
                            .map(|name| name.to_string_lossy().into_owned())
                            .unwrap_or_else(|| command.to_string()),
                    )
                })?;
                Self::info(kind)
            }
            (None, None) => Self::info(VcsKind::default()),
        };

        Ok(match command {
            Some(command) => info.with_command(command),
            None => info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_resolve_known_backends() {
        assert_eq!(VcsRegistry::resolve("git").unwrap().command, "git");
        assert_eq!(VcsRegistry::resolve("mercurial").unwrap().command, "hg");
        assert_eq!(VcsRegistry::resolve("svn").unwrap().command, "svn");
        assert_eq!(VcsRegistry::resolve("p4").unwrap().command, "p4");
    }

    #[test]
    fn test_resolve_unknown_backend() {
        let err = VcsRegistry::resolve("bzr").unwrap_err();
        assert!(matches!(err, SrcinitError::UnknownVcs { .. }));
    }

    #[test]
    fn test_clone_args_contain_remote_and_dest_verbatim() {
        let remote = "https://example.test/repo.git";
        let dest = PathBuf::from("/home/user/.local/share/srcinit");

        for info in VcsKind::ALL.map(VcsRegistry::info).into_iter().filter(|i| i.supports_clone()) {
            let first = info.build_clone_args(remote, &dest).unwrap();
            let second = info.build_clone_args(remote, &dest).unwrap();
            assert_eq!(first, second, "{} clone args must be deterministic", info.kind);

            let remote_pos = first.iter().position(|a| a == remote).unwrap();
            let dest_pos = first.iter().position(|a| a == dest.as_os_str()).unwrap();
            assert!(remote_pos < dest_pos);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_destination_is_passed_verbatim() {
        use std::os::unix::ffi::OsStrExt;

        let dest = Path::new(std::ffi::OsStr::from_bytes(b"/tmp/src\xff"));
        let args = VcsRegistry::info(VcsKind::Git)
            .build_clone_args("R", dest)
            .unwrap();
        assert_eq!(args[2].as_os_str().as_bytes(), b"/tmp/src\xff");
    }

    #[test]
    fn test_backend_specific_clone_args() {
        let dest = Path::new("/src");
        assert_eq!(
            VcsRegistry::info(VcsKind::Git).build_clone_args("R", dest).unwrap(),
            vec!["clone", "R", "/src"]
        );
        assert_eq!(
            VcsRegistry::info(VcsKind::Svn).build_clone_args("R", dest).unwrap(),
            vec!["checkout", "R", "/src"]
        );
        assert!(VcsRegistry::info(VcsKind::P4).build_clone_args("R", dest).is_none());
    }

    #[test]
    fn test_only_git_has_sub_resources() {
        let git = VcsRegistry::info(VcsKind::Git);
        let support = git.sub_resources.unwrap();
        assert_eq!(support.marker, ".gitmodules");
        assert_eq!(
            support.command_sequence(),
            [vec!["submodule", "init"], vec!["submodule", "update"]]
                .map(|args| args.into_iter().map(OsString::from).collect::<Vec<_>>())
        );

        assert!(!VcsRegistry::info(VcsKind::Hg).supports_sub_resources());
        assert!(!VcsRegistry::info(VcsKind::Svn).supports_sub_resources());
    }

    #[test]
    fn test_resolve_configured_infers_from_command() {
        let info = VcsRegistry::resolve_configured(None, Some("/usr/local/bin/git")).unwrap();
        assert_eq!(info.kind, VcsKind::Git);
        assert_eq!(info.command, "/usr/local/bin/git");
        assert!(info.supports_sub_resources());
    }

    #[test]
    fn test_resolve_configured_identifier_wins() {
        let info = VcsRegistry::resolve_configured(Some("hg"), Some("/opt/wrapper")).unwrap();
        assert_eq!(info.kind, VcsKind::Hg);
        assert_eq!(info.command, "/opt/wrapper");
    }

    #[test]
    fn test_resolve_configured_unknown_command() {
        let err = VcsRegistry::resolve_configured(None, Some("/opt/bin/fossil")).unwrap_err();
        assert!(matches!(err, SrcinitError::UnknownVcs { identifier } if identifier == "fossil"));
    }

    #[test]
    fn test_resolve_configured_defaults_to_git() {
        let info = VcsRegistry::resolve_configured(None, None).unwrap();
        assert_eq!(info.kind, VcsKind::Git);
        assert_eq!(info.command, "git");
    }
}
