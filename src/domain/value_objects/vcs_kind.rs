use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::common::error::SrcinitError;

/// Version control backend identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsKind {
    /// Git
    Git,
    /// Mercurial
    Hg,
    /// Subversion (SVN)
    Svn,
    /// Perforce (P4)
    P4,
}

impl Default for VcsKind {
    fn default() -> Self {
        Self::Git
    }
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for VcsKind {
    type Err = SrcinitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "git" => Ok(VcsKind::Git),
            "hg" | "mercurial" => Ok(VcsKind::Hg),
            "svn" | "subversion" => Ok(VcsKind::Svn),
            "p4" | "perforce" => Ok(VcsKind::P4),
            _ => Err(SrcinitError::unknown_vcs(s)),
        }
    }
}

impl VcsKind {
    /// All known backends
    pub const ALL: [VcsKind; 4] = [VcsKind::Git, VcsKind::Hg, VcsKind::Svn, VcsKind::P4];

    /// Canonical identifier
    pub fn identifier(&self) -> &'static str {
        match self {
            VcsKind::Git => "git",
            VcsKind::Hg => "hg",
            VcsKind::Svn => "svn",
            VcsKind::P4 => "p4",
        }
    }

    /// Get the standard executable name for this backend
    pub fn executable_name(&self) -> &'static str {
        match self {
            VcsKind::Git => "git",
            VcsKind::Hg => "hg",
            VcsKind::Svn => "svn",
            VcsKind::P4 => "p4",
        }
    }

    /// Get the metadata directory name for this backend
    pub fn metadata_dir(&self) -> &'static str {
        match self {
            VcsKind::Git => ".git",
            VcsKind::Hg => ".hg",
            VcsKind::Svn => ".svn",
            VcsKind::P4 => ".p4",
        }
    }

    /// Infer the backend from an executable path such as `/usr/local/bin/git`.
    ///
    /// Only the file stem is considered, so `git.exe` and `git` are the same.
    pub fn from_command(command: &str) -> Option<Self> {
        let stem = Path::new(command).file_stem()?.to_str()?;
        stem.parse().ok()
    }
}
