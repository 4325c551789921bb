use std::path::{Path, PathBuf};

use crate::common::error::SrcinitError;
use crate::common::result::SrcinitResult;

/// ソースディレクトリのブートストラップ要求
///
/// 1回の実行につき1つ作成され、実行中は変更されない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapRequest {
    remote: String,
    source_path: PathBuf,
    apply_after_clone: bool,
}

impl BootstrapRequest {
    /// 新しい要求を作成する
    ///
    /// `remote` は空であってはならず、`source_path` は絶対パスでなければならない。
    pub fn new(
        remote: impl Into<String>,
        source_path: impl Into<PathBuf>,
        apply_after_clone: bool,
    ) -> SrcinitResult<Self> {
        let remote = remote.into();
        let source_path = source_path.into();

        if remote.trim().is_empty() {
            return Err(SrcinitError::validation_error(
                "remote",
                "remote repository location must not be empty",
                None,
            ));
        }

        if !source_path.is_absolute() {
            return Err(SrcinitError::validation_error(
                "source_path",
                "source directory must be an absolute path",
                Some(source_path.display().to_string()),
            ));
        }

        Ok(Self {
            remote,
            source_path,
            apply_after_clone,
        })
    }

    /// リモートリポジトリの場所
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// クローン先のソースディレクトリ
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// クローン後に状態適用を行うか
    pub fn apply_after_clone(&self) -> bool {
        self.apply_after_clone
    }
}
