use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

use crate::common::error::SrcinitError;
use crate::common::result::SrcinitResult;

/// Umask applied when none is configured
pub const DEFAULT_UMASK: u32 = 0o022;

/// VCS設定
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcsSection {
    /// バックエンド識別子（git, hg, svn, p4）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// 実行ファイルの上書き
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

/// apply設定
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplySection {
    /// `init --apply` のデフォルト値
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
}

/// srcinit.yaml設定ファイルの構造
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// ソースディレクトリ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<PathBuf>,

    /// 状態適用先ディレクトリ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_dir: Option<PathBuf>,

    /// ディレクトリ作成時のumask（整数または8進数文字列）
    #[serde(
        default,
        deserialize_with = "deserialize_umask",
        skip_serializing_if = "Option::is_none"
    )]
    pub umask: Option<u32>,

    #[serde(default)]
    pub vcs: VcsSection,

    #[serde(default)]
    pub apply: ApplySection,
}

fn deserialize_umask<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Umask {
        Number(u32),
        Octal(String),
    }

    match Option::<Umask>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Umask::Number(value)) => Ok(Some(value)),
        Some(Umask::Octal(text)) => {
            let digits = text.trim().trim_start_matches("0o");
            u32::from_str_radix(digits, 8)
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid octal umask '{}'", text)))
        }
    }
}

/// コマンドラインや環境変数からの上書き値
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub source_dir: Option<PathBuf>,
    pub destination_dir: Option<PathBuf>,
    pub vcs: Option<String>,
    pub dry_run: bool,
    pub verbose: bool,
}

/// 解決済みの実行設定
///
/// 優先順位: 上書き値 > 設定ファイル > 組み込みデフォルト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub source_dir: PathBuf,
    pub destination_dir: PathBuf,
    pub umask: u32,
    pub vcs_kind: Option<String>,
    pub vcs_command: Option<String>,
    pub apply_by_default: bool,
    pub dry_run: bool,
    pub verbose: bool,
}

impl Settings {
    /// 設定ファイルと上書き値から設定を解決する
    pub fn resolve(
        file: ConfigFile,
        overrides: SettingsOverrides,
        home: Option<&Path>,
        cwd: &Path,
    ) -> SrcinitResult<Self> {
        let home_required = || {
            home.map(Path::to_path_buf).ok_or_else(|| {
                SrcinitError::config_error("could not determine the home directory", None)
            })
        };

        let source_dir = match overrides.source_dir.or(file.source_dir) {
            Some(path) => absolutize(&expand_tilde(&path, home)?, cwd),
            None => home_required()?.join(".local").join("share").join("srcinit"),
        };

        let destination_dir = match overrides.destination_dir.or(file.destination_dir) {
            Some(path) => absolutize(&expand_tilde(&path, home)?, cwd),
            None => home_required()?,
        };

        Ok(Self {
            source_dir,
            destination_dir,
            umask: file.umask.unwrap_or(DEFAULT_UMASK) & 0o777,
            vcs_kind: overrides.vcs.or(file.vcs.kind),
            vcs_command: file.vcs.command,
            apply_by_default: file.apply.default.unwrap_or(true),
            dry_run: overrides.dry_run,
            verbose: overrides.verbose,
        })
    }
}

/// 先頭の `~` をホームディレクトリに展開する
pub fn expand_tilde(path: &Path, home: Option<&Path>) -> SrcinitResult<PathBuf> {
    let mut components = path.components();
    match components.next() {
        Some(std::path::Component::Normal(first)) if first == "~" => {
            let home = home.ok_or_else(|| {
                SrcinitError::config_error(
                    format!("cannot expand '~' in {}", path.display()),
                    Some(path.to_path_buf()),
                )
            })?;
            Ok(home.join(components.as_path()))
        }
        _ => Ok(path.to_path_buf()),
    }
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
