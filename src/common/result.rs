use crate::common::error::SrcinitError;
use std::path::PathBuf;

/// srcinit全体で使用するResult型のエイリアス
///
/// # Examples
///
/// ```
/// use srcinit::common::result::SrcinitResult;
/// use srcinit::common::error::SrcinitError;
///
/// fn example_function() -> SrcinitResult<String> {
///     Ok("success".to_string())
/// }
///
/// fn example_with_error() -> SrcinitResult<()> {
///     Err(SrcinitError::internal_error("Something went wrong"))
/// }
/// ```
pub type SrcinitResult<T> = Result<T, SrcinitError>;

/// 標準のResult型をSrcinitResultに変換するためのヘルパー
pub trait ResultExt<T, E> {
    /// ディレクトリ準備のエラーとして変換
    ///
    /// ```
    /// use srcinit::common::result::{SrcinitResult, ResultExt};
    /// use std::path::PathBuf;
    ///
    /// let result: Result<(), std::io::Error> = Err(std::io::Error::new(
    ///     std::io::ErrorKind::PermissionDenied, "denied"
    /// ));
    /// let converted: SrcinitResult<()> =
    ///     result.with_directory_error("mkdir failed", Some(PathBuf::from("/src")));
    /// assert!(converted.is_err());
    /// ```
    fn with_directory_error(self, message: impl Into<String>, path: Option<PathBuf>) -> SrcinitResult<T>
    where
        E: Into<std::io::Error>;

    /// 状態適用（reconciliation）のエラーとして変換
    fn with_reconciliation_error(
        self,
        message: impl Into<String>,
        path: Option<PathBuf>,
    ) -> SrcinitResult<T>
    where
        E: std::error::Error + Send + Sync + 'static;

    /// 設定読み込みのエラーとして変換
    fn with_config_error(self, message: impl Into<String>, path: Option<PathBuf>) -> SrcinitResult<T>
    where
        E: std::error::Error + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn with_directory_error(self, message: impl Into<String>, path: Option<PathBuf>) -> SrcinitResult<T>
    where
        E: Into<std::io::Error>,
    {
        self.map_err(|e| SrcinitError::directory_error_with_source(message, path, e.into()))
    }

    fn with_reconciliation_error(
        self,
        message: impl Into<String>,
        path: Option<PathBuf>,
    ) -> SrcinitResult<T>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.map_err(|e| SrcinitError::reconciliation_error_with_source(message, path, e))
    }

    fn with_config_error(self, message: impl Into<String>, path: Option<PathBuf>) -> SrcinitResult<T>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.map_err(|e| SrcinitError::config_error_with_source(message, path, e))
    }
}
