//! Test fixtures
//!
//! Temporary directory layouts and pre-wired use cases.

use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use srcinit::application::services::apply_handoff::ApplyHandoff;
use srcinit::application::use_cases::bootstrap_source::{
    BootstrapSourceConfig, BootstrapSourceUseCase,
};
use srcinit::domain::entities::bootstrap_request::BootstrapRequest;
use srcinit::infrastructure::filesystem::directory_preparer::DirectoryPreparer;

use super::mock_services::{EventLog, MockProcessRunner, MockReconciler, RunOutcome};

pub const REMOTE: &str = "https://example.test/repo.git";

/// A scratch home with a not-yet-existing source directory
pub struct TestHome {
    pub temp_dir: TempDir,
    pub source: PathBuf,
    pub log: EventLog,
}

impl TestHome {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join(".local").join("share").join("srcinit");
        Self {
            temp_dir,
            source,
            log: EventLog::new(),
        }
    }

    pub fn request(&self, apply: bool) -> BootstrapRequest {
        BootstrapRequest::new(REMOTE, &self.source, apply).unwrap()
    }

    /// Use case wired to mocks sharing this home's event log
    pub fn use_case(
        &self,
        config: BootstrapSourceConfig,
        outcomes: Vec<RunOutcome>,
    ) -> BootstrapSourceUseCase {
        self.use_case_with_reconciler(config, outcomes, MockReconciler::new(self.log.clone()))
    }

    pub fn use_case_with_reconciler(
        &self,
        config: BootstrapSourceConfig,
        outcomes: Vec<RunOutcome>,
        reconciler: MockReconciler,
    ) -> BootstrapSourceUseCase {
        let runner = outcomes
            .into_iter()
            .fold(MockProcessRunner::new(self.log.clone()), |runner, outcome| {
                runner.with_outcome(outcome)
            });

        BootstrapSourceUseCase::new(
            config,
            DirectoryPreparer::default(),
            Arc::new(runner),
            ApplyHandoff::new(Arc::new(reconciler)),
        )
    }
}

/// Clone outcome that drops a `.gitmodules` marker into the tree
pub fn clone_with_submodules() -> RunOutcome {
    RunOutcome::Succeed {
        create: vec![
            (".gitmodules", "[submodule \"vim/pack\"]\n"),
            (".vimrc", "set nu\n"),
        ],
    }
}

/// Clone outcome with an ordinary tree
pub fn clone_plain() -> RunOutcome {
    RunOutcome::Succeed {
        create: vec![(".bashrc", "export EDITOR=vi\n")],
    }
}
