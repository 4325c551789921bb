use std::ffi::OsString;
use std::fmt;
use std::sync::Arc;

use crate::application::services::apply_handoff::ApplyHandoff;
use crate::common::error::SrcinitError;
use crate::common::result::SrcinitResult;
use crate::domain::entities::bootstrap_request::BootstrapRequest;
use crate::domain::entities::vcs_info::VcsInfo;
use crate::infrastructure::filesystem::directory_preparer::DirectoryPreparer;
use crate::infrastructure::filesystem::mutator::Mutator;
use crate::infrastructure::process::process_runner::ProcessRunner;
use crate::infrastructure::vcs::registry::VcsRegistry;

/// Progress of a bootstrap run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    Start,
    VcsResolved,
    DirReady,
    Cloned,
    SubResourcesChecked,
    Applied,
    Done,
}

impl fmt::Display for BootstrapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BootstrapState::Start => "START",
            BootstrapState::VcsResolved => "VCS_RESOLVED",
            BootstrapState::DirReady => "DIR_READY",
            BootstrapState::Cloned => "CLONED",
            BootstrapState::SubResourcesChecked => "SUBRESOURCES_CHECKED",
            BootstrapState::Applied => "APPLIED",
            BootstrapState::Done => "DONE",
        };
        f.write_str(name)
    }
}

/// Backend selection for a bootstrap run
#[derive(Debug, Clone, Default)]
pub struct BootstrapSourceConfig {
    /// Registry identifier (`git`, `hg`, ...)
    pub vcs_kind: Option<String>,
    /// Executable override
    pub vcs_command: Option<String>,
}

impl BootstrapSourceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vcs_kind(mut self, kind: impl Into<String>) -> Self {
        self.vcs_kind = Some(kind.into());
        self
    }

    pub fn with_vcs_command(mut self, command: impl Into<String>) -> Self {
        self.vcs_command = Some(command.into());
        self
    }
}

/// What a successful run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    /// States reached, in order
    pub states: Vec<BootstrapState>,
    /// Executable used for every VCS command
    pub command: String,
    /// Arguments of the clone invocation
    pub clone_args: Vec<OsString>,
    /// Whether nested resources were initialized and updated
    pub sub_resources_initialized: bool,
    /// Whether the reconciliation pass ran
    pub applied: bool,
}

/// Clones a remote into a fresh source directory and optionally applies it
pub struct BootstrapSourceUseCase {
    config: BootstrapSourceConfig,
    preparer: DirectoryPreparer,
    runner: Arc<dyn ProcessRunner>,
    handoff: ApplyHandoff,
}

impl BootstrapSourceUseCase {
    pub fn new(
        config: BootstrapSourceConfig,
        preparer: DirectoryPreparer,
        runner: Arc<dyn ProcessRunner>,
        handoff: ApplyHandoff,
    ) -> Self {
        Self {
            config,
            preparer,
            runner,
            handoff,
        }
    }

    /// Run the bootstrap. The first failing step ends the run.
    pub async fn execute(
        &self,
        request: &BootstrapRequest,
        mutator: &dyn Mutator,
    ) -> SrcinitResult<BootstrapReport> {
        let mut states = vec![BootstrapState::Start];

        // 1. Resolve the backend; nothing may touch the filesystem before this passes
        let vcs = self.resolve_vcs()?;
        let clone_args = vcs
            .build_clone_args(request.remote(), request.source_path())
            .ok_or_else(|| SrcinitError::unsupported_operation(&vcs.command, "cloning"))?;
        self.enter(&mut states, BootstrapState::VcsResolved);

        // 2. Prepare the source directory
        self.preparer.ensure(request.source_path(), mutator)?;
        self.enter(&mut states, BootstrapState::DirReady);

        // 3. Clone; the destination is an explicit argument so no working directory
        tracing::debug!(command = %vcs.command, args = ?clone_args, "cloning");
        self.runner.run(None, &vcs.command, &clone_args).await?;
        self.enter(&mut states, BootstrapState::Cloned);

        // 4. Nested resources, for backends that have them
        let sub_resources_initialized = self.init_sub_resources(&vcs, request).await?;
        self.enter(&mut states, BootstrapState::SubResourcesChecked);

        // 5. Hand off to reconciliation
        let applied = request.apply_after_clone();
        if applied {
            self.handoff.invoke(mutator)?;
            self.enter(&mut states, BootstrapState::Applied);
        }
        self.enter(&mut states, BootstrapState::Done);

        Ok(BootstrapReport {
            states,
            command: vcs.command,
            clone_args,
            sub_resources_initialized,
            applied,
        })
    }

    fn resolve_vcs(&self) -> SrcinitResult<VcsInfo> {
        VcsRegistry::resolve_configured(
            self.config.vcs_kind.as_deref(),
            self.config.vcs_command.as_deref(),
        )
    }

    async fn init_sub_resources(
        &self,
        vcs: &VcsInfo,
        request: &BootstrapRequest,
    ) -> SrcinitResult<bool> {
        let Some(support) = vcs.sub_resources else {
            return Ok(false);
        };
        if !support.is_declared_in(request.source_path()) {
            tracing::debug!(marker = support.marker, "no nested resources declared");
            return Ok(false);
        }

        tracing::info!(marker = support.marker, "initializing nested resources");
        for args in support.command_sequence() {
            self.runner
                .run(Some(request.source_path()), &vcs.command, &args)
                .await?;
        }
        Ok(true)
    }

    fn enter(&self, states: &mut Vec<BootstrapState>, state: BootstrapState) {
        tracing::info!(state = %state, "bootstrap");
        states.push(state);
    }
}
