use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use crate::application::services::apply_handoff::ApplyHandoff;
use crate::application::services::reconciler::MirrorReconciler;
use crate::application::use_cases::bootstrap_source::{BootstrapSourceConfig, BootstrapSourceUseCase};
use crate::domain::entities::bootstrap_request::BootstrapRequest;
use crate::domain::entities::settings::Settings;
use crate::infrastructure::filesystem::directory_preparer::DirectoryPreparer;
use crate::infrastructure::filesystem::mutator::{new_mutator, MutatorOptions};
use crate::infrastructure::process::process_runner::SystemProcessRunner;

/// Clone a remote into the source directory
pub struct InitCommand {
    /// Remote repository location
    pub repo: String,
    /// Explicit `--apply` value; `None` falls back to configuration
    pub apply: Option<bool>,
}

impl InitCommand {
    pub fn new(repo: String, apply: Option<bool>) -> Self {
        Self { repo, apply }
    }

    /// Execute the init command
    pub async fn execute(&self, settings: &Settings) -> Result<()> {
        let apply = self.apply.unwrap_or(settings.apply_by_default);
        let request = BootstrapRequest::new(&self.repo, &settings.source_dir, apply)?;

        let mutator = new_mutator(MutatorOptions {
            dry_run: settings.dry_run,
            verbose: settings.verbose,
        });
        let runner = SystemProcessRunner::new()
            .with_verbose(settings.verbose)
            .with_dry_run(settings.dry_run);
        let reconciler = MirrorReconciler::new(&settings.source_dir, &settings.destination_dir)
            .with_dry_run(settings.dry_run);

        let config = BootstrapSourceConfig {
            vcs_kind: settings.vcs_kind.clone(),
            vcs_command: settings.vcs_command.clone(),
        };
        let use_case = BootstrapSourceUseCase::new(
            config,
            DirectoryPreparer::new(settings.umask),
            Arc::new(runner),
            ApplyHandoff::new(Arc::new(reconciler)),
        );

        let report = use_case.execute(&request, mutator.as_ref()).await?;

        if settings.dry_run {
            println!("{} nothing was changed", "(dry run)".yellow());
            println!(
                "🔍 Would clone {} into {}",
                self.repo,
                request.source_path().display()
            );
            if report.applied {
                println!(
                    "🔍 Would apply source state to {}",
                    settings.destination_dir.display()
                );
            }
            return Ok(());
        }

        println!(
            "✅ Cloned {} into {}",
            self.repo,
            request.source_path().display()
        );
        if report.sub_resources_initialized {
            println!("📦 Initialized nested repositories");
        }
        if report.applied {
            println!(
                "📁 Applied source state to {}",
                settings.destination_dir.display()
            );
        } else {
            println!("📝 Run 'srcinit apply' to update {}", settings.destination_dir.display());
        }

        Ok(())
    }
}
