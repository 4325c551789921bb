use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::services::reconciler::MirrorReconciler;
use crate::application::use_cases::apply_state::ApplyStateUseCase;
use crate::domain::entities::settings::Settings;
use crate::infrastructure::filesystem::mutator::{new_mutator, MutatorOptions};

/// Update the destination directory from the source directory
pub struct ApplyCommand {
    pub targets: Vec<PathBuf>,
}

impl ApplyCommand {
    pub fn new(targets: Vec<PathBuf>) -> Self {
        Self { targets }
    }

    pub fn execute(&self, settings: &Settings) -> Result<()> {
        let mutator = new_mutator(MutatorOptions {
            dry_run: settings.dry_run,
            verbose: settings.verbose,
        });
        let reconciler = MirrorReconciler::new(&settings.source_dir, &settings.destination_dir)
            .with_dry_run(settings.dry_run);

        ApplyStateUseCase::new(Arc::new(reconciler)).execute(mutator.as_ref(), &self.targets)?;
        Ok(())
    }
}
