use std::path::PathBuf;
use std::sync::Arc;

use crate::application::services::reconciler::Reconciler;
use crate::common::result::SrcinitResult;
use crate::infrastructure::filesystem::mutator::Mutator;

/// Standalone reconciliation pass (`srcinit apply`)
pub struct ApplyStateUseCase {
    reconciler: Arc<dyn Reconciler>,
}

impl ApplyStateUseCase {
    pub fn new(reconciler: Arc<dyn Reconciler>) -> Self {
        Self { reconciler }
    }

    /// Reconcile `targets`; an empty list means everything.
    pub fn execute(&self, mutator: &dyn Mutator, targets: &[PathBuf]) -> SrcinitResult<()> {
        let targets = if targets.is_empty() {
            None
        } else {
            Some(targets)
        };
        self.reconciler.apply(mutator, targets)
    }
}
