use std::sync::Arc;

use crate::application::services::reconciler::Reconciler;
use crate::common::result::SrcinitResult;
use crate::infrastructure::filesystem::mutator::Mutator;

/// Hands a freshly bootstrapped source tree over to the reconciler.
#[derive(Clone)]
pub struct ApplyHandoff {
    reconciler: Arc<dyn Reconciler>,
}

impl ApplyHandoff {
    pub fn new(reconciler: Arc<dyn Reconciler>) -> Self {
        Self { reconciler }
    }

    /// Reconcile everything. Errors are returned unchanged.
    pub fn invoke(&self, mutator: &dyn Mutator) -> SrcinitResult<()> {
        tracing::info!("applying source state to destination");
        self.reconciler.apply(mutator, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::SrcinitError;
    use crate::infrastructure::filesystem::mutator::DryRunMutator;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingReconciler {
        calls: Mutex<Vec<Option<Vec<PathBuf>>>>,
        fail: bool,
    }

    impl Reconciler for RecordingReconciler {
        fn apply(&self, _mutator: &dyn Mutator, targets: Option<&[PathBuf]>) -> SrcinitResult<()> {
            self.calls.lock().unwrap().push(targets.map(|t| t.to_vec()));
            if self.fail {
                return Err(SrcinitError::reconciliation_error("disk full", None));
            }
            Ok(())
        }
    }

    #[test]
    fn test_invoke_forwards_without_targets() {
        let reconciler = Arc::new(RecordingReconciler::default());
        let handoff = ApplyHandoff::new(reconciler.clone());

        handoff.invoke(&DryRunMutator).unwrap();
        assert_eq!(*reconciler.calls.lock().unwrap(), vec![None]);
    }

    #[test]
    fn test_invoke_propagates_error_verbatim() {
        let reconciler = Arc::new(RecordingReconciler {
            fail: true,
            ..Default::default()
        });
        let handoff = ApplyHandoff::new(reconciler);

        let err = handoff.invoke(&DryRunMutator).unwrap_err();
        assert_eq!(err.to_string(), "Reconciliation failed: disk full");
    }
}
