//! Mock services for testing
//!
//! Recording implementations of the runner, reconciler and mutator seams.
//! All three can share one [`EventLog`] so tests can assert the global order
//! of side effects.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use srcinit::application::services::reconciler::Reconciler;
use srcinit::infrastructure::filesystem::mutator::{FsMutator, Mutator};
use srcinit::infrastructure::process::process_runner::{format_command, ProcessRunner};
use srcinit::{Result, SrcinitError};

/// One observed side effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Run {
        working_dir: Option<PathBuf>,
        program: String,
        args: Vec<OsString>,
    },
    Mkdir(PathBuf),
    Chmod(PathBuf),
    WriteFile(PathBuf),
    Reconcile {
        targets: Option<Vec<PathBuf>>,
    },
}

/// Shared, ordered record of side effects
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<Event>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn runs(&self) -> Vec<(Option<PathBuf>, String, Vec<OsString>)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Run {
                    working_dir,
                    program,
                    args,
                } => Some((working_dir, program, args)),
                _ => None,
            })
            .collect()
    }

    pub fn reconcile_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, Event::Reconcile { .. }))
            .count()
    }

    pub fn filesystem_writes(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    Event::Mkdir(_) | Event::Chmod(_) | Event::WriteFile(_)
                )
            })
            .count()
    }
}

/// Scripted outcome of one runner call
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Succeed, creating these files (relative to the clone destination)
    Succeed { create: Vec<(&'static str, &'static str)> },
    /// Fail with this exit code and stderr
    Fail { exit_code: i32, stderr: &'static str },
}

impl RunOutcome {
    pub fn ok() -> Self {
        Self::Succeed { create: Vec::new() }
    }
}

/// Mock process runner
///
/// Outcomes are consumed in call order; once exhausted every call succeeds.
/// Files of a `Succeed` outcome are created inside the last argument of the
/// call, which is the destination for clone invocations.
pub struct MockProcessRunner {
    log: EventLog,
    outcomes: Mutex<VecDeque<RunOutcome>>,
}

impl MockProcessRunner {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            outcomes: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_outcome(self, outcome: RunOutcome) -> Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }
}

#[async_trait]
impl ProcessRunner for MockProcessRunner {
    async fn run(&self, working_dir: Option<&Path>, program: &str, args: &[OsString]) -> Result<()> {
        self.log.push(Event::Run {
            working_dir: working_dir.map(Path::to_path_buf),
            program: program.to_string(),
            args: args.to_vec(),
        });

        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(RunOutcome::ok);

        match outcome {
            RunOutcome::Succeed { create } => {
                if let Some(dest) = args.last() {
                    for (relative, contents) in create {
                        let path = Path::new(dest).join(relative);
                        if let Some(parent) = path.parent() {
                            std::fs::create_dir_all(parent).unwrap();
                        }
                        std::fs::write(path, contents).unwrap();
                    }
                }
                Ok(())
            }
            RunOutcome::Fail { exit_code, stderr } => Err(SrcinitError::process_error(
                format_command(program, args),
                Some(exit_code),
                stderr,
            )),
        }
    }
}

/// Mock reconciler
pub struct MockReconciler {
    log: EventLog,
    error: Option<&'static str>,
}

impl MockReconciler {
    pub fn new(log: EventLog) -> Self {
        Self { log, error: None }
    }

    /// Fail every call with a reconciliation error
    pub fn failing(log: EventLog, message: &'static str) -> Self {
        Self {
            log,
            error: Some(message),
        }
    }
}

impl Reconciler for MockReconciler {
    fn apply(&self, _mutator: &dyn Mutator, targets: Option<&[PathBuf]>) -> Result<()> {
        self.log.push(Event::Reconcile {
            targets: targets.map(|t| t.to_vec()),
        });
        match self.error {
            Some(message) => Err(SrcinitError::reconciliation_error(message, None)),
            None => Ok(()),
        }
    }
}

/// Mutator that records every write and optionally performs it
pub struct RecordingMutator {
    log: EventLog,
    passthrough: bool,
}

impl RecordingMutator {
    /// Record and perform writes
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            passthrough: true,
        }
    }

    /// Record writes without performing them
    pub fn recording_only(log: EventLog) -> Self {
        Self {
            log,
            passthrough: false,
        }
    }
}

impl Mutator for RecordingMutator {
    fn mkdir(&self, path: &Path, mode: u32) -> io::Result<()> {
        self.log.push(Event::Mkdir(path.to_path_buf()));
        if self.passthrough {
            FsMutator.mkdir(path, mode)?;
        }
        Ok(())
    }

    fn chmod(&self, path: &Path, mode: u32) -> io::Result<()> {
        self.log.push(Event::Chmod(path.to_path_buf()));
        if self.passthrough {
            FsMutator.chmod(path, mode)?;
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
        self.log.push(Event::WriteFile(path.to_path_buf()));
        if self.passthrough {
            FsMutator.write_file(path, contents, mode)?;
        }
        Ok(())
    }
}
