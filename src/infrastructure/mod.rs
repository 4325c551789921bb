/// Infrastructure layer modules
///
/// This layer provides concrete implementations for external system interactions:
/// - VCS backend table (git, hg, svn, p4)
/// - File system operations (mutators, source directory preparation, config files)
/// - Process execution (external VCS commands)
pub mod filesystem;
pub mod process;
pub mod vcs;

// Re-export commonly used types
pub use filesystem::{
    config_store::ConfigStore,
    directory_preparer::DirectoryPreparer,
    mutator::{new_mutator, DryRunMutator, FsMutator, Mutator, MutatorOptions, VerboseMutator},
};
pub use process::{ProcessRunner, SystemProcessRunner};
pub use vcs::VcsRegistry;
