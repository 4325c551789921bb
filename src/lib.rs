//! # srcinit - source directory bootstrap
//!
//! `srcinit` turns a bare remote repository reference into a local,
//! permission-correct source tree, then optionally brings a destination tree
//! in line with it. It is meant to be run once on a new host.
//!
//! ## Quick Start
//!
//! ```bash
//! # Clone, initialize submodules, and apply
//! srcinit init https://github.com/example/dotfiles.git
//!
//! # Clone only
//! srcinit init --apply=false git@github.com:example/dotfiles.git
//! ```
//!
//! ## Architecture
//!
//! The crate is organized using clean architecture principles:
//!
//! - [`domain`]: backend identifiers, capability table entries, requests and settings
//! - [`application`]: the bootstrap use case and the reconciliation seam
//! - [`infrastructure`]: VCS registry, filesystem writes, process execution, configuration files
//! - [`presentation`]: CLI interface
//! - [`common`]: error handling
//!
//! ## Bootstrap sequence
//!
//! [`application::use_cases::bootstrap_source::BootstrapSourceUseCase`] runs,
//! in order and stopping at the first failure:
//!
//! 1. resolve the backend through [`infrastructure::vcs::registry::VcsRegistry`]
//!    and fail fast if it cannot clone;
//! 2. create or correct the source directory
//!    ([`infrastructure::filesystem::directory_preparer::DirectoryPreparer`]);
//! 3. run the clone;
//! 4. initialize and update nested repositories when the backend supports
//!    them and the tree declares some;
//! 5. hand off to a [`application::services::reconciler::Reconciler`] when
//!    requested.
//!
//! ## Using the Library
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use srcinit::application::services::apply_handoff::ApplyHandoff;
//! use srcinit::application::services::reconciler::MirrorReconciler;
//! use srcinit::application::use_cases::bootstrap_source::{
//!     BootstrapSourceConfig, BootstrapSourceUseCase,
//! };
//! use srcinit::domain::entities::bootstrap_request::BootstrapRequest;
//! use srcinit::infrastructure::filesystem::directory_preparer::DirectoryPreparer;
//! use srcinit::infrastructure::filesystem::mutator::FsMutator;
//! use srcinit::infrastructure::process::process_runner::SystemProcessRunner;
//!
//! # async fn example() -> srcinit::Result<()> {
//! let request = BootstrapRequest::new(
//!     "https://github.com/example/dotfiles.git",
//!     "/home/user/.local/share/srcinit",
//!     true,
//! )?;
//!
//! let use_case = BootstrapSourceUseCase::new(
//!     BootstrapSourceConfig::new().with_vcs_kind("git"),
//!     DirectoryPreparer::default(),
//!     Arc::new(SystemProcessRunner::new()),
//!     ApplyHandoff::new(Arc::new(MirrorReconciler::new(
//!         "/home/user/.local/share/srcinit",
//!         "/home/user",
//!     ))),
//! );
//!
//! let report = use_case.execute(&request, &FsMutator).await?;
//! println!("clone args: {:?}", report.clone_args);
//! # Ok(())
//! # }
//! ```

// Documentation attributes
#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::SrcinitError;
pub use crate::common::result::SrcinitResult as Result;
