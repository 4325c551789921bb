pub mod commands;

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use std::env;
use std::path::PathBuf;
use std::process::exit;
use tracing_subscriber::EnvFilter;

use crate::domain::entities::settings::{Settings, SettingsOverrides};
use crate::infrastructure::filesystem::config_store::ConfigStore;
use commands::{ApplyCommand, InitCommand};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("SRCINIT_GIT_HASH"),
    ", built ",
    env!("SRCINIT_BUILD_DATE"),
    " for ",
    env!("SRCINIT_BUILD_TARGET"),
    ")"
);

/// srcinit - bootstrap a source directory from a version control remote
#[derive(Parser, Debug)]
#[command(name = "srcinit")]
#[command(about = "Bootstrap a source directory from a version control remote")]
#[command(version, long_version = LONG_VERSION)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to ~/.config/srcinit/srcinit.yaml)
    #[arg(short, long, global = true, env = "SRCINIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Source directory
    #[arg(short = 'S', long, global = true, env = "SRCINIT_SOURCE")]
    pub source: Option<PathBuf>,

    /// Destination directory
    #[arg(short = 'D', long, global = true, env = "SRCINIT_DESTINATION")]
    pub destination: Option<PathBuf>,

    /// Version control backend (git, hg, svn, p4)
    #[arg(long, global = true, env = "SRCINIT_VCS")]
    pub vcs: Option<String>,

    /// Show what would be done without changing anything
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clone a repository into the source directory, then apply it
    ///
    /// Run this once on a new host. The source directory is created with
    /// private permissions, the repository is cloned into it, nested
    /// repositories (git submodules) are initialized, and the destination
    /// directory is updated to match. Use --apply=false to stop after the
    /// checkout.
    Init {
        /// Remote repository, e.g. https://github.com/example/dotfiles.git
        repo: String,

        /// Update the destination directory after cloning
        #[arg(
            long,
            num_args = 0..=1,
            require_equals = true,
            default_missing_value = "true",
            action = ArgAction::Set
        )]
        apply: Option<bool>,
    },

    /// Update the destination directory to match the source directory
    Apply {
        /// Destination paths to update (if not specified, everything is updated)
        targets: Vec<PathBuf>,
    },
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    pub fn from_cli(cli: Cli) -> Self {
        Self { cli }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        if self.cli.no_color {
            colored::control::set_override(false);
        }
        init_logging(self.cli.verbose);

        match self.handle_command().await {
            Ok(_) => Ok(()),
            Err(e) => {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
                exit(1);
            }
        }
    }

    async fn handle_command(&self) -> anyhow::Result<()> {
        let settings = self.resolve_settings()?;
        tracing::debug!(?settings, "resolved settings");

        match &self.cli.command {
            Commands::Init { repo, apply } => {
                InitCommand::new(repo.clone(), *apply)
                    .execute(&settings)
                    .await
            }
            Commands::Apply { targets } => ApplyCommand::new(targets.clone()).execute(&settings),
        }
    }

    fn resolve_settings(&self) -> anyhow::Result<Settings> {
        let file = ConfigStore::load(self.cli.config.as_deref())?;
        let overrides = SettingsOverrides {
            source_dir: self.cli.source.clone(),
            destination_dir: self.cli.destination.clone(),
            vcs: self.cli.vcs.clone(),
            dry_run: self.cli.dry_run,
            verbose: self.cli.verbose,
        };
        let home = dirs::home_dir();
        let cwd = env::current_dir()?;
        Ok(Settings::resolve(file, overrides, home.as_deref(), &cwd)?)
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "srcinit=info" } else { "srcinit=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
