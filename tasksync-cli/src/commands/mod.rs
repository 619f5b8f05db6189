//! Subcommands and the arguments they share.

pub mod plan;
pub mod sync;
pub mod tasks;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use tasksync_core::{document::DEFAULT_CANDIDATES, TaskId};
use tasksync_sync::{pipeline::SyncConfig, SyncOptions};
use tasksync_tracker::{
    github::{DEFAULT_API_URL, DEFAULT_MAX_PAGES},
    ApiToken, ClientConfig, LabelPolicy, RepoSlug,
};

/// Where to find the backlog document.
#[derive(Args, Debug)]
pub struct DocumentArgs {
    /// Backlog file to read; repeat to give fallbacks, the first existing one
    /// is used. Defaults to docs/issue/pl/TASKS.md, then docs/issue/TASKS.md.
    #[arg(long = "file", short = 'f', value_name = "PATH")]
    pub files: Vec<PathBuf>,
}

impl DocumentArgs {
    pub fn candidates(&self) -> Vec<PathBuf> {
        if self.files.is_empty() {
            DEFAULT_CANDIDATES.iter().map(PathBuf::from).collect()
        } else {
            self.files.clone()
        }
    }
}

/// Tracker connection and labelling settings.
#[derive(Args, Debug)]
pub struct TrackerArgs {
    /// Target repository.
    #[arg(long, env = "GITHUB_REPOSITORY", value_name = "OWNER/NAME")]
    pub repo: String,

    /// Access token sent as a bearer token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: String,

    /// REST API root (GitHub Enterprise or a test server).
    #[arg(long = "api-url", env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Give up listing issues after this many pages.
    #[arg(
        long,
        env = "TASKSYNC_MAX_PAGES",
        default_value_t = DEFAULT_MAX_PAGES,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_pages: u32,

    /// Attach only the base `task` label, never `priority-*` labels.
    #[arg(long)]
    pub no_priority_labels: bool,
}

impl TrackerArgs {
    pub fn client_config(&self) -> Result<ClientConfig> {
        let repo: RepoSlug = self
            .repo
            .parse()
            .context("GITHUB_REPOSITORY / --repo is not usable")?;
        if self.token.trim().is_empty() {
            bail!("GITHUB_TOKEN / --token is empty");
        }
        Ok(ClientConfig::new(repo, ApiToken::new(self.token.trim()))
            .with_api_url(&self.api_url)
            .with_max_pages(self.max_pages))
    }

    pub fn label_policy(&self) -> LabelPolicy {
        if self.no_priority_labels {
            LabelPolicy::base_only()
        } else {
            LabelPolicy::default()
        }
    }
}

/// Resolve flags into a run configuration rooted at the working directory.
pub fn sync_config(
    document: &DocumentArgs,
    tracker: &TrackerArgs,
    dry_run: bool,
) -> Result<SyncConfig> {
    let root = std::env::current_dir().context("could not determine working directory")?;
    Ok(SyncConfig {
        client: tracker.client_config()?,
        root,
        candidates: document.candidates(),
        options: SyncOptions {
            labels: tracker.label_policy(),
            dry_run,
        },
    })
}

pub fn warn_duplicates(duplicates: &[TaskId]) {
    for id in duplicates {
        eprintln!(
            "{} duplicate {id}: an earlier block was ignored, the last one is used",
            "warning:".yellow().bold()
        );
    }
}
