use std::path::PathBuf;
use clap::Parser;

/// Syncs the gists included from a project's sources into `gist/github/`
#[derive(Debug, Parser, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct CLI {
    /// Project root. `src/` and `include/` are scanned; gists are cached in `gist/github/`
    pub root: PathBuf,
    /// GitHub user whose gists are listed (overrides `gisthook.toml`)
    #[clap(long)]
    pub user: Option<String>,
    /// Full URL of the gist listing (overrides `--user`)
    #[clap(long)]
    pub listing_url: Option<String>,
    /// Index every file of a multi-file gist, not only the first
    #[clap(long)]
    pub expand_groups: bool,
    /// Abort at the first failed download
    #[clap(long)]
    pub fail_fast: bool,
    /// Log every decision
    #[clap(short, long, conflicts_with = "quiet")]
    pub verbose: bool,
    /// Only log warnings and errors
    #[clap(short, long)]
    pub quiet: bool,
}
