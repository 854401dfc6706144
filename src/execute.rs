use anyhow::{bail, Context, Result};
use colored::Colorize;
use gisthook::config::{GistConfig, Layout};
use gisthook::fetch::HttpFetcher;
use gisthook::sync::{run, SyncReport};
use tracing_subscriber::EnvFilter;
use crate::cli::CLI;

pub fn init_logging(cli: &CLI) {
    let default = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

pub fn execute(cli: CLI) -> Result<()> {
    if !cli.root.is_dir() {
        bail!("project root '{}' does not exist", cli.root.display());
    }
    let config = resolve_config(&cli)?;
    let layout = Layout::new(&cli.root, &config.scan);

    let fetcher = HttpFetcher::new().context("could not create HTTP client")?;
    let report = run(&layout, &config, &fetcher)
        .with_context(|| format!("gist sync failed for {}", layout.root.display()))?;

    print_summary(&report);
    if !report.is_success() {
        bail!("{} gist(s) failed to sync", report.failed.len());
    }
    Ok(())
}

/// `gisthook.toml` with command-line flags applied on top.
fn resolve_config(cli: &CLI) -> Result<GistConfig> {
    let mut config = GistConfig::load(&cli.root)?;
    if let Some(user) = &cli.user {
        config.catalog.user = user.clone();
        config.catalog.listing_url = None;
    }
    if let Some(url) = &cli.listing_url {
        config.catalog.listing_url = Some(url.clone());
    }
    if cli.expand_groups {
        config.catalog.expand_groups = true;
    }
    if cli.fail_fast {
        config.sync.fail_fast = true;
    }
    Ok(config)
}

fn print_summary(report: &SyncReport) {
    for name in &report.downloaded {
        println!("{} {}", "downloaded".green(), name);
    }
    for name in &report.up_to_date {
        println!("{} {}", "up to date".dimmed(), name);
    }
    for name in &report.missing {
        println!("{} {}", "not in catalog".yellow(), name);
    }
    for (name, e) in &report.failed {
        println!("{} {}: {}", "failed".red(), name, e);
    }
    println!(
        "{} downloaded, {} up to date, {} missing, {} failed",
        report.downloaded.len(),
        report.up_to_date.len(),
        report.missing.len(),
        report.failed.len()
    );
}
