//! ghsweep CLI - one query across a fleet of repositories.
//!
//! Usage:
//!   ghsweep "thread safety"              # sweep every configured repo
//!   ghsweep -c repos.yml widget --tree   # explicit config, tree output
//!   ghsweep widget --fragments           # include match fragments
//!   ghsweep --quota                      # report the quota policy only

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use tracing_subscriber::EnvFilter;

use ghsweep::{Config, Manager, OutputFormat, RenderOptions, Renderer};

#[derive(Parser)]
#[command(name = "ghsweep")]
#[command(about = "Search a fleet of GitHub repositories with one query", long_about = None)]
struct Cli {
    /// Query term
    #[arg(required_unless_present = "quota")]
    query: Option<String>,

    /// Configuration file (default: ghsweep.yml, then <config dir>/ghsweep/config.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Personal access token (overrides GITHUB_TOKEN and the config file)
    #[arg(long)]
    token: Option<String>,

    /// Render results as a tree
    #[arg(long)]
    tree: bool,

    /// Show match fragments under each hit
    #[arg(long)]
    fragments: bool,

    /// Report the search quota policy instead of searching
    #[arg(long)]
    quota: bool,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::locate().context(
            "no configuration file found (ghsweep.yml or <config dir>/ghsweep/config.yml)",
        )?,
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    let token = config.token_with_overrides(cli.token, std::env::var("GITHUB_TOKEN").ok());
    let manager = Manager::new(config.repos, token)?;

    let Some(query) = cli.query else {
        let (_, limit) = manager.remaining_quota();
        println!("search quota policy: {limit} calls per minute");
        return Ok(());
    };

    let report = manager.search(&query)?;
    let options = RenderOptions {
        fragments: cli.fragments,
        format: if cli.tree {
            OutputFormat::Tree
        } else {
            OutputFormat::Text
        },
    };
    print!("{}", Renderer::new(options).render(&report));

    let (remaining, limit) = manager.remaining_quota();
    let line = match remaining {
        Some(0) => format!("search quota exhausted (limit {limit}/min)").red().to_string(),
        Some(n) => format!("search quota: {n} of {limit} calls left this minute")
            .dark_grey()
            .to_string(),
        None => format!("search quota: limit {limit}/min").dark_grey().to_string(),
    };
    println!("{line}");
    Ok(())
}
