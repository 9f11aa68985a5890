//! Docket-Harvest main entry point
//!
//! This is the command-line interface for the Docket-Harvest document harvester.

use anyhow::{bail, Context};
use clap::Parser;
use docket_harvest::config::{load_config_with_hash, Config, CourtEntry};
use docket_harvest::crawler::{crawl_court, CrawlController};
use docket_harvest::output::print_report;
use docket_harvest::storage::FileStore;
use docket_harvest::CrawlOutcome;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Docket-Harvest: a polite court-docket document harvester
///
/// Docket-Harvest walks a range of case numbers on a court case-search
/// site, one case at a time, and saves the petitions and briefs it finds
/// under predictable filenames.
#[derive(Parser, Debug)]
#[command(name = "docket-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A polite court-docket document harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "probe")]
    dry_run: bool,

    /// Fetch and scan these sequence numbers and show what would be saved
    #[arg(long, value_name = "SEQ", num_args = 1..)]
    probe: Vec<u32>,

    /// Only crawl the configured court with this number
    #[arg(long, value_name = "N")]
    court: Option<u32>,

    /// Override the first sequence number (requires --court with several courts)
    #[arg(long, value_name = "SEQ")]
    start: Option<u32>,

    /// Override the last sequence number (requires --court with several courts)
    #[arg(long, value_name = "SEQ")]
    end: Option<u32>,

    /// Root directory for saved documents
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    let courts = select_courts(&config, &cli)?;

    if cli.dry_run {
        handle_dry_run(&config, &courts, &cli.output)?;
    } else if !cli.probe.is_empty() {
        handle_probe(&config, &courts, &cli.probe).await?;
    } else {
        handle_crawl(&config, &courts, &cli.output).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docket_harvest=info,warn"),
            1 => EnvFilter::new("docket_harvest=debug,info"),
            2 => EnvFilter::new("docket_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Resolves the courts to work on, applying --court/--start/--end
fn select_courts(config: &Config, cli: &Cli) -> anyhow::Result<Vec<CourtEntry>> {
    let mut courts = match cli.court {
        Some(number) => match config.court(number) {
            Some(court) => vec![court.clone()],
            None => bail!("Court {} is not configured", number),
        },
        None => config.courts.clone(),
    };

    if (cli.start.is_some() || cli.end.is_some()) && courts.len() > 1 {
        bail!("--start and --end need --court when several courts are configured");
    }

    for court in &mut courts {
        if let Some(start) = cli.start {
            court.start = start;
        }
        if cli.end.is_some() {
            court.end = cli.end;
        }
        if let Some(end) = court.end {
            if end < court.start {
                bail!(
                    "Court {}: end ({}) is before start ({})",
                    court.number,
                    end,
                    court.start
                );
            }
        }
    }

    Ok(courts)
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, courts: &[CourtEntry], output: &Path) -> anyhow::Result<()> {
    println!("=== Docket-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Case path: {}", config.site.case_path);
    println!("  Timeout: {}s", config.request.timeout_secs);

    println!("\nCrawl:");
    println!(
        "  Pacing: {}ms + up to {}ms",
        config.crawl.base_delay_ms, config.crawl.jitter_ms
    );
    println!(
        "  Attempts: {} (backoff unit {}ms)",
        config.crawl.max_attempts, config.crawl.backoff_unit_ms
    );
    println!("  Miss threshold: {}", config.crawl.miss_threshold);

    println!("\nRules:");
    println!("  Primary section: {}", config.rules.primary_section);
    if config.rules.petition.enabled {
        println!("  Petitions from: {}", config.rules.petition.section);
    }
    if config.rules.brief.enabled {
        println!("  Briefs from: {}", config.rules.brief.section);
    }

    let template = config.case_template()?;
    let directory = config.directory_template()?;
    let base_url = config.base_url()?;

    println!("\nCourts ({}):", courts.len());
    for court in courts {
        let category = config.category(court);
        let first = docket_harvest::CaseId::new(court.start, &template, &category)?;
        let url = docket_harvest::case::detail_url(
            &base_url,
            &config.site.case_path,
            &first,
            &category,
        )?;
        let range = match court.end {
            Some(end) => format!("{}..={}", court.start, end),
            None => format!("{}..", court.start),
        };

        println!("  - Court {} ({})", court.number, range);
        println!("    First case: {}", first);
        println!("    First URL: {}", url);
        println!(
            "    Output: {}",
            output.join(category.render(&directory)?).display()
        );
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the --probe mode: scans the given cases and prints what would be saved
async fn handle_probe(config: &Config, courts: &[CourtEntry], seqs: &[u32]) -> anyhow::Result<()> {
    let [court] = courts else {
        bail!("--probe needs --court when several courts are configured");
    };

    let controller = CrawlController::from_config(config, court, FileStore::new("."))?;

    println!(
        "=== Probe: court {} (into {}) ===\n",
        court.number,
        controller.directory().display()
    );
    let mut failed = 0;
    for &seq in seqs {
        let (id, outcome) = controller.probe(seq).await?;
        println!("{}: {}", id, outcome);
        if outcome.is_failure() {
            failed += 1;
        }

        if let CrawlOutcome::Matched {
            documents,
            disposition,
        } = &outcome
        {
            for document in documents {
                println!(
                    "  {} -> {}",
                    controller.filename(&id, document, *disposition),
                    document.url
                );
            }
        }
    }

    if failed > 0 {
        tracing::warn!("{} of {} case(s) could not be fetched", failed, seqs.len());
    }
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, courts: &[CourtEntry], output: &Path) -> anyhow::Result<()> {
    tracing::info!("Crawling {} court(s)", courts.len());

    let mut failed = 0;
    for court in courts {
        let report = crawl_court(config, court, output)
            .await
            .with_context(|| format!("Crawl of court {} failed", court.number))?;
        failed += report.failed_ids.len();
        print_report(&report);
    }

    if failed > 0 {
        tracing::warn!("{} case(s) failed; rerun them with --probe or a narrower range", failed);
    }
    Ok(())
}
