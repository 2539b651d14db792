//! Podcast import command and its scheduler.

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use colored::Colorize;
use crossbeam_channel::RecvTimeoutError;
use indicatif::{ProgressBar, ProgressStyle};

use richblocks::podcast::{
    fetch_feed, EpisodeLedger, EpisodeOutcome, ImportOptions, ImportReport, Importer,
    JsonFileLedger, MemoryLedger,
};
use richblocks::store::{ContentStore, MemoryStore};

use crate::config::StoreArgs;
use crate::shutdown;

#[derive(Args, Debug)]
pub struct ImportArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// RSS feed of the podcast
    #[arg(long, env = "PODBEAN_FEED_URL")]
    pub feed_url: String,

    /// Database receiving one page per episode
    #[arg(long, env = "NOTION_DATABASE_ID")]
    pub database_id: String,

    /// File recording imported episodes
    #[arg(long, env = "PODCAST_LEDGER", default_value = "podcast-ledger.json")]
    pub ledger: PathBuf,

    /// Only import the last N new episodes
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Episodes created concurrently
    #[arg(long, default_value_t = 3)]
    pub batch_size: usize,

    /// Pause between batches in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub delay_ms: u64,

    /// Keep running and import again on an interval
    #[arg(short, long)]
    pub watch: bool,

    /// Minutes between runs in watch mode
    #[arg(long, default_value_t = 15)]
    pub interval: u64,

    /// Print the pages instead of creating them
    #[arg(long)]
    pub dry_run: bool,
}

impl ImportArgs {
    fn options(&self) -> ImportOptions {
        ImportOptions::new()
            .with_batch_size(self.batch_size)
            .with_delay(Duration::from_millis(self.delay_ms))
            .with_limit(self.limit)
    }
}

pub fn cmd_import(args: &ImportArgs) -> Result<(), Box<dyn Error>> {
    let ledger = JsonFileLedger::open(&args.ledger)?;

    if args.dry_run {
        let store = MemoryStore::new();
        let scratch = MemoryLedger::with_urls(ledger.entries().into_iter().map(|e| e.url));
        let report = import_once(args, &store, &scratch)?;
        println!("{}", serde_json::to_string_pretty(&store.created())?);
        print_report(&report);
        return Ok(());
    }

    let client = args.store.client()?;
    if !args.watch {
        let report = import_once(args, &client, &ledger)?;
        print_report(&report);
        return Ok(());
    }

    let interval = Duration::from_secs(args.interval.max(1) * 60);
    let stop = shutdown::subscribe();
    loop {
        log::info!("running scheduled podcast import");
        match import_once(args, &client, &ledger) {
            Ok(report) => print_report(&report),
            Err(err) => log::error!("import failed: {}", err),
        }

        match stop.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    log::info!("scheduler stopped");
    Ok(())
}

fn import_once(
    args: &ImportArgs,
    store: &dyn ContentStore,
    ledger: &dyn EpisodeLedger,
) -> Result<ImportReport, Box<dyn Error>> {
    let episodes = fetch_feed(&args.feed_url)?;
    println!(
        "{} {} episodes in the feed",
        "Found".cyan(),
        episodes.len()
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {pos} imported {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(120));

    let importer = Importer::with_options(store, ledger, &args.database_id, args.options());
    let report = importer.run_with_progress(&episodes, |episode, outcome| {
        match outcome {
            EpisodeOutcome::Failed(message) => {
                pb.println(format!("{} {}: {}", "Failed".red(), episode.title, message))
            }
            EpisodeOutcome::Skipped => {}
            _ => pb.inc(1),
        }
        pb.set_message(episode.title.clone());
    })?;

    pb.finish_and_clear();
    Ok(report)
}

fn print_report(report: &ImportReport) {
    println!(
        "{} {} old, {} new, {} selected",
        "Feed:".bold(),
        report.already_known,
        report.new_count(),
        report.selected
    );
    println!(
        "{} {} created, {} skipped, {} failed",
        "Import:".bold(),
        report.created.to_string().green(),
        report.skipped,
        report.failed.to_string().red()
    );
    if report.unrecorded > 0 {
        println!(
            "{} {} pages were created but not recorded in the ledger",
            "Warning:".yellow(),
            report.unrecorded
        );
    }
}
