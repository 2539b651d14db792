//! Batched import of new episodes into the content store.

use std::thread;
use std::time::Duration;

use rayon::prelude::*;
use serde::Serialize;

use crate::error::Result;
use crate::parser::{HtmlParser, ParseOptions};
use crate::render::{to_wire, WireBlock};
use crate::store::{ContentStore, PageRequest};

use super::{Episode, EpisodeLedger};

/// Options for an import run.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Episodes created concurrently per batch
    pub batch_size: usize,

    /// Pause between batches, for the store's rate limit
    pub delay: Duration,

    /// Only import the last N new episodes
    pub limit: Option<usize>,

    /// Conversion options for show notes
    pub parse: ParseOptions,
}

impl ImportOptions {
    /// Create import options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the batch size (at least 1).
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Set the pause between batches.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Only import the last `limit` new episodes.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Set show-notes conversion options.
    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            batch_size: 3,
            delay: Duration::from_millis(1000),
            limit: None,
            parse: ParseOptions::new().with_ordered_lists(true),
        }
    }
}

/// What happened to one episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodeOutcome {
    /// Page created and recorded
    Created,
    /// Page created but the ledger could not record it
    Unrecorded(String),
    /// Already in the ledger when rechecked
    Skipped,
    /// Page creation failed
    Failed(String),
}

/// Counts of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Episodes in the feed
    pub found: usize,
    /// Episodes already imported before the run
    pub already_known: usize,
    /// New episodes selected for import (after the limit)
    pub selected: usize,
    /// Pages created
    pub created: usize,
    /// Pages created that the ledger failed to record
    pub unrecorded: usize,
    /// Episodes found in the ledger on recheck
    pub skipped: usize,
    /// Episodes whose page could not be created
    pub failed: usize,
    /// Title and message of every failure
    pub failures: Vec<(String, String)>,
}

impl ImportReport {
    /// Episodes not yet imported at the start of the run.
    pub fn new_count(&self) -> usize {
        self.found - self.already_known
    }

    fn tally(&mut self, episode: &Episode, outcome: &EpisodeOutcome) {
        match outcome {
            EpisodeOutcome::Created => self.created += 1,
            EpisodeOutcome::Unrecorded(_) => {
                self.created += 1;
                self.unrecorded += 1;
            }
            EpisodeOutcome::Skipped => self.skipped += 1,
            EpisodeOutcome::Failed(message) => {
                self.failed += 1;
                self.failures.push((episode.title.clone(), message.clone()));
            }
        }
    }
}

/// Build the page for an episode.
///
/// Properties are the title, publication date and category; the body is
/// the artwork captioned with the episode link, the audio player, then the
/// converted show notes.
pub fn episode_page(database_id: &str, episode: &Episode, parser: &HtmlParser) -> PageRequest {
    let mut children = vec![WireBlock::image(&episode.image_url, &episode.link)];
    if episode.audio_url.is_empty() {
        log::warn!("episode {:?} has no audio enclosure", episode.title);
    } else {
        children.push(WireBlock::embed(&episode.audio_url));
    }
    children.extend(to_wire(&parser.parse(&episode.show_notes)));

    let mut page = PageRequest::in_database(database_id)
        .title("Name", &episode.title)
        .select("Category", episode.category());
    if let Some(date) = episode.published_rfc3339() {
        page = page.date("Date", date);
    }
    page.with_children(children)
}

/// Imports new feed episodes into one database.
pub struct Importer<'a> {
    store: &'a dyn ContentStore,
    ledger: &'a dyn EpisodeLedger,
    database_id: String,
    options: ImportOptions,
    parser: HtmlParser,
}

impl<'a> Importer<'a> {
    /// Create an importer with default options.
    pub fn new(
        store: &'a dyn ContentStore,
        ledger: &'a dyn EpisodeLedger,
        database_id: impl Into<String>,
    ) -> Self {
        Self::with_options(store, ledger, database_id, ImportOptions::default())
    }

    /// Create an importer with custom options.
    pub fn with_options(
        store: &'a dyn ContentStore,
        ledger: &'a dyn EpisodeLedger,
        database_id: impl Into<String>,
        options: ImportOptions,
    ) -> Self {
        let parser = HtmlParser::with_options(options.parse.clone());
        Self {
            store,
            ledger,
            database_id: database_id.into(),
            options,
            parser,
        }
    }

    /// Get the import options.
    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Split episodes into known and new, keeping feed order.
    pub fn partition<'e>(&self, episodes: &'e [Episode]) -> Result<(Vec<&'e Episode>, Vec<&'e Episode>)> {
        let mut known = Vec::new();
        let mut fresh = Vec::new();
        for episode in episodes {
            if self.ledger.contains(&episode.link)? {
                known.push(episode);
            } else {
                fresh.push(episode);
            }
        }
        Ok((known, fresh))
    }

    /// Import every new episode.
    pub fn run(&self, episodes: &[Episode]) -> Result<ImportReport> {
        self.run_with_progress(episodes, |_, _| {})
    }

    /// Import every new episode, reporting each outcome as it happens.
    ///
    /// Only ledger lookups during partitioning abort the run; per-episode
    /// failures are counted in the report.
    pub fn run_with_progress<F>(&self, episodes: &[Episode], on_episode: F) -> Result<ImportReport>
    where
        F: Fn(&Episode, &EpisodeOutcome) + Sync,
    {
        let (known, mut fresh) = self.partition(episodes)?;
        let mut report = ImportReport {
            found: episodes.len(),
            already_known: known.len(),
            ..Default::default()
        };
        log::info!(
            "found {} old episodes and {} new episodes",
            known.len(),
            fresh.len()
        );

        if let Some(limit) = self.options.limit {
            if fresh.len() > limit {
                fresh.drain(..fresh.len() - limit);
            }
        }
        report.selected = fresh.len();
        if fresh.is_empty() {
            log::info!("no new episodes to import");
            return Ok(report);
        }

        let batch_size = self.options.batch_size.max(1);
        let batches = fresh.chunks(batch_size).count();
        for (index, batch) in fresh.chunks(batch_size).enumerate() {
            let outcomes: Vec<EpisodeOutcome> = batch
                .par_iter()
                .map(|episode| {
                    let outcome = self.import_one(episode);
                    on_episode(episode, &outcome);
                    outcome
                })
                .collect();

            for (episode, outcome) in batch.iter().zip(&outcomes) {
                report.tally(episode, outcome);
            }

            if index + 1 < batches && !self.options.delay.is_zero() {
                log::debug!("waiting {:?} before the next batch", self.options.delay);
                thread::sleep(self.options.delay);
            }
        }

        log::info!(
            "import complete: {} created, {} skipped, {} failed",
            report.created,
            report.skipped,
            report.failed
        );
        Ok(report)
    }

    /// Import a single episode.
    pub fn import_one(&self, episode: &Episode) -> EpisodeOutcome {
        match self.ledger.contains(&episode.link) {
            Ok(true) => {
                log::info!("skipping {:?} (already imported)", episode.title);
                return EpisodeOutcome::Skipped;
            }
            Ok(false) => {}
            Err(err) => return EpisodeOutcome::Failed(err.to_string()),
        }

        let page = episode_page(&self.database_id, episode, &self.parser);
        if let Err(err) = self.store.create_page(&page) {
            log::error!("error adding {:?}: {}", episode.title, err);
            return EpisodeOutcome::Failed(err.to_string());
        }
        log::info!("added {:?}", episode.title);

        match self.ledger.record(&episode.link, &episode.title) {
            Ok(()) => EpisodeOutcome::Created,
            Err(err) => {
                log::error!("added {:?} but could not record it: {}", episode.title, err);
                EpisodeOutcome::Unrecorded(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::podcast::{MemoryLedger, DEFAULT_SHOW_NOTES};
    use crate::store::MemoryStore;

    fn episode(n: usize) -> Episode {
        Episode {
            title: format!("Episode {}: Topic", n),
            link: format!("https://example.com/e{}", n),
            published: None,
            audio_url: format!("https://cdn.example.com/e{}.mp3", n),
            show_notes: "<p>Notes</p><ol><li>one</li></ol>".into(),
            image_url: "https://img".into(),
        }
    }

    fn fast() -> ImportOptions {
        ImportOptions::new().with_delay(Duration::ZERO)
    }

    #[test]
    fn test_episode_page_layout() {
        let parser = HtmlParser::with_options(ImportOptions::default().parse);
        let page = episode_page("db", &episode(1), &parser);
        let types: Vec<&str> = page.children.iter().map(|b| b.type_name()).collect();
        assert_eq!(types, ["image", "embed", "paragraph", "numbered_list_item"]);
        assert_eq!(page.title_text("Name"), Some("Episode 1: Topic"));
        assert!(!page.properties.contains_key("Date"));

        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["properties"]["Category"]["select"]["name"], "Episode 1");
        assert_eq!(
            value["children"][0]["image"]["caption"][0]["text"]["content"],
            "https://example.com/e1"
        );
    }

    #[test]
    fn test_plain_show_notes_without_audio() {
        let mut ep = episode(2);
        ep.show_notes = DEFAULT_SHOW_NOTES.into();
        ep.audio_url.clear();
        let page = episode_page("db", &ep, &HtmlParser::new());
        let types: Vec<&str> = page.children.iter().map(|b| b.type_name()).collect();
        assert_eq!(types, ["image"]);
    }

    #[test]
    fn test_run_imports_only_new() {
        let store = MemoryStore::new();
        let ledger = MemoryLedger::with_urls(["https://example.com/e1"]);
        let episodes: Vec<Episode> = (1..=5).map(episode).collect();

        let importer = Importer::with_options(&store, &ledger, "db", fast());
        let report = importer.run(&episodes).unwrap();

        assert_eq!(report.found, 5);
        assert_eq!(report.already_known, 1);
        assert_eq!(report.new_count(), 4);
        assert_eq!(report.created, 4);
        assert_eq!(report.failed, 0);
        assert_eq!(store.created_count(), 4);
        assert_eq!(ledger.len(), 5);

        let again = importer.run(&episodes).unwrap();
        assert_eq!(again.selected, 0);
        assert_eq!(store.created_count(), 4);
    }

    #[test]
    fn test_limit_keeps_last_new_episodes() {
        let store = MemoryStore::new();
        let ledger = MemoryLedger::new();
        let episodes: Vec<Episode> = (1..=6).map(episode).collect();

        let importer =
            Importer::with_options(&store, &ledger, "db", fast().with_limit(Some(2)).with_batch_size(1));
        let report = importer.run(&episodes).unwrap();

        assert_eq!(report.selected, 2);
        let mut titles: Vec<String> = store
            .created()
            .iter()
            .filter_map(|p| p.title_text("Name").map(str::to_string))
            .collect();
        titles.sort();
        assert_eq!(titles, ["Episode 5: Topic", "Episode 6: Topic"]);
    }

    #[test]
    fn test_progress_sees_every_episode() {
        let store = MemoryStore::new();
        let ledger = MemoryLedger::new();
        let episodes: Vec<Episode> = (1..=7).map(episode).collect();
        let seen = parking_lot::Mutex::new(0usize);

        Importer::with_options(&store, &ledger, "db", fast())
            .run_with_progress(&episodes, |_, outcome| {
                assert_eq!(outcome, &EpisodeOutcome::Created);
                *seen.lock() += 1;
            })
            .unwrap();
        assert_eq!(*seen.lock(), 7);
    }
}
