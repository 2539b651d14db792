//! Podcast feed import.
//!
//! Episodes are read from the show's RSS feed, checked against an
//! [`EpisodeLedger`] and created as pages in batches.

mod feed;
mod importer;
mod ledger;

pub use feed::{
    fetch_feed, parse_feed, parse_pub_date, Episode, DEFAULT_IMAGE_URL, DEFAULT_SHOW_NOTES,
};
pub use importer::{episode_page, EpisodeOutcome, ImportOptions, ImportReport, Importer};
pub use ledger::{EpisodeLedger, JsonFileLedger, LedgerEntry, MemoryLedger};
