//! Record of episodes already imported.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Existence check and record of imported episodes, keyed by episode URL.
pub trait EpisodeLedger: Send + Sync {
    /// Whether an episode URL was already imported.
    fn contains(&self, url: &str) -> Result<bool>;

    /// Record an imported episode.
    fn record(&self, url: &str, name: &str) -> Result<()>;
}

/// One imported episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Episode URL
    pub url: String,
    /// Episode title
    pub name: String,
    /// When the entry was recorded
    pub recorded_at: DateTime<Utc>,
}

/// Ledger held in memory only.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger that already knows some URLs.
    pub fn with_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = urls.into_iter().map(|u| (u.into(), String::new())).collect();
        Self {
            entries: Mutex::new(entries),
        }
    }

    /// Number of recorded episodes.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl EpisodeLedger for MemoryLedger {
    fn contains(&self, url: &str) -> Result<bool> {
        Ok(self.entries.lock().contains_key(url))
    }

    fn record(&self, url: &str, name: &str) -> Result<()> {
        self.entries.lock().insert(url.to_string(), name.to_string());
        Ok(())
    }
}

/// Ledger persisted as a JSON array of entries.
///
/// The whole file is rewritten on every record through a temporary sibling
/// file and a rename, so a crash never leaves a truncated ledger.
#[derive(Debug)]
pub struct JsonFileLedger {
    path: PathBuf,
    entries: Mutex<Vec<LedgerEntry>>,
}

impl JsonFileLedger {
    /// Open a ledger file, starting empty if it does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&raw).map_err(|e| {
                    Error::Ledger(format!("{} is not a valid ledger: {}", path.display(), e))
                })?
            }
        } else {
            Vec::new()
        };

        log::debug!("opened ledger {} with {} entries", path.display(), entries.len());
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of all entries.
    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.entries.lock().clone()
    }

    fn persist(&self, entries: &[LedgerEntry]) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl EpisodeLedger for JsonFileLedger {
    fn contains(&self, url: &str) -> Result<bool> {
        Ok(self.entries.lock().iter().any(|e| e.url == url))
    }

    fn record(&self, url: &str, name: &str) -> Result<()> {
        let mut entries = self.entries.lock();
        if entries.iter().any(|e| e.url == url) {
            return Ok(());
        }
        entries.push(LedgerEntry {
            url: url.to_string(),
            name: name.to_string(),
            recorded_at: Utc::now(),
        });
        if let Err(err) = self.persist(&entries) {
            entries.pop();
            return Err(err);
        }
        Ok(())
    }
}
