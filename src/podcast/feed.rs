//! Podcast feed fetching and episode extraction.

use chrono::{DateTime, SecondsFormat, Utc};
use rss::{Channel, Item};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Show notes used when an episode has no description.
pub const DEFAULT_SHOW_NOTES: &str = "No show notes available.";

/// Show logo used when an episode has no artwork of its own.
pub const DEFAULT_IMAGE_URL: &str =
    "https://pbcdn1.podbean.com/imglogo/image-logo/14312154/PlumfieldMomsLogo_skhzpw_300x300.jpg";

/// One episode of the podcast feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// Episode title
    pub title: String,

    /// Episode page URL, the identity used for deduplication
    pub link: String,

    /// Publication time
    pub published: Option<DateTime<Utc>>,

    /// Enclosure (audio file) URL, empty when the item has none
    pub audio_url: String,

    /// Show notes HTML
    pub show_notes: String,

    /// Artwork URL
    pub image_url: String,
}

impl Episode {
    /// Build an episode from a feed item.
    ///
    /// Items without a title or link cannot be tracked and yield `None`.
    pub fn from_item(item: &Item) -> Option<Self> {
        let title = item.title().map(str::trim).filter(|t| !t.is_empty())?;
        let link = item.link().map(str::trim).filter(|l| !l.is_empty())?;

        let published = item.pub_date().and_then(|raw| match parse_pub_date(raw) {
            Some(date) => Some(date),
            None => {
                log::warn!("episode {:?} has an unreadable pubDate {:?}", title, raw);
                None
            }
        });

        Some(Self {
            title: title.to_string(),
            link: link.to_string(),
            published,
            audio_url: item
                .enclosure()
                .map(|e| e.url().to_string())
                .unwrap_or_default(),
            show_notes: item
                .description()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or(DEFAULT_SHOW_NOTES)
                .to_string(),
            image_url: item
                .itunes_ext()
                .and_then(|ext| ext.image())
                .filter(|url| !url.is_empty())
                .unwrap_or(DEFAULT_IMAGE_URL)
                .to_string(),
        })
    }

    /// Category: the title text before the first `:`, or the whole title.
    pub fn category(&self) -> &str {
        match self.title.split_once(':') {
            Some((prefix, _)) => prefix.trim(),
            None => &self.title,
        }
    }

    /// Publication time as an RFC 3339 UTC timestamp with milliseconds.
    pub fn published_rfc3339(&self) -> Option<String> {
        self.published
            .map(|d| d.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

/// Parse an RSS `pubDate` (RFC 2822).
pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw.trim())
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Parse feed XML into episodes in feed order.
pub fn parse_feed(xml: &[u8]) -> Result<Vec<Episode>> {
    let channel = Channel::read_from(xml)?;
    let mut episodes = Vec::with_capacity(channel.items().len());

    for item in channel.items() {
        match Episode::from_item(item) {
            Some(episode) => episodes.push(episode),
            None => log::warn!("skipping feed item without title or link"),
        }
    }

    log::debug!(
        "feed {:?} has {} usable episodes of {} items",
        channel.title(),
        episodes.len(),
        channel.items().len()
    );
    Ok(episodes)
}

/// Download and parse a feed.
pub fn fetch_feed(url: &str) -> Result<Vec<Episode>> {
    log::info!("fetching podcast feed {}", url);
    let response = reqwest::blocking::get(url)?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Feed(format!("{} answered {}", url, status)));
    }
    let body = response.bytes()?;
    parse_feed(&body)
}
