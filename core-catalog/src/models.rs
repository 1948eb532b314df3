//! Domain models for the catalog
//!
//! Records are decoded from raw store documents. Field names follow the
//! store's schema (`audioURL`, `coverURL`, `createdAt`).

use crate::error::{CatalogError, Result};
use bridge_traits::Document;
use chrono::{DateTime, Utc};
use core_playback::Track;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Podcast
// =============================================================================

/// One episode of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Podcast {
    pub id: String,
    pub title: String,
    pub audio_url: String,
    pub cover_url: String,
    pub category: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct PodcastFields {
    title: String,
    #[serde(rename = "audioURL")]
    audio_url: String,
    #[serde(rename = "coverURL")]
    cover_url: String,
    category: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "createdAt")]
    created_at: StoreTimestamp,
}

impl Podcast {
    /// Decode a store document.
    ///
    /// # Errors
    ///
    /// `InvalidDocument` when a required field is missing or mistyped, or
    /// when `createdAt` is not a valid timestamp.
    pub fn from_document(doc: &Document) -> Result<Self> {
        let fields: PodcastFields = decode_fields(doc)?;
        let created_at = fields
            .created_at
            .to_utc()
            .ok_or_else(|| invalid(doc, "createdAt is not a valid timestamp"))?;

        Ok(Self {
            id: doc.id.clone(),
            title: fields.title,
            audio_url: fields.audio_url,
            cover_url: fields.cover_url,
            category: fields.category,
            description: fields.description,
            created_at,
        })
    }

    /// The playable track for this episode.
    pub fn track(&self) -> Track {
        Track::new(&self.audio_url, &self.cover_url, &self.title).with_id(&self.id)
    }
}

/// Timestamps arrive either as RFC 3339 text or as the store's native
/// `{seconds, nanoseconds}` object.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoreTimestamp {
    Text(String),
    Parts {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds")]
        nanoseconds: u32,
    },
}

impl StoreTimestamp {
    fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            StoreTimestamp::Text(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            StoreTimestamp::Parts {
                seconds,
                nanoseconds,
            } => DateTime::<Utc>::from_timestamp(*seconds, *nanoseconds),
        }
    }
}

// =============================================================================
// Event
// =============================================================================

/// A calendar entry from the events collection.
///
/// Most fields are optional; the store holds hand-entered records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: Option<String>,
    pub description: String,
    /// Display date, kept as entered.
    pub date: Option<String>,
    pub cover_url: Option<String>,
    /// External link for details or registration.
    pub url: Option<String>,
}

#[derive(Deserialize)]
struct EventFields {
    #[serde(default)]
    title: Option<String>,
    description: String,
    #[serde(default)]
    date: Option<String>,
    #[serde(default, rename = "coverURL")]
    cover_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

impl Event {
    pub fn from_document(doc: &Document) -> Result<Self> {
        let fields: EventFields = decode_fields(doc)?;
        Ok(Self {
            id: doc.id.clone(),
            title: fields.title,
            description: fields.description,
            date: fields.date,
            cover_url: fields.cover_url,
            url: fields.url,
        })
    }

    /// First four words of the description followed by `...`.
    pub fn short_description(&self) -> String {
        let words: Vec<&str> = self.description.split(' ').take(4).collect();
        format!("{}...", words.join(" "))
    }
}

// =============================================================================
// Decoding helpers
// =============================================================================

fn decode_fields<T: DeserializeOwned>(doc: &Document) -> Result<T> {
    serde_json::from_value(Value::Object(doc.fields.clone()))
        .map_err(|err| invalid(doc, &err.to_string()))
}

fn invalid(doc: &Document, message: &str) -> CatalogError {
    CatalogError::InvalidDocument {
        id: doc.id.clone(),
        message: message.to_string(),
    }
}
