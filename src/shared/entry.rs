/**
 * Diary Document Model
 *
 * This module defines the persisted document and every record inside it:
 * entries, their comments, the aggregate analytics and the single admin
 * credentials record.
 *
 * The whole `Store` is the unit of read and write. It is serialized as one
 * UTF-8 JSON document (or as three keys by the KV backend) with camelCase
 * field names, so documents written by earlier deployments load unchanged.
 *
 * # Legacy Documents
 *
 * Older documents may lack `title`, `audioUrl`, `timestamp`, `plays`,
 * `comments`, `hidden` or `description`, may hold comments without `text`
 * or `timestamp`, and may carry `duration` as a string. All of these decode
 * to their defaults instead of failing the whole document.
 */
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::shared::error::SharedError;

/// Maximum length of a comment, in characters
pub const MAX_COMMENT_LENGTH: usize = 500;

/// Number of entries reported in the analytics leaderboard
pub const TOP_ENTRIES_LIMIT: usize = 5;

/// A single uploaded audio recording with its metadata and counters
///
/// # Example
/// ```rust
/// use audiodiary::shared::Entry;
///
/// let entry = Entry::new(
///     "1700000000000".to_string(),
///     "Morning walk".to_string(),
///     String::new(),
///     "/audio/1700000000000-abc.mp3".to_string(),
///     42,
/// );
/// assert_eq!(entry.plays, 0);
/// assert!(entry.comments.is_empty());
/// assert!(!entry.hidden);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Timestamp-derived unique id
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Absolute URL (remote blob store) or `/audio/...` path (local)
    #[serde(default)]
    pub audio_url: String,
    /// Length in whole seconds
    #[serde(default, deserialize_with = "lenient_u64")]
    pub duration: u64,
    /// ISO 8601 creation time
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub plays: u64,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub hidden: bool,
}

impl Entry {
    /// Create a fresh entry: no plays, no comments, visible, stamped now
    pub fn new(
        id: String,
        title: String,
        description: String,
        audio_url: String,
        duration: u64,
    ) -> Self {
        Self {
            id,
            title,
            description,
            audio_url,
            duration,
            timestamp: crate::shared::ids::now_iso8601(),
            plays: 0,
            comments: Vec::new(),
            hidden: false,
        }
    }

    /// Project this entry onto the leaderboard row shape
    pub fn summary(&self) -> TopEntry {
        TopEntry {
            id: self.id.clone(),
            title: self.title.clone(),
            plays: self.plays,
        }
    }
}

/// A visitor comment, owned by its entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub timestamp: String,
}

impl Comment {
    /// Create a comment stamped with the current time
    pub fn new(id: String, text: String) -> Self {
        Self {
            id,
            text,
            timestamp: crate::shared::ids::now_iso8601(),
        }
    }
}

/// Aggregate play and visit counters
///
/// `total_plays` is a running counter. It is not recomputed from the
/// per-entry counts, so the two can drift apart after partial failures or
/// manual edits of the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    #[serde(default)]
    pub total_plays: u64,
    /// Visits keyed by UTC date (`YYYY-MM-DD`)
    #[serde(default)]
    pub daily_visits: BTreeMap<String, u64>,
}

/// The singleton admin credentials record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminCredentials {
    /// bcrypt hash of the admin password
    pub password_hash: String,
    pub security_question: String,
    /// bcrypt hash of the lower-cased, trimmed security answer
    pub security_answer_hash: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Random marker replaced on every password change
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub session_epoch: String,
}

impl AdminCredentials {
    /// Marker of the current credential generation
    ///
    /// Changes whenever the password is replaced. Session tokens embed it so
    /// that a reset invalidates every token issued before it. Records written
    /// without an epoch fall back to their timestamps.
    pub fn generation(&self) -> &str {
        if !self.session_epoch.is_empty() {
            return &self.session_epoch;
        }
        self.updated_at.as_deref().unwrap_or(&self.created_at)
    }

    /// Fresh value for `session_epoch`
    pub fn new_session_epoch() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

/// Root of the persisted document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Store {
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub analytics: Analytics,
    #[serde(default)]
    pub admin: Option<AdminCredentials>,
}

impl Store {
    /// Entries visible to the public, in store order (most recent first)
    pub fn visible_entries(&self) -> Vec<Entry> {
        self.entries.iter().filter(|e| !e.hidden).cloned().collect()
    }

    pub fn find_entry(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn find_entry_mut(&mut self, id: &str) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    /// Sum of the per-entry play counters
    pub fn summed_entry_plays(&self) -> u64 {
        self.entries.iter().map(|e| e.plays).sum()
    }

    /// The most played entries, ties kept in store order
    pub fn top_entries(&self, limit: usize) -> Vec<TopEntry> {
        let mut ranked: Vec<&Entry> = self.entries.iter().collect();
        // sort_by is stable, so equal play counts keep their store order
        ranked.sort_by(|a, b| b.plays.cmp(&a.plays));
        ranked.into_iter().take(limit).map(Entry::summary).collect()
    }
}

/// Leaderboard row in the analytics summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopEntry {
    pub id: String,
    pub title: String,
    pub plays: u64,
}

/// Admin analytics report
///
/// `total_plays` is the sum of the per-entry counters and
/// `recorded_total_plays` is the running counter. They are reported side by
/// side and `plays_consistent` says whether they agree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_entries: usize,
    pub total_plays: u64,
    pub recorded_total_plays: u64,
    pub plays_consistent: bool,
    pub daily_visits: BTreeMap<String, u64>,
    pub top_entries: Vec<TopEntry>,
}

impl AnalyticsSummary {
    pub fn from_store(store: &Store) -> Self {
        let total_plays = store.summed_entry_plays();
        let recorded_total_plays = store.analytics.total_plays;
        Self {
            total_entries: store.entries.len(),
            total_plays,
            recorded_total_plays,
            plays_consistent: total_plays == recorded_total_plays,
            daily_visits: store.analytics.daily_visits.clone(),
            top_entries: store.top_entries(TOP_ENTRIES_LIMIT),
        }
    }
}

/// Validate and normalise comment text
///
/// Returns the trimmed text, or a validation error when it is blank or longer
/// than [`MAX_COMMENT_LENGTH`] characters.
pub fn validate_comment_text(text: &str) -> Result<String, SharedError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SharedError::validation("text", "Comment text cannot be empty"));
    }
    if trimmed.chars().count() > MAX_COMMENT_LENGTH {
        return Err(SharedError::validation(
            "text",
            format!("Comment text cannot exceed {} characters", MAX_COMMENT_LENGTH),
        ));
    }
    Ok(trimmed.to_string())
}

/// Parse an optional duration form value; anything unparsable is 0
pub fn parse_duration(raw: Option<&str>) -> u64 {
    raw.map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0)
        .map(|d| d.trunc() as u64)
        .unwrap_or(0)
}

/// Accept a number, a numeric string or null for an unsigned field
fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64))
            .unwrap_or(0),
        serde_json::Value::String(s) => parse_duration(Some(&s)),
        _ => 0,
    })
}
