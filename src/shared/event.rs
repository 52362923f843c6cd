/**
 * Real-time Event System
 *
 * Events pushed to WebSocket clients. Every event carries the complete list
 * of visible entries, so clients replace their state wholesale on each
 * message instead of applying deltas.
 *
 * Wire format:
 * ```json
 * {"type": "init", "data": [ ...entries ]}
 * {"type": "update", "data": [ ...entries ]}
 * ```
 */
use serde::{Deserialize, Serialize};

use crate::shared::entry::{Entry, Store};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum RealtimeEvent {
    /// Snapshot sent once to a freshly opened connection
    Init(Vec<Entry>),
    /// Snapshot sent to every connection after each store write
    Update(Vec<Entry>),
}

impl RealtimeEvent {
    pub fn init(store: &Store) -> Self {
        Self::Init(store.visible_entries())
    }

    pub fn update(store: &Store) -> Self {
        Self::Update(store.visible_entries())
    }

    /// Entries carried by this event
    pub fn entries(&self) -> &[Entry] {
        match self {
            Self::Init(entries) | Self::Update(entries) => entries,
        }
    }

    /// Short name used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Init(_) => "init",
            Self::Update(_) => "update",
        }
    }
}
