/**
 * Diary Service
 *
 * Operations on entries, comments and analytics. Reads go straight to the
 * repository; every change is one `StoreRepository::update`, so a play
 * increments the entry counter and the running total in a single write.
 *
 * # Blob Cleanup
 *
 * Deleting an entry removes the record first and the audio blob second. A
 * blob that cannot be deleted is logged and otherwise ignored. A new upload
 * whose entry cannot be saved has its blob deleted the same way.
 */

use std::sync::Arc;

use bytes::Bytes;

use crate::backend::error::BackendError;
use crate::backend::storage::{BlobStore, StoreRepository, StoredBlob};
use crate::shared::entry::{validate_comment_text, AnalyticsSummary, Comment, Entry};
use crate::shared::ids::{today_utc, IdGenerator};

/// An audio upload that passed validation
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub title: String,
    pub description: String,
    pub duration: u64,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Clone)]
pub struct DiaryService {
    repository: StoreRepository,
    blobs: Arc<dyn BlobStore>,
    ids: Arc<IdGenerator>,
}

impl DiaryService {
    pub fn new(repository: StoreRepository, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            repository,
            blobs,
            ids: Arc::new(IdGenerator::new()),
        }
    }

    pub fn blobs(&self) -> &Arc<dyn BlobStore> {
        &self.blobs
    }

    /// Entries visible to the public, most recent first
    pub async fn list_public(&self) -> Vec<Entry> {
        self.repository.load().await.visible_entries()
    }

    /// Count one play; returns the entry's new play count
    pub async fn record_play(&self, entry_id: &str) -> Result<u64, BackendError> {
        require_id(entry_id)?;
        let plays = self
            .repository
            .update(|store| {
                let entry = store
                    .find_entry_mut(entry_id)
                    .ok_or_else(|| BackendError::not_found("Entry not found"))?;
                entry.plays += 1;
                let plays = entry.plays;
                store.analytics.total_plays += 1;
                Ok(plays)
            })
            .await?;
        tracing::debug!("Play recorded for {} ({} total)", entry_id, plays);
        Ok(plays)
    }

    pub async fn add_comment(&self, entry_id: &str, text: &str) -> Result<Comment, BackendError> {
        require_id(entry_id)?;
        let text = validate_comment_text(text)?;
        let comment = Comment::new(self.ids.next_id(), text);

        let created = comment.clone();
        self.repository
            .update(move |store| {
                let entry = store
                    .find_entry_mut(entry_id)
                    .ok_or_else(|| BackendError::not_found("Entry not found"))?;
                entry.comments.push(comment);
                Ok(())
            })
            .await?;

        tracing::info!("Comment {} added to entry {}", created.id, entry_id);
        Ok(created)
    }

    pub async fn list_comments(&self, entry_id: &str) -> Result<Vec<Comment>, BackendError> {
        self.repository
            .load()
            .await
            .find_entry(entry_id)
            .map(|entry| entry.comments.clone())
            .ok_or_else(|| BackendError::not_found("Entry not found"))
    }

    /// Remove an entry, then its audio blob (best effort)
    pub async fn delete_entry(&self, entry_id: &str) -> Result<(), BackendError> {
        require_id(entry_id)?;
        let removed = self
            .repository
            .update(|store| {
                let index = store
                    .entries
                    .iter()
                    .position(|e| e.id == entry_id)
                    .ok_or_else(|| BackendError::not_found("Entry not found"))?;
                Ok(store.entries.remove(index))
            })
            .await?;

        tracing::info!("Entry {} deleted", removed.id);
        self.discard_blob(&removed.audio_url).await;
        Ok(())
    }

    pub async fn delete_comment(&self, entry_id: &str, comment_id: &str) -> Result<(), BackendError> {
        self.repository
            .update(|store| {
                let entry = store
                    .find_entry_mut(entry_id)
                    .ok_or_else(|| BackendError::not_found("Entry not found"))?;
                let before = entry.comments.len();
                entry.comments.retain(|c| c.id != comment_id);
                if entry.comments.len() == before {
                    return Err(BackendError::not_found("Comment not found"));
                }
                Ok(())
            })
            .await?;
        tracing::info!("Comment {} deleted from entry {}", comment_id, entry_id);
        Ok(())
    }

    /// Count one visit for today's UTC date; returns that date
    pub async fn record_visit(&self) -> Result<String, BackendError> {
        let today = today_utc();
        let key = today.clone();
        self.repository
            .update(move |store| {
                *store.analytics.daily_visits.entry(key).or_insert(0) += 1;
                Ok(())
            })
            .await?;
        Ok(today)
    }

    pub async fn analytics_summary(&self) -> AnalyticsSummary {
        let summary = AnalyticsSummary::from_store(&self.repository.load().await);
        if !summary.plays_consistent {
            tracing::warn!(
                "Play counters disagree: entries sum to {}, running total is {}",
                summary.total_plays,
                summary.recorded_total_plays
            );
        }
        summary
    }

    /// Store the audio and prepend a fresh entry pointing at it
    pub async fn publish_upload(&self, upload: AudioUpload) -> Result<Entry, BackendError> {
        let blob: StoredBlob = self
            .blobs
            .put(
                upload.file_name.as_deref(),
                upload.content_type.as_deref(),
                upload.data,
            )
            .await?;

        let entry = Entry::new(
            self.ids.next_id(),
            upload.title,
            upload.description,
            blob.url.clone(),
            upload.duration,
        );
        let created = entry.clone();
        let saved = self
            .repository
            .update(move |store| {
                store.entries.insert(0, entry);
                Ok(())
            })
            .await;

        if let Err(e) = saved {
            self.discard_blob(&blob.url).await;
            return Err(e);
        }

        tracing::info!("Entry {} created: {}", created.id, created.title);
        Ok(created)
    }

    async fn discard_blob(&self, audio_url: &str) {
        match self.blobs.delete(audio_url).await {
            Ok(true) => tracing::info!("Deleted audio {}", audio_url),
            Ok(false) => tracing::debug!("No stored audio for {}", audio_url),
            Err(e) => tracing::error!("Failed to delete audio {}: {}", audio_url, e),
        }
    }
}

fn require_id(entry_id: &str) -> Result<(), BackendError> {
    if entry_id.trim().is_empty() {
        return Err(BackendError::bad_request("Missing required fields"));
    }
    Ok(())
}
