//! Play counting stays exact under concurrent requests

use std::sync::Arc;

use proptest::prelude::*;

use audiodiary::backend::diary::DiaryService;
use audiodiary::backend::storage::{LocalBlobStore, MemoryStore, StoreRepository};
use audiodiary::shared::{Entry, Store, UploadLimits};

const ENTRY_IDS: [&str; 3] = ["1", "2", "3"];

fn seeded_service(audio_dir: &std::path::Path) -> DiaryService {
    let entries = ENTRY_IDS
        .iter()
        .map(|id| {
            Entry::new(
                id.to_string(),
                format!("entry {}", id),
                String::new(),
                format!("/audio/{}.mp3", id),
                0,
            )
        })
        .collect();
    let store = Store {
        entries,
        ..Store::default()
    };
    let repository = StoreRepository::new(Arc::new(MemoryStore::with_store(store)));
    let blobs = Arc::new(LocalBlobStore::new(audio_dir, UploadLimits::default()));
    DiaryService::new(repository, blobs)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_concurrent_plays_are_all_counted(
        plays in proptest::collection::vec(0usize..ENTRY_IDS.len(), 0..40),
    ) {
        let audio_dir = tempfile::tempdir().unwrap();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .enable_all()
            .build()
            .unwrap();

        let summary = runtime.block_on(async {
            let diary = seeded_service(audio_dir.path());
            let tasks: Vec<_> = plays
                .iter()
                .map(|&index| {
                    let diary = diary.clone();
                    tokio::spawn(async move { diary.record_play(ENTRY_IDS[index]).await })
                })
                .collect();
            for task in tasks {
                task.await.unwrap().unwrap();
            }
            diary.analytics_summary().await
        });

        prop_assert_eq!(summary.total_plays, plays.len() as u64);
        prop_assert_eq!(summary.recorded_total_plays, plays.len() as u64);
        prop_assert!(summary.plays_consistent);
    }

    #[test]
    fn test_unknown_ids_never_change_counters(id in "[a-z]{1,12}") {
        let audio_dir = tempfile::tempdir().unwrap();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let (result, summary) = runtime.block_on(async {
            let diary = seeded_service(audio_dir.path());
            let result = diary.record_play(&id).await;
            (result, diary.analytics_summary().await)
        });

        prop_assert!(result.is_err());
        prop_assert_eq!(summary.total_plays, 0);
        prop_assert_eq!(summary.recorded_total_plays, 0);
    }
}
