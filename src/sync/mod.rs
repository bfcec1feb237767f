//! PanelSyncer: one-shot upload of source panels into the store
//!
//! Fetches the existing serial set once, then walks the source records in
//! order and inserts serials not yet present. Duplicates within the same
//! batch are suppressed after the first successful insert.

use std::collections::HashSet;

use crate::basis::DeviceRecord;
use crate::store::PanelStore;

/// Outcome counts for a sync run. Records with missing data are logged and
/// excluded from both counts, as are records whose insert failed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub inserted: usize,
    pub skipped: usize,
}

pub struct PanelSyncer<S: PanelStore> {
    store: S,
}

impl<S: PanelStore> PanelSyncer<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Upload new panels to the store, avoiding duplicates
    pub async fn upload_panels(&self, panels: &[DeviceRecord]) -> SyncReport {
        if panels.is_empty() {
            tracing::info!("[PanelSync] No panels found from API");
            return SyncReport::default();
        }

        let existing_serials = self.store.existing_serials().await;
        let mut unique_serials: HashSet<String> = HashSet::new();
        let mut report = SyncReport::default();

        for panel in panels {
            let serial = panel.serial.as_deref().unwrap_or("");
            let created_at = panel.created.as_deref().unwrap_or("");

            if serial.is_empty() || created_at.is_empty() {
                tracing::warn!("[PanelSync] Skipping panel with missing data: {:?}", panel);
                continue;
            }

            if existing_serials.contains(serial) || unique_serials.contains(serial) {
                report.skipped += 1;
                continue;
            }

            // A failed insert is not counted and not retried here, but a later
            // occurrence of the same serial will be attempted again.
            if self.store.insert_panel(serial, created_at).await {
                unique_serials.insert(serial.to_string());
                report.inserted += 1;
            }
        }

        tracing::info!(
            "[PanelSync] Upload completed: {} inserted, {} skipped",
            report.inserted,
            report.skipped
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    /// In-memory store that records every insert attempt
    #[derive(Default)]
    struct RecordingStore {
        existing: HashSet<String>,
        fail_serials: HashSet<String>,
        inserts: Mutex<Vec<(String, String)>>,
        existing_calls: AtomicUsize,
    }

    impl RecordingStore {
        fn with_existing(serials: &[&str]) -> Self {
            Self {
                existing: serials.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            }
        }

        fn attempts(&self) -> Vec<(String, String)> {
            self.inserts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PanelStore for RecordingStore {
        async fn existing_serials(&self) -> HashSet<String> {
            self.existing_calls.fetch_add(1, Ordering::SeqCst);
            self.existing.clone()
        }

        async fn insert_panel(&self, serial: &str, created_at: &str) -> bool {
            self.inserts
                .lock()
                .unwrap()
                .push((serial.to_string(), created_at.to_string()));
            !self.fail_serials.contains(serial)
        }
    }

    fn record(serial: &str, created: &str) -> DeviceRecord {
        DeviceRecord {
            serial: Some(serial.to_string()),
            created: Some(created.to_string()),
        }
    }

    #[test]
    fn test_empty_input_is_a_no_op() {
        let syncer = PanelSyncer::new(RecordingStore::default());
        let report = tokio_test::block_on(syncer.upload_panels(&[]));

        assert_eq!(report, SyncReport::default());
        assert_eq!(syncer.store.existing_calls.load(Ordering::SeqCst), 0);
        assert!(syncer.store.attempts().is_empty());
    }

    #[test]
    fn test_duplicate_in_batch_inserted_once() {
        let panels = vec![record("A", "t1"), record("A", "t2"), record("B", "t3")];
        let syncer = PanelSyncer::new(RecordingStore::default());
        let report = tokio_test::block_on(syncer.upload_panels(&panels));

        assert_eq!(
            syncer.store.attempts(),
            vec![
                ("A".to_string(), "t1".to_string()),
                ("B".to_string(), "t3".to_string())
            ]
        );
        assert_eq!(report, SyncReport { inserted: 2, skipped: 1 });
    }

    #[test]
    fn test_existing_serial_never_inserted() {
        let panels = vec![record("X", "t1")];
        let syncer = PanelSyncer::new(RecordingStore::with_existing(&["X"]));
        let report = tokio_test::block_on(syncer.upload_panels(&panels));

        assert!(syncer.store.attempts().is_empty());
        assert_eq!(report, SyncReport { inserted: 0, skipped: 1 });
    }

    #[test]
    fn test_missing_data_excluded_from_counts() {
        let panels = vec![
            DeviceRecord { serial: None, created: Some("t1".to_string()) },
            DeviceRecord { serial: Some("C".to_string()), created: None },
            DeviceRecord { serial: Some(String::new()), created: Some("t2".to_string()) },
            record("D", "t3"),
        ];
        let syncer = PanelSyncer::new(RecordingStore::default());
        let report = tokio_test::block_on(syncer.upload_panels(&panels));

        assert_eq!(syncer.store.attempts(), vec![("D".to_string(), "t3".to_string())]);
        assert_eq!(report, SyncReport { inserted: 1, skipped: 0 });
    }

    #[test]
    fn test_counts_account_for_every_record_when_inserts_succeed() {
        let panels = vec![
            record("A", "t1"),
            record("B", "t2"),
            record("A", "t3"),
            DeviceRecord { serial: None, created: None },
            record("E", "t4"),
        ];
        let syncer = PanelSyncer::new(RecordingStore::with_existing(&["E"]));
        let report = tokio_test::block_on(syncer.upload_panels(&panels));

        let malformed = 1;
        assert_eq!(report.inserted + report.skipped + malformed, panels.len());
        assert_eq!(report, SyncReport { inserted: 2, skipped: 2 });
    }

    #[test]
    fn test_failed_insert_not_counted() {
        let panels = vec![record("A", "t1"), record("B", "t2")];
        let mut store = RecordingStore::default();
        store.fail_serials.insert("A".to_string());
        let syncer = PanelSyncer::new(store);
        let report = tokio_test::block_on(syncer.upload_panels(&panels));

        assert_eq!(syncer.store.attempts().len(), 2);
        assert_eq!(report, SyncReport { inserted: 1, skipped: 0 });
    }

    #[test]
    fn test_failed_insert_leaves_later_duplicate_eligible() {
        // Only successful inserts enter the in-run set, so a serial whose
        // insert failed is attempted again on its next occurrence.
        let panels = vec![record("A", "t1"), record("A", "t2")];
        let mut store = RecordingStore::default();
        store.fail_serials.insert("A".to_string());
        let syncer = PanelSyncer::new(store);
        let report = tokio_test::block_on(syncer.upload_panels(&panels));

        assert_eq!(syncer.store.attempts().len(), 2);
        assert_eq!(report, SyncReport { inserted: 0, skipped: 0 });
    }

    #[test]
    fn test_empty_existing_set_attempts_all_unique_serials() {
        // Mirrors the degraded path where the existing-serial fetch failed
        // and the store reported an empty set.
        let panels = vec![record("A", "t1"), record("B", "t2"), record("A", "t3")];
        let syncer = PanelSyncer::new(RecordingStore::default());
        let report = tokio_test::block_on(syncer.upload_panels(&panels));

        assert_eq!(
            syncer.store.attempts(),
            vec![
                ("A".to_string(), "t1".to_string()),
                ("B".to_string(), "t2".to_string())
            ]
        );
        assert_eq!(report, SyncReport { inserted: 2, skipped: 1 });
    }
}
