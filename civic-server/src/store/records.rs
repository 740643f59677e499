//! RecordStore - 问题记录列表
//!
//! 内存中保持有序列表 (最新在前)，每次变更后整体写回 `cp_issues`。

use std::sync::Arc;

use shared::models::{IssueRecord, IssueStatus};
use shared::util::short_id;

use super::ISSUES_KEY;
use super::storage::Storage;
use crate::utils::{AppError, AppResult};

/// Result of [`RecordStore::upsert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// New record inserted at the front
    Created,
    /// Existing record replaced in place
    Updated,
}

/// Ordered, persisted collection of issue records
#[derive(Debug)]
pub struct RecordStore {
    records: Vec<IssueRecord>,
    storage: Arc<dyn Storage>,
}

impl RecordStore {
    /// Load the list from storage
    ///
    /// Missing blob → empty store. A blob that is not a JSON array → warning,
    /// empty store. Entries that fail to parse are skipped one by one with a
    /// warning; the rest load normally.
    pub fn load(storage: Arc<dyn Storage>) -> AppResult<Self> {
        let records = match storage.read(ISSUES_KEY)? {
            None => Vec::new(),
            Some(blob) => parse_records(&blob),
        };

        tracing::debug!(count = records.len(), "Issue records loaded");
        Ok(Self { records, storage })
    }

    /// All records, newest first
    pub fn list(&self) -> &[IssueRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&IssueRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Insert a brand-new record at the front as Pending
    ///
    /// Never replaces: on an id collision the record gets a fresh id.
    /// Returns the stored record.
    pub fn create(&mut self, mut record: IssueRecord) -> AppResult<IssueRecord> {
        while self.get(&record.id).is_some() {
            let fresh = short_id();
            tracing::warn!(id = %record.id, fresh = %fresh, "Issue id collision, reassigning");
            record.id = fresh;
        }
        record.status = IssueStatus::Pending;
        self.records.insert(0, record.clone());

        self.persist()?;
        tracing::info!(
            target: "audit",
            action = ?UpsertOutcome::Created,
            id = %record.id,
            priority = %record.priority,
            "Issue saved"
        );
        Ok(record)
    }

    /// Replace by id in place, or insert at the front
    ///
    /// A replaced record keeps the stored `timestamp` and `status`.
    /// An inserted record always starts as Pending.
    pub fn upsert(&mut self, mut record: IssueRecord) -> AppResult<UpsertOutcome> {
        let outcome = match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => {
                record.timestamp = existing.timestamp;
                record.status = existing.status;
                *existing = record.clone();
                UpsertOutcome::Updated
            }
            None => {
                record.status = IssueStatus::Pending;
                self.records.insert(0, record.clone());
                UpsertOutcome::Created
            }
        };

        self.persist()?;
        tracing::info!(
            target: "audit",
            action = ?outcome,
            id = %record.id,
            priority = %record.priority,
            "Issue saved"
        );
        Ok(outcome)
    }

    /// Delete by id; returns whether a record was removed
    pub fn remove(&mut self, id: &str) -> AppResult<bool> {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() == before {
            return Ok(false);
        }

        self.persist()?;
        tracing::info!(target: "audit", id = %id, "Issue deleted");
        Ok(true)
    }

    /// Move the record one step along Pending → In Progress → Resolved → Pending
    ///
    /// Returns the new status, `None` when the id is unknown.
    pub fn advance_status(&mut self, id: &str) -> AppResult<Option<IssueStatus>> {
        let Some(record) = self.records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        let from = record.status;
        record.status = from.next();
        let to = record.status;

        self.persist()?;
        tracing::info!(target: "audit", id = %id, from = %from, to = %to, "Issue status advanced");
        Ok(Some(to))
    }

    fn persist(&self) -> AppResult<()> {
        let blob = serde_json::to_string(&self.records)
            .map_err(|e| AppError::storage(format!("Failed to serialize issues: {e}")))?;
        self.storage.write(ISSUES_KEY, &blob)
    }
}

fn parse_records(blob: &str) -> Vec<IssueRecord> {
    let entries = match serde_json::from_str::<Vec<serde_json::Value>>(blob) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, key = ISSUES_KEY, "Stored issue list is unreadable, starting empty");
            return Vec::new();
        }
    };

    let total = entries.len();
    let records: Vec<IssueRecord> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, index, "Skipping unreadable stored issue");
                None
            }
        })
        .collect();

    if records.len() < total {
        tracing::warn!(
            loaded = records.len(),
            skipped = total - records.len(),
            "Some stored issues could not be read"
        );
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::storage::{FileStorage, MemoryStorage};
    use shared::models::{Address, Location, Priority};
    use std::collections::HashSet;

    fn record(id: &str) -> IssueRecord {
        IssueRecord {
            id: id.to_string(),
            description: format!("Report {id}"),
            image: None,
            priority: Priority::Low,
            ai_summary: "Summary".into(),
            ai_reason: "Reason".into(),
            priority_score: 10,
            location: Location::default(),
            address: Address::default(),
            timestamp: 1_000,
            status: IssueStatus::Pending,
        }
    }

    fn memory_store() -> RecordStore {
        RecordStore::load(Arc::new(MemoryStorage::new())).unwrap()
    }

    #[test]
    fn insert_goes_to_front() {
        let mut store = memory_store();
        assert_eq!(store.upsert(record("a")).unwrap(), UpsertOutcome::Created);
        assert_eq!(store.upsert(record("b")).unwrap(), UpsertOutcome::Created);
        let ids: Vec<_> = store.list().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn replace_keeps_position_timestamp_and_status() {
        let mut store = memory_store();
        store.upsert(record("a")).unwrap();
        store.upsert(record("b")).unwrap();
        store.advance_status("a").unwrap();

        let mut edited = record("a");
        edited.description = "Edited".into();
        edited.timestamp = 9_999;
        edited.status = IssueStatus::Resolved;
        assert_eq!(store.upsert(edited).unwrap(), UpsertOutcome::Updated);

        let ids: Vec<_> = store.list().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        let a = store.get("a").unwrap();
        assert_eq!(a.description, "Edited");
        assert_eq!(a.timestamp, 1_000);
        assert_eq!(a.status, IssueStatus::InProgress);
    }

    #[test]
    fn insert_forces_pending() {
        let mut store = memory_store();
        let mut r = record("a");
        r.status = IssueStatus::Resolved;
        store.upsert(r).unwrap();
        assert_eq!(store.get("a").unwrap().status, IssueStatus::Pending);
    }

    #[test]
    fn remove_unknown_is_noop() {
        let mut store = memory_store();
        store.upsert(record("a")).unwrap();
        assert!(!store.remove("zzz").unwrap());
        assert_eq!(store.len(), 1);
        assert!(store.remove("a").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn advance_cycles_three_states() {
        let mut store = memory_store();
        store.upsert(record("a")).unwrap();
        assert_eq!(store.advance_status("a").unwrap(), Some(IssueStatus::InProgress));
        assert_eq!(store.advance_status("a").unwrap(), Some(IssueStatus::Resolved));
        assert_eq!(store.advance_status("a").unwrap(), Some(IssueStatus::Pending));
        assert_eq!(store.advance_status("missing").unwrap(), None);
    }

    #[test]
    fn mixed_operations_leave_expected_ids() {
        let mut store = memory_store();
        let mut expected: HashSet<String> = HashSet::new();

        // 确定性操作序列: upsert / remove / advance 混合
        for step in 0..60u32 {
            let id = format!("id{}", step % 7);
            match step % 5 {
                0 | 1 | 2 => {
                    store.upsert(record(&id)).unwrap();
                    expected.insert(id);
                }
                3 => {
                    store.remove(&id).unwrap();
                    expected.remove(&id);
                }
                _ => {
                    store.advance_status(&id).unwrap();
                }
            }
        }

        let ids: Vec<_> = store.list().iter().map(|r| r.id.clone()).collect();
        let unique: HashSet<_> = ids.iter().cloned().collect();
        assert_eq!(ids.len(), unique.len(), "no duplicate ids");
        assert_eq!(unique, expected);
    }

    #[test]
    fn mutations_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(dir.path()).unwrap());

        let mut store = RecordStore::load(storage.clone()).unwrap();
        store.upsert(record("a")).unwrap();
        store.upsert(record("b")).unwrap();
        store.advance_status("b").unwrap();
        store.remove("a").unwrap();

        let reloaded = RecordStore::load(storage).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get("b").unwrap().status, IssueStatus::InProgress);
    }

    #[test]
    fn fractional_score_does_not_drop_the_list() {
        let storage = Arc::new(MemoryStorage::new());
        let mut second = serde_json::to_value(record("b")).unwrap();
        second["priorityScore"] = serde_json::json!(62.5);
        let blob = serde_json::json!([serde_json::to_value(record("a")).unwrap(), second]);
        storage.write(ISSUES_KEY, &blob.to_string()).unwrap();

        let store = RecordStore::load(storage).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("b").unwrap().priority_score, 63);
    }

    #[test]
    fn unreadable_entry_is_skipped_alone() {
        let storage = Arc::new(MemoryStorage::new());
        let blob = serde_json::json!([
            serde_json::to_value(record("a")).unwrap(),
            { "id": "broken", "priority": "Urgent" },
            serde_json::to_value(record("c")).unwrap(),
        ]);
        storage.write(ISSUES_KEY, &blob.to_string()).unwrap();

        let store = RecordStore::load(storage).unwrap();
        let ids: Vec<_> = store.list().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn create_never_replaces_an_existing_record() {
        let mut store = memory_store();
        store.upsert(record("a")).unwrap();

        let mut clash = record("a");
        clash.description = "Another report".into();
        clash.status = IssueStatus::Resolved;
        let saved = store.create(clash).unwrap();

        assert_ne!(saved.id, "a");
        assert_eq!(saved.status, IssueStatus::Pending);
        assert_eq!(store.len(), 2);
        assert_eq!(store.list()[0].id, saved.id);
        assert_eq!(store.get("a").unwrap().description, "Report a");
    }

    #[test]
    fn corrupt_blob_loads_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(ISSUES_KEY, "{not json").unwrap();

        let mut store = RecordStore::load(storage.clone()).unwrap();
        assert!(store.is_empty());

        store.upsert(record("a")).unwrap();
        let blob = storage.read(ISSUES_KEY).unwrap().unwrap();
        let parsed: Vec<IssueRecord> = serde_json::from_str(&blob).unwrap();
        assert_eq!(parsed.len(), 1);
    }
}
