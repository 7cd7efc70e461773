use crate::{
    core::constants::MAX_LIST_RESULTS,
    data::records::{ListQuery, MarkedMapRecord, MarkedMapUpdate, NewMarkedMap},
    MarkError, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Persistence boundary for marked-map records.
///
/// Calls are never retried here; retry policy belongs to the implementation.
#[async_trait]
pub trait MarkedMapStore: Send + Sync {
    /// Records matching the query, most recently updated first
    async fn list(&self, query: &ListQuery) -> Result<Vec<MarkedMapRecord>>;

    /// Every record saved for `map_id`, most recently updated first
    async fn for_map(&self, map_id: &str) -> Result<Vec<MarkedMapRecord>>;

    async fn create(&self, record: NewMarkedMap) -> Result<MarkedMapRecord>;

    async fn update(&self, id: &str, update: MarkedMapUpdate) -> Result<MarkedMapRecord>;

    async fn delete(&self, id: &str) -> Result<()>;
}

struct StoredRecord {
    seq: u64,
    record: MarkedMapRecord,
}

/// Store kept in process memory, with the same query semantics as the REST API
pub struct InMemoryStore {
    records: Mutex<Vec<StoredRecord>>,
    next_seq: AtomicU64,
    max_results: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            next_seq: AtomicU64::new(1),
            max_results: MAX_LIST_RESULTS,
        }
    }

    /// Seed the store with existing records, keeping their ids and timestamps
    pub fn with_records(records: impl IntoIterator<Item = MarkedMapRecord>) -> Self {
        let store = Self::new();
        {
            let mut guard = store.lock();
            for record in records {
                let seq = store.next_seq.fetch_add(1, Ordering::Relaxed);
                guard.push(StoredRecord { seq, record });
            }
        }
        store
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<StoredRecord>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_id(&self) -> (u64, String) {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        (seq, format!("{:024x}", seq))
    }

    fn newest_first(mut hits: Vec<&StoredRecord>) -> Vec<MarkedMapRecord> {
        hits.sort_by(|a, b| {
            b.record
                .updated_at
                .cmp(&a.record.updated_at)
                .then(b.seq.cmp(&a.seq))
        });
        hits.into_iter().map(|stored| stored.record.clone()).collect()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn created_today(record: &MarkedMapRecord, now: DateTime<Utc>) -> bool {
    record
        .created_at
        .map(|created| created.date_naive() == now.date_naive())
        .unwrap_or(false)
}

#[async_trait]
impl MarkedMapStore for InMemoryStore {
    async fn list(&self, query: &ListQuery) -> Result<Vec<MarkedMapRecord>> {
        let needle = query.text().map(str::to_lowercase);
        let now = Utc::now();
        let guard = self.lock();

        let hits: Vec<&StoredRecord> = guard
            .iter()
            .filter(|stored| match &needle {
                Some(needle) => stored.record.map_name.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .filter(|stored| !query.today_only || created_today(&stored.record, now))
            .collect();

        let mut records = Self::newest_first(hits);
        records.truncate(self.max_results);
        log::debug!("list {:?} -> {} records", query, records.len());
        Ok(records)
    }

    async fn for_map(&self, map_id: &str) -> Result<Vec<MarkedMapRecord>> {
        let guard = self.lock();
        let hits: Vec<&StoredRecord> = guard
            .iter()
            .filter(|stored| stored.record.map_id == map_id)
            .collect();
        Ok(Self::newest_first(hits))
    }

    async fn create(&self, record: NewMarkedMap) -> Result<MarkedMapRecord> {
        record.validate()?;
        let (seq, id) = self.next_id();
        let now = Utc::now();
        let created = MarkedMapRecord {
            id,
            map_id: record.map_id,
            map_name: record.map_name,
            image_url: record.image_url,
            marks: record.marks,
            created_at: Some(now),
            updated_at: Some(now),
        };

        log::info!("created marked map {} for {}", created.id, created.map_id);
        self.lock().push(StoredRecord {
            seq,
            record: created.clone(),
        });
        Ok(created)
    }

    async fn update(&self, id: &str, update: MarkedMapUpdate) -> Result<MarkedMapRecord> {
        let mut guard = self.lock();
        let stored = guard
            .iter_mut()
            .find(|stored| stored.record.id == id)
            .ok_or_else(|| MarkError::NotFound(id.to_string()))?;

        update.apply_to(&mut stored.record);
        stored.record.updated_at = Some(Utc::now());
        log::debug!("updated marked map {}", id);
        Ok(stored.record.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut guard = self.lock();
        let before = guard.len();
        guard.retain(|stored| stored.record.id != id);
        if guard.len() == before {
            return Err(MarkError::NotFound(id.to_string()).into());
        }
        log::info!("deleted marked map {}", id);
        Ok(())
    }
}
