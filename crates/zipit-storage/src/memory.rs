use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use zipit_core::error::{Result, StorageError};
use zipit_core::repository::{RecordId, UrlRecord, UrlRepository};
use zipit_core::{Context, ShortCode};

/// In-memory implementation of the record store using DashMap.
///
/// Two secondary indexes mirror the unique constraints of the relational
/// schema: one on the long URL and one on the short code. Claiming a slot
/// in an index goes through the DashMap entry API, so concurrent writers
/// of the same long URL serialise on that shard and all but one get
/// [`StorageError::Conflict`].
///
/// Lock order is `records` before `by_short_code`; readers never hold an
/// index guard while touching `records`.
#[derive(Debug)]
pub struct InMemoryRepository {
    records: DashMap<RecordId, UrlRecord>,
    by_long_url: DashMap<String, RecordId>,
    by_short_code: DashMap<String, RecordId>,
    next_id: AtomicU64,
}

impl InMemoryRepository {
    /// Creates an empty repository. The first id handed out is 1.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: DashMap::with_capacity(capacity),
            by_long_url: DashMap::with_capacity(capacity),
            by_short_code: DashMap::with_capacity(capacity),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of stored records, pending ones included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns a snapshot of the record with the given id.
    pub fn get(&self, id: RecordId) -> Option<UrlRecord> {
        self.records.get(&id).map(|record| record.clone())
    }

    /// Records that never received their short code, ordered by id.
    pub fn pending(&self) -> Vec<UrlRecord> {
        let mut pending: Vec<UrlRecord> = self
            .records
            .iter()
            .filter(|record| record.is_pending())
            .map(|record| record.clone())
            .collect();
        pending.sort_by_key(|record| record.id);
        pending
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlRepository for InMemoryRepository {
    async fn create(&self, ctx: &Context, long_url: &str) -> Result<RecordId> {
        ctx.run(async {
            match self.by_long_url.entry(long_url.to_owned()) {
                Entry::Occupied(_) => Err(StorageError::Conflict(format!(
                    "long_url already stored: {long_url}"
                ))),
                Entry::Vacant(slot) => {
                    let id = RecordId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
                    self.records.insert(
                        id,
                        UrlRecord {
                            id,
                            long_url: long_url.to_owned(),
                            short_code: None,
                        },
                    );
                    slot.insert(id);
                    Ok(id)
                }
            }
        })
        .await
    }

    async fn find_by_long_url(&self, ctx: &Context, long_url: &str) -> Result<Option<RecordId>> {
        ctx.run(async { Ok(self.by_long_url.get(long_url).map(|id| *id)) })
            .await
    }

    async fn set_short_code(&self, ctx: &Context, id: RecordId, code: &ShortCode) -> Result<()> {
        ctx.run(async {
            let Some(mut record) = self.records.get_mut(&id) else {
                return Err(StorageError::NotFound(format!("no record with id {id}")));
            };

            if record.short_code.as_ref() == Some(code) {
                return Ok(());
            }

            match self.by_short_code.entry(code.as_str().to_owned()) {
                Entry::Occupied(owner) => {
                    return Err(StorageError::Conflict(format!(
                        "short code {code} already assigned to id {}",
                        owner.get()
                    )));
                }
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }

            if let Some(previous) = record.short_code.replace(code.clone()) {
                self.by_short_code.remove(previous.as_str());
            }
            Ok(())
        })
        .await
    }

    async fn find_by_short_code(&self, ctx: &Context, code: &ShortCode) -> Result<String> {
        ctx.run(async {
            // Copy the id out so the index guard is released before `records` is read.
            let id = self.by_short_code.get(code.as_str()).map(|id| *id);
            id.and_then(|id| self.records.get(&id).map(|record| record.long_url.clone()))
                .ok_or_else(|| StorageError::NotFound(format!("short code {code}")))
        })
        .await
    }
}
