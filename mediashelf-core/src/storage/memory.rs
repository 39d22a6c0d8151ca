use super::MediaStore;
use crate::{
    error::Result,
    query::{CompiledExpr, SortOrder},
};
use async_trait::async_trait;
use mediashelf_model::{MediaId, MediaRecord};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::trace;

/// Store holding every record in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryMediaStore {
    records: Arc<RwLock<HashMap<MediaId, MediaRecord>>>,
}

impl InMemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = MediaRecord>) -> Self {
        let records = records.into_iter().map(|record| (record.id, record)).collect();
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Inserts or replaces a record, returning the previous version.
    pub async fn upsert(&self, record: MediaRecord) -> Option<MediaRecord> {
        self.records.write().await.insert(record.id, record)
    }

    pub async fn remove(&self, id: &MediaId) -> Option<MediaRecord> {
        self.records.write().await.remove(id)
    }

    pub async fn get(&self, id: &MediaId) -> Option<MediaRecord> {
        self.records.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl MediaStore for InMemoryMediaStore {
    async fn fetch(&self, expr: &CompiledExpr, order: &SortOrder) -> Result<Vec<MediaRecord>> {
        let guard = self.records.read().await;
        let mut matched: Vec<MediaRecord> = guard
            .values()
            .filter(|record| expr.matches(record))
            .cloned()
            .collect();
        drop(guard);

        order.sort(&mut matched);
        trace!(matched = matched.len(), %expr, "in-memory fetch");
        Ok(matched)
    }
}
