use std::collections::{BTreeMap, HashMap};

use tokio::sync::RwLock;

use super::{Collection, Document, DocumentStore, Filter};
use crate::error::AppResult;

/// Document store held entirely in process memory
///
/// Used when no database is configured and as the per-test store.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, BTreeMap<i64, Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: Collection, id: i64) -> AppResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|documents| documents.get(&id))
            .cloned())
    }

    async fn insert(&self, collection: Collection, document: Document) -> AppResult<bool> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection).or_default();
        if documents.contains_key(&document.id) {
            return Ok(false);
        }
        documents.insert(document.id, document);
        Ok(true)
    }

    async fn update(&self, collection: Collection, document: Document) -> AppResult<bool> {
        let mut collections = self.collections.write().await;
        match collections
            .get_mut(&collection)
            .and_then(|documents| documents.get_mut(&document.id))
        {
            Some(existing) => {
                *existing = document;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, collection: Collection, id: i64) -> AppResult<bool> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(&collection)
            .and_then(|documents| documents.remove(&id))
            .is_some())
    }

    async fn query(&self, collection: Collection, filter: &Filter) -> AppResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|documents| {
                documents
                    .values()
                    .filter(|document| filter.matches(document))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
