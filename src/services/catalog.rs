use std::sync::Arc;

use crate::{
    db::{Document, DocumentStore, Filter},
    error::{AppError, AppResult},
    models::Entity,
};

/// Typed access to the document store
///
/// Maps entities to and from their document form. Every call goes to the store;
/// nothing is cached between requests.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn DocumentStore>,
}

impl Catalog {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Name of the backing store
    pub fn backend(&self) -> &'static str {
        self.store.name()
    }

    /// Point lookup by id
    pub async fn find<E: Entity>(&self, id: i64) -> AppResult<Option<E>> {
        match self.store.get(E::COLLECTION, id).await? {
            Some(document) => Ok(Some(document.decode()?)),
            None => Ok(None),
        }
    }

    /// Point lookup that treats a missing entity as [`AppError::NotFound`]
    pub async fn require<E: Entity>(&self, id: i64) -> AppResult<E> {
        self.find(id)
            .await?
            .ok_or_else(|| AppError::not_found(E::COLLECTION, id))
    }

    /// Writes a new entity. Returns `false` when the store already holds the id.
    pub async fn insert<E: Entity>(&self, entity: &E) -> AppResult<bool> {
        self.store
            .insert(E::COLLECTION, Document::from_entity(entity)?)
            .await
    }

    /// Overwrites an existing entity
    pub async fn save<E: Entity>(&self, entity: &E) -> AppResult<()> {
        let updated = self
            .store
            .update(E::COLLECTION, Document::from_entity(entity)?)
            .await?;
        if !updated {
            return Err(AppError::not_found(E::COLLECTION, entity.id()));
        }
        Ok(())
    }

    /// Deletes by id. Returns `false` when nothing was stored under the id.
    pub async fn remove<E: Entity>(&self, id: i64) -> AppResult<bool> {
        self.store.delete(E::COLLECTION, id).await
    }

    /// All entities matching the filter, in no particular order
    pub async fn search<E: Entity>(&self, filter: &Filter) -> AppResult<Vec<E>> {
        self.store
            .query(E::COLLECTION, filter)
            .await?
            .into_iter()
            .map(Document::decode)
            .collect()
    }
}
