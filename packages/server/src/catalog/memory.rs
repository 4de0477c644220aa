use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::store::CatalogStore;
use super::types::{Comic, ComicPage, ComicUpdate, ListQuery};
use crate::persistence::StoreError;

/// In-process [`CatalogStore`] with the same uniqueness rules as the table.
#[derive(Default)]
pub struct MemoryCatalogStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: i32,
    comics: BTreeMap<i32, Comic>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, hidden ones included.
    pub async fn len(&self) -> usize {
        self.inner.read().await.comics.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn find_by_alternative_name(
        &self,
        alternative_name: &str,
    ) -> Result<Option<Comic>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .comics
            .values()
            .find(|c| c.alternative_name == alternative_name)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Comic>, StoreError> {
        let inner = self.inner.read().await;
        // BTreeMap iterates in id order.
        Ok(inner.comics.values().find(|c| c.name == name).cloned())
    }

    async fn insert(&self, mut comic: Comic) -> Result<Comic, StoreError> {
        let mut inner = self.inner.write().await;
        if inner
            .comics
            .values()
            .any(|c| c.alternative_name == comic.alternative_name)
        {
            return Err(StoreError::Conflict(format!(
                "alternative_name '{}' already exists",
                comic.alternative_name
            )));
        }

        inner.last_id += 1;
        comic.id = inner.last_id;
        inner.comics.insert(comic.id, comic.clone());
        Ok(comic)
    }

    async fn update(&self, id: i32, update: ComicUpdate) -> Result<Comic, StoreError> {
        let mut inner = self.inner.write().await;
        let comic = inner.comics.get_mut(&id).ok_or(StoreError::NotFound)?;
        comic.apply(update);
        Ok(comic.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner
            .comics
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self, query: &ListQuery) -> Result<ComicPage, StoreError> {
        let inner = self.inner.read().await;
        let term = query.search.as_deref().map(str::to_lowercase);

        let matching: Vec<&Comic> = inner
            .comics
            .values()
            .rev()
            .filter(|c| !c.hidden)
            .filter(|c| match &term {
                Some(term) => c.name.to_lowercase().contains(term.as_str()),
                None => true,
            })
            .collect();

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(query.per_page).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(ComicPage { items, total })
    }
}
