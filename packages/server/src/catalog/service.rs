use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use common::slug::{contains_cyrillic, slugify};
use common::storage::{BoxReader, ComicLayout, ImageKind, MediaStore, StorageError};
use tracing::{info, instrument, warn};

use super::error::CatalogError;
use super::store::CatalogStore;
use super::types::{Comic, ComicDraft, ComicPage, ComicPatch, ComicUpdate, ListQuery};
use crate::persistence::StoreError;
use crate::utils::filename::validate_flat_filename;

/// Media upload workflow: keeps catalog records and their image directories
/// in step.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    media: Arc<dyn MediaStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>, media: Arc<dyn MediaStore>) -> Self {
        Self { store, media }
    }

    /// Create an entry, lay out its media directory and store both images.
    ///
    /// An explicit `alternative_name` is checked for uniqueness before anything
    /// touches the filesystem. A derived one is not; the store's unique
    /// constraint is the final arbiter. If the insert fails, the written files
    /// stay on disk.
    #[instrument(skip(self, draft, cover, banner), fields(name = %draft.name))]
    pub async fn create(
        &self,
        draft: ComicDraft,
        cover: BoxReader,
        banner: BoxReader,
    ) -> Result<Comic, CatalogError> {
        draft.validate()?;

        let requested = draft.alternative_name.trim();
        if !requested.is_empty()
            && self
                .store
                .find_by_alternative_name(requested)
                .await?
                .is_some()
        {
            return Err(CatalogError::DuplicateIdentifier(requested.to_string()));
        }

        let alternative_name = resolve_alternative_name(&draft.name, requested)?;
        let layout = ComicLayout::new(&alternative_name);

        for dir in layout.directories() {
            self.media.ensure_dir(&dir).await?;
        }
        let image_path = self
            .media
            .write_stream(&layout.image(ImageKind::Cover), cover)
            .await?;
        let banner_path = self
            .media
            .write_stream(&layout.image(ImageKind::Banner), banner)
            .await?;

        let now = Utc::now();
        let comic = Comic {
            id: 0,
            name: draft.name.trim().to_string(),
            alternative_name: alternative_name.clone(),
            description: draft.description,
            rating: draft.rating,
            comic_type: draft.comic_type,
            author: draft.author,
            artist: draft.artist,
            year: draft.year,
            pegi: draft.pegi,
            status: draft.status,
            transfer_status: draft.transfer_status,
            tags: draft.tags,
            genres: draft.genres,
            views: draft.views,
            likes: draft.likes,
            bookmark: draft.bookmark,
            hidden: draft.hidden,
            is_finished: draft.is_finished,
            image_path: path_string(&image_path),
            banner_path: path_string(&banner_path),
            published_on: draft.published_on.unwrap_or(now),
            updated_at: draft.updated_at.unwrap_or(now),
        };

        let comic = self.store.insert(comic).await.map_err(|e| {
            warn!(
                alternative_name = %alternative_name,
                error = %e,
                "Insert failed after media was written; leaving files in place"
            );
            CatalogError::Persistence(e)
        })?;

        info!(id = comic.id, alternative_name = %comic.alternative_name, "Created comic");
        Ok(comic)
    }

    /// Apply a partial update, replacing whichever images were supplied.
    ///
    /// The entry keeps its identifier and directory. An unknown identifier
    /// is reported before any validation failure in `patch`.
    #[instrument(skip(self, patch, cover, banner))]
    pub async fn update(
        &self,
        alternative_name: &str,
        patch: ComicPatch,
        cover: Option<BoxReader>,
        banner: Option<BoxReader>,
    ) -> Result<Comic, CatalogError> {
        let existing = self.fetch(alternative_name).await?;
        patch.validate()?;
        let layout = ComicLayout::new(&existing.alternative_name);

        let mut update = ComicUpdate {
            patch: ComicPatch {
                name: patch.name.as_deref().map(|n| n.trim().to_string()),
                ..patch
            },
            image_path: None,
            banner_path: None,
            updated_at: Utc::now(),
        };

        if let Some(cover) = cover {
            let path = self
                .media
                .write_stream(&layout.image(ImageKind::Cover), cover)
                .await?;
            update.image_path = Some(path_string(&path));
        }
        if let Some(banner) = banner {
            let path = self
                .media
                .write_stream(&layout.image(ImageKind::Banner), banner)
                .await?;
            update.banner_path = Some(path_string(&path));
        }

        let comic = self
            .store
            .update(existing.id, update)
            .await
            .map_err(|e| missing_as_not_found(e, alternative_name))?;

        info!(id = comic.id, "Updated comic");
        Ok(comic)
    }

    /// Remove the record, then its media directory.
    ///
    /// A directory that cannot be removed is reported as a storage error; the
    /// record stays deleted.
    #[instrument(skip(self))]
    pub async fn delete(&self, alternative_name: &str) -> Result<Comic, CatalogError> {
        let existing = self.fetch(alternative_name).await?;

        self.store
            .delete(existing.id)
            .await
            .map_err(|e| missing_as_not_found(e, alternative_name))?;

        let layout = ComicLayout::new(&existing.alternative_name);
        match self.media.remove_dir_all(layout.root()).await {
            Ok(true) => {}
            Ok(false) => warn!(id = existing.id, "Media directory was already absent"),
            Err(e) => {
                tracing::error!(
                    id = existing.id,
                    error = %e,
                    "Record deleted but media directory could not be removed"
                );
                return Err(e.into());
            }
        }

        info!(id = existing.id, "Deleted comic");
        Ok(existing)
    }

    /// Look up an entry by its exact display name.
    #[instrument(skip(self))]
    pub async fn fetch_by_name(&self, name: &str) -> Result<Comic, CatalogError> {
        self.store
            .find_by_name(name)
            .await?
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }

    /// Look up an entry by its identifier.
    pub async fn fetch(&self, alternative_name: &str) -> Result<Comic, CatalogError> {
        self.store
            .find_by_alternative_name(alternative_name)
            .await?
            .ok_or_else(|| CatalogError::NotFound(alternative_name.to_string()))
    }

    pub async fn list(&self, query: ListQuery) -> Result<ComicPage, CatalogError> {
        Ok(self.store.list(&query.normalized()).await?)
    }

    /// Open one of an entry's stored images for streaming.
    pub async fn open_image(
        &self,
        alternative_name: &str,
        kind: ImageKind,
    ) -> Result<BoxReader, CatalogError> {
        let comic = self.fetch(alternative_name).await?;
        let key = ComicLayout::new(&comic.alternative_name).image(kind);
        self.media.open(&key).await.map_err(|e| match e {
            StorageError::NotFound(_) => {
                CatalogError::NotFound(format!("{}/{}", alternative_name, kind.as_str()))
            }
            other => other.into(),
        })
    }
}

/// Pick the identifier a new entry is stored under.
///
/// Empty or Cyrillic identifiers are replaced with a slug of the display name.
fn resolve_alternative_name(name: &str, requested: &str) -> Result<String, CatalogError> {
    let candidate = if requested.is_empty() || contains_cyrillic(requested) {
        slugify(name)
    } else {
        requested.to_string()
    };

    validate_flat_filename(&candidate)
        .map(str::to_string)
        .map_err(|e| CatalogError::Validation(format!("Invalid alternative name: {}", e.message())))
}

fn missing_as_not_found(err: StoreError, alternative_name: &str) -> CatalogError {
    match err {
        StoreError::NotFound => CatalogError::NotFound(alternative_name.to_string()),
        other => other.into(),
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
