use std::str::FromStr;

use async_trait::async_trait;
use common::ParseEnumError;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ExprTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::types::{Comic, ComicPage, ComicUpdate, ListQuery, collect_labels};
use crate::entity::comic;
use crate::models::shared::escape_like;
use crate::persistence::StoreError;

/// Persistence for catalog entries.
///
/// `alternative_name` is unique across all entries; `insert` reports a
/// violation as [`StoreError::Conflict`].
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_by_alternative_name(
        &self,
        alternative_name: &str,
    ) -> Result<Option<Comic>, StoreError>;

    /// Exact match on the display name. The lowest id wins when several
    /// entries share a name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Comic>, StoreError>;

    /// Insert a new entry. The incoming `id` is ignored; the returned entry
    /// carries the one the store assigned.
    async fn insert(&self, comic: Comic) -> Result<Comic, StoreError>;

    async fn update(&self, id: i32, update: ComicUpdate) -> Result<Comic, StoreError>;

    async fn delete(&self, id: i32) -> Result<(), StoreError>;

    /// Visible entries matching `query`, newest first.
    async fn list(&self, query: &ListQuery) -> Result<ComicPage, StoreError>;
}

/// [`CatalogStore`] backed by the `comic` table.
#[derive(Clone)]
pub struct SeaOrmCatalogStore {
    db: DatabaseConnection,
}

impl SeaOrmCatalogStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogStore for SeaOrmCatalogStore {
    async fn find_by_alternative_name(
        &self,
        alternative_name: &str,
    ) -> Result<Option<Comic>, StoreError> {
        comic::Entity::find()
            .filter(comic::Column::AlternativeName.eq(alternative_name))
            .one(&self.db)
            .await?
            .map(Comic::try_from)
            .transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Comic>, StoreError> {
        comic::Entity::find()
            .filter(comic::Column::Name.eq(name))
            .order_by_asc(comic::Column::Id)
            .one(&self.db)
            .await?
            .map(Comic::try_from)
            .transpose()
    }

    async fn insert(&self, comic: Comic) -> Result<Comic, StoreError> {
        let model = comic::ActiveModel {
            name: Set(comic.name),
            alternative_name: Set(comic.alternative_name),
            description: Set(comic.description),
            rating: Set(comic.rating),
            comic_type: Set(comic.comic_type.as_str().to_string()),
            pegi: Set(comic.pegi.as_str().to_string()),
            status: Set(comic.status.as_str().to_string()),
            transfer_status: Set(comic.transfer_status.as_str().to_string()),
            author: Set(comic.author),
            artist: Set(comic.artist),
            year: Set(comic.year),
            tags: Set(comic.tags.into_iter().collect()),
            genres: Set(comic.genres.into_iter().collect()),
            views: Set(comic.views),
            likes: Set(comic.likes),
            bookmark: Set(comic.bookmark),
            hidden: Set(comic.hidden),
            is_finished: Set(comic.is_finished),
            image_path: Set(comic.image_path),
            banner_path: Set(comic.banner_path),
            published_on: Set(comic.published_on),
            updated_at: Set(comic.updated_at),
            ..Default::default()
        };

        let inserted = model.insert(&self.db).await?;
        Comic::try_from(inserted)
    }

    async fn update(&self, id: i32, update: ComicUpdate) -> Result<Comic, StoreError> {
        let txn = self.db.begin().await?;

        let existing = comic::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(StoreError::NotFound)?;
        let mut active: comic::ActiveModel = existing.into();

        let ComicUpdate {
            patch,
            image_path,
            banner_path,
            updated_at,
        } = update;

        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(rating) = patch.rating {
            active.rating = Set(rating);
        }
        if let Some(comic_type) = patch.comic_type {
            active.comic_type = Set(comic_type.as_str().to_string());
        }
        if let Some(author) = patch.author {
            active.author = Set(author);
        }
        if let Some(artist) = patch.artist {
            active.artist = Set(artist);
        }
        if let Some(year) = patch.year {
            active.year = Set(year);
        }
        if let Some(pegi) = patch.pegi {
            active.pegi = Set(pegi.as_str().to_string());
        }
        if let Some(status) = patch.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(transfer_status) = patch.transfer_status {
            active.transfer_status = Set(transfer_status.as_str().to_string());
        }
        if let Some(tags) = patch.tags {
            active.tags = Set(tags.into_iter().collect());
        }
        if let Some(genres) = patch.genres {
            active.genres = Set(genres.into_iter().collect());
        }
        if let Some(views) = patch.views {
            active.views = Set(views);
        }
        if let Some(likes) = patch.likes {
            active.likes = Set(likes);
        }
        if let Some(bookmark) = patch.bookmark {
            active.bookmark = Set(bookmark);
        }
        if let Some(hidden) = patch.hidden {
            active.hidden = Set(hidden);
        }
        if let Some(is_finished) = patch.is_finished {
            active.is_finished = Set(is_finished);
        }
        if let Some(published_on) = patch.published_on {
            active.published_on = Set(published_on);
        }
        if let Some(image_path) = image_path {
            active.image_path = Set(image_path);
        }
        if let Some(banner_path) = banner_path {
            active.banner_path = Set(banner_path);
        }
        active.updated_at = Set(updated_at);

        let model = active.update(&txn).await?;
        txn.commit().await?;

        Comic::try_from(model)
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let result = comic::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list(&self, query: &ListQuery) -> Result<ComicPage, StoreError> {
        let mut select = comic::Entity::find().filter(comic::Column::Hidden.eq(false));

        if let Some(ref search) = query.search {
            let term = escape_like(search.trim());
            if !term.is_empty() {
                select = select.filter(
                    Expr::expr(Func::lower(Expr::col(comic::Column::Name)))
                        .like(LikeExpr::new(format!("%{}%", term.to_lowercase())).escape('\\')),
                );
            }
        }

        let total = select
            .clone()
            .paginate(&self.db, query.per_page)
            .num_items()
            .await?;

        let items = select
            .order_by_desc(comic::Column::Id)
            .offset(Some(query.offset()))
            .limit(Some(query.per_page))
            .all(&self.db)
            .await?
            .into_iter()
            .map(Comic::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ComicPage { items, total })
    }
}

impl TryFrom<comic::Model> for Comic {
    type Error = StoreError;

    fn try_from(model: comic::Model) -> Result<Self, Self::Error> {
        Ok(Comic {
            id: model.id,
            comic_type: parse_label(&model.comic_type)?,
            pegi: parse_label(&model.pegi)?,
            status: parse_label(&model.status)?,
            transfer_status: parse_label(&model.transfer_status)?,
            name: model.name,
            alternative_name: model.alternative_name,
            description: model.description,
            rating: model.rating,
            author: model.author,
            artist: model.artist,
            year: model.year,
            tags: collect_labels(model.tags),
            genres: collect_labels(model.genres),
            views: model.views,
            likes: model.likes,
            bookmark: model.bookmark,
            hidden: model.hidden,
            is_finished: model.is_finished,
            image_path: model.image_path,
            banner_path: model.banner_path,
            published_on: model.published_on,
            updated_at: model.updated_at,
        })
    }
}

fn parse_label<T>(value: &str) -> Result<T, StoreError>
where
    T: FromStr<Err = ParseEnumError>,
{
    value
        .parse()
        .map_err(|e: ParseEnumError| StoreError::Corrupt(e.to_string()))
}
