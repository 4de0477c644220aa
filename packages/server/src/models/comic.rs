use std::path::Path;
use std::str::FromStr;

use axum::extract::Multipart;
use chrono::{DateTime, Utc};
use common::{ComicType, ParseEnumError, PegiRating, ReleaseStatus};
use serde::{Deserialize, Serialize};

use super::shared::Pagination;
use crate::catalog::{Comic, ComicDraft, ComicPatch, collect_labels};
use crate::error::AppError;
use crate::utils::upload::SpooledUpload;

/// Multipart part carrying the cover image.
pub const COVER_FIELD: &str = "image_path";
/// Multipart part carrying the banner image.
pub const BANNER_FIELD: &str = "banner_path";

/// A parsed catalog upload form. Every field is optional at this stage;
/// [`ComicForm::into_draft`] enforces what creation requires.
#[derive(Debug, Default)]
pub struct ComicForm {
    pub name: Option<String>,
    pub alternative_name: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f32>,
    pub comic_type: Option<ComicType>,
    pub author: Option<String>,
    pub artist: Option<String>,
    pub year: Option<i32>,
    pub pegi: Option<PegiRating>,
    pub status: Option<ReleaseStatus>,
    pub transfer_status: Option<ReleaseStatus>,
    pub tags: Option<Vec<String>>,
    pub genres: Option<Vec<String>>,
    pub views: Option<i64>,
    pub likes: Option<i64>,
    pub bookmark: Option<i64>,
    pub hidden: Option<bool>,
    pub is_finished: Option<bool>,
    pub published_on: Option<DateTime<Utc>>,
    pub cover: Option<SpooledUpload>,
    pub banner: Option<SpooledUpload>,
}

impl ComicForm {
    /// Read every part of `multipart`, spooling image parts under `upload_dir`.
    pub async fn read(
        mut multipart: Multipart,
        upload_dir: &Path,
        max_image_size: u64,
    ) -> Result<Self, AppError> {
        let mut form = ComicForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
        {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            match name.as_str() {
                COVER_FIELD | BANNER_FIELD => {
                    let upload =
                        SpooledUpload::from_field(field, upload_dir, max_image_size).await?;
                    // Browsers submit an empty part for an untouched file input.
                    let upload = (upload.size() > 0).then_some(upload);
                    if name == COVER_FIELD {
                        form.cover = upload;
                    } else {
                        form.banner = upload;
                    }
                }
                _ => {
                    let value = field.text().await.map_err(|e| {
                        AppError::Validation(format!("Failed to read field '{name}': {e}"))
                    })?;
                    form.set_text(&name, value)?;
                }
            }
        }

        Ok(form)
    }

    fn set_text(&mut self, field: &str, value: String) -> Result<(), AppError> {
        match field {
            "name" => self.name = Some(value),
            "alternative_name" => self.alternative_name = Some(value),
            "description" => self.description = Some(value),
            "author" => self.author = Some(value),
            "original_author" => self.artist = Some(value),
            "rating" => self.rating = parse_number(field, &value)?,
            "year" => self.year = parse_number(field, &value)?,
            "views" => self.views = parse_number(field, &value)?,
            "likes" => self.likes = parse_number(field, &value)?,
            "bookmark" => self.bookmark = parse_number(field, &value)?,
            "hidden" => self.hidden = parse_bool(field, &value)?,
            "is_finished" => self.is_finished = parse_bool(field, &value)?,
            "type_comics" => self.comic_type = parse_enum(&value)?,
            "pegi" => self.pegi = parse_enum(&value)?,
            "status" => self.status = parse_enum(&value)?,
            "transfer_status" => self.transfer_status = parse_enum(&value)?,
            "tags" => self.tags.get_or_insert_with(Vec::new).push(value),
            "genres" => self.genres.get_or_insert_with(Vec::new).push(value),
            "published_on" => self.published_on = parse_timestamp(field, &value)?,
            _ => {} // Ignore unknown fields.
        }
        Ok(())
    }

    /// Turn the form into a creation draft plus its two images.
    pub fn into_draft(self) -> Result<(ComicDraft, SpooledUpload, SpooledUpload), AppError> {
        let cover = self.cover.ok_or_else(|| missing(COVER_FIELD))?;
        let banner = self.banner.ok_or_else(|| missing(BANNER_FIELD))?;

        let draft = ComicDraft {
            name: self.name.ok_or_else(|| missing("name"))?,
            alternative_name: self.alternative_name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            rating: self.rating.unwrap_or_default(),
            comic_type: self.comic_type.ok_or_else(|| missing("type_comics"))?,
            author: self.author.unwrap_or_default(),
            artist: self.artist.unwrap_or_default(),
            year: self.year.ok_or_else(|| missing("year"))?,
            pegi: self.pegi.ok_or_else(|| missing("pegi"))?,
            status: self.status.ok_or_else(|| missing("status"))?,
            transfer_status: self
                .transfer_status
                .ok_or_else(|| missing("transfer_status"))?,
            tags: collect_labels(self.tags.unwrap_or_default()),
            genres: collect_labels(self.genres.unwrap_or_default()),
            views: self.views.unwrap_or_default(),
            likes: self.likes.unwrap_or_default(),
            bookmark: self.bookmark.unwrap_or_default(),
            hidden: self.hidden.unwrap_or_default(),
            is_finished: self.is_finished.unwrap_or_default(),
            published_on: self.published_on,
            updated_at: None,
        };

        Ok((draft, cover, banner))
    }

    /// Turn the form into a patch for the entry stored under `alternative_name`.
    pub fn into_patch(
        self,
        alternative_name: &str,
    ) -> Result<(ComicPatch, Option<SpooledUpload>, Option<SpooledUpload>), AppError> {
        if let Some(requested) = &self.alternative_name
            && requested.trim() != alternative_name
        {
            return Err(AppError::Validation(
                "alternative_name cannot be changed".into(),
            ));
        }

        let patch = ComicPatch {
            name: self.name,
            description: self.description,
            rating: self.rating,
            comic_type: self.comic_type,
            author: self.author,
            artist: self.artist,
            year: self.year,
            pegi: self.pegi,
            status: self.status,
            transfer_status: self.transfer_status,
            tags: self.tags.map(collect_labels),
            genres: self.genres.map(collect_labels),
            views: self.views,
            likes: self.likes,
            bookmark: self.bookmark,
            hidden: self.hidden,
            is_finished: self.is_finished,
            published_on: self.published_on,
        };

        Ok((patch, self.cover, self.banner))
    }
}

fn missing(field: &str) -> AppError {
    AppError::Validation(format!("Missing '{field}' field"))
}

/// Blank values count as absent.
fn parse_number<T: FromStr>(field: &str, value: &str) -> Result<Option<T>, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| AppError::Validation(format!("Field '{field}' must be a number")))
}

fn parse_bool(field: &str, value: &str) -> Result<Option<bool>, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "true" | "1" | "on" | "yes" => Ok(Some(true)),
        "false" | "0" | "off" | "no" => Ok(Some(false)),
        _ => Err(AppError::Validation(format!(
            "Field '{field}' must be a boolean"
        ))),
    }
}

fn parse_enum<T: FromStr<Err = ParseEnumError>>(value: &str) -> Result<Option<T>, AppError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|e: ParseEnumError| AppError::Validation(e.to_string()))
}

fn parse_timestamp(field: &str, value: &str) -> Result<Option<DateTime<Utc>>, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|_| AppError::Validation(format!("Field '{field}' must be an RFC 3339 timestamp")))
}

/// A catalog entry as returned by the API.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ComicResponse {
    #[schema(example = 12)]
    pub id: i32,
    #[schema(example = "Полночь")]
    pub name: String,
    /// Unique identifier, also used in URLs.
    #[schema(example = "polnoch")]
    pub alternative_name: String,
    pub description: String,
    #[schema(example = 8.5)]
    pub rating: f32,
    #[serde(rename = "type_comics")]
    pub comic_type: ComicType,
    pub author: String,
    #[serde(rename = "original_author")]
    pub artist: String,
    #[schema(example = 2021)]
    pub year: i32,
    pub pegi: PegiRating,
    pub status: ReleaseStatus,
    pub transfer_status: ReleaseStatus,
    #[schema(example = json!(["revenge", "school"]))]
    pub tags: Vec<String>,
    #[schema(example = json!(["action", "drama"]))]
    pub genres: Vec<String>,
    pub views: i64,
    pub likes: i64,
    pub bookmark: i64,
    pub hidden: bool,
    pub is_finished: bool,
    /// Location of the stored cover image.
    #[schema(example = "images/polnoch/cover/cover.jpg")]
    pub image_path: String,
    /// Location of the stored banner image.
    #[schema(example = "images/polnoch/banners/banner.jpg")]
    pub banner_path: String,
    pub published_on: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Comic> for ComicResponse {
    fn from(comic: Comic) -> Self {
        Self {
            id: comic.id,
            name: comic.name,
            alternative_name: comic.alternative_name,
            description: comic.description,
            rating: comic.rating,
            comic_type: comic.comic_type,
            author: comic.author,
            artist: comic.artist,
            year: comic.year,
            pegi: comic.pegi,
            status: comic.status,
            transfer_status: comic.transfer_status,
            tags: comic.tags.into_iter().collect(),
            genres: comic.genres.into_iter().collect(),
            views: comic.views,
            likes: comic.likes,
            bookmark: comic.bookmark,
            hidden: comic.hidden,
            is_finished: comic.is_finished,
            image_path: comic.image_path,
            banner_path: comic.banner_path,
            published_on: comic.published_on,
            updated_at: comic.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ComicListResponse {
    pub data: Vec<ComicResponse>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ComicListQuery {
    /// Page number, starting at 1.
    pub page: Option<u64>,
    /// Items per page (1-100, default 20).
    pub per_page: Option<u64>,
    /// Case-insensitive substring of the display name.
    pub search: Option<String>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ComicInfoQuery {
    /// Exact display name.
    pub name: String,
}
