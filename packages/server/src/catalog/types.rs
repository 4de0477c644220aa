use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use common::{ComicType, PegiRating, ReleaseStatus};

use super::error::CatalogError;

pub const MAX_NAME_CHARS: usize = 256;
pub const RATING_RANGE: std::ops::RangeInclusive<f32> = 0.0..=10.0;
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1800..=2100;

/// A catalog entry as held by the record store.
#[derive(Clone, Debug, PartialEq)]
pub struct Comic {
    pub id: i32,
    pub name: String,
    /// Unique identifier; also the name of the entry's media directory.
    pub alternative_name: String,
    pub description: String,
    pub rating: f32,
    pub comic_type: ComicType,
    pub author: String,
    pub artist: String,
    pub year: i32,
    pub pegi: PegiRating,
    pub status: ReleaseStatus,
    pub transfer_status: ReleaseStatus,
    pub tags: BTreeSet<String>,
    pub genres: BTreeSet<String>,
    pub views: i64,
    pub likes: i64,
    pub bookmark: i64,
    pub hidden: bool,
    pub is_finished: bool,
    pub image_path: String,
    pub banner_path: String,
    pub published_on: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comic {
    /// Merge an update into this entry.
    pub fn apply(&mut self, update: ComicUpdate) {
        let ComicUpdate {
            patch,
            image_path,
            banner_path,
            updated_at,
        } = update;

        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(comic_type) = patch.comic_type {
            self.comic_type = comic_type;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(artist) = patch.artist {
            self.artist = artist;
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(pegi) = patch.pegi {
            self.pegi = pegi;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(transfer_status) = patch.transfer_status {
            self.transfer_status = transfer_status;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(genres) = patch.genres {
            self.genres = genres;
        }
        if let Some(views) = patch.views {
            self.views = views;
        }
        if let Some(likes) = patch.likes {
            self.likes = likes;
        }
        if let Some(bookmark) = patch.bookmark {
            self.bookmark = bookmark;
        }
        if let Some(hidden) = patch.hidden {
            self.hidden = hidden;
        }
        if let Some(is_finished) = patch.is_finished {
            self.is_finished = is_finished;
        }
        if let Some(published_on) = patch.published_on {
            self.published_on = published_on;
        }
        if let Some(image_path) = image_path {
            self.image_path = image_path;
        }
        if let Some(banner_path) = banner_path {
            self.banner_path = banner_path;
        }
        self.updated_at = updated_at;
    }
}

/// Input for creating a catalog entry.
///
/// An empty `alternative_name` asks the catalog to derive one from `name`.
#[derive(Clone, Debug, PartialEq)]
pub struct ComicDraft {
    pub name: String,
    pub alternative_name: String,
    pub description: String,
    pub rating: f32,
    pub comic_type: ComicType,
    pub author: String,
    pub artist: String,
    pub year: i32,
    pub pegi: PegiRating,
    pub status: ReleaseStatus,
    pub transfer_status: ReleaseStatus,
    pub tags: BTreeSet<String>,
    pub genres: BTreeSet<String>,
    pub views: i64,
    pub likes: i64,
    pub bookmark: i64,
    pub hidden: bool,
    pub is_finished: bool,
    pub published_on: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ComicDraft {
    /// A draft with the required fields set and everything else empty.
    pub fn new(
        name: impl Into<String>,
        comic_type: ComicType,
        pegi: PegiRating,
        status: ReleaseStatus,
        year: i32,
    ) -> Self {
        Self {
            name: name.into(),
            alternative_name: String::new(),
            description: String::new(),
            rating: 0.0,
            comic_type,
            author: String::new(),
            artist: String::new(),
            year,
            pegi,
            status,
            transfer_status: status,
            tags: BTreeSet::new(),
            genres: BTreeSet::new(),
            views: 0,
            likes: 0,
            bookmark: 0,
            hidden: false,
            is_finished: false,
            published_on: None,
            updated_at: None,
        }
    }

    pub fn with_alternative_name(mut self, alternative_name: impl Into<String>) -> Self {
        self.alternative_name = alternative_name.into();
        self
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        validate_name(&self.name)?;
        validate_rating(self.rating)?;
        validate_year(self.year)?;
        validate_counter("views", self.views)?;
        validate_counter("likes", self.likes)?;
        validate_counter("bookmark", self.bookmark)?;
        Ok(())
    }
}

/// Changeable fields of a catalog entry. `None` leaves a field untouched.
///
/// The identifier and the storage paths are deliberately absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComicPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f32>,
    pub comic_type: Option<ComicType>,
    pub author: Option<String>,
    pub artist: Option<String>,
    pub year: Option<i32>,
    pub pegi: Option<PegiRating>,
    pub status: Option<ReleaseStatus>,
    pub transfer_status: Option<ReleaseStatus>,
    pub tags: Option<BTreeSet<String>>,
    pub genres: Option<BTreeSet<String>>,
    pub views: Option<i64>,
    pub likes: Option<i64>,
    pub bookmark: Option<i64>,
    pub hidden: Option<bool>,
    pub is_finished: Option<bool>,
    pub published_on: Option<DateTime<Utc>>,
}

impl ComicPatch {
    pub fn validate(&self) -> Result<(), CatalogError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(rating) = self.rating {
            validate_rating(rating)?;
        }
        if let Some(year) = self.year {
            validate_year(year)?;
        }
        for (field, value) in [
            ("views", self.views),
            ("likes", self.likes),
            ("bookmark", self.bookmark),
        ] {
            if let Some(value) = value {
                validate_counter(field, value)?;
            }
        }
        Ok(())
    }
}

/// Everything a single store update writes.
#[derive(Clone, Debug, PartialEq)]
pub struct ComicUpdate {
    pub patch: ComicPatch,
    pub image_path: Option<String>,
    pub banner_path: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Listing parameters. `page` is 1-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u64,
    pub per_page: u64,
    /// Case-insensitive substring of the display name.
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
            search: None,
        }
    }
}

impl ListQuery {
    /// Clamp paging to the supported range and drop a blank search term.
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, 100),
            search: self
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }

    /// Rows to skip. Saturates at `i64::MAX`, the largest OFFSET Postgres
    /// accepts.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.per_page)
            .min(i64::MAX as u64)
    }
}

/// One page of visible entries, newest first.
#[derive(Clone, Debug, PartialEq)]
pub struct ComicPage {
    pub items: Vec<Comic>,
    /// Number of matching entries across all pages.
    pub total: u64,
}

/// Normalize a tag or genre list into a set, dropping blank entries.
pub fn collect_labels<I, S>(labels: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels
        .into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn validate_name(name: &str) -> Result<(), CatalogError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_CHARS {
        return Err(CatalogError::Validation(format!(
            "Name must be 1-{MAX_NAME_CHARS} characters"
        )));
    }
    Ok(())
}

fn validate_rating(rating: f32) -> Result<(), CatalogError> {
    if !RATING_RANGE.contains(&rating) {
        return Err(CatalogError::Validation(
            "Rating must be between 0 and 10".into(),
        ));
    }
    Ok(())
}

fn validate_year(year: i32) -> Result<(), CatalogError> {
    if !YEAR_RANGE.contains(&year) {
        return Err(CatalogError::Validation(format!(
            "Year must be between {} and {}",
            YEAR_RANGE.start(),
            YEAR_RANGE.end()
        )));
    }
    Ok(())
}

fn validate_counter(field: &str, value: i64) -> Result<(), CatalogError> {
    if value < 0 {
        return Err(CatalogError::Validation(format!("{field} must be >= 0")));
    }
    Ok(())
}
