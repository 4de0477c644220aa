use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::storage::ImageKind;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::catalog::ListQuery;
use crate::config::StorageConfig;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::comic::{
    ComicForm, ComicInfoQuery, ComicListQuery, ComicListResponse, ComicResponse,
};
use crate::models::shared::Pagination;
use crate::state::AppState;

/// Room for both images plus the text fields of the form.
pub fn upload_body_limit(storage: &StorageConfig) -> DefaultBodyLimit {
    let limit = storage.max_image_size.saturating_mul(2) + 1024 * 1024;
    DefaultBodyLimit::max(usize::try_from(limit).unwrap_or(usize::MAX))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Comics",
    operation_id = "createComic",
    summary = "Create a catalog entry",
    description = "Creates an entry from a multipart form. `name`, `type_comics`, `pegi`, `status`, \
        `transfer_status`, `year` and both image parts (`image_path`, `banner_path`) are required. \
        An empty or Cyrillic `alternative_name` is replaced by a slug of `name`.",
    request_body(content_type = "multipart/form-data", description = "Entry fields with cover and banner images"),
    responses(
        (status = 201, description = "Entry created", body = ComicResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 409, description = "Alternative name already in use (CONFLICT)", body = ErrorBody),
        (status = 413, description = "Image too large (PAYLOAD_TOO_LARGE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(user_id = auth_user.user_id))]
pub async fn create_comic(
    auth_user: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let storage = &state.config.storage;
    let form = ComicForm::read(multipart, &storage.upload_dir, storage.max_image_size).await?;
    let (draft, cover, banner) = form.into_draft()?;

    let comic = state
        .catalog
        .create(draft, cover.open().await?, banner.open().await?)
        .await?;

    Ok((StatusCode::CREATED, Json(ComicResponse::from(comic))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Comics",
    operation_id = "listComics",
    summary = "List catalog entries",
    description = "Returns visible entries, newest first.",
    params(ComicListQuery),
    responses(
        (status = 200, description = "One page of entries", body = ComicListResponse),
    ),
)]
#[instrument(skip(state, query), fields(page = query.page, search = query.search.as_deref()))]
pub async fn list_comics(
    State(state): State<AppState>,
    Query(query): Query<ComicListQuery>,
) -> Result<Json<ComicListResponse>, AppError> {
    let defaults = ListQuery::default();
    let query = ListQuery {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
        search: query.search,
    }
    .normalized();
    let (page, per_page) = (query.page, query.per_page);

    let result = state.catalog.list(query).await?;

    Ok(Json(ComicListResponse {
        data: result.items.into_iter().map(ComicResponse::from).collect(),
        pagination: Pagination::new(page, per_page, result.total),
    }))
}

#[utoipa::path(
    get,
    path = "/info",
    tag = "Comics",
    operation_id = "getComicByName",
    summary = "Find an entry by display name",
    description = "Exact match on `name`. If several entries share the name, the oldest wins.",
    params(ComicInfoQuery),
    responses(
        (status = 200, description = "Entry found", body = ComicResponse),
        (status = 404, description = "No entry with that name (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(name = %query.name))]
pub async fn get_comic_by_name(
    State(state): State<AppState>,
    Query(query): Query<ComicInfoQuery>,
) -> Result<Json<ComicResponse>, AppError> {
    let comic = state.catalog.fetch_by_name(&query.name).await?;
    Ok(Json(comic.into()))
}

#[utoipa::path(
    get,
    path = "/{alternative_name}",
    tag = "Comics",
    operation_id = "getComic",
    summary = "Get an entry",
    params(("alternative_name" = String, Path, description = "Entry identifier")),
    responses(
        (status = 200, description = "Entry found", body = ComicResponse),
        (status = 404, description = "Entry not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_comic(
    State(state): State<AppState>,
    Path(alternative_name): Path<String>,
) -> Result<Json<ComicResponse>, AppError> {
    let comic = state.catalog.fetch(&alternative_name).await?;
    Ok(Json(comic.into()))
}

#[utoipa::path(
    patch,
    path = "/{alternative_name}",
    tag = "Comics",
    operation_id = "updateComic",
    summary = "Update an entry",
    description = "Partial update from a multipart form. Only supplied fields change. Supplying \
        `image_path` or `banner_path` replaces the stored image. The identifier cannot change.",
    params(("alternative_name" = String, Path, description = "Entry identifier")),
    request_body(content_type = "multipart/form-data", description = "Fields to change, optional images"),
    responses(
        (status = 200, description = "Entry updated", body = ComicResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Entry not found (NOT_FOUND)", body = ErrorBody),
        (status = 413, description = "Image too large (PAYLOAD_TOO_LARGE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(user_id = auth_user.user_id))]
pub async fn update_comic(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(alternative_name): Path<String>,
    multipart: Multipart,
) -> Result<Json<ComicResponse>, AppError> {
    let storage = &state.config.storage;
    let form = ComicForm::read(multipart, &storage.upload_dir, storage.max_image_size).await?;
    let (patch, cover, banner) = form.into_patch(&alternative_name)?;

    let cover = match &cover {
        Some(upload) => Some(upload.open().await?),
        None => None,
    };
    let banner = match &banner {
        Some(upload) => Some(upload.open().await?),
        None => None,
    };

    let comic = state
        .catalog
        .update(&alternative_name, patch, cover, banner)
        .await?;

    Ok(Json(comic.into()))
}

#[utoipa::path(
    delete,
    path = "/{alternative_name}",
    tag = "Comics",
    operation_id = "deleteComic",
    summary = "Delete an entry",
    description = "Deletes the record, then its media directory. Returns the deleted entry.",
    params(("alternative_name" = String, Path, description = "Entry identifier")),
    responses(
        (status = 200, description = "Entry deleted", body = ComicResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Entry not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn delete_comic(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(alternative_name): Path<String>,
) -> Result<Json<ComicResponse>, AppError> {
    let comic = state.catalog.delete(&alternative_name).await?;
    Ok(Json(comic.into()))
}

#[utoipa::path(
    get,
    path = "/{alternative_name}/cover",
    tag = "Comics",
    operation_id = "downloadCover",
    summary = "Download the cover image",
    params(("alternative_name" = String, Path, description = "Entry identifier")),
    responses(
        (status = 200, description = "Image content", content_type = "image/jpeg"),
        (status = 404, description = "Entry or image not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn download_cover(
    State(state): State<AppState>,
    Path(alternative_name): Path<String>,
) -> Result<Response, AppError> {
    image_response(&state, &alternative_name, ImageKind::Cover).await
}

#[utoipa::path(
    get,
    path = "/{alternative_name}/banner",
    tag = "Comics",
    operation_id = "downloadBanner",
    summary = "Download the banner image",
    params(("alternative_name" = String, Path, description = "Entry identifier")),
    responses(
        (status = 200, description = "Image content", content_type = "image/jpeg"),
        (status = 404, description = "Entry or image not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn download_banner(
    State(state): State<AppState>,
    Path(alternative_name): Path<String>,
) -> Result<Response, AppError> {
    image_response(&state, &alternative_name, ImageKind::Banner).await
}

async fn image_response(
    state: &AppState,
    alternative_name: &str,
    kind: ImageKind,
) -> Result<Response, AppError> {
    let reader = state.catalog.open_image(alternative_name, kind).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    let content_type = mime_guess::from_path(kind.file_name())
        .first_or_octet_stream()
        .to_string();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
