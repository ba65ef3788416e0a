use axum::{
    extract::State,
    middleware::from_extractor_with_state,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::{
    auth::RequireToken,
    error::{message, ApiError, AppJson, AppPath},
    state::AppState,
    store::Photo,
};

use super::dto::{CreatePhotoRequest, UpdatePhotoRequest};

/// Reads are public; create, update and delete go through [`RequireToken`]
/// before the body is decoded.
pub fn photo_routes(state: &AppState) -> Router<AppState> {
    let gate = from_extractor_with_state::<RequireToken, AppState>(state.clone());

    Router::new()
        .route(
            "/photo",
            get(get_photos).merge(post(upload_photo).route_layer(gate.clone())),
        )
        .route(
            "/photo/:photoId",
            put(update_photo).delete(delete_photo).route_layer(gate),
        )
}

#[instrument(skip(state, payload))]
pub async fn upload_photo(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePhotoRequest>,
) -> Result<Json<Value>, ApiError> {
    let photo = state
        .store
        .create_photo(payload.into())
        .await
        .map_err(|e| ApiError::internal("Failed to upload photo", format!("{e:#}")))?;

    info!(photo_id = photo.id, user_id = photo.user_id, "photo uploaded");
    Ok(message("Photo uploaded successfully"))
}

#[instrument(skip(state))]
pub async fn get_photos(State(state): State<AppState>) -> Result<Json<Vec<Photo>>, ApiError> {
    let photos = state
        .store
        .list_photos()
        .await
        .map_err(|e| ApiError::internal("Failed to retrieve photo", format!("{e:#}")))?;
    debug!(count = photos.len(), "photos listed");
    Ok(Json(photos))
}

#[instrument(skip(state, payload))]
pub async fn update_photo(
    State(state): State<AppState>,
    AppPath(photo_id): AppPath<i64>,
    AppJson(payload): AppJson<UpdatePhotoRequest>,
) -> Result<Json<Value>, ApiError> {
    let rows = state
        .store
        .update_photo(photo_id, payload.into())
        .await
        .map_err(|e| ApiError::internal("Failed to update photo", format!("{e:#}")))?;

    debug!(photo_id, rows, "photo update applied");
    Ok(message("Photo updated successfully"))
}

#[instrument(skip(state))]
pub async fn delete_photo(
    State(state): State<AppState>,
    AppPath(photo_id): AppPath<i64>,
) -> Result<Json<Value>, ApiError> {
    let rows = state
        .store
        .delete_photo(photo_id)
        .await
        .map_err(|e| ApiError::internal("Failed to delete photo", format!("{e:#}")))?;

    debug!(photo_id, rows, "photo soft-deleted");
    Ok(message("Photo deleted successfully"))
}
