//! Image upload and removal
//!
//! Uploads go to the media host first; the record's image list is then
//! rewritten whole, which keeps the stored shape a dense array. The 4-image
//! bound is checked before any bytes leave the server.

use axum::extract::{Multipart, Query, State};
use axum::response::Redirect;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use treetag_common::model::ImageEntry;

use crate::api::trees::RecordKey;
use crate::error::{ApiError, ApiResult};
use crate::services::media;
use crate::AppState;

/// `POST /image?id=` takes multipart `imageType` plus one or more `images`
/// files, bounded to 4 total per record
pub async fn upload(
    State(state): State<AppState>,
    Query(key): Query<RecordKey>,
    mut multipart: Multipart,
) -> ApiResult<Redirect> {
    let mut image_type = String::new();
    let mut files: Vec<(String, Vec<u8>)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("imageType") => {
                image_type = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("imageType field: {e}")))?;
            }
            Some("images") => {
                let filename = field.file_name().unwrap_or("upload.jpg").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("image data: {e}")))?;
                files.push((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    if image_type.is_empty() {
        return Err(ApiError::BadRequest("missing image type".into()));
    }
    if files.is_empty() {
        return Err(ApiError::BadRequest("no images selected".into()));
    }

    // Bound check before the first upload, so a doomed batch never reaches
    // the media host; append_images re-verifies against the stored list
    let current = state.trees.images(&key.id).await?;
    let remaining = current.remaining_slots();
    if remaining == 0 {
        return Err(ApiError::BadRequest(
            "maximum of 4 images already uploaded".into(),
        ));
    }
    if files.len() > remaining {
        return Err(ApiError::BadRequest(format!(
            "only {remaining} more image(s) can be uploaded"
        )));
    }

    let folder = format!("treeqr/{}", key.id);
    let mut incoming = Vec::with_capacity(files.len());
    for (filename, bytes) in files {
        let url = state.media.upload(bytes, &filename, &folder).await?;
        incoming.push(ImageEntry {
            url,
            image_type: image_type.clone(),
        });
    }

    state.trees.append_images(&key.id, incoming).await?;
    Ok(Redirect::to(&format!("/image?id={}", key.id)))
}

/// `POST /append-image` attaches one photograph from the identification flow
/// (multipart `uid` + `image`), typed as a whole-tree shot
pub async fn append_single(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<serde_json::Value>> {
    let mut uid = String::new();
    let mut image: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("uid") => {
                uid = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("uid field: {e}")))?;
            }
            Some("image") => {
                let filename = field.file_name().unwrap_or("upload.jpg").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("image data: {e}")))?;
                image = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    if uid.is_empty() {
        return Err(ApiError::BadRequest("uid is required".into()));
    }
    let (filename, bytes) =
        image.ok_or_else(|| ApiError::BadRequest("image upload failed".into()))?;

    let current = state.trees.images(&uid).await?;
    if current.remaining_slots() == 0 {
        return Err(ApiError::BadRequest("only 4 images allowed".into()));
    }

    let folder = format!("treeqr/{uid}");
    let url = state.media.upload(bytes, &filename, &folder).await?;
    let list = state
        .trees
        .append_images(
            &uid,
            vec![ImageEntry {
                url: url.clone(),
                image_type: "tree".into(),
            }],
        )
        .await?;

    Ok(Json(json!({ "url": url, "count": list.len() })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteImageRequest {
    pub uid: String,
    pub url: String,
}

/// `POST /delete-image` with JSON `{uid, url}`: reconcile the entry out of
/// the stored list, then destroy the hosted asset
pub async fn delete(
    State(state): State<AppState>,
    Json(req): Json<DeleteImageRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if req.uid.is_empty() || req.url.is_empty() {
        return Err(ApiError::BadRequest("uid and url are required".into()));
    }

    let remaining = state.trees.delete_image(&req.uid, &req.url).await?;

    if let Some(public_id) = media::public_id_from_url(&req.url) {
        state.media.destroy(&public_id).await?;
    }

    Ok(Json(json!({
        "message": "image deleted",
        "count": remaining.len(),
    })))
}
