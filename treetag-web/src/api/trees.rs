//! Tagging-workflow handlers
//!
//! The browser walks a record through create, data entry, classification,
//! location, images, review, publish. Each POST merges one slice of the
//! record and 303-redirects to the next screen; the record itself never
//! gates the order.

use axum::extract::{Path, Query, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json, RequestExt};
use serde::Deserialize;
use serde_json::json;
use treetag_common::{slug, time};

use crate::error::{ApiError, ApiResult};
use crate::services::media;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RecordKey {
    pub id: String,
}

#[derive(Debug, Deserialize)]
struct GenerateForm {
    #[serde(rename = "treeName", default)]
    tree_name: String,
    #[serde(rename = "volunteerName", default)]
    volunteer_name: String,
}

#[derive(Debug, Deserialize)]
struct GenerateJson {
    #[serde(default)]
    name: String,
    #[serde(default)]
    uid: String,
}

/// `POST /generate`.
///
/// Form mode creates a new record from the tagging form. JSON mode
/// (`{name, uid}`) re-slugs the public ID of an existing record; this is a
/// merge into the record, never a whole-document overwrite.
pub async fn generate(State(state): State<AppState>, req: Request) -> ApiResult<Response> {
    let is_json = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));

    if is_json {
        let Json(payload) = req
            .extract::<Json<GenerateJson>, _>()
            .await
            .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {e}")))?;
        let name = payload.name.trim();
        let uid = payload.uid.trim();
        if name.is_empty() {
            return Err(ApiError::BadRequest("tree name is required".into()));
        }
        if uid.is_empty() {
            return Err(ApiError::BadRequest("uid is required".into()));
        }
        state.trees.fetch_required(uid).await?;
        state
            .trees
            .update_fields(uid, &json!({ "ID": slug::slugify(name) }))
            .await?;
        return Ok(Json(json!({ "message": "tree ID stored" })).into_response());
    }

    let Form(form) = req
        .extract::<Form<GenerateForm>, _>()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid form body: {e}")))?;
    let name = form.tree_name.trim();
    let volunteer = form.volunteer_name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("tree name is required".into()));
    }
    if volunteer.is_empty() {
        return Err(ApiError::BadRequest("volunteer email is required".into()));
    }

    let (uid, timestamp) = state.trees.create(name, volunteer).await?;
    Ok(Json(json!({
        "uid": uid,
        "name": name,
        "timestamp": timestamp,
    }))
    .into_response())
}

#[derive(Debug, Deserialize)]
pub struct DataEntryForm {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    botanical: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    native: String,
    #[serde(default)]
    medbenefits: String,
    #[serde(default)]
    envibenefits: String,
}

/// `POST /data_entry` merges the free-text fields and moves on
pub async fn data_entry(
    State(state): State<AppState>,
    Form(form): Form<DataEntryForm>,
) -> ApiResult<Redirect> {
    if form.id.is_empty() {
        return Err(ApiError::BadRequest("missing tree ID".into()));
    }
    state.trees.fetch_required(&form.id).await?;
    state
        .trees
        .update_fields(
            &form.id,
            &json!({
                "Name": form.name,
                "botanical": form.botanical,
                "description": form.description,
                "category": form.category,
                "native": form.native,
                "medicinalBenefits": form.medbenefits,
                "environmentalBenefits": form.envibenefits,
                "Saved": true,
                "lastUpdated": time::updated_now(),
            }),
        )
        .await?;
    Ok(Redirect::to(&format!("/classification?id={}", form.id)))
}

#[derive(Debug, Deserialize)]
pub struct ClassificationForm {
    #[serde(default)]
    id: String,
    #[serde(default)]
    kingdom: String,
    #[serde(default)]
    phylum: String,
    #[serde(default)]
    class: String,
    #[serde(default)]
    order: String,
    #[serde(default)]
    family: String,
    #[serde(default)]
    genus: String,
    #[serde(default)]
    species: String,
}

/// `POST /classification` sets the taxonomy sub-map
pub async fn classification(
    State(state): State<AppState>,
    Form(form): Form<ClassificationForm>,
) -> ApiResult<Redirect> {
    if form.id.is_empty() {
        return Err(ApiError::BadRequest("missing tree ID".into()));
    }
    state
        .trees
        .update_fields(
            &form.id,
            &json!({
                "classification": {
                    "kingdom": form.kingdom,
                    "phylum": form.phylum,
                    "class": form.class,
                    "order": form.order,
                    "family": form.family,
                    "genus": form.genus,
                    "species": form.species,
                },
            }),
        )
        .await?;
    Ok(Redirect::to(&format!("/location?id={}", form.id)))
}

#[derive(Debug, Deserialize)]
pub struct LocationForm {
    #[serde(default)]
    id: String,
    #[serde(default)]
    coordinates: String,
    #[serde(default)]
    site: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    city: String,
}

/// `POST /location` sets the geolocation sub-map
pub async fn location(
    State(state): State<AppState>,
    Form(form): Form<LocationForm>,
) -> ApiResult<Redirect> {
    if form.id.is_empty() {
        return Err(ApiError::BadRequest("missing tree ID".into()));
    }
    state
        .trees
        .update_fields(
            &form.id,
            &json!({
                "location": {
                    "coordinates": form.coordinates,
                    "site": form.site,
                    "address": form.address,
                    "city": form.city,
                },
            }),
        )
        .await?;
    Ok(Redirect::to(&format!("/image?id={}", form.id)))
}

/// `GET /complete?id=` returns the whole record for final review
pub async fn complete(
    State(state): State<AppState>,
    Query(key): Query<RecordKey>,
) -> ApiResult<Json<treetag_common::model::TreeRecord>> {
    let mut record = state.trees.fetch_required(&key.id).await?;
    record.medicinal_benefits = record.medicinal_benefits.trim().to_string();
    record.environmental_benefits = record.environmental_benefits.trim().to_string();
    Ok(Json(record))
}

#[derive(Debug, Deserialize)]
pub struct PublishForm {
    #[serde(default)]
    uid: String,
}

/// `POST /publish` assigns the public ID when missing and flips the flag
pub async fn publish(
    State(state): State<AppState>,
    Form(form): Form<PublishForm>,
) -> ApiResult<Redirect> {
    if form.uid.is_empty() {
        return Err(ApiError::BadRequest("missing UID".into()));
    }
    state.trees.publish(&form.uid).await?;
    Ok(Redirect::to("/home"))
}

/// `POST /publishsave/:uid` is the JSON flag-only publish used by the
/// identification flow; the public ID is assigned at QR time instead
pub async fn publish_flag(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    state.trees.fetch_required(&uid).await?;
    state.trees.mark_published(&uid).await?;
    Ok(Json(json!({ "message": "tree published" })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    id: String,
    #[serde(default)]
    uid: String,
    #[serde(default)]
    email: String,
}

/// `POST /delete` removes a published record and its hosted images, then
/// returns to the QR listing
pub async fn delete(
    State(state): State<AppState>,
    Form(form): Form<DeleteForm>,
) -> ApiResult<Redirect> {
    let key = pick_key(&form)?;
    destroy_record(&state, &key).await?;
    Ok(Redirect::to(&format!("/qr-display?email={}", form.email)))
}

/// `POST /delete-drafts` abandons a draft, then returns to the draft listing
pub async fn delete_draft(
    State(state): State<AppState>,
    Form(form): Form<DeleteForm>,
) -> ApiResult<Redirect> {
    let key = pick_key(&form)?;
    destroy_record(&state, &key).await?;
    Ok(Redirect::to(&format!("/drafts?email={}", form.email)))
}

fn pick_key(form: &DeleteForm) -> ApiResult<String> {
    let key = if !form.uid.is_empty() { &form.uid } else { &form.id };
    if key.is_empty() {
        return Err(ApiError::BadRequest("missing tree ID".into()));
    }
    Ok(key.clone())
}

/// Delete the record and best-effort destroy its hosted images. A media-host
/// failure is logged but does not resurrect the record.
pub(crate) async fn destroy_record(state: &AppState, key: &str) -> ApiResult<()> {
    let images = state.trees.images(key).await?;
    state.trees.delete(key).await?;
    for img in &images.0 {
        if let Some(public_id) = media::public_id_from_url(&img.url) {
            if let Err(e) = state.media.destroy(&public_id).await {
                tracing::warn!("orphaned media asset {public_id}: {e}");
            }
        }
    }
    Ok(())
}
