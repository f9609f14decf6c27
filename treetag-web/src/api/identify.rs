//! Photo-identification flow
//!
//! A volunteer uploads one photograph; the image is hosted, the species API
//! is asked for candidates, and a not-yet-saved record is seeded with the
//! photo. Choosing a candidate adopts its names and pulls the AI profile,
//! which the browser sends back through `/saveai/:uid` once reviewed.

use axum::extract::{Multipart, Path, State};
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::json;
use treetag_common::model::Location;
use treetag_common::{parse, time};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// `POST /identify`: multipart `volunteerName` + `image`
pub async fn identify(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<serde_json::Value>> {
    let mut volunteer = String::new();
    let mut image: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("volunteerName") => {
                volunteer = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("volunteerName field: {e}")))?;
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

    if volunteer.trim().is_empty() {
        return Err(ApiError::BadRequest("volunteer email is required".into()));
    }
    let (filename, bytes) =
        image.ok_or_else(|| ApiError::BadRequest("image upload failed".into()))?;

    let url = state
        .media
        .upload(bytes.clone(), &filename, "treeqr/identify")
        .await?;
    let suggestions = state.plants.identify(bytes).await?;
    if suggestions.is_empty() {
        return Err(ApiError::NotFound(
            "no results found, try another image".into(),
        ));
    }

    let uid = state
        .trees
        .create_from_identification(volunteer.trim(), &url)
        .await?;

    Ok(Json(json!({
        "uid": uid,
        "suggestions": suggestions,
    })))
}

#[derive(Debug, Deserialize)]
pub struct GetDetailsForm {
    #[serde(default)]
    pub uid: String,
    #[serde(rename = "scientificName", default)]
    pub scientific_name: String,
    #[serde(rename = "commonNames", default)]
    pub common_names: String,
}

/// `POST /getdetails`: adopt the chosen names onto the seeded record and
/// fetch the AI profile text for review
pub async fn get_details(
    State(state): State<AppState>,
    Form(form): Form<GetDetailsForm>,
) -> ApiResult<Json<serde_json::Value>> {
    if form.uid.is_empty() || form.scientific_name.is_empty() || form.common_names.is_empty() {
        return Err(ApiError::BadRequest(
            "uid, scientificName and commonNames are required".into(),
        ));
    }

    state
        .trees
        .update_fields(
            &form.uid,
            &json!({
                "uid": form.uid,
                "Name": form.common_names,
                "botanical": form.scientific_name,
                "Saved": true,
                "QR": true,
            }),
        )
        .await?;

    let response_text = state.botanist.fetch_profile(&form.scientific_name).await?;

    let images = state.trees.images(&form.uid).await?;
    let image_urls: Vec<&str> = images.0.iter().map(|img| img.url.as_str()).collect();

    Ok(Json(json!({
        "uid": form.uid,
        "scientificName": form.scientific_name,
        "responseText": response_text,
        "imageUrls": image_urls,
    })))
}

#[derive(Debug, Deserialize)]
pub struct SaveAiRequest {
    #[serde(rename = "responseText", default)]
    pub response_text: String,
    #[serde(default)]
    pub location: Location,
}

/// `POST /saveai/:uid`: parse the reviewed AI text into structured fields and
/// merge them with the browser-captured location
pub async fn save_ai(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(req): Json<SaveAiRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let profile = parse::parse_profile(&req.response_text);

    state
        .trees
        .update_fields(
            &uid,
            &json!({
                "description": profile.description,
                "medicinalBenefits": profile.medicinal_benefits,
                "environmentalBenefits": profile.environmental_benefits,
                "native": profile.native,
                "category": profile.category,
                "classification": profile.classification,
                "location": req.location,
                "lastUpdated": time::updated_now(),
            }),
        )
        .await?;

    Ok(Json(json!({ "message": "saved" })))
}
