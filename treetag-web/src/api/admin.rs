//! Administrative record moderation
//!
//! Admins see the whole collection at once and can correct or remove
//! published records directly, outside the volunteer workflow. Entry is
//! gated by the identity provider plus the `admin` role on the stored
//! profile; the browser keeps the result client-side like the other sign-in.

use axum::extract::{Path, State};
use axum::response::Redirect;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeSet;
use tracing::info;
use treetag_common::model::UserProfile;
use treetag_common::time;

use crate::api::trees::destroy_record;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /admin` authenticates and requires the `admin` role on the profile
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<AdminLoginRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest("email and password required".into()));
    }

    let session = state.identity.sign_in(&req.email, &req.password).await?;

    let profile: Option<UserProfile> = state
        .users
        .get(&format!("users/{}", session.uid))
        .await?;
    match profile {
        Some(p) if p.role == "admin" => Ok(Json(json!({
            "status": "success",
            "uid": session.uid,
            "email": session.email,
        }))),
        _ => Err(ApiError::Forbidden("admin role required".into())),
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardTree {
    pub uid: String,
    pub name: String,
    pub botanical: String,
    pub family: String,
    pub volunteer: String,
    pub site: String,
    pub published: bool,
    pub timestamp: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    #[serde(rename = "treeCount")]
    pub tree_count: usize,
    #[serde(rename = "volunteerCount")]
    pub volunteer_count: usize,
    #[serde(rename = "siteCount")]
    pub site_count: usize,
    #[serde(rename = "currentTime")]
    pub current_time: String,
    pub trees: Vec<DashboardTree>,
}

/// Split a stored "lat,lng" string into numeric halves; `None` when either
/// half is missing or not a number
pub(crate) fn parse_coordinates(raw: &str) -> Option<(f64, f64)> {
    let (lat, lng) = raw.split_once(',')?;
    Some((lat.trim().parse().ok()?, lng.trim().parse().ok()?))
}

/// `GET /api/admin/dashboard` summarizes the collection for the moderation
/// table and map: counts plus one flattened row per record
pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Json<DashboardSummary>> {
    let all = state.trees.fetch_all().await?;

    let mut volunteers = BTreeSet::new();
    let mut sites = BTreeSet::new();
    let mut trees = Vec::with_capacity(all.len());
    for (key, record) in all {
        if !record.volunteer_name.is_empty() {
            volunteers.insert(record.volunteer_name.to_lowercase());
        }
        let site = record.location.site.trim();
        if !site.is_empty() {
            sites.insert(site.to_lowercase());
        }
        let coords = parse_coordinates(&record.location.coordinates);

        trees.push(DashboardTree {
            uid: key,
            name: if record.name.is_empty() {
                "Unknown".into()
            } else {
                record.name
            },
            botanical: record.botanical,
            family: record.classification.family,
            volunteer: record.volunteer_name,
            site: record.location.site,
            published: record.published,
            timestamp: record.timestamp,
            image_url: record
                .images
                .0
                .first()
                .map(|i| i.url.clone())
                .unwrap_or_default(),
            lat: coords.map(|c| c.0),
            lng: coords.map(|c| c.1),
        });
    }

    Ok(Json(DashboardSummary {
        tree_count: trees.len(),
        volunteer_count: volunteers.len(),
        site_count: sites.len(),
        current_time: time::updated_now(),
        trees,
    }))
}

#[derive(Debug, Deserialize)]
pub struct EditTreeForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub botanical: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub medicinal: String,
    #[serde(default)]
    pub site: String,
}

/// `POST /admin/edit/:uid` corrects a record in place. The site goes through
/// the location sub-map merge so its sibling fields survive.
pub async fn edit_tree(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Form(form): Form<EditTreeForm>,
) -> ApiResult<Redirect> {
    state.trees.fetch_required(&uid).await?;
    state
        .trees
        .update_fields(
            &uid,
            &json!({
                "Name": form.name,
                "botanical": form.botanical,
                "category": form.category,
                "description": form.description,
                "medicinalBenefits": form.medicinal,
            }),
        )
        .await?;
    state
        .trees
        .update_location(&uid, &json!({ "site": form.site }))
        .await?;
    info!("admin edited tree {uid}");
    Ok(Redirect::to("/admin/dashboard"))
}

/// `POST /admin/delete/:uid` removes a record and its hosted images
pub async fn delete_tree(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> ApiResult<Redirect> {
    destroy_record(&state, &uid).await?;
    info!("admin deleted tree {uid}");
    Ok(Redirect::to("/admin/dashboard"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_split_into_numeric_halves() {
        assert_eq!(parse_coordinates("18.52,73.85"), Some((18.52, 73.85)));
        assert_eq!(parse_coordinates(" 18.52 , 73.85 "), Some((18.52, 73.85)));
    }

    #[test]
    fn malformed_coordinates_are_none() {
        assert_eq!(parse_coordinates(""), None);
        assert_eq!(parse_coordinates("18.52"), None);
        assert_eq!(parse_coordinates("north,east"), None);
        assert_eq!(parse_coordinates("18.52,"), None);
    }
}
