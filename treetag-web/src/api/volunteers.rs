//! Volunteer moderation and administration
//!
//! New accounts sit unverified until a head approves them. Approval,
//! rejection and permission windows are all keyed by email over the
//! `users` collection; roles are keyed by uid.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::info;
use treetag_common::model::UserProfile;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

async fn all_profiles(state: &AppState) -> ApiResult<BTreeMap<String, UserProfile>> {
    Ok(state
        .users
        .get::<BTreeMap<String, UserProfile>>("users")
        .await?
        .unwrap_or_default())
}

fn find_by_email(
    profiles: &BTreeMap<String, UserProfile>,
    email: &str,
) -> ApiResult<(String, UserProfile)> {
    profiles
        .iter()
        .find(|(_, p)| p.email.eq_ignore_ascii_case(email))
        .map(|(uid, p)| (uid.clone(), p.clone()))
        .ok_or_else(|| ApiError::NotFound("volunteer not found".into()))
}

/// `GET /head/pending` lists accounts awaiting verification
pub async fn pending(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let profiles = all_profiles(&state).await?;
    let rows: Vec<_> = profiles
        .values()
        .filter(|p| !p.verified)
        .map(|p| json!({ "email": p.email, "timestamp": p.timestamp }))
        .collect();
    Ok(Json(json!(rows)))
}

#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    #[serde(default)]
    pub email: String,
    #[serde(rename = "approvedBy", default)]
    pub approved_by: String,
}

/// `POST /head/approve` flips `verified` and records the audit fields
pub async fn approve(
    State(state): State<AppState>,
    Json(req): Json<ApproveRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if req.email.is_empty() {
        return Err(ApiError::BadRequest("email is required".into()));
    }
    let profiles = all_profiles(&state).await?;
    let (uid, _) = find_by_email(&profiles, &req.email)?;

    state
        .users
        .update(
            &format!("users/{uid}"),
            &json!({
                "verified": true,
                "approvedBy": req.approved_by,
                "approvedAt": chrono::Utc::now().to_rfc3339(),
            }),
        )
        .await?;
    info!("volunteer approved: {}", req.email);

    Ok(Json(json!({ "status": "approved", "email": req.email })))
}

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    #[serde(default)]
    pub email: String,
}

/// `POST /head/reject` removes the pending profile entirely
pub async fn reject(
    State(state): State<AppState>,
    Json(req): Json<EmailRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if req.email.is_empty() {
        return Err(ApiError::BadRequest("email is required".into()));
    }
    let profiles = all_profiles(&state).await?;
    let (uid, _) = find_by_email(&profiles, &req.email)?;

    state.users.delete(&format!("users/{uid}")).await?;
    info!("volunteer rejected: {}", req.email);

    Ok(Json(json!({ "status": "rejected", "email": req.email })))
}

/// `GET /head/verified_list` lists verified volunteers with audit fields
pub async fn verified_list(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let profiles = all_profiles(&state).await?;
    let rows: Vec<_> = profiles
        .values()
        .filter(|p| p.verified)
        .map(|p| {
            json!({
                "email": p.email,
                "approved_by": p.approved_by,
                "approved_at": p.approved_at,
                "start_time": p.start_time,
                "end_time": p.end_time,
                "permanent": p.permanent,
            })
        })
        .collect();
    Ok(Json(json!(rows)))
}

#[derive(Debug, Deserialize)]
pub struct PermissionRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub permanent: bool,
}

/// `POST /update_volunteer` sets a volunteer's working window
pub async fn update_permission(
    State(state): State<AppState>,
    Json(req): Json<PermissionRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if req.email.is_empty() {
        return Err(ApiError::BadRequest("email is required".into()));
    }
    let profiles = all_profiles(&state).await?;
    let (uid, _) = find_by_email(&profiles, &req.email)?;

    state
        .users
        .update(
            &format!("users/{uid}"),
            &json!({
                "start_time": req.start_time,
                "end_time": req.end_time,
                "permanent": req.permanent,
            }),
        )
        .await?;

    Ok(Json(json!({ "message": "volunteer updated" })))
}

/// `GET /revoke_volunteer?email=` clears the working window
pub async fn revoke(
    State(state): State<AppState>,
    Query(req): Query<EmailRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if req.email.is_empty() {
        return Err(ApiError::BadRequest("missing email".into()));
    }
    let profiles = all_profiles(&state).await?;
    let (uid, _) = find_by_email(&profiles, &req.email)?;

    state
        .users
        .update(
            &format!("users/{uid}"),
            &json!({
                "start_time": "",
                "end_time": "",
                "permanent": false,
            }),
        )
        .await?;

    Ok(Json(json!({ "message": "permission revoked" })))
}

/// `GET /api/volunteers` returns the raw profile map for the admin table
pub async fn all_users(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let raw: serde_json::Value = state
        .users
        .get("users")
        .await?
        .unwrap_or_else(|| json!({}));
    Ok(Json(raw))
}

#[derive(Debug, Deserialize)]
pub struct UidQuery {
    #[serde(default)]
    pub uid: String,
}

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    #[serde(default)]
    pub role: String,
}

/// `POST /api/updateRole?uid=` sets the profile's role field
pub async fn update_role(
    State(state): State<AppState>,
    Query(q): Query<UidQuery>,
    Json(req): Json<RoleRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if q.uid.is_empty() {
        return Err(ApiError::BadRequest("uid is required".into()));
    }
    if req.role.is_empty() {
        return Err(ApiError::BadRequest("role is required".into()));
    }

    state
        .users
        .set(&format!("users/{}/role", q.uid), &req.role)
        .await?;
    info!("role for {} set to {}", q.uid, req.role);

    Ok(Json(json!({ "message": "role updated" })))
}
