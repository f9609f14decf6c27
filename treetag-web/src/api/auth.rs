//! Account handlers
//!
//! Credentials live with the external identity provider; the store only
//! holds the account profile under `users/{uid}`. Sign-in succeeds once the
//! provider accepts the password AND a moderator has verified the profile.

use axum::extract::State;
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use treetag_common::model::UserProfile;
use treetag_common::time;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// `POST /signup` registers with the provider and writes an unverified
/// profile for the moderation queue
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> ApiResult<Json<serde_json::Value>> {
    if form.email.is_empty() || form.password.is_empty() || form.confirm_password.is_empty() {
        return Err(ApiError::BadRequest("all fields are required".into()));
    }
    if form.password != form.confirm_password {
        return Err(ApiError::BadRequest("passwords do not match".into()));
    }

    let session = state.identity.sign_up(&form.email, &form.password).await?;

    let profile = UserProfile {
        email: session.email.clone(),
        uid: session.uid.clone(),
        verified: false,
        role: "volunteer".into(),
        timestamp: time::created_now(),
        ..Default::default()
    };
    state
        .users
        .set(&format!("users/{}", session.uid), &profile)
        .await?;
    info!("new account pending verification: {}", session.email);

    Ok(Json(json!({ "status": "success" })))
}

#[derive(Debug, Deserialize)]
pub struct SigninForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /signin` authenticates and enforces the `verified` flag
pub async fn signin(
    State(state): State<AppState>,
    Form(form): Form<SigninForm>,
) -> ApiResult<Json<serde_json::Value>> {
    if form.email.is_empty() || form.password.is_empty() {
        return Err(ApiError::BadRequest("email and password required".into()));
    }

    let session = state.identity.sign_in(&form.email, &form.password).await?;

    let profile: Option<UserProfile> = state
        .users
        .get(&format!("users/{}", session.uid))
        .await?;
    match profile {
        Some(p) if p.verified => Ok(Json(json!({
            "status": "success",
            "uid": session.uid,
            "email": session.email,
            "role": p.role,
        }))),
        _ => Err(ApiError::Forbidden("account not verified".into())),
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub email: String,
    #[serde(rename = "currentPassword", default)]
    pub current_password: String,
    #[serde(rename = "newPassword", default)]
    pub new_password: String,
}

/// `POST /change-password` re-authenticates then updates the password
pub async fn change_password(
    State(state): State<AppState>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if req.email.is_empty() || req.current_password.is_empty() || req.new_password.is_empty() {
        return Err(ApiError::BadRequest("all fields are required".into()));
    }

    state
        .identity
        .change_password(&req.email, &req.current_password, &req.new_password)
        .await?;

    Ok(Json(json!({ "message": "password changed" })))
}
