//! Feedback report endpoint

use axum::extract::{Multipart, State};
use axum::Json;
use serde_json::json;

use crate::error::{ApiError, ApiResult};
use crate::services::mailer::Report;
use crate::AppState;

/// `POST /report`: multipart feedback form with an optional screenshot,
/// forwarded to the configured recipients by email
pub async fn submit(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<serde_json::Value>> {
    let mut report = Report {
        comment: String::new(),
        clarity: String::new(),
        helpful: String::new(),
        unsafe_flag: String::new(),
        screenshot: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("comment") => report.comment = text(field).await?,
            Some("clarity") => report.clarity = text(field).await?,
            Some("helpful") => report.helpful = text(field).await?,
            Some("unsafe") => report.unsafe_flag = text(field).await?,
            Some("screenshot") => {
                let filename = field.file_name().unwrap_or("screenshot.png").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("screenshot data: {e}")))?;
                if !bytes.is_empty() {
                    report.screenshot = Some((filename, bytes.to_vec()));
                }
            }
            _ => {}
        }
    }

    if report.comment.is_empty() {
        return Err(ApiError::BadRequest("comment is required".into()));
    }

    state.mailer.send_report(report).await?;
    Ok(Json(json!({ "message": "report sent" })))
}

async fn text(field: axum::extract::multipart::Field<'_>) -> ApiResult<String> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("form field: {e}")))
}
