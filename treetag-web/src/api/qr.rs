//! QR code generation
//!
//! The QR payload is always `{public_base_url}/{store_key}`; the public ID
//! only labels the printed tag. PNG for the browser, a printable A4 sheet
//! for the tag itself, and a base64 JSON variant for the publish dialog.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use base64::Engine as _;
use image::Luma;
use printpdf::{
    BuiltinFont, ColorBits, ColorSpace, Image as PdfImage, ImageTransform, ImageXObject, Mm,
    PdfDocument, Px,
};
use qrcode::{EcLevel, QrCode};
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use treetag_common::{Error, Result};

use crate::api::trees::RecordKey;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

const QR_SIZE: u32 = 256;

/// Rendered QR as grayscale pixels plus its PNG encoding
struct RenderedQr {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    png: Vec<u8>,
}

fn render_qr(url: &str) -> Result<RenderedQr> {
    let code = QrCode::with_error_correction_level(url, EcLevel::M)
        .map_err(|e| Error::Internal(format!("QR encode: {e}")))?;
    let buffer = code
        .render::<Luma<u8>>()
        .min_dimensions(QR_SIZE, QR_SIZE)
        .build();

    let (width, height) = buffer.dimensions();
    let mut png = Cursor::new(Vec::new());
    buffer
        .write_to(&mut png, image::ImageFormat::Png)
        .map_err(|e| Error::Internal(format!("QR PNG encode: {e}")))?;

    Ok(RenderedQr {
        width,
        height,
        pixels: buffer.into_raw(),
        png: png.into_inner(),
    })
}

fn qr_url(state: &AppState, uid: &str) -> String {
    format!("{}/{uid}", state.config.public_base_url)
}

/// `GET /qr?id=` returns the record's QR code as a PNG
pub async fn qr_png(
    State(state): State<AppState>,
    Query(key): Query<RecordKey>,
) -> ApiResult<impl IntoResponse> {
    state.trees.fetch_required(&key.id).await?;
    let rendered = render_qr(&qr_url(&state, &key.id))?;
    Ok(([(header::CONTENT_TYPE, "image/png")], rendered.png))
}

#[derive(Debug, Deserialize)]
pub struct PdfQuery {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// `GET /download-pdf?id=&name=` returns a printable A4 sheet: tree name,
/// QR code, scan hint
pub async fn qr_pdf(
    State(state): State<AppState>,
    Query(q): Query<PdfQuery>,
) -> ApiResult<impl IntoResponse> {
    if q.id.is_empty() || q.name.is_empty() {
        return Err(ApiError::BadRequest("missing id or name".into()));
    }

    let rendered = render_qr(&qr_url(&state, &q.id))?;
    let bytes = build_pdf(&q.name, &rendered)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=tree_qr_{}.pdf", q.id),
            ),
        ],
        bytes,
    ))
}

fn build_pdf(name: &str, qr: &RenderedQr) -> Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new("Tree QR", Mm(210.0), Mm(297.0), "qr");
    let layer = doc.get_page(page).get_layer(layer);

    let title_font = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| Error::Internal(format!("PDF font: {e}")))?;
    let body_font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| Error::Internal(format!("PDF font: {e}")))?;

    layer.use_text(name, 16.0, Mm(70.0), Mm(265.0), &title_font);
    layer.use_text("Know the tree. Scan to see!!", 14.0, Mm(65.0), Mm(170.0), &body_font);

    let xobject = ImageXObject {
        width: Px(qr.width as usize),
        height: Px(qr.height as usize),
        color_space: ColorSpace::Greyscale,
        bits_per_component: ColorBits::Bit8,
        interpolate: false,
        image_data: qr.pixels.clone(),
        image_filter: None,
        smask: None,
        clipping_bbox: None,
    };
    // 256 px at 130 dpi is a 50 mm square, centered horizontally
    PdfImage::from(xobject).add_to_layer(
        layer,
        ImageTransform {
            translate_x: Some(Mm(80.0)),
            translate_y: Some(Mm(195.0)),
            dpi: Some(130.0),
            ..Default::default()
        },
    );

    doc.save_to_bytes()
        .map_err(|e| Error::Internal(format!("PDF write: {e}")))
}

/// `GET /generate-direct/:uid` returns the QR inline as base64 JSON,
/// assigning the public ID first when the record does not have one yet
pub async fn generate_direct(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let public_id = state.trees.ensure_public_id(&uid).await?;
    let url = qr_url(&state, &uid);
    let rendered = render_qr(&url)?;

    Ok(Json(json!({
        "publicId": public_id,
        "qrBase64": base64::engine::general_purpose::STANDARD.encode(&rendered.png),
        "qrUrl": url,
        "uid": uid,
    })))
}
