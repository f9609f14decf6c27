//! HTML shells for each screen
//!
//! Pages are static shells compiled into the binary; anything dynamic is
//! fetched from the JSON endpoints by a few lines of inline script.

use axum::{response::Html, routing::get, Router};

use crate::AppState;

const HOME: &str = include_str!("../ui/home.html");
const TAG: &str = include_str!("../ui/tag.html");
const DATA_ENTRY: &str = include_str!("../ui/data_entry.html");
const CLASSIFICATION: &str = include_str!("../ui/classification.html");
const LOCATION: &str = include_str!("../ui/location.html");
const IMAGES: &str = include_str!("../ui/images.html");
const DRAFTS: &str = include_str!("../ui/drafts.html");
const QR_DISPLAY: &str = include_str!("../ui/qr_display.html");
const LIBRARY: &str = include_str!("../ui/library.html");
const SETTINGS: &str = include_str!("../ui/settings.html");
const HEAD_DASHBOARD: &str = include_str!("../ui/head_dashboard.html");
const SIGN_IN: &str = include_str!("../ui/sign.html");
const SIGN_UP: &str = include_str!("../ui/signup.html");
const IDENTIFY: &str = include_str!("../ui/identify.html");
const TREE_VIEW: &str = include_str!("../ui/tree_view.html");
const ADMIN_LOGIN: &str = include_str!("../ui/admin_login.html");
const ADMIN_DASHBOARD: &str = include_str!("../ui/admin_dashboard.html");
const EDIT_TREE: &str = include_str!("../ui/edit_tree.html");

pub async fn home() -> Html<&'static str> {
    Html(HOME)
}

pub async fn tag() -> Html<&'static str> {
    Html(TAG)
}

pub async fn data_entry() -> Html<&'static str> {
    Html(DATA_ENTRY)
}

pub async fn classification() -> Html<&'static str> {
    Html(CLASSIFICATION)
}

pub async fn location() -> Html<&'static str> {
    Html(LOCATION)
}

pub async fn images() -> Html<&'static str> {
    Html(IMAGES)
}

pub async fn drafts() -> Html<&'static str> {
    Html(DRAFTS)
}

pub async fn qr_display() -> Html<&'static str> {
    Html(QR_DISPLAY)
}

pub async fn library() -> Html<&'static str> {
    Html(LIBRARY)
}

pub async fn settings() -> Html<&'static str> {
    Html(SETTINGS)
}

pub async fn head_dashboard() -> Html<&'static str> {
    Html(HEAD_DASHBOARD)
}

pub async fn sign_in() -> Html<&'static str> {
    Html(SIGN_IN)
}

pub async fn sign_up() -> Html<&'static str> {
    Html(SIGN_UP)
}

pub async fn identify() -> Html<&'static str> {
    Html(IDENTIFY)
}

/// Public page behind a printed QR code
pub async fn tree_view() -> Html<&'static str> {
    Html(TREE_VIEW)
}

pub async fn admin_login() -> Html<&'static str> {
    Html(ADMIN_LOGIN)
}

pub async fn admin_dashboard() -> Html<&'static str> {
    Html(ADMIN_DASHBOARD)
}

pub async fn edit_tree() -> Html<&'static str> {
    Html(EDIT_TREE)
}

/// Shell-only routes; paths that also take a POST are wired in `build_router`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/home", get(home))
        .route("/drafts", get(drafts))
        .route("/qr-display", get(qr_display))
        .route("/library", get(library))
        .route("/settings", get(settings))
        .route("/head_dashboard", get(head_dashboard))
        .route("/get-event", get(tree_view))
        .route("/admin/dashboard", get(admin_dashboard))
}
