//! treetag-web library - tree-tagging web service
//!
//! Volunteers photograph, geolocate, and classify trees; records live in a
//! remote document store, images on a remote media host, and tree profiles
//! come from an AI text-generation service. This crate wires the HTTP surface
//! to the record lifecycle and the remote-service clients.

use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use treetag_common::config::Config;
use treetag_common::{Error, Result};

pub mod api;
pub mod error;
pub mod record;
pub mod services;

pub use error::{ApiError, ApiResult};

use record::TreeStore;
use services::{Botanist, DocumentStore, Identity, Mailer, MediaStore, PlantId};

/// Application state shared across HTTP handlers.
///
/// Every remote collaborator is an explicitly constructed client owned here
/// and injected into handlers; there is no process-global handle.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Lifecycle operations over the `trees` collection
    pub trees: TreeStore,
    /// Raw document-store access for the `users` collection
    pub users: Arc<DocumentStore>,
    pub media: Arc<MediaStore>,
    pub botanist: Arc<Botanist>,
    pub plants: Arc<PlantId>,
    pub identity: Arc<Identity>,
    pub mailer: Arc<Mailer>,
}

impl AppState {
    /// Build all remote-service clients from the configuration
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Internal(format!("http client: {e}")))?;

        let store = Arc::new(DocumentStore::new(
            http.clone(),
            config.store_url.clone(),
            config.store_auth.clone(),
        ));

        Ok(Self {
            trees: TreeStore::new(store.clone()),
            users: store,
            media: Arc::new(MediaStore::new(http.clone(), config.media.clone())),
            botanist: Arc::new(Botanist::new(
                http.clone(),
                config.ai_url.clone(),
                config.ai_key.clone(),
            )),
            plants: Arc::new(PlantId::new(http.clone(), config.plant_id_key.clone())),
            identity: Arc::new(Identity::new(http, config.identity_key.clone())),
            mailer: Arc::new(Mailer::new(config.smtp.clone())),
            config: Arc::new(config),
        })
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        // HTML shells
        .merge(api::pages::routes())
        .merge(api::health::routes())
        // Tagging workflow
        .route("/generate", get(api::pages::tag).post(api::trees::generate))
        .route(
            "/data_entry",
            get(api::pages::data_entry).post(api::trees::data_entry),
        )
        .route(
            "/classification",
            get(api::pages::classification).post(api::trees::classification),
        )
        .route(
            "/location",
            get(api::pages::location).post(api::trees::location),
        )
        .route("/image", get(api::pages::images).post(api::images::upload))
        .route("/append-image", post(api::images::append_single))
        .route("/delete-image", post(api::images::delete))
        .route("/complete", get(api::trees::complete))
        .route("/publish", post(api::trees::publish))
        .route("/publishsave/:uid", post(api::trees::publish_flag))
        .route("/delete", post(api::trees::delete))
        .route("/delete-drafts", post(api::trees::delete_draft))
        // QR / PDF
        .route("/qr", get(api::qr::qr_png))
        .route("/download-pdf", get(api::qr::qr_pdf))
        .route("/generate-direct/:uid", get(api::qr::generate_direct))
        // Listings
        .route("/api/drafts", get(api::listings::drafts))
        .route("/api/published", get(api::listings::published))
        .route("/api/library", get(api::listings::library))
        .route("/api/list/:category", get(api::listings::by_category))
        .route("/api/treecount", get(api::listings::tree_count))
        .route("/api/tree/:uid", get(api::listings::tree_details))
        // Identification flow
        .route(
            "/identify",
            get(api::pages::identify).post(api::identify::identify),
        )
        .route("/getdetails", post(api::identify::get_details))
        .route("/saveai/:uid", post(api::identify::save_ai))
        // Accounts
        .route("/signup", get(api::pages::sign_up).post(api::auth::signup))
        .route("/signin", get(api::pages::sign_in).post(api::auth::signin))
        .route("/change-password", post(api::auth::change_password))
        // Record moderation
        .route("/admin", get(api::pages::admin_login).post(api::admin::login))
        .route("/api/admin/dashboard", get(api::admin::dashboard))
        .route(
            "/admin/edit/:uid",
            get(api::pages::edit_tree).post(api::admin::edit_tree),
        )
        .route("/admin/delete/:uid", post(api::admin::delete_tree))
        // Volunteer moderation
        .route("/head/pending", get(api::volunteers::pending))
        .route("/head/approve", post(api::volunteers::approve))
        .route("/head/reject", post(api::volunteers::reject))
        .route("/head/verified_list", get(api::volunteers::verified_list))
        .route("/update_volunteer", post(api::volunteers::update_permission))
        .route("/revoke_volunteer", get(api::volunteers::revoke))
        .route("/api/volunteers", get(api::volunteers::all_users))
        .route("/api/updateRole", post(api::volunteers::update_role))
        // Feedback
        .route("/report", post(api::report::submit))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
