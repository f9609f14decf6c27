//! JSON listings over the tree collection
//!
//! Every listing is a full-collection fetch filtered in memory; the store
//! offers no server-side queries. Filters are the visibility predicates on
//! the record model, so drafts and published listings can never overlap.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeSet;
use treetag_common::model::TreeRecord;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    #[serde(default)]
    pub email: String,
}

fn require_email(q: &EmailQuery) -> ApiResult<&str> {
    let email = q.email.trim();
    if email.is_empty() {
        return Err(ApiError::BadRequest("missing email parameter".into()));
    }
    Ok(email)
}

/// `GET /api/drafts?email=` lists a volunteer's unpublished records
pub async fn drafts(
    State(state): State<AppState>,
    Query(q): Query<EmailQuery>,
) -> ApiResult<Json<Vec<TreeRecord>>> {
    let email = require_email(&q)?;
    let all = state.trees.fetch_all().await?;
    Ok(Json(
        all.into_values().filter(|t| t.is_draft_for(email)).collect(),
    ))
}

/// `GET /api/published?email=` lists a volunteer's published records
pub async fn published(
    State(state): State<AppState>,
    Query(q): Query<EmailQuery>,
) -> ApiResult<Json<Vec<TreeRecord>>> {
    let email = require_email(&q)?;
    let all = state.trees.fetch_all().await?;
    Ok(Json(
        all.into_values()
            .filter(|t| t.is_published_for(email))
            .collect(),
    ))
}

/// `GET /api/library` lists published records; with `?email=` only the
/// volunteer's own, with descriptions cut to the first sentence for the
/// card view
pub async fn library(
    State(state): State<AppState>,
    Query(q): Query<EmailQuery>,
) -> ApiResult<Json<Vec<TreeRecord>>> {
    let email = q.email.trim();
    let all = state.trees.fetch_all().await?;
    let mut out: Vec<TreeRecord> = all
        .into_values()
        .filter(|t| {
            if email.is_empty() {
                t.published
            } else {
                t.saved && t.is_published_for(email)
            }
        })
        .collect();
    for tree in &mut out {
        tree.description = first_sentence(&tree.description);
    }
    Ok(Json(out))
}

fn first_sentence(text: &str) -> String {
    match text.find('.') {
        Some(idx) => text[..=idx].trim().to_string(),
        None => text.to_string(),
    }
}

#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub view: String,
}

/// One taxonomic rank per view; anything unrecognized falls back to family
fn view_kind(raw: &str) -> &'static str {
    match raw {
        "genera" => "genera",
        "species" => "species",
        _ => "family",
    }
}

/// Dedup key for a category listing: the ranked name, trimmed and lowercased.
/// Empty means the record lacks that rank and is dropped from the view.
fn grouping_key(view: &str, c: &treetag_common::model::Classification) -> String {
    let rank = match view {
        "genera" => &c.genus,
        "species" => &c.species,
        _ => &c.family,
    };
    rank.trim().to_lowercase()
}

/// `GET /api/list/:category?view=` lists published records in a category,
/// one per taxonomic family (or genus with `view=genera`, species with
/// `view=species`)
pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(q): Query<ViewQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let category = category.trim().to_string();
    if category.is_empty() {
        return Err(ApiError::BadRequest("missing category".into()));
    }
    let view = view_kind(&q.view);

    let all = state.trees.fetch_all().await?;
    let mut seen = BTreeSet::new();
    let mut trees: Vec<TreeRecord> = Vec::new();
    for tree in all.into_values() {
        if !tree.published {
            continue;
        }
        if !tree.category.trim().eq_ignore_ascii_case(&category) {
            continue;
        }
        let key = grouping_key(view, &tree.classification);
        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        trees.push(tree);
    }

    Ok(Json(json!({
        "category": category,
        "viewType": view,
        "trees": trees,
    })))
}

/// `GET /api/treecount?email=` counts a volunteer's published records
pub async fn tree_count(
    State(state): State<AppState>,
    Query(q): Query<EmailQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let email = require_email(&q)?;
    let all = state.trees.fetch_all().await?;
    let count = all
        .values()
        .filter(|t| t.published && t.volunteer_name.eq_ignore_ascii_case(email))
        .count();
    Ok(Json(json!({ "count": count })))
}

/// `GET /api/tree/:uid` returns one record with its image list normalized
pub async fn tree_details(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> ApiResult<Json<TreeRecord>> {
    let mut record = state.trees.fetch_required(&uid).await?;
    if record.uid.is_empty() {
        record.uid = uid;
    }
    Ok(Json(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use treetag_common::model::Classification;

    #[test]
    fn unknown_view_falls_back_to_family() {
        assert_eq!(view_kind(""), "family");
        assert_eq!(view_kind("bogus"), "family");
        assert_eq!(view_kind("genera"), "genera");
        assert_eq!(view_kind("species"), "species");
    }

    #[test]
    fn each_view_groups_by_its_own_rank() {
        let c = Classification {
            family: "Moraceae".into(),
            genus: "Ficus".into(),
            species: "Ficus benghalensis".into(),
            ..Default::default()
        };
        assert_eq!(grouping_key("family", &c), "moraceae");
        assert_eq!(grouping_key("genera", &c), "ficus");
        assert_eq!(grouping_key("species", &c), "ficus benghalensis");
    }

    #[test]
    fn grouping_key_ignores_case_and_padding() {
        let a = Classification {
            species: "  Azadirachta Indica ".into(),
            ..Default::default()
        };
        let b = Classification {
            species: "azadirachta indica".into(),
            ..Default::default()
        };
        assert_eq!(grouping_key("species", &a), grouping_key("species", &b));
    }

    #[test]
    fn missing_rank_yields_empty_key() {
        let c = Classification::default();
        assert!(grouping_key("species", &c).is_empty());
    }

    #[test]
    fn first_sentence_cuts_at_first_period() {
        assert_eq!(first_sentence("One. Two. Three."), "One.");
        assert_eq!(first_sentence("no period here"), "no period here");
    }
}
