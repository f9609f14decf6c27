//! Tree-record lifecycle
//!
//! A record moves through created, classified, located, imaged, completed and
//! finally draft or published. Nothing gates the order; every step is a
//! partial update to the same `trees/{key}` path and last write wins. What
//! this module does own is the invariants each step must keep: the 4-image
//! bound, whole-list rewrites for image mutations, and the lazily assigned
//! public ID that is never regenerated once present.

use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};
use treetag_common::model::{ImageEntry, ImageList, TreeRecord, MAX_IMAGES};
use treetag_common::{slug, time, Error, Result};
use uuid::Uuid;

use crate::services::DocumentStore;

/// How many candidate public IDs to try before giving up; the suffix space is
/// 10^4 so collisions past the first retry mean something is very wrong
const PUBLIC_ID_ATTEMPTS: usize = 8;

/// Merge a fresh batch of uploads into the current image list.
///
/// Rejects the whole batch when it would push the record past [`MAX_IMAGES`];
/// the stored list is left untouched in that case. Returns the full list the
/// caller must write back (single overwrite, not an append, so the rewrite
/// also normalizes a map-shaped stored list back to a dense array).
pub fn reconcile_append(current: &ImageList, incoming: Vec<ImageEntry>) -> Result<ImageList> {
    if incoming.is_empty() {
        return Err(Error::InvalidInput("no images supplied".into()));
    }
    let remaining = current.remaining_slots();
    if remaining == 0 {
        return Err(Error::InvalidInput(format!(
            "maximum of {MAX_IMAGES} images already uploaded"
        )));
    }
    if incoming.len() > remaining {
        return Err(Error::InvalidInput(format!(
            "only {remaining} more image(s) can be uploaded"
        )));
    }

    let mut merged = current.clone();
    merged.0.extend(incoming);
    Ok(merged)
}

/// Remove the first entry matching `url` exactly, keeping the relative order
/// of everything else. `NotFound` when no entry matches.
pub fn reconcile_remove(current: &ImageList, url: &str) -> Result<ImageList> {
    let position = current
        .0
        .iter()
        .position(|img| img.url == url)
        .ok_or_else(|| Error::NotFound("image not found".into()))?;

    let mut filtered = current.clone();
    filtered.0.remove(position);
    Ok(filtered)
}

/// Outcome of [`resolve_public_id`]: either the ID the record already
/// carries, or a freshly chosen one the caller must persist.
#[derive(Debug, PartialEq)]
pub enum PublicId {
    Existing(String),
    Assigned(String),
}

/// Decide the public ID for a record.
///
/// A present ID is returned as-is; the candidate generator is never invoked
/// for it. Otherwise candidates are drawn from `candidate(name)` until one is
/// not in `taken`, up to [`PUBLIC_ID_ATTEMPTS`] tries.
pub fn resolve_public_id<F>(
    record: &TreeRecord,
    taken: &[String],
    mut candidate: F,
) -> Result<PublicId>
where
    F: FnMut(&str) -> String,
{
    if !record.public_id.is_empty() {
        return Ok(PublicId::Existing(record.public_id.clone()));
    }
    let name = record.name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput(
            "tree name is required to generate a public ID".into(),
        ));
    }

    for _ in 0..PUBLIC_ID_ATTEMPTS {
        let id = candidate(name);
        if !taken.contains(&id) {
            return Ok(PublicId::Assigned(id));
        }
        warn!("public ID collision on {id}, regenerating");
    }
    Err(Error::Internal(format!(
        "could not find a free public ID in {PUBLIC_ID_ATTEMPTS} attempts"
    )))
}

/// Lifecycle operations over the `trees` collection
#[derive(Clone)]
pub struct TreeStore {
    store: Arc<DocumentStore>,
}

impl TreeStore {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    fn path(key: &str) -> String {
        format!("trees/{key}")
    }

    fn images_path(key: &str) -> String {
        format!("trees/{key}/images")
    }

    /// Create a fresh record from the tagging form. Returns the store key and
    /// the creation timestamp.
    pub async fn create(&self, name: &str, volunteer: &str) -> Result<(String, String)> {
        let key = Uuid::new_v4().to_string();
        let timestamp = time::created_now();
        let record = json!({
            "Name": name,
            "Published": false,
            "QR": true,
            "Saved": true,
            "botanical": "",
            "timestamp": timestamp,
            "uid": key,
            "volunteerName": volunteer,
        });
        self.store.set(&Self::path(&key), &record).await?;
        info!("created tree record {key} ({name})");
        Ok((key, timestamp))
    }

    /// Seed a record from the identification flow: unnamed, unsaved, with the
    /// first photograph already attached.
    pub async fn create_from_identification(
        &self,
        volunteer: &str,
        image_url: &str,
    ) -> Result<String> {
        let key = Uuid::new_v4().to_string();
        let record = json!({
            "uid": key,
            "volunteerName": volunteer,
            "Saved": false,
            "Published": false,
            "QR": false,
            "timestamp": time::created_now(),
            "images": [{"imageType": "tree", "url": image_url}],
        });
        self.store.set(&Self::path(&key), &record).await?;
        info!("seeded identification record {key}");
        Ok(key)
    }

    pub async fn fetch(&self, key: &str) -> Result<Option<TreeRecord>> {
        self.store.get(&Self::path(key)).await
    }

    /// Fetch a record or fail with `NotFound`
    pub async fn fetch_required(&self, key: &str) -> Result<TreeRecord> {
        self.fetch(key)
            .await?
            .ok_or_else(|| Error::NotFound(format!("tree {key}")))
    }

    /// The whole collection keyed by store key; `uid` is backfilled from the
    /// key for records created before it was mirrored into the document
    pub async fn fetch_all(&self) -> Result<BTreeMap<String, TreeRecord>> {
        let mut all: BTreeMap<String, TreeRecord> =
            self.store.get("trees").await?.unwrap_or_default();
        for (key, record) in all.iter_mut() {
            if record.uid.is_empty() {
                record.uid = key.clone();
            }
        }
        Ok(all)
    }

    /// Merge a partial field map into the record
    pub async fn update_fields(&self, key: &str, partial: &Value) -> Result<()> {
        self.store.update(&Self::path(key), partial).await
    }

    /// Merge fields into the location sub-map without touching its siblings
    pub async fn update_location(&self, key: &str, partial: &Value) -> Result<()> {
        let path = format!("{}/location", Self::path(key));
        self.store.update(&path, partial).await
    }

    /// Current image list, tolerating absent as empty and either stored shape
    pub async fn images(&self, key: &str) -> Result<ImageList> {
        Ok(self
            .store
            .get(&Self::images_path(key))
            .await?
            .unwrap_or_default())
    }

    /// Append uploads, enforcing the 4-image bound; returns the new list
    pub async fn append_images(&self, key: &str, incoming: Vec<ImageEntry>) -> Result<ImageList> {
        let current = self.images(key).await?;
        let merged = reconcile_append(&current, incoming)?;
        self.store.set(&Self::images_path(key), &merged).await?;
        Ok(merged)
    }

    /// Remove one image by exact URL; `NotFound` when absent
    pub async fn delete_image(&self, key: &str, url: &str) -> Result<ImageList> {
        let current = self.images(key).await?;
        let filtered = reconcile_remove(&current, url)?;
        self.store.set(&Self::images_path(key), &filtered).await?;
        Ok(filtered)
    }

    /// Assign the public ID if absent and return it. A present ID is never
    /// regenerated. Candidates are checked against every stored record's
    /// public ID and regenerated on collision.
    pub async fn ensure_public_id(&self, key: &str) -> Result<String> {
        let record = self.fetch_required(key).await?;

        // stored IDs are only needed when one has to be chosen
        let taken: Vec<String> = if record.public_id.is_empty() {
            self.fetch_all()
                .await?
                .values()
                .map(|t| t.public_id.clone())
                .filter(|id| !id.is_empty())
                .collect()
        } else {
            Vec::new()
        };

        match resolve_public_id(&record, &taken, slug::public_id_candidate)? {
            PublicId::Existing(id) => Ok(id),
            PublicId::Assigned(id) => {
                self.update_fields(key, &json!({ "ID": id })).await?;
                info!("assigned public ID {id} to {key}");
                Ok(id)
            }
        }
    }

    /// Publish: assign the public ID when missing, then flip the flag
    pub async fn publish(&self, key: &str) -> Result<String> {
        let id = self.ensure_public_id(key).await?;
        self.update_fields(key, &json!({ "Published": true })).await?;
        info!("published tree {key} as {id}");
        Ok(id)
    }

    /// Flag-only publish used by the JSON workflow; the public ID is assumed
    /// to have been assigned already (or will be at QR time)
    pub async fn mark_published(&self, key: &str) -> Result<()> {
        self.update_fields(key, &json!({ "Published": true })).await
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        self.store.delete(&Self::path(key)).await?;
        info!("deleted tree record {key}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(url: &str) -> ImageEntry {
        ImageEntry {
            url: url.into(),
            image_type: "tree".into(),
        }
    }

    fn list(urls: &[&str]) -> ImageList {
        ImageList(urls.iter().map(|u| entry(u)).collect())
    }

    #[test]
    fn append_grows_list_by_batch_size() {
        for existing in 0..MAX_IMAGES {
            let current = list(&vec!["x"; existing]);
            let merged = reconcile_append(&current, vec![entry("new")]).unwrap();
            assert_eq!(merged.len(), existing + 1);
        }
    }

    #[test]
    fn append_rejects_fifth_image() {
        let current = list(&["a", "b", "c", "d"]);
        let err = reconcile_append(&current, vec![entry("e")]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn append_rejects_oversized_batch() {
        let current = list(&["a", "b", "c"]);
        let err = reconcile_append(&current, vec![entry("d"), entry("e")]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        // one image still fits
        assert!(reconcile_append(&current, vec![entry("d")]).is_ok());
    }

    #[test]
    fn append_rejects_empty_batch() {
        assert!(reconcile_append(&list(&[]), vec![]).is_err());
    }

    #[test]
    fn remove_keeps_relative_order() {
        let current = list(&["a", "b", "c"]);
        let filtered = reconcile_remove(&current, "b").unwrap();
        let urls: Vec<_> = filtered.0.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, ["a", "c"]);
    }

    #[test]
    fn remove_takes_first_match_only() {
        let current = list(&["a", "dup", "b", "dup"]);
        let filtered = reconcile_remove(&current, "dup").unwrap();
        let urls: Vec<_> = filtered.0.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, ["a", "b", "dup"]);
    }

    #[test]
    fn remove_missing_url_is_not_found() {
        let current = list(&["a"]);
        let err = reconcile_remove(&current, "zzz").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn remove_requires_exact_match() {
        let current = list(&["https://host/upload/a.jpg"]);
        assert!(reconcile_remove(&current, "https://host/upload/a").is_err());
    }

    fn named(name: &str, public_id: &str) -> TreeRecord {
        TreeRecord {
            name: name.into(),
            public_id: public_id.into(),
            ..Default::default()
        }
    }

    #[test]
    fn existing_public_id_is_never_regenerated() {
        let record = named("Neem", "neem-1234");
        let mut calls = 0;
        let got = resolve_public_id(&record, &[], |_| {
            calls += 1;
            "other-0000".into()
        })
        .unwrap();
        assert_eq!(got, PublicId::Existing("neem-1234".into()));
        assert_eq!(calls, 0);
    }

    #[test]
    fn public_id_requires_a_name() {
        let err = resolve_public_id(&named("   ", ""), &[], |_| "x-0000".into()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn public_id_retries_past_collisions() {
        let record = named("Neem", "");
        let taken = vec!["neem-0001".to_string(), "neem-0002".to_string()];
        let mut seq = ["neem-0001", "neem-0002", "neem-7777"].into_iter();
        let got = resolve_public_id(&record, &taken, |_| seq.next().unwrap().into()).unwrap();
        assert_eq!(got, PublicId::Assigned("neem-7777".into()));
    }

    #[test]
    fn public_id_gives_up_when_every_candidate_collides() {
        let record = named("Neem", "");
        let taken = vec!["neem-0001".to_string()];
        let err = resolve_public_id(&record, &taken, |_| "neem-0001".into()).unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }
}
