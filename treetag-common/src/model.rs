//! Tree record data model
//!
//! Field names and casing reproduce the wire contract of the existing stored
//! data exactly (`ID`, `Name`, `Published`, `QR`, `Saved` versus lowerCamel
//! everywhere else). Do not "fix" the casing: the store already holds records
//! written with these names.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Maximum number of images a record may carry
pub const MAX_IMAGES: usize = 4;

/// Taxonomic classification sub-map (kingdom through species)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Classification {
    pub kingdom: String,
    pub phylum: String,
    pub class: String,
    pub order: String,
    pub family: String,
    pub genus: String,
    pub species: String,
}

/// Geolocation sub-map; coordinates are a single "lat,lng" delimited string
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub coordinates: String,
    pub site: String,
    pub address: String,
    pub city: String,
}

/// One uploaded image: media-host URL plus the volunteer-chosen kind
/// ("tree", "leaf", "bark", ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub url: String,
    #[serde(rename = "imageType")]
    pub image_type: String,
}

/// Image list tolerating both storage shapes.
///
/// The store represents a homogeneous list either as a dense array or, after
/// partial deletes, as a sparse key-indexed map. Decoding tries the ordered
/// array first and falls back to flattening a string-keyed map (order not
/// guaranteed on that path). Always serializes back as a dense array.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ImageList(pub Vec<ImageEntry>);

impl<'de> Deserialize<'de> for ImageList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Ordered(Vec<ImageEntry>),
            Keyed(BTreeMap<String, ImageEntry>),
        }

        match Shape::deserialize(deserializer)? {
            Shape::Ordered(list) => Ok(ImageList(list)),
            Shape::Keyed(map) => Ok(ImageList(map.into_values().collect())),
        }
    }
}

impl ImageList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Slots still available before the bound of [`MAX_IMAGES`]
    pub fn remaining_slots(&self) -> usize {
        MAX_IMAGES.saturating_sub(self.0.len())
    }
}

/// One scanned/tagged tree, as stored under `trees/{key}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeRecord {
    /// Human-facing public ID (slug + numeric suffix), lazily assigned;
    /// distinct from the store key
    #[serde(rename = "ID")]
    pub public_id: String,
    /// Mirror of the store key, written at creation
    pub uid: String,
    #[serde(rename = "Name")]
    pub name: String,
    pub botanical: String,
    pub category: String,
    pub description: String,
    #[serde(rename = "medicinalBenefits")]
    pub medicinal_benefits: String,
    #[serde(rename = "environmentalBenefits")]
    pub environmental_benefits: String,
    /// Tri-state as string: "Yes" / "No" / empty
    pub native: String,
    pub classification: Classification,
    pub location: Location,
    pub images: ImageList,
    #[serde(rename = "Published")]
    pub published: bool,
    #[serde(rename = "QR")]
    pub qr: bool,
    #[serde(rename = "Saved")]
    pub saved: bool,
    /// Owning volunteer's email; doubles as the authorization key
    #[serde(rename = "volunteerName")]
    pub volunteer_name: String,
    /// Human-formatted creation time (not machine-sortable)
    pub timestamp: String,
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
}

impl TreeRecord {
    /// Visible in a volunteer's published QR listing
    pub fn is_published_for(&self, email: &str) -> bool {
        self.published && self.qr && self.volunteer_name.eq_ignore_ascii_case(email)
    }

    /// Visible in a volunteer's draft listing
    pub fn is_draft_for(&self, email: &str) -> bool {
        !self.published && self.qr && self.volunteer_name.eq_ignore_ascii_case(email)
    }
}

/// Volunteer account profile, as stored under `users/{uid}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub email: String,
    pub uid: String,
    pub verified: bool,
    pub role: String,
    pub timestamp: String,
    #[serde(rename = "approvedBy")]
    pub approved_by: String,
    #[serde(rename = "approvedAt")]
    pub approved_at: String,
    #[serde(rename = "start_time")]
    pub start_time: String,
    #[serde(rename = "end_time")]
    pub end_time: String,
    pub permanent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_list_decodes_dense_array() {
        let json = r#"[{"url":"a","imageType":"tree"}]"#;
        let list: ImageList = serde_json::from_str(json).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.0[0].url, "a");
        assert_eq!(list.0[0].image_type, "tree");
    }

    #[test]
    fn image_list_decodes_keyed_map() {
        let json = r#"{"k1":{"url":"a","imageType":"tree"}}"#;
        let list: ImageList = serde_json::from_str(json).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.0[0].url, "a");
        assert_eq!(list.0[0].image_type, "tree");
    }

    #[test]
    fn image_list_shapes_yield_same_normalized_list() {
        let arr: ImageList =
            serde_json::from_str(r#"[{"url":"a","imageType":"tree"}]"#).unwrap();
        let map: ImageList =
            serde_json::from_str(r#"{"x":{"url":"a","imageType":"tree"}}"#).unwrap();
        assert_eq!(arr, map);
    }

    #[test]
    fn image_list_rejects_other_shapes() {
        assert!(serde_json::from_str::<ImageList>(r#""not images""#).is_err());
        assert!(serde_json::from_str::<ImageList>("17").is_err());
    }

    #[test]
    fn image_list_serializes_as_dense_array() {
        let list: ImageList =
            serde_json::from_str(r#"{"k":{"url":"a","imageType":"leaf"}}"#).unwrap();
        let out = serde_json::to_string(&list).unwrap();
        assert_eq!(out, r#"[{"url":"a","imageType":"leaf"}]"#);
    }

    #[test]
    fn record_tolerates_missing_fields() {
        let rec: TreeRecord = serde_json::from_str(r#"{"Name":"Neem"}"#).unwrap();
        assert_eq!(rec.name, "Neem");
        assert!(!rec.published);
        assert!(rec.images.is_empty());
        assert_eq!(rec.classification, Classification::default());
    }

    #[test]
    fn record_round_trips_wire_casing() {
        let rec = TreeRecord {
            name: "Banyan".into(),
            published: true,
            qr: true,
            volunteer_name: "v@example.org".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["Name"], "Banyan");
        assert_eq!(value["Published"], true);
        assert_eq!(value["QR"], true);
        assert_eq!(value["volunteerName"], "v@example.org");
    }

    #[test]
    fn draft_and_published_visibility_are_disjoint() {
        let mut rec = TreeRecord {
            qr: true,
            volunteer_name: "V@Example.org".into(),
            ..Default::default()
        };
        assert!(rec.is_draft_for("v@example.org"));
        assert!(!rec.is_published_for("v@example.org"));
        rec.published = true;
        assert!(!rec.is_draft_for("v@example.org"));
        assert!(rec.is_published_for("v@example.org"));
    }
}
