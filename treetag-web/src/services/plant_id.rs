//! Plant-identification client
//!
//! Posts one photograph to the identification API and returns scored species
//! suggestions for the volunteer to choose from.

use serde::Deserialize;
use treetag_common::{Error, Result};

const IDENTIFY_URL: &str = "https://my-api.plantnet.org/v2/identify/all";
const MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Deserialize)]
struct IdentifyResponse {
    results: Vec<IdentifyResult>,
}

#[derive(Debug, Deserialize)]
struct IdentifyResult {
    score: f64,
    species: IdentifySpecies,
}

#[derive(Debug, Deserialize)]
struct IdentifySpecies {
    #[serde(rename = "scientificNameWithoutAuthor")]
    scientific_name: String,
    #[serde(rename = "commonNames", default)]
    common_names: Vec<String>,
}

/// One candidate species, score as a percentage
#[derive(Debug, Clone, serde::Serialize)]
pub struct Suggestion {
    #[serde(rename = "scientificName")]
    pub scientific_name: String,
    #[serde(rename = "commonNames")]
    pub common_names: Vec<String>,
    pub score: f64,
}

pub struct PlantId {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl PlantId {
    pub fn new(http: reqwest::Client, api_key: Option<String>) -> Self {
        Self { http, api_key }
    }

    /// Identify the species on a photograph; empty result set is an error the
    /// caller can surface as "try another image"
    pub async fn identify(&self, image: Vec<u8>) -> Result<Vec<Suggestion>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config("plant identification key is not configured".into()))?;

        let part = reqwest::multipart::Part::bytes(image).file_name("upload.jpg");
        let form = reqwest::multipart::Form::new()
            .part("images", part)
            .text("organs", "leaf");

        let resp = self
            .http
            .post(IDENTIFY_URL)
            .query(&[("api-key", api_key)])
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Ai(format!("identify: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::Ai(format!("identify: status {}", resp.status())));
        }

        let body: IdentifyResponse = resp
            .json()
            .await
            .map_err(|e| Error::Ai(format!("identify: decode: {e}")))?;

        Ok(body
            .results
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|r| Suggestion {
                scientific_name: r.species.scientific_name,
                common_names: r.species.common_names,
                score: r.score * 100.0,
            })
            .collect())
    }
}
