//! Media host client
//!
//! Signed multipart uploads returning a secure URL, and destroy-by-public-ID.
//! The public ID of a stored asset is everything after the `/upload/` segment
//! of its URL minus the file extension.

use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::info;
use treetag_common::config::MediaCredentials;
use treetag_common::{Error, Result};

const UPLOAD_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

pub struct MediaStore {
    http: reqwest::Client,
    credentials: Option<MediaCredentials>,
}

impl MediaStore {
    pub fn new(http: reqwest::Client, credentials: Option<MediaCredentials>) -> Self {
        Self { http, credentials }
    }

    fn credentials(&self) -> Result<&MediaCredentials> {
        self.credentials
            .as_ref()
            .ok_or_else(|| Error::Config("media host credentials are not configured".into()))
    }

    /// Upload image bytes into `folder`, returning the hosted secure URL
    pub async fn upload(&self, bytes: Vec<u8>, filename: &str, folder: &str) -> Result<String> {
        let creds = self.credentials()?;
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(&format!("folder={folder}&timestamp={timestamp}"), &creds.api_secret);

        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("folder", folder.to_string())
            .text("timestamp", timestamp)
            .text("api_key", creds.api_key.clone())
            .text("signature", signature);

        let url = format!("{UPLOAD_BASE}/{}/image/upload", creds.cloud_name);
        let resp = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Media(format!("upload: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::Media(format!("upload: status {}", resp.status())));
        }

        let body: UploadResponse = resp
            .json()
            .await
            .map_err(|e| Error::Media(format!("upload: decode: {e}")))?;
        if body.secure_url.is_empty() {
            return Err(Error::Media("upload: empty secure URL".into()));
        }
        info!("media upload complete: {}", body.secure_url);
        Ok(body.secure_url)
    }

    /// Remove a hosted asset by its public ID
    pub async fn destroy(&self, public_id: &str) -> Result<()> {
        let creds = self.credentials()?;
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(
            &format!("public_id={public_id}&timestamp={timestamp}"),
            &creds.api_secret,
        );

        let form = reqwest::multipart::Form::new()
            .text("public_id", public_id.to_string())
            .text("timestamp", timestamp)
            .text("api_key", creds.api_key.clone())
            .text("signature", signature);

        let url = format!("{UPLOAD_BASE}/{}/image/destroy", creds.cloud_name);
        let resp = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Media(format!("destroy {public_id}: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::Media(format!(
                "destroy {public_id}: status {}",
                resp.status()
            )));
        }
        info!("media asset destroyed: {public_id}");
        Ok(())
    }
}

fn sign(params: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(params.as_bytes());
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Extract the destroy key from a hosted URL: the segment after `/upload/`
/// with the file extension stripped. Returns `None` for foreign URLs.
pub fn public_id_from_url(url: &str) -> Option<String> {
    let (_, tail) = url.split_once("/upload/")?;
    let id = match tail.rsplit_once('.') {
        // Only strip a real extension, not a dot inside a path segment
        Some((stem, ext)) if !ext.contains('/') => stem,
        _ => tail,
    };
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_id_strips_prefix_and_extension() {
        assert_eq!(
            public_id_from_url("https://res.example.com/demo/image/upload/treeqr/u1/leaf.jpg")
                .unwrap(),
            "treeqr/u1/leaf"
        );
    }

    #[test]
    fn public_id_keeps_dots_in_folders() {
        assert_eq!(
            public_id_from_url("https://res.example.com/x/upload/v1.2/folder/pic.png").unwrap(),
            "v1.2/folder/pic"
        );
    }

    #[test]
    fn public_id_rejects_foreign_urls() {
        assert!(public_id_from_url("https://elsewhere.example.com/pic.jpg").is_none());
        assert!(public_id_from_url("https://res.example.com/x/upload/").is_none());
    }

    #[test]
    fn signature_is_hex_sha256() {
        let sig = sign("timestamp=123", "secret");
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
