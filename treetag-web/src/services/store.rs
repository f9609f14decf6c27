//! Document store client
//!
//! Key-path-addressed JSON document database with a REST contract:
//! `GET`/`PUT`/`PATCH`/`DELETE` against `{base}/{path}.json`. There are no
//! transactions and no atomic multi-path writes; every operation is a single
//! round trip and last write wins.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use treetag_common::{Error, Result};

pub struct DocumentStore {
    http: reqwest::Client,
    base_url: String,
    auth: Option<String>,
}

impl DocumentStore {
    pub fn new(http: reqwest::Client, base_url: String, auth: Option<String>) -> Self {
        Self {
            http,
            base_url,
            auth,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}.json", self.base_url, path)
    }

    fn with_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Some(token) => req.query(&[("auth", token)]),
            None => req,
        }
    }

    /// Read one document; absent paths decode as `None`
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let resp = self
            .with_auth(self.http.get(self.url(path)))
            .send()
            .await
            .map_err(|e| Error::Store(format!("GET {path}: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::Store(format!("GET {path}: status {}", resp.status())));
        }

        // The store returns literal `null` for absent paths
        let value: Value = resp
            .json()
            .await
            .map_err(|e| Error::Store(format!("GET {path}: body: {e}")))?;
        if value.is_null() {
            return Ok(None);
        }

        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| Error::Store(format!("GET {path}: decode: {e}")))
    }

    /// Overwrite the document at `path`
    pub async fn set<T: Serialize>(&self, path: &str, value: &T) -> Result<()> {
        debug!("store set {path}");
        let resp = self
            .with_auth(self.http.put(self.url(path)))
            .json(value)
            .send()
            .await
            .map_err(|e| Error::Store(format!("PUT {path}: {e}")))?;
        ensure_success("PUT", path, resp.status())
    }

    /// Merge `partial` into the document at `path` (shallow field merge)
    pub async fn update(&self, path: &str, partial: &Value) -> Result<()> {
        debug!("store update {path}");
        let resp = self
            .with_auth(self.http.patch(self.url(path)))
            .json(partial)
            .send()
            .await
            .map_err(|e| Error::Store(format!("PATCH {path}: {e}")))?;
        ensure_success("PATCH", path, resp.status())
    }

    /// Remove the document at `path`
    pub async fn delete(&self, path: &str) -> Result<()> {
        debug!("store delete {path}");
        let resp = self
            .with_auth(self.http.delete(self.url(path)))
            .send()
            .await
            .map_err(|e| Error::Store(format!("DELETE {path}: {e}")))?;
        ensure_success("DELETE", path, resp.status())
    }
}

fn ensure_success(verb: &str, path: &str, status: reqwest::StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(Error::Store(format!("{verb} {path}: status {status}")))
    }
}
