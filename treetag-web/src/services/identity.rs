//! Identity provider client
//!
//! Sign-up, sign-in, and password change against the external identity
//! provider's REST API. Account profiles (the `verified` flag, role, approval
//! audit fields) live in the document store under `users/{uid}`, not here.

use serde::Deserialize;
use serde_json::json;
use treetag_common::{Error, Result};

const ACCOUNTS_BASE: &str = "https://identitytoolkit.googleapis.com/v1/accounts";

/// Provider response for sign-up and sign-in
#[derive(Debug, Deserialize)]
pub struct AuthSession {
    #[serde(rename = "idToken")]
    pub id_token: String,
    pub email: String,
    #[serde(rename = "localId")]
    pub uid: String,
}

pub struct Identity {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl Identity {
    pub fn new(http: reqwest::Client, api_key: Option<String>) -> Self {
        Self { http, api_key }
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| Error::Config("identity provider key is not configured".into()))
    }

    async fn call(&self, action: &str, body: serde_json::Value) -> Result<AuthSession> {
        let key = self.api_key()?;
        let resp = self
            .http
            .post(format!("{ACCOUNTS_BASE}:{action}"))
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Identity(format!("{action}: {e}")))?;

        if !resp.status().is_success() {
            // Provider rejections (wrong password, duplicate email) are the
            // caller's invalid input, not our fault
            return Err(Error::InvalidInput(format!(
                "identity provider rejected {action} (status {})",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| Error::Identity(format!("{action}: decode: {e}")))
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession> {
        self.call(
            "signUp",
            json!({"email": email, "password": password, "returnSecureToken": true}),
        )
        .await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
        self.call(
            "signInWithPassword",
            json!({"email": email, "password": password, "returnSecureToken": true}),
        )
        .await
    }

    /// Re-authenticate with the current password, then update to the new one
    pub async fn change_password(
        &self,
        email: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let session = self.sign_in(email, current_password).await?;
        self.call(
            "update",
            json!({
                "idToken": session.id_token,
                "password": new_password,
                "returnSecureToken": true,
            }),
        )
        .await?;
        Ok(())
    }
}
