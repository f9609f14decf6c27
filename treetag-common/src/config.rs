//! Environment-based configuration
//!
//! Only the document store URL is required at startup. Every other credential
//! is optional: an operation that needs a missing credential fails with a
//! `Config` error for that request, the rest of the service keeps running.

use crate::{Error, Result};

/// Media host credentials (upload signing)
#[derive(Debug, Clone)]
pub struct MediaCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// SMTP settings for feedback reports
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub username: String,
    pub password: String,
    /// Recipient addresses, comma separated in the environment
    pub recipients: Vec<String>,
}

/// Service configuration, resolved once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen address, e.g. "127.0.0.1:8080"
    pub bind: String,
    /// Base URL of the document store (no trailing slash)
    pub store_url: String,
    /// Optional auth token appended to store requests
    pub store_auth: Option<String>,
    /// Base URL encoded into QR codes, e.g. "https://trees.example.org"
    pub public_base_url: String,
    pub media: Option<MediaCredentials>,
    /// AI text-generation API key
    pub ai_key: Option<String>,
    /// Chat-completions endpoint
    pub ai_url: String,
    /// Plant-identification API key
    pub plant_id_key: Option<String>,
    /// Identity provider API key
    pub identity_key: Option<String>,
    pub smtp: Option<SmtpSettings>,
}

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Fails only when `TREETAG_STORE_URL` is absent; every other setting is
    /// optional or defaulted.
    pub fn from_env() -> Result<Self> {
        let store_url = var("TREETAG_STORE_URL")
            .ok_or_else(|| Error::Config("TREETAG_STORE_URL is not set".into()))?;
        let store_url = store_url.trim_end_matches('/').to_string();

        let media = match (
            var("TREETAG_MEDIA_CLOUD"),
            var("TREETAG_MEDIA_KEY"),
            var("TREETAG_MEDIA_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(MediaCredentials {
                cloud_name,
                api_key,
                api_secret,
            }),
            _ => None,
        };

        let smtp = match (
            var("TREETAG_SMTP_HOST"),
            var("TREETAG_SMTP_USER"),
            var("TREETAG_SMTP_PASS"),
            var("TREETAG_REPORT_TO"),
        ) {
            (Some(host), Some(username), Some(password), Some(to)) => Some(SmtpSettings {
                host,
                username,
                password,
                recipients: to
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            }),
            _ => None,
        };

        Ok(Self {
            bind: var("TREETAG_BIND").unwrap_or_else(|| "127.0.0.1:8080".into()),
            store_url,
            store_auth: var("TREETAG_STORE_AUTH"),
            public_base_url: var("TREETAG_PUBLIC_BASE_URL")
                .unwrap_or_else(|| "http://127.0.0.1:8080".into()),
            media,
            ai_key: var("TREETAG_AI_KEY"),
            ai_url: var("TREETAG_AI_URL")
                .unwrap_or_else(|| "https://openrouter.ai/api/v1/chat/completions".into()),
            plant_id_key: var("TREETAG_PLANTID_KEY"),
            identity_key: var("TREETAG_IDENTITY_KEY"),
            smtp,
        })
    }

    /// Media credentials, or a per-operation config error
    pub fn media(&self) -> Result<&MediaCredentials> {
        self.media
            .as_ref()
            .ok_or_else(|| Error::Config("media host credentials are not configured".into()))
    }

    /// AI key, or a per-operation config error
    pub fn ai_key(&self) -> Result<&str> {
        self.ai_key
            .as_deref()
            .ok_or_else(|| Error::Config("AI service key is not configured".into()))
    }

    /// Plant-identification key, or a per-operation config error
    pub fn plant_id_key(&self) -> Result<&str> {
        self.plant_id_key
            .as_deref()
            .ok_or_else(|| Error::Config("plant identification key is not configured".into()))
    }

    /// Identity provider key, or a per-operation config error
    pub fn identity_key(&self) -> Result<&str> {
        self.identity_key
            .as_deref()
            .ok_or_else(|| Error::Config("identity provider key is not configured".into()))
    }

    /// SMTP settings, or a per-operation config error
    pub fn smtp(&self) -> Result<&SmtpSettings> {
        self.smtp
            .as_ref()
            .ok_or_else(|| Error::Config("SMTP settings are not configured".into()))
    }
}
