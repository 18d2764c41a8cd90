//! Authorization
//!
//! A process-wide access token shared by every service, plus a helper to
//! obtain one from Application Default Credentials.

use anyhow::{Context, Result};
use gcp_auth::TokenProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};

/// Default scopes when fetching a token from Application Default Credentials
pub const DEFAULT_SCOPES: &[&str] = &["https://www.googleapis.com/auth/cloud-platform"];

/// Where the access token goes on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// `Authorization: Bearer <token>`
    #[default]
    Header,
    /// `?access_token=<token>`
    QueryParam,
}

/// Shared access token holder
#[derive(Clone, Default)]
pub struct Credentials {
    token: Arc<RwLock<Option<String>>>,
}

static GLOBAL: OnceLock<Credentials> = OnceLock::new();

impl Credentials {
    /// Create an empty, isolated credential store
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let credentials = Self::new();
        credentials.set_token(token);
        credentials
    }

    /// The process-wide store written by [`init`]
    pub fn global() -> &'static Credentials {
        GLOBAL.get_or_init(Credentials::new)
    }

    pub fn set_token(&self, token: impl Into<String>) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(token.into());
    }

    pub fn clear(&self) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    /// Current token, read at request time
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.token().is_some() { "set" } else { "unset" };
        f.debug_struct("Credentials").field("token", &state).finish()
    }
}

/// Set the process-wide access token used by every service built with
/// default credentials
pub fn init(access_token: impl Into<String>) {
    Credentials::global().set_token(access_token);
    tracing::debug!("Access token initialized");
}

/// Fetch an access token from Application Default Credentials
pub async fn fetch_adc_token(scopes: &[&str]) -> Result<String> {
    let provider = gcp_auth::provider().await.context(
        "Failed to initialize Google authentication. Run 'gcloud auth application-default login'",
    )?;

    let token = provider
        .token(scopes)
        .await
        .context("Failed to get access token")?;

    Ok(token.as_str().to_string())
}
