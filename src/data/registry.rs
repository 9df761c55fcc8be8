//! Model-card retrieval from a FAIR model registry.
//!
//! Model files may reference their card by URL instead of embedding it. The
//! registry serves JSON-LD; an optional bearer token is read from
//! `FAIRMODELS_TOKEN`.

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::info;

use crate::error::AppError;

const TOKEN_VAR: &str = "FAIRMODELS_TOKEN";
const ACCEPT_LD: &str = "application/ld+json, application/json;q=0.9";

pub struct RegistryClient {
    client: Client,
    token: Option<String>,
}

impl RegistryClient {
    pub fn from_env() -> Self {
        Self {
            client: Client::new(),
            token: std::env::var(TOKEN_VAR).ok().filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn fetch_model_card(&self, url: &str) -> Result<Value, AppError> {
        info!(url, "fetching model card");

        let mut req = self.client.get(url).header(ACCEPT, ACCEPT_LD);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .map_err(|e| AppError::new(4, format!("Model card request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Model card request to {url} failed with status {}.", resp.status()),
            ));
        }

        let card: Value = resp
            .json()
            .map_err(|e| AppError::new(4, format!("Failed to parse model card from {url}: {e}")))?;

        if !card.is_object() {
            return Err(AppError::new(4, format!("Model card from {url} is not a JSON object.")));
        }
        Ok(card)
    }
}
