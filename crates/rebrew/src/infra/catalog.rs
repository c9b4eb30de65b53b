//! Homebrew cask catalog lookups.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;

// A cask page carries both a names paragraph and a description paragraph;
// search pages and error pages carry neither.
static NAME_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<p[^>]*class="names""#).expect("valid name marker pattern"));
static DESC_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<p[^>]*class="desc""#).expect("valid desc marker pattern"));

/// Classification of a canonical key against the cask catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogStatus {
    Found,
    NotFound,
}

/// Blocking catalog client issuing one GET per key.
///
/// Certificate validation is intentionally disabled for this client, and
/// every transport failure degrades to `NotFound` so a flaky network never
/// aborts a batch of checks.
pub struct CatalogClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("rebrew")
            .danger_accept_invalid_certs(true)
            .build()
            .context("build catalog http client")?;
        let base_url: String = base_url.into();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client,
        })
    }

    /// Lookup URL for a canonical key.
    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{}#default", self.base_url, key)
    }

    /// One lookup, one classification. Never fails.
    pub fn check(&self, key: &str) -> CatalogStatus {
        let url = self.url_for(key);
        let response = match self.client.get(&url).send() {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(key, error = %err, "catalog request failed");
                return CatalogStatus::NotFound;
            }
        };

        if !response.status().is_success() {
            return CatalogStatus::NotFound;
        }

        match response.text() {
            Ok(body) => classify_body(&body),
            Err(err) => {
                tracing::debug!(key, error = %err, "catalog body unreadable");
                CatalogStatus::NotFound
            }
        }
    }
}

/// `Found` only when both structural markers are present in the page body.
pub fn classify_body(body: &str) -> CatalogStatus {
    if NAME_MARKER.is_match(body) && DESC_MARKER.is_match(body) {
        CatalogStatus::Found
    } else {
        CatalogStatus::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_markers_classify_as_found() {
        let body = r#"<html><p class="names">iTerm2</p><p class="desc">Terminal</p></html>"#;
        assert_eq!(classify_body(body), CatalogStatus::Found);
    }

    #[test]
    fn missing_either_marker_classifies_as_not_found() {
        let names_only = r#"<p class="names">Thing</p>"#;
        let desc_only = r#"<p class="desc">Thing</p>"#;
        assert_eq!(classify_body(names_only), CatalogStatus::NotFound);
        assert_eq!(classify_body(desc_only), CatalogStatus::NotFound);
        assert_eq!(classify_body("<html>not found</html>"), CatalogStatus::NotFound);
    }

    #[test]
    fn markers_match_with_extra_attributes() {
        let body = r#"<p id="x" class="names">A</p><p data-y class="desc">B</p>"#;
        assert_eq!(classify_body(body), CatalogStatus::Found);
    }

    #[test]
    fn url_carries_key_and_default_fragment() {
        let client = CatalogClient::new("https://formulae.brew.sh/cask/").unwrap();
        assert_eq!(
            client.url_for("iterm2"),
            "https://formulae.brew.sh/cask/iterm2#default"
        );
    }
}
