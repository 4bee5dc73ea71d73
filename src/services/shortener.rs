//! Token allocation and resolution
//!
//! `shorten` turns a validated URL into a fresh token; `resolve` turns a raw
//! path segment back into the stored target URL.

use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::errors::{Result, ShortyError};
use crate::store::TokenStore;
use crate::utils::generate_token;
use crate::utils::url_validator::validate_url;

/// Full-token redraws before giving up. A collision run this long means the
/// token space for the configured length is effectively saturated.
const MAX_GENERATE_ATTEMPTS: usize = 32;

pub struct ShortenService {
    store: Arc<TokenStore>,
    route_prefix: String,
}

impl ShortenService {
    pub fn new(store: Arc<TokenStore>, route_prefix: impl Into<String>) -> Self {
        Self {
            store,
            route_prefix: route_prefix.into(),
        }
    }

    /// Register `url` under a previously-unused token of exactly
    /// `token_length` characters and return the token.
    ///
    /// The candidate is committed with a conditional insert, so two racing
    /// calls that draw the same token cannot both win; the loser redraws.
    pub fn shorten(&self, url: &str, token_length: usize) -> Result<String> {
        validate_url(url).map_err(|e| ShortyError::invalid_url(e.to_string()))?;

        // parse + re-serialize collapses redundant forms
        let target = Url::parse(url.trim())?.to_string();
        let ttl = self.store.default_ttl();

        for _ in 0..MAX_GENERATE_ATTEMPTS {
            let candidate = generate_token(token_length);
            if self.store.insert_if_absent(&candidate, &target, ttl) {
                debug!("Shortened {} -> {}", target, candidate);
                return Ok(candidate);
            }
        }

        warn!(
            "No free token of length {} after {} attempts",
            token_length, MAX_GENERATE_ATTEMPTS
        );
        Err(ShortyError::token_exhausted(format!(
            "No free token of length {} after {} attempts",
            token_length, MAX_GENERATE_ATTEMPTS
        )))
    }

    /// Resolve a raw token or path segment to its target URL, defaulting the
    /// scheme to https when the stored target has none.
    pub fn resolve(&self, raw: &str) -> Result<String> {
        let stripped = if self.route_prefix.is_empty() {
            raw.to_string()
        } else {
            raw.replacen(&self.route_prefix, "", 1)
        };

        let token = extract_token(&stripped)
            .ok_or_else(|| ShortyError::not_found(format!("No token in '{}'", raw)))?;

        let target = self
            .store
            .get(token)
            .ok_or_else(|| ShortyError::not_found(format!("Token not found: {}", token)))?;

        Ok(ensure_scheme(&target))
    }

    pub fn store(&self) -> &Arc<TokenStore> {
        &self.store
    }
}

/// Leftmost maximal `[a-zA-Z0-9]+` run, guarding against stray path
/// separators or query fragments leaking into the token segment.
fn extract_token(raw: &str) -> Option<&str> {
    let start = raw.find(|c: char| c.is_ascii_alphanumeric())?;
    let rest = &raw[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Default the scheme to https so operators can store bare host/path strings.
fn ensure_scheme(target: &str) -> String {
    match Url::parse(target) {
        Ok(url) => url.to_string(),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let prefixed = if target.starts_with("//") {
                format!("https:{}", target)
            } else {
                format!("https://{}", target)
            };
            Url::parse(&prefixed)
                .map(|url| url.to_string())
                .unwrap_or_else(|_| target.to_string())
        }
        Err(_) => target.to_string(),
    }
}
