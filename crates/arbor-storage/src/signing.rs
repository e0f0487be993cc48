//! Time-limited retrieval URLs.
//!
//! A signed URL has the form
//! `{base}/{path}?expires={unix}&signature={sig}` where `sig` is the
//! unpadded URL-safe base64 of `sha256(secret \n path \n expires)`.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use arbor_core::error::AppError;
use arbor_core::result::AppResult;
use arbor_core::traits::storage::SignedUrl;

/// Issues and checks signed blob URLs.
#[derive(Clone)]
pub struct UrlSigner {
    base_url: String,
    secret: String,
}

impl std::fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSigner")
            .field("base_url", &self.base_url)
            .field("secret", &"****")
            .finish()
    }
}

impl UrlSigner {
    pub fn new(base_url: &str, secret: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            secret: secret.to_string(),
        }
    }

    fn signature(&self, path: &str, expires: i64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b"\n");
        hasher.update(path.as_bytes());
        hasher.update(b"\n");
        hasher.update(expires.to_string().as_bytes());
        URL_SAFE_NO_PAD.encode(hasher.finalize())
    }

    /// Sign `path` so it stays valid for `ttl` after `now`.
    pub fn sign_at(&self, path: &str, ttl: Duration, now: DateTime<Utc>) -> AppResult<SignedUrl> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|_| AppError::validation("Signed URL lifetime is too long"))?;
        let expires_at = now + ttl;
        let expires = expires_at.timestamp();
        let path = path.trim_start_matches('/');
        Ok(SignedUrl {
            url: format!(
                "{}/{path}?expires={expires}&signature={}",
                self.base_url,
                self.signature(path, expires)
            ),
            expires_at,
        })
    }

    pub fn sign(&self, path: &str, ttl: Duration) -> AppResult<SignedUrl> {
        self.sign_at(path, ttl, Utc::now())
    }

    /// Check a URL produced by [`sign`](Self::sign) and return the storage
    /// path it grants access to.
    pub fn verify_at<'a>(&self, url: &'a str, now: DateTime<Utc>) -> AppResult<&'a str> {
        let invalid = || AppError::authorization("Invalid signed URL");

        let rest = url
            .strip_prefix(self.base_url.as_str())
            .and_then(|r| r.strip_prefix('/'))
            .ok_or_else(invalid)?;
        let (path, query) = rest.split_once('?').ok_or_else(invalid)?;

        let mut expires = None;
        let mut signature = None;
        for pair in query.split('&') {
            match pair.split_once('=') {
                Some(("expires", v)) => expires = v.parse::<i64>().ok(),
                Some(("signature", v)) => signature = Some(v),
                _ => {}
            }
        }
        let (Some(expires), Some(signature)) = (expires, signature) else {
            return Err(invalid());
        };

        if !constant_time_eq(self.signature(path, expires).as_bytes(), signature.as_bytes()) {
            return Err(invalid());
        }
        if now.timestamp() > expires {
            return Err(AppError::authorization("Signed URL has expired"));
        }
        Ok(path)
    }

    pub fn verify<'a>(&self, url: &'a str) -> AppResult<&'a str> {
        self.verify_at(url, Utc::now())
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
