//! Session management: persists the browser cookie to disk.
//!
//! The session file is stored at `<config dir>/ytmusic-api/session.json` and
//! contains the full `Cookie` header copied from a logged-in
//! `music.youtube.com` tab (developer tools → Network → any `browse`
//! request → Request Headers → `cookie`):
//!
//! ```json
//! { "cookie": "VISITOR_INFO1_LIVE=...; SAPISID=...; __Secure-3PAPISID=..." }
//! ```
//!
//! Authenticated InnerTube requests send that cookie together with an
//! `Authorization: SAPISIDHASH <ts>_<sha1>` header derived from the
//! `SAPISID` cookie, see [`Session::authorization`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fs;
use std::path::{Path, PathBuf};

/// Persistent login session backed by a JSON file on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Session {
    /// Raw `Cookie` header value.
    pub cookie: Option<String>,
}

impl Session {
    /// Session from a raw cookie header.
    pub fn from_cookie(cookie: impl Into<String>) -> Self {
        Self {
            cookie: Some(cookie.into()),
        }
    }

    /// Load session from the default location.
    ///
    /// Returns a default (empty) session if the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load session from `path`, or an empty session if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Save session to the default location, creating parent directories if needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Delete the session file from disk.
    pub fn clear() -> Result<()> {
        let path = Self::path()?;
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// The `Cookie` HTTP header value, if any.
    pub fn cookie_header(&self) -> Option<&str> {
        self.cookie.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// Check whether a cookie carrying `SAPISID` is present (does not validate it).
    pub fn is_logged_in(&self) -> bool {
        self.sapisid().is_some()
    }

    /// The `SAPISID` cookie, falling back to `__Secure-3PAPISID`.
    pub fn sapisid(&self) -> Option<&str> {
        let cookie = self.cookie_header()?;
        cookie_value(cookie, "SAPISID").or_else(|| cookie_value(cookie, "__Secure-3PAPISID"))
    }

    /// `Authorization` header value for a request sent from `origin` at
    /// `timestamp` (Unix seconds):
    /// `SAPISIDHASH <ts>_<hex sha1("<ts> <SAPISID> <origin>")>`.
    pub fn authorization(&self, origin: &str, timestamp: u64) -> Option<String> {
        let sapisid = self.sapisid()?;
        let digest = Sha1::digest(format!("{timestamp} {sapisid} {origin}").as_bytes());
        Some(format!("SAPISIDHASH {timestamp}_{}", hex::encode(digest)))
    }

    fn path() -> Result<PathBuf> {
        let config = dirs::config_dir()
            .ok_or_else(|| Error::Other("cannot determine config directory".into()))?;
        Ok(config.join("ytmusic-api").join("session.json"))
    }
}

fn cookie_value<'a>(cookie: &'a str, name: &str) -> Option<&'a str> {
    cookie.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}
