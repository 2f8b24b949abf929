//! Account API.
//!
//! Endpoint: `POST /youtubei/v1/account/account_menu`
//!
//! Request: `{}` (authentication is via cookie and `SAPISIDHASH`).
//!
//! Response (abridged):
//! ```json
//! {
//!   "actions": [{ "openPopupAction": { "popup": { "multiPageMenuRenderer": {
//!     "header": { "activeAccountHeaderRenderer": {
//!       "accountName": { "runs": [{ "text": "Ana" }] },
//!       "channelHandle": { "runs": [{ "text": "@ana" }] },
//!       "accountPhoto": { "thumbnails": [{ "url": "https://yt3.ggpht.com/...", "width": 88, "height": 88 }] }
//!     } }
//!   } } } }]
//! }
//! ```
//!
//! Without a valid login the header is missing, which surfaces as a parse
//! error on `accountName`.

use crate::client::YtMusicClient;
use crate::error::{Error, Result};
use crate::parse::{runs_text, thumbnails};
use crate::types::AccountInfo;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use ytmusic_core::JsonDocument;

fn parse_account(doc: &JsonDocument) -> Result<AccountInfo> {
    let header = doc
        .root()
        .get("actions")
        .at(0)
        .get("openPopupAction")
        .get("popup")
        .get("multiPageMenuRenderer")
        .get("header")
        .get("activeAccountHeaderRenderer");
    Ok(AccountInfo {
        name: runs_text(&header.get("accountName")).or_throw("account name")?,
        handle: runs_text(&header.get("channelHandle")).map(Some).or(None),
        photo: thumbnails(&header.get("accountPhoto")),
    })
}

impl YtMusicClient {
    /// Get the logged-in account's name, handle and photo.
    ///
    /// # Errors
    ///
    /// - [`Error::NotLoggedIn`]: the session has no `SAPISID` cookie
    /// - [`Error::Parse`]: the cookie was rejected and no account header came back
    pub async fn account_info(&self, cancel: &CancellationToken) -> Result<AccountInfo> {
        if !self.session().is_logged_in() {
            return Err(Error::NotLoggedIn);
        }
        let doc = self
            .request("account/account_menu", json!({}), None, cancel)
            .await?;
        parse_account(&doc)
    }
}
