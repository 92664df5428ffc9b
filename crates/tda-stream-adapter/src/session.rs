/*
[INPUT]:  Account/session identifiers from the user-principals lookup
[OUTPUT]: Streamer URL and URL-encoded login credential
[POS]:    Session layer - caller-supplied identity for the streamer
[UPDATE]: When the streamer login credential format changes
*/

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::error::{Result, TdaStreamError};

/// Timestamp format of the principal's `tokenTimestamp` field
const TOKEN_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Identity and connection material for one streamer session.
///
/// Supplied by the account/user-principals collaborator; this crate never
/// fetches it. Every field comes straight from the principal document:
/// the streamer host, token and token timestamp from `streamerInfo`, the
/// account metadata from the first account entry, and the subscription
/// key required by account-scoped services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamerSession {
    pub account_id: String,
    pub streamer_host: String,
    pub token: String,
    pub token_timestamp: String,
    pub app_id: String,
    pub user_group: String,
    pub access_level: String,
    pub acl: String,
    pub company: String,
    pub segment: String,
    pub cd_domain_id: String,
    pub subscription_key: String,
}

impl StreamerSession {
    /// WebSocket endpoint derived from the streamer host
    pub fn ws_url(&self) -> String {
        format!("wss://{}/ws", self.streamer_host)
    }

    /// Token timestamp as epoch milliseconds, as the login handshake expects
    pub fn login_timestamp_millis(&self) -> Result<i64> {
        let parsed = DateTime::parse_from_str(&self.token_timestamp, TOKEN_TIMESTAMP_FORMAT)
            .map_err(|e| {
                TdaStreamError::Session(format!(
                    "invalid token timestamp {:?}: {e}",
                    self.token_timestamp
                ))
            })?;
        Ok(parsed.timestamp() * 1000)
    }

    /// Build the URL-encoded credential parameter for the LOGIN request
    pub fn login_credential(&self) -> Result<String> {
        let timestamp = self.login_timestamp_millis()?;

        let credential = form_urlencoded::Serializer::new(String::new())
            .append_pair("userid", &self.account_id)
            .append_pair("token", &self.token)
            .append_pair("company", &self.company)
            .append_pair("segment", &self.segment)
            .append_pair("cddomain", &self.cd_domain_id)
            .append_pair("usergroup", &self.user_group)
            .append_pair("accesslevel", &self.access_level)
            .append_pair("authorized", "Y")
            .append_pair("timestamp", &timestamp.to_string())
            .append_pair("appid", &self.app_id)
            .append_pair("acl", &self.acl)
            .finish();

        Ok(credential)
    }
}
