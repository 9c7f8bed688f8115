use serde::{Deserialize, Serialize};

use super::timestamp::to_rfc3339;
use super::LinkRecord;

#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    pub url: String,
    #[serde(default, rename = "customSlug", alias = "custom_slug")]
    pub custom_slug: Option<String>,
    /// RFC 3339 timestamp
    #[serde(default, rename = "expiresAt", alias = "expires_at")]
    pub expires_at: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUrlResponse {
    pub success: bool,
    pub short_url: String,
    pub slug: String,
    pub original_url: String,
    pub expires_at: Option<String>,
}

/// Absent or `null` clears the expiry.
#[derive(Debug, Deserialize)]
pub struct UpdateUrlRequest {
    #[serde(default, alias = "expiresAt")]
    pub expires_at: Option<String>,
}

/// Admin view of a record with RFC 3339 timestamps.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkResponse {
    pub id: i64,
    pub slug: String,
    pub original_url: String,
    pub created_at: Option<String>,
    pub clicks: i64,
    pub expires_at: Option<String>,
}

impl From<LinkRecord> for LinkResponse {
    fn from(record: LinkRecord) -> Self {
        Self {
            id: record.id,
            slug: record.slug,
            original_url: record.original_url,
            created_at: to_rfc3339(record.created_at),
            clicks: record.clicks,
            expires_at: record.expires_at.and_then(to_rfc3339),
        }
    }
}
