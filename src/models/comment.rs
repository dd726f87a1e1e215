use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment left on a build listing.
///
/// Comments are append-only and live only as long as the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub build_id: String,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Input for posting a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentInput {
    /// Defaults to the build's author when omitted.
    #[serde(default)]
    pub author: Option<String>,
    pub content: String,
}
