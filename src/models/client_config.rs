// src/models/client_config.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::caller::DisplayIdentity;

/// Render-time configuration handed to an assessment client.
///
/// The client never fetches any of this itself; it is injected when the
/// assessment is mounted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ClientConfig {
    /// Absolute URL of the submit endpoint.
    pub endpoint: String,
    /// Per-session bearer token used for the submission.
    pub token: String,
    pub user: DisplayIdentity,
}
