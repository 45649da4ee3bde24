use serde_json::Value;

use crate::client::ApiClient;
use crate::constants::paths;
use crate::error::ApiError;

/// Status vocabulary the server accepts for versions.
///
/// The body is returned as sent; see [`crate::models::VersionStatus`] for
/// the statuses this client knows by name.
pub async fn fetch_version_statuses(api: &ApiClient) -> Result<Value, ApiError> {
    api.get(paths::VERSION_STATUSES).await
}
