use serde_json::Value;
use tracing::info;

use crate::client::ApiClient;
use crate::constants::paths;
use crate::error::ApiError;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest};

/// Log in and persist the returned token, if the server issues one.
/// Session cookies set by the login response are persisted as well.
pub async fn login(api: &ApiClient, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
    let response: LoginResponse = api.post(paths::LOGIN, credentials).await?;

    if let Some(token) = response.token.as_deref() {
        api.credentials().store_token(token)?;
        info!(username = %credentials.username, "session token stored");
    }
    api.credentials().persist_session()?;

    Ok(response)
}

pub async fn register(api: &ApiClient, registration: &RegisterRequest) -> Result<Value, ApiError> {
    api.post(paths::REGISTER, registration).await
}

/// Forget the stored session token. No request is made.
pub fn logout(api: &ApiClient) -> Result<(), ApiError> {
    api.credentials().clear_token()?;
    Ok(())
}
