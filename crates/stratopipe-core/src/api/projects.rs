use std::fmt::Display;

use serde_json::{json, Map, Value};

use crate::client::ApiClient;
use crate::constants::paths;
use crate::error::ApiError;
use crate::models::Project;

pub async fn fetch_projects(api: &ApiClient) -> Result<Vec<Project>, ApiError> {
    api.get(paths::PROJECTS).await
}

pub async fn fetch_project(api: &ApiClient, id: impl Display) -> Result<Project, ApiError> {
    api.get(&paths::project(id)).await
}

/// Create a project. New projects are always created active, whatever
/// the payload says.
pub async fn create_project(
    api: &ApiClient,
    mut payload: Map<String, Value>,
) -> Result<Project, ApiError> {
    payload.insert("active".to_string(), Value::Bool(true));
    api.post(paths::PROJECTS, &payload).await
}

/// Hard delete
pub async fn delete_project(api: &ApiClient, id: impl Display) -> Result<(), ApiError> {
    api.delete(&paths::project(id)).await
}

/// Soft delete: the project is kept but marked inactive
pub async fn deactivate_project(api: &ApiClient, id: impl Display) -> Result<Project, ApiError> {
    api.patch(&paths::project(id), &json!({ "active": false })).await
}
