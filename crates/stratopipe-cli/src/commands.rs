use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Map, Value};
use stratopipe_core::api;
use stratopipe_core::hooks::{ProjectImages, ProjectImagesOptions};
use stratopipe_core::images::{find_image_by_name, get_image_by_type};
use stratopipe_core::models::{AssetUpload, LoginRequest, RegisterRequest, VersionUpload};
use stratopipe_core::{ApiClient, ImageService, SecureKey, SecureStorage};
use tracing::warn;

fn to_json<T: Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value).context("Failed to serialize response")
}

pub async fn login(client: &ApiClient, username: String, password: String) -> Result<Value> {
    let response = api::login(client, &LoginRequest { username, password }).await?;

    if let Some(user) = &response.user {
        if let Err(e) = SecureStorage::set(SecureKey::CurrentUser, &user.to_string()) {
            warn!(error = %e, "could not persist current user");
        }
    }
    to_json(response)
}

pub fn logout(client: &ApiClient) -> Result<Value> {
    api::logout(client)?;
    SecureStorage::delete(SecureKey::CurrentUser)?;
    Ok(json!({ "loggedOut": true }))
}

pub async fn register(
    client: &ApiClient,
    username: String,
    email: Option<String>,
    password: String,
) -> Result<Value> {
    let registration = RegisterRequest {
        username,
        email,
        password,
    };
    Ok(api::register(client, &registration).await?)
}

pub async fn list_projects(client: &ApiClient) -> Result<Value> {
    to_json(api::fetch_projects(client).await?)
}

pub async fn show_project(client: &ApiClient, id: &str) -> Result<Value> {
    to_json(api::fetch_project(client, id).await?)
}

pub async fn create_project(
    client: &ApiClient,
    name: String,
    description: Option<String>,
) -> Result<Value> {
    let mut payload = Map::new();
    payload.insert("name".to_string(), Value::String(name));
    if let Some(description) = description {
        payload.insert("description".to_string(), Value::String(description));
    }
    to_json(api::create_project(client, payload).await?)
}

pub async fn delete_project(client: &ApiClient, id: &str) -> Result<Value> {
    api::delete_project(client, id).await?;
    Ok(json!({ "deleted": id }))
}

pub async fn deactivate_project(client: &ApiClient, id: &str) -> Result<Value> {
    to_json(api::deactivate_project(client, id).await?)
}

pub async fn list_assets(client: &ApiClient, project: Option<&str>) -> Result<Value> {
    let assets = match project {
        Some(project) => api::fetch_assets_for_project(client, project).await?,
        None => api::fetch_assets(client).await?,
    };
    to_json(assets)
}

pub async fn show_asset(client: &ApiClient, id: &str) -> Result<Value> {
    to_json(api::fetch_asset(client, id).await?)
}

pub async fn asset_versions(client: &ApiClient, id: &str, latest: bool) -> Result<Value> {
    let versions = api::fetch_asset_versions(client, id).await?;
    if latest {
        return to_json(versions.latest());
    }
    to_json(versions)
}

pub struct UploadArgs<'a> {
    pub project: String,
    pub name: String,
    pub asset_type: Option<String>,
    pub description: Option<String>,
    pub file: &'a Path,
}

pub async fn upload_asset(client: &ApiClient, args: UploadArgs<'_>) -> Result<Value> {
    let mut upload = AssetUpload::from_path(args.project, args.name, args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    upload.asset_type = args.asset_type;
    upload.description = args.description;
    to_json(api::upload_asset(client, upload).await?)
}

pub async fn version_up(
    client: &ApiClient,
    id: &str,
    file: &Path,
    description: Option<String>,
) -> Result<Value> {
    let upload = VersionUpload::from_path(file, description)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    Ok(api::version_up(client, id, upload).await?)
}

pub async fn version_statuses(client: &ApiClient) -> Result<Value> {
    Ok(api::fetch_version_statuses(client).await?)
}

pub async fn list_images(client: &ApiClient, project: &str) -> Result<Value> {
    let service = ImageService::new(client.clone());
    to_json(service.try_fetch_project_images(project).await?)
}

/// Name search first, then type search; `null` when nothing matches
pub async fn find_image(
    client: &ApiClient,
    project: &str,
    name: Option<&str>,
    image_type: Option<&str>,
) -> Result<Value> {
    let service = ImageService::new(client.clone());
    let images = service.try_fetch_project_images(project).await?;

    let found = match (name, image_type) {
        (Some(name), _) => find_image_by_name(&images, name),
        (None, Some(image_type)) => get_image_by_type(&images, image_type),
        (None, None) => anyhow::bail!("Pass --name or --type"),
    };
    to_json(found)
}

pub struct UrlArgs<'a> {
    pub project: &'a str,
    pub name: Option<&'a str>,
    pub image_type: Option<&'a str>,
    pub fallback: &'a str,
    pub thumbnail: bool,
}

pub async fn image_url(client: &ApiClient, args: UrlArgs<'_>) -> Result<Value> {
    let service = Arc::new(ImageService::new(client.clone()));
    let images = ProjectImages::new(service, ProjectImagesOptions::new(args.project));
    images.activate().await;

    let url = if args.thumbnail {
        images.get_thumbnail_url(args.fallback, args.name, args.image_type)
    } else {
        images.get_image_url(args.fallback, args.name, args.image_type)
    };
    Ok(json!({ "project": args.project, "url": url }))
}
