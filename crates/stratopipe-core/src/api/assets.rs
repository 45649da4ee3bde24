use std::fmt::Display;

use serde_json::Value;

use crate::client::ApiClient;
use crate::constants::paths;
use crate::error::ApiError;
use crate::models::{Asset, AssetUpload, AssetVersions, UploadedAsset, VersionUpload};

pub async fn fetch_assets(api: &ApiClient) -> Result<Vec<Asset>, ApiError> {
    api.get(paths::ASSETS).await
}

pub async fn fetch_assets_for_project(
    api: &ApiClient,
    project_id: impl Display,
) -> Result<Vec<Asset>, ApiError> {
    api.get_query(paths::ASSETS, &[("project", project_id.to_string())]).await
}

pub async fn fetch_asset(api: &ApiClient, id: impl Display) -> Result<Asset, ApiError> {
    api.get(&paths::asset(id)).await
}

pub async fn fetch_asset_versions(
    api: &ApiClient,
    id: impl Display,
) -> Result<AssetVersions, ApiError> {
    api.get(&paths::asset_versions(id)).await
}

pub async fn upload_asset(api: &ApiClient, upload: AssetUpload) -> Result<UploadedAsset, ApiError> {
    api.post_multipart(paths::ASSET_UPLOAD, upload.into_form()?).await
}

/// Publish a new version of an existing asset
pub async fn version_up(
    api: &ApiClient,
    id: impl Display,
    upload: VersionUpload,
) -> Result<Value, ApiError> {
    api.post_multipart(&paths::asset_version_up(id), upload.into_form()?)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::MemoryCredentials;
    use crate::test_support::{MockRoute, MockServer};
    use reqwest::{Method, StatusCode};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fetch_assets_for_project_sends_query() {
        let server = MockServer::start(vec![MockRoute::json(
            Method::GET,
            "/api/assets/",
            json!([{"id": 1, "project": 3, "name": "Cyber Helmet"}]),
        )])
        .await;
        let api = server.anonymous_client();

        let assets = fetch_assets_for_project(&api, 3).await.unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(server.last_request().query.as_deref(), Some("project=3"));

        fetch_assets(&api).await.unwrap();
        assert_eq!(server.last_request().query, None);
    }

    #[tokio::test]
    async fn test_fetch_asset_and_versions() {
        let server = MockServer::start(vec![
            MockRoute::json(Method::GET, "/api/assets/12/", json!({"id": 12, "name": "Helmet"})),
            MockRoute::json(
                Method::GET,
                "/api/assets/12/versions/",
                json!({"asset": 12, "versions": [{"id": 1, "number": 1}, {"id": 2, "number": 2}]}),
            ),
        ])
        .await;
        let api = server.anonymous_client();

        let asset = fetch_asset(&api, 12).await.unwrap();
        assert_eq!(asset.name, "Helmet");

        let versions = fetch_asset_versions(&api, 12).await.unwrap();
        assert_eq!(versions.latest().map(|v| v.number), Some(2));
    }

    #[tokio::test]
    async fn test_upload_asset_is_multipart_with_csrf() {
        let server = MockServer::start(vec![MockRoute::new(
            Method::POST,
            "/api/assets/upload/",
            StatusCode::CREATED,
            json!({"id": 40, "name": "Helmet", "project": 3, "file": "/media/USER_DATA/a/helmet.png"})
                .to_string(),
        )])
        .await;
        let api = server.client(Arc::new(
            MemoryCredentials::new().with_token("t").with_csrf_token("c"),
        ));

        let upload = AssetUpload {
            project: "3".to_string(),
            name: "Helmet".to_string(),
            asset_type: Some("Prop".to_string()),
            description: None,
            file_name: "helmet.png".to_string(),
            data: b"png-bytes".to_vec(),
            mime_type: Some("image/png".to_string()),
        };
        let uploaded = upload_asset(&api, upload).await.unwrap();
        assert_eq!(uploaded.id, 40);

        let request = server.last_request();
        assert!(request
            .header("content-type")
            .unwrap()
            .starts_with("multipart/form-data"));
        assert_eq!(request.header("x-csrftoken"), Some("c"));
        let body = String::from_utf8_lossy(&request.body);
        assert!(body.contains("name=\"asset_type\""));
        assert!(body.contains("filename=\"helmet.png\""));
        assert!(body.contains("png-bytes"));
    }

    #[tokio::test]
    async fn test_version_up_returns_body_unmodified() {
        let server = MockServer::start(vec![MockRoute::json(
            Method::POST,
            "/api/assets/12/version-up/",
            json!({"asset": 12, "number": 3, "extra": [1, 2]}),
        )])
        .await;
        let api = server.anonymous_client();

        let upload = VersionUpload {
            file_name: "v3.exr".to_string(),
            data: vec![0u8; 16],
            description: Some("relit".to_string()),
            mime_type: None,
        };
        let body = version_up(&api, 12, upload).await.unwrap();
        assert_eq!(body, json!({"asset": 12, "number": 3, "extra": [1, 2]}));
    }

    #[tokio::test]
    async fn test_upload_error_body_is_not_normalized() {
        let server = MockServer::start(vec![MockRoute::new(
            Method::POST,
            "/api/assets/upload/",
            StatusCode::BAD_REQUEST,
            r#"{"error": "project, name and file are required."}"#,
        )])
        .await;
        let api = server.anonymous_client();

        let upload = AssetUpload {
            project: String::new(),
            name: String::new(),
            asset_type: None,
            description: None,
            file_name: "x.bin".to_string(),
            data: Vec::new(),
            mime_type: None,
        };
        let err = upload_asset(&api, upload).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(
            err.body(),
            Some(r#"{"error": "project, name and file are required."}"#)
        );
    }
}
