use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::version::VersionStatus;

/// A production asset (prop, character sheet, plate...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: i64,
    #[serde(default)]
    pub project: Option<i64>,
    #[serde(default)]
    pub uploaded_by: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub asset_type: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub versions: Vec<AssetVersion>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Asset {
    pub fn version_status(&self) -> Option<VersionStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetVersion {
    pub id: i64,
    pub number: u32,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Id of the user who published the version
    #[serde(default)]
    pub user: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `assets/{id}/versions/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetVersions {
    pub asset: i64,
    #[serde(default)]
    pub versions: Vec<AssetVersion>,
}

impl AssetVersions {
    /// Highest-numbered version
    pub fn latest(&self) -> Option<&AssetVersion> {
        self.versions.iter().max_by_key(|v| v.number)
    }

    pub fn by_number(&self, number: u32) -> Option<&AssetVersion> {
        self.versions.iter().find(|v| v.number == number)
    }
}

/// Body returned by `assets/upload/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedAsset {
    pub id: i64,
    pub name: String,
    pub project: i64,
    #[serde(default)]
    pub file: Option<String>,
}

/// Multipart payload for `assets/upload/`
#[derive(Debug, Clone)]
pub struct AssetUpload {
    pub project: String,
    pub name: String,
    pub asset_type: Option<String>,
    pub description: Option<String>,
    pub file_name: String,
    pub data: Vec<u8>,
    pub mime_type: Option<String>,
}

impl AssetUpload {
    pub async fn from_path(
        project: impl Into<String>,
        name: impl Into<String>,
        path: &Path,
    ) -> std::io::Result<Self> {
        let data = tokio::fs::read(path).await?;
        Ok(Self {
            project: project.into(),
            name: name.into(),
            asset_type: None,
            description: None,
            file_name: file_name_of(path),
            data,
            mime_type: None,
        })
    }

    pub fn into_form(self) -> Result<Form, reqwest::Error> {
        let mut form = Form::new()
            .text("project", self.project)
            .text("name", self.name);
        if let Some(asset_type) = self.asset_type {
            form = form.text("asset_type", asset_type);
        }
        if let Some(description) = self.description {
            form = form.text("description", description);
        }
        Ok(form.part("file", file_part(self.data, self.file_name, self.mime_type)?))
    }
}

/// Multipart payload for `assets/{id}/version-up/`
#[derive(Debug, Clone)]
pub struct VersionUpload {
    pub file_name: String,
    pub data: Vec<u8>,
    pub description: Option<String>,
    pub mime_type: Option<String>,
}

impl VersionUpload {
    pub async fn from_path(path: &Path, description: Option<String>) -> std::io::Result<Self> {
        let data = tokio::fs::read(path).await?;
        Ok(Self {
            file_name: file_name_of(path),
            data,
            description,
            mime_type: None,
        })
    }

    pub fn into_form(self) -> Result<Form, reqwest::Error> {
        let mut form = Form::new();
        if let Some(description) = self.description {
            form = form.text("description", description);
        }
        Ok(form.part("file", file_part(self.data, self.file_name, self.mime_type)?))
    }
}

fn file_part(data: Vec<u8>, file_name: String, mime_type: Option<String>) -> Result<Part, reqwest::Error> {
    let part = Part::bytes(data).file_name(file_name);
    match mime_type {
        Some(mime) => part.mime_str(&mime),
        None => Ok(part),
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.bin".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_asset_with_versions() {
        let json = r#"{
            "id": 12,
            "project": 3,
            "owner": 5,
            "name": "Cyber Helmet",
            "description": "",
            "asset_type": "Prop",
            "status": "work_in_progress",
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z",
            "versions": [
                {"id": 1, "number": 1, "file": "/media/a_v1.png", "description": "first", "user": 5, "created_at": "2024-05-01T10:00:00Z"}
            ]
        }"#;
        let asset: Asset = serde_json::from_str(json).unwrap();
        assert_eq!(asset.project, Some(3));
        assert_eq!(asset.versions.len(), 1);
        assert_eq!(asset.version_status(), Some(VersionStatus::WorkInProgress));
        assert_eq!(asset.extra.get("owner"), Some(&Value::from(5)));
    }

    #[test]
    fn test_latest_version() {
        let json = r#"{"asset": 12, "versions": [
            {"id": 1, "number": 1},
            {"id": 3, "number": 3},
            {"id": 2, "number": 2}
        ]}"#;
        let versions: AssetVersions = serde_json::from_str(json).unwrap();
        assert_eq!(versions.latest().map(|v| v.id), Some(3));
        assert_eq!(versions.by_number(2).map(|v| v.id), Some(2));
        assert!(versions.by_number(9).is_none());

        let empty: AssetVersions = serde_json::from_str(r#"{"asset": 1}"#).unwrap();
        assert!(empty.latest().is_none());
    }

    #[tokio::test]
    async fn test_upload_from_path_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("helmet.png");
        std::fs::write(&path, b"png-bytes").unwrap();

        let upload = AssetUpload::from_path("3", "Cyber Helmet", &path).await.unwrap();
        assert_eq!(upload.file_name, "helmet.png");
        assert_eq!(upload.data, b"png-bytes");
        assert!(upload.into_form().is_ok());
    }

    #[test]
    fn test_invalid_mime_type_is_rejected() {
        let upload = VersionUpload {
            file_name: "v2.png".to_string(),
            data: vec![1, 2, 3],
            description: None,
            mime_type: Some("not a mime".to_string()),
        };
        assert!(upload.into_form().is_err());
    }
}
