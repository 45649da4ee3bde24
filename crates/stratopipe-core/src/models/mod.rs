pub mod asset;
pub mod auth;
pub mod image;
pub mod project;
pub mod version;

pub use asset::{Asset, AssetUpload, AssetVersion, AssetVersions, UploadedAsset, VersionUpload};
pub use auth::{LoginRequest, LoginResponse, RegisterRequest};
pub use image::{ProjectImagesResponse, StoredImage};
pub use project::Project;
pub use version::VersionStatus;
