pub mod api;
pub mod client;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod hooks;
pub mod images;
pub mod models;
pub mod secure_storage;
pub mod tracing_setup;

#[cfg(test)]
mod test_support;

pub use client::{ApiClient, ApiClientBuilder, UnauthorizedHandler};
pub use config::{AuthScheme, ClientConfig, ConfigError};
pub use credentials::{CredentialProvider, MemoryCredentials, SessionCredentials};
pub use error::ApiError;
pub use hooks::{ImageByType, ProjectBackgroundImage, ProjectImageSource, ProjectImages, ProjectImagesOptions};
pub use images::{ImageCache, ImageService};
pub use secure_storage::{SecureKey, SecureStorage, SecureStorageError};
pub use url::Url;
