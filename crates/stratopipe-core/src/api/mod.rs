//! Resource accessors: one HTTP call per function, bodies returned as sent.

pub mod assets;
pub mod auth;
pub mod projects;
pub mod versions;

pub use assets::{
    fetch_asset, fetch_asset_versions, fetch_assets, fetch_assets_for_project, upload_asset,
    version_up,
};
pub use auth::{login, logout, register};
pub use projects::{create_project, deactivate_project, delete_project, fetch_project, fetch_projects};
pub use versions::fetch_version_statuses;
