//! Application-wide constants
//!
//! Fixed names shared by the HTTP client, the credential stores and the
//! resource accessors.

/// Base URL used when neither the configuration nor the environment supplies one
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/";

/// Environment variable that overrides the API base URL
pub const BASE_URL_ENV: &str = "STRATOPIPE_API_URL";

/// Environment variable that enables the file logging layer
pub const LOG_FILE_ENV: &str = "STRATOPIPE_LOG_FILE";

/// Login page, resolved relative to the current location on a 401
pub const DEFAULT_LOGIN_PAGE: &str = "login.html";

// Credential names
/// Cookie that carries the server-issued anti-forgery token
pub const CSRF_COOKIE: &str = "csrftoken";
/// Header the CSRF token is echoed in on unsafe methods
pub const CSRF_HEADER: &str = "X-CSRFToken";
/// Key the bearer token is persisted under
pub const AUTH_TOKEN_KEY: &str = "authToken";
/// Key the logged-in user's profile is persisted under
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Prefix of the per-asset media URLs handed to image consumers
pub const ASSET_MEDIA_PREFIX: &str = "/api/assets";

/// REST paths, relative to the base URL
pub mod paths {
    pub const PROJECTS: &str = "projects/";
    pub const ASSETS: &str = "assets/";
    pub const ASSET_UPLOAD: &str = "assets/upload/";
    pub const PROJECT_IMAGES: &str = "assets/project-images/";
    pub const VERSION_STATUSES: &str = "versions/statuses/";
    pub const LOGIN: &str = "auth/login/";
    pub const REGISTER: &str = "auth/register/";
    pub const CSRF: &str = "csrf/";

    pub fn project(id: impl std::fmt::Display) -> String {
        format!("projects/{}/", id)
    }

    pub fn asset(id: impl std::fmt::Display) -> String {
        format!("assets/{}/", id)
    }

    pub fn asset_versions(id: impl std::fmt::Display) -> String {
        format!("assets/{}/versions/", id)
    }

    pub fn asset_version_up(id: impl std::fmt::Display) -> String {
        format!("assets/{}/version-up/", id)
    }
}
