use std::sync::Arc;

use tracing::{debug, error};

use super::cache::ImageCache;
use crate::client::ApiClient;
use crate::constants::paths;
use crate::error::ApiError;
use crate::models::{ProjectImagesResponse, StoredImage};

/// Fetches project image metadata through an [`ImageCache`].
///
/// Concurrent misses for the same project are not coalesced: each one goes
/// to the server and the last response written wins.
#[derive(Clone)]
pub struct ImageService {
    api: ApiClient,
    cache: Arc<ImageCache>,
}

impl ImageService {
    pub fn new(api: ApiClient) -> Self {
        Self::with_cache(api, Arc::new(ImageCache::new()))
    }

    pub fn with_cache(api: ApiClient, cache: Arc<ImageCache>) -> Self {
        Self { api, cache }
    }

    pub fn cache(&self) -> &Arc<ImageCache> {
        &self.cache
    }

    /// Cache-first fetch with failures surfaced. Failed fetches are not cached.
    pub async fn try_fetch_project_images(
        &self,
        project_id: &str,
    ) -> Result<Vec<StoredImage>, ApiError> {
        if let Some(images) = self.cache.get(project_id) {
            debug!(project_id, count = images.len(), "image cache hit");
            return Ok(images);
        }

        debug!(project_id, "image cache miss");
        let response: ProjectImagesResponse = self
            .api
            .get_query(paths::PROJECT_IMAGES, &[("project", project_id)])
            .await?;

        if !response.is_consistent() {
            debug!(
                project_id,
                count = response.count,
                received = response.images.len(),
                "image count disagrees with payload"
            );
        }

        self.cache.insert(project_id, response.images.clone());
        Ok(response.images)
    }

    /// Cache-first fetch that never fails: errors are logged and an empty
    /// list is returned so callers can keep rendering.
    pub async fn fetch_project_images(&self, project_id: &str) -> Vec<StoredImage> {
        match self.try_fetch_project_images(project_id).await {
            Ok(images) => images,
            Err(e) => {
                error!(project_id, error = %e, "Error fetching project images");
                Vec::new()
            }
        }
    }

    /// Drop one project's images, or all of them
    pub fn clear_cache(&self, project_id: Option<&str>) -> usize {
        self.cache.clear(project_id)
    }
}
