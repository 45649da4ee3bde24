//! Fetch-on-activate controllers for UI consumers of project images.
//!
//! A controller owns the observable state of one project's image list
//! (`images`, `loading`, `error`) and exposes lookups bound to whatever
//! list it currently holds. State lives behind a lock so a renderer can
//! read it while a fetch is in flight.

use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::error;

use crate::error::ApiError;
use crate::images::{lookup, ImageService};
use crate::models::StoredImage;

/// Where a controller gets its images from
pub trait ProjectImageSource: Send + Sync {
    fn project_images(
        &self,
        project_id: &str,
    ) -> impl Future<Output = Result<Vec<StoredImage>, ApiError>> + Send;

    fn clear_project(&self, project_id: &str);
}

impl ProjectImageSource for ImageService {
    async fn project_images(&self, project_id: &str) -> Result<Vec<StoredImage>, ApiError> {
        Ok(self.fetch_project_images(project_id).await)
    }

    fn clear_project(&self, project_id: &str) {
        self.clear_cache(Some(project_id));
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImagesState {
    pub images: Vec<StoredImage>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProjectImagesOptions {
    pub project_id: String,
    /// Fetch on [`ProjectImages::activate`]
    pub auto_fetch: bool,
}

impl ProjectImagesOptions {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            auto_fetch: true,
        }
    }

    pub fn auto_fetch(mut self, auto_fetch: bool) -> Self {
        self.auto_fetch = auto_fetch;
        self
    }
}

pub struct ProjectImages<S> {
    source: Arc<S>,
    project_id: String,
    auto_fetch: bool,
    state: RwLock<ImagesState>,
}

impl<S: ProjectImageSource> ProjectImages<S> {
    pub fn new(source: Arc<S>, options: ProjectImagesOptions) -> Self {
        Self {
            source,
            project_id: options.project_id,
            auto_fetch: options.auto_fetch,
            state: RwLock::new(ImagesState::default()),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Call when the consumer mounts or its inputs change
    pub async fn activate(&self) {
        if self.auto_fetch {
            self.refetch().await;
        }
    }

    pub async fn refetch(&self) {
        if self.project_id.is_empty() {
            return;
        }

        {
            let mut state = self.state.write();
            state.loading = true;
            state.error = None;
        }

        let result = self.source.project_images(&self.project_id).await;

        let mut state = self.state.write();
        match result {
            Ok(images) => state.images = images,
            Err(e) => {
                error!(project_id = %self.project_id, error = %e, "Error fetching project images");
                state.error = Some(e.to_string());
            }
        }
        state.loading = false;
    }

    pub fn state(&self) -> ImagesState {
        self.state.read().clone()
    }

    pub fn images(&self) -> Vec<StoredImage> {
        self.state.read().images.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    pub fn get_image_url(
        &self,
        fallback_url: &str,
        name: Option<&str>,
        image_type: Option<&str>,
    ) -> String {
        lookup::image_url_with_fallback(&self.state.read().images, fallback_url, name, image_type)
    }

    pub fn get_thumbnail_url(
        &self,
        fallback_url: &str,
        name: Option<&str>,
        image_type: Option<&str>,
    ) -> String {
        lookup::thumbnail_url_with_fallback(&self.state.read().images, fallback_url, name, image_type)
    }

    pub fn find_image_by_name(&self, name: &str) -> Option<StoredImage> {
        lookup::find_image_by_name(&self.state.read().images, name).cloned()
    }

    pub fn find_images_by_category(&self, category: &str) -> Vec<StoredImage> {
        lookup::find_images_by_category(&self.state.read().images, category)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Drop this project's cached images; the next refetch goes to the server
    pub fn clear_cache(&self) {
        self.source.clear_project(&self.project_id);
    }

    fn find_by_keywords(&self, keywords: &[String]) -> Option<StoredImage> {
        lookup::find_by_any_keyword(&self.state.read().images, keywords).cloned()
    }
}

/// First image of a project matching a semantic type (`Character`, `Prop`...)
pub struct ImageByType<S> {
    images: ProjectImages<S>,
    keywords: Vec<String>,
}

impl<S: ProjectImageSource> ImageByType<S> {
    pub fn new(source: Arc<S>, project_id: impl Into<String>, image_type: &str) -> Self {
        Self {
            images: ProjectImages::new(source, ProjectImagesOptions::new(project_id)),
            keywords: lookup::type_keywords(image_type),
        }
    }

    pub async fn activate(&self) {
        self.images.activate().await;
    }

    pub fn image(&self) -> Option<StoredImage> {
        self.images.find_by_keywords(&self.keywords)
    }

    pub fn image_url(&self) -> Option<String> {
        self.image().map(|image| lookup::asset_image_url(image.id))
    }

    pub fn thumbnail_url(&self) -> Option<String> {
        self.image().map(|image| lookup::asset_thumbnail_url(image.id))
    }

    pub fn loading(&self) -> bool {
        self.images.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.images.error()
    }
}

/// Background artwork for a project, picked by the project's name
pub struct ProjectBackgroundImage<S> {
    images: ProjectImages<S>,
    keywords: Vec<String>,
}

impl<S: ProjectImageSource> ProjectBackgroundImage<S> {
    pub fn new(source: Arc<S>, project_id: impl Into<String>, project_name: &str) -> Self {
        Self {
            images: ProjectImages::new(source, ProjectImagesOptions::new(project_id)),
            keywords: lookup::project_keywords(project_name),
        }
    }

    pub async fn activate(&self) {
        self.images.activate().await;
    }

    pub fn background_image(&self) -> Option<StoredImage> {
        self.images.find_by_keywords(&self.keywords)
    }

    pub fn image_url(&self) -> Option<String> {
        self.background_image()
            .map(|image| lookup::asset_image_url(image.id))
    }

    pub fn loading(&self) -> bool {
        self.images.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.images.error()
    }
}
