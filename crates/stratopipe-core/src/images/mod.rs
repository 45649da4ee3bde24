//! Project image metadata: cache, fetch, and lookup.

pub mod cache;
pub mod lookup;
pub mod service;

pub use cache::ImageCache;
pub use lookup::{
    asset_image_url, asset_thumbnail_url, find_by_any_keyword, find_image_by_name,
    find_images_by_category, get_image_by_type, image_url_with_fallback, project_keywords,
    resolve_image, thumbnail_url_with_fallback, type_keywords,
};
pub use service::ImageService;
