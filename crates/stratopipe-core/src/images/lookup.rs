//! Lookups over a project's image list and URL resolution with fallback.
//!
//! All matching is case-insensitive substring matching; when several images
//! qualify, the earliest in the list wins.

use crate::constants::ASSET_MEDIA_PREFIX;
use crate::models::StoredImage;

/// Keyword synonyms per semantic image type, in priority order
const TYPE_KEYWORDS: &[(&str, &[&str])] = &[
    ("Character", &["character", "portrait", "cyber", "space", "ocean"]),
    ("Environment", &["environment", "city", "space", "ocean", "interior"]),
    ("Prop", &["prop", "weapon", "shield", "technology"]),
    ("Vehicle", &["vehicle", "transportation", "hover"]),
    ("Scene", &["scene", "establishing", "storyboard"]),
];

/// Keywords used to pick a background image for the showcase projects
const PROJECT_KEYWORDS: &[(&str, &[&str])] = &[
    ("Cyber Nexus", &["cyber", "nexus", "city", "cyberpunk"]),
    ("Ocean Depths", &["ocean", "depths", "underwater"]),
    ("Space Odyssey", &["space", "odyssey", "station"]),
];

pub fn asset_image_url(asset_id: i64) -> String {
    format!("{}/{}/image/", ASSET_MEDIA_PREFIX, asset_id)
}

pub fn asset_thumbnail_url(asset_id: i64) -> String {
    format!("{}/{}/thumbnail/", ASSET_MEDIA_PREFIX, asset_id)
}

/// First image whose name contains `name`, or whose name is contained in `name`
pub fn find_image_by_name<'a>(images: &'a [StoredImage], name: &str) -> Option<&'a StoredImage> {
    let query = name.to_lowercase();
    images.iter().find(|image| {
        let image_name = image.name.to_lowercase();
        image_name.contains(&query) || query.contains(&image_name)
    })
}

pub fn find_images_by_category<'a>(
    images: &'a [StoredImage],
    category: &str,
) -> Vec<&'a StoredImage> {
    let query = category.to_lowercase();
    images
        .iter()
        .filter(|image| image.categories.to_lowercase().contains(&query))
        .collect()
}

/// Keywords for a semantic type; an unknown type is its own lowercase keyword
pub fn type_keywords(image_type: &str) -> Vec<String> {
    keywords_from(TYPE_KEYWORDS, image_type)
}

/// Keywords for a project's background image; an unknown project name is
/// its own lowercase keyword
pub fn project_keywords(project_name: &str) -> Vec<String> {
    keywords_from(PROJECT_KEYWORDS, project_name)
}

fn keywords_from(table: &[(&str, &[&str])], key: &str) -> Vec<String> {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, keywords)| keywords.iter().map(|k| k.to_string()).collect())
        .unwrap_or_else(|| vec![key.to_lowercase()])
}

/// Resolve a semantic type to an image.
///
/// Keywords are tried in order and the first keyword with any match decides,
/// so keyword priority beats list position.
pub fn get_image_by_type<'a>(images: &'a [StoredImage], image_type: &str) -> Option<&'a StoredImage> {
    type_keywords(image_type)
        .iter()
        .find_map(|keyword| images.iter().find(|image| image.mentions(keyword)))
}

/// First image in list order that mentions any of `keywords`.
///
/// Unlike [`get_image_by_type`], list position beats keyword priority.
pub fn find_by_any_keyword<'a>(
    images: &'a [StoredImage],
    keywords: &[String],
) -> Option<&'a StoredImage> {
    images
        .iter()
        .find(|image| keywords.iter().any(|keyword| image.mentions(keyword)))
}

/// Name search takes priority over type search; an empty string counts as
/// not given.
pub fn resolve_image<'a>(
    images: &'a [StoredImage],
    name: Option<&str>,
    image_type: Option<&str>,
) -> Option<&'a StoredImage> {
    let name = name.filter(|n| !n.is_empty());
    let image_type = image_type.filter(|t| !t.is_empty());

    match (name, image_type) {
        (Some(name), _) => find_image_by_name(images, name),
        (None, Some(image_type)) => get_image_by_type(images, image_type),
        (None, None) => None,
    }
}

pub fn image_url_with_fallback(
    images: &[StoredImage],
    fallback_url: &str,
    name: Option<&str>,
    image_type: Option<&str>,
) -> String {
    resolve_image(images, name, image_type)
        .map(|image| asset_image_url(image.id))
        .unwrap_or_else(|| fallback_url.to_string())
}

pub fn thumbnail_url_with_fallback(
    images: &[StoredImage],
    fallback_url: &str,
    name: Option<&str>,
    image_type: Option<&str>,
) -> String {
    resolve_image(images, name, image_type)
        .map(|image| asset_thumbnail_url(image.id))
        .unwrap_or_else(|| fallback_url.to_string())
}
