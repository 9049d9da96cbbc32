use foundation::ids::WaypointId;
use serde::{Deserialize, Serialize};

pub fn image_filename(id: WaypointId, image: usize) -> String {
    format!("location-{}-image-{}.jpg", id.get(), image)
}

/// Where the two renditions of each waypoint image live.
///
/// Thumbnails ship with the page; full-resolution images come from a CDN.
/// `image` is 1-based, matching the filenames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageSources {
    pub thumbnail_base: String,
    pub cdn_base: String,
    /// Appended as `?v=` to full-resolution URLs when set.
    pub cache_buster: Option<String>,
}

impl Default for ImageSources {
    fn default() -> Self {
        Self {
            thumbnail_base: "/thumbnails".to_string(),
            cdn_base: "https://cdn.jsdelivr.net/gh/ferni2768/corumap-images@main".to_string(),
            cache_buster: None,
        }
    }
}

impl ImageSources {
    pub fn thumbnail(&self, id: WaypointId, image: usize) -> String {
        format!(
            "{}/{}",
            self.thumbnail_base.trim_end_matches('/'),
            image_filename(id, image)
        )
    }

    pub fn full(&self, id: WaypointId, image: usize) -> String {
        let url = format!(
            "{}/{}",
            self.cdn_base.trim_end_matches('/'),
            image_filename(id, image)
        );
        match &self.cache_buster {
            Some(token) => format!("{url}?v={token}"),
            None => url,
        }
    }
}
