//! CDN cache purging for the waypoint image set.

use foundation::ids::WaypointId;
use gallery::image_filename;
use serde::Serialize;

pub const DEFAULT_PURGE_BASE: &str = "https://purge.jsdelivr.net/gh/ferni2768/corumap-images@main";

/// Purge URL for every image of waypoints `1..=locations`.
pub fn purge_urls(base: &str, locations: u32, images_per_location: usize) -> Vec<String> {
    let base = base.trim_end_matches('/');
    (1..=locations)
        .flat_map(|id| {
            (1..=images_per_location)
                .map(move |n| format!("{base}/{}", image_filename(WaypointId(id), n)))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurgeResult {
    pub url: String,
    pub ok: bool,
    /// HTTP status or transport error.
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PurgeSummary {
    pub total: usize,
    pub purged: usize,
    pub failed: Vec<String>,
}

impl PurgeSummary {
    pub fn from_results(results: &[PurgeResult]) -> Self {
        Self {
            total: results.len(),
            purged: results.iter().filter(|r| r.ok).count(),
            failed: results
                .iter()
                .filter(|r| !r.ok)
                .map(|r| r.url.clone())
                .collect(),
        }
    }

    pub fn all_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_PURGE_BASE, PurgeResult, PurgeSummary, purge_urls};
    use pretty_assertions::assert_eq;

    #[test]
    fn covers_every_image() {
        let urls = purge_urls(DEFAULT_PURGE_BASE, 10, 3);
        assert_eq!(urls.len(), 30);
        assert_eq!(
            urls[0],
            "https://purge.jsdelivr.net/gh/ferni2768/corumap-images@main/location-1-image-1.jpg"
        );
        assert!(urls[29].ends_with("/location-10-image-3.jpg"));
    }

    #[test]
    fn trailing_slash_is_ignored() {
        let urls = purge_urls("https://purge.example/", 1, 1);
        assert_eq!(urls, vec!["https://purge.example/location-1-image-1.jpg".to_string()]);
    }

    #[test]
    fn summary_counts_failures() {
        let results = vec![
            PurgeResult {
                url: "a".to_string(),
                ok: true,
                detail: "200 OK".to_string(),
            },
            PurgeResult {
                url: "b".to_string(),
                ok: false,
                detail: "timed out".to_string(),
            },
        ];
        let summary = PurgeSummary::from_results(&results);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.purged, 1);
        assert_eq!(summary.failed, vec!["b".to_string()]);
        assert!(!summary.all_ok());
    }
}
