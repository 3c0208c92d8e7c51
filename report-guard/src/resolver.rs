//! Maps requested dimensions and filters onto exactly one report type.
//!
//! Many key combinations are valid for more than one report type, so the
//! choice is made by precedence: [`BRANCHES`] is scanned in order and the
//! first branch whose anchor matches decides. Requests scoped to curated
//! playlists only consider branches that have a playlist counterpart. When
//! nothing matches, the basic activity reports are used.
//!
//! # Examples
//!
//! ```rust
//! use report_guard::resolver;
//! use std::collections::{BTreeMap, BTreeSet};
//!
//! let dimensions: BTreeSet<String> = ["province".to_string(), "liveOrOnDemand".to_string()].into();
//! let filters: BTreeMap<String, String> = [("country".to_string(), "US".to_string())].into();
//!
//! let report = resolver::determine(&dimensions, &filters);
//! assert_eq!(report.name(), "Geography-based playback details (live, US)");
//! ```

use crate::catalog::ReportTypeId;
use crate::core::ReportType;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

/// The requested keys the resolver looks at.
#[derive(Debug, Clone, Copy)]
pub struct RequestKeys<'a> {
    dimensions: &'a BTreeSet<String>,
    filters: &'a BTreeMap<String, String>,
}

impl<'a> RequestKeys<'a> {
    /// Borrows the key sets of a request.
    pub fn new(dimensions: &'a BTreeSet<String>, filters: &'a BTreeMap<String, String>) -> Self {
        Self {
            dimensions,
            filters,
        }
    }

    /// Present as a dimension.
    pub fn dimension(&self, name: &str) -> bool {
        self.dimensions.contains(name)
    }

    /// Present as a filter key.
    pub fn filter(&self, key: &str) -> bool {
        self.filters.contains_key(key)
    }

    /// Present as a dimension or as a filter.
    pub fn either(&self, name: &str) -> bool {
        self.dimension(name) || self.filter(name)
    }

    /// Returns true for requests scoped to curated playlists.
    pub fn is_curated(&self) -> bool {
        self.filters.get("isCurated").is_some_and(|v| v == "1") || self.filter("playlist")
    }
}

type Select = fn(&RequestKeys<'_>) -> ReportTypeId;

/// One entry of the decision table.
#[derive(Clone, Copy)]
pub struct Branch {
    /// The key whose presence the branch tests for.
    pub anchor: &'static str,
    matches: fn(&RequestKeys<'_>) -> bool,
    standard: Select,
    /// `None` when no playlist report type exists for this anchor.
    curated: Option<Select>,
}

impl Branch {
    /// Returns the report type this branch picks, if it applies.
    pub fn select(&self, keys: &RequestKeys<'_>) -> Option<ReportTypeId> {
        if !(self.matches)(keys) {
            return None;
        }
        if keys.is_curated() {
            self.curated.map(|select| select(keys))
        } else {
            Some((self.standard)(keys))
        }
    }

    pub fn has_playlist_variant(&self) -> bool {
        self.curated.is_some()
    }
}

impl std::fmt::Debug for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Branch")
            .field("anchor", &self.anchor)
            .field("playlist", &self.curated.is_some())
            .finish()
    }
}

/// The decision table, highest precedence first.
pub static BRANCHES: [Branch; 19] = [
    Branch {
        anchor: "adType",
        matches: |k| k.dimension("adType"),
        standard: |_| ReportTypeId::AdPerformance,
        curated: None,
    },
    Branch {
        anchor: "sharingService",
        matches: |k| k.dimension("sharingService"),
        standard: |_| ReportTypeId::EngagementAndContentSharing,
        curated: None,
    },
    Branch {
        anchor: "elapsedVideoTimeRatio",
        matches: |k| k.dimension("elapsedVideoTimeRatio"),
        standard: |_| ReportTypeId::AudienceRetention,
        curated: None,
    },
    Branch {
        anchor: "playlist",
        matches: |k| k.dimension("playlist"),
        standard: |_| ReportTypeId::TopPlaylists,
        curated: Some(|_| ReportTypeId::TopPlaylists),
    },
    Branch {
        anchor: "city",
        matches: |k| k.dimension("city"),
        standard: |_| ReportTypeId::GeographyBasedActivityByCity,
        curated: None,
    },
    Branch {
        anchor: "insightPlaybackLocationType",
        matches: |k| k.dimension("insightPlaybackLocationType"),
        standard: |_| ReportTypeId::PlaybackLocation,
        curated: Some(|_| ReportTypeId::PlaybackLocationPlaylist),
    },
    Branch {
        anchor: "insightPlaybackLocationDetail",
        matches: |k| k.dimension("insightPlaybackLocationDetail"),
        standard: |_| ReportTypeId::PlaybackLocationDetail,
        curated: Some(|_| ReportTypeId::PlaybackLocationDetailPlaylist),
    },
    Branch {
        anchor: "insightTrafficSourceType",
        matches: |k| k.dimension("insightTrafficSourceType"),
        standard: |_| ReportTypeId::TrafficSource,
        curated: Some(|_| ReportTypeId::TrafficSourcePlaylist),
    },
    Branch {
        anchor: "insightTrafficSourceDetail",
        matches: |k| k.dimension("insightTrafficSourceDetail"),
        standard: |_| ReportTypeId::TrafficSourceDetail,
        curated: Some(|_| ReportTypeId::TrafficSourceDetailPlaylist),
    },
    Branch {
        anchor: "ageGroup|gender",
        matches: |k| k.dimension("ageGroup") || k.dimension("gender"),
        standard: |_| ReportTypeId::ViewerDemographics,
        curated: Some(|_| ReportTypeId::ViewerDemographicsPlaylist),
    },
    Branch {
        anchor: "deviceType",
        matches: |k| k.dimension("deviceType"),
        standard: |k| {
            if k.dimension("operatingSystem") {
                ReportTypeId::DeviceTypeAndOperatingSystem
            } else {
                ReportTypeId::DeviceType
            }
        },
        curated: Some(|k| {
            if k.dimension("operatingSystem") {
                ReportTypeId::DeviceTypeAndOperatingSystemPlaylist
            } else {
                ReportTypeId::DeviceTypePlaylist
            }
        }),
    },
    Branch {
        anchor: "operatingSystem",
        matches: |k| k.dimension("operatingSystem"),
        standard: |_| ReportTypeId::OperatingSystem,
        curated: Some(|_| ReportTypeId::OperatingSystemPlaylist),
    },
    Branch {
        anchor: "video",
        matches: |k| k.dimension("video"),
        standard: |k| {
            if k.filter("province") {
                ReportTypeId::TopVideosUS
            } else if k.filter("liveOrOnDemand") {
                ReportTypeId::TopVideosPlaybackDetail
            } else if k.filter("youtubeProduct") {
                ReportTypeId::TopVideosYouTubeProduct
            } else if k.filter("subscribedStatus") {
                ReportTypeId::TopVideosSubscribed
            } else {
                ReportTypeId::TopVideosRegional
            }
        },
        curated: None,
    },
    Branch {
        anchor: "country",
        matches: |k| k.dimension("country"),
        standard: |k| {
            if k.either("liveOrOnDemand") {
                ReportTypeId::PlaybackDetailsLiveGeographyBased
            } else if k.either("subscribedStatus") || k.either("youtubeProduct") {
                ReportTypeId::PlaybackDetailsViewPercentageGeographyBased
            } else {
                ReportTypeId::GeographyBasedActivity
            }
        },
        curated: Some(|_| ReportTypeId::GeographyBasedActivityPlaylist),
    },
    Branch {
        anchor: "province",
        matches: |k| k.dimension("province"),
        standard: |k| {
            if k.either("liveOrOnDemand") {
                ReportTypeId::PlaybackDetailsLiveGeographyBasedUS
            } else if k.either("subscribedStatus") || k.either("youtubeProduct") {
                ReportTypeId::PlaybackDetailsViewPercentageGeographyBasedUS
            } else {
                ReportTypeId::GeographyBasedActivityUS
            }
        },
        curated: Some(|_| ReportTypeId::GeographyBasedActivityUSPlaylist),
    },
    Branch {
        anchor: "youtubeProduct",
        matches: |k| k.either("youtubeProduct"),
        standard: |k| {
            if k.either("liveOrOnDemand") {
                ReportTypeId::PlaybackDetailsLiveTimeBased
            } else {
                ReportTypeId::PlaybackDetailsViewPercentageTimeBased
            }
        },
        curated: None,
    },
    Branch {
        anchor: "liveOrOnDemand",
        matches: |k| k.either("liveOrOnDemand"),
        standard: |_| ReportTypeId::PlaybackDetailsLiveTimeBased,
        curated: None,
    },
    Branch {
        anchor: "subscribedStatus",
        matches: |k| k.dimension("subscribedStatus"),
        standard: |k| {
            if k.filter("province") {
                ReportTypeId::PlaybackDetailsSubscribedStatusUS
            } else {
                ReportTypeId::PlaybackDetailsSubscribedStatus
            }
        },
        curated: None,
    },
    Branch {
        anchor: "day|month",
        matches: |k| k.dimension("day") || k.dimension("month"),
        standard: |k| {
            if k.filter("province") {
                ReportTypeId::TimeBasedActivityUS
            } else {
                ReportTypeId::TimeBasedActivity
            }
        },
        curated: Some(|_| ReportTypeId::TimeBasedActivityPlaylist),
    },
];

fn fallback(keys: &RequestKeys<'_>) -> ReportTypeId {
    if keys.is_curated() {
        ReportTypeId::BasicUserActivityPlaylist
    } else if keys.filter("province") {
        ReportTypeId::BasicUserActivityUS
    } else {
        ReportTypeId::BasicUserActivity
    }
}

/// The anchors of [`BRANCHES`], in precedence order.
pub fn anchors() -> impl Iterator<Item = &'static str> {
    BRANCHES.iter().map(|branch| branch.anchor)
}

/// Picks the report type identifier for a request.
pub fn determine_id(
    dimensions: &BTreeSet<String>,
    filters: &BTreeMap<String, String>,
) -> ReportTypeId {
    let keys = RequestKeys::new(dimensions, filters);
    let (anchor, id) = BRANCHES
        .iter()
        .find_map(|branch| branch.select(&keys).map(|id| (branch.anchor, id)))
        .unwrap_or_else(|| ("fallback", fallback(&keys)));

    debug!(
        anchor,
        curated = keys.is_curated(),
        report_type = id.name(),
        "Report type determined"
    );
    id
}

/// Picks the report type for a request.
///
/// Always returns an entry; whether the request is valid for it is decided
/// by [`ReportType::validate`].
#[instrument(skip_all, fields(dimensions = ?dimensions, filters = ?filters.keys().collect::<Vec<_>>()))]
pub fn determine(
    dimensions: &BTreeSet<String>,
    filters: &BTreeMap<String, String>,
) -> &'static ReportType {
    determine_id(dimensions, filters).report_type()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(dimensions: &[&str], filters: &[(&str, &str)]) -> ReportTypeId {
        let dimensions: BTreeSet<String> = dimensions.iter().map(|d| d.to_string()).collect();
        let filters: BTreeMap<String, String> = filters
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        determine_id(&dimensions, &filters)
    }

    #[test]
    fn test_branch_order_is_pinned() {
        let order: Vec<&str> = anchors().collect();
        assert_eq!(
            order,
            vec![
                "adType",
                "sharingService",
                "elapsedVideoTimeRatio",
                "playlist",
                "city",
                "insightPlaybackLocationType",
                "insightPlaybackLocationDetail",
                "insightTrafficSourceType",
                "insightTrafficSourceDetail",
                "ageGroup|gender",
                "deviceType",
                "operatingSystem",
                "video",
                "country",
                "province",
                "youtubeProduct",
                "liveOrOnDemand",
                "subscribedStatus",
                "day|month",
            ]
        );
    }

    #[test]
    fn test_playlist_variants() {
        let with_playlists: Vec<&str> = BRANCHES
            .iter()
            .filter(|b| b.has_playlist_variant())
            .map(|b| b.anchor)
            .collect();
        assert_eq!(
            with_playlists,
            vec![
                "playlist",
                "insightPlaybackLocationType",
                "insightPlaybackLocationDetail",
                "insightTrafficSourceType",
                "insightTrafficSourceDetail",
                "ageGroup|gender",
                "deviceType",
                "operatingSystem",
                "country",
                "province",
                "day|month",
            ]
        );
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            resolve(&["adType", "sharingService"], &[]),
            ReportTypeId::AdPerformance
        );
        assert_eq!(
            resolve(&["sharingService", "elapsedVideoTimeRatio"], &[]),
            ReportTypeId::EngagementAndContentSharing
        );
        assert_eq!(
            resolve(&["city", "country", "day"], &[]),
            ReportTypeId::GeographyBasedActivityByCity
        );
        assert_eq!(
            resolve(&["deviceType", "operatingSystem"], &[]),
            ReportTypeId::DeviceTypeAndOperatingSystem
        );
        assert_eq!(resolve(&["operatingSystem", "day"], &[]), ReportTypeId::OperatingSystem);
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(resolve(&[], &[]), ReportTypeId::BasicUserActivity);
        assert_eq!(
            resolve(&[], &[("province", "US-OH")]),
            ReportTypeId::BasicUserActivityUS
        );
        assert_eq!(
            resolve(&[], &[("isCurated", "1")]),
            ReportTypeId::BasicUserActivityPlaylist
        );
    }

    #[test]
    fn test_time_based() {
        assert_eq!(resolve(&["day"], &[]), ReportTypeId::TimeBasedActivity);
        assert_eq!(
            resolve(&["month"], &[("province", "US-CA")]),
            ReportTypeId::TimeBasedActivityUS
        );
        assert_eq!(
            resolve(&["day"], &[("isCurated", "1")]),
            ReportTypeId::TimeBasedActivityPlaylist
        );
    }

    #[test]
    fn test_geography() {
        assert_eq!(resolve(&["country"], &[]), ReportTypeId::GeographyBasedActivity);
        assert_eq!(
            resolve(&["country"], &[("liveOrOnDemand", "LIVE")]),
            ReportTypeId::PlaybackDetailsLiveGeographyBased
        );
        assert_eq!(
            resolve(&["country", "youtubeProduct"], &[]),
            ReportTypeId::PlaybackDetailsViewPercentageGeographyBased
        );
        assert_eq!(
            resolve(&["province"], &[("country", "US")]),
            ReportTypeId::GeographyBasedActivityUS
        );
        assert_eq!(
            resolve(&["province", "liveOrOnDemand"], &[("country", "US")]),
            ReportTypeId::PlaybackDetailsLiveGeographyBasedUS
        );
        assert_eq!(
            resolve(&["province", "subscribedStatus"], &[("country", "US")]),
            ReportTypeId::PlaybackDetailsViewPercentageGeographyBasedUS
        );
        assert_eq!(
            resolve(&["country", "youtubeProduct"], &[("isCurated", "1")]),
            ReportTypeId::GeographyBasedActivityPlaylist
        );
    }

    #[test]
    fn test_top_videos() {
        assert_eq!(resolve(&["video"], &[]), ReportTypeId::TopVideosRegional);
        assert_eq!(
            resolve(&["video"], &[("province", "US-NY")]),
            ReportTypeId::TopVideosUS
        );
        assert_eq!(
            resolve(&["video"], &[("subscribedStatus", "SUBSCRIBED")]),
            ReportTypeId::TopVideosSubscribed
        );
        assert_eq!(
            resolve(&["video"], &[("youtubeProduct", "CORE")]),
            ReportTypeId::TopVideosYouTubeProduct
        );
        assert_eq!(
            resolve(&["video"], &[("liveOrOnDemand", "LIVE"), ("youtubeProduct", "CORE")]),
            ReportTypeId::TopVideosPlaybackDetail
        );
    }

    #[test]
    fn test_playback_details() {
        assert_eq!(
            resolve(&["youtubeProduct"], &[]),
            ReportTypeId::PlaybackDetailsViewPercentageTimeBased
        );
        assert_eq!(
            resolve(&["day"], &[("youtubeProduct", "CORE"), ("liveOrOnDemand", "LIVE")]),
            ReportTypeId::PlaybackDetailsLiveTimeBased
        );
        assert_eq!(
            resolve(&["liveOrOnDemand"], &[]),
            ReportTypeId::PlaybackDetailsLiveTimeBased
        );
        assert_eq!(
            resolve(&["subscribedStatus"], &[]),
            ReportTypeId::PlaybackDetailsSubscribedStatus
        );
        assert_eq!(
            resolve(&["subscribedStatus", "day"], &[("province", "US-TX")]),
            ReportTypeId::PlaybackDetailsSubscribedStatusUS
        );
    }

    #[test]
    fn test_curated_requests_skip_video_only_branches() {
        assert_eq!(
            resolve(&["subscribedStatus"], &[("isCurated", "1")]),
            ReportTypeId::BasicUserActivityPlaylist
        );
        assert_eq!(
            resolve(&["insightTrafficSourceDetail"], &[("isCurated", "1")]),
            ReportTypeId::TrafficSourceDetailPlaylist
        );
        assert_eq!(
            resolve(&["gender"], &[("playlist", "PL123")]),
            ReportTypeId::ViewerDemographicsPlaylist
        );
        assert_eq!(resolve(&["playlist"], &[]), ReportTypeId::TopPlaylists);
    }

    #[test]
    fn test_determine_returns_catalog_entry() {
        let dimensions: BTreeSet<String> = ["elapsedVideoTimeRatio".to_string()].into();
        let report = determine(&dimensions, &BTreeMap::new());
        assert_eq!(report.name(), "Audience retention");
        assert!(std::ptr::eq(
            report,
            crate::catalog::get(ReportTypeId::AudienceRetention)
        ));
    }
}
