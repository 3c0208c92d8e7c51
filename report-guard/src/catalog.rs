//! The closed set of report types the reporting API recognizes.
//!
//! Every entry is addressable by a [`ReportTypeId`] and by its display name,
//! which doubles as the identifier handed back to callers. Entries are built
//! once on first access and never change afterwards.
//!
//! # Examples
//!
//! ```rust
//! use report_guard::catalog::{self, ReportTypeId};
//!
//! let top = catalog::get(ReportTypeId::TopVideosRegional);
//! assert_eq!(top.name(), "Top videos by region");
//! assert!(top.is_detailed());
//!
//! let same = catalog::by_name("Top videos by region").unwrap();
//! assert!(std::ptr::eq(top, same));
//! ```

use crate::core::{Constraint, CrossFieldRule, ReportType, ReportTypeBuilder, ResultLimit, SortOptions};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const VIDEO_METRICS: [&str; 35] = [
    "views",
    "redViews",
    "comments",
    "likes",
    "dislikes",
    "videosAddedToPlaylists",
    "videosRemovedFromPlaylists",
    "shares",
    "estimatedMinutesWatched",
    "estimatedRedMinutesWatched",
    "averageViewDuration",
    "averageViewPercentage",
    "annotationClickThroughRate",
    "annotationCloseRate",
    "annotationImpressions",
    "annotationClickableImpressions",
    "annotationClosableImpressions",
    "annotationClicks",
    "annotationCloses",
    "cardClickRate",
    "cardTeaserClickRate",
    "cardImpressions",
    "cardTeaserImpressions",
    "cardClicks",
    "cardTeaserClicks",
    "subscribersGained",
    "subscribersLost",
    "estimatedRevenue",
    "estimatedAdRevenue",
    "grossRevenue",
    "estimatedRedPartnerRevenue",
    "monetizedPlaybacks",
    "playbackBasedCpm",
    "adImpressions",
    "cpm",
];

/// Also served by the US subscribed-status breakdown.
pub const PROVINCE_METRICS: [&str; 19] = [
    "views",
    "redViews",
    "estimatedMinutesWatched",
    "estimatedRedMinutesWatched",
    "averageViewDuration",
    "averageViewPercentage",
    "annotationClickThroughRate",
    "annotationCloseRate",
    "annotationImpressions",
    "annotationClickableImpressions",
    "annotationClosableImpressions",
    "annotationClicks",
    "annotationCloses",
    "cardClickRate",
    "cardTeaserClickRate",
    "cardImpressions",
    "cardTeaserImpressions",
    "cardClicks",
    "cardTeaserClicks",
];

pub const SUBSCRIPTION_METRICS: [&str; 24] = [
    "views",
    "redViews",
    "likes",
    "dislikes",
    "videosAddedToPlaylists",
    "videosRemovedFromPlaylists",
    "shares",
    "estimatedMinutesWatched",
    "estimatedRedMinutesWatched",
    "averageViewDuration",
    "averageViewPercentage",
    "annotationClickThroughRate",
    "annotationCloseRate",
    "annotationImpressions",
    "annotationClickableImpressions",
    "annotationClosableImpressions",
    "annotationClicks",
    "annotationCloses",
    "cardClickRate",
    "cardTeaserClickRate",
    "cardImpressions",
    "cardTeaserImpressions",
    "cardClicks",
    "cardTeaserClicks",
];

pub const LIVE_PLAYBACK_METRICS: [&str; 5] = [
    "views",
    "redViews",
    "estimatedMinutesWatched",
    "estimatedRedMinutesWatched",
    "averageViewDuration",
];

pub const VIEW_PERCENTAGE_METRICS: [&str; 6] = [
    "views",
    "redViews",
    "estimatedMinutesWatched",
    "estimatedRedMinutesWatched",
    "averageViewDuration",
    "averageViewPercentage",
];

pub const LOCATION_AND_TRAFFIC_METRICS: [&str; 2] = ["views", "estimatedMinutesWatched"];

pub const PLAYLIST_METRICS: [&str; 8] = [
    "views",
    "redViews",
    "estimatedMinutesWatched",
    "estimatedRedMinutesWatched",
    "averageViewDuration",
    "playlistStarts",
    "viewsPerPlaylistStart",
    "averageTimeInPlaylist",
];

pub const LOCATION_AND_TRAFFIC_PLAYLIST_METRICS: [&str; 5] = [
    "views",
    "estimatedMinutesWatched",
    "playlistStarts",
    "viewsPerPlaylistStart",
    "averageTimeInPlaylist",
];

pub const CITY_METRICS: [&str; 4] = [
    "views",
    "estimatedMinutesWatched",
    "averageViewDuration",
    "averageViewPercentage",
];

pub const LOCATION_AND_TRAFFIC_SORT_OPTIONS: [&str; 2] = ["views", "estimatedMinutesWatched"];

pub const TOP_VIDEOS_SORT_OPTIONS: [&str; 4] = [
    "views",
    "redViews",
    "estimatedMinutesWatched",
    "estimatedRedMinutesWatched",
];

pub const TOP_VIDEOS_EXTRA_SORT_OPTIONS: [&str; 8] = [
    "views",
    "redViews",
    "estimatedRevenue",
    "estimatedRedPartnerRevenue",
    "estimatedMinutesWatched",
    "estimatedRedMinutesWatched",
    "subscribersGained",
    "subscribersLost",
];

pub const LOCATION_AND_TRAFFIC_PLAYLIST_SORT_OPTIONS: [&str; 3] =
    ["views", "estimatedMinutesWatched", "playlistStarts"];

/// Identifies one catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReportTypeId {
    BasicUserActivity,
    BasicUserActivityUS,
    TimeBasedActivity,
    TimeBasedActivityUS,
    GeographyBasedActivity,
    GeographyBasedActivityUS,
    GeographyBasedActivityByCity,
    PlaybackDetailsSubscribedStatus,
    PlaybackDetailsSubscribedStatusUS,
    PlaybackDetailsLiveTimeBased,
    PlaybackDetailsViewPercentageTimeBased,
    PlaybackDetailsLiveGeographyBased,
    PlaybackDetailsViewPercentageGeographyBased,
    PlaybackDetailsLiveGeographyBasedUS,
    PlaybackDetailsViewPercentageGeographyBasedUS,
    PlaybackLocation,
    PlaybackLocationDetail,
    TrafficSource,
    TrafficSourceDetail,
    DeviceType,
    OperatingSystem,
    DeviceTypeAndOperatingSystem,
    ViewerDemographics,
    EngagementAndContentSharing,
    AudienceRetention,
    TopVideosRegional,
    TopVideosUS,
    TopVideosSubscribed,
    TopVideosYouTubeProduct,
    TopVideosPlaybackDetail,
    BasicUserActivityPlaylist,
    TimeBasedActivityPlaylist,
    GeographyBasedActivityPlaylist,
    GeographyBasedActivityUSPlaylist,
    PlaybackLocationPlaylist,
    PlaybackLocationDetailPlaylist,
    TrafficSourcePlaylist,
    TrafficSourceDetailPlaylist,
    DeviceTypePlaylist,
    OperatingSystemPlaylist,
    DeviceTypeAndOperatingSystemPlaylist,
    ViewerDemographicsPlaylist,
    TopPlaylists,
    AdPerformance,
}

impl ReportTypeId {
    /// Every identifier, in declaration order.
    pub const ALL: [ReportTypeId; 44] = [
        ReportTypeId::BasicUserActivity,
        ReportTypeId::BasicUserActivityUS,
        ReportTypeId::TimeBasedActivity,
        ReportTypeId::TimeBasedActivityUS,
        ReportTypeId::GeographyBasedActivity,
        ReportTypeId::GeographyBasedActivityUS,
        ReportTypeId::GeographyBasedActivityByCity,
        ReportTypeId::PlaybackDetailsSubscribedStatus,
        ReportTypeId::PlaybackDetailsSubscribedStatusUS,
        ReportTypeId::PlaybackDetailsLiveTimeBased,
        ReportTypeId::PlaybackDetailsViewPercentageTimeBased,
        ReportTypeId::PlaybackDetailsLiveGeographyBased,
        ReportTypeId::PlaybackDetailsViewPercentageGeographyBased,
        ReportTypeId::PlaybackDetailsLiveGeographyBasedUS,
        ReportTypeId::PlaybackDetailsViewPercentageGeographyBasedUS,
        ReportTypeId::PlaybackLocation,
        ReportTypeId::PlaybackLocationDetail,
        ReportTypeId::TrafficSource,
        ReportTypeId::TrafficSourceDetail,
        ReportTypeId::DeviceType,
        ReportTypeId::OperatingSystem,
        ReportTypeId::DeviceTypeAndOperatingSystem,
        ReportTypeId::ViewerDemographics,
        ReportTypeId::EngagementAndContentSharing,
        ReportTypeId::AudienceRetention,
        ReportTypeId::TopVideosRegional,
        ReportTypeId::TopVideosUS,
        ReportTypeId::TopVideosSubscribed,
        ReportTypeId::TopVideosYouTubeProduct,
        ReportTypeId::TopVideosPlaybackDetail,
        ReportTypeId::BasicUserActivityPlaylist,
        ReportTypeId::TimeBasedActivityPlaylist,
        ReportTypeId::GeographyBasedActivityPlaylist,
        ReportTypeId::GeographyBasedActivityUSPlaylist,
        ReportTypeId::PlaybackLocationPlaylist,
        ReportTypeId::PlaybackLocationDetailPlaylist,
        ReportTypeId::TrafficSourcePlaylist,
        ReportTypeId::TrafficSourceDetailPlaylist,
        ReportTypeId::DeviceTypePlaylist,
        ReportTypeId::OperatingSystemPlaylist,
        ReportTypeId::DeviceTypeAndOperatingSystemPlaylist,
        ReportTypeId::ViewerDemographicsPlaylist,
        ReportTypeId::TopPlaylists,
        ReportTypeId::AdPerformance,
    ];

    /// The display name, also the API identifier of the report type.
    pub fn name(&self) -> &'static str {
        use ReportTypeId::*;
        match self {
            BasicUserActivity => "Basic user activity",
            BasicUserActivityUS => "Basic user activity (US)",
            TimeBasedActivity => "Time-based activity",
            TimeBasedActivityUS => "Time-based activity (US)",
            GeographyBasedActivity => "Geography-based activity",
            GeographyBasedActivityUS => "Geography-based activity (US)",
            GeographyBasedActivityByCity => "Geography-based activity (by city)",
            PlaybackDetailsSubscribedStatus => "User activity by subscribed status",
            PlaybackDetailsSubscribedStatusUS => "User activity by subscribed status (US)",
            PlaybackDetailsLiveTimeBased => "Time-based playback details (live)",
            PlaybackDetailsViewPercentageTimeBased => {
                "Time-based playback details (view percentage)"
            }
            PlaybackDetailsLiveGeographyBased => "Geography-based playback details (live)",
            PlaybackDetailsViewPercentageGeographyBased => {
                "Geography-based playback details (view percentage)"
            }
            PlaybackDetailsLiveGeographyBasedUS => "Geography-based playback details (live, US)",
            PlaybackDetailsViewPercentageGeographyBasedUS => {
                "Geography-based playback details (view percentage, US)"
            }
            PlaybackLocation => "Playback locations",
            PlaybackLocationDetail => "Playback locations (detailed)",
            TrafficSource => "Traffic sources",
            TrafficSourceDetail => "Traffic sources (detailed)",
            DeviceType => "Device types",
            OperatingSystem => "Operating systems",
            DeviceTypeAndOperatingSystem => "Device types and operating systems",
            ViewerDemographics => "Viewer demographics",
            EngagementAndContentSharing => "Engagement and content sharing",
            AudienceRetention => "Audience retention",
            TopVideosRegional => "Top videos by region",
            TopVideosUS => "Top videos by state",
            TopVideosSubscribed => "Top videos by subscription status",
            TopVideosYouTubeProduct => "Top videos by YouTube product",
            TopVideosPlaybackDetail => "Top videos by playback detail",
            BasicUserActivityPlaylist => "Basic user activity for playlists",
            TimeBasedActivityPlaylist => "Time-based activity for playlists",
            GeographyBasedActivityPlaylist => "Geography-based activity for playlists",
            GeographyBasedActivityUSPlaylist => "Geography-based activity for playlists (US)",
            PlaybackLocationPlaylist => "Playback locations for playlists",
            PlaybackLocationDetailPlaylist => "Playback locations for playlists (detailed)",
            TrafficSourcePlaylist => "Traffic sources for playlists",
            TrafficSourceDetailPlaylist => "Traffic sources for playlists (detailed)",
            DeviceTypePlaylist => "Device types for playlists",
            OperatingSystemPlaylist => "Operating systems for playlists",
            DeviceTypeAndOperatingSystemPlaylist => {
                "Device types and operating systems for playlists"
            }
            ViewerDemographicsPlaylist => "Viewer demographics for playlists",
            TopPlaylists => "Top playlists",
            AdPerformance => "Ad performance",
        }
    }

    /// Returns true for report types scoped to curated playlists.
    pub fn is_playlist(&self) -> bool {
        get(*self)
            .filters()
            .locked()
            .get("isCurated")
            .is_some_and(|v| *v == "1")
    }

    /// The descriptor for this id.
    pub fn report_type(&self) -> &'static ReportType {
        get(*self)
    }
}

impl fmt::Display for ReportTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static CATALOG: Lazy<Vec<ReportType>> =
    Lazy::new(|| ReportTypeId::ALL.iter().map(|id| build(*id)).collect());

/// Returns the report type for an identifier.
pub fn get(id: ReportTypeId) -> &'static ReportType {
    &CATALOG[id as usize]
}

/// Looks a report type up by its display name.
pub fn by_name(name: &str) -> Option<&'static ReportType> {
    CATALOG.iter().find(|report| report.name() == name)
}

/// Every report type, in declaration order.
pub fn all() -> &'static [ReportType] {
    &CATALOG
}

// Constraint sets shared by many entries.

fn global_regions() -> Constraint {
    Constraint::zero_or_one(["country", "continent", "subContinent"])
}

fn any_region() -> Constraint {
    Constraint::zero_or_one(["country", "province", "continent", "subContinent"])
}

fn sub_regions() -> Constraint {
    Constraint::zero_or_one(["continent", "subContinent"])
}

fn video_or_group() -> Constraint {
    Constraint::zero_or_one(["video", "group"])
}

fn playlist_or_group() -> Constraint {
    Constraint::zero_or_one(["playlist", "group"])
}

fn day_or_month() -> Constraint {
    Constraint::zero_or_one(["day", "month"])
}

fn curated() -> Constraint {
    Constraint::required(["isCurated==1"])
}

fn build(id: ReportTypeId) -> ReportType {
    use ReportTypeId::*;

    let report = ReportType::builder(id.name());
    match id {
        BasicUserActivity => report
            .filters([global_regions(), video_or_group()])
            .metrics(VIDEO_METRICS),
        BasicUserActivityUS => report
            .filters([Constraint::required(["province"]), video_or_group()])
            .metrics(PROVINCE_METRICS),
        TimeBasedActivity => report
            .dimensions([
                Constraint::exactly_one(["day", "month"]),
                Constraint::optional(["creatorContentType"]),
            ])
            .filters([global_regions(), video_or_group()])
            .metrics(VIDEO_METRICS),
        TimeBasedActivityUS => report
            .dimensions([
                Constraint::exactly_one(["day", "month"]),
                Constraint::optional(["creatorContentType"]),
            ])
            .filters([Constraint::required(["province"]), video_or_group()])
            .metrics(PROVINCE_METRICS),
        GeographyBasedActivity => report
            .dimensions([
                Constraint::required(["country"]),
                Constraint::optional(["creatorContentType"]),
            ])
            .filters([sub_regions(), video_or_group()])
            .metrics(VIDEO_METRICS),
        GeographyBasedActivityUS => report
            .dimensions([
                Constraint::required(["province"]),
                Constraint::optional(["creatorContentType"]),
            ])
            .filters([Constraint::required(["country==US"]), video_or_group()])
            .metrics(PROVINCE_METRICS),
        GeographyBasedActivityByCity => report
            .dimensions([
                Constraint::required(["city"]),
                Constraint::zero_or_more([
                    "creatorContentType",
                    "country",
                    "province",
                    "subscribedStatus",
                ]),
                day_or_month(),
            ])
            .filters([any_region(), video_or_group()])
            .metrics(CITY_METRICS)
            .sort_options(SortOptions::descending_only(
                LOCATION_AND_TRAFFIC_SORT_OPTIONS,
            ))
            .detailed(ResultLimit::new(25).with_documented(250))
            .rule(CrossFieldRule::CityProvinceFilters),
        PlaybackDetailsSubscribedStatus => report
            .dimensions([
                Constraint::zero_or_more(["creatorContentType", "subscribedStatus"]),
                day_or_month(),
            ])
            .filters([
                global_regions(),
                video_or_group(),
                Constraint::optional(["subscribedStatus"]),
            ])
            .metrics(SUBSCRIPTION_METRICS),
        PlaybackDetailsSubscribedStatusUS => report
            .dimensions([
                Constraint::zero_or_more(["creatorContentType", "subscribedStatus"]),
                day_or_month(),
            ])
            .filters([
                video_or_group(),
                Constraint::zero_or_more(["province", "subscribedStatus"]),
            ])
            .metrics(PROVINCE_METRICS),
        PlaybackDetailsLiveTimeBased => report
            .dimensions([
                Constraint::zero_or_more([
                    "creatorContentType",
                    "liveOrOnDemand",
                    "subscribedStatus",
                    "youtubeProduct",
                ]),
                day_or_month(),
            ])
            .filters([
                any_region(),
                video_or_group(),
                Constraint::zero_or_more(["liveOrOnDemand", "subscribedStatus", "youtubeProduct"]),
            ])
            .metrics(LIVE_PLAYBACK_METRICS),
        PlaybackDetailsViewPercentageTimeBased => report
            .dimensions([
                Constraint::zero_or_more(["creatorContentType", "subscribedStatus", "youtubeProduct"]),
                day_or_month(),
            ])
            .filters([
                any_region(),
                video_or_group(),
                Constraint::zero_or_more(["subscribedStatus", "youtubeProduct"]),
            ])
            .metrics(VIEW_PERCENTAGE_METRICS),
        PlaybackDetailsLiveGeographyBased => report
            .dimensions([
                Constraint::required(["country"]),
                Constraint::zero_or_more([
                    "creatorContentType",
                    "liveOrOnDemand",
                    "subscribedStatus",
                    "youtubeProduct",
                ]),
            ])
            .filters([
                sub_regions(),
                video_or_group(),
                Constraint::zero_or_more(["liveOrOnDemand", "subscribedStatus", "youtubeProduct"]),
            ])
            .metrics(LIVE_PLAYBACK_METRICS),
        PlaybackDetailsViewPercentageGeographyBased => report
            .dimensions([
                Constraint::required(["country"]),
                Constraint::zero_or_more(["creatorContentType", "subscribedStatus", "youtubeProduct"]),
            ])
            .filters([
                sub_regions(),
                video_or_group(),
                Constraint::zero_or_more(["subscribedStatus", "youtubeProduct"]),
            ])
            .metrics(VIEW_PERCENTAGE_METRICS),
        PlaybackDetailsLiveGeographyBasedUS => report
            .dimensions([
                Constraint::required(["province"]),
                Constraint::zero_or_more([
                    "creatorContentType",
                    "liveOrOnDemand",
                    "subscribedStatus",
                    "youtubeProduct",
                ]),
            ])
            .filters([
                Constraint::required(["country==US"]),
                video_or_group(),
                Constraint::zero_or_more(["liveOrOnDemand", "subscribedStatus", "youtubeProduct"]),
            ])
            .metrics(LIVE_PLAYBACK_METRICS),
        PlaybackDetailsViewPercentageGeographyBasedUS => report
            .dimensions([
                Constraint::required(["province"]),
                Constraint::zero_or_more(["creatorContentType", "subscribedStatus", "youtubeProduct"]),
            ])
            .filters([
                Constraint::required(["country==US"]),
                video_or_group(),
                Constraint::zero_or_more(["subscribedStatus", "youtubeProduct"]),
            ])
            .metrics(VIEW_PERCENTAGE_METRICS),
        PlaybackLocation => report
            .dimensions([
                Constraint::required(["insightPlaybackLocationType"]),
                Constraint::zero_or_more([
                    "creatorContentType",
                    "day",
                    "liveOrOnDemand",
                    "subscribedStatus",
                ]),
            ])
            .filters([
                any_region(),
                video_or_group(),
                Constraint::zero_or_more(["liveOrOnDemand", "subscribedStatus"]),
            ])
            .metrics(LOCATION_AND_TRAFFIC_METRICS),
        PlaybackLocationDetail => report
            .dimensions([
                Constraint::required(["insightPlaybackLocationDetail"]),
                Constraint::optional(["creatorContentType"]),
            ])
            .filters([
                Constraint::required(["insightPlaybackLocationType==EMBEDDED"]),
                any_region(),
                video_or_group(),
                Constraint::zero_or_more(["liveOrOnDemand", "subscribedStatus"]),
            ])
            .metrics(LOCATION_AND_TRAFFIC_METRICS)
            .sort_options(SortOptions::descending_only(
                LOCATION_AND_TRAFFIC_SORT_OPTIONS,
            ))
            .detailed(ResultLimit::new(25)),
        TrafficSource => report
            .dimensions([
                Constraint::required(["insightTrafficSourceType"]),
                Constraint::zero_or_more([
                    "creatorContentType",
                    "day",
                    "liveOrOnDemand",
                    "subscribedStatus",
                ]),
            ])
            .filters([
                any_region(),
                video_or_group(),
                Constraint::zero_or_more(["liveOrOnDemand", "subscribedStatus"]),
            ])
            .metrics(LOCATION_AND_TRAFFIC_METRICS),
        TrafficSourceDetail => report
            .dimensions([
                Constraint::required(["insightTrafficSourceDetail"]),
                Constraint::optional(["creatorContentType"]),
            ])
            .filters([
                Constraint::required(["insightTrafficSourceType"]),
                any_region(),
                video_or_group(),
                Constraint::zero_or_more(["liveOrOnDemand", "subscribedStatus"]),
            ])
            .metrics(LOCATION_AND_TRAFFIC_METRICS)
            .sort_options(SortOptions::descending_only(
                LOCATION_AND_TRAFFIC_SORT_OPTIONS,
            ))
            .detailed(ResultLimit::new(25))
            .rule(CrossFieldRule::TrafficSourceDetailType),
        DeviceType => report
            .dimensions([
                Constraint::required(["deviceType"]),
                Constraint::zero_or_more([
                    "creatorContentType",
                    "day",
                    "liveOrOnDemand",
                    "subscribedStatus",
                    "youtubeProduct",
                ]),
            ])
            .filters([
                any_region(),
                video_or_group(),
                Constraint::zero_or_more([
                    "operatingSystem",
                    "liveOrOnDemand",
                    "subscribedStatus",
                    "youtubeProduct",
                ]),
            ])
            .metrics(LOCATION_AND_TRAFFIC_METRICS),
        OperatingSystem => report
            .dimensions([
                Constraint::required(["operatingSystem"]),
                Constraint::zero_or_more([
                    "creatorContentType",
                    "day",
                    "liveOrOnDemand",
                    "subscribedStatus",
                    "youtubeProduct",
                ]),
            ])
            .filters([
                any_region(),
                video_or_group(),
                Constraint::zero_or_more([
                    "deviceType",
                    "liveOrOnDemand",
                    "subscribedStatus",
                    "youtubeProduct",
                ]),
            ])
            .metrics(LOCATION_AND_TRAFFIC_METRICS),
        DeviceTypeAndOperatingSystem => report
            .dimensions([
                Constraint::required(["deviceType", "operatingSystem"]),
                Constraint::zero_or_more([
                    "creatorContentType",
                    "day",
                    "liveOrOnDemand",
                    "subscribedStatus",
                    "youtubeProduct",
                ]),
            ])
            .filters([
                any_region(),
                video_or_group(),
                Constraint::zero_or_more(["liveOrOnDemand", "subscribedStatus", "youtubeProduct"]),
            ])
            .metrics(LOCATION_AND_TRAFFIC_METRICS),
        ViewerDemographics => report
            .dimensions([
                Constraint::one_or_more(["ageGroup", "gender"]),
                Constraint::zero_or_more(["creatorContentType", "liveOrOnDemand", "subscribedStatus"]),
            ])
            .filters([
                any_region(),
                video_or_group(),
                Constraint::zero_or_more(["liveOrOnDemand", "subscribedStatus"]),
            ])
            .metrics(["viewerPercentage"]),
        EngagementAndContentSharing => report
            .dimensions([
                Constraint::required(["sharingService"]),
                Constraint::zero_or_more(["creatorContentType", "subscribedStatus"]),
            ])
            .filters([
                global_regions(),
                video_or_group(),
                Constraint::optional(["subscribedStatus"]),
            ])
            .metrics(["shares"]),
        AudienceRetention => report
            .dimensions([
                Constraint::required(["elapsedVideoTimeRatio"]),
                Constraint::optional(["creatorContentType"]),
            ])
            .filters([
                Constraint::required(["video"]),
                Constraint::zero_or_more(["audienceType", "subscribedStatus", "youtubeProduct"]),
            ])
            .metrics(["audienceWatchRatio", "relativeRetentionPerformance"])
            .rule(CrossFieldRule::SingleVideo),
        TopVideosRegional => top_videos(report)
            .filters([global_regions()])
            .metrics(VIDEO_METRICS)
            .sort_options(SortOptions::descending_only(TOP_VIDEOS_EXTRA_SORT_OPTIONS)),
        TopVideosUS => top_videos(report)
            .filters([
                Constraint::required(["province"]),
                Constraint::optional(["subscribedStatus"]),
            ])
            .metrics(PROVINCE_METRICS),
        TopVideosSubscribed => top_videos(report)
            .filters([Constraint::optional(["subscribedStatus"]), global_regions()])
            .metrics(SUBSCRIPTION_METRICS),
        TopVideosYouTubeProduct => top_videos(report)
            .filters([
                any_region(),
                Constraint::zero_or_more(["subscribedStatus", "youtubeProduct"]),
            ])
            .metrics(VIEW_PERCENTAGE_METRICS),
        TopVideosPlaybackDetail => top_videos(report)
            .filters([
                any_region(),
                Constraint::zero_or_more(["liveOrOnDemand", "subscribedStatus", "youtubeProduct"]),
            ])
            .metrics(VIEW_PERCENTAGE_METRICS),
        BasicUserActivityPlaylist => report
            .filters([
                curated(),
                any_region(),
                playlist_or_group(),
                Constraint::zero_or_more(["subscribedStatus", "youtubeProduct"]),
            ])
            .metrics(PLAYLIST_METRICS),
        TimeBasedActivityPlaylist => report
            .dimensions([
                Constraint::exactly_one(["day", "month"]),
                Constraint::zero_or_more(["subscribedStatus", "youtubeProduct"]),
            ])
            .filters([
                curated(),
                any_region(),
                playlist_or_group(),
                Constraint::zero_or_more(["subscribedStatus", "youtubeProduct"]),
            ])
            .metrics(PLAYLIST_METRICS),
        GeographyBasedActivityPlaylist => report
            .dimensions([
                Constraint::required(["country"]),
                Constraint::zero_or_more(["subscribedStatus", "youtubeProduct"]),
            ])
            .filters([
                curated(),
                sub_regions(),
                playlist_or_group(),
                Constraint::zero_or_more(["subscribedStatus", "youtubeProduct"]),
            ])
            .metrics(PLAYLIST_METRICS),
        GeographyBasedActivityUSPlaylist => report
            .dimensions([
                Constraint::required(["province"]),
                Constraint::zero_or_more(["subscribedStatus", "youtubeProduct"]),
            ])
            .filters([
                Constraint::required(["isCurated==1", "country==US"]),
                playlist_or_group(),
                Constraint::zero_or_more(["subscribedStatus", "youtubeProduct"]),
            ])
            .metrics(PLAYLIST_METRICS),
        PlaybackLocationPlaylist => report
            .dimensions([
                Constraint::required(["insightPlaybackLocationType"]),
                Constraint::zero_or_more(["day", "subscribedStatus"]),
            ])
            .filters([
                curated(),
                any_region(),
                playlist_or_group(),
                Constraint::optional(["subscribedStatus"]),
            ])
            .metrics(LOCATION_AND_TRAFFIC_PLAYLIST_METRICS),
        PlaybackLocationDetailPlaylist => report
            .dimensions([Constraint::required(["insightPlaybackLocationDetail"])])
            .filters([
                Constraint::required(["isCurated==1", "insightPlaybackLocationType==EMBEDDED"]),
                any_region(),
                playlist_or_group(),
                Constraint::optional(["subscribedStatus"]),
            ])
            .metrics(LOCATION_AND_TRAFFIC_PLAYLIST_METRICS)
            .sort_options(SortOptions::descending_only(
                LOCATION_AND_TRAFFIC_PLAYLIST_SORT_OPTIONS,
            ))
            .detailed(ResultLimit::new(25)),
        TrafficSourcePlaylist => report
            .dimensions([
                Constraint::required(["insightTrafficSourceType"]),
                Constraint::zero_or_more(["day", "subscribedStatus"]),
            ])
            .filters([
                curated(),
                any_region(),
                playlist_or_group(),
                Constraint::optional(["subscribedStatus"]),
            ])
            .metrics(LOCATION_AND_TRAFFIC_PLAYLIST_METRICS),
        TrafficSourceDetailPlaylist => report
            .dimensions([Constraint::required(["insightTrafficSourceDetail"])])
            .filters([
                Constraint::required(["isCurated==1", "insightTrafficSourceType"]),
                any_region(),
                playlist_or_group(),
                Constraint::optional(["subscribedStatus"]),
            ])
            .metrics(LOCATION_AND_TRAFFIC_PLAYLIST_METRICS)
            .sort_options(SortOptions::descending_only(
                LOCATION_AND_TRAFFIC_PLAYLIST_SORT_OPTIONS,
            ))
            .detailed(ResultLimit::new(25))
            .rule(CrossFieldRule::TrafficSourceDetailType),
        DeviceTypePlaylist => report
            .dimensions([
                Constraint::required(["deviceType"]),
                Constraint::zero_or_more(["day", "subscribedStatus", "youtubeProduct"]),
            ])
            .filters([
                curated(),
                any_region(),
                playlist_or_group(),
                Constraint::zero_or_more(["operatingSystem", "subscribedStatus", "youtubeProduct"]),
            ])
            .metrics(LOCATION_AND_TRAFFIC_PLAYLIST_METRICS),
        OperatingSystemPlaylist => report
            .dimensions([
                Constraint::required(["operatingSystem"]),
                Constraint::zero_or_more(["day", "subscribedStatus", "youtubeProduct"]),
            ])
            .filters([
                curated(),
                any_region(),
                playlist_or_group(),
                Constraint::zero_or_more(["deviceType", "subscribedStatus", "youtubeProduct"]),
            ])
            .metrics(LOCATION_AND_TRAFFIC_PLAYLIST_METRICS),
        DeviceTypeAndOperatingSystemPlaylist => report
            .dimensions([
                Constraint::required(["deviceType", "operatingSystem"]),
                Constraint::zero_or_more(["day", "subscribedStatus", "youtubeProduct"]),
            ])
            .filters([
                curated(),
                any_region(),
                playlist_or_group(),
                Constraint::zero_or_more(["subscribedStatus", "youtubeProduct"]),
            ])
            .metrics(LOCATION_AND_TRAFFIC_PLAYLIST_METRICS),
        ViewerDemographicsPlaylist => report
            .dimensions([
                Constraint::one_or_more(["ageGroup", "gender"]),
                Constraint::optional(["subscribedStatus"]),
            ])
            .filters([
                curated(),
                any_region(),
                playlist_or_group(),
                Constraint::zero_or_more(["subscribedStatus"]),
            ])
            .metrics(["viewerPercentage"]),
        TopPlaylists => report
            .dimensions([Constraint::required(["playlist"])])
            .filters([
                curated(),
                any_region(),
                Constraint::zero_or_more(["playlist", "subscribedStatus", "youtubeProduct"]),
            ])
            .metrics(PLAYLIST_METRICS)
            .sort_options(SortOptions::new(TOP_VIDEOS_SORT_OPTIONS))
            .detailed(ResultLimit::new(200)),
        AdPerformance => report
            .dimensions([
                Constraint::required(["adType"]),
                Constraint::optional(["day"]),
            ])
            .filters([video_or_group(), global_regions()])
            .metrics(["grossRevenue", "adImpressions", "cpm"]),
    }
    .build()
}

/// Shared shape of the top-videos family; sort options may be overridden.
fn top_videos(report: ReportTypeBuilder) -> ReportTypeBuilder {
    report
        .dimensions([
            Constraint::required(["video"]),
            Constraint::optional(["creatorContentType"]),
        ])
        .sort_options(SortOptions::descending_only(TOP_VIDEOS_SORT_OPTIONS))
        .detailed(ResultLimit::new(200))
}
