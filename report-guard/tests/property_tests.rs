//! Property-based tests for report type resolution and validation.
//!
//! This module uses proptest to check the engine against requests built from
//! arbitrary combinations of the bundled vocabulary, rather than the
//! hand-picked scenarios of the integration tests.
//!
//! ## Test Categories
//!
//! ### 1. Resolution
//! - Every combination of dimensions and filters resolves to a catalog entry
//! - Resolution is deterministic and ignores filter values other than `isCurated`
//! - Curated requests always land on a playlist report type
//!
//! ### 2. Validation
//! - Validating the same request twice gives the same answer
//! - A rejection of one request never changes the answer for the next
//!
//! ### 3. Building Blocks
//! - Multiplicity rules against independently computed counts
//! - Descending-only sort options reject exactly the ascending inputs
//! - Log field truncation on arbitrary Unicode input

use proptest::prelude::*;
use proptest::sample::subsequence;
use report_guard::catalog::{self, ReportTypeId};
use report_guard::core::{Constraint, SortOptions, ValidationRequest};
use report_guard::error::ValidationError;
use report_guard::logging::truncate_field;
use report_guard::resolver;
use report_guard::vocabulary::Vocabulary;
use std::collections::{BTreeMap, BTreeSet};

fn vocab() -> &'static Vocabulary {
    Vocabulary::builtin().unwrap()
}

const DIMENSIONS: &[&str] = &[
    "adType",
    "ageGroup",
    "city",
    "country",
    "creatorContentType",
    "day",
    "deviceType",
    "elapsedVideoTimeRatio",
    "gender",
    "insightPlaybackLocationDetail",
    "insightPlaybackLocationType",
    "insightTrafficSourceDetail",
    "insightTrafficSourceType",
    "liveOrOnDemand",
    "month",
    "operatingSystem",
    "playlist",
    "province",
    "sharingService",
    "subscribedStatus",
    "video",
    "youtubeProduct",
];

const FILTERS: &[(&str, &str)] = &[
    ("continent", "150"),
    ("country", "US"),
    ("group", "g1"),
    ("insightPlaybackLocationType", "EMBEDDED"),
    ("insightTrafficSourceType", "YT_SEARCH"),
    ("isCurated", "1"),
    ("liveOrOnDemand", "LIVE"),
    ("playlist", "PL1"),
    ("province", "US-OH"),
    ("subscribedStatus", "SUBSCRIBED"),
    ("video", "v1"),
    ("youtubeProduct", "CORE"),
];

const METRICS: &[&str] = &["views", "likes", "estimatedMinutesWatched", "shares"];

fn arb_dimensions() -> impl Strategy<Value = BTreeSet<String>> {
    subsequence(DIMENSIONS, 0..=5)
        .prop_map(|names| names.into_iter().map(String::from).collect())
}

fn arb_filters() -> impl Strategy<Value = BTreeMap<String, String>> {
    subsequence(FILTERS, 0..=4).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    })
}

fn arb_request() -> impl Strategy<Value = ValidationRequest> {
    (
        arb_dimensions(),
        arb_filters(),
        subsequence(&METRICS[..3], 0..=3),
        prop::option::of(0u32..300),
        1u32..60,
        any::<bool>(),
    )
        .prop_map(|(dimensions, filters, metrics, max_results, start_index, descending)| {
            let sort_options = metrics
                .iter()
                .take(1)
                .map(|m| if descending { format!("-{m}") } else { m.to_string() })
                .collect();
            ValidationRequest {
                dimensions,
                filters,
                metrics: metrics.into_iter().map(String::from).collect(),
                sort_options,
                max_results,
                start_index,
            }
        })
}

fn is_curated(filters: &BTreeMap<String, String>) -> bool {
    filters.get("isCurated").is_some_and(|v| v == "1") || filters.contains_key("playlist")
}

proptest! {
    #[test]
    fn prop_resolution_is_total_and_deterministic(
        dimensions in arb_dimensions(),
        filters in arb_filters(),
    ) {
        let id = resolver::determine_id(&dimensions, &filters);
        prop_assert!(ReportTypeId::ALL.contains(&id));
        prop_assert_eq!(resolver::determine_id(&dimensions, &filters), id);

        let report = resolver::determine(&dimensions, &filters);
        prop_assert!(std::ptr::eq(report, catalog::get(id)));
    }

    #[test]
    fn prop_resolution_ignores_plain_filter_values(
        dimensions in arb_dimensions(),
        filters in arb_filters(),
    ) {
        let renamed: BTreeMap<String, String> = filters
            .iter()
            .map(|(k, v)| {
                let value = if k == "isCurated" { v.clone() } else { format!("{v}-other") };
                (k.clone(), value)
            })
            .collect();
        prop_assert_eq!(
            resolver::determine_id(&dimensions, &filters),
            resolver::determine_id(&dimensions, &renamed)
        );
    }

    #[test]
    fn prop_curated_requests_resolve_to_playlist_types(
        dimensions in arb_dimensions(),
        filters in arb_filters(),
    ) {
        let id = resolver::determine_id(&dimensions, &filters);
        if is_curated(&filters) {
            prop_assert!(id.is_playlist(), "{} is not a playlist report type", id);
        } else if !dimensions.contains("playlist") {
            prop_assert!(!id.is_playlist(), "{} is a playlist report type", id);
        }
    }

    #[test]
    fn prop_validation_is_repeatable(request in arb_request()) {
        let report = resolver::determine(&request.dimensions, &request.filters);
        let first = report.validate(&request, vocab());
        let second = report.validate(&request, vocab());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_rejections_do_not_leak(first in arb_request(), second in arb_request()) {
        let check = |request: &ValidationRequest| {
            resolver::determine(&request.dimensions, &request.filters).validate(request, vocab())
        };
        let expected = check(&second);
        let _ = check(&first);
        prop_assert_eq!(check(&second), expected);
    }

    #[test]
    fn prop_detailed_types_bound_result_counts(request in arb_request()) {
        let report = resolver::determine(&request.dimensions, &request.filters);
        if let (Some(limit), Ok(())) = (report.kind().limit(), report.validate(&request, vocab())) {
            let requested = request.requested_results().unwrap();
            prop_assert!(requested <= limit.enforced);
            prop_assert!(request.start_index + requested <= limit.enforced + 1);
            prop_assert!(!request.sort_options.is_empty());
        }
    }

    #[test]
    fn prop_zero_or_one_matches_count(
        allowed in subsequence(DIMENSIONS, 1..=4),
        requested in subsequence(DIMENSIONS, 0..=6),
    ) {
        let constraint = Constraint::zero_or_one(allowed.iter().copied());
        let inputs: BTreeSet<String> = requested.iter().map(|s| s.to_string()).collect();
        let present = allowed.iter().filter(|a| inputs.contains(**a)).count();

        let result = constraint.validate_dimensions(&inputs);
        prop_assert_eq!(result.is_ok(), present <= 1);
        if let Err(ValidationError::Multiplicity { actual, .. }) = result {
            prop_assert_eq!(actual, present);
        }
    }

    #[test]
    fn prop_required_needs_every_key(
        allowed in subsequence(DIMENSIONS, 1..=4),
        requested in subsequence(DIMENSIONS, 0..=8),
    ) {
        let constraint = Constraint::required(allowed.iter().copied());
        let inputs: BTreeSet<String> = requested.iter().map(|s| s.to_string()).collect();
        let all_present = allowed.iter().all(|a| inputs.contains(*a));
        prop_assert_eq!(constraint.validate_dimensions(&inputs).is_ok(), all_present);
    }

    #[test]
    fn prop_descending_only_rejects_ascending(
        options in subsequence(METRICS, 1..=4),
        directions in prop::collection::vec(any::<bool>(), 4),
    ) {
        let sort = SortOptions::descending_only(METRICS.iter().copied());
        let inputs: Vec<String> = options
            .iter()
            .zip(&directions)
            .map(|(o, &desc)| if desc { format!("-{o}") } else { o.to_string() })
            .collect();
        let ascending: Vec<String> = options
            .iter()
            .zip(&directions)
            .filter(|(_, desc)| !**desc)
            .map(|(o, _)| o.to_string())
            .collect();

        match sort.validate(&inputs, vocab()) {
            Ok(()) => prop_assert!(ascending.is_empty()),
            Err(ValidationError::DescendingOnly { names }) => prop_assert_eq!(names, ascending),
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    #[test]
    fn prop_truncate_field_never_splits_chars(value in "\\PC{0,64}", max in 0usize..80) {
        let truncated = truncate_field(&value, max);
        if value.chars().count() <= max {
            prop_assert_eq!(truncated, value);
        } else {
            let kept = truncated.strip_suffix("...(truncated)");
            prop_assert!(kept.is_some());
            let kept = kept.unwrap();
            prop_assert_eq!(kept.chars().count(), max);
            prop_assert!(value.starts_with(kept));
        }
    }
}

#[cfg(test)]
mod edge_case_tests {
    use super::*;

    #[test]
    fn test_empty_request_resolves_to_basic_activity() {
        let id = resolver::determine_id(&BTreeSet::new(), &BTreeMap::new());
        assert_eq!(id, ReportTypeId::BasicUserActivity);
    }

    #[test]
    fn test_every_branch_anchor_is_a_known_dimension() {
        for anchor in resolver::anchors() {
            for name in anchor.split('|') {
                assert!(vocab().is_dimension(name), "{name}");
            }
        }
    }
}
