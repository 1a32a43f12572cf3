//! End-to-end tests of the view pipeline over the bundled episode preset
//!
//! These tests verify that:
//! - An empty query leaves the collection untouched
//! - Relevance tiers, filters and sorting compose as one pure function
//! - Missing values sort last in both directions
//! - Data-quality problems surface as warnings, never as errors

use recordview::prelude::*;
use serde_json::json;

fn episodes() -> Vec<Record> {
    let data = json!({
        "items": [
            {
                "rank": 3,
                "title": "The Parting of the Ways",
                "series": 1,
                "era": "Modern",
                "broadcast_date": "2005-06-18",
                "director": "Joe Ahearne",
                "writer": "Russell T Davies",
                "doctor": { "actor": "Christopher Eccleston", "incarnation": "Ninth Doctor" },
                "companion": { "actor": "Billie Piper", "character": "Rose Tyler" }
            },
            {
                "rank": 2,
                "title": "The Rose Garden",
                "series": 5,
                "era": "Modern",
                "broadcast_date": "2010-04-03",
                "director": "Adam Smith",
                "writer": "Steven Moffat",
                "doctor": { "actor": "Matt Smith", "incarnation": "Eleventh Doctor" }
            },
            {
                "rank": 1,
                "title": "Rose",
                "series": 1,
                "era": "Modern",
                "broadcast_date": "March 26, 2005",
                "director": "Keith Boak",
                "writer": "Russell T Davies",
                "doctor": { "actor": "Christopher Eccleston", "incarnation": "Ninth Doctor" },
                "companion": { "actor": "Billie Piper", "character": "Rose Tyler" },
                "cast": [{ "name": "Camille Coduri" }, { "name": "Noel Clarke" }]
            },
            {
                "rank": 4,
                "title": "Blink",
                "series": 3,
                "era": "Modern",
                "broadcast_date": "09/06/2007",
                "director": "Hettie MacDonald",
                "writer": "Steven Moffat",
                "doctor": { "actor": "David Tennant", "incarnation": "Tenth Doctor" },
                "companion": { "actor": "Freema Agyeman", "character": "Martha Jones" }
            },
            {
                "rank": 5,
                "title": "Midnight",
                "series": 4,
                "era": "Modern",
                "director": "Alice Troughton",
                "writer": "Russell T Davies",
                "doctor": { "actor": "David Tennant" }
            }
        ]
    });
    let config = ViewConfig::preset(Preset::Episodes).unwrap();
    parse_records(&data.to_string(), &config.envelope_keys()).unwrap()
}

fn state() -> AppState {
    let config = ViewConfig::preset(Preset::Episodes).unwrap();
    AppState::new(episodes(), config.schema()).with_current_year(2026)
}

// =============================================================================
// Identity and Purity
// =============================================================================

mod identity_tests {
    use super::*;

    #[test]
    fn test_empty_query_without_default_sort_is_identity() {
        let config = ViewConfig::preset(Preset::Episodes).unwrap();
        let schema = config.schema().with_default_sort(SortSpec::new());
        let state = AppState::new(episodes(), schema);

        let view = state.view();
        assert_eq!(view.indices(), vec![0, 1, 2, 3, 4]);
        assert_eq!(view.total, 5);
        assert!(view.pagination.is_none());
    }

    #[test]
    fn test_empty_query_applies_default_sort() {
        let state = state();
        let view = state.view();
        assert_eq!(view.indices(), vec![2, 1, 0, 3, 4]);
    }

    #[test]
    fn test_blank_text_matches_everything() {
        let state = state().with_text("   ");
        let view = state.view();
        assert_eq!(view.len(), 5);
        assert!(view.entries.iter().all(|entry| entry.tier.is_none()));
    }

    #[test]
    fn test_view_is_repeatable() {
        let state = state().with_text("rose").toggle_sort("broadcast_date");
        let first = state.view().indices();
        let second = state.view().indices();
        assert_eq!(first, second);
    }

    #[test]
    fn test_reapplying_same_query_is_idempotent() {
        let state = state().with_filter("era", "modern").with_text("davies");
        let again = state
            .clone()
            .with_filter("era", "modern")
            .with_text("davies");
        assert_eq!(state.view().indices(), again.view().indices());
    }

    #[test]
    fn test_run_matches_state_view() {
        let state = state().with_text("tennant");
        let direct = run(state.records(), state.schema(), state.query(), state.context());
        assert_eq!(direct.indices(), state.view().indices());
    }

    #[test]
    fn test_base_collection_untouched() {
        let state = state();
        let before: Vec<Record> = state.records().to_vec();
        let _ = state.clone().with_text("rose").toggle_sort("title").view();
        assert_eq!(state.records(), before.as_slice());
    }
}

// =============================================================================
// Search Relevance
// =============================================================================

mod relevance_tests {
    use super::*;

    #[test]
    fn test_rose_tiers() {
        let state = state().with_text("Rose");
        let view = state.view();
        assert_eq!(view.indices(), vec![2, 1, 0]);

        let tiers: Vec<_> = view.entries.iter().map(|entry| entry.tier).collect();
        assert_eq!(
            tiers,
            vec![
                Some(RelevanceTier::Exact),
                Some(RelevanceTier::PrimaryContains),
                Some(RelevanceTier::OtherField),
            ]
        );
    }

    #[test]
    fn test_tiers_rank_before_explicit_sort() {
        let state = state()
            .with_text("rose")
            .with_sort(SortSpec::by("broadcast_date", SortDirection::Descending));
        let view = state.view();
        assert_eq!(view.indices(), vec![2, 1, 0]);
    }

    #[test]
    fn test_relevance_off_uses_sort_only() {
        let state = state()
            .with_text("rose")
            .with_relevance(false)
            .with_sort(SortSpec::by("broadcast_date", SortDirection::Descending));
        let view = state.view();
        assert_eq!(view.indices(), vec![1, 0, 2]);
    }

    #[test]
    fn test_search_reaches_hidden_list_column() {
        let state = state().with_text("coduri");
        let view = state.view();
        assert_eq!(view.indices(), vec![2]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let upper = state().with_text("MOFFAT").view().indices();
        let lower = state().with_text("moffat").view().indices();
        assert_eq!(upper, lower);
        assert_eq!(upper, vec![1, 3]);
    }
}

// =============================================================================
// Filtering
// =============================================================================

mod filter_tests {
    use super::*;

    #[test]
    fn test_decade_filter_excludes_missing_dates() {
        let state = state().with_filter("broadcast_date", "2000s");
        let view = state.view();
        assert_eq!(view.indices(), vec![2, 0, 3]);
    }

    #[test]
    fn test_range_filter() {
        let state = state().with_filter("rank", "2..3");
        let view = state.view();
        assert_eq!(view.indices(), vec![1, 0]);
    }

    #[test]
    fn test_filters_and_text_compose() {
        let state = state()
            .with_filter("series", "1")
            .with_text("rose");
        let view = state.view();
        assert_eq!(view.indices(), vec![2, 0]);
    }

    #[test]
    fn test_all_means_no_filter() {
        let state = state().with_filter("era", "all");
        let view = state.view();
        assert_eq!(view.len(), 5);
    }

    #[test]
    fn test_unknown_filter_column_is_ignored() {
        let state = state().with_filter("budget", "100");
        let view = state.view();
        assert_eq!(view.len(), 5);
    }

    #[test]
    fn test_no_match_gives_empty_view() {
        let state = state().with_filter("era", "Classic");
        let view = state.view();
        assert!(view.is_empty());
        assert_eq!(view.total, 0);
    }

    #[test]
    fn test_clear_filters_restores_everything() {
        let state = state()
            .with_filter("era", "Classic")
            .with_text("rose")
            .clear_filters();
        let view = state.view();
        assert_eq!(view.len(), 5);
    }
}

// =============================================================================
// Sorting
// =============================================================================

mod sort_tests {
    use super::*;

    #[test]
    fn test_missing_dates_last_ascending() {
        let state = state().toggle_sort("broadcast_date");
        let view = state.view();
        assert_eq!(view.indices(), vec![2, 0, 3, 1, 4]);
    }

    #[test]
    fn test_missing_dates_last_descending() {
        let state = state()
            .toggle_sort("broadcast_date")
            .toggle_sort("broadcast_date");
        let view = state.view();
        assert_eq!(view.indices(), vec![1, 3, 0, 2, 4]);
    }

    #[test]
    fn test_first_click_on_default_sort_column_flips_it() {
        let state = state();
        assert_eq!(state.view().indices(), vec![2, 1, 0, 3, 4]);

        let state = state.toggle_sort("rank");
        assert_eq!(state.query().sort.to_string(), "rank:desc");
        assert_eq!(state.view().indices(), vec![4, 3, 0, 1, 2]);

        let state = state.toggle_sort("rank");
        assert_eq!(state.view().indices(), vec![2, 1, 0, 3, 4]);
    }

    #[test]
    fn test_toggle_new_column_resets_to_ascending() {
        let state = state()
            .toggle_sort("broadcast_date")
            .toggle_sort("broadcast_date")
            .toggle_sort("title");
        assert_eq!(state.query().sort.to_string(), "title:asc");
    }

    #[test]
    fn test_secondary_key_breaks_ties() {
        let sort = SortSpec::by("series", SortDirection::Ascending)
            .then_by("rank", SortDirection::Descending);
        let state = state().with_sort(sort);
        let view = state.view();
        assert_eq!(view.indices(), vec![0, 2, 3, 4, 1]);
    }

    #[test]
    fn test_equal_keys_keep_base_order() {
        let state = state().with_sort(SortSpec::parse("series"));
        let view = state.view();
        // "The Parting of the Ways" and "Rose" share series 1
        assert_eq!(view.indices(), vec![0, 2, 3, 4, 1]);
    }
}

// =============================================================================
// Pagination
// =============================================================================

mod pagination_tests {
    use super::*;

    #[test]
    fn test_second_page() {
        let state = state().with_page(2, 2);
        let view = state.view();
        assert_eq!(view.indices(), vec![0, 3]);
        assert_eq!(view.total, 5);

        let meta = view.pagination.unwrap();
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let state = state().with_page(9, 2);
        let view = state.view();
        assert!(view.is_empty());
        assert_eq!(view.total, 5);
    }

    #[test]
    fn test_extreme_page_is_empty() {
        let state = state().with_page(usize::MAX, 20);
        let view = state.view();
        assert!(view.is_empty());
        assert_eq!(view.total, 5);
        assert!(!view.pagination.unwrap().has_next);
    }

    #[test]
    fn test_extreme_page_from_params() {
        let state = state();
        let params = QueryParams {
            page: Some(1 << 62),
            limit: Some(100),
            ..QueryParams::default()
        };
        let query = params.to_query(&state.schema().registry);
        let state = state.with_query(query);
        let view = state.view();
        assert!(view.is_empty());
        assert_eq!(view.pagination.unwrap().total_pages, 1);
    }

    #[test]
    fn test_new_search_rewinds_to_first_page() {
        let state = state().with_page(3, 2).with_text("rose");
        assert_eq!(state.query().page, Some(1));
    }
}

// =============================================================================
// Display
// =============================================================================

mod display_tests {
    use super::*;

    #[test]
    fn test_headers_skip_hidden_columns() {
        let state = state();
        let headers = ViewOutput::headers(&state.schema().registry);
        assert_eq!(headers.first().map(String::as_str), Some("Rank"));
        assert_eq!(headers.len(), 10);
    }

    #[test]
    fn test_rows_render_people_and_placeholders() {
        let state = state();
        let view = state.view();
        let rows = view.display_rows(&state.schema().registry);

        // Rose
        assert_eq!(rows[0][0], "1");
        assert_eq!(rows[0][4], "2005");
        assert_eq!(rows[0][7], "Christopher Eccleston (Ninth Doctor)");
        assert_eq!(rows[0][9], "2");

        // Midnight: no date, no companion, no incarnation
        let midnight = rows.last().unwrap();
        assert_eq!(midnight[4], PLACEHOLDER);
        assert_eq!(midnight[7], format!("David Tennant ({})", PLACEHOLDER));
        assert_eq!(midnight[8], PLACEHOLDER);
    }
}

// =============================================================================
// Validation Warnings
// =============================================================================

mod warning_tests {
    use super::*;

    fn flawed() -> Vec<Record> {
        vec![
            Record::new(json!({"rank": 1, "title": "Rose", "broadcast_date": "2005-03-26"})),
            Record::new(json!({"rank": 1, "title": "Rose again"})),
            Record::new(json!({"rank": 2, "series": -4, "broadcast_date": "2099"})),
        ]
    }

    fn flawed_state() -> AppState {
        let config = ViewConfig::preset(Preset::Episodes).unwrap();
        AppState::new(flawed(), config.schema()).with_current_year(2026)
    }

    #[test]
    fn test_clean_dataset_has_no_warnings() {
        assert_eq!(state().view().warning_count(), 0);
    }

    #[test]
    fn test_duplicate_rank_flags_second_occurrence() {
        let state = flawed_state();
        let view = state.view();
        let duplicates: Vec<_> = view
            .warnings
            .iter()
            .filter(|w| w.code == WarningCode::DuplicateId)
            .collect();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].record.index, 1);
        assert_eq!(duplicates[0].record.id.as_deref(), Some("1"));
    }

    #[test]
    fn test_every_problem_reported() {
        let state = flawed_state();
        let view = state.view();
        let codes: Vec<_> = view.warnings_for(2).map(|w| w.code).collect();
        assert_eq!(
            codes,
            vec![
                WarningCode::MissingField,
                WarningCode::NegativeValue,
                WarningCode::FutureDate,
            ]
        );
    }

    #[test]
    fn test_future_date_depends_on_current_year() {
        let state = flawed_state().with_current_year(2100);
        let view = state.view();
        assert!(view.warnings.iter().all(|w| w.code != WarningCode::FutureDate));
    }

    #[test]
    fn test_warnings_cover_filtered_out_records() {
        let state = flawed_state().with_text("nothing matches this");
        let view = state.view();
        assert!(view.is_empty());
        assert_eq!(view.warning_count(), 4);
    }

    #[test]
    fn test_flawed_records_still_displayed() {
        let state = flawed_state();
        let view = state.view();
        assert_eq!(view.len(), 3);
    }
}
