//! Focused unit tests covering search CLI configuration resolution.

use super::*;
use crate::search::{CenterSource, SearchArgs, config_from_args_for_test};
use geo::Coord;
use rstest::rstest;
use waymark_data::{DEFAULT_QUERY, DEFAULT_RADIUS_METERS};

#[rstest]
fn coordinate_pair_becomes_the_centre() {
    let args = SearchArgs {
        lat: Some(37.7749),
        lon: Some(-122.4194),
        ..SearchArgs::default()
    };
    let config = config_from_args_for_test(args).expect("coordinate pair should resolve");
    assert_eq!(
        config.center,
        CenterSource::Coordinate(Coord {
            x: -122.4194,
            y: 37.7749
        })
    );
}

#[rstest]
fn defaults_fill_query_and_radius() {
    let args = SearchArgs {
        lat: Some(37.7749),
        lon: Some(-122.4194),
        ..SearchArgs::default()
    };
    let config = config_from_args_for_test(args).expect("coordinate pair should resolve");
    assert_eq!(config.query, DEFAULT_QUERY);
    assert_eq!(config.radius_meters, DEFAULT_RADIUS_METERS);
    assert!(config.visits_db.is_none());
    assert!(!config.json);
}

#[rstest]
fn address_becomes_the_centre_when_no_pair_is_given() {
    let args = SearchArgs {
        address: Some("100 Larkin St, San Francisco".to_owned()),
        ..SearchArgs::default()
    };
    let config = config_from_args_for_test(args).expect("address should resolve");
    assert_eq!(
        config.center,
        CenterSource::Address("100 Larkin St, San Francisco".to_owned())
    );
}

#[rstest]
#[case(Some(37.7749), None, ARG_SEARCH_LON, ENV_SEARCH_LON)]
#[case(None, Some(-122.4194), ARG_SEARCH_LAT, ENV_SEARCH_LAT)]
fn half_a_coordinate_pair_errors(
    #[case] lat: Option<f64>,
    #[case] lon: Option<f64>,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let args = SearchArgs {
        lat,
        lon,
        ..SearchArgs::default()
    };
    let err = config_from_args_for_test(args).expect_err("half a pair should error");
    match err {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn no_centre_at_all_errors() {
    let err = config_from_args_for_test(SearchArgs::default()).expect_err("expected failure");
    assert!(matches!(err, CliError::MissingCenter));
}

#[rstest]
fn explicit_options_override_the_defaults() {
    let args = SearchArgs {
        lat: Some(51.5072),
        lon: Some(-0.1276),
        radius_meters: Some(800.0),
        query: Some("coffee".to_owned()),
        base_url: Some("https://nominatim.example".to_owned()),
        json: true,
        ..SearchArgs::default()
    };
    let config = config_from_args_for_test(args).expect("explicit options should resolve");
    assert_eq!(config.query, "coffee");
    assert_eq!(config.radius_meters, 800.0);
    assert_eq!(config.base_url.as_deref(), Some("https://nominatim.example"));
    assert!(config.json);
}
