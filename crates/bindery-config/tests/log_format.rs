//! Tests for log format parsing.

use std::str::FromStr;

use rstest::rstest;

use bindery_config::{Config, LogFormat};

#[rstest]
#[case::json("json", LogFormat::Json)]
#[case::compact("compact", LogFormat::Compact)]
#[case::mixed_case("Compact", LogFormat::Compact)]
fn parses_log_formats(#[case] text: &str, #[case] expected: LogFormat) {
    assert_eq!(LogFormat::from_str(text).expect("known format"), expected);
}

#[test]
fn rejects_unknown_log_formats() {
    assert!(LogFormat::from_str("yaml").is_err());
}

#[test]
fn log_format_displays_in_snake_case() {
    assert_eq!(LogFormat::Compact.to_string(), "compact");
}

#[test]
fn builders_override_defaults() {
    let config = Config::default()
        .with_log_filter("bindery=trace")
        .with_log_format(LogFormat::Compact)
        .with_strict_identifiers(true);
    assert_eq!(config.log_filter(), "bindery=trace");
    assert_eq!(config.log_format(), LogFormat::Compact);
    assert!(config.strict_identifiers());
}
