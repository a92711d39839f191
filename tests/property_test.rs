//! Property-based tests for forwarding invariants.
//!
//! Uses randomly generated inputs to verify that payload serialization and
//! token-list handling always hold, regardless of input shape.

use hearth_core::{Config, Event};
use proptest::prelude::*;
use serde_json::Value;

/// Creates property test configuration based on environment.
///
/// Uses environment variables:
/// - `PROPTEST_CASES`: Number of test cases (default: 32 for dev, 128 for CI)
/// - `CI`: If set to "true", uses CI configuration
fn proptest_config() -> ProptestConfig {
    let is_ci = std::env::var("CI").unwrap_or_default() == "true";
    let default_cases = if is_ci { 128 } else { 32 };

    let cases =
        std::env::var("PROPTEST_CASES").ok().and_then(|s| s.parse().ok()).unwrap_or(default_cases);

    ProptestConfig::with_cases(cases)
}

/// Bounded strategy for arbitrary JSON-compatible payloads.
fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[a-zA-Z0-9 _.:-]{0,16}".prop_map(Value::String),
    ];

    leaf.prop_recursive(3, 24, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-z_]{1,8}", inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

/// Optional token values, including empty strings that must be filtered.
fn token_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        "[a-zA-Z0-9._-]{1,40}".prop_map(Some),
    ]
}

fn config_with(token_1: Option<String>, token_2: Option<String>, host: String) -> Config {
    Config {
        ha_url: host,
        ha_api_path: "/api/alexa/smart_home".to_string(),
        ha_token_1: token_1,
        ha_token_2: token_2,
        debug: false,
        connect_timeout_ms: 2_000,
        read_timeout_ms: 10_000,
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    /// The serialized body never changes between attempts: serializing the
    /// same event twice yields byte-identical buffers.
    #[test]
    fn serialization_is_stable(payload in json_value_strategy()) {
        let event = Event::new(payload);

        let first = event.to_body().expect("serialization should succeed");
        let second = event.to_body().expect("serialization should succeed");

        prop_assert_eq!(first, second, "payload bytes must not be re-derived differently");
    }

    /// The serialized body decodes back to the original payload.
    #[test]
    fn serialization_round_trips(payload in json_value_strategy()) {
        let event = Event::new(payload.clone());
        let body = event.to_body().expect("serialization should succeed");

        let decoded: Value = serde_json::from_slice(&body).expect("body should be valid JSON");
        prop_assert_eq!(decoded, payload);
    }

    /// Token filtering drops only unusable entries and never reorders:
    /// token 1 always precedes token 2 when both survive.
    #[test]
    fn token_list_preserves_precedence(
        token_1 in token_strategy(),
        token_2 in token_strategy(),
    ) {
        let config = config_with(token_1.clone(), token_2.clone(), "home.example.net".to_string());
        let tokens = config.tokens();

        let expected: Vec<&str> = [token_1.as_deref(), token_2.as_deref()]
            .into_iter()
            .flatten()
            .filter(|t| !t.is_empty())
            .collect();

        prop_assert_eq!(&tokens, &expected);
        prop_assert!(tokens.len() <= 2);
        prop_assert!(tokens.iter().all(|t| !t.is_empty()));
    }

    /// A bare host always composes an https URL ending in the API path.
    #[test]
    fn bare_hosts_compose_https_urls(host in "[a-z0-9.-]{1,30}") {
        let config = config_with(None, None, host.clone());
        let url = config.endpoint_url();

        prop_assert!(url.starts_with("https://"), "composed URL was {}", url);
        prop_assert!(url.ends_with("/api/alexa/smart_home"));
    }
}
