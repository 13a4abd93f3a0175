use std::env;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use turfquote_cli::commands::{migrate, quote, score, seed};

#[test]
fn migrate_returns_success_with_valid_env() {
    with_env(&[("TURFQUOTE_DATABASE_URL", "sqlite::memory:")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn migrate_returns_config_failure_with_invalid_database_url() {
    with_env(&[("TURFQUOTE_DATABASE_URL", "postgres://nope")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn seed_returns_deterministic_service_summary() {
    with_env(&[("TURFQUOTE_DATABASE_URL", "sqlite::memory:")], || {
        let result = seed::run();
        assert_eq!(result.exit_code, 0, "expected successful seed run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["status"], "ok");

        let message = payload["message"].as_str().unwrap_or("");
        assert!(message.contains("  - maintenance: lawn-mowing"));
        assert!(message.contains("  - cleanup: fall-cleanup"));
        assert!(message.contains("  - landscaping: mulch-install"));
    });
}

#[test]
fn seed_is_idempotent_across_runs() {
    with_env(&[("TURFQUOTE_DATABASE_URL", "sqlite::memory:")], || {
        let first = seed::run();
        assert_eq!(first.exit_code, 0, "expected first seed invocation success");

        let second = seed::run();
        assert_eq!(second.exit_code, 0, "expected second seed invocation success");

        assert_eq!(parse_payload(&first.output)["message"], parse_payload(&second.output)["message"]);
    });
}

#[test]
fn score_preview_runs_offline_without_catalog_lookups() {
    with_env(&[], || {
        let result = score::run(score::ScoreArgs {
            name: Some("Jordan Ellis".to_string()),
            email: Some("jordan.ellis@example.com".to_string()),
            phone: Some("973-555-0142".to_string()),
            address: Some("12 Ridgewood Rd".to_string()),
            city: Some("Maplewood".to_string()),
            zip: Some("07040".to_string()),
            service: None,
            location: None,
            tier: Some("better".to_string()),
            frequency: Some("weekly".to_string()),
            notes: Some("Back yard slopes toward the fence line".to_string()),
            save: false,
        });
        assert_eq!(result.exit_code, 0, "preview should not need a database");

        let payload = parse_payload(&result.output);
        // 15 + 15 + 10 + 5 + 15 + 15 + 5 without service/location points.
        assert_eq!(payload["score"], 80);
        assert_eq!(payload["saved"], false);
        assert_eq!(payload["lead_id"], Value::Null);
    });
}

#[test]
fn score_rejects_an_unknown_tier() {
    with_env(&[], || {
        let result = score::run(score::ScoreArgs {
            name: None,
            email: None,
            phone: None,
            address: None,
            city: None,
            zip: None,
            service: None,
            location: None,
            tier: Some("platinum".to_string()),
            frequency: None,
            notes: None,
            save: false,
        });
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "invalid_input");
    });
}

#[test]
fn quote_and_score_share_the_seeded_catalog() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let database_url =
        format!("sqlite://{}?mode=rwc", dir.path().join("turfquote.db").display());

    with_env(&[("TURFQUOTE_DATABASE_URL", &database_url)], || {
        assert_eq!(migrate::run().exit_code, 0, "migrate should succeed");
        assert_eq!(seed::run().exit_code, 0, "seed should succeed");

        let result = quote::run(quote::QuoteArgs {
            service: "lawn-mowing".to_string(),
            location: Some("maplewood".to_string()),
            lot_size: Some("small".to_string()),
            month: Some(1),
        });
        assert_eq!(result.exit_code, 0, "quote should succeed: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "quote");
        assert_eq!(payload["display_season"], "winter");
        assert_eq!(payload["seasonal_label"], "Off-season rate");

        let ranges = payload["ranges"].as_array().expect("ranges array");
        assert_eq!(ranges.len(), 3);
        // Maplewood override [45,65] at the 0.90 off-season rate.
        assert_eq!(ranges[0]["tier"], "good");
        assert_eq!(ranges[0]["min"], 41);
        assert_eq!(ranges[0]["max"], 59);

        let saved = score::run(score::ScoreArgs {
            name: Some("Jordan Ellis".to_string()),
            email: Some("jordan.ellis@example.com".to_string()),
            phone: Some("973-555-0142".to_string()),
            address: Some("12 Ridgewood Rd".to_string()),
            city: Some("Maplewood".to_string()),
            zip: Some("07040".to_string()),
            service: Some("lawn-mowing".to_string()),
            location: Some("maplewood".to_string()),
            tier: Some("better".to_string()),
            frequency: Some("weekly".to_string()),
            notes: Some("Back yard slopes toward the fence line".to_string()),
            save: true,
        });
        assert_eq!(saved.exit_code, 0, "score --save should succeed: {}", saved.output);

        let payload = parse_payload(&saved.output);
        assert_eq!(payload["score"], 95);
        assert_eq!(payload["saved"], true);
        assert!(payload["lead_id"].is_string());
    });
}

#[test]
fn quote_reports_unknown_service_as_not_found() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let database_url =
        format!("sqlite://{}?mode=rwc", dir.path().join("turfquote.db").display());

    with_env(&[("TURFQUOTE_DATABASE_URL", &database_url)], || {
        assert_eq!(migrate::run().exit_code, 0, "migrate should succeed");

        let result = quote::run(quote::QuoteArgs {
            service: "hedge-sculpting".to_string(),
            location: None,
            lot_size: None,
            month: Some(6),
        });
        assert_eq!(result.exit_code, 6);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "not_found");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "TURFQUOTE_DATABASE_URL",
        "TURFQUOTE_DATABASE_MAX_CONNECTIONS",
        "TURFQUOTE_DATABASE_TIMEOUT_SECS",
        "TURFQUOTE_SITE_BUSINESS_NAME",
        "TURFQUOTE_SITE_CONTACT_PHONE",
        "TURFQUOTE_SITE_CONTACT_EMAIL",
        "TURFQUOTE_SITE_DEFAULT_LOCATION_SLUG",
        "TURFQUOTE_SITE_QUOTE_VALIDITY_DAYS",
        "TURFQUOTE_LOGGING_LEVEL",
        "TURFQUOTE_LOGGING_FORMAT",
        "TURFQUOTE_LOG_LEVEL",
        "TURFQUOTE_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
