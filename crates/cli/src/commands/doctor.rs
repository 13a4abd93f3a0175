use serde_json::json;

use turfquote_core::config::{AppConfig, LoadOptions};
use turfquote_db::{connect_with_settings, migrations, DemoCatalog};

struct Check {
    name: &'static str,
    passed: bool,
    detail: String,
}

/// Readiness report: config validity, database connectivity, migration
/// status, and demo-catalog presence. Informational; always exits zero.
pub fn run(json_output: bool) -> String {
    let mut checks = Vec::new();

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(Check {
                name: "config",
                passed: true,
                detail: "configuration loaded and validated".to_string(),
            });
            Some(config)
        }
        Err(error) => {
            checks.push(Check { name: "config", passed: false, detail: error.to_string() });
            None
        }
    };

    if let Some(config) = config {
        match tokio::runtime::Builder::new_current_thread().enable_all().build() {
            Ok(runtime) => runtime.block_on(async {
                let pool = match connect_with_settings(
                    &config.database.url,
                    config.database.max_connections,
                    config.database.timeout_secs,
                )
                .await
                {
                    Ok(pool) => {
                        checks.push(Check {
                            name: "database",
                            passed: true,
                            detail: format!("connected to {}", config.database.url),
                        });
                        pool
                    }
                    Err(error) => {
                        checks.push(Check {
                            name: "database",
                            passed: false,
                            detail: error.to_string(),
                        });
                        return;
                    }
                };

                let migrated = migrations::schema_present(&pool).await.unwrap_or(false);
                checks.push(Check {
                    name: "migrations",
                    passed: migrated,
                    detail: if migrated {
                        "catalog schema present".to_string()
                    } else {
                        "catalog schema missing; run `turfquote migrate`".to_string()
                    },
                });

                if migrated {
                    match DemoCatalog::verify(&pool).await {
                        Ok(verification) => checks.push(Check {
                            name: "demo_catalog",
                            passed: verification.all_present,
                            detail: if verification.all_present {
                                "demo catalog seeded".to_string()
                            } else {
                                "demo catalog absent or partial; run `turfquote seed`".to_string()
                            },
                        }),
                        Err(error) => checks.push(Check {
                            name: "demo_catalog",
                            passed: false,
                            detail: error.to_string(),
                        }),
                    }
                }

                pool.close().await;
            }),
            Err(error) => {
                checks.push(Check {
                    name: "database",
                    passed: false,
                    detail: format!("failed to initialize async runtime: {error}"),
                });
            }
        }
    }

    let all_passed = checks.iter().all(|check| check.passed);

    if json_output {
        let payload = json!({
            "command": "doctor",
            "status": if all_passed { "pass" } else { "fail" },
            "checks": checks.iter().map(|check| json!({
                "name": check.name,
                "passed": check.passed,
                "detail": check.detail,
            })).collect::<Vec<_>>(),
        });
        serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
    } else {
        let mut lines: Vec<String> = checks
            .iter()
            .map(|check| {
                format!(
                    "[{}] {}: {}",
                    if check.passed { "ok" } else { "!!" },
                    check.name,
                    check.detail
                )
            })
            .collect();
        lines.push(format!("doctor: {}", if all_passed { "pass" } else { "fail" }));
        lines.join("\n")
    }
}
