use serde_json::json;

use turfquote_core::config::{AppConfig, LoadOptions, LogFormat};

/// Dump the effective configuration after defaults, file, env, and override
/// resolution. There are no secret values in the TurfQuote config, so the
/// dump is unredacted.
pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return json!({
                "command": "config",
                "status": "error",
                "error_class": "config_validation",
                "message": format!("configuration issue: {error}"),
            })
            .to_string();
        }
    };

    let format = match config.logging.format {
        LogFormat::Compact => "compact",
        LogFormat::Pretty => "pretty",
        LogFormat::Json => "json",
    };

    let payload = json!({
        "command": "config",
        "status": "ok",
        "database": {
            "url": config.database.url,
            "max_connections": config.database.max_connections,
            "timeout_secs": config.database.timeout_secs,
        },
        "site": {
            "business_name": config.site.business_name,
            "contact_phone": config.site.contact_phone,
            "contact_email": config.site.contact_email,
            "default_location_slug": config.site.default_location_slug,
            "quote_validity_days": config.site.quote_validity_days,
        },
        "logging": {
            "level": config.logging.level,
            "format": format,
        },
    });

    serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
}
