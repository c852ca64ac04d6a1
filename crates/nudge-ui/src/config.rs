use chrono_tz::Tz;
use nudge_core::config::{
  AppConfig,
  load_app_config,
  resolve_timezone
};

const APP_CONFIG_TOML: &str =
  include_str!("../nudge.toml");

/// Parse the embedded settings
/// file. Sanitization and the
/// defaults fallback live in the
/// core crate.
pub fn app_config() -> AppConfig {
  load_app_config(APP_CONFIG_TOML)
}

/// Timezone the frontend renders
/// and parses due dates in.
pub fn app_timezone(
  config: &AppConfig
) -> Tz {
  resolve_timezone(config)
}
