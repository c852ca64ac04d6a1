use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{
  debug,
  info
};

use crate::datetime;
use crate::ideas::DEFAULT_GEMINI_MODEL;
use crate::reminder::REMINDER_INTERVAL_MS;

const API_KEY_ENV_VARS: [&str; 2] =
  ["GEMINI_API_KEY", "API_KEY"];

/// Application settings, parsed
/// from `nudge.toml`. The frontend
/// embeds the file at compile time;
/// native callers may read one from
/// disk. Every field has a default
/// so a missing or broken file
/// degrades to a working app.
#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct AppConfig {
  #[serde(default)]
  pub version:   u32,
  #[serde(default)]
  pub timezone:  Option<String>,
  #[serde(default)]
  pub reminders: ReminderSettings,
  #[serde(default)]
  pub ideas:     IdeaSettings
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct ReminderSettings {
  #[serde(default = "default_true")]
  pub enabled:     bool,
  #[serde(
    default = "default_interval_ms"
  )]
  pub interval_ms: u32
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct IdeaSettings {
  #[serde(default = "default_model")]
  pub model: String
}

fn default_true() -> bool {
  true
}

fn default_interval_ms() -> u32 {
  REMINDER_INTERVAL_MS
}

fn default_model() -> String {
  DEFAULT_GEMINI_MODEL.to_string()
}

impl Default for ReminderSettings {
  fn default() -> Self {
    Self {
      enabled:     true,
      interval_ms:
        default_interval_ms()
    }
  }
}

impl Default for IdeaSettings {
  fn default() -> Self {
    Self {
      model: default_model()
    }
  }
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      version:   1,
      timezone:  None,
      reminders:
        ReminderSettings::default(),
      ideas: IdeaSettings::default()
    }
  }
}

/// Parse a `nudge.toml` document,
/// falling back to defaults when it
/// does not parse at all.
pub fn load_app_config(
  raw: &str
) -> AppConfig {
  match toml::from_str::<AppConfig>(
    raw
  ) {
    | Ok(mut config) => {
      sanitize_app_config(&mut config);
      info!(
        version = config.version,
        timezone = ?config.timezone,
        interval_ms =
          config.reminders.interval_ms,
        model = %config.ideas.model,
        "loaded app config"
      );
      config
    }
    | Err(error) => {
      tracing::error!(%error, "failed parsing app config; using defaults");
      AppConfig::default()
    }
  }
}

/// Clamp and backfill anything a
/// hand-edited file could get
/// wrong.
pub fn sanitize_app_config(
  config: &mut AppConfig
) {
  if config.reminders.interval_ms
    < 1_000
  {
    config.reminders.interval_ms =
      REMINDER_INTERVAL_MS;
  }
  if config.reminders.interval_ms
    > 3_600_000
  {
    config.reminders.interval_ms =
      3_600_000;
  }

  if config
    .ideas
    .model
    .trim()
    .is_empty()
  {
    config.ideas.model =
      default_model();
  }
}

/// Timezone for this config: the
/// file's own setting when valid,
/// otherwise the process-wide
/// resolution.
pub fn resolve_timezone(
  config: &AppConfig
) -> Tz {
  if let Some(raw) =
    config.timezone.as_ref()
    && let Some(tz) =
      datetime::parse_timezone(
        raw,
        "nudge.toml"
      )
  {
    return tz;
  }

  *datetime::project_timezone()
}

/// Resolve the generation
/// credential once, at
/// construction: an explicit key
/// wins, then the environment.
/// `None` means the idea feature
/// runs unconfigured for the
/// lifetime of the app.
pub fn resolve_api_key(
  explicit: Option<String>
) -> Option<String> {
  if let Some(key) = explicit {
    let trimmed =
      key.trim().to_string();
    if !trimmed.is_empty() {
      debug!(
        "using explicitly supplied \
         API key"
      );
      return Some(trimmed);
    }
  }

  for var in API_KEY_ENV_VARS {
    if let Ok(value) =
      std::env::var(var)
    {
      let trimmed =
        value.trim().to_string();
      if !trimmed.is_empty() {
        debug!(
          var,
          "using API key from \
           environment"
        );
        return Some(trimmed);
      }
    }
  }

  None
}
