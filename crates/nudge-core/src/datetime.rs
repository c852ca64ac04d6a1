use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::{
  Context,
  anyhow
};
use chrono::{
  DateTime,
  LocalResult,
  NaiveDate,
  NaiveDateTime,
  TimeZone,
  Utc
};
use chrono_tz::Tz;
use regex::Regex;
use serde::Deserialize;

const TIMEZONE_CONFIG_FILE: &str =
  "nudge-time.toml";
const TIMEZONE_ENV_VAR: &str =
  "NUDGE_TIMEZONE";
const TIMEZONE_CONFIG_ENV_VAR: &str =
  "NUDGE_TIME_CONFIG";

/// Wire format of the
/// datetime-local input the add
/// form submits: minute precision,
/// no zone.
const DUE_INPUT_FORMAT: &str =
  "%Y-%m-%dT%H:%M";

#[derive(Debug, Deserialize)]
struct TimezoneConfig {
  timezone: Option<String>,
  time:     Option<TimezoneSection>
}

#[derive(Debug, Deserialize)]
struct TimezoneSection {
  timezone: Option<String>
}

/// Timezone due-date inputs are
/// interpreted in. Resolved once:
/// env var, then config file, then
/// UTC.
pub fn project_timezone() -> &'static Tz
{
  static PROJECT_TZ: OnceLock<Tz> =
    OnceLock::new();
  PROJECT_TZ.get_or_init(
    resolve_project_timezone
  )
}

fn resolve_project_timezone() -> Tz {
  if let Ok(raw) =
    std::env::var(TIMEZONE_ENV_VAR)
    && let Some(tz) = parse_timezone(
      &raw,
      TIMEZONE_ENV_VAR
    )
  {
    return tz;
  }

  if let Some(path) =
    timezone_config_path()
    && let Some(tz) =
      load_timezone_from_file(&path)
  {
    return tz;
  }

  chrono_tz::UTC
}

fn timezone_config_path()
-> Option<PathBuf> {
  if let Ok(raw) = std::env::var(
    TIMEZONE_CONFIG_ENV_VAR
  ) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
      return Some(PathBuf::from(
        trimmed
      ));
    }
  }

  std::env::current_dir().ok().map(
    |dir| {
      dir.join(TIMEZONE_CONFIG_FILE)
    }
  )
}

fn load_timezone_from_file(
  path: &PathBuf
) -> Option<Tz> {
  if !path.exists() {
    return None;
  }

  let raw = match fs::read_to_string(
    path
  ) {
    | Ok(raw) => raw,
    | Err(err) => {
      tracing::error!(
        file = %path.display(),
        error = %err,
        "failed reading timezone config file"
      );
      return None;
    }
  };

  let parsed = match toml::from_str::<
    TimezoneConfig
  >(&raw)
  {
    | Ok(parsed) => parsed,
    | Err(err) => {
      tracing::error!(
        file = %path.display(),
        error = %err,
        "failed parsing timezone config file"
      );
      return None;
    }
  };

  let timezone =
    parsed.timezone.or_else(|| {
      parsed.time.and_then(|section| {
        section.timezone
      })
    });
  let Some(timezone) = timezone else {
    tracing::warn!(
      file = %path.display(),
      "timezone config had no timezone field"
    );
    return None;
  };

  parse_timezone(
    timezone.as_str(),
    &format!("file:{}", path.display())
  )
}

/// Parse a timezone id, logging the
/// source it came from.
pub fn parse_timezone(
  raw: &str,
  source: &str
) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => {
      tracing::info!(
        source,
        timezone = %trimmed,
        "configured timezone"
      );
      Some(tz)
    }
    | Err(err) => {
      tracing::error!(
        source,
        timezone = %trimmed,
        error = %err,
        "failed to parse timezone id"
      );
      None
    }
  }
}

fn to_utc_from_local(
  local_naive: NaiveDateTime,
  tz: Tz,
  context: &str
) -> anyhow::Result<DateTime<Utc>> {
  match tz
    .from_local_datetime(&local_naive)
  {
    | LocalResult::Single(local_dt) => {
      Ok(local_dt.with_timezone(&Utc))
    }
    | LocalResult::Ambiguous(
      first,
      second
    ) => {
      tracing::warn!(
        context,
        first = %first,
        second = %second,
        "ambiguous local datetime; using earliest"
      );
      let chosen = if first <= second {
        first
      } else {
        second
      };
      Ok(chosen.with_timezone(&Utc))
    }
    | LocalResult::None => {
      Err(anyhow!(
        "local datetime does not \
         exist in timezone {tz}: \
         {context}"
      ))
    }
  }
}

/// Parse the due-date field of the
/// add form. Blank means the task
/// has no due date. The primary
/// format is what a datetime-local
/// input produces; RFC 3339 and a
/// couple of hand-typed variants
/// are accepted as fallbacks.
#[tracing::instrument(skip(raw, tz), fields(input = raw))]
pub fn parse_due_input(
  raw: &str,
  tz: Tz
) -> anyhow::Result<
  Option<DateTime<Utc>>
> {
  let token = raw.trim();
  if token.is_empty() {
    return Ok(None);
  }

  let minute_re = Regex::new(
    r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}$"
  )
  .map_err(|e| {
    anyhow!(
      "internal regex compile \
       failure: {e}"
    )
  })?;

  if minute_re.is_match(token) {
    let ndt =
      NaiveDateTime::parse_from_str(
        token,
        DUE_INPUT_FORMAT
      )
      .context(
        "invalid datetime-local value"
      )?;
    return to_utc_from_local(
      ndt,
      tz,
      "datetime-local"
    )
    .map(Some);
  }

  if let Ok(dt) =
    DateTime::parse_from_rfc3339(token)
  {
    return Ok(Some(
      dt.with_timezone(&Utc)
    ));
  }

  if let Ok(ndt) =
    NaiveDateTime::parse_from_str(
      token,
      "%Y-%m-%d %H:%M"
    )
  {
    return to_utc_from_local(
      ndt,
      tz,
      "date-space-time"
    )
    .map(Some);
  }

  if let Ok(date) =
    NaiveDate::parse_from_str(
      token, "%Y-%m-%d"
    )
  {
    let midnight = date
      .and_hms_opt(0, 0, 0)
      .ok_or_else(|| {
        anyhow!(
          "failed to construct \
           midnight for date"
        )
      })?;
    return to_utc_from_local(
      midnight,
      tz,
      "date"
    )
    .map(Some);
  }

  Err(anyhow!(
    "unrecognized due date: {raw}"
  ))
  .with_context(|| {
    "supported formats: \
     YYYY-MM-DDTHH:MM, RFC3339, \
     YYYY-MM-DD HH:MM, YYYY-MM-DD"
  })
}

/// Display form of a due date in
/// the given timezone.
#[must_use]
pub fn format_due(
  dt: DateTime<Utc>,
  tz: Tz
) -> String {
  dt.with_timezone(&tz)
    .format("%Y-%m-%d %H:%M")
    .to_string()
}

#[cfg(test)]
mod tests {
  use chrono::{
    TimeZone,
    Utc
  };

  use super::{
    format_due,
    parse_due_input
  };

  #[test]
  fn parses_datetime_local_input() {
    let parsed = parse_due_input(
      "2026-03-04T15:30",
      chrono_tz::UTC
    )
    .expect("parse")
    .expect("some due date");
    assert_eq!(
      parsed,
      Utc
        .with_ymd_and_hms(
          2026, 3, 4, 15, 30, 0
        )
        .single()
        .expect("valid datetime")
    );
  }

  #[test]
  fn blank_input_means_no_due_date() {
    assert!(
      parse_due_input(
        "   ",
        chrono_tz::UTC
      )
      .expect("parse")
      .is_none()
    );
  }

  #[test]
  fn respects_the_given_timezone() {
    let parsed = parse_due_input(
      "2026-03-04T15:30",
      chrono_tz::America::Mexico_City
    )
    .expect("parse")
    .expect("some due date");
    assert_eq!(
      format_due(
        parsed,
        chrono_tz::America::Mexico_City
      ),
      "2026-03-04 15:30"
    );
    assert_eq!(
      format_due(parsed, chrono_tz::UTC),
      "2026-03-04 21:30"
    );
  }

  #[test]
  fn rejects_garbage_input() {
    assert!(
      parse_due_input(
        "next thursday-ish",
        chrono_tz::UTC
      )
      .is_err()
    );
  }
}
