//! Domain crate for the nudge
//! to-do app: the in-memory task
//! store, the reminder scan, the
//! Gemini-backed idea generator,
//! and due-date handling. Compiles
//! natively (where all tests run)
//! and for wasm32, where the yew
//! frontend drives it.

pub mod config;
pub mod datetime;
pub mod ideas;
pub mod reminder;
pub mod store;
pub mod task;

#[cfg(not(target_arch = "wasm32"))]
use std::io::IsTerminal;

#[cfg(not(target_arch = "wasm32"))]
use anyhow::anyhow;

/// Install the native tracing
/// subscriber. The frontend
/// installs `wasm-tracing` at mount
/// instead.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_tracing()
-> anyhow::Result<()> {
  use tracing_subscriber::EnvFilter;

  let env_filter =
    EnvFilter::try_from_default_env()
      .or_else(|_| {
        EnvFilter::try_new("warn")
      })
      .map_err(|e| {
        anyhow!(
          "invalid RUST_LOG / log \
           filter: {e}"
        )
      })?;

  let init_result =
    tracing_subscriber::fmt()
      .with_env_filter(env_filter)
      .with_target(true)
      .with_level(true)
      .with_ansi(
        std::io::stderr().is_terminal()
      )
      .try_init();

  if let Err(err) = init_result {
    tracing::debug!(error = %err, "tracing subscriber already set, continuing");
  }

  Ok(())
}
