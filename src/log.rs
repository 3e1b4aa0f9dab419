//! Logging setup for hosts embedding this crate.
//!
//! The crate itself never calls [`init`] — only instruments its internals
//! with `tracing` spans/events. Hosts decide whether and how to collect
//! them; this module is a convenience for hosts that have nothing else.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

/// Install a file-rotated `tracing` subscriber writing under `directory`.
///
/// Returns the [`WorkerGuard`] that must be kept alive for the lifetime of
/// the process, or log lines written after it drops are lost.
pub fn init(directory: impl AsRef<Path>, file_name_prefix: &str) -> WorkerGuard {
  let file_appender = tracing_appender::rolling::daily(directory, file_name_prefix);
  let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

  let subscriber = tracing_subscriber::fmt()
    .with_writer(non_blocking)
    .with_ansi(false)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .finish();

  // A host may already have installed a global subscriber (e.g. its own
  // combined editor-wide log); don't panic if so.
  let _ = tracing::subscriber::set_global_default(subscriber);

  guard
}
