use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

/// Appends tracing output to `path` so it never draws over the TUI and
/// survives into the next run. `RUST_LOG` overrides the default `info` filter.
pub fn init(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new().create(true).append(true).open(path)?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    // a subscriber installed earlier (tests, repeated calls) keeps running
    if let Err(e) = installed {
        if tracing::dispatcher::has_been_set() {
            return Ok(());
        }
        return Err(std::io::Error::other(e));
    }

    Ok(())
}
