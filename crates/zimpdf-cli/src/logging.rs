//! Logging setup
//!
//! Events go to stderr and, when a log file is given, are appended to it as
//! plain text. `RUST_LOG` takes precedence over the default level.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber
///
/// A log file that cannot be opened is reported on stderr and skipped. Calling
/// this twice leaves the first subscriber in place.
pub fn init(log_file: Option<&Path>, verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let mut open_error = None;
    let file_layer = log_file.and_then(|path| match open_append(path) {
        Ok(file) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        ),
        Err(err) => {
            open_error = Some((path.display().to_string(), err));
            None
        }
    });

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .is_ok();

    if let Some((path, err)) = open_error {
        if installed {
            tracing::warn!(path = %path, error = %err, "cannot open log file, logging to stderr only");
        }
    }
}

fn open_append(path: &Path) -> std::io::Result<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
