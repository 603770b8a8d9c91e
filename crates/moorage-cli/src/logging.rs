//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Filter used when `RUST_LOG` is unset.
pub const fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `verbose`.
pub fn init_tracing(json: bool, verbose: bool) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| CliError::Config(format!("install log subscriber: {e}")))
}
