use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Install the global subscriber once. `RUST_LOG` overrides the default `info` level.
pub fn init_logger(json: bool) {
    LOGGER_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let builder = fmt().with_env_filter(filter).with_target(true);
        let installed = if json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };

        if installed.is_ok() {
            tracing::info!(json, "logger initialized");
        }
    });
}
