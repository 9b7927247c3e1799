//! Tracing subscriber setup for hosts and the command-line driver.

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `config.filter`. Uses `try_init`, so a
/// second call (or a host that already installed a subscriber) is a no-op.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    if installed {
        tracing::debug!(filter = %config.filter, json = config.json, "Logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialization_is_harmless() {
        init_logging(&LoggingConfig::default());
        init_logging(&LoggingConfig {
            filter: "debug".to_string(),
            json: true,
        });
    }

    #[test]
    fn malformed_filter_falls_back() {
        init_logging(&LoggingConfig {
            filter: "maestro=[".to_string(),
            json: false,
        });
    }
}
