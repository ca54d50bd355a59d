//! Tracing setup

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogConfig;

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter. Returns `false`
/// when a subscriber was already installed.
pub fn init(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|e| {
            eprintln!("Invalid log filter {:?}: {}", config.filter, e);
            EnvFilter::new("info")
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice() {
        let config = crate::config::Config::default();
        init(&config.log);
        assert!(!init(&config.log));
    }
}
