use color_eyre::Report;
use tracing::Level;
use tracing_subscriber::{
    Layer, filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Configuration for console logging
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is unset
    pub level: Level,
    /// Whether to emit JSON formatted logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: Level::INFO, json_format: false }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("CELLGRID_LOG_LEVEL")
            && let Ok(parsed_level) = level.parse::<Level>()
        {
            config.level = parsed_level;
        }

        if std::env::var("CELLGRID_JSON_LOGS").is_ok() {
            config.json_format = true;
        }

        config
    }
}

/// Installs the global subscriber. `RUST_LOG` directives take precedence over
/// the configured level.
pub fn init_logging(config: &LoggingConfig) -> Result<(), Report> {
    let filter = EnvFilter::builder()
        .with_default_directive(config.level.into())
        .from_env_lossy();

    let layer = if config.json_format {
        fmt::layer().json().with_filter(filter).boxed()
    } else {
        fmt::layer().with_target(false).with_filter(filter).boxed()
    };

    tracing_subscriber::registry().with(layer).try_init()?;
    Ok(())
}
