use crate::config::TelemetryConfig;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::format::{Compact, DefaultFields, Format};
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
    EnvFilter { value: String, source: ParseError },
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// `RUST_LOG` wins; otherwise the configured level applies.
pub fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::EnvFilter {
            value: config.log_level.clone(),
            source,
        }),
    }
}

pub type CompactBuilder = SubscriberBuilder<DefaultFields, Format<Compact>, EnvFilter>;

/// Compact, plain-text formatter with the resolved filter applied.
pub fn subscriber(config: &TelemetryConfig) -> Result<CompactBuilder, TelemetryError> {
    Ok(tracing_subscriber::fmt()
        .with_env_filter(env_filter(config)?)
        .with_target(false)
        .compact()
        .with_ansi(false))
}

pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    subscriber(config)?
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("buffer lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn rejects_unparseable_level() {
        std::env::remove_var("RUST_LOG");
        let config = TelemetryConfig {
            log_level: "campus_insights=loud".to_string(),
        };

        let err = env_filter(&config).expect_err("filter is invalid");
        assert!(err.to_string().contains("campus_insights=loud"));
    }

    #[test]
    fn accepts_per_module_directives() {
        std::env::remove_var("RUST_LOG");
        let config = TelemetryConfig {
            log_level: "info,campus_insights::records=debug".to_string(),
        };
        assert!(env_filter(&config).is_ok());
    }

    #[test]
    fn output_is_plain_text() {
        std::env::remove_var("RUST_LOG");
        let config = TelemetryConfig {
            log_level: "info".to_string(),
        };
        let captured = Captured::default();
        let writer = captured.clone();
        let formatter = subscriber(&config)
            .expect("filter is valid")
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(formatter, || {
            tracing::info!(records = 3, "student records loaded");
        });

        let output = String::from_utf8(captured.0.lock().expect("buffer lock").clone())
            .expect("utf-8 output");
        assert!(output.contains("student records loaded"));
        assert!(output.contains("records=3"));
        assert!(!output.contains('\u{1b}'));
    }
}
