//! Tracing setup
//!
//! Events go to stderr; stdout carries only report output.

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directives for a `-v` count, falling back to the configured filter
pub fn filter_directives(config: &LoggingConfig, verbosity: u8) -> String {
    match verbosity {
        0 => config.filter.clone(),
        1 => "fitlog_cli=debug,fitlog_shared=debug".to_string(),
        _ => "fitlog_cli=trace,fitlog_shared=trace".to_string(),
    }
}

/// Initialize tracing/logging
///
/// `RUST_LOG` wins over both the config file and `-v`.
pub fn init_tracing(config: &LoggingConfig, verbosity: u8) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_directives(config, verbosity).into());

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format {
        LogFormat::Json => subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => subscriber
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init(),
    }
}
