//! Logging configuration

use crate::error::ByzantineError;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing_subscriber::{
    fmt, fmt::time::ChronoLocal, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Environment variable selecting the log format used by the binary.
pub const LOG_FORMAT_ENV: &str = "BYZANTINE_LOG_FORMAT";

static HOSTNAME: LazyLock<String> = LazyLock::new(|| {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Detailed,
    #[cfg(feature = "json")]
    Json,
}

impl FromStr for LogFormat {
    type Err = ByzantineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "detailed" => Ok(LogFormat::Detailed),
            #[cfg(feature = "json")]
            "json" => Ok(LogFormat::Json),
            _ => Err(ByzantineError::InvalidConfig {
                key: LOG_FORMAT_ENV,
                value: s.to_string(),
            }),
        }
    }
}

fn memory_usage() -> String {
    use sysinfo::{Pid, System};

    let pid = Pid::from_u32(std::process::id());
    let mut system = System::new();
    system.refresh_process(pid);
    match system.process(pid) {
        Some(process) => format!("{:.1}M", process.memory() as f64 / 1024.0 / 1024.0),
        None => "N/A".to_string(),
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init(format: LogFormat) {
    match format {
        LogFormat::Compact => init_logger(),
        LogFormat::Detailed => init_logger_detailed(),
        #[cfg(feature = "json")]
        LogFormat::Json => init_logger_json(),
    }
}

pub fn init_logger() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_timer(ChronoLocal::rfc_3339())
                .with_target(false)
                .with_level(true)
                .with_ansi(true)
                .compact(),
        )
        .init();

    tracing::debug!("Logger initialized");
}

pub fn init_logger_detailed() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_timer(ChronoLocal::rfc_3339())
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_target(false)
                .with_ansi(true)
                .compact(),
        )
        .init();

    tracing::info!(
        hostname = %*HOSTNAME,
        memory = %memory_usage(),
        "Logger initialized (detailed format)"
    );
}

#[cfg(feature = "json")]
pub fn init_logger_json() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .json()
                .with_target(true)
                .with_current_span(true)
                .with_span_list(true),
        )
        .init();

    tracing::info!(hostname = %*HOSTNAME, "Logger initialized (JSON format)");
}

#[cfg(test)]
pub fn init_test_logger() {
    use tracing_subscriber::fmt::TestWriter;

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")))
        .with(
            fmt::layer()
                .with_writer(TestWriter::default())
                .with_target(false)
                .with_ansi(false)
                .compact(),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert_eq!(" Detailed".parse::<LogFormat>().unwrap(), LogFormat::Detailed);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
