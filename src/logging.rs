use crate::utils::truncate_str;
use crate::ExtractionResult;
use std::fmt::Display;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt as subscriber_fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

const CARD_WIDTH: usize = 80;
const LABEL_WIDTH: usize = 8;

#[derive(Debug)]
pub struct LogConfig {
    pub log_dir: PathBuf,
    pub log_level: String,
    pub console_output: bool,
    pub file_output: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".into(),
            log_level: "info".into(),
            console_output: true,
            file_output: false,
        }
    }
}

fn card_line(label: &str, value: Option<&str>) -> String {
    let value = match value {
        Some(v) if !v.is_empty() => v,
        Some(_) => "(empty)",
        None => "N/A",
    };
    format!(
        "{label:<LABEL_WIDTH$}{}",
        truncate_str(value, CARD_WIDTH - LABEL_WIDTH)
    )
}

/// Logs an extraction result as a boxed card at `info` level.
pub fn log_result_card(result: &ExtractionResult, url: &str) {
    let horizontal_line = "═".repeat(CARD_WIDTH - 2);

    info!(
        "\n╔{}╗\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n╚{}╝",
        horizontal_line,
        card_line("Request", Some(url)),
        card_line("Title", result.title.as_deref()),
        card_line("Desc", result.description.as_deref()),
        card_line("Image", result.image.as_deref()),
        card_line("URL", result.url.as_deref()),
        card_line("Site", result.site_name.as_deref()),
        card_line("Type", result.og_type.as_deref()),
        horizontal_line,
    );
}

pub fn log_error_card<E: Display + std::error::Error>(url: &str, error: &E) {
    let horizontal_line = "═".repeat(CARD_WIDTH - 2);

    let mut error_details = error.to_string();
    if let Some(source) = error.source() {
        error_details = format!("{error_details} (caused by: {source})");
    }

    error!(
        "\n╔{}╗\n{}\n{}\n╚{}╝",
        horizontal_line,
        card_line("Request", Some(url)),
        card_line("Error", Some(&error_details)),
        horizontal_line,
    );
}

pub fn setup_logging(config: LogConfig) -> std::io::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let mut layers = Vec::new();

    if config.console_output {
        let console_layer = subscriber_fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_file(true);
        layers.push(console_layer.boxed());
    }

    if config.file_output {
        std::fs::create_dir_all(&config.log_dir)?;

        let file_appender =
            RollingFileAppender::new(Rotation::DAILY, &config.log_dir, "og-preview.log");

        let file_layer = subscriber_fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_writer(file_appender);

        layers.push(file_layer.boxed());
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::AlreadyExists, e.to_string()))?;

    debug!("Logging system initialized with config: {:?}", config);
    Ok(())
}

/// Scoped subscriber at a fixed level, restored when dropped.
pub struct LogLevelGuard {
    _guard: tracing::dispatcher::DefaultGuard,
}

impl LogLevelGuard {
    pub fn set_level(level: &str) -> Self {
        let filter = EnvFilter::new(level);
        let subscriber = tracing_subscriber::registry()
            .with(subscriber_fmt::layer())
            .with(filter);

        LogLevelGuard {
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }
}
