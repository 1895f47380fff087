//! Subscriber installation.

use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, registry::Registry, util::SubscriberInitExt,
    EnvFilter, Layer,
};

use super::config::{Log, LogFile, LogFormat, Rotation};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber described by `config`.
///
/// Crates in `crates_to_filter` log at the configured level, everything else
/// at `WARN`, unless a `filtering_directive` says otherwise. Keep the returned
/// guards alive for as long as logs should be flushed.
pub fn setup(
    config: &Log,
    service_name: &str,
    crates_to_filter: impl AsRef<[&'static str]>,
) -> Vec<WorkerGuard> {
    let crates_to_filter = crates_to_filter.as_ref();
    let mut guards = Vec::new();
    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console = &config.console;
    if console.enabled {
        let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
        let filter = env_filter(
            console.filtering_directive.as_deref(),
            console.level.into_level(),
            crates_to_filter,
        );
        let layer: BoxedLayer = match console.log_format {
            LogFormat::Default => fmt::layer().with_writer(writer).with_target(true).boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(writer)
                .with_ansi(false)
                .boxed(),
        };
        layers.push(layer.with_filter(filter).boxed());
        guards.push(guard);
    }

    if config.file.enabled {
        let (writer, guard) = tracing_appender::non_blocking(file_appender(&config.file));
        let filter = env_filter(
            config.file.filtering_directive.as_deref(),
            config.file.level.into_level(),
            crates_to_filter,
        );
        layers.push(
            fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter)
                .boxed(),
        );
        guards.push(guard);
    }

    if layers.is_empty() {
        return guards;
    }

    // a subscriber may already be installed, as in tests
    if tracing_subscriber::registry().with(layers).try_init().is_err() {
        return Vec::new();
    }

    tracing::debug!(service = service_name, "logger initialized");
    guards
}

fn file_appender(config: &LogFile) -> rolling::RollingFileAppender {
    match config.rotation {
        Rotation::Hourly => rolling::hourly(&config.path, &config.file_name),
        Rotation::Daily => rolling::daily(&config.path, &config.file_name),
        Rotation::Never => rolling::never(&config.path, &config.file_name),
    }
}

fn env_filter(
    filtering_directive: Option<&str>,
    level: tracing::Level,
    crates_to_filter: &[&'static str],
) -> EnvFilter {
    let directive = filtering_directive
        .map(str::to_owned)
        .unwrap_or_else(|| default_directive(level, crates_to_filter));
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directive)
}

fn default_directive(level: tracing::Level, crates_to_filter: &[&'static str]) -> String {
    let level = level.as_str().to_lowercase();
    std::iter::once(tracing::Level::WARN.as_str().to_lowercase())
        .chain(
            crates_to_filter
                .iter()
                .map(|name| format!("{}={level}", name.replace('-', "_"))),
        )
        .collect::<Vec<_>>()
        .join(",")
}
