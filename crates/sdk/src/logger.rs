use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{format::Writer, time::FormatTime},
};

/// Formats timestamps as "DD Month - HH:MM:SS.micros" in local time.
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, writer: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Local::now();
        write!(writer, "{} - {}", now.format("%d %B"), now.format("%H:%M:%S%.6f"))
    }
}

/// Sets up a global `tracing` subscriber for programs using this crate.
///
/// `RUST_LOG` directives are honoured on top of `log_level`. If a global subscriber is
/// already installed this does nothing.
pub fn setup_logger(log_level: LevelFilter) {
    let filter = EnvFilter::from_default_env().add_directive(log_level.into());

    let subscriber = tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_level(true)
        .with_target(false)
        .with_env_filter(filter)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Equivalent to `setup_logger(LevelFilter::INFO)`.
pub fn setup_info_logger() {
    setup_logger(LevelFilter::INFO);
}
