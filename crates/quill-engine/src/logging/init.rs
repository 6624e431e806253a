use std::sync::Once;

/// Logger setup for hosts and tools.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter, e.g. "quill_engine=debug". Falls back to
    /// `RUST_LOG`, then to `default_level`.
    pub env_filter: Option<String>,
    pub default_level: log::LevelFilter,
    /// Caps wgpu crates at `warn` unless the filter names them.
    pub quiet_wgpu: bool,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: log::LevelFilter::Info,
            quiet_wgpu: true,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Filter string the logger is built from, if any.
    fn filter(&self) -> Option<String> {
        let filter = self
            .env_filter
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok())?;
        if self.quiet_wgpu && !filter.contains("wgpu") {
            Some(format!("{filter},wgpu_core=warn,wgpu_hal=warn"))
        } else {
            Some(filter)
        }
    }
}

static INIT: Once = Once::new();

/// Installs `env_logger` as the global logger. Only the first call has an
/// effect; a logger installed elsewhere (e.g. by a test harness) is kept.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.write_style(config.write_style);
        match config.filter() {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(config.default_level);
                if config.quiet_wgpu {
                    builder.filter_module("wgpu_core", log::LevelFilter::Warn);
                    builder.filter_module("wgpu_hal", log::LevelFilter::Warn);
                }
            }
        }
        if builder.try_init().is_err() {
            log::debug!("logger already installed; keeping it");
            return;
        }
        log::debug!("logging initialized");
    });
}
