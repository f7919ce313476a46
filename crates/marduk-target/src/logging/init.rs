use std::sync::Once;

use log::LevelFilter;

/// Logger setup for binaries and tests driving draw targets.
///
/// `env_filter` takes `env_logger` directives ("warn",
/// "marduk_target::target=trace"); when unset, `RUST_LOG` is consulted and
/// then `default_level`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_level: LevelFilter,
    pub write_style: env_logger::WriteStyle,
    /// Route output through the test harness so it is captured per test.
    pub capture_for_tests: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
            capture_for_tests: false,
        }
    }
}

impl LoggingConfig {
    /// Trace-level output for this crate, captured by the test harness.
    pub fn for_tests() -> Self {
        Self {
            env_filter: Some("marduk_target=trace".into()),
            write_style: env_logger::WriteStyle::Never,
            capture_for_tests: true,
            ..Self::default()
        }
    }

    fn builder(&self) -> env_logger::Builder {
        let mut builder = env_logger::Builder::new();

        match self.env_filter.clone().or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => builder.parse_filters(&filter),
            None => builder.filter_level(self.default_level),
        };

        builder
            .write_style(self.write_style)
            .is_test(self.capture_for_tests)
            .format_timestamp(None);
        builder
    }
}

static INIT: Once = Once::new();

/// Installs the global logger on first call.
///
/// Later calls do nothing. A logger installed elsewhere wins silently.
/// Returns whether this call installed it.
pub fn init_logging(config: LoggingConfig) -> bool {
    let mut installed = false;
    INIT.call_once(|| {
        installed = config.builder().try_init().is_ok();
        if installed {
            log::debug!("draw target logging at {:?}", log::max_level());
        }
    });
    installed
}
