use std::sync::Once;

/// Filter and output style for [`init_logging`].
///
/// With no `filter`, `RUST_LOG` is read; without that, the crate logs at
/// `info` and keeps wgpu and naga at `warn`.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// `env_logger` filter string, e.g. `"impostor=debug,wgpu_core=warn"`.
    pub filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

static INIT: Once = Once::new();

/// Install `env_logger` as the `log` backend. Only the first call has an effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder
                    .filter_level(log::LevelFilter::Info)
                    .filter_module("wgpu_core", log::LevelFilter::Warn)
                    .filter_module("wgpu_hal", log::LevelFilter::Warn)
                    .filter_module("naga", log::LevelFilter::Warn);
            }
        }

        builder.write_style(config.write_style);

        // A host application may have installed its own logger already.
        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}
