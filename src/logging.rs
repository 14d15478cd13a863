use std::{io, sync::OnceLock};

use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, time::SystemTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

static SUBSCRIBER_INSTALLED: OnceLock<()> = OnceLock::new();

/// Compact stderr logging for the generator, filtered by `RUST_LOG` or `info`.
pub fn init_tracing() {
    init_tracing_with("info");
}

/// Installs the generator's subscriber once per process. `fallback` is the filter used when
/// `RUST_LOG` is unset or unparseable; later calls are no-ops.
pub fn init_tracing_with(fallback: &str) {
    SUBSCRIBER_INSTALLED.get_or_init(|| {
        // `log` records from dependencies end up in the same output.
        let _ = LogTracer::init();

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
        let output = fmt::layer()
            .with_writer(io::stderr)
            .with_timer(SystemTime)
            .with_target(false)
            .with_ansi(false)
            .compact();

        // A test harness may have put its own subscriber in place first.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(output)
            .try_init();
    });
}
