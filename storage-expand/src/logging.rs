//! Tracing subscriber setup.

use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the filter, e.g. `STORAGE_LOG=storage_macros_impl=trace`
const FILTER_VAR: &str = "STORAGE_LOG";

/// Install a compact stderr subscriber filtered by `STORAGE_LOG`.
///
/// Falls back to warnings only when the variable is unset or does not parse.
/// Installing twice is harmless.
pub fn setup() {
    let filter = std::env::var(FILTER_VAR)
        .ok()
        .and_then(|s| s.parse::<Targets>().ok())
        .unwrap_or_else(|| Targets::new().with_default(tracing::Level::WARN));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .ok();
}
