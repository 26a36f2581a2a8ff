//! Tracing setup

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use transdesk_config::RuntimeMode;

const DEFAULT_FILTER: &str = "transdesk=info,transdesk_server=info,transdesk_persistence=info,\
transdesk_text_processing=info,tower_http=info";

/// Install the global subscriber: JSON lines in production, human-readable
/// output otherwise. `RUST_LOG` overrides the default filter.
pub fn init(mode: RuntimeMode) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    if mode.is_production() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
