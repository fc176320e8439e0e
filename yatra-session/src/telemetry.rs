use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str =
    "yatra_session=debug,yatra_store=debug,yatra_order=info,yatra_catalog=info";

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
/// Later calls are ignored, so tests and embedding applications may all call it.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("Tracing initialised");
    }
}
