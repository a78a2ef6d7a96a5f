use anyhow::Context as _;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Default directive for the terminal client: quiet unless something goes wrong.
pub const CLI_DIRECTIVE: &str = "critica=warn";

/// Default directive for the web shell, including per-request spans.
pub const APP_DIRECTIVE: &str = "critica=info,tower_http=info";

/// Installs the stderr subscriber. `RUST_LOG`, when set, replaces `default_directive`.
pub fn init(default_directive: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive)
            .with_context(|| format!("build log filter from {default_directive:?}"))?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|err| anyhow::anyhow!("initialize tracing subscriber: {err}"))?;

    Ok(())
}
