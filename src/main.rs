//! Hearth event forwarder.
//!
//! Host entry point modeling one invocation: reads a JSON event from stdin,
//! forwards it downstream with token fallback, and prints the downstream
//! response to stdout. Any failure exits non-zero; no custom error body is
//! produced.

use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use hearth_core::{Config, Event};
use hearth_forward::Forwarder;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment and config file
    let config = Config::load().context("failed to load configuration")?;

    init_tracing(config.debug);

    info!(
        endpoint = %config.endpoint_url(),
        tokens = config.tokens().len(),
        connect_timeout_ms = config.connect_timeout_ms,
        read_timeout_ms = config.read_timeout_ms,
        "configuration loaded"
    );

    if config.tokens().is_empty() {
        warn!("no tokens configured; every invocation will fail");
    }

    // The forwarder (and its connection pool) is built once per process and
    // may be shared by concurrent invocations in hosts that reuse it.
    let forwarder = Forwarder::new(&config).context("failed to initialize forwarder")?;

    let mut raw = String::new();
    io::stdin().read_to_string(&mut raw).context("failed to read event from stdin")?;
    let payload = serde_json::from_str(&raw).context("event is not valid JSON")?;
    let event = Event::new(payload);

    match forwarder.forward(&event).await {
        Ok(response) => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer(&mut stdout, &response)
                .context("failed to write response to stdout")?;
            writeln!(stdout)?;
            Ok(())
        },
        Err(e) => {
            error!(error = %e, "invocation failed");
            Err(e.into())
        },
    }
}

/// Initializes tracing with environment-based configuration.
///
/// `RUST_LOG` wins when set; otherwise the configured debug flag selects
/// debug- or info-level output.
fn init_tracing(debug: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default_directives = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives))
        .expect("invalid RUST_LOG environment variable");

    let fmt_layer = fmt::layer().with_target(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
