use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const QUIET_DIRECTIVE: &str = "bespoke_bouquet=info";
const VERBOSE_DIRECTIVE: &str = "bespoke_bouquet=debug,info";

/// `RUST_LOG` wins over the flag.
fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_DIRECTIVE
        } else {
            QUIET_DIRECTIVE
        })
    })
}

/// Compact lines on stderr, so command output on stdout stays clean.
pub fn init_cli_logger(verbose: bool) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact();

    tracing_subscriber::registry()
        .with(filter(verbose))
        .with(layer)
        .init();
}

/// One JSON object per event, for simulation runs whose logs are collected.
pub fn init_json_logger(verbose: bool) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .json()
        .flatten_event(true)
        .with_current_span(false);

    tracing_subscriber::registry()
        .with(filter(verbose))
        .with(layer)
        .init();
}
