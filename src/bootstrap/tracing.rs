//! Tracing configuration for the kiosk host.
//!
//! Logs go to stderr so stdout stays free for the rendered screen.
//!
//! - **Development**: debug level for the kiosk crates
//! - **Production**: info level
//! - `RUST_LOG` overrides the defaults entirely

use std::io;

use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Build the default filter directives.
///
/// `reqwest` and `hyper` are kept at warn so connection churn from the
/// poller does not drown the kiosk's own events.
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    vec![
        if is_dev { "debug" } else { "info" }.to_string(),
        "hyper=warn".to_string(),
        "hyper_util=warn".to_string(),
        "reqwest=warn".to_string(),
        if is_dev { "kc_app=debug" } else { "kc_app=info" }.to_string(),
        if is_dev {
            "kc_infra=debug"
        } else {
            "kc_infra=info"
        }
        .to_string(),
    ]
}

/// Install the global subscriber. Call once, before any logging occurs.
///
/// # Errors
///
/// Returns `Err` if a subscriber is already registered.
pub fn init_tracing_subscriber() -> anyhow::Result<()> {
    let filter_directives = build_filter_directives(is_development());
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives.join(",")));

    let stderr_layer = fmt::layer()
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(io::stderr);

    registry().with(env_filter).with(stderr_layer).try_init()?;

    Ok(())
}
