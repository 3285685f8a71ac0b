//! Logging setup for applications embedding the client

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{ClientError, ClientResult};

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `level`. Fails if a global
/// subscriber is already set.
///
/// ```no_run
/// greenspace_client::logger::init_logger("greenspace_client=debug", false)?;
/// # Ok::<(), greenspace_client::ClientError>(())
/// ```
pub fn init_logger(level: &str, json_format: bool) -> ClientResult<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true),
            )
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    result.map_err(|e| ClientError::Config(format!("logger already initialised: {e}")))
}
