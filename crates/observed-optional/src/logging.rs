#![forbid(unsafe_code)]

//! Tracing integration.
//!
//! With the `tracing` feature the bridge emits `trace`/`debug` events under
//! the `observed_optional` target; this module re-exports the macros so hosts
//! can log alongside without a direct `tracing` dependency. The `tracing-json`
//! feature adds [`init_json_logging`], a JSON subscriber filtered by
//! `RUST_LOG`.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Install a global JSON subscriber honoring `RUST_LOG`.
///
/// Defaults to `observed_optional=info` when `RUST_LOG` is unset.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> crate::error::Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("observed_optional=info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| crate::error::Error::logging_init(err.to_string()))
}
