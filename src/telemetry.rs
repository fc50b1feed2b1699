//! Tracing bootstrap for hosts embedding the clustering engine.
//!
//! Nothing here runs unless the `telemetry` feature is on and the host asks
//! for it. Applications that already install their own `tracing` subscriber
//! should skip this module entirely.

/// Installs a default `tracing` subscriber.
///
/// The filter comes from `RUST_LOG` when set, falling back to `info`.
/// Returns `false` when the feature is disabled or another subscriber is
/// already installed, `true` otherwise.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
