//! Opt-in tracing setup for hosts embedding `timeline-rs`.
//!
//! The index logs data replacement, group index rebuild progress, axis
//! resyncs and drag/resize transitions through `tracing`. Hosts either call
//! one of the helpers below or install their own subscriber.

/// Directive used when `RUST_LOG` is unset.
pub const DEFAULT_TRACING_DIRECTIVE: &str = "timeline_rs=info";

/// Installs a compact `tracing-subscriber` when the `telemetry` feature is
/// enabled, reading filters from `RUST_LOG`.
///
/// Returns `false` when the feature is disabled or a global subscriber is
/// already set.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_directive(DEFAULT_TRACING_DIRECTIVE)
}

/// Like [`init_default_tracing`] with an explicit fallback directive, e.g.
/// `"timeline_rs=trace"` to see every resync and rebuild chunk.
#[must_use]
pub fn init_tracing_with_directive(fallback_directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_directive));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_directive;
        false
    }
}
