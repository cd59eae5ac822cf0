//! Tracing setup helpers.
//!
//! The checker itself never installs a global subscriber (that's the embedder's job);
//! this module only defines the level-gate vocabulary so `CheckerOptions::trace_level`
//! and an embedder's `tracing-subscriber` filter directive are built from one place.

/// Coarse trace verbosity requested by the embedder, translated to a `tracing` level by
/// `to_filter_directive`. Kept as a small enum rather than exposing `tracing::Level`
/// directly so `sema-checker`'s public API doesn't leak the `tracing` dependency's
/// version in its signatures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum TraceLevel {
    Off,
    #[default]
    Warn,
    Debug,
    Trace,
}

impl TraceLevel {
    /// Render as an `env_filter`-style directive, e.g. for `tracing_subscriber::EnvFilter`.
    pub const fn to_filter_directive(self) -> &'static str {
        match self {
            TraceLevel::Off => "off",
            TraceLevel::Warn => "warn",
            TraceLevel::Debug => "debug",
            TraceLevel::Trace => "trace",
        }
    }
}
