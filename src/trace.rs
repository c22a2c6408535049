//! Instrumentation hooks.
//!
//! Stage spans and events go through these macros so the library builds
//! without `tracing` unless the feature asks for it. Fields are limited to
//! ids, sizes, counts and short messages; pixel payloads never reach a log.

#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::info_span!($name $(, $key = $value)*)
    };
}

#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::info!(name: $name, $($key = $value),*)
    };
}

/// Recoverable problems: skipped templates, ignored colors, failed requests.
#[cfg(feature = "tracing")]
macro_rules! trace_warn {
    ($name:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::warn!(name: $name, $($key = $value),*)
    };
}

// Without the feature the field expressions are still evaluated so call sites
// type-check identically in both builds.

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:literal $(, $key:ident = $value:expr)* $(,)?) => {{
        $(let _ = &$value;)*
        $crate::trace::Quiet
    }};
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:literal $(, $key:ident = $value:expr)* $(,)?) => {{
        $(let _ = &$value;)*
    }};
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_warn {
    ($name:literal $(, $key:ident = $value:expr)* $(,)?) => {{
        $(let _ = &$value;)*
    }};
}

pub(crate) use trace_event;
pub(crate) use trace_span;
pub(crate) use trace_warn;

/// Stand-in for an entered span guard.
#[cfg(not(feature = "tracing"))]
pub(crate) struct Quiet;

#[cfg(not(feature = "tracing"))]
impl Quiet {
    #[inline]
    pub(crate) fn entered(self) -> Self {
        self
    }
}
