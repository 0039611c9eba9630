//! Telemetry metric name constants.
//!
//! Centralised metric names for hugin operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `hugin_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `method`: HTTP verb of the dispatched request (e.g. "get", "post")
//! - `status`: outcome: "ok", "error" (server answered non-2xx) or
//!   "failed" (no response at all)
//! - `type`: resource type partition (e.g. "discussions", "users")

/// Total requests dispatched through the transport.
///
/// Labels: `method`, `status` ("ok" | "error" | "failed").
pub const REQUESTS_TOTAL: &str = "hugin_requests_total";

/// Request duration in seconds, measured around the transport call.
///
/// Labels: `method`.
pub const REQUEST_DURATION_SECONDS: &str = "hugin_request_duration_seconds";

/// Total resource cache hits.
///
/// Labels: `type`.
pub const CACHE_HITS_TOTAL: &str = "hugin_cache_hits_total";

/// Total resource cache misses (including expired entries).
///
/// Labels: `type`.
pub const CACHE_MISSES_TOTAL: &str = "hugin_cache_misses_total";
