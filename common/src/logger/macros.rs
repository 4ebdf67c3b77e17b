use tracing::{Span, field};

use super::TraceId;

/// Root span for one unit of background work (e.g. a single refresh pass).
///
/// `collection` is left empty so the caller can record it once known.
pub fn root_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::info_span!(
        "root",
        name = %name,
        trace_id = %trace_id,
        collection = field::Empty
    )
}

/// Child span, inherits the trace id from its parent.
pub fn child_span(name: &'static str) -> Span {
    tracing::info_span!("child", name = %name)
}
