//! Request correlation identifier.
//!
//! The active [`TraceId`] sits in a Tokio task-local set by the trace
//! middleware, so errors and log lines can pick it up without extra
//! parameters. Task-locals do not follow `tokio::spawn`; wrap spawned work
//! in [`TraceId::scope`] to keep the correlation.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

/// Header used both to accept an upstream identifier and to echo it back.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static CURRENT: TraceId;
}

/// UUID naming one request end to end.
///
/// ```
/// use recipebook::TraceId;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let id: TraceId = "6f1c2a4e-8d0b-4f57-9a43-2b1de0c5a111".parse().expect("uuid");
/// let seen = TraceId::scope(id, async { TraceId::current() }).await;
/// assert_eq!(seen, Some(id));
/// assert_eq!(TraceId::current(), None);
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reuse a well-formed upstream identifier, otherwise mint a new one.
    #[must_use]
    pub fn from_header(value: Option<&str>) -> Self {
        value
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_else(Self::generate)
    }

    /// Identifier of the request being handled, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `id` as the current identifier.
    pub async fn scope<F: Future>(id: Self, fut: F) -> F::Output {
        CURRENT.scope(id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn scope_is_limited_to_the_future() {
        let id = TraceId::generate();
        assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
        assert!(TraceId::current().is_none());
    }

    #[rstest]
    #[case(Some("00000000-0000-0000-0000-00000000002a"), true)]
    #[case(Some(" 00000000-0000-0000-0000-00000000002a "), true)]
    #[case(Some("not-a-uuid"), false)]
    #[case(None, false)]
    fn header_values_are_reused_only_when_valid(
        #[case] header: Option<&str>,
        #[case] reused: bool,
    ) {
        let id = TraceId::from_header(header);
        assert_eq!(
            id.to_string() == "00000000-0000-0000-0000-00000000002a",
            reused
        );
    }
}
