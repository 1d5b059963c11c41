use std::{
    collections::BTreeMap,
    fmt::{self, Display},
};

use crate::ErrorKind;

/// Counters for the calls made through one client.
///
/// Kept in memory only, they start from zero for every client.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchStats {
    /// Requests handed to the transport, retries included
    pub requests: usize,
    /// Calls that returned a payload
    pub successful: usize,
    /// Backoff waits followed by another attempt
    pub retries: usize,
    /// `Fast` calls dropped because of the cooldown
    pub dropped: usize,
    failures: BTreeMap<&'static str, usize>,
}

impl DispatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_request(&mut self) {
        self.requests += 1;
    }

    pub(crate) fn record_retry(&mut self) {
        self.retries += 1;
    }

    /// Record the final outcome of a call
    pub(crate) fn record_outcome<T>(&mut self, outcome: &Result<T, ErrorKind>) {
        match outcome {
            Ok(_) => self.successful += 1,
            Err(ErrorKind::RateLimited) => self.dropped += 1,
            Err(e) => *self.failures.entry(e.kind_name()).or_insert(0) += 1,
        }
    }

    /// Number of failed calls of the given kind (see [`ErrorKind::kind_name`])
    pub fn failures(&self, kind: &str) -> usize {
        self.failures.get(kind).copied().unwrap_or(0)
    }

    /// Number of failed calls, drops excluded
    pub fn total_failures(&self) -> usize {
        self.failures.values().sum()
    }

    pub fn is_success(&self) -> bool {
        self.total_failures() == 0 && self.dropped == 0
    }
}

impl Display for DispatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📝 Summary")?;
        writeln!(f, "-------------------")?;
        writeln!(f, "📨 Requests: {}", self.requests)?;
        writeln!(f, "✅ Successful: {}", self.successful)?;
        writeln!(f, "🔁 Retries: {}", self.retries)?;
        writeln!(f, "👻 Dropped: {}", self.dropped)?;
        write!(f, "🚫 Errors: {}", self.total_failures())?;
        for (kind, count) in &self.failures {
            write!(f, "\n   {}: {}", kind, count)?;
        }
        Ok(())
    }
}
