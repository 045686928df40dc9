use tracing::warn;

use crate::errors::TimeError;

pub mod availability;
pub mod loyalty;

/// Turns a provider failure into a retryable [`TimeError::Unavailable`].
/// Validation and permission errors pass through unchanged.
pub(crate) fn upstream(what: &'static str) -> impl FnOnce(TimeError) -> TimeError {
    move |err| match err {
        TimeError::Database(_) | TimeError::Internal(_) | TimeError::Unavailable(_) => {
            warn!("Failed to fetch {}: {}", what, err);
            TimeError::Unavailable(format!("Could not load {}, please retry", what))
        }
        other => other,
    }
}
