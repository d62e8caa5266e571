//! Cooperative cancellation predicate.

use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Polled before new work starts; `false` means stop.
///
/// Cloning is cheap and every clone observes the same predicate. Cancellation
/// never interrupts a call that is already in flight.
#[derive(Clone)]
pub struct ShouldContinue {
    predicate: Arc<dyn Fn() -> bool + Send + Sync>,
}

impl ShouldContinue {
    /// Never cancels
    pub fn always() -> Self {
        Self::from_fn(|| true)
    }

    pub fn from_fn(predicate: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// Continue until `token` is cancelled
    pub fn from_token(token: CancellationToken) -> Self {
        Self::from_fn(move || !token.is_cancelled())
    }

    pub fn check(&self) -> bool {
        (self.predicate)()
    }
}

impl Default for ShouldContinue {
    fn default() -> Self {
        Self::always()
    }
}

impl fmt::Debug for ShouldContinue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShouldContinue").finish_non_exhaustive()
    }
}

impl From<CancellationToken> for ShouldContinue {
    fn from(token: CancellationToken) -> Self {
        Self::from_token(token)
    }
}
