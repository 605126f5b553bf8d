//! Cooperative cancellation for directory traversal.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{WindError, WindResult};

/// Shared flag that aborts an in-flight resolution.
///
/// Clones observe the same flag, so a build driver can keep one handle and
/// give another to the resolver. A cancelled resolution returns
/// [`WindError::Cancelled`] and never a partial file set.
///
/// # Examples
///
/// ```
/// use windcfg::CancellationToken;
///
/// let token = CancellationToken::new();
/// let worker = token.clone();
/// token.cancel();
/// assert!(worker.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create a token that has not been cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once [`CancellationToken::cancel`] has been called on
    /// any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub(crate) fn check(&self) -> WindResult<()> {
        if self.is_cancelled() {
            Err(Arc::new(WindError::Cancelled))
        } else {
            Ok(())
        }
    }
}
