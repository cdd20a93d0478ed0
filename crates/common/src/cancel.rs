//! Advisory cancellation checked between major phases

use crate::{OpenApiError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag
///
/// Only consulted before a phase (read, filter, write) starts, so a
/// cancelled run never leaves a half-mutated document behind.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fail with [`OpenApiError::Cancelled`] if cancellation was requested
    pub fn check(&self, phase: &'static str) -> Result<()> {
        if self.is_cancelled() {
            Err(OpenApiError::Cancelled(phase))
        } else {
            Ok(())
        }
    }
}
