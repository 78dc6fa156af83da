//! # Store Events
//!
//! Notifications pushed from the inventory store to whatever renders it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  InventoryStore ──► StoreEventEmitter                                   │
//! │                                                                         │
//! │  emit_phase      - every phase transition (Loading, Ready, Failed, ..)  │
//! │  emit_refreshed  - a fetch replaced the set  { count }                  │
//! │  emit_error      - any failed operation      { operation, message }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Errors are also returned to the caller; the emitter only mirrors them.

use crate::error::ClientError;
use crate::store::StorePhase;

/// Receives store notifications (implemented by the shell).
pub trait StoreEventEmitter: Send + Sync {
    /// Emits a phase change.
    fn emit_phase(&self, phase: StorePhase);

    /// Emits a successful refresh with the new warehouse count.
    fn emit_refreshed(&self, count: usize);

    /// Emits an operation-scoped error.
    fn emit_error(&self, operation: &str, error: &ClientError);
}

/// No-op event emitter for testing.
pub struct NoOpEmitter;

impl StoreEventEmitter for NoOpEmitter {
    fn emit_phase(&self, _phase: StorePhase) {}
    fn emit_refreshed(&self, _count: usize) {}
    fn emit_error(&self, _operation: &str, _error: &ClientError) {}
}
