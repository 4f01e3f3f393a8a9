//! Event emitter trait for cross-crate event broadcasting.
//!
//! This module defines the abstraction for emitting application events.
//! Implementations handle transport details (channels, terminal output,
//! GUI event buses).

use crate::events::AppEvent;

/// Trait for emitting application events.
///
/// This abstraction keeps event plumbing consistent across domains and
/// prevents channel types from becoming part of the public API surface.
///
/// # Implementations
///
/// - `NoopEmitter` - For tests and contexts that don't need events
/// - Adapter-specific implementations (CLI progress printer, GUI bridge)
///
/// # Example
///
/// ```ignore
/// // In the speech event bridge
/// fn forward(emitter: &Arc<dyn AppEventEmitter>, index: usize, total: usize) {
///     emitter.emit(AppEvent::sentence_started(index, total));
/// }
/// ```
pub trait AppEventEmitter: Send + Sync {
    /// Emit an application event.
    ///
    /// Implementations should handle the event asynchronously or buffer
    /// it. This method should not block.
    fn emit(&self, event: AppEvent);

    /// Clone this emitter into a boxed trait object.
    ///
    /// This enables cloning of `Arc<dyn AppEventEmitter>` without
    /// requiring the underlying type to implement Clone.
    fn clone_box(&self) -> Box<dyn AppEventEmitter>;
}

/// A no-op event emitter for tests and quiet contexts.
///
/// This implementation discards all events, making it suitable for:
/// - Unit tests that don't need to verify event emission
/// - Non-interactive CLI invocations with no progress display
#[derive(Debug, Clone, Default)]
pub struct NoopEmitter;

impl NoopEmitter {
    /// Create a new no-op emitter.
    pub const fn new() -> Self {
        Self
    }
}

impl AppEventEmitter for NoopEmitter {
    fn emit(&self, _event: AppEvent) {
        // Intentionally do nothing
    }

    fn clone_box(&self) -> Box<dyn AppEventEmitter> {
        Box::new(self.clone())
    }
}
