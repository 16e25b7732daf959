//! Input context lookup port.

use std::sync::Arc;

/// The input context currently receiving keystrokes.
pub trait FocusedContext: Send + Sync {
    /// Records `index` as the context's selected candidate.
    fn candidate_select(&self, index: i32);
    /// Mirrors `index` into the conversion engine's selection state.
    fn set_engine_candidate_index(&self, index: i32);
    /// Flushes queued output so on-the-spot preedit reflects the selection.
    fn force_send_packet(&self);
}

pub type FocusedContextHandle = Arc<dyn FocusedContext>;

pub trait InputContextRegistry {
    fn focused(&self) -> Option<FocusedContextHandle>;
}
