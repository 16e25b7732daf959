//! Routes candidate window selections to the focused input context.

use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;
use tracing::debug;

use crate::domain::CandidateEvent;
use crate::usecases::ports::InputContextRegistry;

pub fn event_channel() -> (Sender<CandidateEvent>, Receiver<CandidateEvent>) {
    crossbeam_channel::unbounded()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    NoFocus,
}

/// Single consumer of the window's event channel; events are applied in
/// the order they were read.
pub struct InputContextBridge {
    events: Receiver<CandidateEvent>,
}

impl InputContextBridge {
    pub fn new(events: Receiver<CandidateEvent>) -> Self {
        Self { events }
    }

    pub fn deliver(&self, contexts: &dyn InputContextRegistry, event: CandidateEvent) -> Delivery {
        let CandidateEvent::Selected { index } = event;
        let Some(context) = contexts.focused() else {
            debug!(index, "No focused input context, dropping candidate selection");
            return Delivery::NoFocus;
        };

        context.candidate_select(index);
        context.set_engine_candidate_index(index);
        // on-the-spot preedit depends on the selection; flush it now
        context.force_send_packet();
        Delivery::Delivered
    }

    /// Delivers every queued event. Returns how many reached a context.
    pub fn dispatch_pending(&self, contexts: &dyn InputContextRegistry) -> usize {
        self.events
            .try_iter()
            .filter(|event| self.deliver(contexts, *event) == Delivery::Delivered)
            .count()
    }
}
