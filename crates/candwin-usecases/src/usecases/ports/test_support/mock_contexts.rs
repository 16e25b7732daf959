//! Mock input contexts.

use std::sync::Arc;
use std::sync::Mutex;

use crate::usecases::ports::FocusedContext;
use crate::usecases::ports::FocusedContextHandle;
use crate::usecases::ports::InputContextRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextCall {
    CandidateSelect(i32),
    SetEngineCandidateIndex(i32),
    ForceSendPacket,
}

#[derive(Debug, Default)]
pub struct MockContext {
    calls: Mutex<Vec<ContextCall>>,
}

impl MockContext {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<ContextCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn selected_indices(&self) -> Vec<i32> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ContextCall::CandidateSelect(index) => Some(index),
                _ => None,
            })
            .collect()
    }
}

impl FocusedContext for MockContext {
    fn candidate_select(&self, index: i32) {
        self.calls
            .lock()
            .unwrap()
            .push(ContextCall::CandidateSelect(index));
    }

    fn set_engine_candidate_index(&self, index: i32) {
        self.calls
            .lock()
            .unwrap()
            .push(ContextCall::SetEngineCandidateIndex(index));
    }

    fn force_send_packet(&self) {
        self.calls.lock().unwrap().push(ContextCall::ForceSendPacket);
    }
}

#[derive(Default)]
pub struct MockContexts {
    focused: Mutex<Option<Arc<MockContext>>>,
}

impl MockContexts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused_on(context: Arc<MockContext>) -> Self {
        let contexts = Self::new();
        contexts.focus(context);
        contexts
    }

    pub fn focus(&self, context: Arc<MockContext>) {
        *self.focused.lock().unwrap() = Some(context);
    }

    pub fn blur(&self) {
        *self.focused.lock().unwrap() = None;
    }
}

impl InputContextRegistry for MockContexts {
    fn focused(&self) -> Option<FocusedContextHandle> {
        self.focused
            .lock()
            .unwrap()
            .clone()
            .map(|context| context as FocusedContextHandle)
    }
}
