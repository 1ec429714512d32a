//! Mock implementations for testing
//!
//! Provides configurable node and dispatch implementations plus a capturing
//! logger, so chain behaviour can be exercised without writing concrete types.

use crate::chain::{Dispatch, DispatchState, Node, NodeIdentity, Sender};
use crate::error::{ChainError, ChainResult};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Shared record of node invocations, in call order
pub type Journal = Arc<Mutex<Vec<String>>>;

/// Mock node for testing
///
/// Counts its invocations and, depending on configuration, stores a result,
/// consumes the dispatch or fails.
#[derive(Debug, Default)]
pub struct MockNode {
    identity: NodeIdentity,
    result: Option<Value>,
    consume: bool,
    failure: Option<String>,
    journal: Option<Journal>,
    calls: AtomicUsize,
    chain_senders: AtomicUsize,
}

impl MockNode {
    pub fn new(key: &str, version: &str) -> Self {
        Self {
            identity: NodeIdentity::new(key, version),
            ..Default::default()
        }
    }

    /// Store `result` on every dispatch processed
    pub fn with_result(mut self, result: Value) -> Self {
        self.result = Some(result);
        self
    }

    /// Consume every dispatch processed
    pub fn consuming(mut self) -> Self {
        self.consume = true;
        self
    }

    /// Fail every call with a processing error
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Append this node's key to `journal` on every call
    pub fn recording(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of calls where the traversing chain was the sender
    pub fn chain_senders(&self) -> usize {
        self.chain_senders.load(Ordering::SeqCst)
    }
}

impl Node for MockNode {
    fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut NodeIdentity {
        &mut self.identity
    }

    fn process(&self, sender: Sender<'_>, dispatch: &mut dyn Dispatch) -> ChainResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if sender.is_chain() {
            self.chain_senders.fetch_add(1, Ordering::SeqCst);
        }

        if let Some(journal) = &self.journal {
            journal
                .lock()
                .map_err(|_| ChainError::processing_failed("journal lock poisoned"))?
                .push(self.identity.key().to_string());
        }

        if let Some(message) = &self.failure {
            return Err(ChainError::processing_failed(message.clone()));
        }

        if let Some(result) = &self.result {
            dispatch.set_result(result.clone());
        }

        if self.consume {
            dispatch.consume();
        }

        Ok(())
    }
}

/// Mock dispatch for testing
///
/// `initialize` accepts a JSON object:
/// `{"consumable": bool, "stateful": bool, "payload": any}`.
/// Anything other than an object leaves the dispatch invalid.
#[derive(Debug, Default)]
pub struct MockDispatch {
    state: DispatchState,
    payload: Value,
}

impl MockDispatch {
    /// Valid, non-consumable, non-stateful dispatch
    pub fn valid() -> Self {
        let mut dispatch = Self::default();
        dispatch.make_valid();
        dispatch
    }

    /// Valid, consumable dispatch
    pub fn consumable() -> Self {
        let mut dispatch = Self::default();
        dispatch.make_consumable().make_valid();
        dispatch
    }

    /// Valid, stateful dispatch
    pub fn stateful() -> Self {
        let mut dispatch = Self::default();
        dispatch.make_stateful().make_valid();
        dispatch
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

impl Dispatch for MockDispatch {
    fn state(&self) -> &DispatchState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut DispatchState {
        &mut self.state
    }

    fn initialize(&mut self, input: &Value) -> ChainResult<()> {
        let fields = input
            .as_object()
            .ok_or_else(|| ChainError::invalid_input("dispatch input must be a JSON object"))?;

        let flag = |name: &str| fields.get(name).and_then(Value::as_bool).unwrap_or(false);

        if flag("consumable") {
            self.make_consumable();
        }
        if flag("stateful") {
            self.make_stateful();
        }

        self.payload = fields.get("payload").cloned().unwrap_or(json!(null));
        self.make_valid();
        Ok(())
    }
}

/// Logger sink that keeps every message it receives
#[derive(Debug, Clone, Default)]
pub struct CapturingLogger {
    messages: Arc<Mutex<Vec<String>>>,
}

impl CapturingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback suitable for `ChainHelper::hook_logger`
    pub fn sink(&self) -> impl Fn(&str) + Send + Sync + 'static {
        let messages = self.messages.clone();
        move |message: &str| {
            if let Ok(mut messages) = messages.lock() {
                messages.push(message.to_string());
            }
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.clear();
        }
    }
}
