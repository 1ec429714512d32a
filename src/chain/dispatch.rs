//! Dispatch contract
//!
//! A dispatch is the unit of work routed through a chain. Every dispatch
//! carries the same state machine, held in a [`DispatchState`]:
//!
//! - **valid**: set by [`Dispatch::make_valid`] once `initialize` succeeds;
//!   chains refuse invalid dispatches
//! - **consumable / consumed**: a consumable dispatch can be consumed exactly
//!   once, which stops an ordered chain after the consuming node
//! - **stateful**: results accumulate instead of replacing each other
//!
//! ```rust
//! use chain_helper::chain::{Dispatch, DispatchState};
//! use chain_helper::error::{ChainError, ChainResult};
//! use serde_json::{json, Value};
//!
//! #[derive(Default)]
//! struct Lookup {
//!     state: DispatchState,
//!     term: String,
//! }
//!
//! impl Dispatch for Lookup {
//!     fn state(&self) -> &DispatchState {
//!         &self.state
//!     }
//!
//!     fn state_mut(&mut self) -> &mut DispatchState {
//!         &mut self.state
//!     }
//!
//!     fn initialize(&mut self, input: &Value) -> ChainResult<()> {
//!         let term = input
//!             .as_str()
//!             .ok_or_else(|| ChainError::invalid_input("lookup term must be a string"))?;
//!         self.term = term.to_string();
//!         self.make_consumable().make_valid();
//!         Ok(())
//!     }
//! }
//!
//! let mut lookup = Lookup::default();
//! assert!(lookup.initialize(&json!(42)).is_err());
//! assert!(!lookup.is_valid());
//!
//! lookup.initialize(&json!("rust")).unwrap();
//! assert!(lookup.is_valid());
//! assert!(lookup.consume());
//! assert!(!lookup.consume());
//! ```

use std::any::Any;
use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::chain::short_type_name;
use crate::error::ChainResult;

/// Shared state of every dispatch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchState {
    is_valid: bool,
    is_consumable: bool,
    is_consumed: bool,
    is_stateful: bool,
    results: Vec<Value>,
    called_date_time: Option<DateTime<Utc>>,
}

impl DispatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn is_consumable(&self) -> bool {
        self.is_consumable
    }

    pub fn is_consumed(&self) -> bool {
        self.is_consumed
    }

    pub fn is_stateful(&self) -> bool {
        self.is_stateful
    }

    /// When the dispatch was marked valid, in UTC
    pub fn called_date_time(&self) -> Option<DateTime<Utc>> {
        self.called_date_time
    }

    pub fn make_valid(&mut self) -> &mut Self {
        self.called_date_time = Some(Utc::now());
        self.is_valid = true;
        self
    }

    pub fn make_consumable(&mut self) -> &mut Self {
        self.is_consumable = true;
        self
    }

    pub fn make_stateful(&mut self) -> &mut Self {
        self.is_stateful = true;
        self
    }

    /// Mark as consumed. Only succeeds once, and only when consumable.
    pub fn consume(&mut self) -> bool {
        if self.is_consumable && !self.is_consumed {
            self.is_consumed = true;
            return true;
        }

        false
    }

    /// Replace the single result, or append when stateful
    pub fn set_result(&mut self, result: Value) -> &mut Self {
        if self.is_stateful {
            self.results.push(result);
        } else {
            self.results = vec![result];
        }
        self
    }

    /// Stored results, or `None` when nothing has been stored
    pub fn results(&self) -> Option<&[Value]> {
        if self.results.is_empty() {
            return None;
        }

        Some(&self.results)
    }

    pub fn num_results(&self) -> usize {
        self.results.len()
    }

    /// Field list used inside the `TypeName{ ... }` debug string
    fn describe_fields(&self) -> String {
        let called = self
            .called_date_time
            .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "N/A".to_string());

        format!(
            "\"calledDateTime\": \"{called}\", \"isConsumable\": \"{}\", \"isStateful\": \"{}\", \"isConsumed\": \"{}\"",
            self.is_consumable, self.is_stateful, self.is_consumed
        )
    }
}

/// Upcast to `Any` so nodes can recover the concrete dispatch type
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Unit of work routed through a chain
///
/// Implementors hold a [`DispatchState`] and provide `initialize`; every
/// other operation is supplied by the trait. The `make_*` setters chain and
/// are meant for `initialize`; everything else is callable on `dyn Dispatch`.
pub trait Dispatch: AsAny {
    fn state(&self) -> &DispatchState;

    fn state_mut(&mut self) -> &mut DispatchState;

    /// Parse and validate input data
    ///
    /// Implementations must call [`Dispatch::make_valid`] on success. On
    /// failure the dispatch stays invalid and chains will refuse it.
    fn initialize(&mut self, input: &Value) -> ChainResult<()>;

    fn is_valid(&self) -> bool {
        self.state().is_valid()
    }

    fn is_consumable(&self) -> bool {
        self.state().is_consumable()
    }

    fn is_consumed(&self) -> bool {
        self.state().is_consumed()
    }

    fn is_stateful(&self) -> bool {
        self.state().is_stateful()
    }

    fn called_date_time(&self) -> Option<DateTime<Utc>> {
        self.state().called_date_time()
    }

    /// Mark valid and stamp the current UTC time
    fn make_valid(&mut self) -> &mut Self
    where
        Self: Sized,
    {
        self.state_mut().make_valid();
        self
    }

    fn make_consumable(&mut self) -> &mut Self
    where
        Self: Sized,
    {
        self.state_mut().make_consumable();
        self
    }

    fn make_stateful(&mut self) -> &mut Self
    where
        Self: Sized,
    {
        self.state_mut().make_stateful();
        self
    }

    /// Returns true exactly once for a consumable dispatch; false otherwise
    fn consume(&mut self) -> bool {
        self.state_mut().consume()
    }

    /// Replace the single result, or append when stateful
    ///
    /// Not chainable so it stays callable on `dyn Dispatch`; concrete
    /// dispatches chain with [`Dispatch::with_result`].
    fn set_result(&mut self, result: Value) {
        self.state_mut().set_result(result);
    }

    /// Chainable form of [`Dispatch::set_result`] for concrete dispatches
    fn with_result(&mut self, result: Value) -> &mut Self
    where
        Self: Sized,
    {
        self.state_mut().set_result(result);
        self
    }

    /// `None` when no result is stored; never an empty slice
    fn results(&self) -> Option<&[Value]> {
        self.state().results()
    }

    fn num_results(&self) -> usize {
        self.state().num_results()
    }

    /// Debug string: `TypeName{ "calledDateTime": "...", "isConsumable": "...", ... }`
    fn describe(&self) -> String {
        format!(
            "{}{{ {} }}",
            short_type_name::<Self>(),
            self.state().describe_fields()
        )
    }
}

impl<'a> fmt::Display for dyn Dispatch + 'a {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Whether a dispatch is of concrete type `T`
///
/// Checks a single type. A node accepting several dispatch types combines
/// checks with `||`, e.g.
/// `is_dispatch_of::<Order>(dispatch) || is_dispatch_of::<Refund>(dispatch)`.
pub fn is_dispatch_of<T: Dispatch>(dispatch: &dyn Dispatch) -> bool {
    <dyn Dispatch as AsAny>::as_any(dispatch).is::<T>()
}

pub fn downcast_dispatch<T: Dispatch>(dispatch: &dyn Dispatch) -> Option<&T> {
    <dyn Dispatch as AsAny>::as_any(dispatch).downcast_ref::<T>()
}

pub fn downcast_dispatch_mut<T: Dispatch>(dispatch: &mut dyn Dispatch) -> Option<&mut T> {
    <dyn Dispatch as AsAny>::as_any_mut(dispatch).downcast_mut::<T>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[derive(Default)]
    struct TestDispatch {
        state: DispatchState,
    }

    impl Dispatch for TestDispatch {
        fn state(&self) -> &DispatchState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut DispatchState {
            &mut self.state
        }

        fn initialize(&mut self, _input: &Value) -> ChainResult<()> {
            self.make_valid();
            Ok(())
        }
    }

    #[derive(Default)]
    struct OtherDispatch {
        state: DispatchState,
    }

    impl Dispatch for OtherDispatch {
        fn state(&self) -> &DispatchState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut DispatchState {
            &mut self.state
        }

        fn initialize(&mut self, _input: &Value) -> ChainResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_new_dispatch_defaults() {
        let dispatch = TestDispatch::default();

        assert!(!dispatch.is_valid());
        assert!(!dispatch.is_consumable());
        assert!(!dispatch.is_consumed());
        assert!(!dispatch.is_stateful());
        assert!(dispatch.called_date_time().is_none());
        assert!(dispatch.results().is_none());
        assert_eq!(dispatch.num_results(), 0);
    }

    #[test]
    fn test_make_valid_stamps_time() {
        let mut dispatch = TestDispatch::default();
        let before = Utc::now();

        dispatch.make_valid();

        assert!(dispatch.is_valid());
        let called = dispatch.called_date_time().expect("timestamp should be set");
        assert!(called >= before);
    }

    #[test]
    fn test_consume_requires_consumable() {
        let mut dispatch = TestDispatch::default();

        assert!(!dispatch.consume());
        assert!(!dispatch.is_consumed());
    }

    #[test]
    fn test_consume_succeeds_once() {
        let mut dispatch = TestDispatch::default();
        dispatch.make_consumable();

        assert!(dispatch.consume());
        assert!(dispatch.is_consumed());
        assert!(!dispatch.consume());
        assert!(!dispatch.consume());
        assert!(dispatch.is_consumed());
    }

    #[test]
    fn test_non_stateful_replaces_result() {
        let mut dispatch = TestDispatch::default();
        dispatch.set_result(json!(1));
        dispatch.set_result(json!(2));
        dispatch.set_result(json!(3));

        assert_eq!(dispatch.num_results(), 1);
        assert_eq!(dispatch.results(), Some(&[json!(3)][..]));
    }

    #[test]
    fn test_stateful_appends_results() {
        let mut dispatch = TestDispatch::default();
        dispatch
            .make_stateful()
            .with_result(json!("a"))
            .with_result(json!("b"));

        assert_eq!(dispatch.num_results(), 2);
        assert_eq!(dispatch.results(), Some(&[json!("a"), json!("b")][..]));
    }

    #[test]
    fn test_with_result_replaces_when_not_stateful() {
        let mut dispatch = TestDispatch::default();
        dispatch
            .with_result(json!("first"))
            .with_result(json!("second"))
            .make_valid();

        assert!(dispatch.is_valid());
        assert_eq!(dispatch.results(), Some(&[json!("second")][..]));
    }

    #[test]
    fn test_describe_before_validation() {
        let dispatch = TestDispatch::default();
        assert_eq!(
            dispatch.describe(),
            r#"TestDispatch{ "calledDateTime": "N/A", "isConsumable": "false", "isStateful": "false", "isConsumed": "false" }"#
        );
    }

    #[test]
    fn test_describe_after_validation() {
        let mut dispatch = TestDispatch::default();
        dispatch.make_consumable().make_valid();

        let described = dispatch.describe();
        assert!(described.starts_with("TestDispatch{ \"calledDateTime\": \""));
        assert!(!described.contains("N/A"));
        assert!(described.contains("\"isConsumable\": \"true\""));

        let shared: &dyn Dispatch = &dispatch;
        assert_eq!(shared.to_string(), described);
    }

    #[test]
    fn test_is_dispatch_of() {
        let test_dispatch = TestDispatch::default();
        let other_dispatch = OtherDispatch::default();

        assert!(is_dispatch_of::<TestDispatch>(&test_dispatch));
        assert!(!is_dispatch_of::<OtherDispatch>(&test_dispatch));
        assert!(is_dispatch_of::<OtherDispatch>(&other_dispatch));

        // accepting either type
        let accepts = |dispatch: &dyn Dispatch| {
            is_dispatch_of::<TestDispatch>(dispatch) || is_dispatch_of::<OtherDispatch>(dispatch)
        };
        assert!(accepts(&test_dispatch));
        assert!(accepts(&other_dispatch));
    }

    #[test]
    fn test_downcast_dispatch_mut() {
        let mut test_dispatch = TestDispatch::default();
        let shared: &mut dyn Dispatch = &mut test_dispatch;

        assert!(downcast_dispatch::<OtherDispatch>(shared).is_none());
        let concrete = downcast_dispatch_mut::<TestDispatch>(shared).expect("should downcast");
        concrete.make_valid();

        assert!(test_dispatch.is_valid());
    }

    proptest! {
        #[test]
        fn prop_result_count_follows_statefulness(stateful in any::<bool>(), values in proptest::collection::vec(any::<i64>(), 1..20)) {
            let mut state = DispatchState::new();
            if stateful {
                state.make_stateful();
            }

            for value in &values {
                state.set_result(json!(value));
            }

            let results = state.results().expect("results should be present");
            if stateful {
                prop_assert_eq!(state.num_results(), values.len());
                let expected: Vec<Value> = values.iter().map(|v| json!(v)).collect();
                prop_assert_eq!(results, expected.as_slice());
            } else {
                prop_assert_eq!(state.num_results(), 1);
                prop_assert_eq!(&results[0], &json!(values[values.len() - 1]));
            }
        }
    }
}
