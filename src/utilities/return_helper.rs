//! Status-carrying return values
//!
//! [`ReturnHelper`] bundles a good/bad status with a list of messages and a
//! list of results. Single additions always succeed. Bulk additions treat an
//! empty collection as a caller bug and return an error.
//!
//! ```rust
//! use chain_helper::utilities::ReturnHelper;
//! use serde_json::json;
//!
//! let mut ret = ReturnHelper::new();
//! assert!(ret.is_bad());
//!
//! ret.add_result(json!({"id": 1}));
//! ret.add_messages(vec!["loaded".to_string(), "cached".to_string()]).unwrap();
//! ret.make_good();
//!
//! assert!(ret.is_good());
//! assert_eq!(ret.messages().len(), 2);
//! assert!(ret.add_results(Vec::new()).is_err());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utilities::{UtilityError, UtilityResult};

/// Outcome flag carried by a [`ReturnHelper`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnStatus {
    #[default]
    Bad,
    Good,
}

/// Return value with status, messages and results. Starts out bad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnHelper<T = Value> {
    status: ReturnStatus,
    messages: Vec<String>,
    results: Vec<T>,
}

impl<T> Default for ReturnHelper<T> {
    fn default() -> Self {
        Self {
            status: ReturnStatus::Bad,
            messages: Vec::new(),
            results: Vec::new(),
        }
    }
}

impl<T> ReturnHelper<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_message<S: Into<String>>(&mut self, message: S) {
        self.messages.push(message.into());
    }

    /// Append several messages; an empty collection is rejected
    pub fn add_messages<I, S>(&mut self, messages: I) -> UtilityResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.messages.len();
        self.messages.extend(messages.into_iter().map(Into::into));

        if self.messages.len() == before {
            return Err(UtilityError::EmptyMessages);
        }

        Ok(())
    }

    pub fn add_result(&mut self, result: T) {
        self.results.push(result);
    }

    /// Append several results; an empty collection is rejected
    pub fn add_results<I>(&mut self, results: I) -> UtilityResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        let before = self.results.len();
        self.results.extend(results);

        if self.results.len() == before {
            return Err(UtilityError::EmptyResults);
        }

        Ok(())
    }

    pub fn status(&self) -> ReturnStatus {
        self.status
    }

    pub fn is_bad(&self) -> bool {
        self.status == ReturnStatus::Bad
    }

    pub fn is_good(&self) -> bool {
        self.status == ReturnStatus::Good
    }

    pub fn make_bad(&mut self) {
        self.status = ReturnStatus::Bad;
    }

    pub fn make_good(&mut self) {
        self.status = ReturnStatus::Good;
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn results(&self) -> &[T] {
        &self.results
    }

    pub fn has_messages(&self) -> bool {
        !self.messages.is_empty()
    }

    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }
}
