//! MockInvoker - programmable test double
//!
//! Records every accepted call and fails on demand, either by call number
//! (deterministic with serial dispatch) or whenever a record carries a
//! marker key (deterministic under concurrent dispatch).

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use contracts::{Acceptance, ContractError, EventRecord, Invoker, TargetId};

/// Test invoker with programmable failures
pub struct MockInvoker {
    name: String,
    calls: AtomicU64,
    fail_calls: HashSet<u64>,
    fail_key: Option<String>,
    delay: Option<Duration>,
    accepted: Mutex<Vec<(TargetId, EventRecord)>>,
}

impl MockInvoker {
    /// Create a mock that accepts everything
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calls: AtomicU64::new(0),
            fail_calls: HashSet::new(),
            fail_key: None,
            delay: None,
            accepted: Mutex::new(Vec::new()),
        }
    }

    /// Fail the given 1-based call numbers (use with serial dispatch)
    pub fn fail_on_calls(mut self, calls: impl IntoIterator<Item = u64>) -> Self {
        self.fail_calls = calls.into_iter().collect();
        self
    }

    /// Fail any record carrying the given top-level key
    pub fn fail_on_key(mut self, key: impl Into<String>) -> Self {
        self.fail_key = Some(key.into());
        self
    }

    /// Sleep for the given duration before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Total acceptance calls seen
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Targets of accepted calls, in completion order
    pub fn accepted_targets(&self) -> Vec<TargetId> {
        self.lock_accepted()
            .iter()
            .map(|(target, _)| target.clone())
            .collect()
    }

    /// Records of accepted calls, in completion order
    pub fn accepted_records(&self) -> Vec<EventRecord> {
        self.lock_accepted()
            .iter()
            .map(|(_, record)| record.clone())
            .collect()
    }

    fn lock_accepted(&self) -> std::sync::MutexGuard<'_, Vec<(TargetId, EventRecord)>> {
        self.accepted
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

impl Invoker for MockInvoker {
    fn name(&self) -> &str {
        &self.name
    }

    async fn accept(
        &self,
        target: &TargetId,
        record: &EventRecord,
    ) -> Result<Acceptance, ContractError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_calls.contains(&call) {
            return Err(ContractError::dispatch_rejected(
                target.as_str(),
                format!("mock failure on call {call}"),
            ));
        }

        if let Some(ref key) = self.fail_key {
            if record.contains_key(key) {
                return Err(ContractError::dispatch_rejected(
                    target.as_str(),
                    format!("mock failure on record key '{key}'"),
                ));
            }
        }

        self.lock_accepted().push((target.clone(), record.clone()));
        Ok(Acceptance::new(202))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_accepts_and_records() {
        let invoker = MockInvoker::new("mock");
        let target = TargetId::new("stable");
        let record = EventRecord::new().with_field("id", json!(1));

        invoker.accept(&target, &record).await.unwrap();
        assert_eq!(invoker.call_count(), 1);
        assert_eq!(invoker.accepted_targets(), vec![target]);
    }

    #[tokio::test]
    async fn test_mock_fails_on_call_number() {
        let invoker = MockInvoker::new("mock").fail_on_calls([2]);
        let target = TargetId::new("t");
        let record = EventRecord::new();

        assert!(invoker.accept(&target, &record).await.is_ok());
        assert!(invoker.accept(&target, &record).await.is_err());
        assert!(invoker.accept(&target, &record).await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_fails_on_marker_key() {
        let invoker = MockInvoker::new("mock").fail_on_key("boom");
        let target = TargetId::new("t");

        let good = EventRecord::new().with_field("id", json!(1));
        let bad = EventRecord::new().with_field("boom", json!(true));

        assert!(invoker.accept(&target, &good).await.is_ok());
        assert!(invoker.accept(&target, &bad).await.is_err());
    }
}
