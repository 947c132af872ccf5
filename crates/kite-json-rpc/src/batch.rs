//! Correlation of an unordered batch response back to the ordered request
//! list.
//!
//! Servers are free to reorder responses and may, by bug or malice, drop
//! responses, reuse one id across several responses, or send responses with
//! no id at all. Correlation never fails on these anomalies: every value the
//! server sent is surfaced somewhere in the output, and the output always
//! has one slot per request, in request order.

use std::collections::HashMap;

use crate::request::JsonRpcBatchRequest;
use crate::response::{JsonRpcBatchResponse, ResponseValue};
use crate::types::RequestId;

/// Ordered accumulator for responses whose id was null.
///
/// These can not be attributed to any specific request. They are surfaced
/// positionally as a best-effort signal in slots that got no exact match,
/// rather than lost entirely.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnlinkedResults {
    values: Vec<ResponseValue>,
}

impl UnlinkedResults {
    pub fn push(&mut self, value: ResponseValue) {
        self.values.push(value);
    }

    pub fn values(&self) -> &[ResponseValue] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// Ordered accumulator for all values observed under one id that the server
/// illegally reused within a batch. Always holds at least two values.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicatedResults {
    values: Vec<ResponseValue>,
}

impl DuplicatedResults {
    fn from_values(values: Vec<ResponseValue>) -> Self {
        debug_assert!(values.len() >= 2);
        Self { values }
    }

    pub fn values(&self) -> &[ResponseValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// The correlated outcome of one request slot.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// No response could be attributed to this request, and no unlinked
    /// responses exist either. Notifications with a quiet server land here
    /// too; the protocol can not tell the two cases apart.
    Missing,
    /// Exactly one response matched this request's id.
    Value(ResponseValue),
    /// The server sent several responses under this request's id; all of
    /// them, in wire order, rather than silently one or the other.
    Duplicated(DuplicatedResults),
    /// No exact id match; the batch contained id-less responses which may
    /// or may not belong to this request.
    Unlinked(UnlinkedResults),
}

/// Match an unordered batch response back to the ordered request list.
///
/// The output length always equals the request count and follows request
/// order; callers can zip requests to outcomes positionally. Pure and
/// non-suspending.
pub fn correlate(
    request: &JsonRpcBatchRequest,
    response: &JsonRpcBatchResponse,
) -> Vec<BatchOutcome> {
    let mut unlinked = UnlinkedResults::default();
    let mut by_id: HashMap<&RequestId, Vec<ResponseValue>> = HashMap::new();

    for item in response.responses() {
        let value = item.value.clone();
        match &item.id {
            None => unlinked.push(value),
            Some(id) => by_id.entry(id).or_default().push(value),
        }
    }

    let fallback = |unlinked: &UnlinkedResults| {
        if unlinked.is_empty() {
            BatchOutcome::Missing
        } else {
            BatchOutcome::Unlinked(unlinked.clone())
        }
    };

    request
        .requests()
        .iter()
        .map(|item| {
            let Some(id) = &item.id else {
                // A notification must not have a response; unlinked values
                // are not attributable to it either, but are still surfaced.
                return fallback(&unlinked);
            };
            match by_id.get(id) {
                Some(values) if values.len() == 1 => BatchOutcome::Value(values[0].clone()),
                Some(values) => {
                    BatchOutcome::Duplicated(DuplicatedResults::from_values(values.clone()))
                }
                None => fallback(&unlinked),
            }
        })
        .collect()
}
