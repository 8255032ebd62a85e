//! Merge two message lists into one ordered timeline.
//!
//! Typical inputs are persisted history plus messages received from the live
//! stream. The result is ordered by `idx` with no duplicates, control markers
//! removed, and every tool call whose result arrived in either list resolved.

use crate::message::Message;
use std::collections::{HashMap, HashSet};

/// Filtering knobs for [`aggregate_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregatePolicy {
    /// Drop messages with blank content and no tool calls, commits or
    /// external payload.
    pub drop_empty: bool,
}

impl AggregatePolicy {
    pub fn dropping_empty() -> Self {
        Self { drop_empty: true }
    }
}

/// Merge `a` and `b` with the default policy (empty messages kept).
pub fn aggregate(a: &[Message], b: &[Message]) -> Vec<Message> {
    aggregate_with(a, b, &AggregatePolicy::default())
}

/// Merge `a` and `b`.
///
/// On duplicate `idx` the first occurrence in `a ++ b` wins. `tool` messages
/// never appear in the output; they only resolve the calls they answer, and a
/// result without a matching call is dropped.
pub fn aggregate_with(a: &[Message], b: &[Message], policy: &AggregatePolicy) -> Vec<Message> {
    let all = a.iter().chain(b.iter());

    let mut tool_results: HashMap<&str, &Message> = HashMap::new();
    let mut seen: HashSet<i64> = HashSet::new();
    let mut out: Vec<Message> = Vec::new();

    for msg in all {
        if msg.is_tool_result() {
            if let Some(call_id) = msg.tool_call_id.as_deref() {
                tool_results.entry(call_id).or_insert(msg);
            }
            continue;
        }
        if msg.kind.is_control_marker() {
            continue;
        }
        if policy.drop_empty && msg.is_empty_payload() {
            continue;
        }
        if !seen.insert(msg.idx) {
            continue;
        }
        out.push(msg.clone());
    }

    out.sort_by_key(|msg| msg.idx);

    let mut resolved = 0usize;
    for msg in &mut out {
        for call in &mut msg.tool_calls {
            if let Some(result) = tool_results.get(call.tool_call_id.as_str()) {
                if call.resolve(result) {
                    resolved += 1;
                }
            }
        }
    }

    tracing::debug!(
        inputs = a.len() + b.len(),
        output = out.len(),
        tool_results = tool_results.len(),
        resolved,
        "aggregated messages"
    );

    out
}
