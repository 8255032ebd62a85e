use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Kind of a timeline entry, as tagged by the agent backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    User,
    Agent,
    Error,
    /// Dedicated for "out of budget" errors.
    Budget,
    /// Tool result answering a tool call.
    Tool,
    Commit,
    /// Automated notices such as autoformatting.
    Auto,
    External,
    // Control markers
    Slug,
    Compact,
    #[default]
    #[serde(other)]
    Unknown,
}

impl MessageType {
    /// Internal/control markers never surface in the timeline.
    pub fn is_control_marker(&self) -> bool {
        matches!(self, Self::Slug | Self::Compact)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Agent => "agent",
            Self::Error => "error",
            Self::Budget => "budget",
            Self::Tool => "tool",
            Self::Commit => "commit",
            Self::Auto => "auto",
            Self::External => "external",
            Self::Slug => "slug",
            Self::Compact => "compact",
            Self::Unknown => "unknown",
        }
    }
}

/// A single timeline entry.
///
/// Every field is optional on the wire; missing values fall back to defaults
/// so a partially populated record never fails to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Message {
    /// Strictly increasing per conversation. Sole de-duplication and sort key.
    #[serde(default)]
    pub idx: i64,
    #[serde(rename = "type", default)]
    pub kind: MessageType,
    /// The agent is done working and waits for the next user input.
    #[serde(default)]
    pub end_of_turn: bool,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(rename = "input", default, skip_serializing_if = "Option::is_none")]
    pub tool_input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_result: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub tool_error: bool,
    /// Set on `tool` messages: the call this result answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commits: Vec<GitCommit>,
    #[serde(
        rename = "external_message",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub external: Option<ExternalPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub conversation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_conversation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Nanoseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed: Option<i64>,
    /// Nanoseconds taken by the complete agent turn.
    #[serde(
        rename = "turnDuration",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub turn_duration: Option<i64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hide_output: bool,
}

impl Message {
    pub fn new(idx: i64, kind: MessageType) -> Self {
        Self {
            idx,
            kind,
            ..Self::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed.and_then(nanos_to_duration)
    }

    pub fn turn_duration(&self) -> Option<Duration> {
        self.turn_duration.and_then(nanos_to_duration)
    }

    /// Blank content and nothing else worth showing.
    pub fn is_empty_payload(&self) -> bool {
        self.content.trim().is_empty()
            && self.tool_calls.is_empty()
            && self.commits.is_empty()
            && self.external.is_none()
    }

    pub fn is_tool_result(&self) -> bool {
        self.kind == MessageType::Tool
    }
}

fn nanos_to_duration(nanos: i64) -> Option<Duration> {
    u64::try_from(nanos).ok().map(Duration::from_nanos)
}

/// A tool invocation requested by the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ToolCall {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub tool_call_id: String,
    /// The `tool` message that answered this call, once it arrived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_message: Option<Box<Message>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl ToolCall {
    pub fn pending(name: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tool_call_id: tool_call_id.into(),
            ..Self::default()
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.result_message.is_some()
    }

    /// Attach the tool result. Returns `true` when the call changed state.
    ///
    /// A call resolves once; re-resolving with the same result is a no-op and
    /// a conflicting later result is ignored.
    pub fn resolve(&mut self, result: &Message) -> bool {
        match &self.result_message {
            Some(existing) if existing.idx == result.idx => false,
            Some(existing) => {
                tracing::debug!(
                    tool_call_id = %self.tool_call_id,
                    kept = existing.idx,
                    ignored = result.idx,
                    "tool call already resolved by a different result"
                );
                false
            }
            None => {
                self.result_message = Some(Box::new(result.clone()));
                true
            }
        }
    }
}

/// A git commit shown by a `commit` message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GitCommit {
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    /// Branch the commit was pushed to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pushed_branch: Option<String>,
}

impl GitCommit {
    pub fn short_hash(&self) -> &str {
        self.hash.get(..8).unwrap_or(&self.hash)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub cache_creation_input_tokens: u64,
    #[serde(default)]
    pub cache_read_input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default)]
    pub cost_usd: f64,
}

/// Notice injected from outside the agent loop (e.g. CI outcomes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExternalPayload {
    #[serde(default)]
    pub message_type: String,
    #[serde(default)]
    pub text_content: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub body: serde_json::Value,
}

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("invalid message array: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid message on line {line}: {source}")]
    InvalidLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse messages from either a JSON array or JSON lines.
pub fn parse_messages(input: &str) -> Result<Vec<Message>, MessageError> {
    let trimmed = input.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|source| MessageError::InvalidLine {
                line: i + 1,
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let msg: Message = serde_json::from_str(r#"{"idx": 3}"#).unwrap();
        assert_eq!(msg.idx, 3);
        assert_eq!(msg.kind, MessageType::Unknown);
        assert!(msg.content.is_empty());
        assert!(msg.tool_calls.is_empty());
        assert!(msg.timestamp.is_none());
    }

    #[test]
    fn unknown_type_tag_does_not_fail() {
        let msg: Message = serde_json::from_str(r#"{"idx": 1, "type": "hologram"}"#).unwrap();
        assert_eq!(msg.kind, MessageType::Unknown);
    }

    #[test]
    fn backend_payload_deserializes() {
        let raw = r#"{
            "type": "agent",
            "end_of_turn": false,
            "content": "running tests",
            "tool_calls": [
                {"name": "bash", "input": "{\"command\":\"ls\"}", "tool_call_id": "toolu_1"}
            ],
            "timestamp": "2025-05-01T10:00:00Z",
            "conversation_id": "c1",
            "elapsed": 1500000000,
            "turnDuration": 3000000000,
            "idx": 7
        }"#;
        let msg: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.kind, MessageType::Agent);
        assert_eq!(msg.idx, 7);
        assert_eq!(msg.tool_calls[0].tool_call_id, "toolu_1");
        assert!(!msg.tool_calls[0].is_resolved());
        assert_eq!(msg.elapsed(), Some(Duration::from_millis(1500)));
        assert_eq!(msg.turn_duration(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn tool_result_fields_use_wire_names() {
        let raw = r#"{"type":"tool","idx":2,"tool_call_id":"x","tool_name":"bash","input":"ls","tool_result":"ok","tool_error":true}"#;
        let msg: Message = serde_json::from_str(raw).unwrap();
        assert!(msg.is_tool_result());
        assert_eq!(msg.tool_input.as_deref(), Some("ls"));
        assert!(msg.tool_error);

        let encoded = serde_json::to_value(&msg).unwrap();
        assert_eq!(encoded["type"], "tool");
        assert_eq!(encoded["input"], "ls");
    }

    #[test]
    fn negative_elapsed_is_ignored() {
        let mut msg = Message::new(0, MessageType::Agent);
        msg.elapsed = Some(-5);
        assert_eq!(msg.elapsed(), None);
    }

    #[test]
    fn empty_payload_detection() {
        let mut msg = Message::new(0, MessageType::Agent).with_content("   ");
        assert!(msg.is_empty_payload());

        msg.commits.push(GitCommit {
            hash: "abc".to_string(),
            ..GitCommit::default()
        });
        assert!(!msg.is_empty_payload());
    }

    #[test]
    fn resolve_is_idempotent_and_first_result_wins() {
        let mut call = ToolCall::pending("bash", "x");
        let first = Message::new(4, MessageType::Tool);
        let other = Message::new(9, MessageType::Tool);

        assert!(call.resolve(&first));
        assert!(!call.resolve(&first));
        assert!(!call.resolve(&other));
        assert_eq!(call.result_message.as_ref().map(|m| m.idx), Some(4));
    }

    #[test]
    fn short_hash_handles_short_values() {
        let commit = GitCommit {
            hash: "abc".to_string(),
            ..GitCommit::default()
        };
        assert_eq!(commit.short_hash(), "abc");

        let commit = GitCommit {
            hash: "0123456789abcdef".to_string(),
            ..GitCommit::default()
        };
        assert_eq!(commit.short_hash(), "01234567");
    }

    #[test]
    fn parse_messages_accepts_array_and_jsonl() {
        let array = parse_messages(r#"[{"idx":0,"type":"user"},{"idx":1,"type":"agent"}]"#)
            .expect("array");
        assert_eq!(array.len(), 2);

        let lines =
            parse_messages("{\"idx\":0,\"type\":\"user\"}\n\n{\"idx\":1}\n").expect("jsonl");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].kind, MessageType::Unknown);

        assert!(parse_messages("   ").expect("empty").is_empty());
    }

    #[test]
    fn parse_messages_reports_bad_line() {
        let err = parse_messages("{\"idx\":0}\nnot json\n").unwrap_err();
        match err {
            MessageError::InvalidLine { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
