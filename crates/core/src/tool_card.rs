//! Tool name → card variant dispatch.
//!
//! The timeline shows each tool call as a card. Which card is used depends on
//! the tool name; unknown tools get the generic card.

use crate::message::ToolCall;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

const SUMMARY_MAX_CHARS: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCardKind {
    Bash,
    Patch,
    Edit,
    Think,
    Title,
    Done,
    CodeReview,
    MultipleChoice,
    Todo,
    KeywordSearch,
    Browser,
    ReadImage,
    About,
    Generic,
}

impl ToolCardKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::Patch => "patch",
            Self::Edit => "edit",
            Self::Think => "think",
            Self::Title => "title",
            Self::Done => "done",
            Self::CodeReview => "code review",
            Self::MultipleChoice => "question",
            Self::Todo => "todo",
            Self::KeywordSearch => "search",
            Self::Browser => "browser",
            Self::ReadImage => "image",
            Self::About => "about",
            Self::Generic => "tool",
        }
    }

    /// One-line description of the call input for this card variant.
    fn summarize(&self, call: &ToolCall) -> Option<String> {
        let input: Option<Value> = serde_json::from_str(&call.input).ok();
        let field = |key: &str| {
            input
                .as_ref()
                .and_then(|v| v.get(key))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let summary = match self {
            Self::Bash => field("command"),
            Self::Patch | Self::Edit | Self::ReadImage => field("path"),
            Self::Think => field("thoughts"),
            Self::Title => field("title").or_else(|| field("slug")),
            Self::KeywordSearch => field("query"),
            Self::MultipleChoice => field("question"),
            Self::Browser => field("url")
                .or_else(|| field("selector"))
                .or_else(|| Some(call.name.clone())),
            Self::Todo => input
                .as_ref()
                .and_then(|v| v.get("tasks"))
                .and_then(Value::as_array)
                .map(|tasks| format!("{} tasks", tasks.len())),
            Self::Done | Self::CodeReview | Self::About => None,
            Self::Generic => {
                let raw = call.input.trim();
                (!raw.is_empty()).then(|| raw.to_string())
            }
        };

        summary.map(|s| truncate_line(&s, SUMMARY_MAX_CHARS))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCardStatus {
    Pending,
    Succeeded,
    Failed,
}

/// Presentation-neutral description of one tool call card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCard {
    pub kind: ToolCardKind,
    pub tool_name: String,
    pub tool_call_id: String,
    pub summary: Option<String>,
    pub status: ToolCardStatus,
}

#[derive(Debug, Clone)]
pub struct ToolCardRegistry {
    by_name: HashMap<String, ToolCardKind>,
    by_prefix: Vec<(String, ToolCardKind)>,
    fallback: ToolCardKind,
}

impl Default for ToolCardRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for (name, kind) in [
            ("bash", ToolCardKind::Bash),
            ("patch", ToolCardKind::Patch),
            ("str_replace_editor", ToolCardKind::Edit),
            ("think", ToolCardKind::Think),
            ("title", ToolCardKind::Title),
            ("set-slug", ToolCardKind::Title),
            ("done", ToolCardKind::Done),
            ("codereview", ToolCardKind::CodeReview),
            ("multiplechoice", ToolCardKind::MultipleChoice),
            ("todo_read", ToolCardKind::Todo),
            ("todo_write", ToolCardKind::Todo),
            ("keyword_search", ToolCardKind::KeywordSearch),
            ("read_image", ToolCardKind::ReadImage),
            ("about_sketch", ToolCardKind::About),
        ] {
            registry.register(name, kind);
        }
        registry.register_prefix("browser_", ToolCardKind::Browser);
        registry
    }
}

impl ToolCardRegistry {
    /// Registry with no mappings; everything uses the generic card.
    pub fn empty() -> Self {
        Self {
            by_name: HashMap::new(),
            by_prefix: Vec::new(),
            fallback: ToolCardKind::Generic,
        }
    }

    /// Map an exact tool name, replacing any previous mapping.
    pub fn register(&mut self, tool_name: impl Into<String>, kind: ToolCardKind) {
        self.by_name.insert(tool_name.into(), kind);
    }

    /// Map every tool whose name starts with `prefix`. Exact names win.
    pub fn register_prefix(&mut self, prefix: impl Into<String>, kind: ToolCardKind) {
        self.by_prefix.push((prefix.into(), kind));
    }

    pub fn kind_for(&self, tool_name: &str) -> ToolCardKind {
        if let Some(kind) = self.by_name.get(tool_name) {
            return *kind;
        }
        self.by_prefix
            .iter()
            .find(|(prefix, _)| tool_name.starts_with(prefix.as_str()))
            .map(|(_, kind)| *kind)
            .unwrap_or(self.fallback)
    }

    pub fn card(&self, call: &ToolCall) -> ToolCard {
        let kind = self.kind_for(&call.name);
        let status = match &call.result_message {
            None => ToolCardStatus::Pending,
            Some(result) if result.tool_error => ToolCardStatus::Failed,
            Some(_) => ToolCardStatus::Succeeded,
        };
        ToolCard {
            kind,
            tool_name: call.name.clone(),
            tool_call_id: call.tool_call_id.clone(),
            summary: kind.summarize(call),
            status,
        }
    }
}

fn truncate_line(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or_default().trim();
    if line.chars().count() <= max_chars {
        return line.to_string();
    }
    let mut out: String = line.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Message, MessageType};

    fn call(name: &str, input: &str) -> ToolCall {
        let mut call = ToolCall::pending(name, "id-1");
        call.input = input.to_string();
        call
    }

    #[test]
    fn known_tools_map_to_their_cards() {
        let registry = ToolCardRegistry::default();
        assert_eq!(registry.kind_for("bash"), ToolCardKind::Bash);
        assert_eq!(registry.kind_for("str_replace_editor"), ToolCardKind::Edit);
        assert_eq!(registry.kind_for("todo_write"), ToolCardKind::Todo);
        assert_eq!(registry.kind_for("browser_navigate"), ToolCardKind::Browser);
    }

    #[test]
    fn unknown_tool_falls_back_to_generic() {
        let registry = ToolCardRegistry::default();
        assert_eq!(registry.kind_for("frobnicate"), ToolCardKind::Generic);
        assert_eq!(ToolCardRegistry::empty().kind_for("bash"), ToolCardKind::Generic);
    }

    #[test]
    fn exact_registration_overrides_prefix() {
        let mut registry = ToolCardRegistry::default();
        registry.register("browser_take_screenshot", ToolCardKind::ReadImage);
        assert_eq!(
            registry.kind_for("browser_take_screenshot"),
            ToolCardKind::ReadImage
        );
        assert_eq!(registry.kind_for("browser_click"), ToolCardKind::Browser);
    }

    #[test]
    fn card_summary_comes_from_input() {
        let registry = ToolCardRegistry::default();
        let card = registry.card(&call("bash", r#"{"command":"cargo fmt\ncargo test"}"#));
        assert_eq!(card.summary.as_deref(), Some("cargo fmt"));

        let card = registry.card(&call("todo_write", r#"{"tasks":[{},{},{}]}"#));
        assert_eq!(card.summary.as_deref(), Some("3 tasks"));

        let card = registry.card(&call("done", "{}"));
        assert_eq!(card.summary, None);
    }

    #[test]
    fn generic_card_truncates_raw_input() {
        let registry = ToolCardRegistry::default();
        let long = "x".repeat(200);
        let card = registry.card(&call("mystery", &long));
        let summary = card.summary.expect("summary");
        assert_eq!(summary.chars().count(), SUMMARY_MAX_CHARS);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn card_status_follows_result() {
        let registry = ToolCardRegistry::default();
        let mut c = call("bash", "{}");
        assert_eq!(registry.card(&c).status, ToolCardStatus::Pending);

        let mut result = Message::new(3, MessageType::Tool);
        result.tool_error = true;
        c.resolve(&result);
        assert_eq!(registry.card(&c).status, ToolCardStatus::Failed);
    }
}
