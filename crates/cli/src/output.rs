use agentview_core::tool_card::{ToolCardRegistry, ToolCardStatus};
use agentview_core::{Message, MessageType};
use std::time::Duration;

/// Output format for timeline commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Plain-text lines for one timeline entry.
pub fn render_message(message: &Message, cards: &ToolCardRegistry) -> Vec<String> {
    let mut header = format!("[{}] {}", message.idx, message.kind.as_str());
    if let Some(elapsed) = message.elapsed() {
        header.push_str(&format!(" ({})", format_duration(elapsed)));
    }
    let first_line = message.content.lines().next().unwrap_or_default().trim();
    if !first_line.is_empty() {
        header.push_str(": ");
        header.push_str(first_line);
    }
    if message.kind == MessageType::External {
        if let Some(external) = &message.external {
            header.push_str(&format!(" <{}> {}", external.message_type, external.text_content));
        }
    }

    let mut lines = vec![header];
    for call in &message.tool_calls {
        let card = cards.card(call);
        let status = match card.status {
            ToolCardStatus::Pending => "pending",
            ToolCardStatus::Succeeded => "ok",
            ToolCardStatus::Failed => "failed",
        };
        let mut line = format!("    {}", card.tool_name);
        if card.kind.label() != card.tool_name {
            line.push_str(&format!(" ({})", card.kind.label()));
        }
        if let Some(summary) = &card.summary {
            line.push_str(": ");
            line.push_str(summary);
        }
        line.push_str(&format!(" [{status}]"));
        lines.push(line);
    }
    for commit in &message.commits {
        let mut line = format!("    commit {} {}", commit.short_hash(), commit.subject);
        if let Some(branch) = &commit.pushed_branch {
            line.push_str(&format!(" -> {branch}"));
        }
        lines.push(line);
    }
    lines
}

fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1_000 {
        format!("{millis}ms")
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}
