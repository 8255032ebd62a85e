use agentview_core::{aggregate_with, parse_messages, AggregatePolicy, Message};
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

pub fn load_messages(path: &Path) -> Result<Vec<Message>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read messages at {}", path.display()))?;
    parse_messages(&content)
        .with_context(|| format!("Failed to parse messages at {}", path.display()))
}

/// Aggregate every file into one timeline, left to right.
pub fn merge_files(files: &[PathBuf], policy: &AggregatePolicy) -> Result<Vec<Message>> {
    if files.is_empty() {
        bail!("No message files given");
    }
    let mut merged: Vec<Message> = Vec::new();
    for path in files {
        let next = load_messages(path)?;
        tracing::debug!(path = %path.display(), count = next.len(), "loaded messages");
        merged = aggregate_with(&merged, &next, policy);
    }
    Ok(merged)
}

pub fn run_merge(files: &[PathBuf], policy: &AggregatePolicy) -> Result<()> {
    let merged = merge_files(files, policy)?;
    let json = serde_json::to_string_pretty(&merged).context("Failed to serialize messages")?;
    println!("{json}");
    Ok(())
}
