//! Shared viewer configuration types.
//!
//! The CLI reads `agentview.toml` into these types; the timeline crate turns
//! the `[timeline]` table into its viewport tuning.

use serde::{Deserialize, Serialize};

/// Canonical config file name.
pub const CONFIG_FILE_NAME: &str = "agentview.toml";

/// Top-level viewer configuration (persisted as `agentview.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ViewerConfig {
    #[serde(default)]
    pub timeline: TimelineSettings,
    #[serde(default)]
    pub aggregation: AggregationSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineSettings {
    /// Most recent messages shown before any older history is loaded.
    #[serde(default = "default_baseline_count")]
    pub baseline_count: usize,
    /// Older messages added per load-older step.
    #[serde(default = "default_load_chunk_size")]
    pub load_chunk_size: usize,
    /// Distance from the bottom still treated as "at bottom".
    #[serde(default = "default_bottom_tolerance_px")]
    pub bottom_tolerance_px: f64,
    /// Distance from the top that triggers loading older messages.
    #[serde(default = "default_near_top_threshold_px")]
    pub near_top_threshold_px: f64,
    /// A jump in message count larger than this resets the viewport.
    #[serde(default = "default_reset_jump_threshold")]
    pub reset_jump_threshold: usize,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            baseline_count: default_baseline_count(),
            load_chunk_size: default_load_chunk_size(),
            bottom_tolerance_px: default_bottom_tolerance_px(),
            near_top_threshold_px: default_near_top_threshold_px(),
            reset_jump_threshold: default_reset_jump_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AggregationSettings {
    /// Hide messages with no content, tool calls, commits or external payload.
    #[serde(default = "default_false")]
    pub drop_empty_messages: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),
}

// ── Serde default functions ─────────────────────────────────────────────

fn default_false() -> bool {
    false
}
fn default_baseline_count() -> usize {
    30
}
fn default_load_chunk_size() -> usize {
    20
}
fn default_bottom_tolerance_px() -> f64 {
    50.0
}
fn default_near_top_threshold_px() -> f64 {
    100.0
}
fn default_reset_jump_threshold() -> usize {
    20
}

/// Normalize values that would stall the viewport.
/// Returns true when any field was updated.
pub fn apply_compat_fallbacks(config: &mut ViewerConfig) -> bool {
    let mut changed = false;
    let timeline = &mut config.timeline;

    if timeline.baseline_count == 0 {
        timeline.baseline_count = default_baseline_count();
        changed = true;
    }

    if timeline.load_chunk_size == 0 {
        timeline.load_chunk_size = default_load_chunk_size();
        changed = true;
    }

    if !timeline.bottom_tolerance_px.is_finite() || timeline.bottom_tolerance_px < 0.0 {
        timeline.bottom_tolerance_px = default_bottom_tolerance_px();
        changed = true;
    }

    if !timeline.near_top_threshold_px.is_finite() || timeline.near_top_threshold_px < 0.0 {
        timeline.near_top_threshold_px = default_near_top_threshold_px();
        changed = true;
    }

    changed
}

/// Parse TOML and apply compat fallbacks.
pub fn parse_config(raw: &str) -> Result<ViewerConfig, ConfigError> {
    let mut config: ViewerConfig = toml::from_str(raw)?;
    apply_compat_fallbacks(&mut config);
    Ok(config)
}

pub fn to_toml(config: &ViewerConfig) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(config)?)
}
