//! Window arithmetic over the filtered, ordered message list.

use agentview_core::Message;

/// Messages the timeline renders: no control markers, nothing hidden.
pub fn visible_messages(all: &[Message]) -> Vec<&Message> {
    all.iter()
        .filter(|msg| !msg.kind.is_control_marker() && !msg.hide_output)
        .collect()
}

/// Number of messages shown for `baseline_count` plus `offset` older ones.
pub fn window_len(total: usize, baseline_count: usize, offset: usize) -> usize {
    baseline_count.saturating_add(offset).min(total)
}

/// The suffix of `all` that is currently shown.
///
/// Always ends at the latest message and never starts before the first.
pub fn visible_slice<T>(all: &[T], baseline_count: usize, offset: usize) -> &[T] {
    let len = window_len(all.len(), baseline_count, offset);
    &all[all.len() - len..]
}

/// Messages above the current window.
pub fn remaining_older(total: usize, baseline_count: usize, offset: usize) -> usize {
    total - window_len(total, baseline_count, offset)
}

/// Size of the next load-older step, bounded by what is left.
pub fn next_chunk(total: usize, baseline_count: usize, offset: usize, chunk_size: usize) -> usize {
    chunk_size.min(remaining_older(total, baseline_count, offset))
}
