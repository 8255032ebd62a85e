use crate::{Message, MessageType, ToolCall};

/// Message with the given index and type and some placeholder content.
pub fn msg(idx: i64, kind: MessageType) -> Message {
    Message::new(idx, kind).with_content(format!("{} #{idx}", kind.as_str()))
}

/// Agent message carrying one pending `bash` tool call.
pub fn agent_with_call(idx: i64, tool_call_id: &str) -> Message {
    let mut message = msg(idx, MessageType::Agent);
    message
        .tool_calls
        .push(ToolCall::pending("bash", tool_call_id));
    message
}

/// Agent message carrying one pending call to `tool_name` with `input`.
pub fn agent_calling(idx: i64, tool_name: &str, tool_call_id: &str, input: &str) -> Message {
    let mut call = ToolCall::pending(tool_name, tool_call_id);
    call.input = input.to_string();
    let mut message = msg(idx, MessageType::Agent);
    message.tool_calls.push(call);
    message
}

/// `tool` message answering `tool_call_id`.
pub fn tool_result(idx: i64, tool_call_id: &str) -> Message {
    let mut message = Message::new(idx, MessageType::Tool).with_content("done");
    message.tool_call_id = Some(tool_call_id.to_string());
    message.tool_result = Some("ok".to_string());
    message
}

/// `count` user/agent messages with consecutive indices starting at 0.
pub fn conversation(count: usize) -> Vec<Message> {
    (0..count as i64)
        .map(|idx| {
            let kind = if idx % 2 == 0 {
                MessageType::User
            } else {
                MessageType::Agent
            };
            msg(idx, kind)
        })
        .collect()
}

#[cfg(test)]
pub fn arb_messages() -> impl proptest::strategy::Strategy<Value = Vec<Message>> {
    use proptest::prelude::*;

    let call_id = prop::sample::select(vec!["a", "b", "c", "d"]);
    let kind = prop::sample::select(vec![
        MessageType::User,
        MessageType::Agent,
        MessageType::Agent,
        MessageType::Tool,
        MessageType::Slug,
        MessageType::Error,
    ]);
    let one = (0i64..12, kind, call_id, any::<bool>()).prop_map(|(idx, kind, call_id, flag)| {
        match kind {
            MessageType::Tool => tool_result(idx, call_id),
            MessageType::Agent if flag => agent_with_call(idx, call_id),
            other => msg(idx, other),
        }
    });
    prop::collection::vec(one, 0..16)
}
