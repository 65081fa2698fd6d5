use serde::{Deserialize, Serialize};
use strum_macros::Display;

// Number of non-system messages kept when no explicit limit is configured.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

// One turn of conversation. Held only while a request is being built, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn is_system(&self) -> bool {
        self.role == Role::System
    }
}

/// Trim a conversation to bound its token cost.
///
/// Keeps the first system message, if any, in front, followed by the most recent `max_messages`
/// non-system messages in their original order. Everything else is dropped. A list that already
/// satisfies this shape is returned unchanged.
pub fn prune_history(messages: Vec<ChatMessage>, max_messages: usize) -> Vec<ChatMessage> {
    let system_count = messages.iter().filter(|m| m.is_system()).count();
    let leading_system = messages.first().is_some_and(ChatMessage::is_system);
    let conversation_len = messages.len() - system_count;

    if conversation_len <= max_messages
        && (system_count == 0 || (system_count == 1 && leading_system))
    {
        return messages;
    }

    let mut system = None;
    let mut conversation = Vec::with_capacity(conversation_len);
    for message in messages {
        if message.is_system() {
            if system.is_none() {
                system = Some(message);
            }
        } else {
            conversation.push(message);
        }
    }

    let skip = conversation.len().saturating_sub(max_messages);
    system
        .into_iter()
        .chain(conversation.into_iter().skip(skip))
        .collect()
}
