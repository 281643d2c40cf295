use serde::{Deserialize, Serialize};

use crate::models::{Message, MessageId, Timestamp};

/// Requests sent FROM the message view TO the host's callback collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum MessageAction {
    /// Retry sending a failed message
    Resend { message: Message },

    /// Delete the message
    Delete { message: Message },

    /// Add or remove the viewer's reaction
    ToggleReaction {
        message: Message,
        reaction_key: String,
        is_reacted: bool,
    },

    /// Make the message the target of the next quote reply
    SetQuoteTarget { message: Message },

    /// Open the thread panel anchored to this message
    OpenThread { message: Message },

    /// Scroll the conversation to a message
    ScrollToMessage {
        created_at: Timestamp,
        message_id: MessageId,
    },

    /// Toggle the edit composer
    ShowEdit(bool),

    /// Toggle the delete confirmation
    ShowRemove(bool),

    /// Toggle the full-screen file viewer
    ShowFileViewer(bool),

    /// The rendered height of the message changed (e.g. an image loaded)
    HeightChanged,
}

impl MessageAction {
    /// Id of the message the action is about, when it carries one.
    pub fn message_id(&self) -> Option<MessageId> {
        match self {
            Self::Resend { message }
            | Self::Delete { message }
            | Self::ToggleReaction { message, .. }
            | Self::SetQuoteTarget { message }
            | Self::OpenThread { message } => Some(message.message_id),
            Self::ScrollToMessage { message_id, .. } => Some(*message_id),
            // Visibility toggles and height changes are view-global
            _ => None,
        }
    }
}
