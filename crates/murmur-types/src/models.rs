use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Server-assigned message id. `0` means the message has not round-tripped yet.
pub type MessageId = i64;

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub user_id: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub profile_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendingStatus {
    Pending,
    Failed,
    Succeeded,
}

impl SendingStatus {
    /// Pending and failed messages only exist on this device.
    pub fn is_local_only(self) -> bool {
        matches!(self, Self::Pending | Self::Failed)
    }
}

/// The resolved message a reply points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentMessage {
    pub message_id: MessageId,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub sender: Option<Sender>,
    #[serde(default)]
    pub excerpt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadInfo {
    #[serde(default)]
    pub reply_count: u32,
    #[serde(default)]
    pub last_replied_at: Timestamp,
    #[serde(default)]
    pub most_replies: Vec<Sender>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub key: String,
    #[serde(default)]
    pub user_ids: Vec<String>,
    #[serde(default)]
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OgMetaData {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub size: u64,
}

/// Kind-specific payload. The tag doubles as the message type reported by
/// the host feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "message_type", rename_all = "snake_case")]
pub enum MessagePayload {
    Admin {
        #[serde(default)]
        text: String,
    },
    User {
        #[serde(default)]
        text: String,
        #[serde(default)]
        og_meta_data: Option<OgMetaData>,
    },
    File {
        #[serde(default)]
        url: String,
        #[serde(default)]
        name: String,
        #[serde(default)]
        mime_type: String,
    },
    MultipleFiles {
        #[serde(default)]
        files: Vec<UploadedFile>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub message_id: MessageId,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub sender: Option<Sender>,
    #[serde(default)]
    pub sending_status: Option<SendingStatus>,
    /// Explicit admin marker some feeds set instead of the `admin` tag.
    #[serde(default)]
    pub is_admin_message: bool,
    #[serde(default)]
    pub parent_message_id: Option<MessageId>,
    #[serde(default)]
    pub parent_message: Option<ParentMessage>,
    #[serde(default)]
    pub thread_info: Option<ThreadInfo>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(flatten)]
    pub payload: MessagePayload,
}

impl Message {
    pub fn sender_id(&self) -> Option<&str> {
        self.sender.as_ref().map(|s| s.user_id.as_str())
    }

    pub fn reply_count(&self) -> u32 {
        self.thread_info.as_ref().map_or(0, |t| t.reply_count)
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin_message || matches!(self.payload, MessagePayload::Admin { .. })
    }

    /// User, file and multi-file messages: everything a member can send.
    pub fn is_sendable(&self) -> bool {
        !self.is_admin()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub is_ephemeral: bool,
    /// Oldest timestamp the channel still retains.
    #[serde(default)]
    pub message_offset_timestamp: Timestamp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    /// Desktop and tablet layouts share the mouse-driven menus.
    #[default]
    Desktop,
}

impl DeviceClass {
    pub fn is_mobile(self) -> bool {
        matches!(self, Self::Mobile)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerContext {
    pub user_id: String,
    #[serde(default)]
    pub device: DeviceClass,
    /// user id -> display name
    #[serde(default)]
    pub nicknames: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emoji {
    pub key: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiContainer {
    #[serde(default)]
    pub emojis: Vec<Emoji>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplyType {
    #[default]
    None,
    QuoteReply,
    Thread,
}

/// What a reply interaction should do when threads are enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreadReplySelectType {
    #[default]
    Thread,
    Parent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplyConfiguration {
    #[serde(default)]
    pub reply_type: ReplyType,
    #[serde(default)]
    pub thread_reply_select_type: ThreadReplySelectType,
}

impl ReplyConfiguration {
    pub fn new(reply_type: ReplyType, thread_reply_select_type: ThreadReplySelectType) -> Self {
        Self {
            reply_type,
            thread_reply_select_type,
        }
    }

    pub fn allows_replying(&self) -> bool {
        matches!(self.reply_type, ReplyType::QuoteReply | ReplyType::Thread)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_tagged_user_message() {
        let json = r#"{
            "message_id": 7,
            "created_at": 1000,
            "sender": { "user_id": "alice" },
            "sending_status": "succeeded",
            "message_type": "user",
            "text": "hi",
            "parent_message_id": 42,
            "parent_message": { "message_id": 42, "created_at": 900 }
        }"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.sender_id(), Some("alice"));
        assert_eq!(msg.parent_message_id, Some(42));
        assert!(matches!(msg.payload, MessagePayload::User { ref text, .. } if text == "hi"));
        assert!(!msg.is_admin());
    }

    #[test]
    fn admin_flag_or_tag_marks_admin() {
        let tagged: Message =
            serde_json::from_str(r#"{ "message_type": "admin", "text": "joined" }"#).unwrap();
        assert!(tagged.is_admin());

        let flagged: Message = serde_json::from_str(
            r#"{ "message_type": "user", "text": "notice", "is_admin_message": true }"#,
        )
        .unwrap();
        assert!(flagged.is_admin());
        assert!(!flagged.is_sendable());
    }

    #[test]
    fn reply_type_uses_screaming_case() {
        let cfg: ReplyConfiguration = serde_json::from_str(
            r#"{ "reply_type": "QUOTE_REPLY", "thread_reply_select_type": "PARENT" }"#,
        )
        .unwrap();
        assert_eq!(cfg.reply_type, ReplyType::QuoteReply);
        assert_eq!(cfg.thread_reply_select_type, ThreadReplySelectType::Parent);
        assert!(cfg.allows_replying());
        assert!(!ReplyConfiguration::default().allows_replying());
    }

    #[test]
    fn local_only_statuses() {
        assert!(SendingStatus::Pending.is_local_only());
        assert!(SendingStatus::Failed.is_local_only());
        assert!(!SendingStatus::Succeeded.is_local_only());
    }
}
