use murmur_types::{Message, MessagePayload};
use serde::Serialize;

const IMAGE_MIMES: &[&str] = &[
    "image/apng",
    "image/avif",
    "image/gif",
    "image/jpeg",
    "image/png",
    "image/svg+xml",
    "image/webp",
];

const VIDEO_MIMES: &[&str] = &[
    "video/mpeg",
    "video/ogg",
    "video/webm",
    "video/quicktime",
    "video/mp4",
];

/// Coarse message kind. The sub-flags only feed layout choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageKind {
    Admin,
    User { og_preview: bool },
    File { thumbnail: bool },
    MultipleFiles,
}

impl MessageKind {
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Media that renders edge-to-edge (image/video thumbnail or link preview).
    pub fn is_media_like(self) -> bool {
        matches!(
            self,
            Self::User { og_preview: true } | Self::File { thumbnail: true }
        )
    }
}

pub fn classify(message: &Message) -> MessageKind {
    if message.is_admin() {
        return MessageKind::Admin;
    }
    match &message.payload {
        MessagePayload::Admin { .. } => MessageKind::Admin,
        MessagePayload::User { .. } => MessageKind::User {
            og_preview: is_og_message(message),
        },
        MessagePayload::File { mime_type, .. } => MessageKind::File {
            thumbnail: is_thumbnail_mime(mime_type),
        },
        MessagePayload::MultipleFiles { .. } => MessageKind::MultipleFiles,
    }
}

/// A user message whose link preview has a target url.
pub fn is_og_message(message: &Message) -> bool {
    match &message.payload {
        MessagePayload::User {
            og_meta_data: Some(og),
            ..
        } => og.url.as_deref().is_some_and(|url| !url.is_empty()),
        _ => false,
    }
}

pub fn is_thumbnail_mime(mime_type: &str) -> bool {
    let mime = mime_type.trim().to_ascii_lowercase();
    IMAGE_MIMES.contains(&mime.as_str()) || VIDEO_MIMES.contains(&mime.as_str())
}
