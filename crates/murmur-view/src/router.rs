use murmur_types::{
    Message, MessageAction, MessageId, ReplyConfiguration, ReplyType, ThreadReplySelectType,
    Timestamp,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::sink::ActionSink;

/// Where a reply-related click came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickOrigin {
    /// The inline quote of the parent message
    QuoteBlock,
    /// "Reply in thread" in the desktop or mobile menu
    MenuReplyAction,
    /// The reply-count summary under a thread parent
    ThreadReplies,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyRoute<'m> {
    OpenThread(&'m Message),
    ScrollToParent {
        created_at: Timestamp,
        message_id: MessageId,
    },
    NoOp,
}

impl ReplyRoute<'_> {
    pub fn into_action(self) -> Option<MessageAction> {
        match self {
            ReplyRoute::OpenThread(message) => Some(MessageAction::OpenThread {
                message: message.clone(),
            }),
            ReplyRoute::ScrollToParent {
                created_at,
                message_id,
            } => Some(MessageAction::ScrollToMessage {
                created_at,
                message_id,
            }),
            ReplyRoute::NoOp => None,
        }
    }
}

/// Classifies the intent of a reply click. Never has side effects; exactly
/// one route comes out of every click.
pub fn route_reply_click<'m>(
    origin: ClickOrigin,
    reply: ReplyConfiguration,
    message: &'m Message,
) -> ReplyRoute<'m> {
    let route = match origin {
        ClickOrigin::QuoteBlock => route_quote_click(reply, message),
        // The menu only offers "reply in thread" under THREAD replies.
        ClickOrigin::MenuReplyAction if reply.reply_type != ReplyType::Thread => ReplyRoute::NoOp,
        ClickOrigin::MenuReplyAction => match reply.thread_reply_select_type {
            ThreadReplySelectType::Thread => ReplyRoute::OpenThread(message),
            ThreadReplySelectType::Parent => scroll_to_parent_or_zero(message),
        },
        ClickOrigin::ThreadReplies => ReplyRoute::OpenThread(message),
    };
    debug!(message_id = message.message_id, ?origin, ?route, "routed reply click");
    route
}

fn route_quote_click(reply: ReplyConfiguration, message: &Message) -> ReplyRoute<'_> {
    let select = reply.thread_reply_select_type;
    if reply.reply_type == ReplyType::Thread && select == ThreadReplySelectType::Thread {
        return ReplyRoute::OpenThread(message);
    }

    let scrolls = reply.reply_type == ReplyType::QuoteReply
        || (reply.reply_type == ReplyType::Thread && select == ThreadReplySelectType::Parent);
    if !scrolls {
        return ReplyRoute::NoOp;
    }

    // Zero is "not assigned yet" for both fields.
    let created_at = message
        .parent_message
        .as_ref()
        .map(|p| p.created_at)
        .filter(|&t| t != 0);
    let message_id = message.parent_message_id.filter(|&id| id != 0);
    match (created_at, message_id) {
        (Some(created_at), Some(message_id)) => ReplyRoute::ScrollToParent {
            created_at,
            message_id,
        },
        _ => ReplyRoute::NoOp,
    }
}

fn scroll_to_parent_or_zero(message: &Message) -> ReplyRoute<'_> {
    let created_at = message.parent_message.as_ref().map_or(0, |p| p.created_at);
    let message_id = message.parent_message_id.unwrap_or(0);
    if created_at == 0 || message_id == 0 {
        warn!(
            message_id = message.message_id,
            "scroll to parent requested without a complete parent reference"
        );
    }
    ReplyRoute::ScrollToParent {
        created_at,
        message_id,
    }
}

/// Routes a click and hands the result to the sink. Returns whether anything
/// was emitted.
pub fn dispatch_reply_click<S: ActionSink + ?Sized>(
    origin: ClickOrigin,
    reply: ReplyConfiguration,
    message: &Message,
    sink: &mut S,
) -> bool {
    match route_reply_click(origin, reply, message).into_action() {
        Some(action) => {
            sink.emit(action);
            true
        }
        None => false,
    }
}
