//! Menu, reaction and body callbacks. Decides which menu entries a message
//! offers and turns a picked entry into the action the host performs.

use murmur_types::{Message, MessageAction, ReplyConfiguration, ReplyType, SendingStatus};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::MessageKind;
use crate::resolve::{DisplayState, ResolveInput, resolve};
use crate::router::{ClickOrigin, dispatch_reply_click};
use crate::sink::ActionSink;

/// Entries of the desktop and mobile message menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuEntry {
    Resend,
    /// Drop a message that never reached the server
    Delete,
    QuoteReply,
    ReplyInThread,
    Edit,
    /// Ask for confirmation before deleting a sent message
    Remove,
}

/// Something picked on a message's menus or reaction bar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuAction {
    Entry(MenuEntry),
    ToggleReaction { reaction_key: String },
}

/// Raised by body renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyEvent {
    ShowFileViewer(bool),
    HeightChanged,
}

fn is_sent(message: &Message) -> bool {
    !message.sending_status.is_some_and(|s| s.is_local_only())
}

/// Menu entries offered for a message, in display order. Empty for admin
/// notices and while the view is disabled.
pub fn menu_entries(
    state: &DisplayState,
    message: &Message,
    reply: ReplyConfiguration,
) -> Vec<MenuEntry> {
    if state.is_admin || state.disabled {
        return Vec::new();
    }

    let mut entries = Vec::new();
    if !is_sent(message) {
        if state.is_by_me {
            if message.sending_status == Some(SendingStatus::Failed) {
                entries.push(MenuEntry::Resend);
            }
            entries.push(MenuEntry::Delete);
        }
        return entries;
    }

    match reply.reply_type {
        ReplyType::QuoteReply => entries.push(MenuEntry::QuoteReply),
        ReplyType::Thread => entries.push(MenuEntry::ReplyInThread),
        ReplyType::None => {}
    }
    if state.is_by_me {
        if matches!(state.kind, MessageKind::User { .. }) {
            entries.push(MenuEntry::Edit);
        }
        entries.push(MenuEntry::Remove);
    }
    entries
}

pub fn can_react(state: &DisplayState, message: &Message) -> bool {
    state.is_reaction_enabled_in_channel && !state.disabled && is_sent(message)
}

fn has_reacted(message: &Message, user_id: &str, reaction_key: &str) -> bool {
    message
        .reactions
        .iter()
        .any(|r| r.key == reaction_key && r.user_ids.iter().any(|id| id == user_id))
}

/// Performs a menu or reaction pick. Returns whether an action was emitted;
/// entries the message does not offer emit nothing.
pub fn dispatch_menu_action<S: ActionSink + ?Sized>(
    input: &ResolveInput<'_>,
    action: &MenuAction,
    sink: &mut S,
) -> bool {
    let message = input.message;
    let state = resolve(input);

    let emitted = match action {
        MenuAction::Entry(entry) => {
            if !menu_entries(&state, message, input.reply).contains(entry) {
                debug!(message_id = message.message_id, ?entry, "menu entry not offered");
                return false;
            }
            match entry {
                MenuEntry::Resend => MessageAction::Resend {
                    message: message.clone(),
                },
                MenuEntry::Delete => MessageAction::Delete {
                    message: message.clone(),
                },
                MenuEntry::QuoteReply => MessageAction::SetQuoteTarget {
                    message: message.clone(),
                },
                MenuEntry::ReplyInThread => {
                    return dispatch_reply_click(
                        ClickOrigin::MenuReplyAction,
                        input.reply,
                        message,
                        sink,
                    );
                }
                MenuEntry::Edit => MessageAction::ShowEdit(true),
                MenuEntry::Remove => MessageAction::ShowRemove(true),
            }
        }
        MenuAction::ToggleReaction { reaction_key } => {
            if !can_react(&state, message) {
                debug!(message_id = message.message_id, "reactions unavailable");
                return false;
            }
            MessageAction::ToggleReaction {
                message: message.clone(),
                reaction_key: reaction_key.clone(),
                is_reacted: has_reacted(message, &input.viewer.user_id, reaction_key),
            }
        }
    };
    sink.emit(emitted);
    true
}

/// Forwards a body renderer event. The file viewer only exists for file
/// messages; admin notices have no body renderer at all.
pub fn dispatch_body_event<S: ActionSink + ?Sized>(
    message: &Message,
    kind: MessageKind,
    event: BodyEvent,
    sink: &mut S,
) -> bool {
    let action = match event {
        BodyEvent::ShowFileViewer(open) => match kind {
            MessageKind::File { .. } | MessageKind::MultipleFiles => {
                MessageAction::ShowFileViewer(open)
            }
            _ => return false,
        },
        BodyEvent::HeightChanged if kind.is_admin() => return false,
        BodyEvent::HeightChanged => MessageAction::HeightChanged,
    };
    debug!(message_id = message.message_id, ?event, "body event");
    sink.emit(action);
    true
}
