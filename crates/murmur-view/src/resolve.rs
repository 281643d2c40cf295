//! Display-state resolution: a pure function from an explicit input struct to
//! the set of decisions every renderer of one message shares.

use murmur_types::{Channel, Message, ReplyConfiguration, ReplyType, ViewerContext};
use serde::Serialize;
use tracing::debug;

use crate::classify::{MessageKind, classify};
use crate::interaction::InteractionState;

/// Position of a message inside a run of consecutive messages from the same
/// sender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainPosition {
    #[default]
    Single,
    First,
    Middle,
    Last,
}

impl ChainPosition {
    pub fn from_neighbors(joins_previous: bool, joins_next: bool) -> Self {
        match (joins_previous, joins_next) {
            (false, false) => Self::Single,
            (false, true) => Self::First,
            (true, true) => Self::Middle,
            (true, false) => Self::Last,
        }
    }

    /// Chained to the message above, so the sender header is already shown.
    pub fn chain_top(self) -> bool {
        matches!(self, Self::Middle | Self::Last)
    }

    /// Chained to the message below, so the timestamp is shown further down.
    pub fn chain_bottom(self) -> bool {
        matches!(self, Self::First | Self::Middle)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayFlags {
    pub is_reaction_enabled: bool,
    pub disable_quote_message: bool,
    pub chain_top: bool,
    pub chain_bottom: bool,
    pub disabled: bool,
}

impl DisplayFlags {
    pub fn with_chain(mut self, position: ChainPosition) -> Self {
        self.chain_top = position.chain_top();
        self.chain_bottom = position.chain_bottom();
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResolveInput<'a> {
    pub message: &'a Message,
    pub channel: Option<&'a Channel>,
    pub viewer: &'a ViewerContext,
    pub reply: ReplyConfiguration,
    pub flags: DisplayFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// What sits beside the body when the message closes its chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimestampSlot {
    /// Delivery status indicator for my own messages
    Status { side: Side },
    /// Formatted creation time for everybody else's
    Time { side: Side },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionLayout {
    Grid,
    Neutral,
    Primary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayState {
    pub kind: MessageKind,
    pub is_by_me: bool,
    pub is_admin: bool,
    pub is_mobile: bool,
    pub chain_top: bool,
    pub chain_bottom: bool,
    pub disabled: bool,
    pub is_reaction_enabled_in_channel: bool,
    pub use_replying: bool,
    pub is_parent_unavailable: bool,
    pub display_thread_replies: bool,
    pub show_header: bool,
    pub show_reactions: bool,
    pub reaction_layout: ReactionLayout,
    pub timestamp: Option<TimestampSlot>,
    pub show_desktop_menu: bool,
    pub show_reaction_menu: bool,
}

impl DisplayState {
    /// State for a notice-only render: every per-message affordance is off.
    fn admin_notice(input: &ResolveInput<'_>) -> Self {
        Self {
            kind: MessageKind::Admin,
            is_by_me: false,
            is_admin: true,
            is_mobile: input.viewer.device.is_mobile(),
            chain_top: input.flags.chain_top,
            chain_bottom: input.flags.chain_bottom,
            disabled: input.flags.disabled,
            is_reaction_enabled_in_channel: false,
            use_replying: false,
            is_parent_unavailable: false,
            display_thread_replies: false,
            show_header: false,
            show_reactions: false,
            reaction_layout: ReactionLayout::Neutral,
            timestamp: None,
            show_desktop_menu: false,
            show_reaction_menu: false,
        }
    }

    /// Class hooks for this state; hover comes from the message's
    /// interaction flags since it is not part of the resolved state.
    pub fn style_hooks(&self, interaction: &InteractionState) -> StyleHooks {
        StyleHooks {
            direction: if self.is_by_me { "outgoing" } else { "incoming" },
            chain_top: self.chain_top.then_some("chain-top"),
            use_reactions: self.is_reaction_enabled_in_channel.then_some("use-reactions"),
            use_quote: self.use_replying.then_some("use-quote"),
            mouse_hover: interaction.hover_class(),
        }
    }
}

/// Class-name hooks for stylesheet-driven renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleHooks {
    pub direction: &'static str,
    pub chain_top: Option<&'static str>,
    pub use_reactions: Option<&'static str>,
    pub use_quote: Option<&'static str>,
    pub mouse_hover: Option<&'static str>,
}

impl StyleHooks {
    pub fn class_names(&self) -> Vec<&'static str> {
        std::iter::once(self.direction)
            .chain(self.chain_top)
            .chain(self.use_reactions)
            .chain(self.use_quote)
            .chain(self.mouse_hover)
            .collect()
    }
}

/// Messages that have not round-tripped through the server belong to the
/// local sender whatever the sender field says.
pub fn is_by_me(message: &Message, viewer: &ViewerContext) -> bool {
    message.sender_id() == Some(viewer.user_id.as_str())
        || message.sending_status.is_some_and(|s| s.is_local_only())
}

pub fn resolve(input: &ResolveInput<'_>) -> DisplayState {
    let message = input.message;
    let flags = input.flags;
    let kind = classify(message);
    if kind.is_admin() {
        return DisplayState::admin_notice(input);
    }

    let is_by_me = is_by_me(message, input.viewer);
    let is_mobile = input.viewer.device.is_mobile();

    let is_ephemeral = input.channel.is_some_and(|c| c.is_ephemeral);
    let is_reaction_enabled_in_channel =
        flags.is_reaction_enabled && input.channel.is_some() && !is_ephemeral;

    let use_replying = input.reply.allows_replying()
        && message.parent_message_id.is_some()
        && message.parent_message.is_some()
        && !flags.disable_quote_message;

    let offset = input.channel.map_or(0, |c| c.message_offset_timestamp);
    let parent_created_at = message.parent_message.as_ref().map_or(0, |p| p.created_at);
    let is_parent_unavailable = offset > parent_created_at;

    let display_thread_replies =
        input.reply.reply_type == ReplyType::Thread && message.reply_count() > 0;

    let side = if is_by_me { Side::Left } else { Side::Right };
    let timestamp = (!flags.chain_bottom).then_some(if is_by_me {
        TimestampSlot::Status { side }
    } else {
        TimestampSlot::Time { side }
    });

    let reaction_layout = reaction_layout(kind, is_by_me);

    let state = DisplayState {
        kind,
        is_by_me,
        is_admin: false,
        is_mobile,
        chain_top: flags.chain_top,
        chain_bottom: flags.chain_bottom,
        disabled: flags.disabled,
        is_reaction_enabled_in_channel,
        use_replying,
        is_parent_unavailable,
        display_thread_replies,
        show_header: !is_by_me && !flags.chain_top && !use_replying,
        show_reactions: is_reaction_enabled_in_channel && !message.reactions.is_empty(),
        reaction_layout,
        timestamp,
        show_desktop_menu: !is_by_me && !is_mobile,
        show_reaction_menu: !is_by_me && !is_mobile && is_reaction_enabled_in_channel,
    };
    debug!(
        message_id = message.message_id,
        is_by_me, use_replying, display_thread_replies, "resolved display state"
    );
    state
}

fn reaction_layout(kind: MessageKind, is_by_me: bool) -> ReactionLayout {
    if kind == MessageKind::MultipleFiles {
        ReactionLayout::Grid
    } else if !is_by_me || kind.is_media_like() {
        ReactionLayout::Neutral
    } else {
        ReactionLayout::Primary
    }
}
