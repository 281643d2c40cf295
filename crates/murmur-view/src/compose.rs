//! The composition shell: lays one message out as three slots (profile,
//! content column, menu) and hands the pluggable parts to renderers.
//!
//! Renderers are anything implementing [`ProfileRenderer`], [`HeaderRenderer`]
//! or [`BodyRenderer`]; closures and plain functions taking the matching
//! props struct qualify, and their output type is up to the caller.

use std::collections::HashMap;

use murmur_types::{
    Channel, EmojiContainer, Message, MessagePayload, ParentMessage, Reaction, ReplyType,
    SendingStatus, ThreadInfo, ViewerContext,
};
use serde::Serialize;

use crate::classify::{MessageKind, classify};
use crate::interaction::InteractionState;
use crate::menu::{
    BodyEvent, MenuAction, MenuEntry, can_react, dispatch_body_event, dispatch_menu_action,
    menu_entries,
};
use crate::resolve::{DisplayState, ReactionLayout, ResolveInput, Side, TimestampSlot, resolve};
use crate::router::{ClickOrigin, dispatch_reply_click};
use crate::sink::ActionSink;
use crate::timestamp::TimestampFormat;

/// Everything the shell needs besides the renderers.
#[derive(Debug, Clone, Copy)]
pub struct ComposeContext<'a> {
    pub input: ResolveInput<'a>,
    pub emoji_container: &'a EmojiContainer,
    pub timestamp: &'a TimestampFormat,
}

impl ComposeContext<'_> {
    /// Route a reply-related click on this message. Admin notices have no
    /// reply affordances, so nothing is emitted for them.
    pub fn click<S: ActionSink + ?Sized>(&self, origin: ClickOrigin, sink: &mut S) -> bool {
        if self.input.message.is_admin() {
            return false;
        }
        dispatch_reply_click(origin, self.input.reply, self.input.message, sink)
    }

    /// Perform an entry picked on the desktop or mobile menu, or a reaction
    /// toggled from the reaction menu or bar.
    pub fn menu_action<S: ActionSink + ?Sized>(&self, action: &MenuAction, sink: &mut S) -> bool {
        dispatch_menu_action(&self.input, action, sink)
    }

    /// Forward an event raised by the body renderer.
    pub fn body_event<S: ActionSink + ?Sized>(&self, event: BodyEvent, sink: &mut S) -> bool {
        let message = self.input.message;
        dispatch_body_event(message, classify(message), event, sink)
    }
}

pub struct ProfileProps<'a> {
    pub message: &'a Message,
    pub channel: Option<&'a Channel>,
    pub viewer: &'a ViewerContext,
    pub state: &'a DisplayState,
    pub interaction: &'a InteractionState,
}

pub struct HeaderProps<'a> {
    pub message: &'a Message,
    pub channel: Option<&'a Channel>,
    pub nicknames: &'a HashMap<String, String>,
}

pub struct BodyProps<'a> {
    pub message: &'a Message,
    pub channel: Option<&'a Channel>,
    pub state: &'a DisplayState,
    pub mouse_hover: bool,
}

pub trait ProfileRenderer {
    type Output;
    fn render_profile(&self, props: &ProfileProps<'_>) -> Self::Output;
}

pub trait HeaderRenderer {
    type Output;
    fn render_header(&self, props: &HeaderProps<'_>) -> Self::Output;
}

pub trait BodyRenderer {
    type Output;
    fn render_body(&self, props: &BodyProps<'_>) -> Self::Output;
}

impl<F, O> ProfileRenderer for F
where
    F: Fn(&ProfileProps<'_>) -> O,
{
    type Output = O;
    fn render_profile(&self, props: &ProfileProps<'_>) -> O {
        self(props)
    }
}

impl<F, O> HeaderRenderer for F
where
    F: Fn(&HeaderProps<'_>) -> O,
{
    type Output = O;
    fn render_header(&self, props: &HeaderProps<'_>) -> O {
        self(props)
    }
}

impl<F, O> BodyRenderer for F
where
    F: Fn(&BodyProps<'_>) -> O,
{
    type Output = O;
    fn render_body(&self, props: &BodyProps<'_>) -> O {
        self(props)
    }
}

// -- Default renderers --

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileFragment {
    /// Avatar is drawn once per chain, beside its last message.
    pub avatar: Option<Avatar>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Avatar {
    pub user_id: String,
    pub profile_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderFragment {
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "body", rename_all = "snake_case")]
pub enum BodyFragment {
    Text { text: String },
    LinkPreview { text: String, url: String, title: Option<String> },
    Thumbnail { url: String, mime_type: String },
    File { name: String, url: String },
    FileGrid { urls: Vec<String> },
    Notice { text: String },
}

pub fn default_profile(props: &ProfileProps<'_>) -> ProfileFragment {
    let visible = !props.state.is_by_me && !props.state.chain_bottom;
    let avatar = props
        .message
        .sender
        .as_ref()
        .filter(|_| visible)
        .map(|sender| Avatar {
            user_id: sender.user_id.clone(),
            profile_url: sender.profile_url.clone(),
        });
    ProfileFragment { avatar }
}

pub fn default_header(props: &HeaderProps<'_>) -> HeaderFragment {
    let display_name = props
        .message
        .sender
        .as_ref()
        .map(|sender| {
            props
                .nicknames
                .get(&sender.user_id)
                .cloned()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| sender.nickname.clone())
        })
        .unwrap_or_default();
    HeaderFragment { display_name }
}

pub fn default_body(props: &BodyProps<'_>) -> BodyFragment {
    match (&props.message.payload, props.state.kind) {
        (MessagePayload::User { text, og_meta_data }, MessageKind::User { og_preview: true }) => {
            let og = og_meta_data.as_ref();
            BodyFragment::LinkPreview {
                text: text.clone(),
                url: og.and_then(|og| og.url.clone()).unwrap_or_default(),
                title: og.and_then(|og| og.title.clone()),
            }
        }
        (MessagePayload::User { text, .. }, _) => BodyFragment::Text { text: text.clone() },
        (MessagePayload::File { url, mime_type, .. }, MessageKind::File { thumbnail: true }) => {
            BodyFragment::Thumbnail {
                url: url.clone(),
                mime_type: mime_type.clone(),
            }
        }
        (MessagePayload::File { url, name, .. }, _) => BodyFragment::File {
            name: name.clone(),
            url: url.clone(),
        },
        (MessagePayload::MultipleFiles { files }, _) => BodyFragment::FileGrid {
            urls: files.iter().map(|f| f.url.clone()).collect(),
        },
        (MessagePayload::Admin { text }, _) => BodyFragment::Notice { text: text.clone() },
    }
}

pub type ProfileFn = for<'a, 'b> fn(&'a ProfileProps<'b>) -> ProfileFragment;
pub type HeaderFn = for<'a, 'b> fn(&'a HeaderProps<'b>) -> HeaderFragment;
pub type BodyFn = for<'a, 'b> fn(&'a BodyProps<'b>) -> BodyFragment;

// -- Descriptor --

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum Composed<'a, P, H, B> {
    /// Admin messages render as a bare notice; nothing else applies.
    AdminNotice { text: &'a str },
    Content(ContentLayout<'a, P, H, B>),
}

impl<'a, P, H, B> Composed<'a, P, H, B> {
    pub fn content(&self) -> Option<&ContentLayout<'a, P, H, B>> {
        match self {
            Composed::Content(layout) => Some(layout),
            Composed::AdminNotice { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentLayout<'a, P, H, B> {
    pub class_names: Vec<&'static str>,
    pub state: DisplayState,
    pub interaction: InteractionState,
    /// left
    pub profile: P,
    /// middle
    pub middle: MiddleColumn<'a, H, B>,
    /// right
    pub menu: Option<DesktopMenu>,
    pub mobile_menu: Option<MobileMenu>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MiddleColumn<'a, H, B> {
    /// Long-press handlers are attached to this column on mobile only.
    pub long_press: bool,
    pub header: Option<H>,
    pub quote: Option<QuoteBlock<'a>>,
    pub status: Option<StatusIndicator>,
    pub body: B,
    pub reactions: Option<ReactionBar<'a>>,
    pub time_label: Option<TimeLabel>,
    pub thread_replies: Option<&'a ThreadInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuoteBlock<'a> {
    pub parent: &'a ParentMessage,
    pub is_by_me: bool,
    /// Older than the channel's retention offset; shown but marked.
    pub is_unavailable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusIndicator {
    pub side: Side,
    pub sending_status: Option<SendingStatus>,
    pub hover_class: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeLabel {
    pub side: Side,
    pub text: String,
    pub locale: String,
    pub hover_class: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReactionBar<'a> {
    pub layout: ReactionLayout,
    pub mouse_hover: bool,
    pub reactions: &'a [Reaction],
    pub emoji_container: &'a EmojiContainer,
    pub nicknames: &'a HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DesktopMenu {
    pub entries: Vec<MenuEntry>,
    pub reaction_menu: bool,
    pub reply_type: ReplyType,
    pub disabled: bool,
    pub hover_class: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MobileMenu {
    pub entries: Vec<MenuEntry>,
    pub is_reaction_enabled: bool,
    pub is_by_me: bool,
    pub reply_type: ReplyType,
    pub disabled: bool,
}

// -- Shell --

pub struct MessageContent<P, H, B> {
    profile: P,
    header: H,
    body: B,
}

impl MessageContent<ProfileFn, HeaderFn, BodyFn> {
    pub fn new() -> Self {
        Self {
            profile: default_profile,
            header: default_header,
            body: default_body,
        }
    }
}

impl Default for MessageContent<ProfileFn, HeaderFn, BodyFn> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, H, B> MessageContent<P, H, B> {
    pub fn render_sender_profile<R: ProfileRenderer>(self, profile: R) -> MessageContent<R, H, B> {
        MessageContent {
            profile,
            header: self.header,
            body: self.body,
        }
    }

    pub fn render_message_header<R: HeaderRenderer>(self, header: R) -> MessageContent<P, R, B> {
        MessageContent {
            profile: self.profile,
            header,
            body: self.body,
        }
    }

    pub fn render_message_body<R: BodyRenderer>(self, body: R) -> MessageContent<P, H, R> {
        MessageContent {
            profile: self.profile,
            header: self.header,
            body,
        }
    }
}

impl<P, H, B> MessageContent<P, H, B>
where
    P: ProfileRenderer,
    H: HeaderRenderer,
    B: BodyRenderer,
{
    pub fn compose<'a>(
        &self,
        ctx: &ComposeContext<'a>,
        interaction: &InteractionState,
    ) -> Composed<'a, P::Output, H::Output, B::Output> {
        let input = &ctx.input;
        let message: &'a Message = input.message;
        if message.is_admin() {
            return Composed::AdminNotice {
                text: message_text(message),
            };
        }

        let state = resolve(input);
        let hover_class = interaction.hover_class();

        let profile = self.profile.render_profile(&ProfileProps {
            message,
            channel: input.channel,
            viewer: input.viewer,
            state: &state,
            interaction,
        });

        let header = state.show_header.then(|| {
            self.header.render_header(&HeaderProps {
                message,
                channel: input.channel,
                nicknames: &input.viewer.nicknames,
            })
        });

        let quote = message
            .parent_message
            .as_ref()
            .filter(|_| state.use_replying)
            .map(|parent| QuoteBlock {
                parent,
                is_by_me: state.is_by_me,
                is_unavailable: state.is_parent_unavailable,
            });

        let (status, time_label) = match state.timestamp {
            Some(TimestampSlot::Status { side }) => (
                Some(StatusIndicator {
                    side,
                    sending_status: message.sending_status,
                    hover_class,
                }),
                None,
            ),
            Some(TimestampSlot::Time { side }) => (
                None,
                Some(TimeLabel {
                    side,
                    text: ctx.timestamp.format(message.created_at),
                    locale: ctx.timestamp.locale.clone(),
                    hover_class,
                }),
            ),
            None => (None, None),
        };

        let body = self.body.render_body(&BodyProps {
            message,
            channel: input.channel,
            state: &state,
            mouse_hover: interaction.mouse_hover,
        });

        let reactions = state.show_reactions.then(|| ReactionBar {
            layout: state.reaction_layout,
            mouse_hover: interaction.mouse_hover,
            reactions: &message.reactions,
            emoji_container: ctx.emoji_container,
            nicknames: &input.viewer.nicknames,
        });

        let thread_replies = message
            .thread_info
            .as_ref()
            .filter(|_| state.display_thread_replies);

        let entries = menu_entries(&state, message, input.reply);
        let menu = state.show_desktop_menu.then(|| DesktopMenu {
            entries: entries.clone(),
            reaction_menu: state.show_reaction_menu,
            reply_type: input.reply.reply_type,
            disabled: state.disabled,
            hover_class,
        });

        let mobile_menu = (interaction.show_mobile_menu && message.is_sendable()).then(|| {
            MobileMenu {
                entries,
                is_reaction_enabled: can_react(&state, message),
                is_by_me: state.is_by_me,
                reply_type: input.reply.reply_type,
                disabled: state.disabled,
            }
        });

        Composed::Content(ContentLayout {
            class_names: state.style_hooks(interaction).class_names(),
            state,
            interaction: *interaction,
            profile,
            middle: MiddleColumn {
                long_press: state.is_mobile,
                header,
                quote,
                status,
                body,
                reactions,
                time_label,
                thread_replies,
            },
            menu,
            mobile_menu,
        })
    }
}

fn message_text(message: &Message) -> &str {
    match &message.payload {
        MessagePayload::Admin { text } | MessagePayload::User { text, .. } => text.as_str(),
        MessagePayload::File { name, .. } => name.as_str(),
        MessagePayload::MultipleFiles { .. } => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmur_types::{DeviceClass, ReplyConfiguration, Sender, ThreadReplySelectType};

    use crate::resolve::DisplayFlags;

    fn message(sender: &str) -> Message {
        Message {
            message_id: 1,
            created_at: 1_709_305_620_000,
            sender: Some(Sender {
                user_id: sender.into(),
                nickname: "Nick".into(),
                profile_url: None,
            }),
            sending_status: Some(SendingStatus::Succeeded),
            is_admin_message: false,
            parent_message_id: None,
            parent_message: None,
            thread_info: None,
            reactions: vec![],
            payload: MessagePayload::User {
                text: "hello".into(),
                og_meta_data: None,
            },
        }
    }

    fn ctx<'a>(
        message: &'a Message,
        channel: &'a Channel,
        viewer: &'a ViewerContext,
        emoji: &'a EmojiContainer,
        timestamp: &'a TimestampFormat,
    ) -> ComposeContext<'a> {
        ComposeContext {
            input: ResolveInput {
                message,
                channel: Some(channel),
                viewer,
                reply: ReplyConfiguration::new(ReplyType::QuoteReply, ThreadReplySelectType::Thread),
                flags: DisplayFlags {
                    is_reaction_enabled: true,
                    ..Default::default()
                },
            },
            emoji_container: emoji,
            timestamp,
        }
    }

    #[test]
    fn incoming_message_gets_header_time_and_menu() {
        let mut viewer = ViewerContext {
            user_id: "me".into(),
            ..Default::default()
        };
        viewer.nicknames.insert("bob".into(), "Bobby".into());
        let msg = message("bob");
        let channel = Channel::default();
        let emoji = EmojiContainer::default();
        let ts = TimestampFormat::default();
        let c = ctx(&msg, &channel, &viewer, &emoji, &ts);

        let composed = MessageContent::new().compose(&c, &InteractionState::new(viewer.device));
        let layout = composed.content().unwrap();
        assert_eq!(
            layout.middle.header,
            Some(HeaderFragment {
                display_name: "Bobby".into()
            })
        );
        assert_eq!(layout.middle.time_label.as_ref().unwrap().text, "3:07 PM");
        assert!(layout.middle.status.is_none());
        assert!(layout.menu.as_ref().unwrap().reaction_menu);
        assert!(layout.profile.avatar.is_some());
        assert!(!layout.middle.long_press);
        assert_eq!(layout.class_names, vec!["incoming", "use-reactions"]);
    }

    #[test]
    fn outgoing_message_shows_status_and_no_menu() {
        let viewer = ViewerContext {
            user_id: "me".into(),
            ..Default::default()
        };
        let msg = message("me");
        let channel = Channel::default();
        let emoji = EmojiContainer::default();
        let ts = TimestampFormat::default();
        let c = ctx(&msg, &channel, &viewer, &emoji, &ts);

        let composed = MessageContent::new().compose(&c, &InteractionState::new(viewer.device));
        let layout = composed.content().unwrap();
        assert!(layout.middle.header.is_none());
        assert!(layout.middle.time_label.is_none());
        assert_eq!(layout.middle.status.as_ref().unwrap().side, Side::Left);
        assert!(layout.menu.is_none());
        assert!(layout.profile.avatar.is_none());
    }

    #[test]
    fn custom_renderers_replace_defaults() {
        let viewer = ViewerContext {
            user_id: "me".into(),
            ..Default::default()
        };
        let msg = message("bob");
        let channel = Channel::default();
        let emoji = EmojiContainer::default();
        let ts = TimestampFormat::default();
        let c = ctx(&msg, &channel, &viewer, &emoji, &ts);

        fn mine(p: &ProfileProps<'_>) -> bool {
            p.state.is_by_me
        }
        fn sender_len(p: &HeaderProps<'_>) -> Option<usize> {
            p.message.sender_id().map(str::len)
        }
        fn label(p: &BodyProps<'_>) -> String {
            format!("body#{}", p.message.message_id)
        }

        let content = MessageContent::new()
            .render_sender_profile(mine)
            .render_message_header(sender_len)
            .render_message_body(label);

        let composed = content.compose(&c, &InteractionState::new(viewer.device));
        let layout = composed.content().unwrap();
        assert!(!layout.profile);
        assert_eq!(layout.middle.header, Some(Some(3)));
        assert_eq!(layout.middle.body, "body#1");
    }

    #[test]
    fn mobile_menu_follows_interaction_state() {
        let viewer = ViewerContext {
            user_id: "me".into(),
            device: DeviceClass::Mobile,
            ..Default::default()
        };
        let msg = message("bob");
        let channel = Channel::default();
        let emoji = EmojiContainer::default();
        let ts = TimestampFormat::default();
        let c = ctx(&msg, &channel, &viewer, &emoji, &ts);

        let mut interaction = InteractionState::new(DeviceClass::Mobile);
        let content = MessageContent::new();
        let composed = content.compose(&c, &interaction);
        assert!(composed.content().unwrap().mobile_menu.is_none());
        assert!(composed.content().unwrap().middle.long_press);

        interaction.update(crate::Interaction::Gesture(crate::GestureAction::LongPress));
        let composed = content.compose(&c, &interaction);
        let layout = composed.content().unwrap();
        assert!(layout.menu.is_none());
        assert!(layout.mobile_menu.as_ref().unwrap().is_reaction_enabled);
    }

    #[test]
    fn menus_list_entries_and_perform_them() {
        let viewer = ViewerContext {
            user_id: "me".into(),
            ..Default::default()
        };
        let msg = message("bob");
        let channel = Channel::default();
        let emoji = EmojiContainer::default();
        let ts = TimestampFormat::default();
        let c = ctx(&msg, &channel, &viewer, &emoji, &ts);

        let composed = MessageContent::new().compose(&c, &InteractionState::new(viewer.device));
        let menu = composed.content().unwrap().menu.as_ref().unwrap();
        assert_eq!(menu.entries, vec![MenuEntry::QuoteReply]);

        let mut emitted = Vec::new();
        let mut sink = |a: murmur_types::MessageAction| emitted.push(a);
        assert!(c.menu_action(&MenuAction::Entry(MenuEntry::QuoteReply), &mut sink));
        assert!(!c.menu_action(&MenuAction::Entry(MenuEntry::Edit), &mut sink));
        assert!(c.menu_action(
            &MenuAction::ToggleReaction {
                reaction_key: "smile".into()
            },
            &mut sink
        ));
        assert!(c.body_event(BodyEvent::HeightChanged, &mut sink));
        assert!(!c.body_event(BodyEvent::ShowFileViewer(true), &mut sink));
        assert_eq!(
            emitted,
            vec![
                murmur_types::MessageAction::SetQuoteTarget {
                    message: msg.clone()
                },
                murmur_types::MessageAction::ToggleReaction {
                    message: msg.clone(),
                    reaction_key: "smile".into(),
                    is_reacted: false,
                },
                murmur_types::MessageAction::HeightChanged,
            ]
        );
    }

    #[test]
    fn admin_clicks_emit_nothing() {
        let viewer = ViewerContext::default();
        let mut msg = message("bob");
        msg.payload = MessagePayload::Admin {
            text: "joined".into(),
        };
        let channel = Channel::default();
        let emoji = EmojiContainer::default();
        let ts = TimestampFormat::default();
        let c = ctx(&msg, &channel, &viewer, &emoji, &ts);

        let mut emitted = Vec::new();
        let mut sink = |a: murmur_types::MessageAction| emitted.push(a);
        assert!(!c.click(ClickOrigin::ThreadReplies, &mut sink));
        assert!(!c.menu_action(&MenuAction::Entry(MenuEntry::QuoteReply), &mut sink));
        assert!(!c.body_event(BodyEvent::HeightChanged, &mut sink));
        assert!(emitted.is_empty());
        assert!(matches!(
            MessageContent::new().compose(&c, &InteractionState::default()),
            Composed::AdminNotice { text: "joined" }
        ));
    }
}
