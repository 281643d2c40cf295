use std::time::Duration;

use murmur_types::{Channel, DeviceClass, EmojiContainer, Message, MessageAction, ViewerContext};
use murmur_view::gesture::PointerEvent;
use murmur_view::{
    BodyEvent, ChainPosition, ClickOrigin, ComposeContext, GestureAction, Interaction,
    InteractionState, LongPressAdapter, LongPressConfig, MenuAction, MessageContent, ResolveInput,
    ViewConfig,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One message in its surroundings, plus the interactions to replay on it.
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub message: Message,
    #[serde(default)]
    pub channel: Option<Channel>,
    pub viewer: ViewerContext,
    #[serde(default)]
    pub emoji_container: EmojiContainer,
    /// Same sender as the message above
    #[serde(default)]
    pub joins_previous: bool,
    /// Same sender as the message below
    #[serde(default)]
    pub joins_next: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub hover: bool,
    /// Hold a touch on the message for this many milliseconds.
    #[serde(default)]
    pub press_ms: Option<u64>,
    #[serde(default)]
    pub clicks: Vec<ClickOrigin>,
    #[serde(default)]
    pub menu: Vec<MenuAction>,
    #[serde(default)]
    pub body_events: Vec<BodyEvent>,
}

#[derive(Serialize)]
struct Preview<D> {
    descriptor: D,
    gestures: Vec<GestureAction>,
    actions: Vec<MessageAction>,
}

/// Touch down, hold, release, and collect what the adapter reported.
async fn replay_press(
    config: LongPressConfig,
    device: DeviceClass,
    hold: Duration,
) -> Vec<GestureAction> {
    let (mut adapter, mut rx) = LongPressAdapter::new(config, device);
    adapter.handle(PointerEvent::TouchStart);
    tokio::time::sleep(hold).await;
    adapter.handle(PointerEvent::TouchEnd);
    // Dropping the adapter cancels its timer, which closes the channel.
    drop(adapter);

    let mut gestures = Vec::new();
    while let Some(gesture) = rx.recv().await {
        gestures.push(gesture);
    }
    gestures
}

pub async fn preview(
    fixture: &Fixture,
    config: &ViewConfig,
) -> serde_json::Result<serde_json::Value> {
    let chain = ChainPosition::from_neighbors(fixture.joins_previous, fixture.joins_next);
    let ctx = ComposeContext {
        input: ResolveInput {
            message: &fixture.message,
            channel: fixture.channel.as_ref(),
            viewer: &fixture.viewer,
            reply: config.reply,
            flags: config.display_flags(chain, fixture.disabled),
        },
        emoji_container: &fixture.emoji_container,
        timestamp: &config.timestamp,
    };

    let mut interaction = InteractionState::new(fixture.viewer.device);
    if fixture.hover {
        interaction.update(Interaction::MouseOver);
    }
    let gestures = match fixture.press_ms {
        Some(ms) => {
            replay_press(config.long_press, fixture.viewer.device, Duration::from_millis(ms)).await
        }
        None => Vec::new(),
    };
    for gesture in &gestures {
        interaction.update(Interaction::Gesture(*gesture));
    }

    let mut actions = Vec::new();
    let mut sink = |action: MessageAction| actions.push(action);
    for origin in &fixture.clicks {
        ctx.click(*origin, &mut sink);
    }
    for action in &fixture.menu {
        ctx.menu_action(action, &mut sink);
    }
    for event in &fixture.body_events {
        ctx.body_event(*event, &mut sink);
    }
    info!(
        message_id = fixture.message.message_id,
        gestures = gestures.len(),
        emitted = actions.len(),
        "composed preview"
    );

    let descriptor = MessageContent::new().compose(&ctx, &interaction);
    serde_json::to_value(Preview {
        descriptor,
        gestures,
        actions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmur_types::{ReplyConfiguration, ReplyType, ThreadReplySelectType};

    const FIXTURE: &str = r#"{
        "message": {
            "message_id": 7,
            "created_at": 1709305620000,
            "sender": { "user_id": "bob", "nickname": "Bob" },
            "sending_status": "succeeded",
            "message_type": "user",
            "text": "see above",
            "parent_message_id": 42,
            "parent_message": { "message_id": 42, "created_at": 1000 }
        },
        "channel": { "url": "general", "message_offset_timestamp": 2000 },
        "viewer": { "user_id": "alice", "nicknames": { "bob": "Bobby" } },
        "clicks": ["quote_block", "menu_reply_action"]
    }"#;

    fn mobile_fixture(press_ms: u64) -> Fixture {
        let mut fixture: Fixture = serde_json::from_str(FIXTURE).unwrap();
        fixture.viewer.device = DeviceClass::Mobile;
        fixture.clicks.clear();
        fixture.press_ms = Some(press_ms);
        fixture
    }

    #[tokio::test]
    async fn fixture_renders_quote_and_routes_clicks() {
        let fixture: Fixture = serde_json::from_str(FIXTURE).unwrap();
        let config = ViewConfig {
            reply: ReplyConfiguration::new(ReplyType::Thread, ThreadReplySelectType::Parent),
            ..Default::default()
        };
        let out = preview(&fixture, &config).await.unwrap();

        let descriptor = &out["descriptor"];
        assert_eq!(descriptor["layout"], "content");
        assert_eq!(descriptor["middle"]["quote"]["is_unavailable"], true);
        assert!(descriptor["middle"]["header"].is_null());
        assert_eq!(descriptor["middle"]["time_label"]["text"], "3:07 PM");
        assert_eq!(descriptor["menu"]["entries"], serde_json::json!(["reply_in_thread"]));

        let actions = out["actions"].as_array().unwrap();
        assert_eq!(actions.len(), 2);
        for action in actions {
            assert_eq!(action["type"], "ScrollToMessage");
            assert_eq!(action["data"]["message_id"], 42);
            assert_eq!(action["data"]["created_at"], 1000);
        }
    }

    #[tokio::test]
    async fn replies_off_routes_nothing() {
        let fixture: Fixture = serde_json::from_str(FIXTURE).unwrap();
        let out = preview(&fixture, &ViewConfig::default()).await.unwrap();
        assert_eq!(out["actions"], serde_json::json!([]));
        assert!(out["descriptor"]["middle"]["quote"].is_null());
    }

    #[tokio::test]
    async fn menu_and_body_events_replay() {
        let mut fixture: Fixture = serde_json::from_str(FIXTURE).unwrap();
        fixture.clicks.clear();
        fixture.menu = serde_json::from_str(
            r#"[{ "entry": "quote_reply" }, { "toggle_reaction": { "reaction_key": "smile" } }]"#,
        )
        .unwrap();
        fixture.body_events = serde_json::from_str(r#"["height_changed"]"#).unwrap();
        let config = ViewConfig {
            reply: ReplyConfiguration::new(ReplyType::QuoteReply, ThreadReplySelectType::Thread),
            is_reaction_enabled: true,
            ..Default::default()
        };
        let out = preview(&fixture, &config).await.unwrap();
        let kinds: Vec<_> = out["actions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["type"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(kinds, ["SetQuoteTarget", "ToggleReaction", "HeightChanged"]);
    }

    #[tokio::test(start_paused = true)]
    async fn held_press_opens_mobile_menu() {
        let out = preview(&mobile_fixture(400), &ViewConfig::default()).await.unwrap();
        assert_eq!(out["gestures"], serde_json::json!(["long_press"]));
        assert!(out["descriptor"]["mobile_menu"].is_object());
        assert_eq!(out["descriptor"]["middle"]["long_press"], true);
    }

    #[tokio::test(start_paused = true)]
    async fn short_press_is_a_tap() {
        let out = preview(&mobile_fixture(100), &ViewConfig::default()).await.unwrap();
        assert_eq!(out["gestures"], serde_json::json!(["click"]));
        assert!(out["descriptor"]["mobile_menu"].is_null());
    }

    #[tokio::test(start_paused = true)]
    async fn press_is_inert_on_desktop() {
        let mut fixture = mobile_fixture(400);
        fixture.viewer.device = DeviceClass::Desktop;
        let out = preview(&fixture, &ViewConfig::default()).await.unwrap();
        assert_eq!(out["gestures"], serde_json::json!([]));
        assert!(out["descriptor"]["mobile_menu"].is_null());
    }
}
