//! Presentation core for a single chat message.
//!
//! Data flows one way: the host's message/channel/viewer inputs are
//! classified, resolved into a [`DisplayState`], and composed into a
//! descriptor that pluggable renderers turn into output. Interactions flow
//! back through the [`router`] and [`menu`] into an [`ActionSink`].

pub mod classify;
pub mod compose;
pub mod config;
pub mod gesture;
pub mod interaction;
pub mod menu;
pub mod resolve;
pub mod router;
pub mod sink;
pub mod timestamp;

pub use classify::{MessageKind, classify};
pub use compose::{ComposeContext, Composed, MessageContent};
pub use config::{ConfigError, ViewConfig};
pub use gesture::{GestureAction, LongPressAdapter, LongPressConfig};
pub use interaction::{Interaction, InteractionState};
pub use menu::{BodyEvent, MenuAction, MenuEntry};
pub use resolve::{ChainPosition, DisplayFlags, DisplayState, ResolveInput, resolve};
pub use router::{ClickOrigin, ReplyRoute, route_reply_click};
pub use sink::{ActionSink, ChannelSink};
pub use timestamp::{HourCycle, TimestampFormat};
