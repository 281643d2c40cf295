//! Shared data model for the murmur message view: the message/channel/viewer
//! inputs fed in by the host, and the actions handed back to it.

pub mod actions;
pub mod models;

pub use actions::MessageAction;
pub use models::*;
