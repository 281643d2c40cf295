use murmur_types::MessageAction;
use tokio::sync::mpsc;

/// Receives the actions a message view asks the host to perform.
pub trait ActionSink {
    fn emit(&mut self, action: MessageAction);
}

impl<F> ActionSink for F
where
    F: FnMut(MessageAction),
{
    fn emit(&mut self, action: MessageAction) {
        self(action)
    }
}

/// Forwards actions to an async consumer over an unbounded channel.
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<MessageAction>,
}

impl ChannelSink {
    /// Create a sink and the receiver the host drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<MessageAction>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ActionSink for ChannelSink {
    fn emit(&mut self, action: MessageAction) {
        // Receiver dropped means the view was torn down; nothing left to notify.
        let _ = self.tx.send(action);
    }
}
