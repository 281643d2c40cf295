//! Long-press detection for touch-first devices.
//!
//! [`PressTracker`] is the state machine (IDLE -> PRESSING -> TRIGGERED);
//! [`LongPressAdapter`] drives it from pointer events and arms a cancellable
//! timer task per press.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use murmur_types::DeviceClass;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongPressConfig {
    /// How long a press must be held before it counts as a long press.
    pub delay: Duration,
    /// Suppress the platform's own touch handling (selection, context menu).
    pub should_prevent_default: bool,
}

impl Default for LongPressConfig {
    fn default() -> Self {
        LongPressConfig {
            delay: Duration::from_millis(300),
            should_prevent_default: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PressPhase {
    #[default]
    Idle,
    Pressing,
    Triggered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    MouseDown,
    TouchStart,
    MouseUp,
    TouchEnd,
    MouseLeave,
}

impl PointerEvent {
    fn is_start(self) -> bool {
        matches!(self, Self::MouseDown | Self::TouchStart)
    }

    fn is_touch(self) -> bool {
        matches!(self, Self::TouchStart | Self::TouchEnd)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureAction {
    Click,
    LongPress,
}

#[derive(Debug, Default)]
pub struct PressTracker {
    phase: PressPhase,
    /// Bumped on every press so a stale timer can't trigger a later press.
    generation: u64,
}

impl PressTracker {
    pub fn phase(&self) -> PressPhase {
        self.phase
    }

    /// Start a press. Returns the generation the timer must present to
    /// `fire`, or `None` when a press is already in progress.
    pub fn press(&mut self) -> Option<u64> {
        if self.phase != PressPhase::Idle {
            return None;
        }
        self.generation += 1;
        self.phase = PressPhase::Pressing;
        trace!(generation = self.generation, "press: idle -> pressing");
        Some(self.generation)
    }

    /// End the press (pointer up or leave). A press that never triggered is
    /// reported as a click.
    pub fn release(&mut self) -> Option<GestureAction> {
        let previous = std::mem::take(&mut self.phase);
        trace!(?previous, "release -> idle");
        match previous {
            PressPhase::Pressing => Some(GestureAction::Click),
            PressPhase::Idle | PressPhase::Triggered => None,
        }
    }

    /// Timer expiry for the given press.
    pub fn fire(&mut self, generation: u64) -> Option<GestureAction> {
        if self.phase != PressPhase::Pressing || generation != self.generation {
            return None;
        }
        self.phase = PressPhase::Triggered;
        trace!(generation, "timer: pressing -> triggered");
        Some(GestureAction::LongPress)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventResponse {
    pub prevent_default: bool,
}

/// Turns pointer events into click / long-press actions. Inert on non-mobile
/// devices: no timers, no actions.
pub struct LongPressAdapter {
    config: LongPressConfig,
    enabled: bool,
    tracker: Arc<Mutex<PressTracker>>,
    timer: Option<CancellationToken>,
    tx: mpsc::UnboundedSender<GestureAction>,
}

impl LongPressAdapter {
    pub fn new(
        config: LongPressConfig,
        device: DeviceClass,
    ) -> (Self, mpsc::UnboundedReceiver<GestureAction>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let adapter = Self {
            config,
            enabled: device.is_mobile(),
            tracker: Arc::new(Mutex::new(PressTracker::default())),
            timer: None,
            tx,
        };
        (adapter, rx)
    }

    pub fn is_active(&self) -> bool {
        self.enabled
    }

    pub fn phase(&self) -> PressPhase {
        lock(&self.tracker).phase()
    }

    /// Feed one pointer event. Must be called from within a tokio runtime,
    /// since a press arms a timer task.
    pub fn handle(&mut self, event: PointerEvent) -> EventResponse {
        if !self.enabled {
            return EventResponse::default();
        }

        if event.is_start() {
            self.start();
        } else {
            self.finish();
        }

        EventResponse {
            prevent_default: self.config.should_prevent_default && event.is_touch(),
        }
    }

    fn start(&mut self) {
        let Some(generation) = lock(&self.tracker).press() else {
            return;
        };

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let tracker = Arc::clone(&self.tracker);
        let tx = self.tx.clone();
        let delay = self.config.delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let fired = lock(&tracker).fire(generation);
                    if let Some(action) = fired {
                        let _ = tx.send(action);
                    }
                }
            }
        });
        self.timer = Some(token);
    }

    fn finish(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        let released = lock(&self.tracker).release();
        if let Some(action) = released {
            let _ = self.tx.send(action);
        }
    }
}

impl Drop for LongPressAdapter {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

fn lock(tracker: &Mutex<PressTracker>) -> MutexGuard<'_, PressTracker> {
    tracker.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quick_release_is_a_click() {
        let mut tracker = PressTracker::default();
        let generation = tracker.press().unwrap();
        assert_eq!(tracker.phase(), PressPhase::Pressing);
        assert_eq!(tracker.release(), Some(GestureAction::Click));
        assert_eq!(tracker.fire(generation), None);
        assert_eq!(tracker.phase(), PressPhase::Idle);
    }

    #[test]
    fn fire_then_release_reports_only_long_press() {
        let mut tracker = PressTracker::default();
        let generation = tracker.press().unwrap();
        assert_eq!(tracker.fire(generation), Some(GestureAction::LongPress));
        assert_eq!(tracker.fire(generation), None);
        assert_eq!(tracker.release(), None);
        assert_eq!(tracker.phase(), PressPhase::Idle);
    }

    #[test]
    fn stale_timer_cannot_trigger_next_press() {
        let mut tracker = PressTracker::default();
        let first = tracker.press().unwrap();
        tracker.release();
        let second = tracker.press().unwrap();
        assert_ne!(first, second);
        assert_eq!(tracker.fire(first), None);
        assert_eq!(tracker.fire(second), Some(GestureAction::LongPress));
    }

    #[test]
    fn repeated_press_is_ignored() {
        let mut tracker = PressTracker::default();
        assert!(tracker.press().is_some());
        assert!(tracker.press().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn inert_on_desktop() {
        let (mut adapter, mut rx) =
            LongPressAdapter::new(LongPressConfig::default(), DeviceClass::Desktop);
        assert!(!adapter.is_active());
        adapter.handle(PointerEvent::MouseDown);
        assert_eq!(adapter.phase(), PressPhase::Idle);
        tokio::time::sleep(Duration::from_millis(500)).await;
        adapter.handle(PointerEvent::MouseUp);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn prevent_default_only_when_configured() {
        let config = LongPressConfig {
            should_prevent_default: true,
            ..Default::default()
        };
        let (mut adapter, _rx) = LongPressAdapter::new(config, DeviceClass::Mobile);
        assert!(adapter.handle(PointerEvent::TouchStart).prevent_default);
        assert!(adapter.handle(PointerEvent::TouchEnd).prevent_default);

        let (mut plain, _rx) = LongPressAdapter::new(LongPressConfig::default(), DeviceClass::Mobile);
        assert!(!plain.handle(PointerEvent::TouchStart).prevent_default);
    }
}
