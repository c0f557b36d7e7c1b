//! Typed in-process event bus.
//!
//! Decouples the timer controller from its consumers (sound cues, the
//! blackout overlay, media control, persistence) without stringly-typed
//! notification names. Built on `tokio::sync::broadcast`:
//!
//! - every live subscriber receives each published event at least once
//! - there is no history; a new subscriber only sees later events
//! - publishing with zero subscribers is not an error
//! - no ordering guarantee across distinct event kinds

use tokio::sync::broadcast;

use crate::types::{FocusSession, TimerMode, TimerState};

/// Default channel capacity for the bus.
const DEFAULT_CAPACITY: usize = 64;

// ============================================================================
// SoundKind
// ============================================================================

/// The distinct sound cues the timer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundKind {
    /// Countdown started (work or break)
    SessionStart,
    /// Work interval ran to completion
    WorkComplete,
    /// Break interval ran to completion
    BreakComplete,
    /// Micro-break prompt fired
    MicroBreak,
}

// ============================================================================
// AppEvent
// ============================================================================

/// Events published by the timer core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// One second elapsed on a running countdown
    Tick {
        /// Current mode
        mode: TimerMode,
        /// Remaining seconds
        remaining_seconds: u32,
    },
    /// The countdown state changed (started, stopped, reloaded)
    StateChanged(TimerState),
    /// The mode flipped
    ModeChanged(TimerMode),
    /// A sound cue should play
    PlaySound(SoundKind),
    /// The blackout overlay should cover the screen
    ShowBlackout,
    /// The blackout overlay should disappear
    HideBlackout,
    /// Media playback should pause for a micro-break
    PauseMedia,
    /// Media playback may resume
    ResumeMedia,
    /// A micro-break started
    MicroBreakStarted,
    /// A micro-break ended
    MicroBreakEnded,
    /// A work session completed and was handed to persistence
    SessionRecorded(FocusSession),
}

// ============================================================================
// EventBus
// ============================================================================

/// Broadcast bus shared by the timer core and its consumers.
///
/// Cloning the bus clones the sender side; all clones publish into the
/// same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl EventBus {
    /// Creates a bus with the given channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Creates a bus with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Publishes an event to all current subscribers.
    ///
    /// A bus with no subscribers swallows the event; that is the normal
    /// state before the consumers are wired up.
    pub fn publish(&self, event: AppEvent) {
        let _ = self.tx.send(event);
    }

    /// Registers a new subscriber. Only events published after this call
    /// are delivered.
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }

    /// Returns the number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
