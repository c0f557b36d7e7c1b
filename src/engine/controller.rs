//! Timer controller state machine.
//!
//! Owns the countdown state, the mode transitions and the nested
//! micro-break scheduler, and publishes every observable change on the
//! event bus. The controller is a pure state machine: it advances only
//! through explicit [`TimerController::tick`] calls (the daemon drives it
//! at 1 Hz), and wall-clock reads for session records go through the
//! [`Clock`] abstraction.
//!
//! States are `{Idle, WorkRunning, BreakRunning}`: `TimerMode` crossed
//! with the running flag. Transition policy:
//! - `start()` while running is a no-op (no duplicate tick source)
//! - `stop()` while idle is a no-op
//! - a finished work interval flips to break and restarts the countdown
//!   after a short fixed delay, with the start cue suppressed once
//! - a finished break flips to work but stays idle until `start()`

use std::sync::Arc;

use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::events::{AppEvent, EventBus, SoundKind};
use crate::types::{FocusSession, TimerMode, TimerState};

use super::clock::Clock;
use super::prompt::{PromptScheduler, PromptSignal};

/// Delay before the break countdown restarts after a finished work
/// interval, in seconds.
pub const BREAK_AUTOSTART_DELAY_SECS: u32 = 3;

// ============================================================================
// TimerController
// ============================================================================

/// The countdown state machine and micro-break prompt owner.
pub struct TimerController {
    state: TimerState,
    config: AppConfig,
    prompt: PromptScheduler,
    bus: EventBus,
    clock: Arc<dyn Clock>,
    /// Start timestamp of the running work session, if any
    session_started_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Seconds until the pending work-to-break auto restart fires
    autostart_in: Option<u32>,
    /// Suppresses the start cue for the next (auto) restart only
    suppress_start_sound: bool,
}

impl TimerController {
    /// Creates an idle controller in work mode.
    pub fn new(config: AppConfig, bus: EventBus, clock: Arc<dyn Clock>) -> Self {
        let state = TimerState::new(config.work_minutes, config.break_minutes);
        let prompt = PromptScheduler::new(config.prompt.clone());
        Self {
            state,
            config,
            prompt,
            bus,
            clock,
            session_started_at: None,
            autostart_in: None,
            suppress_start_sound: false,
        }
    }

    /// Creates a controller with a seeded prompt RNG, for deterministic
    /// tests.
    pub fn with_rng(config: AppConfig, bus: EventBus, clock: Arc<dyn Clock>, rng: StdRng) -> Self {
        let mut controller = Self::new(config, bus, clock);
        controller.prompt = PromptScheduler::with_rng(controller.config.prompt.clone(), rng);
        controller
    }

    /// Returns the current countdown state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Starts the countdown in the current mode.
    ///
    /// A no-op while the countdown is already running: the state is left
    /// unchanged and no duplicate tick source exists. A manual start also
    /// cancels any pending break auto restart.
    pub fn start(&mut self) {
        if self.state.is_running {
            debug!("start ignored, timer already running");
            return;
        }
        self.autostart_in = None;
        self.suppress_start_sound = false;
        self.begin(true);
    }

    /// Stops the countdown and goes idle. A no-op while already idle.
    pub fn stop(&mut self) {
        if !self.state.is_running && self.autostart_in.is_none() {
            debug!("stop ignored, timer already idle");
            return;
        }
        info!(mode = self.state.mode.as_str(), "timer stopped");
        self.state.is_running = false;
        self.autostart_in = None;
        self.suppress_start_sound = false;
        self.session_started_at = None;
        self.cancel_prompts();
        self.bus.publish(AppEvent::StateChanged(self.state.clone()));
    }

    /// Stops, forces work mode and reloads the full work duration.
    pub fn reset(&mut self) {
        self.state.is_running = false;
        self.autostart_in = None;
        self.suppress_start_sound = false;
        self.session_started_at = None;
        self.cancel_prompts();
        if self.state.mode != TimerMode::Work {
            self.state.mode = TimerMode::Work;
            self.bus.publish(AppEvent::ModeChanged(TimerMode::Work));
        }
        self.state.reload();
        info!("timer reset");
        self.bus.publish(AppEvent::StateChanged(self.state.clone()));
    }

    /// Advances the state machine by one second.
    ///
    /// While idle this only drives the pending break auto restart; while
    /// running it counts down, forwards the tick to the prompt scheduler
    /// and handles interval completion.
    pub fn tick(&mut self) {
        if !self.state.is_running {
            self.tick_autostart();
            return;
        }

        let completed = self.state.tick();
        self.bus.publish(AppEvent::Tick {
            mode: self.state.mode,
            remaining_seconds: self.state.remaining_seconds,
        });

        if self.state.mode.is_work() {
            if let Some(signal) = self.prompt.tick() {
                self.handle_prompt_signal(signal);
            }
        }

        if completed {
            self.handle_complete();
        }
    }

    /// Replaces the configuration.
    ///
    /// Durations take effect immediately (the countdown is clamped to the
    /// new totals); the prompt scheduler is re-armed from scratch so a
    /// settings change can never leave two overlapping prompt cycles.
    /// Enabling prompts during a running work session arms them right away.
    pub fn update_config(&mut self, config: AppConfig) {
        self.state
            .set_durations(config.work_minutes, config.break_minutes);
        if self.prompt.in_micro_break() {
            self.end_micro_break_effects();
        }
        self.prompt.set_config(config.prompt.clone());
        self.config = config;
        if self.state.is_running && self.state.mode.is_work() && !self.prompt.is_armed() {
            self.prompt.arm();
        }
        self.bus.publish(AppEvent::StateChanged(self.state.clone()));
    }

    /// Counts down the pending work-to-break auto restart.
    fn tick_autostart(&mut self) {
        let Some(left) = self.autostart_in else {
            return;
        };
        if left > 1 {
            self.autostart_in = Some(left - 1);
            return;
        }
        self.autostart_in = None;
        let suppress = std::mem::take(&mut self.suppress_start_sound);
        debug!("auto-starting break countdown");
        self.begin(!suppress);
    }

    /// Enters the running state in the current mode.
    fn begin(&mut self, play_sound: bool) {
        if self.state.remaining_seconds == 0 {
            self.state.reload();
        }
        self.state.is_running = true;

        if self.state.mode.is_work() {
            self.session_started_at = Some(self.clock.now());
            self.prompt.arm();
        } else {
            self.prompt.cancel();
        }

        info!(
            mode = self.state.mode.as_str(),
            remaining_seconds = self.state.remaining_seconds,
            "timer started"
        );
        if play_sound {
            self.play(SoundKind::SessionStart);
        }
        self.bus.publish(AppEvent::StateChanged(self.state.clone()));
    }

    /// Handles a countdown reaching zero.
    fn handle_complete(&mut self) {
        match self.state.mode {
            TimerMode::Work => {
                self.record_work_session();
                self.play(SoundKind::WorkComplete);
                self.cancel_prompts();

                self.state.mode = TimerMode::Break;
                self.state.reload();
                self.state.is_running = false;
                self.bus.publish(AppEvent::ModeChanged(TimerMode::Break));

                // break restarts on its own shortly, with the cue muted once
                self.autostart_in = Some(BREAK_AUTOSTART_DELAY_SECS);
                self.suppress_start_sound = true;
            }
            TimerMode::Break => {
                self.play(SoundKind::BreakComplete);

                self.state.mode = TimerMode::Work;
                self.state.reload();
                self.state.is_running = false;
                self.bus.publish(AppEvent::ModeChanged(TimerMode::Work));
                // work waits for a manual start
            }
        }
        self.bus.publish(AppEvent::StateChanged(self.state.clone()));
    }

    /// Finalizes the running work session into a record for persistence.
    fn record_work_session(&mut self) {
        let ended_at = self.clock.now();
        let duration_minutes = self.state.total_work_seconds / 60;
        let started_at = self
            .session_started_at
            .take()
            .unwrap_or(ended_at - chrono::Duration::minutes(i64::from(duration_minutes)));

        let session = FocusSession::work(started_at, ended_at, duration_minutes);
        info!(duration_minutes, "work session completed");
        self.bus.publish(AppEvent::SessionRecorded(session));
    }

    /// Maps a prompt scheduler signal onto bus events.
    fn handle_prompt_signal(&mut self, signal: PromptSignal) {
        match signal {
            PromptSignal::MicroBreakStarted => {
                info!("micro-break started");
                self.bus.publish(AppEvent::MicroBreakStarted);
                if self.config.blackout_enabled {
                    self.bus.publish(AppEvent::ShowBlackout);
                }
                self.bus.publish(AppEvent::PauseMedia);
                self.play(SoundKind::MicroBreak);
            }
            PromptSignal::MicroBreakEnded => {
                info!("micro-break ended");
                self.end_micro_break_effects();
            }
        }
    }

    /// Publishes the events that close out a micro-break.
    fn end_micro_break_effects(&mut self) {
        self.bus.publish(AppEvent::MicroBreakEnded);
        if self.config.blackout_enabled {
            self.bus.publish(AppEvent::HideBlackout);
        }
        self.bus.publish(AppEvent::ResumeMedia);
    }

    /// Cancels prompt scheduling, unwinding a micro-break in progress.
    fn cancel_prompts(&mut self) {
        if self.prompt.in_micro_break() {
            self.end_micro_break_effects();
        }
        self.prompt.cancel();
    }

    /// Publishes a sound cue unless sound is disabled.
    fn play(&self, kind: SoundKind) {
        if self.config.sound_enabled {
            self.bus.publish(AppEvent::PlaySound(kind));
        }
    }
}

impl std::fmt::Debug for TimerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerController")
            .field("state", &self.state)
            .field("autostart_in", &self.autostart_in)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
