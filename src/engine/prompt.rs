//! Micro-break prompt scheduler.
//!
//! Nested inside the timer controller and advanced by the same 1 Hz tick.
//! While armed it counts down a uniformly random delay drawn from the
//! configured interval; when the delay elapses it signals the start of a
//! micro-break, counts down the fixed micro-break length, signals the end
//! and re-arms itself with a fresh random delay.
//!
//! Cancellation is idempotent, and re-arming always cancels any pending
//! countdown first so two prompt cycles can never overlap.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::types::PromptConfig;

// ============================================================================
// PromptSignal
// ============================================================================

/// Signal produced when a prompt countdown elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptSignal {
    /// The random delay elapsed; a micro-break begins now
    MicroBreakStarted,
    /// The fixed micro-break delay elapsed; the break is over
    MicroBreakEnded,
}

// ============================================================================
// PromptScheduler
// ============================================================================

/// Internal phase of the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// No countdown pending
    Disarmed,
    /// Waiting out the random delay until the next prompt
    Waiting { seconds_left: u32 },
    /// Inside a micro-break, waiting out its fixed length
    InMicroBreak { seconds_left: u32 },
}

/// Schedules randomized micro-break prompts.
pub struct PromptScheduler {
    config: PromptConfig,
    phase: Phase,
    rng: StdRng,
}

impl PromptScheduler {
    /// Creates a disarmed scheduler seeded from the OS.
    pub fn new(config: PromptConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a disarmed scheduler with an explicit RNG, for
    /// deterministic tests.
    pub fn with_rng(config: PromptConfig, rng: StdRng) -> Self {
        Self {
            config,
            phase: Phase::Disarmed,
            rng,
        }
    }

    /// Arms the scheduler with a fresh random delay.
    ///
    /// Any pending countdown is cancelled first; a disabled config leaves
    /// the scheduler disarmed.
    pub fn arm(&mut self) {
        self.cancel();
        if !self.config.enabled {
            return;
        }
        let delay = self.draw_delay();
        debug!(delay_seconds = delay, "micro-break prompt armed");
        self.phase = Phase::Waiting {
            seconds_left: delay,
        };
    }

    /// Cancels any pending countdown. Idempotent.
    pub fn cancel(&mut self) {
        self.phase = Phase::Disarmed;
    }

    /// Returns true if a countdown is pending or a micro-break is active.
    pub fn is_armed(&self) -> bool {
        self.phase != Phase::Disarmed
    }

    /// Returns true while a micro-break is in progress.
    pub fn in_micro_break(&self) -> bool {
        matches!(self.phase, Phase::InMicroBreak { .. })
    }

    /// Replaces the configuration and re-arms if a countdown was pending.
    ///
    /// Cancelling before re-arming guarantees no duplicate overlapping
    /// prompts after a settings change.
    pub fn set_config(&mut self, config: PromptConfig) {
        let was_armed = self.is_armed();
        self.config = config;
        self.cancel();
        if was_armed {
            self.arm();
        }
    }

    /// Advances the scheduler by one second.
    ///
    /// Returns a signal when a countdown elapses. After a micro-break ends
    /// the scheduler re-arms itself automatically.
    pub fn tick(&mut self) -> Option<PromptSignal> {
        match self.phase {
            Phase::Disarmed => None,
            Phase::Waiting { seconds_left } => {
                if seconds_left > 1 {
                    self.phase = Phase::Waiting {
                        seconds_left: seconds_left - 1,
                    };
                    None
                } else {
                    self.phase = Phase::InMicroBreak {
                        seconds_left: self.config.micro_break_seconds,
                    };
                    Some(PromptSignal::MicroBreakStarted)
                }
            }
            Phase::InMicroBreak { seconds_left } => {
                if seconds_left > 1 {
                    self.phase = Phase::InMicroBreak {
                        seconds_left: seconds_left - 1,
                    };
                    None
                } else {
                    self.arm();
                    Some(PromptSignal::MicroBreakEnded)
                }
            }
        }
    }

    /// Draws a uniformly random delay in seconds from the configured
    /// interval. Bounds are inclusive; equal bounds yield a fixed delay.
    fn draw_delay(&mut self) -> u32 {
        let min = self.config.min_interval_minutes * 60;
        let max = self.config.max_interval_minutes * 60;
        if min >= max {
            min
        } else {
            self.rng.gen_range(min..=max)
        }
    }
}

impl std::fmt::Debug for PromptScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptScheduler")
            .field("config", &self.config)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
