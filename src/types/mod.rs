//! Core data types for the focus timer.
//!
//! This module defines the data structures used for:
//! - Timer state management (mode, countdown, running flag)
//! - Micro-break prompt configuration with auto-corrected bounds
//! - Historical focus session records
//! - IPC request/response serialization

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Largest accepted interval duration, in minutes (one day).
///
/// Values above this are dropped like zero: arbitrary clients can write to
/// the control socket, and minute values near `u32::MAX` would overflow the
/// seconds conversion.
pub const MAX_DURATION_MINUTES: u32 = 24 * 60;

/// Largest accepted micro-break length, in seconds (one hour).
pub const MAX_MICRO_BREAK_SECONDS: u32 = 60 * 60;

// ============================================================================
// TimerMode
// ============================================================================

/// The mode the timer is currently in.
///
/// The timer alternates between work and break; whether a countdown is
/// actually running is tracked separately on [`TimerState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    /// Focused work interval
    Work,
    /// Rest interval between work sessions
    Break,
}

impl TimerMode {
    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Work => "work",
            TimerMode::Break => "break",
        }
    }

    /// Returns true for the work mode.
    pub fn is_work(&self) -> bool {
        matches!(self, TimerMode::Work)
    }
}

impl Default for TimerMode {
    fn default() -> Self {
        TimerMode::Work
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Snapshot of the countdown state machine.
///
/// Invariants:
/// - `remaining_seconds` never exceeds the larger configured total
/// - `is_running == false` means no countdown progresses on tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Current mode (work or break)
    pub mode: TimerMode,
    /// Remaining seconds in the current interval
    pub remaining_seconds: u32,
    /// Configured work interval length in seconds
    pub total_work_seconds: u32,
    /// Configured break interval length in seconds
    pub total_break_seconds: u32,
    /// Whether the countdown is running
    pub is_running: bool,
}

impl TimerState {
    /// Creates a new idle state in work mode with the full work duration
    /// loaded.
    pub fn new(work_minutes: u32, break_minutes: u32) -> Self {
        let total_work_seconds = work_minutes * 60;
        Self {
            mode: TimerMode::Work,
            remaining_seconds: total_work_seconds,
            total_work_seconds,
            total_break_seconds: break_minutes * 60,
            is_running: false,
        }
    }

    /// Returns the configured total for the current mode.
    pub fn current_total(&self) -> u32 {
        match self.mode {
            TimerMode::Work => self.total_work_seconds,
            TimerMode::Break => self.total_break_seconds,
        }
    }

    /// Reloads the countdown from the configured duration of the current
    /// mode.
    pub fn reload(&mut self) {
        self.remaining_seconds = self.current_total();
    }

    /// Updates the configured durations, clamping the countdown so the
    /// remaining-time invariant keeps holding.
    pub fn set_durations(&mut self, work_minutes: u32, break_minutes: u32) {
        self.total_work_seconds = work_minutes * 60;
        self.total_break_seconds = break_minutes * 60;
        let cap = self.total_work_seconds.max(self.total_break_seconds);
        if self.remaining_seconds > cap {
            self.remaining_seconds = self.current_total();
        }
    }

    /// Decrements the countdown by one second.
    ///
    /// Returns true if the interval has completed (reached 0).
    pub fn tick(&mut self) -> bool {
        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
        }
        self.remaining_seconds == 0
    }
}

// ============================================================================
// PromptConfig
// ============================================================================

fn default_min_interval_minutes() -> u32 {
    15
}

fn default_max_interval_minutes() -> u32 {
    25
}

fn default_micro_break_seconds() -> u32 {
    20
}

fn default_true() -> bool {
    true
}

/// Configuration for the randomized micro-break prompts.
///
/// The `min <= max` invariant is auto-corrected on every write: raising the
/// minimum above the maximum drags the maximum along, and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Lower bound of the random prompt interval, in minutes
    #[serde(default = "default_min_interval_minutes")]
    pub min_interval_minutes: u32,
    /// Upper bound of the random prompt interval, in minutes
    #[serde(default = "default_max_interval_minutes")]
    pub max_interval_minutes: u32,
    /// Length of a single micro-break, in seconds
    #[serde(default = "default_micro_break_seconds")]
    pub micro_break_seconds: u32,
    /// Whether micro-break prompts fire at all
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            min_interval_minutes: default_min_interval_minutes(),
            max_interval_minutes: default_max_interval_minutes(),
            micro_break_seconds: default_micro_break_seconds(),
            enabled: true,
        }
    }
}

impl PromptConfig {
    /// Sets the minimum interval. Zero or out-of-range values are ignored;
    /// a value above the current maximum raises the maximum to match.
    pub fn set_min_interval(&mut self, minutes: u32) {
        if minutes == 0 || minutes > MAX_DURATION_MINUTES {
            return;
        }
        self.min_interval_minutes = minutes;
        if self.max_interval_minutes < minutes {
            self.max_interval_minutes = minutes;
        }
    }

    /// Sets the maximum interval. Zero or out-of-range values are ignored;
    /// a value below the current minimum lowers the minimum to match.
    pub fn set_max_interval(&mut self, minutes: u32) {
        if minutes == 0 || minutes > MAX_DURATION_MINUTES {
            return;
        }
        self.max_interval_minutes = minutes;
        if self.min_interval_minutes > minutes {
            self.min_interval_minutes = minutes;
        }
    }

    /// Sets the micro-break length. Zero or out-of-range values are ignored.
    pub fn set_micro_break_seconds(&mut self, seconds: u32) {
        if seconds == 0 || seconds > MAX_MICRO_BREAK_SECONDS {
            return;
        }
        self.micro_break_seconds = seconds;
    }

    /// Restores the `min <= max` invariant after deserializing data that
    /// was written by hand or by an older version. Out-of-range values are
    /// reset to defaults.
    pub fn normalize(&mut self) {
        if self.min_interval_minutes == 0 || self.min_interval_minutes > MAX_DURATION_MINUTES {
            self.min_interval_minutes = default_min_interval_minutes();
        }
        if self.max_interval_minutes > MAX_DURATION_MINUTES {
            self.max_interval_minutes = default_max_interval_minutes();
        }
        if self.max_interval_minutes < self.min_interval_minutes {
            self.max_interval_minutes = self.min_interval_minutes;
        }
        if self.micro_break_seconds == 0 || self.micro_break_seconds > MAX_MICRO_BREAK_SECONDS {
            self.micro_break_seconds = default_micro_break_seconds();
        }
    }
}

// ============================================================================
// FocusSession
// ============================================================================

/// A completed focus interval, recorded for statistics.
///
/// Immutable once created; appended to an ordered log and pruned after the
/// retention window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSession {
    /// When the session started
    pub started_at: DateTime<Utc>,
    /// When the session ended
    pub ended_at: DateTime<Utc>,
    /// Length of the session in minutes
    pub duration_minutes: u32,
    /// True for work sessions, false for tracked breaks
    pub is_work_session: bool,
}

impl FocusSession {
    /// Creates a completed work session record.
    pub fn work(started_at: DateTime<Utc>, ended_at: DateTime<Utc>, duration_minutes: u32) -> Self {
        Self {
            started_at,
            ended_at,
            duration_minutes,
            is_work_session: true,
        }
    }
}

// ============================================================================
// IPC Types
// ============================================================================

/// Optional duration overrides for the start command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartParams {
    /// Work duration in minutes
    #[serde(rename = "workMinutes", skip_serializing_if = "Option::is_none")]
    pub work_minutes: Option<u32>,
    /// Break duration in minutes
    #[serde(rename = "breakMinutes", skip_serializing_if = "Option::is_none")]
    pub break_minutes: Option<u32>,
}

/// Settings updates carried by the config command.
///
/// Unset fields leave the stored value untouched. Non-positive durations
/// are dropped by the receiving side, never applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigParams {
    #[serde(rename = "workMinutes", skip_serializing_if = "Option::is_none")]
    pub work_minutes: Option<u32>,
    #[serde(rename = "breakMinutes", skip_serializing_if = "Option::is_none")]
    pub break_minutes: Option<u32>,
    #[serde(rename = "promptMinMinutes", skip_serializing_if = "Option::is_none")]
    pub prompt_min_minutes: Option<u32>,
    #[serde(rename = "promptMaxMinutes", skip_serializing_if = "Option::is_none")]
    pub prompt_max_minutes: Option<u32>,
    #[serde(rename = "microBreakSeconds", skip_serializing_if = "Option::is_none")]
    pub micro_break_seconds: Option<u32>,
    #[serde(rename = "promptsEnabled", skip_serializing_if = "Option::is_none")]
    pub prompts_enabled: Option<bool>,
    #[serde(rename = "soundEnabled", skip_serializing_if = "Option::is_none")]
    pub sound_enabled: Option<bool>,
    #[serde(rename = "blackoutEnabled", skip_serializing_if = "Option::is_none")]
    pub blackout_enabled: Option<bool>,
}

impl ConfigParams {
    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.work_minutes.is_none()
            && self.break_minutes.is_none()
            && self.prompt_min_minutes.is_none()
            && self.prompt_max_minutes.is_none()
            && self.micro_break_seconds.is_none()
            && self.prompts_enabled.is_none()
            && self.sound_enabled.is_none()
            && self.blackout_enabled.is_none()
    }
}

/// IPC request from client to daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum IpcRequest {
    /// Start the countdown in the current mode
    Start {
        #[serde(flatten)]
        params: StartParams,
    },
    /// Stop the countdown and go idle
    Stop,
    /// Stop, force work mode and reload the duration
    Reset,
    /// Query the current timer state
    Status,
    /// Query usage statistics
    Stats {
        /// Size of the trailing day window
        #[serde(skip_serializing_if = "Option::is_none")]
        days: Option<u32>,
    },
    /// Update persisted settings
    Config {
        #[serde(flatten)]
        params: ConfigParams,
    },
}

/// Response data for IPC responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseData {
    /// Current mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Remaining seconds
    #[serde(rename = "remainingSeconds", skip_serializing_if = "Option::is_none")]
    pub remaining_seconds: Option<u32>,
    /// Whether the countdown is running
    #[serde(rename = "isRunning", skip_serializing_if = "Option::is_none")]
    pub is_running: Option<bool>,
    /// Usage statistics (stats command only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<crate::stats::StatsSummary>,
}

impl ResponseData {
    /// Creates response data from the timer state.
    pub fn from_timer_state(state: &TimerState) -> Self {
        Self {
            mode: Some(state.mode.as_str().to_string()),
            remaining_seconds: Some(state.remaining_seconds),
            is_running: Some(state.is_running),
            stats: None,
        }
    }
}

/// IPC response from daemon to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcResponse {
    /// Response status ("success" or "error")
    pub status: String,
    /// Human-readable message
    pub message: String,
    /// Optional response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl IpcResponse {
    /// Creates a success response.
    pub fn success(message: impl Into<String>, data: Option<ResponseData>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data,
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            data: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
