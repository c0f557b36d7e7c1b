//! Application configuration.
//!
//! Holds the user-adjustable settings: interval durations, the micro-break
//! prompt bounds and the sound/blackout toggles. Serialized as flat
//! key-value pairs by the persistence gateway.
//!
//! Invalid duration writes (zero, or above the one-day cap) are silently
//! ignored, leaving the previous valid value in effect.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{ConfigParams, PromptConfig, MAX_DURATION_MINUTES};

fn default_work_minutes() -> u32 {
    25
}

fn default_break_minutes() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

/// Top-level application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Work interval length in minutes
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    /// Break interval length in minutes
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
    /// Micro-break prompt settings
    #[serde(flatten)]
    pub prompt: PromptConfig,
    /// Whether sound cues play
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    /// Whether blackout overlays are requested during micro-breaks
    #[serde(default = "default_true")]
    pub blackout_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            break_minutes: default_break_minutes(),
            prompt: PromptConfig::default(),
            sound_enabled: true,
            blackout_enabled: true,
        }
    }
}

impl AppConfig {
    /// Sets the work duration. Zero or out-of-range values are ignored.
    pub fn set_work_minutes(&mut self, minutes: u32) {
        if minutes == 0 || minutes > MAX_DURATION_MINUTES {
            debug!(minutes, "ignoring invalid work duration");
            return;
        }
        self.work_minutes = minutes;
    }

    /// Sets the break duration. Zero or out-of-range values are ignored.
    pub fn set_break_minutes(&mut self, minutes: u32) {
        if minutes == 0 || minutes > MAX_DURATION_MINUTES {
            debug!(minutes, "ignoring invalid break duration");
            return;
        }
        self.break_minutes = minutes;
    }

    /// Applies a partial settings update received over IPC.
    ///
    /// Unset fields are left untouched; invalid durations are dropped by
    /// the individual setters.
    pub fn apply(&mut self, params: &ConfigParams) {
        if let Some(work) = params.work_minutes {
            self.set_work_minutes(work);
        }
        if let Some(brk) = params.break_minutes {
            self.set_break_minutes(brk);
        }
        if let Some(min) = params.prompt_min_minutes {
            self.prompt.set_min_interval(min);
        }
        if let Some(max) = params.prompt_max_minutes {
            self.prompt.set_max_interval(max);
        }
        if let Some(secs) = params.micro_break_seconds {
            self.prompt.set_micro_break_seconds(secs);
        }
        if let Some(enabled) = params.prompts_enabled {
            self.prompt.enabled = enabled;
        }
        if let Some(enabled) = params.sound_enabled {
            self.sound_enabled = enabled;
        }
        if let Some(enabled) = params.blackout_enabled {
            self.blackout_enabled = enabled;
        }
    }

    /// Repairs invariants after deserializing untrusted data.
    pub fn normalize(&mut self) {
        if self.work_minutes == 0 || self.work_minutes > MAX_DURATION_MINUTES {
            self.work_minutes = default_work_minutes();
        }
        if self.break_minutes == 0 || self.break_minutes > MAX_DURATION_MINUTES {
            self.break_minutes = default_break_minutes();
        }
        self.prompt.normalize();
    }
}
