//! Respite - focus timer daemon and CLI
//!
//! Core functionality for the respite focus timer:
//! - Timer engine: countdown state machine and micro-break prompt scheduler
//! - Typed event bus connecting the engine to sound, persistence and IPC
//! - Persistence gateway with legacy migration and history retention
//! - Usage statistics aggregation
//! - IPC server/client for daemon-CLI communication
//! - Sound cue playback

pub mod cli;
pub mod config;
pub mod daemon;
pub mod engine;
pub mod events;
pub mod sound;
pub mod stats;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use config::AppConfig;
pub use engine::{Clock, ManualClock, PromptScheduler, SystemClock, TimerController};
pub use events::{AppEvent, EventBus, SoundKind};
pub use stats::{DayBucket, StatsSummary};
pub use store::{Gateway, StoreDocument, StoreError};
pub use types::{
    FocusSession, IpcRequest, IpcResponse, PromptConfig, ResponseData, StartParams, TimerMode,
    TimerState,
};
