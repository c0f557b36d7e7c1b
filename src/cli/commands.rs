//! Command definitions, using clap derive.

use clap::{Args, Parser, Subcommand};

use crate::types::{ConfigParams, StartParams};

// ============================================================================
// CLI Structure
// ============================================================================

/// Focus timer with randomized micro-break prompts
#[derive(Parser, Debug)]
#[command(
    name = "respite",
    version,
    about = "Focus timer with work/break cycles and micro-break prompts",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the countdown in the current mode
    Start(StartArgs),

    /// Stop the countdown
    Stop,

    /// Stop and reset to a fresh work interval
    Reset,

    /// Show the current timer state
    Status,

    /// Show usage statistics
    Stats {
        /// Number of trailing days to summarize
        #[arg(short, long, default_value = "7", value_parser = clap::value_parser!(u32).range(1..=92))]
        days: u32,
    },

    /// Show or update settings
    Config(ConfigArgs),

    /// Run the timer daemon in the foreground
    Daemon,

    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Command Arguments
// ============================================================================

/// Arguments for the start command. Unset durations keep the stored
/// settings.
#[derive(Args, Debug, Clone, Default)]
pub struct StartArgs {
    /// Work duration in minutes (1-180)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=180))]
    pub work: Option<u32>,

    /// Break duration in minutes (1-60)
    #[arg(short, long = "break", value_parser = clap::value_parser!(u32).range(1..=60))]
    pub break_time: Option<u32>,
}

impl StartArgs {
    pub fn to_params(&self) -> StartParams {
        StartParams {
            work_minutes: self.work,
            break_minutes: self.break_time,
        }
    }
}

/// Arguments for the config command. With no flags the current settings
/// are printed.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Work duration in minutes (1-180)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=180))]
    pub work: Option<u32>,

    /// Break duration in minutes (1-60)
    #[arg(long = "break", value_parser = clap::value_parser!(u32).range(1..=60))]
    pub break_time: Option<u32>,

    /// Minimum minutes between micro-break prompts (1-180)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=180))]
    pub prompt_min: Option<u32>,

    /// Maximum minutes between micro-break prompts (1-180)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=180))]
    pub prompt_max: Option<u32>,

    /// Micro-break length in seconds (1-300)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=300))]
    pub micro_break: Option<u32>,

    /// Enable or disable micro-break prompts
    #[arg(long)]
    pub prompts: Option<bool>,

    /// Enable or disable sound cues
    #[arg(long)]
    pub sound: Option<bool>,

    /// Enable or disable the blackout overlay during micro-breaks
    #[arg(long)]
    pub blackout: Option<bool>,
}

impl ConfigArgs {
    pub fn to_params(&self) -> ConfigParams {
        ConfigParams {
            work_minutes: self.work,
            break_minutes: self.break_time,
            prompt_min_minutes: self.prompt_min,
            prompt_max_minutes: self.prompt_max,
            micro_break_seconds: self.micro_break,
            prompts_enabled: self.prompts,
            sound_enabled: self.sound,
            blackout_enabled: self.blackout,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
