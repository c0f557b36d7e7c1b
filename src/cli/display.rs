//! Formatted CLI output.

use crate::stats::StatsSummary;
use crate::types::IpcResponse;

// ============================================================================
// Display
// ============================================================================

/// Output formatting for the CLI commands.
pub struct Display;

impl Display {
    /// Shows the outcome of start, stop and reset.
    pub fn show_action(response: &IpcResponse) {
        println!("{}", response.message);
        if let Some(data) = &response.data {
            if let (Some(remaining), Some(true)) = (data.remaining_seconds, data.is_running) {
                println!("  remaining: {}", Self::format_time(remaining));
            }
        }
    }

    /// Shows the current timer state.
    pub fn show_status(response: &IpcResponse) {
        let Some(data) = &response.data else {
            println!("daemon returned no state");
            return;
        };

        let mode = match data.mode.as_deref() {
            Some("work") => "work",
            Some("break") => "break",
            other => other.unwrap_or("unknown"),
        };
        let running = data.is_running.unwrap_or(false);

        println!("mode:      {mode}");
        println!("state:     {}", if running { "running" } else { "idle" });
        if let Some(remaining) = data.remaining_seconds {
            println!("remaining: {}", Self::format_time(remaining));
        }
    }

    /// Shows the statistics table.
    pub fn show_stats(response: &IpcResponse) {
        let Some(summary) = response.data.as_ref().and_then(|d| d.stats.as_ref()) else {
            println!("no statistics available");
            return;
        };
        Self::show_summary(summary);
    }

    fn show_summary(summary: &StatsSummary) {
        println!("sessions:      {}", summary.total_sessions);
        println!(
            "focus time:    {}h {:02}m",
            summary.total_focus_minutes / 60,
            summary.total_focus_minutes % 60
        );
        println!("today:         {} sessions", summary.sessions_today);
        println!();
        println!("{:<12} {:>8} {:>10}", "date", "sessions", "minutes");
        for day in &summary.days {
            println!(
                "{:<12} {:>8} {:>10}",
                day.date.format("%Y-%m-%d"),
                day.sessions,
                day.focus_minutes
            );
        }
    }

    /// Shows the config command response.
    pub fn show_config(response: &IpcResponse) {
        println!("{}", response.message);
    }

    /// Shows an error message on stderr.
    pub fn show_error(message: &str) {
        eprintln!("error: {message}");
    }

    /// Formats a second count as M:SS.
    fn format_time(total_seconds: u32) -> String {
        format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(Display::format_time(0), "0:00");
        assert_eq!(Display::format_time(59), "0:59");
        assert_eq!(Display::format_time(60), "1:00");
        assert_eq!(Display::format_time(25 * 60), "25:00");
        assert_eq!(Display::format_time(90 * 60 + 5), "90:05");
    }
}
