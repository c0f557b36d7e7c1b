//! Usage statistics derived from the persisted session history.
//!
//! Aggregation is pure: it takes the session list plus an explicit "now"
//! and produces per-day buckets, so the daemon and the tests feed it the
//! same way.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::FocusSession;

/// Focus minutes and session count for a single calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    pub date: NaiveDate,
    pub focus_minutes: u32,
    pub sessions: u32,
}

/// Aggregated view over the recorded work sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_sessions: u32,
    pub total_focus_minutes: u32,
    pub sessions_today: u32,
    /// Daily buckets for the requested window, oldest first. Days without
    /// any session are present with zeros so tables render gapless.
    pub days: Vec<DayBucket>,
}

/// Summarizes the session history over the last `window_days` days
/// (today inclusive). Break sessions are ignored.
pub fn summarize(sessions: &[FocusSession], now: DateTime<Utc>, window_days: u32) -> StatsSummary {
    let today = now.date_naive();
    let window_days = window_days.max(1);
    let window_start = today - Duration::days(i64::from(window_days) - 1);

    let mut days: Vec<DayBucket> = (0..window_days)
        .map(|offset| DayBucket {
            date: window_start + Duration::days(i64::from(offset)),
            focus_minutes: 0,
            sessions: 0,
        })
        .collect();

    let mut total_sessions = 0u32;
    let mut total_focus_minutes = 0u32;
    let mut sessions_today = 0u32;

    for session in sessions.iter().filter(|s| s.is_work_session) {
        total_sessions += 1;
        total_focus_minutes += session.duration_minutes;

        let date = session.started_at.date_naive();
        if date == today {
            sessions_today += 1;
        }
        if date >= window_start && date <= today {
            let index = (date - window_start).num_days() as usize;
            days[index].focus_minutes += session.duration_minutes;
            days[index].sessions += 1;
        }
    }

    StatsSummary {
        total_sessions,
        total_focus_minutes,
        sessions_today,
        days,
    }
}

// ============================================================================
// Tests
// ============================================================================
