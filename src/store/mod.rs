//! Persistence gateway.
//!
//! All durable state lives in a single flat JSON document: the settings
//! keys at the top level next to the session history. Writes go through a
//! temp file followed by an atomic rename so a crash mid-write never
//! leaves a torn document behind. Reads are infallible: a missing or
//! undecodable file yields the defaults (with a warning) instead of
//! failing startup.
//!
//! `load` also runs two maintenance passes:
//! - legacy migration: older versions stored bare completion timestamps;
//!   these are rebuilt into full session records on first load
//! - retention: session records older than three months are purged

mod error;

pub use error::StoreError;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::types::FocusSession;

/// Session records older than this are purged on load.
pub const RETENTION_MONTHS: u32 = 3;

// ============================================================================
// StoreDocument
// ============================================================================

/// The on-disk document. Settings keys sit flat at the top level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(flatten)]
    pub config: AppConfig,

    /// Bare completion timestamps written by older versions. Drained into
    /// `focus_sessions` on load and never written back.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub legacy_completions: Vec<DateTime<Utc>>,

    #[serde(default)]
    pub focus_sessions: Vec<FocusSession>,
}

// ============================================================================
// Gateway
// ============================================================================

/// Handle to the settings-and-history document on disk.
#[derive(Debug, Clone)]
pub struct Gateway {
    path: PathBuf,
}

impl Gateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document, migrating legacy records and purging expired
    /// sessions. Never fails: an unreadable document logs a warning and
    /// falls back to defaults.
    pub fn load(&self, now: DateTime<Utc>) -> StoreDocument {
        let mut doc = self.read_document();
        doc.config.normalize();

        let migrated = migrate_legacy(&mut doc);
        let purged = purge_expired(&mut doc, now);

        if migrated > 0 || purged > 0 {
            if migrated > 0 {
                info!(migrated, "migrated legacy completion records");
            }
            if purged > 0 {
                info!(purged, "purged expired session records");
            }
            if let Err(e) = self.save(&doc) {
                warn!("failed to write back migrated store: {e}");
            }
        }

        doc
    }

    /// Writes the whole document atomically.
    pub fn save(&self, doc: &StoreDocument) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(doc)?;

        // write-then-rename keeps the previous document intact on failure
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "store saved");
        Ok(())
    }

    /// Persists a new configuration, leaving the session history as is.
    pub fn save_config(&self, config: &AppConfig) -> Result<(), StoreError> {
        let mut doc = self.read_document();
        doc.config = config.clone();
        doc.config.normalize();
        self.save(&doc)
    }

    /// Appends a completed session to the history.
    pub fn append_session(
        &self,
        session: FocusSession,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut doc = self.load(now);
        doc.focus_sessions.push(session);
        self.save(&doc)
    }

    fn read_document(&self) -> StoreDocument {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no store file, using defaults");
                return StoreDocument::default();
            }
            Err(e) => {
                warn!("failed to read store file, using defaults: {e}");
                return StoreDocument::default();
            }
        };
        match serde_json::from_str(&data) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("failed to decode store file, using defaults: {e}");
                StoreDocument::default()
            }
        }
    }
}

/// Rebuilds full session records from bare legacy completion timestamps.
/// Only runs when no full records exist yet, so a partially-migrated store
/// is never migrated twice. Returns the number of records created.
fn migrate_legacy(doc: &mut StoreDocument) -> usize {
    if !doc.focus_sessions.is_empty() {
        doc.legacy_completions.clear();
        return 0;
    }
    if doc.legacy_completions.is_empty() {
        return 0;
    }

    let minutes = doc.config.work_minutes;
    let migrated: Vec<FocusSession> = doc
        .legacy_completions
        .drain(..)
        .map(|ended_at| {
            // legacy records carried only the completion time; reconstruct
            // the start from the configured work duration
            let started_at = ended_at - chrono::Duration::minutes(i64::from(minutes));
            FocusSession::work(started_at, ended_at, minutes)
        })
        .collect();
    let count = migrated.len();
    doc.focus_sessions = migrated;
    count
}

/// Drops session records older than the retention window. Returns the
/// number of records removed.
fn purge_expired(doc: &mut StoreDocument, now: DateTime<Utc>) -> usize {
    let cutoff = now
        .checked_sub_months(Months::new(RETENTION_MONTHS))
        .unwrap_or(now);
    let before = doc.focus_sessions.len();
    doc.focus_sessions.retain(|s| s.started_at >= cutoff);
    before - doc.focus_sessions.len()
}

// ============================================================================
// Tests
// ============================================================================
