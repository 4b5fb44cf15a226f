//! Persistence gateway: whole-collection read/modify/write over named keys.
//!
//! Every mutation reads the full collection, changes it in memory, and
//! rewrites it whole. There are no transactions and no record-level locking;
//! the app is the single writer by contract (a second concurrent writer would
//! lose data via last-write-wins on the whole collection).
//!
//! ## Design Principles
//!
//! - **Fail open on reads**: an absent or unparseable collection is an empty
//!   collection. Corruption is logged, never surfaced to the caller.
//! - **Asymmetric writes**: `save_*` assigns an id and propagates write
//!   errors; `delete_*`/`update_*` swallow errors into a `false` return.
//!   Callers of saves handle a `Result`, callers of the rest check a bool.
//! - **Rolling history**: the per-exercise history prepends and truncates to
//!   five entries, most recent first.

use crate::error::{EntrenoError, Result};
use crate::kv::KvStore;
use crate::types::{
    BodyWeightRecord, CustomSession, ExerciseHistory, Routine, SessionRecord,
};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Maximum entries kept in a per-exercise rolling history.
pub const EXERCISE_HISTORY_CAP: usize = 5;

const SESSIONS_KEY: &str = "sessions";
const CUSTOM_SESSIONS_KEY: &str = "customSessions";
const ROUTINES_KEY: &str = "routines";
const OVERRIDES_KEY: &str = "sessionTypeOverrides";
const DELETED_TYPES_KEY: &str = "deletedSessionTypes";
const BODY_WEIGHTS_KEY: &str = "bodyWeights";
const WELCOME_FLAG_KEY: &str = "welcome_last_shown";
const BODY_WEIGHT_WARNING_FLAG_KEY: &str = "last_body_weight_warning_shown";

/// The persistence gateway. Holds the backing key-value store; all domain
/// collections go through here.
#[derive(Debug)]
pub struct Store<S: KvStore> {
    kv: S,
}

impl<S: KvStore> Store<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Generates a fresh collection-unique id (ULID: sortable by creation
    /// time, collision-free even for rapid successive creates).
    fn new_id() -> String {
        ulid::Ulid::new().to_string()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Generic collection plumbing
    // ─────────────────────────────────────────────────────────────────────

    fn read_value<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.kv.get(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(err) => {
                    warn!(key, error = %err, "stored collection unparseable; treating as empty");
                    T::default()
                }
            },
            Ok(None) => T::default(),
            Err(err) => {
                warn!(key, error = %err, "failed to read collection; treating as empty");
                T::default()
            }
        }
    }

    fn write_value<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value).map_err(|e| EntrenoError::Json {
            context: format!("serializing collection {}", key),
            source: e,
        })?;
        self.kv.set(key, &json)?;
        debug!(key, "collection written");
        Ok(())
    }

    /// Shared delete/update shape: rewrite the collection, swallow failures
    /// into a boolean.
    fn write_value_lenient<T: Serialize>(&self, key: &str, value: &T) -> bool {
        match self.write_value(key, value) {
            Ok(()) => true,
            Err(err) => {
                warn!(key, error = %err, "collection write failed");
                false
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Sessions
    // ─────────────────────────────────────────────────────────────────────

    /// All finished sessions, in insertion (append) order.
    pub fn sessions(&self) -> Vec<SessionRecord> {
        self.read_value(SESSIONS_KEY)
    }

    /// Persists a finished session. Any incoming id is replaced with a fresh
    /// one; the stored record is returned.
    pub fn save_session(&self, mut record: SessionRecord) -> Result<SessionRecord> {
        record.id = Self::new_id();
        let mut all = self.sessions();
        all.push(record.clone());
        self.write_value(SESSIONS_KEY, &all)?;
        Ok(record)
    }

    /// Removes a session by id. Removing an absent id leaves the collection
    /// unchanged and still reports success.
    pub fn delete_session(&self, session_id: &str) -> bool {
        let mut all = self.sessions();
        all.retain(|s| s.id != session_id);
        self.write_value_lenient(SESSIONS_KEY, &all)
    }

    /// Sessions whose date falls on the given local day (legacy full-ISO
    /// dates compared by prefix).
    pub fn sessions_on(&self, date: NaiveDate) -> Vec<SessionRecord> {
        let day = date.format("%Y-%m-%d").to_string();
        self.sessions()
            .into_iter()
            .filter(|s| date_prefix(&s.date) == day)
            .collect()
    }

    /// Sessions within an inclusive local date range.
    pub fn sessions_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<SessionRecord> {
        self.sessions()
            .into_iter()
            .filter(|s| {
                parse_local_date(&s.date)
                    .map(|d| d >= from && d <= to)
                    .unwrap_or(false)
            })
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Custom Sessions
    // ─────────────────────────────────────────────────────────────────────

    /// Custom templates, most recently created first.
    pub fn custom_sessions(&self) -> Vec<CustomSession> {
        self.read_value(CUSTOM_SESSIONS_KEY)
    }

    pub fn custom_session(&self, id: &str) -> Option<CustomSession> {
        self.custom_sessions().into_iter().find(|c| c.id == id)
    }

    pub fn save_custom_session(&self, mut session: CustomSession) -> Result<CustomSession> {
        session.id = Self::new_id();
        let mut all = self.custom_sessions();
        all.insert(0, session.clone());
        self.write_value(CUSTOM_SESSIONS_KEY, &all)?;
        Ok(session)
    }

    pub fn update_custom_session(&self, session: &CustomSession) -> bool {
        let all: Vec<CustomSession> = self
            .custom_sessions()
            .into_iter()
            .map(|c| if c.id == session.id { session.clone() } else { c })
            .collect();
        self.write_value_lenient(CUSTOM_SESSIONS_KEY, &all)
    }

    pub fn delete_custom_session(&self, custom_id: &str) -> bool {
        let mut all = self.custom_sessions();
        all.retain(|c| c.id != custom_id);
        self.write_value_lenient(CUSTOM_SESSIONS_KEY, &all)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Routines
    // ─────────────────────────────────────────────────────────────────────

    pub fn routines(&self) -> Vec<Routine> {
        self.read_value(ROUTINES_KEY)
    }

    pub fn routine(&self, id: &str) -> Option<Routine> {
        self.routines().into_iter().find(|r| r.id == id)
    }

    pub fn save_routine(&self, mut routine: Routine) -> Result<Routine> {
        routine.id = Self::new_id();
        let mut all = self.routines();
        all.insert(0, routine.clone());
        self.write_value(ROUTINES_KEY, &all)?;
        Ok(routine)
    }

    pub fn update_routine(&self, routine: &Routine) -> bool {
        let all: Vec<Routine> = self
            .routines()
            .into_iter()
            .map(|r| if r.id == routine.id { routine.clone() } else { r })
            .collect();
        self.write_value_lenient(ROUTINES_KEY, &all)
    }

    pub fn delete_routine(&self, routine_id: &str) -> bool {
        let mut all = self.routines();
        all.retain(|r| r.id != routine_id);
        self.write_value_lenient(ROUTINES_KEY, &all)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Session-Type Overrides and Deletions
    // ─────────────────────────────────────────────────────────────────────

    /// User edits to built-in templates, keyed by session type name.
    pub fn session_type_overrides(&self) -> HashMap<String, Vec<ExerciseHistory>> {
        self.read_value(OVERRIDES_KEY)
    }

    pub fn save_session_type_overrides(
        &self,
        overrides: &HashMap<String, Vec<ExerciseHistory>>,
    ) -> bool {
        self.write_value_lenient(OVERRIDES_KEY, overrides)
    }

    pub fn update_session_type_override(
        &self,
        session_type: &str,
        exercises: Vec<ExerciseHistory>,
    ) -> bool {
        let mut overrides = self.session_type_overrides();
        overrides.insert(session_type.to_string(), exercises);
        self.save_session_type_overrides(&overrides)
    }

    /// Built-in types the user has hidden. Hiding never touches override
    /// data, so undeleting restores the edited template.
    pub fn deleted_session_types(&self) -> Vec<String> {
        self.read_value(DELETED_TYPES_KEY)
    }

    pub fn add_deleted_session_type(&self, name: &str) -> Result<()> {
        let mut current = self.deleted_session_types();
        if current.iter().any(|n| n == name) {
            return Ok(());
        }
        current.push(name.to_string());
        self.write_value(DELETED_TYPES_KEY, &current)
    }

    pub fn remove_deleted_session_type(&self, name: &str) -> Result<()> {
        let mut current = self.deleted_session_types();
        current.retain(|n| n != name);
        self.write_value(DELETED_TYPES_KEY, &current)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Per-Exercise Rolling History
    // ─────────────────────────────────────────────────────────────────────

    fn exercise_key(name: &str) -> String {
        format!("exercise_{}", name)
    }

    /// Rolling history for one exercise name, most recent first, at most
    /// five entries.
    pub fn exercise_history(&self, exercise_name: &str) -> Vec<ExerciseHistory> {
        self.read_value(&Self::exercise_key(exercise_name))
    }

    /// Prepends a record and truncates to the cap.
    pub fn append_exercise_history(&self, record: &ExerciseHistory) -> Result<()> {
        let key = Self::exercise_key(&record.name);
        let mut history = self.exercise_history(&record.name);
        history.insert(0, record.clone());
        history.truncate(EXERCISE_HISTORY_CAP);
        self.write_value(&key, &history)
    }

    /// The most recent record for an exercise, used for "last time" display.
    pub fn last_exercise_record(&self, exercise_name: &str) -> Option<ExerciseHistory> {
        self.exercise_history(exercise_name).into_iter().next()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Body Weights
    // ─────────────────────────────────────────────────────────────────────

    /// All body-weight records, sorted by date descending.
    pub fn body_weights(&self) -> Vec<BodyWeightRecord> {
        let mut list: Vec<BodyWeightRecord> = self.read_value(BODY_WEIGHTS_KEY);
        list.sort_by(|a, b| {
            let da = parse_local_date(&a.date_iso);
            let db = parse_local_date(&b.date_iso);
            db.cmp(&da)
        });
        list
    }

    pub fn add_body_weight(&self, date_iso: &str, weight_kg: f64) -> Result<BodyWeightRecord> {
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return Err(EntrenoError::InvalidBodyWeight {
                details: format!("{} kg is not a plausible weight", weight_kg),
            });
        }
        parse_local_date(date_iso).ok_or_else(|| EntrenoError::InvalidDate(date_iso.to_string()))?;
        let record = BodyWeightRecord {
            id: Self::new_id(),
            date_iso: date_iso.to_string(),
            weight_kg,
        };
        let mut all = self.body_weights();
        all.insert(0, record.clone());
        self.write_value(BODY_WEIGHTS_KEY, &all)?;
        Ok(record)
    }

    pub fn delete_body_weight(&self, id: &str) -> bool {
        let mut all = self.body_weights();
        all.retain(|r| r.id != id);
        self.write_value_lenient(BODY_WEIGHTS_KEY, &all)
    }

    /// The most recent recorded weight on or before the given date, if any.
    pub fn body_weight_at(&self, date: NaiveDate) -> Option<f64> {
        self.body_weights()
            .iter()
            .find(|r| parse_local_date(&r.date_iso).map(|d| d <= date).unwrap_or(false))
            .map(|r| r.weight_kg)
    }

    // ─────────────────────────────────────────────────────────────────────
    // One-Shot Flags
    // ─────────────────────────────────────────────────────────────────────

    fn flag(&self, key: &str) -> Option<String> {
        match self.kv.get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "failed to read flag");
                None
            }
        }
    }

    /// Date the welcome screen was last shown (`YYYY-MM-DD`).
    pub fn welcome_last_shown(&self) -> Option<String> {
        self.flag(WELCOME_FLAG_KEY)
    }

    pub fn set_welcome_last_shown(&self, date: &str) -> Result<()> {
        self.kv.set(WELCOME_FLAG_KEY, date)
    }

    /// ISO datetime the body-weight reminder was last shown.
    pub fn last_body_weight_warning_shown(&self) -> Option<String> {
        self.flag(BODY_WEIGHT_WARNING_FLAG_KEY)
    }

    pub fn set_last_body_weight_warning_shown(&self, iso_datetime: &str) -> Result<()> {
        self.kv.set(BODY_WEIGHT_WARNING_FLAG_KEY, iso_datetime)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Maintenance
    // ─────────────────────────────────────────────────────────────────────

    /// Wipes every stored collection and flag.
    pub fn clear_all(&self) -> Result<()> {
        self.kv.clear()
    }
}

/// First ten characters of a date string: the `YYYY-MM-DD` part of either a
/// bare date or a legacy full-ISO value.
pub fn date_prefix(value: &str) -> &str {
    match value.char_indices().nth(10) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

/// Parses a stored date (bare or legacy full-ISO) into a local calendar date.
pub fn parse_local_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_prefix(value), "%Y-%m-%d").ok()
}
