//! The in-progress session: a disposable working copy edited in memory and
//! persisted exactly once, at finish.
//!
//! The lifecycle is Empty → Active → (finish) → Empty. All list edits are
//! plain methods over owned state with no interior mutability, so every
//! transition is unit-testable without a UI harness. Nothing here touches
//! storage except `finish` and the previous-record lookup.

use crate::catalog;
use crate::error::{EntrenoError, Result};
use crate::kv::KvStore;
use crate::store::Store;
use crate::template::ResolvedTemplate;
use crate::timer;
use crate::types::{Exercise, ExerciseHistory, Series, SessionRecord};
use chrono::NaiveDate;
use tracing::{debug, warn};

/// Session type recorded when the user never picked one.
pub const FREE_SESSION_TYPE: &str = "Sesión libre";

/// Which set field an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetField {
    Reps,
    Kg,
    Rir,
    Tiempo,
}

/// Result of trying to apply a new template over the working copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The template was applied.
    Applied,
    /// Edits exist; the caller must confirm before the template overwrites
    /// them. Nothing changed.
    ConfirmationRequired,
}

/// Emitted by `finish` so the caller resets both clocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignal {
    ResetAll,
}

/// A finished session plus the side signals the caller must honor.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedSession {
    pub record: SessionRecord,
    pub timer_signal: TimerSignal,
}

/// The routine a session was started from, carried into the saved record.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineTag {
    pub id: String,
    pub name: String,
}

/// The current session's working copy.
#[derive(Debug, Clone, Default)]
pub struct ActiveSession {
    session_type: Option<String>,
    exercises: Vec<Exercise>,
    active_routine: Option<RoutineTag>,
}

impl ActiveSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.session_type.is_none() && self.exercises.is_empty()
    }

    pub fn session_type(&self) -> Option<&str> {
        self.session_type.as_deref()
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn active_routine(&self) -> Option<&RoutineTag> {
        self.active_routine.as_ref()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Template Selection
    // ─────────────────────────────────────────────────────────────────────

    /// Applies a resolved template. Overwriting existing exercises is
    /// destructive, so it requires `confirmed` once any are present.
    /// Selecting a type directly drops any active routine tag.
    pub fn select_template(
        &mut self,
        template: ResolvedTemplate,
        confirmed: bool,
    ) -> SelectOutcome {
        if !self.exercises.is_empty() && !confirmed {
            return SelectOutcome::ConfirmationRequired;
        }
        self.active_routine = None;
        self.session_type = Some(template.name);
        self.exercises = template.exercises;
        SelectOutcome::Applied
    }

    /// Same as `select_template` but keeps the routine attribution, for
    /// sessions started through a routine.
    pub fn select_from_routine(
        &mut self,
        template: ResolvedTemplate,
        routine: RoutineTag,
        confirmed: bool,
    ) -> SelectOutcome {
        let outcome = self.select_template(template, confirmed);
        if outcome == SelectOutcome::Applied {
            self.active_routine = Some(routine);
        }
        outcome
    }

    // ─────────────────────────────────────────────────────────────────────
    // Exercise List Edits
    // ─────────────────────────────────────────────────────────────────────

    /// Appends an exercise with the default empty sets (tiempo iff aerobic).
    pub fn add_exercise(&mut self, name: &str, muscle: &str) {
        self.exercises.push(catalog::template_exercise(name, muscle));
    }

    /// Removes by index; out-of-range indices are ignored.
    pub fn remove_exercise(&mut self, index: usize) {
        if index < self.exercises.len() {
            self.exercises.remove(index);
        }
    }

    /// Swaps an exercise one slot up or down. Moves past either end are
    /// silently ignored.
    pub fn move_exercise(&mut self, index: usize, delta: isize) {
        let len = self.exercises.len() as isize;
        let target = index as isize + delta;
        if index as isize >= len || target < 0 || target >= len {
            return;
        }
        self.exercises.swap(index, target as usize);
    }

    /// Renames an exercise and/or changes its muscle group.
    pub fn edit_exercise(&mut self, index: usize, name: &str, muscle: &str) {
        if let Some(exercise) = self.exercises.get_mut(index) {
            exercise.name = name.to_string();
            exercise.muscle = muscle.to_string();
        }
    }

    /// Appends one empty set to an exercise.
    pub fn add_series(&mut self, exercise_index: usize) {
        if let Some(exercise) = self.exercises.get_mut(exercise_index) {
            let aerobic = catalog::is_aerobic(&exercise.muscle);
            exercise.series.push(Series::empty(aerobic));
        }
    }

    /// Removes one set; out-of-range indices are ignored.
    pub fn remove_series(&mut self, exercise_index: usize, series_index: usize) {
        if let Some(exercise) = self.exercises.get_mut(exercise_index) {
            if series_index < exercise.series.len() {
                exercise.series.remove(series_index);
            }
        }
    }

    /// Edits one field of one set. Weight input on assisted/counterweighted
    /// exercises is negated so stored `kg` stays ≤ 0; tiempo input is masked
    /// into clock format as typed.
    pub fn edit_set(
        &mut self,
        exercise_index: usize,
        series_index: usize,
        field: SetField,
        value: &str,
    ) {
        let Some(exercise) = self.exercises.get_mut(exercise_index) else {
            return;
        };
        let negate = catalog::allows_negative_weight(&exercise.name);
        let Some(series) = exercise.series.get_mut(series_index) else {
            return;
        };
        match field {
            SetField::Reps => series.reps = value.to_string(),
            SetField::Kg => series.kg = normalize_weight(value, negate),
            SetField::Rir => {
                if value.trim().is_empty() {
                    series.rir = None;
                } else if let Ok(rir) = value.trim().parse::<u32>() {
                    series.rir = Some(rir);
                } else {
                    debug!(value, "ignoring unparseable rir input");
                }
            }
            SetField::Tiempo => series.tiempo = Some(timer::mask_time_input(value)),
        }
    }

    /// Flips one set's completion flag. Never requires fields to be filled.
    pub fn toggle_done(&mut self, exercise_index: usize, series_index: usize) {
        if let Some(series) = self
            .exercises
            .get_mut(exercise_index)
            .and_then(|e| e.series.get_mut(series_index))
        {
            series.done = Some(!series.is_done());
        }
    }

    /// Number of sets not yet marked done, across all exercises.
    pub fn incomplete_series_count(&self) -> usize {
        self.exercises
            .iter()
            .flat_map(|e| e.series.iter())
            .filter(|s| !s.is_done())
            .count()
    }

    /// Most recent rolling-history entry per exercise, for "last time"
    /// display. Indexed the same as `exercises()`.
    pub fn previous_records<S: KvStore>(&self, store: &Store<S>) -> Vec<Option<ExerciseHistory>> {
        self.exercises
            .iter()
            .map(|e| store.last_exercise_record(&e.name))
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Finish
    // ─────────────────────────────────────────────────────────────────────

    /// Persists the working copy as a `SessionRecord` dated `date` and
    /// resets the lifecycle to Empty.
    ///
    /// Rejects dates after `today` before anything is written. On a failed
    /// session save the working copy is left intact so the user can retry.
    /// Per-exercise history appends are best-effort: failures are logged and
    /// never roll back the session save.
    pub fn finish<S: KvStore>(
        &mut self,
        store: &Store<S>,
        date: NaiveDate,
        today: NaiveDate,
        duration_secs: u64,
    ) -> Result<FinishedSession> {
        if date > today {
            return Err(EntrenoError::FutureSessionDate {
                date: date.format("%Y-%m-%d").to_string(),
            });
        }

        // Local calendar date string; never UTC-shifted.
        let date_str = date.format("%Y-%m-%d").to_string();
        let histories: Vec<ExerciseHistory> = self
            .exercises
            .iter()
            .map(|e| ExerciseHistory::from_exercise(e, &date_str))
            .collect();

        let record = SessionRecord {
            id: String::new(),
            kind: self
                .session_type
                .clone()
                .unwrap_or_else(|| FREE_SESSION_TYPE.to_string()),
            date: date_str,
            exercises: histories.clone(),
            duration_secs: Some(duration_secs),
            routine: self.active_routine.as_ref().map(|r| r.name.clone()),
            routine_id: self.active_routine.as_ref().map(|r| r.id.clone()),
        };

        let saved = store.save_session(record)?;

        for history in &histories {
            if let Err(err) = store.append_exercise_history(history) {
                warn!(exercise = %history.name, error = %err, "exercise history append failed");
            }
        }

        self.reset();
        Ok(FinishedSession {
            record: saved,
            timer_signal: TimerSignal::ResetAll,
        })
    }

    /// Back to Empty, discarding all edits.
    pub fn reset(&mut self) {
        self.session_type = None;
        self.exercises.clear();
        self.active_routine = None;
    }
}

/// Applies the weight sign convention: on assisted/counterweighted
/// exercises a positive numeric entry is stored negated.
fn normalize_weight(value: &str, negate: bool) -> String {
    if !negate {
        return value.to_string();
    }
    match value.trim().parse::<f64>() {
        Ok(n) if n > 0.0 => (-n).to_string(),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::FileKvStore;
    use crate::storage::StorageConfig;
    use crate::template::{resolve_template, TemplateSelector};
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, Store<FileKvStore>) {
        let dir = TempDir::new().unwrap();
        let kv = FileKvStore::new(StorageConfig::with_root(dir.path().to_path_buf()));
        (dir, Store::new(kv))
    }

    fn push_session(store: &Store<FileKvStore>) -> ActiveSession {
        let mut session = ActiveSession::new();
        let template =
            resolve_template(store, &TemplateSelector::Builtin("Push".to_string())).unwrap();
        assert_eq!(session.select_template(template, false), SelectOutcome::Applied);
        session
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_select_requires_confirmation_when_active() {
        let (_dir, store) = temp_store();
        let mut session = push_session(&store);

        let pull = resolve_template(&store, &TemplateSelector::Builtin("Pull".to_string())).unwrap();
        assert_eq!(
            session.select_template(pull.clone(), false),
            SelectOutcome::ConfirmationRequired
        );
        // Unconfirmed attempt changed nothing.
        assert_eq!(session.session_type(), Some("Push"));
        assert_eq!(session.exercises().len(), 6);

        assert_eq!(session.select_template(pull, true), SelectOutcome::Applied);
        assert_eq!(session.session_type(), Some("Pull"));
        assert_eq!(session.exercises().len(), 5);
    }

    #[test]
    fn test_weight_sign_normalization() {
        let (_dir, store) = temp_store();
        let mut session = push_session(&store);
        // "Dominadas lastre" requires a Pull template.
        let pull = resolve_template(&store, &TemplateSelector::Builtin("Pull".to_string())).unwrap();
        session.select_template(pull, true);
        let lastre = session
            .exercises()
            .iter()
            .position(|e| e.name == "Dominadas lastre")
            .unwrap();

        session.edit_set(lastre, 0, SetField::Kg, "20");
        assert_eq!(session.exercises()[lastre].series[0].kg, "-20");

        session.edit_set(lastre, 0, SetField::Kg, "-20");
        assert_eq!(session.exercises()[lastre].series[0].kg, "-20");

        // Regular exercises keep the entered sign.
        let jalon = session
            .exercises()
            .iter()
            .position(|e| e.name == "Jalón al pecho")
            .unwrap();
        session.edit_set(jalon, 0, SetField::Kg, "20");
        assert_eq!(session.exercises()[jalon].series[0].kg, "20");
    }

    #[test]
    fn test_move_exercise_clamps_at_bounds() {
        let (_dir, store) = temp_store();
        let mut session = push_session(&store);
        let first = session.exercises()[0].name.clone();

        session.move_exercise(0, -1);
        assert_eq!(session.exercises()[0].name, first);

        session.move_exercise(0, 1);
        assert_eq!(session.exercises()[1].name, first);

        session.move_exercise(5, 1);
        assert_eq!(session.exercises().len(), 6);
    }

    #[test]
    fn test_series_add_remove_and_aerobic_tiempo() {
        let (_dir, _store) = temp_store();
        let mut session = ActiveSession::new();
        session.add_exercise("Cinta", "Aeróbico");
        session.add_exercise("Press banca", "Pectoral");

        session.add_series(0);
        assert_eq!(session.exercises()[0].series.len(), 4);
        assert!(session.exercises()[0].series[3].tiempo.is_some());

        session.add_series(1);
        assert!(session.exercises()[1].series[3].tiempo.is_none());

        session.remove_series(0, 0);
        assert_eq!(session.exercises()[0].series.len(), 3);
        // Out of range: ignored.
        session.remove_series(0, 99);
        assert_eq!(session.exercises()[0].series.len(), 3);
    }

    #[test]
    fn test_tiempo_input_is_masked() {
        let mut session = ActiveSession::new();
        session.add_exercise("Running", "Aeróbico");
        session.edit_set(0, 0, SetField::Tiempo, "2530");
        assert_eq!(
            session.exercises()[0].series[0].tiempo.as_deref(),
            Some("25:30")
        );
    }

    #[test]
    fn test_rir_parsing() {
        let (_dir, _store) = temp_store();
        let mut session = ActiveSession::new();
        session.add_exercise("Press banca", "Pectoral");
        session.edit_set(0, 0, SetField::Rir, "2");
        assert_eq!(session.exercises()[0].series[0].rir, Some(2));
        session.edit_set(0, 0, SetField::Rir, "x");
        assert_eq!(session.exercises()[0].series[0].rir, Some(2));
        session.edit_set(0, 0, SetField::Rir, "");
        assert_eq!(session.exercises()[0].series[0].rir, None);
    }

    #[test]
    fn test_future_date_rejected_without_persisting() {
        let (_dir, store) = temp_store();
        let mut session = push_session(&store);
        let err = session.finish(&store, date("2026-08-24"), date("2026-08-23"), 100);
        assert!(matches!(err, Err(EntrenoError::FutureSessionDate { .. })));
        // Nothing was saved and the working copy survives for a retry.
        assert!(store.sessions().is_empty());
        assert_eq!(session.exercises().len(), 6);
    }

    #[test]
    fn test_finish_persists_and_resets() {
        let (_dir, store) = temp_store();
        let mut session = push_session(&store);
        session.toggle_done(0, 0);

        let finished = session
            .finish(&store, date("2026-08-23"), date("2026-08-23"), 3600)
            .unwrap();
        assert_eq!(finished.timer_signal, TimerSignal::ResetAll);
        assert_eq!(finished.record.kind, "Push");
        assert_eq!(finished.record.duration_secs, Some(3600));
        assert!(session.is_empty());

        let all = store.sessions();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].exercises.len(), 6);
        assert!(all[0].exercises.iter().all(|e| e.date == "2026-08-23"));

        // Rolling history got one entry per exercise.
        assert_eq!(store.exercise_history("Press banca").len(), 1);
        assert_eq!(store.exercise_history("Triceps sentado").len(), 1);
    }

    #[test]
    fn test_finish_without_type_records_free_session() {
        let (_dir, store) = temp_store();
        let mut session = ActiveSession::new();
        session.add_exercise("Cinta", "Aeróbico");
        let finished = session
            .finish(&store, date("2026-08-23"), date("2026-08-23"), 0)
            .unwrap();
        assert_eq!(finished.record.kind, FREE_SESSION_TYPE);
    }

    #[test]
    fn test_previous_records_line_up_with_exercises() {
        let (_dir, store) = temp_store();
        let mut first = ActiveSession::new();
        first.add_exercise("Remo barra", "Espalda");
        first
            .finish(&store, date("2026-08-20"), date("2026-08-23"), 0)
            .unwrap();

        let mut second = ActiveSession::new();
        second.add_exercise("Remo barra", "Espalda");
        second.add_exercise("Press banca", "Pectoral");
        let records = second.previous_records(&store);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].as_ref().unwrap().date, "2026-08-20");
        assert!(records[1].is_none());
    }

    #[test]
    fn test_incomplete_series_count_tracks_done_flags() {
        let (_dir, store) = temp_store();
        let mut session = push_session(&store);
        // 6 exercises × 3 sets, none done.
        assert_eq!(session.incomplete_series_count(), 18);
        for i in 0..6 {
            session.toggle_done(i, 0);
        }
        assert_eq!(session.incomplete_series_count(), 12);
        session.toggle_done(0, 0);
        assert_eq!(session.incomplete_series_count(), 13);
    }
}
