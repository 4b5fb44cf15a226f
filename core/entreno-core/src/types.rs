//! Domain types shared across the library.
//!
//! Serde renames preserve the JSON key names the app has always persisted
//! (`ejercicio`, `musculo`, `fecha`, ...), so existing data files load
//! unchanged. Conversions between the in-session `Exercise` shape and the
//! persisted `ExerciseHistory` shape are explicit and total in both
//! directions; nothing relies on structural compatibility.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Sets and Exercises
// ─────────────────────────────────────────────────────────────────────────────

/// One set of an exercise.
///
/// For aerobic exercises `tiempo` is the authoritative field; for everything
/// else `reps`/`kg`/`rir` are. `kg` follows the sign convention applied at
/// edit time: assisted/counterweighted exercises store weights ≤ 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Repetitions, free-text numeric string (empty until filled in).
    #[serde(default)]
    pub reps: String,

    /// Weight in kilograms, free-text numeric string.
    #[serde(default)]
    pub kg: String,

    /// Reps in reserve; absent until the user logs it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rir: Option<u32>,

    /// MM:SS or HH:MM:SS duration, present only on aerobic exercises.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiempo: Option<String>,

    /// Manual completion flag; a set counts as done only when `Some(true)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
}

impl Series {
    /// An unfilled set. Aerobic sets carry an empty `tiempo` field so the
    /// serialized shape distinguishes them from strength sets.
    pub fn empty(aerobic: bool) -> Self {
        Self {
            reps: String::new(),
            kg: String::new(),
            rir: None,
            tiempo: if aerobic { Some(String::new()) } else { None },
            done: Some(false),
        }
    }

    pub fn is_done(&self) -> bool {
        self.done == Some(true)
    }
}

/// An exercise inside the in-progress session (no date attached yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    #[serde(rename = "ejercicio")]
    pub name: String,

    #[serde(rename = "musculo")]
    pub muscle: String,

    pub series: Vec<Series>,
}

impl Exercise {
    /// An exercise is complete only when every set is manually marked done,
    /// regardless of whether its fields are filled.
    pub fn is_complete(&self) -> bool {
        !self.series.is_empty() && self.series.iter().all(Series::is_done)
    }
}

/// An exercise snapshot tagged with the local calendar date it was performed.
///
/// Written only when a session finishes: embedded in the `SessionRecord` and
/// prepended to the per-exercise rolling history. Template data reuses this
/// shape with an empty `fecha`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseHistory {
    #[serde(rename = "ejercicio")]
    pub name: String,

    #[serde(rename = "musculo")]
    pub muscle: String,

    pub series: Vec<Series>,

    /// Local calendar date, `YYYY-MM-DD`. Legacy records may hold a full ISO
    /// datetime; comparisons use the date prefix.
    #[serde(rename = "fecha", default)]
    pub date: String,
}

impl ExerciseHistory {
    /// Snapshots an in-session exercise under the given local date string.
    pub fn from_exercise(exercise: &Exercise, date: &str) -> Self {
        Self {
            name: exercise.name.clone(),
            muscle: exercise.muscle.clone(),
            series: exercise.series.clone(),
            date: date.to_string(),
        }
    }

    /// Drops the date, returning the bare in-session shape.
    pub fn into_exercise(self) -> Exercise {
        Exercise {
            name: self.name,
            muscle: self.muscle,
            series: self.series,
        }
    }
}

impl From<ExerciseHistory> for Exercise {
    fn from(history: ExerciseHistory) -> Self {
        history.into_exercise()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Persisted Records
// ─────────────────────────────────────────────────────────────────────────────

/// A finished workout. Created exactly once, at session finish, and immutable
/// afterwards except for deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,

    /// Session type name ("Push", "Cardio", a custom session name, ...).
    #[serde(rename = "tipo")]
    pub kind: String,

    /// Local calendar date, `YYYY-MM-DD`.
    #[serde(rename = "fecha")]
    pub date: String,

    #[serde(rename = "ejercicios")]
    pub exercises: Vec<ExerciseHistory>,

    /// Count-up clock value at finish, in seconds. Never recomputed.
    #[serde(rename = "duracion", default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u64>,

    /// Name of the routine active when the session was saved, if any.
    #[serde(rename = "rutina", default, skip_serializing_if = "Option::is_none")]
    pub routine: Option<String>,

    #[serde(rename = "rutinaId", default, skip_serializing_if = "Option::is_none")]
    pub routine_id: Option<String>,
}

/// A user-defined named template, distinct from finished sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomSession {
    pub id: String,
    pub name: String,
    pub exercises: Vec<Exercise>,
}

/// Which namespace a routine entry points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    /// `key` is a built-in session type name.
    Default,
    /// `key` is a custom session id.
    Custom,
}

/// A reference to a session template (built-in by name or custom by id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRef {
    #[serde(rename = "type")]
    pub kind: RefKind,
    pub key: String,
}

/// An ordered list of template references, for multi-day training plans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    pub id: String,
    pub name: String,
    #[serde(rename = "sessionRefs", default)]
    pub session_refs: Vec<SessionRef>,
}

/// A body-weight measurement, independent of any session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyWeightRecord {
    pub id: String,

    /// `YYYY-MM-DD` or a full ISO datetime; comparisons use the date prefix.
    #[serde(rename = "dateISO")]
    pub date_iso: String,

    #[serde(rename = "weightKg")]
    pub weight_kg: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_round_trips_legacy_json() {
        // Older records omit tiempo/done entirely.
        let raw = r#"{"reps":"8","kg":"60","rir":2}"#;
        let series: Series = serde_json::from_str(raw).unwrap();
        assert_eq!(series.reps, "8");
        assert_eq!(series.rir, Some(2));
        assert_eq!(series.tiempo, None);
        assert!(!series.is_done());
    }

    #[test]
    fn test_exercise_serializes_spanish_keys() {
        let exercise = Exercise {
            name: "Press banca".to_string(),
            muscle: "Pectoral".to_string(),
            series: vec![Series::empty(false)],
        };
        let json = serde_json::to_string(&exercise).unwrap();
        assert!(json.contains("\"ejercicio\":\"Press banca\""));
        assert!(json.contains("\"musculo\":\"Pectoral\""));
    }

    #[test]
    fn test_history_conversion_is_total_both_ways() {
        let exercise = Exercise {
            name: "Cinta".to_string(),
            muscle: "Aeróbico".to_string(),
            series: vec![Series::empty(true)],
        };
        let history = ExerciseHistory::from_exercise(&exercise, "2026-08-23");
        assert_eq!(history.date, "2026-08-23");

        let back = history.into_exercise();
        assert_eq!(back, exercise);
    }

    #[test]
    fn test_history_accepts_template_without_date() {
        let raw = r#"{"ejercicio":"Remo barra","musculo":"Espalda","series":[]}"#;
        let history: ExerciseHistory = serde_json::from_str(raw).unwrap();
        assert_eq!(history.date, "");
    }

    #[test]
    fn test_routine_ref_kind_tags() {
        let raw = r#"{"id":"1","name":"PPL","sessionRefs":[{"type":"default","key":"Push"},{"type":"custom","key":"abc"}]}"#;
        let routine: Routine = serde_json::from_str(raw).unwrap();
        assert_eq!(routine.session_refs[0].kind, RefKind::Default);
        assert_eq!(routine.session_refs[1].kind, RefKind::Custom);
    }

    #[test]
    fn test_exercise_complete_requires_all_done() {
        let mut exercise = Exercise {
            name: "Press banca".to_string(),
            muscle: "Pectoral".to_string(),
            series: vec![Series::empty(false), Series::empty(false)],
        };
        assert!(!exercise.is_complete());
        exercise.series[0].done = Some(true);
        assert!(!exercise.is_complete());
        exercise.series[1].done = Some(true);
        assert!(exercise.is_complete());
    }
}
