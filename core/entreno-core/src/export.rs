//! Export formatting: flattens sessions into row-per-series tables and
//! renders them as CSV.
//!
//! The library owns the row layout and the CSV text; writing files or
//! invoking a share sheet is the caller's job.

use crate::kv::KvStore;
use crate::store::{parse_local_date, Store};
use crate::timer::format_clock;
use crate::types::SessionRecord;
use chrono::{Datelike, NaiveDate};

/// Spanish month names, indexed by `month0`.
const MONTH_NAMES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// One exported set: a session flattened one row per series.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `YYYY-MM-DDT00:00:00` (sessions carry no time of day).
    pub datetime_iso: String,
    pub month_name: String,
    pub iso_week: u32,
    /// ISO weekday number, Monday = 1.
    pub weekday: u32,
    pub routine: String,
    pub routine_id: String,
    /// `HH:MM:SS`-style formatting of the session duration.
    pub duration_clock: String,
    pub duration_secs: u64,
    /// 1-based position of the exercise within the session.
    pub exercise_index: usize,
    /// 1-based set number within the exercise.
    pub set_number: usize,
    pub exercise: String,
    pub muscle: String,
    pub reps: String,
    pub kg: String,
    pub rir: String,
    pub tiempo: String,
    /// `reps × kg`, present only when both parse as numbers.
    pub volume: Option<f64>,
    /// Most recent body weight on or before the session date, if recorded.
    pub body_weight_kg: Option<f64>,
}

/// Flattens one session into rows. `body_weight_kg` comes from the caller so
/// a range export resolves each date once.
pub fn session_rows(record: &SessionRecord, body_weight_kg: Option<f64>) -> Vec<ExportRow> {
    let parsed = parse_local_date(&record.date);
    let date = parsed
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| record.date.clone());
    let datetime_iso = format!("{}T00:00:00", date);
    let (month_name, iso_week, weekday) = match parsed {
        Some(d) => (
            MONTH_NAMES[d.month0() as usize].to_string(),
            d.iso_week().week(),
            d.weekday().number_from_monday(),
        ),
        None => (String::new(), 0, 0),
    };
    let duration_secs = record.duration_secs.unwrap_or(0);

    let mut rows = Vec::new();
    for (exercise_index, exercise) in record.exercises.iter().enumerate() {
        for (set_index, series) in exercise.series.iter().enumerate() {
            rows.push(ExportRow {
                date: date.clone(),
                datetime_iso: datetime_iso.clone(),
                month_name: month_name.clone(),
                iso_week,
                weekday,
                routine: record.routine.clone().unwrap_or_default(),
                routine_id: record.routine_id.clone().unwrap_or_default(),
                duration_clock: format_clock(duration_secs),
                duration_secs,
                exercise_index: exercise_index + 1,
                set_number: set_index + 1,
                exercise: exercise.name.clone(),
                muscle: exercise.muscle.clone(),
                reps: series.reps.clone(),
                kg: series.kg.clone(),
                rir: series.rir.map(|r| r.to_string()).unwrap_or_default(),
                tiempo: series.tiempo.clone().unwrap_or_default(),
                volume: volume(&series.reps, &series.kg),
                body_weight_kg,
            });
        }
    }
    rows
}

/// Rows for every session within an inclusive local date range, resolving
/// each session's as-of body weight through the gateway.
pub fn range_rows<S: KvStore>(
    store: &Store<S>,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<ExportRow> {
    store
        .sessions_between(from, to)
        .iter()
        .flat_map(|record| {
            let weight = parse_local_date(&record.date).and_then(|d| store.body_weight_at(d));
            session_rows(record, weight)
        })
        .collect()
}

/// Rows for a single local day.
pub fn day_rows<S: KvStore>(store: &Store<S>, day: NaiveDate) -> Vec<ExportRow> {
    range_rows(store, day, day)
}

// ─────────────────────────────────────────────────────────────────────────────
// CSV
// ─────────────────────────────────────────────────────────────────────────────

const CSV_HEADER: &[&str] = &[
    "Fecha",
    "Fecha ISO",
    "Mes",
    "Semana ISO",
    "Día semana",
    "Rutina",
    "Rutina ID",
    "Duración",
    "Duración (s)",
    "Ejercicio N°",
    "Serie",
    "Ejercicio",
    "Músculo",
    "Repeticiones",
    "Peso (kg)",
    "RIR",
    "Tiempo",
    "Volumen",
    "Peso corporal (kg)",
];

/// Renders rows as RFC4180-ish CSV: comma-separated, fields quoted when they
/// need it, embedded quotes doubled, CRLF-free.
pub fn to_csv(rows: &[ExportRow]) -> String {
    let mut out = String::new();
    out.push_str(&CSV_HEADER.join(","));
    out.push('\n');
    for row in rows {
        let fields = [
            row.date.clone(),
            row.datetime_iso.clone(),
            row.month_name.clone(),
            row.iso_week.to_string(),
            row.weekday.to_string(),
            row.routine.clone(),
            row.routine_id.clone(),
            row.duration_clock.clone(),
            row.duration_secs.to_string(),
            row.exercise_index.to_string(),
            row.set_number.to_string(),
            row.exercise.clone(),
            row.muscle.clone(),
            row.reps.clone(),
            row.kg.clone(),
            row.rir.clone(),
            row.tiempo.clone(),
            row.volume.map(format_number).unwrap_or_default(),
            row.body_weight_kg.map(format_number).unwrap_or_default(),
        ];
        let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Trims the trailing `.0` floats pick up on whole numbers.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn volume(reps: &str, kg: &str) -> Option<f64> {
    let r: f64 = reps.trim().parse().ok()?;
    let k: f64 = kg.trim().parse().ok()?;
    Some(r * k)
}
