//! Implementations for every subcommand. Each function prints its own
//! output and returns `Err(String)` for anything that should end the
//! process with a failure.

use chrono::{Local, NaiveDate};
use entreno_core::template::{resolve_template, selectable_types, TemplateSelector};
use entreno_core::{catalog, export, routine, StorageConfig};
use entreno_core::{FileKvStore, SessionRecord, Store};
use std::path::{Path, PathBuf};

pub fn open_store() -> Store<FileKvStore> {
    Store::new(FileKvStore::new(StorageConfig::default()))
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", value))
}

// ─────────────────────────────────────────────────────────────────────────────
// Session Types and Templates
// ─────────────────────────────────────────────────────────────────────────────

pub fn types(store: &Store<FileKvStore>) -> Result<(), String> {
    for name in selectable_types(store) {
        println!("{}", catalog::display_session_name(&name));
    }
    Ok(())
}

pub fn template(store: &Store<FileKvStore>, name: &str) -> Result<(), String> {
    let resolved = resolve_template(store, &TemplateSelector::Builtin(name.to_string()))?;
    println!("{} ({} ejercicios)", resolved.name, resolved.exercises.len());
    for exercise in &resolved.exercises {
        println!(
            "  {} [{}] x{}",
            catalog::display_exercise_name(&exercise.name),
            exercise.muscle,
            exercise.series.len()
        );
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Sessions
// ─────────────────────────────────────────────────────────────────────────────

fn session_summary(record: &SessionRecord) -> String {
    format!(
        "{}  {}  {}  ({} ejercicios)",
        record.id,
        record.date,
        catalog::display_session_name(&record.kind),
        record.exercises.len()
    )
}

pub fn sessions_list(store: &Store<FileKvStore>) -> Result<(), String> {
    let sessions = store.sessions();
    if sessions.is_empty() {
        println!("No hay sesiones guardadas.");
        return Ok(());
    }
    for record in &sessions {
        println!("{}", session_summary(record));
    }
    Ok(())
}

pub fn sessions_show(store: &Store<FileKvStore>, id: &str) -> Result<(), String> {
    let record = store
        .sessions()
        .into_iter()
        .find(|s| s.id == id)
        .ok_or_else(|| format!("no session with id {}", id))?;
    println!("{}", session_summary(&record));
    for exercise in &record.exercises {
        println!("  {} [{}]", exercise.name, exercise.muscle);
        for (i, series) in exercise.series.iter().enumerate() {
            let mark = if series.is_done() { "x" } else { " " };
            let rir = series.rir.map(|r| format!(" RIR {}", r)).unwrap_or_default();
            let tiempo = series
                .tiempo
                .as_deref()
                .filter(|t| !t.is_empty())
                .map(|t| format!(" {}", t))
                .unwrap_or_default();
            println!(
                "    [{}] serie {}: {} reps, {} kg{}{}",
                mark,
                i + 1,
                series.reps,
                series.kg,
                rir,
                tiempo
            );
        }
    }
    Ok(())
}

pub fn sessions_delete(store: &Store<FileKvStore>, id: &str) -> Result<(), String> {
    if store.delete_session(id) {
        println!("Sesión {} eliminada.", id);
        Ok(())
    } else {
        Err(format!("no session with id {}", id))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Body Weight
// ─────────────────────────────────────────────────────────────────────────────

pub fn weight_add(
    store: &Store<FileKvStore>,
    kg: f64,
    date: Option<&str>,
) -> Result<(), String> {
    let date = match date {
        Some(raw) => parse_date(raw)?.format("%Y-%m-%d").to_string(),
        None => Local::now().date_naive().format("%Y-%m-%d").to_string(),
    };
    let saved = store.add_body_weight(&date, kg)?;
    println!("{}  {} kg  ({})", saved.date_iso, saved.weight_kg, saved.id);
    Ok(())
}

pub fn weight_list(store: &Store<FileKvStore>) -> Result<(), String> {
    let weights = store.body_weights();
    if weights.is_empty() {
        println!("No hay registros de peso corporal.");
        return Ok(());
    }
    for record in &weights {
        println!("{}  {} kg  ({})", record.date_iso, record.weight_kg, record.id);
    }
    Ok(())
}

pub fn weight_delete(store: &Store<FileKvStore>, id: &str) -> Result<(), String> {
    if store.delete_body_weight(id) {
        println!("Registro {} eliminado.", id);
        Ok(())
    } else {
        Err(format!("no body weight record with id {}", id))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Routines
// ─────────────────────────────────────────────────────────────────────────────

pub fn routines_list(store: &Store<FileKvStore>) -> Result<(), String> {
    for r in routine::ensure_seed_routines(store) {
        let keys: Vec<&str> = r.session_refs.iter().map(|s| s.key.as_str()).collect();
        println!("{}  {}  [{}]", r.id, r.name, keys.join(", "));
    }
    Ok(())
}

pub fn routines_import(store: &Store<FileKvStore>, file: &Path) -> Result<(), String> {
    let raw = fs_err::read_to_string(file).map_err(|e| e.to_string())?;
    let imported = routine::import_routine(store, &raw)?;
    println!("Rutina '{}' importada ({}).", imported.name, imported.id);
    Ok(())
}

pub fn routines_export(
    store: &Store<FileKvStore>,
    id: &str,
    out: Option<PathBuf>,
) -> Result<(), String> {
    let found = store
        .routine(id)
        .ok_or_else(|| format!("no routine with id {}", id))?;
    let json = routine::export_routine_json(&found)?;
    match out {
        Some(path) => {
            fs_err::write(&path, json).map_err(|e| e.to_string())?;
            println!("Rutina exportada a {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Export
// ─────────────────────────────────────────────────────────────────────────────

pub fn export_csv(
    store: &Store<FileKvStore>,
    from: &str,
    to: &str,
    out: Option<PathBuf>,
) -> Result<(), String> {
    let from = parse_date(from)?;
    let to = parse_date(to)?;
    if from > to {
        return Err("'--from' must not be after '--to'".to_string());
    }

    let rows = export::range_rows(store, from, to);
    let csv = export::to_csv(&rows);
    let path = match out {
        Some(path) => path,
        None => {
            let dir = StorageConfig::default().exports_dir();
            fs_err::create_dir_all(&dir).map_err(|e| e.to_string())?;
            dir.join(format!(
                "entreno_{}_{}.csv",
                from.format("%Y-%m-%d"),
                to.format("%Y-%m-%d")
            ))
        }
    };
    fs_err::write(&path, csv).map_err(|e| e.to_string())?;
    println!("{} series exportadas a {}", rows.len(), path.display());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Catalog and Maintenance
// ─────────────────────────────────────────────────────────────────────────────

pub fn catalog_search(query: &str) -> Result<(), String> {
    let matches = catalog::search_catalog(query);
    if matches.is_empty() {
        println!("Sin resultados para '{}'.", query);
        return Ok(());
    }
    for (name, muscle) in matches {
        println!("{} [{}]", name, muscle);
    }
    Ok(())
}

pub fn clear_data(store: &Store<FileKvStore>, yes: bool) -> Result<(), String> {
    if !yes {
        return Err("refusing to clear data without --yes".to_string());
    }
    store.clear_all()?;
    println!("Todos los datos han sido eliminados.");
    Ok(())
}
