//! Built-in session types, default templates and the exercise catalog.
//!
//! Everything here is compiled-in reference data: the six built-in session
//! types with their default exercise lists, the predefined exercise catalog
//! shown in the picker, the muscle-group list, and the small string rules
//! that hang off exercise names (aerobic detection, assisted-weight sign
//! convention, accent-insensitive search, display shortening).

use crate::types::{Exercise, Series};
use once_cell::sync::Lazy;
use regex::Regex;

/// The aerobic muscle group; its exercises log time instead of reps/kg/rir.
pub const AEROBIC_GROUP: &str = "Aeróbico";

/// Built-in session type names, in selection order.
pub const SESSION_TYPES: [&str; 6] = [
    "Push",
    "Pull",
    "Piernas",
    "Sesión mixta",
    "Sesión libre",
    "Cardio",
];

/// Default number of empty sets when an exercise enters a session.
pub const DEFAULT_SERIES_COUNT: usize = 3;

/// Muscle groups offered when creating a custom exercise.
pub const MUSCLE_GROUPS: [&str; 14] = [
    "Pectoral",
    "Espalda",
    "Hombros",
    "Bíceps",
    "Tríceps",
    "Cuádriceps",
    "Femoral",
    "Abductores",
    "Aductores",
    "Gemelos",
    "Trapecio",
    "Abdomen",
    "Glúteos",
    "Aeróbico",
];

/// The predefined exercise picker catalog: (name, muscle group).
pub const PREDEFINED_EXERCISES: &[(&str, &str)] = &[
    // Pectoral
    ("Press banca", "Pectoral"),
    ("Press plano mancuernas", "Pectoral"),
    ("Press banca inclinado", "Pectoral"),
    ("Press inclinado mancuernas", "Pectoral"),
    ("Aperturas mancuernas", "Pectoral"),
    ("Press inclinado mancuernas Smith", "Pectoral"),
    ("Peck-Deck (Mariposa)", "Pectoral"),
    // Hombros
    ("Press militar", "Hombros"),
    ("Press militar mancuernas", "Hombros"),
    ("Extensión hombros polea", "Hombros"),
    ("Elevaciones laterales", "Hombros"),
    ("Elevaciones frontales", "Hombros"),
    ("Press inclinado mancuernas Smith", "Hombros"),
    ("Deltoides posterior", "Hombros"),
    // Tríceps
    ("Tríceps Katana", "Tríceps"),
    ("Extensión tríceps cable", "Tríceps"),
    ("Extensión tríceps mancuerna", "Tríceps"),
    ("Fondos paralelas", "Tríceps"),
    ("Fondos paralelas lastre", "Tríceps"),
    ("Press cerrado", "Tríceps"),
    ("Extensión tríceps polea", "Tríceps"),
    ("Triceps sentado", "Tríceps"),
    // Bíceps
    ("Curl bíceps mancuerna", "Bíceps"),
    ("Curl bíceps barra", "Bíceps"),
    ("Curl bíceps cable", "Bíceps"),
    ("Curl bíceps martillo", "Bíceps"),
    ("Curl bíceps concentrado", "Bíceps"),
    ("Curl bíceps predicador", "Bíceps"),
    ("Curl bíceps spider", "Bíceps"),
    // Espalda
    ("Remo barra", "Espalda"),
    ("Remo mancuernas", "Espalda"),
    ("Remo polea", "Espalda"),
    ("Remo T", "Espalda"),
    ("Jalón al pecho", "Espalda"),
    ("Dominadas", "Espalda"),
    ("Dominadas lastre", "Espalda"),
    // Cuádriceps
    ("Sentadillas", "Cuádriceps"),
    ("Sentadillas mancuernas", "Cuádriceps"),
    ("Sentadillas frontales", "Cuádriceps"),
    ("Prensa de piernas", "Cuádriceps"),
    ("Extensión piernas", "Cuádriceps"),
    ("Sentadillas búlgaras", "Cuádriceps"),
    ("Sentadillas búlgaras mancuernas", "Cuádriceps"),
    // Femoral
    ("Curl femoral acostado", "Femoral"),
    ("Curl femoral sentado", "Femoral"),
    ("Curl femoral de pie", "Femoral"),
    ("Peso muerto rumano", "Femoral"),
    ("Good mornings", "Femoral"),
    ("Curl femoral mancuerna", "Femoral"),
    // Abductores
    ("Abducción máquina", "Abductores"),
    ("Abducción cable", "Abductores"),
    ("Abducción banda", "Abductores"),
    ("Abducción mancuerna", "Abductores"),
    ("Abducción polea", "Abductores"),
    ("Abducción peso corporal", "Abductores"),
    // Aductores
    ("Aducción máquina", "Aductores"),
    ("Aducción cable", "Aductores"),
    ("Aducción banda", "Aductores"),
    ("Aducción mancuerna", "Aductores"),
    ("Aducción polea", "Aductores"),
    ("Aducción peso corporal", "Aductores"),
    // Gemelos
    ("Elevación de gemelos de pie", "Gemelos"),
    ("Elevación de gemelos sentado", "Gemelos"),
    ("Elevación de gemelos prensa", "Gemelos"),
    ("Elevación de gemelos mancuerna", "Gemelos"),
    ("Elevación de gemelos escalón", "Gemelos"),
    ("Elevación de gemelos con barra", "Gemelos"),
    // Aeróbico
    ("Cinta", "Aeróbico"),
    ("Bicicleta", "Aeróbico"),
    ("Bicicleta elíptica", "Aeróbico"),
    ("Entrada en calor", "Aeróbico"),
    ("Remorgómetro", "Aeróbico"),
    ("Running", "Aeróbico"),
    ("Bootcamp", "Aeróbico"),
];

// ─────────────────────────────────────────────────────────────────────────────
// Default Templates
// ─────────────────────────────────────────────────────────────────────────────

/// Builds a template exercise with the default empty sets.
pub fn template_exercise(name: &str, muscle: &str) -> Exercise {
    let aerobic = is_aerobic(muscle);
    Exercise {
        name: name.to_string(),
        muscle: muscle.to_string(),
        series: (0..DEFAULT_SERIES_COUNT)
            .map(|_| Series::empty(aerobic))
            .collect(),
    }
}

/// Returns the compiled-in default exercise list for a built-in session type,
/// or `None` for names that are not built-in types.
///
/// "Sesión libre" and "Cardio" intentionally start empty. Each call builds a
/// fresh list, so callers may mutate the result freely.
pub fn default_template(session_type: &str) -> Option<Vec<Exercise>> {
    let pairs: &[(&str, &str)] = match session_type {
        "Push" => &[
            ("Press banca", "Pectoral"),
            ("Extensiones de hombros polea", "Hombros"),
            ("Tríceps Katana", "Tríceps"),
            ("Press inclinado mancuernas", "Pectoral"),
            ("Elevaciones laterales", "Hombros"),
            ("Triceps sentado", "Tríceps"),
        ],
        "Pull" => &[
            ("Jalón al pecho", "Espalda"),
            ("Curl bíceps martillo", "Bíceps"),
            ("Dominadas lastre", "Espalda"),
            ("Curl bíceps mancuerna", "Bíceps"),
            ("Remo mancuernas", "Espalda"),
        ],
        "Piernas" => &[
            ("Extensiones de piernas", "Cuádriceps"),
            ("Curl femoral acostado", "Femoral"),
            ("Prensa de piernas", "Cuádriceps"),
            ("Aducción máquina", "Aductores"),
            ("Abducción máquina", "Abductores"),
            ("Elevación de gemelos de pie", "Gemelos"),
        ],
        "Sesión mixta" => &[
            ("Press plano mancuernas", "Pectoral"),
            ("Remo mancuernas", "Espalda"),
            ("Extensiones de hombros polea", "Hombros"),
            ("Curl bíceps martillo", "Bíceps"),
            ("Extensiones de tríceps mancuerna", "Tríceps"),
            ("Deltoides posterior", "Hombros"),
        ],
        "Sesión libre" | "Cardio" => &[],
        _ => return None,
    };
    Some(
        pairs
            .iter()
            .map(|(name, muscle)| template_exercise(name, muscle))
            .collect(),
    )
}

/// Whether a name is one of the six built-in session types.
pub fn is_builtin_type(name: &str) -> bool {
    SESSION_TYPES.contains(&name)
}

// ─────────────────────────────────────────────────────────────────────────────
// Name Rules
// ─────────────────────────────────────────────────────────────────────────────

/// Whether a muscle group logs time instead of reps/kg/rir.
pub fn is_aerobic(muscle: &str) -> bool {
    muscle == AEROBIC_GROUP
}

/// Whether an exercise stores assisted/counterweighted loads, which follow
/// the ≤ 0 weight sign convention.
pub fn allows_negative_weight(exercise_name: &str) -> bool {
    let lower = exercise_name.to_lowercase();
    lower.contains("lastre") || lower.contains("asistido") || lower.contains("asistida")
}

/// Lowercases and strips the diacritics the catalog uses, so searches match
/// regardless of accents ("jalon" finds "Jalón al pecho").
pub fn normalize_search(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// Filters the predefined catalog by an accent-insensitive substring match on
/// either the exercise name or the muscle group.
pub fn search_catalog(query: &str) -> Vec<(&'static str, &'static str)> {
    let needle = normalize_search(query);
    PREDEFINED_EXERCISES
        .iter()
        .filter(|(name, muscle)| {
            normalize_search(name).contains(&needle)
                || normalize_search(muscle).contains(&needle)
        })
        .copied()
        .collect()
}

/// Short display names for the wordier built-in types.
pub fn display_session_name(name: &str) -> &str {
    match name {
        "Sesión mixta" => "Mixta",
        "Sesión libre" => "Libre",
        other => other,
    }
}

static EXTENSIONES_DE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Extensiones de\s+").expect("valid regex"));

/// Display-only shortening of exercise names; storage keys never change.
pub fn display_exercise_name(name: &str) -> String {
    EXTENSIONES_DE.replace_all(name, "Extensión ").into_owned()
}
