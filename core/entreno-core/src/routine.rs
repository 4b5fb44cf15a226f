//! Routine management: seed routines and JSON import/export.
//!
//! Imported routine files come from outside the app, so their content is
//! validated before anything is saved; malformed input is rejected with a
//! user-visible error, never silently accepted.

use crate::error::{EntrenoError, Result};
use crate::kv::KvStore;
use crate::store::Store;
use crate::types::{RefKind, Routine, SessionRef};
use serde::Deserialize;
use tracing::warn;

/// Builds the three seed routines, without ids.
fn seed_routines() -> Vec<Routine> {
    let default_ref = |key: &str| SessionRef {
        kind: RefKind::Default,
        key: key.to_string(),
    };
    vec![
        Routine {
            id: String::new(),
            name: "Push-Pull-Piernas".to_string(),
            session_refs: vec![default_ref("Push"), default_ref("Pull"), default_ref("Piernas")],
        },
        Routine {
            id: String::new(),
            name: "Upper-Lower".to_string(),
            session_refs: vec![default_ref("Sesión mixta"), default_ref("Piernas")],
        },
        Routine {
            id: String::new(),
            name: "Cardio semanal".to_string(),
            session_refs: vec![default_ref("Cardio")],
        },
    ]
}

/// Ensures the seed routines exist, matching by case-insensitive name. A
/// seed that exists with an empty reference list is backfilled with the
/// suggested references. Failures are logged and skipped; seeding is never
/// allowed to block startup.
pub fn ensure_seed_routines<S: KvStore>(store: &Store<S>) -> Vec<Routine> {
    let mut existing = store.routines();
    for seed in seed_routines() {
        let found = existing
            .iter()
            .find(|r| r.name.to_lowercase() == seed.name.to_lowercase());
        match found {
            None => {
                if let Err(err) = store.save_routine(seed.clone()) {
                    warn!(routine = %seed.name, error = %err, "failed to seed routine");
                }
            }
            Some(present) if present.session_refs.is_empty() => {
                let backfilled = Routine {
                    session_refs: seed.session_refs.clone(),
                    ..present.clone()
                };
                if !store.update_routine(&backfilled) {
                    warn!(routine = %seed.name, "failed to backfill seed routine");
                }
            }
            Some(_) => {}
        }
        existing = store.routines();
    }
    existing
}

// ─────────────────────────────────────────────────────────────────────────────
// Import / Export
// ─────────────────────────────────────────────────────────────────────────────

/// The shape a routine file must have. The id is ignored on import; the
/// gateway assigns a fresh one.
#[derive(Debug, Deserialize)]
struct RoutineFile {
    name: String,
    #[serde(rename = "sessionRefs")]
    session_refs: Vec<SessionRef>,
}

/// Serializes a routine for sharing as a standalone JSON file.
pub fn export_routine_json(routine: &Routine) -> Result<String> {
    serde_json::to_string_pretty(routine).map_err(|e| EntrenoError::Json {
        context: format!("serializing routine {}", routine.name),
        source: e,
    })
}

/// Validates and saves a routine from raw file content. Strips a UTF-8 BOM,
/// requires a non-empty name and a well-formed reference list.
pub fn import_routine<S: KvStore>(store: &Store<S>, raw: &str) -> Result<Routine> {
    let content = raw.trim_start_matches('\u{feff}');
    let parsed: RoutineFile =
        serde_json::from_str(content).map_err(|e| EntrenoError::RoutineImportInvalid {
            details: e.to_string(),
        })?;
    let name = parsed.name.trim();
    if name.is_empty() {
        return Err(EntrenoError::RoutineImportInvalid {
            details: "routine name is empty".to_string(),
        });
    }
    store.save_routine(Routine {
        id: String::new(),
        name: name.to_string(),
        session_refs: parsed.session_refs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::FileKvStore;
    use crate::storage::StorageConfig;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, Store<FileKvStore>) {
        let dir = TempDir::new().unwrap();
        let kv = FileKvStore::new(StorageConfig::with_root(dir.path().to_path_buf()));
        (dir, Store::new(kv))
    }

    #[test]
    fn test_seeding_is_idempotent() {
        let (_dir, store) = temp_store();
        let first = ensure_seed_routines(&store);
        assert_eq!(first.len(), 3);
        let second = ensure_seed_routines(&store);
        assert_eq!(second.len(), 3);

        let names: Vec<&str> = second.iter().map(|r| r.name.as_str()).collect();
        assert!(names.contains(&"Push-Pull-Piernas"));
        assert!(names.contains(&"Upper-Lower"));
        assert!(names.contains(&"Cardio semanal"));
    }

    #[test]
    fn test_seeding_matches_case_insensitively() {
        let (_dir, store) = temp_store();
        store
            .save_routine(Routine {
                id: String::new(),
                name: "push-pull-piernas".to_string(),
                session_refs: vec![SessionRef {
                    kind: RefKind::Default,
                    key: "Push".to_string(),
                }],
            })
            .unwrap();
        let routines = ensure_seed_routines(&store);
        let ppl: Vec<&Routine> = routines
            .iter()
            .filter(|r| r.name.to_lowercase() == "push-pull-piernas")
            .collect();
        assert_eq!(ppl.len(), 1);
        // The user's variant kept its single reference.
        assert_eq!(ppl[0].session_refs.len(), 1);
    }

    #[test]
    fn test_seeding_backfills_empty_refs() {
        let (_dir, store) = temp_store();
        store
            .save_routine(Routine {
                id: String::new(),
                name: "Upper-Lower".to_string(),
                session_refs: Vec::new(),
            })
            .unwrap();
        let routines = ensure_seed_routines(&store);
        let upper = routines.iter().find(|r| r.name == "Upper-Lower").unwrap();
        assert_eq!(upper.session_refs.len(), 2);
    }

    #[test]
    fn test_import_round_trip() {
        let (_dir, store) = temp_store();
        let original = Routine {
            id: "ignored".to_string(),
            name: "Mi plan".to_string(),
            session_refs: vec![SessionRef {
                kind: RefKind::Default,
                key: "Push".to_string(),
            }],
        };
        let json = export_routine_json(&original).unwrap();
        let imported = import_routine(&store, &json).unwrap();
        assert_eq!(imported.name, "Mi plan");
        assert_eq!(imported.session_refs, original.session_refs);
        assert_ne!(imported.id, "ignored");
    }

    #[test]
    fn test_import_strips_bom() {
        let (_dir, store) = temp_store();
        let json = "\u{feff}{\"name\":\"Plan\",\"sessionRefs\":[]}";
        let imported = import_routine(&store, json).unwrap();
        assert_eq!(imported.name, "Plan");
    }

    #[test]
    fn test_import_rejects_malformed() {
        let (_dir, store) = temp_store();
        assert!(matches!(
            import_routine(&store, "not json"),
            Err(EntrenoError::RoutineImportInvalid { .. })
        ));
        assert!(matches!(
            import_routine(&store, "{\"name\":\"   \",\"sessionRefs\":[]}"),
            Err(EntrenoError::RoutineImportInvalid { .. })
        ));
        assert!(matches!(
            import_routine(&store, "{\"name\":\"Plan\"}"),
            Err(EntrenoError::RoutineImportInvalid { .. })
        ));
        assert!(matches!(
            import_routine(
                &store,
                "{\"name\":\"Plan\",\"sessionRefs\":[{\"type\":\"weird\",\"key\":\"x\"}]}"
            ),
            Err(EntrenoError::RoutineImportInvalid { .. })
        ));
        assert!(store.routines().is_empty());
    }
}
