//! Template resolution: from a session-type selector to the exercise list a
//! new session starts with.
//!
//! Precedence for built-in types: the user's stored override wins; otherwise
//! the compiled-in default list, freshly built on every call so edits to the
//! active session never bleed into the template. Deleted built-in types are
//! hidden from selection but still resolve when a routine references them;
//! deletion hides, it never purges.

use crate::catalog;
use crate::error::{EntrenoError, Result};
use crate::kv::KvStore;
use crate::store::Store;
use crate::types::{Exercise, RefKind, Routine, SessionRef};

/// What a session is started from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSelector {
    /// A built-in type, by name.
    Builtin(String),
    /// A custom session, by id.
    Custom(String),
}

impl TemplateSelector {
    pub fn from_ref(session_ref: &SessionRef) -> Self {
        match session_ref.kind {
            RefKind::Default => TemplateSelector::Builtin(session_ref.key.clone()),
            RefKind::Custom => TemplateSelector::Custom(session_ref.key.clone()),
        }
    }
}

/// A resolved template: the display name of the source plus its exercises.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTemplate {
    pub name: String,
    pub exercises: Vec<Exercise>,
}

/// Resolves a selector into the exercise list to seed a session with.
///
/// Empty templates ("Sesión libre", "Cardio") are valid results, not errors.
pub fn resolve_template<S: KvStore>(
    store: &Store<S>,
    selector: &TemplateSelector,
) -> Result<ResolvedTemplate> {
    match selector {
        TemplateSelector::Builtin(name) => {
            if !catalog::is_builtin_type(name) {
                return Err(EntrenoError::SessionTypeUnknown { name: name.clone() });
            }
            let overrides = store.session_type_overrides();
            let exercises = match overrides.get(name.as_str()) {
                Some(edited) => edited
                    .iter()
                    .cloned()
                    .map(|h| h.into_exercise())
                    .collect(),
                None => catalog::default_template(name)
                    .unwrap_or_default(),
            };
            Ok(ResolvedTemplate {
                name: name.clone(),
                exercises,
            })
        }
        TemplateSelector::Custom(id) => {
            let custom = store
                .custom_session(id)
                .ok_or_else(|| EntrenoError::CustomSessionNotFound { id: id.clone() })?;
            Ok(ResolvedTemplate {
                name: custom.name,
                exercises: custom.exercises,
            })
        }
    }
}

/// Built-in types offered in the selection UI: the fixed six minus the ones
/// the user has hidden.
pub fn selectable_types<S: KvStore>(store: &Store<S>) -> Vec<String> {
    let deleted = store.deleted_session_types();
    catalog::SESSION_TYPES
        .iter()
        .filter(|name| !deleted.iter().any(|d| d == *name))
        .map(|name| name.to_string())
        .collect()
}

/// Outcome of starting a routine.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutineStart {
    /// Exactly one referenced template: load it directly.
    Direct(ResolvedTemplate),
    /// Several referenced templates: the user picks one.
    Choice(Vec<SessionRef>),
}

/// Starts a routine: one reference resolves immediately (even if the
/// referenced built-in type has been hidden), several hand the choice back.
pub fn start_routine<S: KvStore>(store: &Store<S>, routine: &Routine) -> Result<RoutineStart> {
    match routine.session_refs.as_slice() {
        [single] => {
            let resolved = resolve_template(store, &TemplateSelector::from_ref(single))?;
            Ok(RoutineStart::Direct(resolved))
        }
        refs => Ok(RoutineStart::Choice(refs.to_vec())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::FileKvStore;
    use crate::storage::StorageConfig;
    use crate::types::{CustomSession, ExerciseHistory, Series};
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, Store<FileKvStore>) {
        let dir = TempDir::new().unwrap();
        let kv = FileKvStore::new(StorageConfig::with_root(dir.path().to_path_buf()));
        (dir, Store::new(kv))
    }

    #[test]
    fn test_defaults_resolve_and_deep_copy() {
        let (_dir, store) = temp_store();
        let selector = TemplateSelector::Builtin("Push".to_string());

        let mut first = resolve_template(&store, &selector).unwrap();
        assert_eq!(first.exercises.len(), 6);

        // Mutating one resolution must not leak into the next.
        first.exercises[0].series[0].reps = "10".to_string();
        let second = resolve_template(&store, &selector).unwrap();
        assert!(second.exercises[0].series[0].reps.is_empty());
    }

    #[test]
    fn test_override_takes_precedence_over_defaults() {
        let (_dir, store) = temp_store();
        let edited = vec![ExerciseHistory {
            name: "Press militar".to_string(),
            muscle: "Hombros".to_string(),
            series: vec![Series::empty(false)],
            date: String::new(),
        }];
        assert!(store.update_session_type_override("Push", edited));

        let resolved =
            resolve_template(&store, &TemplateSelector::Builtin("Push".to_string())).unwrap();
        assert_eq!(resolved.exercises.len(), 1);
        assert_eq!(resolved.exercises[0].name, "Press militar");
    }

    #[test]
    fn test_empty_builtins_are_valid() {
        let (_dir, store) = temp_store();
        let resolved =
            resolve_template(&store, &TemplateSelector::Builtin("Cardio".to_string())).unwrap();
        assert!(resolved.exercises.is_empty());
    }

    #[test]
    fn test_unknown_builtin_rejected() {
        let (_dir, store) = temp_store();
        let err = resolve_template(&store, &TemplateSelector::Builtin("Yoga".to_string()));
        assert!(matches!(
            err,
            Err(EntrenoError::SessionTypeUnknown { .. })
        ));
    }

    #[test]
    fn test_custom_session_by_id() {
        let (_dir, store) = temp_store();
        let saved = store
            .save_custom_session(CustomSession {
                id: String::new(),
                name: "Mi rutina corta".to_string(),
                exercises: vec![catalog::template_exercise("Sentadillas", "Cuádriceps")],
            })
            .unwrap();

        let resolved =
            resolve_template(&store, &TemplateSelector::Custom(saved.id.clone())).unwrap();
        assert_eq!(resolved.name, "Mi rutina corta");
        assert_eq!(resolved.exercises.len(), 1);

        let missing = resolve_template(&store, &TemplateSelector::Custom("nope".to_string()));
        assert!(matches!(
            missing,
            Err(EntrenoError::CustomSessionNotFound { .. })
        ));
    }

    #[test]
    fn test_deleted_type_hidden_but_resolvable() {
        let (_dir, store) = temp_store();
        store.add_deleted_session_type("Pull").unwrap();

        let selectable = selectable_types(&store);
        assert!(!selectable.contains(&"Pull".to_string()));
        assert!(selectable.contains(&"Push".to_string()));

        // A routine reference to the hidden type must still resolve.
        let resolved =
            resolve_template(&store, &TemplateSelector::Builtin("Pull".to_string())).unwrap();
        assert_eq!(resolved.exercises.len(), 5);
    }

    #[test]
    fn test_routine_start_direct_vs_choice() {
        let (_dir, store) = temp_store();
        let one_ref = Routine {
            id: "r1".to_string(),
            name: "Cardio semanal".to_string(),
            session_refs: vec![SessionRef {
                kind: RefKind::Default,
                key: "Cardio".to_string(),
            }],
        };
        match start_routine(&store, &one_ref).unwrap() {
            RoutineStart::Direct(resolved) => assert_eq!(resolved.name, "Cardio"),
            other => panic!("expected direct start, got {:?}", other),
        }

        let many = Routine {
            id: "r2".to_string(),
            name: "PPL".to_string(),
            session_refs: ["Push", "Pull", "Piernas"]
                .iter()
                .map(|key| SessionRef {
                    kind: RefKind::Default,
                    key: key.to_string(),
                })
                .collect(),
        };
        match start_routine(&store, &many).unwrap() {
            RoutineStart::Choice(refs) => assert_eq!(refs.len(), 3),
            other => panic!("expected choice, got {:?}", other),
        }
    }
}
