//! Core library for Entreno, a personal strength-training log.
//!
//! Everything stateful flows through [`Store`], a typed gateway over a
//! file-backed key-value store of JSON collections. On top of it sit the
//! pure pieces: template resolution, the active-session editor, wall-clock
//! timers, and export formatting.
//!
//! ## Design Principles
//!
//! - **Synchronous and single-user**: one process, one data directory, no
//!   locking. Callers that need concurrency serialize access themselves.
//! - **Graceful degradation**: reads of missing or corrupt collections
//!   return empty data and log a warning rather than failing the caller.
//! - **Wall-clock timers**: timer state derives from timestamps, so the
//!   display stays correct across process suspension without ticking.
//! - **Stable on-disk schema**: serde renames pin the historical JSON keys
//!   so existing data files keep loading as the Rust types evolve.

pub mod catalog;
pub mod error;
pub mod export;
pub mod kv;
pub mod routine;
pub mod session;
pub mod storage;
pub mod store;
pub mod template;
pub mod timer;
pub mod types;

pub use error::{EntrenoError, Result};
pub use kv::{FileKvStore, KvStore};
pub use session::{ActiveSession, FinishedSession, SelectOutcome, SetField, TimerSignal};
pub use storage::StorageConfig;
pub use store::Store;
pub use template::{ResolvedTemplate, RoutineStart, TemplateSelector};
pub use timer::{RestClock, SessionClock, TimerEvent};
pub use types::{
    BodyWeightRecord, CustomSession, Exercise, ExerciseHistory, RefKind, Routine, SessionRecord,
    SessionRef, Series,
};
