//! Storage configuration and path management for Entreno.
//!
//! This module provides a centralized `StorageConfig` struct that manages all
//! file paths for Entreno data. This abstraction enables:
//!
//! - Easy path changes without hunting through code
//! - Testability via dependency injection (inject temp paths)
//!
//! ## Design Principles
//!
//! - **Single source of truth**: All path decisions centralized here
//! - **Testable**: `StorageConfig::with_root()` enables test injection
//! - **Stable keys**: collection keys map to filenames through an injective
//!   encoding, so any key the gateway uses (including exercise names with
//!   spaces and accents) round-trips to a unique file

use std::path::{Path, PathBuf};

/// Central configuration for all Entreno storage paths.
///
/// Production code uses `StorageConfig::default()` which points to `~/.entreno/`.
/// Tests use `StorageConfig::with_root(temp_dir)` for isolation.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory for all Entreno data (default: ~/.entreno)
    root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let home = dirs::home_dir().expect("Could not find home directory");
        Self {
            root: home.join(".entreno"),
        }
    }
}

impl StorageConfig {
    /// Creates a StorageConfig with a custom root directory.
    /// Used for testing with temp directories.
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    /// Returns the root directory for Entreno data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Directories
    // ─────────────────────────────────────────────────────────────────────────────

    /// Path to data/ directory (one JSON file per collection key).
    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    /// Path to logs/ directory (rolling CLI log files).
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Path to exports/ directory (default destination for CSV exports).
    pub fn exports_dir(&self) -> PathBuf {
        self.root.join("exports")
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Collection Files
    // ─────────────────────────────────────────────────────────────────────────────

    /// Path to the JSON file backing a collection key.
    /// Example: key `sessions` → `~/.entreno/data/sessions.json`,
    /// key `exercise_Press banca` → `~/.entreno/data/exercise_Press%20banca.json`.
    pub fn collection_file(&self, key: &str) -> PathBuf {
        self.data_dir().join(format!("{}.json", Self::encode_key(key)))
    }

    /// Encodes a collection key into a filesystem-safe filename stem.
    ///
    /// Alphanumerics, `-`, `_` and `.` pass through; every other byte is
    /// percent-encoded. The encoding is injective, so distinct keys never
    /// collide on disk.
    pub fn encode_key(key: &str) -> String {
        let mut encoded = String::with_capacity(key.len());
        for byte in key.bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' => {
                    encoded.push(byte as char)
                }
                other => encoded.push_str(&format!("%{:02X}", other)),
            }
        }
        encoded
    }
}
