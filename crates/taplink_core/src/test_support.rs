//! Shared test-only helpers for taplink_core.

use crate::Database;
use tempfile::TempDir;

/// Creates an isolated temporary database and returns it with the temp dir.
///
/// Keep the [`TempDir`] alive for the full test to preserve the backing files.
///
/// # Panics
/// Panics if temp-dir creation, path conversion, or database initialization
/// fails in the test environment.
pub(crate) fn setup_temp_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("test-db");
    let db = Database::new(db_path.to_str().expect("db path")).expect("db");
    (db, temp_dir)
}
