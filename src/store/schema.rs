//! SQL DDL for the SQLite backing.

/// SQLite schema with:
/// - `position` INTEGER PRIMARY KEY: order of the entry within the store
/// - `id` UNIQUE: the expense id as seen by clients
/// - `date` TEXT: RFC 3339
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS expenses (
    position INTEGER PRIMARY KEY,
    id INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    nominal REAL NOT NULL,
    category TEXT NOT NULL,
    date TEXT NOT NULL -- RFC3339
);
"#;
