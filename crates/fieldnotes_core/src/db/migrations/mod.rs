//! Ordered schema steps for the key-value database.
//!
//! Step `n` brings a file from `user_version = n - 1` to `n`.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

const SCHEMA_STEPS: &[&str] = &[include_str!("0001_kv_entries.sql")];

/// Schema version produced by running every step.
pub fn latest_version() -> u32 {
    u32::try_from(SCHEMA_STEPS.len()).unwrap_or(u32::MAX)
}

/// Brings `conn` up to `latest_version()` in one transaction.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending = SCHEMA_STEPS.iter().zip(1..=supported).skip(found as usize);
    let tx = conn.transaction()?;
    for (sql, version) in pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;
    Ok(())
}
