//! Key-value state repository and SQLite implementation.
//!
//! # Responsibility
//! - Store opaque JSON text under the fixed keys in [`StateKey`].
//! - Wrap structured blobs in a versioned envelope so shape drift is
//!   detected on read instead of silently accepted.
//!
//! # Invariants
//! - `put_entry` replaces the whole value for a key.
//! - `delete_entry` on a missing key is a no-op.
//! - `put_entries` and `delete_entries` apply all keys or none.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Fixed keys of persisted dashboard state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKey {
    Session,
    SignupCompleted,
    OnboardingCompleted,
    CompanyData,
    NotificationReadState,
}

impl StateKey {
    pub const ALL: [StateKey; 5] = [
        StateKey::Session,
        StateKey::SignupCompleted,
        StateKey::OnboardingCompleted,
        StateKey::CompanyData,
        StateKey::NotificationReadState,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Session => "erp.session",
            Self::SignupCompleted => "erp.signup_completed",
            Self::OnboardingCompleted => "erp.onboarding_completed",
            Self::CompanyData => "erp.company_data",
            Self::NotificationReadState => "erp.notifications.read",
        }
    }
}

/// Schema version written into every [`Versioned`] envelope.
pub const STATE_SCHEMA_VERSION: u32 = 1;

/// Versioned wrapper for structured persisted blobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Versioned<T> {
    pub version: u32,
    pub data: T,
}

impl<T> Versioned<T> {
    pub fn current(data: T) -> Self {
        Self {
            version: STATE_SCHEMA_VERSION,
            data,
        }
    }
}

#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Serialize(serde_json::Error),
    /// Persisted value exists but cannot be decoded for `key`.
    InvalidData { key: &'static str, message: String },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize persisted state: {err}"),
            Self::InvalidData { key, message } => {
                write!(f, "invalid persisted state under `{key}`: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::InvalidData { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract for persisted key-value state.
pub trait StateRepository {
    fn get_entry(&self, key: StateKey) -> RepoResult<Option<String>>;
    fn put_entry(&self, key: StateKey, value: &str) -> RepoResult<()>;
    /// Returns `true` when an entry was removed.
    fn delete_entry(&self, key: StateKey) -> RepoResult<bool>;
    /// Writes every entry, or none of them.
    fn put_entries(&self, entries: &[(StateKey, &str)]) -> RepoResult<()>;
    /// Removes every listed key, or none of them. Returns how many existed.
    fn delete_entries(&self, keys: &[StateKey]) -> RepoResult<usize>;
}

impl<R: StateRepository + ?Sized> StateRepository for &R {
    fn get_entry(&self, key: StateKey) -> RepoResult<Option<String>> {
        (**self).get_entry(key)
    }

    fn put_entry(&self, key: StateKey, value: &str) -> RepoResult<()> {
        (**self).put_entry(key, value)
    }

    fn delete_entry(&self, key: StateKey) -> RepoResult<bool> {
        (**self).delete_entry(key)
    }

    fn put_entries(&self, entries: &[(StateKey, &str)]) -> RepoResult<()> {
        (**self).put_entries(entries)
    }

    fn delete_entries(&self, keys: &[StateKey]) -> RepoResult<usize> {
        (**self).delete_entries(keys)
    }
}

/// SQLite-backed state repository over the `kv_entries` table.
pub struct SqliteStateRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStateRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StateRepository for SqliteStateRepository<'_> {
    fn get_entry(&self, key: StateKey) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put_entry(&self, key: StateKey, value: &str) -> RepoResult<()> {
        upsert_entry(self.conn, key, value)
    }

    fn delete_entry(&self, key: StateKey) -> RepoResult<bool> {
        Ok(remove_entry(self.conn, key)? > 0)
    }

    fn put_entries(&self, entries: &[(StateKey, &str)]) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for (key, value) in entries {
            upsert_entry(&tx, *key, value)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_entries(&self, keys: &[StateKey]) -> RepoResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut removed = 0;
        for key in keys {
            removed += remove_entry(&tx, *key)?;
        }
        tx.commit()?;
        Ok(removed)
    }
}

fn upsert_entry(conn: &Connection, key: StateKey, value: &str) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO kv_entries (key, value, updated_at)
         VALUES (?1, ?2, strftime('%s', 'now') * 1000)
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at;",
        params![key.as_str(), value],
    )?;
    Ok(())
}

fn remove_entry(conn: &Connection, key: StateKey) -> RepoResult<usize> {
    Ok(conn.execute("DELETE FROM kv_entries WHERE key = ?1;", [key.as_str()])?)
}

/// Encodes `data` in the current [`Versioned`] envelope.
pub fn encode_versioned<T: Serialize>(data: &T) -> RepoResult<String> {
    serde_json::to_string(&Versioned::current(data)).map_err(RepoError::Serialize)
}

/// JSON text of a boolean flag.
pub fn flag_text(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Serializes `data` in the current envelope and stores it under `key`.
pub fn put_versioned<T: Serialize>(
    repo: &impl StateRepository,
    key: StateKey,
    data: &T,
) -> RepoResult<()> {
    repo.put_entry(key, &encode_versioned(data)?)
}

/// Reads and decodes a versioned blob.
///
/// Returns `Ok(None)` when the key is absent and `InvalidData` when the text
/// is not valid JSON, has the wrong shape, or carries an unknown version.
pub fn get_versioned<T: DeserializeOwned>(
    repo: &impl StateRepository,
    key: StateKey,
) -> RepoResult<Option<T>> {
    let Some(text) = repo.get_entry(key)? else {
        return Ok(None);
    };
    let envelope: Versioned<T> =
        serde_json::from_str(&text).map_err(|err| RepoError::InvalidData {
            key: key.as_str(),
            message: err.to_string(),
        })?;
    if envelope.version != STATE_SCHEMA_VERSION {
        return Err(RepoError::InvalidData {
            key: key.as_str(),
            message: format!(
                "unsupported schema version {} (expected {STATE_SCHEMA_VERSION})",
                envelope.version
            ),
        });
    }
    Ok(Some(envelope.data))
}

/// Stores a boolean flag as JSON `true`/`false`.
pub fn put_flag(repo: &impl StateRepository, key: StateKey, value: bool) -> RepoResult<()> {
    repo.put_entry(key, flag_text(value))
}

/// Reads a boolean flag; absent or unreadable flags count as `false`.
pub fn get_flag(repo: &impl StateRepository, key: StateKey) -> RepoResult<bool> {
    Ok(repo
        .get_entry(key)?
        .is_some_and(|text| serde_json::from_str::<bool>(&text).unwrap_or(false)))
}

#[cfg(test)]
mod tests {
    use super::{
        get_flag, get_versioned, put_flag, put_versioned, RepoError, SqliteStateRepository,
        StateKey, StateRepository,
    };
    use crate::db::open_db_in_memory;

    #[test]
    fn put_replaces_value_and_delete_is_idempotent() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteStateRepository::new(&conn);

        repo.put_entry(StateKey::CompanyData, "1").unwrap();
        repo.put_entry(StateKey::CompanyData, "2").unwrap();
        assert_eq!(
            repo.get_entry(StateKey::CompanyData).unwrap().as_deref(),
            Some("2")
        );

        assert!(repo.delete_entry(StateKey::CompanyData).unwrap());
        assert!(!repo.delete_entry(StateKey::CompanyData).unwrap());
        assert!(repo.get_entry(StateKey::CompanyData).unwrap().is_none());
    }

    #[test]
    fn versioned_blob_rejects_unknown_version() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteStateRepository::new(&conn);

        put_versioned(&repo, StateKey::NotificationReadState, &vec!["n1"]).unwrap();
        let ids: Option<Vec<String>> =
            get_versioned(&repo, StateKey::NotificationReadState).unwrap();
        assert_eq!(ids, Some(vec!["n1".to_string()]));

        repo.put_entry(
            StateKey::NotificationReadState,
            r#"{"version":99,"data":[]}"#,
        )
        .unwrap();
        let err = get_versioned::<Vec<String>>(&repo, StateKey::NotificationReadState)
            .unwrap_err();
        assert!(matches!(err, RepoError::InvalidData { .. }));
    }

    #[test]
    fn flags_default_to_false() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteStateRepository::new(&conn);

        assert!(!get_flag(&repo, StateKey::SignupCompleted).unwrap());
        put_flag(&repo, StateKey::SignupCompleted, true).unwrap();
        assert!(get_flag(&repo, StateKey::SignupCompleted).unwrap());

        repo.put_entry(StateKey::SignupCompleted, "garbage").unwrap();
        assert!(!get_flag(&repo, StateKey::SignupCompleted).unwrap());
    }

    #[test]
    fn put_entries_rolls_back_every_key_when_one_write_fails() {
        let conn = open_db_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TRIGGER block_flag BEFORE INSERT ON kv_entries
             WHEN NEW.key = 'erp.signup_completed'
             BEGIN SELECT RAISE(ABORT, 'blocked'); END;",
        )
        .unwrap();
        let repo = SqliteStateRepository::new(&conn);

        repo.put_entries(&[(StateKey::Session, "{}"), (StateKey::SignupCompleted, "true")])
            .unwrap_err();

        assert!(repo.get_entry(StateKey::Session).unwrap().is_none());
    }

    #[test]
    fn delete_entries_keeps_every_key_when_one_delete_fails() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteStateRepository::new(&conn);
        repo.put_entries(&[(StateKey::Session, "{}"), (StateKey::CompanyData, "{}")])
            .unwrap();
        conn.execute_batch(
            "CREATE TRIGGER block_company BEFORE DELETE ON kv_entries
             WHEN OLD.key = 'erp.company_data'
             BEGIN SELECT RAISE(ABORT, 'blocked'); END;",
        )
        .unwrap();

        repo.delete_entries(&StateKey::ALL).unwrap_err();

        assert!(repo.get_entry(StateKey::Session).unwrap().is_some());
        assert!(repo.get_entry(StateKey::CompanyData).unwrap().is_some());

        conn.execute_batch("DROP TRIGGER block_company;").unwrap();
        assert_eq!(repo.delete_entries(&StateKey::ALL).unwrap(), 2);
        assert!(repo.get_entry(StateKey::Session).unwrap().is_none());
    }
}
