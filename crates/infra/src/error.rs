//! Store-level errors and their mapping onto the domain taxonomy.
//!
//! ## SQLx mapping
//!
//! | SQLx error | SQLSTATE | StoreError |
//! |------------|----------|------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (foreign key violation) | `23503` | `NotFound` |
//! | Database (other) | any other | `Unavailable` |
//! | PoolTimedOut / PoolClosed / Io / Tls | n/a | `Unavailable` |
//! | RowNotFound | n/a | `NotFound` |
//! | ColumnDecode / Decode / ColumnNotFound | n/a | `Corrupt` |

use thiserror::Error;

use inkwell_core::DomainError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write (e.g. slug already taken).
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// A referenced row does not exist.
    #[error("referenced entity not found")]
    NotFound,

    /// Backend unreachable, timed out, or otherwise failed transiently.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be decoded into a domain value.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub(crate) fn poisoned() -> Self {
        StoreError::Unavailable("lock poisoned".to_string())
    }
}

impl From<StoreError> for DomainError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict(msg) => DomainError::Conflict(msg),
            StoreError::NotFound => DomainError::NotFound,
            StoreError::Unavailable(msg) => DomainError::Unavailable(msg),
            StoreError::Corrupt(msg) => DomainError::Unavailable(format!("corrupt record: {msg}")),
        }
    }
}

/// Map a SQLx error raised during `operation` onto a `StoreError`.
pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(msg),
                Some("23503") => StoreError::NotFound,
                _ => StoreError::Unavailable(msg),
            }
        }
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::ColumnNotFound(_) => {
            StoreError::Corrupt(format!("decode error in {}: {}", operation, err))
        }
        _ => StoreError::Unavailable(format!("sqlx error in {}: {}", operation, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_onto_domain_taxonomy() {
        assert_eq!(
            DomainError::from(StoreError::Conflict("dup".into())),
            DomainError::Conflict("dup".into())
        );
        assert_eq!(DomainError::from(StoreError::NotFound), DomainError::NotFound);
        assert!(matches!(
            DomainError::from(StoreError::Unavailable("timeout".into())),
            DomainError::Unavailable(_)
        ));
    }

    #[test]
    fn pool_timeout_is_unavailable() {
        let err = map_sqlx_error("insert_post", sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Unavailable(msg) if msg.contains("insert_post")));
    }

    #[test]
    fn row_not_found_is_not_found() {
        assert_eq!(map_sqlx_error("get", sqlx::Error::RowNotFound), StoreError::NotFound);
    }
}
