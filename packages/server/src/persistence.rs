use sea_orm::{DbErr, SqlErr};

/// Failure reported by a record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write. Carries the backend's detail.
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error("record not found")]
    NotFound,
    /// A stored row could not be mapped back to its domain type.
    #[error("stored record is invalid: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Db(DbErr),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        let sql_err = err.sql_err();
        classify(err, sql_err)
    }
}

/// `sql_err` is the backend-level reading of `err`, if any.
fn classify(err: DbErr, sql_err: Option<SqlErr>) -> StoreError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = sql_err {
        return StoreError::Conflict(detail);
    }
    match err {
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => StoreError::NotFound,
        other => StoreError::Db(other),
    }
}
