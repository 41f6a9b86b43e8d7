//! # Store Errors
//!
//! What can go wrong below the services. The API layer turns each variant
//! into a `{code, message}` body that carries this error's text.
//!
//! ```text
//!   sqlx::Error ──┐
//!                 ├──► DbError ──► ApiError (apps/api) ──► HTTP 404/409/500
//!   MigrateError ─┘
//! ```

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// No row with this id, or the row is deactivated where only active
    /// rows are accepted.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A conditional write matched zero rows: the stock quantity or the
    /// order status changed after it was read.
    #[error("{entity} {id} was modified concurrently, reload and retry")]
    Conflict { entity: String, id: String },

    /// `UNIQUE` index rejected the row (a second order with the same daily
    /// number).
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Referenced supplier or product does not exist.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Any other statement error, including `CHECK` and trigger aborts.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// SQLite kept the database locked past the busy timeout.
    #[error("Database is locked: {0}")]
    Locked(String),

    /// Every connection stayed busy past the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn conflict(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::Conflict {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Sorts a SQLite error message into a variant. SQLite reports
    /// `UNIQUE constraint failed: <table>.<column>`, `database is locked`
    /// and `FOREIGN KEY constraint failed`; everything else is a failed query.
    fn from_sqlite_message(message: &str) -> Self {
        if let Some(column) = message.strip_prefix("UNIQUE constraint failed: ") {
            // Callers that know the value re-raise with `duplicate`
            return DbError::duplicate(column, "?");
        }
        if message.contains("database is locked") || message.contains("database table is locked") {
            return DbError::Locked(message.to_string());
        }
        if message.contains("FOREIGN KEY constraint failed") {
            return DbError::ForeignKeyViolation {
                message: message.to_string(),
            };
        }
        DbError::QueryFailed(message.to_string())
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Row", "?"),
            sqlx::Error::Database(db_err) => DbError::from_sqlite_message(db_err.message()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool closed".to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[test]
    fn test_sqlite_messages_are_classified() {
        let err = DbError::from_sqlite_message("UNIQUE constraint failed: manufacturing_orders.order_number");
        assert!(matches!(err, DbError::UniqueViolation { ref field, .. } if field == "manufacturing_orders.order_number"));

        let err = DbError::from_sqlite_message("database is locked");
        assert!(matches!(err, DbError::Locked(_)));

        let err = DbError::from_sqlite_message("FOREIGN KEY constraint failed");
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        let err = DbError::from_sqlite_message("CHECK constraint failed: quantity_milli >= 0");
        assert!(matches!(err, DbError::QueryFailed(_)));
    }

    #[test]
    fn test_conflict_message() {
        let err = DbError::conflict("Raw material", "mp-1");
        assert_eq!(
            err.to_string(),
            "Raw material mp-1 was modified concurrently, reload and retry"
        );
    }
}
