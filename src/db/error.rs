use sea_orm::{ConnAcquireErr, DbErr};
use thiserror::Error;

/// Classified persistence failure. Handlers flash `user_message()` instead
/// of the driver's own text; the original error stays in the log.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("database connection failed: {0}")]
    Connection(String),

    #[error("database operation timed out: {0}")]
    Timeout(String),

    #[error("record not found")]
    NotFound,

    #[error("storage error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Short, stable text safe to show an operator in a flash message.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Constraint(_) => "a storage constraint was violated",
            Self::Connection(_) => "the database could not be reached",
            Self::Timeout(_) => "the database timed out",
            Self::NotFound => "the record no longer exists",
            Self::Internal(_) => "an internal storage error occurred",
        }
    }
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match &err {
            DbErr::ConnectionAcquire(ConnAcquireErr::Timeout) => Self::Timeout(err.to_string()),
            DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => Self::Connection(err.to_string()),
            DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => Self::NotFound,
            DbErr::Exec(_) | DbErr::Query(_) => {
                let text = err.to_string();
                let lowered = text.to_lowercase();
                if lowered.contains("constraint")
                    || lowered.contains("unique")
                    || lowered.contains("foreign key")
                {
                    Self::Constraint(text)
                } else if lowered.contains("timed out") {
                    Self::Timeout(text)
                } else {
                    Self::Internal(text)
                }
            }
            _ => Self::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::RuntimeErr;

    #[test]
    fn classifies_unique_violation_as_constraint() {
        let err = DbErr::Exec(RuntimeErr::Internal(
            "UNIQUE constraint failed: customers.email".to_string(),
        ));
        assert!(matches!(StoreError::from(err), StoreError::Constraint(_)));
    }

    #[test]
    fn classifies_connection_loss() {
        let err = DbErr::Conn(RuntimeErr::Internal("connection refused".to_string()));
        assert!(matches!(StoreError::from(err), StoreError::Connection(_)));
    }

    #[test]
    fn classifies_pool_timeout() {
        let err = DbErr::ConnectionAcquire(ConnAcquireErr::Timeout);
        assert!(matches!(StoreError::from(err), StoreError::Timeout(_)));
    }

    #[test]
    fn missing_rows_map_to_not_found() {
        let err = DbErr::RecordNotUpdated;
        assert!(matches!(StoreError::from(err), StoreError::NotFound));
    }

    #[test]
    fn user_message_never_echoes_driver_text() {
        let err = StoreError::from(DbErr::Exec(RuntimeErr::Internal(
            "UNIQUE constraint failed: customers.email".to_string(),
        )));
        assert!(!err.user_message().contains("customers.email"));
    }
}
