//! Conversions from external infrastructure errors into domain errors.

use bookdesk_domain::BookdeskError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;
use tokio::task::JoinError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub BookdeskError);

impl From<InfraError> for BookdeskError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<BookdeskError> for InfraError {
    fn from(value: BookdeskError) -> Self {
        Self(value)
    }
}

/// Extension trait keeping the conversion logic explicit at call sites.
pub(crate) trait IntoBookdeskError {
    fn into_bookdesk(self) -> BookdeskError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → BookdeskError */
/* -------------------------------------------------------------------------- */

impl IntoBookdeskError for SqlError {
    fn into_bookdesk(self) -> BookdeskError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => BookdeskError::Storage("database is busy".into()),
                    ErrorCode::DatabaseLocked => {
                        BookdeskError::Storage("database is locked".into())
                    }
                    ErrorCode::ConstraintViolation => {
                        BookdeskError::Storage(format!("constraint violation: {message}"))
                    }
                    _ => BookdeskError::Storage(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => BookdeskError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                BookdeskError::Storage(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                BookdeskError::Storage(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => BookdeskError::Storage("invalid UTF-8 returned from sqlite".into()),
            RE::InvalidPath(path) => {
                BookdeskError::Storage(format!("invalid database path: {}", path.display()))
            }
            RE::InvalidQuery => BookdeskError::Storage("invalid SQL query".into()),
            other => BookdeskError::Storage(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        Self(value.into_bookdesk())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → BookdeskError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        Self(BookdeskError::Storage(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → BookdeskError */
/* -------------------------------------------------------------------------- */

impl IntoBookdeskError for HttpError {
    fn into_bookdesk(self) -> BookdeskError {
        if self.is_timeout() {
            return BookdeskError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return BookdeskError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return BookdeskError::Network(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status")
            ));
        }

        if self.is_decode() {
            return BookdeskError::Network(format!("failed to decode response body: {self}"));
        }

        BookdeskError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_bookdesk())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → BookdeskError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        Self(BookdeskError::Storage(format!("JSON serialization failed: {value}")))
    }
}

/// Map a `spawn_blocking` join failure to a domain error.
pub fn map_join_error(err: JoinError) -> BookdeskError {
    BookdeskError::Internal(format!("blocking task failed: {err}"))
}
