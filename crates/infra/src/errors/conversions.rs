//! Conversions from external infrastructure errors into domain errors.

use callboard_domain::CallboardError;
use r2d2::Error as PoolError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CallboardError);

impl From<InfraError> for CallboardError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CallboardError> for InfraError {
    fn from(value: CallboardError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoCallboardError {
    fn into_callboard(self) -> CallboardError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → CallboardError */
/* -------------------------------------------------------------------------- */

impl IntoCallboardError for SqlError {
    fn into_callboard(self) -> CallboardError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        CallboardError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        CallboardError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        CallboardError::Database("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        CallboardError::Database("foreign key constraint violation".into())
                    }
                    _ => CallboardError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => {
                CallboardError::NotFound("no rows returned by query".into())
            }
            RE::FromSqlConversionFailure(_, _, cause) => {
                CallboardError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                CallboardError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => {
                CallboardError::Database("invalid UTF-8 returned from sqlite".into())
            }
            RE::InvalidParameterName(parameter_name) => {
                CallboardError::Database(format!("invalid parameter name: {parameter_name}"))
            }
            RE::InvalidPath(path) => CallboardError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            RE::InvalidQuery => CallboardError::Database("invalid SQL query".into()),
            other => CallboardError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_callboard())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → CallboardError */
/* -------------------------------------------------------------------------- */

impl IntoCallboardError for PoolError {
    fn into_callboard(self) -> CallboardError {
        CallboardError::Database(format!("connection pool error: {self}"))
    }
}

impl From<PoolError> for InfraError {
    fn from(value: PoolError) -> Self {
        InfraError(value.into_callboard())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → CallboardError */
/* -------------------------------------------------------------------------- */

impl IntoCallboardError for HttpError {
    fn into_callboard(self) -> CallboardError {
        if self.is_timeout() {
            return CallboardError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return CallboardError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => CallboardError::Auth(message),
                404 => CallboardError::NotFound(message),
                429 => CallboardError::Network(message),
                400..=499 => CallboardError::InvalidInput(message),
                500..=599 => CallboardError::Network(message),
                _ => CallboardError::Network(message),
            };
        }

        CallboardError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_callboard())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
