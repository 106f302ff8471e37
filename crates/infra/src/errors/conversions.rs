//! Conversions from external infrastructure errors into domain errors.

use docket_domain::DocketError;
use r2d2::Error as PoolError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub DocketError);

impl From<InfraError> for DocketError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<DocketError> for InfraError {
    fn from(value: DocketError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoDocketError {
    fn into_docket(self) -> DocketError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → DocketError */
/* -------------------------------------------------------------------------- */

impl IntoDocketError for SqlError {
    fn into_docket(self) -> DocketError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        DocketError::Storage("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        DocketError::Storage("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        DocketError::Storage("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        DocketError::Storage("foreign key constraint violation".into())
                    }
                    _ => DocketError::Storage(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => DocketError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                DocketError::Storage(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                DocketError::Storage(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => DocketError::Storage("invalid UTF-8 returned from sqlite".into()),
            RE::InvalidParameterName(parameter_name) => {
                DocketError::Storage(format!("invalid parameter name: {parameter_name}"))
            }
            RE::InvalidPath(path) => DocketError::Storage(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            RE::InvalidQuery => DocketError::Storage("invalid SQL query".into()),
            other => DocketError::Storage(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_docket())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → DocketError */
/* -------------------------------------------------------------------------- */

impl IntoDocketError for PoolError {
    fn into_docket(self) -> DocketError {
        DocketError::Storage(format!("connection pool error: {self}"))
    }
}

impl From<PoolError> for InfraError {
    fn from(value: PoolError) -> Self {
        InfraError(value.into_docket())
    }
}
