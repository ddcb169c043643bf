use std::fmt::Display;

use membership_core::StoreError;

/// Unique violations become `AlreadyExists` naming the clashing field;
/// everything else is unexpected.
pub(crate) fn write_error(e: sqlx::Error) -> StoreError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return StoreError::AlreadyExists(field_of(db_err.constraint()));
        }
    }
    StoreError::UnexpectedError(e.to_string())
}

pub(crate) fn unexpected(e: impl Display) -> StoreError {
    StoreError::UnexpectedError(e.to_string())
}

fn field_of(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(name) if name.ends_with("display_name_key") => "displayName",
        Some(name) if name.ends_with("email_key") => "email",
        _ => "id",
    }
}

pub(crate) fn count_to_db(count: u32) -> i64 {
    i64::from(count)
}

pub(crate) fn count_from_db(count: i64) -> Result<u32, StoreError> {
    u32::try_from(count).map_err(unexpected)
}
