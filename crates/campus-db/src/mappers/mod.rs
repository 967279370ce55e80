//! Model to entity mappers
//!
//! Columns holding enums are stored as text; rows whose text does not parse
//! surface as `DomainError::DatabaseError` instead of panicking.

mod community;
mod course;
mod enrollment;
mod invitation;
mod membership;
mod notification;
mod profile;

use campus_core::DomainError;

/// Parse an enum column, reporting the offending value as a database error
pub(crate) fn parse_column<T>(column: &'static str, raw: &str) -> Result<T, DomainError>
where
    T: std::str::FromStr,
{
    raw.parse()
        .map_err(|_| DomainError::DatabaseError(format!("unexpected {column} value: {raw}")))
}

/// Convert a batch of rows, failing on the first bad one
pub(crate) fn collect_rows<M, E>(rows: Vec<M>) -> Result<Vec<E>, DomainError>
where
    E: TryFrom<M, Error = DomainError>,
{
    rows.into_iter().map(E::try_from).collect()
}
