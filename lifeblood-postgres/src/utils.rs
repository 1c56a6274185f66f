use heapless::String as HeaplessString;
use lifeblood_api::ApiError;
use lifeblood_db::repository::pagination::PageRequest;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;
use std::str::FromStr;

/// A trait for converting a database row into a model.
pub trait TryFromRow<R>: Sized {
    fn try_from_row(row: &R) -> Result<Self, Box<dyn Error + Send + Sync>>;
}

/// Retrieves a required `HeaplessString` from a row.
pub fn get_heapless_string<const N: usize>(
    row: &PgRow,
    col_name: &str,
) -> Result<HeaplessString<N>, Box<dyn Error + Send + Sync>> {
    let s: String = row.try_get(col_name)?;
    HeaplessString::from_str(&s)
        .map_err(|_| format!("Value for column '{col_name}' is too long (max {N} bytes)").into())
}

/// Retrieves an optional `HeaplessString` from a row.
pub fn get_optional_heapless_string<const N: usize>(
    row: &PgRow,
    col_name: &str,
) -> Result<Option<HeaplessString<N>>, Box<dyn Error + Send + Sync>> {
    let s: Option<String> = row.try_get(col_name)?;
    s.map(|val| HeaplessString::from_str(&val))
        .transpose()
        .map_err(|_| format!("Value for column '{col_name}' is too long (max {N} bytes)").into())
}

/// `LIMIT` and `OFFSET` binds for `page`. Values past `i64::MAX` are rejected
/// instead of wrapping.
pub fn page_bounds(page: &PageRequest) -> Result<(i64, i64), Box<dyn Error + Send + Sync>> {
    let out_of_range =
        |what: &str| ApiError::ValidationError(format!("{what}: out of range for storage"));
    let limit = i64::try_from(page.limit).map_err(|_| out_of_range("limit"))?;
    let offset = i64::try_from(page.offset).map_err(|_| out_of_range("offset"))?;
    Ok((limit, offset))
}
