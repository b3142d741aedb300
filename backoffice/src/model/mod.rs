//! View rows mapped from raw database records.
//!
//! Each fetch result is mapped once, up front, so the tables never see the
//! loosely-typed storage shape.

mod localized;
mod product;
mod recipe;
mod record;
mod user;

pub use localized::*;
pub use product::*;
pub use recipe::*;
pub use record::*;
pub use user::*;

use serde_json::Value;

/// Map every record of a fetch result, stopping at the first bad one.
pub fn map_records<T>(
    records: &[Value],
    map: impl Fn(&Value) -> Result<T, MappingError>,
) -> Result<Vec<T>, MappingError> {
    records.iter().map(map).collect()
}

/// Map every record, skipping (and logging) the ones that fail.
pub fn map_records_lossy<T>(
    records: &[Value],
    map: impl Fn(&Value) -> Result<T, MappingError>,
) -> Vec<T> {
    records
        .iter()
        .filter_map(|record| match map(record) {
            Ok(row) => Some(row),
            Err(e) => {
                log::warn!("skipping record: {}", e);
                None
            }
        })
        .collect()
}
