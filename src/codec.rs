//! Table encoding.
//!
//! A table is stored as the JSON text of an array of records. Anything else
//! found under a table's key is reported as a serialization error; it is
//! never silently treated as an empty table.

use crate::error::{Error, Result};
use crate::value::{Record, MAX_DEPTH};

/// Text written for a freshly created table.
pub const EMPTY_TABLE: &str = "[]";

/// Encode a record sequence to its stored text form.
///
/// Fails on anything [`decode`] could not read back: non-finite numbers and
/// records nested deeper than [`MAX_DEPTH`].
pub fn encode(records: &[Record]) -> Result<String> {
    if records.iter().any(|r| r.depth(MAX_DEPTH) > MAX_DEPTH) {
        return Err(Error::Serialization(format!(
            "Record nested deeper than {} levels",
            MAX_DEPTH
        )));
    }
    if let Some(n) = records.iter().find_map(Record::find_non_finite) {
        return Err(Error::Serialization(format!(
            "{} cannot be represented in JSON",
            n
        )));
    }
    serde_json::to_string(records)
        .map_err(|e| Error::Serialization(format!("JSON serialization failed: {}", e)))
}

/// Decode the stored text of the table `name` back into its records.
pub fn decode(name: &str, text: &str) -> Result<Vec<Record>> {
    serde_json::from_str(text).map_err(|e| {
        Error::Serialization(format!(
            "Table '{}' does not hold a record sequence: {}",
            name, e
        ))
    })
}
