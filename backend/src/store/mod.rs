//! Persistence layer: the role-partitioned identity store and the two
//! keyed record collections. Handlers consume these helpers; no SQL lives
//! in the API layer.

pub mod principals;
pub mod records;
