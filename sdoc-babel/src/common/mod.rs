//! Conversion logic shared by every format.
//!
//! `inline` builds and flattens inline runs, `flat_to_nested` and `nested_to_flat`
//! move lists between nested and flat forms, and `table` normalizes table shapes.

pub mod flat_to_nested;
pub mod inline;
pub mod nested_to_flat;
pub mod table;
