//! Markdown format tests
//!
//! Tests for bidirectional Markdown ↔ sdoc conversion.

mod export;
mod import;
mod round_trip;
