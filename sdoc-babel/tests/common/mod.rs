//! Tests for the shared list, inline and table logic, driven through the public API.

mod lists;
mod tables;
