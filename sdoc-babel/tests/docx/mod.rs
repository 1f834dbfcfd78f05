//! DOCX format tests
//!
//! Import tests build minimal packages by hand so the exact WordprocessingML is
//! under test control. Export tests unzip the produced package and inspect its
//! parts directly.

mod export;
mod fixtures;
mod import;
