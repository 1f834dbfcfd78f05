//! Format implementations
//!
//! This module contains the format implementations that convert between the
//! canonical sdoc tree and its outside representations.

pub mod docx;
pub mod markdown;
pub mod sdoc;

pub use docx::DocxFormat;
pub use markdown::MarkdownFormat;
pub use sdoc::SdocFormat;
