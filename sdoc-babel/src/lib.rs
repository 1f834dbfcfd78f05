//! Document conversion between sdoc trees, Markdown and DOCX
//!
//!     This crate converts documents among three tree-shaped representations: the canonical
//!     sdoc JSON tree, a Markdown AST (comrak) and a word-processing document (OOXML).
//!
//!     TLDR: For format authors:
//!         - Babel never tokenizes Markdown or zips XML by hand, it relies on each format's libraries.
//!         - A conversion goes source AST → canonical tree → destination AST. There is no
//!           direct path between two outside formats.
//!         - Shape logic that more than one format needs (inline runs, lists, tables) lives in
//!           common/ and is tested there in isolation.
//!         - Each format tests import and export on its own, plus a round trip through the tree.
//!
//! Architecture
//!
//!     The canonical tree (./ir/nodes.rs) is a closed set of block and inline variants. Every
//!     consumer matches on it exhaustively, so a new variant is a compile error everywhere it
//!     is not handled yet. The JSON wire form (./ir/wire.rs) is the only place that deals with
//!     malformed input; past it, nodes are well typed.
//!
//!     This is a pure lib, that is, it powers sdoc-cli but is shell agnostic: no code here
//!     prints, reads env vars or installs a logger. Everything a call needs travels in a
//!     ConversionContext (./context.rs), including the asset store (./assets.rs) through which
//!     embedded images enter and leave.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── assets.rs               # AssetStore trait, local and in-memory stores
//!     ├── context.rs              # ConversionContext and ConvertOptions
//!     ├── convert.rs              # Converter entry points
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── formats
//!     │   ├── <format>
//!     │   │   ├── parser.rs       # Parser implementation
//!     │   │   ├── serializer.rs   # Serializer implementation
//!     │   │   └── mod.rs
//!     ├── lib.rs
//!     ├── ir                      # Canonical tree and its wire form
//!     ├── common                  # Shared mapping code
//!
//! Testing
//!     tests
//!     └── <format>
//!         └── <testname>.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! Core Algorithms
//!
//!     Word keeps lists as a flat run of numbered paragraphs while the tree nests them.
//!     ./common/flat_to_nested.rs rebuilds the nesting from numbering id and indent level,
//!     ./common/nested_to_flat.rs walks it back out for Markdown lines and Word paragraphs.
//!     ./common/inline.rs merges styled runs, ./common/table.rs squares off ragged tables.
//!
//! Lossy by nature
//!
//!     None of the three models can hold everything the others can. Conversions keep node
//!     kinds, text, order, nesting and inline emphasis; they do not promise byte-exact
//!     round trips. Each format's mod.rs lists what it drops.

pub mod assets;
pub mod context;
pub mod convert;
pub mod error;
pub mod format;
pub mod formats;
pub mod registry;

pub mod common;
pub mod ir;

pub use assets::{AssetError, AssetRef, AssetStore, LocalAssetStore, MemoryAssetStore};
pub use context::{ConversionContext, ConvertOptions};
pub use convert::{write_artifact, Artifact, Converter};
pub use error::FormatError;
pub use format::{Format, SerializedDocument};
pub use ir::nodes::Document;
pub use registry::FormatRegistry;
