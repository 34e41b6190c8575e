//! # visgen: Declarative Scene-Configuration Compiler
//!
//! visgen reads a comment-tolerant JSON document describing a visualization
//! scene (clock variables, cube views, groups, legends, cameras, images,
//! arrows) and emits the builder-API initialization statements that
//! reconstruct the scene at program startup, substituted into a skeleton
//! source file at a fixed marker.
//!
//! ## Features
//!
//! - **Comment-tolerant ingestion**: comments and trailing commas in the
//!   document are accepted without altering parsed values
//! - **Typed statement emission**: the builder calls are emitted as typed
//!   records and rendered by a single serializer, so construction always
//!   precedes reference
//! - **Template materialization**: the output embeds a copy of the document
//!   with every runtime-adjustable field replaced by a generated placeholder
//!   symbol, re-read downstream for live repositioning without recompilation
//! - **Determinism modulo identifiers**: generated symbols are the only
//!   non-deterministic output; a seeded [`SymbolAllocator`] makes two runs
//!   over the same input byte-identical
//!
//! ## Example
//!
//! ```no_run
//! use visgen::SymbolAllocator;
//! use std::path::Path;
//!
//! let mut allocator = SymbolAllocator::new();
//! visgen::generate_file(
//!     Path::new("scene.json"),
//!     Path::new("skeleton.cpp"),
//!     Path::new("configuration.cpp"),
//!     &mut allocator,
//! ).expect("generation failed");
//! ```

pub mod compile;
pub mod error;

pub use compile::{
    compile_block, compile_statements, generate_file, validate_file, SymbolAllocator,
};
pub use error::{Error, Result};
