//! The compilation pipeline: load → resolve → emit → materialize → compose.
//!
//! One invocation runs a single synchronous pass over one document. The only
//! mutable state is the document tree itself and the symbol allocator's
//! uniqueness registry, both owned by the invocation.

pub mod compose;
pub mod emit;
pub mod idgen;
pub mod loader;
pub mod mapping;
pub mod resolve;
pub mod template;
pub mod types;

pub use emit::{render_statements, Statement};
pub use idgen::SymbolAllocator;
pub use loader::{load_str, LoadedConfig};
pub use resolve::{CuboidInfo, ResolvedScene};
pub use types::Document;

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Compile a configuration document into the emitted statement list.
///
/// Exposed separately from [`compile_block`] so callers (and tests) can
/// inspect the typed statements before rendering.
pub fn compile_statements(
    config_text: &str,
    allocator: &mut SymbolAllocator,
) -> Result<Vec<Statement>> {
    let loaded = loader::load_str(config_text)?;
    let scene = resolve::resolve(&loaded.document, allocator)?;
    let template_literal = template::materialize(&loaded.raw, &loaded.document, &scene)?;

    Ok(emit::emit(
        &loaded.document,
        &scene,
        template_literal,
        allocator,
    ))
}

/// Compile a configuration document into the rendered statement block.
pub fn compile_block(config_text: &str, allocator: &mut SymbolAllocator) -> Result<String> {
    let statements = compile_statements(config_text, allocator)?;
    Ok(render_statements(&statements))
}

/// Full file-to-file generation: read config and skeleton, compile, substitute
/// at the marker, and write the output atomically.
pub fn generate_file(
    config: &Path,
    skeleton: &Path,
    output: &Path,
    allocator: &mut SymbolAllocator,
) -> Result<()> {
    let config_text = fs::read_to_string(config).map_err(|e| Error::io(config, e))?;
    let skeleton_text = fs::read_to_string(skeleton).map_err(|e| Error::io(skeleton, e))?;

    let block = compile_block(&config_text, allocator)?;
    let composed = compose::substitute(&skeleton_text, &block, skeleton)?;
    compose::write_atomic(output, &composed)?;

    tracing::info!(
        config = %config.display(),
        output = %output.display(),
        symbols = allocator.allocated(),
        "generation complete"
    );

    Ok(())
}

/// Load and resolve a configuration without emitting anything.
pub fn validate_file(config: &Path) -> Result<()> {
    let config_text = fs::read_to_string(config).map_err(|e| Error::io(config, e))?;
    let loaded = loader::load_str(&config_text)?;

    let mut allocator = SymbolAllocator::new();
    resolve::resolve(&loaded.document, &mut allocator)?;

    Ok(())
}
