//! Cross-reference resolution.
//!
//! Walks the document in order, allocates the internal ids every group and
//! element is known by downstream, binds each cube element to its cube
//! definition, and checks the arity contract between the per-cuboid style
//! lists and the definition's mapping entries. Emission runs against the
//! resolved scene and performs no further bounds checking.

use crate::compile::idgen::SymbolAllocator;
use crate::compile::mapping;
use crate::compile::types::{ColorSet, Document, ElementConfig};
use crate::error::{Error, Result};
use serde_json::Number;

/// One cuboid to register: the zip of a mapping entry with the element's
/// per-cuboid style lists.
#[derive(Debug, Clone)]
pub struct CuboidInfo {
    pub line_width: Number,
    pub colors: ColorSet,
    pub callable: String,
    pub required_variables: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum ResolvedDetail {
    Cube { cuboids: Vec<CuboidInfo> },
    Image,
}

/// An element with its allocated id and derived cuboid list. Parallel to the
/// document's element list, in the same order.
#[derive(Debug, Clone)]
pub struct ResolvedElement {
    pub internal_id: String,
    pub detail: ResolvedDetail,
}

#[derive(Debug, Clone)]
pub struct ResolvedGroup {
    pub name: String,
    pub internal_id: String,
    pub elements: Vec<ResolvedElement>,
}

/// The fully resolved scene, in document order.
#[derive(Debug, Clone)]
pub struct ResolvedScene {
    pub groups: Vec<ResolvedGroup>,
}

/// Resolve every group and element of the document.
pub fn resolve(document: &Document, allocator: &mut SymbolAllocator) -> Result<ResolvedScene> {
    let mut groups = Vec::with_capacity(document.appearance.grouping.groups.len());

    for (name, group) in &document.appearance.grouping.groups {
        let internal_id = allocator.allocate("gr");

        let mut elements = Vec::with_capacity(group.elements.len());
        for element in &group.elements {
            elements.push(resolve_element(document, element, allocator)?);
        }

        groups.push(ResolvedGroup {
            name: name.clone(),
            internal_id,
            elements,
        });
    }

    tracing::debug!(groups = groups.len(), "scene resolved");

    Ok(ResolvedScene { groups })
}

fn resolve_element(
    document: &Document,
    element: &ElementConfig,
    allocator: &mut SymbolAllocator,
) -> Result<ResolvedElement> {
    let internal_id = allocator.allocate("el");

    let Some(cube_name) = &element.cube else {
        return Ok(ResolvedElement {
            internal_id,
            detail: ResolvedDetail::Image,
        });
    };

    let definition = document.cubes.get(cube_name).ok_or_else(|| Error::UnknownReference {
        element: internal_id.clone(),
        cube: cube_name.clone(),
    })?;

    // Presence was checked at load time; resolution restates it as a typed
    // invariant instead of indexing blindly.
    let line_widths = element
        .line_widths
        .as_ref()
        .ok_or_else(|| Error::schema(internal_id.clone(), "cube element without line width list"))?;
    let colors = element
        .colors
        .as_ref()
        .ok_or_else(|| Error::schema(internal_id.clone(), "cube element without color list"))?;

    if colors.len() != definition.len() || line_widths.len() != definition.len() {
        return Err(Error::ArityMismatch {
            element: internal_id,
            expected: definition.len(),
            colors: colors.len(),
            line_widths: line_widths.len(),
        });
    }

    let cuboids = definition
        .iter()
        .zip(colors)
        .zip(line_widths)
        .map(|((entry, color_set), line_width)| CuboidInfo {
            line_width: line_width.clone(),
            colors: color_set.clone(),
            callable: mapping::synthesize(entry),
            required_variables: entry.required_variables.clone(),
        })
        .collect();

    Ok(ResolvedElement {
        internal_id,
        detail: ResolvedDetail::Cube { cuboids },
    })
}
