//! Configuration document loader.
//!
//! Parses the authored document with a comment- and trailing-comma-tolerant
//! JSON parser, then deserializes the typed model section by section so that
//! schema errors name the offending key path
//! (e.g. `appearance.grouping.groups.<name>.elements[<i>].colors`).
//!
//! The raw parsed tree is kept alongside the typed model: template
//! materialization later works on a copy of the raw tree so that every
//! non-placeholder field re-serializes exactly as authored.

use crate::compile::types::{
    Color, Connection, CubeDefinition, Document, ElementConfig, Group, Grouping, LegendEntry,
    Appearance,
};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// The parsed document: typed model plus the raw tree it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub document: Document,
    pub raw: Value,
}

/// Parse and validate a configuration document from text.
pub fn load_str(text: &str) -> Result<LoadedConfig> {
    let raw = parse_tolerant(text)?;
    let document = document_from_value(&raw)?;

    tracing::debug!(
        groups = document.appearance.grouping.groups.len(),
        cubes = document.cubes.len(),
        "configuration loaded"
    );

    Ok(LoadedConfig { document, raw })
}

/// Parse text as JSON, accepting comments and trailing commas.
fn parse_tolerant(text: &str) -> Result<Value> {
    let mut options = jsonc_parser::ParseOptions::default();
    options.allow_comments = true;
    options.allow_trailing_commas = true;

    let parsed = jsonc_parser::parse_to_serde_value(text, &options)
        .map_err(|e| Error::schema("<document>", e.to_string()))?;

    parsed.ok_or_else(|| Error::schema("<document>", "document is empty"))
}

fn document_from_value(raw: &Value) -> Result<Document> {
    let root = as_object(raw, "<document>")?;

    let seq_clock: IndexMap<String, (i64, i64)> = field(root, "", "seq_clock")?;
    let par_clock: IndexMap<String, (i64, i64)> = field(root, "", "par_clock")?;
    let cubes: IndexMap<String, CubeDefinition> = field(root, "", "cubes")?;

    let appearance = as_object(require(root, "", "appearance")?, "appearance")?;
    let background_color: Color = field(appearance, "appearance", "background color")?;
    let legend: IndexMap<String, LegendEntry> = field(appearance, "appearance", "legend")?;

    let grouping = as_object(
        require(appearance, "appearance", "grouping")?,
        "appearance.grouping",
    )?;

    let groups_value = as_object(
        require(grouping, "appearance.grouping", "groups")?,
        "appearance.grouping.groups",
    )?;

    let mut groups = IndexMap::new();
    for (name, value) in groups_value {
        let path = format!("appearance.grouping.groups.{}", name);
        let group: Group = from_value(value, &path)?;
        validate_group(&path, &group)?;
        groups.insert(name.clone(), group);
    }

    let arrows_value = require(grouping, "appearance.grouping", "arrows")?
        .as_array()
        .ok_or_else(|| Error::schema("appearance.grouping.arrows", "expected an array"))?;

    let mut arrows: Vec<Connection> = Vec::with_capacity(arrows_value.len());
    for (idx, value) in arrows_value.iter().enumerate() {
        let path = format!("appearance.grouping.arrows[{}]", idx);
        arrows.push(from_value(value, &path)?);
    }

    Ok(Document {
        seq_clock,
        par_clock,
        cubes,
        appearance: Appearance {
            background_color,
            legend,
            grouping: Grouping { groups, arrows },
        },
    })
}

/// Structural element checks: the `cube`/`image` discriminator must be
/// unambiguous, and cube elements must carry their per-cuboid style lists.
fn validate_group(group_path: &str, group: &Group) -> Result<()> {
    for (idx, element) in group.elements.iter().enumerate() {
        let path = format!("{}.elements[{}]", group_path, idx);
        validate_element(&path, element)?;
    }
    Ok(())
}

fn validate_element(path: &str, element: &ElementConfig) -> Result<()> {
    match (&element.cube, &element.image) {
        (Some(_), Some(_)) => {
            return Err(Error::schema(
                path,
                "element carries both `cube` and `image` discriminators",
            ));
        }
        (None, None) => {
            return Err(Error::schema(
                path,
                "element carries neither `cube` nor `image` discriminator",
            ));
        }
        _ => {}
    }

    if element.cube.is_some() {
        if element.line_widths.is_none() {
            return Err(Error::schema(
                format!("{}.line width", path),
                "cube element is missing its per-cuboid line width list",
            ));
        }
        if element.colors.is_none() {
            return Err(Error::schema(
                format!("{}.colors", path),
                "cube element is missing its per-cuboid color list",
            ));
        }
    }

    Ok(())
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| Error::schema(path, "expected an object"))
}

fn require<'a>(obj: &'a Map<String, Value>, parent: &str, key: &str) -> Result<&'a Value> {
    obj.get(key)
        .ok_or_else(|| Error::schema(join_path(parent, key), format!("missing key `{}`", key)))
}

fn field<T: DeserializeOwned>(obj: &Map<String, Value>, parent: &str, key: &str) -> Result<T> {
    from_value(require(obj, parent, key)?, &join_path(parent, key))
}

fn from_value<T: DeserializeOwned>(value: &Value, path: &str) -> Result<T> {
    serde_json::from_value(value.clone()).map_err(|e| Error::schema(path, e.to_string()))
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}
