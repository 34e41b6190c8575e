//! Template materialization.
//!
//! Produces the runtime-editable copy of the input document: a deep copy of
//! the raw parsed tree in which every runtime-adjustable field is overwritten
//! with the placeholder symbol derived from its owning entity's internal id.
//! The original tree is never touched; the emitter keeps reading authored
//! values while the copy carries the placeholders.
//!
//! The copy is serialized as pretty JSON, a strict subset of the tolerant
//! grammar the loader accepts, so the downstream runtime can re-read it with
//! the same parser.

use crate::compile::resolve::{ResolvedDetail, ResolvedScene};
use crate::compile::types::{Document, CAMERA_KEYS, COLOR_SET_KEYS};
use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// Materialize the template document and serialize it for embedding.
pub fn materialize(raw: &Value, document: &Document, scene: &ResolvedScene) -> Result<String> {
    let mut copy = raw.clone();

    let groups = object_at_mut(&mut copy, &["appearance", "grouping", "groups"])?;

    for (group, resolved) in document
        .appearance
        .grouping
        .groups
        .iter()
        .zip(&scene.groups)
    {
        let (name, group) = group;
        let path = format!("appearance.grouping.groups.{}", name);

        let group_value = groups
            .get_mut(name)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| Error::schema(path.as_str(), "group missing from template copy"))?;

        group_value.insert(
            "position".to_string(),
            placeholder(&resolved.internal_id, "position"),
        );

        let elements = group_value
            .get_mut("elements")
            .and_then(Value::as_array_mut)
            .ok_or_else(|| Error::schema(format!("{}.elements", path), "expected an array"))?;

        for ((index, element), resolved_element) in
            elements.iter_mut().enumerate().zip(&resolved.elements)
        {
            let element_path = format!("{}.elements[{}]", path, index);
            let element_value = element
                .as_object_mut()
                .ok_or_else(|| Error::schema(element_path.as_str(), "expected an object"))?;

            let id = &resolved_element.internal_id;
            element_value.insert("scale".to_string(), placeholder(id, "scale"));
            element_value.insert("position".to_string(), placeholder(id, "position"));

            if let ResolvedDetail::Cube { cuboids } = &resolved_element.detail {
                substitute_colors(element_value, id, cuboids.len(), &element_path)?;

                let authored = &group.elements[index];
                if authored.heatmap.is_some() {
                    substitute_heatmap(element_value, id, &element_path)?;
                }

                substitute_camera(element_value, id);
            }
        }
    }

    serde_json::to_string_pretty(&copy).map_err(|e| Error::schema("<template>", e.to_string()))
}

fn substitute_colors(
    element: &mut Map<String, Value>,
    id: &str,
    count: usize,
    path: &str,
) -> Result<()> {
    let colors = element
        .get_mut("colors")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| Error::schema(format!("{}.colors", path), "expected an array"))?;

    for (index, entry) in colors.iter_mut().enumerate().take(count) {
        let entry = entry.as_object_mut().ok_or_else(|| {
            Error::schema(format!("{}.colors[{}]", path, index), "expected an object")
        })?;

        for key in COLOR_SET_KEYS {
            entry.insert(
                key.to_string(),
                Value::String(format!("{}_colors_{}_{}", id, key, index)),
            );
        }
    }

    Ok(())
}

fn substitute_heatmap(element: &mut Map<String, Value>, id: &str, path: &str) -> Result<()> {
    let heatmap = element
        .get_mut("heatmap")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| Error::schema(format!("{}.heatmap", path), "expected an object"))?;

    for key in ["cuboid", "colors", "colors_start"] {
        heatmap.insert(
            key.to_string(),
            Value::String(format!("{}_heatmap_{}", id, key)),
        );
    }

    Ok(())
}

fn substitute_camera(element: &mut Map<String, Value>, id: &str) {
    // The camera block is created on the copy when the element has none, so
    // the runtime can always adjust it.
    let camera = element
        .entry("camera".to_string())
        .or_insert_with(|| Value::Object(Map::new()));

    if let Some(camera) = camera.as_object_mut() {
        for key in CAMERA_KEYS {
            camera.insert(
                key.to_string(),
                Value::String(format!("{}_camera_{}", id, key)),
            );
        }
    }
}

fn placeholder(id: &str, field: &str) -> Value {
    Value::String(format!("{}_{}", id, field))
}

fn object_at_mut<'a>(value: &'a mut Value, keys: &[&str]) -> Result<&'a mut Map<String, Value>> {
    let mut current = value;
    let mut walked = String::new();

    for key in keys {
        if !walked.is_empty() {
            walked.push('.');
        }
        walked.push_str(key);

        current = current
            .get_mut(*key)
            .ok_or_else(|| Error::schema(walked.clone(), format!("missing key `{}`", key)))?;
    }

    current
        .as_object_mut()
        .ok_or_else(|| Error::schema(walked, "expected an object"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::idgen::SymbolAllocator;
    use crate::compile::loader;
    use crate::compile::resolve;

    const DOC: &str = r#"{
        "seq_clock": { "i": [0, 10] },
        "par_clock": {},
        "cubes": { "C": [[["i"], ["i", "0"], ["i", "1"], ["i", "2"]]] },
        "appearance": {
            "background color": [0, 0, 0, 1],
            "legend": {},
            "grouping": {
                "groups": {
                    "G": {
                        "text": "G", "text color": [1, 1, 1, 1],
                        "border": { "line width": 2, "color": [1, 1, 1, 1] },
                        "position": [3, 4],
                        "elements": [{
                            "text": "V", "text color": [1, 1, 1, 1],
                            "border": { "line width": 1, "color": [0, 0, 0, 1] },
                            "scale": 1.5, "position": [10, 20],
                            "cube": "C",
                            "line width": [0.5],
                            "colors": [{
                                "fill_active": [1, 0, 0, 1], "fill_inactive": [0, 0, 0, 1],
                                "border_active": [1, 1, 0, 1], "border_inactive": [0, 0, 0, 1],
                                "oob_active": [0, 1, 0, 1], "oob_inactive": [0, 0, 0, 1]
                            }]
                        }]
                    }
                },
                "arrows": []
            }
        }
    }"#;

    fn materialized() -> (Value, String, String) {
        let loaded = loader::load_str(DOC).expect("document should load");
        let mut alloc = SymbolAllocator::seeded(0);
        let scene =
            resolve::resolve(&loaded.document, &mut alloc).expect("document should resolve");

        let group_id = scene.groups[0].internal_id.clone();
        let element_id = scene.groups[0].elements[0].internal_id.clone();

        let text = materialize(&loaded.raw, &loaded.document, &scene)
            .expect("template should materialize");
        let value: Value = serde_json::from_str(&text).expect("template should re-parse");
        (value, group_id, element_id)
    }

    #[test]
    fn test_group_position_replaced() {
        let (value, group_id, _) = materialized();
        let group = &value["appearance"]["grouping"]["groups"]["G"];
        assert_eq!(
            group["position"],
            Value::String(format!("{}_position", group_id))
        );
    }

    #[test]
    fn test_element_fields_replaced() {
        let (value, _, element_id) = materialized();
        let element = &value["appearance"]["grouping"]["groups"]["G"]["elements"][0];

        assert_eq!(
            element["scale"],
            Value::String(format!("{}_scale", element_id))
        );
        assert_eq!(
            element["colors"][0]["oob_inactive"],
            Value::String(format!("{}_colors_oob_inactive_0", element_id))
        );
    }

    #[test]
    fn test_camera_block_created_with_placeholders() {
        let (value, _, element_id) = materialized();
        let camera = &value["appearance"]["grouping"]["groups"]["G"]["elements"][0]["camera"];

        assert_eq!(
            camera["fov"],
            Value::String(format!("{}_camera_fov", element_id))
        );
        assert_eq!(camera.as_object().map(|c| c.len()), Some(CAMERA_KEYS.len()));
    }

    #[test]
    fn test_non_placeholder_fields_untouched() {
        let (value, _, _) = materialized();
        let group = &value["appearance"]["grouping"]["groups"]["G"];

        assert_eq!(group["text"], Value::String("G".to_string()));
        assert_eq!(group["border"]["line width"], Value::from(2));
        assert_eq!(
            value["cubes"]["C"][0][0][0],
            Value::String("i".to_string())
        );
    }

    #[test]
    fn test_original_tree_not_mutated() {
        let loaded = loader::load_str(DOC).expect("document should load");
        let before = loaded.raw.clone();

        let mut alloc = SymbolAllocator::seeded(0);
        let scene =
            resolve::resolve(&loaded.document, &mut alloc).expect("document should resolve");
        materialize(&loaded.raw, &loaded.document, &scene).expect("template should materialize");

        assert_eq!(loaded.raw, before);
    }
}
