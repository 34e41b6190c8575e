//! Statement emission.
//!
//! The emitter walks the resolved scene in document order and produces a list
//! of typed [`Statement`] records, which a single renderer serializes into the
//! builder-API block substituted into the output skeleton. Keeping statements
//! as records (rather than concatenating text during the walk) means the
//! construction-before-reference ordering contract can be checked against the
//! list itself.

use crate::compile::idgen::SymbolAllocator;
use crate::compile::resolve::{CuboidInfo, ResolvedDetail, ResolvedScene};
use crate::compile::types::{Camera, Color, Connection, Document, VariableKind};
use serde_json::Number;
use std::fmt::Write;

/// One emitted builder-API statement.
#[derive(Debug, Clone)]
pub enum Statement {
    AddVariable {
        kind: VariableKind,
        name: String,
        low: i64,
        high: i64,
    },
    AddGroup {
        name: String,
        caption: String,
        border_width: Number,
        border_color: Color,
        caption_color: Color,
        internal_id: String,
        position: (Number, Number),
    },
    /// Declares a view container local and applies its element styling.
    ConstructContainer {
        container: String,
        internal_id: String,
        caption: String,
        scale: Number,
        position: (Number, Number),
        border_width: Number,
        border_color: Color,
        caption_color: Color,
    },
    ConstructCuboid {
        cuboid: String,
        info: CuboidInfo,
    },
    ConstructRequirementSet {
        set: String,
        variables: Vec<String>,
    },
    AddCuboid {
        container: String,
        cuboid: String,
        requirements: String,
    },
    AddHeatmap {
        container: String,
        cuboid: Number,
    },
    AddHeatmapColor {
        container: String,
        start: Number,
        color: Color,
    },
    AddCamera {
        container: String,
        camera: Camera,
    },
    RegisterContainer {
        internal_id: String,
        container: String,
    },
    RegisterGroupMembership {
        group: String,
        internal_id: String,
    },
    AddImageResource {
        scale: Number,
        border_width: Number,
        group: String,
        image: String,
        caption: String,
        border_color: Color,
        caption_color: Color,
        internal_id: String,
        position: (Number, Number),
        path: String,
    },
    AddConnection {
        connection: Connection,
    },
    SetBackground {
        color: Color,
    },
    AddLegendEntry {
        name: String,
        caption: String,
        caption_color: Color,
        color: Color,
    },
    EmbedTemplate {
        literal: String,
    },
}

impl Statement {
    /// The local symbol this statement constructs, if any.
    pub fn defines(&self) -> Option<&str> {
        match self {
            Statement::ConstructContainer { container, .. } => Some(container),
            Statement::ConstructCuboid { cuboid, .. } => Some(cuboid),
            Statement::ConstructRequirementSet { set, .. } => Some(set),
            _ => None,
        }
    }

    /// The local symbols this statement references.
    pub fn references(&self) -> Vec<&str> {
        match self {
            Statement::AddCuboid {
                container,
                cuboid,
                requirements,
            } => vec![container, cuboid, requirements],
            Statement::AddHeatmap { container, .. }
            | Statement::AddHeatmapColor { container, .. }
            | Statement::AddCamera { container, .. }
            | Statement::RegisterContainer { container, .. } => vec![container],
            _ => Vec::new(),
        }
    }
}

/// Walk the resolved scene and produce the full statement list, ending with
/// the embedded template literal.
pub fn emit(
    document: &Document,
    scene: &ResolvedScene,
    template_literal: String,
    allocator: &mut SymbolAllocator,
) -> Vec<Statement> {
    let mut statements = Vec::new();

    for (name, (low, high)) in &document.seq_clock {
        statements.push(Statement::AddVariable {
            kind: VariableKind::Sequential,
            name: name.clone(),
            low: *low,
            high: *high,
        });
    }
    for (name, (low, high)) in &document.par_clock {
        statements.push(Statement::AddVariable {
            kind: VariableKind::Parallel,
            name: name.clone(),
            low: *low,
            high: *high,
        });
    }

    for (group, resolved) in document
        .appearance
        .grouping
        .groups
        .values()
        .zip(&scene.groups)
    {
        statements.push(Statement::AddGroup {
            name: resolved.name.clone(),
            caption: group.text.clone(),
            border_width: group.border.line_width.clone(),
            border_color: group.border.color.clone(),
            caption_color: group.text_color.clone(),
            internal_id: resolved.internal_id.clone(),
            position: group.position.clone(),
        });

        for (element, resolved_element) in group.elements.iter().zip(&resolved.elements) {
            match &resolved_element.detail {
                ResolvedDetail::Cube { cuboids } => {
                    let container = allocator.allocate("v");

                    statements.push(Statement::ConstructContainer {
                        container: container.clone(),
                        internal_id: resolved_element.internal_id.clone(),
                        caption: element.text.clone(),
                        scale: element.scale.clone(),
                        position: element.position.clone(),
                        border_width: element.border.line_width.clone(),
                        border_color: element.border.color.clone(),
                        caption_color: element.text_color.clone(),
                    });

                    for info in cuboids {
                        let cuboid = allocator.allocate("c");
                        statements.push(Statement::ConstructCuboid {
                            cuboid: cuboid.clone(),
                            info: info.clone(),
                        });

                        let set = allocator.allocate("r");
                        statements.push(Statement::ConstructRequirementSet {
                            set: set.clone(),
                            variables: info.required_variables.clone(),
                        });

                        statements.push(Statement::AddCuboid {
                            container: container.clone(),
                            cuboid,
                            requirements: set,
                        });
                    }

                    if let Some(heatmap) = &element.heatmap {
                        statements.push(Statement::AddHeatmap {
                            container: container.clone(),
                            cuboid: heatmap.cuboid.clone(),
                        });

                        for (color, start) in heatmap.colors.iter().zip(&heatmap.colors_start) {
                            statements.push(Statement::AddHeatmapColor {
                                container: container.clone(),
                                start: start.clone(),
                                color: color.clone(),
                            });
                        }
                    }

                    // Elements without an authored camera still register one
                    // with the compiled-in defaults.
                    statements.push(Statement::AddCamera {
                        container: container.clone(),
                        camera: element.camera.clone().unwrap_or_default(),
                    });

                    statements.push(Statement::RegisterContainer {
                        internal_id: resolved_element.internal_id.clone(),
                        container,
                    });
                    statements.push(Statement::RegisterGroupMembership {
                        group: resolved.name.clone(),
                        internal_id: resolved_element.internal_id.clone(),
                    });
                }
                ResolvedDetail::Image => {
                    let image = allocator.allocate("img");
                    statements.push(Statement::AddImageResource {
                        scale: element.scale.clone(),
                        border_width: element.border.line_width.clone(),
                        group: resolved.name.clone(),
                        image,
                        caption: element.text.clone(),
                        border_color: element.border.color.clone(),
                        caption_color: element.text_color.clone(),
                        internal_id: resolved_element.internal_id.clone(),
                        position: element.position.clone(),
                        path: element.image.clone().unwrap_or_default(),
                    });
                }
            }
        }
    }

    for connection in &document.appearance.grouping.arrows {
        statements.push(Statement::AddConnection {
            connection: connection.clone(),
        });
    }

    statements.push(Statement::SetBackground {
        color: document.appearance.background_color.clone(),
    });

    for (name, entry) in &document.appearance.legend {
        statements.push(Statement::AddLegendEntry {
            name: name.clone(),
            caption: entry.text.clone(),
            caption_color: entry.text_color.clone(),
            color: entry.color.clone(),
        });
    }

    statements.push(Statement::EmbedTemplate {
        literal: template_literal,
    });

    tracing::debug!(statements = statements.len(), "statement list emitted");

    statements
}

/// Sections of the rendered block, separated by blank lines.
fn phase(statement: &Statement) -> u8 {
    match statement {
        Statement::AddVariable { .. } => 0,
        Statement::AddConnection { .. } => 2,
        Statement::SetBackground { .. } => 3,
        Statement::AddLegendEntry { .. } => 4,
        Statement::EmbedTemplate { .. } => 5,
        _ => 1,
    }
}

/// Serialize the statement list into the block substituted at the marker.
pub fn render_statements(statements: &[Statement]) -> String {
    let mut out = String::from("\n");
    let mut previous_phase: Option<u8> = None;

    for statement in statements {
        let current = phase(statement);
        if let Some(previous) = previous_phase {
            // The template literal follows the legend without separation.
            if previous != current && current != 5 {
                out.push('\n');
            }
        }
        previous_phase = Some(current);

        render_statement(&mut out, statement);
    }

    out
}

fn render_statement(out: &mut String, statement: &Statement) {
    match statement {
        Statement::AddVariable {
            kind,
            name,
            low,
            high,
        } => {
            let _ = writeln!(
                out,
                "    config_instance.add_variable(VariableType::{}, \"{}\", {}, {});",
                kind, name, low, high
            );
        }
        Statement::AddGroup {
            name,
            caption,
            border_width,
            border_color,
            caption_color,
            internal_id,
            position,
        } => {
            let _ = writeln!(
                out,
                "    config_instance.add_group(\"{}\", \"{}\", {}, {{ {} }}, {{ {} }}, \"{}\", {{ {} }});",
                name,
                caption,
                border_width,
                join_numbers(border_color),
                join_numbers(caption_color),
                internal_id,
                join_pair(position)
            );
        }
        Statement::ConstructContainer {
            container,
            internal_id,
            caption,
            scale,
            position,
            border_width,
            border_color,
            caption_color,
        } => {
            let _ = writeln!(out, "    auto {} = ViewContainer{{}};", container);
            let _ = writeln!(out, "    {}.set_size({}f);", container, scale);
            let _ = writeln!(
                out,
                "    {}.set_position({}f, {}f);",
                container, position.0, position.1
            );
            let _ = writeln!(out, "    {}.set_id(\"{}\");", container, internal_id);
            let _ = writeln!(out, "    {}.set_name(\"{}\");", container, caption);
            let _ = writeln!(out, "    {}.set_border_width({});", container, border_width);
            let _ = writeln!(
                out,
                "    {}.set_border_color({{ {} }});",
                container,
                join_numbers(border_color)
            );
            let _ = writeln!(
                out,
                "    {}.set_caption_color({{ {} }});",
                container,
                join_numbers(caption_color)
            );
        }
        Statement::ConstructCuboid { cuboid, info } => {
            let colors = info.colors.components();
            let _ = writeln!(out, "    auto {} = CuboidContainer{{", cuboid);
            let _ = writeln!(out, "        .line_width = {}f,", info.line_width);
            let _ = writeln!(out, "        .fill_active = {{ {} }},", join_numbers(colors[0]));
            let _ = writeln!(out, "        .fill_inactive = {{ {} }},", join_numbers(colors[1]));
            let _ = writeln!(out, "        .border_active = {{ {} }},", join_numbers(colors[2]));
            let _ = writeln!(out, "        .border_inactive = {{ {} }},", join_numbers(colors[3]));
            let _ = writeln!(out, "        .oob_active = {{ {} }},", join_numbers(colors[4]));
            let _ = writeln!(out, "        .oob_inactive = {{ {} }},", join_numbers(colors[5]));
            let _ = writeln!(out, "        .pos_size_callable = {},", info.callable);
            let _ = writeln!(out, "    }};");
        }
        Statement::ConstructRequirementSet { set, variables } => {
            let quoted: Vec<String> = variables.iter().map(|v| format!("\"{}\"", v)).collect();
            let _ = writeln!(
                out,
                "    auto {} = std::set<std::string>{{ {} }};",
                set,
                quoted.join(", ")
            );
        }
        Statement::AddCuboid {
            container,
            cuboid,
            requirements,
        } => {
            let _ = writeln!(out, "    {}.add_cuboid({}, {});", container, cuboid, requirements);
            out.push('\n');
        }
        Statement::AddHeatmap { container, cuboid } => {
            let _ = writeln!(out, "    {}.add_heatmap({});", container, cuboid);
        }
        Statement::AddHeatmapColor {
            container,
            start,
            color,
        } => {
            let _ = writeln!(
                out,
                "    {}.add_heatmap_color({}, {{ {} }});",
                container,
                start,
                join_numbers(color)
            );
        }
        Statement::AddCamera { container, camera } => {
            let _ = writeln!(
                out,
                "    {}.add_camera({}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {{ {} }}, {{ {} }});",
                container,
                camera.fixed,
                camera.active,
                camera.perspective,
                camera.fov,
                camera.aspect,
                camera.near,
                camera.far,
                camera.distance,
                camera.orthographic_width,
                camera.orthographic_height,
                camera.horizontal_angle,
                camera.vertical_angle,
                join_floats(&camera.position),
                join_floats(&camera.rotation)
            );
        }
        Statement::RegisterContainer {
            internal_id,
            container,
        } => {
            out.push('\n');
            let _ = writeln!(
                out,
                "    config_instance.add_view_container(\"{}\", {});",
                internal_id, container
            );
            out.push('\n');
        }
        Statement::RegisterGroupMembership { group, internal_id } => {
            let _ = writeln!(
                out,
                "    config_instance.add_group_view(\"{}\", \"{}\");",
                group, internal_id
            );
        }
        Statement::AddImageResource {
            scale,
            border_width,
            group,
            image,
            caption,
            border_color,
            caption_color,
            internal_id,
            position,
            path,
        } => {
            let _ = writeln!(
                out,
                "    config_instance.add_image_resource({}, {}, \"{}\", \"{}\", \"{}\", {{ {} }}, {{ {} }}, \"{}\", {{ {} }}, \"{}\");",
                scale,
                border_width,
                group,
                image,
                caption,
                join_numbers(border_color),
                join_numbers(caption_color),
                internal_id,
                join_pair(position),
                path
            );
            out.push('\n');
        }
        Statement::AddConnection { connection } => {
            let _ = writeln!(
                out,
                "    config_instance.add_group_connection(\"{}\", \"{}\", \"{}\", \"{}\", {{ {} }}, {}, {});",
                connection.start_group,
                connection.start_point,
                connection.end_group,
                connection.end_point,
                join_numbers(&connection.color),
                connection.head_size,
                connection.line_width
            );
        }
        Statement::SetBackground { color } => {
            let _ = writeln!(
                out,
                "    config_instance.set_background_color({{ {} }});",
                join_numbers(color)
            );
        }
        Statement::AddLegendEntry {
            name,
            caption,
            caption_color,
            color,
        } => {
            let _ = writeln!(
                out,
                "    config_instance.add_color_legend(\"{}\", \"{}\", {{ {} }}, {{ {} }});",
                name,
                caption,
                join_numbers(caption_color),
                join_numbers(color)
            );
        }
        Statement::EmbedTemplate { literal } => {
            let _ = writeln!(
                out,
                "    config_instance.add_config_template(R\"config({})config\");",
                literal
            );
        }
    }
}

fn join_numbers(values: &[Number]) -> String {
    values
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_pair(pair: &(Number, Number)) -> String {
    format!("{}, {}", pair.0, pair.1)
}

fn join_floats(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Number;

    fn variable(kind: VariableKind, name: &str) -> Statement {
        Statement::AddVariable {
            kind,
            name: name.to_string(),
            low: 0,
            high: 10,
        }
    }

    #[test]
    fn test_render_variable_statement() {
        let block = render_statements(&[variable(VariableKind::Sequential, "i")]);
        assert!(block.contains(
            "config_instance.add_variable(VariableType::SEQUENTIAL, \"i\", 0, 10);"
        ));
    }

    #[test]
    fn test_render_separates_phases_with_blank_lines() {
        let statements = vec![
            variable(VariableKind::Sequential, "i"),
            Statement::SetBackground {
                color: vec![Number::from(0), Number::from(0), Number::from(0)],
            },
        ];

        let block = render_statements(&statements);
        assert!(block.contains(");\n\n    config_instance.set_background_color"));
    }

    #[test]
    fn test_defines_and_references() {
        let construct = Statement::ConstructRequirementSet {
            set: "r_1".to_string(),
            variables: vec!["i".to_string()],
        };
        assert_eq!(construct.defines(), Some("r_1"));
        assert!(construct.references().is_empty());

        let add = Statement::AddCuboid {
            container: "v_0".to_string(),
            cuboid: "c_2".to_string(),
            requirements: "r_1".to_string(),
        };
        assert_eq!(add.defines(), None);
        assert_eq!(add.references(), vec!["v_0", "c_2", "r_1"]);
    }

    #[test]
    fn test_render_requirement_set() {
        let statement = Statement::ConstructRequirementSet {
            set: "r_9".to_string(),
            variables: vec!["i".to_string(), "j".to_string()],
        };

        let mut out = String::new();
        render_statement(&mut out, &statement);
        assert_eq!(
            out,
            "    auto r_9 = std::set<std::string>{ \"i\", \"j\" };\n"
        );
    }

    #[test]
    fn test_render_camera_defaults() {
        let statement = Statement::AddCamera {
            container: "v_0".to_string(),
            camera: Camera::default(),
        };

        let mut out = String::new();
        render_statement(&mut out, &statement);
        assert!(out.contains("v_0.add_camera(false, false, true, 70, 1, 0.3, 10000, 1, 1, 1, 0, 0, { 0, 0, 0 }, { 0, 0, 0 });"));
    }
}
