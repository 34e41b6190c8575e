//! Type definitions for the scene configuration document.
//!
//! These types mirror the authored JSON structure. Map-valued sections use
//! `IndexMap` because emission order follows document order, and scalar
//! numbers are kept as `serde_json::Number` so that integer and float
//! literals survive re-serialization unchanged.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Number;
use std::fmt;

/// An RGBA (or RGB) color as authored: a list of numeric components.
pub type Color = Vec<Number>;

/// Variable kind, matching the two clock sections of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Sequential,
    Parallel,
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableKind::Sequential => write!(f, "SEQUENTIAL"),
            VariableKind::Parallel => write!(f, "PARALLEL"),
        }
    }
}

/// An opaque axis expression: either an integer literal or a source fragment
/// in the output language. Never parsed or validated here.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Expr {
    Literal(Number),
    Source(String),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(n) => write!(f, "{}", n),
            Expr::Source(s) => write!(f, "{}", s),
        }
    }
}

/// Authored shape of one mapping entry:
/// `[[required variables...], [x, y], [x, y], [x, y]]`.
#[derive(Debug, Clone, Deserialize)]
pub struct MappingEntryRepr(
    Vec<String>,
    (Expr, Expr),
    (Expr, Expr),
    (Expr, Expr),
);

/// One entry of a cube definition: the variables the entry requires, plus one
/// `(x, y)` expression pair per axis position.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "MappingEntryRepr")]
pub struct MappingEntry {
    pub required_variables: Vec<String>,
    pub axis_expressions: [(Expr, Expr); 3],
}

impl From<MappingEntryRepr> for MappingEntry {
    fn from(repr: MappingEntryRepr) -> Self {
        MappingEntry {
            required_variables: repr.0,
            axis_expressions: [repr.1, repr.2, repr.3],
        }
    }
}

/// A named cube definition is an ordered list of mapping entries.
pub type CubeDefinition = Vec<MappingEntry>;

/// Border styling shared by groups and elements.
#[derive(Debug, Clone, Deserialize)]
pub struct Border {
    #[serde(rename = "line width")]
    pub line_width: Number,
    pub color: Color,
}

/// The six per-cuboid color tuples.
#[derive(Debug, Clone, Deserialize)]
pub struct ColorSet {
    pub fill_active: Color,
    pub fill_inactive: Color,
    pub border_active: Color,
    pub border_inactive: Color,
    pub oob_active: Color,
    pub oob_inactive: Color,
}

/// Template placeholder keys of a [`ColorSet`], in authored order.
pub const COLOR_SET_KEYS: [&str; 6] = [
    "fill_active",
    "fill_inactive",
    "border_active",
    "border_inactive",
    "oob_active",
    "oob_inactive",
];

impl ColorSet {
    /// The color tuples in [`COLOR_SET_KEYS`] order.
    pub fn components(&self) -> [&Color; 6] {
        [
            &self.fill_active,
            &self.fill_inactive,
            &self.border_active,
            &self.border_inactive,
            &self.oob_active,
            &self.oob_inactive,
        ]
    }
}

/// Optional per-element heatmap block.
#[derive(Debug, Clone, Deserialize)]
pub struct Heatmap {
    pub cuboid: Number,
    pub colors: Vec<Color>,
    pub colors_start: Vec<Number>,
}

/// Optional per-element camera block. All fields are required when the block
/// is authored; an absent block falls back to [`Camera::default`].
#[derive(Debug, Clone, Deserialize)]
pub struct Camera {
    pub fixed: bool,
    pub active: bool,
    pub perspective: bool,
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub distance: f64,
    pub orthographic_width: f64,
    pub orthographic_height: f64,
    pub horizontal_angle: f64,
    pub vertical_angle: f64,
    pub position: [f64; 3],
    pub rotation: [f64; 3],
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            fixed: false,
            active: false,
            perspective: true,
            fov: 70.0,
            aspect: 1.0,
            near: 0.3,
            far: 10000.0,
            distance: 1.0,
            orthographic_width: 1.0,
            orthographic_height: 1.0,
            horizontal_angle: 0.0,
            vertical_angle: 0.0,
            position: [0.0; 3],
            rotation: [0.0; 3],
        }
    }
}

/// Template placeholder keys of a camera block.
pub const CAMERA_KEYS: [&str; 14] = [
    "fixed",
    "active",
    "perspective",
    "fov",
    "aspect",
    "near",
    "far",
    "distance",
    "orthographic_width",
    "orthographic_height",
    "horizontal_angle",
    "vertical_angle",
    "position",
    "rotation",
];

/// A single element as authored. The `cube`/`image` discriminator is
/// validated by the loader: exactly one of the two must be present.
#[derive(Debug, Clone, Deserialize)]
pub struct ElementConfig {
    pub text: String,
    #[serde(rename = "text color")]
    pub text_color: Color,
    pub border: Border,
    pub scale: Number,
    pub position: (Number, Number),

    /// Name of the referenced cube definition (cube elements only).
    #[serde(default)]
    pub cube: Option<String>,
    /// Per-cuboid line widths (cube elements only).
    #[serde(rename = "line width", default)]
    pub line_widths: Option<Vec<Number>>,
    /// Per-cuboid color sets (cube elements only).
    #[serde(default)]
    pub colors: Option<Vec<ColorSet>>,
    #[serde(default)]
    pub heatmap: Option<Heatmap>,
    #[serde(default)]
    pub camera: Option<Camera>,

    /// Image resource path (image elements only).
    #[serde(default)]
    pub image: Option<String>,
}

/// A visual group: shared styling plus an ordered list of elements.
#[derive(Debug, Clone, Deserialize)]
pub struct Group {
    pub text: String,
    #[serde(rename = "text color")]
    pub text_color: Color,
    pub border: Border,
    pub position: (Number, Number),
    pub elements: Vec<ElementConfig>,
}

/// A directed arrow between two group anchors.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection {
    #[serde(rename = "start group")]
    pub start_group: String,
    #[serde(rename = "start group connection point")]
    pub start_point: String,
    #[serde(rename = "end group")]
    pub end_group: String,
    #[serde(rename = "end group connection point")]
    pub end_point: String,
    pub color: Color,
    #[serde(rename = "head size")]
    pub head_size: Number,
    #[serde(rename = "line width")]
    pub line_width: Number,
}

/// One legend entry, keyed by name in the document.
#[derive(Debug, Clone, Deserialize)]
pub struct LegendEntry {
    pub text: String,
    pub color: Color,
    #[serde(rename = "text color")]
    pub text_color: Color,
}

/// The grouping block: named groups plus the arrow list.
#[derive(Debug, Clone)]
pub struct Grouping {
    pub groups: IndexMap<String, Group>,
    pub arrows: Vec<Connection>,
}

/// The appearance block.
#[derive(Debug, Clone)]
pub struct Appearance {
    pub background_color: Color,
    pub legend: IndexMap<String, LegendEntry>,
    pub grouping: Grouping,
}

/// The whole parsed configuration document.
#[derive(Debug, Clone)]
pub struct Document {
    pub seq_clock: IndexMap<String, (i64, i64)>,
    pub par_clock: IndexMap<String, (i64, i64)>,
    pub cubes: IndexMap<String, CubeDefinition>,
    pub appearance: Appearance,
}
