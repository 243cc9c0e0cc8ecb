//! Canonical model: the target-independent vocabulary every backend renders.
//!
//! A fixture is parsed into a `FixtureDocument` (a petgraph tree of styled
//! nodes), then lowered into `TestCase`s: ordered lists of `Operation`s
//! over `StyleOp`s and `StyleValue`s. Nothing here knows any target syntax.

use crate::id::NodeName;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

// ─── Canonical names ─────────────────────────────────────────────────────

/// A closed enumeration with a target-neutral type and variant name.
///
/// Backends derive their constant spelling from these two strings, e.g.
/// `("Align", "FlexStart")` becomes `YGAlignFlexStart`, `YogaAlign.FLEX_START`,
/// `Align.FlexStart` or `yoga.AlignFlexStart`.
pub trait CanonicalName: Copy + 'static {
    /// Type name, e.g. `"Align"`.
    const TYPE_NAME: &'static str;

    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    /// Variant name, e.g. `"FlexStart"`.
    fn variant_name(self) -> &'static str;

    /// The CSS keyword the fixture uses for this variant.
    fn css_keyword(self) -> &'static str;

    /// Look up a variant by CSS keyword (ASCII case-insensitive).
    fn from_css(keyword: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.css_keyword().eq_ignore_ascii_case(keyword.trim()))
    }

    /// Look up a variant by its canonical variant name.
    fn from_variant_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.variant_name() == name.trim())
    }
}

macro_rules! canonical_enum {
    (
        $(#[$meta:meta])*
        $name:ident => $type_name:literal {
            $($variant:ident => ($canonical:literal, $css:literal),)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant,)+
        }

        impl CanonicalName for $name {
            const TYPE_NAME: &'static str = $type_name;
            const ALL: &'static [Self] = &[$(Self::$variant,)+];

            fn variant_name(self) -> &'static str {
                match self {
                    $(Self::$variant => $canonical,)+
                }
            }

            fn css_keyword(self) -> &'static str {
                match self {
                    $(Self::$variant => $css,)+
                }
            }
        }
    };
}

canonical_enum! {
    /// Cross-axis alignment (`align-items`, `align-self`, `align-content`).
    Align => "Align" {
        Auto => ("Auto", "auto"),
        FlexStart => ("FlexStart", "flex-start"),
        Center => ("Center", "center"),
        FlexEnd => ("FlexEnd", "flex-end"),
        Stretch => ("Stretch", "stretch"),
        Baseline => ("Baseline", "baseline"),
        SpaceBetween => ("SpaceBetween", "space-between"),
        SpaceAround => ("SpaceAround", "space-around"),
        SpaceEvenly => ("SpaceEvenly", "space-evenly"),
    }
}

canonical_enum! {
    /// Main-axis distribution (`justify-content`).
    Justify => "Justify" {
        FlexStart => ("FlexStart", "flex-start"),
        Center => ("Center", "center"),
        FlexEnd => ("FlexEnd", "flex-end"),
        SpaceBetween => ("SpaceBetween", "space-between"),
        SpaceAround => ("SpaceAround", "space-around"),
        SpaceEvenly => ("SpaceEvenly", "space-evenly"),
    }
}

canonical_enum! {
    /// Layout direction.
    Direction => "Direction" {
        Inherit => ("Inherit", "inherit"),
        Ltr => ("LTR", "ltr"),
        Rtl => ("RTL", "rtl"),
    }
}

canonical_enum! {
    FlexDirection => "FlexDirection" {
        Column => ("Column", "column"),
        ColumnReverse => ("ColumnReverse", "column-reverse"),
        Row => ("Row", "row"),
        RowReverse => ("RowReverse", "row-reverse"),
    }
}

canonical_enum! {
    Overflow => "Overflow" {
        Visible => ("Visible", "visible"),
        Hidden => ("Hidden", "hidden"),
        Scroll => ("Scroll", "scroll"),
    }
}

canonical_enum! {
    PositionType => "PositionType" {
        Static => ("Static", "static"),
        Relative => ("Relative", "relative"),
        Absolute => ("Absolute", "absolute"),
    }
}

canonical_enum! {
    Display => "Display" {
        Flex => ("Flex", "flex"),
        None => ("None", "none"),
        Contents => ("Contents", "contents"),
    }
}

canonical_enum! {
    Wrap => "Wrap" {
        NoWrap => ("NoWrap", "nowrap"),
        Wrap => ("Wrap", "wrap"),
        WrapReverse => ("WrapReverse", "wrap-reverse"),
    }
}

canonical_enum! {
    BoxSizing => "BoxSizing" {
        BorderBox => ("BorderBox", "border-box"),
        ContentBox => ("ContentBox", "content-box"),
    }
}

canonical_enum! {
    /// Box edge addressed by margin, padding, border and position setters.
    /// `Start`/`End` are direction-relative; the fixture transform normally
    /// rewrites them to physical edges before lowering.
    Edge => "Edge" {
        Left => ("Left", "left"),
        Top => ("Top", "top"),
        Right => ("Right", "right"),
        Bottom => ("Bottom", "bottom"),
        Start => ("Start", "start"),
        End => ("End", "end"),
        Horizontal => ("Horizontal", "horizontal"),
        Vertical => ("Vertical", "vertical"),
        All => ("All", "all"),
    }
}

canonical_enum! {
    Gutter => "Gutter" {
        Column => ("Column", "column"),
        Row => ("Row", "row"),
        All => ("All", "all"),
    }
}

canonical_enum! {
    ExperimentalFeature => "ExperimentalFeature" {
        WebFlexBasis => ("WebFlexBasis", "web-flex-basis"),
        AbsolutePercentageAgainstPaddingEdge => (
            "AbsolutePercentageAgainstPaddingEdge",
            "absolute-percentage-against-padding-edge"
        ),
    }
}

/// Experimental features enabled for one test case. Rarely more than one.
pub type Experiments = SmallVec<[ExperimentalFeature; 2]>;

// ─── Values ──────────────────────────────────────────────────────────────

/// A classified style value. Exactly one variant per textual form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StyleValue {
    /// `<number>px` (or a bare `0`).
    Points(f32),
    /// `<number>%`.
    Percent(f32),
    Auto,
    MaxContent,
    FitContent,
    Stretch,
    Undefined,
}

// ─── Operations ──────────────────────────────────────────────────────────

/// A single style setter with its canonical argument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StyleOp {
    Direction(Direction),
    FlexDirection(FlexDirection),
    JustifyContent(Justify),
    AlignContent(Align),
    AlignItems(Align),
    AlignSelf(Align),
    PositionType(PositionType),
    FlexWrap(Wrap),
    Overflow(Overflow),
    Display(Display),
    BoxSizing(BoxSizing),
    FlexGrow(f32),
    FlexShrink(f32),
    AspectRatio(f32),
    FlexBasis(StyleValue),
    Width(StyleValue),
    Height(StyleValue),
    MinWidth(StyleValue),
    MinHeight(StyleValue),
    MaxWidth(StyleValue),
    MaxHeight(StyleValue),
    Margin(Edge, StyleValue),
    Padding(Edge, StyleValue),
    Position(Edge, StyleValue),
    Border(Edge, f32),
    Gap(Gutter, StyleValue),
}

/// Computed layout quantity read back after layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutField {
    Left,
    Top,
    Width,
    Height,
}

impl LayoutField {
    /// In the order assertions are emitted for each node.
    pub const ALL: [LayoutField; 4] = [
        LayoutField::Left,
        LayoutField::Top,
        LayoutField::Width,
        LayoutField::Height,
    ];

    /// Capitalized name, e.g. `"Left"`, used to build accessor calls.
    pub fn name(self) -> &'static str {
        match self {
            LayoutField::Left => "Left",
            LayoutField::Top => "Top",
            LayoutField::Width => "Width",
            LayoutField::Height => "Height",
        }
    }
}

/// A target-independent test instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    DeclareNode {
        node: NodeName,
    },
    SetStyle {
        node: NodeName,
        style: StyleOp,
    },
    InsertChild {
        parent: NodeName,
        child: NodeName,
        index: usize,
    },
    CalculateLayout {
        node: NodeName,
        direction: Direction,
    },
    AssertLayout {
        node: NodeName,
        field: LayoutField,
        expected: f32,
    },
}

/// One generated test function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Function name, e.g. `margin_start_ltr`.
    pub name: String,
    /// Direction passed to layout calculation.
    pub direction: Direction,
    pub experiments: Experiments,
    /// Emitted with the framework's native skip; the body is still present.
    pub disabled: bool,
    pub operations: Vec<Operation>,
}

// ─── Fixture tree ────────────────────────────────────────────────────────

/// One `<div>` of a fixture.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FixtureNode {
    /// The `id` attribute. Required on top-level nodes (it names the test).
    pub id: Option<String>,
    /// Raw inline `style` text.
    pub style: String,
    pub experiments: Experiments,
    pub disabled: bool,
}

/// A parsed fixture: top-level nodes are test cases, nested nodes are children.
#[derive(Debug, Clone)]
pub struct FixtureDocument {
    /// The underlying directed graph.
    pub graph: StableDiGraph<FixtureNode, ()>,

    /// Synthetic document root; its children are the test cases.
    pub root: NodeIndex,

    /// Test id → first top-level node carrying it.
    pub id_index: HashMap<String, NodeIndex>,
}

impl FixtureDocument {
    /// Create an empty document with a synthetic root.
    #[must_use]
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let root = graph.add_node(FixtureNode::default());
        Self {
            graph,
            root,
            id_index: HashMap::new(),
        }
    }

    /// Add a node as a child of `parent`, returning its index.
    pub fn add_node(&mut self, parent: NodeIndex, node: FixtureNode) -> NodeIndex {
        let top_level = parent == self.root;
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.graph.add_edge(parent, idx, ());
        if let (true, Some(id)) = (top_level, id) {
            self.id_index.entry(id).or_insert(idx);
        }
        idx
    }

    /// Children of a node in document order.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        children.sort();
        children
    }

    /// The top-level test nodes in document order.
    pub fn tests(&self) -> Vec<NodeIndex> {
        self.children(self.root)
    }

    /// The first top-level test node with this id. Later tests reusing the
    /// id are not indexed.
    pub fn first_test(&self, id: &str) -> Option<NodeIndex> {
        self.id_index.get(id).copied()
    }
}

impl Default for FixtureDocument {
    fn default() -> Self {
        Self::new()
    }
}
