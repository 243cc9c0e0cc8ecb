//! Emitter: `TestCase`s → test source text for one target framework.
//!
//! A `Backend` supplies target syntax for each protocol step; `render_file`
//! owns the walk over operations and the blank-line layout, so every backend
//! produces structurally identical files.

use crate::backends::{CppBackend, GoBackend, JavaBackend, JavaScriptBackend};
use crate::buffer::{EmitBuffer, EmitError};
use crate::id::NodeName;
use crate::model::*;
use crate::value::{LengthProperty, Route, ValueError, route};
use serde::{Deserialize, Serialize};

// ─── Backend identity ────────────────────────────────────────────────────

/// The four supported targets, in the fixed order hosts run them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BackendKind {
    Cpp,
    Java,
    JavaScript,
    Go,
}

impl BackendKind {
    pub const ALL: [BackendKind; 4] = [
        BackendKind::Cpp,
        BackendKind::Java,
        BackendKind::JavaScript,
        BackendKind::Go,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Cpp => "cpp",
            BackendKind::Java => "java",
            BackendKind::JavaScript => "javascript",
            BackendKind::Go => "go",
        }
    }

    /// Position in the fixed emission order.
    pub fn slot(self) -> usize {
        self as usize
    }

    /// The stateless emitter for this target.
    pub fn backend(self) -> &'static dyn Backend {
        match self {
            BackendKind::Cpp => &CppBackend,
            BackendKind::Java => &JavaBackend,
            BackendKind::JavaScript => &JavaScriptBackend,
            BackendKind::Go => &GoBackend,
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Backend trait ───────────────────────────────────────────────────────

/// Target syntax for each step of the emission protocol.
///
/// Implementations are stateless; all mutable state lives in the
/// `EmitBuffer` passed to every call.
pub trait Backend: Sync {
    fn kind(&self) -> BackendKind;

    /// One indentation level.
    fn indent_unit(&self) -> &'static str;

    /// File header (with the signing placeholder), imports, and any wrapper opening.
    fn emit_prologue(&self, out: &mut EmitBuffer, fixture: &str);

    /// Closes whatever the prologue opened.
    fn emit_epilogue(&self, out: &mut EmitBuffer) -> Result<(), EmitError>;

    /// Test header, native skip marker, config creation, experiment toggles.
    fn emit_test_prologue(
        &self,
        out: &mut EmitBuffer,
        name: &str,
        experiments: &[ExperimentalFeature],
        disabled: bool,
    );

    /// Resource release (where the target needs it) and block close.
    fn emit_test_epilogue(&self, out: &mut EmitBuffer) -> Result<(), EmitError>;

    fn declare_node(&self, out: &mut EmitBuffer, node: NodeName);

    fn insert_child(&self, out: &mut EmitBuffer, parent: NodeName, child: NodeName, index: usize);

    fn calculate_layout(&self, out: &mut EmitBuffer, node: NodeName, direction: Direction);

    /// Reject calls the target runtime does not provide. The shared support
    /// table in `value::route` is the upper bound; targets may only narrow it.
    fn supports(&self, _call: &StyleCall) -> Result<(), ValueError> {
        Ok(())
    }

    /// Emit one setter call, or a marker comment for unsupported combinations.
    fn set_style(&self, out: &mut EmitBuffer, node: NodeName, call: StyleCall);

    /// Expression reading a computed layout field.
    fn layout_accessor(&self, node: NodeName, field: LayoutField) -> String;

    fn assert_eq(&self, out: &mut EmitBuffer, expected: f32, actual: &str);
}

// ─── Style calls ─────────────────────────────────────────────────────────

/// A canonical enum constant, spelled per target by each backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumConst {
    pub type_name: &'static str,
    pub variant: &'static str,
}

impl EnumConst {
    pub fn of<T: CanonicalName>(value: T) -> Self {
        Self {
            type_name: T::TYPE_NAME,
            variant: value.variant_name(),
        }
    }
}

/// Target-neutral shape of a setter call. Backends render these four shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleCall {
    /// `set<setter>(<enum constant>)`.
    Enum { setter: &'static str, value: EnumConst },
    /// `set<setter>(<number>)`.
    Number { setter: &'static str, value: f32 },
    /// `set<stem><route suffix>([target,] [value])`.
    Length {
        property: LengthProperty,
        target: Option<EnumConst>,
        route: Route,
        value: StyleValue,
    },
    /// `setBorder(edge, number)`.
    Border { edge: EnumConst, value: f32 },
}

impl StyleOp {
    /// Resolve this setter to a call shape via the shared support table.
    pub fn call(&self) -> Result<StyleCall, ValueError> {
        type CallResult = Result<StyleCall, ValueError>;
        let enumerated =
            |setter: &'static str, value: EnumConst| -> CallResult { Ok(StyleCall::Enum { setter, value }) };
        let number =
            |setter: &'static str, value: f32| -> CallResult { Ok(StyleCall::Number { setter, value }) };
        let length = |property: LengthProperty,
                      target: Option<EnumConst>,
                      value: &StyleValue|
         -> CallResult {
            Ok(StyleCall::Length {
                property,
                target,
                route: route(property, value)?,
                value: *value,
            })
        };

        match self {
            StyleOp::Direction(v) => enumerated("Direction", EnumConst::of(*v)),
            StyleOp::FlexDirection(v) => enumerated("FlexDirection", EnumConst::of(*v)),
            StyleOp::JustifyContent(v) => enumerated("JustifyContent", EnumConst::of(*v)),
            StyleOp::AlignContent(v) => enumerated("AlignContent", EnumConst::of(*v)),
            StyleOp::AlignItems(v) => enumerated("AlignItems", EnumConst::of(*v)),
            StyleOp::AlignSelf(v) => enumerated("AlignSelf", EnumConst::of(*v)),
            StyleOp::PositionType(v) => enumerated("PositionType", EnumConst::of(*v)),
            StyleOp::FlexWrap(v) => enumerated("FlexWrap", EnumConst::of(*v)),
            StyleOp::Overflow(v) => enumerated("Overflow", EnumConst::of(*v)),
            StyleOp::Display(v) => enumerated("Display", EnumConst::of(*v)),
            StyleOp::BoxSizing(v) => enumerated("BoxSizing", EnumConst::of(*v)),
            StyleOp::FlexGrow(v) => number("FlexGrow", *v),
            StyleOp::FlexShrink(v) => number("FlexShrink", *v),
            StyleOp::AspectRatio(v) => number("AspectRatio", *v),
            StyleOp::FlexBasis(v) => length(LengthProperty::FlexBasis, None, v),
            StyleOp::Width(v) => length(LengthProperty::Width, None, v),
            StyleOp::Height(v) => length(LengthProperty::Height, None, v),
            StyleOp::MinWidth(v) => length(LengthProperty::MinWidth, None, v),
            StyleOp::MinHeight(v) => length(LengthProperty::MinHeight, None, v),
            StyleOp::MaxWidth(v) => length(LengthProperty::MaxWidth, None, v),
            StyleOp::MaxHeight(v) => length(LengthProperty::MaxHeight, None, v),
            StyleOp::Margin(edge, v) => {
                length(LengthProperty::Margin, Some(EnumConst::of(*edge)), v)
            }
            StyleOp::Padding(edge, v) => {
                length(LengthProperty::Padding, Some(EnumConst::of(*edge)), v)
            }
            StyleOp::Position(edge, v) => {
                length(LengthProperty::Position, Some(EnumConst::of(*edge)), v)
            }
            StyleOp::Gap(gutter, v) => length(LengthProperty::Gap, Some(EnumConst::of(*gutter)), v),
            StyleOp::Border(edge, v) => Ok(StyleCall::Border {
                edge: EnumConst::of(*edge),
                value: *v,
            }),
        }
    }
}

/// Visible marker for a setter no target provides. Identical in every
/// backend since all four accept `//` line comments.
pub fn unsupported_marker(
    node: NodeName,
    property: LengthProperty,
    target: Option<EnumConst>,
    value: &StyleValue,
) -> String {
    match target {
        Some(t) => format!(
            "// {node}: {}({}) = {} is not supported",
            property.css_name(),
            t.variant,
            value.css()
        ),
        None => format!(
            "// {node}: {} = {} is not supported",
            property.css_name(),
            value.css()
        ),
    }
}

/// `FlexStart` → `FLEX_START`, `LTR` → `LTR`.
pub fn upper_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_ascii_uppercase() && prev_lower {
            out.push('_');
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        out.push(c.to_ascii_uppercase());
    }
    out
}

/// `margin_start_ltr` → `MarginStartLtr`.
pub fn export_name(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

// ─── Rendering ───────────────────────────────────────────────────────────

/// Render a whole output file for one backend.
///
/// Each test case is emitted into a child buffer and merged only after a
/// balanced epilogue.
///
/// # Errors
/// Any unroutable value or indentation imbalance aborts the whole file.
pub fn render_file(
    backend: &dyn Backend,
    fixture: &str,
    cases: &[TestCase],
) -> Result<String, EmitError> {
    let mut out = EmitBuffer::new(backend.indent_unit());
    backend.emit_prologue(&mut out, fixture);

    for case in cases {
        out.push_line("");
        let mut body = out.child();
        render_case(backend, &mut body, case)?;
        out.append(body)?;
    }

    backend.emit_epilogue(&mut out)?;
    out.flatten()
}

fn render_case(backend: &dyn Backend, out: &mut EmitBuffer, case: &TestCase) -> Result<(), EmitError> {
    backend.emit_test_prologue(out, &case.name, &case.experiments, case.disabled);

    let mut previous: Option<&Operation> = None;
    for op in &case.operations {
        if needs_blank_line(previous, op) {
            out.push_line("");
        }
        match op {
            Operation::DeclareNode { node } => backend.declare_node(out, *node),
            Operation::SetStyle { node, style } => {
                let call = style.call()?;
                backend.supports(&call)?;
                backend.set_style(out, *node, call);
            }
            Operation::InsertChild {
                parent,
                child,
                index,
            } => backend.insert_child(out, *parent, *child, *index),
            Operation::CalculateLayout { node, direction } => {
                backend.calculate_layout(out, *node, *direction)
            }
            Operation::AssertLayout {
                node,
                field,
                expected,
            } => {
                let actual = backend.layout_accessor(*node, *field);
                backend.assert_eq(out, *expected, &actual);
            }
        }
        previous = Some(op);
    }

    backend.emit_test_epilogue(out)
}

fn needs_blank_line(previous: Option<&Operation>, next: &Operation) -> bool {
    match (previous, next) {
        (None, _) => false,
        (Some(_), Operation::DeclareNode { .. }) => true,
        (Some(Operation::CalculateLayout { .. }), _) => true,
        (Some(Operation::AssertLayout { node: a, .. }), Operation::AssertLayout { node: b, .. }) => {
            a != b
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_snake_matches_java_constants() {
        assert_eq!(upper_snake("FlexStart"), "FLEX_START");
        assert_eq!(upper_snake("LTR"), "LTR");
        assert_eq!(upper_snake("NoWrap"), "NO_WRAP");
        assert_eq!(
            upper_snake("AbsolutePercentageAgainstPaddingEdge"),
            "ABSOLUTE_PERCENTAGE_AGAINST_PADDING_EDGE"
        );
    }

    #[test]
    fn export_name_camel_cases() {
        assert_eq!(export_name("margin_start_ltr"), "MarginStartLtr");
        assert_eq!(export_name("align_self_center"), "AlignSelfCenter");
    }

    #[test]
    fn style_calls_route_values() {
        let call = StyleOp::Margin(Edge::Left, StyleValue::Points(10.0)).call();
        assert_eq!(
            call,
            Ok(StyleCall::Length {
                property: LengthProperty::Margin,
                target: Some(EnumConst {
                    type_name: "Edge",
                    variant: "Left"
                }),
                route: Route::Points(10.0),
                value: StyleValue::Points(10.0),
            })
        );
        assert!(StyleOp::MinHeight(StyleValue::Auto).call().is_err());
    }

    #[test]
    fn backend_order_is_fixed() {
        let slots: Vec<usize> = BackendKind::ALL.iter().map(|k| k.slot()).collect();
        assert_eq!(slots, vec![0, 1, 2, 3]);
        for kind in BackendKind::ALL {
            assert_eq!(kind.backend().kind(), kind);
        }
    }

    #[test]
    fn blank_lines_group_assertions() {
        let root = NodeName::root();
        let child = root.child(0);
        let assert_on = |node| Operation::AssertLayout {
            node,
            field: LayoutField::Left,
            expected: 0.0,
        };
        assert!(!needs_blank_line(Some(&assert_on(root)), &assert_on(root)));
        assert!(needs_blank_line(Some(&assert_on(root)), &assert_on(child)));
        assert!(needs_blank_line(
            Some(&Operation::CalculateLayout {
                node: root,
                direction: Direction::Ltr
            }),
            &assert_on(root)
        ));
    }
}
