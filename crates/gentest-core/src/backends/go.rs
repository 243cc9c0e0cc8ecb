//! `testing` + testify emitter against the Go port (`github.com/millken/yoga`).

use super::{length_arguments, push_header};
use crate::buffer::{EmitBuffer, EmitError};
use crate::emitter::{Backend, BackendKind, EnumConst, StyleCall, export_name, unsupported_marker};
use crate::id::NodeName;
use crate::model::*;
use crate::value::{LengthProperty, Route, ValueError, format_number};

pub struct GoBackend;

fn constant(c: EnumConst) -> String {
    format!("yoga.{}{}", c.type_name, c.variant)
}

/// The Go port only knows `DisplayFlex` and `DisplayNone`.
const DISPLAY_CONTENTS: EnumConst = EnumConst {
    type_name: "Display",
    variant: "Contents",
};

/// Length setters present on `*yoga.Node`: no content keywords anywhere,
/// no `StyleSetPositionAuto`, and gaps in points only.
fn has_length_setter(property: LengthProperty, route: Route) -> bool {
    match route {
        Route::MaxContent | Route::FitContent | Route::Stretch => false,
        Route::Auto => property != LengthProperty::Position,
        Route::Percent(_) => property != LengthProperty::Gap,
        Route::Points(_) | Route::Undefined | Route::Unsupported => true,
    }
}

impl Backend for GoBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Go
    }

    fn indent_unit(&self) -> &'static str {
        "\t"
    }

    fn emit_prologue(&self, out: &mut EmitBuffer, fixture: &str) {
        push_header(out, fixture);
        out.push_lines(&[
            "package tests",
            "",
            "import (",
            "\t\"testing\"",
            "",
            "\t\"github.com/millken/yoga\"",
            "\t\"github.com/stretchr/testify/assert\"",
            ")",
        ]);
    }

    fn emit_epilogue(&self, _out: &mut EmitBuffer) -> Result<(), EmitError> {
        Ok(())
    }

    fn emit_test_prologue(
        &self,
        out: &mut EmitBuffer,
        name: &str,
        experiments: &[ExperimentalFeature],
        disabled: bool,
    ) {
        out.push_line(format!("func Test{}(t *testing.T) {{", export_name(name)));
        out.push_indent();
        if disabled {
            out.push_line("t.Skip(\"disabled in fixture\")");
            out.push_line("");
        }
        out.push_line("config := yoga.ConfigNew()");
        for feature in experiments {
            out.push_line(format!(
                "config.SetExperimentalFeatureEnabled({}, true)",
                constant(EnumConst::of(*feature))
            ));
        }
        out.push_line("");
    }

    fn emit_test_epilogue(&self, out: &mut EmitBuffer) -> Result<(), EmitError> {
        out.pop_indent()?;
        out.push_line("}");
        Ok(())
    }

    fn declare_node(&self, out: &mut EmitBuffer, node: NodeName) {
        out.push_line(format!("{node} := yoga.NewNodeWithConfig(config)"));
    }

    fn insert_child(&self, out: &mut EmitBuffer, parent: NodeName, child: NodeName, index: usize) {
        out.push_line(format!("{parent}.InsertChild({child}, {index})"));
    }

    fn calculate_layout(&self, out: &mut EmitBuffer, node: NodeName, direction: Direction) {
        let direction = constant(EnumConst::of(direction));
        out.push_line(format!("{node}.StyleSetDirection({direction})"));
        out.push_line(format!(
            "yoga.CalculateLayout({node}, yoga.Undefined, yoga.Undefined, {direction})"
        ));
    }

    fn supports(&self, call: &StyleCall) -> Result<(), ValueError> {
        match *call {
            StyleCall::Enum { setter, value } if setter == "BoxSizing" || value == DISPLAY_CONTENTS => {
                Err(ValueError::Unroutable {
                    property: setter,
                    value: value.variant.to_string(),
                })
            }
            StyleCall::Length {
                property,
                route,
                value,
                ..
            } if !has_length_setter(property, route) => Err(ValueError::Unroutable {
                property: property.css_name(),
                value: value.css(),
            }),
            _ => Ok(()),
        }
    }

    fn set_style(&self, out: &mut EmitBuffer, node: NodeName, call: StyleCall) {
        match call {
            StyleCall::Enum { setter, value } => {
                out.push_line(format!("{node}.StyleSet{setter}({})", constant(value)));
            }
            StyleCall::Number { setter, value } => {
                out.push_line(format!("{node}.StyleSet{setter}({})", format_number(value)));
            }
            StyleCall::Length {
                property,
                target,
                route: Route::Unsupported,
                value,
            } => out.push_line(unsupported_marker(node, property, target, &value)),
            StyleCall::Length {
                property,
                target,
                route,
                ..
            } => {
                let args =
                    length_arguments(target.map(constant), route, format_number, "yoga.Undefined");
                out.push_line(format!(
                    "{node}.StyleSet{}{}({})",
                    property.stem(),
                    route.suffix(),
                    args.join(", ")
                ));
            }
            StyleCall::Border { edge, value } => {
                out.push_line(format!(
                    "{node}.StyleSetBorder({}, {})",
                    constant(edge),
                    format_number(value)
                ));
            }
        }
    }

    fn layout_accessor(&self, node: NodeName, field: LayoutField) -> String {
        format!("{node}.Layout{}()", field.name())
    }

    fn assert_eq(&self, out: &mut EmitBuffer, expected: f32, actual: &str) {
        out.push_line(format!(
            "assert.EqualValues(t, {}, {actual})",
            format_number(expected)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::render_file;
    use pretty_assertions::assert_eq;
    use smallvec::smallvec;

    #[test]
    fn skips_disabled_tests_but_keeps_the_body() {
        let root = NodeName::root();
        let case = TestCase {
            name: "align_self_center_ltr".into(),
            direction: Direction::Ltr,
            experiments: smallvec![ExperimentalFeature::AbsolutePercentageAgainstPaddingEdge],
            disabled: true,
            operations: vec![
                Operation::DeclareNode { node: root },
                Operation::SetStyle {
                    node: root,
                    style: StyleOp::AlignSelf(Align::Center),
                },
                Operation::SetStyle {
                    node: root,
                    style: StyleOp::Position(Edge::Top, StyleValue::Undefined),
                },
                Operation::CalculateLayout {
                    node: root,
                    direction: Direction::Ltr,
                },
                Operation::AssertLayout {
                    node: root,
                    field: LayoutField::Top,
                    expected: 0.0,
                },
            ],
        };
        let text = render_file(&GoBackend, "YGAlignSelfTest", &[case]).unwrap();
        let body = text.split_once(")\n\n").unwrap().1;
        let expected = "\
func TestAlignSelfCenterLtr(t *testing.T) {
\tt.Skip(\"disabled in fixture\")

\tconfig := yoga.ConfigNew()
\tconfig.SetExperimentalFeatureEnabled(yoga.ExperimentalFeatureAbsolutePercentageAgainstPaddingEdge, true)

\troot := yoga.NewNodeWithConfig(config)
\troot.StyleSetAlignSelf(yoga.AlignCenter)
\troot.StyleSetPosition(yoga.EdgeTop, yoga.Undefined)
\troot.StyleSetDirection(yoga.DirectionLTR)
\tyoga.CalculateLayout(root, yoga.Undefined, yoga.Undefined, yoga.DirectionLTR)

\tassert.EqualValues(t, 0, root.LayoutTop())
}
";
        assert_eq!(body, expected);
    }

    fn single_style(style: StyleOp) -> TestCase {
        let root = NodeName::root();
        TestCase {
            name: "single".into(),
            direction: Direction::Ltr,
            experiments: smallvec![],
            disabled: false,
            operations: vec![
                Operation::DeclareNode { node: root },
                Operation::SetStyle { node: root, style },
            ],
        }
    }

    #[test]
    fn setters_missing_from_the_go_port_abort_the_file() {
        let missing = [
            StyleOp::Width(StyleValue::MaxContent),
            StyleOp::MinHeight(StyleValue::FitContent),
            StyleOp::FlexBasis(StyleValue::Stretch),
            StyleOp::Gap(Gutter::All, StyleValue::Percent(10.0)),
            StyleOp::Position(Edge::Left, StyleValue::Auto),
            StyleOp::BoxSizing(BoxSizing::ContentBox),
            StyleOp::Display(Display::Contents),
        ];
        for style in missing {
            let result = render_file(&GoBackend, "YGGoTest", &[single_style(style)]);
            assert!(
                matches!(result, Err(EmitError::Value(ValueError::Unroutable { .. }))),
                "{style:?}: {result:?}"
            );
        }
    }

    #[test]
    fn setters_present_in_the_go_port_render() {
        let present = [
            (StyleOp::Width(StyleValue::Auto), "root.StyleSetWidthAuto()"),
            (StyleOp::MaxWidth(StyleValue::Percent(50.0)), "root.StyleSetMaxWidthPercent(50)"),
            (StyleOp::Gap(Gutter::Row, StyleValue::Points(4.0)), "root.StyleSetGap(yoga.GutterRow, 4)"),
            (StyleOp::Margin(Edge::Top, StyleValue::Auto), "root.StyleSetMarginAuto(yoga.EdgeTop)"),
            (StyleOp::Display(Display::None), "root.StyleSetDisplay(yoga.DisplayNone)"),
            (
                StyleOp::Padding(Edge::Left, StyleValue::MaxContent),
                "// root: padding(Left) = max-content is not supported",
            ),
        ];
        for (style, line) in present {
            let text = render_file(&GoBackend, "YGGoTest", &[single_style(style)]).unwrap();
            assert!(text.contains(line), "{style:?}:\n{text}");
        }
    }
}
