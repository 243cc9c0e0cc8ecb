//! GoogleTest emitter against the C API (`YGNode*`).

use super::{length_arguments, push_header};
use crate::buffer::{EmitBuffer, EmitError};
use crate::emitter::{Backend, BackendKind, EnumConst, StyleCall, unsupported_marker};
use crate::id::NodeName;
use crate::model::*;
use crate::value::{Route, format_number, is_integral};

pub struct CppBackend;

fn constant(c: EnumConst) -> String {
    format!("YG{}{}", c.type_name, c.variant)
}

/// Integral values stay bare; anything else needs the float suffix.
fn number(v: f32) -> String {
    if is_integral(v) {
        format_number(v)
    } else {
        format!("{}f", format_number(v))
    }
}

impl Backend for CppBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Cpp
    }

    fn indent_unit(&self) -> &'static str {
        "  "
    }

    fn emit_prologue(&self, out: &mut EmitBuffer, fixture: &str) {
        push_header(out, fixture);
        out.push_lines(&["#include <gtest/gtest.h>", "#include <yoga/Yoga.h>"]);
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
        out.push_line(format!("TEST(YogaTest, {name}) {{"));
        out.push_indent();
        if disabled {
            out.push_line("GTEST_SKIP();");
            out.push_line("");
        }
        out.push_line("YGConfigRef config = YGConfigNew();");
        for feature in experiments {
            out.push_line(format!(
                "YGConfigSetExperimentalFeatureEnabled(config, {}, true);",
                constant(EnumConst::of(*feature))
            ));
        }
        out.push_line("");
    }

    fn emit_test_epilogue(&self, out: &mut EmitBuffer) -> Result<(), EmitError> {
        out.push_line("");
        out.push_line("YGNodeFreeRecursive(root);");
        out.push_line("");
        out.push_line("YGConfigFree(config);");
        out.pop_indent()?;
        out.push_line("}");
        Ok(())
    }

    fn declare_node(&self, out: &mut EmitBuffer, node: NodeName) {
        out.push_line(format!("YGNodeRef {node} = YGNodeNewWithConfig(config);"));
    }

    fn insert_child(&self, out: &mut EmitBuffer, parent: NodeName, child: NodeName, index: usize) {
        out.push_line(format!("YGNodeInsertChild({parent}, {child}, {index});"));
    }

    fn calculate_layout(&self, out: &mut EmitBuffer, node: NodeName, direction: Direction) {
        out.push_line(format!(
            "YGNodeCalculateLayout({node}, YGUndefined, YGUndefined, {});",
            constant(EnumConst::of(direction))
        ));
    }

    fn set_style(&self, out: &mut EmitBuffer, node: NodeName, call: StyleCall) {
        match call {
            StyleCall::Enum { setter, value } => {
                out.push_line(format!("YGNodeStyleSet{setter}({node}, {});", constant(value)));
            }
            StyleCall::Number { setter, value } => {
                out.push_line(format!("YGNodeStyleSet{setter}({node}, {});", number(value)));
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
                let mut args = vec![node.to_string()];
                args.extend(length_arguments(
                    target.map(constant),
                    route,
                    number,
                    "YGUndefined",
                ));
                out.push_line(format!(
                    "YGNodeStyleSet{}{}({});",
                    property.stem(),
                    route.suffix(),
                    args.join(", ")
                ));
            }
            StyleCall::Border { edge, value } => {
                out.push_line(format!(
                    "YGNodeStyleSetBorder({node}, {}, {});",
                    constant(edge),
                    number(value)
                ));
            }
        }
    }

    fn layout_accessor(&self, node: NodeName, field: LayoutField) -> String {
        format!("YGNodeLayoutGet{}({node})", field.name())
    }

    fn assert_eq(&self, out: &mut EmitBuffer, expected: f32, actual: &str) {
        out.push_line(format!("ASSERT_FLOAT_EQ({}, {actual});", number(expected)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::render_file;
    use pretty_assertions::assert_eq;
    use smallvec::smallvec;

    #[test]
    fn renders_a_disabled_test() {
        let root = NodeName::root();
        let case = TestCase {
            name: "width_percent_ltr".into(),
            direction: Direction::Ltr,
            experiments: smallvec![ExperimentalFeature::WebFlexBasis],
            disabled: true,
            operations: vec![
                Operation::DeclareNode { node: root },
                Operation::SetStyle {
                    node: root,
                    style: StyleOp::Width(StyleValue::Percent(50.0)),
                },
                Operation::SetStyle {
                    node: root,
                    style: StyleOp::Height(StyleValue::Auto),
                },
                Operation::CalculateLayout {
                    node: root,
                    direction: Direction::Ltr,
                },
                Operation::AssertLayout {
                    node: root,
                    field: LayoutField::Width,
                    expected: 33.5,
                },
            ],
        };
        let text = render_file(&CppBackend, "YGWidthTest", &[case]).unwrap();
        let expected = "\
/**
 * MAGIC_PLACEHOLDER
 * generated by gentest from gentest/fixtures/YGWidthTest.html
 */

#include <gtest/gtest.h>
#include <yoga/Yoga.h>

TEST(YogaTest, width_percent_ltr) {
  GTEST_SKIP();

  YGConfigRef config = YGConfigNew();
  YGConfigSetExperimentalFeatureEnabled(config, YGExperimentalFeatureWebFlexBasis, true);

  YGNodeRef root = YGNodeNewWithConfig(config);
  YGNodeStyleSetWidthPercent(root, 50);
  YGNodeStyleSetHeightAuto(root);
  YGNodeCalculateLayout(root, YGUndefined, YGUndefined, YGDirectionLTR);

  ASSERT_FLOAT_EQ(33.5f, YGNodeLayoutGetWidth(root));

  YGNodeFreeRecursive(root);

  YGConfigFree(config);
}
";
        assert_eq!(text, expected);
    }
}
