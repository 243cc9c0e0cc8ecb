//! JUnit 4 emitter against the Java bindings (`YogaNode`).
//!
//! The class is named `YogaTest`; the driver renames it to the fixture name
//! when writing, so the emitter stays independent of file naming.

use super::{length_arguments, push_header};
use crate::buffer::{EmitBuffer, EmitError};
use crate::emitter::{Backend, BackendKind, EnumConst, StyleCall, unsupported_marker, upper_snake};
use crate::id::NodeName;
use crate::model::*;
use crate::value::{Route, format_number};

/// Class name the driver replaces with the fixture name.
pub const CLASS_PLACEHOLDER: &str = "YogaTest";

pub struct JavaBackend;

fn constant(c: EnumConst) -> String {
    format!("Yoga{}.{}", c.type_name, upper_snake(c.variant))
}

fn number(v: f32) -> String {
    format!("{}f", format_number(v))
}

/// The Java bindings name a few setters differently from the C API.
fn setter_name(setter: &str) -> &str {
    match setter {
        "FlexWrap" => "Wrap",
        other => other,
    }
}

impl Backend for JavaBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Java
    }

    fn indent_unit(&self) -> &'static str {
        "  "
    }

    fn emit_prologue(&self, out: &mut EmitBuffer, fixture: &str) {
        push_header(out, fixture);
        out.push_lines(&[
            "package com.facebook.yoga;",
            "",
            "import static org.junit.Assert.assertEquals;",
            "",
            "import org.junit.Ignore;",
            "import org.junit.Test;",
            "import org.junit.runner.RunWith;",
            "import org.junit.runners.Parameterized;",
            "",
            "@RunWith(Parameterized.class)",
        ]);
        out.push_line(format!("public class {CLASS_PLACEHOLDER} {{"));
        out.push_indent();
        out.push_lines(&[
            "@Parameterized.Parameters(name = \"{0}\")",
            "public static Iterable<TestParametrization.NodeFactory> nodeFactories() {",
            "  return TestParametrization.nodeFactories();",
            "}",
            "",
            "@Parameterized.Parameter public TestParametrization.NodeFactory mNodeFactory;",
        ]);
    }

    fn emit_epilogue(&self, out: &mut EmitBuffer) -> Result<(), EmitError> {
        out.push_lines(&[
            "",
            "private YogaNode createNode(YogaConfig config) {",
            "  return mNodeFactory.create(config);",
            "}",
        ]);
        out.pop_indent()?;
        out.push_line("}");
        Ok(())
    }

    fn emit_test_prologue(
        &self,
        out: &mut EmitBuffer,
        name: &str,
        experiments: &[ExperimentalFeature],
        disabled: bool,
    ) {
        out.push_line("@Test");
        if disabled {
            out.push_line("@Ignore");
        }
        out.push_line(format!("public void test_{name}() {{"));
        out.push_indent();
        out.push_line("YogaConfig config = YogaConfigFactory.create();");
        for feature in experiments {
            out.push_line(format!(
                "config.setExperimentalFeatureEnabled({}, true);",
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
        out.push_line(format!("final YogaNode {node} = createNode(config);"));
    }

    fn insert_child(&self, out: &mut EmitBuffer, parent: NodeName, child: NodeName, index: usize) {
        out.push_line(format!("{parent}.addChildAt({child}, {index});"));
    }

    fn calculate_layout(&self, out: &mut EmitBuffer, node: NodeName, direction: Direction) {
        out.push_line(format!(
            "{node}.setDirection({});",
            constant(EnumConst::of(direction))
        ));
        out.push_line(format!(
            "{node}.calculateLayout(YogaConstants.UNDEFINED, YogaConstants.UNDEFINED);"
        ));
    }

    fn set_style(&self, out: &mut EmitBuffer, node: NodeName, call: StyleCall) {
        match call {
            StyleCall::Enum { setter, value } => {
                out.push_line(format!(
                    "{node}.set{}({});",
                    setter_name(setter),
                    constant(value)
                ));
            }
            StyleCall::Number { setter, value } => {
                out.push_line(format!("{node}.set{setter}({});", number(value)));
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
                let args = length_arguments(
                    target.map(constant),
                    route,
                    number,
                    "YogaConstants.UNDEFINED",
                );
                out.push_line(format!(
                    "{node}.set{}{}({});",
                    property.stem(),
                    route.suffix(),
                    args.join(", ")
                ));
            }
            StyleCall::Border { edge, value } => {
                out.push_line(format!(
                    "{node}.setBorder({}, {});",
                    constant(edge),
                    number(value)
                ));
            }
        }
    }

    fn layout_accessor(&self, node: NodeName, field: LayoutField) -> String {
        let getter = match field {
            LayoutField::Left => "getLayoutX",
            LayoutField::Top => "getLayoutY",
            LayoutField::Width => "getLayoutWidth",
            LayoutField::Height => "getLayoutHeight",
        };
        format!("{node}.{getter}()")
    }

    fn assert_eq(&self, out: &mut EmitBuffer, expected: f32, actual: &str) {
        out.push_line(format!("assertEquals({}, {actual}, 0.0f);", number(expected)));
    }
}
