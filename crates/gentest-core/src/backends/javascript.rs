//! Jest emitter against the `yoga-layout` package.
//!
//! The JS bindings take percentages and keywords as string arguments to the
//! base setter rather than through `*Percent`/`*Auto` variants.

use super::push_header;
use crate::buffer::{EmitBuffer, EmitError};
use crate::emitter::{Backend, BackendKind, EnumConst, StyleCall, unsupported_marker};
use crate::id::NodeName;
use crate::model::*;
use crate::value::{Route, format_number};

pub struct JavaScriptBackend;

fn constant(c: EnumConst) -> String {
    format!("{}.{}", c.type_name, c.variant)
}

fn value_argument(route: Route) -> Option<String> {
    match route {
        Route::Points(v) => Some(format_number(v)),
        Route::Percent(v) => Some(format!("'{}%'", format_number(v))),
        Route::Undefined => Some("undefined".into()),
        Route::Auto => Some("'auto'".into()),
        Route::MaxContent => Some("'max-content'".into()),
        Route::FitContent => Some("'fit-content'".into()),
        Route::Stretch => Some("'stretch'".into()),
        Route::Unsupported => None,
    }
}

impl Backend for JavaScriptBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::JavaScript
    }

    fn indent_unit(&self) -> &'static str {
        "  "
    }

    fn emit_prologue(&self, out: &mut EmitBuffer, fixture: &str) {
        push_header(out, fixture);
        out.push_lines(&[
            "import Yoga from 'yoga-layout';",
            "import {",
            "  Align,",
            "  BoxSizing,",
            "  Direction,",
            "  Display,",
            "  Edge,",
            "  ExperimentalFeature,",
            "  FlexDirection,",
            "  Gutter,",
            "  Justify,",
            "  Overflow,",
            "  PositionType,",
            "  Wrap,",
            "} from 'yoga-layout';",
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
        let test = if disabled { "test.skip" } else { "test" };
        out.push_line(format!("{test}('{name}', () => {{"));
        out.push_indent();
        out.push_line("const config = Yoga.Config.create();");
        out.push_line("let root;");
        for feature in experiments {
            out.push_line(format!(
                "config.setExperimentalFeatureEnabled({}, true);",
                constant(EnumConst::of(*feature))
            ));
        }
        out.push_line("");
        out.push_line("try {");
        out.push_indent();
    }

    fn emit_test_epilogue(&self, out: &mut EmitBuffer) -> Result<(), EmitError> {
        out.pop_indent()?;
        out.push_line("} finally {");
        out.push_indent();
        out.push_line("if (typeof root !== 'undefined') {");
        out.push_indent();
        out.push_line("root.freeRecursive();");
        out.pop_indent()?;
        out.push_line("}");
        out.push_line("");
        out.push_line("config.free();");
        out.pop_indent()?;
        out.push_line("}");
        out.pop_indent()?;
        out.push_line("});");
        Ok(())
    }

    fn declare_node(&self, out: &mut EmitBuffer, node: NodeName) {
        // `root` is hoisted so the finally block can free it.
        if node == NodeName::root() {
            out.push_line(format!("{node} = Yoga.Node.create(config);"));
        } else {
            out.push_line(format!("const {node} = Yoga.Node.create(config);"));
        }
    }

    fn insert_child(&self, out: &mut EmitBuffer, parent: NodeName, child: NodeName, index: usize) {
        out.push_line(format!("{parent}.insertChild({child}, {index});"));
    }

    fn calculate_layout(&self, out: &mut EmitBuffer, node: NodeName, direction: Direction) {
        out.push_line(format!(
            "{node}.calculateLayout(undefined, undefined, {});",
            constant(EnumConst::of(direction))
        ));
    }

    fn set_style(&self, out: &mut EmitBuffer, node: NodeName, call: StyleCall) {
        match call {
            StyleCall::Enum { setter, value } => {
                out.push_line(format!("{node}.set{setter}({});", constant(value)));
            }
            StyleCall::Number { setter, value } => {
                out.push_line(format!("{node}.set{setter}({});", format_number(value)));
            }
            StyleCall::Length {
                property,
                target,
                route,
                value,
            } => match value_argument(route) {
                Some(arg) => {
                    let args: Vec<String> = target.map(constant).into_iter().chain([arg]).collect();
                    out.push_line(format!("{node}.set{}({});", property.stem(), args.join(", ")));
                }
                None => out.push_line(unsupported_marker(node, property, target, &value)),
            },
            StyleCall::Border { edge, value } => {
                out.push_line(format!(
                    "{node}.setBorder({}, {});",
                    constant(edge),
                    format_number(value)
                ));
            }
        }
    }

    fn layout_accessor(&self, node: NodeName, field: LayoutField) -> String {
        format!("{node}.getComputed{}()", field.name())
    }

    fn assert_eq(&self, out: &mut EmitBuffer, expected: f32, actual: &str) {
        out.push_line(format!("expect({actual}).toBe({});", format_number(expected)));
    }
}
