//! Trace construction: fixture trees + measured layouts → `TestCase`s.
//!
//! Each top-level fixture test yields two cases, `<id>_ltr` and `<id>_rtl`.
//! Styles come from the matching direction-rewritten fixture text, expected
//! values from the matching measured tree. Names, experiments and the
//! disabled flag come from the untransformed text.

use crate::id::NodeName;
use crate::layout::{MeasuredBox, MeasuredPage};
use crate::model::*;
use crate::parser::{FixtureError, parse_fixture};
use crate::style::{StyleError, lower_style};
use crate::transform::FixtureVariants;
use petgraph::graph::NodeIndex;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TraceError {
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error("test `{test}`, node `{node}`: {source}")]
    Style {
        test: String,
        node: String,
        source: StyleError,
    },

    #[error("{variant}: expected {expected} tests, found {found}")]
    TestCount {
        variant: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("test `{test}`, node `{node}`: fixture has {expected} children, {variant} has {found}")]
    Shape {
        variant: &'static str,
        test: String,
        node: String,
        expected: usize,
        found: usize,
    },
}

/// Build both directional cases for every test in the fixture.
///
/// # Errors
/// Any parse or style error, or a measured tree whose shape differs from
/// the fixture tree. These abort the whole fixture.
pub fn build_test_cases(
    variants: &FixtureVariants,
    layouts: &MeasuredPage,
) -> Result<Vec<TestCase>, TraceError> {
    let generic = parse_fixture(&variants.generic)?;
    let ltr = parse_fixture(&variants.ltr)?;
    let rtl = parse_fixture(&variants.rtl)?;

    let tests = generic.tests();
    let ltr_tests = ltr.tests();
    let rtl_tests = rtl.tests();
    check_count("ltr fixture", tests.len(), ltr_tests.len())?;
    check_count("rtl fixture", tests.len(), rtl_tests.len())?;
    check_count("ltr layout", tests.len(), layouts.ltr.len())?;
    check_count("rtl layout", tests.len(), layouts.rtl.len())?;

    let mut cases = Vec::with_capacity(tests.len() * 2);
    for (i, idx) in tests.iter().enumerate() {
        let meta = &generic.graph[*idx];
        // parse_fixture guarantees ids on top-level nodes.
        let id = meta.id.clone().unwrap_or_default();

        let directions = [
            (Direction::Ltr, "ltr", &ltr, ltr_tests[i], &layouts.ltr[i]),
            (Direction::Rtl, "rtl", &rtl, rtl_tests[i], &layouts.rtl[i]),
        ];
        for (direction, suffix, doc, test_idx, measured) in directions {
            let mut builder = CaseBuilder {
                test: &id,
                variant: suffix,
                doc,
                operations: Vec::new(),
            };
            builder.build(test_idx, measured, direction)?;
            cases.push(TestCase {
                name: format!("{id}_{suffix}"),
                direction,
                experiments: meta.experiments.clone(),
                disabled: meta.disabled,
                operations: builder.operations,
            });
        }
    }

    log::debug!("built {} test cases", cases.len());
    Ok(cases)
}

fn check_count(variant: &'static str, expected: usize, found: usize) -> Result<(), TraceError> {
    if expected != found {
        return Err(TraceError::TestCount {
            variant,
            expected,
            found,
        });
    }
    Ok(())
}

struct CaseBuilder<'a> {
    test: &'a str,
    variant: &'static str,
    doc: &'a FixtureDocument,
    operations: Vec<Operation>,
}

impl CaseBuilder<'_> {
    fn build(
        &mut self,
        idx: NodeIndex,
        measured: &MeasuredBox,
        direction: Direction,
    ) -> Result<(), TraceError> {
        let root = NodeName::root();
        self.operations.push(Operation::DeclareNode { node: root });
        self.push_styles(idx, root)?;
        self.declare_children(idx, root, measured)?;
        self.operations.push(Operation::CalculateLayout {
            node: root,
            direction,
        });
        self.assert_recursive(root, measured);
        Ok(())
    }

    fn push_styles(&mut self, idx: NodeIndex, node: NodeName) -> Result<(), TraceError> {
        let ops = lower_style(&self.doc.graph[idx].style).map_err(|source| TraceError::Style {
            test: self.test.to_string(),
            node: node.to_string(),
            source,
        })?;
        self.operations
            .extend(ops.into_iter().map(|style| Operation::SetStyle { node, style }));
        Ok(())
    }

    /// Declare, style and insert each child, then recurse into it.
    fn declare_children(
        &mut self,
        idx: NodeIndex,
        parent: NodeName,
        measured: &MeasuredBox,
    ) -> Result<(), TraceError> {
        let children = self.doc.children(idx);
        if children.len() != measured.children.len() {
            return Err(TraceError::Shape {
                variant: self.variant,
                test: self.test.to_string(),
                node: parent.to_string(),
                expected: children.len(),
                found: measured.children.len(),
            });
        }

        for (index, (child_idx, child_box)) in children.iter().zip(&measured.children).enumerate() {
            let child = parent.child(index);
            self.operations.push(Operation::DeclareNode { node: child });
            self.push_styles(*child_idx, child)?;
            self.operations.push(Operation::InsertChild {
                parent,
                child,
                index,
            });
            self.declare_children(*child_idx, child, child_box)?;
        }
        Ok(())
    }

    fn assert_recursive(&mut self, node: NodeName, measured: &MeasuredBox) {
        for field in LayoutField::ALL {
            self.operations.push(Operation::AssertLayout {
                node,
                field,
                expected: measured.field(field),
            });
        }
        for (index, child) in measured.children.iter().enumerate() {
            self.assert_recursive(node.child(index), child);
        }
    }
}
