//! Generation pipeline: measured fixture → one typed record per backend.
//!
//! Backends run in the fixed `BackendKind::ALL` order. A backend that fails
//! contributes a `BackendFailure` instead of a record; the others are
//! unaffected.

use crate::buffer::EmitError;
use crate::emitter::{BackendKind, render_file};
use crate::layout::MeasuredPage;
use crate::model::TestCase;
use crate::trace::{TraceError, build_test_cases};
use crate::transform::FixtureVariants;

/// One fixture as handed to an execution host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixturePage {
    /// File stem, e.g. `YGMarginTest`.
    pub name: String,
    pub variants: FixtureVariants,
}

impl FixturePage {
    #[must_use]
    pub fn new(name: impl Into<String>, fixture: &str) -> Self {
        Self {
            name: name.into(),
            variants: FixtureVariants::new(fixture),
        }
    }
}

/// Generated, unsigned source text for one backend.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendRecord {
    pub backend: BackendKind,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackendFailure {
    pub backend: BackendKind,
    pub error: EmitError,
}

/// What a host reports for one fixture.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Execution {
    pub records: Vec<BackendRecord>,
    pub failures: Vec<BackendFailure>,
}

/// Render every backend over the same test cases.
#[must_use]
pub fn generate_records(fixture: &str, cases: &[TestCase]) -> Execution {
    let mut execution = Execution::default();
    for backend in BackendKind::ALL {
        match render_file(backend.backend(), fixture, cases) {
            Ok(source) => execution.records.push(BackendRecord { backend, source }),
            Err(error) => {
                log::warn!("{fixture}: {backend} emitter failed: {error}");
                execution.failures.push(BackendFailure { backend, error });
            }
        }
    }
    execution
}

/// Build test cases from measured layouts and render every backend.
///
/// # Errors
/// Fixture-level problems (see `build_test_cases`); these produce no records.
pub fn execute_page(page: &FixturePage, layouts: &MeasuredPage) -> Result<Execution, TraceError> {
    let cases = build_test_cases(&page.variants, layouts)?;
    Ok(generate_records(&page.name, &cases))
}
