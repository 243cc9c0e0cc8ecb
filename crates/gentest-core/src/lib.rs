pub mod backends;
pub mod buffer;
pub mod emitter;
pub mod generate;
pub mod id;
pub mod layout;
pub mod lint;
pub mod model;
pub mod parser;
pub mod sign;
pub mod style;
pub mod trace;
pub mod transform;
pub mod value;

pub use buffer::{EmitBuffer, EmitError};
pub use emitter::{Backend, BackendKind, render_file};
pub use generate::{
    BackendFailure, BackendRecord, Execution, FixturePage, execute_page, generate_records,
};
pub use id::NodeName;
pub use layout::{MeasuredBox, MeasuredPage};
pub use lint::{LintDiagnostic, LintSeverity, lint_fixture};
pub use model::*;
pub use parser::{FixtureError, parse_fixture};
pub use sign::{Signature, sign, verify_signature};
pub use trace::{TraceError, build_test_cases};
pub use transform::FixtureVariants;
pub use value::ValueError;
