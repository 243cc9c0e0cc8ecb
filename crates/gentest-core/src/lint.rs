//! Lint diagnostics for fixtures.
//!
//! Reports issues without modifying the fixture. The driver logs these
//! before generating so authors can review suspicious output.

use crate::parser::{FixtureError, parse_fixture};
use crate::style::{is_known_property, parse_declarations};

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Likely produces wrong output.
    Warning,
    /// Informational.
    Info,
}

/// A single lint diagnostic for a fixture.
#[derive(Debug, Clone, PartialEq)]
pub struct LintDiagnostic {
    /// Test id the finding belongs to, when known.
    pub test: Option<String>,
    /// 1-based line in the fixture text, when known.
    pub line: Option<usize>,
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "substitution-collision").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over fixture text.
#[must_use]
pub fn lint_fixture(text: &str) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_substitution_collisions(text, &mut diags);
    lint_tree(text, &mut diags);
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

/// Prefixes under which `start`/`end` is a logical edge or flex keyword.
const EDGE_PREFIXES: &[&str] = &["margin-", "padding-", "border-", "flex-"];

/// Warn on every `start`/`end` the direction rewrite would touch outside
/// an edge or flex-keyword context.
fn lint_substitution_collisions(text: &str, diags: &mut Vec<LintDiagnostic>) {
    for word in ["start", "end"] {
        for (offset, _) in text.match_indices(word) {
            let before = &text[..offset];
            let after = &text[offset + word.len()..];
            if is_edge_context(before, after) {
                continue;
            }
            diags.push(LintDiagnostic {
                test: None,
                line: Some(before.matches('\n').count() + 1),
                message: format!(
                    "`{}` will be rewritten by the direction transform outside an edge context.",
                    surrounding_word(text, offset, word.len())
                ),
                severity: LintSeverity::Warning,
                rule: "substitution-collision",
            });
        }
    }
}

fn is_edge_context(before: &str, after: &str) -> bool {
    let prev = before.chars().next_back();
    let standalone_start = prev.is_none_or(|c| !(c.is_alphanumeric() || c == '_' || c == '-'));
    let next_is_word = after
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() || c == '_');

    if next_is_word {
        return false;
    }
    if EDGE_PREFIXES.iter().any(|p| before.ends_with(p)) {
        return true;
    }
    // Bare `start:` / `end:` position offsets.
    standalone_start && after.trim_start().starts_with(':')
}

fn surrounding_word(text: &str, offset: usize, len: usize) -> &str {
    let is_word = |c: char| c.is_alphanumeric() || c == '_' || c == '-';
    let start = text[..offset]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word(*c))
        .last()
        .map_or(offset, |(i, _)| i);
    let end = text[offset + len..]
        .char_indices()
        .find(|(_, c)| !is_word(*c))
        .map_or(text.len(), |(i, _)| offset + len + i);
    &text[start..end]
}

/// Duplicate test ids and properties that produce no operation.
fn lint_tree(text: &str, diags: &mut Vec<LintDiagnostic>) {
    let doc = match parse_fixture(text) {
        Ok(doc) => doc,
        Err(FixtureError::MissingId { index }) => {
            diags.push(LintDiagnostic {
                test: None,
                line: None,
                message: format!("Top-level element #{index} has no `id`; it cannot name a test."),
                severity: LintSeverity::Warning,
                rule: "missing-id",
            });
            return;
        }
        // Other parse errors are reported by generation itself.
        Err(_) => return,
    };

    for test in doc.tests() {
        let id = doc.graph[test].id.clone().unwrap_or_default();
        if doc.first_test(&id) != Some(test) {
            diags.push(LintDiagnostic {
                test: Some(id.clone()),
                line: None,
                message: format!("Duplicate test id `{id}`; generated test names will clash."),
                severity: LintSeverity::Warning,
                rule: "duplicate-test-name",
            });
        }

        let mut stack = vec![test];
        while let Some(idx) = stack.pop() {
            for decl in parse_declarations(&doc.graph[idx].style) {
                if !is_known_property(&decl.property) {
                    diags.push(LintDiagnostic {
                        test: Some(id.clone()),
                        line: None,
                        message: format!("`{}` has no effect on generated tests.", decl.property),
                        severity: LintSeverity::Info,
                        rule: "unknown-property",
                    });
                }
            }
            stack.extend(doc.children(idx));
        }
    }
}
