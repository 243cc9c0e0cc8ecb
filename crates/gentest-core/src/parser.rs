//! Parser for fixture HTML → `FixtureDocument`.
//!
//! Built on `winnow` 0.7. Fixtures are a restricted HTML subset: nested
//! `<div>` elements with `id`, `style`, `data-disabled` and
//! `data-experiments` attributes. Comments and whitespace are skipped;
//! other attributes are accepted and ignored.

use crate::model::*;
use winnow::combinator::delimited;
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FixtureError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("top-level element #{index} has no `id`")]
    MissingId { index: usize },

    #[error("unknown experimental feature `{name}`")]
    UnknownExperiment { name: String },
}

/// Parse a fixture into a document of test trees.
///
/// # Errors
/// Malformed markup, a top-level `<div>` without `id`, or an unknown
/// experiment name.
pub fn parse_fixture(input: &str) -> Result<FixtureDocument, FixtureError> {
    let mut doc = FixtureDocument::new();
    let mut rest = input;
    let mut index = 0;

    skip_ws_and_comments(&mut rest);

    while !rest.is_empty() {
        if !rest.starts_with("<div") {
            return Err(syntax(input, rest, "expected `<div`"));
        }
        let element = parse_element
            .parse_next(&mut rest)
            .map_err(|e| syntax(input, rest, &format!("malformed element: {e}")))?;
        let root = doc.root;
        let idx = insert_element_recursive(&mut doc, root, element)?;
        if doc.graph[idx].id.is_none() {
            return Err(FixtureError::MissingId { index });
        }
        index += 1;

        skip_ws_and_comments(&mut rest);
    }

    Ok(doc)
}

fn syntax(input: &str, rest: &str, message: &str) -> FixtureError {
    let consumed = &input[..input.len() - rest.len()];
    FixtureError::Syntax {
        line: consumed.matches('\n').count() + 1,
        message: message.to_string(),
    }
}

/// Internal representation during parsing before inserting into the graph.
#[derive(Debug)]
struct ParsedElement {
    attributes: Vec<(String, String)>,
    children: Vec<ParsedElement>,
}

fn insert_element_recursive(
    doc: &mut FixtureDocument,
    parent: petgraph::graph::NodeIndex,
    parsed: ParsedElement,
) -> Result<petgraph::graph::NodeIndex, FixtureError> {
    let node = node_from_attributes(&parsed.attributes)?;
    let idx = doc.add_node(parent, node);
    for child in parsed.children {
        insert_element_recursive(doc, idx, child)?;
    }
    Ok(idx)
}

fn node_from_attributes(attributes: &[(String, String)]) -> Result<FixtureNode, FixtureError> {
    let mut node = FixtureNode::default();
    for (name, value) in attributes {
        match name.as_str() {
            "id" => node.id = Some(value.clone()),
            "style" => node.style = value.clone(),
            "data-disabled" => node.disabled = value.is_empty() || value == "true",
            "data-experiments" => node.experiments = parse_experiments(value)?,
            _ => {}
        }
    }
    Ok(node)
}

/// Space- or comma-separated feature names, canonical (`WebFlexBasis`) or
/// kebab-case (`web-flex-basis`).
fn parse_experiments(value: &str) -> Result<Experiments, FixtureError> {
    value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|name| !name.is_empty())
        .map(|name| {
            ExperimentalFeature::from_variant_name(name)
                .or_else(|| ExperimentalFeature::from_css(name))
                .ok_or_else(|| FixtureError::UnknownExperiment {
                    name: name.to_string(),
                })
        })
        .collect()
}

// ─── Low-level parsers ──────────────────────────────────────────────────

fn skip_ws_and_comments(input: &mut &str) {
    loop {
        let before = *input;
        *input = input.trim_start();
        if input.starts_with("<!--") {
            match input.find("-->") {
                Some(end) => *input = &input[end + 3..],
                None => *input = "",
            }
        }
        if *input == before {
            break;
        }
    }
}

fn parse_identifier<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '-' || c == '_').parse_next(input)
}

fn parse_quoted<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    if input.starts_with('\'') {
        delimited('\'', take_till(0.., '\''), '\'').parse_next(input)
    } else {
        delimited('"', take_till(0.., '"'), '"').parse_next(input)
    }
}

fn parse_attribute_value<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    if input.starts_with('"') || input.starts_with('\'') {
        parse_quoted(input)
    } else {
        take_till(1.., |c: char| c.is_whitespace() || c == '>' || c == '/').parse_next(input)
    }
}

fn parse_attributes(input: &mut &str) -> ModalResult<Vec<(String, String)>> {
    let mut attributes = Vec::new();
    loop {
        *input = input.trim_start();
        if input.starts_with('>') || input.starts_with("/>") || input.is_empty() {
            break;
        }
        let name = parse_identifier.parse_next(input)?.to_ascii_lowercase();
        *input = input.trim_start();
        let value = if input.starts_with('=') {
            let _ = '='.parse_next(input)?;
            *input = input.trim_start();
            parse_attribute_value.parse_next(input)?.to_string()
        } else {
            String::new()
        };
        attributes.push((name, value));
    }
    Ok(attributes)
}

fn parse_element(input: &mut &str) -> ModalResult<ParsedElement> {
    let _ = "<div".parse_next(input)?;
    let attributes = parse_attributes(input)?;

    if input.starts_with("/>") {
        *input = &input[2..];
        return Ok(ParsedElement {
            attributes,
            children: Vec::new(),
        });
    }
    let _ = '>'.parse_next(input)?;

    let mut children = Vec::new();
    loop {
        skip_ws_and_comments(input);
        if input.starts_with("</div") {
            let _ = "</div".parse_next(input)?;
            *input = input.trim_start();
            let _ = '>'.parse_next(input)?;
            break;
        } else if input.starts_with("<div") {
            children.push(parse_element(input)?);
        } else if input.is_empty() || input.starts_with('<') {
            // Unclosed element, or a tag other than div.
            return Err(ErrMode::Cut(ContextError::new()));
        } else {
            // Stray text content is not part of the layout tree.
            let _ = take_till(1.., '<').parse_next(input)?;
        }
    }

    Ok(ParsedElement {
        attributes,
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_tests() {
        let input = r#"
<!-- two tests -->
<div id="align_center" style="width: 100px; height: 100px;" data-experiments="WebFlexBasis">
  <div style="width: 10px"></div>
  <div style='height: 5px'>
    <div></div>
  </div>
</div>

<div id="disabled_case" data-disabled="true" style="width: 10px;"/>
"#;
        let doc = parse_fixture(input).unwrap();
        let tests = doc.tests();
        assert_eq!(tests.len(), 2);

        let first = &doc.graph[tests[0]];
        assert_eq!(first.id.as_deref(), Some("align_center"));
        assert_eq!(first.style, "width: 100px; height: 100px;");
        assert_eq!(first.experiments.as_slice(), &[ExperimentalFeature::WebFlexBasis]);
        assert!(!first.disabled);

        let children = doc.children(tests[0]);
        assert_eq!(children.len(), 2);
        assert_eq!(doc.graph[children[1]].style, "height: 5px");
        assert_eq!(doc.children(children[1]).len(), 1);

        assert!(doc.graph[doc.first_test("disabled_case").unwrap()].disabled);
    }

    #[test]
    fn missing_id_is_rejected() {
        let err = parse_fixture("<div id=\"a\"></div>\n<div style=\"width: 1px\"></div>").unwrap_err();
        assert_eq!(err, FixtureError::MissingId { index: 1 });
    }

    #[test]
    fn unclosed_element_reports_line() {
        let err = parse_fixture("<div id=\"a\">\n  <div>\n").unwrap_err();
        assert!(matches!(err, FixtureError::Syntax { .. }), "{err:?}");
    }

    #[test]
    fn unknown_experiment_is_rejected() {
        let err = parse_fixture("<div id=\"a\" data-experiments=\"Teleport\"></div>").unwrap_err();
        assert_eq!(
            err,
            FixtureError::UnknownExperiment {
                name: "Teleport".into()
            }
        );
    }

    #[test]
    fn other_tags_are_errors() {
        assert!(parse_fixture("<span id=\"a\"></span>").is_err());
        assert!(parse_fixture("<div id=\"a\"><span></span></div>").is_err());
    }
}
