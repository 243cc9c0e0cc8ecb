//! Inline style → canonical `StyleOp`s.
//!
//! Declarations are collected into fixed slots (last declaration wins,
//! shorthands expand into their longhands) and then emitted in one fixed
//! property order, so output does not depend on how a fixture orders its
//! declarations.

use crate::model::*;
use crate::value::{ValueError, parse_points, parse_unitless};

const EDGE_COUNT: usize = 9;
const GUTTER_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StyleError {
    #[error("`{property}: {value}`: {source}")]
    Value {
        property: String,
        value: String,
        source: ValueError,
    },

    #[error("`{property}`: unknown keyword `{value}`")]
    Keyword { property: String, value: String },

    #[error("`{property}`: unexpected number of values in `{value}`")]
    Arity { property: String, value: String },
}

/// One `property: value` pair from an inline style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

/// Split inline style text into declarations. Property names are lowercased.
#[must_use]
pub fn parse_declarations(style: &str) -> Vec<Declaration> {
    style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .map(|(property, value)| Declaration {
            property: property.trim().to_ascii_lowercase(),
            value: value.trim().to_string(),
        })
        .filter(|d| !d.property.is_empty())
        .collect()
}

/// Properties that lower to style operations.
const KNOWN_PROPERTIES: &[&str] = &[
    "direction",
    "flex-direction",
    "justify-content",
    "align-content",
    "align-items",
    "align-self",
    "position",
    "flex-wrap",
    "overflow",
    "display",
    "box-sizing",
    "flex",
    "flex-grow",
    "flex-shrink",
    "flex-basis",
    "width",
    "height",
    "min-width",
    "min-height",
    "max-width",
    "max-height",
    "aspect-ratio",
    "margin",
    "padding",
    "border-width",
    "inset",
    "gap",
    "row-gap",
    "column-gap",
];

/// Whether a property contributes to the generated test.
#[must_use]
pub fn is_known_property(property: &str) -> bool {
    KNOWN_PROPERTIES.contains(&property) || edge_property(property).is_some()
}

/// Lower inline style text into canonical operations.
///
/// # Errors
/// Any value that does not classify, or an unknown keyword.
pub fn lower_style(style: &str) -> Result<Vec<StyleOp>, StyleError> {
    let mut slots = StyleSlots::default();
    for decl in parse_declarations(style) {
        if !slots.apply(&decl)? {
            log::debug!("ignoring property `{}`", decl.property);
        }
    }
    Ok(slots.into_ops())
}

// ─── Slots ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeFamily {
    Margin,
    Padding,
    Border,
    Position,
}

/// `margin-left` → (Margin, Left), `border-top-width` → (Border, Top), `start` → (Position, Start).
fn edge_property(property: &str) -> Option<(EdgeFamily, Edge)> {
    let (family, edge) = if let Some(edge) = property.strip_prefix("margin-") {
        (EdgeFamily::Margin, edge)
    } else if let Some(edge) = property.strip_prefix("padding-") {
        (EdgeFamily::Padding, edge)
    } else if let Some(rest) = property.strip_prefix("border-") {
        (EdgeFamily::Border, rest.strip_suffix("-width")?)
    } else {
        (EdgeFamily::Position, property)
    };
    let edge = match edge {
        "left" => Edge::Left,
        "top" => Edge::Top,
        "right" => Edge::Right,
        "bottom" => Edge::Bottom,
        "start" => Edge::Start,
        "end" => Edge::End,
        _ => return None,
    };
    Some((family, edge))
}

#[derive(Debug, Default)]
struct StyleSlots {
    direction: Option<Direction>,
    flex_direction: Option<FlexDirection>,
    justify_content: Option<Justify>,
    align_content: Option<Align>,
    align_items: Option<Align>,
    align_self: Option<Align>,
    position_type: Option<PositionType>,
    flex_wrap: Option<Wrap>,
    overflow: Option<Overflow>,
    display: Option<Display>,
    box_sizing: Option<BoxSizing>,
    flex_grow: Option<f32>,
    flex_shrink: Option<f32>,
    flex_basis: Option<StyleValue>,
    position: [Option<StyleValue>; EDGE_COUNT],
    margin: [Option<StyleValue>; EDGE_COUNT],
    padding: [Option<StyleValue>; EDGE_COUNT],
    border: [Option<f32>; EDGE_COUNT],
    gap: [Option<StyleValue>; GUTTER_COUNT],
    width: Option<StyleValue>,
    height: Option<StyleValue>,
    min_width: Option<StyleValue>,
    min_height: Option<StyleValue>,
    max_width: Option<StyleValue>,
    max_height: Option<StyleValue>,
    aspect_ratio: Option<f32>,
}

fn keyword<T: CanonicalName>(decl: &Declaration) -> Result<T, StyleError> {
    T::from_css(&decl.value).ok_or_else(|| StyleError::Keyword {
        property: decl.property.clone(),
        value: decl.value.clone(),
    })
}

fn wrap<T>(decl: &Declaration, result: Result<T, ValueError>) -> Result<T, StyleError> {
    result.map_err(|source| StyleError::Value {
        property: decl.property.clone(),
        value: decl.value.clone(),
        source,
    })
}

fn arity(decl: &Declaration) -> StyleError {
    StyleError::Arity {
        property: decl.property.clone(),
        value: decl.value.clone(),
    }
}

/// Expand a 1–4 value box shorthand into (top, right, bottom, left).
fn box_values<'a>(decl: &'a Declaration) -> Result<[&'a str; 4], StyleError> {
    let parts: Vec<&str> = decl.value.split_whitespace().collect();
    match *parts.as_slice() {
        [a] => Ok([a, a, a, a]),
        [v, h] => Ok([v, h, v, h]),
        [t, h, b] => Ok([t, h, b, h]),
        [t, r, b, l] => Ok([t, r, b, l]),
        _ => Err(arity(decl)),
    }
}

const BOX_EDGES: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

impl StyleSlots {
    /// Record one declaration. Returns `false` for properties with no operation.
    fn apply(&mut self, decl: &Declaration) -> Result<bool, StyleError> {
        let value = || wrap(decl, StyleValue::parse(&decl.value));
        match decl.property.as_str() {
            "direction" => self.direction = Some(keyword(decl)?),
            "flex-direction" => self.flex_direction = Some(keyword(decl)?),
            "justify-content" => self.justify_content = Some(keyword(decl)?),
            "align-content" => self.align_content = Some(keyword(decl)?),
            "align-items" => self.align_items = Some(keyword(decl)?),
            "align-self" => self.align_self = Some(keyword(decl)?),
            "position" => self.position_type = Some(keyword(decl)?),
            "flex-wrap" => self.flex_wrap = Some(keyword(decl)?),
            "overflow" => self.overflow = Some(keyword(decl)?),
            "display" => self.display = Some(keyword(decl)?),
            "box-sizing" => self.box_sizing = Some(keyword(decl)?),
            "flex" => self.apply_flex(decl)?,
            "flex-grow" => self.flex_grow = Some(wrap(decl, parse_unitless(&decl.value))?),
            "flex-shrink" => self.flex_shrink = Some(wrap(decl, parse_unitless(&decl.value))?),
            "flex-basis" => self.flex_basis = Some(value()?),
            "width" => self.width = Some(value()?),
            "height" => self.height = Some(value()?),
            "min-width" => self.min_width = Some(value()?),
            "min-height" => self.min_height = Some(value()?),
            "max-width" => self.max_width = Some(value()?),
            "max-height" => self.max_height = Some(value()?),
            "aspect-ratio" => self.aspect_ratio = Some(aspect_ratio(decl)?),
            "margin" | "padding" | "inset" => {
                let values = box_values(decl)?;
                for (edge, raw) in BOX_EDGES.iter().zip(values) {
                    let parsed = wrap(decl, StyleValue::parse(raw))?;
                    let slots = match decl.property.as_str() {
                        "margin" => &mut self.margin,
                        "padding" => &mut self.padding,
                        _ => &mut self.position,
                    };
                    slots[*edge as usize] = Some(parsed);
                }
            }
            "border-width" => {
                let values = box_values(decl)?;
                for (edge, raw) in BOX_EDGES.iter().zip(values) {
                    self.border[*edge as usize] = Some(wrap(decl, parse_points(raw))?);
                }
            }
            "gap" => {
                let parts: Vec<&str> = decl.value.split_whitespace().collect();
                match parts.as_slice() {
                    [all] => {
                        self.gap[Gutter::All as usize] = Some(wrap(decl, StyleValue::parse(all))?);
                    }
                    [row, column] => {
                        self.gap[Gutter::Row as usize] = Some(wrap(decl, StyleValue::parse(row))?);
                        self.gap[Gutter::Column as usize] =
                            Some(wrap(decl, StyleValue::parse(column))?);
                    }
                    _ => return Err(arity(decl)),
                }
            }
            "row-gap" => self.gap[Gutter::Row as usize] = Some(value()?),
            "column-gap" => self.gap[Gutter::Column as usize] = Some(value()?),
            property => match edge_property(property) {
                Some((EdgeFamily::Margin, edge)) => self.margin[edge as usize] = Some(value()?),
                Some((EdgeFamily::Padding, edge)) => self.padding[edge as usize] = Some(value()?),
                Some((EdgeFamily::Position, edge)) => {
                    self.position[edge as usize] = Some(value()?)
                }
                Some((EdgeFamily::Border, edge)) => {
                    self.border[edge as usize] = Some(wrap(decl, parse_points(&decl.value))?)
                }
                None => return Ok(false),
            },
        }
        Ok(true)
    }

    /// `flex: none | auto | <grow> [<shrink>] [<basis>] | <basis>`.
    fn apply_flex(&mut self, decl: &Declaration) -> Result<(), StyleError> {
        let parts: Vec<&str> = decl.value.split_whitespace().collect();
        let (grow, shrink, basis) = match parts.as_slice() {
            ["none"] => (0.0, 0.0, StyleValue::Auto),
            ["auto"] => (1.0, 1.0, StyleValue::Auto),
            [single] => match parse_unitless(single) {
                Ok(grow) => (grow, 1.0, StyleValue::Percent(0.0)),
                Err(_) => (1.0, 1.0, wrap(decl, StyleValue::parse(single))?),
            },
            [grow, second] => {
                let grow = wrap(decl, parse_unitless(grow))?;
                match parse_unitless(second) {
                    Ok(shrink) => (grow, shrink, StyleValue::Percent(0.0)),
                    Err(_) => (grow, 1.0, wrap(decl, StyleValue::parse(second))?),
                }
            }
            [grow, shrink, basis] => (
                wrap(decl, parse_unitless(grow))?,
                wrap(decl, parse_unitless(shrink))?,
                wrap(decl, StyleValue::parse(basis))?,
            ),
            _ => return Err(arity(decl)),
        };
        self.flex_grow = Some(grow);
        self.flex_shrink = Some(shrink);
        self.flex_basis = Some(basis);
        Ok(())
    }

    fn into_ops(self) -> Vec<StyleOp> {
        let mut ops = Vec::new();
        let mut push = |op: Option<StyleOp>| ops.extend(op);

        push(self.direction.map(StyleOp::Direction));
        push(self.flex_direction.map(StyleOp::FlexDirection));
        push(self.justify_content.map(StyleOp::JustifyContent));
        push(self.align_content.map(StyleOp::AlignContent));
        push(self.align_items.map(StyleOp::AlignItems));
        push(self.align_self.map(StyleOp::AlignSelf));
        push(self.position_type.map(StyleOp::PositionType));
        push(self.flex_wrap.map(StyleOp::FlexWrap));
        push(self.overflow.map(StyleOp::Overflow));
        push(self.display.map(StyleOp::Display));
        push(self.box_sizing.map(StyleOp::BoxSizing));
        push(self.flex_grow.map(StyleOp::FlexGrow));
        push(self.flex_shrink.map(StyleOp::FlexShrink));
        push(self.flex_basis.map(StyleOp::FlexBasis));
        for edge in Edge::ALL {
            push(self.position[*edge as usize].map(|v| StyleOp::Position(*edge, v)));
        }
        for edge in Edge::ALL {
            push(self.margin[*edge as usize].map(|v| StyleOp::Margin(*edge, v)));
        }
        for edge in Edge::ALL {
            push(self.padding[*edge as usize].map(|v| StyleOp::Padding(*edge, v)));
        }
        for edge in Edge::ALL {
            push(self.border[*edge as usize].map(|v| StyleOp::Border(*edge, v)));
        }
        for gutter in Gutter::ALL {
            push(self.gap[*gutter as usize].map(|v| StyleOp::Gap(*gutter, v)));
        }
        push(self.width.map(StyleOp::Width));
        push(self.height.map(StyleOp::Height));
        push(self.min_width.map(StyleOp::MinWidth));
        push(self.min_height.map(StyleOp::MinHeight));
        push(self.max_width.map(StyleOp::MaxWidth));
        push(self.max_height.map(StyleOp::MaxHeight));
        push(self.aspect_ratio.map(StyleOp::AspectRatio));
        ops
    }
}

/// `2`, `16 / 9`.
fn aspect_ratio(decl: &Declaration) -> Result<f32, StyleError> {
    match decl.value.split_once('/') {
        Some((w, h)) => {
            let w = wrap(decl, parse_unitless(w))?;
            let h = wrap(decl, parse_unitless(h))?;
            let ratio = w / h;
            if !ratio.is_finite() {
                return wrap(
                    decl,
                    Err(ValueError::NotANumber {
                        raw: decl.value.clone(),
                    }),
                );
            }
            Ok(ratio)
        }
        None => wrap(decl, parse_unitless(&decl.value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn order_is_fixed_regardless_of_declaration_order() {
        let a = lower_style("width: 10px; flex-direction: row; margin-left: 5px").unwrap();
        let b = lower_style("margin-left: 5px; width: 10px; flex-direction: row;").unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a,
            vec![
                StyleOp::FlexDirection(FlexDirection::Row),
                StyleOp::Margin(Edge::Left, StyleValue::Points(5.0)),
                StyleOp::Width(StyleValue::Points(10.0)),
            ]
        );
    }

    #[test]
    fn last_declaration_wins() {
        let ops = lower_style("width: 10px; width: 50%").unwrap();
        assert_eq!(ops, vec![StyleOp::Width(StyleValue::Percent(50.0))]);
    }

    #[test]
    fn expands_box_shorthands() {
        let ops = lower_style("padding: 1px 2px; border-width: 3px").unwrap();
        assert_eq!(
            ops,
            vec![
                StyleOp::Padding(Edge::Left, StyleValue::Points(2.0)),
                StyleOp::Padding(Edge::Top, StyleValue::Points(1.0)),
                StyleOp::Padding(Edge::Right, StyleValue::Points(2.0)),
                StyleOp::Padding(Edge::Bottom, StyleValue::Points(1.0)),
                StyleOp::Border(Edge::Left, 3.0),
                StyleOp::Border(Edge::Top, 3.0),
                StyleOp::Border(Edge::Right, 3.0),
                StyleOp::Border(Edge::Bottom, 3.0),
            ]
        );
    }

    #[test]
    fn expands_flex_shorthand() {
        let ops = lower_style("flex: 1").unwrap();
        assert_eq!(
            ops,
            vec![
                StyleOp::FlexGrow(1.0),
                StyleOp::FlexShrink(1.0),
                StyleOp::FlexBasis(StyleValue::Percent(0.0)),
            ]
        );
        let ops = lower_style("flex: 0 0 50px").unwrap();
        assert_eq!(ops[2], StyleOp::FlexBasis(StyleValue::Points(50.0)));
    }

    #[test]
    fn logical_edges_and_offsets() {
        let ops = lower_style("position: absolute; start: 10px; margin-end: auto; top: 5%").unwrap();
        assert_eq!(
            ops,
            vec![
                StyleOp::PositionType(PositionType::Absolute),
                StyleOp::Position(Edge::Top, StyleValue::Percent(5.0)),
                StyleOp::Position(Edge::Start, StyleValue::Points(10.0)),
                StyleOp::Margin(Edge::End, StyleValue::Auto),
            ]
        );
    }

    #[test]
    fn gap_and_aspect_ratio() {
        let ops = lower_style("gap: 10px 20px; aspect-ratio: 16 / 8").unwrap();
        assert_eq!(
            ops,
            vec![
                StyleOp::Gap(Gutter::Column, StyleValue::Points(20.0)),
                StyleOp::Gap(Gutter::Row, StyleValue::Points(10.0)),
                StyleOp::AspectRatio(2.0),
            ]
        );
    }

    #[test]
    fn zero_height_aspect_ratio_is_an_error() {
        for style in ["aspect-ratio: 1 / 0", "aspect-ratio: 0/0"] {
            let err = lower_style(style).unwrap_err();
            assert!(
                matches!(
                    err,
                    StyleError::Value {
                        source: ValueError::NotANumber { .. },
                        ..
                    }
                ),
                "{style}: {err}"
            );
        }
    }

    #[test]
    fn ignores_unknown_properties() {
        assert_eq!(lower_style("background: red; color: blue").unwrap(), vec![]);
        assert!(is_known_property("margin-start"));
        assert!(is_known_property("border-left-width"));
        assert!(!is_known_property("background"));
    }

    #[test]
    fn reports_bad_values() {
        assert!(matches!(
            lower_style("width: 10em"),
            Err(StyleError::Value { .. })
        ));
        assert!(matches!(
            lower_style("align-items: sideways"),
            Err(StyleError::Keyword { .. })
        ));
        assert!(matches!(
            lower_style("margin: 1px 2px 3px 4px 5px"),
            Err(StyleError::Arity { .. })
        ));
    }
}
