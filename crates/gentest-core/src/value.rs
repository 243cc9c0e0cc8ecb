//! Value canonicalization: textual fixture values → `StyleValue`, and the
//! shared support table deciding which setter variant a value maps to.
//!
//! Every backend routes through `route`, so "which call exists for this
//! property/value pair" is decided once and cannot drift between targets.

use crate::model::StyleValue;
use winnow::combinator::{alt, eof, opt};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_while;

// ─── Errors ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    #[error("unrecognized value `{raw}`")]
    Unrecognized { raw: String },

    #[error("`{raw}` is not a number")]
    NotANumber { raw: String },

    #[error("`{property}` has no setter accepting `{value}`")]
    Unroutable {
        property: &'static str,
        value: String,
    },
}

// ─── Classification ──────────────────────────────────────────────────────

impl StyleValue {
    /// Classify a raw fixture value.
    ///
    /// `<n>px` → Points, `<n>%` → Percent, `auto`, `max-content`,
    /// `fit-content`, `stretch`, `undefined` → keyword tags. A bare `0` is
    /// the one unitless length CSS allows and classifies as points.
    pub fn parse(raw: &str) -> Result<StyleValue, ValueError> {
        let text = raw.trim();
        let keyword = match text.to_ascii_lowercase().as_str() {
            "auto" => Some(StyleValue::Auto),
            "max-content" => Some(StyleValue::MaxContent),
            "fit-content" => Some(StyleValue::FitContent),
            "stretch" => Some(StyleValue::Stretch),
            "undefined" => Some(StyleValue::Undefined),
            _ => None,
        };
        if let Some(value) = keyword {
            return Ok(value);
        }

        let mut input = text;
        parse_length
            .parse_next(&mut input)
            .map_err(|_| ValueError::Unrecognized {
                raw: raw.to_string(),
            })
    }

    /// The CSS spelling, used in diagnostics and marker comments.
    pub fn css(&self) -> String {
        match self {
            StyleValue::Points(v) => format!("{}px", format_number(*v)),
            StyleValue::Percent(v) => format!("{}%", format_number(*v)),
            StyleValue::Auto => "auto".into(),
            StyleValue::MaxContent => "max-content".into(),
            StyleValue::FitContent => "fit-content".into(),
            StyleValue::Stretch => "stretch".into(),
            StyleValue::Undefined => "undefined".into(),
        }
    }
}

fn parse_length(input: &mut &str) -> ModalResult<StyleValue> {
    let (value, unit, _) = (parse_number, opt(alt(("px", "%"))), eof).parse_next(input)?;
    match unit {
        Some("px") => Ok(StyleValue::Points(value)),
        Some(_) => Ok(StyleValue::Percent(value)),
        None if value == 0.0 => Ok(StyleValue::Points(0.0)),
        None => Err(ErrMode::Backtrack(ContextError::new())),
    }
}

fn digits<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)
}

/// Optional exponent suffix: `e3`, `E-2`. Leaves `em` and friends alone.
fn exponent(input: &mut &str) {
    let text: &str = *input;
    let Some(rest) = text.strip_prefix(['e', 'E']) else {
        return;
    };
    let unsigned = rest.strip_prefix(['+', '-']).unwrap_or(rest);
    let len = unsigned.len() - unsigned.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if len > 0 {
        *input = &unsigned[len..];
    }
}

/// Signed decimal with optional exponent: `10`, `-2.5`, `.5`, `1e3`.
/// Values that overflow `f32` are rejected.
fn parse_number(input: &mut &str) -> ModalResult<f32> {
    let start = *input;
    if input.starts_with('-') || input.starts_with('+') {
        *input = &input[1..];
    }
    let int = opt(digits).parse_next(input)?;
    let mut frac = None;
    if input.starts_with('.') {
        *input = &input[1..];
        frac = opt(digits).parse_next(input)?;
    }
    if int.is_none() && frac.is_none() {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    exponent(input);
    let matched = &start[..start.len() - input.len()];
    match matched.parse::<f32>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(ErrMode::Backtrack(ContextError::new())),
    }
}

/// Parse a unitless number (`flex-grow`, `flex-shrink`, `aspect-ratio`).
pub fn parse_unitless(raw: &str) -> Result<f32, ValueError> {
    let mut input = raw.trim();
    (parse_number, eof)
        .map(|(n, _)| n)
        .parse_next(&mut input)
        .map_err(|_| ValueError::NotANumber {
            raw: raw.to_string(),
        })
}

/// Parse a border width, which only exists in points.
pub fn parse_points(raw: &str) -> Result<f32, ValueError> {
    match StyleValue::parse(raw)? {
        StyleValue::Points(v) => Ok(v),
        _ => Err(ValueError::NotANumber {
            raw: raw.to_string(),
        }),
    }
}

/// Canonical decimal text: shortest round-trip form, no exponent, no `-0`.
///
/// Parsing never yields a non-finite value; one reaching here is a bug.
#[must_use]
pub fn format_number(v: f32) -> String {
    debug_assert!(v.is_finite(), "non-finite number {v}");
    if v == 0.0 {
        return "0".to_string();
    }
    format!("{v}")
}

/// Whether a number renders without a fractional part.
#[must_use]
pub fn is_integral(v: f32) -> bool {
    v.fract() == 0.0
}

// ─── Routing ─────────────────────────────────────────────────────────────

/// Length-valued style properties, each with its own support row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthProperty {
    FlexBasis,
    Width,
    Height,
    MinWidth,
    MinHeight,
    MaxWidth,
    MaxHeight,
    Margin,
    Padding,
    Position,
    Gap,
}

impl LengthProperty {
    /// Capitalized setter stem, e.g. `"MinWidth"`.
    pub fn stem(self) -> &'static str {
        match self {
            LengthProperty::FlexBasis => "FlexBasis",
            LengthProperty::Width => "Width",
            LengthProperty::Height => "Height",
            LengthProperty::MinWidth => "MinWidth",
            LengthProperty::MinHeight => "MinHeight",
            LengthProperty::MaxWidth => "MaxWidth",
            LengthProperty::MaxHeight => "MaxHeight",
            LengthProperty::Margin => "Margin",
            LengthProperty::Padding => "Padding",
            LengthProperty::Position => "Position",
            LengthProperty::Gap => "Gap",
        }
    }

    /// The CSS property name, e.g. `"min-width"`.
    pub fn css_name(self) -> &'static str {
        match self {
            LengthProperty::FlexBasis => "flex-basis",
            LengthProperty::Width => "width",
            LengthProperty::Height => "height",
            LengthProperty::MinWidth => "min-width",
            LengthProperty::MinHeight => "min-height",
            LengthProperty::MaxWidth => "max-width",
            LengthProperty::MaxHeight => "max-height",
            LengthProperty::Margin => "margin",
            LengthProperty::Padding => "padding",
            LengthProperty::Position => "position",
            LengthProperty::Gap => "gap",
        }
    }

    fn is_size(self) -> bool {
        matches!(
            self,
            LengthProperty::FlexBasis | LengthProperty::Width | LengthProperty::Height
        )
    }

    fn is_bound(self) -> bool {
        matches!(
            self,
            LengthProperty::MinWidth
                | LengthProperty::MinHeight
                | LengthProperty::MaxWidth
                | LengthProperty::MaxHeight
        )
    }
}

/// Which setter variant a (property, value) pair maps to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Route {
    /// Base setter with a numeric argument.
    Points(f32),
    /// Base setter with the target's undefined constant.
    Undefined,
    /// `*Percent` variant.
    Percent(f32),
    /// `*Auto` variant, no numeric argument.
    Auto,
    MaxContent,
    FitContent,
    Stretch,
    /// No call exists; backends emit a visible comment marker instead.
    Unsupported,
}

impl Route {
    /// Suffix appended to the setter stem, e.g. `"Percent"`.
    pub fn suffix(self) -> &'static str {
        match self {
            Route::Points(_) | Route::Undefined | Route::Unsupported => "",
            Route::Percent(_) => "Percent",
            Route::Auto => "Auto",
            Route::MaxContent => "MaxContent",
            Route::FitContent => "FitContent",
            Route::Stretch => "Stretch",
        }
    }
}

/// Look up the support table for `property` and `value`.
pub fn route(property: LengthProperty, value: &StyleValue) -> Result<Route, ValueError> {
    let unroutable = || ValueError::Unroutable {
        property: property.css_name(),
        value: value.css(),
    };
    let content = |route: Route| {
        if property.is_size() || property.is_bound() {
            Ok(route)
        } else if property == LengthProperty::Padding {
            Ok(Route::Unsupported)
        } else {
            Err(unroutable())
        }
    };

    match *value {
        StyleValue::Points(v) => Ok(Route::Points(v)),
        StyleValue::Undefined => Ok(Route::Undefined),
        StyleValue::Percent(v) => Ok(Route::Percent(v)),
        StyleValue::Auto => match property {
            p if p.is_size() => Ok(Route::Auto),
            LengthProperty::Margin | LengthProperty::Position => Ok(Route::Auto),
            _ => Err(unroutable()),
        },
        StyleValue::MaxContent => content(Route::MaxContent),
        StyleValue::FitContent => content(Route::FitContent),
        StyleValue::Stretch => content(Route::Stretch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_every_literal_kind() {
        assert_eq!(StyleValue::parse("10px"), Ok(StyleValue::Points(10.0)));
        assert_eq!(StyleValue::parse("-2.5px"), Ok(StyleValue::Points(-2.5)));
        assert_eq!(StyleValue::parse("50%"), Ok(StyleValue::Percent(50.0)));
        assert_eq!(StyleValue::parse("auto"), Ok(StyleValue::Auto));
        assert_eq!(StyleValue::parse("max-content"), Ok(StyleValue::MaxContent));
        assert_eq!(StyleValue::parse("fit-content"), Ok(StyleValue::FitContent));
        assert_eq!(StyleValue::parse("stretch"), Ok(StyleValue::Stretch));
        assert_eq!(StyleValue::parse("undefined"), Ok(StyleValue::Undefined));
        assert_eq!(StyleValue::parse("0"), Ok(StyleValue::Points(0.0)));
    }

    #[test]
    fn rejects_unknown_forms() {
        for raw in ["10", "10em", "px", "calc(10px)", "", "1e40px", "1e+px", "10px 5px"] {
            assert!(
                matches!(StyleValue::parse(raw), Err(ValueError::Unrecognized { .. })),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn exponents_are_plain_numbers() {
        assert_eq!(StyleValue::parse("1e3px"), Ok(StyleValue::Points(1000.0)));
        assert_eq!(StyleValue::parse("2.5E-1%"), Ok(StyleValue::Percent(0.25)));
        assert_eq!(parse_unitless("-1e1"), Ok(-10.0));
        assert_eq!(format_number(1e3), "1000");
    }

    #[test]
    fn unitless_numbers() {
        assert_eq!(parse_unitless("1"), Ok(1.0));
        assert_eq!(parse_unitless(" 0.5 "), Ok(0.5));
        assert!(parse_unitless("1px").is_err());
        assert_eq!(parse_points("3px"), Ok(3.0));
        assert!(parse_points("3%").is_err());
    }

    #[test]
    fn formats_numbers_canonically() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(10.5), "10.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.1), "0.1");
        assert!(is_integral(45.0));
        assert!(!is_integral(33.5));
    }

    #[test]
    fn support_table() {
        use LengthProperty::*;
        assert_eq!(route(Width, &StyleValue::Auto), Ok(Route::Auto));
        assert_eq!(route(Height, &StyleValue::MaxContent), Ok(Route::MaxContent));
        assert_eq!(route(Margin, &StyleValue::Auto), Ok(Route::Auto));
        assert_eq!(route(Position, &StyleValue::Percent(5.0)), Ok(Route::Percent(5.0)));
        assert_eq!(route(Padding, &StyleValue::FitContent), Ok(Route::Unsupported));
        assert_eq!(route(Gap, &StyleValue::Undefined), Ok(Route::Undefined));
        assert!(route(MinWidth, &StyleValue::Auto).is_err());
        assert!(route(Padding, &StyleValue::Auto).is_err());
        assert!(route(Margin, &StyleValue::Stretch).is_err());
        assert!(route(Gap, &StyleValue::Auto).is_err());
    }
}
