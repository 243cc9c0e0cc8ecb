//! Logical → physical direction rewrite of fixture text.
//!
//! A plain textual substitution over the whole fixture: `start`/`end`
//! become `left`/`right` (mirrored for right-to-left), then the
//! `flex-start`/`flex-end` keywords damaged by the first pass are restored.
//! It is not a parse. Any other word containing `start` or `end` is
//! rewritten too; `lint::lint_fixture` reports those sites.

/// The three renderings of one fixture handed to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureVariants {
    /// Untransformed text; test names and flags come from here.
    pub generic: String,
    pub ltr: String,
    pub rtl: String,
}

impl FixtureVariants {
    #[must_use]
    pub fn new(fixture: &str) -> Self {
        Self {
            generic: fixture.to_string(),
            ltr: ltr_variant(fixture),
            rtl: rtl_variant(fixture),
        }
    }
}

/// `start` → `left`, `end` → `right`.
#[must_use]
pub fn ltr_variant(fixture: &str) -> String {
    fixture
        .replace("start", "left")
        .replace("end", "right")
        .replace("flex-left", "flex-start")
        .replace("flex-right", "flex-end")
}

/// `start` → `right`, `end` → `left`.
#[must_use]
pub fn rtl_variant(fixture: &str) -> String {
    fixture
        .replace("start", "right")
        .replace("end", "left")
        .replace("flex-right", "flex-start")
        .replace("flex-left", "flex-end")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_logical_edges() {
        let fixture = "margin-start: 10px; padding-end: 5px; start: 1px;";
        assert_eq!(
            ltr_variant(fixture),
            "margin-left: 10px; padding-right: 5px; left: 1px;"
        );
        assert_eq!(
            rtl_variant(fixture),
            "margin-right: 10px; padding-left: 5px; right: 1px;"
        );
    }

    #[test]
    fn preserves_flex_keywords() {
        let fixture = "justify-content: flex-start; align-items: flex-end;";
        assert_eq!(ltr_variant(fixture), fixture);
        assert_eq!(rtl_variant(fixture), fixture);
    }

    #[test]
    fn mirrors_left_and_right_only() {
        let fixture = "margin-start: 1px; margin-end: 2px; margin-top: 3px; margin-bottom: 4px";
        let ltr = ltr_variant(fixture);
        let rtl = rtl_variant(fixture);
        let swapped = ltr
            .replace("left", "\u{0}")
            .replace("right", "left")
            .replace('\u{0}', "right");
        assert_eq!(rtl, swapped);
        assert!(rtl.contains("margin-top: 3px") && rtl.contains("margin-bottom: 4px"));
    }

    #[test]
    fn rewrites_unrelated_words_too() {
        // Known limitation: ids are rewritten along with styles.
        assert_eq!(ltr_variant("id=\"append_start\""), "id=\"appright_left\"");
    }

    #[test]
    fn keeps_the_generic_text() {
        let variants = FixtureVariants::new("margin-start: 1px");
        assert_eq!(variants.generic, "margin-start: 1px");
        assert_eq!(variants.ltr, "margin-left: 1px");
        assert_eq!(variants.rtl, "margin-right: 1px");
    }
}
