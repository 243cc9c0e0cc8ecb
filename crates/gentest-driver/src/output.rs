//! Output paths for generated files, one fixed location per backend.

use gentest_core::BackendKind;
use std::path::{Path, PathBuf};

/// Root of the checkout that receives generated tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub root: PathBuf,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Destination of one backend's file for a fixture stem.
    #[must_use]
    pub fn path_for(&self, backend: BackendKind, fixture: &str) -> PathBuf {
        let relative = match backend {
            BackendKind::Cpp => Path::new("tests/generated").join(format!("{fixture}.cpp")),
            BackendKind::Java => {
                Path::new("java/tests/generated/com/facebook/yoga").join(format!("{fixture}.java"))
            }
            BackendKind::JavaScript => {
                Path::new("javascript/tests/generated").join(format!("{fixture}.test.ts"))
            }
            BackendKind::Go => Path::new("tests").join(format!("{}_test.go", go_file_stem(fixture))),
        };
        self.root.join(relative)
    }
}

/// `YGAlignContentTest` → `align_content`.
///
/// Drops a leading `YG` and trailing `Test`, then splits lower→upper
/// camel-case boundaries with `_`.
#[must_use]
pub fn go_file_stem(fixture: &str) -> String {
    let trimmed = fixture.strip_prefix("YG").unwrap_or(fixture);
    let trimmed = trimmed.strip_suffix("Test").unwrap_or(trimmed);

    let mut out = String::with_capacity(trimmed.len() + 4);
    let mut prev_lower = false;
    for c in trimmed.chars() {
        if prev_lower && c.is_ascii_uppercase() {
            out.push('_');
        }
        prev_lower = c.is_ascii_lowercase();
        out.push(c.to_ascii_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_stems() {
        assert_eq!(go_file_stem("YGMarginTest"), "margin");
        assert_eq!(go_file_stem("YGAlignContentTest"), "align_content");
        assert_eq!(go_file_stem("YGDimensionTest"), "dimension");
        assert_eq!(go_file_stem("YGAbsolutePositionTest"), "absolute_position");
        assert_eq!(go_file_stem("Plain"), "plain");
    }

    #[test]
    fn backend_paths() {
        let layout = OutputLayout::new("/yoga");
        assert_eq!(
            layout.path_for(BackendKind::Cpp, "YGMarginTest"),
            PathBuf::from("/yoga/tests/generated/YGMarginTest.cpp")
        );
        assert_eq!(
            layout.path_for(BackendKind::Java, "YGMarginTest"),
            PathBuf::from("/yoga/java/tests/generated/com/facebook/yoga/YGMarginTest.java")
        );
        assert_eq!(
            layout.path_for(BackendKind::JavaScript, "YGMarginTest"),
            PathBuf::from("/yoga/javascript/tests/generated/YGMarginTest.test.ts")
        );
        assert_eq!(
            layout.path_for(BackendKind::Go, "YGMarginTest"),
            PathBuf::from("/yoga/tests/margin_test.go")
        );
    }
}
