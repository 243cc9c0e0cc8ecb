//! The page a browser host loads for one fixture, and the script that
//! measures it.
//!
//! All three variants share one document: `#ltr-container` (`dir="ltr"`),
//! `#rtl-container` (`dir="rtl"`) and `#generic-container`. Measurement reads
//! only the two directional containers.

use gentest_core::FixturePage;

const STYLE: &str = "\
body {
  margin: 0;
  padding: 0;
  font-family: monospace;
}

div, span {
  box-sizing: border-box;
  position: relative;
  border: 0 solid black;
  margin: 0;
  padding: 0;
  display: flex;
  flex-direction: column;
  align-items: stretch;
  align-content: flex-start;
  justify-content: flex-start;
  flex-shrink: 0;
}

#ltr-container > *, #rtl-container > *, #generic-container > * {
  position: absolute;
}

#generic-container {
  visibility: hidden;
}";

/// Full HTML document for a fixture page.
#[must_use]
pub fn document(page: &FixturePage) -> String {
    format!(
        "<!DOCTYPE html>
<html>
<head>
<meta charset=\"utf-8\">
<title>{name}</title>
<style>
{STYLE}
</style>
</head>
<body>
<div id=\"ltr-container\" dir=\"ltr\">
{ltr}
</div>
<div id=\"rtl-container\" dir=\"rtl\">
{rtl}
</div>
<div id=\"generic-container\">
{generic}
</div>
</body>
</html>
",
        name = page.name,
        ltr = page.variants.ltr,
        rtl = page.variants.rtl,
        generic = page.variants.generic,
    )
}

/// Evaluates to a JSON string shaped like `MeasuredPage`.
///
/// Offsets are relative to the parent's border box and rounded, matching
/// what the generated assertions read back.
pub const MEASURE_SCRIPT: &str = r#"(() => {
  function measure(node) {
    const parent = node.parentNode;
    return {
      left: Math.round(node.offsetLeft + parent.clientLeft),
      top: Math.round(node.offsetTop + parent.clientTop),
      width: Math.round(node.offsetWidth),
      height: Math.round(node.offsetHeight),
      children: Array.from(node.children).map(measure),
    };
  }
  function tests(id) {
    const container = document.getElementById(id);
    return Array.from(container.children).map(measure);
  }
  return JSON.stringify({
    ltr: tests('ltr-container'),
    rtl: tests('rtl-container'),
  });
})()"#;
