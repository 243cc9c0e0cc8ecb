//! Measured layout trees as reported by the host browser.
//!
//! Coordinates are relative to the parent's border box, matching what the
//! generated assertions read back from the layout engine.

use crate::model::LayoutField;
use serde::{Deserialize, Serialize};

/// One element's measured box and its children in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasuredBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub children: Vec<MeasuredBox>,
}

impl MeasuredBox {
    /// Read one layout field.
    pub fn field(&self, field: LayoutField) -> f32 {
        match field {
            LayoutField::Left => self.left,
            LayoutField::Top => self.top,
            LayoutField::Width => self.width,
            LayoutField::Height => self.height,
        }
    }
}

/// Measured trees for every test of a fixture, once per direction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeasuredPage {
    pub ltr: Vec<MeasuredBox>,
    pub rtl: Vec<MeasuredBox>,
}

impl MeasuredPage {
    /// Parse the JSON a host or a replay file provides.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Pretty JSON, as written to replay files.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_json() {
        let json = r#"{
            "ltr": [{"left": 0, "top": 0, "width": 100, "height": 100,
                     "children": [{"left": 45, "top": 0, "width": 10, "height": 10}]}],
            "rtl": []
        }"#;
        let page = MeasuredPage::from_json(json).unwrap();
        assert_eq!(page.ltr.len(), 1);
        let child = &page.ltr[0].children[0];
        assert_eq!(child.field(LayoutField::Left), 45.0);
        assert!(child.children.is_empty());

        let again = MeasuredPage::from_json(&page.to_json().unwrap()).unwrap();
        assert_eq!(again, page);
    }
}
