//! Record extraction: one module per portal view.
//!
//! Each module pairs a navigation flow (drive the session to the view, wait
//! for its grid) with a pure mapping layer from raw grid rows to typed
//! records. The mappers never touch the driver, so every positional
//! assumption is unit-testable against fixture rows.

pub mod assignments;
pub mod catalog;
pub mod detail;
pub mod profile;

use serde::Deserialize;
use serde_json::Value;

use crate::error::PortalError;

/// A grid row as extraction scripts return it: the row's identifying token
/// (may be empty for grids without one) plus its cell texts in column order.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawRow {
    #[serde(default)]
    pub id: String,
    pub cells: Vec<String>,
}

/// Script that dumps every `tr` of a grid as `{ id, cells }` objects.
///
/// The header row is included; the row mappers discard it.
pub(crate) fn rows_script(grid_selector: &str, id_attr: &str) -> String {
    format!(
        r#"(() => {{
            const grid = document.querySelector('{grid_selector}');
            if (!grid) return null;
            return [...grid.querySelectorAll('tr')].map(tr => ({{
                id: tr.getAttribute('{id_attr}') || '',
                cells: [...tr.querySelectorAll('td')].map(td => td.innerText.trim()),
            }}));
        }})()"#
    )
}

/// Decode the JSON a rows script produced. `null` means the grid itself was
/// missing, which is a shape failure, not an empty listing.
pub(crate) fn rows_from_value(value: Value, grid: &str) -> Result<Vec<RawRow>, PortalError> {
    if value.is_null() {
        return Err(PortalError::ExtractionShape(format!(
            "`{grid}` was not present on the page"
        )));
    }
    serde_json::from_value(value).map_err(|e| {
        PortalError::ExtractionShape(format!("`{grid}` rows did not decode: {e}"))
    })
}

/// Parse a numeric grid cell. Blank or non-numeric cells surface as NaN so
/// the positional slot is still occupied.
pub(crate) fn cell_number(cell: Option<&String>) -> f64 {
    cell.and_then(|s| s.trim().trim_end_matches('%').parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_grid_is_a_shape_error() {
        let err = rows_from_value(Value::Null, "#courseGrid").unwrap_err();
        assert!(matches!(err, PortalError::ExtractionShape(_)));
    }

    #[test]
    fn rows_decode_with_and_without_ids() {
        let rows = rows_from_value(
            json!([
                { "id": "row-1", "cells": ["a", "b"] },
                { "cells": ["c"] },
            ]),
            "#courseGrid",
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "row-1");
        assert_eq!(rows[1].id, "");
        assert_eq!(rows[1].cells, vec!["c"]);
    }

    #[test]
    fn cell_number_handles_blank_and_percent() {
        assert_eq!(cell_number(Some(&"85".to_string())), 85.0);
        assert_eq!(cell_number(Some(&"85%".to_string())), 85.0);
        assert!(cell_number(Some(&"".to_string())).is_nan());
        assert!(cell_number(Some(&"--".to_string())).is_nan());
        assert!(cell_number(None).is_nan());
    }
}
