//! Raw cells and rows of an edit script.
//!
//! Rows arrive already parsed from the tabular source (spreadsheet, CSV,
//! JSON). A cell is whatever the reader produced: text, a number, a
//! boolean, or nothing. Spreadsheet readers report empty cells as NaN, so a
//! NaN number counts as blank too.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One cell of a raw row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Cell {
    /// Empty cell (`null` in JSON).
    #[default]
    Empty,
    /// Boolean cell.
    Bool(bool),
    /// Numeric cell. NaN is treated as blank.
    Number(f64),
    /// Text cell.
    Text(String),
}

/// A raw row: cells in column order.
pub type Row = Vec<Cell>;

impl Cell {
    /// Whether this cell carries no value.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Number(n) => n.is_nan(),
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Bool(_) => false,
        }
    }

    /// Trimmed text content, if this is a non-blank text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) if !s.trim().is_empty() => Some(s.trim()),
            _ => None,
        }
    }

    /// Numeric content, if this is a finite number cell.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => write!(f, "<empty>"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Number(n) if n.is_nan() => write!(f, "<empty>"),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Empty)
    }
}

/// Whether a row ends a section: missing or blank first cell.
pub fn is_sentinel(row: &[Cell]) -> bool {
    row.first().map_or(true, Cell::is_blank)
}

/// Parse rows from a JSON array of arrays.
///
/// Cells may be strings, numbers, booleans or `null`.
pub fn parse_rows_json(json: &str) -> Result<Vec<Row>, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_cells() {
        assert!(Cell::Empty.is_blank());
        assert!(Cell::Number(f64::NAN).is_blank());
        assert!(Cell::from("   ").is_blank());
        assert!(!Cell::from(0).is_blank());
        assert!(!Cell::from(false).is_blank());
        assert!(!Cell::from("clip").is_blank());
    }

    #[test]
    fn test_sentinel_rows() {
        assert!(is_sentinel(&[]));
        assert!(is_sentinel(&[Cell::Empty, Cell::from(3)]));
        assert!(is_sentinel(&[Cell::Number(f64::NAN)]));
        assert!(!is_sentinel(&[Cell::from("a.mp4")]));
    }

    #[test]
    fn test_parse_rows_json_mixed_cells() {
        let rows = parse_rows_json(r#"[["clip", null], ["a.mp4", 10, 19.5, true], []]"#).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec![Cell::from("clip"), Cell::Empty]);
        assert_eq!(
            rows[1],
            vec![
                Cell::from("a.mp4"),
                Cell::Number(10.0),
                Cell::Number(19.5),
                Cell::Bool(true)
            ]
        );
        assert!(rows[2].is_empty());
    }

    #[test]
    fn test_as_text_trims() {
        assert_eq!(Cell::from("  text ").as_text(), Some("text"));
        assert_eq!(Cell::from(1).as_text(), None);
        assert_eq!(Cell::Number(f64::INFINITY).as_number(), None);
    }
}
