//! Column projection and row cleaning
//!
//! Turns the verbatim [`RecordTable`] into the [`AnalysisFrame`] driving all
//! downstream computation: the identifier column plus the two configured
//! source columns, renamed to X and Y, restricted to rows where both values
//! are present and numeric. Missing or non-numeric values are dropped, never
//! imputed; row order is preserved.

use crate::common::{AnalysisFrame, RecordTable};
use log::warn;
use thiserror::Error;

/// Errors that can occur while building the analysis frame
#[derive(Error, Debug)]
pub enum CleaningError {
    #[error("Column '{name}' is not present in the input header")]
    MissingColumn { name: String },
}

type Result<T> = core::result::Result<T, CleaningError>;

/// Names of the three columns a run projects out of the input table
#[derive(Debug, Clone)]
pub struct ColumnSelection {
    /// Country identifier column
    pub country: String,
    /// Source column renamed to X
    pub x_source: String,
    /// Source column renamed to Y
    pub y_source: String,
}

/// Build the analysis frame from a loaded table
///
/// # Arguments
/// * `table` - The table loaded from the source file
/// * `columns` - Identifier and source column names
///
/// # Returns
/// * `Ok(AnalysisFrame)` - Rows where both source values parse as finite
///   numbers, in input order
/// * `Err(CleaningError)` - If any requested column is absent
pub fn build_analysis_frame(
    table: &RecordTable,
    columns: &ColumnSelection,
) -> Result<AnalysisFrame> {
    let country_index = require_column(table, &columns.country)?;
    let x_index = require_column(table, &columns.x_source)?;
    let y_index = require_column(table, &columns.y_source)?;

    let mut countries = Vec::with_capacity(table.rows.len());
    let mut x = Vec::with_capacity(table.rows.len());
    let mut y = Vec::with_capacity(table.rows.len());
    let mut dropped = 0usize;

    for row in &table.rows {
        let x_cell = row.get(x_index).map(String::as_str).unwrap_or("");
        let y_cell = row.get(y_index).map(String::as_str).unwrap_or("");

        match (parse_numeric(x_cell), parse_numeric(y_cell)) {
            (Some(x_value), Some(y_value)) => {
                countries.push(row.get(country_index).cloned().unwrap_or_default());
                x.push(x_value);
                y.push(y_value);
            }
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!(
            "Dropped {dropped} of {} rows with missing or non-numeric values",
            table.rows.len()
        );
    }

    Ok(AnalysisFrame { countries, x, y })
}

fn require_column(table: &RecordTable, name: &str) -> Result<usize> {
    table
        .column_index(name)
        .ok_or_else(|| CleaningError::MissingColumn {
            name: name.to_owned(),
        })
}

/// Parse a cell as a finite number; empty and non-numeric cells are `None`
fn parse_numeric(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection() -> ColumnSelection {
        ColumnSelection {
            country: "Country".into(),
            x_source: "Animal fats".into(),
            y_source: "Deaths".into(),
        }
    }

    fn table(rows: &[&[&str]]) -> RecordTable {
        RecordTable {
            headers: vec!["Country".into(), "Animal fats".into(), "Deaths".into()],
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_complete_rows_all_survive() {
        let table = table(&[
            &["Albania", "31.1", "1950"],
            &["Brazil", "25.4", "3020"],
            &["Chad", "12.9", "870"],
        ]);

        let frame = build_analysis_frame(&table, &selection()).unwrap();

        assert_eq!(frame.len(), 3);
        assert_eq!(frame.countries, vec!["Albania", "Brazil", "Chad"]);
        assert_eq!(frame.x, vec![31.1, 25.4, 12.9]);
        assert_eq!(frame.y, vec![1950.0, 3020.0, 870.0]);
    }

    #[test]
    fn test_missing_and_non_numeric_rows_are_dropped() {
        let table = table(&[
            &["Albania", "31.1", "1950"],
            &["Brazil", "", "3020"],
            &["Chad", "12.9", "n/a"],
            &["Denmark", "44.0", "2410"],
        ]);

        let frame = build_analysis_frame(&table, &selection()).unwrap();

        assert_eq!(frame.len(), 2);
        assert_eq!(frame.countries, vec!["Albania", "Denmark"]);
        assert!(!frame.countries.contains(&"Brazil".to_string()));
    }

    #[test]
    fn test_one_empty_cell_among_ten_rows() {
        let mut rows: Vec<Vec<String>> = (0..10)
            .map(|i| {
                vec![
                    format!("Country {i}"),
                    format!("{}.5", i + 10),
                    format!("{}", (i + 1) * 100),
                ]
            })
            .collect();
        rows[4][2] = String::new();

        let table = RecordTable {
            headers: vec!["Country".into(), "Animal fats".into(), "Deaths".into()],
            rows,
        };
        let frame = build_analysis_frame(&table, &selection()).unwrap();

        assert_eq!(frame.len(), 9);
        assert!(!frame.countries.contains(&"Country 4".to_string()));
    }

    #[test]
    fn test_missing_source_column_fails() {
        let table = table(&[&["Albania", "31.1", "1950"]]);
        let mut columns = selection();
        columns.y_source = "Mortality".into();

        let result = build_analysis_frame(&table, &columns);
        assert!(matches!(
            result,
            Err(CleaningError::MissingColumn { name }) if name == "Mortality"
        ));
    }

    #[test]
    fn test_missing_identifier_column_fails() {
        let table = table(&[&["Albania", "31.1", "1950"]]);
        let mut columns = selection();
        columns.country = "Nation".into();

        let result = build_analysis_frame(&table, &columns);
        assert!(matches!(result, Err(CleaningError::MissingColumn { .. })));
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let table = table(&[
            &["Albania", "31.1", "1950"],
            &["Brazil", "", "3020"],
            &["Chad", "12.9", "870"],
        ]);
        let frame = build_analysis_frame(&table, &selection()).unwrap();

        // Rebuild a table from the clean frame and clean it again
        let clean_table = RecordTable {
            headers: vec!["Country".into(), "X".into(), "Y".into()],
            rows: frame
                .countries
                .iter()
                .zip(frame.x.iter().zip(frame.y.iter()))
                .map(|(country, (x, y))| vec![country.clone(), x.to_string(), y.to_string()])
                .collect(),
        };
        let clean_columns = ColumnSelection {
            country: "Country".into(),
            x_source: "X".into(),
            y_source: "Y".into(),
        };
        let reclean = build_analysis_frame(&clean_table, &clean_columns).unwrap();

        assert_eq!(reclean, frame);
    }

    #[test]
    fn test_empty_table_yields_empty_frame() {
        let table = table(&[]);
        let frame = build_analysis_frame(&table, &selection()).unwrap();

        assert!(frame.is_empty());
    }

    #[test]
    fn test_nan_cell_is_treated_as_missing() {
        let table = table(&[
            &["Albania", "NaN", "1950"],
            &["Brazil", "25.4", "3020"],
        ]);
        let frame = build_analysis_frame(&table, &selection()).unwrap();

        assert_eq!(frame.len(), 1);
        assert_eq!(frame.countries, vec!["Brazil"]);
    }
}
