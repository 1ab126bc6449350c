/// A delimited table loaded verbatim from the source file
///
/// Column names and row order are preserved exactly as read; missing cells
/// are empty strings.
#[derive(Debug, Clone)]
pub struct RecordTable {
    /// Column names from the header row
    pub headers: Vec<String>,
    /// Data rows, each with one cell per header column
    pub rows: Vec<Vec<String>>,
}

impl RecordTable {
    /// Index of a named column in the header row, if present
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }
}

/// The cleaned frame driving all downstream computation
///
/// Parallel vectors of equal length: one country identifier and one (X, Y)
/// pair per row. Invariant: every X and Y value is a finite number; rows with
/// missing or non-numeric cells never enter the frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisFrame {
    /// Country identifier per row
    pub countries: Vec<String>,
    /// Animal fat intake in grams per person per day
    pub x: Vec<f64>,
    /// Reported death count
    pub y: Vec<f64>,
}

impl AnalysisFrame {
    /// Number of rows in the frame
    pub fn len(&self) -> usize {
        self.countries.len()
    }

    /// True when the frame holds zero rows
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}
