// ============================================================
// CATALOG ROW
// ============================================================
// One data row of a catalog export, aligned to the header

/// A data row; cells are read by resolved column index, never by name.
/// The empty string is the canonical "absent" value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    /// 1-based line number in the source file
    pub line: usize,

    /// Decoded cell values in column order
    pub cells: Vec<String>,
}

impl CatalogRow {
    pub fn new(line: usize, cells: Vec<String>) -> Self {
        Self { line, cells }
    }

    /// Trimmed value of the cell at `index`; empty if the column is absent
    /// or the row is shorter than the header.
    pub fn value(&self, index: Option<usize>) -> &str {
        index
            .and_then(|idx| self.cells.get(idx))
            .map(|cell| cell.trim())
            .unwrap_or("")
    }
}
