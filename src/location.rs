use std::fmt;

/// Converts a zero-based column index into its spreadsheet label
/// (`0 -> A`, `25 -> Z`, `26 -> AA`, `701 -> ZZ`, `702 -> AAA`).
pub fn column_label(index: usize) -> String {
    let mut remaining = index + 1;
    let mut letters = Vec::new();
    while remaining > 0 {
        remaining -= 1;
        letters.push(b'A' + (remaining % 26) as u8);
        remaining /= 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// A single cell position: zero-based column, one-based row (the header is row 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub column: usize,
    pub row: usize,
}

impl CellRef {
    pub const HEADER_ROW: usize = 1;

    pub fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    pub fn header(column: usize) -> Self {
        Self::new(column, Self::HEADER_ROW)
    }

    /// Position of a cell given its zero-based row index within the raw table.
    pub fn from_table_index(column: usize, row_index: usize) -> Self {
        Self::new(column, row_index + 1)
    }

    pub fn column_label(&self) -> String {
        column_label(self.column)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_label(), self.row)
    }
}
