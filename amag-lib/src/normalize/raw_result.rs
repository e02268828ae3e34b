use super::Cell;

/// A tabular query result as returned by a query executor, before any validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawResult {
    pub tables: Vec<Table>,

    /// Error reported by the query engine alongside a partial result.
    pub partial_error: Option<String>,
}

impl RawResult {
    #[must_use]
    pub const fn new(tables: Vec<Table>) -> Self {
        Self {
            tables,
            partial_error: None,
        }
    }

    /// A result containing exactly one table.
    #[must_use]
    pub fn single(table: Table) -> Self {
        Self::new(vec![table])
    }

    #[must_use]
    pub fn with_partial_error(mut self, error: impl Into<String>) -> Self {
        self.partial_error = Some(error.into());
        self
    }
}

/// A named table of columns and rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with untyped columns, positioned in iteration order.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, column_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: column_names
                .into_iter()
                .enumerate()
                .map(|(position, name)| Column::new(name, position))
                .collect(),
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_row(mut self, row: Vec<Cell>) -> Self {
        self.rows.push(row);
        self
    }

    /// Position of the column with exactly this name (case-sensitive).
    ///
    /// When several columns share the name, the last one wins.
    #[must_use]
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().rev().find(|c| c.name == name).map(|c| c.position)
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub position: usize,

    /// Type reported by the query engine (`datetime`, `real`, `long`, ...), when known.
    pub column_type: Option<String>,
}

impl Column {
    #[must_use]
    pub fn new(name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            position,
            column_type: None,
        }
    }

    #[must_use]
    pub fn with_type(mut self, column_type: impl Into<String>) -> Self {
        self.column_type = Some(column_type.into());
        self
    }
}
