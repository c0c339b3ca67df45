use serde::Serialize;

/// Rows returned by one executed statement. Cells keep psql's text rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.is_empty() {
            "No records found".to_string()
        } else {
            format!(
                "Found {} records with {} columns",
                self.row_count(),
                self.column_count()
            )
        }
    }
}
