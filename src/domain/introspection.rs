use serde::Deserialize;

/// Raw (table, column, type, nullable) tuple as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnRow {
    pub table: String,
    pub column: String,
    pub data_type: String,
    pub nullable: bool,
}

impl ColumnRow {
    pub fn new(
        table: impl Into<String>,
        column: impl Into<String>,
        data_type: impl Into<String>,
        nullable: bool,
    ) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            data_type: data_type.into(),
            nullable,
        }
    }
}

/// Raw (parent table, parent column, referenced table, referenced column) tuple.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ForeignKeyRow {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
}

impl ForeignKeyRow {
    pub fn new(
        from_table: impl Into<String>,
        from_column: impl Into<String>,
        to_table: impl Into<String>,
        to_column: impl Into<String>,
    ) -> Self {
        Self {
            from_table: from_table.into(),
            from_column: from_column.into(),
            to_table: to_table.into(),
            to_column: to_column.into(),
        }
    }
}

/// Everything one introspection pass returns for a database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntrospectionRows {
    pub database_name: String,
    pub columns: Vec<ColumnRow>,
    pub foreign_keys: Vec<ForeignKeyRow>,
}

impl IntrospectionRows {
    /// Drops columns whose name contains any of `patterns` (case-insensitive),
    /// every foreign key touching such a column, and tables left with no columns.
    pub fn without_columns_matching(mut self, patterns: &[String]) -> Self {
        let patterns: Vec<String> = patterns
            .iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        if patterns.is_empty() {
            return self;
        }

        let excluded = |column: &str| {
            let lower = column.to_lowercase();
            patterns.iter().any(|p| lower.contains(p.as_str()))
        };

        self.columns.retain(|row| !excluded(&row.column));
        self.foreign_keys
            .retain(|fk| !excluded(&fk.from_column) && !excluded(&fk.to_column));

        // Edges into a table that lost all its columns would dangle.
        let surviving: std::collections::HashSet<&str> =
            self.columns.iter().map(|row| row.table.as_str()).collect();
        let foreign_keys = self
            .foreign_keys
            .into_iter()
            .filter(|fk| {
                surviving.contains(fk.from_table.as_str()) && surviving.contains(fk.to_table.as_str())
            })
            .collect();
        self.foreign_keys = foreign_keys;
        self
    }
}
