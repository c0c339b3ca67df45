use std::fmt::Write as _;

use askql_domain::SchemaModel;

pub const DEFAULT_MAX_TABLES: usize = 50;
pub const DEFAULT_MAX_COLUMNS_PER_TABLE: usize = 20;
pub const DEFAULT_MAX_RELATIONSHIPS: usize = 100;

/// Caps on how much of a schema goes into one prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextBudget {
    pub max_tables: usize,
    pub max_columns_per_table: usize,
    pub max_relationships: usize,
}

impl Default for ContextBudget {
    fn default() -> Self {
        Self {
            max_tables: DEFAULT_MAX_TABLES,
            max_columns_per_table: DEFAULT_MAX_COLUMNS_PER_TABLE,
            max_relationships: DEFAULT_MAX_RELATIONSHIPS,
        }
    }
}

impl ContextBudget {
    pub fn unlimited() -> Self {
        Self {
            max_tables: usize::MAX,
            max_columns_per_table: usize::MAX,
            max_relationships: usize::MAX,
        }
    }
}

/// Renders `model` as the schema block of a prompt.
///
/// Output is a pure function of the model and budget: tables, columns and
/// edges appear in stored order, and every region header is always emitted.
/// Anything cut by the budget is summarised with an `... and N more` line.
pub fn render(model: &SchemaModel, budget: &ContextBudget) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Database: {}", model.database_name());
    out.push('\n');

    out.push_str("Tables and Columns:\n");
    let tables = model.tables();
    for table in tables.iter().take(budget.max_tables) {
        let _ = writeln!(out, "Table: {}", table.name);
        for column in table.columns.iter().take(budget.max_columns_per_table) {
            let _ = writeln!(
                out,
                "  - {} ({}, {})",
                column.name,
                column.data_type,
                column.nullability()
            );
        }
        if let Some(hidden) = table.columns.len().checked_sub(budget.max_columns_per_table)
            && hidden > 0
        {
            let _ = writeln!(out, "  - ... and {hidden} more columns");
        }
        out.push('\n');
    }
    if let Some(hidden) = tables.len().checked_sub(budget.max_tables)
        && hidden > 0
    {
        let _ = writeln!(out, "... and {hidden} more tables");
        out.push('\n');
    }

    out.push_str("Foreign Key Relationships:\n");
    let edges = model.foreign_keys();
    for edge in edges.iter().take(budget.max_relationships) {
        let _ = writeln!(out, "  - {edge}");
    }
    if let Some(hidden) = edges.len().checked_sub(budget.max_relationships)
        && hidden > 0
    {
        let _ = writeln!(out, "  - ... and {hidden} more relationships");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use askql_domain::{Column, ForeignKeyEdge, Table};

    fn shop() -> SchemaModel {
        SchemaModel::new(
            "shop",
            vec![
                Table::new(
                    "orders",
                    vec![
                        Column::new("id", "integer", false),
                        Column::new("customer_id", "integer", false),
                        Column::new("note", "varchar(50)", true),
                    ],
                ),
                Table::new(
                    "customers",
                    vec![
                        Column::new("id", "integer", false),
                        Column::new("name", "text", false),
                    ],
                ),
            ],
            vec![ForeignKeyEdge::new("orders", "customer_id", "customers", "id")],
        )
        .unwrap()
    }

    fn wide(tables: usize, columns: usize) -> SchemaModel {
        let tables = (0..tables)
            .map(|t| {
                Table::new(
                    format!("t{t}"),
                    (0..columns)
                        .map(|c| Column::new(format!("c{c}"), "int", false))
                        .collect(),
                )
            })
            .collect();
        SchemaModel::new("wide", tables, vec![]).unwrap()
    }

    #[test]
    fn renders_all_three_regions() {
        let text = render(&shop(), &ContextBudget::default());

        insta::assert_snapshot!(text, @r"
        Database: shop

        Tables and Columns:
        Table: orders
          - id (integer, NOT NULL)
          - customer_id (integer, NOT NULL)
          - note (varchar(50), NULL)

        Table: customers
          - id (integer, NOT NULL)
          - name (text, NOT NULL)

        Foreign Key Relationships:
          - orders.customer_id -> customers.id
        ");
    }

    #[test]
    fn unchanged_model_renders_byte_identical_text() {
        let model = shop();
        let budget = ContextBudget::default();

        assert_eq!(render(&model, &budget), render(&model, &budget));
    }

    #[test]
    fn relationships_header_is_kept_without_edges() {
        let model = SchemaModel::new(
            "solo",
            vec![Table::new("t", vec![Column::new("a", "int", true)])],
            vec![],
        )
        .unwrap();

        let text = render(&model, &ContextBudget::default());

        assert!(text.ends_with("Foreign Key Relationships:\n"));
    }

    #[test]
    fn one_line_per_edge() {
        let model = SchemaModel::new(
            "bank",
            vec![
                Table::new(
                    "transfers",
                    vec![
                        Column::new("from_account", "int", false),
                        Column::new("to_account", "int", false),
                    ],
                ),
                Table::new("accounts", vec![Column::new("id", "int", false)]),
            ],
            vec![
                ForeignKeyEdge::new("transfers", "from_account", "accounts", "id"),
                ForeignKeyEdge::new("transfers", "to_account", "accounts", "id"),
            ],
        )
        .unwrap();

        let text = render(&model, &ContextBudget::default());

        for edge in model.foreign_keys() {
            let line = format!("  - {}.{} -> {}.{}\n", edge.from_table, edge.from_column, edge.to_table, edge.to_column);
            assert_eq!(text.matches(&line).count(), 1, "missing {line}");
        }
    }

    #[test]
    fn column_budget_adds_a_marker() {
        let text = render(&wide(1, 25), &ContextBudget::default());

        assert!(text.contains("  - c19 (int, NOT NULL)\n"));
        assert!(!text.contains("  - c20 "));
        assert!(text.contains("  - ... and 5 more columns\n"));
    }

    #[test]
    fn table_budget_keeps_stored_order() {
        let budget = ContextBudget {
            max_tables: 2,
            ..ContextBudget::default()
        };

        let text = render(&wide(3, 1), &budget);

        assert!(text.contains("Table: t0\n"));
        assert!(text.contains("Table: t1\n"));
        assert!(!text.contains("Table: t2\n"));
        assert!(text.contains("... and 1 more tables\n"));
    }

    #[test]
    fn unlimited_budget_omits_markers() {
        let text = render(&wide(60, 30), &ContextBudget::unlimited());

        assert!(!text.contains("more"));
        assert!(text.contains("Table: t59\n"));
    }
}
