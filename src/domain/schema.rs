use std::collections::HashMap;

use super::column::Column;
use super::foreign_key::ForeignKeyEdge;
use super::introspection::IntrospectionRows;
use super::table::Table;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("table `{0}` appears more than once")]
    DuplicateTable(String),
    #[error("column `{table}.{column}` appears more than once")]
    DuplicateColumn { table: String, column: String },
    #[error("foreign key {edge} references unknown table `{table}`")]
    UnknownTable { edge: String, table: String },
    #[error("foreign key {edge} references unknown column `{table}.{column}`")]
    UnknownColumn {
        edge: String,
        table: String,
        column: String,
    },
}

/// Read-only snapshot of one database's tables and foreign keys.
///
/// Every edge is checked against the table map at construction, so a model
/// that exists is referentially complete. A reconnect builds a new model
/// rather than mutating this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaModel {
    database_name: String,
    tables: Vec<Table>,
    positions: HashMap<String, usize>,
    foreign_keys: Vec<ForeignKeyEdge>,
}

impl SchemaModel {
    pub fn new(
        database_name: impl Into<String>,
        tables: Vec<Table>,
        foreign_keys: Vec<ForeignKeyEdge>,
    ) -> Result<Self, SchemaError> {
        let mut positions = HashMap::with_capacity(tables.len());
        for (i, table) in tables.iter().enumerate() {
            if positions.insert(table.name.clone(), i).is_some() {
                return Err(SchemaError::DuplicateTable(table.name.clone()));
            }
            let mut seen = std::collections::HashSet::new();
            for column in &table.columns {
                if !seen.insert(column.name.as_str()) {
                    return Err(SchemaError::DuplicateColumn {
                        table: table.name.clone(),
                        column: column.name.clone(),
                    });
                }
            }
        }

        let model = Self {
            database_name: database_name.into(),
            tables,
            positions,
            foreign_keys,
        };
        for edge in &model.foreign_keys {
            model.check_endpoint(edge, &edge.from_table, &edge.from_column)?;
            model.check_endpoint(edge, &edge.to_table, &edge.to_column)?;
        }
        Ok(model)
    }

    /// Groups raw catalog rows into tables by first appearance, keeping the
    /// reported column order.
    pub fn from_introspection(rows: IntrospectionRows) -> Result<Self, SchemaError> {
        let mut tables: Vec<Table> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for row in rows.columns {
            let idx = match positions.get(&row.table) {
                Some(idx) => *idx,
                None => {
                    positions.insert(row.table.clone(), tables.len());
                    tables.push(Table::new(row.table.clone(), Vec::new()));
                    tables.len() - 1
                }
            };
            tables[idx]
                .columns
                .push(Column::new(row.column, row.data_type, row.nullable));
        }

        let foreign_keys = rows
            .foreign_keys
            .into_iter()
            .map(|fk| ForeignKeyEdge::new(fk.from_table, fk.from_column, fk.to_table, fk.to_column))
            .collect();

        Self::new(rows.database_name, tables, foreign_keys)
    }

    fn check_endpoint(
        &self,
        edge: &ForeignKeyEdge,
        table: &str,
        column: &str,
    ) -> Result<(), SchemaError> {
        let Some(found) = self.table(table) else {
            return Err(SchemaError::UnknownTable {
                edge: edge.to_string(),
                table: table.to_string(),
            });
        };
        if found.column(column).is_none() {
            return Err(SchemaError::UnknownColumn {
                edge: edge.to_string(),
                table: table.to_string(),
                column: column.to_string(),
            });
        }
        Ok(())
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Tables in stored order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.positions.get(name).map(|&i| &self.tables[i])
    }

    pub fn foreign_keys(&self) -> &[ForeignKeyEdge] {
        &self.foreign_keys
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use crate::introspection::{ColumnRow, ForeignKeyRow};

    fn orders_and_customers() -> Vec<Table> {
        vec![
            Table::new(
                "orders",
                vec![
                    Column::new("id", "integer", false),
                    Column::new("customer_id", "integer", false),
                ],
            ),
            Table::new("customers", vec![Column::new("id", "integer", false)]),
        ]
    }

    mod construction {
        use super::*;

        #[test]
        fn valid_edges_are_accepted() {
            let model = SchemaModel::new(
                "shop",
                orders_and_customers(),
                vec![ForeignKeyEdge::new("orders", "customer_id", "customers", "id")],
            )
            .unwrap();

            assert_eq!(model.database_name(), "shop");
            assert_eq!(model.table_count(), 2);
            assert_eq!(model.foreign_keys().len(), 1);
        }

        #[rstest]
        #[case("orders", "customer_id", "clients", "id")]
        #[case("invoices", "customer_id", "customers", "id")]
        #[case("orders", "client_id", "customers", "id")]
        #[case("orders", "customer_id", "customers", "uuid")]
        fn dangling_edge_endpoint_is_rejected(
            #[case] from_table: &str,
            #[case] from_column: &str,
            #[case] to_table: &str,
            #[case] to_column: &str,
        ) {
            let result = SchemaModel::new(
                "shop",
                orders_and_customers(),
                vec![ForeignKeyEdge::new(from_table, from_column, to_table, to_column)],
            );

            assert!(matches!(
                result,
                Err(SchemaError::UnknownTable { .. } | SchemaError::UnknownColumn { .. })
            ));
        }

        #[test]
        fn edge_to_unknown_table_is_rejected() {
            let err = SchemaModel::new(
                "shop",
                orders_and_customers(),
                vec![ForeignKeyEdge::new("orders", "customer_id", "clients", "id")],
            )
            .unwrap_err();

            assert!(matches!(err, SchemaError::UnknownTable { ref table, .. } if table == "clients"));
        }

        #[test]
        fn edge_to_unknown_column_is_rejected() {
            let err = SchemaModel::new(
                "shop",
                orders_and_customers(),
                vec![ForeignKeyEdge::new("orders", "client_id", "customers", "id")],
            )
            .unwrap_err();

            assert_eq!(
                err,
                SchemaError::UnknownColumn {
                    edge: "orders.client_id -> customers.id".to_string(),
                    table: "orders".to_string(),
                    column: "client_id".to_string(),
                }
            );
        }

        #[test]
        fn duplicate_table_is_rejected() {
            let mut tables = orders_and_customers();
            tables.push(Table::new("orders", vec![]));

            let err = SchemaModel::new("shop", tables, vec![]).unwrap_err();

            assert_eq!(err, SchemaError::DuplicateTable("orders".to_string()));
        }

        #[test]
        fn duplicate_column_is_rejected() {
            let tables = vec![Table::new(
                "orders",
                vec![
                    Column::new("id", "integer", false),
                    Column::new("id", "bigint", false),
                ],
            )];

            let err = SchemaModel::new("shop", tables, vec![]).unwrap_err();

            assert!(matches!(err, SchemaError::DuplicateColumn { .. }));
        }

        #[test]
        fn empty_schema_is_valid_but_empty() {
            let model = SchemaModel::new("shop", vec![], vec![]).unwrap();

            assert!(model.is_empty());
        }
    }

    mod from_introspection {
        use super::*;

        #[test]
        fn groups_rows_by_first_appearance() {
            let rows = IntrospectionRows {
                database_name: "shop".to_string(),
                columns: vec![
                    ColumnRow::new("orders", "id", "integer", false),
                    ColumnRow::new("customers", "id", "integer", false),
                    ColumnRow::new("orders", "total", "numeric(10,2)", true),
                    ColumnRow::new("customers", "name", "varchar(50)", false),
                ],
                foreign_keys: vec![],
            };

            let model = SchemaModel::from_introspection(rows).unwrap();

            let names: Vec<_> = model.tables().iter().map(|t| t.name.as_str()).collect();
            assert_eq!(names, vec!["orders", "customers"]);
            let order_columns: Vec<_> = model.table("orders").unwrap().column_names().collect();
            assert_eq!(order_columns, vec!["id", "total"]);
        }

        #[test]
        fn partial_fetch_with_dangling_edge_fails() {
            let rows = IntrospectionRows {
                database_name: "shop".to_string(),
                columns: vec![ColumnRow::new("orders", "customer_id", "integer", false)],
                foreign_keys: vec![ForeignKeyRow::new("orders", "customer_id", "customers", "id")],
            };

            let result = SchemaModel::from_introspection(rows);

            assert!(matches!(result, Err(SchemaError::UnknownTable { .. })));
        }

        #[test]
        fn multiple_edges_between_same_tables_are_kept_in_order() {
            let rows = IntrospectionRows {
                database_name: "shop".to_string(),
                columns: vec![
                    ColumnRow::new("transfers", "from_account", "integer", false),
                    ColumnRow::new("transfers", "to_account", "integer", false),
                    ColumnRow::new("accounts", "id", "integer", false),
                ],
                foreign_keys: vec![
                    ForeignKeyRow::new("transfers", "from_account", "accounts", "id"),
                    ForeignKeyRow::new("transfers", "to_account", "accounts", "id"),
                ],
            };

            let model = SchemaModel::from_introspection(rows).unwrap();

            assert_eq!(model.foreign_keys()[0].from_column, "from_account");
            assert_eq!(model.foreign_keys()[1].from_column, "to_account");
        }
    }
}
