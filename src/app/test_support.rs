//! Fixtures shared by unit tests and downstream render tests.

use std::sync::Arc;

use askql_domain::{ColumnRow, ForeignKeyRow, IntrospectionRows};

use crate::schema_session::SchemaSnapshot;
use crate::state::{AppState, SchemaStatus};

pub fn shop_rows() -> IntrospectionRows {
    IntrospectionRows {
        database_name: "shop".to_string(),
        columns: vec![
            ColumnRow::new("customers", "id", "integer", false),
            ColumnRow::new("customers", "name", "text", false),
            ColumnRow::new("customers", "email", "varchar(255)", true),
            ColumnRow::new("orders", "id", "integer", false),
            ColumnRow::new("orders", "customer_id", "integer", false),
            ColumnRow::new("orders", "total", "numeric(10,2)", false),
            ColumnRow::new("orders", "placed_at", "timestamp with time zone", false),
        ],
        foreign_keys: vec![ForeignKeyRow::new("orders", "customer_id", "customers", "id")],
    }
}

pub fn shop_snapshot() -> Arc<SchemaSnapshot> {
    match SchemaSnapshot::build(shop_rows(), &[]) {
        Ok(snapshot) => Arc::new(snapshot),
        Err(e) => panic!("fixture schema is invalid: {e}"),
    }
}

/// State with the shop schema loaded and nothing typed yet.
pub fn ready_state() -> AppState {
    let mut state = AppState::new(Some("postgres://localhost/shop".to_string()));
    state.schema = Some(shop_snapshot());
    state.schema_status = SchemaStatus::Ready;
    state
}
