pub mod column;
pub mod foreign_key;
pub mod introspection;
pub mod query_result;
pub mod schema;
pub mod table;
pub mod translation;

pub use column::Column;
pub use foreign_key::ForeignKeyEdge;
pub use introspection::{ColumnRow, ForeignKeyRow, IntrospectionRows};
pub use query_result::QueryResult;
pub use schema::{SchemaError, SchemaModel};
pub use table::Table;
pub use translation::{Provenance, TranslationResult};
