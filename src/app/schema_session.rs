use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;

use askql_domain::{IntrospectionRows, SchemaError, SchemaModel};

use crate::completion::AutocompleteIndex;
use crate::ports::{IntrospectionError, SchemaIntrospector};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaLoadError {
    #[error(transparent)]
    Introspection(#[from] IntrospectionError),
    #[error("schema is inconsistent: {0}")]
    Invalid(#[from] SchemaError),
}

impl SchemaLoadError {
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Introspection(IntrospectionError::ConnectionFailed(info)) => info.hint(),
            Self::Introspection(IntrospectionError::Timeout) => {
                "Raise [introspection].timeout_secs or check the server load"
            }
            Self::Introspection(_) => "See the log file for details",
            Self::Invalid(_) => "The catalog changed during introspection; press Ctrl+R to retry",
        }
    }
}

/// A model together with the completion index derived from it.
#[derive(Debug)]
pub struct SchemaSnapshot {
    pub model: Arc<SchemaModel>,
    pub index: Arc<AutocompleteIndex>,
}

impl SchemaSnapshot {
    pub fn build(rows: IntrospectionRows, exclude_columns: &[String]) -> Result<Self, SchemaError> {
        let model = SchemaModel::from_introspection(rows.without_columns_matching(exclude_columns))?;
        let index = AutocompleteIndex::from_schema(&model);
        Ok(Self {
            model: Arc::new(model),
            index: Arc::new(index),
        })
    }
}

/// Holds the schema of the current connection.
///
/// Readers clone the inner `Arc` and keep using it; a refresh builds the next
/// snapshot completely before swapping the reference, so nobody observes a
/// half-built model.
#[derive(Debug, Default)]
pub struct SchemaSession {
    current: RwLock<Option<Arc<SchemaSnapshot>>>,
}

impl SchemaSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn current(&self) -> Option<Arc<SchemaSnapshot>> {
        self.current.read().await.clone()
    }

    /// On failure the previous snapshot stays in place.
    pub async fn refresh(
        &self,
        introspector: &dyn SchemaIntrospector,
        dsn: &str,
        exclude_columns: &[String],
    ) -> Result<Arc<SchemaSnapshot>, SchemaLoadError> {
        let started = Instant::now();
        let rows = introspector.fetch_schema(dsn).await?;
        let snapshot = Arc::new(SchemaSnapshot::build(rows, exclude_columns)?);
        tracing::info!(
            database = snapshot.model.database_name(),
            tables = snapshot.model.table_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "schema loaded"
        );

        *self.current.write().await = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }
}
