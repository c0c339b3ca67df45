pub mod ai_client;
pub mod introspector;
pub mod query_executor;
pub mod renderer;

pub use ai_client::{AiClient, AiFailureKind, AiServiceError};
pub use introspector::{IntrospectionError, SchemaIntrospector};
pub use query_executor::{ExecutionError, QueryExecutor};
pub use renderer::Renderer;

#[cfg(test)]
pub use ai_client::MockAiClient;
#[cfg(test)]
pub use introspector::MockSchemaIntrospector;
#[cfg(test)]
pub use query_executor::MockQueryExecutor;
