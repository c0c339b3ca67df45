pub mod llm;
pub mod postgres;

pub use llm::HttpAiClient;
pub use postgres::PostgresAdapter;
