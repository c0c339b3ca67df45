mod execution;
mod query_editor;
mod question;
mod schema;
mod translation;

pub use execution::reduce_execution;
pub use query_editor::reduce_query_editor;
pub use question::reduce_question;
pub use schema::reduce_schema;
pub use translation::reduce_translation;
