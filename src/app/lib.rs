pub mod action;
pub mod autocomplete;
pub mod completion;
pub mod connection_error;
pub mod edit_state;
pub mod editor;
pub mod effect;
pub mod effect_runner;
pub mod error;
pub mod input_mode;
pub mod message_state;
pub mod ports;
pub mod prompt;
pub mod reducer;
mod reducers;
pub mod response;
pub mod schema_context;
pub mod schema_session;
pub mod state;
pub mod translation;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::TranslationError;
pub use schema_context::ContextBudget;
pub use translation::Translator;
