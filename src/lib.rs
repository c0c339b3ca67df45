pub use askql_app as app;
pub use askql_domain as domain;
pub use askql_infra as infra;
pub use askql_ui as ui;

pub mod error;
pub mod logging;
