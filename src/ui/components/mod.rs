pub mod atoms;
pub mod completion_popup;
pub mod footer;
pub mod header;
pub mod layout;
pub mod pane;
pub mod query_editor;
pub mod question;
pub mod result;
pub mod status_message;
