pub mod completer;
pub mod config;
pub mod editor;
pub mod history;
