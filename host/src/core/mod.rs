pub mod builtins;
pub mod command;
pub mod completion;
pub mod dispatch;
pub mod prompt;
pub mod repl;
pub mod session;
pub mod signals;
